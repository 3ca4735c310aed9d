//! Scan request parameters and their defaults.

use crate::classify::Category;
use rsp_core::config::RspConfig;

/// What to do with the matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    View,
    Remove,
    /// Anything else. Reported as text, never raised as an error.
    Unknown(String),
}

impl Operation {
    pub fn parse(s: &str) -> Self {
        match s {
            "view" => Operation::View,
            "remove" => Operation::Remove,
            other => Operation::Unknown(other.to_string()),
        }
    }
}

/// How matches are listed in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewType {
    NoView,
    Simple,
    Detailed,
    /// Unrecognised view types list nothing per item.
    Unknown(String),
}

impl ViewType {
    pub fn parse(s: &str) -> Self {
        match s {
            "noView" => ViewType::NoView,
            "simple" => ViewType::Simple,
            "detailed" => ViewType::Detailed,
            other => ViewType::Unknown(other.to_string()),
        }
    }
}

/// One scan, with every parameter resolved. The raw strings are kept so the
/// report can echo exactly what was asked for.
#[derive(Debug, Clone)]
pub struct CleanupRequest {
    pub category: String,
    pub view: String,
    pub operation: String,
    pub search_paths: Vec<String>,
    pub min_batch_size: usize,
}

impl CleanupRequest {
    /// Build a request from optional parameters. Missing or empty values fall
    /// back to the configuration; the operation defaults to `view`.
    pub fn new(
        config: &RspConfig,
        category: Option<String>,
        view: Option<String>,
        operation: Option<String>,
        search_paths: Vec<String>,
    ) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        Self {
            category: non_empty(category).unwrap_or_else(|| config.scan.category.clone()),
            view: non_empty(view).unwrap_or_else(|| config.scan.view.clone()),
            operation: non_empty(operation).unwrap_or_else(|| "view".to_string()),
            search_paths: if search_paths.is_empty() {
                config.scan.search_paths.clone()
            } else {
                search_paths
            },
            min_batch_size: config.cleanup.min_batch_size,
        }
    }

    /// The requested category, or `None` when it names no known category.
    pub fn category(&self) -> Option<Category> {
        self.category.parse().ok()
    }

    pub fn operation(&self) -> Operation {
        Operation::parse(&self.operation)
    }

    pub fn view(&self) -> ViewType {
        ViewType::parse(&self.view)
    }
}
