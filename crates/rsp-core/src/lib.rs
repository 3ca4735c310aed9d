//! Core types and storage for responsive node cleanup.
//!
//! Provides the path-addressed content tree ([`tree::ContentTree`]), node
//! handles, the repository traits the classifier is written against, JSON
//! document persistence, and configuration.

pub mod config;
pub mod error;
pub mod node;
pub mod path;
pub mod repo;
pub mod schema;
pub mod storage;
pub mod tree;
