//! Read/write content tree documents from disk.

use crate::schema;
use crate::tree::ContentTree;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const RSP_DIR: &str = ".rsp";
const CONFIG_FILE: &str = "config.toml";

/// Get the path to the tool directory for a given project root.
pub fn rsp_dir(project_root: &Path) -> PathBuf {
    project_root.join(RSP_DIR)
}

/// Get the path to the configuration file for a given project root.
pub fn config_file(project_root: &Path) -> PathBuf {
    rsp_dir(project_root).join(CONFIG_FILE)
}

/// Load a content tree from a document file. The returned tree is backed by
/// that file, so each commit rewrites it.
pub fn load(file: &Path) -> Result<ContentTree> {
    let json = fs::read_to_string(file)
        .with_context(|| format!("failed to read content tree from {}", file.display()))?;
    let tree = schema::from_json(&json)
        .with_context(|| format!("invalid content tree document {}", file.display()))?;
    Ok(tree.with_backing_file(file))
}

/// Save a content tree to a document file, creating parent directories if
/// needed. The file is written to a sibling temp file first and renamed into
/// place.
pub fn save(file: &Path, tree: &ContentTree) -> Result<()> {
    if let Some(dir) = file.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }

    let json = schema::to_json(tree)?;
    let tmp = file.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, file)
        .with_context(|| format!("failed to write content tree to {}", file.display()))?;

    Ok(())
}
