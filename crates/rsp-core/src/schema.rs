//! JSON document format and version handling for content trees.
//!
//! A node is a JSON object: scalar and string-array members are properties,
//! object members are child nodes in document order. This is the layout of a
//! JCR `.infinity.json` export, wrapped in a small versioned envelope.

use crate::error::DocumentError;
use crate::node::{PN_PRIMARY_TYPE, PropertyValue};
use crate::path;
use crate::tree::ContentTree;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const CURRENT_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    version: String,
    updated_at: DateTime<Utc>,
    root: Map<String, Value>,
}

/// Serialize a tree to a pretty-printed JSON document.
pub fn to_json(tree: &ContentTree) -> Result<String> {
    let doc = Document {
        version: CURRENT_VERSION.to_string(),
        updated_at: tree.updated_at,
        root: encode_node(tree, path::ROOT)?,
    };
    serde_json::to_string_pretty(&doc).context("failed to serialize content tree to JSON")
}

/// Deserialize a tree from a JSON document.
pub fn from_json(json: &str) -> Result<ContentTree> {
    let doc: Document = serde_json::from_str(json)
        .map_err(DocumentError::from)
        .context("failed to deserialize content tree from JSON")?;
    if doc.version != CURRENT_VERSION {
        return Err(DocumentError::Version {
            expected: CURRENT_VERSION.to_string(),
            found: doc.version,
        }
        .into());
    }
    let mut tree = ContentTree::new();
    decode_node(&mut tree, path::ROOT, &doc.root)?;
    tree.updated_at = doc.updated_at;
    Ok(tree)
}

fn encode_node(tree: &ContentTree, node_path: &str) -> Result<Map<String, Value>, DocumentError> {
    let mut out = Map::new();
    let Some(entry) = tree.entry(node_path) else {
        return Ok(out);
    };
    out.insert(
        PN_PRIMARY_TYPE.to_string(),
        Value::String(entry.primary_type.clone()),
    );
    for (key, value) in &entry.properties {
        out.insert(key.clone(), serde_json::to_value(value)?);
    }
    for child in &entry.children {
        let child_path = path::join(node_path, child);
        out.insert(child.clone(), Value::Object(encode_node(tree, &child_path)?));
    }
    Ok(out)
}

fn decode_node(
    tree: &mut ContentTree,
    node_path: &str,
    members: &Map<String, Value>,
) -> Result<(), DocumentError> {
    for (key, value) in members {
        if let Value::Object(child) = value {
            if key.is_empty() || key.contains('/') {
                return Err(DocumentError::InvalidName {
                    parent: node_path.to_string(),
                    name: key.clone(),
                });
            }
            let child_path = path::join(node_path, key);
            tree.add_node(&child_path, crate::node::NT_UNSTRUCTURED)
                .map_err(|_| DocumentError::InvalidName {
                    parent: node_path.to_string(),
                    name: key.clone(),
                })?;
            decode_node(tree, &child_path, child)?;
            continue;
        }
        let property = decode_value(value).ok_or_else(|| DocumentError::UnsupportedValue {
            path: node_path.to_string(),
            property: key.clone(),
        })?;
        tree.set_property(node_path, key, property)?;
    }
    Ok(())
}

/// String arrays and scalars only; `null` and mixed arrays are rejected.
fn decode_value(value: &Value) -> Option<PropertyValue> {
    match value {
        Value::Null | Value::Object(_) => None,
        _ => PropertyValue::deserialize(value).ok(),
    }
}
