//! In-memory content tree: the repository implementation used by the CLI and
//! by tests.

use crate::error::RepoError;
use crate::node::{ContentNode, NT_UNSTRUCTURED, PN_PRIMARY_TYPE, PropertyValue};
use crate::path;
use crate::repo::{
    NT_BASE, NT_PAGE, NT_TEMPLATE, NodeLookup, NodeSearch, NodeWriter, Page, PageResolver,
    Template,
};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Primary type of the repository root.
pub const NT_ROOT: &str = "rep:root";
/// Child of a page holding its content and page-level properties.
pub const NN_PAGE_CONTENT: &str = "jcr:content";
/// Property referencing the template a page was created from.
pub const PN_TEMPLATE: &str = "cq:template";

/// Storage for one node: everything but its path, which is the map key.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeEntry {
    pub(crate) primary_type: String,
    pub(crate) properties: BTreeMap<String, PropertyValue>,
    /// Child names in tree order.
    pub(crate) children: Vec<String>,
}

/// A subtree removed since the last commit, kept so it can be put back.
#[derive(Debug, Clone)]
struct Removal {
    path: String,
    /// Position of the removed node among its parent's children.
    index: usize,
    entries: Vec<(String, NodeEntry)>,
}

/// A path-addressed node tree with page and template resolution.
///
/// Deletions are applied immediately in memory and stay pending until
/// [`NodeWriter::commit`] or [`NodeWriter::revert`]. A tree loaded from disk
/// remembers its file and rewrites it on every commit.
#[derive(Debug, Clone)]
pub struct ContentTree {
    pub updated_at: DateTime<Utc>,
    nodes: HashMap<String, NodeEntry>,
    backing_file: Option<PathBuf>,
    uncommitted: Vec<Removal>,
}

impl Default for ContentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentTree {
    /// Create a tree holding only the root node.
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            path::ROOT.to_string(),
            NodeEntry {
                primary_type: NT_ROOT.to_string(),
                ..NodeEntry::default()
            },
        );
        Self {
            updated_at: Utc::now(),
            nodes,
            backing_file: None,
            uncommitted: Vec::new(),
        }
    }

    /// Attach a file that [`NodeWriter::commit`] rewrites.
    pub fn with_backing_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.backing_file = Some(file.into());
        self
    }

    pub fn backing_file(&self) -> Option<&std::path::Path> {
        self.backing_file.as_deref()
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always has its root, so it is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    /// Deletions applied since the last commit.
    pub fn pending_changes(&self) -> usize {
        self.uncommitted.len()
    }

    /// Create the node at `path` with the given primary type, creating missing
    /// ancestors as `nt:unstructured`. An existing node keeps its properties
    /// and children and takes the new primary type.
    pub fn add_node(&mut self, node_path: &str, primary_type: &str) -> Result<(), RepoError> {
        path::validate(node_path)?;
        if let Some(entry) = self.nodes.get_mut(node_path) {
            entry.primary_type = primary_type.to_string();
            return Ok(());
        }
        if let Some(parent) = path::parent(node_path)
            && !self.nodes.contains_key(parent)
        {
            self.add_node(parent, NT_UNSTRUCTURED)?;
        }
        if let Some(parent) = path::parent(node_path)
            && let Some(parent_entry) = self.nodes.get_mut(parent)
        {
            parent_entry.children.push(path::name(node_path).to_string());
        }
        self.nodes.insert(
            node_path.to_string(),
            NodeEntry {
                primary_type: primary_type.to_string(),
                ..NodeEntry::default()
            },
        );
        Ok(())
    }

    /// Set a property on an existing node. Setting `jcr:primaryType` changes
    /// the node's primary type instead, and only accepts a string.
    pub fn set_property(
        &mut self,
        node_path: &str,
        key: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<(), RepoError> {
        let entry = self
            .nodes
            .get_mut(node_path)
            .ok_or_else(|| RepoError::NotFound(node_path.to_string()))?;
        match (key, value.into()) {
            (PN_PRIMARY_TYPE, PropertyValue::String(primary_type)) => {
                entry.primary_type = primary_type;
            }
            (PN_PRIMARY_TYPE, _) => {
                return Err(RepoError::InvalidValue {
                    path: node_path.to_string(),
                    property: key.to_string(),
                });
            }
            (_, value) => {
                entry.properties.insert(key.to_string(), value);
            }
        }
        Ok(())
    }

    pub(crate) fn entry(&self, node_path: &str) -> Option<&NodeEntry> {
        self.nodes.get(node_path)
    }

    /// Paths of `root` and everything below it, depth-first pre-order in tree
    /// order.
    pub fn walk(&self, root: &str) -> Walk<'_> {
        let stack = if self.nodes.contains_key(root) {
            vec![root.to_string()]
        } else {
            Vec::new()
        };
        Walk { tree: self, stack }
    }

    fn snapshot(&self, node_path: &str) -> Option<ContentNode> {
        self.nodes.get(node_path).map(|entry| {
            ContentNode::new(node_path, &entry.primary_type, entry.properties.clone())
        })
    }

    fn has_type(&self, node_path: &str, primary_type: &str) -> bool {
        self.nodes
            .get(node_path)
            .is_some_and(|e| e.primary_type == primary_type)
    }

    /// Read `cq:template` from the page's `jcr:content`, then from the page
    /// node itself.
    fn template_reference(&self, page_path: &str) -> Option<&str> {
        let content = path::join(page_path, NN_PAGE_CONTENT);
        [content.as_str(), page_path]
            .into_iter()
            .filter_map(|p| self.nodes.get(p))
            .find_map(|e| e.properties.get(PN_TEMPLATE).and_then(PropertyValue::as_str))
    }
}

/// Depth-first pre-order cursor over node paths.
pub struct Walk<'a> {
    tree: &'a ContentTree,
    stack: Vec<String>,
}

impl Iterator for Walk<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let current = self.stack.pop()?;
        if let Some(entry) = self.tree.nodes.get(&current) {
            for child in entry.children.iter().rev() {
                self.stack.push(path::join(&current, child));
            }
        }
        Some(current)
    }
}

impl NodeLookup for ContentTree {
    fn node(&self, node_path: &str) -> Option<ContentNode> {
        self.snapshot(node_path)
    }

    fn children(&self, parent: &ContentNode) -> Vec<ContentNode> {
        let Some(entry) = self.nodes.get(parent.path()) else {
            return Vec::new();
        };
        entry
            .children
            .iter()
            .filter_map(|name| self.snapshot(&path::join(parent.path(), name)))
            .collect()
    }
}

impl NodeSearch for ContentTree {
    fn find_by_name<'a>(
        &'a self,
        root: &str,
        name: &str,
        node_type: Option<&str>,
    ) -> Result<Box<dyn Iterator<Item = ContentNode> + 'a>, RepoError> {
        path::validate(root)?;
        if !self.nodes.contains_key(root) {
            return Err(RepoError::NotFound(root.to_string()));
        }
        let name = name.to_string();
        let node_type = node_type
            .filter(|t| *t != NT_BASE)
            .map(str::to_string);
        let root = root.to_string();
        let matches = self
            .walk(&root)
            .filter(move |p| *p != root)
            .filter(move |p| path::name(p) == name)
            .filter(move |p| match &node_type {
                Some(t) => self.has_type(p, t),
                None => true,
            })
            .filter_map(move |p| self.snapshot(&p));
        Ok(Box::new(matches))
    }
}

impl PageResolver for ContentTree {
    fn containing_page(&self, node: &ContentNode) -> Option<Page> {
        path::ancestors_inclusive(node.path())
            .find(|p| self.has_type(p, NT_PAGE))
            .map(|p| Page {
                path: p.to_string(),
            })
    }

    fn page_template(&self, page: &Page) -> Option<Template> {
        let reference = self.template_reference(&page.path)?;
        if reference.is_empty() || !self.has_type(reference, NT_TEMPLATE) {
            return None;
        }
        Some(Template {
            path: reference.to_string(),
        })
    }

    fn containing_template(&self, node: &ContentNode) -> Option<Template> {
        path::ancestors_inclusive(node.path())
            .find(|p| self.has_type(p, NT_TEMPLATE))
            .map(|p| Template {
                path: p.to_string(),
            })
    }
}

impl NodeWriter for ContentTree {
    fn delete(&mut self, node_path: &str) -> Result<(), RepoError> {
        path::validate(node_path)?;
        if node_path == path::ROOT {
            return Err(RepoError::RootDeletion);
        }
        if !self.nodes.contains_key(node_path) {
            return Err(RepoError::NotFound(node_path.to_string()));
        }
        let doomed: Vec<String> = self.walk(node_path).collect();
        let entries = doomed
            .into_iter()
            .filter_map(|p| self.nodes.remove(&p).map(|e| (p, e)))
            .collect();
        let mut index = 0;
        if let Some(parent) = path::parent(node_path)
            && let Some(parent_entry) = self.nodes.get_mut(parent)
        {
            let name = path::name(node_path);
            if let Some(i) = parent_entry.children.iter().position(|c| c == name) {
                parent_entry.children.remove(i);
                index = i;
            }
        }
        self.uncommitted.push(Removal {
            path: node_path.to_string(),
            index,
            entries,
        });
        Ok(())
    }

    fn commit(&mut self) -> Result<(), RepoError> {
        if self.uncommitted.is_empty() {
            return Ok(());
        }
        self.updated_at = Utc::now();
        if let Some(file) = self.backing_file.clone() {
            crate::storage::save(&file, self)
                .map_err(|e| RepoError::Persistence(format!("{:#}", e)))?;
        }
        self.uncommitted.clear();
        Ok(())
    }

    fn revert(&mut self) {
        while let Some(removal) = self.uncommitted.pop() {
            if let Some(parent) = path::parent(&removal.path)
                && let Some(parent_entry) = self.nodes.get_mut(parent)
            {
                let index = removal.index.min(parent_entry.children.len());
                parent_entry
                    .children
                    .insert(index, path::name(&removal.path).to_string());
            }
            self.nodes.extend(removal.entries);
        }
    }
}
