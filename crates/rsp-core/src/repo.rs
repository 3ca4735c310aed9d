//! Capabilities the classifier and batch processor consume from a content
//! repository.
//!
//! Each concern is its own trait so tests can swap one of them (a writer that
//! fails on purpose, say) without reimplementing the rest.
//! [`crate::tree::ContentTree`] implements all of them.

use crate::error::RepoError;
use crate::node::ContentNode;

/// Primary type of nodes that are pages.
pub const NT_PAGE: &str = "cq:Page";
/// Primary type of nodes that are editable templates.
pub const NT_TEMPLATE: &str = "cq:Template";
/// Node type filter that matches every node.
pub const NT_BASE: &str = "nt:base";

/// Resolve paths to nodes.
pub trait NodeLookup {
    /// The node at `path`, if any.
    fn node(&self, path: &str) -> Option<ContentNode>;

    /// The direct child of `parent` called `name`, if any.
    fn child(&self, parent: &ContentNode, name: &str) -> Option<ContentNode> {
        self.node(&crate::path::join(parent.path(), name))
    }

    /// Direct children of `parent`, in tree order.
    fn children(&self, parent: &ContentNode) -> Vec<ContentNode>;

    /// The parent node, or `None` for the root.
    fn parent(&self, node: &ContentNode) -> Option<ContentNode> {
        crate::path::parent(node.path()).and_then(|p| self.node(p))
    }
}

/// Find nodes below a search root.
pub trait NodeSearch {
    /// All nodes strictly below `root` whose name equals `name`, optionally
    /// restricted to a primary type (`None` or [`NT_BASE`] matches any type).
    ///
    /// The returned cursor is forward-only and yields nodes in tree order.
    fn find_by_name<'a>(
        &'a self,
        root: &str,
        name: &str,
        node_type: Option<&str>,
    ) -> Result<Box<dyn Iterator<Item = ContentNode> + 'a>, RepoError>;
}

/// A page: a node that may reference one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub path: String,
}

/// An editable template, identified by its root path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub path: String,
}

impl Template {
    /// Name of the subtree mirroring the page layout.
    pub const STRUCTURE: &'static str = "structure";
    /// Name of the subtree used to seed new pages.
    pub const INITIAL: &'static str = "initial";

    pub fn structure_path(&self) -> String {
        crate::path::join(&self.path, Self::STRUCTURE)
    }

    pub fn initial_path(&self) -> String {
        crate::path::join(&self.path, Self::INITIAL)
    }
}

/// Page and template relationships.
pub trait PageResolver {
    /// The nearest page containing `node` (the node itself if it is a page).
    fn containing_page(&self, node: &ContentNode) -> Option<Page>;

    /// The template a page is built from, if it references a valid one.
    fn page_template(&self, page: &Page) -> Option<Template>;

    /// The nearest template containing `node` (the node itself if it is one).
    fn containing_template(&self, node: &ContentNode) -> Option<Template>;
}

/// Remove nodes and persist the change.
pub trait NodeWriter {
    /// Remove `path` and its whole subtree.
    fn delete(&mut self, path: &str) -> Result<(), RepoError>;

    /// Persist every pending change.
    fn commit(&mut self) -> Result<(), RepoError>;

    /// Discard every change made since the last successful commit.
    fn revert(&mut self);
}

/// Everything the read side needs.
pub trait ContentRepository: NodeLookup + NodeSearch + PageResolver {}

impl<T: NodeLookup + NodeSearch + PageResolver + ?Sized> ContentRepository for T {}
