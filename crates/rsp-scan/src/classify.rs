//! Classification of `cq:responsive` nodes against their page's template.
//!
//! A responsive node is projected onto its template's `structure` subtree: the
//! path of the node's parent relative to its containing page is looked up below
//! `<template>/structure`. When that peer exists and is marked `editable`, the
//! template supplies the layout, and a copy living anywhere else is a shadow.
//!
//! Nothing here is cached. Every predicate re-reads the repository, so a
//! verdict always reflects the tree at the moment it is asked.

use rsp_core::node::ContentNode;
use rsp_core::path;
use rsp_core::repo::{ContentRepository, Template};
use std::fmt;
use std::str::FromStr;

/// Name of every responsive configuration node.
pub const NN_RESPONSIVE: &str = "cq:responsive";
/// Root of live site content.
pub const CONTENT_ROOT: &str = "/content";
/// Boolean property marking a template structure component as editable.
pub const PN_EDITABLE: &str = "editable";

/// Errors raised when building a [`ResponsiveItem`].
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// True iff `node` is a responsive configuration node.
pub fn is_responsive_config(node: &ContentNode) -> bool {
    node.name() == NN_RESPONSIVE
}

/// The categories a scan can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Outside the template structure, superseded by an editable template peer.
    Shadow,
    /// A shadow inside the template's `initial` subtree.
    ShadowInTemplateInitial,
    /// A shadow below `/content`.
    ShadowInContent,
    /// Below `/content`, with an editable template peer that has no
    /// responsive configuration of its own.
    Orphan,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Shadow,
        Category::ShadowInTemplateInitial,
        Category::ShadowInContent,
        Category::Orphan,
    ];

    /// The request parameter value naming this category.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Shadow => "shadow",
            Category::ShadowInTemplateInitial => "shadowInTemplateInitial",
            Category::ShadowInContent => "shadowInContent",
            Category::Orphan => "orphan",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// Every predicate evaluated once, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Verdict {
    pub shadow: bool,
    pub shadow_in_template_initial: bool,
    pub shadow_in_content: bool,
    pub orphan: bool,
}

impl Verdict {
    /// A node that is neither shadow nor orphan is live configuration.
    pub fn is_live(&self) -> bool {
        !self.shadow && !self.orphan
    }

    pub fn matches(&self, category: Category) -> bool {
        match category {
            Category::Shadow => self.shadow,
            Category::ShadowInTemplateInitial => self.shadow_in_template_initial,
            Category::ShadowInContent => self.shadow_in_content,
            Category::Orphan => self.orphan,
        }
    }
}

/// A responsive node bound to the repository it is classified against.
pub struct ResponsiveItem<'r, R: ContentRepository + ?Sized> {
    repo: &'r R,
    node: ContentNode,
}

impl<'r, R: ContentRepository + ?Sized> ResponsiveItem<'r, R> {
    /// Wrap `node`. Fails unless it is a responsive configuration node.
    pub fn new(repo: &'r R, node: ContentNode) -> Result<Self, ClassifyError> {
        if !is_responsive_config(&node) {
            return Err(ClassifyError::InvalidArgument(format!(
                "the node at {} is not responsive",
                node.path()
            )));
        }
        Ok(Self { repo, node })
    }

    /// Look up `node_path` and wrap it. Fails if the node is absent or not
    /// responsive.
    pub fn at(repo: &'r R, node_path: &str) -> Result<Self, ClassifyError> {
        let node = repo.node(node_path).ok_or_else(|| {
            ClassifyError::InvalidArgument(format!("the node at {} does not exist", node_path))
        })?;
        Self::new(repo, node)
    }

    pub fn node(&self) -> &ContentNode {
        &self.node
    }

    pub fn path(&self) -> &str {
        self.node.path()
    }

    pub fn into_node(self) -> ContentNode {
        self.node
    }

    /// The editable component in the template structure that this node's
    /// parent mirrors.
    pub fn template_structure_peer(&self) -> Option<ContentNode> {
        let template = self.template()?;
        if template.path.is_empty() {
            return None;
        }
        let relative = self.parent_relative_path()?;
        if relative.is_empty() {
            return None;
        }
        let peer_path = path::join_relative(&template.structure_path(), &relative);
        self.repo
            .node(&peer_path)
            .filter(|peer| peer.bool_property(PN_EDITABLE, false))
    }

    /// The peer's own `cq:responsive` child, if the peer exists.
    pub fn template_structure_responsive(&self) -> Option<ContentNode> {
        let peer = self.template_structure_peer()?;
        self.repo.child(&peer, NN_RESPONSIVE)
    }

    pub fn is_in_template_structure(&self) -> bool {
        self.is_in_template_subtree(Template::STRUCTURE)
    }

    pub fn is_in_template_initial(&self) -> bool {
        self.is_in_template_subtree(Template::INITIAL)
    }

    /// Plain prefix match, so `/content-archive` counts as content too.
    pub fn is_under_content_root(&self) -> bool {
        self.path().starts_with(CONTENT_ROOT)
    }

    pub fn is_shadow(&self) -> bool {
        !self.is_in_template_structure() && self.template_structure_peer().is_some()
    }

    pub fn is_shadow_in_template_initial(&self) -> bool {
        self.is_shadow() && self.is_in_template_initial()
    }

    pub fn is_shadow_in_content(&self) -> bool {
        self.is_shadow() && self.is_under_content_root()
    }

    pub fn is_orphan(&self) -> bool {
        if !self.is_under_content_root() {
            return false;
        }
        match self.template_structure_peer() {
            Some(peer) => self.repo.child(&peer, NN_RESPONSIVE).is_none(),
            None => false,
        }
    }

    pub fn matches(&self, category: Category) -> bool {
        match category {
            Category::Shadow => self.is_shadow(),
            Category::ShadowInTemplateInitial => self.is_shadow_in_template_initial(),
            Category::ShadowInContent => self.is_shadow_in_content(),
            Category::Orphan => self.is_orphan(),
        }
    }

    pub fn verdict(&self) -> Verdict {
        let shadow = self.is_shadow();
        Verdict {
            shadow,
            shadow_in_template_initial: shadow && self.is_in_template_initial(),
            shadow_in_content: shadow && self.is_under_content_root(),
            orphan: self.is_orphan(),
        }
    }

    /// The template of the page containing this node.
    fn template(&self) -> Option<Template> {
        let page = self.repo.containing_page(&self.node)?;
        self.repo.page_template(&page)
    }

    /// Path of this node's parent relative to the parent's containing page.
    fn parent_relative_path(&self) -> Option<String> {
        let parent = self.repo.parent(&self.node)?;
        let page = self.repo.containing_page(&parent)?;
        path::relative_to(parent.path(), &page.path).map(str::to_string)
    }

    fn is_in_template_subtree(&self, subtree: &str) -> bool {
        match self.repo.containing_template(&self.node) {
            Some(template) => {
                path::is_within(self.path(), &path::join(&template.path, subtree))
            }
            None => false,
        }
    }
}
