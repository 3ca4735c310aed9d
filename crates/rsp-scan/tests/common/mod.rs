#![allow(dead_code)]

use rsp_core::error::RepoError;
use rsp_core::node::ContentNode;
use rsp_core::repo::*;
use rsp_core::tree::ContentTree;

pub const TEMPLATE: &str = "/conf/we/settings/wcm/templates/t1";
pub const STRUCTURE_ROOT: &str = "/conf/we/settings/wcm/templates/t1/structure/jcr:content/root";
pub const INITIAL_ROOT: &str = "/conf/we/settings/wcm/templates/t1/initial/jcr:content/root";
pub const EN_ROOT: &str = "/content/we/en/jcr:content/root";
pub const ABOUT_ROOT: &str = "/content/we/en/about/jcr:content/root";
pub const LEGACY_ROOT: &str = "/content/we/legacy/jcr:content/root";

/// Add a page with a `jcr:content` child, optionally referencing a template.
pub fn add_page(tree: &mut ContentTree, page: &str, template: Option<&str>) {
    tree.add_node(page, NT_PAGE).unwrap();
    let content = format!("{}/jcr:content", page);
    tree.add_node(&content, "cq:PageContent").unwrap();
    if let Some(t) = template {
        tree.set_property(&content, "cq:template", t).unwrap();
    }
}

/// Add `<component>/cq:responsive/<breakpoint>` with a width.
pub fn add_responsive(tree: &mut ContentTree, component: &str, breakpoint: &str, width: i64) {
    let bp = format!("{}/cq:responsive/{}", component, breakpoint);
    tree.add_node(&bp, "nt:unstructured").unwrap();
    tree.set_property(&bp, "width", width).unwrap();
}

/// A site with one editable template and three pages.
///
/// Template structure (below `STRUCTURE_ROOT`):
///   title   editable, has cq:responsive (breakpoint1 = 400)
///   image   editable, no cq:responsive
///   footer  not editable, has cq:responsive
///
/// Responsive nodes outside the structure:
///   INITIAL_ROOT/title     shadow in template initial
///   EN_ROOT/title          shadow in content
///   EN_ROOT/image          shadow in content, orphan
///   EN_ROOT/footer         live (peer not editable)
///   EN_ROOT/custom         live (no peer)
///   ABOUT_ROOT/title       shadow in content (child page, same template)
///   LEGACY_ROOT/title      live (page has no template)
pub fn site() -> ContentTree {
    let mut tree = ContentTree::new();
    tree.add_node(TEMPLATE, NT_TEMPLATE).unwrap();

    add_page(&mut tree, &format!("{}/structure", TEMPLATE), Some(TEMPLATE));
    for component in ["title", "image", "footer"] {
        let path = format!("{}/{}", STRUCTURE_ROOT, component);
        tree.add_node(&path, "nt:unstructured").unwrap();
        tree.set_property(&path, "editable", component != "footer").unwrap();
    }
    add_responsive(&mut tree, &format!("{}/title", STRUCTURE_ROOT), "breakpoint1", 400);
    add_responsive(&mut tree, &format!("{}/footer", STRUCTURE_ROOT), "default", 12);

    add_page(&mut tree, &format!("{}/initial", TEMPLATE), Some(TEMPLATE));
    add_responsive(&mut tree, &format!("{}/title", INITIAL_ROOT), "default", 12);

    add_page(&mut tree, "/content/we/en", Some(TEMPLATE));
    add_responsive(&mut tree, &format!("{}/title", EN_ROOT), "default", 6);
    add_responsive(&mut tree, &format!("{}/image", EN_ROOT), "default", 8);
    add_responsive(&mut tree, &format!("{}/footer", EN_ROOT), "default", 12);
    add_responsive(&mut tree, &format!("{}/custom", EN_ROOT), "default", 4);

    add_page(&mut tree, "/content/we/en/about", Some(TEMPLATE));
    add_responsive(&mut tree, &format!("{}/title", ABOUT_ROOT), "default", 3);

    add_page(&mut tree, "/content/we/legacy", None);
    add_responsive(&mut tree, &format!("{}/title", LEGACY_ROOT), "default", 12);

    tree
}

pub fn responsive(component_path: &str) -> String {
    format!("{}/cq:responsive", component_path)
}

/// A repository whose deletes, or the commits following them, fail for
/// chosen paths.
pub struct FailingRepo {
    pub inner: ContentTree,
    pub fail_on: Vec<String>,
    pub fail_commit_on: Vec<String>,
    pub last_deleted: Option<String>,
    pub commits: usize,
    pub reverts: usize,
}

impl FailingRepo {
    pub fn new(inner: ContentTree, fail_on: &[&str]) -> Self {
        Self {
            inner,
            fail_on: fail_on.iter().map(|s| s.to_string()).collect(),
            fail_commit_on: Vec::new(),
            last_deleted: None,
            commits: 0,
            reverts: 0,
        }
    }

    pub fn with_failing_commits(inner: ContentTree, fail_commit_on: &[&str]) -> Self {
        Self {
            fail_commit_on: fail_commit_on.iter().map(|s| s.to_string()).collect(),
            ..Self::new(inner, &[])
        }
    }
}

impl NodeLookup for FailingRepo {
    fn node(&self, path: &str) -> Option<ContentNode> {
        self.inner.node(path)
    }

    fn children(&self, parent: &ContentNode) -> Vec<ContentNode> {
        self.inner.children(parent)
    }
}

impl NodeSearch for FailingRepo {
    fn find_by_name<'a>(
        &'a self,
        root: &str,
        name: &str,
        node_type: Option<&str>,
    ) -> Result<Box<dyn Iterator<Item = ContentNode> + 'a>, RepoError> {
        self.inner.find_by_name(root, name, node_type)
    }
}

impl PageResolver for FailingRepo {
    fn containing_page(&self, node: &ContentNode) -> Option<Page> {
        self.inner.containing_page(node)
    }

    fn page_template(&self, page: &Page) -> Option<Template> {
        self.inner.page_template(page)
    }

    fn containing_template(&self, node: &ContentNode) -> Option<Template> {
        self.inner.containing_template(node)
    }
}

impl NodeWriter for FailingRepo {
    fn delete(&mut self, path: &str) -> Result<(), RepoError> {
        if self.fail_on.iter().any(|p| p == path) {
            return Err(RepoError::Persistence(format!("{} is locked", path)));
        }
        self.inner.delete(path)?;
        self.last_deleted = Some(path.to_string());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), RepoError> {
        if let Some(path) = &self.last_deleted
            && self.fail_commit_on.contains(path)
        {
            return Err(RepoError::Persistence(format!("cannot save {}", path)));
        }
        self.commits += 1;
        self.inner.commit()
    }

    fn revert(&mut self) {
        self.reverts += 1;
        self.last_deleted = None;
        self.inner.revert();
    }
}
