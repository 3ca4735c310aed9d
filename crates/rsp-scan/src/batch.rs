//! Candidate discovery, category filtering and best-effort deletion.

use crate::classify::{Category, NN_RESPONSIVE, ResponsiveItem};
use rsp_core::error::RepoError;
use rsp_core::node::ContentNode;
use rsp_core::path;
use rsp_core::repo::{ContentRepository, NodeWriter};

/// Result of deleting and committing one node.
#[derive(Debug)]
pub struct DeletionOutcome {
    pub path: String,
    pub result: Result<(), RepoError>,
}

impl DeletionOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Lazy cursor over every responsive node below a list of search roots.
///
/// Roots are searched one after the other, in the order given. A root is
/// skipped when it is empty, is the repository root `/`, or does not exist.
/// A search failure is yielded as an `Err` item.
pub struct Candidates<'a, R: ContentRepository + ?Sized> {
    repo: &'a R,
    roots: std::vec::IntoIter<String>,
    current: Option<Box<dyn Iterator<Item = ContentNode> + 'a>>,
}

impl<R: ContentRepository + ?Sized> Iterator for Candidates<'_, R> {
    type Item = Result<ContentNode, RepoError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(cursor) = self.current.as_mut() {
                if let Some(node) = cursor.next() {
                    tracing::debug!("candidate {}", node.path());
                    return Some(Ok(node));
                }
                self.current = None;
            }

            let root = self.roots.next()?;
            if !is_searchable_root(self.repo, &root) {
                tracing::debug!("skipping search path '{}'", root);
                continue;
            }
            match self
                .repo
                .find_by_name(path::normalize(&root), NN_RESPONSIVE, None)
            {
                Ok(cursor) => self.current = Some(cursor),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// True when `root` may be searched: non-empty, not `/`, and present.
pub fn is_searchable_root<R: ContentRepository + ?Sized>(repo: &R, root: &str) -> bool {
    let root = path::normalize(root);
    !root.is_empty() && root != path::ROOT && repo.node(root).is_some()
}

/// Every `cq:responsive` node below the given roots, of any node type.
pub fn find_candidates<'a, R: ContentRepository + ?Sized>(
    repo: &'a R,
    search_roots: &[String],
) -> Candidates<'a, R> {
    Candidates {
        repo,
        roots: search_roots.to_vec().into_iter(),
        current: None,
    }
}

/// Keep the candidates that fall in `category`. `None` (an unknown category)
/// matches nothing.
pub fn filter_by_category<'a, R, I>(
    repo: &'a R,
    candidates: I,
    category: Option<Category>,
) -> impl Iterator<Item = ContentNode> + 'a
where
    R: ContentRepository + ?Sized,
    I: IntoIterator<Item = ContentNode>,
    I::IntoIter: 'a,
{
    candidates.into_iter().filter_map(move |node| {
        let category = category?;
        match ResponsiveItem::new(repo, node) {
            Ok(item) => item.matches(category).then(|| item.into_node()),
            Err(e) => {
                tracing::warn!("skipping candidate: {}", e);
                None
            }
        }
    })
}

/// Search and filter in one pass. Search failures abort and propagate.
pub fn collect_matches<R: ContentRepository + ?Sized>(
    repo: &R,
    search_roots: &[String],
    category: Option<Category>,
) -> Result<Vec<ContentNode>, RepoError> {
    let candidates = find_candidates(repo, search_roots).collect::<Result<Vec<_>, _>>()?;
    Ok(filter_by_category(repo, candidates, category).collect())
}

/// The minimum-count guard: a batch is deleted only when it holds strictly
/// more than `min_batch_size` matches.
pub fn deletion_allowed(match_count: usize, min_batch_size: usize) -> bool {
    match_count > min_batch_size
}

/// Delete each node and commit right after it. A failure is logged and
/// recorded, the node's uncommitted delete is reverted, and the loop moves on
/// to the next node.
pub fn delete_all<W: NodeWriter + ?Sized>(
    writer: &mut W,
    matches: &[ContentNode],
) -> Vec<DeletionOutcome> {
    matches
        .iter()
        .map(|node| {
            let result = writer.delete(node.path()).and_then(|()| writer.commit());
            match &result {
                Ok(()) => tracing::info!("deleted {}", node.path()),
                Err(e) => {
                    tracing::error!("error deleting the node at {}: {}", node.path(), e);
                    writer.revert();
                }
            }
            DeletionOutcome {
                path: node.path().to_string(),
                result,
            }
        })
        .collect()
}
