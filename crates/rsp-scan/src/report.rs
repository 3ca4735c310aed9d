//! HTML report for a scan request.
//!
//! Every line is wrapped in a `<div>` and written to the sink the caller
//! passes in. Matches are listed before any deletion, so a detailed view
//! still shows the configuration that is about to be removed.

use crate::batch::{self, DeletionOutcome};
use crate::classify::{NN_RESPONSIVE, ResponsiveItem};
use crate::request::{CleanupRequest, Operation, ViewType};
use rsp_core::error::RepoError;
use rsp_core::node::ContentNode;
use rsp_core::repo::{ContentRepository, NodeWriter};
use std::fmt::{self, Write};

const DOCS_URL: &str = "https://github.com/Adobe-Marketing-Cloud/aem-sites-template-migration";
const PN_WIDTH: &str = "width";

/// Errors that end a scan.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("failed to write the report")]
    Write(#[from] fmt::Error),
}

/// What a scan found and did.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Paths of the matching nodes, in discovery order.
    pub matches: Vec<String>,
    /// Per-node deletion results, or `None` when nothing was deleted.
    pub deletions: Option<Vec<DeletionOutcome>>,
}

impl ScanSummary {
    pub fn failed_deletions(&self) -> usize {
        self.deletions
            .as_ref()
            .map_or(0, |d| d.iter().filter(|o| !o.is_success()).count())
    }
}

/// Run `request` against `repo` and write the report to `out`.
///
/// Search failures abort the scan. Deletion failures do not: they are logged,
/// listed in the report and returned in the summary.
pub fn execute<R, W>(
    repo: &mut R,
    request: &CleanupRequest,
    out: &mut W,
) -> Result<ScanSummary, ReportError>
where
    R: ContentRepository + NodeWriter,
    W: Write,
{
    let matches = batch::collect_matches(&*repo, &request.search_paths, request.category())?;
    let mut summary = ScanSummary {
        matches: matches.iter().map(|n| n.path().to_string()).collect(),
        deletions: None,
    };

    write_intro(out, request)?;
    match request.operation() {
        Operation::View => write_items(out, &*repo, &matches, &request.view())?,
        Operation::Remove => {
            write_items(out, &*repo, &matches, &request.view())?;
            if batch::deletion_allowed(matches.len(), request.min_batch_size) {
                write_line(out, "<br/>")?;
                write_line(out, "Deleting the responsive nodes...")?;
                let outcomes = batch::delete_all(repo, &matches);
                for failed in outcomes.iter().filter(|o| !o.is_success()) {
                    write_line(
                        out,
                        &format!("Error deleting the node at {}", escape(&failed.path)),
                    )?;
                }
                write_line(out, "The responsive nodes have been deleted.")?;
                summary.deletions = Some(outcomes);
            }
        }
        Operation::Unknown(op) => {
            write_line(
                out,
                &format!("The operation '{}' does not exist.", escape(&op)),
            )?;
        }
    }
    Ok(summary)
}

fn escape(text: &str) -> std::borrow::Cow<'_, str> {
    html_escape::encode_text(text)
}

fn write_line<W: Write>(out: &mut W, line: &str) -> fmt::Result {
    writeln!(out, "<div>{}</div>", line)
}

/// The criteria used to search.
fn write_intro<W: Write>(out: &mut W, request: &CleanupRequest) -> fmt::Result {
    write_line(out, "<h2>Responsive Nodes Clean Up Tool</h2>")?;
    write_line(
        out,
        &format!("Please refer to the <a href='{}'>documentation</a>.", DOCS_URL),
    )?;
    write_line(out, "<br/>")?;
    write_line(out, "Responsive nodes meeting the following criteria:")?;
    write_line(out, &format!("- type: {}", escape(&request.category)))?;
    write_line(out, &format!("- viewType: {}", escape(&request.view)))?;
    write_line(
        out,
        &format!("- searchPaths: {}", escape(&request.search_paths.join(", "))),
    )?;
    write_line(out, &format!("- operation: {}", escape(&request.operation)))?;
    write_line(out, "<br/>")
}

fn write_items<W, R>(out: &mut W, repo: &R, matches: &[ContentNode], view: &ViewType) -> fmt::Result
where
    W: Write,
    R: ContentRepository + ?Sized,
{
    if *view == ViewType::NoView {
        return Ok(());
    }
    if matches.is_empty() {
        write_line(out, "-> this category is empty.")?;
    }
    for node in matches {
        match view {
            ViewType::Simple => write_line(out, &escape(node.path()))?,
            ViewType::Detailed => write_detailed(out, repo, node)?,
            ViewType::NoView | ViewType::Unknown(_) => {}
        }
    }
    Ok(())
}

fn write_detailed<W, R>(out: &mut W, repo: &R, node: &ContentNode) -> fmt::Result
where
    W: Write,
    R: ContentRepository + ?Sized,
{
    write_line(out, "--------------------------")?;
    write_line(out, "responsive node:")?;
    write_line(out, &escape(node.path()))?;
    write_config(out, repo, node)?;

    write_line(out, "<br/>")?;
    write_line(out, "template structure node:")?;
    let Ok(item) = ResponsiveItem::new(repo, node.clone()) else {
        return Ok(());
    };
    if let Some(peer) = item.template_structure_peer() {
        write_line(out, &escape(peer.path()))?;
        match repo.child(&peer, NN_RESPONSIVE) {
            Some(responsive) => write_config(out, repo, &responsive)?,
            None => {
                write_line(out, "<br/>")?;
                write_line(out, "no cq:responsive node")?;
            }
        }
    }
    Ok(())
}

/// The breakpoint children of a responsive node and their widths.
fn write_config<W, R>(out: &mut W, repo: &R, node: &ContentNode) -> fmt::Result
where
    W: Write,
    R: ContentRepository + ?Sized,
{
    for child in repo.children(node) {
        write_line(
            out,
            &format!(
                "<div style='text-indent: 20px'>+ {}</div>",
                escape(child.name())
            ),
        )?;
        write_line(
            out,
            &format!(
                "<div style='text-indent: 40px'>- width: {}</div>",
                escape(&child.string_property(PN_WIDTH, ""))
            ),
        )?;
    }
    Ok(())
}
