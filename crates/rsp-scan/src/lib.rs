//! Classification and cleanup of `cq:responsive` nodes.
//!
//! Provides the node classifier ([`classify::ResponsiveItem`]), candidate
//! search and best-effort batch deletion ([`batch`]), request parameters and
//! the HTML report that ties them together.

pub mod batch;
pub mod classify;
pub mod report;
pub mod request;
