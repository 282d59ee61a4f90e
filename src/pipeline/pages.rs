//! Page selection: filter requested page numbers against the document.
//!
//! Out-of-range pages are dropped with a logged notice rather than raised
//! as errors; a selection like `1,2,50` on a 3-page document converts
//! pages 1 and 2 instead of failing the whole run. An empty request is the
//! sentinel for "whole document" and passes through untouched.

use tracing::{info, warn};

/// Outcome of filtering a page selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFilter {
    /// Requested pages within `[1, total]`, sorted ascending, deduplicated.
    pub kept: Vec<u32>,
    /// Requested pages outside `[1, total]`, in request order.
    pub dropped: Vec<u32>,
}

impl PageFilter {
    /// True when nothing was requested, i.e. the whole document is
    /// selected.
    pub fn is_whole_document(&self) -> bool {
        self.kept.is_empty() && self.dropped.is_empty()
    }
}

/// Filter `requested` (1-indexed) against a document with `total_pages`.
///
/// Emits a `warn!` notice per dropped page and an `info!` line when the
/// request is empty. Never fails: an entirely out-of-range request simply
/// yields an empty `kept` list alongside a non-empty `dropped` list, which
/// the orchestrator treats the same as "nothing to extract".
pub fn filter_pages(requested: &[u32], total_pages: u32) -> PageFilter {
    if requested.is_empty() {
        info!("No pages selected; the entire document will be converted");
        return PageFilter {
            kept: Vec::new(),
            dropped: Vec::new(),
        };
    }

    let mut kept = Vec::with_capacity(requested.len());
    let mut dropped = Vec::new();

    for &page in requested {
        if page >= 1 && page <= total_pages {
            kept.push(page);
        } else {
            warn!(
                "Page {} is not in the document ({} pages) and will be skipped",
                page, total_pages
            );
            dropped.push(page);
        }
    }

    kept.sort_unstable();
    kept.dedup();

    PageFilter { kept, dropped }
}
