//! Page-at-a-time collection loop.
//!
//! [`fetch_all`] walks a [`PagedSource`] from page 1 until the data runs out
//! or the source fails, normalizing every item and merging pages in order.
//! It never returns an error: rejected and aborted runs hand back whatever was
//! collected before the failure, with the cause carried in the outcome.

use mrk_record::{normalize, CanonicalValue};
use tracing::{debug, warn};

use crate::{FetchError, PageQuery, PageRequest, PagedSource};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A page contained zero items.
    EmptyPage,
    /// The source signalled that no more pages exist.
    NoMorePages,
    /// The source answered with a non-success acknowledgement.
    Rejected,
    /// The source raised a transport-level error.
    Aborted,
}

/// Result of one collection run.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Normalized items in page order.
    pub items: Vec<CanonicalValue>,
    /// Number of `fetch_page` calls made.
    pub pages_fetched: u32,
    pub termination: Termination,
    /// Terminating error for `Rejected` / `Aborted`; `None` otherwise.
    pub error: Option<FetchError>,
}

impl FetchOutcome {
    /// `true` when the data was exhausted without any error.
    pub fn is_clean(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_items(self) -> Vec<CanonicalValue> {
        self.items
    }
}

/// Collect every page from `source`.
///
/// Stops on (a) an empty page, (b) `has_more == false`, (c) a non-success
/// ack, or (d) a transport error. One attempt per page, no retries.
pub fn fetch_all(source: &dyn PagedSource, page_size: u32, query: &PageQuery) -> FetchOutcome {
    let mut items: Vec<CanonicalValue> = Vec::new();
    let mut page_number: u32 = 1;

    let finish = |items: Vec<CanonicalValue>, pages: u32, termination, error| {
        let outcome = FetchOutcome {
            items,
            pages_fetched: pages,
            termination,
            error,
        };
        debug!(
            source = source.name(),
            pages = outcome.pages_fetched,
            items = outcome.items.len(),
            termination = ?outcome.termination,
            "pagination finished"
        );
        outcome
    };

    loop {
        let req = PageRequest {
            page_number,
            page_size,
            query,
        };

        let page = match source.fetch_page(&req) {
            Ok(page) => page,
            Err(err) => {
                warn!(
                    source = source.name(),
                    page = page_number,
                    collected = items.len(),
                    error = %err,
                    "page fetch failed; returning partial result"
                );
                return finish(items, page_number, Termination::Aborted, Some(err));
            }
        };

        if !page.ack.is_success() {
            let err = FetchError::Rejected {
                page: page_number,
                messages: page.errors,
            };
            warn!(
                source = source.name(),
                page = page_number,
                collected = items.len(),
                error = %err,
                "source rejected page; returning partial result"
            );
            return finish(items, page_number, Termination::Rejected, Some(err));
        }

        if !page.errors.is_empty() {
            warn!(
                source = source.name(),
                page = page_number,
                ack = page.ack.as_str(),
                warnings = ?page.errors,
                "page returned warnings"
            );
        }

        if page.items.is_empty() {
            return finish(items, page_number, Termination::EmptyPage, None);
        }

        let count = page.items.len();
        items.extend(page.items.into_iter().map(normalize));
        debug!(source = source.name(), page = page_number, count, "page merged");

        if !page.has_more {
            return finish(items, page_number, Termination::NoMorePages, None);
        }
        page_number += 1;
    }
}
