//! Paged-source boundary.
//!
//! This module defines **only** the page shape, the request, the error type
//! and the source trait. Transport, authentication and request signing live
//! in whatever implements [`PagedSource`]; the core never sees them.

use std::collections::BTreeMap;
use std::fmt;

use mrk_record::SourceNode;

// ---------------------------------------------------------------------------
// Acknowledgement
// ---------------------------------------------------------------------------

/// Per-page acknowledgement reported by the remote platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    Success,
    /// Success with non-fatal warnings; items are still valid.
    Warning,
    Failure,
}

impl Ack {
    /// Case-insensitive parse. Anything unrecognised is a failure.
    pub fn parse(raw: &str) -> Ack {
        match raw.trim().to_ascii_lowercase().as_str() {
            "success" => Ack::Success,
            "warning" => Ack::Warning,
            _ => Ack::Failure,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Ack::Success | Ack::Warning)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Ack::Success => "Success",
            Ack::Warning => "Warning",
            Ack::Failure => "Failure",
        }
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// One page as returned by a [`PagedSource`].
///
/// `has_more` is already a native bool here: string sentinels such as
/// `"false"` are resolved at the wire boundary (see `wire.rs`).
#[derive(Debug, Clone)]
pub struct Page {
    pub ack: Ack,
    pub items: Vec<SourceNode>,
    pub has_more: bool,
    pub errors: Vec<String>,
}

impl Page {
    pub fn success(items: Vec<SourceNode>, has_more: bool) -> Self {
        Self {
            ack: Ack::Success,
            items,
            has_more,
            errors: Vec::new(),
        }
    }

    pub fn failure(errors: Vec<String>) -> Self {
        Self {
            ack: Ack::Failure,
            items: Vec::new(),
            has_more: false,
            errors,
        }
    }

    /// End-of-data marker: successful, empty, no more pages.
    pub fn end() -> Self {
        Self::success(Vec::new(), false)
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Server-side filter plus endpoint-specific parameters, constant across the
/// pages of one collection run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    /// Filter predicate, e.g. `transactionDate:[2024-05-01T00:00:00Z..2024-05-05T00:00:00Z]`.
    pub filter: Option<String>,
    /// Extra parameters, e.g. `OrderStatus=Completed` or `campaign_id=123`.
    pub params: BTreeMap<String, String>,
}

impl PageQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// A single page fetch.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    /// 1-based page counter.
    pub page_number: u32,
    pub page_size: u32,
    pub query: &'a PageQuery,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Failure while talking to a source or completer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network or transport failure raised by the source.
    Transport(String),
    /// The platform answered with a non-success acknowledgement.
    Rejected { page: u32, messages: Vec<String> },
    /// A page payload could not be decoded.
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "transport error: {msg}"),
            FetchError::Rejected { page, messages } if messages.is_empty() => {
                write!(f, "page {page} rejected by source")
            }
            FetchError::Rejected { page, messages } => {
                write!(f, "page {page} rejected by source: {}", messages.join("; "))
            }
            FetchError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Remote paginated collection (orders, listings, transactions, campaign ads).
///
/// Implementations perform exactly one attempt per call; retry and backoff,
/// if wanted, belong to a wrapper around the implementation. They must be
/// object-safe and `Send + Sync` so a session can hold `Box<dyn PagedSource>`.
pub trait PagedSource: Send + Sync {
    /// Identifies the source in logs (e.g. `"orders"`).
    fn name(&self) -> &str;

    fn fetch_page(&self, req: &PageRequest<'_>) -> Result<Page, FetchError>;
}
