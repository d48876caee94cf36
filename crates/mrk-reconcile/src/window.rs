//! Temporal window matching of transactions to an order.
//!
//! The window is `[anchor - days, anchor + days]`, inclusive at both ends,
//! with the anchor truncated to whole seconds. It is sent to the source as a
//! `transactionDate:[from..to]` filter and re-checked client-side against
//! each transaction's own `transaction_date`.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::debug;

use mrk_record::CanonicalValue;

use crate::identity::belongs_to_order;
use crate::time::{format_filter_time, parse_utc_assumed, parse_zoned};
use crate::ReconcileError;

/// Filter field the transactions source understands.
pub const TRANSACTION_DATE_FIELD: &str = "transactionDate";

/// Half-width used when no window is configured.
pub const DEFAULT_WINDOW_DAYS: u32 = 2;

/// Widest half-width accepted by [`TimeWindow::around`].
pub const MAX_WINDOW_DAYS: u32 = 3650;

/// Anchor instant as supplied by a caller.
///
/// Only zoned forms resolve. Naive and date-only forms exist so the rejection
/// is an explicit `InvalidArgument` rather than a silent local-time guess.
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorTime {
    Instant(DateTime<Utc>),
    Offset(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
    Date(NaiveDate),
    Text(String),
}

impl AnchorTime {
    pub fn resolve(&self) -> Result<DateTime<Utc>, ReconcileError> {
        match self {
            AnchorTime::Instant(t) => Ok(*t),
            AnchorTime::Offset(t) => Ok(t.with_timezone(&Utc)),
            AnchorTime::Naive(t) => Err(ReconcileError::InvalidArgument(format!(
                "anchor time {t} has no zone"
            ))),
            AnchorTime::Date(d) => Err(ReconcileError::InvalidArgument(format!(
                "anchor {d} is a date, not an instant"
            ))),
            AnchorTime::Text(raw) => parse_zoned(raw).ok_or_else(|| {
                ReconcileError::InvalidArgument(format!(
                    "anchor '{raw}' is not an RFC 3339 timestamp with a zone"
                ))
            }),
        }
    }
}

impl From<DateTime<Utc>> for AnchorTime {
    fn from(t: DateTime<Utc>) -> Self {
        AnchorTime::Instant(t)
    }
}

impl From<DateTime<FixedOffset>> for AnchorTime {
    fn from(t: DateTime<FixedOffset>) -> Self {
        AnchorTime::Offset(t)
    }
}

impl From<NaiveDateTime> for AnchorTime {
    fn from(t: NaiveDateTime) -> Self {
        AnchorTime::Naive(t)
    }
}

impl From<NaiveDate> for AnchorTime {
    fn from(d: NaiveDate) -> Self {
        AnchorTime::Date(d)
    }
}

impl From<&str> for AnchorTime {
    fn from(s: &str) -> Self {
        AnchorTime::Text(s.to_string())
    }
}

impl From<String> for AnchorTime {
    fn from(s: String) -> Self {
        AnchorTime::Text(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeWindow {
    /// `[anchor - days, anchor + days]` with `anchor` truncated to seconds.
    ///
    /// Fails when `days` exceeds [`MAX_WINDOW_DAYS`] or either bound falls
    /// outside the representable range.
    pub fn around(anchor: DateTime<Utc>, days: u32) -> Result<Self, ReconcileError> {
        if days > MAX_WINDOW_DAYS {
            return Err(ReconcileError::InvalidArgument(format!(
                "window of {days} days exceeds {MAX_WINDOW_DAYS}"
            )));
        }
        let anchor = anchor - Duration::nanoseconds(i64::from(anchor.timestamp_subsec_nanos()));
        let half = Duration::days(i64::from(days));
        match (anchor.checked_sub_signed(half), anchor.checked_add_signed(half)) {
            (Some(from), Some(to)) => Ok(Self { from, to }),
            _ => Err(ReconcileError::InvalidArgument(format!(
                "window of {days} days around {anchor} is out of range"
            ))),
        }
    }

    /// Resolve `anchor` and build the window around it.
    pub fn for_anchor(anchor: &AnchorTime, days: u32) -> Result<Self, ReconcileError> {
        Self::around(anchor.resolve()?, days)
    }

    pub fn contains(&self, t: &DateTime<Utc>) -> bool {
        self.from <= *t && *t <= self.to
    }

    /// `transactionDate:[from..to]`
    pub fn filter_expr(&self) -> String {
        format!(
            "{TRANSACTION_DATE_FIELD}:[{}..{}]",
            format_filter_time(&self.from),
            format_filter_time(&self.to)
        )
    }
}

/// Strip a `{record: {...}}` envelope if present.
pub fn unwrap_transaction(item: &CanonicalValue) -> &CanonicalValue {
    let inner = item.get("record");
    if inner.as_record().is_some() {
        inner
    } else {
        item
    }
}

/// Transactions among `candidates` that belong to `order_id` and whose
/// `transaction_date` (when parseable) lies inside `window`.
///
/// Input order is preserved. Non-record candidates are skipped.
pub fn match_order_transactions(
    order_id: &str,
    window: &TimeWindow,
    candidates: &[CanonicalValue],
) -> Vec<CanonicalValue> {
    let mut matched = Vec::new();
    for item in candidates {
        let tx = unwrap_transaction(item);
        if tx.as_record().is_none() {
            continue;
        }
        if let Some(at) = tx.get("transaction_date").text().as_deref().and_then(parse_utc_assumed) {
            if !window.contains(&at) {
                debug!(order_id, transaction_date = %at, "transaction outside window; skipped");
                continue;
            }
        }
        if belongs_to_order(tx, order_id) {
            matched.push(tx.clone());
        }
    }
    matched
}
