use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;

use mrk_reconcile::time::parse_zoned;
use mrk_reconcile::SaleCompletion;
use mrk_runtime::CompletionStatus;
use mrk_source::DirectoryOutbox;

use super::{print_json, Context};

/// `--shipped-time` value: an RFC 3339 instant with a zone.
pub fn parse_shipped_time(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    parse_zoned(raw)
        .ok_or_else(|| format!("expected an RFC 3339 timestamp with a zone, got '{raw}'"))
}

pub fn run(ctx: &Context, outbox: &Path, completion: SaleCompletion) -> Result<()> {
    let session = ctx
        .session()
        .with_completer(Arc::new(DirectoryOutbox::new(outbox)));

    let status = session.complete_sale(&completion)?;
    print_json(&status)?;
    if let CompletionStatus::NotSent { reason, .. } = &status {
        bail!("completion not sent: {reason}");
    }
    Ok(())
}
