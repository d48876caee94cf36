use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

use mrk_reconcile::FeeResult;
use mrk_runtime::{order_anchor, OrderStatus};
use mrk_source::DirectorySource;

use super::{print_json, Context};

#[derive(Serialize)]
struct FeeRow {
    order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<FeeResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn run(
    ctx: &Context,
    orders_dir: &Path,
    transactions_dir: &Path,
    days: Option<u32>,
) -> Result<()> {
    let session = ctx
        .session()
        .with_orders(Arc::new(DirectorySource::new("orders", orders_dir)))
        .with_transactions(Arc::new(DirectorySource::new(
            "transactions",
            transactions_dir,
        )));
    let days = days.unwrap_or(ctx.settings.orders.lookback_days);

    let mut rows = Vec::new();
    for order in session.orders_last_days(days, OrderStatus::All) {
        let Some(order_id) = order.get("OrderID").id_string() else {
            warn!("order without OrderID skipped");
            continue;
        };
        let Some(anchor) = order_anchor(&order) else {
            warn!(order_id = %order_id, "order without creation time skipped");
            rows.push(FeeRow {
                order_id,
                result: None,
                error: Some("order has no creation time".to_string()),
            });
            continue;
        };

        let row = match session.check_order_advertising_fees(&order_id, &anchor) {
            Ok(result) => FeeRow {
                order_id,
                result: Some(result),
                error: None,
            },
            Err(e) => {
                warn!(order_id = %order_id, error = %e, "fee check failed");
                FeeRow {
                    order_id,
                    result: None,
                    error: Some(e.to_string()),
                }
            }
        };
        rows.push(row);
    }

    print_json(&rows)
}
