use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use mrk_reconcile::{assess, FulfillmentSignal};
use mrk_record::CanonicalValue;
use mrk_source::DirectorySource;

use super::{print_json, Context};

#[derive(Serialize)]
struct UnshippedOrder {
    order_id: Option<String>,
    #[serde(flatten)]
    signal: FulfillmentSignal,
    order: CanonicalValue,
}

pub fn run(ctx: &Context, orders_dir: &Path, days: Option<u32>) -> Result<()> {
    let session = ctx
        .session()
        .with_orders(Arc::new(DirectorySource::new("orders", orders_dir)));
    let days = days.unwrap_or(ctx.settings.orders.lookback_days);

    let rows: Vec<UnshippedOrder> = session
        .orders_requiring_shipment(days)
        .into_iter()
        .map(|order| UnshippedOrder {
            order_id: order.get("OrderID").id_string(),
            signal: assess(&order),
            order,
        })
        .collect();

    print_json(&rows)
}
