use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mrk_reconcile::SaleCompletion;

mod commands;

#[derive(Parser)]
#[command(name = "mrk")]
#[command(about = "Marketplace reconciliation over offline page dumps", long_about = None)]
struct Cli {
    /// Layered settings files in merge order (repeatable)
    #[arg(long = "config", global = true)]
    config_paths: Vec<String>,

    /// Pin "now" to an RFC 3339 instant instead of the wall clock
    #[arg(long, global = true)]
    as_of: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> site -> run overrides)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Paid orders that have not shipped yet
    Unshipped {
        /// Directory of order pages (page-0001.json, ...)
        #[arg(long)]
        orders: PathBuf,

        /// Lookback in days (default: orders.lookback_days)
        #[arg(
            long,
            value_parser = clap::value_parser!(u32).range(0..=i64::from(mrk_config::MAX_DAYS))
        )]
        days: Option<u32>,
    },

    /// Advertising fee charged for each order
    Fees {
        /// Directory of order pages
        #[arg(long)]
        orders: PathBuf,

        /// Directory of transaction pages
        #[arg(long)]
        transactions: PathBuf,

        /// Lookback in days (default: orders.lookback_days)
        #[arg(
            long,
            value_parser = clap::value_parser!(u32).range(0..=i64::from(mrk_config::MAX_DAYS))
        )]
        days: Option<u32>,
    },

    /// Split active listings into promoted and unpromoted
    Promotions {
        /// Directory of listing pages
        #[arg(long)]
        listings: PathBuf,

        /// Campaign ad pages as CAMPAIGN_ID=DIR (repeatable)
        #[arg(long = "ads", value_parser = commands::parse_campaign_dir)]
        ads: Vec<(String, PathBuf)>,
    },

    /// Mark a sale paid/shipped and attach tracking; the request is written
    /// to an outbox directory
    Complete {
        /// Outbox directory (completion-0001.json, ...)
        #[arg(long)]
        outbox: PathBuf,

        #[arg(long)]
        order_id: Option<String>,

        #[arg(long)]
        order_line_item_id: Option<String>,

        #[arg(long)]
        item_id: Option<String>,

        #[arg(long)]
        transaction_id: Option<String>,

        #[arg(long)]
        tracking_number: Option<String>,

        /// Carrier name, e.g. UPS or USPS
        #[arg(long)]
        carrier: Option<String>,

        /// RFC 3339 instant with a zone
        #[arg(long, value_parser = commands::complete::parse_shipped_time)]
        shipped_time: Option<DateTime<Utc>>,

        #[arg(long)]
        paid: Option<bool>,

        #[arg(long)]
        shipped: Option<bool>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::ConfigHash { paths } => {
            let loaded = mrk_config::load_layered_yaml(&paths)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Unshipped { orders, days } => {
            let ctx = commands::Context::load(&cli.config_paths, cli.as_of.as_deref())?;
            commands::unshipped::run(&ctx, &orders, days)?;
        }

        Commands::Fees {
            orders,
            transactions,
            days,
        } => {
            let ctx = commands::Context::load(&cli.config_paths, cli.as_of.as_deref())?;
            commands::fees::run(&ctx, &orders, &transactions, days)?;
        }

        Commands::Promotions { listings, ads } => {
            let ctx = commands::Context::load(&cli.config_paths, cli.as_of.as_deref())?;
            commands::promotions::run(&ctx, &listings, ads)?;
        }

        Commands::Complete {
            outbox,
            order_id,
            order_line_item_id,
            item_id,
            transaction_id,
            tracking_number,
            carrier,
            shipped_time,
            paid,
            shipped,
        } => {
            let ctx = commands::Context::load(&cli.config_paths, cli.as_of.as_deref())?;
            let completion = SaleCompletion {
                order_id,
                order_line_item_id,
                item_id,
                transaction_id,
                tracking_number,
                shipping_carrier: carrier,
                shipped_time,
                paid,
                shipped,
            };
            commands::complete::run(&ctx, &outbox, completion)?;
        }
    }

    Ok(())
}
