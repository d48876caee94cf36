//! Command handler modules for mrk.
//!
//! Shared setup (settings, clock, output) lives here; each subcommand has its
//! own module.

pub mod complete;
pub mod fees;
pub mod promotions;
pub mod unshipped;

use anyhow::{Context as _, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use mrk_config::{report_unknown_keys, Settings, UnknownKeyPolicy};
use mrk_runtime::MarketplaceSession;
use mrk_source::{Clock, FixedClock, SystemClock};

/// Settings and clock shared by every reconciliation command.
pub struct Context {
    pub settings: Settings,
    pub clock: Arc<dyn Clock>,
}

impl Context {
    pub fn load(config_paths: &[String], as_of: Option<&str>) -> Result<Self> {
        let settings = if config_paths.is_empty() {
            Settings::default()
        } else {
            let loaded = mrk_config::load_layered_yaml(config_paths)?;
            let report = report_unknown_keys(&loaded.config_json, UnknownKeyPolicy::Warn)?;
            for ptr in &report.unknown_leaf_pointers {
                warn!(key = %ptr, "unknown config key ignored");
            }
            info!(config_hash = %loaded.config_hash, "settings loaded");
            loaded.settings()?
        };

        let clock: Arc<dyn Clock> = match as_of {
            Some(raw) => Arc::new(
                FixedClock::parse(raw).with_context(|| format!("invalid --as-of '{raw}'"))?,
            ),
            None => Arc::new(SystemClock),
        };

        Ok(Self { settings, clock })
    }

    pub fn session(&self) -> MarketplaceSession {
        MarketplaceSession::new(self.settings.clone()).with_clock(Arc::clone(&self.clock))
    }
}

/// `CAMPAIGN_ID=DIR` for `--ads`.
pub fn parse_campaign_dir(raw: &str) -> std::result::Result<(String, PathBuf), String> {
    let (campaign, dir) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CAMPAIGN_ID=DIR, got '{raw}'"))?;
    let campaign = campaign.trim();
    if campaign.is_empty() || dir.trim().is_empty() {
        return Err(format!("expected CAMPAIGN_ID=DIR, got '{raw}'"));
    }
    Ok((campaign.to_string(), PathBuf::from(dir.trim())))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("serialize output failed")?;
    println!("{out}");
    Ok(())
}
