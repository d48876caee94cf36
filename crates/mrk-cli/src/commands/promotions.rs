use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use mrk_runtime::CAMPAIGN_ID_PARAM;
use mrk_source::{DirectorySource, FetchError, Page, PageRequest, PagedSource};

use super::{print_json, Context};

/// Ad source over one dump directory per campaign, picked by the request's
/// `campaign_id` parameter. Unknown campaigns have no ads.
struct CampaignDirectories {
    by_campaign: BTreeMap<String, DirectorySource>,
}

impl CampaignDirectories {
    fn new(dirs: Vec<(String, PathBuf)>) -> Self {
        let by_campaign = dirs
            .into_iter()
            .map(|(campaign, dir)| {
                let source = DirectorySource::new(format!("ads:{campaign}"), dir);
                (campaign, source)
            })
            .collect();
        Self { by_campaign }
    }
}

impl PagedSource for CampaignDirectories {
    fn name(&self) -> &str {
        "ads"
    }

    fn fetch_page(&self, req: &PageRequest<'_>) -> Result<Page, FetchError> {
        let campaign = req.query.param(CAMPAIGN_ID_PARAM).unwrap_or_default();
        match self.by_campaign.get(campaign) {
            Some(source) => source.fetch_page(req),
            None => {
                debug!(campaign, "no ad directory for campaign");
                Ok(Page::end())
            }
        }
    }
}

pub fn run(ctx: &Context, listings_dir: &Path, ads: Vec<(String, PathBuf)>) -> Result<()> {
    let campaign_ids: Vec<String> = ads.iter().map(|(c, _)| c.clone()).collect();
    let session = ctx
        .session()
        .with_listings(Arc::new(DirectorySource::new("listings", listings_dir)))
        .with_ads(Arc::new(CampaignDirectories::new(ads)));

    let report = session.promotion_report(&campaign_ids);
    print_json(&report)
}
