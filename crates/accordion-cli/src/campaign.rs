//! Shared loading for the file-driven commands.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use accordion_core::campaign::{CampaignToml, FixedClock, load_campaign};
use accordion_core::{AnchorMode, CampaignStore};

use crate::config::AccordionConfig;

/// A campaign file replayed into a store, ready to generate.
#[derive(Debug)]
pub struct LoadedCampaign {
    pub name: Option<String>,
    pub store: CampaignStore,
}

/// Read `file`, validate it against the configured catalog and replay it
/// into a new store.
///
/// Mode precedence: `cli_mode` > campaign file > resolved config. `today`
/// pins the clock; without it the system date is used.
pub fn load_store(
    file: &Path,
    config: &AccordionConfig,
    cli_mode: Option<AnchorMode>,
    today: Option<NaiveDate>,
) -> Result<LoadedCampaign> {
    let campaign = CampaignToml::load(file, &config.catalog)
        .with_context(|| format!("invalid campaign file {}", file.display()))?;

    let mut store = new_store(config, today);
    load_campaign(&campaign, &mut store);
    if let Some(mode) = cli_mode {
        store.set_mode(mode);
    }

    tracing::debug!(
        file = %file.display(),
        assets = store.state().selected_assets.len(),
        mode = %store.mode(),
        "loaded campaign"
    );

    Ok(LoadedCampaign {
        name: campaign.campaign.name,
        store,
    })
}

/// An empty store using the configured template and mode.
pub fn new_store(config: &AccordionConfig, today: Option<NaiveDate>) -> CampaignStore {
    let store = CampaignStore::new(config.template.clone(), config.anchor_mode);
    match today {
        Some(date) => store.with_clock(FixedClock(date)),
        None => store,
    }
}
