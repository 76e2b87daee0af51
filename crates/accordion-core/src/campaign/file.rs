//! Campaign definition files.
//!
//! A campaign file lists the assets to plan and their anchor dates:
//!
//! ```toml
//! [campaign]
//! name = "Spring launch"
//! anchor_mode = "backward_offset"   # optional
//!
//! [[assets]]
//! category = "Digital"
//! platform = "MailOnline"
//! asset = "Native Articles"
//! date = 2026-11-02                 # optional, quoted or bare
//! ```
//!
//! Parsing validates every asset against the catalog. Loading replays the
//! file into a [`CampaignStore`] as add/update commands.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, CatalogEntry};
use crate::schedule::AnchorMode;

use super::{AssetId, AssetUpdate, CampaignStore};

/// Top-level structure of a campaign file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampaignToml {
    #[serde(default)]
    pub campaign: CampaignMeta,
    #[serde(default)]
    pub assets: Vec<AssetToml>,
}

/// Campaign-level metadata in `[campaign]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CampaignMeta {
    /// Human-readable campaign name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Anchor semantics for this campaign; overrides configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_mode: Option<AnchorMode>,
}

/// A single `[[assets]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetToml {
    pub category: String,
    pub platform: String,
    pub asset: String,
    /// Anchor date, either a TOML date or a `YYYY-MM-DD` string.
    #[serde(default, with = "anchor_date", skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// Errors that can occur while reading a campaign file.
#[derive(Debug, Error)]
pub enum CampaignFileError {
    #[error("failed to read campaign file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("campaign must contain at least one asset")]
    NoAssets,

    #[error("asset #{index}: unknown category {value:?}")]
    UnknownCategory { index: usize, value: String },

    #[error("asset #{index}: unknown platform {value:?} in category {category:?}")]
    UnknownPlatform {
        index: usize,
        category: String,
        value: String,
    },

    #[error("asset #{index}: unknown asset {value:?} on platform {platform:?}")]
    UnknownAsset {
        index: usize,
        platform: String,
        value: String,
    },

    #[error("asset #{index}: date {date} is outside years 1-9999")]
    DateOutOfRange { index: usize, date: NaiveDate },
}

/// Years an anchor date may fall in.
pub const ANCHOR_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Accepts both `date = 2026-11-02` and `date = "2026-11-02"`.
mod anchor_date {
    use chrono::NaiveDate;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use toml::Value;

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => s.serialize_str(&date.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let text = match Value::deserialize(d)? {
            Value::String(text) => text,
            Value::Datetime(dt) => match (dt.date, dt.time, dt.offset) {
                (Some(date), None, None) => date.to_string(),
                _ => {
                    return Err(D::Error::custom(format!(
                        "expected a date without a time, got {dt}"
                    )));
                }
            },
            other => {
                return Err(D::Error::custom(format!(
                    "expected a date, got {}",
                    other.type_str()
                )));
            }
        };
        text.parse::<NaiveDate>().map(Some).map_err(D::Error::custom)
    }
}

/// Parse and validate a campaign file's contents against `catalog`.
pub fn parse_campaign_toml(
    content: &str,
    catalog: &Catalog,
) -> Result<CampaignToml, CampaignFileError> {
    let campaign: CampaignToml = toml::from_str(content)?;
    validate(&campaign, catalog)?;
    Ok(campaign)
}

impl CampaignToml {
    /// Read and validate a campaign file from disk.
    pub fn load(path: &Path, catalog: &Catalog) -> Result<Self, CampaignFileError> {
        let content = std::fs::read_to_string(path).map_err(|source| CampaignFileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        parse_campaign_toml(&content, catalog)
    }
}

fn validate(campaign: &CampaignToml, catalog: &Catalog) -> Result<(), CampaignFileError> {
    if campaign.assets.is_empty() {
        return Err(CampaignFileError::NoAssets);
    }

    for (i, asset) in campaign.assets.iter().enumerate() {
        let index = i + 1;
        if !catalog.has_category(&asset.category) {
            return Err(CampaignFileError::UnknownCategory {
                index,
                value: asset.category.clone(),
            });
        }
        if !catalog.has_platform(&asset.category, &asset.platform) {
            return Err(CampaignFileError::UnknownPlatform {
                index,
                category: asset.category.clone(),
                value: asset.platform.clone(),
            });
        }
        if catalog
            .entry(&asset.category, &asset.platform, &asset.asset)
            .is_none()
        {
            return Err(CampaignFileError::UnknownAsset {
                index,
                platform: asset.platform.clone(),
                value: asset.asset.clone(),
            });
        }
        if let Some(date) = asset.date {
            if !ANCHOR_YEARS.contains(&date.year()) {
                return Err(CampaignFileError::DateOutOfRange { index, date });
            }
        }
    }

    Ok(())
}

/// Replay a validated campaign file into a store.
///
/// Each asset becomes an add command followed, when a date is given, by an
/// update command. Returns the new ids in file order.
pub fn load_campaign(campaign: &CampaignToml, store: &mut CampaignStore) -> Vec<AssetId> {
    if let Some(mode) = campaign.campaign.anchor_mode {
        store.set_mode(mode);
    }

    campaign
        .assets
        .iter()
        .map(|asset| {
            let id = store.add_asset(CatalogEntry::new(
                &asset.category,
                &asset.platform,
                &asset.asset,
            ));
            if let Some(date) = asset.date {
                store.update_asset(id, AssetUpdate::anchor_date(date));
            }
            id
        })
        .collect()
}
