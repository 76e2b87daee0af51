//! Campaign timeline planning.
//!
//! A campaign is a list of media assets picked from a fixed
//! category / platform / asset catalog. Each asset carries an anchor date,
//! and the schedule engine derives a fixed four-stage task schedule from it,
//! flagging assets whose date leaves too little lead time.
//!
//! # Modules
//!
//! - **`catalog`**: the read-only category -> platform -> asset hierarchy
//! - **`template`**: the ordered task template shared by every asset
//! - **`schedule`**: pure schedule derivation and conflict detection
//! - **`campaign`**: the reducer-style campaign store and campaign files
//! - **`chart`**: translation into Gantt node/link data and renderer lifecycle
//! - **`export`**: tabular flattening and spreadsheet/CSV writers

pub mod campaign;
pub mod catalog;
pub mod chart;
pub mod export;
pub mod schedule;
pub mod template;

pub use campaign::{
    AssetId, AssetUpdate, CampaignState, CampaignStore, Command, SelectedAsset,
};
pub use catalog::{Catalog, CatalogEntry};
pub use schedule::{AnchorMode, Conflict, ScheduleOutcome, ScheduledTask, compute_schedule};
pub use template::{TaskTemplate, TaskTemplateItem};
