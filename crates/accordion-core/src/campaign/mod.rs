//! The campaign store: selected assets plus derived schedules and conflicts.
//!
//! State changes go through a closed set of [`Command`]s. [`reduce`] maps
//! `(state, command)` to a new state without touching the input;
//! [`CampaignStore`] owns the current state together with the template,
//! anchor mode and clock it schedules against.
//!
//! ```text
//! AddAsset         append asset (fresh id, no date, no tasks)
//! RemoveAsset      drop asset by id            (no-op if absent)
//! UpdateAsset      merge partial fields by id  (no-op if absent)
//! GenerateSchedule recompute every schedule, rebuild conflicts, show timeline
//! ```

pub mod clock;
pub mod file;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::CatalogEntry;
use crate::schedule::{AnchorMode, Conflict, ScheduledTask, compute_schedule};
use crate::template::TaskTemplate;

pub use clock::{Clock, FixedClock, SystemClock};
pub use file::{
    AssetToml, CampaignFileError, CampaignMeta, CampaignToml, load_campaign, parse_campaign_toml,
};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Unique identifier of a selected asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(Uuid);

impl AssetId {
    /// A fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AssetId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// An asset the user has added to the campaign.
///
/// `scheduled_tasks` is either empty or has exactly one entry per template
/// row, in template order. It is replaced wholesale on every generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedAsset {
    pub id: AssetId,
    pub category: String,
    pub platform: String,
    pub asset_name: String,
    pub anchor_date: Option<NaiveDate>,
    pub scheduled_tasks: Vec<ScheduledTask>,
}

impl SelectedAsset {
    fn from_entry(id: AssetId, entry: CatalogEntry) -> Self {
        Self {
            id,
            category: entry.category,
            platform: entry.platform,
            asset_name: entry.asset_name,
            anchor_date: None,
            scheduled_tasks: Vec::new(),
        }
    }

    /// Display label, e.g. `"Full Page (Daily Mail)"`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.asset_name, self.platform)
    }

    fn merge(&mut self, update: AssetUpdate) {
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(platform) = update.platform {
            self.platform = platform;
        }
        if let Some(asset_name) = update.asset_name {
            self.asset_name = asset_name;
        }
        if let Some(anchor_date) = update.anchor_date {
            self.anchor_date = anchor_date;
        }
    }
}

/// Partial fields merged into an asset by [`Command::UpdateAsset`].
///
/// `None` leaves a field untouched. For `anchor_date`, `Some(None)` clears
/// the date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetUpdate {
    pub category: Option<String>,
    pub platform: Option<String>,
    pub asset_name: Option<String>,
    pub anchor_date: Option<Option<NaiveDate>>,
}

impl AssetUpdate {
    /// An update that sets the anchor date.
    pub fn anchor_date(date: NaiveDate) -> Self {
        Self {
            anchor_date: Some(Some(date)),
            ..Self::default()
        }
    }

    /// An update that clears the anchor date.
    pub fn clear_anchor_date() -> Self {
        Self {
            anchor_date: Some(None),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.platform.is_none()
            && self.asset_name.is_none()
            && self.anchor_date.is_none()
    }
}

/// The whole campaign. Lives in memory for one session only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignState {
    pub selected_assets: Vec<SelectedAsset>,
    pub conflicts: Vec<Conflict>,
    pub timeline_visible: bool,
}

impl CampaignState {
    pub fn asset(&self, id: AssetId) -> Option<&SelectedAsset> {
        self.selected_assets.iter().find(|a| a.id == id)
    }

    /// Total scheduled tasks across all assets.
    pub fn task_count(&self) -> usize {
        self.selected_assets
            .iter()
            .map(|a| a.scheduled_tasks.len())
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Commands and reducer
// ---------------------------------------------------------------------------

/// The closed set of state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Append an asset. The id is assigned when the command is built.
    AddAsset { id: AssetId, entry: CatalogEntry },
    RemoveAsset(AssetId),
    UpdateAsset { id: AssetId, update: AssetUpdate },
    GenerateSchedule,
}

impl Command {
    /// Build an `AddAsset` command with a fresh id.
    pub fn add(entry: CatalogEntry) -> Self {
        Self::AddAsset {
            id: AssetId::new(),
            entry,
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddAsset { .. } => "add_asset",
            Self::RemoveAsset(_) => "remove_asset",
            Self::UpdateAsset { .. } => "update_asset",
            Self::GenerateSchedule => "generate_schedule",
        }
    }
}

/// Everything schedule generation depends on besides the state itself.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleContext<'a> {
    pub template: &'a TaskTemplate,
    pub mode: AnchorMode,
    pub today: NaiveDate,
}

/// Apply a command to a state, returning the next state.
pub fn reduce(state: &CampaignState, command: Command, ctx: &ScheduleContext<'_>) -> CampaignState {
    match command {
        Command::AddAsset { id, entry } => {
            let mut next = state.clone();
            next.selected_assets
                .push(SelectedAsset::from_entry(id, entry));
            next
        }
        Command::RemoveAsset(id) => {
            let mut next = state.clone();
            next.selected_assets.retain(|a| a.id != id);
            next
        }
        Command::UpdateAsset { id, update } => {
            let mut next = state.clone();
            if let Some(asset) = next.selected_assets.iter_mut().find(|a| a.id == id) {
                asset.merge(update);
            }
            next
        }
        Command::GenerateSchedule => generate(state, ctx),
    }
}

fn generate(state: &CampaignState, ctx: &ScheduleContext<'_>) -> CampaignState {
    let mut conflicts = Vec::new();
    let selected_assets = state
        .selected_assets
        .iter()
        .map(|asset| {
            let outcome = compute_schedule(
                asset.anchor_date,
                ctx.template,
                ctx.today,
                ctx.mode,
                &asset.asset_name,
            );
            if let Some(conflict) = outcome.conflict {
                warn!(asset = %asset.label(), message = %conflict.message, "scheduling conflict");
                conflicts.push(conflict);
            }
            SelectedAsset {
                scheduled_tasks: outcome.tasks,
                ..asset.clone()
            }
        })
        .collect::<Vec<_>>();

    let next = CampaignState {
        selected_assets,
        conflicts,
        timeline_visible: true,
    };
    info!(
        assets = next.selected_assets.len(),
        tasks = next.task_count(),
        conflicts = next.conflicts.len(),
        mode = %ctx.mode,
        today = %ctx.today,
        "generated campaign timeline"
    );
    next
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Owns the current campaign state and the configuration it is scheduled
/// against.
pub struct CampaignStore {
    state: CampaignState,
    template: TaskTemplate,
    mode: AnchorMode,
    clock: Box<dyn Clock>,
}

impl CampaignStore {
    /// An empty campaign using the system clock.
    pub fn new(template: TaskTemplate, mode: AnchorMode) -> Self {
        Self {
            state: CampaignState::default(),
            template,
            mode,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the clock (e.g. with a [`FixedClock`] for reproducible runs).
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn state(&self) -> &CampaignState {
        &self.state
    }

    pub fn template(&self) -> &TaskTemplate {
        &self.template
    }

    pub fn mode(&self) -> AnchorMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: AnchorMode) {
        self.mode = mode;
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Apply a command and return the new state.
    pub fn dispatch(&mut self, command: Command) -> &CampaignState {
        debug!(command = command.kind(), "dispatch");
        let ctx = ScheduleContext {
            template: &self.template,
            mode: self.mode,
            today: self.clock.today(),
        };
        self.state = reduce(&self.state, command, &ctx);
        &self.state
    }

    /// Append an asset and return its id.
    pub fn add_asset(&mut self, entry: CatalogEntry) -> AssetId {
        let id = AssetId::new();
        self.dispatch(Command::AddAsset { id, entry });
        id
    }

    pub fn remove_asset(&mut self, id: AssetId) -> &CampaignState {
        self.dispatch(Command::RemoveAsset(id))
    }

    pub fn update_asset(&mut self, id: AssetId, update: AssetUpdate) -> &CampaignState {
        self.dispatch(Command::UpdateAsset { id, update })
    }

    /// Convenience for the common update: set (or clear) the anchor date.
    pub fn set_anchor_date(&mut self, id: AssetId, date: Option<NaiveDate>) -> &CampaignState {
        let update = match date {
            Some(d) => AssetUpdate::anchor_date(d),
            None => AssetUpdate::clear_anchor_date(),
        };
        self.update_asset(id, update)
    }

    pub fn generate_schedule(&mut self) -> &CampaignState {
        self.dispatch(Command::GenerateSchedule)
    }
}

impl fmt::Debug for CampaignStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CampaignStore")
            .field("state", &self.state)
            .field("mode", &self.mode)
            .field("today", &self.clock.today())
            .finish_non_exhaustive()
    }
}
