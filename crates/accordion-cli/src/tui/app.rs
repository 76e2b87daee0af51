//! TUI application state for the interactive planning session.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use accordion_core::chart::{ChartAdapter, ChartError, ChartRenderer, GanttData};
use accordion_core::export::{XlsxTableWriter, export_timeline};
use accordion_core::{AnchorMode, AssetId, Catalog, CampaignStore, SelectedAsset};

/// Date format typed into the date editor.
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Which screen the TUI is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Planner,
    Help,
}

/// Which panel has keyboard focus in the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Selector,
    Assets,
    Timeline,
}

/// The three cascading selector levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Category,
    Platform,
    Asset,
}

/// Keyboard input mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing an anchor date for the given asset.
    EditingDate { id: AssetId, buffer: String },
}

/// Keeps the last chart data for the timeline panel to draw.
#[derive(Debug, Default)]
pub struct GanttPreview {
    pub data: GanttData,
}

impl ChartRenderer for GanttPreview {
    fn init(&mut self) -> Result<(), ChartError> {
        self.data = GanttData::default();
        Ok(())
    }

    fn replace_data(&mut self, data: &GanttData) -> Result<(), ChartError> {
        self.data = data.clone();
        Ok(())
    }
}

/// Application state for the TUI.
pub struct App {
    pub store: CampaignStore,
    pub catalog: Catalog,
    pub chart: ChartAdapter<GanttPreview>,
    pub date_format: String,
    pub export_path: PathBuf,
    pub campaign_name: Option<String>,

    pub current_view: View,
    pub focus: Panel,
    pub level: Level,
    pub selected_category: usize,
    pub selected_platform: usize,
    pub selected_asset: usize,
    pub selected_row: usize,
    pub input_mode: InputMode,

    pub tick_rate: Duration,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl App {
    pub fn new(store: CampaignStore, catalog: Catalog, date_format: String) -> Self {
        Self {
            store,
            catalog,
            chart: ChartAdapter::new(GanttPreview::default()),
            date_format,
            export_path: PathBuf::from(accordion_core::export::DEFAULT_EXPORT_FILE),
            campaign_name: None,
            current_view: View::Planner,
            focus: Panel::Selector,
            level: Level::Category,
            selected_category: 0,
            selected_platform: 0,
            selected_asset: 0,
            selected_row: 0,
            input_mode: InputMode::Normal,
            tick_rate: Duration::from_millis(250),
            should_quit: false,
            status_message: None,
        }
    }

    // -- Selector data --

    pub fn categories(&self) -> Vec<&str> {
        self.catalog.categories()
    }

    pub fn platforms(&self) -> Vec<&str> {
        self.current_category()
            .map(|c| self.catalog.platforms(c))
            .unwrap_or_default()
    }

    pub fn assets(&self) -> Vec<&str> {
        match (self.current_category(), self.current_platform()) {
            (Some(c), Some(p)) => self.catalog.assets(c, p),
            _ => Vec::new(),
        }
    }

    fn current_category(&self) -> Option<&str> {
        self.catalog.categories().get(self.selected_category).copied()
    }

    fn current_platform(&self) -> Option<&str> {
        let category = self.current_category()?;
        self.catalog
            .platforms(category)
            .get(self.selected_platform)
            .copied()
    }

    fn current_asset(&self) -> Option<&str> {
        let category = self.current_category()?;
        let platform = self.current_platform()?;
        self.catalog
            .assets(category, platform)
            .get(self.selected_asset)
            .copied()
    }

    pub fn selected_assets(&self) -> &[SelectedAsset] {
        &self.store.state().selected_assets
    }

    fn selected_asset_row(&self) -> Option<&SelectedAsset> {
        self.selected_assets().get(self.selected_row)
    }

    // -- Navigation --

    pub fn navigate_back(&mut self) {
        match self.current_view {
            View::Planner => self.should_quit = true,
            View::Help => self.current_view = View::Planner,
        }
    }

    pub fn show_help(&mut self) {
        self.current_view = View::Help;
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Panel::Selector => Panel::Assets,
            Panel::Assets => Panel::Timeline,
            Panel::Timeline => Panel::Selector,
        };
    }

    pub fn level_left(&mut self) {
        if self.focus != Panel::Selector {
            return;
        }
        self.level = match self.level {
            Level::Category | Level::Platform => Level::Category,
            Level::Asset => Level::Platform,
        };
    }

    pub fn level_right(&mut self) {
        if self.focus != Panel::Selector {
            return;
        }
        self.level = match self.level {
            Level::Category => Level::Platform,
            Level::Platform | Level::Asset => Level::Asset,
        };
    }

    pub fn move_up(&mut self) {
        match self.focus {
            Panel::Selector => match self.level {
                Level::Category => {
                    if self.selected_category > 0 {
                        self.selected_category -= 1;
                        self.selected_platform = 0;
                        self.selected_asset = 0;
                    }
                }
                Level::Platform => {
                    if self.selected_platform > 0 {
                        self.selected_platform -= 1;
                        self.selected_asset = 0;
                    }
                }
                Level::Asset => {
                    if self.selected_asset > 0 {
                        self.selected_asset -= 1;
                    }
                }
            },
            Panel::Assets => {
                if self.selected_row > 0 {
                    self.selected_row -= 1;
                }
            }
            Panel::Timeline => {}
        }
    }

    pub fn move_down(&mut self) {
        match self.focus {
            Panel::Selector => match self.level {
                Level::Category => {
                    if self.selected_category + 1 < self.categories().len() {
                        self.selected_category += 1;
                        self.selected_platform = 0;
                        self.selected_asset = 0;
                    }
                }
                Level::Platform => {
                    if self.selected_platform + 1 < self.platforms().len() {
                        self.selected_platform += 1;
                        self.selected_asset = 0;
                    }
                }
                Level::Asset => {
                    if self.selected_asset + 1 < self.assets().len() {
                        self.selected_asset += 1;
                    }
                }
            },
            Panel::Assets => {
                let len = self.selected_assets().len();
                if len > 0 && self.selected_row < len - 1 {
                    self.selected_row += 1;
                }
            }
            Panel::Timeline => {}
        }
    }

    // -- Actions --

    /// Add the asset currently chosen in the selector.
    pub fn add_selected(&mut self) -> Result<()> {
        let entry = match (
            self.current_category(),
            self.current_platform(),
            self.current_asset(),
        ) {
            (Some(c), Some(p), Some(a)) => self.catalog.entry(c, p, a),
            _ => None,
        };
        let Some(entry) = entry else {
            self.status_message = Some("Select a category, platform and asset first".to_string());
            return Ok(());
        };

        let label = entry.to_string();
        self.store.add_asset(entry);
        self.selected_row = self.selected_assets().len() - 1;
        self.status_message = Some(format!("Added {label}"));
        self.sync_chart()
    }

    /// Remove the highlighted asset in the asset list.
    pub fn remove_selected(&mut self) -> Result<()> {
        let Some(asset) = self.selected_asset_row() else {
            return Ok(());
        };
        let (id, label) = (asset.id, asset.label());
        self.store.remove_asset(id);

        let len = self.selected_assets().len();
        if self.selected_row >= len && len > 0 {
            self.selected_row = len - 1;
        }
        self.status_message = Some(format!("Removed {label}"));
        self.sync_chart()
    }

    /// Open the date editor on the highlighted asset.
    pub fn begin_date_edit(&mut self) {
        let Some(asset) = self.selected_asset_row() else {
            return;
        };
        let id = asset.id;
        let buffer = asset
            .anchor_date
            .map(|d| d.format(INPUT_DATE_FORMAT).to_string())
            .unwrap_or_default();
        self.input_mode = InputMode::EditingDate { id, buffer };
    }

    pub fn push_char(&mut self, c: char) {
        if let InputMode::EditingDate { buffer, .. } = &mut self.input_mode {
            if (c.is_ascii_digit() || c == '-') && buffer.len() < 10 {
                buffer.push(c);
            }
        }
    }

    pub fn pop_char(&mut self) {
        if let InputMode::EditingDate { buffer, .. } = &mut self.input_mode {
            buffer.pop();
        }
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Commit the date editor. An empty buffer clears the date; an
    /// unparseable one leaves the editor open.
    pub fn commit_date(&mut self) {
        let InputMode::EditingDate { id, buffer } = &self.input_mode else {
            return;
        };
        let id = *id;
        let date = if buffer.trim().is_empty() {
            None
        } else {
            match NaiveDate::parse_from_str(buffer.trim(), INPUT_DATE_FORMAT) {
                Ok(d) => Some(d),
                Err(_) => {
                    self.status_message = Some(format!("Invalid date {buffer:?}; use YYYY-MM-DD"));
                    return;
                }
            }
        };

        self.store.set_anchor_date(id, date);
        self.input_mode = InputMode::Normal;
        self.status_message = Some(match date {
            Some(d) => format!("Date set to {d}"),
            None => "Date cleared".to_string(),
        });
    }

    /// Regenerate every schedule and refresh the chart.
    pub fn generate(&mut self) -> Result<()> {
        let state = self.store.generate_schedule();
        let conflicts = state.conflicts.len();
        let tasks = state.task_count();
        self.status_message = Some(if conflicts == 0 {
            format!("Generated {tasks} tasks")
        } else {
            format!("Generated {tasks} tasks, {conflicts} conflict(s)")
        });
        self.sync_chart()
    }

    /// Generate straight away when a preloaded campaign already has dates.
    pub fn open_dated_timeline(&mut self) -> Result<()> {
        if self.selected_assets().iter().any(|a| a.anchor_date.is_some()) {
            self.generate()?;
        }
        Ok(())
    }

    pub fn toggle_mode(&mut self) {
        let next = match self.store.mode() {
            AnchorMode::BackwardOffset => AnchorMode::ForwardChaining,
            AnchorMode::ForwardChaining => AnchorMode::BackwardOffset,
        };
        self.store.set_mode(next);
        self.status_message = Some(format!("Anchor mode: {next} (press g to regenerate)"));
    }

    /// Export the current timeline to the spreadsheet file.
    pub fn export(&mut self) -> Result<()> {
        let mut writer = XlsxTableWriter::new(&self.export_path);
        let rows = export_timeline(self.selected_assets(), &self.date_format, &mut writer)
            .with_context(|| format!("failed to export to {}", self.export_path.display()))?;
        self.status_message = Some(format!(
            "Exported {rows} rows to {}",
            self.export_path.display()
        ));
        Ok(())
    }

    /// Push the current assets into the chart once the timeline is shown.
    pub fn sync_chart(&mut self) -> Result<()> {
        if !self.store.state().timeline_visible {
            return Ok(());
        }
        let assets = self.store.state().selected_assets.clone();
        self.chart.sync(&assets)?;
        Ok(())
    }

    pub fn gantt(&self) -> &GanttData {
        &self.chart.renderer().data
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
