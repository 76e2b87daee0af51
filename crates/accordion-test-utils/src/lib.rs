//! Shared test utilities for accordion integration tests.
//!
//! Provides fixed dates, a store pinned to a known "today", and recording
//! fakes for the two external adapters (chart renderer and table writer).
//!
//! All fixtures assume today is Friday 2026-10-16.

use chrono::NaiveDate;

use accordion_core::campaign::FixedClock;
use accordion_core::chart::{ChartError, ChartRenderer, GanttData};
use accordion_core::export::{ExportError, TableWriter, TimelineTable};
use accordion_core::{AnchorMode, CampaignStore, CatalogEntry, TaskTemplate};

/// Build a date, panicking on an invalid one.
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_else(|| panic!("invalid date {y}-{m}-{d}"))
}

/// The fixed "today" used across tests (a Friday).
pub fn today() -> NaiveDate {
    date(2026, 10, 16)
}

/// The built-in four-stage template: offsets 7/4/2/0, durations 3/5/2/1.
pub fn example_template() -> TaskTemplate {
    TaskTemplate::builtin()
}

/// A store using the built-in template, pinned to `today`.
pub fn store_at(today: NaiveDate, mode: AnchorMode) -> CampaignStore {
    CampaignStore::new(example_template(), mode).with_clock(FixedClock(today))
}

/// A store pinned to [`today`] in the default mode.
pub fn store() -> CampaignStore {
    store_at(today(), AnchorMode::default())
}

/// A catalog entry that exists in the built-in catalog.
pub fn full_page() -> CatalogEntry {
    CatalogEntry::new("Print", "Daily Mail", "Full Page")
}

/// Another built-in entry on a different platform.
pub fn homepage_takeover() -> CatalogEntry {
    CatalogEntry::new("Digital", "MailOnline", "Homepage Takeover")
}

/// Chart renderer that records every call.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub inits: usize,
    pub loads: Vec<GanttData>,
    /// When set, `replace_data` fails with this message.
    pub fail_with: Option<String>,
}

impl RecordingRenderer {
    pub fn last(&self) -> Option<&GanttData> {
        self.loads.last()
    }
}

impl ChartRenderer for RecordingRenderer {
    fn init(&mut self) -> Result<(), ChartError> {
        self.inits += 1;
        Ok(())
    }

    fn replace_data(&mut self, data: &GanttData) -> Result<(), ChartError> {
        if let Some(msg) = &self.fail_with {
            return Err(ChartError::Renderer(msg.clone()));
        }
        self.loads.push(data.clone());
        Ok(())
    }
}

/// Table writer that keeps every table in memory, keyed by sheet name.
#[derive(Debug, Default)]
pub struct MemoryTableWriter {
    pub written: Vec<(String, TimelineTable)>,
}

impl MemoryTableWriter {
    pub fn only(&self) -> &(String, TimelineTable) {
        assert_eq!(self.written.len(), 1, "expected exactly one table");
        &self.written[0]
    }
}

impl TableWriter for MemoryTableWriter {
    fn write_table(&mut self, sheet_name: &str, table: &TimelineTable) -> Result<(), ExportError> {
        self.written.push((sheet_name.to_owned(), table.clone()));
        Ok(())
    }
}
