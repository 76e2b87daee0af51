//! Timeline export.
//!
//! Flattens every asset's scheduled tasks into a row-oriented table with a
//! fixed header and hands it to a [`TableWriter`]. Assets without tasks add
//! no rows, and conflicts are never exported.

pub mod csv;
pub mod xlsx;

use std::fmt;

use thiserror::Error;
use tracing::info;

use crate::campaign::SelectedAsset;

pub use csv::CsvTableWriter;
pub use xlsx::XlsxTableWriter;

/// Default spreadsheet file name.
pub const DEFAULT_EXPORT_FILE: &str = "ProjectTimeline.xlsx";

/// Worksheet name used for the timeline.
pub const SHEET_NAME: &str = "CampaignTimeline";

/// Default short date pattern (`10/16/2026`).
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Column headings, in order.
pub const HEADER: [&str; 7] = [
    "Asset",
    "Platform",
    "Task",
    "Team",
    "Start Date",
    "End Date",
    "Duration (Days)",
];

/// One table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<u32> for Cell {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

/// A header row plus data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl TimelineTable {
    /// Total rows including the header.
    pub fn row_count(&self) -> usize {
        self.rows.len() + 1
    }
}

/// Build the export table for a list of assets.
///
/// `date_format` is a `chrono` strftime pattern applied to start and end
/// dates.
pub fn build_timeline_table(assets: &[SelectedAsset], date_format: &str) -> TimelineTable {
    let rows = assets
        .iter()
        .flat_map(|asset| {
            asset.scheduled_tasks.iter().map(move |task| {
                vec![
                    Cell::from(asset.asset_name.as_str()),
                    Cell::from(asset.platform.as_str()),
                    Cell::from(task.name.as_str()),
                    Cell::from(task.team.as_str()),
                    Cell::from(task.start_date.format(date_format).to_string()),
                    Cell::from(task.end_date.format(date_format).to_string()),
                    Cell::from(task.duration_days),
                ]
            })
        })
        .collect();

    TimelineTable {
        header: HEADER.iter().map(|h| (*h).to_owned()).collect(),
        rows,
    }
}

/// Errors surfaced by a table writer.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("invalid date format {0:?}")]
    InvalidDateFormat(String),

    #[error("table cell ({row}, {col}) is outside the worksheet")]
    CellOutOfRange { row: usize, col: usize },
}

/// The external tabular-file writer.
pub trait TableWriter {
    fn write_table(&mut self, sheet_name: &str, table: &TimelineTable) -> Result<(), ExportError>;
}

/// Check a strftime pattern before it is used to format dates.
///
/// `chrono` panics at display time on an invalid pattern, so patterns from
/// configuration are checked up front.
pub fn validate_date_format(date_format: &str) -> Result<(), ExportError> {
    use chrono::format::{Item, StrftimeItems};

    if StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error)) {
        return Err(ExportError::InvalidDateFormat(date_format.to_owned()));
    }
    Ok(())
}

/// Flatten `assets` and write them with `writer`.
///
/// Returns the number of data rows written (header excluded).
pub fn export_timeline(
    assets: &[SelectedAsset],
    date_format: &str,
    writer: &mut dyn TableWriter,
) -> Result<usize, ExportError> {
    validate_date_format(date_format)?;
    let table = build_timeline_table(assets, date_format);
    writer.write_table(SHEET_NAME, &table)?;
    info!(rows = table.rows.len(), sheet = SHEET_NAME, "exported timeline");
    Ok(table.rows.len())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::campaign::AssetId;
    use crate::schedule::{AnchorMode, compute_schedule};
    use crate::template::TaskTemplate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn asset(name: &str, start: Option<NaiveDate>) -> SelectedAsset {
        let outcome = compute_schedule(
            start,
            &TaskTemplate::builtin(),
            d(2026, 10, 16),
            AnchorMode::ForwardChaining,
            name,
        );
        SelectedAsset {
            id: AssetId::new(),
            category: "Print".to_owned(),
            platform: "Daily Mail".to_owned(),
            asset_name: name.to_owned(),
            anchor_date: start,
            scheduled_tasks: outcome.tasks,
        }
    }

    #[test]
    fn header_is_fixed() {
        let table = build_timeline_table(&[], DEFAULT_DATE_FORMAT);
        assert_eq!(table.header, HEADER);
        assert!(table.rows.is_empty());
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn one_row_per_task_and_unscheduled_assets_skipped() {
        let assets = vec![
            asset("Full Page", Some(d(2026, 10, 19))),
            asset("Half Page", None),
            asset("Sponsored Content", Some(d(2026, 11, 2))),
        ];
        let table = build_timeline_table(&assets, DEFAULT_DATE_FORMAT);
        assert_eq!(table.rows.len(), 8);
        assert!(
            table
                .rows
                .iter()
                .all(|r| r[0] != Cell::from("Half Page"))
        );
    }

    #[test]
    fn row_contents() {
        let assets = vec![asset("Full Page", Some(d(2026, 10, 19)))];
        let table = build_timeline_table(&assets, DEFAULT_DATE_FORMAT);
        assert_eq!(
            table.rows[1],
            vec![
                Cell::from("Full Page"),
                Cell::from("Daily Mail"),
                Cell::from("Content Creation"),
                Cell::from("MMM"),
                Cell::from("10/22/2026"),
                Cell::from("10/26/2026"),
                Cell::Number(5.0),
            ]
        );
    }

    #[test]
    fn custom_date_format() {
        let assets = vec![asset("Full Page", Some(d(2026, 10, 19)))];
        let table = build_timeline_table(&assets, "%d/%m/%Y");
        assert_eq!(table.rows[0][4], Cell::from("19/10/2026"));
    }

    #[test]
    fn rejects_invalid_date_format() {
        let err = validate_date_format("%Q").unwrap_err();
        assert!(matches!(err, ExportError::InvalidDateFormat(_)));
        validate_date_format(DEFAULT_DATE_FORMAT).unwrap();
    }

    #[test]
    fn number_cells_display_without_fraction() {
        assert_eq!(Cell::from(5u32).to_string(), "5");
    }
}
