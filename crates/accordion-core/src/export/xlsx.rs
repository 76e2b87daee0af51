//! Spreadsheet output via `rust_xlsxwriter`.

use std::path::PathBuf;

use rust_xlsxwriter::{Format, Workbook};

use super::{Cell, ExportError, TableWriter, TimelineTable};

/// Writes the table as a single-sheet `.xlsx` workbook at `path`.
#[derive(Debug, Clone)]
pub struct XlsxTableWriter {
    path: PathBuf,
}

impl XlsxTableWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Build the workbook in memory.
    pub fn to_buffer(sheet_name: &str, table: &TimelineTable) -> Result<Vec<u8>, ExportError> {
        let mut workbook = build_workbook(sheet_name, table)?;
        Ok(workbook.save_to_buffer()?)
    }
}

impl TableWriter for XlsxTableWriter {
    fn write_table(&mut self, sheet_name: &str, table: &TimelineTable) -> Result<(), ExportError> {
        let mut workbook = build_workbook(sheet_name, table)?;
        workbook.save(&self.path)?;
        Ok(())
    }
}

fn build_workbook(sheet_name: &str, table: &TimelineTable) -> Result<Workbook, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name)?;

    for (col, heading) in table.header.iter().enumerate() {
        let (row, col) = cell_position(0, col)?;
        sheet.write_string_with_format(row, col, heading, &bold)?;
    }

    // Data rows sit below the header.
    for (r, cells) in table.rows.iter().enumerate() {
        for (c, cell) in cells.iter().enumerate() {
            let (row, col) = cell_position(r + 1, c)?;
            match cell {
                Cell::Text(s) => {
                    sheet.write_string(row, col, s)?;
                }
                Cell::Number(n) => {
                    sheet.write_number(row, col, *n)?;
                }
            }
        }
    }

    sheet.autofit();
    Ok(workbook)
}

/// Worksheet coordinates for a zero-based table position.
fn cell_position(row: usize, col: usize) -> Result<(u32, u16), ExportError> {
    match (u32::try_from(row), u16::try_from(col)) {
        (Ok(r), Ok(c)) => Ok((r, c)),
        _ => Err(ExportError::CellOutOfRange { row, col }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::HEADER;

    fn table() -> TimelineTable {
        TimelineTable {
            header: HEADER.iter().map(|h| (*h).to_owned()).collect(),
            rows: vec![vec![
                Cell::from("Full Page"),
                Cell::from("Daily Mail"),
                Cell::from("Publishing & Go-Live"),
                Cell::from("MMM"),
                Cell::from("10/29/2026"),
                Cell::from("10/29/2026"),
                Cell::from(1u32),
            ]],
        }
    }

    #[test]
    fn buffer_is_a_zip_container() {
        let bytes = XlsxTableWriter::to_buffer("CampaignTimeline", &table()).unwrap();
        assert!(bytes.starts_with(b"PK"), "xlsx files are zip archives");
    }

    #[test]
    fn writes_file_to_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("ProjectTimeline.xlsx");
        let mut writer = XlsxTableWriter::new(&path);
        writer.write_table("CampaignTimeline", &table()).unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
    }

    #[test]
    fn positions_beyond_worksheet_types_are_errors() {
        assert_eq!(cell_position(1, 6).unwrap(), (1, 6));
        let err = cell_position(0, usize::from(u16::MAX) + 1).unwrap_err();
        assert!(
            matches!(err, ExportError::CellOutOfRange { row: 0, .. }),
            "got: {err}"
        );
    }

    #[test]
    fn rejects_invalid_sheet_name() {
        let err = XlsxTableWriter::to_buffer("bad/name", &table()).unwrap_err();
        assert!(matches!(err, ExportError::Xlsx(_)), "got: {err}");
    }
}
