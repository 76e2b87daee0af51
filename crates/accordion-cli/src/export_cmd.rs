//! `accordion export` command: write the generated timeline to a file.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;

use accordion_core::CampaignStore;
use accordion_core::export::{
    CsvTableWriter, DEFAULT_EXPORT_FILE, TableWriter, XlsxTableWriter, export_timeline,
};

/// Output format for `accordion export`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

/// Generate the timeline and export it.
///
/// Spreadsheets default to `ProjectTimeline.xlsx` in the working directory;
/// CSV defaults to stdout.
pub fn run_export(
    store: &mut CampaignStore,
    format: ExportFormat,
    output: Option<&Path>,
    date_format: &str,
) -> Result<()> {
    let state = store.generate_schedule();

    let (mut writer, dest): (Box<dyn TableWriter>, Option<PathBuf>) = match format {
        ExportFormat::Xlsx => {
            let path = output.map_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE), Path::to_path_buf);
            (Box::new(XlsxTableWriter::new(&path)), Some(path))
        }
        ExportFormat::Csv => {
            let sink: Box<dyn Write> = if let Some(path) = output {
                Box::new(
                    std::fs::File::create(path)
                        .with_context(|| format!("cannot create output file: {}", path.display()))?,
                )
            } else {
                Box::new(std::io::stdout().lock())
            };
            (Box::new(CsvTableWriter::new(sink)), output.map(Path::to_path_buf))
        }
    };

    let rows = export_timeline(&state.selected_assets, date_format, writer.as_mut())
        .context("export failed")?;

    if let Some(path) = dest {
        println!("Exported {rows} rows to {}", path.display());
    }
    if !state.conflicts.is_empty() {
        eprintln!(
            "warning: {} asset(s) have scheduling conflicts; run `accordion schedule` for details",
            state.conflicts.len()
        );
    }

    Ok(())
}
