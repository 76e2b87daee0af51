//! `accordion chart` command: emit Gantt component input as JSON.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use accordion_core::CampaignStore;
use accordion_core::chart::{ChartAdapter, JsonChartRenderer};

/// Generate the timeline and write the node/link JSON to `output` or stdout.
pub fn run_chart(store: &mut CampaignStore, output: Option<&Path>, compact: bool) -> Result<()> {
    let state = store.generate_schedule();

    let writer: Box<dyn Write> = if let Some(path) = output {
        Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("cannot create output file: {}", path.display()))?,
        )
    } else {
        Box::new(std::io::stdout().lock())
    };

    let renderer = JsonChartRenderer::new(writer);
    let renderer = if compact { renderer.compact() } else { renderer };
    let mut adapter = ChartAdapter::new(renderer);
    adapter
        .sync(&state.selected_assets)
        .context("failed to render chart data")?;

    if let Some(path) = output {
        println!(
            "Wrote chart for {} assets to {}",
            state.selected_assets.len(),
            path.display()
        );
    }

    Ok(())
}
