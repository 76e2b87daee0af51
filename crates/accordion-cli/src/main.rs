mod campaign;
mod catalog_cmd;
mod chart_cmd;
mod config;
mod export_cmd;
mod schedule_cmd;
mod template_cmd;
#[cfg(test)]
mod test_util;
mod tui;

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use accordion_core::AnchorMode;

use config::AccordionConfig;
use export_cmd::ExportFormat;

#[derive(Parser)]
#[command(name = "accordion", version, about = "Campaign timeline planner")]
struct Cli {
    /// Anchor mode: backward_offset or forward_chaining
    /// (overrides ACCORDION_ANCHOR_MODE, the campaign file and the config file)
    #[arg(long, global = true)]
    mode: Option<AnchorMode>,

    /// Config file path (defaults to ~/.config/accordion/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Print the asset catalog
    Catalog {
        /// Only show this category
        #[arg(long)]
        category: Option<String>,
        /// Only show this platform (requires --category)
        #[arg(long, requires = "category")]
        platform: Option<String>,
    },
    /// Print the task template
    Template,
    /// Generate and print the timeline for a campaign file
    Schedule {
        /// Path to the campaign TOML file
        file: PathBuf,
        /// Treat this date (YYYY-MM-DD) as today
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Generate and export the timeline for a campaign file
    Export {
        /// Path to the campaign TOML file
        file: PathBuf,
        /// Output file path (xlsx defaults to ProjectTimeline.xlsx, csv to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = ExportFormat::Xlsx)]
        format: ExportFormat,
        /// strftime pattern for start/end dates (overrides ACCORDION_DATE_FORMAT)
        #[arg(long)]
        date_format: Option<String>,
        /// Treat this date (YYYY-MM-DD) as today
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Generate the timeline and emit Gantt chart data as JSON
    Chart {
        /// Path to the campaign TOML file
        file: PathBuf,
        /// Output file path (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Emit single-line JSON
        #[arg(long)]
        compact: bool,
        /// Treat this date (YYYY-MM-DD) as today
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Launch the interactive planning session
    Session {
        /// Campaign TOML file to preload
        file: Option<PathBuf>,
        /// Treat this date (YYYY-MM-DD) as today
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Execute the `accordion init` command: write config file.
fn cmd_init(cli_config: Option<&Path>, force: bool) -> Result<()> {
    let path = cli_config.map_or_else(config::config_path, Path::to_path_buf);

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile::with_defaults();
    config::save_config(&path, &cfg)?;

    println!("Config written to {}", path.display());
    println!("  schedule.anchor_mode = {}", AnchorMode::default());
    println!(
        "  export.date_format = {}",
        accordion_core::export::DEFAULT_DATE_FORMAT
    );
    Ok(())
}

fn init_tracing(quiet: bool) {
    // The session owns the terminal; log lines would corrupt the display.
    let writer = if quiet {
        BoxMakeWriter::new(std::io::sink)
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(writer)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Commands::Session { .. }));

    let cli_config = cli.config.as_deref();

    match cli.command {
        Commands::Init { force } => {
            cmd_init(cli_config, force)?;
        }
        Commands::Catalog { category, platform } => {
            let resolved = AccordionConfig::resolve(cli.mode, None, cli_config)?;
            catalog_cmd::run_catalog(&resolved.catalog, category.as_deref(), platform.as_deref())?;
        }
        Commands::Template => {
            let resolved = AccordionConfig::resolve(cli.mode, None, cli_config)?;
            template_cmd::run_template(&resolved.template);
        }
        Commands::Schedule { file, today } => {
            let resolved = AccordionConfig::resolve(cli.mode, None, cli_config)?;
            let mut loaded = campaign::load_store(&file, &resolved, cli.mode, today)?;
            schedule_cmd::run_schedule(loaded.name.as_deref(), &mut loaded.store);
        }
        Commands::Export {
            file,
            output,
            format,
            date_format,
            today,
        } => {
            let resolved = AccordionConfig::resolve(cli.mode, date_format.as_deref(), cli_config)?;
            let mut loaded = campaign::load_store(&file, &resolved, cli.mode, today)?;
            export_cmd::run_export(
                &mut loaded.store,
                format,
                output.as_deref(),
                &resolved.date_format,
            )?;
        }
        Commands::Chart {
            file,
            output,
            compact,
            today,
        } => {
            let resolved = AccordionConfig::resolve(cli.mode, None, cli_config)?;
            let mut loaded = campaign::load_store(&file, &resolved, cli.mode, today)?;
            chart_cmd::run_chart(&mut loaded.store, output.as_deref(), compact)?;
        }
        Commands::Session { file, today } => {
            let resolved = AccordionConfig::resolve(cli.mode, None, cli_config)?;
            let (store, name) = match file {
                Some(file) => {
                    let loaded = campaign::load_store(&file, &resolved, cli.mode, today)?;
                    (loaded.store, loaded.name)
                }
                None => (campaign::new_store(&resolved, today), None),
            };
            let mut app = tui::app::App::new(store, resolved.catalog, resolved.date_format);
            app.campaign_name = name;
            tui::run_session(app)?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "accordion",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}
