mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flashdeck_lib::{CategoryFilter, StudyMode};

#[derive(Parser)]
#[command(name = "flashdeck-cli", about = "Spaced repetition drills for vocabulary units", version)]
struct Cli {
    /// Path to config.toml (default: platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Unit to open, by id or name (case-insensitive prefix match)
    #[arg(long, global = true)]
    unit: Option<String>,

    /// Category filter: all, word or phrase
    #[arg(long, global = true)]
    filter: Option<CategoryFilter>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List units
    Units,

    /// Show progress for the active unit
    Stats,

    /// List the cards due now, in review order
    Due {
        /// Maximum cards to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Review due cards interactively
    Review,

    /// Browse cards without affecting the schedule
    Browse,

    /// Reset all progress in the active unit
    Reset {
        /// Skip the confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Delete a unit and its progress
    Delete {
        /// Unit id or name
        unit: String,
        /// Skip the confirmation
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    fn open_app(&self, mode: StudyMode) -> anyhow::Result<app::App> {
        app::App::new(app::AppOptions {
            config_path: self.config.clone(),
            data_dir: self.data_dir.clone(),
            unit: self.unit.clone(),
            filter: self.filter,
            mode,
        })
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::IsTerminal::is_terminal(&std::io::stdout());

    match &cli.command {
        None | Some(Command::Review) => {
            let mut app = cli.open_app(StudyMode::Review)?;
            commands::review::run(&mut app, &mut std::io::stdin().lock(), &mut std::io::stdout(), use_color)?;
        }
        Some(Command::Browse) => {
            let mut app = cli.open_app(StudyMode::Browse)?;
            commands::browse::run(&mut app, &mut std::io::stdin().lock(), &mut std::io::stdout(), use_color)?;
        }
        Some(Command::Units) => {
            let app = cli.open_app(StudyMode::Browse)?;
            commands::units::run(&app, &cli.format, use_color)?;
        }
        Some(Command::Stats) => {
            let app = cli.open_app(StudyMode::Browse)?;
            commands::stats::run(&app, &cli.format, use_color)?;
        }
        Some(Command::Due { limit }) => {
            let app = cli.open_app(StudyMode::Review)?;
            commands::due::run(&app, *limit, &cli.format, use_color)?;
        }
        Some(Command::Reset { yes }) => {
            let mut app = cli.open_app(StudyMode::Browse)?;
            commands::reset::run(&mut app, *yes, &cli.format)?;
        }
        Some(Command::Delete { unit, yes }) => {
            let mut app = cli.open_app(StudyMode::Browse)?;
            commands::delete::run(&mut app, unit, *yes, &cli.format)?;
        }
    }

    Ok(())
}
