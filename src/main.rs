//! portfolio CLI
//!
//! Browse a single-page résumé in the terminal, print it, or manage the
//! stored theme preference.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;

use portfolio_tui::content::resolve_portfolio;
use portfolio_tui::error::{Error, StorageError};
use portfolio_tui::logging;
use portfolio_tui::platform::{default_log_file, default_state_dir};
use portfolio_tui::report::format_report;
use portfolio_tui::telemetry::{JsonlCollector, Telemetry};
use portfolio_tui::theme::{explain_initial_theme, JsonFileStore, SystemAppearance, ThemeController};
use portfolio_tui::tui;
use portfolio_tui::types::{AppConfig, OutputFormat, ThemePreference};

#[derive(Parser)]
#[command(name = "portfolio")]
#[command(about = "A single-page résumé in the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Portfolio content as JSON (default: built-in content)
    #[arg(long, global = true)]
    content: Option<PathBuf>,

    /// Directory for preferences, analytics records and the log
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// Log file (default: <state-dir>/portfolio.log)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Do not record a session start
    #[arg(long, global = true)]
    no_analytics: bool,

    /// Show every section immediately instead of on scroll
    #[arg(long, global = true)]
    no_reveal: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the portfolio (default)
    View {
        /// Force a theme for this session (also stored)
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,
    },

    /// Print the portfolio without the terminal UI
    Print {
        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Inspect or change the stored theme preference
    Theme {
        #[command(subcommand)]
        action: ThemeCommand,
    },
}

#[derive(Subcommand)]
enum ThemeCommand {
    /// Show the theme the page would open with, and why
    Show,
    /// Flip the stored theme
    Toggle,
    /// Store a theme
    Set {
        #[arg(value_enum)]
        theme: ThemeArg,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for ThemePreference {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => ThemePreference::Light,
            ThemeArg::Dark => ThemePreference::Dark,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::View { theme: None });
    let state_dir = cli.state_dir.unwrap_or_else(default_state_dir);
    let config = AppConfig {
        content_path: cli.content,
        log_file: cli.log_file.unwrap_or_else(|| default_log_file(&state_dir)),
        state_dir,
        theme_override: match &command {
            Commands::View { theme } => theme.map(Into::into),
            _ => None,
        },
        reveal: !cli.no_reveal,
        analytics: !cli.no_analytics,
    };

    // Logging is optional; the page works without it
    if let Err(e) = logging::init(&config.log_file) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let result = match command {
        Commands::View { .. } => cmd_view(&config),
        Commands::Print { format } => cmd_print(&config, format.into()),
        Commands::Theme { action } => match action {
            ThemeCommand::Show => cmd_theme_show(&config),
            ThemeCommand::Toggle => cmd_theme_change(&config, None),
            ThemeCommand::Set { theme } => cmd_theme_change(&config, Some(theme.into())),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "fatal");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// THEME WIRING
// ============================================================================

/// Controller over the preference file and the OS appearance.
fn theme_controller(config: &AppConfig) -> ThemeController {
    ThemeController::new(
        Box::new(JsonFileStore::new(config.preferences_path())),
        Box::new(SystemAppearance),
    )
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn cmd_view(config: &AppConfig) -> Result<(), Error> {
    let portfolio = resolve_portfolio(config.content_path.as_deref())?;

    if config.analytics {
        // Detached: the page never waits on analytics
        let _ = Telemetry::global().initialize(
            JsonlCollector::new(config.analytics_path()),
            portfolio.analytics.as_ref(),
        );
    }

    let mut theme = theme_controller(config);
    theme.start();
    if let Some(forced) = config.theme_override {
        theme.apply_theme(forced);
    }

    info!(name = %portfolio.profile.name, "opening portfolio");
    tui::run::run(portfolio, theme, config.reveal)?;
    Ok(())
}

fn cmd_print(config: &AppConfig, format: OutputFormat) -> Result<(), Error> {
    let portfolio = resolve_portfolio(config.content_path.as_deref())?;
    print!("{}", format_report(&portfolio, format)?);
    Ok(())
}

fn cmd_theme_show(config: &AppConfig) -> Result<(), Error> {
    let store = JsonFileStore::new(config.preferences_path());
    let (resolved, source) = explain_initial_theme(&store, &SystemAppearance);

    println!("Theme: {} ({})", resolved, source);
    println!("Preferences: {}", store.path().display());
    Ok(())
}

/// Toggle the stored theme, or store `target` when given.
fn cmd_theme_change(config: &AppConfig, target: Option<ThemePreference>) -> Result<(), Error> {
    let mut theme = theme_controller(config);
    theme.start();
    let applied = match target {
        Some(pref) => {
            theme.apply_theme(pref);
            pref
        }
        None => theme.toggle(),
    };

    if !theme.is_persistent() {
        return Err(StorageError::Unavailable.into());
    }

    println!("Theme: {}", applied);
    Ok(())
}
