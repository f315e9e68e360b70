//! Resume Wizard - Main entry point
//!
//! Parses the command line, sets up logging and dispatches to the
//! interactive wizard or one of the headless commands.

use anyhow::{Context, Result};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::OpenOptions;
use std::io::stdout;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, error, info};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use resume_wizard::app::App;
use resume_wizard::cli::{Cli, Commands, ConfigCommands};
use resume_wizard::config_file::WizardConfig;
use resume_wizard::headless;

/// Initialize tracing.
///
/// Interactive mode owns the terminal, so its logs go to `--log-file` or
/// nowhere. Headless commands log to stderr.
fn init_tracing(cli: &Cli, interactive: bool) -> Result<()> {
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("resume_wizard={}", level)));

    let writer = match &cli.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None if interactive => BoxMakeWriter::new(std::io::sink),
        None => BoxMakeWriter::new(std::io::stderr),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(cli.log_file.is_none() && !interactive),
        )
        .init();
    Ok(())
}

/// Main application entry point
fn main() -> Result<()> {
    let cli = Cli::parse_args();
    let interactive = matches!(cli.command, None | Some(Commands::Run { .. }));
    init_tracing(&cli, interactive)?;
    info!("Resume Wizard v{} starting up", env!("CARGO_PKG_VERSION"));
    debug!("CLI arguments parsed");

    match &cli.command {
        Some(Commands::Config { action }) => run_config_command(action),
        Some(Commands::Templates) => {
            print!("{}", headless::format_templates());
            Ok(())
        }
        Some(Commands::Plans) => {
            print!("{}", headless::format_plans());
            Ok(())
        }
        Some(Commands::Score {
            resume_text,
            job_description,
        }) => {
            let config = WizardConfig::load_or_default(cli.config.as_deref())?;
            let report = headless::run_score(resume_text, job_description, &config)?;
            print!("{}", headless::format_report(&report));
            Ok(())
        }
        Some(Commands::Walkthrough(args)) => {
            let config = WizardConfig::load_or_default(cli.config.as_deref())?;
            info!("Running headless walkthrough");
            let summary = headless::run_walkthrough(args, config).inspect_err(|e| {
                error!("Walkthrough failed: {:#}", e);
            })?;
            println!("✓ Finished: reached step {} of 7", summary.steps_reached);
            Ok(())
        }
        Some(Commands::Run { output_dir }) => {
            run_interactive(cli.config.as_deref(), output_dir.as_deref())
        }
        None => {
            info!("No command specified, launching interactive wizard");
            run_interactive(cli.config.as_deref(), None)
        }
    }
}

fn run_config_command(action: &ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Init { path } => {
            WizardConfig::default().save_to_file(path)?;
            println!("✓ Wrote default settings to {}", path.display());
            Ok(())
        }
        ConfigCommands::Validate { path } => {
            info!("Validating settings file: {:?}", path);
            let config = WizardConfig::load_from_file(path)?;
            match config.validate() {
                Ok(()) => {
                    println!("✓ Settings file is valid: {}", path.display());
                    Ok(())
                }
                Err(e) => {
                    error!("Settings validation failed: {}", e);
                    eprintln!("✗ Settings validation failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

/// Run the interactive wizard
fn run_interactive(config_path: Option<&Path>, output_dir: Option<&Path>) -> Result<()> {
    let mut config = WizardConfig::load_or_default(config_path)?;
    if let Some(dir) = output_dir {
        config.output_dir = dir.to_path_buf();
    }

    debug!("Initializing terminal for TUI mode");
    enable_raw_mode().context("Failed to enable raw mode")?;
    crossterm::execute!(
        stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableBracketedPaste
    )
    .context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new(config);
    let result = app.run(&mut terminal);

    // Cleanup terminal (always attempt cleanup, even if app failed)
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        stdout(),
        crossterm::event::DisableBracketedPaste,
        crossterm::terminal::LeaveAlternateScreen
    );

    result.map_err(Into::into)
}
