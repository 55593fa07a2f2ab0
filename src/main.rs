//! bilimforms - BilimCert application forms in the terminal
//!
//! Fills in and submits partnership, recognition and accreditation
//! applications step by step.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info};

use bilimforms::application::App;
use bilimforms::config::Config;
use bilimforms::domain::{FormKind, SettingsApplier};
use bilimforms::infrastructure::{FileSettingsStore, HttpGateway};
use bilimforms::logging;
use bilimforms::presentation::{render_ui, InputHandler, Theme};

const TICK_RATE: Duration = Duration::from_millis(100);

#[derive(Debug, Parser)]
#[command(name = "bilimforms", version, about = "BilimCert application forms")]
struct Cli {
    /// Form to open directly: partnership, recognition or accreditation
    #[arg(short, long)]
    form: Option<FormKind>,

    /// Base URL of the forms API
    #[arg(long, env = "BILIMFORMS_API_URL")]
    api_url: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,
}

/// Entry point for the bilimforms terminal application.
///
/// Loads configuration, starts file logging, sets up the terminal and runs
/// the event loop until the user quits.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }

    let log_dir = config.log_directory();
    let _guard = logging::init(&log_dir, cli.debug)
        .with_context(|| format!("failed to initialize logging in {}", log_dir.display()))?;
    info!(api = %config.api_base_url, "starting bilimforms");

    let gateway = HttpGateway::new(config.api_base_url.clone(), config.request_timeout())
        .context("failed to build HTTP client")?;
    let store = FileSettingsStore::open(config.settings_file());
    info!(settings = %store.path().display(), "loaded accessibility settings");
    let mut app = App::new(cli.form, Arc::new(gateway), Box::new(store));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = %err, "terminal error");
    }
    info!("exiting bilimforms");
    res.context("terminal error")
}

/// Main application event loop.
///
/// Redraws on every key press and tick, picks up finished submissions and
/// re-applies the theme whenever the accessibility settings change.
/// Continues running until the user quits.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let mut theme = Theme::from_settings(&app.settings);
    let mut applied_generation = app.settings_generation;

    loop {
        if app.settings_generation != applied_generation {
            theme.apply(&app.settings);
            applied_generation = app.settings_generation;
        }

        terminal.draw(|f| render_ui(f, app, &theme))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let ctrl_c = key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
                    if ctrl_c || InputHandler::is_quit(app, key.code) {
                        return Ok(());
                    }
                    InputHandler::handle_key_event(app, key.code, key.modifiers);
                }
            }
        } else {
            app.on_tick();
        }

        app.poll_submission();
    }
}
