//! Media catalog TUI
//!
//! Table view of the catalog, driven entirely through the HTTP API.
//!
//! ## Layout
//!
//! - Top: category selector (All, Books, Movies, Magazines)
//! - Middle: entry table (Name, Author, Date, Category)
//! - Bottom: status bar or search input
//!
//! ## Keys
//!
//! - j/k or ↑/↓: Move selection up/down
//! - Tab / Shift+Tab: Cycle category
//! - Enter: Show details of the selected entry
//! - /: Search by name
//! - a: Add entry
//! - d: Delete entry (asks for confirmation)
//! - r: Reload all entries
//! - ?: Help
//! - q: Quit
//!
//! Each request runs to completion before the next key is read.

mod app;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use media_core::Config;
use media_server::AppState;
use ratatui::prelude::*;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::client::ApiClient;
use app::{Action, App};

/// Run the TUI application
///
/// With `embedded`, an API server over `config.data_file` is started in
/// this process first and the TUI talks to it.
pub async fn run(config: &Config, embedded: bool) -> Result<()> {
    // Initialize TUI logging (file-based, only if MEDIA_LOG is set)
    init_tui_logging(config);

    let server = if embedded {
        Some(EmbeddedServer::start(config).await?)
    } else {
        None
    };

    let server_url = match &server {
        Some(server) => server.url.clone(),
        None => config.server_url.clone(),
    };
    let client = ApiClient::new(&server_url)?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new(client.base_url());

    // Run app
    let result = run_app(&mut terminal, &mut app, &client).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    if let Some(server) = server {
        server.stop().await;
    }

    result
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    client: &ApiClient,
) -> Result<()> {
    run_action(terminal, app, client, Action::LoadAll).await?;

    loop {
        // Check for status message timeout
        app.check_status_timeout();

        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::time::sleep(Duration::from_millis(50)).await;

        // Check for terminal events (non-blocking)
        if !event::poll(Duration::from_millis(0))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        // Only handle key press events (not release)
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if let Some(action) = app.handle_key(key.code, key.modifiers) {
            run_action(terminal, app, client, action).await?;
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Show the loading indicator, then run the action to completion
async fn run_action<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    client: &ApiClient,
    action: Action,
) -> Result<()> {
    app.is_loading = true;
    terminal.draw(|frame| ui::draw(frame, app))?;
    app.perform(action, client).await;
    Ok(())
}

/// API server running inside the TUI process
struct EmbeddedServer {
    url: String,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl EmbeddedServer {
    async fn start(config: &Config) -> Result<Self> {
        let store = media_server::open_store(config)?;

        let listener = tokio::net::TcpListener::bind(&config.bind_addr)
            .await
            .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
        let url = format!("http://{}", listener.local_addr()?);
        info!("Embedded server listening on {}", url);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(media_server::serve(
            listener,
            AppState::new(store),
            async move {
                let _ = shutdown_rx.await;
            },
        ));

        Ok(Self {
            url,
            shutdown_tx,
            handle,
        })
    }

    async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        match self.handle.await {
            Ok(Ok(())) => info!("Embedded server stopped"),
            Ok(Err(e)) => warn!("Embedded server failed: {}", e),
            Err(e) => warn!("Embedded server task panicked: {}", e),
        }
    }
}

/// Initialize logging for TUI mode
///
/// Only initializes if MEDIA_LOG environment variable is set.
/// Logs to file (config.log_file or media-tui.log next to the config file).
fn init_tui_logging(config: &Config) {
    let Ok(log_level) = std::env::var("MEDIA_LOG") else {
        return;
    };

    let log_path = config.tui_log_path();

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "media_core={level},media_server={level},media={level}",
        level = log_level
    ));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}
