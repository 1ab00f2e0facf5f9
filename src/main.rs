use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::KeyEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

mod api;
mod app;
mod artifact;
mod config;
mod error;
mod models;
mod tui;

use api::{ApiClient, ExportScope};
use app::App;
use config::Config;
use error::Result;
use models::ExportFormat;
use tui::{draw, handle_key_event};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    let Some(meeting_id) = args.get(1).filter(|a| !a.starts_with('-')).cloned() else {
        eprintln!("Usage: meeting-lens <meeting-id> [--export <pdf|json|txt>]");
        std::process::exit(2);
    };

    // Load configuration
    let config = Config::load()?;

    // Headless export: download the complete report and exit
    if args.get(2).map(String::as_str) == Some("--export") {
        let format = parse_export_format(args.get(3).map(String::as_str))?;
        let client = ApiClient::new(&config)?;
        let path = client
            .export_report(
                &meeting_id,
                ExportScope::Comprehensive,
                format,
                Path::new(&config.export_dir),
            )
            .await?;
        println!("Exported complete report to {}", path.display());
        return Ok(());
    }

    // Initialize app
    let mut app = App::new(config, meeting_id).await?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn parse_export_format(arg: Option<&str>) -> Result<ExportFormat> {
    match arg {
        Some("pdf") => Ok(ExportFormat::Pdf),
        Some("json") => Ok(ExportFormat::Json),
        Some("txt") => Ok(ExportFormat::Txt),
        Some(other) => Err(anyhow::anyhow!("unsupported export format: {other}").into()),
        None => Err(anyhow::anyhow!("--export requires a format (pdf, json, or txt)").into()),
    }
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        // Advance spinner animation
        app.tick_spinner();

        // Apply completed artifact load/generation results
        app.poll_artifact_results();

        // Poll for events with timeout to allow async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) =
                        handle_key_event(key, app.export_menu_active, app.show_help)
                    {
                        let should_quit = app.handle_action(action).await?;
                        if should_quit {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}
