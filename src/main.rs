mod action;
mod app;
mod client;
mod config;
mod error;
mod event;
mod feed;
mod pagination;
mod scroll;
mod tui;
mod types;
mod ui;
mod viewport;

use std::fs::File;
use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::client::HttpFeed;
use crate::config::Config;
use crate::event::Event;
use crate::feed::FeedSource;
use crate::tui::EventHandler;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Feed proxy base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Query to start with
    #[arg(short, long)]
    query: Option<String>,

    /// Config file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs here instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let mut config = Config::load(cli.config.as_deref());
    if let Some(base_url) = cli.base_url {
        config.feed.base_url = base_url;
    }
    if let Some(query) = cli.query {
        config.feed.default_query = query;
    }

    let source: Arc<dyn FeedSource> = Arc::new(HttpFeed::new(&config.feed.base_url, config.timeout())?);
    tracing::info!(source = source.name(), query = %config.feed.default_query, "starting");

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    // Run the application
    let result = run(source, &config).await;

    // Restore terminal
    tui::restore()?;

    result
}

async fn run(source: Arc<dyn FeedSource>, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize terminal
    let mut terminal = tui::init()?;
    let size = terminal.size()?;

    // Create action channel
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    // Create app state; the first page is requested immediately
    let mut app = App::new(source, config, action_tx.clone(), (size.width, size.height));

    // Create event handler
    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    // Main loop
    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
