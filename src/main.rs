use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const RECENT_EVENTS_SHOWN: usize = 10;

use reelcast::app::{App, AppCommand, ConsoleInput, HELP, parse_command};
use reelcast::catalog::{CatalogStore, JsonCatalog};
use reelcast::config::Config;
use reelcast::constants::{CATEGORY_PREVIEW_LIMIT, EVENT_BUS_CAPACITY};
use reelcast::events::{EventBus, EventPayload};
use reelcast::navigation::HistoryNavigator;
use reelcast::storage::FileStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load_from(&PathBuf::from(path))?,
        None => Config::load()?,
    };

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting reelcast");

    let catalog = Arc::new(
        JsonCatalog::load(&config.catalog.path)
            .with_context(|| format!("Failed to load catalog {:?}", config.catalog.path))?,
    );
    let ledger_path = config.ledger_path()?;
    let store = Arc::new(
        FileStore::open(&ledger_path)
            .with_context(|| format!("Failed to open ledger {:?}", ledger_path))?,
    );

    let events = EventBus::new(EVENT_BUS_CAPACITY);
    let (handle, app) = App::headless(
        &config,
        catalog.clone(),
        store,
        Box::new(HistoryNavigator::new()),
        events.clone(),
    );
    let shutdown = app.shutdown_token();
    let app_task = tokio::spawn(app.run());

    let mut subscriber = events.subscribe();
    tokio::spawn(async move {
        while let Some(event) = subscriber.recv().await {
            match event.payload {
                EventPayload::View(view) => println!("view: {}", view.label()),
                EventPayload::Failure { media, message } => {
                    println!("no playable video: {} ({})", media, message)
                }
                EventPayload::Rejected { command, reason } => {
                    println!("{} rejected: {}", command, reason)
                }
                EventPayload::Progress { .. } => {}
            }
        }
    });

    let ctrl_c_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, shutting down");
            ctrl_c_shutdown.cancel();
        }
    });

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => break,
            line = lines.next_line() => match line.context("Failed to read stdin")? {
                Some(line) => line,
                None => break,
            },
        };

        match parse_command(&line) {
            Ok(ConsoleInput::Send(commands)) => {
                let quitting = commands.iter().any(|c| matches!(c, AppCommand::Quit));
                for command in commands {
                    handle.send(command)?;
                }
                if quitting {
                    break;
                }
            }
            Ok(ConsoleInput::Status) => println!("{}", handle.status().await?),
            Ok(ConsoleInput::Events) => print_recent_events(&events).await,
            Ok(ConsoleInput::List) => print_catalog(catalog.as_ref()),
            Ok(ConsoleInput::Help) => println!("{}", HELP),
            Ok(ConsoleInput::Empty) => {}
            Err(e) => println!("{} (try `help`)", e),
        }
    }

    debug!("Console closed");
    shutdown.cancel();
    if let Err(e) = app_task.await {
        error!("App task failed: {}", e);
    }
    Ok(())
}

async fn print_recent_events(events: &EventBus) {
    let history = events.get_history().await;
    for event in history.iter().skip(history.len().saturating_sub(RECENT_EVENTS_SHOWN)) {
        println!(
            "{} {}",
            event.timestamp.format("%H:%M:%S%.3f"),
            event.event_type.as_str()
        );
    }
    let stats = events.get_stats().await;
    println!(
        "{} published, {} dropped, {} subscribers",
        stats.total_events, stats.dropped_events, stats.subscriber_count
    );
}

fn print_catalog(catalog: &dyn CatalogStore) {
    for category in catalog.list_categories() {
        println!("{}:", category.name);
        for (index, video) in category.preview(CATEGORY_PREVIEW_LIMIT).iter().enumerate() {
            println!("  [{}] {} {}", index, video.title, video.duration_label);
        }
        if category.has_more(CATEGORY_PREVIEW_LIMIT) {
            println!(
                "  ... {} more",
                category.videos.len() - CATEGORY_PREVIEW_LIMIT
            );
        }
    }
}
