//! Quote Keeper - a small quote manager for the terminal.
//!
//! Stores quote/category pairs in a local key/value database, shows a random
//! quote (optionally filtered by category), imports and exports the list as
//! JSON and syncs with a remote endpoint using remote-wins merging.
//!
//! QUICK START:
//!   quote-keeper random                  # Show a random quote
//!   quote-keeper add "Text" Category     # Add a quote
//!   quote-keeper filter Inspiration      # Remember a category filter
//!   quote-keeper export -o quotes.json   # Export the list
//!   quote-keeper daemon --interval 60    # Sync every minute

mod application;
mod cli;
mod domain;
mod infrastructure;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use tokio::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{
    categories, export_to_file, format_categories, format_notice, format_quote, format_quotes,
    format_selection, format_sync_report, import_from_file, last_filter, matching, pick_random,
    remember_filter, sync_notice, OutputFormat, QuoteRepository, QuoteStore, SyncService,
};
use cli::{Cli, Commands};
use domain::{AppConfig, AppError, CategoryFilter, Notice, SyncOutcome};
use infrastructure::{ensure_config_exists, load_config, HttpQuoteSource, LocalStorage};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        if e.is_validation() {
            eprintln!("{}", e.to_string().yellow());
        } else {
            eprintln!("{}", format_notice(&Notice::error(e.to_string())));
        }
        std::process::exit(1);
    }
}

/// Main application logic.
async fn run(cli: Cli) -> domain::Result<()> {
    let format = cli
        .output_format()
        .map_err(|e| AppError::Config { message: e })?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(infrastructure::config::config_file_path);
    if cli.config.is_none() {
        ensure_config_exists(&config_path)?;
    }
    let config = load_config(Some(config_path.as_path()))?;

    let storage = LocalStorage::open(&config.storage_db_path())?;
    let mut repo = QuoteRepository::open(QuoteStore::new(Box::new(storage)));

    match cli.command {
        Commands::Random { category } => cmd_random(&repo, category.as_deref(), format)?,
        Commands::Add { text, category } => cmd_add(&mut repo, &text, &category)?,
        Commands::SetCategory { text, category } => cmd_set_category(&mut repo, &text, &category)?,
        Commands::List { category } => cmd_list(&repo, category.as_deref(), format)?,
        Commands::Categories => cmd_categories(&repo, format)?,
        Commands::Filter { value } => cmd_filter(&repo, value.as_deref())?,
        Commands::Export { output } => cmd_export(&repo, &output)?,
        Commands::Import { file } => cmd_import(&mut repo, &file)?,
        Commands::Sync => cmd_sync(&config, repo, format).await?,
        Commands::Daemon { interval } => cmd_daemon(&config, repo, interval).await?,
        Commands::Paths => cmd_paths(&config, &config_path),
    }

    Ok(())
}

/// Resolve an explicit `--category` or fall back to the remembered filter.
fn resolve_filter(repo: &QuoteRepository, category: Option<&str>) -> CategoryFilter {
    category.map_or_else(|| last_filter(repo.storage()), CategoryFilter::from)
}

/// Show a random quote.
fn cmd_random(
    repo: &QuoteRepository,
    category: Option<&str>,
    format: OutputFormat,
) -> domain::Result<()> {
    let filter = resolve_filter(repo, category);
    let selection = pick_random(repo.all(), &filter);

    let output = format_selection(&selection, &filter, format).map_err(AppError::json_parse)?;
    println!("{output}");
    Ok(())
}

/// Add a quote and show it.
fn cmd_add(repo: &mut QuoteRepository, text: &str, category: &str) -> domain::Result<()> {
    let duplicate = repo.find_by_text(text.trim()).is_some();

    let quote = repo.add(text, category)?;
    println!("{}", format_quote(&quote));

    let notice = if duplicate {
        Notice::info("Quote added (the same text already existed).")
    } else {
        Notice::success("Quote added.")
    };
    println!("{}", format_notice(&notice));
    Ok(())
}

/// Recategorize an existing quote.
fn cmd_set_category(repo: &mut QuoteRepository, text: &str, category: &str) -> domain::Result<()> {
    let category = category.trim();
    if repo.find_by_text(text).is_none() {
        return Err(AppError::InvalidData {
            message: format!("Quote not found: {text}"),
        });
    }

    let notice = if repo.replace_category(text, category)? {
        Notice::success(format!("Category changed to '{category}'."))
    } else {
        Notice::info(format!("Quote is already in '{category}'."))
    };
    println!("{}", format_notice(&notice));
    Ok(())
}

/// List quotes matching a category.
fn cmd_list(
    repo: &QuoteRepository,
    category: Option<&str>,
    format: OutputFormat,
) -> domain::Result<()> {
    let filter = resolve_filter(repo, category);
    let quotes = matching(repo.all(), &filter);

    if quotes.is_empty() && !matches!(format, OutputFormat::Json) {
        println!("No quotes in '{filter}'.");
        return Ok(());
    }

    let output = format_quotes(&quotes, format).map_err(AppError::json_parse)?;
    println!("{output}");
    Ok(())
}

/// List distinct categories.
fn cmd_categories(repo: &QuoteRepository, format: OutputFormat) -> domain::Result<()> {
    let list = categories(repo.all());
    let active = last_filter(repo.storage());

    let output = format_categories(&list, &active, format).map_err(AppError::json_parse)?;
    println!("{output}");
    Ok(())
}

/// Show or set the remembered filter.
fn cmd_filter(repo: &QuoteRepository, value: Option<&str>) -> domain::Result<()> {
    let Some(value) = value else {
        println!("{}", last_filter(repo.storage()));
        return Ok(());
    };

    let filter = CategoryFilter::from(value);
    remember_filter(repo.storage(), &filter)?;

    let known = match &filter {
        CategoryFilter::All => true,
        CategoryFilter::Category(c) => categories(repo.all()).contains(c),
    };
    let notice = if known {
        Notice::success(format!("Filter set to '{filter}'."))
    } else {
        Notice::info(format!("Filter set to '{filter}' (no quotes in it yet)."))
    };
    println!("{}", format_notice(&notice));
    Ok(())
}

/// Export quotes to a JSON file.
fn cmd_export(repo: &QuoteRepository, output: &Path) -> domain::Result<()> {
    let notice = export_to_file(repo, output)?;
    println!("{}", format_notice(&notice));
    Ok(())
}

/// Import quotes from a JSON file.
fn cmd_import(repo: &mut QuoteRepository, file: &Path) -> domain::Result<()> {
    let notice = import_from_file(repo, file)?;
    println!("{}", format_notice(&notice));
    Ok(())
}

/// Build the sync service around the repository.
fn sync_service(config: &AppConfig, repo: QuoteRepository) -> domain::Result<SyncService> {
    let source = HttpQuoteSource::new(&config.sync)?;
    Ok(SyncService::new(
        Arc::new(Mutex::new(repo)),
        Arc::new(source),
    ))
}

/// Sync once.
async fn cmd_sync(
    config: &AppConfig,
    repo: QuoteRepository,
    format: OutputFormat,
) -> domain::Result<()> {
    let service = sync_service(config, repo)?;

    if let SyncOutcome::Completed(report) = service.sync_now().await {
        let output = format_sync_report(&report, format).map_err(AppError::json_parse)?;
        println!("{output}");
    }
    Ok(())
}

/// Sync periodically until Ctrl-C.
async fn cmd_daemon(
    config: &AppConfig,
    repo: QuoteRepository,
    interval: Option<u64>,
) -> domain::Result<()> {
    if !config.sync.enabled {
        return Err(AppError::Config {
            message: "Sync is disabled in configuration".into(),
        });
    }

    let period = interval.map_or_else(|| config.sync.interval(), Duration::from_secs);
    if period.is_zero() {
        return Err(AppError::Config {
            message: "Sync interval must be at least 1 second".into(),
        });
    }

    let service = Arc::new(sync_service(config, repo)?);
    let mut states = service.subscribe();
    let mut task = service.spawn_periodic(period);

    println!(
        "{} Syncing with {} every {}s (Ctrl-C to stop)",
        "⟳".cyan().bold(),
        config.sync.endpoint,
        period.as_secs()
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut last_notice: Option<Notice> = None;

    loop {
        tokio::select! {
            result = &mut shutdown => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
                }
                break;
            }
            Ok(()) = states.changed() => {
                tracing::debug!(state = %*states.borrow_and_update(), "Sync state changed");
            }
            report = task.next_report() => {
                let Some(report) = report else { break };
                let notice = sync_notice(&report);
                // Unchanged runs only speak up once the previous notice has cleared.
                let visible = last_notice
                    .as_ref()
                    .is_some_and(|n| !n.is_expired_at(notice.created_at));
                if report.changed() || !visible {
                    println!("{}", format_notice(&notice));
                    last_notice = Some(notice);
                } else {
                    tracing::info!("No changes from server");
                }
            }
        }
    }

    tracing::debug!(state = %service.state(), "Stopping periodic sync");
    task.cancel().await;
    println!("{} Sync stopped", "■".yellow());
    Ok(())
}

/// Show data and config paths.
fn cmd_paths(config: &AppConfig, config_path: &Path) {
    println!("{}", "📂 Quote Keeper Paths".bold());
    println!();
    println!("  Data dir: {}", config.data_dir().display());
    println!("  Storage:  {}", config.storage_db_path().display());
    println!("  Config:   {}", display_path(config_path));
}

fn display_path(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} {}", path.display(), "(missing)".dimmed())
    }
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
