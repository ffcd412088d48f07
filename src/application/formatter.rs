//! Output formatting for quotes, categories and status notices.
//!
//! Every function renders an explicit snapshot passed in by the caller;
//! nothing here reads application state.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{CategoryFilter, Notice, NoticeLevel, Quote, Selection, SyncReport};

/// Output format options.
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Plain human-readable text.
    #[default]
    Text,
    /// JSON format for programmatic use.
    Json,
    /// Compact table listing.
    Table,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "table" => Ok(Self::Table),
            _ => Err(format!("Unknown format: {s}. Use: text, json, table")),
        }
    }
}

/// Formats a random pick.
///
/// # Errors
/// Returns error if JSON serialization fails.
pub fn format_selection(
    selection: &Selection,
    filter: &CategoryFilter,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match (selection, format) {
        (_, OutputFormat::Json) => serde_json::to_string_pretty(&selection.quote()),
        (Selection::Found(quote), OutputFormat::Table) => Ok(format_quotes_table(&[quote])),
        (Selection::Found(quote), OutputFormat::Text) => Ok(format_quote(quote)),
        (Selection::NoQuoteAvailable, _) => Ok(match filter {
            CategoryFilter::All => "No quotes available. Add one with `add`.".to_string(),
            CategoryFilter::Category(c) => format!("No quotes available in category '{c}'."),
        }),
    }
}

/// Formats a single quote for display.
#[must_use]
pub fn format_quote(quote: &Quote) -> String {
    if quote.category.is_empty() {
        format!("\"{}\"", quote.text)
    } else {
        format!(
            "\"{}\"\n{} {}",
            quote.text,
            "Category:".dimmed(),
            quote.category.cyan()
        )
    }
}

/// Formats a list of quotes.
///
/// # Errors
/// Returns error if JSON serialization fails.
pub fn format_quotes(quotes: &[&Quote], format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(quotes),
        OutputFormat::Table => Ok(format_quotes_table(quotes)),
        OutputFormat::Text => Ok(quotes
            .iter()
            .map(|q| format!("- {} [{}]", q.text, q.category.cyan()))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Formats a table listing of quotes.
#[must_use]
pub fn format_quotes_table(quotes: &[&Quote]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Category", "Quote"]);

    for (i, quote) in quotes.iter().enumerate() {
        table.add_row(vec![
            &(i + 1).to_string(),
            &quote.category,
            &truncate(&quote.text, 70),
        ]);
    }

    table.to_string()
}

/// Formats the category list, marking the active filter.
///
/// # Errors
/// Returns error if JSON serialization fails.
pub fn format_categories(
    categories: &[String],
    active: &CategoryFilter,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    if matches!(format, OutputFormat::Json) {
        return serde_json::to_string_pretty(categories);
    }

    let mark = |selected: bool| if selected { "*".green().bold() } else { " ".normal() };

    let mut lines = vec![format!("{} {}", mark(*active == CategoryFilter::All), "all")];
    lines.extend(categories.iter().map(|c| {
        let selected = matches!(active, CategoryFilter::Category(a) if a == c);
        format!("{} {}", mark(selected), c)
    }));

    Ok(lines.join("\n"))
}

/// Builds the status notice shown after a sync.
#[must_use]
pub fn sync_notice(report: &SyncReport) -> Notice {
    if report.changed() {
        Notice::success(format!(
            "Quotes synced with server: {} added, {} updated.",
            report.reconcile.added, report.reconcile.updated
        ))
    } else {
        Notice::info("Quotes are up to date.")
    }
}

/// Formats a one-off sync result: the report itself as JSON, otherwise its notice.
///
/// # Errors
/// Returns error if JSON serialization fails.
pub fn format_sync_report(
    report: &SyncReport,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report),
        OutputFormat::Text | OutputFormat::Table => Ok(format_notice(&sync_notice(report))),
    }
}

/// Formats a notice according to its level.
#[must_use]
pub fn format_notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Success => format!("{} {}", "✓".green().bold(), notice.message),
        NoticeLevel::Info => format!("{} {}", "ℹ".blue().bold(), notice.message),
        NoticeLevel::Error => format!("{} {}", "✗".red().bold(), notice.message),
    }
}

/// Truncates a string to max length with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let s = s.lines().next().unwrap_or(s);
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{cut}...")
    }
}
