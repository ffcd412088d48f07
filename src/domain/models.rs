//! Domain models for quotes and category filters.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{AppError, Result};

/// Minimum trimmed length of a user-entered quote text.
pub const MIN_TEXT_LEN: usize = 3;

/// Minimum trimmed length of a user-entered category.
pub const MIN_CATEGORY_LEN: usize = 2;

/// Sentinel filter value meaning "every category".
pub const ALL_CATEGORIES: &str = "all";

/// How long a status notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

/// A quote record. Identity is the exact `text`.
///
/// Deserialization never fails on a well-formed JSON value: missing or
/// null fields become empty strings, scalars are stringified and
/// non-object items load as an empty quote. Bounds are only checked on
/// manual entry via [`Quote::validated`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Quote {
    pub text: String,
    pub category: String,
}

impl From<Value> for Quote {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self {
                text: loose_string(map.get("text")),
                category: loose_string(map.get("category")),
            },
            _ => Self::default(),
        }
    }
}

fn loose_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl Quote {
    /// Create a quote without any validation.
    #[must_use]
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Build a quote from user input, trimming both fields.
    ///
    /// # Errors
    /// Returns `AppError::Validation` when the trimmed text is shorter than
    /// [`MIN_TEXT_LEN`] or the trimmed category is shorter than
    /// [`MIN_CATEGORY_LEN`]. Text is checked first.
    pub fn validated(text: &str, category: &str) -> Result<Self> {
        let text = text.trim();
        let category = category.trim();

        if text.chars().count() < MIN_TEXT_LEN {
            return Err(AppError::Validation {
                field: "text",
                message: format!("Quote must be at least {MIN_TEXT_LEN} characters."),
            });
        }
        if category.chars().count() < MIN_CATEGORY_LEN {
            return Err(AppError::Validation {
                field: "category",
                message: format!("Category must be at least {MIN_CATEGORY_LEN} characters."),
            });
        }

        Ok(Self::new(text, category))
    }
}

/// The seed list written on first run or after corruption.
#[must_use]
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote::new("Be yourself; everyone else is already taken.", "Inspiration"),
        Quote::new("Simplicity is the soul of efficiency.", "Productivity"),
        Quote::new("In the middle of difficulty lies opportunity.", "Resilience"),
    ]
}

/// Category restriction applied to selection and listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No restriction.
    #[default]
    All,
    /// Exact, case-sensitive category match.
    Category(String),
}

impl CategoryFilter {
    /// Whether a quote passes this filter.
    #[must_use]
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            Self::All => true,
            Self::Category(c) => quote.category == *c,
        }
    }

    /// The raw value persisted for this filter.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Category(c) => c,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        if value == ALL_CATEGORIES || value.is_empty() {
            Self::All
        } else {
            Self::Category(value.to_string())
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a random pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A quote was drawn from the candidate set.
    Found(Quote),
    /// The candidate set was empty.
    NoQuoteAvailable,
}

impl Selection {
    /// The selected quote, if any.
    #[must_use]
    pub const fn quote(&self) -> Option<&Quote> {
        match self {
            Self::Found(q) => Some(q),
            Self::NoQuoteAvailable => None,
        }
    }
}

/// Severity of a status notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A transient status message shown after sync, import or export.
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    pub created_at: Instant,
}

impl Notice {
    /// Create a notice stamped with the current instant.
    #[must_use]
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
            created_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    /// Whether the notice should have cleared by `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= NOTICE_TTL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_trims_fields() {
        let q = Quote::validated("  Stay hungry  ", " Life ").unwrap();
        assert_eq!(q.text, "Stay hungry");
        assert_eq!(q.category, "Life");
    }

    #[test]
    fn test_validated_rejects_short_text_first() {
        let err = Quote::validated(" ab ", "x").unwrap_err();
        assert!(matches!(err, AppError::Validation { field: "text", .. }));
        assert_eq!(err.to_string(), "Quote must be at least 3 characters.");
    }

    #[test]
    fn test_validated_rejects_short_category() {
        let err = Quote::validated("Long enough", " a ").unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation {
                field: "category",
                ..
            }
        ));
    }

    #[test]
    fn test_quote_missing_fields_default() {
        let q: Quote = serde_json::from_str(r#"{"text":"only text"}"#).unwrap();
        assert_eq!(q.category, "");
    }

    #[test]
    fn test_quote_loads_loose_items() {
        let quotes: Vec<Quote> = serde_json::from_str(
            r#"[1, "x", null, {"text":"Hi there","category":null}, {"text":42,"category":true}]"#,
        )
        .unwrap();

        assert_eq!(
            quotes,
            vec![
                Quote::default(),
                Quote::default(),
                Quote::default(),
                Quote::new("Hi there", ""),
                Quote::new("42", "true"),
            ]
        );
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!(CategoryFilter::from("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::from(""), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from("Misc"),
            CategoryFilter::Category("Misc".into())
        );
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        let filter = CategoryFilter::from("misc");
        assert!(!filter.matches(&Quote::new("Hello", "Misc")));
        assert!(filter.matches(&Quote::new("Hello", "misc")));
    }

    #[test]
    fn test_notice_expiry() {
        let notice = Notice::info("Synced");
        assert!(!notice.is_expired_at(notice.created_at));
        assert!(notice.is_expired_at(notice.created_at + NOTICE_TTL));
    }
}
