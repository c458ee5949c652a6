//! Data models for Quotebook
//!
//! Defines the core data structures: Quote, Filter and the sync conflict record.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A quote with its category
///
/// Two quotes are the "same quote" for sync purposes when their `text`
/// fields are byte-for-byte equal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Quote {
    /// The quote itself
    pub text: String,
    /// Category used for filtering
    pub category: String,
}

impl Quote {
    /// Create a quote without validation
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Convert an arbitrary JSON value into a quote without rejecting it
    ///
    /// Objects contribute their `text` and `category` members; missing
    /// members become empty strings and non-string members are rendered as
    /// JSON text. Any other value becomes the text of an uncategorized quote.
    pub fn from_value_lossy(value: &Value) -> Self {
        match value {
            Value::Object(fields) => Self {
                text: fields.get("text").map(value_to_text).unwrap_or_default(),
                category: fields
                    .get("category")
                    .map(value_to_text)
                    .unwrap_or_default(),
            },
            other => Self::new(value_to_text(other), ""),
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" — {}", self.text, self.category)
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// The quotes a fresh collection starts with
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote::new(
            "The best way to predict the future is to create it.",
            "Motivation",
        ),
        Quote::new(
            "Life is what happens when you're busy making other plans.",
            "Life",
        ),
        Quote::new("Happiness depends upon ourselves.", "Philosophy"),
    ]
}

/// Sentinel filter value matching every category
pub const ALL_CATEGORIES: &str = "all";

/// Active category restriction
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    /// No restriction
    #[default]
    All,
    /// Only quotes in this category
    Category(String),
}

impl Filter {
    /// Parse a stored or user-supplied filter value
    ///
    /// Any string other than the `"all"` sentinel is taken as a category,
    /// even if no quote currently carries it.
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            Filter::All
        } else {
            Filter::Category(value.to_string())
        }
    }

    /// The persisted string form
    pub fn as_str(&self) -> &str {
        match self {
            Filter::All => ALL_CATEGORIES,
            Filter::Category(category) => category,
        }
    }

    /// Whether `quote` passes this filter
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            Filter::All => true,
            Filter::Category(category) => quote.category == *category,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a pending conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConflictId(Uuid);

impl ConflictId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConflictId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConflictId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A remote quote whose text matches a local one, awaiting a decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub id: ConflictId,
    /// The local quote as it was when the conflict was raised
    pub local: Quote,
    /// The incoming remote quote
    pub server: Quote,
    /// Position of `local` in the collection when the conflict was raised
    pub index: usize,
}

impl ConflictRecord {
    pub fn new(local: Quote, server: Quote, index: usize) -> Self {
        Self {
            id: ConflictId::new(),
            local,
            server,
            index,
        }
    }

    /// Whether the two sides actually disagree
    pub fn differs(&self) -> bool {
        self.local != self.server
    }
}

/// How a conflict should be settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// Keep the local quote and drop the remote one
    KeepLocal,
    /// Overwrite the local quote with the remote one
    KeepServer,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_quotes() {
        let quotes = default_quotes();
        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes[0].category, "Motivation");
        assert_eq!(quotes[1].category, "Life");
        assert_eq!(quotes[2].category, "Philosophy");
    }

    #[test]
    fn test_quote_serializes_with_plain_field_names() {
        let quote = Quote::new("A", "X");
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json, json!({"text": "A", "category": "X"}));
    }

    #[test]
    fn test_from_value_lossy_object() {
        let quote = Quote::from_value_lossy(&json!({"text": "A", "category": "X", "extra": 1}));
        assert_eq!(quote, Quote::new("A", "X"));
    }

    #[test]
    fn test_from_value_lossy_missing_and_odd_fields() {
        let quote = Quote::from_value_lossy(&json!({"text": 42}));
        assert_eq!(quote, Quote::new("42", ""));

        let quote = Quote::from_value_lossy(&json!({"category": null}));
        assert_eq!(quote, Quote::new("", ""));
    }

    #[test]
    fn test_from_value_lossy_non_object() {
        assert_eq!(
            Quote::from_value_lossy(&json!("just text")),
            Quote::new("just text", "")
        );
        assert_eq!(Quote::from_value_lossy(&json!(7)), Quote::new("7", ""));
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!(Filter::parse("all"), Filter::All);
        assert_eq!(Filter::parse("Life"), Filter::Category("Life".to_string()));
        // Sentinel is case sensitive
        assert_eq!(Filter::parse("All"), Filter::Category("All".to_string()));
    }

    #[test]
    fn test_filter_matches() {
        let quote = Quote::new("A", "Life");
        assert!(Filter::All.matches(&quote));
        assert!(Filter::parse("Life").matches(&quote));
        assert!(!Filter::parse("Motivation").matches(&quote));
    }

    #[test]
    fn test_filter_as_str_roundtrip() {
        for value in ["all", "Life", "Server"] {
            assert_eq!(Filter::parse(value).as_str(), value);
        }
    }

    #[test]
    fn test_conflict_ids_unique() {
        let a = ConflictRecord::new(Quote::new("A", "X"), Quote::new("A", "Y"), 0);
        let b = ConflictRecord::new(Quote::new("A", "X"), Quote::new("A", "Y"), 0);
        assert_ne!(a.id, b.id);
        assert!(a.differs());
    }

    #[test]
    fn test_display() {
        assert_eq!(Quote::new("Hi", "Life").to_string(), "\"Hi\" — Life");
    }
}
