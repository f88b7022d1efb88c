//! Named route captures and query string parsing.
//!
//! - [`RouteParams`]: captures of `{name}` placeholders, keyed by name. The
//!   positional captures live in [`Page::params`](crate::Page::params); this
//!   map is the by-name view of the same match.
//! - [`QueryParams`]: the `?key=value&flag` part of the address. A key without
//!   `=value` is a [`QueryValue::Flag`].
//!
//! # Example
//!
//! ```
//! use spa_navigator::{QueryParams, QueryValue};
//!
//! let query = QueryParams::parse("?page=2&draft&=ignored");
//! assert_eq!(query.get("page"), Some(&QueryValue::Text("2".into())));
//! assert_eq!(query.get("draft"), Some(&QueryValue::Flag));
//! assert_eq!(query.get_as::<u32>("page"), Some(2));
//! assert_eq!(query.len(), 2);
//! ```

use std::borrow::Cow;
use std::collections::HashMap;

/// Captures of named placeholders.
///
/// ```
/// use spa_navigator::RouteParams;
///
/// let mut params = RouteParams::new();
/// params.insert("id".to_string(), "42".to_string());
/// assert_eq!(params.get_as::<u64>("id"), Some(42));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    params: HashMap<String, String>,
}

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a capture by placeholder name.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.params.get(key)
    }

    /// Get a capture and parse it.
    ///
    /// Returns `None` if the capture doesn't exist or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.params.get(key)?.parse().ok()
    }

    pub fn insert(&mut self, key: String, value: String) {
        self.params.insert(key, value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.params.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Value of a query key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// `key=value`
    Text(String),
    /// `key` with no `=value`.
    Flag,
}

impl QueryValue {
    /// The text value, or `None` for a flag.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            QueryValue::Text(text) => Some(text),
            QueryValue::Flag => None,
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, QueryValue::Flag)
    }
}

/// Query parameters of the current address.
///
/// A repeated key keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: HashMap<String, QueryValue>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string. The leading `?` is optional.
    ///
    /// Keys and values are percent-decoded; text that is not valid UTF-8 once
    /// decoded is kept as written. Pairs with an empty key are dropped.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = HashMap::new();

        for pair in query.split('&') {
            let (key, value) = match pair.split_once('=') {
                Some((key, value)) => (key, QueryValue::Text(decode(value).into_owned())),
                None => (pair, QueryValue::Flag),
            };
            if key.is_empty() {
                continue;
            }
            params.insert(decode(key).into_owned(), value);
        }

        Self { params }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.params.get(key)
    }

    /// The text value of `key`, `None` when missing or a flag.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.params.get(key)?.as_text()
    }

    /// Parse the text value of `key`.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.get_text(key)?.parse().ok()
    }

    /// `true` when `key` is present, either as a flag or with a value.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn insert(&mut self, key: String, value: QueryValue) {
        self.params.insert(key, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &QueryValue)> {
        self.params.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }
}

fn decode(text: &str) -> Cow<'_, str> {
    urlencoding::decode(text).unwrap_or(Cow::Borrowed(text))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_params_basic() {
        let mut params = RouteParams::new();
        params.insert("id".to_string(), "123".to_string());

        assert_eq!(params.get("id"), Some(&"123".to_string()));
        assert_eq!(params.get_as::<i32>("id"), Some(123));
        assert!(params.contains("id"));
        assert!(!params.contains("missing"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_query_text_and_flag() {
        let query = QueryParams::parse("a=1&b");
        assert_eq!(query.get("a"), Some(&QueryValue::Text("1".to_string())));
        assert_eq!(query.get("b"), Some(&QueryValue::Flag));
        assert_eq!(query.len(), 2);
    }

    #[test]
    fn test_query_leading_question_mark_is_optional() {
        assert_eq!(QueryParams::parse("?tab=info"), QueryParams::parse("tab=info"));
    }

    #[test]
    fn test_query_empty_keys_dropped() {
        let query = QueryParams::parse("=1&&x=2&=");
        assert_eq!(query.len(), 1);
        assert_eq!(query.get_text("x"), Some("2"));
    }

    #[test]
    fn test_empty_query_string() {
        assert!(QueryParams::parse("").is_empty());
        assert!(QueryParams::parse("?").is_empty());
    }

    #[test]
    fn test_query_decoding() {
        let query = QueryParams::parse("first%20name=J%C3%BCrgen&q=a+b");
        assert_eq!(query.get_text("first name"), Some("Jürgen"));
        // '+' is not a space outside form encoding
        assert_eq!(query.get_text("q"), Some("a+b"));
    }

    #[test]
    fn test_query_invalid_escape_kept_raw() {
        let query = QueryParams::parse("bad=%FF");
        assert_eq!(query.get_text("bad"), Some("%FF"));
    }

    #[test]
    fn test_query_last_duplicate_wins() {
        let query = QueryParams::parse("sort=name&sort=date");
        assert_eq!(query.get_text("sort"), Some("date"));
    }

    #[test]
    fn test_query_get_as_ignores_flags() {
        let query = QueryParams::parse("page=3&all");
        assert_eq!(query.get_as::<u8>("page"), Some(3));
        assert_eq!(query.get_as::<u8>("all"), None);
        assert!(query.contains("all"));
        assert!(query.get("all").unwrap().is_flag());
    }
}
