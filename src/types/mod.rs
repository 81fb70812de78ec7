use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Byte range in a source document, half-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<std::ops::Range<usize>> for Range {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Key of a hintable token.
///
/// Numbers compare and hash by bit pattern, with `-0.0` folded into `0.0`,
/// so they can key a map alongside strings.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TokenValue {
    String(String),
    Number(f64),
}

impl TokenValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::String(_) => None,
        }
    }

    fn number_bits(n: f64) -> u64 {
        if n == 0.0 { 0 } else { n.to_bits() }
    }
}

impl PartialEq for TokenValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => Self::number_bits(*a) == Self::number_bits(*b),
            _ => false,
        }
    }
}

impl Eq for TokenValue {}

impl Hash for TokenValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::String(s) => {
                0u8.hash(state);
                s.hash(state);
            }
            Self::Number(n) => {
                1u8.hash(state);
                Self::number_bits(*n).hash(state);
            }
        }
    }
}

impl PartialOrd for TokenValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Strings order lexicographically, numbers by `total_cmp`, numbers first.
impl Ord for TokenValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match (self, other) {
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => {
                if self == other {
                    Ordering::Equal
                } else {
                    a.total_cmp(b)
                }
            }
            (Self::Number(_), Self::String(_)) => Ordering::Less,
            (Self::String(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for TokenValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for TokenValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for TokenValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Kind tag attached to literal tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralKind {
    String,
    Number,
}

impl LiteralKind {
    pub fn of(value: &TokenValue) -> Self {
        match value {
            TokenValue::String(_) => Self::String,
            TokenValue::Number(_) => Self::Number,
        }
    }
}

/// Where a token came from, for consumers that rank or filter hints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum TokenAnnotation {
    Global,
    Path { dir: String, file: String },
    Literal { kind: LiteralKind },
}

/// A hintable vocabulary item and every byte offset where it occurs.
///
/// `positions` is always sorted ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub value: TokenValue,
    pub positions: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<TokenAnnotation>,
}

impl Token {
    /// Build a token, sorting `positions` if needed.
    pub fn new(value: impl Into<TokenValue>, mut positions: Vec<usize>) -> Self {
        if !positions.is_sorted() {
            positions.sort_unstable();
        }
        Self {
            value: value.into(),
            positions,
            annotation: None,
        }
    }

    /// Token with no recorded occurrences (vocabulary, declared globals).
    pub fn bare(value: impl Into<TokenValue>) -> Self {
        Self::new(value, Vec::new())
    }

    pub fn with_annotation(mut self, annotation: TokenAnnotation) -> Self {
        self.annotation = Some(annotation);
        self
    }
}

/// Object name -> property name -> observed access count.
///
/// Counts are always at least 1; a missing entry means no observation.
pub type AssociationTable = BTreeMap<String, BTreeMap<String, u32>>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_sorts_positions() {
        let token = Token::new("x", vec![12, 3, 7]);
        assert_eq!(token.positions, vec![3, 7, 12]);
        assert!(token.annotation.is_none());
    }

    #[test]
    fn test_bare_token_has_no_positions() {
        let token = Token::bare("require");
        assert!(token.positions.is_empty());
        assert_eq!(token.value.as_str(), Some("require"));
    }

    #[test]
    fn test_number_values_hash_by_value() {
        let mut set = HashSet::new();
        set.insert(TokenValue::Number(0.0));
        set.insert(TokenValue::Number(-0.0));
        set.insert(TokenValue::Number(1.5));
        set.insert(TokenValue::String("1.5".into()));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_token_value_serializes_untagged() {
        let json = serde_json::to_string(&Token::new(42.0, vec![1])).unwrap();
        assert_eq!(json, r#"{"value":42.0,"positions":[1]}"#);

        let json = serde_json::to_string(
            &Token::bare("foo").with_annotation(TokenAnnotation::Global),
        )
        .unwrap();
        assert_eq!(
            json,
            r#"{"value":"foo","positions":[],"annotation":{"origin":"global"}}"#
        );
    }

    #[test]
    fn test_range_contains_is_half_open() {
        let range = Range::new(4, 8);
        assert!(range.contains(4));
        assert!(range.contains(7));
        assert!(!range.contains(8));
        assert_eq!(range.len(), 4);
    }
}
