//! Query classification
//!
//! Only needed to decide whether a query may have changed the schema
//! dictionaries. Keywords inside string literals and backtick-quoted names
//! are not counted.

const MUTATING_KEYWORDS: &[&str] = &["CREATE", "MERGE", "DELETE", "DETACH", "SET", "REMOVE"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Cannot add or remove labels, property keys or relationship types
    Read,
    /// May introduce or drop schema entries
    Write,
}

impl QueryKind {
    pub fn classify(query: &str) -> Self {
        if keywords(query).any(|word| {
            MUTATING_KEYWORDS
                .iter()
                .any(|kw| word.eq_ignore_ascii_case(kw))
        }) {
            QueryKind::Write
        } else {
            QueryKind::Read
        }
    }

    pub fn is_mutating(self) -> bool {
        self == QueryKind::Write
    }
}

/// Bare words of `query` outside quotes, skipping `.property` accesses
fn keywords(query: &str) -> impl Iterator<Item = &str> {
    let mut words = Vec::new();
    let mut quote: Option<char> = None;
    let mut start: Option<usize> = None;
    let mut after_dot = false;
    let mut prev: Option<char> = None;

    for (i, c) in query.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            prev = Some(c);
            continue;
        }
        if c.is_alphanumeric() || c == '_' {
            if start.is_none() {
                start = Some(i);
                after_dot = prev == Some('.');
            }
            prev = Some(c);
            continue;
        }
        if let Some(s) = start.take() {
            if !after_dot {
                words.push(&query[s..i]);
            }
        }
        if matches!(c, '\'' | '"' | '`') {
            quote = Some(c);
        }
        prev = Some(c);
    }
    if let (Some(s), None, false) = (start, quote, after_dot) {
        words.push(&query[s..]);
    }

    words.into_iter()
}
