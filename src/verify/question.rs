//! Question normalization and shape detection
//!
//! Normalization: lowercase, punctuation becomes a separator, whitespace
//! collapses. `.`, `_`, `-` and `/` survive only between two alphanumerics,
//! so "3.3", "vcc_io" and "reset/n" stay single tokens.
//!
//! Stored facts are never normalized in place; labels and values are run
//! through the same function only when compared.

use std::sync::OnceLock;

use regex::Regex;

/// Words that carry no lookup meaning
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "at", "by", "can", "do", "does", "document", "for", "from", "give",
    "how", "in", "is", "it", "its", "me", "much", "of", "on", "or", "please", "show", "tell",
    "that", "the", "this", "to", "value", "was", "what", "whats", "which", "with",
];

/// Words allowed between "pin" and its key
const IDENTIFIER_FILLERS: &[&str] = &["number", "no", "num", "is", "for", "of", "the"];

fn is_joiner(c: char) -> bool {
    matches!(c, '.' | '_' | '-' | '/')
}

/// Normalizes text for matching
pub fn normalize(text: &str) -> String {
    let chars: Vec<char> = text.to_lowercase().chars().collect();
    let mut out = String::with_capacity(chars.len());

    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() {
            out.push(c);
        } else if is_joiner(c)
            && i > 0
            && i + 1 < chars.len()
            && chars[i - 1].is_alphanumeric()
            && chars[i + 1].is_alphanumeric()
        {
            out.push(c);
        } else {
            out.push(' ');
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes then splits into tokens
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text).split(' ').filter(|t| !t.is_empty()).map(String::from).collect()
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// True if the token is a plain number ("5", "3.3")
pub fn is_number(token: &str) -> bool {
    token.parse::<f64>().is_ok()
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:^| )pins? (?:(?:number|no|num|is|for|of|the) )*([^ ]+)")
            .expect("identifier pattern is a valid regex")
    })
}

/// A normalized question. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    raw: String,
    normalized: String,
    tokens: Vec<String>,
}

impl Question {
    pub fn parse(raw: &str) -> Self {
        let normalized = normalize(raw);
        let tokens = normalized
            .split(' ')
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();
        Self {
            raw: raw.to_string(),
            normalized,
            tokens,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens that are not stopwords, in question order
    pub fn content_tokens(&self) -> Vec<&str> {
        self.tokens
            .iter()
            .map(String::as_str)
            .filter(|t| !is_stopword(t))
            .collect()
    }

    /// True if `phrase` occurs as a contiguous token run
    pub fn contains_phrase(&self, phrase: &[String]) -> bool {
        if phrase.is_empty() || phrase.len() > self.tokens.len() {
            return false;
        }
        self.tokens.windows(phrase.len()).any(|w| w == phrase)
    }

    /// Key named by an identifier pattern ("pin 5", "pin number 5", "which pin is vcc").
    ///
    /// Returns the first such key; a dangling "pin" yields None.
    pub fn identifier_key(&self) -> Option<&str> {
        let caps = identifier_pattern().captures(&self.normalized)?;
        let key = caps.get(1)?.as_str();
        if IDENTIFIER_FILLERS.contains(&key) {
            return None;
        }
        Some(key)
    }
}
