//! LIKE pattern parsing.
//!
//! Patterns use SQL syntax: `%` matches any run of characters (including
//! none), `_` matches exactly one character and `\` escapes the next
//! character. A trailing lone `\` is a literal backslash.
//!
//! Each backend renders the parsed tokens in its own syntax:
//!
//! | Backend | Rendering |
//! |---------|-----------|
//! | MongoDB, Memory | anchored regular expression ([`LikePattern::to_regex`]) |
//! | Elasticsearch, Solr | `*` / `?` wildcards ([`LikePattern::to_wildcard`]) |
//! | Couchbase | N1QL `LIKE` ([`LikePattern::to_sql_like`]) |
//! | Cassandra | [`PatternShape`] prefix, suffix or contains only |

use std::fmt;

/// One token of a parsed pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternToken {
    /// Literal text, already unescaped.
    Literal(String),
    /// `%`
    AnyRun,
    /// `_`
    AnyChar,
}

/// The structural shape of a pattern, used by backends with limited
/// pattern support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternShape {
    /// No wildcards.
    Exact(String),
    /// `abc%`
    Prefix(String),
    /// `%abc`
    Suffix(String),
    /// `%abc%`
    Contains(String),
    /// `%`
    Any,
    /// Anything else, including every pattern with `_`.
    Complex,
}

/// A parsed LIKE pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikePattern {
    source: String,
    tokens: Vec<PatternToken>,
}

impl LikePattern {
    /// Parses a pattern. Parsing never fails.
    pub fn parse(pattern: &str) -> Self {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars();

        while let Some(c) = chars.next() {
            match c {
                '\\' => literal.push(chars.next().unwrap_or('\\')),
                '%' | '_' => {
                    if !literal.is_empty() {
                        tokens.push(PatternToken::Literal(std::mem::take(&mut literal)));
                    }
                    if c == '_' {
                        tokens.push(PatternToken::AnyChar);
                    } else if tokens.last() != Some(&PatternToken::AnyRun) {
                        // Consecutive runs collapse
                        tokens.push(PatternToken::AnyRun);
                    }
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            tokens.push(PatternToken::Literal(literal));
        }

        Self {
            source: pattern.to_string(),
            tokens,
        }
    }

    /// The pattern as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[PatternToken] {
        &self.tokens
    }

    /// Returns true if the pattern contains any wildcard.
    pub fn has_wildcards(&self) -> bool {
        self.tokens
            .iter()
            .any(|token| !matches!(token, PatternToken::Literal(_)))
    }

    /// Classifies the pattern.
    pub fn shape(&self) -> PatternShape {
        use PatternToken::{AnyRun, Literal};

        match self.tokens.as_slice() {
            [] => PatternShape::Exact(String::new()),
            [Literal(s)] => PatternShape::Exact(s.clone()),
            [AnyRun] => PatternShape::Any,
            [Literal(s), AnyRun] => PatternShape::Prefix(s.clone()),
            [AnyRun, Literal(s)] => PatternShape::Suffix(s.clone()),
            [AnyRun, Literal(s), AnyRun] => PatternShape::Contains(s.clone()),
            _ => PatternShape::Complex,
        }
    }

    /// Renders an anchored regular expression. `.` is compiled to match
    /// newlines too, so `%` spans lines.
    pub fn to_regex(&self) -> String {
        let mut out = String::from("^");
        for token in &self.tokens {
            match token {
                PatternToken::Literal(s) => out.push_str(&regex::escape(s)),
                PatternToken::AnyRun => out.push_str("(?s:.*)"),
                PatternToken::AnyChar => out.push_str("(?s:.)"),
            }
        }
        out.push('$');
        out
    }

    /// Renders `*` / `?` wildcard syntax, escaping literals with `escape`.
    pub fn to_wildcard(&self, escape: impl Fn(&str) -> String) -> String {
        self.tokens
            .iter()
            .map(|token| match token {
                PatternToken::Literal(s) => escape(s),
                PatternToken::AnyRun => "*".to_string(),
                PatternToken::AnyChar => "?".to_string(),
            })
            .collect()
    }

    /// Renders SQL `LIKE` syntax with `\` as the escape character.
    pub fn to_sql_like(&self) -> String {
        self.tokens
            .iter()
            .map(|token| match token {
                PatternToken::Literal(s) => escape_chars(s, &['%', '_', '\\']),
                PatternToken::AnyRun => "%".to_string(),
                PatternToken::AnyChar => "_".to_string(),
            })
            .collect()
    }
}

impl fmt::Display for LikePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// Prefixes each of `special` in `s` with a backslash.
pub fn escape_chars(s: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tokens() {
        let pattern = LikePattern::parse("A%_b");
        assert_eq!(
            pattern.tokens(),
            &[
                PatternToken::Literal("A".to_string()),
                PatternToken::AnyRun,
                PatternToken::AnyChar,
                PatternToken::Literal("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_escapes_are_literal() {
        let pattern = LikePattern::parse(r"100\%");
        assert_eq!(pattern.shape(), PatternShape::Exact("100%".to_string()));
        assert!(!pattern.has_wildcards());
        assert_eq!(pattern.to_sql_like(), r"100\%");
    }

    #[test]
    fn test_shapes() {
        assert_eq!(
            LikePattern::parse("Ad%").shape(),
            PatternShape::Prefix("Ad".to_string())
        );
        assert_eq!(
            LikePattern::parse("%da").shape(),
            PatternShape::Suffix("da".to_string())
        );
        assert_eq!(
            LikePattern::parse("%%d%").shape(),
            PatternShape::Contains("d".to_string())
        );
        assert_eq!(LikePattern::parse("%").shape(), PatternShape::Any);
        assert_eq!(LikePattern::parse("A_a").shape(), PatternShape::Complex);
        assert_eq!(LikePattern::parse("A%d%a").shape(), PatternShape::Complex);
    }

    #[test]
    fn test_regex_is_anchored_and_escaped() {
        let regex = LikePattern::parse("a.b%").to_regex();
        assert_eq!(regex, r"^a\.b(?s:.*)$");
        let compiled = regex::Regex::new(&regex).unwrap();
        assert!(compiled.is_match("a.bcd"));
        assert!(!compiled.is_match("axbcd"));
        assert!(!compiled.is_match("za.b"));
    }

    #[test]
    fn test_wildcard_rendering() {
        let pattern = LikePattern::parse("J_n*%");
        let rendered = pattern.to_wildcard(|s| escape_chars(s, &['*', '?', '\\']));
        assert_eq!(rendered, r"J?n\**");
    }
}
