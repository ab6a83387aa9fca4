//! Path tokenizer
//!
//! Splits a field path such as `rows.*.['User Name']` or
//! `items.*.nested[key=x].value` into access tokens. Tokenizing never fails:
//! malformed bracket groups fall back to plain field text and empty segments
//! are skipped (the validator rejects `..` before mapping).
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

/// A single access step along a path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathToken {
    /// Direct property lookup
    Field(String),
    /// Iterate the current array, one row per element
    Wildcard,
    /// Property lookup written as `['name']` or `["name"]`
    BracketedField(String),
    /// First element of `array` whose `key` stringifies to `value`
    ArraySelector {
        array: String,
        key: String,
        value: String,
    },
}

impl PathToken {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, PathToken::Wildcard)
    }
}

impl fmt::Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathToken::Field(name) => write!(f, "{}", name),
            PathToken::Wildcard => write!(f, "*"),
            PathToken::BracketedField(name) => write!(f, "['{}']", name),
            PathToken::ArraySelector { array, key, value } => {
                write!(f, "{}[{}={}]", array, key, value)
            }
        }
    }
}

/// Tokenize a path string.
pub fn tokenize(path: &str) -> Vec<PathToken> {
    Tokenizer::new(path).run()
}

struct Tokenizer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    segment: String,
    tokens: Vec<PathToken>,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            segment: String::new(),
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<PathToken> {
        while let Some((position, ch)) = self.chars.next() {
            match ch {
                '.' => self.flush_segment(),
                '[' if matches!(self.chars.peek(), Some((_, '\'' | '"'))) => {
                    match self.read_bracketed(position) {
                        Some(name) => {
                            self.flush_segment();
                            self.tokens.push(PathToken::BracketedField(name));
                        }
                        None => self.segment.push(ch),
                    }
                }
                _ => self.segment.push(ch),
            }
        }
        self.flush_segment();
        self.tokens
    }

    /// Read `['name']` starting at the opening bracket. Returns `None` and
    /// consumes nothing when the group is not terminated.
    fn read_bracketed(&mut self, open: usize) -> Option<String> {
        let quote = self.input[open + 1..].chars().next()?;
        let name_start = open + 1 + quote.len_utf8();
        let closing = format!("{}]", quote);
        let name_len = self.input[name_start..].find(&closing)?;
        let end = name_start + name_len + closing.len();

        while let Some(&(i, _)) = self.chars.peek() {
            if i >= end {
                break;
            }
            self.chars.next();
        }

        Some(self.input[name_start..name_start + name_len].to_string())
    }

    fn flush_segment(&mut self) {
        if self.segment.is_empty() {
            return;
        }
        let segment = std::mem::take(&mut self.segment);
        let token = if segment == "*" {
            PathToken::Wildcard
        } else {
            parse_selector(&segment).unwrap_or(PathToken::Field(segment))
        };
        self.tokens.push(token);
    }
}

/// Parse `field[key=value]`. Field and key must be word characters.
fn parse_selector(segment: &str) -> Option<PathToken> {
    let inner_end = segment.strip_suffix(']')?;
    let open = inner_end.find('[')?;
    let array = &inner_end[..open];
    let (key, value) = inner_end[open + 1..].split_once('=')?;

    if !is_word(array) || !is_word(key) || value.is_empty() {
        return None;
    }

    Some(PathToken::ArraySelector {
        array: array.to_string(),
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> PathToken {
        PathToken::Field(name.to_string())
    }

    #[test]
    fn test_plain_and_wildcard() {
        assert_eq!(
            tokenize("rows.*.age"),
            vec![field("rows"), PathToken::Wildcard, field("age")]
        );
    }

    #[test]
    fn test_empty_path() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_bracketed_field_with_dots_and_spaces() {
        assert_eq!(
            tokenize("rows.*.['Application No.']"),
            vec![
                field("rows"),
                PathToken::Wildcard,
                PathToken::BracketedField("Application No.".to_string()),
            ]
        );
        assert_eq!(
            tokenize("rows.*[\"User Name\"]"),
            vec![
                field("rows"),
                PathToken::Wildcard,
                PathToken::BracketedField("User Name".to_string()),
            ]
        );
    }

    #[test]
    fn test_bracketed_star_is_literal() {
        assert_eq!(
            tokenize("a.['*']"),
            vec![field("a"), PathToken::BracketedField("*".to_string())]
        );
    }

    #[test]
    fn test_array_selector() {
        assert_eq!(
            tokenize("items.*.['Special!'].nested[key=x].value"),
            vec![
                field("items"),
                PathToken::Wildcard,
                PathToken::BracketedField("Special!".to_string()),
                PathToken::ArraySelector {
                    array: "nested".to_string(),
                    key: "key".to_string(),
                    value: "x".to_string(),
                },
                field("value"),
            ]
        );
    }

    #[test]
    fn test_selector_value_may_contain_symbols() {
        assert_eq!(
            tokenize("tests[code=CG-1 a]"),
            vec![PathToken::ArraySelector {
                array: "tests".to_string(),
                key: "code".to_string(),
                value: "CG-1 a".to_string(),
            }]
        );
    }

    #[test]
    fn test_malformed_selector_is_field() {
        assert_eq!(tokenize("a[=x]"), vec![field("a[=x]")]);
        assert_eq!(tokenize("a[b]"), vec![field("a[b]")]);
    }

    #[test]
    fn test_unterminated_bracket_is_field_text() {
        assert_eq!(tokenize("a.['b"), vec![field("a"), field("['b")]);
    }

    #[test]
    fn test_empty_segments_skipped() {
        assert_eq!(tokenize("a..b"), vec![field("a"), field("b")]);
    }

    #[test]
    fn test_display_round_trip_shape() {
        let tokens = tokenize("a.*.['b c'].d[k=v]");
        let rendered: Vec<String> = tokens.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["a", "*", "['b c']", "d[k=v]"]);
    }
}
