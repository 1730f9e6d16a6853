//! Fixed multi-word type-phrase table.
//!
//! The grammar recognizes a closed set of multi-word type names. The table is
//! consulted only where a *type* token is expected, never for field names,
//! and it is not extensible: registering a custom type under a multi-word
//! name does not teach the grammar to recognize that phrase.

use crate::lexer::token::{Token, TokenKind};

/// Known phrases and their canonical type names.
const PHRASES: &[(&[&str], &str)] = &[
    (
        &["timestamp", "with", "time", "zone"],
        "timestamp with time zone",
    ),
    (&["time", "with", "time", "zone"], "time with time zone"),
    (&["interval", "year", "to", "month"], "interval year to month"),
    (&["interval", "day", "to", "second"], "interval day to second"),
    (&["double", "precision"], "double"),
];

/// Attempts the longest phrase match against the unquoted identifier tokens
/// starting at `pos`. Word matching is ASCII case-insensitive. Returns the
/// canonical name and the number of tokens the phrase covers.
pub fn longest_match(tokens: &[Token], pos: usize) -> Option<(&'static str, usize)> {
    let mut best: Option<(&'static str, usize)> = None;
    for (words, canonical) in PHRASES {
        if words.len() <= best.map_or(0, |(_, len)| len) {
            continue;
        }
        if matches_at(tokens, pos, words) {
            best = Some((canonical, words.len()));
        }
    }
    best
}

fn matches_at(tokens: &[Token], pos: usize, words: &[&str]) -> bool {
    words.iter().enumerate().all(|(offset, word)| {
        matches!(
            tokens.get(pos + offset),
            Some(Token {
                kind: TokenKind::Identifier(text),
                ..
            }) if text.eq_ignore_ascii_case(word)
        )
    })
}
