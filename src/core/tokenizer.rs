// File: src/core/tokenizer.rs
use crate::core::rules::{ConversionRuleTable, MAX_UNIT_CHARS};
use crate::core::types::{Token, TokenKind};

/// Segments a phonetic string into tokens.
///
/// Single left-to-right pass. Markers win over table lookups, and a
/// two-character unit wins over a one-character one.
pub fn tokenize(phonetic: &str, table: &ConversionRuleTable) -> Vec<Token> {
    let chars: Vec<char> = phonetic.chars().collect();
    let gemination = table.gemination().marker;
    let nasal = table.nasal().marker;

    let mut tokens = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == gemination {
            tokens.push(Token::new(c.to_string(), TokenKind::Gemination));
            i += 1;
            continue;
        }
        if c == nasal {
            tokens.push(Token::new(c.to_string(), TokenKind::Nasal));
            i += 1;
            continue;
        }

        if i + MAX_UNIT_CHARS <= chars.len() {
            let pair: String = chars[i..i + MAX_UNIT_CHARS].iter().collect();
            if table.contains_unit(&pair) {
                tokens.push(Token::new(pair, TokenKind::Palatalized));
                i += MAX_UNIT_CHARS;
                continue;
            }
        }

        let single = c.to_string();
        let kind = if table.contains_unit(&single) {
            TokenKind::Normal
        } else {
            TokenKind::Symbol
        };
        tokens.push(Token::new(single, kind));
        i += 1;
    }
    tokens
}
