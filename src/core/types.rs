// src/core/types.rs
/// Index of a node inside a `KeystrokeTrie` arena.
pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A single-character unit found in `definitions`.
    Normal,
    /// A two-character unit found in `definitions` (e.g. "しゃ").
    Palatalized,
    /// The gemination marker (sokuon).
    Gemination,
    /// The nasal marker (hatsuon).
    Nasal,
    /// Anything the table does not know; typed literally.
    Symbol,
}

/// One segment of a phonetic string, produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Self { text: text.into(), kind }
    }
}

/// Result of feeding one keystroke to a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    Correct,
    Incorrect,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeState {
    InProgress,
    Finished,
}
