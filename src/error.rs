// File: src/error.rs
use thiserror::Error;

/// Everything that can go wrong while loading data or driving a challenge.
///
/// A wrong keystroke is not an error; it is `InputResult::Incorrect`.
#[derive(Debug, Error)]
pub enum TypingError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed rule table json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("progress file encoding: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("invalid rule table: {reason}")]
    InvalidRuleTable { reason: String },

    /// A Normal or Palatalized unit has no entry in `definitions`.
    #[error("no keystroke definition for unit '{unit}'")]
    UnknownUnit { unit: String },

    #[error("corpus line {line}: {reason}")]
    CorpusParse { line: usize, reason: String },

    #[error("challenge already finished")]
    ChallengeFinished,

    #[error("no active challenge")]
    NoChallenge,
}

impl TypingError {
    pub(crate) fn invalid_table(reason: impl Into<String>) -> Self {
        Self::InvalidRuleTable { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, TypingError>;
