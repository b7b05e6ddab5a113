// src/lib.rs

pub mod config;
pub mod core;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod progress;

pub use crate::core::challenge::TypingChallenge;
pub use crate::core::rules::ConversionRuleTable;
pub use crate::core::types::{ChallengeState, InputResult};
pub use crate::engine::{KeyOutcome, TypingSession};
pub use crate::error::{Result, TypingError};
