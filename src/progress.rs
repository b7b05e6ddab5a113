// File: src/progress.rs
use crate::core::challenge::TypingChallenge;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What a finished challenge looked like. Handed back to the caller on completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeSummary {
    pub display: String,
    pub phonetic: String,
    /// The spelling the player actually used.
    pub typed: String,
    pub keystrokes: usize,
    pub mistakes: usize,
}

impl ChallengeSummary {
    pub fn from_challenge(challenge: &TypingChallenge) -> Self {
        Self {
            display: challenge.display_text().to_string(),
            phonetic: challenge.phonetic_text().to_string(),
            typed: challenge.typed_sequence(),
            keystrokes: challenge.keystrokes(),
            mistakes: challenge.mistakes(),
        }
    }

    /// Share of keystrokes that were correct, in `[0, 1]`.
    pub fn accuracy(&self) -> f64 {
        accuracy(self.keystrokes, self.mistakes)
    }
}

/// Running totals across challenges, plus the best run per phrase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressLog {
    completed: u64,
    keystrokes: u64,
    mistakes: u64,
    /// Keyed by phonetic text; fewest mistakes wins, then fewest keystrokes.
    best: HashMap<String, ChallengeSummary>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, summary: &ChallengeSummary) {
        self.completed += 1;
        self.keystrokes += summary.keystrokes as u64;
        self.mistakes += summary.mistakes as u64;

        let improves = self.best.get(&summary.phonetic).map_or(true, |best| {
            (summary.mistakes, summary.keystrokes) < (best.mistakes, best.keystrokes)
        });
        if improves {
            self.best.insert(summary.phonetic.clone(), summary.clone());
        }
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn keystrokes(&self) -> u64 {
        self.keystrokes
    }

    pub fn mistakes(&self) -> u64 {
        self.mistakes
    }

    pub fn accuracy(&self) -> f64 {
        accuracy(self.keystrokes as usize, self.mistakes as usize)
    }

    pub fn best_for(&self, phonetic: &str) -> Option<&ChallengeSummary> {
        self.best.get(phonetic)
    }
}

fn accuracy(keystrokes: usize, mistakes: usize) -> f64 {
    if keystrokes == 0 {
        return 1.0;
    }
    (keystrokes - mistakes) as f64 / keystrokes as f64
}
