use crate::config::SessionConfig;
use crate::core::challenge::TypingChallenge;
use crate::core::rules::ConversionRuleTable;
use crate::core::types::InputResult;
use crate::corpus::{PhraseCorpus, PhraseProvider};
use crate::error::{Result, TypingError};
use crate::persistence::{load_from_disk, save_to_disk};
use crate::progress::{ChallengeSummary, ProgressLog};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What a single key press did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Correct,
    Incorrect,
    /// The phrase is done; the summary has already been recorded.
    Completed(ChallengeSummary),
}

// One player, one round at a time. The provider hands out challenges,
// the session feeds keys to the current one and keeps score.
pub struct TypingSession {
    provider: PhraseProvider,
    current: Option<TypingChallenge>,
    progress: ProgressLog,
    progress_path: Option<PathBuf>,
}

impl TypingSession {
    pub fn new(provider: PhraseProvider) -> Self {
        Self { provider, current: None, progress: ProgressLog::new(), progress_path: None }
    }

    /// Resumes progress from `path`, or starts fresh when the file does not exist yet.
    /// Any other load failure is returned so a damaged file is never overwritten.
    pub fn with_progress_file(provider: PhraseProvider, path: &Path) -> Result<Self> {
        let progress = match load_from_disk(path) {
            Ok(progress) => {
                log::info!("Resumed progress from {} ({} completed)", path.display(), progress.completed());
                progress
            }
            Err(TypingError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("Starting fresh progress at {}", path.display());
                ProgressLog::new()
            }
            Err(e) => {
                log::error!("Could not read progress file {}: {}", path.display(), e);
                return Err(e);
            }
        };
        Ok(Self { provider, current: None, progress, progress_path: Some(path.to_path_buf()) })
    }

    pub fn from_config(
        corpus: &PhraseCorpus,
        tables: &HashMap<String, Arc<ConversionRuleTable>>,
        config: &SessionConfig,
    ) -> Result<Self> {
        let provider = PhraseProvider::new(corpus, tables, config);
        match &config.progress_path {
            Some(path) => Self::with_progress_file(provider, path),
            None => Ok(Self::new(provider)),
        }
    }

    /// Replaces the current challenge with a fresh one. `None` when the provider is exhausted.
    pub fn start_next(&mut self) -> Option<&TypingChallenge> {
        self.current = self.provider.next_challenge();
        self.current.as_ref()
    }

    pub fn press(&mut self, key: char) -> Result<KeyOutcome> {
        let challenge = self.current.as_mut().ok_or(TypingError::NoChallenge)?;
        match challenge.process_input(key)? {
            InputResult::Correct => Ok(KeyOutcome::Correct),
            InputResult::Incorrect => Ok(KeyOutcome::Incorrect),
            InputResult::Finished => {
                let summary = ChallengeSummary::from_challenge(challenge);
                log::info!(
                    "Completed '{}' as '{}' ({} keys, {} mistakes)",
                    summary.display,
                    summary.typed,
                    summary.keystrokes,
                    summary.mistakes
                );
                self.progress.record(&summary);
                Ok(KeyOutcome::Completed(summary))
            }
        }
    }

    pub fn hint(&self) -> Option<String> {
        self.current.as_ref().map(TypingChallenge::shortest_remaining_sequence)
    }

    pub fn typed(&self) -> Option<String> {
        self.current.as_ref().map(TypingChallenge::typed_sequence)
    }

    pub fn current(&self) -> Option<&TypingChallenge> {
        self.current.as_ref()
    }

    pub fn progress(&self) -> &ProgressLog {
        &self.progress
    }

    pub fn save_progress(&self) -> Result<()> {
        match &self.progress_path {
            Some(path) => save_to_disk(&self.progress, path),
            None => Ok(()), // Nothing to do without a progress file
        }
    }
}
