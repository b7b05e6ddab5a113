// File: src/corpus.rs
use crate::config::SessionConfig;
use crate::core::challenge::TypingChallenge;
use crate::core::rules::ConversionRuleTable;
use crate::error::{Result, TypingError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

const COLUMNS: usize = 4;

/// One row of the phrase corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseEntry {
    pub display: String,
    pub phonetic: String,
    pub difficulty: u8,
    pub language: String,
}

/// Caller-supplied phrases, read from tab-separated text:
/// `display<TAB>phonetic<TAB>difficulty<TAB>language`.
#[derive(Debug, Clone, Default)]
pub struct PhraseCorpus {
    entries: Vec<PhraseEntry>,
}

impl PhraseCorpus {
    pub fn new(entries: Vec<PhraseEntry>) -> Self {
        Self { entries }
    }

    /// Blank lines and lines starting with `#` are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != COLUMNS {
                return Err(TypingError::CorpusParse {
                    line: idx + 1,
                    reason: format!("expected {COLUMNS} columns, found {}", fields.len()),
                });
            }
            if fields[1].trim().is_empty() {
                return Err(TypingError::CorpusParse {
                    line: idx + 1,
                    reason: "empty phonetic text".to_string(),
                });
            }
            let difficulty = fields[2].trim().parse::<u8>().map_err(|e| TypingError::CorpusParse {
                line: idx + 1,
                reason: format!("bad difficulty '{}': {e}", fields[2]),
            })?;
            entries.push(PhraseEntry {
                display: fields[0].to_string(),
                phonetic: fields[1].to_string(),
                difficulty,
                language: fields[3].trim().to_string(),
            });
        }
        Ok(Self { entries })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let corpus = Self::parse(&text)?;
        log::info!("Loaded {} phrases from {}", corpus.len(), path.display());
        Ok(corpus)
    }

    pub fn entries(&self) -> &[PhraseEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Picks phrases and turns them into challenges.
///
/// Only entries in the configured language, inside the difficulty window and
/// with a rule table available are eligible. An entry whose automaton cannot
/// be built is dropped from the pool rather than failing the provider.
pub struct PhraseProvider {
    pool: Vec<(PhraseEntry, Arc<ConversionRuleTable>)>,
    rng: ChaCha8Rng,
}

impl PhraseProvider {
    pub fn new(
        corpus: &PhraseCorpus,
        tables: &HashMap<String, Arc<ConversionRuleTable>>,
        config: &SessionConfig,
    ) -> Self {
        let pool: Vec<_> = corpus
            .entries()
            .iter()
            .filter(|entry| entry.language == config.language)
            .filter(|entry| config.accepts_difficulty(entry.difficulty))
            .filter_map(|entry| {
                tables
                    .get(&entry.language)
                    .map(|table| (entry.clone(), Arc::clone(table)))
            })
            .collect();
        log::debug!("{} of {} phrases eligible", pool.len(), corpus.len());

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { pool, rng }
    }

    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    /// A challenge for a random eligible phrase, or `None` when nothing is left.
    pub fn next_challenge(&mut self) -> Option<TypingChallenge> {
        while !self.pool.is_empty() {
            let idx = self.rng.gen_range(0..self.pool.len());
            let (entry, table) = &self.pool[idx];
            match TypingChallenge::new(&entry.display, &entry.phonetic, table) {
                Ok(challenge) => return Some(challenge),
                Err(e) => {
                    log::warn!("Rejecting phrase '{}': {}", entry.display, e);
                    self.pool.swap_remove(idx);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# display\tphonetic\tdifficulty\tlanguage\n\
        猫\tねこ\t1\tja\n\
        \n\
        切符\tきっぷ\t2\tja\n\
        hello\thello\t1\ten\n";

    fn tables() -> HashMap<String, Arc<ConversionRuleTable>> {
        HashMap::from([("ja".to_string(), Arc::new(ConversionRuleTable::japanese().unwrap()))])
    }

    fn seeded() -> SessionConfig {
        SessionConfig { seed: Some(7), ..Default::default() }
    }

    #[test]
    fn parses_rows_and_skips_comments() {
        let corpus = PhraseCorpus::parse(SAMPLE).unwrap();
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.entries()[1].phonetic, "きっぷ");
        assert_eq!(corpus.entries()[1].difficulty, 2);
    }

    #[test]
    fn reports_the_bad_line() {
        let err = PhraseCorpus::parse("猫\tねこ\t1\tja\n犬\tいぬ\tja\n").unwrap_err();
        assert!(matches!(err, TypingError::CorpusParse { line: 2, .. }));
        let err = PhraseCorpus::parse("猫\tねこ\teasy\tja\n").unwrap_err();
        assert!(matches!(err, TypingError::CorpusParse { line: 1, .. }));
    }

    #[test]
    fn empty_phonetic_is_rejected() {
        let err = PhraseCorpus::parse("猫\tねこ\t1\tja\n空\t\t1\tja\n").unwrap_err();
        assert!(matches!(err, TypingError::CorpusParse { line: 2, .. }));
        let err = PhraseCorpus::parse("空\t  \t1\tja\n").unwrap_err();
        assert!(matches!(err, TypingError::CorpusParse { line: 1, .. }));
    }

    #[test]
    fn only_configured_language_is_eligible() {
        let corpus = PhraseCorpus::parse(SAMPLE).unwrap();
        let provider = PhraseProvider::new(&corpus, &tables(), &seeded());
        assert_eq!(provider.remaining(), 2);
    }

    #[test]
    fn difficulty_window_filters_pool() {
        let corpus = PhraseCorpus::parse(SAMPLE).unwrap();
        let config = SessionConfig { max_difficulty: Some(1), ..seeded() };
        let mut provider = PhraseProvider::new(&corpus, &tables(), &config);
        assert_eq!(provider.remaining(), 1);
        assert_eq!(provider.next_challenge().unwrap().display_text(), "猫");
    }

    #[test]
    fn empty_corpus_yields_none() {
        let mut provider = PhraseProvider::new(&PhraseCorpus::default(), &tables(), &seeded());
        assert!(provider.next_challenge().is_none());
    }

    #[test]
    fn missing_table_yields_none() {
        let corpus = PhraseCorpus::parse(SAMPLE).unwrap();
        let mut provider = PhraseProvider::new(&corpus, &HashMap::new(), &seeded());
        assert!(provider.next_challenge().is_none());
    }
}
