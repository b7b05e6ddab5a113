//! Session flows: corpus in, challenges out, progress saved and resumed.

use std::path::Path;
use typing_core::config::SessionConfig;
use typing_core::corpus::PhraseCorpus;
use typing_core::{KeyOutcome, TypingSession};

fn sample_corpus() -> PhraseCorpus {
    PhraseCorpus::from_path(Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data/phrases.tsv"))).unwrap()
}

/// Types the current hint until the phrase completes.
fn finish_current(session: &mut TypingSession) -> KeyOutcome {
    let hint = session.hint().unwrap();
    let mut last = KeyOutcome::Incorrect;
    for key in hint.chars() {
        last = session.press(key).unwrap();
    }
    last
}

#[test]
fn every_bundled_phrase_can_be_completed_from_hints() {
    let corpus = sample_corpus();
    let config = SessionConfig { seed: Some(42), ..Default::default() };
    let tables = config.rule_tables().unwrap();
    let mut session = TypingSession::from_config(&corpus, &tables, &config).unwrap();

    for _ in 0..corpus.len() {
        session.start_next().unwrap();
        match finish_current(&mut session) {
            KeyOutcome::Completed(summary) => assert_eq!(summary.mistakes, 0),
            other => panic!("expected completion, got {other:?}"),
        }
    }
    assert_eq!(session.progress().completed(), corpus.len() as u64);
    assert_eq!(session.progress().accuracy(), 1.0);
}

#[test]
fn same_seed_same_phrases() {
    let corpus = sample_corpus();
    let config = SessionConfig { seed: Some(9), ..Default::default() };
    let tables = config.rule_tables().unwrap();
    let picks = |n: usize| {
        let mut session = TypingSession::from_config(&corpus, &tables, &config).unwrap();
        (0..n)
            .map(|_| session.start_next().unwrap().phonetic_text().to_string())
            .collect::<Vec<_>>()
    };
    assert_eq!(picks(5), picks(5));
}

#[test]
fn progress_is_resumed_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = sample_corpus();
    let config = SessionConfig {
        seed: Some(3),
        max_difficulty: Some(1),
        progress_path: Some(dir.path().join("progress.bin")),
        ..Default::default()
    };
    let tables = config.rule_tables().unwrap();

    let mut first = TypingSession::from_config(&corpus, &tables, &config).unwrap();
    first.start_next().unwrap();
    assert!(matches!(first.press('Q').unwrap(), KeyOutcome::Incorrect));
    assert!(matches!(finish_current(&mut first), KeyOutcome::Completed(_)));
    first.save_progress().unwrap();

    let second = TypingSession::from_config(&corpus, &tables, &config).unwrap();
    assert_eq!(second.progress().completed(), 1);
    assert_eq!(second.progress().mistakes(), 1);
}

#[test]
fn other_language_yields_no_challenge() {
    let corpus = sample_corpus();
    let config = SessionConfig { language: "ko".to_string(), ..Default::default() };
    let tables = config.rule_tables().unwrap();
    let mut session = TypingSession::from_config(&corpus, &tables, &config).unwrap();
    assert!(session.start_next().is_none());
}
