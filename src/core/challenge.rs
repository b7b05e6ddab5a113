// File: src/core/challenge.rs
use crate::core::builder::compile;
use crate::core::rules::ConversionRuleTable;
use crate::core::trie::KeystrokeTrie;
use crate::core::types::{ChallengeState, InputResult, NodeId};
use crate::error::{Result, TypingError};
use std::collections::{HashMap, VecDeque};

/// One phrase being typed by one player.
///
/// Owns its automaton and a cursor into it. A wrong keystroke never moves
/// the cursor; the player retries from the same position.
#[derive(Debug, Clone)]
pub struct TypingChallenge {
    display_text: String,
    phonetic_text: String,
    trie: KeystrokeTrie,
    cursor: NodeId,
    state: ChallengeState,
    keystrokes: usize,
    mistakes: usize,
}

impl TypingChallenge {
    /// Compiles `phonetic` against `table`. Fails if a unit has no definition.
    pub fn new(display: &str, phonetic: &str, table: &ConversionRuleTable) -> Result<Self> {
        let trie = compile(phonetic, table)?;
        Ok(Self::from_trie(display, phonetic, trie))
    }

    pub fn from_trie(display: &str, phonetic: &str, trie: KeystrokeTrie) -> Self {
        let cursor = trie.root();
        // The empty phrase is complete before the first keystroke.
        let state = if trie.is_accepting(cursor) {
            ChallengeState::Finished
        } else {
            ChallengeState::InProgress
        };
        Self {
            display_text: display.to_string(),
            phonetic_text: phonetic.to_string(),
            trie,
            cursor,
            state,
            keystrokes: 0,
            mistakes: 0,
        }
    }

    /// Feeds one keystroke. O(log b) in the branching factor of the cursor.
    pub fn process_input(&mut self, key: char) -> Result<InputResult> {
        if self.state == ChallengeState::Finished {
            return Err(TypingError::ChallengeFinished);
        }
        self.keystrokes += 1;

        let Some(next) = self.trie.child(self.cursor, key) else {
            self.mistakes += 1;
            return Ok(InputResult::Incorrect);
        };
        self.cursor = next;
        if self.trie.is_accepting(next) {
            self.state = ChallengeState::Finished;
            Ok(InputResult::Finished)
        } else {
            Ok(InputResult::Correct)
        }
    }

    /// Keystrokes accepted so far, following the branch the player chose.
    pub fn typed_sequence(&self) -> String {
        self.trie.path_to(self.cursor)
    }

    /// Fewest keystrokes that complete the phrase from the cursor.
    ///
    /// Breadth-first over children; children are visited in keystroke order,
    /// so among equally short completions the lexicographically smallest wins.
    pub fn shortest_remaining_sequence(&self) -> String {
        if self.trie.is_accepting(self.cursor) {
            return String::new();
        }

        // Search parents, local to this call. Distinct from the trie's own parents.
        let mut came_from: HashMap<NodeId, NodeId> = HashMap::new();
        let mut queue = VecDeque::from([self.cursor]);
        let mut target = None;
        while let Some(node) = queue.pop_front() {
            if self.trie.is_accepting(node) {
                target = Some(node);
                break;
            }
            for (_, child) in self.trie.children(node) {
                came_from.insert(child, node);
                queue.push_back(child);
            }
        }

        let Some(mut node) = target else {
            return String::new();
        };
        let mut keys = Vec::new();
        while node != self.cursor {
            if let Some(key) = self.trie.key(node) {
                keys.push(key);
            }
            match came_from.get(&node) {
                Some(&prev) => node = prev,
                None => break,
            }
        }
        keys.iter().rev().collect()
    }

    /// Every complete spelling of the phrase. Intended for tests and tooling.
    pub fn accepted_sequences(&self) -> Vec<String> {
        self.trie.accepted_sequences()
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    pub fn phonetic_text(&self) -> &str {
        &self.phonetic_text
    }

    pub fn state(&self) -> ChallengeState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == ChallengeState::Finished
    }

    /// Keystrokes fed to `process_input`, right or wrong.
    pub fn keystrokes(&self) -> usize {
        self.keystrokes
    }

    pub fn mistakes(&self) -> usize {
        self.mistakes
    }

    pub fn trie(&self) -> &KeystrokeTrie {
        &self.trie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge(phonetic: &str) -> TypingChallenge {
        let table = ConversionRuleTable::japanese().unwrap();
        TypingChallenge::new(phonetic, phonetic, &table).unwrap()
    }

    fn type_all(challenge: &mut TypingChallenge, keys: &str) -> Vec<InputResult> {
        keys.chars().map(|c| challenge.process_input(c).unwrap()).collect()
    }

    #[test]
    fn accepts_either_spelling() {
        for keys in ["shi", "si", "ci"] {
            let mut c = challenge("し");
            let results = type_all(&mut c, keys);
            assert_eq!(results.last(), Some(&InputResult::Finished));
            assert_eq!(c.typed_sequence(), keys);
        }
    }

    #[test]
    fn wrong_key_does_not_advance() {
        let mut c = challenge("かな");
        type_all(&mut c, "k");
        assert_eq!(c.process_input('z').unwrap(), InputResult::Incorrect);
        assert_eq!(c.typed_sequence(), "k");
        assert_eq!(c.state(), ChallengeState::InProgress);
        assert_eq!(c.mistakes(), 1);
        assert_eq!(c.keystrokes(), 2);
    }

    #[test]
    fn input_after_finish_is_rejected() {
        let mut c = challenge("あ");
        assert_eq!(c.process_input('a').unwrap(), InputResult::Finished);
        assert!(matches!(c.process_input('a'), Err(TypingError::ChallengeFinished)));
        assert_eq!(c.typed_sequence(), "a");
    }

    #[test]
    fn empty_phrase_is_already_finished() {
        let c = challenge("");
        assert!(c.is_finished());
        assert_eq!(c.shortest_remaining_sequence(), "");
        assert_eq!(c.typed_sequence(), "");
    }

    #[test]
    fn hint_is_shortest_completion() {
        let c = challenge("しゃしん");
        // Seven keys at best; ties go to the lexicographically smallest spelling.
        assert_eq!(c.shortest_remaining_sequence(), "shacinn");
    }

    #[test]
    fn hint_follows_the_chosen_branch() {
        let mut c = challenge("しか");
        type_all(&mut c, "sh");
        assert_eq!(c.shortest_remaining_sequence(), "ica");
        assert_eq!(c.typed_sequence(), "sh");
    }

    #[test]
    fn hint_is_idempotent() {
        let mut c = challenge("きっぷ");
        type_all(&mut c, "k");
        let first = c.shortest_remaining_sequence();
        assert_eq!(first, c.shortest_remaining_sequence());
        assert_eq!(first, "ippu");
    }
}
