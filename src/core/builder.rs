// File: src/core/builder.rs
use crate::core::rules::ConversionRuleTable;
use crate::core::tokenizer::tokenize;
use crate::core::trie::KeystrokeTrie;
use crate::core::types::{NodeId, Token, TokenKind};
use crate::error::{Result, TypingError};
use std::collections::BTreeSet;

const NASAL_SINGLE: &str = "n";
const NASAL_DOUBLE: &str = "nn";

/// The finished automaton plus the frontier it ended on.
/// Every frontier node is accepting.
#[derive(Debug, Clone)]
pub struct BuiltAutomaton {
    pub trie: KeystrokeTrie,
    pub frontier: Vec<NodeId>,
}

/// Compiles a token sequence into a `KeystrokeTrie`.
///
/// The builder keeps a frontier: every node reachable after correctly typing
/// the tokens consumed so far. Each step grows every frontier node by every
/// alternative of the next token(s), then the reached nodes become the new
/// frontier.
pub struct AutomatonBuilder<'a> {
    table: &'a ConversionRuleTable,
}

impl<'a> AutomatonBuilder<'a> {
    pub fn new(table: &'a ConversionRuleTable) -> Self {
        Self { table }
    }

    pub fn build(&self, tokens: &[Token]) -> Result<BuiltAutomaton> {
        let mut trie = KeystrokeTrie::new();
        let mut frontier = vec![trie.root()];

        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            let next = tokens.get(i + 1);
            let (alternatives, consumed) = match token.kind {
                TokenKind::Gemination => self.gemination_alternatives(next)?,
                TokenKind::Nasal => (self.nasal_alternatives(next), 1),
                TokenKind::Normal | TokenKind::Palatalized | TokenKind::Symbol => {
                    (self.unit_alternatives(token)?, 1)
                }
            };
            frontier = expand(&mut trie, &frontier, &alternatives);
            i += consumed;
        }

        for &node in &frontier {
            trie.mark_accepting(node);
        }
        log::debug!(
            "Built automaton: {} tokens, {} nodes, {} accepting",
            tokens.len(),
            trie.len(),
            frontier.len()
        );
        Ok(BuiltAutomaton { trie, frontier })
    }

    /// Alternatives of a unit typed on its own.
    fn unit_alternatives(&self, token: &Token) -> Result<Vec<String>> {
        if token.kind == TokenKind::Symbol {
            return Ok(vec![token.text.clone()]);
        }
        self.table
            .alternatives(&token.text)
            .map(<[String]>::to_vec)
            .ok_or_else(|| TypingError::UnknownUnit { unit: token.text.clone() })
    }

    /// Alternatives covering the gemination marker and the unit after it,
    /// and how many tokens they consume.
    fn gemination_alternatives(&self, next: Option<&Token>) -> Result<(Vec<String>, usize)> {
        let rule = self.table.gemination();
        let following = match next {
            Some(token) if !matches!(token.kind, TokenKind::Gemination | TokenKind::Nasal) => {
                self.unit_alternatives(token)?
            }
            _ => return Ok((vec![rule.default_sequence.clone()], 1)),
        };

        let mut candidates = BTreeSet::new();
        for alt in &following {
            let doubled = alt
                .chars()
                .next()
                .and_then(|first| rule.doubling.get(&first));
            if let Some(prefix) = doubled {
                candidates.insert(format!("{prefix}{alt}"));
            }
            candidates.insert(format!("{}{alt}", rule.default_sequence));
        }
        Ok((candidates.into_iter().collect(), 2))
    }

    fn nasal_alternatives(&self, next: Option<&Token>) -> Vec<String> {
        let rule = self.table.nasal();
        let primary = match next {
            None => NASAL_DOUBLE,
            Some(token) if rule.forces_double_before(&token.text) => NASAL_DOUBLE,
            Some(_) => NASAL_SINGLE,
        };
        let mut alternatives = vec![primary.to_string()];
        if rule.default_sequence != primary {
            alternatives.push(rule.default_sequence.clone());
        }
        alternatives
    }
}

/// One expansion step: grow every frontier node by every alternative.
fn expand(trie: &mut KeystrokeTrie, frontier: &[NodeId], alternatives: &[String]) -> Vec<NodeId> {
    let mut next = Vec::with_capacity(frontier.len() * alternatives.len());
    for &node in frontier {
        for alt in alternatives {
            next.push(trie.insert_path(node, alt));
        }
    }
    next
}

/// Tokenizes and builds in one go.
pub fn compile(phonetic: &str, table: &ConversionRuleTable) -> Result<KeystrokeTrie> {
    let tokens = tokenize(phonetic, table);
    AutomatonBuilder::new(table).build(&tokens).map(|built| built.trie)
}
