// --- File: src/core/trie.rs
use crate::core::types::NodeId;
use std::collections::BTreeMap;

pub const ROOT: NodeId = 0;

#[derive(Debug, Clone)]
struct TrieNode {
    /// Keystroke that leads into this node. `None` only for the root.
    key: Option<char>,
    /// Ordered by keystroke, so traversal order is lexicographic.
    children: BTreeMap<char, NodeId>,
    /// Structural parent; used to rebuild the path already typed.
    parent: Option<NodeId>,
    accepting: bool,
}

impl TrieNode {
    fn new(key: Option<char>, parent: Option<NodeId>) -> Self {
        Self { key, children: BTreeMap::new(), parent, accepting: false }
    }
}

/// Prefix-sharing tree of accepted keystroke sequences, stored as an arena.
/// There are no cycles; nodes only refer to each other by index.
#[derive(Debug, Clone)]
pub struct KeystrokeTrie {
    nodes: Vec<TrieNode>,
}

impl Default for KeystrokeTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl KeystrokeTrie {
    pub fn new() -> Self {
        Self { nodes: vec![TrieNode::new(None, None)] }
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Walks `seq` from `from`, reusing existing children and creating the rest.
    /// Returns the node reached after the last keystroke.
    /// O(k) complexity where k is the sequence length.
    pub fn insert_path(&mut self, from: NodeId, seq: &str) -> NodeId {
        let mut node_idx = from;
        for key in seq.chars() {
            node_idx = match self.nodes[node_idx].children.get(&key) {
                Some(&id) => id,
                None => {
                    let new_node_id = self.nodes.len();
                    self.nodes.push(TrieNode::new(Some(key), Some(node_idx)));
                    self.nodes[node_idx].children.insert(key, new_node_id);
                    new_node_id
                }
            };
        }
        node_idx
    }

    pub fn child(&self, node: NodeId, key: char) -> Option<NodeId> {
        self.nodes[node].children.get(&key).copied()
    }

    /// Children in keystroke order.
    pub fn children(&self, node: NodeId) -> impl Iterator<Item = (char, NodeId)> + '_ {
        self.nodes[node].children.iter().map(|(&k, &id)| (k, id))
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node].parent
    }

    pub fn key(&self, node: NodeId) -> Option<char> {
        self.nodes[node].key
    }

    pub fn is_accepting(&self, node: NodeId) -> bool {
        self.nodes[node].accepting
    }

    pub fn mark_accepting(&mut self, node: NodeId) {
        self.nodes[node].accepting = true;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root always exists.
        false
    }

    /// Keystrokes on the structural path from the root down to `node`.
    pub fn path_to(&self, node: NodeId) -> String {
        let mut keys = Vec::new();
        let mut current = Some(node);
        while let Some(idx) = current {
            if let Some(key) = self.nodes[idx].key {
                keys.push(key);
            }
            current = self.nodes[idx].parent;
        }
        keys.iter().rev().collect()
    }

    /// Every complete sequence accepted from the root, in lexicographic order.
    /// Exponential in the worst case; meant for tests and tooling, not the hot path.
    pub fn accepted_sequences(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut prefix = String::new();
        self.collect_accepted(ROOT, &mut prefix, &mut out);
        out
    }

    fn collect_accepted(&self, node_idx: NodeId, prefix: &mut String, out: &mut Vec<String>) {
        let node = &self.nodes[node_idx];
        if node.accepting {
            out.push(prefix.clone());
        }
        for (&key, &child_idx) in &node.children {
            prefix.push(key);
            self.collect_accepted(child_idx, prefix, out);
            prefix.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_prefixes_share_nodes() {
        let mut trie = KeystrokeTrie::new();
        let shi = trie.insert_path(ROOT, "shi");
        let si = trie.insert_path(ROOT, "si");
        // root, s, h, i (under h), i (under s)
        assert_eq!(trie.len(), 5);
        let s = trie.child(ROOT, 's').unwrap();
        assert_eq!(trie.children(s).map(|(k, _)| k).collect::<Vec<_>>(), vec!['h', 'i']);
        assert_ne!(shi, si);
        assert_eq!(trie.parent(si), Some(s));
    }

    #[test]
    fn reinserting_a_path_creates_nothing() {
        let mut trie = KeystrokeTrie::new();
        let first = trie.insert_path(ROOT, "ka");
        let second = trie.insert_path(ROOT, "ka");
        assert_eq!(first, second);
        assert_eq!(trie.len(), 3);
    }

    #[test]
    fn path_to_rebuilds_the_typed_keys() {
        let mut trie = KeystrokeTrie::new();
        let end = trie.insert_path(ROOT, "kya");
        assert_eq!(trie.path_to(end), "kya");
        assert_eq!(trie.path_to(ROOT), "");
        assert_eq!(trie.key(end), Some('a'));
        assert_eq!(trie.key(ROOT), None);
    }

    #[test]
    fn accepting_node_may_have_children() {
        let mut trie = KeystrokeTrie::new();
        let short = trie.insert_path(ROOT, "n");
        let long = trie.insert_path(ROOT, "nn");
        trie.mark_accepting(short);
        trie.mark_accepting(long);
        assert_eq!(trie.accepted_sequences(), vec!["n", "nn"]);
        assert!(trie.child(short, 'n').is_some());
    }
}
