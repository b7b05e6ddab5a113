// src/core/mod.rs
pub mod builder;
pub mod challenge;
pub mod rules;
pub mod tokenizer;
pub mod trie;
pub mod types;
