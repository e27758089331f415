//! Word-level tokenizer with a persisted JSON vocabulary.

pub mod commands;
pub mod data;
pub mod output;
pub mod tokenizer;
