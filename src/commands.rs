//! The `train`, `encode`, `decode` and `stats` commands.
//!
//! Each command loads what it needs from disk, calls into the tokenizer and
//! prints its result. Failures are returned to the caller with context.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use derive_new::new;
use tracing::info;

use crate::data::Corpus;
use crate::output;
use crate::tokenizer::{
    SpecialToken, TokenId, TokenIdsExt, Tokenizer, VocabStats, WordTokenizer,
};

/// Snapshot path used when none is given.
pub const DEFAULT_TOKENIZER_PATH: &str = "tokenizer.json";

#[derive(new, Debug, Clone)]
pub struct TrainConfig {
    pub input: Option<PathBuf>,
    pub output: PathBuf,
    pub min_frequency: usize,
}

#[derive(new, Debug, Clone)]
pub struct EncodeConfig {
    pub tokenizer: PathBuf,
    pub text: String,
    pub add_special: bool,
}

#[derive(new, Debug, Clone)]
pub struct DecodeConfig {
    pub tokenizer: PathBuf,
    pub ids: String,
    pub keep_special: bool,
}

pub fn load_tokenizer(path: &Path) -> Result<WordTokenizer> {
    WordTokenizer::load(path)
        .with_context(|| format!("failed to load tokenizer {}", path.display()))
}

/// Parse a comma-separated list such as `"2, 5, 3"`.
///
/// Empty items and integers outside the token ID range become the UNK ID,
/// so they decode like any other unmapped ID. Non-numeric items are errors.
pub fn parse_ids(ids: &str) -> Result<Vec<TokenId>> {
    let unk = SpecialToken::Unk.id();
    ids.split(',')
        .map(str::trim)
        .map(|item| {
            if item.is_empty() {
                return Ok(unk);
            }
            let id = item
                .parse::<i64>()
                .with_context(|| format!("invalid token id {item:?}"))?;
            Ok(TokenId::try_from(id).unwrap_or(unk))
        })
        .collect()
}

pub fn train(config: &TrainConfig) -> Result<WordTokenizer> {
    output::section("Training tokenizer...");

    let corpus = Corpus::load(config.input.as_deref())?;
    info!(source = %corpus.source, "training on corpus");

    let mut tokenizer = WordTokenizer::new();
    tokenizer.train(&corpus.text, config.min_frequency);
    tokenizer
        .save(&config.output)
        .with_context(|| format!("failed to write tokenizer {}", config.output.display()))?;

    output::success("Training complete!");
    output::kv("Vocabulary size", tokenizer.vocab_size());
    output::kv("Saved to", config.output.display());
    Ok(tokenizer)
}

pub fn encode(config: &EncodeConfig) -> Result<Vec<TokenId>> {
    let tokenizer = load_tokenizer(&config.tokenizer)?;
    let ids = encode_with(&tokenizer, &config.text, config.add_special)?;

    output::section(&format!("Input: {}", config.text));
    output::result("Token IDs", ids.join_ids(", "));
    output::kv("Token count", ids.len());
    Ok(ids)
}

pub fn decode(config: &DecodeConfig) -> Result<String> {
    let tokenizer = load_tokenizer(&config.tokenizer)?;
    let ids = parse_ids(&config.ids)?;
    let text = decode_with(&tokenizer, &ids, !config.keep_special)?;

    output::section(&format!("Token IDs: {}", ids.join_ids(", ")));
    output::result("Decoded text", &text);
    Ok(text)
}

pub fn stats(tokenizer_path: &Path) -> Result<VocabStats> {
    let stats = load_tokenizer(tokenizer_path)?.stats();

    output::section("Tokenizer Statistics:");
    output::kv("  Vocabulary size", stats.vocab_size);
    output::kv("  Special tokens", stats.special_tokens);
    output::kv("  Is trained", stats.is_trained);
    output::kv("  Sample tokens", "");
    for (token, id) in &stats.sample_tokens {
        output::entry(id, token);
    }
    Ok(stats)
}

fn encode_with(tokenizer: &dyn Tokenizer, text: &str, add_special: bool) -> Result<Vec<TokenId>> {
    Ok(tokenizer.encode(text, add_special)?)
}

fn decode_with(tokenizer: &dyn Tokenizer, ids: &[TokenId], skip_special: bool) -> Result<String> {
    Ok(tokenizer.decode(ids, skip_special)?)
}
