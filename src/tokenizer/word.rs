//! Word-level tokenizer implementation.

use std::collections::HashMap;
use std::path::Path;

use derive_new::new;
use tracing::{debug, info};

use super::error::{Result, TokenizerError};
use super::snapshot::Snapshot;
use super::special::{SpecialToken, SpecialTokens};
use super::utils::tokenize;
use super::{Token, TokenId, Tokenizer};

/// Minimum count used when the caller does not choose one.
pub const DEFAULT_MIN_FREQUENCY: usize = 1;

/// Number of vocabulary entries reported by [`WordTokenizer::stats`].
pub const SAMPLE_LIMIT: usize = 10;

/// Observational summary of a tokenizer.
#[derive(new, Debug, Clone, PartialEq, Eq)]
pub struct VocabStats {
    pub vocab_size: usize,
    pub special_tokens: usize,
    pub is_trained: bool,
    pub sample_tokens: Vec<(Token, TokenId)>,
}

/// Word-level tokenizer with a dense, insertion-ordered vocabulary.
#[derive(Debug, Clone, Default)]
pub struct WordTokenizer {
    vocab: HashMap<Token, TokenId>,
    id_to_token: Vec<Token>,
    special_tokens: SpecialTokens,
    trained: bool,
}

impl WordTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the vocabulary from `text`, keeping tokens seen at least
    /// `min_frequency` times. IDs follow first occurrence in the corpus.
    pub fn train(&mut self, text: &str, min_frequency: usize) -> &mut Self {
        info!(min_frequency, "training tokenizer");
        self.vocab.clear();
        self.id_to_token.clear();

        for role in SpecialToken::ALL {
            let token = self.special_tokens.get(role).to_string();
            self.push(token);
        }

        let tokens = tokenize(text);
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut first_seen: Vec<&str> = Vec::new();
        for token in &tokens {
            let count = counts.entry(token.as_str()).or_insert(0);
            if *count == 0 {
                first_seen.push(token.as_str());
            }
            *count += 1;
        }
        debug!(tokens = tokens.len(), distinct = first_seen.len(), "counted corpus tokens");

        for token in first_seen {
            if counts[token] >= min_frequency && !self.vocab.contains_key(token) {
                self.push(token.to_string());
            }
        }

        self.trained = true;
        info!(vocab_size = self.vocab_size(), "training complete");
        self
    }

    fn push(&mut self, token: Token) {
        let id = self.id_to_token.len() as TokenId;
        self.vocab.insert(token.clone(), id);
        self.id_to_token.push(token);
    }

    pub fn encode(&self, text: &str, add_special: bool) -> Result<Vec<TokenId>> {
        if !self.trained {
            return Err(TokenizerError::NotTrained);
        }

        let unk = Self::special_id(SpecialToken::Unk);
        let tokens = tokenize(text);
        let mut ids = Vec::with_capacity(tokens.len() + 2);
        if add_special {
            ids.push(Self::special_id(SpecialToken::Bos));
        }
        ids.extend(tokens.iter().map(|t| self.vocab.get(t).copied().unwrap_or(unk)));
        if add_special {
            ids.push(Self::special_id(SpecialToken::Eos));
        }

        Ok(ids)
    }

    pub fn decode(&self, ids: &[TokenId], skip_special: bool) -> Result<String> {
        if !self.trained {
            return Err(TokenizerError::NotTrained);
        }

        let unk = self.special_tokens.get(SpecialToken::Unk);
        let tokens: Vec<&str> = ids
            .iter()
            .map(|&id| self.id_to_token(id).unwrap_or(unk))
            .filter(|token| !(skip_special && self.special_tokens.contains(token)))
            .collect();

        Ok(tokens.join(" "))
    }

    pub fn stats(&self) -> VocabStats {
        let sample_tokens = self
            .id_to_token
            .iter()
            .take(SAMPLE_LIMIT)
            .enumerate()
            .map(|(id, token)| (token.clone(), id as TokenId))
            .collect();

        VocabStats::new(
            self.vocab_size(),
            self.special_tokens.count(),
            self.trained,
            sample_tokens,
        )
    }

    pub fn export(&self) -> Snapshot {
        let ids = 0..self.id_to_token.len() as TokenId;
        Snapshot {
            vocab: self.id_to_token.iter().cloned().zip(ids.clone()).collect(),
            reverse_vocab: ids.zip(self.id_to_token.iter().cloned()).collect(),
            special_tokens: self.special_tokens.clone(),
            vocab_size: self.vocab_size(),
            is_trained: self.trained,
        }
    }

    /// Replace all state with `snapshot`. Nothing is changed unless the
    /// snapshot passes validation.
    pub fn import(&mut self, snapshot: Snapshot) -> Result<&mut Self> {
        let (id_to_token, trained) = snapshot.into_vocab()?;

        self.vocab = id_to_token
            .iter()
            .enumerate()
            .map(|(id, token)| (token.clone(), id as TokenId))
            .collect();
        self.id_to_token = id_to_token;
        self.special_tokens = SpecialTokens::default();
        self.trained = trained;

        debug!(vocab_size = self.vocab_size(), trained, "imported tokenizer snapshot");
        Ok(self)
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let mut tokenizer = Self::new();
        tokenizer.import(snapshot)?;
        Ok(tokenizer)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_snapshot(Snapshot::from_json(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        self.export().to_json()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_snapshot(Snapshot::read(path)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.export().write(path)
    }

    pub fn vocab_size(&self) -> usize {
        self.id_to_token.len()
    }

    pub fn is_trained(&self) -> bool {
        self.trained
    }

    pub fn token_to_id(&self, token: &str) -> Option<TokenId> {
        self.vocab.get(token).copied()
    }

    pub fn id_to_token(&self, id: TokenId) -> Option<&str> {
        self.id_to_token.get(id as usize).map(String::as_str)
    }

    pub fn special_tokens(&self) -> &SpecialTokens {
        &self.special_tokens
    }

    pub fn special_id(role: SpecialToken) -> TokenId {
        role.id()
    }
}

impl Tokenizer for WordTokenizer {
    fn encode(&self, text: &str, add_special: bool) -> Result<Vec<TokenId>> {
        WordTokenizer::encode(self, text, add_special)
    }

    fn decode(&self, ids: &[TokenId], skip_special: bool) -> Result<String> {
        WordTokenizer::decode(self, ids, skip_special)
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_special_tokens_fixed(text in "[a-zA-Z .,!?\\[\\]]{0,60}", min_frequency in 0usize..4) {
            let mut tokenizer = WordTokenizer::new();
            tokenizer.train(&text, min_frequency);
            for role in SpecialToken::ALL {
                prop_assert_eq!(tokenizer.id_to_token(role.id()), Some(role.as_str()));
            }
        }

        #[test]
        fn prop_training_deterministic(text in "[a-e ,.]{0,80}", min_frequency in 0usize..4) {
            let mut first = WordTokenizer::new();
            let mut second = WordTokenizer::new();
            first.train(&text, min_frequency);
            second.train(&text, min_frequency);
            prop_assert_eq!(first.export(), second.export());
        }

        #[test]
        fn prop_encode_total(corpus in "[a-z ]{0,40}", text in "\\PC{0,40}") {
            let mut tokenizer = WordTokenizer::new();
            tokenizer.train(&corpus, 1);
            let ids = tokenizer.encode(&text, false).unwrap();
            prop_assert_eq!(ids.len(), tokenize(&text).len());
            prop_assert!(ids.iter().all(|&id| (id as usize) < tokenizer.vocab_size()));
        }

        #[test]
        fn prop_known_words_roundtrip(words in prop::collection::vec("[a-z]{1,8}", 1..12)) {
            let text = words.join(" ");
            let mut tokenizer = WordTokenizer::new();
            tokenizer.train(&text, 1);
            let ids = tokenizer.encode(&text, true).unwrap();
            prop_assert_eq!(tokenizer.decode(&ids, true).unwrap(), text);
        }

        #[test]
        fn prop_import_export_equivalent(corpus in "[a-d ,!]{0,60}", text in "[a-f ,!?]{0,30}") {
            let mut original = WordTokenizer::new();
            original.train(&corpus, 1);
            let restored = WordTokenizer::from_snapshot(original.export()).unwrap();
            let ids = original.encode(&text, true).unwrap();
            prop_assert_eq!(&ids, &restored.encode(&text, true).unwrap());
            prop_assert_eq!(original.decode(&ids, false).unwrap(), restored.decode(&ids, false).unwrap());
        }
    }
}
