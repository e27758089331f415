//! Persisted tokenizer state.
//!
//! On disk a snapshot is a JSON object:
//!
//! ```json
//! {
//!   "vocab": { "[PAD]": 0, "[UNK]": 1, "[BOS]": 2, "[EOS]": 3, "hello": 4 },
//!   "reverseVocab": { "0": "[PAD]", "1": "[UNK]", "2": "[BOS]", "3": "[EOS]", "4": "hello" },
//!   "specialTokens": { "PAD": "[PAD]", "UNK": "[UNK]", "BOS": "[BOS]", "EOS": "[EOS]" },
//!   "vocabSize": 5,
//!   "isTrained": true
//! }
//! ```
//!
//! JSON object keys are strings, so the IDs of `reverseVocab` are stringified
//! on write and parsed back on read. Both maps are kept as ordered entry lists
//! so they are written in ID order.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{Result, TokenizerError};
use super::special::{SpecialToken, SpecialTokens};
use super::{Token, TokenId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(with = "token_map")]
    pub vocab: Vec<(Token, TokenId)>,
    #[serde(with = "id_map")]
    pub reverse_vocab: Vec<(TokenId, Token)>,
    pub special_tokens: SpecialTokens,
    pub vocab_size: usize,
    pub is_trained: bool,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[cfg(test)]
    pub(crate) fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading tokenizer snapshot");
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!(path = %path.display(), vocab_size = self.vocab_size, "writing tokenizer snapshot");
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Check that the snapshot describes a consistent vocabulary and return
    /// its tokens indexed by ID, together with the trained flag.
    pub(crate) fn into_vocab(self) -> Result<(Vec<Token>, bool)> {
        if self.special_tokens != SpecialTokens::default() {
            return Err(TokenizerError::malformed(format!(
                "specialTokens {:?} do not match the reserved bindings",
                self.special_tokens
            )));
        }

        let n = self.reverse_vocab.len();
        let mut slots: Vec<Option<Token>> = vec![None; n];
        for (id, token) in self.reverse_vocab {
            let slot = slots.get_mut(id as usize).ok_or_else(|| {
                TokenizerError::malformed(format!(
                    "reverseVocab id {id} is outside the dense range 0..{n}"
                ))
            })?;
            if slot.is_some() {
                return Err(TokenizerError::malformed(format!(
                    "reverseVocab id {id} appears more than once"
                )));
            }
            *slot = Some(token);
        }
        // n entries with distinct ids below n fill every slot
        let id_to_token: Vec<Token> = slots.into_iter().flatten().collect();

        if self.vocab.len() != n {
            return Err(TokenizerError::malformed(format!(
                "vocab has {} entries but reverseVocab has {n}",
                self.vocab.len()
            )));
        }

        let mut seen = HashSet::with_capacity(n);
        for (token, id) in &self.vocab {
            if !seen.insert(token.as_str()) {
                return Err(TokenizerError::malformed(format!(
                    "vocab token {token:?} appears more than once"
                )));
            }
            if id_to_token.get(*id as usize) != Some(token) {
                return Err(TokenizerError::malformed(format!(
                    "vocab entry {token:?} -> {id} is not mirrored in reverseVocab"
                )));
            }
        }

        if self.vocab_size != n {
            return Err(TokenizerError::malformed(format!(
                "vocabSize is {} but the vocabulary holds {n} tokens",
                self.vocab_size
            )));
        }

        if n > 0 {
            for role in SpecialToken::ALL {
                if id_to_token.get(role.id() as usize).map(String::as_str) != Some(role.as_str()) {
                    return Err(TokenizerError::malformed(format!(
                        "{role} must have id {}",
                        role.id()
                    )));
                }
            }
        } else if self.is_trained {
            return Err(TokenizerError::malformed(
                "snapshot is marked trained but its vocabulary is empty",
            ));
        }

        Ok((id_to_token, self.is_trained))
    }
}

/// `vocab`: JSON object of token -> numeric id, kept in entry order.
mod token_map {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    use super::{Token, TokenId};

    pub fn serialize<S: Serializer>(
        entries: &[(Token, TokenId)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (token, id) in entries {
            map.serialize_entry(token, id)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(Token, TokenId)>, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Vec<(Token, TokenId)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping tokens to ids")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<Token, TokenId>()? {
                    entries.push(entry);
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// `reverseVocab`: JSON object of stringified id -> token, kept in entry order.
mod id_map {
    use std::fmt;

    use serde::de::{self, MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    use super::{Token, TokenId};

    pub fn serialize<S: Serializer>(
        entries: &[(TokenId, Token)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (id, token) in entries {
            map.serialize_entry(&id.to_string(), token)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(TokenId, Token)>, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Vec<(TokenId, Token)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping stringified ids to tokens")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, token)) = access.next_entry::<String, Token>()? {
                    let id = key.parse::<TokenId>().map_err(|_| {
                        de::Error::custom(format!("reverseVocab key {key:?} is not a token id"))
                    })?;
                    entries.push((id, token));
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn specials() -> serde_json::Value {
        json!({ "PAD": "[PAD]", "UNK": "[UNK]", "BOS": "[BOS]", "EOS": "[EOS]" })
    }

    fn valid_json() -> serde_json::Value {
        json!({
            "vocab": { "[PAD]": 0, "[UNK]": 1, "[BOS]": 2, "[EOS]": 3, "hi": 4 },
            "reverseVocab": { "0": "[PAD]", "1": "[UNK]", "2": "[BOS]", "3": "[EOS]", "4": "hi" },
            "specialTokens": specials(),
            "vocabSize": 5,
            "isTrained": true
        })
    }

    fn check(value: serde_json::Value) -> Result<(Vec<Token>, bool)> {
        Snapshot::from_value(value)?.into_vocab()
    }

    fn assert_malformed(value: serde_json::Value, needle: &str) {
        match check(value) {
            Err(TokenizerError::MalformedSnapshot(msg)) => {
                assert!(msg.contains(needle), "{msg:?} does not mention {needle:?}")
            }
            other => panic!("expected MalformedSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_snapshot() {
        let (tokens, trained) = check(valid_json()).unwrap();
        assert_eq!(tokens, vec!["[PAD]", "[UNK]", "[BOS]", "[EOS]", "hi"]);
        assert!(trained);
    }

    #[test]
    fn test_reverse_keys_parsed_out_of_order() {
        let mut value = valid_json();
        value["reverseVocab"] =
            json!({ "4": "hi", "3": "[EOS]", "2": "[BOS]", "1": "[UNK]", "0": "[PAD]" });
        let (tokens, _) = check(value).unwrap();
        assert_eq!(tokens[4], "hi");
    }

    #[test]
    fn test_serialized_field_names_and_order() {
        let snapshot = Snapshot::from_value(valid_json()).unwrap();
        let json = snapshot.to_json().unwrap();
        let fields: Vec<usize> = [
            "\"vocab\"",
            "\"reverseVocab\"",
            "\"specialTokens\"",
            "\"vocabSize\"",
            "\"isTrained\"",
        ]
        .iter()
        .map(|f| json.find(f).unwrap())
        .collect();
        assert!(fields.windows(2).all(|w| w[0] < w[1]));
        assert!(json.contains("\"4\": \"hi\""));
        assert!(json.contains("\"hi\": 4"));
        assert!(json.find("\"[PAD]\": 0").unwrap() < json.find("\"hi\": 4").unwrap());
    }

    #[test]
    fn test_missing_field() {
        let mut value = valid_json();
        value.as_object_mut().unwrap().remove("reverseVocab");
        assert_malformed(value, "reverseVocab");
    }

    #[test]
    fn test_non_numeric_reverse_key() {
        let mut value = valid_json();
        value["reverseVocab"]["x"] = json!("oops");
        assert_malformed(value, "not a token id");
    }

    #[test]
    fn test_id_gap() {
        let mut value = valid_json();
        value["vocab"] = json!({ "[PAD]": 0, "[UNK]": 1, "[BOS]": 2, "[EOS]": 3, "hi": 7 });
        value["reverseVocab"] =
            json!({ "0": "[PAD]", "1": "[UNK]", "2": "[BOS]", "3": "[EOS]", "7": "hi" });
        assert_malformed(value, "dense range");
    }

    #[test]
    fn test_maps_disagree() {
        let mut value = valid_json();
        value["reverseVocab"]["4"] = json!("bye");
        assert_malformed(value, "not mirrored");
    }

    #[test]
    fn test_entry_count_mismatch() {
        let mut value = valid_json();
        value["vocab"]["extra"] = json!(5);
        assert_malformed(value, "entries");
    }

    #[test]
    fn test_vocab_size_mismatch() {
        let mut value = valid_json();
        value["vocabSize"] = json!(9);
        assert_malformed(value, "vocabSize");
    }

    #[test]
    fn test_special_bindings_must_match() {
        let mut value = valid_json();
        value["specialTokens"]["PAD"] = json!("<pad>");
        assert_malformed(value, "specialTokens");
    }

    #[test]
    fn test_special_ids_must_be_reserved() {
        let mut value = valid_json();
        value["vocab"] = json!({ "[UNK]": 0, "[PAD]": 1, "[BOS]": 2, "[EOS]": 3, "hi": 4 });
        value["reverseVocab"] =
            json!({ "0": "[UNK]", "1": "[PAD]", "2": "[BOS]", "3": "[EOS]", "4": "hi" });
        assert_malformed(value, "[PAD] must have id 0");
    }

    #[test]
    fn test_untrained_empty_snapshot() {
        let value = json!({
            "vocab": {},
            "reverseVocab": {},
            "specialTokens": specials(),
            "vocabSize": 0,
            "isTrained": false
        });
        let (tokens, trained) = check(value).unwrap();
        assert!(tokens.is_empty());
        assert!(!trained);
    }

    #[test]
    fn test_trained_flag_needs_vocabulary() {
        let value = json!({
            "vocab": {},
            "reverseVocab": {},
            "specialTokens": specials(),
            "vocabSize": 0,
            "isTrained": true
        });
        assert_malformed(value, "empty");
    }

    #[test]
    fn test_invalid_json_text() {
        let err = Snapshot::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TokenizerError::MalformedSnapshot(_)));
    }
}
