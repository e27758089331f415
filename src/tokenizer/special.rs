//! Reserved special tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::TokenId;

/// Logical role of a reserved token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialToken {
    Pad,
    Unk,
    Bos,
    Eos,
}

impl SpecialToken {
    /// All roles in ID order.
    pub const ALL: [SpecialToken; 4] = [Self::Pad, Self::Unk, Self::Bos, Self::Eos];

    /// Reserved ID of this role in every trained vocabulary.
    pub fn id(self) -> TokenId {
        self as TokenId
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pad => "[PAD]",
            Self::Unk => "[UNK]",
            Self::Bos => "[BOS]",
            Self::Eos => "[EOS]",
        }
    }
}

impl fmt::Display for SpecialToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Surface strings bound to each role, as persisted in snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct SpecialTokens {
    pub pad: String,
    pub unk: String,
    pub bos: String,
    pub eos: String,
}

impl Default for SpecialTokens {
    fn default() -> Self {
        Self {
            pad: SpecialToken::Pad.as_str().to_string(),
            unk: SpecialToken::Unk.as_str().to_string(),
            bos: SpecialToken::Bos.as_str().to_string(),
            eos: SpecialToken::Eos.as_str().to_string(),
        }
    }
}

impl SpecialTokens {
    pub fn get(&self, role: SpecialToken) -> &str {
        match role {
            SpecialToken::Pad => &self.pad,
            SpecialToken::Unk => &self.unk,
            SpecialToken::Bos => &self.bos,
            SpecialToken::Eos => &self.eos,
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        SpecialToken::ALL.iter().any(|&role| self.get(role) == token)
    }

    /// Number of special roles.
    pub fn count(&self) -> usize {
        SpecialToken::ALL.len()
    }
}
