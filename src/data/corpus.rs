use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use derive_new::new;
use tracing::debug;

/// Training text used when no corpus file is given.
pub const FALLBACK_CORPUS: &str = "Hello world! This is a sample text for training our custom tokenizer. It handles punctuation, special tokens, and vocabulary learning.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CorpusSource {
    File(PathBuf),
    Fallback,
}

impl fmt::Display for CorpusSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Fallback => f.write_str("built-in sample text"),
        }
    }
}

/// Raw training text and where it came from.
#[derive(new, Clone, Debug)]
pub struct Corpus {
    pub text: String,
    pub source: CorpusSource,
}

impl Corpus {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read corpus {}", path.display()))?;
        debug!(path = %path.display(), bytes = text.len(), "loaded corpus");

        Ok(Self::new(text, CorpusSource::File(path.to_path_buf())))
    }

    pub fn fallback() -> Self {
        Self::new(FALLBACK_CORPUS.to_string(), CorpusSource::Fallback)
    }

    /// Read `path` when given, otherwise use the built-in sample.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::fallback()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    pub fn check_fallback() {
        let corpus = Corpus::load(None).unwrap();
        assert_eq!(corpus.source, CorpusSource::Fallback);
        assert!(corpus.text.starts_with("Hello world!"));
    }

    #[test]
    pub fn check_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "one two two").unwrap();

        let corpus = Corpus::load(Some(file.path())).unwrap();
        assert_eq!(corpus.text, "one two two");
        assert_eq!(corpus.source, CorpusSource::File(file.path().to_path_buf()));
    }

    #[test]
    pub fn check_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let err = Corpus::from_file(&missing).unwrap_err();
        assert!(err.to_string().contains("failed to read corpus"));
    }
}
