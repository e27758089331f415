//! Word-level tokenizer.
//!
//! Builds a vocabulary from a corpus by counting lowercased words and
//! punctuation marks, then maps text to token IDs and back. The four special
//! tokens always occupy IDs 0 to 3.
//!
//! ```
//! use wordtok::tokenizer::WordTokenizer;
//!
//! let mut tokenizer = WordTokenizer::new();
//! tokenizer.train("Hello world! Hello again.", 1);
//!
//! let ids = tokenizer.encode("hello world", false).unwrap();
//! assert_eq!(tokenizer.decode(&ids, true).unwrap(), "hello world");
//! ```

mod error;
mod ext;
mod snapshot;
mod special;
mod utils;
mod word;

pub use error::*;
pub use ext::*;
pub use snapshot::*;
pub use special::*;
pub use utils::*;
pub use word::*;

pub type Token = String;
pub type TokenId = u32;

pub trait Tokenizer: Send + Sync {
    fn encode(&self, text: &str, add_special: bool) -> Result<Vec<TokenId>>;
    fn decode(&self, ids: &[TokenId], skip_special: bool) -> Result<String>;
}
