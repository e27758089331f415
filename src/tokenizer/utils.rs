use super::Token;

/// Punctuation marks that always become tokens of their own.
pub const PUNCTUATION: [char; 6] = ['.', '!', '?', ';', ',', ':'];

/// Lowercase `text`, pad every punctuation mark with spaces and split on
/// whitespace. Training and encoding must both go through this function.
pub fn tokenize(text: &str) -> Vec<Token> {
    let lowered = text.to_lowercase();
    let mut spaced = String::with_capacity(lowered.len() + lowered.len() / 4);
    for c in lowered.chars() {
        if PUNCTUATION.contains(&c) {
            spaced.push(' ');
            spaced.push(c);
            spaced.push(' ');
        } else {
            spaced.push(c);
        }
    }

    spaced
        .split(is_separator)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Unicode whitespace plus the byte order mark.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}
