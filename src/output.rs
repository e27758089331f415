//! Console formatting for command results.

use colored::Colorize;

/// Print a section header
pub fn section(title: &str) {
    println!("{}", title.blue().bold());
}

/// Print a key-value pair
pub fn kv(key: &str, value: impl std::fmt::Display) {
    println!("{} {}", format!("{key}:").yellow(), value);
}

/// Print a result line
pub fn result(key: &str, value: impl std::fmt::Display) {
    println!("{} {}", format!("{key}:").green().bold(), value);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green().bold());
}

/// Print a sample vocabulary entry
pub fn entry(id: impl std::fmt::Display, token: &str) {
    println!("{}", format_entry(id, token).dimmed());
}

/// Entry line with the token quoted verbatim
fn format_entry(id: impl std::fmt::Display, token: &str) -> String {
    format!("    {id}: \"{token}\"")
}

/// Print a command failure to stderr, including its context chain
pub fn error(err: &anyhow::Error) {
    eprintln!("{} {err:#}", "Error:".red().bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_entry_is_verbatim() {
        assert_eq!(format_entry(4, "hello"), "    4: \"hello\"");
        assert_eq!(format_entry(5, "\"a\\b\""), "    5: \"\"a\\b\"\"");
    }
}
