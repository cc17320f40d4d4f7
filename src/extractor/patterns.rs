// file: src/extractor/patterns.rs
// description: compiled regex patterns for link extraction
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // A repository URL ends at whitespace, a closing bracket or paren, a period,
    // a comma or an angle bracket.
    pub static ref GITHUB_REPO: Regex = Regex::new(
        r"(?i)https?://github\.com[^\s\)\]\.,<>]+"
    ).expect("GITHUB_REPO regex is valid");
}

pub fn mentions_github(text: &str) -> bool {
    text.to_ascii_lowercase().contains("github.com")
}
