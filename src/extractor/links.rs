// file: src/extractor/links.rs
// description: GitHub repository links mentioned in paper abstracts

use crate::extractor::patterns::{GITHUB_REPO, mentions_github};

/// Up to `limit` distinct repository links, in order of first appearance.
pub fn extract_repo_links(text: &str, limit: usize) -> Vec<String> {
    if limit == 0 || !mentions_github(text) {
        return Vec::new();
    }

    let mut links: Vec<String> = Vec::new();
    for found in GITHUB_REPO.find_iter(text) {
        let link = found.as_str();
        if !links.iter().any(|seen| seen == link) {
            links.push(link.to_string());
        }
        if links.len() == limit {
            break;
        }
    }
    links
}
