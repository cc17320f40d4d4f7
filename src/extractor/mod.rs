// file: src/extractor/mod.rs
// description: link extraction module exports
// reference: internal module structure

pub mod links;
pub mod patterns;

pub use links::extract_repo_links;
