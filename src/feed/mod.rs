// file: src/feed/mod.rs
// description: arXiv feed query building, fetching and parsing
// reference: internal module structure

pub mod atom;
pub mod client;
pub mod query;

pub use atom::{FeedEntry, parse_feed};
pub use client::{ArxivClient, FetchedFeed};
pub use query::FeedQuery;
