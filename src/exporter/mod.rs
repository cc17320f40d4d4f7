// file: src/exporter/mod.rs
// description: exporter module exports

pub mod json;

pub use json::{JsonExporter, to_json_string};
