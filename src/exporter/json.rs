// file: src/exporter/json.rs
// description: json export of search reports

use crate::error::Result;
use crate::models::SearchReport;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes the report to `arxiv_search_<timestamp>.json` and returns the path.
    pub fn export_report(&self, report: &SearchReport, pretty: bool) -> Result<PathBuf> {
        let file_name = format!(
            "arxiv_search_{}.json",
            report.generated_at.format("%Y%m%d_%H%M%S")
        );
        let path = self.output_dir.join(file_name);

        fs::write(&path, to_json_string(report, pretty)?)?;

        info!(
            "Exported {} papers to {}",
            report.displayed,
            path.display()
        );
        Ok(path)
    }
}

pub fn to_json_string(report: &SearchReport, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(json)
}
