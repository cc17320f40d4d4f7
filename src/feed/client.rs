// file: src/feed/client.rs
// description: single-request arXiv API client
// reference: https://info.arxiv.org/help/api/user-manual.html

use crate::config::FeedConfig;
use crate::error::{PipelineError, Result};
use crate::feed::atom::{FeedEntry, parse_feed};
use crate::feed::query::FeedQuery;
use crate::models::CandidateRecord;
use crate::utils::HealthCheck;
use crate::utils::text::truncate_chars;
use reqwest::Client;
use reqwest::header::ACCEPT;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const ERROR_PREVIEW_CHARS: usize = 200;

/// Records in feed order plus the number of entries dropped for missing dates or titles.
#[derive(Debug, Clone, Default)]
pub struct FetchedFeed {
    pub records: Vec<CandidateRecord>,
    pub dropped: usize,
}

#[derive(Clone)]
pub struct ArxivClient {
    http: Client,
    base_url: String,
}

impl ArxivClient {
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.clone(),
        })
    }

    /// One GET, no retry. Transport faults and non-success statuses are errors.
    pub async fn fetch(&self, query: &FeedQuery) -> Result<FetchedFeed> {
        let url = query.url(&self.base_url);
        info!("Fetching up to {} papers for {}", query.max_results(), query.expression());
        debug!("Feed request: {}", url);

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/atom+xml, application/xml;q=0.9, text/xml;q=0.8")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PipelineError::FeedStatus {
                status: status.as_u16(),
                body: error_preview(&body),
            });
        }

        let body = response.text().await?;
        let entries = parse_feed(&body)?;
        let total = entries.len();

        let records: Vec<CandidateRecord> = entries
            .into_iter()
            .filter_map(FeedEntry::into_record)
            .collect();
        let dropped = total - records.len();

        debug!("Parsed {} feed entries ({} dropped)", total, dropped);

        Ok(FetchedFeed { records, dropped })
    }

    /// Minimal one-result query used by the `status` command.
    pub async fn health_check(&self) -> HealthCheck {
        let started = Instant::now();
        let sample = FeedQuery::new("electron", crate::models::Domain::All, 1);

        match self.fetch(&sample).await {
            Ok(feed) => HealthCheck::healthy(
                "feed",
                Some(format!("{} reachable ({} entries)", self.base_url, feed.records.len())),
                started.elapsed(),
            ),
            Err(e) => HealthCheck::unhealthy("feed", e.to_string(), started.elapsed()),
        }
    }
}

/// Trimmed error body, cut to `ERROR_PREVIEW_CHARS` characters.
fn error_preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= ERROR_PREVIEW_CHARS {
        return trimmed.to_string();
    }
    let mut preview = truncate_chars(trimmed, ERROR_PREVIEW_CHARS);
    preview.push('…');
    preview
}
