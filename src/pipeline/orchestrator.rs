// file: src/pipeline/orchestrator.rs
// description: coordinates fetch, recency filter, ranking, summarization and display selection
// reference: one linear pass per search run

use crate::config::{Config, DisplayConfig};
use crate::engines::{Capability, EngineRegistry};
use crate::error::Result;
use crate::extractor::extract_repo_links;
use crate::feed::{ArxivClient, FeedQuery};
use crate::models::{CandidateRecord, DisplayedPaper, SearchConfig, SearchReport, SummaryOutcome};
use crate::pipeline::filter::{filter_recent, recency_cutoff};
use crate::pipeline::progress::{RunStats, StageProgress};
use crate::pipeline::ranker::{clear_scores, rank_records};
use crate::summarizer::{SummarizationSettings, summarize_record};
use crate::utils::OperationTimer;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{info, warn};

const STAGES: usize = 4;
const SLOW_FETCH: Duration = Duration::from_secs(10);

/// How a search run ended. Only transport and feed errors are returned as `Err`.
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// No search term was given; nothing was fetched.
    MissingTechnique,

    /// Nothing survived the recency filter.
    NoResults {
        query_expression: String,
        fetched: usize,
        dropped: usize,
    },

    Completed(SearchReport),
}

pub struct SearchPipeline<'a> {
    client: ArxivClient,
    registry: &'a EngineRegistry,
    display: DisplayConfig,
    summarization: SummarizationSettings,
    show_progress: bool,
}

impl<'a> SearchPipeline<'a> {
    pub fn new(config: &Config, registry: &'a EngineRegistry) -> Result<Self> {
        Ok(Self {
            client: ArxivClient::new(&config.feed)?,
            registry,
            display: config.display.clone(),
            summarization: SummarizationSettings::from_config(&config.summarizer, &config.display),
            show_progress: false,
        })
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn client(&self) -> &ArxivClient {
        &self.client
    }

    pub async fn run(&self, search: &SearchConfig) -> Result<PipelineOutcome> {
        self.run_at(search, Utc::now()).await
    }

    /// Runs the pipeline with `now` as the reference time for the recency window.
    pub async fn run_at(
        &self,
        search: &SearchConfig,
        now: DateTime<Utc>,
    ) -> Result<PipelineOutcome> {
        search.validate()?;

        let Some(query) = FeedQuery::from_config(search) else {
            info!("No search technique given, nothing to fetch");
            return Ok(PipelineOutcome::MissingTechnique);
        };

        let mut stats = RunStats::new();
        let mut progress = StageProgress::new(STAGES, self.show_progress);

        progress.stage("Fetching papers from arXiv...");
        let timer = OperationTimer::new("feed fetch");
        let feed = self.client.fetch(&query).await?;
        timer.warn_if_slow(SLOW_FETCH);
        timer.finish_with_count(feed.records.len());
        stats.fetched = feed.records.len();
        stats.dropped_undated = feed.dropped;

        let cutoff = recency_cutoff(now, search.days_back);
        let (mut records, removed) = filter_recent(feed.records, cutoff);
        stats.filtered_out = removed;

        if records.is_empty() {
            progress.finish();
            info!(
                "No papers published since {} for {}",
                cutoff.format("%Y-%m-%d"),
                query.expression()
            );
            stats.duration_ms = progress.elapsed().as_millis();
            stats.log();
            return Ok(PipelineOutcome::NoResults {
                query_expression: query.expression(),
                fetched: stats.fetched,
                dropped: stats.dropped_undated,
            });
        }

        let eligible = stats.eligible();

        progress.stage("Ranking papers by semantic similarity...");
        let ranked = self.rank(&query, search, &mut records).await;
        if ranked {
            stats.ranked = records.len();
        }

        records.truncate(search.display_count);

        progress.stage("Summarizing abstracts...");
        let (summaries, summarizer_warning) = self.summaries(search, &records).await;
        stats.summarized = summaries.iter().filter(|s| s.is_summarized()).count();
        stats.summary_fallbacks = summaries.iter().filter(|s| s.is_fallback()).count();

        progress.stage("Preparing results...");
        let papers = self.display_list(records, summaries);
        stats.displayed = papers.len();

        progress.finish();
        stats.duration_ms = progress.elapsed().as_millis();
        stats.log();

        let report = SearchReport::new(
            query.expression(),
            query.ranking_text(),
            now,
            eligible,
            ranked,
            papers,
        )
        .with_summarizer_warning(summarizer_warning);

        Ok(PipelineOutcome::Completed(report))
    }

    /// Returns whether scores were attached. Every other path leaves all scores absent
    /// and the feed order untouched.
    async fn rank(
        &self,
        query: &FeedQuery,
        search: &SearchConfig,
        records: &mut [CandidateRecord],
    ) -> bool {
        if !search.semantic_ranking {
            clear_scores(records);
            return false;
        }

        let encoder = match self.registry.encoder().await {
            Capability::Available(encoder) => encoder.clone(),
            Capability::Unavailable(_) => {
                clear_scores(records);
                return false;
            }
        };

        let timer = OperationTimer::new("semantic ranking");
        match rank_records(encoder.as_ref(), &query.ranking_text(), records).await {
            Ok(()) => {
                timer.finish_with_count(records.len());
                true
            }
            Err(e) => {
                warn!("Ranking failed, keeping feed order: {}", e);
                clear_scores(records);
                false
            }
        }
    }

    /// One outcome per record plus the warning to show when the summarizer
    /// could not be loaded after being requested.
    async fn summaries(
        &self,
        search: &SearchConfig,
        records: &[CandidateRecord],
    ) -> (Vec<SummaryOutcome>, Option<String>) {
        if !search.summarize {
            return (vec![SummaryOutcome::NotRequested; records.len()], None);
        }

        let summarizer = match self.registry.summarizer().await {
            Capability::Available(summarizer) => summarizer.clone(),
            Capability::Unavailable(reason) => {
                let outcomes = records
                    .iter()
                    .map(|record| self.summarization.fallback(&record.abstract_text))
                    .collect();
                let warning = format!(
                    "Summarization model is unavailable ({}). Showing abstracts instead.",
                    reason
                );
                return (outcomes, Some(warning));
            }
        };

        let timer = OperationTimer::new("summarization");
        let mut outcomes = Vec::with_capacity(records.len());
        for record in records {
            outcomes.push(
                summarize_record(summarizer.as_ref(), &record.abstract_text, &self.summarization)
                    .await,
            );
        }
        timer.finish_with_count(outcomes.len());

        (outcomes, None)
    }

    fn display_list(
        &self,
        records: Vec<CandidateRecord>,
        summaries: Vec<SummaryOutcome>,
    ) -> Vec<DisplayedPaper> {
        records
            .into_iter()
            .zip(summaries)
            .enumerate()
            .map(|(position, (record, summary))| DisplayedPaper {
                index: position + 1,
                pdf_link: record.pdf_link(),
                repo_links: extract_repo_links(&record.abstract_text, self.display.max_repo_links),
                summary,
                record,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Domain;

    #[tokio::test]
    async fn test_blank_technique_halts_without_fetching() {
        let mut config = Config::default_config();
        // Unroutable; any fetch attempt would fail the test.
        config.feed.base_url = "http://127.0.0.1:9/api/query".to_string();
        let registry = EngineRegistry::new(&config);
        let pipeline = SearchPipeline::new(&config, &registry).unwrap();

        let search = SearchConfig {
            technique: "   ".to_string(),
            ..SearchConfig::default()
        };

        let outcome = pipeline.run(&search).await.unwrap();
        assert!(matches!(outcome, PipelineOutcome::MissingTechnique));
        assert!(!registry.encoder_loaded());
    }

    #[tokio::test]
    async fn test_quotes_only_technique_halts_without_fetching() {
        let mut config = Config::default_config();
        config.feed.base_url = "http://127.0.0.1:9/api/query".to_string();
        let registry = EngineRegistry::new(&config);
        let pipeline = SearchPipeline::new(&config, &registry).unwrap();

        let search = SearchConfig {
            technique: "\"\"".to_string(),
            ..SearchConfig::default()
        };

        let outcome = pipeline.run(&search).await.unwrap();
        assert!(matches!(outcome, PipelineOutcome::MissingTechnique));
    }

    #[tokio::test]
    async fn test_out_of_range_controls_are_rejected() {
        let config = Config::default_config();
        let registry = EngineRegistry::new(&config);
        let pipeline = SearchPipeline::new(&config, &registry).unwrap();

        let search = SearchConfig {
            technique: "transformers".to_string(),
            domain: Domain::Robotics,
            max_results: 51,
            ..SearchConfig::default()
        };

        assert!(pipeline.run(&search).await.is_err());
    }
}
