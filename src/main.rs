// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use semantic_arxiv::{
    Config, Domain, EngineRegistry, HealthReport, InteractiveSession, JsonExporter,
    PipelineOutcome, SearchConfig, SearchPipeline, TerminalPresenter, VERSION,
    exporter::to_json_string,
    utils::logging::{format_success, init_logger},
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "semantic_arxiv")]
#[command(author = "cipher")]
#[command(version = VERSION)]
#[command(about = "Search recent arXiv papers, rank them semantically and summarize them", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one search and print the results
    Search(SearchArgs),

    /// Keep a search session open and rerun it on every change
    Interactive,

    /// Load the models and check the feed endpoint
    Status,

    /// List the domains accepted by --domain
    Domains,
}

#[derive(Args)]
struct SearchArgs {
    /// Research technique, e.g. "graph neural networks"
    technique: Option<String>,

    #[arg(short, long)]
    domain: Option<Domain>,

    /// Papers fetched from arXiv (1-50)
    #[arg(short = 'n', long, value_name = "NUM")]
    max_results: Option<usize>,

    /// Papers shown (1-25)
    #[arg(long, value_name = "NUM")]
    display: Option<usize>,

    /// Keep feed order instead of ranking by similarity
    #[arg(long, action = ArgAction::SetTrue)]
    no_semantic: bool,

    /// Summarize abstracts with the chat model
    #[arg(short, long, action = ArgAction::SetTrue, conflicts_with = "no_summarize")]
    summarize: bool,

    /// Show abstracts even when the configuration enables summaries
    #[arg(long, action = ArgAction::SetTrue)]
    no_summarize: bool,

    /// Recency window in days (1-3650)
    #[arg(long, value_name = "DAYS")]
    days: Option<u32>,

    /// Print the report as JSON instead of a list
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Also write the report as JSON into this directory
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,
}

impl SearchArgs {
    fn into_search_config(self, defaults: &SearchConfig) -> SearchConfig {
        SearchConfig {
            technique: self.technique.unwrap_or_else(|| defaults.technique.clone()),
            domain: self.domain.unwrap_or(defaults.domain),
            max_results: self.max_results.unwrap_or(defaults.max_results),
            display_count: self.display.unwrap_or(defaults.display_count),
            semantic_ranking: defaults.semantic_ranking && !self.no_semantic,
            summarize: !self.no_summarize && (defaults.summarize || self.summarize),
            days_back: self.days.unwrap_or(defaults.days_back),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger(cli.color, cli.verbose);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Search(args) => {
            cmd_search(&config, args, cli.color).await?;
        }
        Commands::Interactive => {
            cmd_interactive(&config, cli.color).await?;
        }
        Commands::Status => {
            cmd_status(&config).await?;
        }
        Commands::Domains => {
            cmd_domains()?;
        }
    }

    Ok(())
}

async fn cmd_search(config: &Config, args: SearchArgs, show_progress: bool) -> Result<()> {
    let json = args.json;
    let export = args.export.clone();
    let search = args.into_search_config(&config.search);

    let registry = EngineRegistry::global(config);
    let pipeline = SearchPipeline::new(config, registry)
        .context("Failed to create search pipeline")?
        .with_progress(show_progress && !json);

    let start_time = Instant::now();
    let outcome = pipeline.run(&search).await.context("Search failed")?;
    info!("Search finished in {:.2}s", start_time.elapsed().as_secs_f64());

    if let (Some(dir), PipelineOutcome::Completed(report)) = (&export, &outcome) {
        let exporter = JsonExporter::new(dir).context("Failed to create export directory")?;
        let path = exporter
            .export_report(report, true)
            .context("Failed to export report")?;
        eprintln!("{}", format_success(&format!("Report written to {}", path.display())));
    }

    let presenter = TerminalPresenter::new();
    match (&outcome, json) {
        (PipelineOutcome::Completed(report), true) => {
            let rendered = to_json_string(report, true).context("Failed to serialize report")?;
            println!("{}", rendered);
        }
        (_, true) => {
            presenter.render(&mut io::stderr().lock(), &outcome)?;
        }
        (_, false) => {
            let mut stdout = io::stdout().lock();
            presenter.render(&mut stdout, &outcome)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

async fn cmd_interactive(config: &Config, show_progress: bool) -> Result<()> {
    let registry = EngineRegistry::global(config);
    let pipeline = SearchPipeline::new(config, registry)
        .context("Failed to create search pipeline")?
        .with_progress(show_progress);

    let mut session = InteractiveSession::new(pipeline, config.search.clone());
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    session
        .run(stdin.lock(), &mut stdout)
        .await
        .context("Interactive session failed")?;

    Ok(())
}

async fn cmd_status(config: &Config) -> Result<()> {
    info!("Checking model availability");

    let registry = EngineRegistry::global(config);
    let pipeline =
        SearchPipeline::new(config, registry).context("Failed to create search pipeline")?;

    let mut checks = vec![pipeline.client().health_check().await];
    checks.extend(registry.health_checks().await);

    let report = HealthReport::new(checks, VERSION.to_string());
    println!("{}", report.format());

    Ok(())
}

fn cmd_domains() -> Result<()> {
    let mut stdout = io::stdout().lock();
    for domain in Domain::ALL {
        writeln!(stdout, "{}", domain)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_args(args: &[&str]) -> SearchArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Search(args) => args,
            _ => panic!("expected the search command"),
        }
    }

    #[test]
    fn test_no_summarize_overrides_configured_summaries() {
        let defaults = SearchConfig {
            summarize: true,
            ..SearchConfig::default()
        };

        let kept = search_args(&["semantic_arxiv", "search", "rl"]).into_search_config(&defaults);
        assert!(kept.summarize);

        let disabled = search_args(&["semantic_arxiv", "search", "rl", "--no-summarize"])
            .into_search_config(&defaults);
        assert!(!disabled.summarize);
    }

    #[test]
    fn test_flags_override_defaults() {
        let search = search_args(&[
            "semantic_arxiv",
            "search",
            "graph neural networks",
            "--domain",
            "climate-science",
            "--max-results",
            "40",
            "--display",
            "5",
            "--no-semantic",
            "--summarize",
            "--days",
            "30",
        ])
        .into_search_config(&SearchConfig::default());

        assert_eq!(search.technique, "graph neural networks");
        assert_eq!(search.domain, Domain::ClimateScience);
        assert_eq!(search.max_results, 40);
        assert_eq!(search.display_count, 5);
        assert!(!search.semantic_ranking);
        assert!(search.summarize);
        assert_eq!(search.days_back, 30);
    }

    #[test]
    fn test_summarize_flags_conflict() {
        assert!(
            Cli::try_parse_from(["semantic_arxiv", "search", "rl", "--summarize", "--no-summarize"])
                .is_err()
        );
    }
}
