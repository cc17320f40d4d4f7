// file: src/session.rs
// description: line-oriented interactive search session
// reference: every control change reruns the search with the current settings

use crate::error::Result;
use crate::models::{Domain, SearchConfig};
use crate::pipeline::SearchPipeline;
use crate::presenter::TerminalPresenter;
use crate::utils::logging::{format_error, format_info};
use std::io::{BufRead, Write};
use tracing::debug;

const PROMPT: &str = "arxiv> ";

pub const HELP: &str = "\
Type a research technique to search, or a command:
  :domain <name>        restrict to a domain (`:domains` lists them, `All` clears)
  :max <1-50>           papers fetched from arXiv
  :display <1-25>       papers shown
  :semantic on|off      semantic ranking
  :summarize on|off     AI summaries
  :days <1-3650>        recency window in days
  :show                 current settings
  :help                 this message
  :quit                 leave the session";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Search(String),
    Domain(Domain),
    MaxResults(usize),
    Display(usize),
    Semantic(bool),
    Summarize(bool),
    Days(u32),
    ListDomains,
    Show,
    Help,
    Quit,
}

impl SessionCommand {
    /// Blank lines yield `Ok(None)`. Lines not starting with `:` are search techniques.
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let Some(command) = line.strip_prefix(':') else {
            return Ok(Some(SessionCommand::Search(line.to_string())));
        };

        let (name, argument) = match command.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (command, ""),
        };

        let parsed = match name.to_lowercase().as_str() {
            "domain" => SessionCommand::Domain(argument.parse()?),
            "max" => SessionCommand::MaxResults(parse_number(name, argument)?),
            "display" => SessionCommand::Display(parse_number(name, argument)?),
            "semantic" => SessionCommand::Semantic(parse_switch(name, argument)?),
            "summarize" => SessionCommand::Summarize(parse_switch(name, argument)?),
            "days" => SessionCommand::Days(parse_number(name, argument)?),
            "domains" => SessionCommand::ListDomains,
            "show" => SessionCommand::Show,
            "help" | "h" | "?" => SessionCommand::Help,
            "quit" | "q" | "exit" => SessionCommand::Quit,
            other => return Err(format!("unknown command ':{}' (try :help)", other)),
        };

        Ok(Some(parsed))
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, argument: &str) -> std::result::Result<T, String> {
    argument
        .parse()
        .map_err(|_| format!(":{} expects a whole number, got '{}'", name, argument))
}

fn parse_switch(name: &str, argument: &str) -> std::result::Result<bool, String> {
    match argument.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(format!(":{} expects on or off, got '{}'", name, argument)),
    }
}

pub struct InteractiveSession<'a> {
    pipeline: SearchPipeline<'a>,
    presenter: TerminalPresenter,
    search: SearchConfig,
}

impl<'a> InteractiveSession<'a> {
    pub fn new(pipeline: SearchPipeline<'a>, search: SearchConfig) -> Self {
        Self {
            pipeline,
            presenter: TerminalPresenter::new(),
            search,
        }
    }

    pub fn settings(&self) -> &SearchConfig {
        &self.search
    }

    /// Reads commands until end of input or `:quit`. Feed failures are printed
    /// and the session continues.
    pub async fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "{}", format_info("Semantic arXiv search. Type :help for commands."))?;
        self.prompt(out)?;

        for line in input.lines() {
            let line = line?;
            match SessionCommand::parse(&line) {
                Ok(None) => {}
                Ok(Some(SessionCommand::Quit)) => break,
                Ok(Some(command)) => self.apply(command, out).await?,
                Err(message) => writeln!(out, "{}", format_error(&message))?,
            }
            self.prompt(out)?;
        }

        writeln!(out)?;
        Ok(())
    }

    async fn apply<W: Write>(&mut self, command: SessionCommand, out: &mut W) -> Result<()> {
        let mut next = self.search.clone();
        match command {
            SessionCommand::Search(technique) => next.technique = technique,
            SessionCommand::Domain(domain) => next.domain = domain,
            SessionCommand::MaxResults(max) => next.max_results = max,
            SessionCommand::Display(count) => next.display_count = count,
            SessionCommand::Semantic(enabled) => next.semantic_ranking = enabled,
            SessionCommand::Summarize(enabled) => next.summarize = enabled,
            SessionCommand::Days(days) => next.days_back = days,
            SessionCommand::ListDomains => {
                for domain in Domain::ALL {
                    writeln!(out, "  {}", domain)?;
                }
                return Ok(());
            }
            SessionCommand::Show => return self.show(out),
            SessionCommand::Help => {
                writeln!(out, "{}", HELP)?;
                return Ok(());
            }
            SessionCommand::Quit => return Ok(()),
        }

        if let Err(e) = next.validate() {
            writeln!(out, "{}", format_error(&e.to_string()))?;
            return Ok(());
        }

        self.search = next;
        debug!("Session settings now {:?}", self.search);
        self.rerun(out).await
    }

    async fn rerun<W: Write>(&self, out: &mut W) -> Result<()> {
        match self.pipeline.run(&self.search).await {
            Ok(outcome) => self.presenter.render(out, &outcome)?,
            Err(e) => writeln!(out, "{}", format_error(&format!("Search failed: {}", e)))?,
        }
        Ok(())
    }

    fn show<W: Write>(&self, out: &mut W) -> Result<()> {
        let search = &self.search;
        writeln!(out, "  technique:  {}", search.technique().unwrap_or("(none)"))?;
        writeln!(out, "  domain:     {}", search.domain)?;
        writeln!(out, "  max:        {}", search.max_results)?;
        writeln!(out, "  display:    {}", search.display_count)?;
        writeln!(out, "  semantic:   {}", on_off(search.semantic_ranking))?;
        writeln!(out, "  summarize:  {}", on_off(search.summarize))?;
        writeln!(out, "  days:       {}", search.days_back)?;
        Ok(())
    }

    fn prompt<W: Write>(&self, out: &mut W) -> Result<()> {
        write!(out, "{}", PROMPT)?;
        out.flush()?;
        Ok(())
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::engines::EngineRegistry;
    use std::io::Cursor;

    #[test]
    fn test_parse_techniques_and_commands() {
        assert_eq!(SessionCommand::parse("   ").unwrap(), None);
        assert_eq!(
            SessionCommand::parse(" domain adaptation ").unwrap(),
            Some(SessionCommand::Search("domain adaptation".to_string()))
        );
        assert_eq!(
            SessionCommand::parse(":domain climate science").unwrap(),
            Some(SessionCommand::Domain(Domain::ClimateScience))
        );
        assert_eq!(
            SessionCommand::parse(":max 30").unwrap(),
            Some(SessionCommand::MaxResults(30))
        );
        assert_eq!(
            SessionCommand::parse(":semantic OFF").unwrap(),
            Some(SessionCommand::Semantic(false))
        );
        assert_eq!(SessionCommand::parse(":q").unwrap(), Some(SessionCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!(SessionCommand::parse(":days soon").is_err());
        assert!(SessionCommand::parse(":summarize maybe").is_err());
        assert!(SessionCommand::parse(":domain Gardening").is_err());
        assert!(SessionCommand::parse(":frobnicate").is_err());
    }

    #[tokio::test]
    async fn test_settings_change_without_technique_only_prompts() {
        colored::control::set_override(false);
        let mut config = Config::default_config();
        config.feed.base_url = "http://127.0.0.1:9/api/query".to_string();
        let registry = EngineRegistry::new(&config);
        let pipeline = SearchPipeline::new(&config, &registry).unwrap();
        let mut session = InteractiveSession::new(pipeline, SearchConfig::default());

        let input = Cursor::new(":display 5\n:max 99\n:show\n:quit\n:days 7\n");
        let mut out = Vec::new();
        session.run(input, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(session.settings().display_count, 5);
        assert_eq!(session.settings().max_results, 25);
        assert_eq!(session.settings().days_back, 365);
        assert!(text.contains("Enter a research technique"));
        assert!(text.contains("max_results"));
        assert!(text.contains("display:    5"));
        assert!(!registry.encoder_loaded());
    }
}
