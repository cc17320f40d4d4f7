// file: src/presenter/terminal.rs
// description: renders pipeline outcomes as a numbered list on a terminal

use crate::models::{DisplayedPaper, SearchReport, SummaryOutcome};
use crate::pipeline::PipelineOutcome;
use crate::utils::logging::{format_info, format_success, format_warning};
use colored::*;
use std::io::{self, Write};

const SEPARATOR_WIDTH: usize = 72;

pub const MISSING_TECHNIQUE_NOTICE: &str =
    "Enter a research technique to search arXiv, e.g. \"graph neural networks\".";

/// Writes rendered results to any sink. Colors follow the global `colored` override.
#[derive(Debug, Clone, Default)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    pub fn new() -> Self {
        Self
    }

    pub fn render<W: Write>(&self, out: &mut W, outcome: &PipelineOutcome) -> io::Result<()> {
        match outcome {
            PipelineOutcome::MissingTechnique => {
                writeln!(out, "{}", format_info(MISSING_TECHNIQUE_NOTICE))
            }
            PipelineOutcome::NoResults {
                query_expression, ..
            } => writeln!(
                out,
                "{}",
                format_warning(&format!(
                    "No papers found for {} in the selected time window. \
                     Try a broader technique, another domain or a longer recency window.",
                    query_expression
                ))
            ),
            PipelineOutcome::Completed(report) => self.render_report(out, report),
        }
    }

    pub fn render_report<W: Write>(&self, out: &mut W, report: &SearchReport) -> io::Result<()> {
        if let Some(warning) = &report.summarizer_warning {
            writeln!(out, "{}", format_warning(warning))?;
        }

        for paper in &report.papers {
            self.render_paper(out, paper)?;
        }

        writeln!(out, "{}", format_success(&report.completion_line()))
    }

    fn render_paper<W: Write>(&self, out: &mut W, paper: &DisplayedPaper) -> io::Result<()> {
        let record = &paper.record;

        writeln!(out, "{}. {}", paper.index, record.title.bold())?;
        writeln!(out, "   {} {}", "Link:".dimmed(), record.link.blue().underline())?;
        if let Some(pdf) = &paper.pdf_link {
            writeln!(out, "   {} {}", "PDF:".dimmed(), pdf.blue().underline())?;
        }

        writeln!(out, "   {} {}", "Authors:".dimmed(), record.authors_display())?;
        writeln!(out, "   {} {}", "Published:".dimmed(), record.published_date())?;

        if let Some(score) = record.score {
            writeln!(out, "   {} {:.4}", "Semantic score:".dimmed(), score)?;
        }

        match &paper.summary {
            SummaryOutcome::Summarized(summary) => {
                writeln!(out, "   {} {}", "AI Summary:".cyan().bold(), summary)?;
            }
            SummaryOutcome::Fallback(text) => {
                writeln!(out, "   {} {}", "Abstract:".bold(), text)?;
            }
            SummaryOutcome::NotRequested => {
                writeln!(out, "   {} {}", "Abstract:".bold(), record.abstract_text)?;
            }
        }

        for link in &paper.repo_links {
            writeln!(out, "   {} {}", "GitHub Repo:".green(), link)?;
        }

        writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH).dimmed())
    }
}
