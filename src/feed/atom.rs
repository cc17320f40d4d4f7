// file: src/feed/atom.rs
// description: Atom feed parsing into loosely-typed entries
// reference: https://docs.rs/quick-xml

use crate::error::{PipelineError, Result};
use crate::models::CandidateRecord;
use crate::utils::text::collapse_whitespace;
use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

pub const FEED_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One `<entry>` as it appears in the feed; any field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub published: Option<String>,
    pub updated: Option<String>,
    pub authors: Vec<String>,
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), FEED_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

impl FeedEntry {
    /// `published`, falling back to `updated`.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.published
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| self.updated.as_deref().and_then(parse_timestamp))
    }

    /// Entries without a parseable timestamp or without a title yield `None`.
    pub fn into_record(self) -> Option<CandidateRecord> {
        let published = self.timestamp()?;
        let title = collapse_whitespace(self.title.as_deref().unwrap_or_default());
        if title.is_empty() {
            return None;
        }

        let id = self.id.unwrap_or_default();
        let link = self.link.unwrap_or_else(|| id.clone());

        Some(CandidateRecord::new(
            id,
            title,
            link,
            self.summary.unwrap_or_default(),
            published,
            self.authors,
        ))
    }

    fn is_api_error(&self) -> bool {
        self.id
            .as_deref()
            .is_some_and(|id| id.contains("/api/errors"))
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Field {
    Id,
    Title,
    Summary,
    Published,
    Updated,
    AuthorName,
}

fn link_attributes(e: &BytesStart) -> (Option<String>, Option<String>) {
    let mut rel = None;
    let mut href = None;
    for attr in e.attributes().flatten() {
        let value = String::from_utf8_lossy(&attr.value).to_string();
        match attr.key.as_ref() {
            b"rel" => rel = Some(value),
            b"href" => href = Some(value),
            _ => {}
        }
    }
    (rel, href)
}

/// Parses an Atom document. The arXiv API reports query errors as a single
/// entry whose id points at its error namespace; that is surfaced as an error.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut entries = Vec::new();
    let mut current: Option<FeedEntry> = None;
    let mut in_author = false;
    let mut field: Option<Field> = None;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"entry" => {
                    current = Some(FeedEntry::default());
                    in_author = false;
                    field = None;
                }
                b"author" if current.is_some() => in_author = true,
                b"link" if current.is_some() => apply_link(&mut current, &e),
                name if current.is_some() => {
                    field = match name {
                        b"id" => Some(Field::Id),
                        b"title" => Some(Field::Title),
                        b"summary" => Some(Field::Summary),
                        b"published" => Some(Field::Published),
                        b"updated" => Some(Field::Updated),
                        b"name" if in_author => Some(Field::AuthorName),
                        _ => None,
                    };
                    text.clear();
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"link" {
                    apply_link(&mut current, &e);
                }
            }
            Ok(Event::Text(t)) => {
                if field.is_some() {
                    let decoded = t
                        .unescape()
                        .map_err(|e| PipelineError::FeedParse(e.to_string()))?;
                    text.push_str(&decoded);
                }
            }
            Ok(Event::CData(t)) => {
                if field.is_some() {
                    text.push_str(&String::from_utf8_lossy(&t.into_inner()));
                }
            }
            Ok(Event::End(e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"entry" => {
                        if let Some(entry) = current.take() {
                            entries.push(entry);
                        }
                        field = None;
                    }
                    b"author" => in_author = false,
                    _ => {
                        if let (Some(entry), Some(target)) = (current.as_mut(), field.take()) {
                            let value = std::mem::take(&mut text);
                            match target {
                                Field::Id => entry.id = Some(value),
                                Field::Title => entry.title = Some(value),
                                Field::Summary => entry.summary = Some(value),
                                Field::Published => entry.published = Some(value),
                                Field::Updated => entry.updated = Some(value),
                                Field::AuthorName => entry.authors.push(value),
                            }
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PipelineError::FeedParse(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    if let Some(error_entry) = entries.iter().find(|entry| entry.is_api_error()) {
        return Err(PipelineError::FeedParse(format!(
            "arXiv API rejected the query: {}",
            error_entry
                .summary
                .as_deref()
                .map(collapse_whitespace)
                .unwrap_or_else(|| "unknown error".to_string())
        )));
    }

    Ok(entries)
}

/// The first `rel="alternate"` link (or a link without `rel`) is the canonical page.
fn apply_link(current: &mut Option<FeedEntry>, e: &BytesStart) {
    let Some(entry) = current.as_mut() else {
        return;
    };
    if entry.link.is_some() {
        return;
    }
    let (rel, href) = link_attributes(e);
    if matches!(rel.as_deref(), None | Some("alternate")) {
        entry.link = href;
    }
}
