// file: src/feed/query.rs
// description: builds the arXiv search expression and request url
// reference: https://info.arxiv.org/help/api/user-manual.html#query_details

use crate::models::{Domain, SearchConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    technique: String,
    domain: Domain,
    max_results: usize,
}

impl FeedQuery {
    /// `None` when the configuration carries no usable technique once quotes are removed.
    pub fn from_config(config: &SearchConfig) -> Option<Self> {
        let query = Self::new(config.technique()?, config.domain, config.max_results);
        (!query.technique.is_empty()).then_some(query)
    }

    pub fn new(technique: &str, domain: Domain, max_results: usize) -> Self {
        // embedded quotes would terminate the phrase clause early
        let technique = technique.replace('"', "").trim().to_string();
        Self {
            technique,
            domain,
            max_results,
        }
    }

    pub fn technique(&self) -> &str {
        &self.technique
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// `all:"<technique>"`, joined with `AND all:"<domain>"` unless the domain is `All`.
    pub fn expression(&self) -> String {
        if self.domain.is_all() {
            format!("all:\"{}\"", self.technique)
        } else {
            format!("all:\"{}\" AND all:\"{}\"", self.technique, self.domain.label())
        }
    }

    pub fn encoded_expression(&self) -> String {
        urlencoding::encode(&self.expression()).into_owned()
    }

    /// Newest submissions first, a single page starting at zero.
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}?search_query={}&start=0&max_results={}&sortBy=submittedDate&sortOrder=descending",
            base_url.trim_end_matches('?'),
            self.encoded_expression(),
            self.max_results
        )
    }

    /// Text embedded as the ranking query: the technique, followed by the domain when one is selected.
    pub fn ranking_text(&self) -> String {
        if self.domain.is_all() {
            self.technique.clone()
        } else {
            format!("{} {}", self.technique, self.domain.label())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quotes_only_technique_is_missing() {
        let config = SearchConfig {
            technique: "\"\"".to_string(),
            ..SearchConfig::default()
        };
        assert_eq!(FeedQuery::from_config(&config), None);

        let spaced = SearchConfig {
            technique: " \" \" ".to_string(),
            ..SearchConfig::default()
        };
        assert_eq!(FeedQuery::from_config(&spaced), None);
    }

    #[test]
    fn test_quotes_are_stripped_from_technique() {
        let config = SearchConfig {
            technique: "\"graph\" networks".to_string(),
            ..SearchConfig::default()
        };
        let query = FeedQuery::from_config(&config).unwrap();
        assert_eq!(query.technique(), "graph networks");
    }

    #[test]
    fn test_expression_without_domain() {
        let query = FeedQuery::new("  deep learning ", Domain::All, 25);
        assert_eq!(query.expression(), r#"all:"deep learning""#);
    }

    #[test]
    fn test_expression_with_domain() {
        let query = FeedQuery::new("machine learning", Domain::Healthcare, 25);
        assert_eq!(
            query.expression(),
            r#"all:"machine learning" AND all:"Healthcare""#
        );
    }

    #[test]
    fn test_every_domain_adds_clause_iff_not_all() {
        for domain in Domain::ALL {
            let expression = FeedQuery::new("graph neural networks", domain, 10).expression();
            assert!(expression.starts_with(r#"all:"graph neural networks""#));
            let has_domain_clause = expression.contains(" AND all:");
            assert_eq!(has_domain_clause, !domain.is_all(), "domain {}", domain);
            if !domain.is_all() {
                assert!(expression.ends_with(&format!("all:\"{}\"", domain.label())));
            }
        }
    }

    #[test]
    fn test_encoded_expression() {
        let query = FeedQuery::new("machine learning", Domain::ClimateScience, 25);
        assert_eq!(
            query.encoded_expression(),
            "all%3A%22machine%20learning%22%20AND%20all%3A%22Climate%20Science%22"
        );
    }

    #[test]
    fn test_url_parameters() {
        let query = FeedQuery::new("rl", Domain::All, 7);
        assert_eq!(
            query.url("https://export.arxiv.org/api/query"),
            "https://export.arxiv.org/api/query?search_query=all%3A%22rl%22&start=0&max_results=7&sortBy=submittedDate&sortOrder=descending"
        );
    }

    #[test]
    fn test_embedded_quotes_are_dropped() {
        let query = FeedQuery::new(r#"say "hello""#, Domain::All, 5);
        assert_eq!(query.expression(), r#"all:"say hello""#);
    }

    #[test]
    fn test_from_config_requires_technique() {
        let mut config = SearchConfig::default();
        assert!(FeedQuery::from_config(&config).is_none());

        config.technique = "transformers".to_string();
        config.domain = Domain::Robotics;
        let query = FeedQuery::from_config(&config).unwrap();
        assert_eq!(query.technique(), "transformers");
        assert_eq!(query.max_results(), 25);
        assert_eq!(query.ranking_text(), "transformers Robotics");
    }
}
