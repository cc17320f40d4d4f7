// file: src/models/search_config.rs
// description: user-chosen parameters for one pipeline run
// reference: search controls exposed by the cli and interactive session

use crate::error::Result;
use crate::utils::Validator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MAX_FETCH_LIMIT: usize = 50;
pub const MAX_DISPLAY_COUNT: usize = 25;
pub const MAX_DAYS_BACK: u32 = 3650;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Domain {
    #[default]
    All,
    Healthcare,
    Defense,
    Finance,
    Education,
    Robotics,
    Energy,
    Transportation,
    Agriculture,
    Space,
    #[serde(rename = "Climate Science")]
    ClimateScience,
    Cybersecurity,
    #[serde(rename = "Quantum Computing")]
    QuantumComputing,
    Blockchain,
    #[serde(rename = "Social Sciences")]
    SocialSciences,
    Astrophysics,
}

impl Domain {
    pub const ALL: [Domain; 16] = [
        Domain::All,
        Domain::Healthcare,
        Domain::Defense,
        Domain::Finance,
        Domain::Education,
        Domain::Robotics,
        Domain::Energy,
        Domain::Transportation,
        Domain::Agriculture,
        Domain::Space,
        Domain::ClimateScience,
        Domain::Cybersecurity,
        Domain::QuantumComputing,
        Domain::Blockchain,
        Domain::SocialSciences,
        Domain::Astrophysics,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Domain::All => "All",
            Domain::Healthcare => "Healthcare",
            Domain::Defense => "Defense",
            Domain::Finance => "Finance",
            Domain::Education => "Education",
            Domain::Robotics => "Robotics",
            Domain::Energy => "Energy",
            Domain::Transportation => "Transportation",
            Domain::Agriculture => "Agriculture",
            Domain::Space => "Space",
            Domain::ClimateScience => "Climate Science",
            Domain::Cybersecurity => "Cybersecurity",
            Domain::QuantumComputing => "Quantum Computing",
            Domain::Blockchain => "Blockchain",
            Domain::SocialSciences => "Social Sciences",
            Domain::Astrophysics => "Astrophysics",
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Domain::All)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn fold_label(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Domain {
    type Err = String;

    /// Case-insensitive; spaces, hyphens and underscores are ignored so
    /// `climate-science` and `Climate Science` both parse.
    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = fold_label(value);
        Domain::ALL
            .iter()
            .copied()
            .find(|domain| fold_label(domain.label()) == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Domain::ALL.iter().map(Domain::label).collect();
                format!("unknown domain '{}' (expected one of: {})", value, known.join(", "))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub technique: String,
    pub domain: Domain,
    pub max_results: usize,
    pub display_count: usize,
    pub semantic_ranking: bool,
    pub summarize: bool,
    pub days_back: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            technique: String::new(),
            domain: Domain::All,
            max_results: 25,
            display_count: 10,
            semantic_ranking: true,
            summarize: false,
            days_back: 365,
        }
    }
}

impl SearchConfig {
    /// Trimmed technique, or `None` when the user has not entered one.
    pub fn technique(&self) -> Option<&str> {
        let trimmed = self.technique.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_range("max_results", self.max_results, 1, MAX_FETCH_LIMIT)?;
        Validator::validate_range("display_count", self.display_count, 1, MAX_DISPLAY_COUNT)?;
        Validator::validate_range("days_back", self.days_back, 1, MAX_DAYS_BACK)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_set_is_closed() {
        assert_eq!(Domain::ALL.len(), 16);
        assert_eq!(Domain::ALL[0], Domain::All);
        assert_eq!(Domain::default(), Domain::All);
    }

    #[test]
    fn test_domain_parsing_is_lenient() {
        assert_eq!("healthcare".parse::<Domain>().unwrap(), Domain::Healthcare);
        assert_eq!("Climate Science".parse::<Domain>().unwrap(), Domain::ClimateScience);
        assert_eq!("quantum-computing".parse::<Domain>().unwrap(), Domain::QuantumComputing);
        assert_eq!("SOCIAL_SCIENCES".parse::<Domain>().unwrap(), Domain::SocialSciences);
        assert!("Gardening".parse::<Domain>().is_err());
    }

    #[test]
    fn test_domain_labels_round_trip() {
        for domain in Domain::ALL {
            assert_eq!(domain.label().parse::<Domain>().unwrap(), domain);
        }
    }

    #[test]
    fn test_technique_trims_and_detects_absence() {
        let mut config = SearchConfig::default();
        assert_eq!(config.technique(), None);

        config.technique = "   ".to_string();
        assert_eq!(config.technique(), None);

        config.technique = "  deep learning ".to_string();
        assert_eq!(config.technique(), Some("deep learning"));
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut config = SearchConfig::default();
        config.max_results = 51;
        assert!(config.validate().is_err());

        let mut config = SearchConfig::default();
        config.display_count = 0;
        assert!(config.validate().is_err());

        let mut config = SearchConfig::default();
        config.days_back = 3651;
        assert!(config.validate().is_err());
    }
}
