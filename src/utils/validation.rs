// file: src/utils/validation.rs
// description: data validation utilities and helpers
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use std::fmt::Display;

pub struct Validator;

impl Validator {
    pub fn validate_range<T>(name: &str, value: T, min: T, max: T) -> Result<()>
    where
        T: PartialOrd + Display,
    {
        if value < min || value > max {
            return Err(PipelineError::Validation(format!(
                "{} must be between {} and {} (got {})",
                name, min, max, value
            )));
        }
        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(PipelineError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn validate_not_empty(name: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(PipelineError::Validation(format!("{} is empty", name)));
        }
        Ok(())
    }
}
