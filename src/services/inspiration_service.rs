use crate::models::filters::ItineraryFilters;
use crate::services::generation_service::{GenerationClient, GenerationOptions};
use crate::services::prompt_builder::build_inspiration_prompt;
use std::sync::Arc;
use thiserror::Error;

const INSPIRATION_TEMPERATURE: f32 = 0.8;

#[derive(Debug, Error, PartialEq)]
pub enum InspirationError {
    #[error("Failed to get a suggestion. The AI service may be temporarily unavailable.")]
    GenerationUnavailable,
}

pub struct InspirationPicker {
    generator: Arc<dyn GenerationClient>,
}

impl InspirationPicker {
    pub fn new(generator: Arc<dyn GenerationClient>) -> Self {
        Self { generator }
    }

    /// Asks the model for a single fort name matching the filters.
    pub async fn suggest_fort(&self, filters: &ItineraryFilters) -> Result<String, InspirationError> {
        let prompt = build_inspiration_prompt(filters);

        let response = self
            .generator
            .generate(
                &prompt,
                GenerationOptions {
                    temperature: Some(INSPIRATION_TEMPERATURE),
                },
            )
            .await
            .map_err(|e| {
                log::error!("Error getting inspiration: {}", e);
                InspirationError::GenerationUnavailable
            })?;

        Ok(clean_fort_name(&response))
    }
}

/// Strips quotes, periods, commas and markdown emphasis from a bare name.
pub fn clean_fort_name(response: &str) -> String {
    response
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | '.' | ',' | '*'))
        .collect::<String>()
        .trim()
        .to_string()
}
