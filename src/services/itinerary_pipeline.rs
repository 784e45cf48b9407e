use crate::models::filters::ItineraryFilters;
use crate::models::itinerary::ItineraryResult;
use crate::services::coordinate_parser::extract_coordinates;
use crate::services::generation_service::{GenerationClient, GenerationOptions};
use crate::services::input_validator::{InputValidator, RejectionReason, ValidationOutcome};
use crate::services::prompt_builder::build_itinerary_prompt;
use crate::services::rate_limiter::RateLimiter;
use crate::services::response_cache::ResponseCache;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    #[error("Rate limit exceeded. Please wait {reset_eta_minutes} minutes before making another request.")]
    RateLimited { reset_eta_minutes: u64 },
    #[error("Invalid input: {0}")]
    InvalidInput(RejectionReason),
    #[error("Failed to generate itinerary. The AI service may be temporarily unavailable.")]
    GenerationUnavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    CacheHit(ItineraryResult),
    Fresh(ItineraryResult),
}

impl Outcome {
    pub fn is_cache_hit(&self) -> bool {
        matches!(self, Outcome::CacheHit(_))
    }

    pub fn result(&self) -> &ItineraryResult {
        match self {
            Outcome::CacheHit(result) | Outcome::Fresh(result) => result,
        }
    }

    pub fn into_result(self) -> ItineraryResult {
        match self {
            Outcome::CacheHit(result) | Outcome::Fresh(result) => result,
        }
    }
}

/// Turns a filters object into an itinerary: rate limit, validate, cache
/// lookup, prompt, generation, coordinate parse, cache store.
///
/// Concurrent identical requests are not coalesced. Both miss the cache, both
/// call the model, and the later store wins.
pub struct ItineraryPipeline {
    validator: InputValidator,
    rate_limiter: Arc<RateLimiter>,
    cache: Arc<ResponseCache<ItineraryResult>>,
    generator: Arc<dyn GenerationClient>,
}

impl ItineraryPipeline {
    pub fn new(
        validator: InputValidator,
        rate_limiter: Arc<RateLimiter>,
        cache: Arc<ResponseCache<ItineraryResult>>,
        generator: Arc<dyn GenerationClient>,
    ) -> Self {
        Self {
            validator,
            rate_limiter,
            cache,
            generator,
        }
    }

    pub fn cache(&self) -> &ResponseCache<ItineraryResult> {
        &self.cache
    }

    pub async fn generate(&self, filters: &ItineraryFilters) -> Result<Outcome, PipelineError> {
        let request_id = Uuid::new_v4();

        // Cheapest rejection first, before any text processing.
        if !self.rate_limiter.can_make_request() {
            let reset_eta_minutes = self.rate_limiter.reset_eta_minutes();
            log::warn!(
                "[{}] Rate limit reached, next slot in {} min",
                request_id,
                reset_eta_minutes
            );
            return Err(PipelineError::RateLimited { reset_eta_minutes });
        }

        let sanitized_text = match self.validator.validate(&filters.forts_list) {
            ValidationOutcome::Valid { sanitized_text } => sanitized_text,
            ValidationOutcome::Invalid { reason } => {
                log::warn!("[{}] Rejected input: {:?}", request_id, reason);
                return Err(PipelineError::InvalidInput(reason));
            }
        };

        let sanitized_filters = filters.with_forts_list(sanitized_text);
        let cache_key = sanitized_filters.cache_key();

        if let Some(cached) = self.cache.get(&cache_key) {
            log::info!("[{}] Returning cached itinerary result", request_id);
            return Ok(Outcome::CacheHit(cached));
        }

        let prompt = build_itinerary_prompt(&sanitized_filters);
        log::debug!(
            "[{}] Built itinerary prompt ({} chars), named forts: {}",
            request_id,
            prompt.chars().count(),
            sanitized_filters.has_forts()
        );

        let itinerary_text = self
            .generator
            .generate(&prompt, GenerationOptions::default())
            .await
            .map_err(|e| {
                log::error!("[{}] Error generating itinerary: {}", request_id, e);
                PipelineError::GenerationUnavailable
            })?;

        let coordinates = extract_coordinates(&itinerary_text);
        if coordinates.is_none() {
            log::info!("[{}] Itinerary has no usable coordinates", request_id);
        }

        let result = ItineraryResult {
            itinerary_text,
            coordinates,
        };

        self.cache.set(cache_key, result.clone());
        log::info!("[{}] Generated and cached new itinerary", request_id);

        Ok(Outcome::Fresh(result))
    }
}
