use crate::config::AppConfig;
use crate::models::itinerary::ItineraryResult;
use crate::routes;
use crate::services::clock::{Clock, SystemClock};
use crate::services::generation_service::{GeminiClient, GenerationClient, GenerationError};
use crate::services::input_validator::InputValidator;
use crate::services::inspiration_service::InspirationPicker;
use crate::services::itinerary_pipeline::ItineraryPipeline;
use crate::services::rate_limiter::{RateLimiter, RateLimiterConfig};
use crate::services::response_cache::ResponseCache;
use crate::services::weather_service::{WeatherError, WeatherService};
use actix_web::web;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to create generation client: {0}")]
    Generation(#[from] GenerationError),
    #[error("Failed to create weather client: {0}")]
    Weather(#[from] WeatherError),
}

/// Endpoint details reported by the health check.
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub generation_key_configured: bool,
    pub generation_model: String,
    pub weather_api_base: String,
    pub geocoding_api_base: String,
}

/// Everything the handlers share. Built once, cloned into every worker
/// through `web::Data`.
pub struct AppState {
    pub validator: InputValidator,
    pub pipeline: ItineraryPipeline,
    pub inspiration: InspirationPicker,
    pub weather: WeatherService,
    pub info: ServiceInfo,
}

impl ServiceInfo {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            generation_key_configured: !config.gemini_api_key.trim().is_empty(),
            generation_model: config.gemini_model.clone(),
            weather_api_base: config.weather_api_base.clone(),
            geocoding_api_base: config.geocoding_api_base.clone(),
        }
    }
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let timeout = Duration::from_secs(config.http_timeout_secs);
        let generator: Arc<dyn GenerationClient> = Arc::new(GeminiClient::new(
            config.gemini_api_base.clone(),
            config.gemini_model.clone(),
            config.gemini_api_key.clone(),
            timeout,
        )?);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let weather = WeatherService::new(
            config.weather_api_base.clone(),
            config.geocoding_api_base.clone(),
            timeout,
            clock.clone(),
        )?;

        Ok(Self::assemble(
            config,
            generator,
            weather,
            clock,
            ServiceInfo::from_config(config),
        ))
    }

    /// Wires the services around an arbitrary generator and clock.
    pub fn assemble(
        config: &AppConfig,
        generator: Arc<dyn GenerationClient>,
        weather: WeatherService,
        clock: Arc<dyn Clock>,
        info: ServiceInfo,
    ) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(
            RateLimiterConfig {
                max_requests: config.rate_limit_max_requests,
                window_minutes: config.rate_limit_window_minutes,
            },
            clock.clone(),
        ));
        let cache: Arc<ResponseCache<ItineraryResult>> =
            Arc::new(ResponseCache::new(config.cache_ttl_minutes, clock));
        let validator = InputValidator::default();

        Self {
            pipeline: ItineraryPipeline::new(
                validator.clone(),
                rate_limiter,
                cache,
                generator.clone(),
            ),
            inspiration: InspirationPicker::new(generator),
            validator,
            weather,
            info,
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(|| async { "OK" }))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(routes::health::health_check))
                .route("/weather", web::get().to(routes::weather::get_forecast))
                .service(
                    web::scope("/itineraries")
                        .route("/generate", web::post().to(routes::itinerary::generate))
                        .route(
                            "/inspiration",
                            web::post().to(routes::itinerary::inspiration),
                        )
                        .route(
                            "/validate",
                            web::post().to(routes::itinerary::validate_input),
                        )
                        .route("/cache", web::delete().to(routes::itinerary::clear_cache)),
                ),
        );
}
