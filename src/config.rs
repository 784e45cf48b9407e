use crate::services::generation_service::{DEFAULT_GEMINI_API_BASE, DEFAULT_GEMINI_MODEL};
use crate::services::rate_limiter::{DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW_MINUTES};
use crate::services::response_cache::DEFAULT_TTL_MINUTES;
use crate::services::weather_service::{DEFAULT_GEOCODING_API_BASE, DEFAULT_WEATHER_API_BASE};
use std::env;
use std::str::FromStr;
use thiserror::Error;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const HTTP_TIMEOUT_SECS: u64 = 30;
const GEMINI_KEY_PREFIX: &str = "AIza";
// One week.
const MAX_WINDOW_MINUTES: u64 = 7 * 24 * 60;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY environment variable is not set.")]
    MissingApiKey,
    #[error("API key format appears invalid. Expected to start with 'AIza'.")]
    InvalidApiKey,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_minutes: u64,
    pub cache_ttl_minutes: u64,
    pub weather_api_base: String,
    pub geocoding_api_base: String,
    pub http_timeout_secs: u64,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {}={:?}, using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// Like `parse_or`, but zero and values above `max` also fall back.
fn parse_bounded_or<T>(name: &str, default: T, max: T) -> T
where
    T: FromStr + Copy + std::fmt::Display + PartialOrd + Default,
{
    let value = parse_or(name, default);
    if value <= T::default() || value > max {
        log::warn!(
            "Ignoring out-of-range {}={}, expected 1..={}, using {}",
            name,
            value,
            max,
            default
        );
        return default;
    }
    value
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let gemini_api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        if !gemini_api_key.starts_with(GEMINI_KEY_PREFIX) {
            return Err(ConfigError::InvalidApiKey);
        }

        Ok(Self {
            host: var_or("HOST", HOST),
            port: parse_or("PORT", PORT),
            gemini_api_key,
            gemini_model: var_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_api_base: var_or("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE),
            rate_limit_max_requests: parse_bounded_or(
                "RATE_LIMIT_MAX_REQUESTS",
                DEFAULT_MAX_REQUESTS,
                usize::MAX,
            ),
            rate_limit_window_minutes: parse_bounded_or(
                "RATE_LIMIT_WINDOW_MINUTES",
                DEFAULT_WINDOW_MINUTES,
                MAX_WINDOW_MINUTES,
            ),
            cache_ttl_minutes: parse_bounded_or(
                "CACHE_TTL_MINUTES",
                DEFAULT_TTL_MINUTES,
                MAX_WINDOW_MINUTES,
            ),
            weather_api_base: var_or("WEATHER_API_BASE", DEFAULT_WEATHER_API_BASE),
            geocoding_api_base: var_or("GEOCODING_API_BASE", DEFAULT_GEOCODING_API_BASE),
            http_timeout_secs: parse_or("HTTP_TIMEOUT_SECS", HTTP_TIMEOUT_SECS),
        })
    }

    /// Key details safe to print: presence and length only.
    pub fn api_key_summary(&self) -> String {
        format!(
            "present: true, length: {}, starts with {}: {}",
            self.gemini_api_key.len(),
            GEMINI_KEY_PREFIX,
            self.gemini_api_key.starts_with(GEMINI_KEY_PREFIX)
        )
    }
}
