#![allow(dead_code)]

use actix_web::{web, App};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use swarajya_trail_api::app::{configure, AppState, ServiceInfo};
use swarajya_trail_api::config::AppConfig;
use swarajya_trail_api::services::clock::{Clock, ManualClock};
use swarajya_trail_api::services::generation_service::{
    GenerationClient, GenerationError, GenerationOptions,
};
use swarajya_trail_api::services::weather_service::WeatherService;

// 2024-10-15T06:00:00Z
pub const NOW_MILLIS: i64 = 1_728_972_000_000;

pub const RAIGAD_ITINERARY: &str = "# Your Epic Fort Adventure: Raigad\n\n## Overview 🚩\nClimb to the capital of the Maratha empire.\n\n## Pro-Tips ✨\n* Start early\n* Carry water\n\nCoordinates: 18.2345, 73.4456";

/// Generation client that replays a fixed reply and records every prompt.
pub struct ScriptedGenerator {
    reply: Mutex<Result<String, u16>>,
    calls: Mutex<Vec<(String, GenerationOptions)>>,
}

impl ScriptedGenerator {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(Ok(reply.to_string())),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(Err(status)),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn set_reply(&self, reply: &str) {
        *self.reply.lock().unwrap() = Ok(reply.to_string());
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> String {
        self.calls
            .lock()
            .unwrap()
            .last()
            .map(|(prompt, _)| prompt.clone())
            .expect("no generation call recorded")
    }

    pub fn last_options(&self) -> GenerationOptions {
        self.calls
            .lock()
            .unwrap()
            .last()
            .map(|(_, options)| *options)
            .expect("no generation call recorded")
    }
}

#[async_trait]
impl GenerationClient for ScriptedGenerator {
    async fn generate(
        &self,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String, GenerationError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), options));

        match &*self.reply.lock().unwrap() {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(GenerationError::Status {
                status: *status,
                body: "scripted failure".to_string(),
            }),
        }
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        gemini_api_key: "AIzaTestKey".to_string(),
        gemini_model: "gemini-1.5-flash".to_string(),
        gemini_api_base: "http://127.0.0.1:9".to_string(),
        rate_limit_max_requests: 8,
        rate_limit_window_minutes: 10,
        cache_ttl_minutes: 30,
        weather_api_base: "http://127.0.0.1:9".to_string(),
        geocoding_api_base: "http://127.0.0.1:9".to_string(),
        http_timeout_secs: 5,
    }
}

pub struct TestApp {
    pub state: web::Data<AppState>,
    pub generator: Arc<ScriptedGenerator>,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub fn new(generator: Arc<ScriptedGenerator>) -> Self {
        Self::with_config(test_config(), generator)
    }

    pub fn with_config(config: AppConfig, generator: Arc<ScriptedGenerator>) -> Self {
        let clock = Arc::new(ManualClock::new(NOW_MILLIS));
        let clock_dyn: Arc<dyn Clock> = clock.clone();

        let weather = WeatherService::new(
            config.weather_api_base.clone(),
            config.geocoding_api_base.clone(),
            Duration::from_secs(config.http_timeout_secs),
            clock_dyn.clone(),
        )
        .expect("weather client");

        let info = ServiceInfo::from_config(&config);

        let state = AppState::assemble(&config, generator.clone(), weather, clock_dyn, info);

        Self {
            state: web::Data::new(state),
            generator,
            clock,
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .configure(configure)
    }
}
