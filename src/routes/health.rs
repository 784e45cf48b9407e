use crate::app::AppState;
use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let generation_result = if state.info.generation_key_configured {
        ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!(
                "Gemini API key configured (model {})",
                state.info.generation_model
            )),
        }
    } else {
        ServiceStatus {
            status: "error".to_string(),
            details: Some("Gemini API key is not configured".to_string()),
        }
    };
    health
        .services
        .insert("generation".to_string(), generation_result.clone());

    let weather_result = check_endpoint(
        "Weather API",
        &state.info.weather_api_base,
        url::Url::parse(&state.info.weather_api_base).is_ok(),
    );
    health
        .services
        .insert("weather".to_string(), weather_result.clone());

    let geocoding_result = check_endpoint(
        "Geocoding API",
        &state.info.geocoding_api_base,
        url::Url::parse(&state.info.geocoding_api_base).is_ok(),
    );
    health
        .services
        .insert("geocoding".to_string(), geocoding_result.clone());

    health.services.insert(
        "itineraryCache".to_string(),
        ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("{} entries", state.pipeline.cache().len())),
        },
    );

    // Any misconfigured collaborator degrades the overall status
    if generation_result.status != "ok"
        || weather_result.status != "ok"
        || geocoding_result.status != "ok"
    {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

fn check_endpoint(label: &str, value: &str, valid: bool) -> ServiceStatus {
    if valid {
        ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("{} configured ({})", label, value)),
        }
    } else {
        ServiceStatus {
            status: "error".to_string(),
            details: Some(format!("{} misconfigured: '{}'", label, value)),
        }
    }
}
