use crate::app::AppState;
use crate::models::filters::ItineraryFilters;
use crate::models::itinerary::{
    GeneratedItinerary, InspirationResponse, ValidateInputRequest, ValidateInputResponse,
};
use crate::routes::error_body;
use crate::services::coordinate_parser::strip_coordinate_line;
use crate::services::input_validator::ValidationOutcome;
use crate::services::itinerary_pipeline::PipelineError;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

/*
    /api/itineraries/generate
*/
pub async fn generate(
    state: web::Data<AppState>,
    input: web::Json<ItineraryFilters>,
) -> impl Responder {
    let filters = input.into_inner();

    match state.pipeline.generate(&filters).await {
        Ok(outcome) => {
            let cached = outcome.is_cache_hit();
            let result = outcome.into_result();
            HttpResponse::Ok().json(GeneratedItinerary {
                display_text: strip_coordinate_line(&result.itinerary_text),
                itinerary_text: result.itinerary_text,
                coordinates: result.coordinates,
                cached,
            })
        }
        Err(err) => pipeline_error_response(&err),
    }
}

fn pipeline_error_response(err: &PipelineError) -> HttpResponse {
    match err {
        PipelineError::RateLimited { reset_eta_minutes } => HttpResponse::TooManyRequests()
            .insert_header(("Retry-After", (reset_eta_minutes * 60).to_string()))
            .json(json!({
                "error": err.to_string(),
                "resetEtaMinutes": reset_eta_minutes,
            })),
        PipelineError::InvalidInput(reason) => HttpResponse::BadRequest().json(json!({
            "error": err.to_string(),
            "reason": reason,
        })),
        PipelineError::GenerationUnavailable => {
            HttpResponse::ServiceUnavailable().json(error_body(err))
        }
    }
}

/*
    /api/itineraries/inspiration
*/
pub async fn inspiration(
    state: web::Data<AppState>,
    input: web::Json<ItineraryFilters>,
) -> impl Responder {
    match state.inspiration.suggest_fort(&input).await {
        Ok(fort_name) => HttpResponse::Ok().json(InspirationResponse { fort_name }),
        Err(err) => HttpResponse::ServiceUnavailable().json(error_body(&err)),
    }
}

/*
    /api/itineraries/validate
*/
pub async fn validate_input(
    state: web::Data<AppState>,
    input: web::Json<ValidateInputRequest>,
) -> impl Responder {
    let response = match state.validator.validate(&input.input) {
        ValidationOutcome::Valid { sanitized_text } => ValidateInputResponse {
            valid: true,
            sanitized_text: Some(sanitized_text),
            reason: None,
        },
        ValidationOutcome::Invalid { reason } => ValidateInputResponse {
            valid: false,
            sanitized_text: None,
            reason: Some(reason.to_string()),
        },
    };

    HttpResponse::Ok().json(response)
}

/*
    /api/itineraries/cache
*/
pub async fn clear_cache(state: web::Data<AppState>) -> impl Responder {
    let cache = state.pipeline.cache();
    log::info!("Clearing {} cached itineraries", cache.len());
    cache.clear();
    HttpResponse::NoContent().finish()
}
