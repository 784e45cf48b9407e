use crate::app::AppState;
use crate::models::weather::WeatherQuery;
use crate::routes::error_body;
use crate::services::weather_service::WeatherError;
use actix_web::{web, HttpResponse, Responder};

/*
    /api/weather?lat={lat}&lng={lng}&date={yyyy-mm-dd}
*/
pub async fn get_forecast(
    state: web::Data<AppState>,
    query: web::Query<WeatherQuery>,
) -> impl Responder {
    let WeatherQuery { lat, lng, date } = query.into_inner();

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return HttpResponse::BadRequest().json(error_body(&"Invalid coordinates"));
    }

    match state.weather.forecast(lat, lng, date).await {
        Ok(weather) => HttpResponse::Ok().json(weather),
        Err(err @ WeatherError::DateOutOfRange { .. }) => {
            HttpResponse::BadRequest().json(error_body(&err))
        }
        Err(err @ WeatherError::NoData { .. }) => HttpResponse::NotFound().json(error_body(&err)),
        Err(WeatherError::Unavailable(detail)) => {
            log::error!("Error getting weather forecast: {}", detail);
            HttpResponse::ServiceUnavailable()
                .json(error_body(&WeatherError::Unavailable(detail)))
        }
    }
}
