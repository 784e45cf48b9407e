use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use swarajya_trail_api::{app, config::AppConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    log::info!("Application starting...");

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("{}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    log::info!("Gemini API key: {}", config.api_key_summary());

    let state = app::AppState::from_config(&config).map_err(|e| {
        log::error!("{}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    let state = web::Data::new(state);

    log::info!(
        "Rate limit: {} requests per {} minutes, cache TTL {} minutes",
        config.rate_limit_max_requests,
        config.rate_limit_window_minutes,
        config.cache_ttl_minutes
    );
    log::info!("Attempting to bind to {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "DELETE"])
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(app::configure)
    })
    .bind((config.host.clone(), config.port))?
    .run()
    .await
}
