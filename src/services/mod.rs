pub mod clock;
pub mod coordinate_parser;
pub mod generation_service;
pub mod input_validator;
pub mod inspiration_service;
pub mod itinerary_pipeline;
pub mod prompt_builder;
pub mod rate_limiter;
pub mod response_cache;
pub mod weather_service;
