use serde_json::{json, Value};
use std::fmt::Display;

pub mod health;
pub mod itinerary;
pub mod weather;

pub(crate) fn error_body(err: &impl Display) -> Value {
    json!({ "error": err.to_string() })
}
