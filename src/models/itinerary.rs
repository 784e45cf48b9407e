use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A generated itinerary. `itinerary_text` is the raw model response,
/// coordinate trailer included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryResult {
    pub itinerary_text: String,
    pub coordinates: Option<Coordinates>,
}

/*
    Response body of /api/itineraries/generate
*/
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedItinerary {
    pub itinerary_text: String,
    pub display_text: String,
    pub coordinates: Option<Coordinates>,
    pub cached: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspirationResponse {
    pub fort_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidateInputRequest {
    #[serde(default)]
    pub input: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateInputResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanitized_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
