use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherIcon {
    Sunny,
    PartlyCloudy,
    Cloudy,
    Rain,
    Thunderstorm,
    Snow,
    Windy,
    Fog,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherResult {
    pub location_name: String,
    pub date: NaiveDate,
    pub condition: String,
    pub icon: WeatherIcon,
    pub temperature_min_c: i32,
    pub temperature_max_c: i32,
    pub wind_speed_kmh: i32,
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub lat: f64,
    pub lng: f64,
    pub date: Option<NaiveDate>,
}

// Open-Meteo daily forecast payload
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub daily: Option<DailyForecast>,
}

#[derive(Debug, Deserialize)]
pub struct DailyForecast {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub weather_code: Vec<i32>,
    #[serde(default)]
    pub temperature_2m_max: Vec<f64>,
    #[serde(default)]
    pub temperature_2m_min: Vec<f64>,
    #[serde(default)]
    pub wind_speed_10m_max: Vec<f64>,
}

// Nominatim reverse geocoding payload
#[derive(Debug, Deserialize)]
pub struct ReverseGeocodeResponse {
    pub address: Option<GeocodeAddress>,
    pub display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeocodeAddress {
    pub village: Option<String>,
    pub town: Option<String>,
    pub city: Option<String>,
    pub municipality: Option<String>,
    pub state_district: Option<String>,
    pub state: Option<String>,
}
