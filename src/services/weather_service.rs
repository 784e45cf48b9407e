//! Weather forecast for a fort's coordinates.
//!
//! Location names come from Nominatim reverse geocoding, forecasts from
//! Open-Meteo. Neither requires an API key. Geocoding failures degrade to a
//! coarse regional label; forecast failures are errors.

use crate::models::weather::{
    DailyForecast, ForecastResponse, GeocodeAddress, ReverseGeocodeResponse, WeatherIcon,
    WeatherResult,
};
use crate::services::clock::Clock;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_WEATHER_API_BASE: &str = "https://api.open-meteo.com";
pub const DEFAULT_GEOCODING_API_BASE: &str = "https://nominatim.openstreetmap.org";

const MAX_FORECAST_DAYS: i64 = 16;
const USER_AGENT: &str = "Swarajya-Trails-App";

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Weather forecast is only available for the next 16 days. Please select a date between today and {max_date}.")]
    DateOutOfRange { max_date: NaiveDate },
    #[error("No weather data available for {date}.")]
    NoData { date: NaiveDate },
    #[error("Failed to get weather forecast. Please try again later.")]
    Unavailable(String),
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::Unavailable(err.to_string())
    }
}

impl From<url::ParseError> for WeatherError {
    fn from(err: url::ParseError) -> Self {
        WeatherError::Unavailable(err.to_string())
    }
}

pub fn map_weather_icon(weather_code: i32) -> WeatherIcon {
    match weather_code {
        0 => WeatherIcon::Sunny,
        1..=3 => WeatherIcon::PartlyCloudy,
        45..=48 => WeatherIcon::Fog,
        51..=57 | 61..=67 | 80..=82 => WeatherIcon::Rain,
        71..=77 | 85..=86 => WeatherIcon::Snow,
        95..=99 => WeatherIcon::Thunderstorm,
        _ => WeatherIcon::PartlyCloudy,
    }
}

/// WMO weather interpretation codes.
pub fn weather_description(weather_code: i32) -> &'static str {
    match weather_code {
        0 => "clear sky",
        1 => "mainly clear",
        2 => "partly cloudy",
        3 => "overcast",
        45 => "fog",
        48 => "depositing rime fog",
        51 => "light drizzle",
        53 => "moderate drizzle",
        55 => "dense drizzle",
        56 => "light freezing drizzle",
        57 => "dense freezing drizzle",
        61 => "slight rain",
        63 => "moderate rain",
        65 => "heavy rain",
        66 => "light freezing rain",
        67 => "heavy freezing rain",
        71 => "slight snow fall",
        73 => "moderate snow fall",
        75 => "heavy snow fall",
        77 => "snow grains",
        80 => "slight rain showers",
        81 => "moderate rain showers",
        82 => "violent rain showers",
        85 => "slight snow showers",
        86 => "heavy snow showers",
        95 => "thunderstorm",
        96 => "thunderstorm with slight hail",
        99 => "thunderstorm with heavy hail",
        _ => "unknown conditions",
    }
}

// (name, lat range, lng range)
const REGIONS: &[(&str, (f64, f64), (f64, f64))] = &[
    ("Pune Region", (18.4, 18.6), (73.7, 74.0)),
    ("Mumbai Region", (19.0, 19.3), (72.7, 73.0)),
    ("Aurangabad Region", (19.7, 20.2), (75.2, 75.9)),
    ("Nagpur Region", (21.0, 21.3), (78.8, 79.2)),
    ("Kolhapur Region", (16.8, 17.4), (74.0, 74.5)),
    ("Satara Region", (17.6, 18.1), (74.0, 74.4)),
    ("Maharashtra", (15.6, 22.0), (72.6, 80.9)),
];

/// Coarse region label used when reverse geocoding is unavailable.
pub fn region_from_coordinates(lat: f64, lng: f64) -> &'static str {
    REGIONS
        .iter()
        .find(|(_, (lat_min, lat_max), (lng_min, lng_max))| {
            (*lat_min..=*lat_max).contains(&lat) && (*lng_min..=*lng_max).contains(&lng)
        })
        .map(|(name, _, _)| *name)
        .unwrap_or("Near Fort Location")
}

fn location_from_address(address: &GeocodeAddress) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();

    if let Some(place) = address
        .village
        .as_deref()
        .or(address.town.as_deref())
        .or(address.city.as_deref())
        .or(address.municipality.as_deref())
    {
        parts.push(place);
    }

    if let Some(district) = address.state_district.as_deref() {
        if !parts.iter().any(|part| part.contains(district)) {
            parts.push(district);
        }
    }

    if let Some(state) = address.state.as_deref() {
        parts.push(state);
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn location_from_response(response: &ReverseGeocodeResponse) -> Option<String> {
    if let Some(name) = response.address.as_ref().and_then(location_from_address) {
        return Some(name);
    }

    let display_name = response.display_name.as_deref()?;
    let name = display_name
        .split(',')
        .take(3)
        .collect::<Vec<_>>()
        .join(",")
        .trim()
        .to_string();

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Clone)]
pub struct WeatherService {
    client: Client,
    weather_api_base: String,
    geocoding_api_base: String,
    clock: Arc<dyn Clock>,
}

impl WeatherService {
    pub fn new(
        weather_api_base: impl Into<String>,
        geocoding_api_base: impl Into<String>,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            weather_api_base: weather_api_base.into().trim_end_matches('/').to_string(),
            geocoding_api_base: geocoding_api_base.into().trim_end_matches('/').to_string(),
            clock,
        })
    }

    fn today(&self) -> NaiveDate {
        DateTime::from_timestamp_millis(self.clock.now_millis())
            .map(|dt| dt.date_naive())
            .unwrap_or(NaiveDate::MIN)
    }

    pub async fn forecast(
        &self,
        lat: f64,
        lng: f64,
        date: Option<NaiveDate>,
    ) -> Result<WeatherResult, WeatherError> {
        let today = self.today();
        let requested = date.unwrap_or(today);
        let days_ahead = (requested - today).num_days();

        if days_ahead > MAX_FORECAST_DAYS {
            return Err(WeatherError::DateOutOfRange {
                max_date: today + ChronoDuration::days(MAX_FORECAST_DAYS),
            });
        }

        let is_current = days_ahead <= 0;
        let target = if is_current { today } else { requested };

        let location_name = self.location_name(lat, lng).await;
        let daily = self.fetch_daily(lat, lng, target).await?;

        let index = daily
            .time
            .iter()
            .position(|day| day == &target.to_string())
            .ok_or(WeatherError::NoData { date: target })?;

        let (Some(&code), Some(&min), Some(&max), Some(&wind)) = (
            daily.weather_code.get(index),
            daily.temperature_2m_min.get(index),
            daily.temperature_2m_max.get(index),
            daily.wind_speed_10m_max.get(index),
        ) else {
            return Err(WeatherError::NoData { date: target });
        };

        let temperature_min_c = min.round() as i32;
        let temperature_max_c = max.round() as i32;
        let wind_speed_kmh = wind.round() as i32;
        let condition = weather_description(code);

        let summary = if is_current {
            format!(
                "{}. Temperature range {}°C to {}°C with winds up to {} km/h.",
                capitalize(condition),
                temperature_min_c,
                temperature_max_c,
                wind_speed_kmh
            )
        } else {
            format!(
                "Expected {} with temperature range {}°C to {}°C and winds up to {} km/h.",
                condition, temperature_min_c, temperature_max_c, wind_speed_kmh
            )
        };

        Ok(WeatherResult {
            location_name,
            date: target,
            condition: condition.to_string(),
            icon: map_weather_icon(code),
            temperature_min_c,
            temperature_max_c,
            wind_speed_kmh,
            summary,
        })
    }

    async fn fetch_daily(
        &self,
        lat: f64,
        lng: f64,
        date: NaiveDate,
    ) -> Result<DailyForecast, WeatherError> {
        let day = date.to_string();
        let url = url::Url::parse_with_params(
            &format!("{}/v1/forecast", self.weather_api_base),
            &[
                ("latitude", lat.to_string()),
                ("longitude", lng.to_string()),
                (
                    "daily",
                    "weather_code,temperature_2m_max,temperature_2m_min,wind_speed_10m_max"
                        .to_string(),
                ),
                ("timezone", "auto".to_string()),
                ("start_date", day.clone()),
                ("end_date", day),
            ],
        )?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Unavailable(format!(
                "Weather API error: {}",
                status
            )));
        }

        let body: ForecastResponse = response.json().await?;
        match body.daily {
            Some(daily) if !daily.time.is_empty() => Ok(daily),
            _ => Err(WeatherError::NoData { date }),
        }
    }

    /// Human-readable place name, never failing.
    pub async fn location_name(&self, lat: f64, lng: f64) -> String {
        match self.reverse_geocode(lat, lng).await {
            Ok(Some(name)) => return name,
            Ok(None) => log::warn!("Reverse geocoding returned no usable address"),
            Err(e) => log::warn!("Reverse geocoding failed: {}", e),
        }

        format!(
            "{} ({:.3}, {:.3})",
            region_from_coordinates(lat, lng),
            lat,
            lng
        )
    }

    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<Option<String>, WeatherError> {
        let url = url::Url::parse_with_params(
            &format!("{}/reverse", self.geocoding_api_base),
            &[
                ("format", "json".to_string()),
                ("lat", lat.to_string()),
                ("lon", lng.to_string()),
                ("zoom", "10".to_string()),
                ("addressdetails", "1".to_string()),
            ],
        )?;

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(WeatherError::Unavailable(format!(
                "Geocoding failed: {}",
                response.status()
            )));
        }

        let body: ReverseGeocodeResponse = response.json().await?;
        Ok(location_from_response(&body))
    }
}
