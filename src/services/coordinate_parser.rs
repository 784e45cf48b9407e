use crate::models::itinerary::Coordinates;
use regex::Regex;
use std::sync::OnceLock;

fn coordinate_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Coordinates:\s*(-?[0-9]+\.?[0-9]*),\s*(-?[0-9]+\.?[0-9]*)")
            .expect("valid regex")
    })
}

/// Finds the first `Coordinates: <lat>, <lng>` pair anywhere in the text.
pub fn extract_coordinates(text: &str) -> Option<Coordinates> {
    let captures = coordinate_regex().captures(text)?;

    let lat: f64 = captures.get(1)?.as_str().parse().ok()?;
    let lng: f64 = captures.get(2)?.as_str().parse().ok()?;

    if !lat.is_finite() || !lng.is_finite() {
        return None;
    }

    Some(Coordinates { lat, lng })
}

/// Removes every line starting with `Coordinates:` and any trailing blank
/// lines left behind.
pub fn strip_coordinate_line(text: &str) -> String {
    let kept: Vec<&str> = text
        .lines()
        .filter(|line| !line.starts_with("Coordinates:"))
        .collect();

    kept.join("\n").trim_end().to_string()
}
