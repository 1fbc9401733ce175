use serde::{Deserialize, Serialize};

use crate::format::Aqi;

/// Number of 3-hour forecast entries shown in the "Today at" sliders.
pub const HOURLY_SLOTS: usize = 8;
/// Forecast entries per calendar day (3-hour steps).
pub const ENTRIES_PER_DAY: usize = 8;
/// Index of the first entry picked for the five-day list.
pub const DAILY_OFFSET: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Hash route addressing these coordinates.
    pub fn hash(&self) -> String {
        format!("#/weather?lat={}&lon={}", self.latitude, self.longitude)
    }
}

/// Raw `lat=<v>` / `lon=<v>` query fragments.
///
/// Fragments coming from a hash route are never parsed into numbers; they are
/// forwarded into endpoint URLs exactly as written. A bad value surfaces as a
/// fetch error from the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    lat: String,
    lon: String,
}

impl LocationQuery {
    pub fn from_fragments(lat: impl Into<String>, lon: impl Into<String>) -> Self {
        Self {
            lat: lat.into(),
            lon: lon.into(),
        }
    }

    pub fn from_coordinates(coords: Coordinates) -> Self {
        Self::from_fragments(
            format!("lat={}", coords.latitude),
            format!("lon={}", coords.longitude),
        )
    }

    pub fn lat(&self) -> &str {
        &self.lat
    }

    pub fn lon(&self) -> &str {
        &self.lon
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub country: String,
    pub state: Option<String>,
    pub coordinates: Coordinates,
}

impl Place {
    /// "Kolkata, IN" style label used for the current-conditions card.
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }

    /// "West Bengal IN" style subtitle used in search results.
    pub fn subtitle(&self) -> String {
        format!("{} {}", self.state.as_deref().unwrap_or(""), self.country)
    }

    pub fn hash(&self) -> String {
        self.coordinates.hash()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub description: String,
    /// Provider icon code, e.g. "04d".
    pub icon: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed_mps: f64,
    pub direction_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub visibility_m: u32,
    pub wind: Wind,
    pub condition: Condition,
    pub sunrise: i64,
    pub sunset: i64,
    /// Shift from UTC in seconds.
    pub timezone_offset: i32,
    pub observed_at: i64,
}

impl WeatherSnapshot {
    pub fn visibility_km(&self) -> f64 {
        f64::from(self.visibility_m) / 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirQualitySample {
    pub aqi: Aqi,
    pub pm2_5: f64,
    pub so2: f64,
    pub no2: f64,
    pub o3: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: i64,
    pub temperature_c: f64,
    pub temperature_max_c: f64,
    pub condition: Condition,
    pub wind: Wind,
}

/// 3-hour forecast entries spanning five days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub entries: Vec<ForecastEntry>,
    pub timezone_offset: i32,
}

impl ForecastSeries {
    /// The next 24 hours: the first `min(8, len)` entries, in order.
    pub fn hourly(&self) -> &[ForecastEntry] {
        &self.entries[..self.entries.len().min(HOURLY_SLOTS)]
    }

    /// One entry per day: indices 7, 15, 23, ...
    pub fn daily(&self) -> impl Iterator<Item = &ForecastEntry> {
        self.entries.iter().skip(DAILY_OFFSET).step_by(ENTRIES_PER_DAY)
    }
}
