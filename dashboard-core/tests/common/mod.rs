//! Shared fakes for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Notify, oneshot};

use dashboard_core::{
    AirQualitySample, Coordinates, Dashboard, Endpoint, FetchError, ForecastSeries, Geolocator,
    LocationError, LocationQuery, Page, Place, SEARCH_DEBOUNCE, SearchController, SharedPage,
    WeatherSnapshot, WeatherSource,
    format::Aqi,
    model::{Condition, ForecastEntry, Wind},
};

pub fn snapshot() -> WeatherSnapshot {
    WeatherSnapshot {
        temperature_c: 31.8,
        feels_like_c: 38.2,
        humidity_pct: 74,
        pressure_hpa: 1002,
        visibility_m: 4500,
        wind: Wind {
            speed_mps: 3.1,
            direction_deg: 180.0,
        },
        condition: Condition {
            description: "haze".into(),
            icon: "50d".into(),
        },
        sunrise: 1_718_750_000,
        sunset: 1_718_799_000,
        timezone_offset: 19_800,
        observed_at: 1_718_812_620,
    }
}

pub fn series(len: usize) -> ForecastSeries {
    ForecastSeries {
        entries: (0..len)
            .map(|i| ForecastEntry {
                timestamp: 1_718_812_800 + (i as i64) * 3 * 3600,
                temperature_c: 28.0 + (i % 8) as f64,
                temperature_max_c: 33.0,
                condition: Condition {
                    description: "light rain".into(),
                    icon: "10n".into(),
                },
                wind: Wind {
                    speed_mps: 5.0,
                    direction_deg: 270.0,
                },
            })
            .collect(),
        timezone_offset: 19_800,
    }
}

pub fn air() -> AirQualitySample {
    AirQualitySample {
        aqi: Aqi::Moderate,
        pm2_5: 31.25,
        so2: 8.1,
        no2: 14.0,
        o3: 60.5,
    }
}

pub fn place(name: &str, lat: f64, lon: f64) -> Place {
    Place {
        name: name.to_string(),
        country: "IN".to_string(),
        state: Some("West Bengal".to_string()),
        coordinates: Coordinates::new(lat, lon),
    }
}

fn server_error(endpoint: Endpoint) -> FetchError {
    FetchError::Status {
        endpoint,
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        body: "boom".into(),
    }
}

/// In-memory weather source recording every call.
#[derive(Debug, Default)]
pub struct FakeSource {
    pub fail_current: bool,
    pub fail_air: bool,
    pub fail_forecast: bool,
    pub fail_reverse: bool,
    pub no_places: bool,
    pub calls: Mutex<Vec<String>>,
    pub searches: Mutex<Vec<String>>,
    pub forecast_gate: Mutex<Option<oneshot::Receiver<()>>>,
    pub forecast_entered: Notify,
    pub reverse_gate: Mutex<Option<oneshot::Receiver<()>>>,
    pub reverse_entered: Notify,
}

impl FakeSource {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().clone()
    }

    fn record(&self, what: &str, query: &LocationQuery) {
        self.calls
            .lock()
            .push(format!("{what} {} {}", query.lat(), query.lon()));
    }
}

async fn pass_gate(gate: &Mutex<Option<oneshot::Receiver<()>>>, entered: &Notify) {
    let rx = gate.lock().take();
    if let Some(rx) = rx {
        entered.notify_one();
        let _ = rx.await;
    }
}

#[async_trait]
impl WeatherSource for FakeSource {
    async fn current_weather(&self, query: &LocationQuery) -> Result<WeatherSnapshot, FetchError> {
        self.record("current", query);
        if self.fail_current {
            return Err(server_error(Endpoint::CurrentWeather));
        }
        Ok(snapshot())
    }

    async fn forecast(&self, query: &LocationQuery) -> Result<ForecastSeries, FetchError> {
        self.record("forecast", query);
        pass_gate(&self.forecast_gate, &self.forecast_entered).await;
        if self.fail_forecast {
            return Err(server_error(Endpoint::Forecast));
        }
        // Temperatures differ per query so stale renders are detectable.
        let mut series = series(40);
        if query.lat() == "lat=1" {
            for entry in &mut series.entries {
                entry.temperature_c = -40.0;
            }
        }
        Ok(series)
    }

    async fn air_pollution(&self, query: &LocationQuery) -> Result<AirQualitySample, FetchError> {
        self.record("air", query);
        if self.fail_air {
            return Err(server_error(Endpoint::AirPollution));
        }
        Ok(air())
    }

    async fn reverse_geocode(&self, query: &LocationQuery) -> Result<Vec<Place>, FetchError> {
        self.record("reverse", query);
        pass_gate(&self.reverse_gate, &self.reverse_entered).await;
        if self.fail_reverse {
            return Err(server_error(Endpoint::ReverseGeocode));
        }
        if self.no_places {
            return Ok(Vec::new());
        }
        Ok(vec![place("Nagerbazar", 22.62, 88.41)])
    }

    async fn geocode_search(&self, text: &str) -> Result<Vec<Place>, FetchError> {
        self.searches.lock().push(text.to_string());
        Ok(vec![
            place(&format!("{text} City"), 22.57, 88.36),
            place(&format!("{text} Town"), 22.1, 88.0),
        ])
    }
}

#[derive(Debug)]
pub struct FakeGeolocator(pub Option<Coordinates>);

#[async_trait]
impl Geolocator for FakeGeolocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        self.0.ok_or(LocationError::PermissionDenied)
    }
}

pub fn dashboard(source: Arc<FakeSource>) -> (Arc<Dashboard>, SharedPage) {
    let page = Page::shared();
    let search = SearchController::new(source.clone(), page.clone(), SEARCH_DEBOUNCE);
    let dashboard = Arc::new(Dashboard::new(source, page.clone(), search));
    (dashboard, page)
}
