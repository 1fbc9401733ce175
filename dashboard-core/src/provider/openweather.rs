use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    error::{Endpoint, FetchError},
    format::Aqi,
    model::{
        AirQualitySample, Condition, Coordinates, ForecastEntry, ForecastSeries, LocationQuery,
        Place, WeatherSnapshot, Wind,
    },
};

use super::WeatherSource;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Result cap for both geocoding endpoints.
pub const PLACE_LIMIT: u8 = 5;

/// URL builders for the five endpoints. Every URL carries the credential.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
    api_key: String,
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            api_key: api_key.into(),
        }
    }

    pub fn current_weather(&self, query: &LocationQuery) -> String {
        format!(
            "{}/data/2.5/weather?{}&{}&units=metric&appid={}",
            self.base_url,
            query.lat(),
            query.lon(),
            self.api_key
        )
    }

    pub fn forecast(&self, query: &LocationQuery) -> String {
        format!(
            "{}/data/2.5/forecast?{}&{}&units=metric&appid={}",
            self.base_url,
            query.lat(),
            query.lon(),
            self.api_key
        )
    }

    pub fn air_pollution(&self, query: &LocationQuery) -> String {
        format!(
            "{}/data/2.5/air_pollution?{}&{}&appid={}",
            self.base_url,
            query.lat(),
            query.lon(),
            self.api_key
        )
    }

    pub fn reverse_geocode(&self, query: &LocationQuery) -> String {
        format!(
            "{}/geo/1.0/reverse?{}&{}&limit={PLACE_LIMIT}&appid={}",
            self.base_url,
            query.lat(),
            query.lon(),
            self.api_key
        )
    }

    pub fn geocode_search(&self, text: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(text.as_bytes()).collect();
        format!(
            "{}/geo/1.0/direct?q={encoded}&limit={PLACE_LIMIT}&appid={}",
            self.base_url, self.api_key
        )
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    endpoints: Endpoints,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            endpoints,
            http: Client::new(),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// GET `url` and decode the JSON body.
    ///
    /// The URL carries the credential, so it is stripped from network errors
    /// and never logged.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        url: &str,
    ) -> Result<T, FetchError> {
        debug!(%endpoint, "sending request");

        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                endpoint,
                source: source.without_url(),
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| FetchError::Network {
            endpoint,
            source: source.without_url(),
        })?;

        debug!(%endpoint, %status, bytes = body.len(), "received response");

        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Decode { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    description: String,
    icon: String,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    #[serde(default)]
    speed: f64,
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentMain {
    temp: f64,
    feels_like: f64,
    pressure: u32,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    weather: Vec<OwCondition>,
    dt: i64,
    sys: OwSys,
    main: OwCurrentMain,
    visibility: u32,
    timezone: i32,
    #[serde(default)]
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
#[serde(try_from = "u8")]
struct OwAqi(Aqi);

impl TryFrom<u8> for OwAqi {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Aqi::try_from(value)
            .map(OwAqi)
            .map_err(|index| format!("air quality index {index} is outside 1..=5"))
    }
}

#[derive(Debug, Deserialize)]
struct OwPollutionMain {
    aqi: OwAqi,
}

#[derive(Debug, Deserialize)]
struct OwComponents {
    pm2_5: f64,
    so2: f64,
    no2: f64,
    o3: f64,
}

#[derive(Debug, Deserialize)]
struct OwPollutionSample {
    main: OwPollutionMain,
    components: OwComponents,
}

#[derive(Debug, Deserialize)]
struct OwPollutionResponse {
    list: Vec<OwPollutionSample>,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwCondition>,
    #[serde(default)]
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
    city: OwCity,
}

#[derive(Debug, Deserialize)]
struct OwPlace {
    name: String,
    lat: f64,
    lon: f64,
    country: String,
    state: Option<String>,
}

impl From<OwWind> for Wind {
    fn from(w: OwWind) -> Self {
        Wind {
            speed_mps: w.speed,
            direction_deg: w.deg,
        }
    }
}

impl From<OwPlace> for Place {
    fn from(p: OwPlace) -> Self {
        Place {
            name: p.name,
            country: p.country,
            state: p.state.filter(|s| !s.is_empty()),
            coordinates: Coordinates::new(p.lat, p.lon),
        }
    }
}

fn first_condition(endpoint: Endpoint, weather: Vec<OwCondition>) -> Result<Condition, FetchError> {
    weather
        .into_iter()
        .next()
        .map(|w| Condition {
            description: w.description,
            icon: w.icon,
        })
        .ok_or(FetchError::Missing {
            endpoint,
            what: "weather conditions",
        })
}

impl OwCurrentResponse {
    fn into_snapshot(self) -> Result<WeatherSnapshot, FetchError> {
        Ok(WeatherSnapshot {
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            humidity_pct: self.main.humidity,
            pressure_hpa: self.main.pressure,
            visibility_m: self.visibility,
            wind: self.wind.into(),
            condition: first_condition(Endpoint::CurrentWeather, self.weather)?,
            sunrise: self.sys.sunrise,
            sunset: self.sys.sunset,
            timezone_offset: self.timezone,
            observed_at: self.dt,
        })
    }
}

impl OwPollutionResponse {
    fn into_sample(self) -> Result<AirQualitySample, FetchError> {
        let sample = self.list.into_iter().next().ok_or(FetchError::Missing {
            endpoint: Endpoint::AirPollution,
            what: "pollution samples",
        })?;

        Ok(AirQualitySample {
            aqi: sample.main.aqi.0,
            pm2_5: sample.components.pm2_5,
            so2: sample.components.so2,
            no2: sample.components.no2,
            o3: sample.components.o3,
        })
    }
}

impl OwForecastResponse {
    fn into_series(self) -> Result<ForecastSeries, FetchError> {
        let entries = self
            .list
            .into_iter()
            .map(|e| {
                Ok(ForecastEntry {
                    timestamp: e.dt,
                    temperature_c: e.main.temp,
                    temperature_max_c: e.main.temp_max,
                    condition: first_condition(Endpoint::Forecast, e.weather)?,
                    wind: e.wind.into(),
                })
            })
            .collect::<Result<Vec<_>, FetchError>>()?;

        Ok(ForecastSeries {
            entries,
            timezone_offset: self.city.timezone,
        })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current_weather(&self, query: &LocationQuery) -> Result<WeatherSnapshot, FetchError> {
        let url = self.endpoints.current_weather(query);
        let parsed: OwCurrentResponse = self.fetch_json(Endpoint::CurrentWeather, &url).await?;
        parsed.into_snapshot()
    }

    async fn forecast(&self, query: &LocationQuery) -> Result<ForecastSeries, FetchError> {
        let url = self.endpoints.forecast(query);
        let parsed: OwForecastResponse = self.fetch_json(Endpoint::Forecast, &url).await?;
        parsed.into_series()
    }

    async fn air_pollution(&self, query: &LocationQuery) -> Result<AirQualitySample, FetchError> {
        let url = self.endpoints.air_pollution(query);
        let parsed: OwPollutionResponse = self.fetch_json(Endpoint::AirPollution, &url).await?;
        parsed.into_sample()
    }

    async fn reverse_geocode(&self, query: &LocationQuery) -> Result<Vec<Place>, FetchError> {
        let url = self.endpoints.reverse_geocode(query);
        let parsed: Vec<OwPlace> = self.fetch_json(Endpoint::ReverseGeocode, &url).await?;
        Ok(parsed.into_iter().map(Place::from).collect())
    }

    async fn geocode_search(&self, text: &str) -> Result<Vec<Place>, FetchError> {
        let url = self.endpoints.geocode_search(text);
        let parsed: Vec<OwPlace> = self.fetch_json(Endpoint::GeocodeSearch, &url).await?;
        Ok(parsed.into_iter().map(Place::from).collect())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
