use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;

use crate::{
    Config,
    error::FetchError,
    model::{AirQualitySample, ForecastSeries, LocationQuery, Place, WeatherSnapshot},
    provider::openweather::{Endpoints, OpenWeatherClient},
};

pub mod openweather;

/// Everything the renderer needs from a weather provider.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current_weather(&self, query: &LocationQuery) -> Result<WeatherSnapshot, FetchError>;

    async fn forecast(&self, query: &LocationQuery) -> Result<ForecastSeries, FetchError>;

    async fn air_pollution(&self, query: &LocationQuery) -> Result<AirQualitySample, FetchError>;

    /// Up to five named places nearest to the coordinates.
    async fn reverse_geocode(&self, query: &LocationQuery) -> Result<Vec<Place>, FetchError>;

    /// Up to five places matching a free-text name.
    async fn geocode_search(&self, text: &str) -> Result<Vec<Place>, FetchError>;
}

/// Construct the OpenWeather source from config.
pub fn source_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherSource>> {
    let api_key = config.provider_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for OpenWeather.\n\
             Hint: run `weather-dashboard configure` or set OPENWEATHER_API_KEY."
        )
    })?;

    let endpoints = Endpoints::new(config.openweather.base_url.as_str(), api_key);
    Ok(Arc::new(OpenWeatherClient::new(endpoints)))
}
