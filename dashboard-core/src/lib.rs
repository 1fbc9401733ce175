//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the [`WeatherSource`] seam
//! - The [`Page`] context object and the markup rendered into it
//! - The [`Dashboard`] renderer, debounced place search and the hash [`Router`]
//!
//! It is used by `dashboard-cli`, but nothing here depends on a terminal.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod geolocation;
pub mod model;
pub mod page;
pub mod provider;
pub mod router;
pub mod search;
pub mod templates;

pub use config::{Config, DefaultLocation, ProviderConfig};
pub use dashboard::Dashboard;
pub use error::{Endpoint, FetchError, LocationError};
pub use geolocation::{Geolocator, geolocator_from_config};
pub use model::{
    AirQualitySample, Coordinates, ForecastSeries, LocationQuery, Place, WeatherSnapshot,
};
pub use page::{Page, Region, SharedPage};
pub use provider::{WeatherSource, source_from_config};
pub use router::{Route, Router};
pub use search::{SEARCH_DEBOUNCE, SearchController};

use std::sync::Arc;

/// Wire a dashboard and its router from config.
pub fn build_router(config: &Config) -> anyhow::Result<Router> {
    let source = source_from_config(config)?;
    let page = Page::shared();
    let search = SearchController::new(Arc::clone(&source), Arc::clone(&page), config.search.debounce());
    let dashboard = Arc::new(Dashboard::new(source, page, search));
    let geolocator = geolocator_from_config(&config.geolocation);

    Ok(Router::new(dashboard, geolocator, config.default_location.hash()))
}
