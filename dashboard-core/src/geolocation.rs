//! Resolution of "where am I" for the `/current-location` route.
//!
//! A desktop has no position sensor, so [`IpGeolocator`] asks an IP
//! geolocation service instead. [`DeniedGeolocator`] stands in for a user who
//! refused location access. In both failure cases the router falls back to
//! the configured default location.

use std::{fmt::Debug, sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{config::GeolocationConfig, error::LocationError, model::Coordinates};

pub const DEFAULT_IP_SERVICE_URL: &str = "http://ip-api.com/json/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct IpGeolocator {
    service_url: String,
    http: Client,
}

impl IpGeolocator {
    pub fn new(service_url: impl Into<String>) -> Result<Self, LocationError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            service_url: service_url.into(),
            http,
        })
    }
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        let res = self.http.get(&self.service_url).send().await?;

        if !res.status().is_success() {
            return Err(LocationError::ServiceUnavailable(format!(
                "geolocation service returned {}",
                res.status()
            )));
        }

        let body: IpApiResponse = res.json().await?;
        match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(lat), Some(lon)) => {
                info!(lat, lon, "Geolocation successful");
                Ok(Coordinates::new(lat, lon))
            }
            _ => Err(LocationError::ServiceUnavailable(
                body.message
                    .unwrap_or_else(|| "no coordinates in response".to_string()),
            )),
        }
    }
}

/// Always refuses, like a denied location permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedGeolocator;

#[async_trait]
impl Geolocator for DeniedGeolocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::PermissionDenied)
    }
}

/// Build the geolocator selected by config.
pub fn geolocator_from_config(config: &GeolocationConfig) -> Arc<dyn Geolocator> {
    if !config.enabled {
        return Arc::new(DeniedGeolocator);
    }

    match IpGeolocator::new(config.service_url.as_str()) {
        Ok(locator) => Arc::new(locator),
        Err(e) => {
            warn!("Failed to create geolocation client: {}. Geolocation disabled.", e);
            Arc::new(DeniedGeolocator)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn denied_geolocator_refuses() {
        let err = DeniedGeolocator.locate().await.unwrap_err();
        assert!(matches!(err, LocationError::PermissionDenied));
    }

    #[tokio::test]
    async fn ip_geolocator_reads_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "lat": 22.57,
                "lon": 88.36
            })))
            .mount(&server)
            .await;

        let locator = IpGeolocator::new(format!("{}/json/", server.uri())).unwrap();
        let coords = locator.locate().await.unwrap();
        assert_eq!(coords, Coordinates::new(22.57, 88.36));
    }

    #[tokio::test]
    async fn ip_geolocator_reports_failed_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "fail",
                "message": "reserved range"
            })))
            .mount(&server)
            .await;

        let locator = IpGeolocator::new(server.uri()).unwrap();
        let err = locator.locate().await.unwrap_err();
        assert!(err.to_string().contains("reserved range"));
    }

    #[test]
    fn disabled_config_selects_denied_geolocator() {
        let cfg = GeolocationConfig {
            enabled: false,
            ..GeolocationConfig::default()
        };
        let locator = geolocator_from_config(&cfg);
        assert!(format!("{locator:?}").contains("DeniedGeolocator"));
    }
}
