//! Typed errors surfaced by the API client and the geolocation seam.

use std::fmt;

use thiserror::Error;

/// The five OpenWeather endpoints the dashboard talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CurrentWeather,
    Forecast,
    AirPollution,
    ReverseGeocode,
    GeocodeSearch,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::CurrentWeather => "current weather",
            Endpoint::Forecast => "forecast",
            Endpoint::AirPollution => "air pollution",
            Endpoint::ReverseGeocode => "reverse geocode",
            Endpoint::GeocodeSearch => "geocode search",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{endpoint} request failed: {source}")]
    Network {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: Endpoint,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} response is missing {what}")]
    Missing {
        endpoint: Endpoint,
        what: &'static str,
    },
}

impl FetchError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Network { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. }
            | Self::Missing { endpoint, .. } => *endpoint,
        }
    }

    /// Message shown in the error panel.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { .. } => "Network error. Check your connection.".to_string(),
            Self::Status { status, .. } if *status == reqwest::StatusCode::UNAUTHORIZED => {
                "The weather service rejected the API key.".to_string()
            }
            Self::Status { status, .. } if *status == reqwest::StatusCode::BAD_REQUEST => {
                "The requested location is not valid.".to_string()
            }
            Self::Status { endpoint, status, .. } => {
                format!("The weather service returned {status} for {endpoint}.")
            }
            Self::Decode { endpoint, .. } | Self::Missing { endpoint, .. } => {
                format!("Unexpected {endpoint} data from the weather service.")
            }
        }
    }
}

/// Failures of the geolocation seam. Every variant leads the router to the
/// default location.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Location network error: {0}")]
    Network(#[from] reqwest::Error),
}
