//! Hash routing: `#/current-location` and `#/weather?lat=<v>&lon=<v>`.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    dashboard::Dashboard,
    geolocation::Geolocator,
    model::LocationQuery,
};

pub const CURRENT_LOCATION_HASH: &str = "#/current-location";

/// Upper bound on hash redirects followed by one navigation.
const MAX_REDIRECTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    CurrentLocation,
    Weather,
}

const ROUTES: [(&str, Handler); 2] = [
    ("/current-location", Handler::CurrentLocation),
    ("/weather", Handler::Weather),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    CurrentLocation,
    /// Query fragments, exactly as they appeared in the hash.
    Weather(LocationQuery),
    NotFound,
}

impl Route {
    /// Resolve a hash such as `#/weather?lat=10&lon=20`.
    pub fn parse(hash: &str) -> Route {
        let request = hash.strip_prefix('#').unwrap_or(hash);
        let (path, query) = match request.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (request, None),
        };

        let Some(handler) = ROUTES
            .iter()
            .find(|(route, _)| *route == path)
            .map(|(_, handler)| *handler)
        else {
            return Route::NotFound;
        };

        match handler {
            Handler::CurrentLocation => Route::CurrentLocation,
            Handler::Weather => {
                let mut fragments = query.unwrap_or("").split('&').filter(|f| !f.is_empty());
                match (fragments.next(), fragments.next()) {
                    (Some(lat), Some(lon)) => {
                        Route::Weather(LocationQuery::from_fragments(lat, lon))
                    }
                    _ => Route::NotFound,
                }
            }
        }
    }
}

/// Maps hash changes onto dashboard updates.
#[derive(Debug)]
pub struct Router {
    dashboard: Arc<Dashboard>,
    geolocator: Arc<dyn Geolocator>,
    fallback_hash: String,
    hash: String,
}

impl Router {
    pub fn new(
        dashboard: Arc<Dashboard>,
        geolocator: Arc<dyn Geolocator>,
        fallback_hash: impl Into<String>,
    ) -> Self {
        Self {
            dashboard,
            geolocator,
            fallback_hash: fallback_hash.into(),
            hash: String::new(),
        }
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn dashboard(&self) -> &Arc<Dashboard> {
        &self.dashboard
    }

    /// Initial page load. Without a hash the dashboard starts at the current
    /// location.
    pub async fn on_load(&mut self, hash: Option<&str>) {
        match hash.filter(|h| !h.is_empty() && *h != "#") {
            Some(hash) => self.navigate(hash).await,
            None => self.navigate(CURRENT_LOCATION_HASH).await,
        }
    }

    /// Set the hash and dispatch it, following redirects.
    pub async fn navigate(&mut self, hash: &str) {
        let mut next = Some(hash.to_string());
        let mut hops = 0;

        while let Some(hash) = next.take() {
            if hops > MAX_REDIRECTS {
                warn!(%hash, "Too many redirects; showing not found");
                self.dashboard.show_not_found();
                return;
            }
            hops += 1;

            info!(%hash, "Navigating");
            self.hash = hash;
            next = self.dispatch().await;
        }
    }

    /// Run the handler for the current hash. Returns a hash to redirect to.
    async fn dispatch(&self) -> Option<String> {
        self.dashboard.page().lock().current_location_disabled =
            self.hash == CURRENT_LOCATION_HASH;

        match Route::parse(&self.hash) {
            Route::CurrentLocation => match self.geolocator.locate().await {
                Ok(coords) => {
                    self.dashboard
                        .update_weather_view(&LocationQuery::from_coordinates(coords))
                        .await;
                    None
                }
                Err(err) => {
                    warn!(error = %err, fallback = %self.fallback_hash, "Geolocation failed");
                    Some(self.fallback_hash.clone())
                }
            },
            Route::Weather(query) => {
                self.dashboard.update_weather_view(&query).await;
                None
            }
            Route::NotFound => {
                warn!(hash = %self.hash, "No route matches hash");
                self.dashboard.show_not_found();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_route_keeps_fragments_verbatim() {
        assert_eq!(
            Route::parse("#/weather?lat=10&lon=20"),
            Route::Weather(LocationQuery::from_fragments("lat=10", "lon=20"))
        );
        assert_eq!(
            Route::parse("#/weather?lat=abc&lon=1e3"),
            Route::Weather(LocationQuery::from_fragments("lat=abc", "lon=1e3"))
        );
    }

    #[test]
    fn current_location_route() {
        assert_eq!(Route::parse(CURRENT_LOCATION_HASH), Route::CurrentLocation);
        assert_eq!(Route::parse("/current-location"), Route::CurrentLocation);
    }

    #[test]
    fn unmatched_paths_are_not_found() {
        assert_eq!(Route::parse("#/bogus"), Route::NotFound);
        assert_eq!(Route::parse("#/"), Route::NotFound);
        assert_eq!(Route::parse("#/weather/extra?lat=1&lon=2"), Route::NotFound);
    }

    #[test]
    fn weather_route_without_both_fragments_is_not_found() {
        assert_eq!(Route::parse("#/weather"), Route::NotFound);
        assert_eq!(Route::parse("#/weather?lat=10"), Route::NotFound);
        assert_eq!(Route::parse("#/weather?"), Route::NotFound);
    }
}
