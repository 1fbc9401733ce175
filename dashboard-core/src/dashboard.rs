use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    error::FetchError,
    model::{LocationQuery, WeatherSnapshot},
    page::{ErrorView, Generation, Page, Region, SharedPage},
    provider::WeatherSource,
    search::SearchController,
    templates,
};

/// Drives one page: location updates and search.
#[derive(Debug)]
pub struct Dashboard {
    source: Arc<dyn WeatherSource>,
    page: SharedPage,
    search: SearchController,
}

impl Dashboard {
    pub fn new(source: Arc<dyn WeatherSource>, page: SharedPage, search: SearchController) -> Self {
        Self {
            source,
            page,
            search,
        }
    }

    pub fn page(&self) -> &SharedPage {
        &self.page
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    /// Fetch everything for `query` and rebuild the four output regions.
    ///
    /// Current weather is fetched first; reverse geocode, air pollution and
    /// forecast then run concurrently. The loading state ends once the forecast
    /// is rendered (or fails), whatever the other two are doing. Writes from an
    /// update that has since been superseded are discarded.
    pub async fn update_weather_view(&self, query: &LocationQuery) {
        let generation = self.page.lock().begin_update();
        info!(lat = query.lat(), lon = query.lon(), ?generation, "Updating weather view");

        let current = match self.source.current_weather(query).await {
            Ok(current) => current,
            Err(err) => {
                self.fail(generation, &err, true);
                return;
            }
        };

        let card = templates::current_weather_card(&current);
        self.apply(generation, |page| page.set_region(Region::CurrentWeather, card));

        tokio::join!(
            self.load_location_name(generation, query),
            self.load_highlights(generation, query, &current),
            self.load_forecast(generation, query),
        );
    }

    async fn load_location_name(&self, generation: Generation, query: &LocationQuery) {
        match self.source.reverse_geocode(query).await {
            Ok(places) => match places.first() {
                Some(place) => {
                    let label = place.label();
                    self.apply(generation, |page| {
                        if !page.fill_location(&label) {
                            warn!("Current weather card has no location slot");
                        }
                    });
                }
                None => warn!("Reverse geocode returned no places"),
            },
            Err(err) => warn!(error = %err, "Reverse geocode failed; location label left blank"),
        }
    }

    async fn load_highlights(
        &self,
        generation: Generation,
        query: &LocationQuery,
        current: &WeatherSnapshot,
    ) {
        match self.source.air_pollution(query).await {
            Ok(air) => {
                let card = templates::highlights_card(&air, current);
                self.apply(generation, |page| page.set_region(Region::Highlights, card));
            }
            Err(err) => self.fail(generation, &err, false),
        }
    }

    async fn load_forecast(&self, generation: Generation, query: &LocationQuery) {
        match self.source.forecast(query).await {
            Ok(series) => {
                let hourly = templates::hourly_section(&series);
                let five_day = templates::five_day_section(&series);
                let applied = self.apply(generation, |page| {
                    page.set_region(Region::HourlyForecast, hourly);
                    page.set_region(Region::FiveDayForecast, five_day);
                    page.finish_loading();
                });
                if applied {
                    info!(?generation, entries = series.entries.len(), "Weather view ready");
                }
            }
            Err(err) => self.fail(generation, &err, true),
        }
    }

    /// Show `err` in the error panel; `end_loading` also leaves the loading state.
    fn fail(&self, generation: Generation, err: &FetchError, end_loading: bool) {
        warn!(error = %err, "Weather update step failed");
        self.apply(generation, |page| {
            page.show_error(ErrorView::Fetch(err.user_message()));
            if end_loading {
                page.finish_loading();
            }
        });
    }

    /// Run `write` against the page unless `generation` is stale.
    fn apply(&self, generation: Generation, write: impl FnOnce(&mut Page)) -> bool {
        let mut page = self.page.lock();
        if !page.is_current(generation) {
            debug!(?generation, "Discarding stale page write");
            return false;
        }
        write(&mut page);
        true
    }

    /// Render the not-found panel.
    pub fn show_not_found(&self) {
        let mut page = self.page.lock();
        page.show_error(ErrorView::NotFound);
        page.finish_loading();
    }

    pub fn toggle_search_view(&self) {
        self.page.lock().toggle_search_view();
    }

    /// Activate the `index`-th search result: close the search view, hide the
    /// results and return the hash to navigate to.
    pub fn select_search_result(&self, index: usize) -> Option<String> {
        let mut page = self.page.lock();
        let hash = page.search.results.get(index)?.hash();
        page.toggle_search_view();
        page.search.results_active = false;
        Some(hash)
    }
}
