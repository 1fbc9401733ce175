//! The page the dashboard renders into.
//!
//! A [`Page`] owns the markup of every named region plus the flags the
//! stylesheet keys off (loading indicator, error panel, fade-in, search
//! panel). Renderers never touch a region directly; they go through a
//! [`Generation`] so that writes from a superseded update are dropped.

use std::{collections::BTreeMap, sync::Arc};

use parking_lot::Mutex;

use crate::{model::Place, templates};

pub type SharedPage = Arc<Mutex<Page>>;

/// Named insertion points of the rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    CurrentWeather,
    Highlights,
    HourlyForecast,
    FiveDayForecast,
    SearchResult,
    ErrorContent,
}

impl Region {
    /// The four regions cleared at the start of every location update.
    pub const OUTPUT: [Region; 4] = [
        Region::CurrentWeather,
        Region::Highlights,
        Region::HourlyForecast,
        Region::FiveDayForecast,
    ];

    pub fn data_attribute(self) -> &'static str {
        match self {
            Region::CurrentWeather => "data-current-weather",
            Region::Highlights => "data-highlights",
            Region::HourlyForecast => "data-hourly-forecast",
            Region::FiveDayForecast => "data-5-day-forecast",
            Region::SearchResult => "data-search-result",
            Region::ErrorContent => "data-error-content",
        }
    }
}

/// Token identifying one location update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

#[derive(Debug, Clone, Default)]
pub struct SearchPanel {
    /// Search view toggled open (mobile layout).
    pub open: bool,
    /// Current contents of the search field.
    pub field: String,
    pub searching: bool,
    pub results_active: bool,
    pub results: Vec<Place>,
}

#[derive(Debug, Clone)]
pub enum ErrorView {
    NotFound,
    Fetch(String),
}

#[derive(Debug, Clone)]
pub struct Page {
    regions: BTreeMap<Region, String>,
    generation: u64,
    pub loading: bool,
    pub container_scrollable: bool,
    pub fade_in: bool,
    pub error: Option<ErrorView>,
    pub current_location_disabled: bool,
    pub search: SearchPanel,
}

impl Default for Page {
    // A fresh document shows the loading indicator until the first update finishes.
    fn default() -> Self {
        Self {
            regions: BTreeMap::new(),
            generation: 0,
            loading: true,
            container_scrollable: false,
            fade_in: false,
            error: None,
            current_location_disabled: false,
            search: SearchPanel::default(),
        }
    }
}

impl Page {
    pub fn shared() -> SharedPage {
        Arc::new(Mutex::new(Page::default()))
    }

    /// Enter the loading state for a new location update.
    ///
    /// Invalidates every outstanding [`Generation`].
    pub fn begin_update(&mut self) -> Generation {
        self.generation += 1;
        self.loading = true;
        self.container_scrollable = false;
        self.fade_in = false;
        self.hide_error();
        for region in Region::OUTPUT {
            self.regions.remove(&region);
        }
        Generation(self.generation)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.generation
    }

    pub fn finish_loading(&mut self) {
        self.loading = false;
        self.container_scrollable = true;
        self.fade_in = true;
    }

    pub fn region(&self, region: Region) -> &str {
        self.regions.get(&region).map(String::as_str).unwrap_or("")
    }

    pub fn set_region(&mut self, region: Region, markup: String) {
        self.regions.insert(region, markup);
    }

    pub fn clear_region(&mut self, region: Region) {
        self.regions.remove(&region);
    }

    /// Fill the location placeholder of the current-conditions card.
    ///
    /// Returns false when the card (or its placeholder) is not on the page.
    pub fn fill_location(&mut self, label: &str) -> bool {
        let Some(card) = self.regions.get_mut(&Region::CurrentWeather) else {
            return false;
        };
        let filled = templates::fill_location_slot(card, label);
        match filled {
            Some(markup) => {
                *card = markup;
                true
            }
            None => false,
        }
    }

    pub fn show_error(&mut self, view: ErrorView) {
        self.set_region(Region::ErrorContent, templates::error_panel(&view));
        self.error = Some(view);
    }

    pub fn hide_error(&mut self) {
        self.error = None;
        self.clear_region(Region::ErrorContent);
    }

    pub fn error_visible(&self) -> bool {
        self.error.is_some()
    }

    pub fn toggle_search_view(&mut self) {
        self.search.open = !self.search.open;
    }

    pub fn clear_search_results(&mut self) {
        self.search.searching = false;
        self.search.results_active = false;
        self.search.results.clear();
        self.clear_region(Region::SearchResult);
    }

    pub fn show_search_results(&mut self, places: Vec<Place>) {
        self.set_region(Region::SearchResult, templates::search_results(&places));
        self.search.searching = false;
        self.search.results_active = true;
        self.search.results = places;
    }

    /// Assemble the full HTML document around the current region markup.
    pub fn to_html(&self) -> String {
        templates::document(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_update_clears_output_regions_and_error() {
        let mut page = Page::default();
        for region in Region::OUTPUT {
            page.set_region(region, "<p>stale</p>".into());
        }
        page.set_region(Region::SearchResult, "<ul></ul>".into());
        page.show_error(ErrorView::NotFound);
        page.finish_loading();

        page.begin_update();

        for region in Region::OUTPUT {
            assert_eq!(page.region(region), "");
        }
        assert_eq!(page.region(Region::SearchResult), "<ul></ul>");
        assert!(!page.error_visible());
        assert!(page.loading);
        assert!(!page.fade_in);
        assert!(!page.container_scrollable);
    }

    #[test]
    fn new_update_invalidates_previous_generation() {
        let mut page = Page::default();
        let first = page.begin_update();
        assert!(page.is_current(first));

        let second = page.begin_update();
        assert!(!page.is_current(first));
        assert!(page.is_current(second));
    }

    #[test]
    fn finish_loading_restores_scroll_and_fades_in() {
        let mut page = Page::default();
        page.begin_update();
        page.finish_loading();
        assert!(!page.loading);
        assert!(page.container_scrollable);
        assert!(page.fade_in);
    }

    #[test]
    fn fill_location_requires_card() {
        let mut page = Page::default();
        assert!(!page.fill_location("Kolkata, IN"));
    }

    #[test]
    fn search_results_toggle_flags() {
        let mut page = Page::default();
        page.search.searching = true;
        page.show_search_results(Vec::new());
        assert!(page.search.results_active);
        assert!(!page.search.searching);

        page.clear_search_results();
        assert!(!page.search.results_active);
        assert_eq!(page.region(Region::SearchResult), "");
    }
}
