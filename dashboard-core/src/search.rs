//! Search-as-you-type over the forward geocoding endpoint.

use std::{fmt, sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{page::SharedPage, provider::WeatherSource};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Debounces search-field input into geocode searches.
///
/// Each keystroke cancels the pending timer. When a timer fires, the field
/// value at that moment is searched, so a burst of typing costs one request.
pub struct SearchController {
    source: Arc<dyn WeatherSource>,
    page: SharedPage,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for SearchController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchController")
            .field("delay", &self.delay)
            .field("pending", &self.pending.lock().is_some())
            .finish()
    }
}

impl SearchController {
    pub fn new(source: Arc<dyn WeatherSource>, page: SharedPage, delay: Duration) -> Self {
        Self {
            source,
            page,
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Handle an input event on the search field.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_input(&self, value: &str) {
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }

        {
            let mut page = self.page.lock();
            page.search.field = value.to_string();
            if value.is_empty() {
                page.clear_search_results();
                return;
            }
            page.search.searching = true;
        }

        let source = Arc::clone(&self.source);
        let page = Arc::clone(&self.page);
        let delay = self.delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let query = page.lock().search.field.clone();
            if query.is_empty() {
                return;
            }

            debug!(%query, "Searching places");
            match source.geocode_search(&query).await {
                Ok(places) => {
                    let mut page = page.lock();
                    // The field was cleared while the request was in flight.
                    if page.search.field.is_empty() {
                        return;
                    }
                    page.show_search_results(places);
                }
                Err(err) => {
                    warn!(error = %err, "Place search failed");
                    page.lock().search.searching = false;
                }
            }
        });

        *self.pending.lock() = Some(handle);
    }

    pub fn has_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Wait for the pending search, if any, to finish.
    pub async fn settle(&self) {
        let handle = self.pending.lock().take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                if !err.is_cancelled() {
                    warn!(error = %err, "Search task failed");
                }
            }
        }
    }
}
