//! Renderer behaviour against an in-memory weather source.

mod common;

use std::sync::Arc;

use common::{FakeSource, dashboard};
use dashboard_core::{LocationQuery, Region, page::ErrorView};
use tokio::sync::oneshot;

fn query(lat: &str, lon: &str) -> LocationQuery {
    LocationQuery::from_fragments(lat, lon)
}

#[tokio::test]
async fn update_renders_every_region_and_leaves_loading() {
    let source = Arc::new(FakeSource::default());
    let (dashboard, page) = dashboard(source.clone());

    dashboard.update_weather_view(&query("lat=22.62", "lon=88.41")).await;

    let page = page.lock();
    assert!(!page.loading);
    assert!(page.fade_in);
    assert!(page.container_scrollable);
    assert!(!page.error_visible());

    let current = page.region(Region::CurrentWeather);
    assert!(current.contains("31&deg;<sup>c</sup>"));
    assert!(current.contains("data-location>Nagerbazar, IN</p>"));

    let highlights = page.region(Region::Highlights);
    assert!(highlights.contains(">Moderate</span>"));
    assert!(highlights.contains("31.25"));

    let hourly = page.region(Region::HourlyForecast);
    assert_eq!(hourly.matches(r#"<li class="slider-item">"#).count(), 16);

    let five_day = page.region(Region::FiveDayForecast);
    assert_eq!(five_day.matches(r#"<li class="card-item">"#).count(), 5);
}

#[tokio::test]
async fn current_weather_is_fetched_before_dependent_calls() {
    let source = Arc::new(FakeSource::default());
    let (dashboard, _page) = dashboard(source.clone());

    dashboard.update_weather_view(&query("lat=10", "lon=20")).await;

    let calls = source.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0], "current lat=10 lon=20");
    for what in ["reverse", "air", "forecast"] {
        assert!(calls.contains(&format!("{what} lat=10 lon=20")), "{what}");
    }
}

#[tokio::test]
async fn current_weather_failure_shows_error_and_stops() {
    let source = Arc::new(FakeSource {
        fail_current: true,
        ..FakeSource::default()
    });
    let (dashboard, page) = dashboard(source.clone());

    dashboard.update_weather_view(&query("lat=10", "lon=20")).await;

    assert_eq!(source.calls(), vec!["current lat=10 lon=20".to_string()]);
    let page = page.lock();
    assert!(!page.loading);
    assert!(matches!(page.error, Some(ErrorView::Fetch(_))));
    assert!(page.region(Region::ErrorContent).contains("500"));
    for region in Region::OUTPUT {
        assert_eq!(page.region(region), "");
    }
}

#[tokio::test]
async fn forecast_failure_ends_loading_with_error() {
    let source = Arc::new(FakeSource {
        fail_forecast: true,
        ..FakeSource::default()
    });
    let (dashboard, page) = dashboard(source);

    dashboard.update_weather_view(&query("lat=10", "lon=20")).await;

    let page = page.lock();
    assert!(!page.loading);
    assert!(page.error_visible());
    assert_eq!(page.region(Region::HourlyForecast), "");
    assert!(!page.region(Region::Highlights).is_empty());
}

#[tokio::test]
async fn air_pollution_failure_keeps_forecast() {
    let source = Arc::new(FakeSource {
        fail_air: true,
        ..FakeSource::default()
    });
    let (dashboard, page) = dashboard(source);

    dashboard.update_weather_view(&query("lat=10", "lon=20")).await;

    let page = page.lock();
    assert!(page.error_visible());
    assert!(!page.loading);
    assert_eq!(page.region(Region::Highlights), "");
    assert!(!page.region(Region::HourlyForecast).is_empty());
}

#[tokio::test]
async fn reverse_geocode_failure_leaves_label_blank() {
    for source in [
        FakeSource {
            fail_reverse: true,
            ..FakeSource::default()
        },
        FakeSource {
            no_places: true,
            ..FakeSource::default()
        },
    ] {
        let (dashboard, page) = dashboard(Arc::new(source));

        dashboard.update_weather_view(&query("lat=10", "lon=20")).await;

        let page = page.lock();
        assert!(!page.error_visible());
        assert!(page.region(Region::CurrentWeather).contains("data-location></p>"));
    }
}

#[tokio::test]
async fn loading_ends_after_forecast_even_if_location_name_is_pending() {
    let (tx, rx) = oneshot::channel();
    let source = Arc::new(FakeSource::default());
    *source.reverse_gate.lock() = Some(rx);
    let (dashboard, page) = dashboard(source.clone());

    let update = tokio::spawn({
        let dashboard = dashboard.clone();
        async move { dashboard.update_weather_view(&query("lat=10", "lon=20")).await }
    });

    source.reverse_entered.notified().await;
    for _ in 0..100 {
        if !page.lock().loading {
            break;
        }
        tokio::task::yield_now().await;
    }

    {
        let page = page.lock();
        assert!(!page.loading);
        assert!(page.region(Region::CurrentWeather).contains("data-location></p>"));
    }

    tx.send(()).unwrap();
    update.await.unwrap();
    assert!(
        page.lock()
            .region(Region::CurrentWeather)
            .contains("data-location>Nagerbazar, IN</p>")
    );
}

#[tokio::test]
async fn stale_forecast_is_discarded_after_newer_update() {
    let (tx, rx) = oneshot::channel();
    let source = Arc::new(FakeSource::default());
    *source.forecast_gate.lock() = Some(rx);
    let (dashboard, page) = dashboard(source.clone());

    // First update stalls inside its forecast fetch.
    let first = tokio::spawn({
        let dashboard = dashboard.clone();
        async move { dashboard.update_weather_view(&query("lat=1", "lon=1")).await }
    });
    source.forecast_entered.notified().await;

    dashboard.update_weather_view(&query("lat=2", "lon=2")).await;
    let settled = page.lock().region(Region::HourlyForecast).to_string();
    assert!(!settled.is_empty());
    assert!(!settled.contains("-40&deg;"));

    tx.send(()).unwrap();
    first.await.unwrap();

    let page = page.lock();
    assert_eq!(page.region(Region::HourlyForecast), settled);
    assert_eq!(
        page.region(Region::HourlyForecast)
            .matches(r#"<li class="slider-item">"#)
            .count(),
        16
    );
    assert!(!page.loading);
}

#[tokio::test]
async fn selecting_a_search_result_closes_the_panel() {
    let source = Arc::new(FakeSource::default());
    let (dashboard, page) = dashboard(source);

    dashboard.toggle_search_view();
    page.lock()
        .show_search_results(vec![common::place("Howrah", 22.59, 88.31)]);

    assert_eq!(
        dashboard.select_search_result(0).as_deref(),
        Some("#/weather?lat=22.59&lon=88.31")
    );
    let page = page.lock();
    assert!(!page.search.open);
    assert!(!page.search.results_active);
    drop(page);

    assert_eq!(dashboard.select_search_result(5), None);
}
