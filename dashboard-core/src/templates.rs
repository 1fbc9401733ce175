//! Markup for every region of the dashboard.
//!
//! Class names and `data-*` hooks are the contract with the stylesheet, keep
//! them stable.

use std::fmt::Write;

use crate::{
    format::{
        format_clock_time, format_date, format_day_month, format_hour_label, mps_to_kph,
        weekday_name,
    },
    model::{AirQualitySample, ForecastSeries, Place, WeatherSnapshot},
    page::{ErrorView, Page, Region},
};

const ICON_DIR: &str = "./assets/images/weather_icons";

const LOCATION_SLOT: &str = r#"<p class="title-3 meta-text" data-location>"#;

/// Minimal HTML escaping for text and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Temperatures and speeds are shown truncated toward zero.
fn whole(value: f64) -> i64 {
    value.trunc() as i64
}

fn icon_src(icon: &str) -> String {
    format!("{ICON_DIR}/{}.png", escape(icon))
}

pub fn current_weather_card(snapshot: &WeatherSnapshot) -> String {
    let description = escape(&snapshot.condition.description);
    format!(
        r#"<div class="card card-lg current-weather-card">
  <h2 class="title-2 card-title">Now</h2>
  <div class="wrapper">
    <p class="heading">{temp}&deg;<sup>c</sup></p>
    <img src="{icon}" width="64" height="64" alt="{description}" class="weather-icon">
  </div>
  <p class="body-3">{description}</p>
  <ul class="meta-list">
    <li class="meta-item">
      <span class="m-icon">calendar_today</span>
      <p class="title-3 meta-text">{date}</p>
    </li>
    <li class="meta-item">
      <span class="m-icon">location_on</span>
      {LOCATION_SLOT}</p>
    </li>
  </ul>
</div>"#,
        temp = whole(snapshot.temperature_c),
        icon = icon_src(&snapshot.condition.icon),
        date = format_date(snapshot.observed_at, snapshot.timezone_offset),
    )
}

/// Replace the contents of the location placeholder in a rendered card.
pub fn fill_location_slot(card: &str, label: &str) -> Option<String> {
    let start = card.find(LOCATION_SLOT)? + LOCATION_SLOT.len();
    let end = start + card[start..].find("</p>")?;
    Some(format!("{}{}{}", &card[..start], escape(label), &card[end..]))
}

fn highlight_tile(title: &str, icon: &str, value: &str) -> String {
    format!(
        r#"    <div class="card card-sm highlight-card">
      <h3 class="title-3">{title}</h3>
      <div class="wrapper">
        <span class="m-icon">{icon}</span>
        <p class="title-1">{value}</p>
      </div>
    </div>
"#
    )
}

pub fn highlights_card(air: &AirQualitySample, snapshot: &WeatherSnapshot) -> String {
    let aqi = air.aqi.index();
    let description = air.aqi.description();
    let tz = snapshot.timezone_offset;

    let mut html = String::new();
    let _ = write!(
        html,
        r#"<div class="card card-lg">
  <h2 class="title-2" id="highlights-label">Todays Highlights</h2>
  <div class="highlight-list">
    <div class="card card-sm highlight-card one">
      <h3 class="title-3">Air Quality Index</h3>
      <div class="wrapper">
        <span class="m-icon">air</span>
        <ul class="card-list">
          <li class="card-item"><p class="title-1">{pm2_5:.2}</p><p class="label-1">PM<sub>2.5</sub></p></li>
          <li class="card-item"><p class="title-1">{so2:.2}</p><p class="label-1">SO<sub>2</sub></p></li>
          <li class="card-item"><p class="title-1">{no2:.2}</p><p class="label-1">NO<sub>2</sub></p></li>
          <li class="card-item"><p class="title-1">{o3:.2}</p><p class="label-1">O<sub>3</sub></p></li>
        </ul>
      </div>
      <span class="badge aqi-{aqi} label-{aqi}" title="{message}">{level}</span>
    </div>
    <div class="card card-sm highlight-card two">
      <h3 class="title-3">Sunrise &amp; Sunset</h3>
      <div class="card-list">
        <div class="card-item">
          <span class="m-icon">clear_day</span>
          <div><p class="label-1">Sunrise</p><p class="title-1">{sunrise}</p></div>
        </div>
        <div class="card-item">
          <span class="m-icon">clear_night</span>
          <div><p class="label-1">Sunset</p><p class="title-1">{sunset}</p></div>
        </div>
      </div>
    </div>
"#,
        pm2_5 = air.pm2_5,
        so2 = air.so2,
        no2 = air.no2,
        o3 = air.o3,
        message = escape(description.message),
        level = description.level,
        sunrise = format_clock_time(snapshot.sunrise, tz),
        sunset = format_clock_time(snapshot.sunset, tz),
    );

    html.push_str(&highlight_tile(
        "Humidity",
        "humidity_percentage",
        &format!("{}<sub>%</sub>", snapshot.humidity_pct),
    ));
    html.push_str(&highlight_tile(
        "Pressure",
        "airwave",
        &format!("{}<sub>hPa</sub>", snapshot.pressure_hpa),
    ));
    html.push_str(&highlight_tile(
        "Visibility",
        "visibility",
        &format!("{}<sub>km</sub>", snapshot.visibility_km()),
    ));
    html.push_str(&highlight_tile(
        "Feels like",
        "thermostat",
        &format!("{}&deg;<sup>c</sup>", whole(snapshot.feels_like_c)),
    ));
    html.push_str("  </div>\n</div>");
    html
}

/// "Today at" section: temperature slider and wind slider over the same hours.
pub fn hourly_section(series: &ForecastSeries) -> String {
    let tz = series.timezone_offset;
    let mut temps = String::new();
    let mut winds = String::new();

    for entry in series.hourly() {
        let hour = format_hour_label(entry.timestamp, tz);
        let description = escape(&entry.condition.description);

        let _ = write!(
            temps,
            r#"
    <li class="slider-item">
      <div class="card card-sm slider-card">
        <p class="body-3">{hour}</p>
        <img src="{icon}" alt="{description}" width="48" height="48" loading="lazy" title="{description}" class="weather-icon">
        <p class="body-3">{temp}&deg;</p>
      </div>
    </li>"#,
            icon = icon_src(&entry.condition.icon),
            temp = whole(entry.temperature_c),
        );

        let _ = write!(
            winds,
            r#"
    <li class="slider-item">
      <div class="card card-sm slider-card">
        <p class="body-3">{hour}</p>
        <img src="{ICON_DIR}/direction.png" alt="direction" width="48" height="48" loading="lazy" class="weather-icon" style="transform: rotate({rotation}deg)">
        <p class="body-3">{speed} km/h</p>
      </div>
    </li>"#,
            rotation = entry.wind.direction_deg - 180.0,
            speed = whole(mps_to_kph(entry.wind.speed_mps)),
        );
    }

    format!(
        r#"<h2 class="title-2">Today at</h2>
<div class="slider-container">
  <ul class="slider-list" data-temp>{temps}
  </ul>
  <ul class="slider-list" data-wind>{winds}
  </ul>
</div>"#
    )
}

pub fn five_day_section(series: &ForecastSeries) -> String {
    let tz = series.timezone_offset;
    let mut items = String::new();

    for entry in series.daily() {
        let description = escape(&entry.condition.description);
        let _ = write!(
            items,
            r#"
    <li class="card-item">
      <div class="icon-wrapper">
        <img src="{icon}" alt="{description}" width="36" height="36" class="weather-icon" title="{description}">
        <span class="span"><p class="title-2">{temp_max}&deg;</p></span>
      </div>
      <p class="label-1">{day_month}</p>
      <p class="label-1">{weekday}</p>
    </li>"#,
            icon = icon_src(&entry.condition.icon),
            temp_max = whole(entry.temperature_max_c),
            day_month = format_day_month(entry.timestamp, tz),
            weekday = weekday_name(entry.timestamp, tz),
        );
    }

    format!(
        r#"<h2 class="title-2" id="forecast-label">5 Days Forecast</h2>
<div class="card card-lg forecast-card">
  <ul data-forecast-list>{items}
  </ul>
</div>"#
    )
}

pub fn search_results(places: &[Place]) -> String {
    let mut items = String::new();
    for place in places {
        let name = escape(&place.name);
        let _ = write!(
            items,
            r#"
  <li class="view-item">
    <span class="m-icon">location_on</span>
    <div>
      <p class="item-title">{name}</p>
      <p class="label-2 item-subtitle">{subtitle}</p>
    </div>
    <a href="{href}" class="item-link has-state" aria-label="{name}" data-search-toggler></a>
  </li>"#,
            subtitle = escape(&place.subtitle()),
            href = escape(&place.hash()),
        );
    }
    format!("<ul class=\"view-list\" data-search-list>{items}\n</ul>")
}

pub fn error_panel(view: &ErrorView) -> String {
    match view {
        ErrorView::NotFound => r##"<h2 class="heading">404</h2>
<p class="body-1">Page not found!</p>
<a href="#/current-location" class="btn-primary"><span class="span">Go Home</span></a>"##
            .to_string(),
        ErrorView::Fetch(message) => format!(
            r#"<h2 class="heading">Oops</h2>
<p class="body-1">{}</p>"#,
            escape(message)
        ),
    }
}

fn display(visible: bool, shown: &str) -> &str {
    if visible { shown } else { "none" }
}

fn class_list(base: &str, extra: &[(&str, bool)]) -> String {
    let mut classes = base.to_string();
    for (class, on) in extra {
        if *on {
            classes.push(' ');
            classes.push_str(class);
        }
    }
    classes
}

/// The whole page with every named region in place.
pub fn document(page: &Page) -> String {
    let search_view = class_list("search-view", &[("active", page.search.open)]);
    let search_result = class_list(
        "search-result",
        &[
            ("active", page.search.results_active),
            ("searching", page.search.searching),
        ],
    );
    let container = class_list("container", &[("fade-in", page.fade_in)]);
    let overflow = if page.container_scrollable { "overlay" } else { "hidden" };
    let disabled = if page.current_location_disabled { " disabled" } else { "" };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Weather Dashboard</title>
  <link rel="stylesheet" href="./assets/css/style.css">
</head>
<body>
<header class="header">
  <div class="{search_view}" data-search-view>
    <div class="search-wrapper">
      <input type="search" name="search" placeholder="Search city..." autocomplete="off" class="search-field" data-search-field value="{field}">
      <span class="m-icon leading-icon">search</span>
      <button class="icon-btn leading-icon has-state" aria-label="close search" data-search-toggler><span class="m-icon">arrow_back</span></button>
    </div>
    <div class="{search_result}" data-search-result>{search_markup}</div>
  </div>
  <div class="header-actions">
    <button class="icon-btn has-state" aria-label="open search" data-search-toggler><span class="m-icon icon">search</span></button>
    <a href="#/current-location" class="btn-primary has-state" data-current-location-btn{disabled}><span class="m-icon">my_location</span><span class="span">Current Location</span></a>
  </div>
</header>
<main>
  <article class="{container}" data-container style="overflow-y: {overflow}">
    <div class="content-left">
      <section class="section current-weather" aria-label="current weather" data-current-weather>{current}</section>
      <section class="section forecast" aria-labelledby="forecast-label" data-5-day-forecast>{five_day}</section>
    </div>
    <div class="content-right">
      <section class="section highlights" aria-labelledby="highlights-label" data-highlights>{highlights}</section>
      <section class="section hourly-forecast" aria-label="hourly forecast" data-hourly-forecast>{hourly}</section>
    </div>
    <div class="loading" data-loading style="display: {loading}"></div>
  </article>
</main>
<section class="error-content" data-error-content style="display: {error_display}">{error}</section>
</body>
</html>
"##,
        field = escape(&page.search.field),
        search_markup = page.region(Region::SearchResult),
        current = page.region(Region::CurrentWeather),
        five_day = page.region(Region::FiveDayForecast),
        highlights = page.region(Region::Highlights),
        hourly = page.region(Region::HourlyForecast),
        loading = display(page.loading, "grid"),
        error_display = display(page.error_visible(), "flex"),
        error = page.region(Region::ErrorContent),
    )
}
