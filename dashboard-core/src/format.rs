//! Date, clock and unit helpers shared by the templates.
//!
//! Every timestamp helper takes Unix seconds plus the location's UTC offset in
//! seconds and formats the shifted instant as if it were UTC, so the output is
//! the wall-clock time at the location regardless of the machine's zone.

use chrono::{DateTime, Datelike, Timelike, Utc};

pub const WEEK_DAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const INVALID_DATE: &str = "Invalid Date";

fn shifted(unix: i64, timezone_offset: i32) -> Option<DateTime<Utc>> {
    let secs = unix.checked_add(i64::from(timezone_offset))?;
    DateTime::from_timestamp(secs, 0)
}

fn twelve_hour(hour: u32) -> (u32, &'static str) {
    let period = if hour >= 12 { "PM" } else { "AM" };
    match hour % 12 {
        0 => (12, period),
        h => (h, period),
    }
}

/// "Wednesday 19, Jun"
pub fn format_date(unix: i64, timezone_offset: i32) -> String {
    match shifted(unix, timezone_offset) {
        Some(dt) => format!(
            "{} {}, {}",
            WEEK_DAYS[dt.weekday().num_days_from_sunday() as usize],
            dt.day(),
            MONTHS[dt.month0() as usize]
        ),
        None => INVALID_DATE.to_string(),
    }
}

/// "9:05 PM"
pub fn format_clock_time(unix: i64, timezone_offset: i32) -> String {
    match shifted(unix, timezone_offset) {
        Some(dt) => {
            let (hour, period) = twelve_hour(dt.hour());
            format!("{hour}:{:02} {period}", dt.minute())
        }
        None => INVALID_DATE.to_string(),
    }
}

/// "9 PM"
pub fn format_hour_label(unix: i64, timezone_offset: i32) -> String {
    match shifted(unix, timezone_offset) {
        Some(dt) => {
            let (hour, period) = twelve_hour(dt.hour());
            format!("{hour} {period}")
        }
        None => INVALID_DATE.to_string(),
    }
}

/// "19 Jun"
pub fn format_day_month(unix: i64, timezone_offset: i32) -> String {
    match shifted(unix, timezone_offset) {
        Some(dt) => format!("{} {}", dt.day(), MONTHS[dt.month0() as usize]),
        None => INVALID_DATE.to_string(),
    }
}

pub fn weekday_name(unix: i64, timezone_offset: i32) -> &'static str {
    match shifted(unix, timezone_offset) {
        Some(dt) => WEEK_DAYS[dt.weekday().num_days_from_sunday() as usize],
        None => INVALID_DATE,
    }
}

pub fn mps_to_kph(mps: f64) -> f64 {
    mps * (18.0 / 5.0)
}

/// Air quality index as reported by the pollution endpoint (1 best, 5 worst).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aqi {
    Good = 1,
    Fair = 2,
    Moderate = 3,
    Poor = 4,
    VeryPoor = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AqiDescription {
    pub level: &'static str,
    pub message: &'static str,
}

impl Aqi {
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn description(self) -> AqiDescription {
        let (level, message) = match self {
            Aqi::Good => (
                "Good",
                "Air quality is considered satisfactory, and air pollution poses little or no risk.",
            ),
            Aqi::Fair => (
                "Fair",
                "Air quality is acceptable; however, for some pollutants there may be a moderate \
                 health concern for a very small number of people who are usually sensitive to \
                 air pollution.",
            ),
            Aqi::Moderate => (
                "Moderate",
                "Members of sensitive groups may experience health effects. The general public \
                 is not likely to be affected.",
            ),
            Aqi::Poor => (
                "Poor",
                "Everyone may begin to experience health effects; members of sensitive groups \
                 may experience more serious health effects.",
            ),
            Aqi::VeryPoor => (
                "Very Poor",
                "Health warnings of emergency conditions. The entire population is more likely \
                 to be affected.",
            ),
        };
        AqiDescription { level, message }
    }
}

impl TryFrom<u8> for Aqi {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Aqi::Good),
            2 => Ok(Aqi::Fair),
            3 => Ok(Aqi::Moderate),
            4 => Ok(Aqi::Poor),
            5 => Ok(Aqi::VeryPoor),
            other => Err(other),
        }
    }
}

/// Table lookup for indices 1..=5.
pub fn aqi_description(index: u8) -> Option<AqiDescription> {
    Aqi::try_from(index).ok().map(Aqi::description)
}
