//! Daily forecast aggregation
//!
//! Reduces a time-ordered sequence of 3-hour forecast samples spanning
//! several days into one representative sample per calendar day, selecting
//! the sample closest to local noon.

use chrono::{LocalResult, NaiveDate, TimeZone, Timelike};
use serde::Serialize;

use crate::models::ForecastSample;

/// Maximum number of days returned by [`aggregate`]
pub const MAX_FORECAST_DAYS: usize = 5;

/// Target hour-of-day for the representative sample
const NOON_HOUR: u32 = 12;

/// One forecast sample chosen to represent a calendar day
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyForecast {
    /// Local calendar date this entry represents
    pub date: NaiveDate,
    /// Absolute hour distance from local noon at selection time
    pub hours_from_noon: u32,
    /// The chosen sample
    pub sample: ForecastSample,
}

/// Pick one representative sample per local calendar day.
///
/// Days keep the order in which they first appear in the input and the
/// result is truncated to [`MAX_FORECAST_DAYS`]. Within a day the sample
/// whose local hour is closest to noon wins; on a tie the sample seen
/// first in input order is kept. The timezone used to derive local dates
/// is an explicit input so results never depend on the host clock;
/// callers pass the UTC offset the weather provider reports for the
/// forecast location.
pub fn aggregate<Tz: TimeZone>(samples: &[ForecastSample], tz: &Tz) -> Vec<DailyForecast> {
    let mut days: Vec<DailyForecast> = Vec::new();

    for sample in samples {
        let local = match tz.timestamp_opt(sample.timestamp_utc, 0) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
            LocalResult::None => continue,
        };
        let date = local.date_naive();
        let hours_from_noon = local.hour().abs_diff(NOON_HOUR);

        match days.iter_mut().find(|day| day.date == date) {
            Some(day) => {
                // Strict comparison keeps the first-encountered sample on ties.
                if hours_from_noon < day.hours_from_noon {
                    day.hours_from_noon = hours_from_noon;
                    day.sample = sample.clone();
                }
            }
            None => days.push(DailyForecast {
                date,
                hours_from_noon,
                sample: sample.clone(),
            }),
        }
    }

    days.truncate(MAX_FORECAST_DAYS);
    days
}
