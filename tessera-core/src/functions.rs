//! Database function tokens
//!
//! These return SQL expression fragments to be passed into `add_where`,
//! `add_query` or the value lists. Nothing here talks to a database.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Token for the current server time
pub const NOW: &str = "NOW()";

/// Layout used for DATETIME literals
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Zone used by [`now_with_time_zone`]; deliberately not configurable
pub const FIXED_TIME_ZONE: Tz = chrono_tz::Europe::London;

/// Unit used by [`date_add`] when none is given
pub const DEFAULT_INTERVAL_UNIT: &str = "DAY";

/// The dialect token for the current server time
pub fn now() -> String {
    NOW.to_string()
}

/// The current instant as `YYYY-MM-DD HH:MM:SS` in [`FIXED_TIME_ZONE`]
pub fn now_with_time_zone() -> String {
    now_with_time_zone_at(Utc::now())
}

/// Format `instant` as `YYYY-MM-DD HH:MM:SS` in [`FIXED_TIME_ZONE`]
pub fn now_with_time_zone_at(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&FIXED_TIME_ZONE)
        .format(DATETIME_FORMAT)
        .to_string()
}

/// `DATEDIFF(<date1>, <date2>)`, each blank argument standing for `NOW()`
///
/// # Examples
/// ```
/// use tessera_core::functions::date_diff;
///
/// assert_eq!(date_diff("", ""), "DATEDIFF(NOW(), NOW())");
/// assert_eq!(date_diff("due_date", ""), "DATEDIFF(due_date, NOW())");
/// ```
pub fn date_diff(date1: &str, date2: &str) -> String {
    format!("DATEDIFF({}, {})", or_now(date1), or_now(date2))
}

/// `DATE_ADD(<date>, INTERVAL <interval> <unit>)`, a blank date standing for
/// `NOW()` and a blank unit for `DAY`
pub fn date_add(date: &str, interval: i64, unit: &str) -> String {
    let unit = if unit.is_empty() {
        DEFAULT_INTERVAL_UNIT
    } else {
        unit
    };
    format!("DATE_ADD({}, INTERVAL {} {})", or_now(date), interval, unit)
}

fn or_now(date: &str) -> &str {
    if date.is_empty() {
        NOW
    } else {
        date
    }
}
