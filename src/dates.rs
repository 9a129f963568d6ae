use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, NaiveDate, TimeZone};

const DAY_FMT: &str = "%Y-%m-%d";

/// Day-granularity key for bucketing report values, e.g. `2024-01-01`.
pub fn day_key(dt: &DateTime<Local>) -> String {
    dt.format(DAY_FMT).to_string()
}

/// Strict `YYYY-MM-DD` parsing. Anything else is an error, never a silent
/// fallback date.
pub fn parse_day(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DAY_FMT)
        .with_context(|| format!("invalid date `{}` (expected YYYY-MM-DD)", input))
}

pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Midnight local time on the given day, for workouts logged without a
/// time of day.
pub fn day_start(day: NaiveDate) -> Result<DateTime<Local>> {
    let naive = day
        .and_hms_opt(0, 0, 0)
        .with_context(|| format!("invalid day {}", day))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("midnight does not exist locally on {}", day))
}

/// Long human-readable form used when showing a single workout.
pub fn format_display(dt: &DateTime<Local>) -> String {
    dt.format("%A, %B %e %Y %H:%M").to_string()
}

/// Inclusive day-granularity date range. Construction rejects inverted
/// ranges so every `DateRange` in the program is valid by the time report
/// code sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            bail!("start date {} is after end date {}", start, end);
        }
        Ok(Self { start, end })
    }

    /// Both boundary days are inside the range.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}
