//! Period keywords and the date windows they resolve to.

use time::{Duration, OffsetDateTime};

use crate::domain::timestamp::{ShiftDirection, parse_date, start_of_day};

/// Keyword selecting every entry ever recorded; only `stats` accepts it.
pub const PERIOD_ALL: &str = "all";

/// Longest window `report` and `log` will render.
pub const REPORT_MAX_DAYS: i64 = 7;

const RANGE_SEPARATOR: &str = "...";

/// Failures while resolving a period keyword.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    #[error(
        "unknown period \"{0}\"; expected today, yest, <N>d, week, this-month, \
         YYYY/MM/DD, or YYYY/MM/DD...YYYY/MM/DD"
    )]
    Unknown(String),
    #[error("\"{0}\" is not a valid date; expected YYYY/MM/DD")]
    InvalidDate(String),
    #[error("end date of the range must not be before its start date")]
    EndBeforeStart,
    #[error("time period is too large; at most {limit} days are allowed")]
    TooManyDays { limit: i64 },
    #[error("period \"all\" is only supported by stats")]
    AllNotSupported,
}

/// Half-open window `[start, end)` spanning `num_days` local days.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
    pub num_days: i64,
}

impl DateRange {
    /// Creates a window of `num_days` days starting at `start`.
    pub fn from_start(start: OffsetDateTime, num_days: i64) -> Self {
        Self {
            start,
            end: start + Duration::days(num_days),
            num_days,
        }
    }

    /// Returns the window of the same length immediately before or after this
    /// one.
    #[must_use]
    pub fn shifted(&self, direction: ShiftDirection) -> Self {
        let step = Duration::days(self.num_days);
        let start = match direction {
            ShiftDirection::Forward => self.start + step,
            ShiftDirection::Backward => self.start - step,
        };

        Self::from_start(start, self.num_days)
    }

    /// Local midnight of every day covered by the window.
    pub fn day_starts(&self) -> impl Iterator<Item = OffsetDateTime> + '_ {
        (0..self.num_days).map(|offset| self.start + Duration::days(offset))
    }
}

/// Options controlling how a period keyword resolves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PeriodOptions {
    /// Resolve `week` to the full Monday-Sunday week instead of Monday-today.
    pub full_week: bool,
    /// Reject windows longer than this many days.
    pub max_days: Option<i64>,
}

/// Resolves `period` relative to `now`.
///
/// # Errors
/// Returns [`PeriodError`] when the keyword or dates are invalid, the range is
/// reversed, or the window exceeds `options.max_days`.
pub fn parse_period(
    period: &str,
    now: OffsetDateTime,
    options: PeriodOptions,
) -> Result<DateRange, PeriodError> {
    let today = start_of_day(now);
    let period = period.trim();

    let range = match period {
        "today" => DateRange::from_start(today, 1),
        "yest" | "yesterday" => DateRange::from_start(today - Duration::days(1), 1),
        "week" => {
            let days_since_monday = i64::from(now.weekday().number_days_from_monday());
            let num_days = if options.full_week {
                7
            } else {
                days_since_monday + 1
            };

            DateRange::from_start(today - Duration::days(days_since_monday), num_days)
        }
        "this-month" => {
            let days_into_month = i64::from(now.day()) - 1;

            DateRange::from_start(today - Duration::days(days_into_month), days_into_month + 1)
        }
        PERIOD_ALL => return Err(PeriodError::AllNotSupported),
        _ => {
            if let Some(num_days) = parse_day_count(period) {
                DateRange::from_start(today - Duration::days(num_days - 1), num_days)
            } else if let Some((start, end)) = period.split_once(RANGE_SEPARATOR) {
                parse_explicit_range(start, end, now)?
            } else {
                let start = parse_date(period, now.offset())
                    .ok_or_else(|| PeriodError::Unknown(period.to_string()))?;

                DateRange::from_start(start, 1)
            }
        }
    };

    if let Some(limit) = options.max_days
        && range.num_days > limit
    {
        return Err(PeriodError::TooManyDays { limit });
    }

    Ok(range)
}

/// Resolves a `stats` period, where `all` means "no window".
///
/// # Errors
/// Returns [`PeriodError`] for any period [`parse_period`] rejects.
pub fn parse_stats_period(
    period: &str,
    now: OffsetDateTime,
    options: PeriodOptions,
) -> Result<Option<DateRange>, PeriodError> {
    if period.trim() == PERIOD_ALL {
        return Ok(None);
    }

    parse_period(period, now, options).map(Some)
}

fn parse_day_count(period: &str) -> Option<i64> {
    period
        .strip_suffix('d')
        .filter(|digits| !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_digit()))
        .and_then(|digits| digits.parse::<i64>().ok())
        .filter(|num_days| *num_days >= 1)
}

fn parse_explicit_range(
    start: &str,
    end: &str,
    now: OffsetDateTime,
) -> Result<DateRange, PeriodError> {
    let offset = now.offset();
    let start_date =
        parse_date(start, offset).ok_or_else(|| PeriodError::InvalidDate(start.to_string()))?;
    let end_date = match end.trim() {
        "" | "today" => start_of_day(now),
        end => parse_date(end, offset).ok_or_else(|| PeriodError::InvalidDate(end.to_string()))?,
    };

    if end_date < start_date {
        return Err(PeriodError::EndBeforeStart);
    }

    let num_days = (end_date - start_date).whole_days() + 1;

    Ok(DateRange::from_start(start_date, num_days))
}
