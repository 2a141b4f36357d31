//! Timestamp parsing, validation, shifting, and duration formatting shared by
//! the interactive forms and every renderer.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

/// Format used by form inputs and tables, e.g. `2024/06/08 09:30`.
pub const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]/[month]/[day] [hour]:[minute]");

/// Format used for period arguments and day headers, e.g. `2024/06/08`.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]/[month]/[day]");

/// Short day header used by the report grid, e.g. `Sat 08`.
const DAY_HEADER_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]/[month]/[day] [weekday repr:short]");

const TIME_OF_DAY_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 3600;

/// Validation failures for timestamps entered in a form.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    #[error("\"{input}\" is not a valid timestamp; expected YYYY/MM/DD HH:MM")]
    Parse { input: String },
    #[error("End timestamp cannot be before begin timestamp")]
    EndBeforeBegin,
    #[error("Task log duration is too short to save (minimum is {min_secs}s)")]
    TooShort { min_secs: i64 },
    #[error("Begin timestamp cannot be in the future")]
    BeginInFuture,
}

/// Granularity of a keyboard time adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeShift {
    Minute,
    FiveMinutes,
    Day,
}

/// Direction of a keyboard time adjustment or a period navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftDirection {
    Forward,
    Backward,
}

impl TimeShift {
    fn duration(self) -> Duration {
        match self {
            Self::Minute => Duration::minutes(1),
            Self::FiveMinutes => Duration::minutes(5),
            Self::Day => Duration::days(1),
        }
    }
}

/// Formats `timestamp` as `YYYY/MM/DD HH:MM`.
pub fn format_timestamp(timestamp: OffsetDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).unwrap_or_default()
}

/// Formats `timestamp` as `YYYY/MM/DD`.
pub fn format_date(timestamp: OffsetDateTime) -> String {
    timestamp.format(DATE_FORMAT).unwrap_or_default()
}

/// Formats `timestamp` as `YYYY/MM/DD Sat`.
pub fn format_day_header(timestamp: OffsetDateTime) -> String {
    timestamp.format(DAY_HEADER_FORMAT).unwrap_or_default()
}

/// Formats `timestamp` as `HH:MM`.
pub fn format_time_of_day(timestamp: OffsetDateTime) -> String {
    timestamp.format(TIME_OF_DAY_FORMAT).unwrap_or_default()
}

/// Parses a `YYYY/MM/DD HH:MM` string in the given local offset.
///
/// # Errors
/// Returns [`TimestampError::Parse`] when `input` does not match the format.
pub fn parse_timestamp(input: &str, offset: UtcOffset) -> Result<OffsetDateTime, TimestampError> {
    let trimmed = input.trim();

    PrimitiveDateTime::parse(trimmed, TIMESTAMP_FORMAT)
        .map(|timestamp| timestamp.assume_offset(offset))
        .map_err(|_| TimestampError::Parse {
            input: trimmed.to_string(),
        })
}

/// Parses a `YYYY/MM/DD` string into local midnight of that day.
///
/// Returns `None` when `input` is not a valid date.
pub fn parse_date(input: &str, offset: UtcOffset) -> Option<OffsetDateTime> {
    Date::parse(input.trim(), DATE_FORMAT)
        .ok()
        .map(|date| date.with_time(Time::MIDNIGHT).assume_offset(offset))
}

/// Returns local midnight at the start of the day containing `timestamp`.
pub fn start_of_day(timestamp: OffsetDateTime) -> OffsetDateTime {
    timestamp.replace_time(Time::MIDNIGHT)
}

/// Returns `timestamp` without its sub-second component.
pub fn truncate_to_second(timestamp: OffsetDateTime) -> OffsetDateTime {
    timestamp.replace_nanosecond(0).unwrap_or(timestamp)
}

/// Whole seconds elapsed between `begin` and `end`, clamped at zero.
pub fn secs_between(begin: OffsetDateTime, end: OffsetDateTime) -> i64 {
    (end - begin).whole_seconds().max(0)
}

/// Checks that a closed entry spanning `begin..end` may be saved.
///
/// Returns the whole seconds spent on success.
///
/// # Errors
/// Returns [`TimestampError::EndBeforeBegin`] when `end` precedes `begin`, and
/// [`TimestampError::TooShort`] when the span is shorter than `min_secs`.
pub fn validate_entry_span(
    begin: OffsetDateTime,
    end: OffsetDateTime,
    min_secs: i64,
) -> Result<i64, TimestampError> {
    if end < begin {
        return Err(TimestampError::EndBeforeBegin);
    }

    let secs = secs_between(begin, end);
    if secs < min_secs {
        return Err(TimestampError::TooShort { min_secs });
    }

    Ok(secs)
}

/// Moves `timestamp` by one step of `granularity` in `direction`.
pub fn shift_timestamp(
    timestamp: OffsetDateTime,
    direction: ShiftDirection,
    granularity: TimeShift,
) -> OffsetDateTime {
    let step = granularity.duration();
    let shifted = match direction {
        ShiftDirection::Forward => timestamp.checked_add(step),
        ShiftDirection::Backward => timestamp.checked_sub(step),
    };

    shifted.unwrap_or(timestamp)
}

/// Parses a form timestamp, shifts it, and formats it back.
///
/// # Errors
/// Returns [`TimestampError::Parse`] when `input` is not a valid timestamp.
pub fn shift_timestamp_input(
    input: &str,
    offset: UtcOffset,
    direction: ShiftDirection,
    granularity: TimeShift,
) -> Result<String, TimestampError> {
    let timestamp = parse_timestamp(input, offset)?;

    Ok(format_timestamp(shift_timestamp(
        timestamp,
        direction,
        granularity,
    )))
}

/// Formats a number of seconds as `1h 10m`, `30m`, or `45s`.
///
/// Zero components are omitted; anything under a minute is shown in seconds.
pub fn humanize_duration(secs: i64) -> String {
    let secs = secs.max(0);
    if secs < SECS_PER_MINUTE {
        return format!("{secs}s");
    }

    let hours = secs / SECS_PER_HOUR;
    let minutes = (secs % SECS_PER_HOUR) / SECS_PER_MINUTE;

    match (hours, minutes) {
        (0, minutes) => format!("{minutes}m"),
        (hours, 0) => format!("{hours}h"),
        (hours, minutes) => format!("{hours}h {minutes}m"),
    }
}

/// Formats how long the open entry has been running.
///
/// Anything up to a minute reads as `<1m`.
pub fn humanize_active_duration(secs: i64) -> String {
    if secs <= SECS_PER_MINUTE {
        return "<1m".to_string();
    }

    humanize_duration(secs)
}

#[cfg(test)]
mod tests {
    use time::macros::{datetime, offset};

    use super::*;

    #[test]
    fn test_humanize_duration_formats_known_values() {
        // Arrange
        let cases = [
            (0, "0s"),
            (30, "30s"),
            (60, "1m"),
            (1805, "30m"),
            (3605, "1h"),
            (4200, "1h 10m"),
            (87000, "24h 10m"),
        ];

        // Act & Assert
        for (secs, expected) in cases {
            assert_eq!(humanize_duration(secs), expected, "secs = {secs}");
        }
    }

    #[test]
    fn test_humanize_active_duration_hides_sub_minute_values() {
        // Arrange & Act & Assert
        assert_eq!(humanize_active_duration(0), "<1m");
        assert_eq!(humanize_active_duration(60), "<1m");
        assert_eq!(humanize_active_duration(61), "1m");
        assert_eq!(humanize_active_duration(7260), "2h 1m");
    }

    #[test]
    fn test_parse_timestamp_uses_given_offset() {
        // Arrange
        let input = " 2024/06/08 09:30 ";

        // Act
        let parsed = parse_timestamp(input, offset!(+2)).expect("valid timestamp");

        // Assert
        assert_eq!(parsed, datetime!(2024-06-08 09:30 +2));
    }

    #[test]
    fn test_parse_timestamp_rejects_wrong_format() {
        // Arrange
        let input = "2024-06-08 09:30";

        // Act
        let result = parse_timestamp(input, offset!(UTC));

        // Assert
        assert_eq!(
            result,
            Err(TimestampError::Parse {
                input: input.to_string(),
            })
        );
    }

    #[test]
    fn test_format_timestamp_round_trips_minute_precision() {
        // Arrange
        let timestamp = datetime!(2024-06-08 09:30:45 UTC);

        // Act
        let formatted = format_timestamp(timestamp);

        // Assert
        assert_eq!(formatted, "2024/06/08 09:30");
    }

    #[test]
    fn test_validate_entry_span_rejects_end_before_begin() {
        // Arrange
        let begin = datetime!(2024-06-08 10:00 UTC);
        let end = datetime!(2024-06-08 09:00 UTC);

        // Act
        let result = validate_entry_span(begin, end, 60);

        // Assert
        assert_eq!(result, Err(TimestampError::EndBeforeBegin));
    }

    #[test]
    fn test_validate_entry_span_rejects_short_duration() {
        // Arrange
        let begin = datetime!(2024-06-08 10:00 UTC);
        let end = datetime!(2024-06-08 10:00:30 UTC);

        // Act
        let result = validate_entry_span(begin, end, 60);

        // Assert
        assert_eq!(result, Err(TimestampError::TooShort { min_secs: 60 }));
    }

    #[test]
    fn test_validate_entry_span_accepts_threshold_duration() {
        // Arrange
        let begin = datetime!(2024-06-08 10:00 UTC);
        let end = datetime!(2024-06-08 10:01 UTC);

        // Act
        let result = validate_entry_span(begin, end, 60);

        // Assert
        assert_eq!(result, Ok(60));
    }

    #[test]
    fn test_shift_timestamp_moves_by_granularity() {
        // Arrange
        let timestamp = datetime!(2024-06-08 23:58 UTC);

        // Act
        let minute_later =
            shift_timestamp(timestamp, ShiftDirection::Forward, TimeShift::Minute);
        let five_minutes_later =
            shift_timestamp(timestamp, ShiftDirection::Forward, TimeShift::FiveMinutes);
        let day_earlier = shift_timestamp(timestamp, ShiftDirection::Backward, TimeShift::Day);

        // Assert
        assert_eq!(minute_later, datetime!(2024-06-08 23:59 UTC));
        assert_eq!(five_minutes_later, datetime!(2024-06-09 00:03 UTC));
        assert_eq!(day_earlier, datetime!(2024-06-07 23:58 UTC));
    }

    #[test]
    fn test_shift_timestamp_input_formats_shifted_value() {
        // Arrange
        let input = "2024/06/08 09:30";

        // Act
        let shifted = shift_timestamp_input(
            input,
            offset!(UTC),
            ShiftDirection::Backward,
            TimeShift::FiveMinutes,
        )
        .expect("valid timestamp");

        // Assert
        assert_eq!(shifted, "2024/06/08 09:25");
    }

    #[test]
    fn test_secs_between_truncates_and_clamps() {
        // Arrange
        let begin = datetime!(2024-06-08 10:00:00.900 UTC);
        let end = datetime!(2024-06-08 10:00:10.100 UTC);

        // Act & Assert
        assert_eq!(secs_between(begin, end), 9);
        assert_eq!(secs_between(end, begin), 0);
    }
}
