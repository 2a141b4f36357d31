//! Template rendering behind `hours active`, meant for status bars and
//! prompts.

use time::OffsetDateTime;

use crate::domain::task::ActiveTaskDetails;
use crate::domain::timestamp::{humanize_active_duration, secs_between};

pub const TASK_PLACEHOLDER: &str = "{{task}}";
pub const TIME_PLACEHOLDER: &str = "{{time}}";
pub const DEFAULT_TEMPLATE: &str = " {{task}} ({{time}}) ";

/// Fills the first `{{task}}` and the first `{{time}}` in `template`.
pub fn render_active(template: &str, details: &ActiveTaskDetails, now: OffsetDateTime) -> String {
    let time_spent = humanize_active_duration(secs_between(details.begin, now));

    template
        .replacen(TASK_PLACEHOLDER, &details.task_summary, 1)
        .replacen(TIME_PLACEHOLDER, &time_spent, 1)
}
