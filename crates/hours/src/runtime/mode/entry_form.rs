use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use time::OffsetDateTime;

use crate::app::Command;
use crate::app::model::{EntryField, EntryForm, EntryFormTarget, Model, TOO_SHORT_TO_SAVE_MESSAGE};
use crate::domain::timestamp::{
    ShiftDirection, TimeShift, TimestampError, parse_timestamp, shift_timestamp_input,
    validate_entry_span,
};
use crate::runtime::mode::task_form::edit_input;

/// Handles key input while one of the log entry forms is shown.
pub(crate) fn handle(model: &mut Model, key: KeyEvent, now: OffsetDateTime) -> Vec<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => {
            close(model);

            return Vec::new();
        }
        KeyCode::Char('s') if ctrl => return submit(model, now),
        KeyCode::Tab => model.entry_form.cycle_focus(true),
        KeyCode::BackTab => model.entry_form.cycle_focus(false),
        KeyCode::Enter if model.entry_form.focus == EntryField::Comment => {
            model.entry_form.comment.insert_newline();
        }
        KeyCode::Enter => return submit(model, now),
        KeyCode::Char(ch) if model.entry_form.focus != EntryField::Comment => {
            match timestamp_shortcut(ch) {
                Some((direction, granularity)) => {
                    shift_focused_timestamp(model, now, direction, granularity);
                }
                None => {
                    edit_input(model.entry_form.focused_input_mut(), key);
                }
            }
        }
        _ => {
            edit_input(model.entry_form.focused_input_mut(), key);
        }
    }

    Vec::new()
}

fn timestamp_shortcut(ch: char) -> Option<(ShiftDirection, TimeShift)> {
    match ch {
        'j' => Some((ShiftDirection::Backward, TimeShift::Minute)),
        'k' => Some((ShiftDirection::Forward, TimeShift::Minute)),
        'J' => Some((ShiftDirection::Backward, TimeShift::FiveMinutes)),
        'K' => Some((ShiftDirection::Forward, TimeShift::FiveMinutes)),
        'h' => Some((ShiftDirection::Backward, TimeShift::Day)),
        'l' => Some((ShiftDirection::Forward, TimeShift::Day)),
        _ => None,
    }
}

fn shift_focused_timestamp(
    model: &mut Model,
    now: OffsetDateTime,
    direction: ShiftDirection,
    granularity: TimeShift,
) {
    let input = model.entry_form.focused_input_mut();
    match shift_timestamp_input(input.text(), now.offset(), direction, granularity) {
        Ok(shifted) => input.set_text(&shifted),
        Err(error) => model.set_error(error.to_string()),
    }
}

fn submit(model: &mut Model, now: OffsetDateTime) -> Vec<Command> {
    let form = &model.entry_form;
    let offset = now.offset();
    let comment = form.comment_value();

    let begin = match parse_timestamp(form.begin.text(), offset) {
        Ok(begin) if begin > now => {
            model.set_error(TimestampError::BeginInFuture.to_string());

            return Vec::new();
        }
        Ok(begin) => begin,
        Err(error) => {
            model.set_error(error.to_string());

            return Vec::new();
        }
    };

    let command = match form.target {
        EntryFormTarget::EditOpen => Command::EditOpenEntry { begin, comment },
        target => {
            let end = match parse_timestamp(form.end.text(), offset) {
                Ok(end) => end,
                Err(error) => {
                    model.set_error(error.to_string());

                    return Vec::new();
                }
            };
            if let Err(error) = validate_entry_span(begin, end, model.min_log_secs) {
                report_span_error(model, target, &error);

                return Vec::new();
            }

            match target {
                EntryFormTarget::Finish { entry_id, task_id } => Command::FinishTracking {
                    entry_id,
                    task_id,
                    begin,
                    end,
                    comment,
                },
                EntryFormTarget::Manual { task_id } => Command::InsertManualEntry {
                    task_id,
                    begin,
                    end,
                    comment,
                },
                EntryFormTarget::EditClosed { entry_id } => Command::EditClosedEntry {
                    entry_id,
                    begin,
                    end,
                    comment,
                },
                EntryFormTarget::EditOpen => return Vec::new(),
            }
        }
    };
    close(model);

    vec![command]
}

/// A short open entry can still be discarded, so finishing it points at
/// `ctrl+x` instead of failing outright.
fn report_span_error(model: &mut Model, target: EntryFormTarget, error: &TimestampError) {
    match (target, error) {
        (EntryFormTarget::Finish { .. }, TimestampError::TooShort { .. }) => {
            model.set_info(TOO_SHORT_TO_SAVE_MESSAGE);
        }
        _ => model.set_error(error.to_string()),
    }
}

fn close(model: &mut Model) {
    model.view = model.entry_form.target.origin();
    model.entry_form = EntryForm::new(EntryFormTarget::EditOpen);
}
