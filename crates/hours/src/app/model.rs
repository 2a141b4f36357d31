use time::OffsetDateTime;

use crate::app::list::SelectableList;
use crate::domain::input::InputState;
use crate::domain::task::{ActiveTaskDetails, Task, TaskLogEntry};
use crate::domain::timestamp::format_timestamp;

/// Smallest terminal width the interactive views are laid out for.
pub const MIN_TERMINAL_WIDTH: u16 = 96;

/// Smallest terminal height the interactive views are laid out for.
pub const MIN_TERMINAL_HEIGHT: u16 = 24;

/// Number of closed entries shown in the task log list.
pub const TASK_LOG_LIMIT: i64 = 50;

/// Number of tasks loaded into each task list.
pub const TASK_LIST_LIMIT: i64 = 1000;

pub const SUMMARY_CHAR_LIMIT: usize = 100;
pub const COMMENT_CHAR_LIMIT: usize = 3000;
pub const TIMESTAMP_CHAR_LIMIT: usize = 16;

/// Tasks without activity in this many days are archived by `A`.
pub const STALE_TASK_DAYS: i64 = 14;

/// Number of handled key presses a status message stays visible for.
pub const STATUS_MESSAGE_TTL: u8 = 4;

pub const TOO_SHORT_TO_SAVE_MESSAGE: &str =
    "Task log duration is too short to save; press <ctrl+x> if you want to discard it";
pub const NOTHING_TRACKED_MESSAGE: &str = "Nothing is being tracked right now";
pub const EMPTY_SUMMARY_MESSAGE: &str = "Task summary cannot be empty";
pub const DEACTIVATE_TRACKED_MESSAGE: &str =
    "Cannot deactivate a task being tracked; stop tracking and try again.";
pub const NO_MOVE_TARGETS_MESSAGE: &str = "No other active tasks to move this log to";

/// The screen currently shown. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    TaskList,
    TaskLogList,
    TaskLogDetails,
    InactiveTaskList,
    TaskForm,
    EditOpenEntryForm,
    FinishTrackingForm,
    ManualEntryForm,
    EditClosedEntryForm,
    MoveTargetPicker,
    Help,
    InsufficientSize,
}

impl View {
    /// Title shown in the header for this view.
    pub fn title(self) -> &'static str {
        match self {
            Self::TaskList => "Tasks",
            Self::TaskLogList => "Task Logs (last 50)",
            Self::TaskLogDetails => "Task Log Details",
            Self::InactiveTaskList => "Inactive Tasks",
            Self::TaskForm => "Task",
            Self::EditOpenEntryForm => "Edit Active Task Log",
            Self::FinishTrackingForm => "Save Task Log",
            Self::ManualEntryForm => "Add Task Log",
            Self::EditClosedEntryForm => "Edit Task Log",
            Self::MoveTargetPicker => "Move Task Log To",
            Self::Help => "Help",
            Self::InsufficientSize => "Terminal Too Small",
        }
    }

    /// The three list views cycled with `tab` and the number keys.
    pub const LISTS: [Self; 3] = [Self::TaskList, Self::TaskLogList, Self::InactiveTaskList];
}

/// The open entry as last reported by storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveSession {
    pub begin: OffsetDateTime,
    pub comment: Option<String>,
    pub entry_id: i64,
    pub task_id: i64,
}

impl From<ActiveTaskDetails> for ActiveSession {
    fn from(details: ActiveTaskDetails) -> Self {
        Self {
            begin: details.begin,
            comment: details.comment,
            entry_id: details.entry_id,
            task_id: details.task_id,
        }
    }
}

/// Whether a task is being tracked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TrackingState {
    #[default]
    Idle,
    /// A start command is in flight; further start/stop keys are ignored.
    Starting { task_id: i64 },
    Active(ActiveSession),
}

impl TrackingState {
    pub fn session(&self) -> Option<&ActiveSession> {
        match self {
            Self::Active(session) => Some(session),
            Self::Idle | Self::Starting { .. } => None,
        }
    }

    /// Identifier of the task being (or about to be) tracked.
    pub fn task_id(&self) -> Option<i64> {
        match self {
            Self::Idle => None,
            Self::Starting { task_id } => Some(*task_id),
            Self::Active(session) => Some(session.task_id),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskFormMode {
    Create,
    Update { task_id: i64 },
}

/// Single-field form used to create a task or edit its summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskForm {
    pub mode: TaskFormMode,
    pub summary: InputState,
}

impl TaskForm {
    pub fn create() -> Self {
        Self {
            mode: TaskFormMode::Create,
            summary: InputState::with_char_limit(SUMMARY_CHAR_LIMIT),
        }
    }

    /// Creates a form pre-filled with `task`'s summary.
    pub fn update(task: &Task) -> Self {
        let mut form = Self::create();
        form.mode = TaskFormMode::Update { task_id: task.id };
        form.summary.set_text(&task.summary);

        form
    }
}

/// Field of an entry form that receives key presses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryField {
    Begin,
    End,
    Comment,
}

/// What submitting an entry form will do, with the identifiers it needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryFormTarget {
    EditOpen,
    Finish { entry_id: i64, task_id: i64 },
    Manual { task_id: i64 },
    EditClosed { entry_id: i64 },
}

impl EntryFormTarget {
    /// View that renders a form with this target.
    pub fn view(self) -> View {
        match self {
            Self::EditOpen => View::EditOpenEntryForm,
            Self::Finish { .. } => View::FinishTrackingForm,
            Self::Manual { .. } => View::ManualEntryForm,
            Self::EditClosed { .. } => View::EditClosedEntryForm,
        }
    }

    /// List view the form returns to on submit or cancel.
    pub fn origin(self) -> View {
        match self {
            Self::EditClosed { .. } => View::TaskLogList,
            Self::EditOpen | Self::Finish { .. } | Self::Manual { .. } => View::TaskList,
        }
    }

    /// Fields in focus order.
    pub fn fields(self) -> &'static [EntryField] {
        match self {
            Self::EditOpen => &[EntryField::Begin, EntryField::Comment],
            Self::Finish { .. } | Self::Manual { .. } | Self::EditClosed { .. } => {
                &[EntryField::Begin, EntryField::End, EntryField::Comment]
            }
        }
    }
}

/// Begin/end/comment form shared by every log entry flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryForm {
    pub begin: InputState,
    pub comment: InputState,
    pub end: InputState,
    pub focus: EntryField,
    pub target: EntryFormTarget,
}

impl EntryForm {
    /// Creates an empty form for `target` focused on its first field.
    pub fn new(target: EntryFormTarget) -> Self {
        Self {
            begin: InputState::with_char_limit(TIMESTAMP_CHAR_LIMIT),
            comment: InputState::with_char_limit(COMMENT_CHAR_LIMIT),
            end: InputState::with_char_limit(TIMESTAMP_CHAR_LIMIT),
            focus: EntryField::Begin,
            target,
        }
    }

    /// Form to finish the open entry: begin from storage, end at `now`.
    pub fn finish(session: &ActiveSession, now: OffsetDateTime) -> Self {
        let mut form = Self::new(EntryFormTarget::Finish {
            entry_id: session.entry_id,
            task_id: session.task_id,
        });
        form.begin.set_text(&format_timestamp(session.begin));
        form.end.set_text(&format_timestamp(now));
        form.comment
            .set_text(session.comment.as_deref().unwrap_or_default());
        form.focus = EntryField::Comment;

        form
    }

    /// Form to edit the open entry's begin timestamp and comment.
    pub fn edit_open(session: &ActiveSession) -> Self {
        let mut form = Self::new(EntryFormTarget::EditOpen);
        form.begin.set_text(&format_timestamp(session.begin));
        form.comment
            .set_text(session.comment.as_deref().unwrap_or_default());

        form
    }

    /// Form to log time manually against `task_id`, both ends at `now`.
    pub fn manual(task_id: i64, now: OffsetDateTime) -> Self {
        let mut form = Self::new(EntryFormTarget::Manual { task_id });
        let now = format_timestamp(now);
        form.begin.set_text(&now);
        form.end.set_text(&now);

        form
    }

    /// Form to edit a saved entry.
    pub fn edit_closed(entry: &TaskLogEntry) -> Self {
        let mut form = Self::new(EntryFormTarget::EditClosed { entry_id: entry.id });
        form.begin.set_text(&format_timestamp(entry.begin));
        form.end.set_text(&format_timestamp(entry.end));
        form.comment
            .set_text(entry.comment.as_deref().unwrap_or_default());

        form
    }

    /// Returns the input that has focus.
    pub fn focused_input_mut(&mut self) -> &mut InputState {
        match self.focus {
            EntryField::Begin => &mut self.begin,
            EntryField::End => &mut self.end,
            EntryField::Comment => &mut self.comment,
        }
    }

    /// Moves focus to the next (or previous) field, wrapping around.
    pub fn cycle_focus(&mut self, forward: bool) {
        let fields = self.target.fields();
        let position = fields
            .iter()
            .position(|field| *field == self.focus)
            .unwrap_or(0);
        let next = if forward {
            (position + 1) % fields.len()
        } else {
            (position + fields.len() - 1) % fields.len()
        };

        self.focus = fields[next];
    }

    /// Comment text, or `None` when blank.
    pub fn comment_value(&self) -> Option<String> {
        let comment = self.comment.text().trim();
        if comment.is_empty() {
            None
        } else {
            Some(comment.to_string())
        }
    }
}

/// Entry chosen for a move, remembered while the target picker is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveRequest {
    pub entry_id: i64,
    pub old_task_id: i64,
    pub secs_spent: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// Transient message shown in the footer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub remaining: u8,
    pub text: String,
}

/// Everything the interactive views render from.
///
/// Database results reach it through [`crate::app::update::handle_message`];
/// key presses change it through the handlers in `runtime::mode`.
#[derive(Clone, Debug)]
pub struct Model {
    pub entry_form: EntryForm,
    /// Select the tracked task once the first active-task fetch arrives.
    pub focus_tracked_on_load: bool,
    pub help_scroll: u16,
    pub inactive_tasks: SelectableList<Task>,
    /// View restored when help closes.
    pub last_view: View,
    pub log_entries: SelectableList<TaskLogEntry>,
    pub min_log_secs: i64,
    pub move_request: Option<MoveRequest>,
    pub move_targets: SelectableList<Task>,
    pub should_quit: bool,
    pub status: Option<StatusMessage>,
    pub task_form: TaskForm,
    pub tasks: SelectableList<Task>,
    pub tracking: TrackingState,
    pub view: View,
    /// View restored once the terminal is large enough again.
    pub view_before_resize: View,
}

impl Model {
    /// Creates the initial state; lists stay empty until the first fetches
    /// arrive.
    pub fn new(min_log_secs: i64) -> Self {
        Self {
            entry_form: EntryForm::new(EntryFormTarget::EditOpen),
            focus_tracked_on_load: true,
            help_scroll: 0,
            inactive_tasks: SelectableList::default(),
            last_view: View::TaskList,
            log_entries: SelectableList::default(),
            min_log_secs,
            move_request: None,
            move_targets: SelectableList::default(),
            should_quit: false,
            status: None,
            task_form: TaskForm::create(),
            tasks: SelectableList::default(),
            tracking: TrackingState::Idle,
            view: View::TaskList,
            view_before_resize: View::TaskList,
        }
    }

    pub fn set_info(&mut self, text: impl Into<String>) {
        self.set_status(StatusKind::Info, text.into());
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.set_status(StatusKind::Error, text.into());
    }

    /// Ages the status message by one key press, dropping it when expired.
    pub fn tick_status(&mut self) {
        if let Some(status) = &mut self.status {
            status.remaining = status.remaining.saturating_sub(1);
            if status.remaining == 0 {
                self.status = None;
            }
        }
    }

    /// Returns the task being tracked, looked up in the active list.
    pub fn tracked_task(&self) -> Option<&Task> {
        let task_id = self.tracking.session()?.task_id;

        self.tasks.items().iter().find(|task| task.id == task_id)
    }

    fn set_status(&mut self, kind: StatusKind, text: String) {
        self.status = Some(StatusMessage {
            kind,
            remaining: STATUS_MESSAGE_TTL,
            text,
        });
    }
}
