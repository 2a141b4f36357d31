//! View-specific key handling. Each handler mutates the model and returns the
//! storage commands the key press issues.

pub(crate) mod entry_form;
pub(crate) mod help;
pub(crate) mod inactive_tasks;
pub(crate) mod insufficient_size;
pub(crate) mod list;
pub(crate) mod move_target;
pub(crate) mod task_form;
pub(crate) mod task_list;
pub(crate) mod task_log;
