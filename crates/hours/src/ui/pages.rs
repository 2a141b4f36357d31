pub mod entry_form;
pub mod insufficient_size;
pub mod item_list;
pub mod log_details;
pub mod task_form;
