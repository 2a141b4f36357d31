pub mod clock;
pub mod input;
pub mod period;
pub mod task;
pub mod timestamp;
