pub mod handler;
pub mod rubric;
pub mod task;
