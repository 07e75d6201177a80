//! State module for tracking crawl progress
//!
//! - `TaskState`: where a single (address, depth) crawl task is in its lifecycle

mod task_state;

pub use task_state::TaskState;
