// Activities registered with the execution runtime

mod error;
pub mod model;
mod task;

pub use error::ActivityError;
pub use task::{RestTaskActivities, TaskActivities};
