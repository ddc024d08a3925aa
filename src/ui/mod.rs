//! Terminal observers for organize runs

mod json;
mod progress;

pub use json::spawn_json_printer;
pub use progress::{format_progress, ProgressReporter};
