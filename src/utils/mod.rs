pub mod errors;
pub mod time;

pub use errors::{AppError, Result};
pub use time::{format_time, parse_time_label};
