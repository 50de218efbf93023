//! Logging infrastructure for structured console and file output.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;
#[cfg(test)]
pub use types::RecordingLog;
pub use types::Log;
