//!
//! logger_sink.rs
//!
//! Trait definition for all types that are a sink.
//!

use crate::utils::logger::levels::LogLevel;

/// Trait representing all functions that a logging sink will need to implement.
///
/// Sinks are shared by every translator in the process, so they must be
/// safe to call from several event-processing contexts at once.
pub trait LoggerSink: Send + Sync {
	/// Log a message of a certain level.
	fn log(&self, message: &str, level: LogLevel);
}
