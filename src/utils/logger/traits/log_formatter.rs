use alloc::string::String;

use crate::utils::logger::levels::LogLevel;

/// Turns a message into the line a sink stores.
pub trait LogFormatter: Send + Sync {
	fn format(&self, level: LogLevel, message: &str) -> String;
}
