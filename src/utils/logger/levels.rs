//!
//! levels.rs
//!
//! Definitions for the different types of Logging Levels.
//!

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
/// Enum representing all supported log levels, least severe first.
pub enum LogLevel {
	/// Per-lookup detail, such as an unmapped scan code
	Debug,
	/// Information
	Info,
	/// Warnings
	Warn,
	/// Errors
	Error
}
