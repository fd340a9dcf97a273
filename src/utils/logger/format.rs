//!
//! format.rs
//!
//! Line formatting for the keymap's diagnostics.
//!

use alloc::string::String;
use core::fmt::Write;

use super::{levels::LogLevel, traits::log_formatter::LogFormatter};

/// Formats lines as `[Level] prefix: message`, each part optional.
pub struct DefaultFormatter {
	show_level: bool,
	prefix: Option<&'static str>
}

impl DefaultFormatter {
	pub const fn new(show_level: bool) -> Self {
		Self {
			show_level,
			prefix: None
		}
	}

	/// Tags every line, e.g. with the adapter's name when several devices
	/// share one debug channel.
	pub const fn with_prefix(mut self, prefix: &'static str) -> Self {
		self.prefix = Some(prefix);
		self
	}
}

impl LogFormatter for DefaultFormatter {
	fn format(&self, level: LogLevel, message: &str) -> String {
		let mut line = String::with_capacity(message.len() + 16);
		if self.show_level {
			// writing into a String cannot fail
			let _ = write!(line, "[{:?}] ", level);
		}
		if let Some(prefix) = self.prefix {
			line.push_str(prefix);
			line.push_str(": ");
		}
		line.push_str(message);
		line
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn prefixes_level() {
		assert_eq!(DefaultFormatter::new(true).format(LogLevel::Warn, "x"), "[Warn] x");
		assert_eq!(DefaultFormatter::new(false).format(LogLevel::Warn, "x"), "x");
	}

	#[test]
	fn prefixes_device_tag() {
		let formatter = DefaultFormatter::new(true).with_prefix("mbc555");
		assert_eq!(formatter.format(LogLevel::Debug, "0x7f unmapped"), "[Debug] mbc555: 0x7f unmapped");
	}
}
