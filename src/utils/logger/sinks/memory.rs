//!
//! memory.rs
//!
//! A bounded in-memory sink. Firmware drains it over its debug channel;
//! tests read it back directly.
//!

use alloc::{boxed::Box, collections::VecDeque, string::String, vec::Vec};

use spin::Mutex;

use crate::utils::logger::{
	levels::LogLevel,
	traits::{log_formatter::LogFormatter, logger_sink::LoggerSink}
};

pub struct MemorySink {
	/// The formatting strategy used.
	pub formatter: Box<dyn LogFormatter>,
	lines: Mutex<VecDeque<String>>,
	capacity: usize,
	min_level: LogLevel
}

impl MemorySink {
	/// Creates a new `MemorySink` keeping at most `capacity` lines.
	pub fn new(formatter: Box<dyn LogFormatter>, capacity: usize) -> Self {
		Self {
			formatter,
			lines: Mutex::new(VecDeque::with_capacity(capacity)),
			capacity,
			min_level: LogLevel::Debug
		}
	}

	/// Drops messages below `level`.
	pub fn with_min_level(mut self, level: LogLevel) -> Self {
		self.min_level = level;
		self
	}

	/// Returns a copy of the buffered lines, oldest first.
	pub fn lines(&self) -> Vec<String> {
		self.lines.lock().iter().cloned().collect()
	}

	/// Removes and returns the buffered lines, oldest first.
	pub fn drain(&self) -> Vec<String> {
		self.lines.lock().drain(..).collect()
	}
}

impl LoggerSink for MemorySink {
	fn log(&self, message: &str, level: LogLevel) {
		if level < self.min_level || self.capacity == 0 {
			return;
		}
		let formatted_message = self.formatter.format(level, message);
		let mut lines = self.lines.lock();
		if lines.len() == self.capacity {
			lines.pop_front();
		}
		lines.push_back(formatted_message);
	}
}
