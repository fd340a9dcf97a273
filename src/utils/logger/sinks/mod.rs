//!
//! src/utils/logger/sinks/mod.rs
//!
//! All sink definitions for the logging framework
//!

pub mod memory;

use alloc::boxed::Box;

use lazy_static::lazy_static;

use crate::utils::logger::{format::DefaultFormatter, sinks::memory::MemorySink};

/// Lines kept by [`MEMORY_SINK`] before the oldest are dropped.
pub const MEMORY_SINK_CAPACITY: usize = 256;

lazy_static! {
	/// Static reference to the in-memory sink
	pub static ref MEMORY_SINK: MemorySink =
		MemorySink::new(Box::new(DefaultFormatter::new(true)), MEMORY_SINK_CAPACITY);
}
