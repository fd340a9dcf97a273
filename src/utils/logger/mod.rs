//!
//! src/utils/logger/mod.rs
//!
//! Module definition for the diagnostics logging framework.
//!
//! Nothing is logged until a sink is installed with [`install`]. The sink is
//! set once for the life of the process.
//!

pub mod format;
pub mod levels;
pub mod sinks;
pub mod traits;

use alloc::fmt;

use conquer_once::spin::OnceCell;

use self::{levels::LogLevel, traits::logger_sink::LoggerSink};

static SINK: OnceCell<&'static dyn LoggerSink> = OnceCell::uninit();

/// Installs the process-wide sink. Returns `false` if one was already set.
pub fn install(sink: &'static dyn LoggerSink) -> bool {
	SINK.try_init_once(|| sink).is_ok()
}

/// Returns `true` once a sink has been installed.
pub fn is_installed() -> bool {
	SINK.is_initialized()
}

#[doc(hidden)]
pub fn log(level: LogLevel, args: fmt::Arguments<'_>) {
	if let Ok(sink) = SINK.try_get() {
		sink.log(&fmt::format(args), level);
	}
}

#[macro_export]
macro_rules! log_debug {
	($($arg:tt)*) => {
		$crate::utils::logger::log($crate::utils::logger::levels::LogLevel::Debug, format_args!($($arg)*))
	};
}

#[macro_export]
macro_rules! log_info {
	($($arg:tt)*) => {
		$crate::utils::logger::log($crate::utils::logger::levels::LogLevel::Info, format_args!($($arg)*))
	};
}

#[macro_export]
macro_rules! log_warn {
	($($arg:tt)*) => {
		$crate::utils::logger::log($crate::utils::logger::levels::LogLevel::Warn, format_args!($($arg)*))
	};
}
