pub mod log_formatter;
pub mod logger_sink;
