//!
//! config/mod.rs
//!
//! Translator configuration, read from the `[translator]` section of a
//! keymap definition and overridable in code.
//!

pub mod ini_parser;

use crate::{
	config::ini_parser::IniSection,
	error::{KeymapError, SyntaxError}
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Runtime switches for a [`Translator`](crate::keymap::translate::Translator).
pub struct TranslatorConfig {
	/// Substitute verified alias corrections for documented codes.
	pub apply_aliases: bool,
	/// Report unmapped, placeholder and ambiguous lookups to the log sink.
	pub log_unmapped: bool
}

impl Default for TranslatorConfig {
	fn default() -> Self {
		Self {
			apply_aliases: true,
			log_unmapped: true
		}
	}
}

impl TranslatorConfig {
	pub const fn with_aliases(mut self, apply: bool) -> Self {
		self.apply_aliases = apply;
		self
	}

	pub const fn with_unmapped_logging(mut self, log: bool) -> Self {
		self.log_unmapped = log;
		self
	}

	/// Applies the settings of a `[translator]` section on top of `self`.
	pub(crate) fn apply_section(mut self, section: &IniSection<'_>) -> Result<Self, KeymapError> {
		for prop in &section.properties {
			let value = parse_bool(prop.value)
				.ok_or_else(|| KeymapError::syntax(prop.line, SyntaxError::InvalidValue(prop.value.into())))?;
			match prop.key {
				"apply_aliases" => self.apply_aliases = value,
				"log_unmapped" => self.log_unmapped = value,
				other => {
					return Err(KeymapError::syntax(
						prop.line,
						SyntaxError::UnknownSetting(other.into())
					));
				}
			}
		}
		Ok(self)
	}
}

fn parse_bool(value: &str) -> Option<bool> {
	match value {
		"true" | "yes" | "on" | "1" => Some(true),
		"false" | "no" | "off" | "0" => Some(false),
		_ => None
	}
}
