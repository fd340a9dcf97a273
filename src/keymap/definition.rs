//!
//! definition.rs
//!
//! The typed form of a keymap definition document, before validation.
//!
//! The built-in MBC-55x tables live in `tables/mbc55x.ini` and are embedded
//! at compile time. Every table the translator uses comes from one document
//! so it can be reviewed, versioned and validated as a unit.
//!

use alloc::{
	string::{String, ToString},
	vec::Vec
};

use crate::{
	config::{
		TranslatorConfig,
		ini_parser::{IniProperty, IniSection, parse_ini}
	},
	error::{KeymapError, SyntaxError},
	keymap::{
		alias::AliasStatus,
		key::{Mapping, ModifierState, OutputCode, RawScanCode, SemanticKey}
	}
};

/// The only definition format this crate understands.
pub const FORMAT_VERSION: u32 = 1;

/// Source of the built-in Sanyo MBC-550/555 tables.
pub const MBC55X_TABLES: &str = include_str!("tables/mbc55x.ini");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRow {
	pub raw: RawScanCode,
	pub key: SemanticKey,
	pub line: usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How an integrator accepted a raw code with several documented meanings.
pub enum AmbiguityPolicy {
	/// Keep the code ambiguous; callers must supply the physical key.
	Defer,
	/// Treat one candidate as the meaning of the code.
	Primary(SemanticKey)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguityRow {
	pub raw: RawScanCode,
	pub policy: AmbiguityPolicy,
	pub line: usize
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayRow {
	pub key: SemanticKey,
	pub mapping: Mapping,
	pub line: usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What an alias row applies to.
pub enum AliasTarget {
	Raw(RawScanCode),
	/// Every raw code whose case-folded key is this one.
	Key(SemanticKey)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRow {
	pub modifier: ModifierState,
	pub target: AliasTarget,
	pub documented: OutputCode,
	pub corrected: OutputCode,
	pub status: AliasStatus,
	pub line: usize
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeymapDefinition {
	pub name: String,
	pub version: u32,
	pub config: TranslatorConfig,
	pub scan: Vec<ScanRow>,
	pub ambiguities: Vec<AmbiguityRow>,
	pub ctrl: Vec<OverlayRow>,
	pub graph: Vec<OverlayRow>,
	pub aliases: Vec<AliasRow>
}

impl KeymapDefinition {
	/// Parses the embedded MBC-55x definition.
	pub fn builtin() -> Result<Self, KeymapError> {
		Self::parse(MBC55X_TABLES)
	}

	/// Parses a definition document. Only syntax and the format version are
	/// checked here; table consistency is checked by
	/// [`Keymap::from_definition`](crate::keymap::Keymap::from_definition).
	pub fn parse(source: &str) -> Result<Self, KeymapError> {
		let ini = parse_ini(source)?;

		let mut name = String::new();
		let mut version = None;
		let mut config = TranslatorConfig::default();
		let mut scan = Vec::new();
		let mut ambiguities = Vec::new();
		let mut ctrl = Vec::new();
		let mut graph = Vec::new();
		let mut aliases = Vec::new();

		for section in &ini.sections {
			match section.name {
				"keymap" => {
					for prop in &section.properties {
						match prop.key {
							"name" => name = prop.value.to_string(),
							"version" => {
								version = Some(prop.value.parse::<u32>().map_err(|_| {
									KeymapError::syntax(prop.line, SyntaxError::InvalidValue(prop.value.into()))
								})?)
							}
							other => {
								return Err(KeymapError::syntax(
									prop.line,
									SyntaxError::UnknownSetting(other.into())
								));
							}
						}
					}
				}
				"translator" => config = config.apply_section(section)?,
				"scan" => parse_scan(section, &mut scan)?,
				"ambiguity" => {
					for prop in &section.properties {
						ambiguities.push(parse_ambiguity(prop)?);
					}
				}
				"ctrl" => parse_overlay(section, &mut ctrl)?,
				"graph" => parse_overlay(section, &mut graph)?,
				"alias" => {
					for prop in &section.properties {
						aliases.push(parse_alias(prop)?);
					}
				}
				other => {
					return Err(KeymapError::syntax(
						section.line,
						SyntaxError::UnknownSection(other.into())
					));
				}
			}
		}

		let version = version.ok_or(KeymapError::MissingVersion)?;
		if version != FORMAT_VERSION {
			return Err(KeymapError::UnsupportedVersion {
				found: version,
				expected: FORMAT_VERSION
			});
		}

		Ok(Self {
			name,
			version,
			config,
			scan,
			ambiguities,
			ctrl,
			graph,
			aliases
		})
	}

	/// Overlay rows for a modifier. The unshifted layer is derived from the
	/// scan rows and has none of its own.
	pub fn overlay_rows(&self, modifier: ModifierState) -> &[OverlayRow] {
		match modifier {
			ModifierState::Unshifted => &[],
			ModifierState::Ctrl => &self.ctrl,
			ModifierState::Graph => &self.graph
		}
	}
}

/// Codes are written the way they print: `0x` and two hex digits.
fn parse_code(text: &str) -> Option<u8> {
	let digits = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))?;
	if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
		return None;
	}
	u8::from_str_radix(digits, 16).ok()
}

fn parse_output(text: &str, line: usize) -> Result<OutputCode, KeymapError> {
	parse_code(text)
		.map(OutputCode)
		.ok_or_else(|| KeymapError::syntax(line, SyntaxError::InvalidCode(text.into())))
}

fn parse_raw(text: &str, line: usize) -> Result<RawScanCode, KeymapError> {
	parse_code(text)
		.and_then(RawScanCode::new)
		.ok_or_else(|| KeymapError::syntax(line, SyntaxError::InvalidCode(text.into())))
}

fn parse_key(text: &str, line: usize) -> Result<SemanticKey, KeymapError> {
	text.parse().map_err(|e| KeymapError::syntax(line, e))
}

fn parse_scan(section: &IniSection<'_>, rows: &mut Vec<ScanRow>) -> Result<(), KeymapError> {
	for prop in &section.properties {
		let line = prop.line;
		if let Some((lo, hi)) = prop.key.split_once("..=") {
			if prop.value != "printable" {
				return Err(KeymapError::syntax(line, SyntaxError::InvalidValue(prop.value.into())));
			}
			let (lo, hi) = (parse_raw(lo.trim(), line)?, parse_raw(hi.trim(), line)?);
			for byte in lo.value()..=hi.value() {
				let key = SemanticKey::printable(byte)
					.ok_or_else(|| KeymapError::syntax(line, SyntaxError::InvalidValue(prop.key.into())))?;
				// printable codes are below 0x7f, so this cannot fail
				if let Some(raw) = RawScanCode::new(byte) {
					rows.push(ScanRow {
						raw,
						key,
						line
					});
				}
			}
		} else {
			rows.push(ScanRow {
				raw: parse_raw(prop.key, line)?,
				key: parse_key(prop.value, line)?,
				line
			});
		}
	}
	Ok(())
}

fn parse_ambiguity(prop: &IniProperty<'_>) -> Result<AmbiguityRow, KeymapError> {
	let raw = parse_raw(prop.key, prop.line)?;
	let mut words = prop.value.split_whitespace();
	let policy = match (words.next(), words.next(), words.next()) {
		(Some("defer"), None, None) => AmbiguityPolicy::Defer,
		(Some("primary"), Some(key), None) => AmbiguityPolicy::Primary(parse_key(key, prop.line)?),
		_ => return Err(KeymapError::syntax(prop.line, SyntaxError::InvalidValue(prop.value.into())))
	};
	Ok(AmbiguityRow {
		raw,
		policy,
		line: prop.line
	})
}

fn parse_overlay(section: &IniSection<'_>, rows: &mut Vec<OverlayRow>) -> Result<(), KeymapError> {
	for prop in &section.properties {
		let line = prop.line;
		let key = parse_key(prop.key, line)?;
		let mut words = prop.value.split_whitespace();
		let mapping = match (words.next(), words.next(), words.next()) {
			(Some("placeholder"), None, None) => Mapping::Placeholder,
			(Some(code), None, None) | (Some(code), Some("documented"), None) => {
				Mapping::Documented(parse_output(code, line)?)
			}
			(Some(code), Some("verified"), None) => Mapping::Verified(parse_output(code, line)?),
			(Some(_), Some(tag), None) => {
				return Err(KeymapError::syntax(line, SyntaxError::InvalidTag(tag.into())));
			}
			_ => return Err(KeymapError::syntax(line, SyntaxError::InvalidValue(prop.value.into())))
		};
		rows.push(OverlayRow {
			key,
			mapping,
			line
		});
	}
	Ok(())
}

fn parse_alias(prop: &IniProperty<'_>) -> Result<AliasRow, KeymapError> {
	let line = prop.line;
	let (modifier, target) = prop
		.key
		.split_once(char::is_whitespace)
		.ok_or_else(|| KeymapError::syntax(line, SyntaxError::MalformedLine(prop.key.into())))?;
	let modifier = modifier
		.parse::<ModifierState>()
		.map_err(|e| KeymapError::syntax(line, e))?;
	let target = target.trim();
	let target = if target.starts_with("0x") {
		AliasTarget::Raw(parse_raw(target, line)?)
	} else {
		AliasTarget::Key(parse_key(target, line)?)
	};

	let mut words = prop.value.split_whitespace();
	let (documented, corrected, status) = match (words.next(), words.next(), words.next(), words.next()) {
		(Some(documented), Some("->"), Some(corrected), Some(status)) => {
			let status = match status {
				"verified" => AliasStatus::Verified,
				"unverified" => AliasStatus::Unverified,
				other => return Err(KeymapError::syntax(line, SyntaxError::InvalidTag(other.into())))
			};
			(parse_output(documented, line)?, parse_output(corrected, line)?, status)
		}
		_ => return Err(KeymapError::syntax(line, SyntaxError::InvalidValue(prop.value.into())))
	};
	if words.next().is_some() {
		return Err(KeymapError::syntax(line, SyntaxError::InvalidValue(prop.value.into())));
	}

	Ok(AliasRow {
		modifier,
		target,
		documented,
		corrected,
		status,
		line
	})
}
