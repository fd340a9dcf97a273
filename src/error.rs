//! error.rs
//!
//! Error handling for keymap construction and lookups.

use alloc::{string::String, vec::Vec};

use thiserror::Error;

use crate::keymap::key::{ModifierState, OutputCode, RawScanCode, SemanticKey};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Problems found while reading a keymap definition document.
pub enum SyntaxError {
	#[error("unknown section [{0}]")]
	UnknownSection(String),
	#[error("unknown setting `{0}`")]
	UnknownSetting(String),
	#[error("property outside of any section")]
	NoSection,
	#[error("malformed line `{0}`")]
	MalformedLine(String),
	#[error("invalid code `{0}`")]
	InvalidCode(String),
	#[error("invalid key name `{0}`")]
	InvalidKeyName(String),
	#[error("invalid modifier `{0}`")]
	InvalidModifier(String),
	#[error("invalid tag `{0}`")]
	InvalidTag(String),
	#[error("invalid value `{0}`")]
	InvalidValue(String)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// An enum representing every failure the keymap can report.
pub enum KeymapError {
	/// --- Input Errors --- ///
	#[error("raw scan code {0:#04x} is outside the legal range 0x00-0x7f")]
	OutOfRange(u8),
	#[error("{key} is not a candidate for scan code {raw}")]
	NotACandidate { raw: RawScanCode, key: SemanticKey },

	/// --- Definition Errors --- ///
	#[error("line {line}: {kind}")]
	Syntax { line: usize, kind: SyntaxError },
	#[error("keymap definition has no version")]
	MissingVersion,
	#[error("unsupported keymap version {found} (expected {expected})")]
	UnsupportedVersion { found: u32, expected: u32 },

	/// --- Validation Errors --- ///
	#[error("required scan code {0} has no entry")]
	MissingRequired(RawScanCode),
	#[error("scan code {raw} is documented as {candidates:?} and no ambiguity policy accepts it")]
	AmbiguousCode { raw: RawScanCode, candidates: Vec<SemanticKey> },
	#[error("primary meaning {key} for scan code {raw} is not one of its candidates")]
	InvalidPrimary { raw: RawScanCode, key: SemanticKey },
	#[error("ambiguity policy for scan code {0} but the code has a single meaning")]
	StalePolicy(RawScanCode),
	#[error("more than one ambiguity policy for scan code {0}")]
	ConflictingPolicy(RawScanCode),
	#[error("conflicting {modifier} entries for {key}")]
	ConflictingEntry { modifier: ModifierState, key: SemanticKey },
	#[error("{modifier} entry for {key} is unreachable from any scan code")]
	UnreachableEntry { modifier: ModifierState, key: SemanticKey },
	#[error("ctrl entry for {key} is {code}, expected the standard control code {expected}")]
	NonStandardControlCode { key: SemanticKey, code: OutputCode, expected: OutputCode },
	#[error("alias for {modifier} {key} documents {documented} but the overlay has {actual:?}")]
	AliasMismatch {
		modifier: ModifierState,
		key: SemanticKey,
		documented: OutputCode,
		actual: Option<OutputCode>
	},
	#[error("alias for {modifier} scan code {raw} does not name a single mapped key")]
	UnresolvableAlias { raw: RawScanCode, modifier: ModifierState },
	#[error("more than one alias for {modifier} scan code {raw}")]
	ConflictingAlias { raw: RawScanCode, modifier: ModifierState },

	/// --- Lifecycle Errors --- ///
	#[error("keymap has not been initialized")]
	NotInitialized
}

impl KeymapError {
	pub(crate) fn syntax(line: usize, kind: SyntaxError) -> Self {
		Self::Syntax { line, kind }
	}
}
