//!
//! translate.rs
//!
//! The translation pipeline: scan table, then the overlay for the active
//! modifier, then verified alias corrections.
//!

use core::fmt;

use crate::{
	config::TranslatorConfig,
	error::KeymapError,
	keymap::{
		Keymap,
		key::{Mapping, ModifierState, OutputCode, Provenance, RawScanCode, SemanticKey},
		scancode::Lookup
	},
	log_debug
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Whether a [`Translation`] may be emitted to the host.
pub enum Validity {
	Valid,
	/// No slot exists for this raw code under this modifier.
	Unmapped,
	/// A slot exists but its value has not been determined.
	Placeholder,
	/// The raw code has several documented meanings and none was chosen.
	Ambiguous
}

impl Validity {
	pub const fn is_valid(self) -> bool {
		matches!(self, Validity::Valid)
	}
}

impl fmt::Display for Validity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let text = match self {
			Validity::Valid => "valid",
			Validity::Unmapped => "unmapped",
			Validity::Placeholder => "placeholder",
			Validity::Ambiguous => "ambiguous"
		};
		f.write_str(text)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The result of translating one key event.
///
/// Only a valid translation carries an output code, so a caller cannot emit
/// an unmapped or placeholder slot by accident.
pub struct Translation {
	raw: RawScanCode,
	modifier: ModifierState,
	key: Option<SemanticKey>,
	code: Option<OutputCode>,
	provenance: Option<Provenance>,
	documented: Option<OutputCode>,
	validity: Validity
}

impl Translation {
	fn invalid(raw: RawScanCode, modifier: ModifierState, key: Option<SemanticKey>, validity: Validity) -> Self {
		Self {
			raw,
			modifier,
			key,
			code: None,
			provenance: (validity == Validity::Placeholder).then_some(Provenance::Placeholder),
			documented: None,
			validity
		}
	}

	pub const fn raw(&self) -> RawScanCode {
		self.raw
	}

	pub const fn modifier(&self) -> ModifierState {
		self.modifier
	}

	/// The semantic key the raw code resolved to, if it resolved to one.
	pub const fn key(&self) -> Option<SemanticKey> {
		self.key
	}

	/// The code to emit. `None` unless the translation is valid.
	pub const fn code(&self) -> Option<OutputCode> {
		self.code
	}

	pub const fn validity(&self) -> Validity {
		self.validity
	}

	pub const fn is_valid(&self) -> bool {
		self.validity.is_valid()
	}

	pub const fn provenance(&self) -> Option<Provenance> {
		self.provenance
	}

	/// The documented code that a verified alias correction replaced.
	pub const fn documented_code(&self) -> Option<OutputCode> {
		self.documented
	}

	/// `(code, validity)` as handed to the transport.
	pub const fn as_pair(&self) -> (Option<OutputCode>, Validity) {
		(self.code, self.validity)
	}
}

#[derive(Debug, Clone, Copy)]
/// Translates key events against one immutable [`Keymap`].
///
/// Translators hold no state of their own, so any number of them may share
/// a keymap across threads.
pub struct Translator<'a> {
	keymap: &'a Keymap,
	config: TranslatorConfig
}

impl<'a> Translator<'a> {
	/// Creates a translator using the configuration from the keymap's
	/// definition.
	pub fn new(keymap: &'a Keymap) -> Self {
		Self::with_config(keymap, *keymap.config())
	}

	pub const fn with_config(keymap: &'a Keymap, config: TranslatorConfig) -> Self {
		Self {
			keymap,
			config
		}
	}

	pub const fn config(&self) -> &TranslatorConfig {
		&self.config
	}

	/// Translates one event. Never fails for a legal raw code; check
	/// [`Translation::validity`] before emitting.
	pub fn translate(&self, raw: RawScanCode, modifier: ModifierState) -> Translation {
		match self.keymap.scan_table().lookup(raw) {
			Lookup::Key(key) => self.translate_key(raw, modifier, key),
			Lookup::Ambiguous(record) => {
				if self.config.log_unmapped {
					log_debug!(
						"translate: {} {} is ambiguous between {:?}",
						modifier,
						raw,
						record.candidates
					);
				}
				Translation::invalid(raw, modifier, None, Validity::Ambiguous)
			}
			Lookup::Unknown => {
				if self.config.log_unmapped {
					log_debug!("translate: {} {} is not in the scan table", modifier, raw);
				}
				Translation::invalid(raw, modifier, None, Validity::Unmapped)
			}
		}
	}

	/// Like [`translate`](Self::translate) for a byte straight from the
	/// scanning layer. Bytes above `0x7F` are rejected.
	pub fn translate_byte(&self, byte: u8, modifier: ModifierState) -> Result<Translation, KeymapError> {
		Ok(self.translate(RawScanCode::try_from(byte)?, modifier))
	}

	/// Translates an event whose physical key the scanning layer has
	/// identified. `key` must be a documented meaning of `raw`.
	pub fn translate_disambiguated(
		&self,
		raw: RawScanCode,
		modifier: ModifierState,
		key: SemanticKey
	) -> Result<Translation, KeymapError> {
		let scan = self.keymap.scan_table();
		let known = match scan.ambiguity(raw) {
			Some(record) => record.is_candidate(key),
			None => scan.keys_at(raw).contains(&key)
		};
		if !known {
			return Err(KeymapError::NotACandidate {
				raw,
				key
			});
		}
		Ok(self.translate_key(raw, modifier, key))
	}

	fn translate_key(&self, raw: RawScanCode, modifier: ModifierState, key: SemanticKey) -> Translation {
		let mapping = match self.keymap.overlays().mapping(modifier, raw, key) {
			Some(Mapping::Placeholder) => {
				if self.config.log_unmapped {
					log_debug!("translate: {} {} ({}) is a placeholder", modifier, key, raw);
				}
				return Translation::invalid(raw, modifier, Some(key), Validity::Placeholder);
			}
			Some(mapping) => mapping,
			None => {
				if self.config.log_unmapped {
					log_debug!("translate: {} {} ({}) has no {} slot", modifier, key, raw, modifier);
				}
				return Translation::invalid(raw, modifier, Some(key), Validity::Unmapped);
			}
		};
		let Some(candidate) = mapping.code() else {
			return Translation::invalid(raw, modifier, Some(key), Validity::Placeholder);
		};

		let correction = if self.config.apply_aliases {
			self.keymap.aliases().apply(raw, modifier, candidate)
		} else {
			None
		};

		match correction {
			Some(correction) => Translation {
				raw,
				modifier,
				key: Some(key),
				code: Some(correction.corrected),
				provenance: Some(Provenance::Verified),
				documented: Some(candidate),
				validity: Validity::Valid
			},
			None => Translation {
				raw,
				modifier,
				key: Some(key),
				code: Some(candidate),
				provenance: Some(mapping.provenance()),
				documented: None,
				validity: Validity::Valid
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn raw(byte: u8) -> RawScanCode {
		RawScanCode::new(byte).unwrap()
	}

	#[test]
	fn pass_through_control_codes() {
		let keymap = Keymap::builtin().unwrap();
		let translator = keymap.translator();
		let scroll = translator.translate(raw(0x03), ModifierState::Unshifted);
		assert_eq!(scroll.as_pair(), (Some(OutputCode(0x03)), Validity::Valid));
		assert_eq!(scroll.key(), Some(SemanticKey::ScrollLock));
		let escape = translator.translate(raw(0x1B), ModifierState::Unshifted);
		assert_eq!(escape.as_pair(), (Some(OutputCode(0x1B)), Validity::Valid));
	}

	#[test]
	fn verified_alias_replaces_documented_code() {
		let keymap = Keymap::builtin().unwrap();
		let on = Translator::with_config(&keymap, TranslatorConfig::default());
		let off = Translator::with_config(&keymap, TranslatorConfig::default().with_aliases(false));

		let corrected = on.translate(raw(b's'), ModifierState::Ctrl);
		assert_eq!(corrected.code(), Some(OutputCode(0x0D)));
		assert_eq!(corrected.documented_code(), Some(OutputCode(0x13)));
		assert_eq!(corrected.provenance(), Some(Provenance::Verified));

		let documented = off.translate(raw(b's'), ModifierState::Ctrl);
		assert_eq!(documented.code(), Some(OutputCode(0x13)));
		assert_eq!(documented.documented_code(), None);
		assert_eq!(documented.provenance(), Some(Provenance::Documented));
	}

	#[test]
	fn unverified_alias_leaves_output_alone() {
		let keymap = Keymap::builtin().unwrap();
		let translator = keymap.translator();
		assert_eq!(translator.translate(raw(b'G'), ModifierState::Ctrl).code(), Some(OutputCode(0x07)));
		assert_eq!(translator.translate(raw(b'k'), ModifierState::Ctrl).code(), Some(OutputCode(0x0B)));
	}

	#[test]
	fn invalid_translations_carry_no_code() {
		let keymap = Keymap::builtin().unwrap();
		let translator = keymap.translator();

		let placeholder = translator.translate(raw(b'b'), ModifierState::Graph);
		assert_eq!(placeholder.as_pair(), (None, Validity::Placeholder));
		assert_eq!(placeholder.provenance(), Some(Provenance::Placeholder));

		let no_slot = translator.translate(raw(b'7'), ModifierState::Graph);
		assert_eq!(no_slot.as_pair(), (None, Validity::Unmapped));
		assert_eq!(no_slot.key(), Some(SemanticKey::Char(b'7')));

		let unknown = translator.translate(raw(0x7F), ModifierState::Unshifted);
		assert_eq!(unknown.as_pair(), (None, Validity::Unmapped));
		assert_eq!(unknown.key(), None);

		let ambiguous = translator.translate(raw(0x07), ModifierState::Unshifted);
		assert_eq!(ambiguous.as_pair(), (None, Validity::Ambiguous));
	}

	#[test]
	fn disambiguated_translation() {
		let keymap = Keymap::builtin().unwrap();
		let translator = keymap.translator();
		let insert = translator
			.translate_disambiguated(raw(0x07), ModifierState::Unshifted, SemanticKey::Insert)
			.unwrap();
		assert_eq!(insert.as_pair(), (Some(OutputCode(0x07)), Validity::Valid));
		assert_eq!(insert.key(), Some(SemanticKey::Insert));
		assert_eq!(
			translator.translate_disambiguated(raw(0x07), ModifierState::Unshifted, SemanticKey::Home),
			Err(KeymapError::NotACandidate {
				raw: raw(0x07),
				key: SemanticKey::Home
			})
		);
		let end = translator
			.translate_disambiguated(raw(0x01), ModifierState::Ctrl, SemanticKey::End)
			.unwrap();
		assert_eq!(end.code(), Some(OutputCode(0x75)));
	}

	#[test]
	fn out_of_range_bytes_are_rejected() {
		let keymap = Keymap::builtin().unwrap();
		assert_eq!(
			keymap.translator().translate_byte(0x80, ModifierState::Unshifted),
			Err(KeymapError::OutOfRange(0x80))
		);
	}
}
