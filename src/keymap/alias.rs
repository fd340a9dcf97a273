//!
//! alias.rs
//!
//! Corrections for documented codes that disagree with what the hardware
//! actually produces.
//!
//! Corrections are pure data. Only verified ones change output; unverified
//! ones are kept so diagnostics can report them.
//!

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::{
	error::KeymapError,
	keymap::{
		definition::{AliasRow, AliasTarget},
		key::{ModifierState, OutputCode, RawScanCode},
		layout::Overlays,
		scancode::{Lookup, ScanTable}
	},
	log_info,
	log_warn
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasStatus {
	/// Confirmed on hardware; applied automatically.
	Verified,
	/// Suspected only; never changes output.
	Unverified
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasCorrection {
	pub raw: RawScanCode,
	pub modifier: ModifierState,
	/// The code the documentation gives for this key.
	pub documented: OutputCode,
	/// The code the hardware is observed to produce.
	pub corrected: OutputCode,
	pub status: AliasStatus
}

impl AliasCorrection {
	pub const fn is_verified(&self) -> bool {
		matches!(self.status, AliasStatus::Verified)
	}
}

#[derive(Debug, Default)]
pub struct AliasResolver {
	corrections: HashMap<(RawScanCode, ModifierState), AliasCorrection>
}

impl AliasResolver {
	/// Expands alias rows into per-(raw, modifier) corrections and checks
	/// each one against the overlay it corrects.
	pub fn build(rows: &[AliasRow], scan: &ScanTable, overlays: &Overlays) -> Result<Self, KeymapError> {
		let mut corrections = HashMap::new();

		for row in rows {
			let targets: Vec<RawScanCode> = match row.target {
				AliasTarget::Raw(raw) => vec![raw],
				AliasTarget::Key(key) => {
					let fold_case = row.modifier != ModifierState::Unshifted;
					let raws: Vec<_> = scan.raw_codes_for(key, fold_case).collect();
					if raws.is_empty() {
						return Err(KeymapError::UnreachableEntry {
							modifier: row.modifier,
							key
						});
					}
					raws
				}
			};

			for raw in targets {
				let key = match scan.lookup(raw) {
					Lookup::Key(key) => key,
					Lookup::Ambiguous(_) | Lookup::Unknown => {
						return Err(KeymapError::UnresolvableAlias {
							raw,
							modifier: row.modifier
						});
					}
				};
				let actual = overlays.mapping(row.modifier, raw, key).and_then(|m| m.code());
				if actual != Some(row.documented) {
					return Err(KeymapError::AliasMismatch {
						modifier: row.modifier,
						key,
						documented: row.documented,
						actual
					});
				}

				let correction = AliasCorrection {
					raw,
					modifier: row.modifier,
					documented: row.documented,
					corrected: row.corrected,
					status: row.status
				};
				if corrections.insert((raw, row.modifier), correction).is_some() {
					return Err(KeymapError::ConflictingAlias {
						raw,
						modifier: row.modifier
					});
				}
				if !correction.is_verified() {
					log_info!(
						"keymap: unverified alias {} {} ({}): {} may really be {}",
						row.modifier,
						key,
						raw,
						row.documented,
						row.corrected
					);
				}
			}
		}

		Ok(Self {
			corrections
		})
	}

	/// The correction registered for this exact pair, verified or not.
	pub fn correction(&self, raw: RawScanCode, modifier: ModifierState) -> Option<&AliasCorrection> {
		self.corrections.get(&(raw, modifier))
	}

	/// Returns the verified correction that applies to `candidate`, if any.
	///
	/// A correction only applies when the candidate is the byte it was
	/// written against.
	pub fn apply(
		&self,
		raw: RawScanCode,
		modifier: ModifierState,
		candidate: OutputCode
	) -> Option<&AliasCorrection> {
		let correction = self.correction(raw, modifier).filter(|c| c.is_verified())?;
		if correction.documented != candidate {
			log_warn!(
				"alias: {} {} documents {} but candidate is {}; not applied",
				modifier,
				raw,
				correction.documented,
				candidate
			);
			return None;
		}
		Some(correction)
	}

	/// Final code for `candidate` after verified corrections.
	pub fn resolve(&self, raw: RawScanCode, modifier: ModifierState, candidate: OutputCode) -> OutputCode {
		self.apply(raw, modifier, candidate)
			.map_or(candidate, |c| c.corrected)
	}

	/// All corrections, ordered by modifier then raw code.
	pub fn corrections(&self) -> Vec<&AliasCorrection> {
		let mut all: Vec<_> = self.corrections.values().collect();
		all.sort_by_key(|c| (c.modifier, c.raw));
		all
	}

	/// Corrections kept only as diagnostic metadata.
	pub fn unverified(&self) -> Vec<&AliasCorrection> {
		let mut all = self.corrections();
		all.retain(|c| !c.is_verified());
		all
	}

	pub fn len(&self) -> usize {
		self.corrections.len()
	}

	pub fn is_empty(&self) -> bool {
		self.corrections.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::keymap::{Keymap, definition::KeymapDefinition};

	fn raw(byte: u8) -> RawScanCode {
		RawScanCode::new(byte).unwrap()
	}

	#[test]
	fn key_aliases_expand_to_both_cases() {
		let keymap = Keymap::builtin().unwrap();
		let aliases = keymap.aliases();
		assert_eq!(aliases.len(), 6);
		for byte in [b'S', b's'] {
			let correction = aliases.correction(raw(byte), ModifierState::Ctrl).unwrap();
			assert_eq!(correction.documented, OutputCode(0x13));
			assert_eq!(correction.corrected, OutputCode(0x0D));
			assert!(correction.is_verified());
		}
		assert_eq!(aliases.unverified().len(), 4);
	}

	#[test]
	fn only_verified_corrections_change_output() {
		let keymap = Keymap::builtin().unwrap();
		let aliases = keymap.aliases();
		let ctrl = ModifierState::Ctrl;
		assert_eq!(aliases.resolve(raw(b'S'), ctrl, OutputCode(0x13)), OutputCode(0x0D));
		assert_eq!(aliases.resolve(raw(b'G'), ctrl, OutputCode(0x07)), OutputCode(0x07));
		assert_eq!(aliases.resolve(raw(b'K'), ctrl, OutputCode(0x0B)), OutputCode(0x0B));
		// stale candidate
		assert_eq!(aliases.resolve(raw(b'S'), ctrl, OutputCode(0x55)), OutputCode(0x55));
		assert_eq!(aliases.resolve(raw(b'S'), ModifierState::Unshifted, OutputCode(b'S')), OutputCode(b'S'));
	}

	#[test]
	fn alias_must_match_overlay() {
		let mut def = KeymapDefinition::builtin().unwrap();
		def.aliases[2].documented = OutputCode(0x14);
		assert_eq!(
			Keymap::from_definition(&def).unwrap_err(),
			KeymapError::AliasMismatch {
				modifier: ModifierState::Ctrl,
				key: crate::keymap::key::SemanticKey::Char(b'S'),
				documented: OutputCode(0x14),
				actual: Some(OutputCode(0x13))
			}
		);
	}

	#[test]
	fn duplicate_alias_pairs_are_rejected() {
		let mut def = KeymapDefinition::builtin().unwrap();
		let mut row = def.aliases[2].clone();
		row.target = AliasTarget::Raw(raw(b's'));
		def.aliases.push(row);
		assert_eq!(
			Keymap::from_definition(&def).unwrap_err(),
			KeymapError::ConflictingAlias {
				raw: raw(b's'),
				modifier: ModifierState::Ctrl
			}
		);
	}
}
