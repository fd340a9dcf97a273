//!
//! scancode.rs
//!
//! Base table from raw MBC-55x scan codes to semantic keys.
//!
//! The table is total over `0x00..=0x7F`: every code resolves to a key, an
//! accepted ambiguity, or `Unknown`.
//!

use alloc::vec::Vec;
use core::ops::RangeInclusive;

use crate::{
	error::KeymapError,
	keymap::{
		definition::{AmbiguityPolicy, AmbiguityRow, ScanRow},
		key::{RAW_CODE_COUNT, RawScanCode, SemanticKey}
	},
	log_debug,
	log_info
};

/// Raw codes the MBC-555 manual documents, followed by printable ASCII.
/// A definition that leaves any of these out is rejected.
pub const REQUIRED_RANGES: [RangeInclusive<u8>; 5] = [0x01..=0x05, 0x07..=0x0B, 0x0D..=0x0D, 0x10..=0x19, 0x1B..=0x7E];

#[derive(Debug, Clone, PartialEq, Eq)]
/// A raw code documented with more than one meaning, and how it was accepted.
pub struct AmbiguityRecord {
	pub raw: RawScanCode,
	/// Candidate meanings in definition order.
	pub candidates: Vec<SemanticKey>,
	pub policy: AmbiguityPolicy
}

impl AmbiguityRecord {
	pub fn is_candidate(&self, key: SemanticKey) -> bool {
		self.candidates.contains(&key)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
	Unknown,
	Key(SemanticKey),
	/// Index into `ScanTable::ambiguities`.
	Deferred(usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The outcome of a base table lookup.
pub enum Lookup<'a> {
	Key(SemanticKey),
	/// Several documented meanings and no designated primary.
	Ambiguous(&'a AmbiguityRecord),
	Unknown
}

#[derive(Debug)]
pub struct ScanTable {
	slots: [Slot; RAW_CODE_COUNT],
	ambiguities: Vec<AmbiguityRecord>
}

impl ScanTable {
	/// Builds the table, surfacing every collision as an [`AmbiguityRecord`].
	///
	/// A collision without a matching policy row fails the build, as does a
	/// policy row for a code that does not collide.
	pub fn build(rows: &[ScanRow], policies: &[AmbiguityRow]) -> Result<Self, KeymapError> {
		let mut grouped: Vec<Vec<SemanticKey>> = vec![Vec::new(); RAW_CODE_COUNT];
		for row in rows {
			let keys = &mut grouped[row.raw.index()];
			if keys.contains(&row.key) {
				log_debug!("keymap: line {}: repeated scan row {} = {}", row.line, row.raw, row.key);
			} else {
				keys.push(row.key);
			}
		}

		for (i, policy) in policies.iter().enumerate() {
			if policies[..i].iter().any(|p| p.raw == policy.raw) {
				return Err(KeymapError::ConflictingPolicy(policy.raw));
			}
			if grouped[policy.raw.index()].len() < 2 {
				return Err(KeymapError::StalePolicy(policy.raw));
			}
		}

		let mut slots = [Slot::Unknown; RAW_CODE_COUNT];
		let mut ambiguities = Vec::new();

		for raw in RawScanCode::all() {
			let keys = &grouped[raw.index()];
			slots[raw.index()] = match keys.as_slice() {
				[] => Slot::Unknown,
				[key] => Slot::Key(*key),
				candidates => {
					let policy = policies
						.iter()
						.find(|p| p.raw == raw)
						.map(|p| p.policy)
						.ok_or_else(|| KeymapError::AmbiguousCode {
							raw,
							candidates: candidates.to_vec()
						})?;
					let slot = match policy {
						AmbiguityPolicy::Defer => Slot::Deferred(ambiguities.len()),
						AmbiguityPolicy::Primary(key) if candidates.contains(&key) => Slot::Key(key),
						AmbiguityPolicy::Primary(key) => return Err(KeymapError::InvalidPrimary { raw, key })
					};
					log_info!("keymap: scan code {} is ambiguous between {:?}, {:?}", raw, candidates, policy);
					ambiguities.push(AmbiguityRecord {
						raw,
						candidates: candidates.to_vec(),
						policy
					});
					slot
				}
			};
		}

		for range in REQUIRED_RANGES {
			for raw in range.filter_map(RawScanCode::new) {
				if slots[raw.index()] == Slot::Unknown {
					return Err(KeymapError::MissingRequired(raw));
				}
			}
		}

		Ok(Self {
			slots,
			ambiguities
		})
	}

	pub fn lookup(&self, raw: RawScanCode) -> Lookup<'_> {
		match self.slots[raw.index()] {
			Slot::Unknown => Lookup::Unknown,
			Slot::Key(key) => Lookup::Key(key),
			Slot::Deferred(index) => Lookup::Ambiguous(&self.ambiguities[index])
		}
	}

	/// The collision record for `raw`, whether deferred or given a primary.
	pub fn ambiguity(&self, raw: RawScanCode) -> Option<&AmbiguityRecord> {
		self.ambiguities.iter().find(|a| a.raw == raw)
	}

	/// Every accepted collision, in raw code order.
	pub fn ambiguities(&self) -> &[AmbiguityRecord] {
		&self.ambiguities
	}

	/// Every key `raw` may stand for: its resolved key, or all candidates of
	/// a deferred ambiguity.
	pub fn keys_at(&self, raw: RawScanCode) -> &[SemanticKey] {
		match &self.slots[raw.index()] {
			Slot::Unknown => &[],
			Slot::Key(key) => core::slice::from_ref(key),
			Slot::Deferred(index) => &self.ambiguities[*index].candidates
		}
	}

	/// Raw codes that resolve directly to `key`, optionally ignoring letter
	/// case.
	pub fn raw_codes_for(&self, key: SemanticKey, fold_case: bool) -> impl Iterator<Item = RawScanCode> + '_ {
		RawScanCode::all().filter(move |raw| match self.slots[raw.index()] {
			Slot::Key(k) if fold_case => k.fold_case() == key.fold_case(),
			Slot::Key(k) => k == key,
			_ => false
		})
	}

	/// Whether some raw code can produce `key`, including ambiguity
	/// candidates. Letter case is ignored.
	pub fn is_reachable(&self, key: SemanticKey) -> bool {
		let key = key.fold_case();
		RawScanCode::all().any(|raw| self.keys_at(raw).iter().any(|k| k.fold_case() == key))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::keymap::definition::KeymapDefinition;

	fn raw(byte: u8) -> RawScanCode {
		RawScanCode::new(byte).unwrap()
	}

	fn builtin() -> ScanTable {
		let def = KeymapDefinition::builtin().unwrap();
		ScanTable::build(&def.scan, &def.ambiguities).unwrap()
	}

	#[test]
	fn documented_codes_resolve() {
		let table = builtin();
		assert_eq!(table.lookup(raw(0x01)), Lookup::Key(SemanticKey::End));
		assert_eq!(table.lookup(raw(0x03)), Lookup::Key(SemanticKey::ScrollLock));
		assert_eq!(table.lookup(raw(0x0A)), Lookup::Key(SemanticKey::KeypadEnter));
		assert_eq!(table.lookup(raw(0x10)), Lookup::Key(SemanticKey::Function(1)));
		assert_eq!(table.lookup(raw(0x19)), Lookup::Key(SemanticKey::Function(10)));
		assert_eq!(table.lookup(raw(0x1B)), Lookup::Key(SemanticKey::Escape));
		assert_eq!(table.lookup(raw(0x1F)), Lookup::Key(SemanticKey::CursorDown));
		assert_eq!(table.lookup(raw(b'q')), Lookup::Key(SemanticKey::Char(b'q')));
	}

	#[test]
	fn undocumented_codes_are_unknown() {
		let table = builtin();
		for byte in [0x00, 0x06, 0x0C, 0x0E, 0x0F, 0x1A, 0x7F] {
			assert_eq!(table.lookup(raw(byte)), Lookup::Unknown, "{byte:#04x}");
		}
	}

	#[test]
	fn insert_print_screen_delete_collision_is_recorded() {
		let table = builtin();
		let Lookup::Ambiguous(record) = table.lookup(raw(0x07)) else {
			panic!("0x07 should stay ambiguous");
		};
		assert_eq!(
			record.candidates,
			[SemanticKey::Insert, SemanticKey::PrintScreen, SemanticKey::Delete]
		);
		assert_eq!(record.policy, AmbiguityPolicy::Defer);
		assert_eq!(table.ambiguities().len(), 1);
		assert_eq!(table.keys_at(raw(0x07)).len(), 3);
	}

	#[test]
	fn collision_without_policy_fails() {
		let def = KeymapDefinition::builtin().unwrap();
		assert_eq!(
			ScanTable::build(&def.scan, &[]).unwrap_err(),
			KeymapError::AmbiguousCode {
				raw: raw(0x07),
				candidates: vec![SemanticKey::Insert, SemanticKey::PrintScreen, SemanticKey::Delete]
			}
		);
	}

	#[test]
	fn primary_policy_designates_one_meaning() {
		let def = KeymapDefinition::builtin().unwrap();
		let policy = [AmbiguityRow {
			raw: raw(0x07),
			policy: AmbiguityPolicy::Primary(SemanticKey::Delete),
			line: 0
		}];
		let table = ScanTable::build(&def.scan, &policy).unwrap();
		assert_eq!(table.lookup(raw(0x07)), Lookup::Key(SemanticKey::Delete));
		assert!(table.ambiguity(raw(0x07)).unwrap().is_candidate(SemanticKey::Insert));

		let policy = [AmbiguityRow {
			raw: raw(0x07),
			policy: AmbiguityPolicy::Primary(SemanticKey::Home),
			line: 0
		}];
		assert_eq!(
			ScanTable::build(&def.scan, &policy).unwrap_err(),
			KeymapError::InvalidPrimary {
				raw: raw(0x07),
				key: SemanticKey::Home
			}
		);
	}

	#[test]
	fn stale_and_duplicate_policies_fail() {
		let def = KeymapDefinition::builtin().unwrap();
		let stale = [
			def.ambiguities[0].clone(),
			AmbiguityRow {
				raw: raw(0x01),
				policy: AmbiguityPolicy::Defer,
				line: 0
			}
		];
		assert_eq!(ScanTable::build(&def.scan, &stale).unwrap_err(), KeymapError::StalePolicy(raw(0x01)));
		let twice = [def.ambiguities[0].clone(), def.ambiguities[0].clone()];
		assert_eq!(ScanTable::build(&def.scan, &twice).unwrap_err(), KeymapError::ConflictingPolicy(raw(0x07)));
	}

	#[test]
	fn missing_required_code_fails() {
		let def = KeymapDefinition::builtin().unwrap();
		let rows: Vec<_> = def.scan.iter().filter(|r| r.raw.value() != 0x0B).cloned().collect();
		assert_eq!(
			ScanTable::build(&rows, &def.ambiguities).unwrap_err(),
			KeymapError::MissingRequired(raw(0x0B))
		);
	}

	#[test]
	fn raw_codes_for_letters() {
		let table = builtin();
		let folded: Vec<_> = table.raw_codes_for(SemanticKey::Char(b'C'), true).collect();
		assert_eq!(folded, [raw(b'C'), raw(b'c')]);
		let exact: Vec<_> = table.raw_codes_for(SemanticKey::Char(b'c'), false).collect();
		assert_eq!(exact, [raw(b'c')]);
		assert!(table.is_reachable(SemanticKey::Delete));
		assert!(!table.is_reachable(SemanticKey::Char(0x7F)));
	}
}
