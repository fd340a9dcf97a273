//!
//! layout.rs
//!
//! Per-modifier overlays from semantic keys to output codes.
//!
//! The unshifted overlay is derived from the scan table: every key emits
//! the raw code it was reported with. The Ctrl and Graph overlays come from
//! their definition sections and ignore letter case.
//!

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::{
	error::KeymapError,
	keymap::{
		definition::{KeymapDefinition, OverlayRow},
		key::{Mapping, ModifierState, OutputCode, RawScanCode, SemanticKey},
		scancode::ScanTable
	},
	log_debug
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Several keys of one overlay producing the same output code.
pub struct OutputCollision {
	pub code: OutputCode,
	pub keys: Vec<SemanticKey>
}

#[derive(Debug)]
pub struct Overlay {
	modifier: ModifierState,
	entries: HashMap<SemanticKey, Mapping>
}

impl Overlay {
	fn new(modifier: ModifierState) -> Self {
		Self {
			modifier,
			entries: HashMap::new()
		}
	}

	pub const fn modifier(&self) -> ModifierState {
		self.modifier
	}

	fn overlay_key(&self, key: SemanticKey) -> SemanticKey {
		match self.modifier {
			ModifierState::Unshifted => key,
			_ => key.fold_case()
		}
	}

	fn insert(&mut self, key: SemanticKey, mapping: Mapping, line: usize) -> Result<(), KeymapError> {
		let key = self.overlay_key(key);
		match self.entries.get(&key) {
			Some(existing) if *existing == mapping => {
				log_debug!("keymap: line {}: repeated {} entry for {}", line, self.modifier, key);
				Ok(())
			}
			Some(_) => Err(KeymapError::ConflictingEntry {
				modifier: self.modifier,
				key
			}),
			None => {
				self.entries.insert(key, mapping);
				Ok(())
			}
		}
	}

	/// The slot for `key`, or `None` when this overlay has no slot for it.
	pub fn get(&self, key: SemanticKey) -> Option<Mapping> {
		self.entries.get(&self.overlay_key(key)).copied()
	}

	/// Keys whose slot is still a placeholder, sorted.
	pub fn placeholders(&self) -> Vec<SemanticKey> {
		let mut keys: Vec<_> = self
			.entries
			.iter()
			.filter(|(_, mapping)| **mapping == Mapping::Placeholder)
			.map(|(key, _)| *key)
			.collect();
		keys.sort();
		keys
	}

	/// Output codes produced by more than one key, sorted by code.
	pub fn output_collisions(&self) -> Vec<OutputCollision> {
		let mut by_code: HashMap<OutputCode, Vec<SemanticKey>> = HashMap::new();
		for (key, mapping) in &self.entries {
			if let Some(code) = mapping.code() {
				by_code.entry(code).or_default().push(*key);
			}
		}
		let mut collisions: Vec<_> = by_code
			.into_iter()
			.filter(|(_, keys)| keys.len() > 1)
			.map(|(code, mut keys)| {
				keys.sort();
				OutputCollision {
					code,
					keys
				}
			})
			.collect();
		collisions.sort_by_key(|c| c.code.value());
		collisions
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[derive(Debug)]
pub struct Overlays {
	unshifted: Overlay,
	ctrl: Overlay,
	graph: Overlay
}

impl Overlays {
	pub fn build(def: &KeymapDefinition, scan: &ScanTable) -> Result<Self, KeymapError> {
		// A key reported by several raw codes keeps its lowest one here;
		// translation itself always emits the raw code it was given.
		let mut unshifted = Overlay::new(ModifierState::Unshifted);
		for raw in RawScanCode::all() {
			// a primary designation hides the other candidates from keys_at
			let candidates = scan.ambiguity(raw).map_or(&[][..], |r| r.candidates.as_slice());
			for key in scan.keys_at(raw).iter().chain(candidates) {
				unshifted
					.entries
					.entry(*key)
					.or_insert(Mapping::Documented(OutputCode(raw.value())));
			}
		}

		Ok(Self {
			unshifted,
			ctrl: build_overlay(ModifierState::Ctrl, def.overlay_rows(ModifierState::Ctrl), scan)?,
			graph: build_overlay(ModifierState::Graph, def.overlay_rows(ModifierState::Graph), scan)?
		})
	}

	pub fn get(&self, modifier: ModifierState) -> &Overlay {
		match modifier {
			ModifierState::Unshifted => &self.unshifted,
			ModifierState::Ctrl => &self.ctrl,
			ModifierState::Graph => &self.graph
		}
	}

	/// The slot `key` resolves to when reported as `raw`. Unshifted, that is
	/// always the raw code itself.
	pub fn mapping(&self, modifier: ModifierState, raw: RawScanCode, key: SemanticKey) -> Option<Mapping> {
		match modifier {
			ModifierState::Unshifted => Some(Mapping::Documented(OutputCode(raw.value()))),
			_ => self.get(modifier).get(key)
		}
	}
}

fn build_overlay(modifier: ModifierState, rows: &[OverlayRow], scan: &ScanTable) -> Result<Overlay, KeymapError> {
	let mut overlay = Overlay::new(modifier);
	for row in rows {
		if !scan.is_reachable(row.key) {
			return Err(KeymapError::UnreachableEntry {
				modifier,
				key: row.key
			});
		}
		if modifier == ModifierState::Ctrl
			&& let (Some(expected), Some(code)) = (row.key.standard_control_code(), row.mapping.code())
			&& code != expected
		{
			return Err(KeymapError::NonStandardControlCode {
				key: row.key,
				code,
				expected
			});
		}
		overlay.insert(row.key, row.mapping, row.line)?;
	}
	Ok(overlay)
}
