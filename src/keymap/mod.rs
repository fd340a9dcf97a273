//!
//! keymap/mod.rs
//!
//! The validated table set and its process-wide instance.
//!
//! A [`Keymap`] is built once from a [`KeymapDefinition`] and never changes
//! afterwards, so it can be read from any number of contexts without
//! locking.
//!

pub mod alias;
pub mod definition;
pub mod key;
pub mod layout;
pub mod scancode;
pub mod translate;

use alloc::{string::String, vec::Vec};

use conquer_once::spin::OnceCell;

use crate::{
	config::TranslatorConfig,
	error::KeymapError,
	keymap::{
		alias::{AliasCorrection, AliasResolver},
		definition::KeymapDefinition,
		key::{ModifierState, RawScanCode, SemanticKey},
		layout::{Overlay, Overlays, OutputCollision},
		scancode::{AmbiguityRecord, ScanTable},
		translate::{Translation, Translator}
	},
	log_info
};

static KEYMAP: OnceCell<Keymap> = OnceCell::uninit();

#[derive(Debug)]
pub struct Keymap {
	name: String,
	version: u32,
	config: TranslatorConfig,
	scan: ScanTable,
	overlays: Overlays,
	aliases: AliasResolver
}

impl Keymap {
	/// Builds the embedded Sanyo MBC-55x keymap.
	pub fn builtin() -> Result<Self, KeymapError> {
		Self::from_definition(&KeymapDefinition::builtin()?)
	}

	/// Parses and builds a keymap from a definition document.
	pub fn parse(source: &str) -> Result<Self, KeymapError> {
		Self::from_definition(&KeymapDefinition::parse(source)?)
	}

	/// Validates a definition and builds every table from it. Any
	/// inconsistency fails here rather than at translation time.
	pub fn from_definition(def: &KeymapDefinition) -> Result<Self, KeymapError> {
		let scan = ScanTable::build(&def.scan, &def.ambiguities)?;
		let overlays = Overlays::build(def, &scan)?;
		let aliases = AliasResolver::build(&def.aliases, &scan, &overlays)?;

		let keymap = Self {
			name: def.name.clone(),
			version: def.version,
			config: def.config,
			scan,
			overlays,
			aliases
		};

		let diagnostics = keymap.diagnostics();
		log_info!(
			"keymap: {} v{} ready: {} ambiguous, {} placeholder, {} unverified alias, {} shared output",
			keymap.name,
			keymap.version,
			diagnostics.ambiguities.len(),
			diagnostics.placeholders.len(),
			diagnostics.unverified_aliases.len(),
			diagnostics.output_collisions.len()
		);

		Ok(keymap)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub const fn version(&self) -> u32 {
		self.version
	}

	/// The configuration from the definition's `[translator]` section.
	pub const fn config(&self) -> &TranslatorConfig {
		&self.config
	}

	pub const fn scan_table(&self) -> &ScanTable {
		&self.scan
	}

	pub fn overlay(&self, modifier: ModifierState) -> &Overlay {
		self.overlays.get(modifier)
	}

	pub const fn overlays(&self) -> &Overlays {
		&self.overlays
	}

	pub const fn aliases(&self) -> &AliasResolver {
		&self.aliases
	}

	pub fn ambiguities(&self) -> &[AmbiguityRecord] {
		self.scan.ambiguities()
	}

	pub fn translator(&self) -> Translator<'_> {
		Translator::new(self)
	}

	/// Translates with the keymap's own configuration.
	pub fn translate(&self, raw: RawScanCode, modifier: ModifierState) -> Translation {
		self.translator().translate(raw, modifier)
	}

	/// Everything in the tables that is known to be incomplete or uncertain.
	pub fn diagnostics(&self) -> Diagnostics<'_> {
		let mut placeholders = Vec::new();
		let mut output_collisions = Vec::new();
		for modifier in ModifierState::ALL {
			let overlay = self.overlay(modifier);
			placeholders.extend(overlay.placeholders().into_iter().map(|key| (modifier, key)));
			output_collisions.extend(overlay.output_collisions().into_iter().map(|c| (modifier, c)));
		}
		Diagnostics {
			ambiguities: self.scan.ambiguities(),
			placeholders,
			unverified_aliases: self.aliases.unverified(),
			output_collisions
		}
	}
}

#[derive(Debug)]
pub struct Diagnostics<'a> {
	pub ambiguities: &'a [AmbiguityRecord],
	pub placeholders: Vec<(ModifierState, SemanticKey)>,
	pub unverified_aliases: Vec<&'a AliasCorrection>,
	pub output_collisions: Vec<(ModifierState, OutputCollision)>
}

/// Builds the embedded keymap on first use and returns the shared instance.
///
/// Later calls return the same keymap. A definition error is returned on
/// every call until initialization succeeds.
pub fn init() -> Result<&'static Keymap, KeymapError> {
	if let Ok(keymap) = KEYMAP.try_get() {
		return Ok(keymap);
	}
	let keymap = Keymap::builtin()?;
	// losing an initialization race is fine: the winner built the same tables
	let _ = KEYMAP.try_init_once(|| keymap);
	KEYMAP.get().ok_or(KeymapError::NotInitialized)
}

/// Returns the shared keymap, or `NotInitialized` before [`init`].
pub fn get() -> Result<&'static Keymap, KeymapError> {
	KEYMAP.try_get().map_err(|_| KeymapError::NotInitialized)
}
