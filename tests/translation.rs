use std::thread;

use mbc55x_keymap::{
	Keymap, KeymapError, ModifierState, OutputCode, RawScanCode, SemanticKey, TranslatorConfig, Translator, Validity,
	keymap
};

fn raw(byte: u8) -> RawScanCode {
	RawScanCode::new(byte).unwrap()
}

#[test]
fn translation_is_total() {
	let keymap = Keymap::builtin().unwrap();
	for config in [TranslatorConfig::default(), TranslatorConfig::default().with_aliases(false)] {
		let translator = Translator::with_config(&keymap, config);
		for code in RawScanCode::all() {
			for modifier in ModifierState::ALL {
				let t = translator.translate(code, modifier);
				assert_eq!(t.code().is_some(), t.validity() == Validity::Valid, "{code} {modifier}");
				assert_eq!(t.raw(), code);
				assert_eq!(t.modifier(), modifier);
			}
		}
	}
}

#[test]
fn translation_is_deterministic() {
	let keymap = Keymap::builtin().unwrap();
	let translator = keymap.translator();
	for code in RawScanCode::all() {
		for modifier in ModifierState::ALL {
			assert_eq!(translator.translate(code, modifier), translator.translate(code, modifier));
		}
	}
}

#[test]
fn documented_scenarios() {
	let keymap = Keymap::builtin().unwrap();
	let translator = keymap.translator();

	let cases = [
		(0x03, ModifierState::Unshifted, 0x03),
		(0x1B, ModifierState::Unshifted, 0x1B),
		(b'C', ModifierState::Ctrl, 0x03),
		(b'c', ModifierState::Ctrl, 0x03),
		(b'M', ModifierState::Ctrl, 0x0D),
		(b'@', ModifierState::Ctrl, 0x00),
		(0x10, ModifierState::Ctrl, 0x68),
		(0x0A, ModifierState::Ctrl, 0x75),
		(0x0B, ModifierState::Ctrl, 0x77),
		(b'a', ModifierState::Graph, 0x1C),
		(b'x', ModifierState::Unshifted, b'x')
	];
	for (byte, modifier, expected) in cases {
		let t = translator.translate(raw(byte), modifier);
		assert_eq!(t.as_pair(), (Some(OutputCode(expected)), Validity::Valid), "{byte:#04x} {modifier}");
	}
}

#[test]
fn ctrl_letters_without_corrections_are_standard() {
	let keymap = Keymap::builtin().unwrap();
	let translator = Translator::with_config(&keymap, TranslatorConfig::default().with_aliases(false));
	for (i, letter) in (b'A'..=b'Z').enumerate() {
		let t = translator.translate(raw(letter), ModifierState::Ctrl);
		assert_eq!(t.code(), Some(OutputCode(i as u8 + 1)), "Ctrl+{}", letter as char);
	}
}

#[test]
fn alias_precedence_is_observable_both_ways() {
	let keymap = Keymap::builtin().unwrap();
	let with = Translator::with_config(&keymap, TranslatorConfig::default());
	let without = Translator::with_config(&keymap, TranslatorConfig::default().with_aliases(false));

	assert_eq!(with.translate(raw(b'S'), ModifierState::Ctrl).code(), Some(OutputCode(0x0D)));
	assert_eq!(without.translate(raw(b'S'), ModifierState::Ctrl).code(), Some(OutputCode(0x13)));
}

#[test]
fn graph_placeholders_are_not_zero() {
	let keymap = Keymap::builtin().unwrap();
	let translator = keymap.translator();
	for letter in b'B'..=b'Z' {
		let t = translator.translate(raw(letter), ModifierState::Graph);
		assert_eq!(t.validity(), Validity::Placeholder);
		assert_eq!(t.code(), None);
	}
	let ctrl_at = translator.translate(raw(b'@'), ModifierState::Ctrl);
	assert!(ctrl_at.is_valid());
	assert_eq!(ctrl_at.code(), Some(OutputCode(0x00)));
}

#[test]
fn ambiguous_code_needs_the_physical_key() {
	let keymap = Keymap::builtin().unwrap();
	let translator = keymap.translator();
	assert_eq!(translator.translate(raw(0x07), ModifierState::Unshifted).validity(), Validity::Ambiguous);

	let key = SemanticKey::try_from(pc_keyboard::KeyCode::PrintScreen).unwrap();
	let t = translator.translate_disambiguated(raw(0x07), ModifierState::Unshifted, key).unwrap();
	assert_eq!(t.as_pair(), (Some(OutputCode(0x07)), Validity::Valid));

	// no ctrl slot is documented for any of the three meanings
	let t = translator.translate_disambiguated(raw(0x07), ModifierState::Ctrl, key).unwrap();
	assert_eq!(t.validity(), Validity::Unmapped);

	assert!(matches!(
		translator.translate_disambiguated(raw(0x07), ModifierState::Unshifted, SemanticKey::End),
		Err(KeymapError::NotACandidate { .. })
	));
}

#[test]
fn concurrent_readers_share_the_keymap() {
	let shared = keymap::init().unwrap();
	let handles: Vec<_> = (0..4)
		.map(|_| {
			thread::spawn(move || {
				let translator = keymap::get().unwrap().translator();
				RawScanCode::all()
					.map(|code| translator.translate(code, ModifierState::Ctrl).code())
					.collect::<Vec<_>>()
			})
		})
		.collect();
	let expected: Vec<_> = RawScanCode::all()
		.map(|code| shared.translate(code, ModifierState::Ctrl).code())
		.collect();
	for handle in handles {
		assert_eq!(handle.join().unwrap(), expected);
	}
}
