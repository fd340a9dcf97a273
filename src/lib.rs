// lib.rs

/*
Scan-code translation for the Sanyo MBC-550/555 keyboard.

Raw codes from the keyboard's scanning hardware, together with the held
modifier, are mapped to the bytes the host expects. All tables come from one
versioned definition document, validated once at startup.
*/

#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate alloc;

pub mod config;
pub mod error;
pub mod keymap;
pub mod utils;

pub use crate::{
	config::TranslatorConfig,
	error::{KeymapError, SyntaxError},
	keymap::{
		Keymap,
		key::{Mapping, ModifierState, OutputCode, Provenance, RawScanCode, SemanticKey},
		translate::{Translation, Translator, Validity}
	}
};
