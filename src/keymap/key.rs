//!
//! key.rs
//!
//! Value types shared by every keymap layer: raw scan codes, modifier
//! states, semantic keys, output codes and per-entry provenance.
//!

use core::{fmt, str::FromStr};

use crate::error::{KeymapError, SyntaxError};

/// Highest raw code the MBC-55x scanning hardware can report.
pub const RAW_MAX: u8 = 0x7F;

/// Number of distinct raw scan codes.
pub const RAW_CODE_COUNT: usize = RAW_MAX as usize + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// A raw code reported by the keyboard for one key transition.
///
/// Always within `0x00..=0x7F`; out-of-range bytes are rejected by
/// [`RawScanCode::new`] and the `TryFrom<u8>` impl.
pub struct RawScanCode(u8);

impl RawScanCode {
	/// Creates a `RawScanCode`, returning `None` for bytes above `0x7F`.
	pub const fn new(byte: u8) -> Option<Self> {
		if byte <= RAW_MAX { Some(Self(byte)) } else { None }
	}

	pub const fn value(self) -> u8 {
		self.0
	}

	pub(crate) const fn index(self) -> usize {
		self.0 as usize
	}

	/// Iterates over every legal raw code in ascending order.
	pub fn all() -> impl Iterator<Item = RawScanCode> {
		(0..=RAW_MAX).map(RawScanCode)
	}
}

impl TryFrom<u8> for RawScanCode {
	type Error = KeymapError;

	fn try_from(byte: u8) -> Result<Self, Self::Error> {
		Self::new(byte).ok_or(KeymapError::OutOfRange(byte))
	}
}

impl fmt::Display for RawScanCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:#04x}", self.0)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// The byte handed to the transport for the host.
pub struct OutputCode(pub u8);

impl OutputCode {
	pub const fn value(self) -> u8 {
		self.0
	}
}

impl fmt::Display for OutputCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:#04x}", self.0)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// The single modifier held while a key was pressed.
pub enum ModifierState {
	Unshifted,
	Ctrl,
	Graph
}

impl ModifierState {
	pub const ALL: [ModifierState; 3] = [Self::Unshifted, Self::Ctrl, Self::Graph];

	pub const fn name(self) -> &'static str {
		match self {
			Self::Unshifted => "unshifted",
			Self::Ctrl => "ctrl",
			Self::Graph => "graph"
		}
	}
}

impl fmt::Display for ModifierState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for ModifierState {
	type Err = SyntaxError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		ModifierState::ALL
			.into_iter()
			.find(|m| m.name().eq_ignore_ascii_case(s))
			.ok_or_else(|| SyntaxError::InvalidModifier(s.into()))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// How much an entry's output code can be trusted.
pub enum Provenance {
	/// Confirmed against real hardware.
	Verified,
	/// Taken from the vendor manual, ASCII, or third-party analysis.
	Documented,
	/// A known slot whose value has not been determined.
	Placeholder
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// The value stored in an overlay slot.
///
/// A placeholder has no code at all, so it can never be mistaken for a
/// genuine `0x00` mapping such as `Ctrl+@`.
pub enum Mapping {
	Verified(OutputCode),
	Documented(OutputCode),
	Placeholder
}

impl Mapping {
	pub const fn code(&self) -> Option<OutputCode> {
		match *self {
			Mapping::Verified(code) | Mapping::Documented(code) => Some(code),
			Mapping::Placeholder => None
		}
	}

	pub const fn provenance(&self) -> Provenance {
		match self {
			Mapping::Verified(_) => Provenance::Verified,
			Mapping::Documented(_) => Provenance::Documented,
			Mapping::Placeholder => Provenance::Placeholder
		}
	}
}

/// Printable characters that are not letters or digits, by name.
const SYMBOL_NAMES: [(u8, &str); 33] = [
	(b' ', "Space"),
	(b'!', "Exclamation"),
	(b'"', "DoubleQuote"),
	(b'#', "Hash"),
	(b'$', "Dollar"),
	(b'%', "Percent"),
	(b'&', "Ampersand"),
	(b'\'', "Quote"),
	(b'(', "LeftParen"),
	(b')', "RightParen"),
	(b'*', "Asterisk"),
	(b'+', "Plus"),
	(b',', "Comma"),
	(b'-', "Minus"),
	(b'.', "Period"),
	(b'/', "Slash"),
	(b':', "Colon"),
	(b';', "Semicolon"),
	(b'<', "Less"),
	(b'=', "Equals"),
	(b'>', "Greater"),
	(b'?', "Question"),
	(b'@', "At"),
	(b'[', "LeftBracket"),
	(b'\\', "Backslash"),
	(b']', "RightBracket"),
	(b'^', "Caret"),
	(b'_', "Underscore"),
	(b'`', "Backtick"),
	(b'{', "LeftBrace"),
	(b'|', "Pipe"),
	(b'}', "RightBrace"),
	(b'~', "Tilde")
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// The intended meaning of a physical key, independent of modifiers.
pub enum SemanticKey {
	End,
	PageDown,
	ScrollLock,
	PageUp,
	BackTab,
	Insert,
	PrintScreen,
	Delete,
	Backspace,
	Tab,
	KeypadEnter,
	Home,
	Return,
	Escape,
	CursorLeft,
	CursorRight,
	CursorUp,
	CursorDown,
	/// `F1` to `F10`.
	Function(u8),
	/// A printable ASCII character, `0x20..=0x7E`, case preserved.
	Char(u8)
}

const NAMED_KEYS: [(SemanticKey, &str); 18] = [
	(SemanticKey::End, "End"),
	(SemanticKey::PageDown, "PageDown"),
	(SemanticKey::ScrollLock, "ScrollLock"),
	(SemanticKey::PageUp, "PageUp"),
	(SemanticKey::BackTab, "BackTab"),
	(SemanticKey::Insert, "Insert"),
	(SemanticKey::PrintScreen, "PrintScreen"),
	(SemanticKey::Delete, "Delete"),
	(SemanticKey::Backspace, "Backspace"),
	(SemanticKey::Tab, "Tab"),
	(SemanticKey::KeypadEnter, "KeypadEnter"),
	(SemanticKey::Home, "Home"),
	(SemanticKey::Return, "Return"),
	(SemanticKey::Escape, "Escape"),
	(SemanticKey::CursorLeft, "CursorLeft"),
	(SemanticKey::CursorRight, "CursorRight"),
	(SemanticKey::CursorUp, "CursorUp"),
	(SemanticKey::CursorDown, "CursorDown")
];

impl SemanticKey {
	/// Builds a `Char` key, rejecting anything outside printable ASCII.
	pub const fn printable(byte: u8) -> Option<Self> {
		if byte >= 0x20 && byte <= 0x7E { Some(Self::Char(byte)) } else { None }
	}

	/// Lowercase letters fold onto their uppercase key cap; everything else
	/// is returned unchanged. Modifier overlays are keyed by folded keys.
	pub const fn fold_case(self) -> Self {
		match self {
			Self::Char(c) if c.is_ascii_lowercase() => Self::Char(c.to_ascii_uppercase()),
			other => other
		}
	}

	/// The control character a standard terminal produces for this key, if
	/// it is one of `@ A-Z [ \ ] ^ _` (either case for letters).
	pub const fn standard_control_code(self) -> Option<OutputCode> {
		match self.fold_case() {
			Self::Char(c @ 0x40..=0x5F) => Some(OutputCode(c - 0x40)),
			_ => None
		}
	}
}

impl fmt::Display for SemanticKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Self::Function(n) => write!(f, "F{}", n),
			Self::Char(c) if c.is_ascii_alphanumeric() => write!(f, "{}", c as char),
			Self::Char(c) => match SYMBOL_NAMES.iter().find(|(b, _)| *b == c) {
				Some((_, name)) => f.write_str(name),
				None => write!(f, "Char({:#04x})", c)
			},
			named => {
				let name = NAMED_KEYS
					.iter()
					.find(|(k, _)| *k == named)
					.map(|(_, name)| *name)
					.unwrap_or("?");
				f.write_str(name)
			}
		}
	}
}

impl FromStr for SemanticKey {
	type Err = SyntaxError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let bytes = s.as_bytes();
		if bytes.len() == 1 && bytes[0].is_ascii_alphanumeric() {
			return Ok(Self::Char(bytes[0]));
		}
		// `F1`..`F10` exactly as printed: no sign, no leading zero
		if let Some(digits) = s.strip_prefix('F')
			&& !digits.starts_with('0')
			&& digits.bytes().all(|b| b.is_ascii_digit())
			&& let Ok(n) = digits.parse::<u8>()
			&& (1..=10).contains(&n)
		{
			return Ok(Self::Function(n));
		}
		if let Some((key, _)) = NAMED_KEYS.iter().find(|(_, name)| *name == s) {
			return Ok(*key);
		}
		if let Some((c, _)) = SYMBOL_NAMES.iter().find(|(_, name)| *name == s) {
			return Ok(Self::Char(*c));
		}
		Err(SyntaxError::InvalidKeyName(s.into()))
	}
}

impl TryFrom<pc_keyboard::KeyCode> for SemanticKey {
	type Error = pc_keyboard::KeyCode;

	/// Maps the key identity reported by a PC-style scanning layer onto the
	/// MBC-55x key it stands for. Used as the disambiguating signal for raw
	/// codes shared by several keys.
	fn try_from(code: pc_keyboard::KeyCode) -> Result<Self, Self::Error> {
		use pc_keyboard::KeyCode;

		let key = match code {
			KeyCode::End => Self::End,
			KeyCode::PageDown => Self::PageDown,
			KeyCode::ScrollLock => Self::ScrollLock,
			KeyCode::PageUp => Self::PageUp,
			KeyCode::Insert => Self::Insert,
			KeyCode::PrintScreen => Self::PrintScreen,
			KeyCode::Delete => Self::Delete,
			KeyCode::Backspace => Self::Backspace,
			KeyCode::Tab => Self::Tab,
			KeyCode::NumpadEnter => Self::KeypadEnter,
			KeyCode::Home => Self::Home,
			KeyCode::Return => Self::Return,
			KeyCode::Escape => Self::Escape,
			KeyCode::ArrowLeft => Self::CursorLeft,
			KeyCode::ArrowRight => Self::CursorRight,
			KeyCode::ArrowUp => Self::CursorUp,
			KeyCode::ArrowDown => Self::CursorDown,
			KeyCode::F1 => Self::Function(1),
			KeyCode::F2 => Self::Function(2),
			KeyCode::F3 => Self::Function(3),
			KeyCode::F4 => Self::Function(4),
			KeyCode::F5 => Self::Function(5),
			KeyCode::F6 => Self::Function(6),
			KeyCode::F7 => Self::Function(7),
			KeyCode::F8 => Self::Function(8),
			KeyCode::F9 => Self::Function(9),
			KeyCode::F10 => Self::Function(10),
			other => return Err(other)
		};
		Ok(key)
	}
}
