//!
//! ini_parser.rs
//!
//! Minimal INI reader for keymap definition documents. Repeated keys are
//! kept in order since a scan code may legitimately appear more than once.
//!

use alloc::vec::Vec;

use crate::error::{KeymapError, SyntaxError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IniProperty<'a> {
	pub key: &'a str,
	pub value: &'a str,
	/// 1-based line number in the source document.
	pub line: usize
}

#[derive(Debug)]
pub struct IniSection<'a> {
	pub name: &'a str,
	pub line: usize,
	pub properties: Vec<IniProperty<'a>>
}

#[derive(Debug)]
pub struct IniFile<'a> {
	pub sections: Vec<IniSection<'a>>
}

/// Cuts a trailing `; comment`. The semicolon must follow whitespace so that
/// values can still contain one.
fn strip_comment(line: &str) -> &str {
	let bytes = line.as_bytes();
	for (i, b) in bytes.iter().enumerate() {
		if *b == b';' && i > 0 && bytes[i - 1].is_ascii_whitespace() {
			return &line[..i];
		}
	}
	line
}

/// Position of the `=` separating key from value. An `=` closing a `..=`
/// range belongs to the key.
fn separator(line: &str) -> Option<usize> {
	line.match_indices('=')
		.map(|(i, _)| i)
		.find(|&i| !line[..i].ends_with(".."))
}

/// Parses an INI formatted string into an IniFile structure.
pub fn parse_ini(input: &'_ str) -> Result<IniFile<'_>, KeymapError> {
	let mut sections = Vec::new();

	let mut current_section: Option<IniSection> = None;

	for (index, raw_line) in input.lines().enumerate() {
		let line_no = index + 1;
		let line = raw_line.trim();
		// skip empty or comment lines.
		if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
			continue;
		}
		let line = strip_comment(line).trim_end();
		if line.starts_with('[') && line.ends_with(']') {
			if let Some(sec) = current_section.take() {
				sections.push(sec);
			}
			let section_name = line[1..line.len() - 1].trim();
			current_section = Some(IniSection {
				name: section_name,
				line: line_no,
				properties: Vec::new()
			});
		} else if let Some(pos) = separator(line) {
			let key = line[..pos].trim();
			let value = line[pos + 1..].trim();
			if key.is_empty() {
				return Err(KeymapError::syntax(
					line_no,
					SyntaxError::MalformedLine(line.into())
				));
			}
			match current_section {
				Some(ref mut sec) => sec.properties.push(IniProperty {
					key,
					value,
					line: line_no
				}),
				None => return Err(KeymapError::syntax(line_no, SyntaxError::NoSection))
			}
		} else {
			return Err(KeymapError::syntax(
				line_no,
				SyntaxError::MalformedLine(line.into())
			));
		}
	}
	if let Some(sec) = current_section {
		sections.push(sec);
	}
	Ok(IniFile {
		sections
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keeps_repeated_keys_in_order() {
		let ini = parse_ini("[scan]\n0x07 = Insert\n0x07 = Delete\n").unwrap();
		let scan = &ini.sections[0];
		assert_eq!(scan.name, "scan");
		assert_eq!(scan.properties.len(), 2);
		assert_eq!(scan.properties[0].value, "Insert");
		assert_eq!(scan.properties[1].value, "Delete");
		assert_eq!(scan.properties[1].line, 3);
	}

	#[test]
	fn strips_comments() {
		let ini = parse_ini("; header\n# other\n[graph]\nB = placeholder ; unknown\n").unwrap();
		assert_eq!(ini.sections[0].properties[0].value, "placeholder");
	}

	#[test]
	fn range_keys_keep_their_operator() {
		let ini = parse_ini("[scan]\n0x20..=0x7e = printable\n").unwrap();
		let prop = ini.sections[0].properties[0];
		assert_eq!(prop.key, "0x20..=0x7e");
		assert_eq!(prop.value, "printable");
	}

	#[test]
	fn rejects_orphan_properties_and_garbage() {
		assert_eq!(
			parse_ini("version = 1\n").unwrap_err(),
			KeymapError::syntax(1, SyntaxError::NoSection)
		);
		assert!(matches!(
			parse_ini("[scan]\nnonsense\n"),
			Err(KeymapError::Syntax {
				line: 2,
				..
			})
		));
	}
}
