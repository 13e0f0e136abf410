//! Lexer for flat `key=value` files.
//!
//! Follows the `.properties` layout: `#`/`!` comment lines, `=`, `:` or
//! whitespace between key and value, backslash line continuations, and the
//! `\t \n \r \f \uXXXX` escapes. Anything else after a backslash stands for
//! itself, which is how separators are escaped inside keys (`a\=b`).
//!
//! Entries come back in file order, duplicates included. Deciding what a
//! repeated key means is up to the caller.

use std::str::Chars;

/// One `key=value` pair with the 1-based line its logical line starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("line {line}: file ends inside a continued line")]
    Truncated { line: usize },

    #[error("line {line}: malformed \\uXXXX escape")]
    InvalidUnicodeEscape { line: usize },
}

const BLANKS: [char; 3] = [' ', '\t', '\x0c'];

/// Read every entry of a flat key/value document.
pub fn read_entries(source: &str) -> Result<Vec<Entry>, LexError> {
    let mut entries = Vec::new();
    let mut lines = source.lines().enumerate();

    while let Some((index, raw)) = lines.next() {
        let trimmed = raw.trim_start_matches(BLANKS);
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let line = index + 1;
        let mut logical = String::new();
        let mut current = trimmed;
        while continues(current) {
            logical.push_str(&current[..current.len() - 1]);
            match lines.next() {
                Some((_, next)) => current = next.trim_start_matches(BLANKS),
                None => return Err(LexError::Truncated { line }),
            }
        }
        logical.push_str(current);

        let (key, value) = split_pair(&logical);
        entries.push(Entry {
            key: unescape(key, line)?,
            value: unescape(value, line)?,
            line,
        });
    }

    Ok(entries)
}

/// An odd run of trailing backslashes continues the line.
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Split a logical line into its raw (still escaped) key and value.
fn split_pair(logical: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = logical.len();
    for (i, c) in logical.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || BLANKS.contains(&c) {
            key_end = i;
            break;
        }
    }

    let key = &logical[..key_end];
    let mut rest = logical[key_end..].trim_start_matches(BLANKS);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches(BLANKS);
    }
    (key, rest)
}

fn unescape(raw: &str, line: usize) -> Result<String, LexError> {
    if !raw.contains('\\') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => out.push(unicode_escape(&mut chars, line)?),
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

fn unicode_escape(chars: &mut Chars<'_>, line: usize) -> Result<char, LexError> {
    let invalid = LexError::InvalidUnicodeEscape { line };
    let high = hex4(chars).ok_or(invalid.clone())?;

    if !(0xD800..=0xDBFF).contains(&high) {
        return char::from_u32(high).ok_or(invalid);
    }

    // Surrogate pair: the low half must follow as another \uXXXX.
    if chars.next() != Some('\\') || chars.next() != Some('u') {
        return Err(invalid);
    }
    let low = hex4(chars).ok_or(invalid.clone())?;
    if !(0xDC00..=0xDFFF).contains(&low) {
        return Err(invalid);
    }
    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
    char::from_u32(code).ok_or(invalid)
}

fn hex4(chars: &mut Chars<'_>) -> Option<u32> {
    let mut value = 0;
    for _ in 0..4 {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}
