//! Property text reader
//!
//! Splits logical lines into keys and values and decodes escapes.

use globenv_domain::VariableMap;
use thiserror::Error;
use tracing::warn;

use super::lines::{LineReader, is_property_whitespace};

/// Errors produced while reading property text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PropertiesError {
    /// A `\u` escape was not followed by four hex digits.
    #[error("malformed \\uxxxx encoding on line {line}")]
    MalformedUnicodeEscape {
        /// 1-based line the entry starts on.
        line: usize,
    },
}

/// Reads property text into a map, in the manner of a `.properties` file.
///
/// Entries are kept as read, including empty keys and values; use
/// [`PropertiesReader::into_variables`] to get the filtered result.
#[derive(Debug, Clone, Default)]
pub struct PropertiesReader {
    entries: VariableMap,
}

impl PropertiesReader {
    /// Creates an empty reader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every entry of `text`, later keys overwriting earlier ones.
    ///
    /// Reading stops at the first malformed entry. Entries read before it
    /// stay in the reader.
    ///
    /// # Errors
    /// Returns a [`PropertiesError`] for a malformed `\u` escape.
    pub fn load(&mut self, text: &str) -> Result<usize, PropertiesError> {
        let mut loaded = 0;

        for line in LineReader::new(text) {
            let chars: Vec<char> = line.text.chars().collect();
            let (raw_key, raw_value) = split_entry(&chars);
            let key = unescape(raw_key, line.number)?;
            let value = unescape(raw_value, line.number)?;
            self.entries.insert(key, value);
            loaded += 1;
        }

        Ok(loaded)
    }

    /// Returns the entries whose key and value are both non-empty.
    #[must_use]
    pub fn into_variables(self) -> VariableMap {
        self.entries
            .into_iter()
            .filter(|(key, value)| !key.is_empty() && !value.is_empty())
            .collect()
    }
}

/// Splits a logical line into its raw key and raw value.
///
/// The key ends at the first unescaped `=`, `:` or whitespace. Whitespace
/// and at most one `=`/`:` separate it from the value.
fn split_entry(line: &[char]) -> (&[char], &[char]) {
    let mut key_len = 0;
    let mut value_start = line.len();
    let mut has_separator = false;
    let mut preceding_backslash = false;

    while key_len < line.len() {
        let c = line[key_len];
        if !preceding_backslash {
            if c == '=' || c == ':' {
                value_start = key_len + 1;
                has_separator = true;
                break;
            }
            if is_property_whitespace(c) {
                value_start = key_len + 1;
                break;
            }
        }
        preceding_backslash = c == '\\' && !preceding_backslash;
        key_len += 1;
    }

    while value_start < line.len() {
        let c = line[value_start];
        if !is_property_whitespace(c) {
            if !has_separator && (c == '=' || c == ':') {
                has_separator = true;
            } else {
                break;
            }
        }
        value_start += 1;
    }

    (&line[..key_len], &line[value_start..])
}

/// Reads four hex digits of a `\u` escape.
fn read_code_unit(chars: &mut impl Iterator<Item = char>) -> Option<u16> {
    let mut code = 0_u16;
    for _ in 0..4 {
        let digit = chars.next()?.to_digit(16)?;
        code = (code << 4) | u16::try_from(digit).ok()?;
    }
    Some(code)
}

/// Decodes escapes in a raw key or value.
fn unescape(raw: &[char], line: usize) -> Result<String, PropertiesError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.iter().copied();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('u') => {
                let code = read_code_unit(&mut chars)
                    .ok_or(PropertiesError::MalformedUnicodeEscape { line })?;
                out.push(decode_code_unit(code, &mut chars, line));
            }
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some('f') => out.push('\u{000C}'),
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

/// Turns a UTF-16 code unit into a char, pulling a trailing `\uXXXX` low
/// surrogate from `chars` when `code` is a high surrogate.
///
/// A surrogate without its partner becomes U+FFFD. Anything after it,
/// including a malformed escape, is left in `chars`.
fn decode_code_unit<I>(code: u16, chars: &mut I, line: usize) -> char
where
    I: Iterator<Item = char> + Clone,
{
    if (0xD800..=0xDBFF).contains(&code) {
        let mut lookahead = chars.clone();
        if lookahead.next() == Some('\\')
            && lookahead.next() == Some('u')
            && let Some(low) = read_code_unit(&mut lookahead)
            && let Some(Ok(decoded)) = char::decode_utf16([code, low]).next()
        {
            *chars = lookahead;
            return decoded;
        }
    }

    char::from_u32(u32::from(code)).unwrap_or_else(|| {
        warn!(line, code, "unpaired surrogate escape replaced with U+FFFD");
        char::REPLACEMENT_CHARACTER
    })
}
