//! Line-oriented `key=value` properties files
//!
//! Parses the format Gradle and the Android toolchain use for
//! `local.properties` and `key.properties`:
//!
//! - blank lines and lines starting with `#` or `!` are ignored
//! - the key ends at the first unescaped `=`, `:` or whitespace
//! - a trailing unescaped `\` continues the logical line
//! - `\t`, `\n`, `\r`, `\f`, `\uXXXX` and `\<char>` escapes are decoded,
//!   with UTF-16 surrogate pairs (`\uD83D\uDE00`) combined into one char
//!
//! Files are read as UTF-8, falling back to ISO-8859-1 when the bytes are
//! not valid UTF-8. Duplicate keys keep the last value.
//!
//! # Example
//!
//! ```rust
//! use droidcfg_core::properties::PropertyMap;
//!
//! let props = PropertyMap::parse("local.properties", "flutter.sdk=/opt/flutter\n").unwrap();
//! assert_eq!(props.get("flutter.sdk"), Some("/opt/flutter"));
//! ```

use crate::error::{Error, ErrorCode, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parsed properties file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMap {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl PropertyMap {
    /// Read and parse a properties file
    ///
    /// A missing file yields [`ErrorCode::ConfigNotFound`]; any other read
    /// failure keeps the IO error code.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::config_not_found(path));
        }

        let bytes = std::fs::read(path)?;
        let content = decode(bytes);

        Self::parse(path, &content)
    }

    /// Parse properties content attributed to `path`
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let path = path.into();
        let mut entries = BTreeMap::new();

        for (line_no, line) in logical_lines(content) {
            let (key, value) = split_entry(&line);
            let key = unescape(key).map_err(|msg| parse_error(&path, line_no, msg))?;
            let value = unescape(value).map_err(|msg| parse_error(&path, line_no, msg))?;

            if let Some(previous) = entries.insert(key.clone(), value) {
                debug!(
                    file = %path.display(),
                    key = %key,
                    line = line_no,
                    "duplicate property overrides earlier value ({} chars)",
                    previous.len()
                );
            }
        }

        Ok(Self { path, entries })
    }

    /// Build a map directly from pairs
    pub fn from_pairs<K, V>(path: impl Into<PathBuf>, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            path: path.into(),
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// File the properties were read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Look up a value, treating blank values as absent
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the file defined no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// UTF-8 when valid, otherwise ISO-8859-1 (every byte is one char)
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    }
}

fn parse_error(path: &Path, line: usize, message: String) -> Error {
    Error::new(
        ErrorCode::ConfigParseError,
        format!("{}:{}: {}", path.display(), line, message),
    )
}

/// Join continuation lines and drop comments/blank lines.
///
/// Yields the 1-based line number where each logical line starts.
fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (idx, raw) in content.lines().enumerate() {
        let trimmed = raw.trim_start();

        match current.as_mut() {
            Some((_, buf)) => buf.push_str(trimmed),
            None => {
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                current = Some((idx + 1, trimmed.to_string()));
            }
        }

        let continues = current
            .as_ref()
            .is_some_and(|(_, buf)| ends_with_odd_backslashes(buf));

        if continues {
            if let Some((_, buf)) = current.as_mut() {
                buf.pop();
            }
        } else if let Some(done) = current.take() {
            out.push(done);
        }
    }

    // A continuation on the final line just ends the entry
    if let Some(done) = current.take() {
        out.push(done);
    }

    out
}

fn ends_with_odd_backslashes(s: &str) -> bool {
    s.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Split a logical line into raw (still escaped) key and value.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches([' ', '\t', '\x0c']);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches([' ', '\t', '\x0c']);
    }

    (key, rest)
}

fn unescape(raw: &str) -> std::result::Result<String, String> {
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
            Some('u') => out.push(unicode_escape(&mut chars)?),
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

/// Decode the hex digits after `\u`, pairing a high surrogate with the
/// `\uXXXX` low surrogate that must follow it
fn unicode_escape(chars: &mut std::str::Chars<'_>) -> std::result::Result<char, String> {
    let high = hex4(chars)?;
    if !(0xD800..=0xDBFF).contains(&high) {
        return char::from_u32(high).ok_or_else(|| format!("unpaired surrogate in \\u{:04X}", high));
    }

    let mut rest = chars.clone();
    let low = match (rest.next(), rest.next()) {
        (Some('\\'), Some('u')) => hex4(&mut rest)?,
        _ => return Err(format!("unpaired surrogate in \\u{:04X}", high)),
    };
    if !(0xDC00..=0xDFFF).contains(&low) {
        return Err(format!("unpaired surrogate in \\u{:04X}", high));
    }
    *chars = rest;

    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
    char::from_u32(code).ok_or_else(|| format!("invalid surrogate pair \\u{:04X}\\u{:04X}", high, low))
}

fn hex4(chars: &mut std::str::Chars<'_>) -> std::result::Result<u32, String> {
    let hex: String = chars.by_ref().take(4).collect();
    (hex.len() == 4)
        .then(|| u32::from_str_radix(&hex, 16).ok())
        .flatten()
        .ok_or_else(|| format!("malformed \\uXXXX escape: \\u{}", hex))
}
