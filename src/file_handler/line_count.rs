//! Streaming line counts over resolved files.
//!
//! Counting works on buffered chunks with `memchr`, so memory use is bounded
//! by the reader's buffer no matter how large the decompressed content is.
//! A final record without a trailing newline still counts as a line.

use crate::error::{AnyfileError, Result};
use crate::file_handler::reader::{open_any, try_open_any, AnyReader};
use bstr::ByteSlice;
use std::fmt;
use std::io::{self, BufRead};
use std::path::Path;
use std::str::FromStr;

/// Lines excluded from a comment-aware count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentRule {
    /// Non-empty lines made only of spaces
    Whitespace,
    /// Lines whose first non-space byte is `#`
    WhitespaceHash,
}

impl CommentRule {
    /// True when `line` (without its newline) is a comment under this rule
    pub fn matches(&self, line: &[u8]) -> bool {
        match self {
            Self::Whitespace => !line.is_empty() && line.trim_with(|c| c == ' ').is_empty(),
            Self::WhitespaceHash => line.trim_start_with(|c| c == ' ').first() == Some(&b'#'),
        }
    }

    /// Parse a comma-separated list such as `whitespace,hash`
    pub fn parse_list(text: &str) -> Result<Vec<Self>> {
        text.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for CommentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whitespace => f.write_str("whitespace"),
            Self::WhitespaceHash => f.write_str("hash"),
        }
    }
}

impl FromStr for CommentRule {
    type Err = AnyfileError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "whitespace" => Ok(Self::Whitespace),
            "hash" | "whitespacehash" => Ok(Self::WhitespaceHash),
            _ => Err(AnyfileError::invalid_argument(format!(
                "unknown comment rule '{s}' (expected whitespace or hash)"
            ))),
        }
    }
}

/// Count newline-terminated records in `reader`, plus a trailing partial one
pub fn count_records<R: BufRead>(mut reader: R) -> io::Result<u64> {
    let mut count = 0u64;
    let mut partial = false;
    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            break;
        }
        count += memchr::memchr_iter(b'\n', chunk).count() as u64;
        partial = chunk.last() != Some(&b'\n');
        let consumed = chunk.len();
        reader.consume(consumed);
    }
    Ok(count + u64::from(partial))
}

/// Count records in `reader` that no rule in `rules` marks as a comment
pub fn count_records_excluding<R: BufRead>(mut reader: R, rules: &[CommentRule]) -> io::Result<u64> {
    let mut count = 0u64;
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        let body = line.strip_suffix(b"\n").unwrap_or(&line);
        if !rules.iter().any(|rule| rule.matches(body)) {
            count += 1;
        }
    }
    Ok(count)
}

fn drain(mut reader: AnyReader, rules: &[CommentRule]) -> Result<u64> {
    let counted = if rules.is_empty() {
        count_records(&mut reader)
    } else {
        count_records_excluding(&mut reader, rules)
    };
    let count = counted.map_err(|e| {
        AnyfileError::file_error(
            format!("Failed to read {}", reader.resolution().path.display()),
            e,
        )
    })?;
    reader.finish()?;
    Ok(count)
}

/// Number of lines in whichever variant of `name` resolves
pub fn try_count_lines(name: impl AsRef<Path>) -> Result<u64> {
    drain(try_open_any(name)?, &[])
}

/// Number of lines in `name` that are not comments under `rules`
pub fn try_count_lines_excluding(name: impl AsRef<Path>, rules: &[CommentRule]) -> Result<u64> {
    drain(try_open_any(name)?, rules)
}

/// Number of lines in whichever variant of `name` resolves
///
/// # Panics
/// Panics when nothing resolves or the content cannot be read.
pub fn count_lines(name: impl AsRef<Path>) -> u64 {
    let name = name.as_ref();
    drain(open_any(name), &[])
        .unwrap_or_else(|e| panic!("count_lines({}): {}", name.display(), e))
}

/// Count lines of an already-open reader, consuming it
pub fn count_reader_lines(reader: AnyReader, rules: &[CommentRule]) -> Result<u64> {
    drain(reader, rules)
}
