//! Typed line records for Dockerfile label handling.

use std::ops::Range;

/// Classification of a single Dockerfile line with respect to `LABEL` blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Anything outside a label declaration, including blank and comment
    /// lines that sit inside a continued block.
    Plain,
    /// A `LABEL` instruction; `continued` when it ends with `\`.
    LabelOpen { continued: bool },
    /// A line inside a block that itself ends with `\`.
    LabelContinuation,
    /// The first line of a block lacking `\`, ending the block.
    LabelClose,
}

impl LineKind {
    /// Returns true for any line that belongs to a label declaration.
    #[must_use]
    pub fn is_label(self) -> bool {
        !matches!(self, Self::Plain)
    }

    /// Returns true for the final line of a label block.
    #[must_use]
    pub fn ends_block(self) -> bool {
        matches!(self, Self::LabelOpen { continued: false } | Self::LabelClose)
    }
}

/// A line of the original text together with its classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockerfileLine<'a> {
    pub text: &'a str,
    pub kind: LineKind,
}

/// A `key=value` pair inside a label line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPair {
    /// Key with surrounding quotes removed.
    pub key: String,
    /// Byte range of the whole `key=value` text within the line.
    pub span: Range<usize>,
}

/// Splits `content` on `\n` and classifies every line.
#[must_use]
pub fn parse_lines(content: &str) -> Vec<DockerfileLine<'_>> {
    let mut in_block = false;

    content
        .split('\n')
        .map(|text| {
            let trimmed = text.trim();
            let kind = if in_block {
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    LineKind::Plain
                } else if has_continuation(trimmed) {
                    LineKind::LabelContinuation
                } else {
                    in_block = false;
                    LineKind::LabelClose
                }
            } else if is_label_instruction(trimmed) {
                let continued = has_continuation(trimmed);
                in_block = continued;
                LineKind::LabelOpen { continued }
            } else {
                LineKind::Plain
            };
            DockerfileLine { text, kind }
        })
        .collect()
}

/// Extracts the `key=value` pairs of a label line.
///
/// The `LABEL` keyword and the trailing `\` are skipped; quoted keys and
/// values may contain whitespace and escaped quotes. Tokens without `=`
/// (the legacy `LABEL key value` form) are ignored.
#[must_use]
pub fn label_pairs(line: &DockerfileLine<'_>) -> Vec<LabelPair> {
    if !line.kind.is_label() {
        return Vec::new();
    }

    let text = line.text;
    let bytes = text.as_bytes();

    let mut start = text.len() - text.trim_start().len();
    if matches!(line.kind, LineKind::LabelOpen { .. }) {
        start += "LABEL".len();
    }
    let mut end = text.trim_end().len();
    if text[..end].ends_with('\\') {
        end -= 1;
    }

    let mut pairs = Vec::new();
    let mut i = start;
    while i < end {
        while i < end && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= end {
            break;
        }

        let key_start = i;
        i = if bytes[i] == b'"' {
            skip_quoted(bytes, i, end)
        } else {
            skip_while(bytes, i, end, |b| b != b'=' && !b.is_ascii_whitespace())
        };
        let key_end = i;

        if i < end && bytes[i] == b'=' {
            i += 1;
            i = if i < end && bytes[i] == b'"' {
                skip_quoted(bytes, i, end)
            } else {
                skip_while(bytes, i, end, |b| !b.is_ascii_whitespace())
            };
            pairs.push(LabelPair {
                key: text[key_start..key_end].trim_matches('"').to_string(),
                span: key_start..i,
            });
        } else {
            i = skip_while(bytes, i, end, |b| !b.is_ascii_whitespace());
        }
    }

    pairs
}

/// Returns true for keys that name the image, e.g. `name` or `com.example.name`.
#[must_use]
pub fn is_name_key(key: &str) -> bool {
    key == "name" || key.ends_with(".name")
}

fn is_label_instruction(trimmed: &str) -> bool {
    trimmed
        .split_whitespace()
        .next()
        .is_some_and(|word| word.eq_ignore_ascii_case("LABEL"))
}

fn has_continuation(trimmed: &str) -> bool {
    trimmed.ends_with('\\')
}

/// Returns the index just past the closing quote of a quoted run starting at `i`.
fn skip_quoted(bytes: &[u8], mut i: usize, end: usize) -> usize {
    i += 1;
    while i < end {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            _ => i += 1,
        }
    }
    end
}

fn skip_while(bytes: &[u8], mut i: usize, end: usize, keep: impl Fn(u8) -> bool) -> usize {
    while i < end && keep(bytes[i]) {
        i += 1;
    }
    i
}
