//! Multi-file bundle wire format.
//!
//! A bundle is a set of files flattened into one text stream, one record per
//! file: `path|escaped_content\n`. Content is escaped so that it never
//! contains a raw newline or pipe:
//!
//! | byte   | escaped as |
//! |--------|------------|
//! | `\`    | `\\`       |
//! | newline| `\n`       |
//! | `\|`   | `\|`       |
//!
//! Escaping and unescaping are single-pass scanners so that adjacent escape
//! sequences such as `\\|` or `\\n` always round-trip. Paths are written
//! verbatim and must not contain `|` or a newline.

use std::collections::BTreeMap;

/// Mapping of forward-slash relative path to raw file content.
///
/// A `BTreeMap` keeps iteration deterministic for encoding and display.
pub type FileBundle = BTreeMap<String, Vec<u8>>;

/// Encoded form of a [`FileBundle`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedBundle(Vec<u8>);

impl EncodedBundle {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for EncodedBundle {
    fn from(bytes: Vec<u8>) -> Self {
        EncodedBundle(bytes)
    }
}

/// Encode every file of the bundle into one record stream
pub fn encode(files: &FileBundle) -> EncodedBundle {
    let capacity = files.iter().map(|(p, c)| p.len() + c.len() + 2).sum();
    let mut out = Vec::with_capacity(capacity);

    for (path, content) in files {
        out.extend_from_slice(path.as_bytes());
        out.push(b'|');
        escape_into(content, &mut out);
        out.push(b'\n');
    }

    EncodedBundle(out)
}

/// Decode a record stream back into a bundle.
///
/// Empty lines are ignored. A line without a `|` separator is dropped with
/// a warning instead of failing the whole decode.
pub fn decode(encoded: &[u8]) -> FileBundle {
    let mut files = FileBundle::new();

    for line in encoded.split(|&b| b == b'\n') {
        if line.is_empty() {
            continue;
        }

        let Some(sep) = line.iter().position(|&b| b == b'|') else {
            log::warn!(
                "Dropping bundle record without separator: {}",
                String::from_utf8_lossy(line)
            );
            continue;
        };

        let path = String::from_utf8_lossy(&line[..sep]).into_owned();
        files.insert(path, unescape(&line[sep + 1..]));
    }

    log::debug!("Decoded bundle with {} file(s)", files.len());
    files
}

fn escape_into(content: &[u8], out: &mut Vec<u8>) {
    for &b in content {
        match b {
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'|' => out.extend_from_slice(b"\\|"),
            other => out.push(other),
        }
    }
}

/// Reverse [`escape_into`]. An unknown escape keeps its backslash.
fn unescape(escaped: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(escaped.len());
    let mut escape_pending = false;

    for &b in escaped {
        if escape_pending {
            escape_pending = false;
            match b {
                b'\\' => out.push(b'\\'),
                b'n' => out.push(b'\n'),
                b'|' => out.push(b'|'),
                other => {
                    out.push(b'\\');
                    out.push(other);
                }
            }
        } else if b == b'\\' {
            escape_pending = true;
        } else {
            out.push(b);
        }
    }

    // dangling backslash at end of record
    if escape_pending {
        out.push(b'\\');
    }

    out
}
