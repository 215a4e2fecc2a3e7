//! Realm repository operations built on top of an [`Evaluator`].
//!
//! [`RealmClient`] knows the expressions exposed by the realm's `Repository`
//! object and decodes their responses:
//!
//! | operation            | single transfer              | chunked transfer                                              |
//! |----------------------|------------------------------|---------------------------------------------------------------|
//! | all committed files  | `SerializePullAll()`         | `SerializePullAllSize()`, `SerializePullAllChunk(off, len)`   |
//! | one committed file   | `Pull("f")`                  | `PullSize("f")`, `PullChunk("f", off, len)`                   |
//!
//! Commits are broadcast as a generated program that decodes the bundle on
//! the realm side and calls `Repository.Commit`.

use crate::core::bundle::{self, FileBundle};
use crate::core::chunked::{ChunkSource, ChunkedRetrieval, Retrieval};
use crate::core::config::{package_alias, ClientConfig, TransferMode};
use crate::core::error::Result;
use crate::core::evaluator::Evaluator;
use crate::core::response::{self, PAYLOAD_MARKER};
use std::fmt::Write;

/// Client for one realm repository
pub struct RealmClient<'a, E: Evaluator + Sync + ?Sized> {
    evaluator: &'a E,
    realm_path: String,
    transfer: TransferMode,
    retrieval: ChunkedRetrieval,
}

impl<'a, E: Evaluator + Sync + ?Sized> RealmClient<'a, E> {
    pub fn new(evaluator: &'a E, realm_path: impl Into<String>, config: &ClientConfig) -> Self {
        Self {
            evaluator,
            realm_path: realm_path.into(),
            transfer: config.transfer,
            retrieval: ChunkedRetrieval::new(config.chunk_size).with_workers(config.chunk_workers),
        }
    }

    pub fn realm_path(&self) -> &str {
        &self.realm_path
    }

    fn evaluate(&self, expression: &str) -> Result<String> {
        self.evaluator
            .evaluate(&format!("{}.{}", self.realm_path, expression))
    }

    /// Check that the realm exists and exposes a repository. Returns the
    /// raw payload of the file listing.
    pub fn probe(&self) -> Result<String> {
        let raw = self.evaluate("Repository.ListFiles()")?;
        response::payload_line(&raw).map(str::to_string)
    }

    /// Every committed file of the repository
    pub fn fetch_bundle(&self) -> Result<FileBundle> {
        let encoded = match self.transfer {
            TransferMode::Single => {
                response::decode_bytes(&self.evaluate("Repository.SerializePullAll()")?)?
            }
            TransferMode::Chunked => {
                let source = RealmChunkSource {
                    client: self,
                    accessor: Accessor::Bundle,
                    resource: format!("{} (all files)", self.realm_path),
                };
                match self.retrieve(&source)? {
                    Retrieval::Complete(bytes) => bytes,
                    Retrieval::Empty | Retrieval::NotFound => Vec::new(),
                }
            }
        };

        Ok(bundle::decode(&encoded))
    }

    /// One committed file, `None` when the realm reports it as missing.
    ///
    /// Both transfer modes agree: a negative size in chunked mode and a nil
    /// slice in single mode mean missing, while an empty file is `Some`.
    pub fn pull_file(&self, name: &str) -> Result<Option<Vec<u8>>> {
        match self.transfer {
            TransferMode::Single => {
                let expression = format!("Repository.Pull({})", go_quote(name.as_bytes()));
                response::decode_optional_bytes(&self.evaluate(&expression)?)
            }
            TransferMode::Chunked => {
                let source = RealmChunkSource {
                    client: self,
                    accessor: Accessor::File(name.to_string()),
                    resource: name.to_string(),
                };
                Ok(self.retrieve(&source)?.into_content())
            }
        }
    }

    fn retrieve(&self, source: &RealmChunkSource<'_, 'a, E>) -> Result<Retrieval> {
        self.retrieval.retrieve_parallel(source)
    }

    /// Broadcast a commit of `files` and return the program's output
    pub fn commit(&self, message: &str, files: &FileBundle) -> Result<String> {
        let program = commit_program(&self.realm_path, message, files)?;
        let raw = self.evaluator.broadcast(&program)?;
        Ok(response::extract_transaction_output(&raw))
    }

    /// Names of the realm's own source files
    pub fn list_source_files(&self) -> Result<Vec<String>> {
        let listing = self.evaluator.query_file(&self.realm_path)?;
        Ok(parse_source_listing(&listing))
    }

    /// Content of one realm source file
    pub fn source_file(&self, name: &str) -> Result<String> {
        let raw = self
            .evaluator
            .query_file(&format!("{}/{}", self.realm_path, name))?;
        Ok(strip_file_marker(&raw))
    }
}

enum Accessor {
    Bundle,
    File(String),
}

struct RealmChunkSource<'c, 'a, E: Evaluator + Sync + ?Sized> {
    client: &'c RealmClient<'a, E>,
    accessor: Accessor,
    resource: String,
}

impl<E: Evaluator + Sync + ?Sized> ChunkSource for RealmChunkSource<'_, '_, E> {
    fn resource(&self) -> &str {
        &self.resource
    }

    fn size(&self) -> Result<i64> {
        let expression = match &self.accessor {
            Accessor::Bundle => "Repository.SerializePullAllSize()".to_string(),
            Accessor::File(name) => format!("Repository.PullSize({})", go_quote(name.as_bytes())),
        };
        response::decode_integer(&self.client.evaluate(&expression)?)
    }

    fn chunk(&self, offset: u64, length: usize) -> Result<Vec<u8>> {
        let expression = match &self.accessor {
            Accessor::Bundle => format!("Repository.SerializePullAllChunk({offset}, {length})"),
            Accessor::File(name) => format!(
                "Repository.PullChunk({}, {offset}, {length})",
                go_quote(name.as_bytes())
            ),
        };
        response::decode_text(&self.client.evaluate(&expression)?)
    }
}

/// Quote bytes as a Gno string literal
pub fn go_quote(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    match std::str::from_utf8(bytes) {
        Ok(text) => text.chars().for_each(|c| push_quoted_char(&mut out, c)),
        Err(_) => {
            for &b in bytes {
                if b.is_ascii() {
                    push_quoted_char(&mut out, b as char);
                } else {
                    let _ = write!(out, "\\x{b:02x}");
                }
            }
        }
    }
    out.push('"');
    out
}

fn push_quoted_char(out: &mut String, c: char) {
    match c {
        '"' => out.push_str("\\\""),
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\t' => out.push_str("\\t"),
        '\r' => out.push_str("\\r"),
        c if c.is_control() && c.is_ascii() => {
            let _ = write!(out, "\\x{:02x}", c as u32);
        }
        c if c.is_control() => {
            let _ = write!(out, "\\u{:04x}", c as u32);
        }
        c => out.push(c),
    }
}

/// Gno program committing `files` to the realm's repository
pub fn commit_program(realm_path: &str, message: &str, files: &FileBundle) -> Result<String> {
    let alias = package_alias(realm_path)?;
    let encoded = bundle::encode(files);

    Ok(format!(
        r#"package main

import (
	"strings"

	{realm}
)

func unescape(s string) string {{
	var b strings.Builder
	pending := false
	for i := 0; i < len(s); i++ {{
		c := s[i]
		if pending {{
			pending = false
			switch c {{
			case 'n':
				b.WriteByte('\n')
			case '|', '\\':
				b.WriteByte(c)
			default:
				b.WriteByte('\\')
				b.WriteByte(c)
			}}
			continue
		}}
		if c == '\\' {{
			pending = true
			continue
		}}
		b.WriteByte(c)
	}}
	if pending {{
		b.WriteByte('\\')
	}}
	return b.String()
}}

func main() {{
	filesData := {files}
	files := make(map[string][]byte)
	for _, line := range strings.Split(filesData, "\n") {{
		if line == "" {{
			continue
		}}
		parts := strings.SplitN(line, "|", 2)
		if len(parts) == 2 {{
			files[parts[0]] = []byte(unescape(parts[1]))
		}}
	}}

	hash := {alias}.Repository.Commit({message}, files)
	println("Commit hash:", hash)
}}
"#,
        realm = go_quote(realm_path.as_bytes()),
        files = go_quote(encoded.as_bytes()),
        alias = alias,
        message = go_quote(message.as_bytes()),
    ))
}

/// File names from a `vm/qfile` package listing. The payload marker is
/// stripped first; other lines holding a `:` are metadata.
pub fn parse_source_listing(listing: &str) -> Vec<String> {
    listing
        .lines()
        .map(|line| line.strip_prefix(PAYLOAD_MARKER).unwrap_or(line))
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.contains(':'))
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty() && !name.contains(':'))
        .map(str::to_string)
        .collect()
}

/// File content from a `vm/qfile` response: everything after the payload
/// marker, including the lines that follow it.
pub fn strip_file_marker(raw: &str) -> String {
    let lines: Vec<&str> = raw.split('\n').collect();
    match lines.iter().position(|line| line.starts_with(PAYLOAD_MARKER)) {
        Some(i) => {
            let first = &lines[i][PAYLOAD_MARKER.len()..];
            let rest = lines[i + 1..].join("\n");
            if rest.is_empty() {
                first.to_string()
            } else {
                format!("{first}\n{rest}")
            }
        }
        None => raw.to_string(),
    }
}
