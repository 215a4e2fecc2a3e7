//! In-memory realm used in place of the evaluator binary
//!
//! [`FakeRealm`] answers the repository expressions the client sends and
//! applies broadcast commits to its own file set, so workflows can run
//! end to end without a node.

#![allow(dead_code)]

use gnit::core::bundle::{self, FileBundle};
use gnit::core::config::{ClientConfig, TransferMode};
use gnit::core::error::{GnitError, Result};
use gnit::core::evaluator::Evaluator;
use gnit::core::realm::go_quote;
use gnit::core::response::{self, Literal};
use std::collections::BTreeMap;
use std::sync::Mutex;

pub struct FakeRealm {
    realm_path: String,
    files: Mutex<FileBundle>,
    sources: BTreeMap<String, String>,
    broadcasts: Mutex<Vec<String>>,
    reachable: bool,
    reject_commits: bool,
}

impl FakeRealm {
    pub fn new(realm_path: &str) -> Self {
        Self {
            realm_path: realm_path.to_string(),
            files: Mutex::new(FileBundle::new()),
            sources: BTreeMap::new(),
            broadcasts: Mutex::new(Vec::new()),
            reachable: true,
            reject_commits: false,
        }
    }

    /// Realm that fails every request, like a node that is down
    pub fn unreachable(realm_path: &str) -> Self {
        Self {
            reachable: false,
            ..Self::new(realm_path)
        }
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), content.as_bytes().to_vec());
        self
    }

    pub fn with_source(mut self, name: &str, content: &str) -> Self {
        self.sources.insert(name.to_string(), content.to_string());
        self
    }

    pub fn rejecting_commits(mut self) -> Self {
        self.reject_commits = true;
        self
    }

    pub fn files(&self) -> FileBundle {
        self.files.lock().unwrap().clone()
    }

    pub fn broadcasts(&self) -> Vec<String> {
        self.broadcasts.lock().unwrap().clone()
    }

    fn check_reachable(&self) -> Result<()> {
        if self.reachable {
            Ok(())
        } else {
            Err(GnitError::evaluator("fake-gnokey", "connection refused"))
        }
    }

    fn answer(&self, call: &str) -> Result<String> {
        let files = self.files.lock().unwrap();
        let encoded = bundle::encode(&files).into_bytes();
        let (name, args) = split_call(call)?;

        let payload = match name {
            "ListFiles" => {
                let names: Vec<String> = files.keys().map(|k| go_quote(k.as_bytes())).collect();
                format!("(slice[{}] []string)", names.join(","))
            }
            "SerializePullAll" => hex_slice(&encoded),
            "SerializePullAllSize" => integer(encoded.len() as i64),
            "SerializePullAllChunk" => {
                let (offset, length) = window(&args, 0)?;
                text(slice_at(&encoded, offset, length))
            }
            "Pull" => match files.get(&unquote(&args[0])) {
                Some(content) => hex_slice(content),
                None => "(nil []uint8)".to_string(),
            },
            "PullSize" => match files.get(&unquote(&args[0])) {
                Some(content) => integer(content.len() as i64),
                None => integer(-1),
            },
            "PullChunk" => {
                let content = files
                    .get(&unquote(&args[0]))
                    .ok_or_else(|| GnitError::evaluator("fake-gnokey", "no such file"))?;
                let (offset, length) = window(&args, 1)?;
                text(slice_at(content, offset, length))
            }
            other => {
                return Err(GnitError::evaluator(
                    "fake-gnokey",
                    format!("unknown function {other}"),
                ))
            }
        };

        Ok(format!("height: 0\ndata: {payload}\n"))
    }

    /// Apply the bundle embedded in a commit program
    fn apply_commit(&self, program: &str) -> Result<usize> {
        let quoted = program
            .lines()
            .find_map(|line| line.trim().strip_prefix("filesData := "))
            .ok_or_else(|| GnitError::evaluator("fake-gnokey", "program has no files"))?;

        let encoded = match response::recognize(&format!("({quoted} string)"))? {
            Literal::Text(bytes) => bytes,
            other => {
                return Err(GnitError::evaluator(
                    "fake-gnokey",
                    format!("unexpected {}", other.kind()),
                ))
            }
        };

        let committed = bundle::decode(&encoded);
        let count = committed.len();
        self.files.lock().unwrap().extend(committed);
        Ok(count)
    }
}

impl Evaluator for FakeRealm {
    fn evaluate(&self, expression: &str) -> Result<String> {
        self.check_reachable()?;
        let call = expression
            .strip_prefix(&format!("{}.Repository.", self.realm_path))
            .ok_or_else(|| {
                GnitError::evaluator("fake-gnokey", format!("unknown realm in {expression}"))
            })?;
        self.answer(call)
    }

    fn query_file(&self, path: &str) -> Result<String> {
        self.check_reachable()?;
        if path == self.realm_path {
            let names: Vec<&str> = self.sources.keys().map(String::as_str).collect();
            return Ok(format!("height: 0\ndata: {}\n", names.join(",")));
        }

        let name = path
            .strip_prefix(&format!("{}/", self.realm_path))
            .ok_or_else(|| GnitError::evaluator("fake-gnokey", format!("unknown package {path}")))?;
        self.sources
            .get(name)
            .map(|content| format!("height: 0\ndata: {content}"))
            .ok_or_else(|| GnitError::evaluator("fake-gnokey", format!("no file {name}")))
    }

    fn broadcast(&self, program: &str) -> Result<String> {
        self.check_reachable()?;
        self.broadcasts.lock().unwrap().push(program.to_string());
        if self.reject_commits {
            return Err(GnitError::evaluator("fake-gnokey", "insufficient funds"));
        }

        let count = self.apply_commit(program)?;
        Ok(format!(
            "\nCommit hash: fake{count:04}\nOK!\nGAS WANTED: 5000000000\nGAS USED: 1234\n"
        ))
    }
}

/// Client settings with chunks small enough to split every test file
pub fn small_chunk_config() -> ClientConfig {
    ClientConfig {
        chunk_size: 8,
        chunk_workers: 3,
        ..ClientConfig::default()
    }
}

pub fn single_transfer_config() -> ClientConfig {
    ClientConfig {
        transfer: TransferMode::Single,
        ..ClientConfig::default()
    }
}

fn split_call(call: &str) -> Result<(&str, Vec<String>)> {
    let (name, rest) = call
        .split_once('(')
        .ok_or_else(|| GnitError::evaluator("fake-gnokey", format!("not a call: {call}")))?;
    let inner = rest.strip_suffix(')').unwrap_or(rest);
    let args = if inner.is_empty() {
        Vec::new()
    } else {
        inner.split(", ").map(str::to_string).collect()
    };
    Ok((name, args))
}

fn window(args: &[String], first: usize) -> Result<(usize, usize)> {
    let parse = |i: usize| {
        args.get(i)
            .and_then(|a| a.parse::<usize>().ok())
            .ok_or_else(|| GnitError::evaluator("fake-gnokey", "bad chunk window"))
    };
    Ok((parse(first)?, parse(first + 1)?))
}

fn slice_at(bytes: &[u8], offset: usize, length: usize) -> &[u8] {
    let start = offset.min(bytes.len());
    let end = offset.saturating_add(length).min(bytes.len());
    &bytes[start..end]
}

fn unquote(arg: &str) -> String {
    arg.trim_matches('"').to_string()
}

fn hex_slice(bytes: &[u8]) -> String {
    format!("(slice[0x{}] []uint8)", hex::encode(bytes))
}

fn integer(value: i64) -> String {
    format!("({value} int)")
}

fn text(bytes: &[u8]) -> String {
    format!("({} string)", go_quote(bytes))
}
