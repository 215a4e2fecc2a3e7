//! Access to the realm through the external evaluator binary.
//!
//! All realm interaction goes through [`Evaluator`], which returns the raw
//! text printed by the evaluator. [`GnokeyEvaluator`] implements it by
//! running `gnokey`; tests substitute an in-memory implementation.

use crate::core::config::ClientConfig;
use crate::core::error::{GnitError, Result};
use std::io::Write;
use std::process::{Command, Stdio};

/// Capability to query and mutate realm state
pub trait Evaluator {
    /// Evaluate a read-only expression (`<realm path>.<expr>`)
    fn evaluate(&self, expression: &str) -> Result<String>;

    /// Read a package file or directory listing by path
    fn query_file(&self, path: &str) -> Result<String>;

    /// Sign and broadcast a program that mutates realm state
    fn broadcast(&self, program: &str) -> Result<String>;
}

/// [`Evaluator`] backed by the `gnokey` command line tool
pub struct GnokeyEvaluator {
    config: ClientConfig,
}

impl GnokeyEvaluator {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Run the binary with captured stdout
    fn execute(&self, mut cmd: Command, what: &str) -> Result<String> {
        log::debug!("Running {} {}", self.config.gnokey_bin, what);

        let output = cmd.output().map_err(|e| {
            GnitError::evaluator(&self.config.gnokey_bin, format!("cannot start: {e}"))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => format!("{what} exited with {}", output.status),
                msg => format!("{what}: {msg}"),
            };
            return Err(GnitError::evaluator(&self.config.gnokey_bin, message));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        log::debug!("{what} returned {} bytes", stdout.len());
        Ok(stdout)
    }

    fn query(&self, route: &str, data: &str) -> Result<String> {
        let mut cmd = Command::new(&self.config.gnokey_bin);
        cmd.args(["query", route, "-data", data, "-remote", &self.config.remote]);
        self.execute(cmd, route)
    }
}

impl Evaluator for GnokeyEvaluator {
    fn evaluate(&self, expression: &str) -> Result<String> {
        self.query("vm/qeval", expression)
    }

    fn query_file(&self, path: &str) -> Result<String> {
        self.query("vm/qfile", path)
    }

    fn broadcast(&self, program: &str) -> Result<String> {
        let mut tx_file = tempfile::Builder::new()
            .prefix("gnit_tx")
            .suffix(".gno")
            .tempfile()?;
        tx_file.write_all(program.as_bytes())?;
        tx_file.flush()?;

        let mut cmd = Command::new(&self.config.gnokey_bin);
        cmd.args([
            "maketx",
            "run",
            "-gas-fee",
            &self.config.gas_fee,
            "-gas-wanted",
            &self.config.gas_wanted,
            "-broadcast",
            "-chainid",
            &self.config.chain_id,
            "-remote",
            &self.config.remote,
            &self.config.account,
        ])
        .arg(tx_file.path())
        // the key password prompt needs the terminal
        .stdin(Stdio::inherit())
        .stderr(Stdio::inherit());

        self.execute(cmd, "maketx run")
    }
}
