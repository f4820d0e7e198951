/*============================================================
  Synavera Project: Syn-Gather
  Module: syngather_core::error
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Centralise Syn-Gather-Core error types to provide consistent
    diagnostics and exit semantics across the acquisition run.

  Security / Safety Notes:
    Error contexts carry build references, staged paths, and
    download URLs only; no credentials are ever interpolated.

  Dependencies:
    thiserror for ergonomic error definitions.

  Operational Scope:
    Used across modules to propagate single-attempt failures and
    consolidate exit codes for the binary entry point.

  Revision History:
    2025-06-17 COD  Established shared error definitions.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit error taxonomy with actionable context
    - No silent failure paths, no automatic retries
    - Stable exit codes for operational tooling
============================================================*/

use std::io;
use std::process::ExitCode;

use thiserror::Error;

use crate::build_info::BuildSide;

/// Result alias for Syn-Gather-Core operations.
pub type Result<T> = std::result::Result<T, SyngatherError>;

/// Enumerates high-level error domains surfaced by Syn-Gather-Core.
#[derive(Debug, Error)]
pub enum SyngatherError {
    #[error("Unable to find {side} build `{reference}` as a local directory or in the build service")]
    Resolution { side: BuildSide, reference: String },
    /// Staging space could not be created. There is no safe continuation
    /// without a workspace; callers are expected to terminate the run.
    #[error("Workspace: {0}")]
    Workspace(String),
    #[error("Transfer ({side}): {detail}")]
    Transfer { side: BuildSide, detail: String },
    #[error("Header extraction for {path}: {detail}")]
    Header { path: String, detail: String },
    #[error("Required command `{command}` not found in PATH")]
    CommandMissing { command: String },
    #[error("Command `{command}` failed with status {status}: {stderr}")]
    CommandFailure {
        command: String,
        status: i32,
        stderr: String,
    },
    #[error("Configuration: {0}")]
    Config(String),
    #[error("Network: {0}")]
    Network(String),
    #[error("Serialization: {0}")]
    Serialization(String),
    #[error("Filesystem: {0}")]
    Filesystem(String),
    #[error("Runtime: {0}")]
    Runtime(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl SyngatherError {
    /// Map error category to a deterministic exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            SyngatherError::CommandMissing { .. } => ExitCode::from(10),
            SyngatherError::CommandFailure { .. } => ExitCode::from(11),
            SyngatherError::Config(_) => ExitCode::from(20),
            SyngatherError::Resolution { .. } => ExitCode::from(21),
            SyngatherError::Network(_) => ExitCode::from(30),
            SyngatherError::Serialization(_) => ExitCode::from(31),
            SyngatherError::Transfer { .. } => ExitCode::from(32),
            SyngatherError::Filesystem(_) => ExitCode::from(40),
            SyngatherError::Io(_) => ExitCode::from(41),
            SyngatherError::Header { .. } => ExitCode::from(42),
            SyngatherError::Runtime(_) => ExitCode::from(50),
            SyngatherError::Workspace(_) => ExitCode::from(60),
        }
    }
}
