/*============================================================
  Synavera Project: Syn-Gather
  Module: syngather_core::build_info
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Shared structures describing the two build sides, resolved
    build metadata, and the artifacts a remote build carries.

  Security / Safety Notes:
    Pure data containers; no I/O performed in this module.

  Dependencies:
    serde for report serialization.

  Operational Scope:
    Used across locator, fetcher, and orchestrator modules to
    pass build identity without shared mutable state.

  Revision History:
    2025-06-17 COD  Introduced shared build data contracts.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Clear data contracts between modules
    - Service ordering preserved, never re-sorted
============================================================*/

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Volume name the build service reports for builds stored on its
/// primary volume; the download URL omits the volume segment for it.
pub const DEFAULT_VOLUME: &str = "DEFAULT";

/// The two builds being compared. Determines the workspace subtree a
/// staged artifact lands in and which index slots are populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildSide {
    Before,
    After,
}

impl BuildSide {
    /// Workspace subtree name for this side.
    pub fn dir_name(self) -> &'static str {
        match self {
            BuildSide::Before => "before",
            BuildSide::After => "after",
        }
    }
}

impl fmt::Display for BuildSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// One package file tracked by the build service for a remote build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArtifactRef {
    pub name: String,
    pub version: String,
    pub release: String,
    pub arch: String,
}

impl ArtifactRef {
    /// Canonical package filename used both by the download URL and the
    /// staged destination path.
    pub fn filename(&self) -> String {
        format!(
            "{}-{}-{}.{}.rpm",
            self.name, self.version, self.release, self.arch
        )
    }
}

/// Build metadata returned by the build service for a remote build.
/// Artifact ordering is the service's; it carries no implied sort.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RemoteBuild {
    pub name: String,
    pub version: String,
    pub release: String,
    pub volume_name: String,
    pub artifacts: Vec<ArtifactRef>,
}

impl RemoteBuild {
    /// `<name>-<version>` label used to name the workspace subdirectory.
    pub fn label(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    /// Whether this build lives on the service's primary volume.
    pub fn on_default_volume(&self) -> bool {
        self.volume_name == DEFAULT_VOLUME
    }
}

/// Outcome of classifying a build reference.
#[derive(Debug, Clone)]
pub enum ResolvedBuild {
    /// A directory tree on the local filesystem.
    Local { root: PathBuf },
    /// A build tracked by the remote build service.
    Remote(RemoteBuild),
}
