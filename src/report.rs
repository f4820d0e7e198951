/*============================================================
  Synavera Project: Syn-Gather
  Module: syngather_core::report
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Describe a completed acquisition as a JSON document so the
    staged workspace is self-describing for downstream stages.

  Security / Safety Notes:
    Report data is written to operator-controlled paths; no
    privileged operations are performed.

  Dependencies:
    serde for JSON serialization.

  Operational Scope:
    Consumed by inspection tooling and operators deciding
    whether to keep or discard a workspace.

  Revision History:
    2025-06-17 COD  Authored staging report builder.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Deterministic ordering for reproducible reports
    - Explicit side attribution for each package
    - Rich metadata for audit and observability
============================================================*/

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::build_info::BuildSide;
use crate::error::{Result, SyngatherError};
use crate::peers::{PeerEntry, PeerIndex};

/// Wrapper representing the full staging report.
#[derive(Debug, Serialize)]
pub struct StagingReport {
    pub metadata: ReportMetadata,
    pub after: SideReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<SideReport>,
}

/// Metadata block describing the acquisition run.
#[derive(Debug, Serialize)]
pub struct ReportMetadata {
    pub generated_at: String,
    pub generated_by: String,
    pub workspace: String,
    pub after_build: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_build: Option<String>,
    pub packages_after: usize,
    pub packages_before: usize,
}

/// Per-side package inventory in deterministic order.
#[derive(Debug, Serialize)]
pub struct SideReport {
    pub packages: BTreeMap<String, PeerEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_package: Option<PeerEntry>,
}

/// Build a report from the completed peer index.
pub fn build_report(
    after_ref: &str,
    before_ref: Option<&str>,
    workspace_subdir: &Path,
    peers: &PeerIndex,
) -> StagingReport {
    let after = side_report(peers, BuildSide::After);
    let before = before_ref.map(|_| side_report(peers, BuildSide::Before));

    let metadata = ReportMetadata {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        generated_by: "syngather_core".to_string(),
        workspace: workspace_subdir.display().to_string(),
        after_build: after_ref.to_string(),
        before_build: before_ref.map(str::to_string),
        packages_after: peers.indexed_count(BuildSide::After),
        packages_before: peers.indexed_count(BuildSide::Before),
    };

    StagingReport {
        metadata,
        after,
        before,
    }
}

fn side_report(peers: &PeerIndex, side: BuildSide) -> SideReport {
    let packages = peers
        .peers(side)
        .iter()
        .map(|(key, entry)| (format!("{}.{}", key.name, key.arch), entry.clone()))
        .collect();

    SideReport {
        packages,
        source_package: peers.source(side).cloned(),
    }
}

/// Persist the report to the given path.
pub fn write_report(report: &StagingReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| {
            SyngatherError::Filesystem(format!(
                "Failed to create report directory {}: {err}",
                parent.display()
            ))
        })?;
    }
    let file = File::create(path).map_err(|err| {
        SyngatherError::Filesystem(format!(
            "Failed to create report file {}: {err}",
            path.display()
        ))
    })?;
    serde_json::to_writer_pretty(file, report).map_err(|err| {
        SyngatherError::Serialization(format!(
            "Failed to write report {}: {err}",
            path.display()
        ))
    })?;
    Ok(())
}
