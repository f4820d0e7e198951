/*============================================================
  Synavera Project: Syn-Gather
  Module: syngather_core::gather
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Sequence build acquisition: resolve each side, materialize
    it into the shared workspace, and index its packages.

  Security / Safety Notes:
    Operates within user privileges; all network access goes
    through the configured service endpoints.

  Dependencies:
    reqwest for the download client; collaborator seams for
    lookups and header introspection.

  Operational Scope:
    One gatherer per acquisition run. The after side is staged
    first so the workspace label reflects the build under
    inspection; the first failure aborts the run.

  Revision History:
    2025-06-17 COD  Authored acquisition orchestrator.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit run state, no module-level side flags
    - Strictly sequential sides, no rollback on failure
    - Resolution failures distinct from transfer failures
============================================================*/

use std::time::Duration;

use crate::build_info::{BuildSide, ResolvedBuild};
use crate::config::SyngatherConfig;
use crate::error::{Result, SyngatherError};
use crate::fetch::fetch_build;
use crate::header::HeaderReader;
use crate::koji::BuildService;
use crate::locator::resolve;
use crate::logger::Logger;
use crate::peers::PeerIndex;
use crate::sync::synchronize;
use crate::workspace::Workspace;

/// Drives one acquisition run over a shared workspace.
///
/// Collaborators are borrowed seams so the run can be exercised against
/// in-memory services; the workspace and peer index are owned and read
/// out by the caller once `gather` returns.
pub struct Gatherer<'a, S, H> {
    config: &'a SyngatherConfig,
    service: &'a S,
    reader: &'a H,
    logger: &'a Logger,
    client: reqwest::Client,
    pub workspace: Workspace,
    pub peers: PeerIndex,
}

impl<'a, S: BuildService, H: HeaderReader> Gatherer<'a, S, H> {
    pub fn new(
        config: &'a SyngatherConfig,
        service: &'a S,
        reader: &'a H,
        logger: &'a Logger,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.koji.timeout))
            .user_agent("Syn-Gather-Core/0.4 (linux)")
            .build()
            .map_err(|err| SyngatherError::Network(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            config,
            service,
            reader,
            logger,
            client,
            workspace: Workspace::new(config.workdir.clone()),
            peers: PeerIndex::new(),
        })
    }

    /// Acquire the after build, then the before build when one is given.
    pub async fn gather(&mut self, after: &str, before: Option<&str>) -> Result<()> {
        self.stage_side(BuildSide::After, after).await?;

        match before {
            Some(reference) => self.stage_side(BuildSide::Before, reference).await?,
            None => self
                .logger
                .info("GATHER", "No before build specified; single-sided run"),
        }

        Ok(())
    }

    async fn stage_side(&mut self, side: BuildSide, reference: &str) -> Result<()> {
        let resolved = resolve(reference, self.service)
            .await?
            .ok_or_else(|| SyngatherError::Resolution {
                side,
                reference: reference.to_string(),
            })?;

        match resolved {
            ResolvedBuild::Local { root } => {
                self.logger.info(
                    "GATHER",
                    format!("Staging local {side} build from {}", root.display()),
                );
                let subdir = self.workspace.ensure_subdir(None)?.to_path_buf();
                synchronize(side, &root, &subdir, self.reader, &mut self.peers, self.logger)?;
            }
            ResolvedBuild::Remote(build) => {
                self.logger.info(
                    "GATHER",
                    format!("Staging remote {side} build {}", build.label()),
                );
                let subdir = self.workspace.ensure_subdir(Some(&build))?.to_path_buf();
                fetch_build(
                    side,
                    &build,
                    &subdir,
                    &self.config.koji.download_url,
                    &self.client,
                    self.reader,
                    &mut self.peers,
                    self.logger,
                )
                .await?;
            }
        }

        self.logger.info(
            "GATHER",
            format!(
                "Indexed {} packages for the {side} build",
                self.peers.indexed_count(side)
            ),
        );

        Ok(())
    }
}
