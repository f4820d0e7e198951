/*============================================================
  Synavera Project: Syn-Gather
  Module: syngather_core::workspace
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Own the lifecycle of the uniquely-named staging directory
    one acquisition run materializes builds into.

  Security / Safety Notes:
    Created directories are owner-writable only; group and
    other receive read and execute.

  Dependencies:
    tempfile for atomic unique directory creation.

  Operational Scope:
    The subdirectory is created once per run and is read-only
    state afterwards; cleanup is the operator's decision.

  Revision History:
    2025-06-17 COD  Authored workspace lifecycle management.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Exactly-once creation, idempotent reuse
    - Creation failure is fatal and reported as such
    - No hidden global state; the workspace is passed explicitly
============================================================*/

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::build_info::RemoteBuild;
use crate::error::{Result, SyngatherError};

const DIR_MODE: u32 = 0o755;

/// Create a directory and any missing parents with the workspace mode.
pub(crate) fn create_dir_tree(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(DIR_MODE).create(path)
}

/// Staging area for one acquisition run.
///
/// The run's subdirectory is `<root>/<label>.<random>` where the label is
/// `local` for a purely local run or `<name>-<version>` of the remote
/// build that determined it.
pub struct Workspace {
    root: PathBuf,
    subdir: Option<PathBuf>,
}

impl Workspace {
    pub fn new(root: PathBuf) -> Self {
        Self { root, subdir: None }
    }

    /// The run's subdirectory, if it has been created.
    pub fn subdir(&self) -> Option<&Path> {
        self.subdir.as_deref()
    }

    /// Create the run's subdirectory on first use and return it.
    ///
    /// Later calls return the same path regardless of arguments; the
    /// first build to be staged names the workspace.
    pub fn ensure_subdir(&mut self, build: Option<&RemoteBuild>) -> Result<&Path> {
        match self.subdir {
            Some(ref path) => Ok(path),
            None => {
                let label = match build {
                    Some(build) => build.label(),
                    None => "local".to_string(),
                };
                let path = self.create_subdir(&label)?;
                Ok(self.subdir.insert(path))
            }
        }
    }

    fn create_subdir(&self, label: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.root).map_err(|err| {
            SyngatherError::Workspace(format!(
                "Unable to create staging root {}: {err}",
                self.root.display()
            ))
        })?;

        let dir = tempfile::Builder::new()
            .prefix(&format!("{label}."))
            .tempdir_in(&self.root)
            .map_err(|err| {
                SyngatherError::Workspace(format!(
                    "Unable to create work subdirectory under {}: {err}",
                    self.root.display()
                ))
            })?;
        let path = dir.keep();

        fs::set_permissions(&path, fs::Permissions::from_mode(DIR_MODE)).map_err(|err| {
            SyngatherError::Workspace(format!(
                "Unable to set permissions on {}: {err}",
                path.display()
            ))
        })?;

        Ok(path)
    }
}
