/*============================================================
  Synavera Project: Syn-Gather
  Module: syngather_core::locator
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Classify a build reference as a local directory tree or a
    remote build known to the build service.

  Security / Safety Notes:
    Performs read-only filesystem probes and read-only service
    lookups; nothing is downloaded or written here.

  Dependencies:
    std::fs for classification, the hub client for lookups.

  Operational Scope:
    Called once per build side by the orchestrator before any
    staging work begins.

  Revision History:
    2025-06-17 COD  Authored build reference classification.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Classification without side effects
    - Local check first, service lookup second
    - Unknown references reported, never guessed at
============================================================*/

use std::fs;
use std::path::{Path, PathBuf};

use crate::build_info::ResolvedBuild;
use crate::error::Result;
use crate::koji::BuildService;

/// Determine whether a build reference names a readable local directory.
pub fn is_local_build(reference: &str) -> bool {
    let path = Path::new(reference);
    match fs::metadata(path) {
        Ok(metadata) => metadata.is_dir() && fs::read_dir(path).is_ok(),
        Err(_) => false,
    }
}

/// Resolve a build reference.
///
/// A readable local directory wins; otherwise the build service is asked.
/// `Ok(None)` means the reference matches neither; the caller decides how
/// to report that.
pub async fn resolve<S: BuildService>(
    reference: &str,
    service: &S,
) -> Result<Option<ResolvedBuild>> {
    if is_local_build(reference) {
        return Ok(Some(ResolvedBuild::Local {
            root: PathBuf::from(reference),
        }));
    }

    Ok(service.lookup(reference).await?.map(ResolvedBuild::Remote))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use crate::build_info::RemoteBuild;
    use crate::error::Result;
    use crate::koji::BuildService;

    /// In-memory build service with a fixed set of known builds.
    #[derive(Default)]
    pub struct StaticService {
        builds: HashMap<String, RemoteBuild>,
    }

    impl StaticService {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&mut self, reference: &str, build: RemoteBuild) {
            self.builds.insert(reference.to_string(), build);
        }
    }

    impl BuildService for StaticService {
        async fn lookup(&self, reference: &str) -> Result<Option<RemoteBuild>> {
            Ok(self.builds.get(reference).cloned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StaticService;
    use super::*;
    use crate::build_info::{RemoteBuild, DEFAULT_VOLUME};

    #[test]
    fn existing_directory_is_local() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(is_local_build(dir.path().to_str().expect("utf8 path")));
    }

    #[test]
    fn plain_file_is_not_local() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("build.txt");
        std::fs::write(&file, b"not a tree").expect("write");
        assert!(!is_local_build(file.to_str().expect("utf8 path")));
    }

    #[tokio::test]
    async fn directory_reference_resolves_without_service_lookup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let service = StaticService::new();
        let resolved = resolve(dir.path().to_str().expect("utf8 path"), &service)
            .await
            .expect("resolve");
        assert!(matches!(resolved, Some(ResolvedBuild::Local { .. })));
    }

    #[tokio::test]
    async fn known_remote_reference_resolves_to_remote() {
        let mut service = StaticService::new();
        service.insert(
            "foo-1.0-2",
            RemoteBuild {
                name: "foo".into(),
                version: "1.0".into(),
                release: "2".into(),
                volume_name: DEFAULT_VOLUME.into(),
                artifacts: Vec::new(),
            },
        );

        let resolved = resolve("foo-1.0-2", &service).await.expect("resolve");
        assert!(matches!(resolved, Some(ResolvedBuild::Remote(_))));
    }

    #[tokio::test]
    async fn unknown_reference_resolves_to_none() {
        let service = StaticService::new();
        let resolved = resolve("ghost-1-1", &service).await.expect("resolve");
        assert!(resolved.is_none());
    }
}
