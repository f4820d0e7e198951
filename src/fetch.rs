/*============================================================
  Synavera Project: Syn-Gather
  Module: syngather_core::fetch
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Download every artifact of a remote build into the
    workspace, reproducing the service's per-arch layout.

  Security / Safety Notes:
    Performs HTTPS GET requests against the configured download
    base only; destination paths are composed, never trusted
    from the response.

  Dependencies:
    reqwest for HTTP, tokio::fs for streamed writes.

  Operational Scope:
    Invoked once per remote build side. Downloads are sequential
    in service order; the first failure aborts the side.

  Revision History:
    2025-06-17 COD  Authored remote artifact fetcher.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Single-attempt transfers with bounded timeouts
    - Canonical URL composition, volume sentinel honored
    - Package headers indexed as artifacts land
============================================================*/

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::build_info::{ArtifactRef, BuildSide, RemoteBuild};
use crate::error::{Result, SyngatherError};
use crate::header::HeaderReader;
use crate::logger::Logger;
use crate::peers::PeerIndex;
use crate::workspace::create_dir_tree;

/// Compose the canonical download URL for one artifact of a build.
///
/// The volume path segment appears only when the build's volume differs
/// from the service's default sentinel.
pub fn compose_artifact_url(
    download_base: &str,
    build: &RemoteBuild,
    artifact: &ArtifactRef,
) -> String {
    let base = download_base.trim_end_matches('/');
    let tail = format!(
        "packages/{}/{}/{}/{}/{}",
        build.name,
        build.version,
        build.release,
        artifact.arch,
        artifact.filename()
    );

    if build.on_default_volume() {
        format!("{base}/{tail}")
    } else {
        format!("{base}/{}/{tail}", build.volume_name)
    }
}

/// Download every artifact of `build` into the workspace subtree for
/// `side`, in service order.
///
/// Each artifact lands at `<subdir>/<side>/<arch>/<filename>`, overwriting
/// any previous file of the same name, and its header is filed into the
/// peer index. Returns the staged paths in download order.
pub async fn fetch_build<H: HeaderReader>(
    side: BuildSide,
    build: &RemoteBuild,
    subdir: &Path,
    download_base: &str,
    client: &reqwest::Client,
    reader: &H,
    peers: &mut PeerIndex,
    logger: &Logger,
) -> Result<Vec<PathBuf>> {
    let mut staged = Vec::new();

    for artifact in &build.artifacts {
        let arch_dir = subdir.join(side.dir_name()).join(&artifact.arch);
        create_dir_tree(&arch_dir).map_err(|err| transfer(side, format!(
            "Failed to create directory {}: {err}",
            arch_dir.display()
        )))?;

        let url = compose_artifact_url(download_base, build, artifact);
        let dest = arch_dir.join(artifact.filename());
        logger.info("FETCH", format!("Downloading {url}"));
        download(client, &url, &dest, side).await?;

        let header = reader.read_header(&dest)?;
        peers.record(side, &dest, header);
        staged.push(dest);
    }

    logger.info(
        "FETCH",
        format!("Fetched {} artifacts for the {side} build", staged.len()),
    );

    Ok(staged)
}

async fn download(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    side: BuildSide,
) -> Result<()> {
    let mut response = client.get(url).send().await.map_err(|err| {
        transfer(side, format!("Download of {url} failed: {err}"))
    })?;

    if !response.status().is_success() {
        return Err(transfer(
            side,
            format!("Download of {url} failed with status {}", response.status()),
        ));
    }

    let mut file = tokio::fs::File::create(dest).await.map_err(|err| {
        transfer(side, format!("Failed to create {}: {err}", dest.display()))
    })?;
    while let Some(chunk) = response.chunk().await.map_err(|err| {
        transfer(side, format!("Download of {url} interrupted: {err}"))
    })? {
        file.write_all(&chunk).await.map_err(|err| {
            transfer(side, format!("Failed to write {}: {err}", dest.display()))
        })?;
    }
    file.flush().await.map_err(|err| {
        transfer(side, format!("Failed to flush {}: {err}", dest.display()))
    })?;

    Ok(())
}

fn transfer(side: BuildSide, detail: String) -> SyngatherError {
    SyngatherError::Transfer { side, detail }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;
    use crate::build_info::DEFAULT_VOLUME;
    use crate::header::testing::{HeaderBuilder, MockHeaderReader};
    use crate::peers::PeerKey;

    fn two_arch_build(volume: &str) -> RemoteBuild {
        RemoteBuild {
            name: "foo".into(),
            version: "1.0".into(),
            release: "2".into(),
            volume_name: volume.into(),
            artifacts: vec![
                ArtifactRef {
                    name: "foo".into(),
                    version: "1.0".into(),
                    release: "2".into(),
                    arch: "x86_64".into(),
                },
                ArtifactRef {
                    name: "foo".into(),
                    version: "1.0".into(),
                    release: "2".into(),
                    arch: "src".into(),
                },
            ],
        }
    }

    fn quiet_logger() -> Logger {
        Logger::new(None, false).expect("logger")
    }

    #[test]
    fn default_volume_url_has_no_volume_segment() {
        let build = two_arch_build(DEFAULT_VOLUME);
        let url = compose_artifact_url("https://dl.example.org/", &build, &build.artifacts[0]);
        assert_eq!(
            url,
            "https://dl.example.org/packages/foo/1.0/2/x86_64/foo-1.0-2.x86_64.rpm"
        );
    }

    #[test]
    fn named_volume_is_inserted_before_packages() {
        let build = two_arch_build("archive02");
        let url = compose_artifact_url("https://dl.example.org", &build, &build.artifacts[1]);
        assert_eq!(
            url,
            "https://dl.example.org/archive02/packages/foo/1.0/2/src/foo-1.0-2.src.rpm"
        );
    }

    #[tokio::test]
    async fn fetches_all_artifacts_into_arch_subdirectories() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/packages/foo/1.0/2/x86_64/foo-1.0-2.x86_64.rpm");
                then.status(200).body("binary artifact bytes");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/packages/foo/1.0/2/src/foo-1.0-2.src.rpm");
                then.status(200).body("source artifact bytes");
            })
            .await;

        let mut reader = MockHeaderReader::new();
        reader.insert(
            "foo-1.0-2.x86_64.rpm",
            HeaderBuilder::new("foo", "1.0", "2", "x86_64").build(),
        );
        reader.insert(
            "foo-1.0-2.src.rpm",
            HeaderBuilder::new("foo", "1.0", "2", "src").source().build(),
        );

        let workspace = tempfile::tempdir().expect("workspace");
        let build = two_arch_build(DEFAULT_VOLUME);
        let mut peers = PeerIndex::new();
        let staged = fetch_build(
            BuildSide::After,
            &build,
            workspace.path(),
            &server.base_url(),
            &reqwest::Client::new(),
            &reader,
            &mut peers,
            &quiet_logger(),
        )
        .await
        .expect("fetch");

        assert_eq!(
            staged,
            vec![
                workspace.path().join("after/x86_64/foo-1.0-2.x86_64.rpm"),
                workspace.path().join("after/src/foo-1.0-2.src.rpm"),
            ]
        );
        assert_eq!(
            std::fs::read(&staged[0]).expect("read"),
            b"binary artifact bytes"
        );

        let key = PeerKey {
            name: "foo".into(),
            arch: "x86_64".into(),
        };
        assert!(peers.peers(BuildSide::After).contains_key(&key));
        let source = peers.source(BuildSide::After).expect("source slot");
        assert_eq!(source.header.arch, "src");
        assert_eq!(peers.peers(BuildSide::After).len(), 1);
    }

    #[tokio::test]
    async fn missing_artifact_aborts_remaining_downloads() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/packages/foo/1.0/2/x86_64/foo-1.0-2.x86_64.rpm");
                then.status(404);
            })
            .await;

        let mut reader = MockHeaderReader::new();
        reader.insert(
            "foo-1.0-2.x86_64.rpm",
            HeaderBuilder::new("foo", "1.0", "2", "x86_64").build(),
        );

        let workspace = tempfile::tempdir().expect("workspace");
        let build = two_arch_build(DEFAULT_VOLUME);
        let mut peers = PeerIndex::new();
        let err = fetch_build(
            BuildSide::Before,
            &build,
            workspace.path(),
            &server.base_url(),
            &reqwest::Client::new(),
            &reader,
            &mut peers,
            &quiet_logger(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            SyngatherError::Transfer {
                side: BuildSide::Before,
                ..
            }
        ));
        assert!(!workspace
            .path()
            .join("before/src/foo-1.0-2.src.rpm")
            .exists());
        assert_eq!(peers.indexed_count(BuildSide::Before), 0);
    }

    #[tokio::test]
    async fn existing_destination_is_overwritten() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/packages/foo/1.0/2/x86_64/foo-1.0-2.x86_64.rpm");
                then.status(200).body("fresh bytes");
            })
            .await;

        let mut reader = MockHeaderReader::new();
        reader.insert(
            "foo-1.0-2.x86_64.rpm",
            HeaderBuilder::new("foo", "1.0", "2", "x86_64").build(),
        );

        let workspace = tempfile::tempdir().expect("workspace");
        let mut build = two_arch_build(DEFAULT_VOLUME);
        build.artifacts.truncate(1);
        let dest = workspace.path().join("after/x86_64/foo-1.0-2.x86_64.rpm");
        std::fs::create_dir_all(dest.parent().expect("parent")).expect("mkdir");
        std::fs::write(&dest, b"stale bytes from an earlier run").expect("write");

        let mut peers = PeerIndex::new();
        fetch_build(
            BuildSide::After,
            &build,
            workspace.path(),
            &server.base_url(),
            &reqwest::Client::new(),
            &reader,
            &mut peers,
            &quiet_logger(),
        )
        .await
        .expect("fetch");

        assert_eq!(std::fs::read(&dest).expect("read"), b"fresh bytes");
    }
}
