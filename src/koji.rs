/*============================================================
  Synavera Project: Syn-Gather
  Module: syngather_core::koji
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Query the build service for build metadata so remote build
    references can be resolved into artifact lists.

  Security / Safety Notes:
    Performs read-only HTTPS requests to the configured hub.
    No credentials are transmitted.

  Dependencies:
    reqwest for HTTP, serde for response parsing.

  Operational Scope:
    Supplies resolved build metadata to the locator; artifact
    downloads happen elsewhere and never through this client.

  Revision History:
    2025-06-17 COD  Implemented asynchronous hub client.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Single-attempt lookups with bounded timeouts
    - Structured response parsing with explicit error paths
    - Not-found kept distinct from transport failure
============================================================*/

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use urlencoding::encode;

use crate::build_info::{ArtifactRef, RemoteBuild, DEFAULT_VOLUME};
use crate::config::KojiConfig;
use crate::error::{Result, SyngatherError};

/// Read-only build metadata lookups. The production implementation talks
/// to the hub over HTTP; tests substitute an in-memory service.
pub trait BuildService {
    /// Look up a build by reference. `Ok(None)` means the service does
    /// not know the build; transport problems are errors.
    fn lookup(
        &self,
        reference: &str,
    ) -> impl std::future::Future<Output = Result<Option<RemoteBuild>>> + Send;
}

/// Client for the build service hub API.
#[derive(Clone)]
pub struct KojiClient {
    client: reqwest::Client,
    hub_url: String,
}

impl KojiClient {
    /// Construct a new client from configuration.
    pub fn new(config: &KojiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent("Syn-Gather-Core/0.4 (linux)")
            .build()
            .map_err(|err| SyngatherError::Network(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            hub_url: config.hub_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_url(&self, reference: &str) -> String {
        format!("{}/builds/{}", self.hub_url, encode(reference))
    }
}

impl BuildService for KojiClient {
    async fn lookup(&self, reference: &str) -> Result<Option<RemoteBuild>> {
        let url = self.build_url(reference);
        let response = self.client.get(&url).send().await.map_err(|err| {
            SyngatherError::Network(format!("Hub request to {url} failed: {err}"))
        })?;

        match response.status() {
            StatusCode::OK => {
                let document = response.json::<BuildDocument>().await.map_err(|err| {
                    SyngatherError::Serialization(format!("Failed to decode hub response: {err}"))
                })?;
                Ok(Some(document.into_build()))
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(SyngatherError::Network(format!(
                "Hub request {url} failed with status {status}"
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BuildDocument {
    #[serde(rename = "package_name")]
    name: String,
    version: String,
    release: String,
    #[serde(default = "default_volume")]
    volume_name: String,
    #[serde(default)]
    rpms: Vec<RpmDocument>,
}

#[derive(Debug, Deserialize)]
struct RpmDocument {
    name: String,
    version: String,
    release: String,
    arch: String,
}

fn default_volume() -> String {
    DEFAULT_VOLUME.to_string()
}

impl BuildDocument {
    fn into_build(self) -> RemoteBuild {
        let artifacts = self
            .rpms
            .into_iter()
            .map(|rpm| ArtifactRef {
                name: rpm.name,
                version: rpm.version,
                release: rpm.release,
                arch: rpm.arch,
            })
            .collect();

        RemoteBuild {
            name: self.name,
            version: self.version,
            release: self.release,
            volume_name: self.volume_name,
            artifacts,
        }
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    fn client_for(server: &MockServer) -> KojiClient {
        KojiClient::new(&KojiConfig {
            hub_url: server.base_url(),
            download_url: server.base_url(),
            timeout: 5,
        })
        .expect("client")
    }

    #[tokio::test]
    async fn known_build_resolves_with_artifact_order_preserved() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/builds/foo-1.0-2");
                then.status(200).json_body(serde_json::json!({
                    "package_name": "foo",
                    "version": "1.0",
                    "release": "2",
                    "volume_name": "DEFAULT",
                    "rpms": [
                        {"name": "foo", "version": "1.0", "release": "2", "arch": "x86_64"},
                        {"name": "foo", "version": "1.0", "release": "2", "arch": "src"}
                    ]
                }));
            })
            .await;

        let build = client_for(&server)
            .lookup("foo-1.0-2")
            .await
            .expect("lookup")
            .expect("build");
        assert_eq!(build.name, "foo");
        assert_eq!(build.volume_name, DEFAULT_VOLUME);
        let arches: Vec<&str> = build.artifacts.iter().map(|a| a.arch.as_str()).collect();
        assert_eq!(arches, vec!["x86_64", "src"]);
    }

    #[tokio::test]
    async fn unknown_build_is_none_not_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/builds/ghost-1-1");
                then.status(404);
            })
            .await;

        let resolved = client_for(&server).lookup("ghost-1-1").await.expect("lookup");
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn server_failure_is_a_network_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/builds/foo-1.0-2");
                then.status(503);
            })
            .await;

        let err = client_for(&server).lookup("foo-1.0-2").await.unwrap_err();
        assert!(matches!(err, SyngatherError::Network(_)));
    }
}
