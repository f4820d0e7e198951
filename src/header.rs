/*============================================================
  Synavera Project: Syn-Gather
  Module: syngather_core::header
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Extract package header metadata from staged package files
    via the system rpm query tooling.

  Security / Safety Notes:
    Executes the rpm binary with user privileges only and with
    signature checking disabled; package payloads are never
    unpacked by this module.

  Dependencies:
    std::process for command execution, serde for report
    serialization of extracted values.

  Operational Scope:
    Supplies the peer index with owned header values; the rpm
    process never outlives a single extraction call.

  Revision History:
    2025-06-17 COD  Crafted rpm header introspection layer.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Deterministic command invocation with explicit checks
    - Structured parsing with clear failure modes
    - Collaborator seam kept mockable for test harnesses
============================================================*/

use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use serde::Serialize;

use crate::error::{Result, SyngatherError};

/// Tag values carried alongside the packaging identity. These are the
/// fields downstream inspections read from staged builds.
const CARRIED_TAGS: [&str; 5] = ["LICENSE", "VENDOR", "BUILDHOST", "SUMMARY", "DESCRIPTION"];

/// Query format handed to `rpm -qp`: four identity lines, the source
/// flag, then one `TAG=value` line per carried tag.
const QUERY_FORMAT: &str = "%{NAME}\\n%{VERSION}\\n%{RELEASE}\\n%{ARCH}\\n%{SOURCEPACKAGE}\\nLICENSE=%{LICENSE}\\nVENDOR=%{VENDOR}\\nBUILDHOST=%{BUILDHOST}\\nSUMMARY=%{SUMMARY}\\nDESCRIPTION=%{DESCRIPTION}";

/// Header metadata extracted from a single package file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageHeader {
    pub name: String,
    pub version: String,
    pub release: String,
    pub arch: String,
    pub is_source: bool,
    pub tags: BTreeMap<String, String>,
}

/// Read-only access to package headers. The production implementation
/// shells out to rpm; tests substitute an in-memory reader.
pub trait HeaderReader {
    fn read_header(&self, path: &Path) -> Result<PackageHeader>;
}

/// Header reader backed by the system `rpm` binary.
pub struct RpmQuery;

impl RpmQuery {
    pub fn new() -> Self {
        RpmQuery
    }
}

impl Default for RpmQuery {
    fn default() -> Self {
        RpmQuery::new()
    }
}

impl HeaderReader for RpmQuery {
    fn read_header(&self, path: &Path) -> Result<PackageHeader> {
        let output = Command::new("rpm")
            .arg("-qp")
            .arg("--nosignature")
            .arg("--qf")
            .arg(QUERY_FORMAT)
            .arg(path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(map_spawn_error)?;

        if !output.status.success() {
            return Err(SyngatherError::Header {
                path: path.display().to_string(),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|err| SyngatherError::Header {
            path: path.display().to_string(),
            detail: format!("rpm query emitted invalid UTF-8: {err}"),
        })?;

        parse_query_output(&stdout).map_err(|detail| SyngatherError::Header {
            path: path.display().to_string(),
            detail,
        })
    }
}

/// Parse the fixed query-format output into an owned header value.
///
/// Lines that do not begin with a carried tag name continue the previous
/// tag's value; `%{DESCRIPTION}` regularly spans multiple lines.
fn parse_query_output(stdout: &str) -> std::result::Result<PackageHeader, String> {
    let mut lines = stdout.lines();
    let name = next_identity_line(&mut lines, "NAME")?;
    let version = next_identity_line(&mut lines, "VERSION")?;
    let release = next_identity_line(&mut lines, "RELEASE")?;
    let arch = next_identity_line(&mut lines, "ARCH")?;
    let source_flag = lines
        .next()
        .ok_or_else(|| "query output ended before SOURCEPACKAGE".to_string())?;
    let is_source = source_flag.trim() == "1";

    let mut tags: BTreeMap<String, String> = BTreeMap::new();
    let mut current: Option<String> = None;
    for line in lines {
        match split_tag_line(line) {
            Some((tag, value)) => {
                if value != "(none)" {
                    tags.insert(tag.to_string(), value.to_string());
                    current = Some(tag.to_string());
                } else {
                    current = None;
                }
            }
            None => {
                if let Some(tag) = current.as_deref() {
                    if let Some(existing) = tags.get_mut(tag) {
                        existing.push('\n');
                        existing.push_str(line);
                    }
                }
            }
        }
    }

    Ok(PackageHeader {
        name,
        version,
        release,
        arch,
        is_source,
        tags,
    })
}

fn next_identity_line<'a, I>(lines: &mut I, field: &str) -> std::result::Result<String, String>
where
    I: Iterator<Item = &'a str>,
{
    let value = lines
        .next()
        .ok_or_else(|| format!("query output ended before {field}"))?
        .trim();
    if value.is_empty() || value == "(none)" {
        return Err(format!("query output is missing {field}"));
    }
    Ok(value.to_string())
}

fn split_tag_line(line: &str) -> Option<(&str, &str)> {
    let (tag, value) = line.split_once('=')?;
    if CARRIED_TAGS.contains(&tag) {
        Some((tag, value))
    } else {
        None
    }
}

fn map_spawn_error(err: io::Error) -> SyngatherError {
    if err.kind() == io::ErrorKind::NotFound {
        SyngatherError::CommandMissing {
            command: "rpm".into(),
        }
    } else {
        SyngatherError::Runtime(format!("Failed to spawn rpm: {err}"))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use super::*;

    /// Fluent builder for header values used across module tests.
    pub struct HeaderBuilder {
        header: PackageHeader,
    }

    impl HeaderBuilder {
        pub fn new(name: &str, version: &str, release: &str, arch: &str) -> Self {
            Self {
                header: PackageHeader {
                    name: name.to_string(),
                    version: version.to_string(),
                    release: release.to_string(),
                    arch: arch.to_string(),
                    is_source: false,
                    tags: BTreeMap::new(),
                },
            }
        }

        pub fn source(mut self) -> Self {
            self.header.is_source = true;
            self
        }

        pub fn tag(mut self, tag: &str, value: &str) -> Self {
            self.header.tags.insert(tag.to_string(), value.to_string());
            self
        }

        pub fn build(self) -> PackageHeader {
            self.header
        }
    }

    /// In-memory header reader keyed by staged file name.
    #[derive(Default)]
    pub struct MockHeaderReader {
        headers: HashMap<String, PackageHeader>,
    }

    impl MockHeaderReader {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&mut self, filename: &str, header: PackageHeader) {
            self.headers.insert(filename.to_string(), header);
        }
    }

    impl HeaderReader for MockHeaderReader {
        fn read_header(&self, path: &Path) -> Result<PackageHeader> {
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();
            self.headers
                .get(&filename)
                .cloned()
                .ok_or_else(|| SyngatherError::Header {
                    path: path.display().to_string(),
                    detail: "no mock header registered".into(),
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_binary_package_output() {
        let stdout = "foo\n1.0\n2\nx86_64\n(none)\nLICENSE=MIT\nVENDOR=Synavera\nBUILDHOST=builder01\nSUMMARY=Example tool\nDESCRIPTION=First line\nsecond line\n";
        let header = parse_query_output(stdout).expect("parse");
        assert_eq!(header.name, "foo");
        assert_eq!(header.version, "1.0");
        assert_eq!(header.release, "2");
        assert_eq!(header.arch, "x86_64");
        assert!(!header.is_source);
        assert_eq!(header.tags.get("LICENSE").map(String::as_str), Some("MIT"));
        assert_eq!(
            header.tags.get("DESCRIPTION").map(String::as_str),
            Some("First line\nsecond line")
        );
    }

    #[test]
    fn source_flag_marks_source_packages() {
        let stdout = "foo\n1.0\n2\nx86_64\n1\nLICENSE=MIT\nVENDOR=(none)\nBUILDHOST=builder01\nSUMMARY=Example tool\nDESCRIPTION=(none)\n";
        let header = parse_query_output(stdout).expect("parse");
        assert!(header.is_source);
        assert!(!header.tags.contains_key("VENDOR"));
        assert!(!header.tags.contains_key("DESCRIPTION"));
    }

    #[test]
    fn truncated_output_is_rejected() {
        let err = parse_query_output("foo\n1.0\n").unwrap_err();
        assert!(err.contains("RELEASE"));
    }
}
