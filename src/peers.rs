/*============================================================
  Synavera Project: Syn-Gather
  Module: syngather_core::peers
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Catalog staged package headers into a side-tagged index so
    downstream inspections can pair packages across builds.

  Security / Safety Notes:
    Pure in-memory bookkeeping; no I/O performed here.

  Dependencies:
    serde for report serialization of recorded entries.

  Operational Scope:
    Populated incrementally during materialization and handed,
    complete, to downstream analysis. Matching across sides is
    downstream work, never done here.

  Revision History:
    2025-06-17 COD  Authored peer index bookkeeping.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Deterministic ordering for reproducible reports
    - Source packages kept out of the peer mapping
    - Overwrite-on-collision tolerates malformed inputs
============================================================*/

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::build_info::BuildSide;
use crate::header::PackageHeader;

/// Packaging identity a non-source package is filed under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct PeerKey {
    pub name: String,
    pub arch: String,
}

/// One staged package: where it landed and what its header says.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeerEntry {
    pub path: PathBuf,
    pub header: PackageHeader,
}

/// Side-tagged catalog of every staged package.
///
/// Each side holds a peer mapping keyed by packaging identity plus an
/// at-most-one slot for the side's source package.
#[derive(Debug, Default)]
pub struct PeerIndex {
    before: BTreeMap<PeerKey, PeerEntry>,
    after: BTreeMap<PeerKey, PeerEntry>,
    before_source: Option<PeerEntry>,
    after_source: Option<PeerEntry>,
}

impl PeerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// File a staged package under its side.
    ///
    /// Source packages occupy the side's singleton slot; everything else
    /// is keyed by name and architecture. Either way the last write wins.
    pub fn record(&mut self, side: BuildSide, path: &Path, header: PackageHeader) {
        let entry = PeerEntry {
            path: path.to_path_buf(),
            header,
        };

        if entry.header.is_source {
            match side {
                BuildSide::Before => self.before_source = Some(entry),
                BuildSide::After => self.after_source = Some(entry),
            }
        } else {
            let key = PeerKey {
                name: entry.header.name.clone(),
                arch: entry.header.arch.clone(),
            };
            self.side_map_mut(side).insert(key, entry);
        }
    }

    /// Peer mapping for one side, in key order.
    pub fn peers(&self, side: BuildSide) -> &BTreeMap<PeerKey, PeerEntry> {
        match side {
            BuildSide::Before => &self.before,
            BuildSide::After => &self.after,
        }
    }

    /// The side's source package, if one was staged.
    pub fn source(&self, side: BuildSide) -> Option<&PeerEntry> {
        match side {
            BuildSide::Before => self.before_source.as_ref(),
            BuildSide::After => self.after_source.as_ref(),
        }
    }

    /// Number of indexed packages on one side, source slot included.
    pub fn indexed_count(&self, side: BuildSide) -> usize {
        self.peers(side).len() + usize::from(self.source(side).is_some())
    }

    fn side_map_mut(&mut self, side: BuildSide) -> &mut BTreeMap<PeerKey, PeerEntry> {
        match side {
            BuildSide::Before => &mut self.before,
            BuildSide::After => &mut self.after,
        }
    }
}
