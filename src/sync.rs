/*============================================================
  Synavera Project: Syn-Gather
  Module: syngather_core::sync
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Mirror a local build tree into the workspace, preserving
    relative structure and indexing every package file found.

  Security / Safety Notes:
    Symbolic links are never followed; anything other than a
    plain file or directory aborts the walk.

  Dependencies:
    walkdir for the physical recursive traversal.

  Operational Scope:
    Invoked once per local build side. Already-copied files are
    left in place on failure; teardown is the caller's call.

  Revision History:
    2025-06-17 COD  Authored local tree synchronizer.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Relative paths derived from the captured walk root
    - First failure aborts, surfaced with path context
    - Package files routed to the index as they land
============================================================*/

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::build_info::BuildSide;
use crate::error::{Result, SyngatherError};
use crate::header::HeaderReader;
use crate::logger::Logger;
use crate::peers::PeerIndex;
use crate::workspace::create_dir_tree;

/// Files with this suffix are package artifacts and get indexed.
pub const PACKAGE_SUFFIX: &str = ".rpm";

/// Recursively copy the contents of `source_root` into the workspace
/// subtree for `side`.
///
/// The walk root itself is not copied; a member at `<source_root>/a/b`
/// lands at `<subdir>/<side>/a/b`. Package files are additionally handed
/// to the header reader and filed into the peer index. Returns the staged
/// file paths in walk order.
pub fn synchronize<H: HeaderReader>(
    side: BuildSide,
    source_root: &Path,
    subdir: &Path,
    reader: &H,
    peers: &mut PeerIndex,
    logger: &Logger,
) -> Result<Vec<PathBuf>> {
    let dest_root = subdir.join(side.dir_name());
    create_dir_tree(&dest_root).map_err(|err| transfer(side, format!(
        "Failed to create directory {}: {err}",
        dest_root.display()
    )))?;

    let mut staged = Vec::new();
    for entry in WalkDir::new(source_root).follow_links(false).min_depth(1) {
        let entry = entry.map_err(|err| {
            transfer(side, format!(
                "Failed to traverse {}: {err}",
                source_root.display()
            ))
        })?;
        let relative = entry.path().strip_prefix(source_root).map_err(|err| {
            transfer(side, format!(
                "Walked outside {}: {err}",
                source_root.display()
            ))
        })?;
        let dest = dest_root.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            create_dir_tree(&dest).map_err(|err| {
                transfer(side, format!("Failed to create directory {}: {err}", dest.display()))
            })?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &dest).map_err(|err| {
                transfer(side, format!(
                    "Failed to copy {} to {}: {err}",
                    entry.path().display(),
                    dest.display()
                ))
            })?;

            if entry.file_name().to_string_lossy().ends_with(PACKAGE_SUFFIX) {
                let header = reader.read_header(&dest)?;
                peers.record(side, &dest, header);
            }

            staged.push(dest);
        } else {
            return Err(transfer(side, format!(
                "Unsupported directory member {}",
                entry.path().display()
            )));
        }
    }

    logger.info(
        "SYNC",
        format!(
            "Synchronized {} files from {} into {}",
            staged.len(),
            source_root.display(),
            dest_root.display()
        ),
    );

    Ok(staged)
}

fn transfer(side: BuildSide, detail: String) -> SyngatherError {
    SyngatherError::Transfer { side, detail }
}
