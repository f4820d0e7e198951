/*============================================================
  Synavera Project: Syn-Gather
  Module: syngather_core::future
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1
  ------------------------------------------------------------
  Purpose:
    Provide scaffolding for Syn-Gather-Core roadmap features
    such as bounded parallel artifact transfer and transfer
    cancellation.

  Security / Safety Notes:
    No operational code is executed; this module documents
    planned extension points to guide safe implementations.

  Dependencies:
    None at runtime; placeholder traits only.

  Operational Scope:
    Referenced by developers when implementing Syn-Gather v2+.

  Revision History:
    2025-06-17 COD  Added future expansion scaffolding.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit documentation of deferred capabilities
    - Clearly fenced placeholders to avoid accidental use
============================================================*/

#![allow(dead_code)]

use std::path::PathBuf;

/// Planned hook for bounded parallel artifact transfer within one side.
///
/// Implementations must serialize arch-directory creation ahead of any
/// write into it and funnel completed headers through a single writer.
pub trait TransferPool {
    /// Transfer a batch of artifact URLs to their destinations, bounded
    /// by the pool's worker count.
    fn transfer_batch(&self, jobs: &[(String, PathBuf)]) -> Vec<std::io::Result<()>>;
}

/// Planned hook for cancelling in-flight transfers once one fails.
pub trait TransferCancellation {
    /// Signal that remaining transfers for the side are discardable.
    fn cancel(&self);
}

/// Transfer backend registration entry point. Currently a stub.
pub fn register_transfer_backend<T>(_backend: T)
where
    T: TransferPool + TransferCancellation + Send + Sync + 'static,
{
    // Placeholder: pooled transfer backend lands in Syn-Gather v2.
}
