//! # Engine Module
//!
//! The stateful half of side-chain stripping: it edits a molecule's atoms and
//! bond graph once the [`core::topology`](crate::core::topology) stages have
//! decided what to keep.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Thresholds and switches for the whole pipeline
//! - **Pruning** ([`pruning`]) - Deleting side-chain atoms past the cutoff and capping the stub
//! - **Re-hydrogenation** ([`hydrogens`]) - Completing under-coordinated carbons with new hydrogens
//! - **Diagnostics** ([`diagnostics`]) - Non-fatal findings collected per molecule
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod hydrogens;
pub mod progress;
pub mod pruning;
