//! # Workflows Module
//!
//! Top-level entry points that run the complete stripping pipeline.
//!
//! - **Single molecule** ([`strip`]) - Perception, pruning and capping of one molecule,
//!   plus a read-only analysis of the same stages
//! - **Whole structure** ([`structure`]) - Every molecule of a crystal structure, with
//!   solvent pass-through, empty-molecule resolution and progress reporting
//!
//! Both layers take a [`StripConfig`](crate::engine::config::StripConfig) and return
//! [`EngineError`](crate::engine::error::EngineError) on failure.

pub mod strip;
pub mod structure;
