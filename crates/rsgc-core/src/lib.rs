//! # RSGC Core Library
//!
//! A library for reducing the molecules of organic crystals to their conjugated
//! backbone: aliphatic side chains are cut back to a methyl (or ethyl) stub and the
//! cut is capped with a hydrogen placed at a chemically sensible distance.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Molecule`, `BondGraph`,
//!   `Structure`), the topological analyses that decide which atoms are part of the
//!   conjugated backbone (`rings`, `flatness`, `hybridization`, `paths`, `branches`),
//!   geometry helpers, and BGF file I/O.
//!
//! - **[`engine`]: The Editing Core.** Configuration, error types, diagnostics, and
//!   the two operations that mutate a molecule: pruning with hydrogen capping, and
//!   hydrogen completion of under-bonded carbons.
//!
//! - **[`workflows`]: The Public API.** Ties `core` and `engine` together into the
//!   single-molecule strip pipeline and the multi-molecule structure driver.

pub mod core;
pub mod engine;
pub mod workflows;
