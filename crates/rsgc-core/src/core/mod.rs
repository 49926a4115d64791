//! # Core Module
//!
//! The fundamental data structures and analyses used to reduce a molecule to its
//! conjugated backbone.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, bond graphs, unit cells,
//!   molecules and multi-molecule structures
//! - **Topological Analysis** ([`topology`]) - Ring enumeration, ring flatness,
//!   sp3 perception, moiety connection paths and branch layering
//! - **File I/O** ([`io`]) - Reading and writing BGF structures
//! - **Utilities** ([`utils`]) - Vector geometry and element data

pub mod io;
pub mod models;
pub mod topology;
pub mod utils;
