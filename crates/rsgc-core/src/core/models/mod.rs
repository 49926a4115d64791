//! # Core Models Module
//!
//! Data structures used to represent the molecules of a crystal.
//!
//! ## Key Components
//!
//! - [`atom`] - A single atom: element, position and file-level labels
//! - [`graph`] - Undirected bond graph over dense atom indices, with explicit
//!   old-to-new index remapping on removal
//! - [`cell`] - Periodic unit cell and minimum-image displacements
//! - [`molecule`] - An atom sequence paired with its bond graph
//! - [`structure`] - A named collection of molecules read from one file
//!
//! ## Usage
//!
//! ```ignore
//! use rsgc::core::models::{atom::Atom, molecule::Molecule};
//! use nalgebra::Point3;
//!
//! let mut molecule = Molecule::new();
//! let c = molecule.add_atom(Atom::new("C", Point3::new(0.0, 0.0, 0.0)));
//! let h = molecule.add_atom(Atom::new("H", Point3::new(1.09, 0.0, 0.0)));
//! molecule.add_bond(c, h)?;
//! ```

pub mod atom;
pub mod cell;
pub mod graph;
pub mod molecule;
pub mod structure;

#[cfg(test)]
pub(crate) mod fixtures;
