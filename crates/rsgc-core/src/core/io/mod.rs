//! Reading and writing crystal structures.
//!
//! Formats implement [`traits::MolecularFile`], which works on whole
//! [`Structure`](crate::core::models::structure::Structure)s: one entry per
//! discrete molecule plus the optional unit cell.

pub mod bgf;
pub mod traits;
