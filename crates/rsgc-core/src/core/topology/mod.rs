//! Graph- and geometry-based perception used to decide what part of a molecule
//! is conjugated backbone and what is an aliphatic side chain.

pub mod branches;
pub mod flatness;
pub mod hybridization;
pub mod moieties;
pub mod paths;
pub mod rings;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("Hydrogen {hydrogen} found inside ring {ring:?} with no neighboring O or N")]
    HydrogenInRing { hydrogen: usize, ring: Vec<usize> },
    #[error("Moiety path search exceeded {limit} expansions")]
    SearchLimitExceeded { limit: usize },
    #[error("Inconsistent classification: {0}")]
    Inconsistent(String),
}
