use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::graph::GraphError;
use crate::core::topology::TopologyError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Hydrogen {hydrogen} found in ring {ring:?} of '{label}'; check this structure manually")]
    HydrogenInRing {
        label: String,
        hydrogen: usize,
        ring: Vec<usize>,
    },

    #[error("Moiety path search for '{label}' exceeded {limit} expansions")]
    SearchLimitExceeded { label: String, limit: usize },

    #[error("Cannot place hydrogen on atom {atom}: {reason}")]
    GeometryUnderdetermined { atom: usize, reason: String },

    #[error("Atom {atom} cannot be capped: {reason}")]
    InvalidAtom { atom: usize, reason: String },

    #[error("Molecules left without atoms: {}", .labels.join(", "))]
    EmptyMolecules { labels: Vec<String> },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Bond graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Attaches the molecule label to a perception error.
    pub fn from_topology(label: &str, error: TopologyError) -> Self {
        match error {
            TopologyError::HydrogenInRing { hydrogen, ring } => Self::HydrogenInRing {
                label: label.to_string(),
                hydrogen,
                ring,
            },
            TopologyError::SearchLimitExceeded { limit } => Self::SearchLimitExceeded {
                label: label.to_string(),
                limit,
            },
            TopologyError::Inconsistent(message) => Self::Internal(format!("{label}: {message}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topology_errors_carry_the_molecule_label() {
        let error = EngineError::from_topology(
            "A:LIG1",
            TopologyError::HydrogenInRing {
                hydrogen: 2,
                ring: vec![0, 1, 2],
            },
        );
        assert!(matches!(&error, EngineError::HydrogenInRing { label, hydrogen: 2, .. } if label == "A:LIG1"));
        assert!(error.to_string().contains("A:LIG1"));
    }

    #[test]
    fn inconsistency_becomes_internal_error() {
        let error = EngineError::from_topology("x", TopologyError::Inconsistent("overlap".into()));
        assert!(matches!(error, EngineError::Internal(message) if message == "x: overlap"));
    }

    #[test]
    fn empty_molecules_message_lists_labels() {
        let error = EngineError::EmptyMolecules {
            labels: vec!["A:X1".into(), "A:Y2".into()],
        };
        assert_eq!(error.to_string(), "Molecules left without atoms: A:X1, A:Y2");
    }
}
