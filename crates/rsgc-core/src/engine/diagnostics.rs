use super::error::EngineError;
use serde::Serialize;

/// A finding about one molecule that belongs in the ring report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A hydrogen sits in a ring next to O or N; stripping continued.
    PossibleHydrogenBond {
        label: String,
        hydrogen: usize,
        ring: Vec<usize>,
    },
    /// A hydrogen sits in a ring with no O or N next to it; the molecule was rejected.
    HydrogenInRing {
        label: String,
        hydrogen: usize,
        ring: Vec<usize>,
    },
}

impl Diagnostic {
    pub fn label(&self) -> &str {
        match self {
            Self::PossibleHydrogenBond { label, .. } | Self::HydrogenInRing { label, .. } => label,
        }
    }

    /// The diagnostic for an error that has one, i.e. a rejected ring hydrogen.
    pub fn from_error(error: &EngineError) -> Option<Self> {
        match error {
            EngineError::HydrogenInRing {
                label,
                hydrogen,
                ring,
            } => Some(Self::HydrogenInRing {
                label: label.clone(),
                hydrogen: *hydrogen,
                ring: ring.clone(),
            }),
            _ => None,
        }
    }

    /// One line of the ring report file.
    pub fn report_line(&self) -> String {
        match self {
            Self::PossibleHydrogenBond { label, .. } => {
                format!("{label} (Ring may have hydrogen bonding in it.)")
            }
            Self::HydrogenInRing { label, .. } => label.clone(),
        }
    }
}
