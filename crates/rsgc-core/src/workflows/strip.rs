use crate::core::models::molecule::Molecule;
use crate::core::topology::branches::{BranchLayers, branch_atoms, classify};
use crate::core::topology::flatness::filter_flat;
use crate::core::topology::moieties::build_keep_set;
use crate::core::topology::paths::Connection;
use crate::core::topology::rings::{Ring, RingHydrogenNote, check_ring_hydrogens, find_rings};
use crate::engine::config::StripConfig;
use crate::engine::diagnostics::Diagnostic;
use crate::engine::error::EngineError;
use crate::engine::hydrogens::{CapGeometry, complete_carbons, complete_sp3_carbons};
use crate::engine::pruning::prune;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{info, instrument, warn};

/// The read-only classification of a molecule: everything decided before any edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub rings: Vec<Ring>,
    pub flat_rings: Vec<Ring>,
    pub ring_note: Option<RingHydrogenNote>,
    pub connection: Connection,
    pub branch: BTreeSet<usize>,
    pub layers: BranchLayers,
}

/// Per-molecule counts of what stripping found and did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StripReport {
    pub label: String,
    pub atoms_before: usize,
    pub atoms_after: usize,
    pub rings: usize,
    pub flat_rings: usize,
    pub keep: usize,
    pub between: usize,
    pub alpha: usize,
    pub beta: usize,
    pub gamma: usize,
    pub removed: usize,
    pub capped: usize,
    pub hydrogens_added: usize,
}

impl StripReport {
    fn from_analysis(label: &str, atoms_before: usize, analysis: &Analysis) -> Self {
        Self {
            label: label.to_string(),
            atoms_before,
            atoms_after: atoms_before,
            rings: analysis.rings.len(),
            flat_rings: analysis.flat_rings.len(),
            keep: analysis.connection.keep.len(),
            between: analysis.connection.between.len(),
            alpha: analysis.layers.alpha.len(),
            beta: analysis.layers.beta.len(),
            gamma: analysis.layers.gamma.len(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct StripOutcome {
    pub molecule: Molecule,
    pub diagnostics: Vec<Diagnostic>,
    pub report: StripReport,
}

/// Runs ring perception, keep-set construction, moiety connection and branch
/// layering on `molecule` without modifying it.
///
/// # Errors
///
/// [`EngineError::HydrogenInRing`] when a ring hydrogen has no O or N neighbor,
/// [`EngineError::SearchLimitExceeded`] when the path search runs out of budget.
#[instrument(skip_all, name = "analyze", fields(label = label))]
pub fn analyze(molecule: &Molecule, label: &str, config: &StripConfig) -> Result<Analysis, EngineError> {
    let rings = find_rings(molecule, config.max_ring_size);
    let ring_note =
        check_ring_hydrogens(molecule, &rings).map_err(|e| EngineError::from_topology(label, e))?;
    if let Some(RingHydrogenNote::PossibleHydrogenBond { hydrogen, .. }) = &ring_note {
        warn!(hydrogen, "Ring may have hydrogen bonding in it");
    }

    let flat_rings = filter_flat(&config.flatness(), molecule, &rings);
    let keep = build_keep_set(&flat_rings, molecule, &config.sp3_classifier());
    let connection = config
        .connector()
        .connect(molecule, &keep)
        .map_err(|e| EngineError::from_topology(label, e))?;

    let protected = connection.protected();
    let branch = branch_atoms(molecule.graph(), &protected);
    let layers = classify(&branch, &protected, molecule.graph());

    Ok(Analysis {
        rings,
        flat_rings,
        ring_note,
        connection,
        branch,
        layers,
    })
}

/// Strips the aliphatic side chains of one molecule down to methyl (or ethyl) stubs.
///
/// The input is never modified; the reduced copy is returned together with any
/// ring diagnostics and a [`StripReport`].
#[instrument(skip_all, name = "strip_molecule", fields(label = label))]
pub fn strip_molecule(
    molecule: &Molecule,
    label: &str,
    config: &StripConfig,
) -> Result<StripOutcome, EngineError> {
    let analysis = analyze(molecule, label, config)?;
    let mut report = StripReport::from_analysis(label, molecule.len(), &analysis);

    let mut working = molecule.clone();
    let pruned = prune(
        &mut working,
        &analysis.branch,
        &analysis.layers,
        config.leave_as_ethyl,
        config.hydrogen_bond_length,
    )?;
    report.removed = pruned.removed;
    report.capped = pruned.capped.len();

    let geometry = CapGeometry {
        bond_length: config.hydrogen_bond_length,
        tetrahedral_angle_degrees: config.tetrahedral_angle_degrees,
    };
    if config.complete_alpha_carbons {
        let alpha: Vec<usize> = analysis
            .layers
            .alpha
            .iter()
            .filter_map(|&a| pruned.remap.get(a))
            .collect();
        report.hydrogens_added = complete_carbons(&mut working, alpha, &geometry)?;
    }
    if config.complete_sp3_carbons {
        report.hydrogens_added +=
            complete_sp3_carbons(&mut working, &config.sp3_classifier(), &geometry)?;
    }

    if !working.is_consistent() {
        return Err(EngineError::Internal(format!(
            "{label}: atom sequence and bond graph diverged"
        )));
    }
    report.atoms_after = working.len();

    let diagnostics = analysis
        .ring_note
        .into_iter()
        .map(|note| match note {
            RingHydrogenNote::PossibleHydrogenBond { hydrogen, ring } => {
                Diagnostic::PossibleHydrogenBond {
                    label: label.to_string(),
                    hydrogen,
                    ring,
                }
            }
        })
        .collect();

    info!(
        atoms_before = report.atoms_before,
        atoms_after = report.atoms_after,
        rings = report.rings,
        keep = report.keep,
        removed = report.removed,
        capped = report.capped,
        "Stripped molecule"
    );
    Ok(StripOutcome {
        molecule: working,
        diagnostics,
        report,
    })
}
