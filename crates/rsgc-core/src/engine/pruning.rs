use super::error::EngineError;
use crate::core::models::graph::IndexRemap;
use crate::core::models::molecule::Molecule;
use crate::core::topology::branches::BranchLayers;
use crate::core::utils::geometry::place_along;
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// What [`prune`] did to a molecule, with indices in the post-removal numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneOutcome {
    pub remap: IndexRemap,
    pub removed: usize,
    /// Atoms converted into capping hydrogens.
    pub capped: Vec<usize>,
}

/// Cuts every branch back to its alpha and beta layers (plus gamma with
/// `leave_as_ethyl`) and turns the outermost kept heavy atoms into hydrogens.
///
/// Deleted atoms are removed highest index first and the survivors renumbered
/// densely in order. Each `(outer, inner)` capping pair is then visited in
/// descending order: an outer atom that is not already a hydrogen is moved to
/// `hydrogen_bond_length` from its inner anchor along the original bond and
/// becomes a hydrogen. Anchors never move.
#[instrument(skip_all, name = "prune")]
pub fn prune(
    molecule: &mut Molecule,
    branch: &BTreeSet<usize>,
    layers: &BranchLayers,
    leave_as_ethyl: bool,
    hydrogen_bond_length: f64,
) -> Result<PruneOutcome, EngineError> {
    let original_len = molecule.len();

    let mut retained: BTreeSet<usize> = layers.alpha.union(&layers.beta).copied().collect();
    let cap_pairs = if leave_as_ethyl {
        retained.extend(layers.gamma.iter().copied());
        &layers.gamma_beta
    } else {
        &layers.beta_alpha
    };

    let strays: Vec<usize> = retained.difference(branch).copied().collect();
    if !strays.is_empty() {
        return Err(EngineError::Internal(format!(
            "atoms {strays:?} were layered but are not branch atoms"
        )));
    }

    let to_remove: BTreeSet<usize> = branch.difference(&retained).copied().collect();
    let remap = molecule.remove_atoms(&to_remove);
    if !molecule.is_consistent() {
        return Err(EngineError::Internal(
            "atom sequence and bond graph diverged after removal".to_string(),
        ));
    }

    let mut ordered_pairs = cap_pairs.clone();
    ordered_pairs.sort_unstable_by(|a, b| b.cmp(a));

    let mut capped = Vec::new();
    for (outer, inner) in ordered_pairs {
        let (Some(outer), Some(inner)) = (remap.get(outer), remap.get(inner)) else {
            return Err(EngineError::Internal(format!(
                "capping pair ({outer}, {inner}) refers to a removed atom"
            )));
        };
        // Converted atoms are hydrogens from here on, so a second pair leaves them alone.
        let (Some(outer_atom), Some(anchor)) = (molecule.atom(outer), molecule.position(inner))
        else {
            continue;
        };
        if outer_atom.is_hydrogen() {
            continue;
        }
        let position = place_along(&anchor, &outer_atom.position, hydrogen_bond_length)
            .ok_or_else(|| EngineError::GeometryUnderdetermined {
                atom: outer,
                reason: format!("coincides with its anchor atom {inner}"),
            })?;
        if let Some(atom) = molecule.atom_mut(outer) {
            atom.convert_to_hydrogen(position);
            capped.push(outer);
        }
    }

    if molecule.len() > original_len {
        return Err(EngineError::Internal(format!(
            "pruning grew the molecule from {original_len} to {} atoms",
            molecule.len()
        )));
    }

    debug!(
        removed = to_remove.len(),
        capped = capped.len(),
        remaining = molecule.len(),
        "Pruned branches"
    );
    Ok(PruneOutcome {
        remap,
        removed: to_remove.len(),
        capped,
    })
}
