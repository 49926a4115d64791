use super::error::EngineError;
use crate::core::models::atom::Atom;
use crate::core::models::molecule::Molecule;
use crate::core::topology::hybridization::{AtomClassifier, sp3_carbons};
use crate::core::utils::elements;
use crate::core::utils::geometry::{rotate_about_axis, tetrahedral_completion, unit_vector};
use nalgebra::{Point3, Vector3};
use tracing::{debug, instrument};

const FULL_VALENCE: usize = 4;
const TRIGONAL_ROTATION_DEGREES: f64 = 120.0;

/// Bond length and angle used for newly placed hydrogens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapGeometry {
    pub bond_length: f64,
    pub tetrahedral_angle_degrees: f64,
}

impl Default for CapGeometry {
    fn default() -> Self {
        Self {
            bond_length: 0.97,
            tetrahedral_angle_degrees: 109.5,
        }
    }
}

/// Adds hydrogens to `carbon` until it has four neighbors and returns the new atom indices.
///
/// Each hydrogen is appended to the atom sequence and bonded only to the
/// carbon; the neighbor list is re-read after every addition, so a carbon with
/// one neighbor goes through the one-, two- and three-neighbor placements in
/// turn. A carbon that already has four or more neighbors is left alone.
///
/// # Errors
///
/// [`EngineError::InvalidAtom`] if the atom is missing, not a carbon, or has no
/// neighbors. [`EngineError::GeometryUnderdetermined`] if the existing bonds do
/// not fix a direction for the new hydrogen.
pub fn cap_carbon(
    molecule: &mut Molecule,
    carbon: usize,
    geometry: &CapGeometry,
) -> Result<Vec<usize>, EngineError> {
    let atom = molecule.atom(carbon).ok_or_else(|| EngineError::InvalidAtom {
        atom: carbon,
        reason: "no such atom".to_string(),
    })?;
    if !atom.is_carbon() {
        return Err(EngineError::InvalidAtom {
            atom: carbon,
            reason: format!("expected a carbon, found {}", atom.element),
        });
    }
    if molecule.degree(carbon) == 0 {
        return Err(EngineError::InvalidAtom {
            atom: carbon,
            reason: "carbon has no neighbors to orient new hydrogens against".to_string(),
        });
    }

    let mut added = Vec::new();
    for _ in 0..FULL_VALENCE - 1 {
        let neighbors: Vec<usize> = molecule.neighbors(carbon).collect();
        let direction = match neighbors.len() {
            1 => one_neighbor_direction(molecule, carbon, neighbors[0], geometry)?,
            2 => two_neighbor_direction(molecule, carbon, &neighbors)?,
            3 => three_neighbor_direction(molecule, carbon, &neighbors)?,
            _ => break,
        };
        let center = position_of(molecule, carbon)?;
        let hydrogen = Atom::new("H", center + direction * geometry.bond_length)
            .with_force_field_type("H_");
        let index = molecule.add_atom(hydrogen);
        molecule.add_bond(carbon, index)?;
        added.push(index);
    }
    Ok(added)
}

/// Caps every listed atom that is a carbon; other atoms are skipped.
pub fn complete_carbons(
    molecule: &mut Molecule,
    atoms: impl IntoIterator<Item = usize>,
    geometry: &CapGeometry,
) -> Result<usize, EngineError> {
    let mut added = 0;
    for atom in atoms {
        if molecule.atom(atom).is_some_and(Atom::is_carbon) {
            added += cap_carbon(molecule, atom, geometry)?.len();
        }
    }
    Ok(added)
}

/// Repair pass: fills every carbon the classifier calls sp3 up to four neighbors.
///
/// The sp3 carbons are identified once up front; adding hydrogens only appends
/// atoms, so their indices stay valid throughout.
#[instrument(skip_all, name = "complete_sp3_carbons")]
pub fn complete_sp3_carbons(
    molecule: &mut Molecule,
    classifier: &impl AtomClassifier,
    geometry: &CapGeometry,
) -> Result<usize, EngineError> {
    let carbons = sp3_carbons(classifier, molecule);
    let added = complete_carbons(molecule, carbons.iter().copied(), geometry)?;
    debug!(sp3_carbons = carbons.len(), added, "Completed sp3 carbons");
    Ok(added)
}

fn position_of(molecule: &Molecule, atom: usize) -> Result<Point3<f64>, EngineError> {
    molecule.position(atom).ok_or_else(|| EngineError::InvalidAtom {
        atom,
        reason: "no such atom".to_string(),
    })
}

fn bond_unit(molecule: &Molecule, center: usize, other: usize) -> Result<Vector3<f64>, EngineError> {
    let d = position_of(molecule, other)? - position_of(molecule, center)?;
    unit_vector(&d).ok_or_else(|| EngineError::GeometryUnderdetermined {
        atom: center,
        reason: format!("atom {other} coincides with it"),
    })
}

fn underdetermined(atom: usize, reason: &str) -> EngineError {
    EngineError::GeometryUnderdetermined {
        atom,
        reason: reason.to_string(),
    }
}

/// Tetrahedral placement in the plane of the neighbor and its heavy neighbor
/// nearest the center of mass, on the side facing the center of mass.
fn one_neighbor_direction(
    molecule: &Molecule,
    carbon: usize,
    neighbor: usize,
    geometry: &CapGeometry,
) -> Result<Vector3<f64>, EngineError> {
    let com = molecule
        .center_of_mass()
        .ok_or_else(|| underdetermined(carbon, "center of mass is undefined"))?;

    let mut second_shell: Option<(usize, f64)> = None;
    for candidate in molecule.neighbors(neighbor) {
        if candidate == carbon || !molecule.element(candidate).is_some_and(elements::is_heavy) {
            continue;
        }
        let distance = (position_of(molecule, candidate)? - com).norm();
        if second_shell.is_none_or(|(_, best)| distance < best) {
            second_shell = Some((candidate, distance));
        }
    }
    let (second, _) = second_shell.ok_or_else(|| {
        underdetermined(carbon, "its only neighbor has no other heavy-atom neighbor")
    })?;

    let u1 = bond_unit(molecule, carbon, neighbor)?;
    let u2 = bond_unit(molecule, carbon, second)?;
    let normal = unit_vector(&u1.cross(&u2))
        .ok_or_else(|| underdetermined(carbon, "reference bonds are collinear"))?;

    let angle = geometry.tetrahedral_angle_degrees;
    let center = position_of(molecule, carbon)?;
    let candidates = [angle, -angle]
        .map(|a| rotate_about_axis(&u1, &normal, a).map(|v| (v, center + v * geometry.bond_length)));
    let [Some((plus, plus_at)), Some((minus, minus_at))] = candidates else {
        return Err(underdetermined(carbon, "rotation axis is degenerate"));
    };
    if (plus_at - com).norm() <= (minus_at - com).norm() {
        Ok(plus)
    } else {
        Ok(minus)
    }
}

/// Rotates the non-reference bond 120 degrees about the reversed reference bond.
/// The reference is the first carbon neighbor, or the second neighbor if none is carbon.
fn two_neighbor_direction(
    molecule: &Molecule,
    carbon: usize,
    neighbors: &[usize],
) -> Result<Vector3<f64>, EngineError> {
    let reference_slot = neighbors
        .iter()
        .position(|&n| molecule.atom(n).is_some_and(Atom::is_carbon))
        .unwrap_or(1);
    let reference = neighbors[reference_slot];
    let other = neighbors[1 - reference_slot];

    let u_ref = bond_unit(molecule, carbon, reference)?;
    let u_other = bond_unit(molecule, carbon, other)?;
    rotate_about_axis(&u_other, &-u_ref, TRIGONAL_ROTATION_DEGREES)
        .ok_or_else(|| underdetermined(carbon, "reference bond has zero length"))
}

fn three_neighbor_direction(
    molecule: &Molecule,
    carbon: usize,
    neighbors: &[usize],
) -> Result<Vector3<f64>, EngineError> {
    let bonds = neighbors
        .iter()
        .map(|&n| bond_unit(molecule, carbon, n))
        .collect::<Result<Vec<_>, _>>()?;
    tetrahedral_completion(&bonds)
        .ok_or_else(|| underdetermined(carbon, "bond directions cancel out (planar center)"))
}
