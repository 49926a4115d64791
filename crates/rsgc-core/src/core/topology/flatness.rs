use super::rings::Ring;
use crate::core::models::molecule::Molecule;

/// Decides whether a ring is planar enough to be treated as conjugated.
pub trait FlatRingClassifier {
    fn is_flat(&self, molecule: &Molecule, ring: &Ring) -> bool;
}

/// Accepts a ring when the sum of its interior angles is within a tolerance of
/// the planar polygon value `(n - 2) * 180` degrees.
///
/// This is a crude geometric test and not aromaticity perception: strained or
/// slightly puckered rings near the threshold may land on either side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSumFlatness {
    pub tolerance_degrees: f64,
}

impl Default for AngleSumFlatness {
    fn default() -> Self {
        Self {
            tolerance_degrees: 20.0,
        }
    }
}

impl AngleSumFlatness {
    pub fn new(tolerance_degrees: f64) -> Self {
        Self { tolerance_degrees }
    }
}

impl FlatRingClassifier for AngleSumFlatness {
    fn is_flat(&self, molecule: &Molecule, ring: &Ring) -> bool {
        let Some(total) = interior_angle_sum(molecule, ring) else {
            return false;
        };
        let planar = (ring.len() as f64 - 2.0) * 180.0;
        (total - planar).abs() <= self.tolerance_degrees
    }
}

/// Sum of the angles measured at each ring atom between its two ring neighbors,
/// using minimum-image displacements when the molecule carries a unit cell.
pub fn interior_angle_sum(molecule: &Molecule, ring: &Ring) -> Option<f64> {
    ring.angle_triples()
        .map(|(a, center, b)| molecule.angle_degrees(a, center, b, true))
        .sum()
}

pub fn filter_flat(
    classifier: &impl FlatRingClassifier,
    molecule: &Molecule,
    rings: &[Ring],
) -> Vec<Ring> {
    rings
        .iter()
        .filter(|ring| classifier.is_flat(molecule, ring))
        .cloned()
        .collect()
}
