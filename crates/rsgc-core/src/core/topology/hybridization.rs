use crate::core::models::molecule::Molecule;
use itertools::Itertools;

/// A per-atom yes/no perception over a molecule's current geometry and graph.
pub trait AtomClassifier {
    fn classify(&self, molecule: &Molecule, atom: usize) -> bool;
}

/// Heuristic sp3 (tetrahedral, aliphatic) detection for carbon atoms.
///
/// - four neighbors: sp3
/// - two, three, or more than four neighbors: sp3 when every
///   neighbor-center-neighbor angle is below `angle_threshold_degrees`
/// - one neighbor: sp3 when the bond is at least `min_single_bond_length` long
/// - no neighbors: not sp3
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sp3Classifier {
    pub angle_threshold_degrees: f64,
    pub min_single_bond_length: f64,
}

impl Default for Sp3Classifier {
    fn default() -> Self {
        Self {
            angle_threshold_degrees: 115.0,
            min_single_bond_length: 1.3,
        }
    }
}

impl AtomClassifier for Sp3Classifier {
    fn classify(&self, molecule: &Molecule, atom: usize) -> bool {
        let neighbors: Vec<usize> = molecule.neighbors(atom).collect();
        match neighbors.len() {
            0 => false,
            1 => molecule
                .distance(atom, neighbors[0])
                .is_some_and(|length| length >= self.min_single_bond_length),
            4 => true,
            _ => neighbors.iter().tuple_combinations().all(|(&a, &b)| {
                molecule
                    .angle_degrees(a, atom, b, false)
                    .is_some_and(|angle| angle < self.angle_threshold_degrees)
            }),
        }
    }
}

/// Indices of all carbons the classifier considers sp3, in ascending order.
pub fn sp3_carbons(classifier: &impl AtomClassifier, molecule: &Molecule) -> Vec<usize> {
    (0..molecule.len())
        .filter(|&i| molecule.atom(i).is_some_and(|atom| atom.is_carbon()))
        .filter(|&i| classifier.classify(molecule, i))
        .collect()
}
