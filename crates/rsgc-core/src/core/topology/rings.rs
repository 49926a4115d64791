use super::TopologyError;
use crate::core::models::molecule::Molecule;
use crate::core::utils::elements;
use std::collections::{BTreeSet, HashSet};

/// A simple cycle in the bond graph, stored in traversal order.
///
/// Two rings are the same ring when they contain the same set of atoms,
/// whatever their starting atom or direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    atoms: Vec<usize>,
}

impl Ring {
    pub fn new(atoms: Vec<usize>) -> Self {
        Self { atoms }
    }

    pub fn atoms(&self) -> &[usize] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.atoms.contains(&atom)
    }

    pub fn atom_set(&self) -> BTreeSet<usize> {
        self.atoms.iter().copied().collect()
    }

    /// Consecutive `(previous, center, next)` triples around the ring, wrapping.
    pub fn angle_triples(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        let n = self.atoms.len();
        (0..n).map(move |i| {
            (
                self.atoms[i],
                self.atoms[(i + 1) % n],
                self.atoms[(i + 2) % n],
            )
        })
    }
}

/// Finds every simple cycle of at most `max_ring_size` atoms.
///
/// Starting from each atom in index order, a depth-first walk extends the current
/// path through neighbors not yet on it. A ring closes when a neighbor is the
/// path's first atom and the path holds more than two atoms. Only the first
/// ordering discovered for each atom set is kept.
pub fn find_rings(molecule: &Molecule, max_ring_size: usize) -> Vec<Ring> {
    let mut rings = Vec::new();
    let mut seen: HashSet<Vec<usize>> = HashSet::new();

    for start in 0..molecule.len() {
        let mut path = vec![start];
        let mut stack: Vec<(Vec<usize>, usize)> = vec![(molecule.neighbors(start).collect(), 0)];

        while let Some(frame) = stack.last_mut() {
            let next = frame.0.get(frame.1).copied();
            frame.1 += 1;
            let Some(next) = next else {
                stack.pop();
                path.pop();
                continue;
            };

            if next == path[0] && path.len() > 2 {
                let mut key = path.clone();
                key.sort_unstable();
                if seen.insert(key) {
                    rings.push(Ring::new(path.clone()));
                }
            } else if !path.contains(&next) && path.len() < max_ring_size {
                path.push(next);
                stack.push((molecule.neighbors(next).collect(), 0));
            }
        }
    }
    rings
}

/// Non-fatal outcome of scanning rings for hydrogens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RingHydrogenNote {
    /// The ring hydrogen sits next to O or N, so the "ring" is likely closed by a hydrogen bond.
    PossibleHydrogenBond { hydrogen: usize, ring: Vec<usize> },
}

/// Checks every hydrogen (H, D or T) on every ring.
///
/// Any ring hydrogen without an O or N neighbor means the bonding is unphysical
/// and is an error, whichever ring it sits on. Otherwise the first ring hydrogen
/// found next to O or N is reported as a possible hydrogen bond; the report is
/// per molecule, so later ones add nothing.
pub fn check_ring_hydrogens(
    molecule: &Molecule,
    rings: &[Ring],
) -> Result<Option<RingHydrogenNote>, TopologyError> {
    let mut note = None;
    for ring in rings {
        let hydrogens = ring
            .atoms()
            .iter()
            .copied()
            .filter(|&atom| molecule.element(atom).is_some_and(elements::is_hydrogen));
        for hydrogen in hydrogens {
            let near_partner = molecule.neighbors(hydrogen).any(|n| {
                molecule
                    .element(n)
                    .is_some_and(elements::is_hydrogen_bond_partner)
            });
            if !near_partner {
                return Err(TopologyError::HydrogenInRing {
                    hydrogen,
                    ring: ring.atoms().to_vec(),
                });
            }
            note.get_or_insert_with(|| RingHydrogenNote::PossibleHydrogenBond {
                hydrogen,
                ring: ring.atoms().to_vec(),
            });
        }
    }
    Ok(note)
}
