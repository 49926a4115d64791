use super::hybridization::AtomClassifier;
use super::rings::Ring;
use crate::core::models::molecule::Molecule;
use crate::core::utils::elements;
use std::collections::BTreeSet;

/// Atoms that must survive stripping: flat-ring atoms, every atom that is not
/// hydrogen or carbon, and every carbon the sp3 classifier rejects.
///
/// An empty result is valid for a purely aliphatic molecule.
pub fn build_keep_set(
    flat_rings: &[Ring],
    molecule: &Molecule,
    sp3: &impl AtomClassifier,
) -> BTreeSet<usize> {
    let mut keep: BTreeSet<usize> = flat_rings
        .iter()
        .flat_map(|ring| ring.atoms().iter().copied())
        .collect();

    for (index, atom) in molecule.atoms().iter().enumerate() {
        let backbone = if atom.is_carbon() {
            !sp3.classify(molecule, index)
        } else {
            !elements::is_hydrogen(&atom.element)
        };
        if backbone {
            keep.insert(index);
        }
    }
    keep
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::fixtures;
    use crate::core::topology::flatness::{AngleSumFlatness, filter_flat};
    use crate::core::topology::hybridization::Sp3Classifier;
    use crate::core::topology::rings::find_rings;
    use nalgebra::Point3;

    #[test]
    fn propylbenzene_keeps_only_the_ring_carbons() {
        let molecule = fixtures::propylbenzene();
        let rings = find_rings(&molecule, 7);
        let flat = filter_flat(&AngleSumFlatness::default(), &molecule, &rings);
        let keep = build_keep_set(&flat, &molecule, &Sp3Classifier::default());
        assert_eq!(keep, (0..6).collect::<BTreeSet<usize>>());
    }

    #[test]
    fn heteroatoms_are_kept_and_hydrogen_isotopes_are_not() {
        let molecule = Molecule::from_parts(
            vec![
                Atom::new("O", Point3::origin()),
                Atom::new("D", Point3::new(0.96, 0.0, 0.0)),
                Atom::new("Cl", Point3::new(5.0, 0.0, 0.0)),
                Atom::new("T", Point3::new(9.0, 0.0, 0.0)),
            ],
            [(0, 1)],
        )
        .unwrap();
        let keep = build_keep_set(&[], &molecule, &Sp3Classifier::default());
        assert_eq!(keep, [0, 2].into_iter().collect::<BTreeSet<usize>>());
    }

    #[test]
    fn purely_aliphatic_molecule_has_empty_keep_set() {
        let molecule = fixtures::chair_cyclohexane();
        let rings = find_rings(&molecule, 7);
        let flat = filter_flat(&AngleSumFlatness::default(), &molecule, &rings);
        let keep = build_keep_set(&flat, &molecule, &Sp3Classifier::default());
        assert!(keep.is_empty());
    }
}
