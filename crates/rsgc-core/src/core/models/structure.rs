use super::cell::UnitCell;
use super::molecule::Molecule;
use std::collections::HashSet;

/// One discrete molecule of a crystal structure together with its file-level identity.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeEntry {
    pub residue_name: String,
    pub chain_id: char,
    pub residue_number: isize,
    pub molecule: Molecule,
    /// Solvent molecules are carried through stripping untouched.
    pub is_solvent: bool,
}

impl MoleculeEntry {
    pub fn new(residue_name: &str, chain_id: char, residue_number: isize, molecule: Molecule) -> Self {
        Self {
            residue_name: residue_name.trim().to_string(),
            chain_id,
            residue_number,
            molecule,
            is_solvent: false,
        }
    }

    /// Identifier used in diagnostics and reports, e.g. `A:LIG1`.
    pub fn label(&self) -> String {
        format!("{}:{}{}", self.chain_id, self.residue_name, self.residue_number)
    }
}

/// A crystal structure decomposed into molecules, with an optional unit cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    pub molecules: Vec<MoleculeEntry>,
    pub cell: Option<UnitCell>,
}

impl Structure {
    pub fn new(cell: Option<UnitCell>) -> Self {
        Self {
            molecules: Vec::new(),
            cell,
        }
    }

    /// Adds a molecule; the structure's cell is attached to it.
    pub fn push(&mut self, mut entry: MoleculeEntry) {
        entry.molecule = entry.molecule.with_cell(self.cell);
        self.molecules.push(entry);
    }

    pub fn atom_count(&self) -> usize {
        self.molecules.iter().map(|entry| entry.molecule.len()).sum()
    }

    /// Flags every molecule whose residue name is in `residue_names` (case-insensitive) as solvent.
    pub fn mark_solvents(&mut self, residue_names: &HashSet<String>) -> usize {
        let wanted: HashSet<String> = residue_names.iter().map(|n| n.trim().to_uppercase()).collect();
        let mut marked = 0;
        for entry in &mut self.molecules {
            if wanted.contains(&entry.residue_name.to_uppercase()) {
                entry.is_solvent = true;
                marked += 1;
            }
        }
        marked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use nalgebra::Point3;

    fn single_atom(element: &str) -> Molecule {
        Molecule::from_parts(vec![Atom::new(element, Point3::origin())], []).unwrap()
    }

    #[test]
    fn label_combines_chain_residue_name_and_number() {
        let entry = MoleculeEntry::new(" LIG ", 'B', 12, single_atom("C"));
        assert_eq!(entry.label(), "B:LIG12");
    }

    #[test]
    fn push_attaches_structure_cell_to_molecule() {
        let cell = UnitCell::from_parameters(5.0, 6.0, 7.0, 90.0, 90.0, 90.0);
        let mut structure = Structure::new(cell);
        structure.push(MoleculeEntry::new("LIG", 'A', 1, single_atom("C")));
        assert_eq!(structure.molecules[0].molecule.cell(), cell.as_ref());
    }

    #[test]
    fn mark_solvents_matches_case_insensitively() {
        let mut structure = Structure::default();
        structure.push(MoleculeEntry::new("LIG", 'A', 1, single_atom("C")));
        structure.push(MoleculeEntry::new("hoh", 'A', 2, single_atom("O")));
        let names: HashSet<String> = ["HOH".to_string()].into_iter().collect();

        assert_eq!(structure.mark_solvents(&names), 1);
        assert!(!structure.molecules[0].is_solvent);
        assert!(structure.molecules[1].is_solvent);
        assert_eq!(structure.atom_count(), 2);
    }
}
