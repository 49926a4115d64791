use super::atom::Atom;
use super::cell::UnitCell;
use super::graph::{BondGraph, GraphError, IndexRemap};
use crate::core::utils::elements;
use crate::core::utils::geometry::angle_between_degrees;
use nalgebra::{Point3, Vector3};
use std::collections::BTreeSet;

/// A single molecule: an ordered atom sequence and the bond graph over it.
///
/// The graph's node set always equals the index range of the atom sequence.
/// Every structural edit goes through [`Molecule::add_atom`] or
/// [`Molecule::remove_atoms`], which keep the two in step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
    graph: BondGraph,
    cell: Option<UnitCell>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a molecule from atoms and bonds given as index pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if a bond references a missing atom or bonds an atom to itself.
    pub fn from_parts(
        atoms: Vec<Atom>,
        bonds: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<Self, GraphError> {
        let mut graph = BondGraph::with_nodes(atoms.len());
        for (a, b) in bonds {
            graph.add_edge(a, b)?;
        }
        Ok(Self {
            atoms,
            graph,
            cell: None,
        })
    }

    pub fn with_cell(mut self, cell: Option<UnitCell>) -> Self {
        self.cell = cell;
        self
    }

    pub fn cell(&self) -> Option<&UnitCell> {
        self.cell.as_ref()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn atom_mut(&mut self, index: usize) -> Option<&mut Atom> {
        self.atoms.get_mut(index)
    }

    pub fn graph(&self) -> &BondGraph {
        &self.graph
    }

    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph.neighbors(index)
    }

    pub fn degree(&self, index: usize) -> usize {
        self.graph.degree(index)
    }

    pub fn element(&self, index: usize) -> Option<&str> {
        self.atoms.get(index).map(|atom| atom.element.as_str())
    }

    pub fn position(&self, index: usize) -> Option<Point3<f64>> {
        self.atoms.get(index).map(|atom| atom.position)
    }

    /// Appends an atom (and its graph node) and returns its index.
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.graph.add_node()
    }

    pub fn add_bond(&mut self, a: usize, b: usize) -> Result<bool, GraphError> {
        self.graph.add_edge(a, b)
    }

    /// Removes the given atoms and relabels the graph under the same remap.
    ///
    /// Atoms are deleted highest index first so the lower indices stay valid
    /// while the sequence shrinks.
    pub fn remove_atoms(&mut self, removed: &BTreeSet<usize>) -> IndexRemap {
        for &index in removed.iter().rev() {
            if index < self.atoms.len() {
                self.atoms.remove(index);
            }
        }
        self.graph.remove_nodes(removed)
    }

    /// Whether the graph node set matches the atom index range.
    pub fn is_consistent(&self) -> bool {
        self.atoms.len() == self.graph.node_count()
    }

    /// Displacement vector from atom `from` to atom `to`, optionally wrapped to
    /// its minimum periodic image when the molecule has a cell.
    pub fn displacement(&self, from: usize, to: usize, minimum_image: bool) -> Option<Vector3<f64>> {
        let d = self.position(to)? - self.position(from)?;
        match (minimum_image, &self.cell) {
            (true, Some(cell)) => Some(cell.minimum_image(&d)),
            _ => Some(d),
        }
    }

    pub fn distance(&self, a: usize, b: usize) -> Option<f64> {
        self.displacement(a, b, false).map(|d| d.norm())
    }

    /// The angle `a`-`center`-`b` in degrees.
    pub fn angle_degrees(
        &self,
        a: usize,
        center: usize,
        b: usize,
        minimum_image: bool,
    ) -> Option<f64> {
        let v1 = self.displacement(center, a, minimum_image)?;
        let v2 = self.displacement(center, b, minimum_image)?;
        Some(angle_between_degrees(&v1, &v2))
    }

    /// Mass-weighted center of the molecule.
    ///
    /// Returns `None` for an empty molecule or when any element has no known mass.
    pub fn center_of_mass(&self) -> Option<Point3<f64>> {
        let mut total_mass = 0.0;
        let mut weighted = Vector3::zeros();
        for atom in &self.atoms {
            let mass = elements::atomic_mass(&atom.element)?;
            total_mass += mass;
            weighted += atom.position.coords * mass;
        }
        (total_mass > 0.0).then(|| Point3::from(weighted / total_mass))
    }
}
