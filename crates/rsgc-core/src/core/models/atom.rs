use crate::core::utils::elements::{self, normalize_symbol};
use nalgebra::Point3;

/// Represents an atom in a molecule.
///
/// The atom's identity within a [`Molecule`](super::molecule::Molecule) is its
/// position in the atom sequence; the struct itself only carries chemistry and
/// file-level labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Canonically capitalized element symbol (e.g. "C", "Cl", "D").
    pub element: String,
    /// Cartesian coordinates in Angstroms.
    pub position: Point3<f64>,
    /// Display name carried through file I/O (e.g. "C12", "H3A").
    pub name: String,
    /// Force-field type carried through file I/O (e.g. "C_R"). May be empty.
    pub force_field_type: String,
}

impl Atom {
    /// Creates an atom whose name is its element symbol and whose force-field
    /// type is empty.
    pub fn new(element: &str, position: Point3<f64>) -> Self {
        let element = normalize_symbol(element);
        Self {
            name: element.clone(),
            element,
            position,
            force_field_type: String::new(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.trim().to_string();
        self
    }

    pub fn with_force_field_type(mut self, ff_type: &str) -> Self {
        self.force_field_type = ff_type.trim().to_string();
        self
    }

    pub fn is_hydrogen(&self) -> bool {
        elements::is_hydrogen(&self.element)
    }

    pub fn is_carbon(&self) -> bool {
        elements::is_carbon(&self.element)
    }

    /// Turns this atom into a capping hydrogen at `position`.
    pub fn convert_to_hydrogen(&mut self, position: Point3<f64>) {
        self.element = "H".to_string();
        self.name = "H".to_string();
        self.force_field_type = "H_".to_string();
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_normalizes_element_and_defaults_labels() {
        let atom = Atom::new("cl", Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.element, "Cl");
        assert_eq!(atom.name, "Cl");
        assert_eq!(atom.force_field_type, "");
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn builder_methods_set_labels() {
        let atom = Atom::new("C", Point3::origin())
            .with_name(" C12 ")
            .with_force_field_type("C_R");
        assert_eq!(atom.name, "C12");
        assert_eq!(atom.force_field_type, "C_R");
    }

    #[test]
    fn element_predicates_recognize_hydrogen_isotopes_and_carbon() {
        assert!(Atom::new("D", Point3::origin()).is_hydrogen());
        assert!(Atom::new("C", Point3::origin()).is_carbon());
        assert!(!Atom::new("Cl", Point3::origin()).is_carbon());
    }

    #[test]
    fn convert_to_hydrogen_rewrites_element_labels_and_position() {
        let mut atom = Atom::new("C", Point3::origin())
            .with_name("C8")
            .with_force_field_type("C_3");
        atom.convert_to_hydrogen(Point3::new(0.97, 0.0, 0.0));
        assert_eq!(atom.element, "H");
        assert_eq!(atom.name, "H");
        assert_eq!(atom.force_field_type, "H_");
        assert_eq!(atom.position, Point3::new(0.97, 0.0, 0.0));
    }
}
