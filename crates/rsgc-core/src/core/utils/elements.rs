use phf::{Map, Set, phf_map, phf_set};

static HYDROGEN_ISOTOPES: Set<&'static str> = phf_set! { "H", "D", "T" };

static HYDROGEN_BOND_PARTNERS: Set<&'static str> = phf_set! { "O", "N" };

static ATOMIC_MASSES: Map<&'static str, f64> = phf_map! {
    "H" => 1.008, "D" => 2.014, "T" => 3.016, "He" => 4.0026,
    "Li" => 6.94, "Be" => 9.0122, "B" => 10.81, "C" => 12.011, "N" => 14.007,
    "O" => 15.999, "F" => 18.998, "Ne" => 20.180,
    "Na" => 22.990, "Mg" => 24.305, "Al" => 26.982, "Si" => 28.085, "P" => 30.974,
    "S" => 32.06, "Cl" => 35.45, "Ar" => 39.948,
    "K" => 39.098, "Ca" => 40.078, "Sc" => 44.956, "Ti" => 47.867, "V" => 50.942,
    "Cr" => 51.996, "Mn" => 54.938, "Fe" => 55.845, "Co" => 58.933, "Ni" => 58.693,
    "Cu" => 63.546, "Zn" => 65.38, "Ga" => 69.723, "Ge" => 72.630, "As" => 74.922,
    "Se" => 78.971, "Br" => 79.904, "Kr" => 83.798,
    "Rb" => 85.468, "Sr" => 87.62, "Y" => 88.906, "Zr" => 91.224, "Nb" => 92.906,
    "Mo" => 95.95, "Tc" => 97.0, "Ru" => 101.07, "Rh" => 102.91, "Pd" => 106.42,
    "Ag" => 107.87, "Cd" => 112.41, "In" => 114.82, "Sn" => 118.71, "Sb" => 121.76,
    "Te" => 127.60, "I" => 126.90, "Xe" => 131.29,
    "Cs" => 132.91, "Ba" => 137.33, "La" => 138.91, "Hf" => 178.49, "Ta" => 180.95,
    "W" => 183.84, "Re" => 186.21, "Os" => 190.23, "Ir" => 192.22, "Pt" => 195.08,
    "Au" => 196.97, "Hg" => 200.59, "Tl" => 204.38, "Pb" => 207.2, "Bi" => 208.98,
};

/// Normalizes an element symbol to its canonical capitalization ("CL" -> "Cl").
pub fn normalize_symbol(symbol: &str) -> String {
    let trimmed = symbol.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Hydrogen and its isotopes (H, D, T).
pub fn is_hydrogen(symbol: &str) -> bool {
    HYDROGEN_ISOTOPES.contains(symbol)
}

pub fn is_carbon(symbol: &str) -> bool {
    symbol == "C"
}

pub fn is_heavy(symbol: &str) -> bool {
    !is_hydrogen(symbol)
}

/// Elements a ring hydrogen may be hydrogen-bonded through.
pub fn is_hydrogen_bond_partner(symbol: &str) -> bool {
    HYDROGEN_BOND_PARTNERS.contains(symbol)
}

pub fn atomic_mass(symbol: &str) -> Option<f64> {
    ATOMIC_MASSES.get(symbol).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_symbol_fixes_capitalization_and_whitespace() {
        assert_eq!(normalize_symbol("CL"), "Cl");
        assert_eq!(normalize_symbol(" c "), "C");
        assert_eq!(normalize_symbol("br"), "Br");
        assert_eq!(normalize_symbol(""), "");
    }

    #[test]
    fn hydrogen_isotopes_are_hydrogen() {
        assert!(is_hydrogen("H"));
        assert!(is_hydrogen("D"));
        assert!(is_hydrogen("T"));
        assert!(!is_hydrogen("He"));
        assert!(!is_hydrogen("C"));
    }

    #[test]
    fn heavy_atoms_exclude_all_hydrogen_isotopes() {
        assert!(is_heavy("C"));
        assert!(is_heavy("S"));
        assert!(!is_heavy("D"));
    }

    #[test]
    fn only_oxygen_and_nitrogen_are_hydrogen_bond_partners() {
        assert!(is_hydrogen_bond_partner("O"));
        assert!(is_hydrogen_bond_partner("N"));
        assert!(!is_hydrogen_bond_partner("S"));
        assert!(!is_hydrogen_bond_partner("C"));
    }

    #[test]
    fn atomic_mass_is_known_for_common_organic_elements() {
        assert_eq!(atomic_mass("C"), Some(12.011));
        assert!(atomic_mass("H").unwrap() < atomic_mass("D").unwrap());
        assert!(atomic_mass("Xx").is_none());
    }
}
