//! Synthetic molecules shared by unit tests across the crate.

use super::atom::Atom;
use super::molecule::Molecule;
use nalgebra::Point3;

const RING_RADIUS: f64 = 1.39;
const RING_CH_RADIUS: f64 = 2.47;

fn hexagon_point(radius: f64, k: usize, z: f64) -> Point3<f64> {
    let theta = (60.0 * k as f64).to_radians();
    Point3::new(radius * theta.cos(), radius * theta.sin(), z)
}

/// n-Propylbenzene with a fixed index layout:
///
/// - 0..=5: ring carbons (0 carries the propyl chain)
/// - 6..=10: ring hydrogens on carbons 1..=5
/// - 11: C7 (alpha), 12, 13: its hydrogens
/// - 14: C8 (beta), 15, 16: its hydrogens
/// - 17: C9 (gamma), 18, 19, 20: its hydrogens
pub fn propylbenzene() -> Molecule {
    let mut atoms: Vec<Atom> = (0..6)
        .map(|k| Atom::new("C", hexagon_point(RING_RADIUS, k, 0.0)))
        .collect();
    atoms.extend((1..6).map(|k| Atom::new("H", hexagon_point(RING_CH_RADIUS, k, 0.0))));
    atoms.extend([
        Atom::new("C", Point3::new(2.90, 0.00, 0.00)),
        Atom::new("H", Point3::new(3.26, -0.51, 0.89)),
        Atom::new("H", Point3::new(3.26, -0.51, -0.89)),
        Atom::new("C", Point3::new(3.41, 1.43, 0.00)),
        Atom::new("H", Point3::new(3.05, 1.94, 0.89)),
        Atom::new("H", Point3::new(3.05, 1.94, -0.89)),
        Atom::new("C", Point3::new(4.94, 1.43, 0.00)),
        Atom::new("H", Point3::new(5.30, 0.92, 0.89)),
        Atom::new("H", Point3::new(5.30, 0.92, -0.89)),
        Atom::new("H", Point3::new(5.30, 2.45, 0.00)),
    ]);

    let mut bonds: Vec<(usize, usize)> = (0..6).map(|k| (k, (k + 1) % 6)).collect();
    bonds.extend((1..6).map(|k| (k, k + 5)));
    bonds.extend([
        (0, 11),
        (11, 12),
        (11, 13),
        (11, 14),
        (14, 15),
        (14, 16),
        (14, 17),
        (17, 18),
        (17, 19),
        (17, 20),
    ]);
    Molecule::from_parts(atoms, bonds).unwrap()
}

/// A three-membered C-C-H cycle: a hydrogen inside a ring with no O/N nearby.
pub fn hydrogen_bridged_triangle() -> Molecule {
    Molecule::from_parts(
        vec![
            Atom::new("C", Point3::new(0.0, 0.0, 0.0)),
            Atom::new("C", Point3::new(1.5, 0.0, 0.0)),
            Atom::new("H", Point3::new(0.75, 0.9, 0.0)),
        ],
        [(0, 1), (1, 2), (2, 0)],
    )
    .unwrap()
}

/// A planar O-H-N-C square: the ring hydrogen sits next to O and N.
pub fn hydrogen_bonded_square() -> Molecule {
    Molecule::from_parts(
        vec![
            Atom::new("O", Point3::new(0.0, 0.0, 0.0)),
            Atom::new("H", Point3::new(1.0, 0.0, 0.0)),
            Atom::new("N", Point3::new(1.0, 1.0, 0.0)),
            Atom::new("C", Point3::new(0.0, 1.0, 0.0)),
        ],
        [(0, 1), (1, 2), (2, 3), (3, 0)],
    )
    .unwrap()
}

/// Chair cyclohexane carbon skeleton (no hydrogens); interior angles near 110 degrees.
pub fn chair_cyclohexane() -> Molecule {
    let atoms = (0..6)
        .map(|k| {
            let z = if k % 2 == 0 { 0.25 } else { -0.25 };
            Atom::new("C", hexagon_point(1.45, k, z))
        })
        .collect();
    Molecule::from_parts(atoms, (0..6).map(|k| (k, (k + 1) % 6))).unwrap()
}

/// A four-membered carbon loop hanging off atom 0, with a tail:
///
/// - 0: the protected atom, bonded to 1 and 2
/// - 1, 2: alpha atoms
/// - 3: beta atom bonded to both alphas
/// - 4: gamma atom on 3
pub fn doubly_anchored_branch() -> Molecule {
    let atoms = vec![
        Atom::new("C", Point3::new(0.0, 0.0, 0.0)),
        Atom::new("C", Point3::new(1.2, 0.8, 0.0)),
        Atom::new("C", Point3::new(1.2, -0.8, 0.0)),
        Atom::new("C", Point3::new(2.4, 0.0, 0.0)),
        Atom::new("C", Point3::new(3.9, 0.0, 0.0)),
    ];
    Molecule::from_parts(atoms, [(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)]).unwrap()
}
