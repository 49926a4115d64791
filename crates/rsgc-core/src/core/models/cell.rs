use nalgebra::{Matrix3, Vector3};

/// A periodic unit cell described by its three lattice vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitCell {
    /// Columns are the lattice vectors `a`, `b`, `c` in Angstroms.
    lattice: Matrix3<f64>,
    inverse: Matrix3<f64>,
}

impl UnitCell {
    /// Creates a cell from three lattice vectors, or `None` if they are coplanar.
    pub fn from_vectors(a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>) -> Option<Self> {
        let lattice = Matrix3::from_columns(&[a, b, c]);
        let inverse = lattice.try_inverse()?;
        Some(Self { lattice, inverse })
    }

    /// Creates a cell from lengths (Angstroms) and angles (degrees), with `a`
    /// along x and `b` in the xy plane.
    pub fn from_parameters(
        a: f64,
        b: f64,
        c: f64,
        alpha: f64,
        beta: f64,
        gamma: f64,
    ) -> Option<Self> {
        let (cos_alpha, cos_beta) = (alpha.to_radians().cos(), beta.to_radians().cos());
        let (sin_gamma, cos_gamma) = gamma.to_radians().sin_cos();
        if sin_gamma.abs() < 1e-12 || a <= 0.0 || b <= 0.0 || c <= 0.0 {
            return None;
        }
        let cx = c * cos_beta;
        let cy = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let cz_squared = c * c - cx * cx - cy * cy;
        if cz_squared <= 0.0 {
            return None;
        }
        Self::from_vectors(
            Vector3::new(a, 0.0, 0.0),
            Vector3::new(b * cos_gamma, b * sin_gamma, 0.0),
            Vector3::new(cx, cy, cz_squared.sqrt()),
        )
    }

    pub fn vector(&self, axis: usize) -> Vector3<f64> {
        self.lattice.column(axis).into_owned()
    }

    /// Lengths and angles `[a, b, c, alpha, beta, gamma]`.
    pub fn parameters(&self) -> [f64; 6] {
        let (a, b, c) = (self.vector(0), self.vector(1), self.vector(2));
        let angle = |u: &Vector3<f64>, v: &Vector3<f64>| {
            (u.dot(v) / (u.norm() * v.norm()))
                .clamp(-1.0, 1.0)
                .acos()
                .to_degrees()
        };
        [
            a.norm(),
            b.norm(),
            c.norm(),
            angle(&b, &c),
            angle(&a, &c),
            angle(&a, &b),
        ]
    }

    /// Shortest periodic image of the displacement `d`.
    ///
    /// Wraps each fractional component into `[-0.5, 0.5]`, which is exact for
    /// orthogonal cells and a close approximation for moderately skewed ones.
    pub fn minimum_image(&self, d: &Vector3<f64>) -> Vector3<f64> {
        let fractional = self.inverse * d;
        let wrapped = fractional.map(|f| f - f.round());
        self.lattice * wrapped
    }
}
