pub mod solver;
pub mod sor;
pub mod timing;

use nalgebra::DVector;

pub enum Tolerance {
    Absolute(f64),
}

impl Tolerance {
    /// Met when the norm is at or below the target. NaN is never met.
    pub fn is_met(&self, norm: f64) -> bool {
        match *self {
            Tolerance::Absolute(tol) => norm <= tol,
        }
    }
}

/// `Σ|new − old| / Σ old`, the change metric of the outer fixed-point loop.
/// Not normalised by absolute values: a field that sums to zero yields an
/// infinite or NaN metric.
pub fn relative_change(new: &DVector<f64>, old: &DVector<f64>) -> f64 {
    let diff: f64 = new.iter().zip(old.iter()).map(|(a, b)| (a - b).abs()).sum();
    diff / old.sum()
}
