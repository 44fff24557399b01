use crate::core::models::Molecule;
use nalgebra::Point3;
use thiserror::Error;

/// Failures surfaced by the external quantum-chemistry engine.
///
/// Engine failures are always distinguishable errors, never silently empty or
/// zeroed results; the caller decides whether to retry or drop the conformer.
#[derive(Debug, Error)]
pub enum QmError {
    #[error("QM engine process failed: {0}")]
    ProcessFailed(String),

    #[error("failed to parse QM engine output: {0}")]
    MalformedOutput(String),

    #[error("QM engine returned {actual} potential values for {expected} grid points")]
    PotentialCountMismatch { expected: usize, actual: usize },

    #[error("optimized geometry does not match the input: {reason}")]
    GeometryMismatch { reason: String },
}

/// Contract for the external quantum-chemistry collaborator.
///
/// Implementations wrap whatever process or service actually computes
/// wavefunctions; the core only relies on these two operations and on the
/// guarantee that an optimized geometry preserves atom count and ordering.
pub trait QmEngine: Send + Sync {
    /// Optimizes a geometry, returning a molecule with the same atoms in the
    /// same order at relaxed coordinates.
    fn optimize_geometry(&self, molecule: &Molecule) -> Result<Molecule, QmError>;

    /// Evaluates the electrostatic potential at each query point, in point
    /// order, for the given geometry and charge state.
    fn evaluate_esp(&self, molecule: &Molecule, points: &[Point3<f64>])
    -> Result<Vec<f64>, QmError>;
}
