use nalgebra::{DMatrix, DVector, Point3};
use tracing::debug;

use crate::core::grid::{ConnollyShell, sample_vdw_surface};
use crate::core::models::Molecule;

use super::cache::{ArrayCache, cache_key};
use super::config::GridConfig;
use super::error::EngineError;
use super::qm::{QmEngine, QmError};

/// One rigidly transformed variant of a conformer's geometry.
///
/// An orientation owns its derived geometry (same atoms, same order, different
/// coordinates), its lazily computed surface grid, the ESP values the QM
/// collaborator supplied for that grid, and nothing else. Orientations are
/// created by their parent conformer and never mutated afterwards; any change
/// to the base geometry discards and regenerates the whole list.
#[derive(Debug, Clone)]
pub struct Orientation {
    name: String,
    molecule: Molecule,
    grid: Option<Vec<Point3<f64>>>,
    esp: Option<DVector<f64>>,
}

impl Orientation {
    pub(crate) fn new(name: String, molecule: Molecule) -> Self {
        Self {
            name,
            molecule,
            grid: None,
            esp: None,
        }
    }

    /// The orientation name, `{conformer}_o{NNN}` with a 1-based index.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn molecule(&self) -> &Molecule {
        &self.molecule
    }

    pub fn n_atoms(&self) -> usize {
        self.molecule.n_atoms()
    }

    /// The surface grid, if it has been computed.
    pub fn grid(&self) -> Option<&[Point3<f64>]> {
        self.grid.as_deref()
    }

    /// The ESP values at the grid points, if they have been computed.
    pub fn esp(&self) -> Option<&DVector<f64>> {
        self.esp.as_ref()
    }

    /// Propagates a conformer-level charge-state change.
    ///
    /// The geometry is untouched, so the grid stays valid, but any ESP values
    /// were computed for the old charge state and are discarded.
    pub(crate) fn set_charge_state(
        &mut self,
        charge: i32,
        multiplicity: u32,
    ) -> Result<(), EngineError> {
        self.molecule.set_charge_state(charge, multiplicity)?;
        self.esp = None;
        Ok(())
    }

    /// Computes and caches the surface grid for this orientation's geometry.
    ///
    /// The configured shells are filtered against this orientation's
    /// coordinates and concatenated in shell order. A cached grid (keyed by
    /// the orientation name) is accepted verbatim and skips recomputation.
    pub fn ensure_grid(
        &mut self,
        shells: &[ConnollyShell],
        config: &GridConfig,
        cache: &dyn ArrayCache,
    ) -> Result<&[Point3<f64>], EngineError> {
        if self.grid.is_none() {
            let key = cache_key(&self.name, "grid");
            let cached = cache.load(&key).and_then(unflatten_points);
            let points = match cached {
                Some(points) => {
                    debug!(orientation = %self.name, n_points = points.len(), "grid cache hit");
                    points
                }
                None => {
                    let coordinates = self.molecule.coordinates();
                    let points =
                        sample_vdw_surface(shells, &coordinates, config.rmin, config.rmax)?;
                    cache.store(&key, &flatten_points(&points));
                    points
                }
            };
            self.grid = Some(points);
        }
        Ok(self.grid.as_deref().unwrap())
    }

    /// Requests ESP values for the grid points from the QM engine.
    ///
    /// Cached values are accepted verbatim; otherwise the engine is invoked
    /// and its output validated against the grid size before anything is
    /// committed. A failed engine call leaves the orientation without ESP
    /// values rather than with partial ones.
    pub fn ensure_esp(
        &mut self,
        shells: &[ConnollyShell],
        config: &GridConfig,
        engine: &dyn QmEngine,
        cache: &dyn ArrayCache,
    ) -> Result<&DVector<f64>, EngineError> {
        self.ensure_grid(shells, config, cache)?;
        if self.esp.is_none() {
            let grid = self.grid.as_deref().unwrap();
            let key = cache_key(&self.name, "esp");
            let cached = cache
                .load(&key)
                .filter(|values| values.len() == grid.len());
            let values = match cached {
                Some(values) => {
                    debug!(orientation = %self.name, "esp cache hit");
                    values
                }
                None => {
                    let values = engine.evaluate_esp(&self.molecule, grid)?;
                    if values.len() != grid.len() {
                        return Err(QmError::PotentialCountMismatch {
                            expected: grid.len(),
                            actual: values.len(),
                        }
                        .into());
                    }
                    cache.store(&key, &values);
                    values
                }
            };
            self.esp = Some(DVector::from_vec(values));
        }
        Ok(self.esp.as_ref().unwrap())
    }

    /// This orientation's contribution to the conformer A matrix:
    /// `A[p, q] = Σ_g 1/(r_pg · r_qg)` over grid points g.
    ///
    /// Purely geometric; no QM involvement.
    pub fn esp_matrix_a(
        &mut self,
        shells: &[ConnollyShell],
        config: &GridConfig,
        cache: &dyn ArrayCache,
    ) -> Result<DMatrix<f64>, EngineError> {
        self.ensure_grid(shells, config, cache)?;
        let r_inv = self.inverse_distances();
        Ok(&r_inv * r_inv.transpose())
    }

    /// This orientation's contribution to the conformer B vector:
    /// `B[p] = Σ_g V(g)/r_pg`, with V the QM-supplied potential.
    pub fn esp_matrix_b(
        &mut self,
        shells: &[ConnollyShell],
        config: &GridConfig,
        engine: &dyn QmEngine,
        cache: &dyn ArrayCache,
    ) -> Result<DVector<f64>, EngineError> {
        self.ensure_esp(shells, config, engine, cache)?;
        let r_inv = self.inverse_distances();
        Ok(&r_inv * self.esp.as_ref().unwrap())
    }

    /// The inverse-distance design matrix, atoms by grid points.
    fn inverse_distances(&self) -> DMatrix<f64> {
        let grid = self.grid.as_deref().unwrap_or(&[]);
        let coordinates = self.molecule.coordinates();
        DMatrix::from_fn(coordinates.len(), grid.len(), |p, g| {
            1.0 / (coordinates[p] - grid[g]).norm()
        })
    }
}

fn flatten_points(points: &[Point3<f64>]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
}

fn unflatten_points(flat: Vec<f64>) -> Option<Vec<Point3<f64>>> {
    if flat.len() % 3 != 0 {
        return None;
    }
    Some(
        flat.chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect(),
    )
}
