use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::core::grid::{ConnollyShell, connolly_shells};
use crate::core::models::Molecule;
use crate::core::utils::transform::{orient_rigid, rotate_rigid};

use super::cache::ArrayCache;
use super::config::{GridConfig, OrientationConfig};
use super::error::EngineError;
use super::executor::Execution;
use super::orientation::Orientation;
use super::qm::{QmEngine, QmError};

/// Progress of a conformer through geometry optimization.
///
/// A failed engine call leaves the conformer in `Optimizing` so the caller
/// can distinguish "never attempted" from "attempted and unresolved"; the
/// matrices stay unavailable until the state resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationState {
    Unoptimized,
    Optimizing,
    Optimized,
}

/// One conformer: a base geometry, its orientations, and the accumulated
/// normal-equation matrices.
///
/// The conformer owns everything derived from its base geometry. Replacing
/// the geometry (on optimization completion) regenerates the orientation list
/// from scratch and drops every cached product; there is no partial update.
#[derive(Debug, Clone)]
pub struct Conformer {
    name: String,
    molecule: Molecule,
    weight: f64,
    optimize_geometry: bool,
    state: OptimizationState,
    grid_config: GridConfig,
    orientation_config: OrientationConfig,
    orientations: Vec<Orientation>,
    shells: Option<Vec<ConnollyShell>>,
    unweighted_a: Option<DMatrix<f64>>,
    unweighted_b: Option<DVector<f64>>,
}

impl Conformer {
    pub fn builder(name: &str, molecule: Molecule) -> ConformerBuilder {
        ConformerBuilder::new(name, molecule)
    }

    /// Creates a conformer with default weight, configs, and no geometry
    /// optimization.
    pub fn new(name: &str, molecule: Molecule) -> Result<Self, EngineError> {
        Self::builder(name, molecule).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn molecule(&self) -> &Molecule {
        &self.molecule
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn state(&self) -> OptimizationState {
        self.state
    }

    pub fn n_atoms(&self) -> usize {
        self.molecule.n_atoms()
    }

    pub fn n_orientations(&self) -> usize {
        self.orientations.len()
    }

    pub fn orientations(&self) -> &[Orientation] {
        &self.orientations
    }

    pub fn grid_config(&self) -> &GridConfig {
        &self.grid_config
    }

    /// Clones this conformer under a new name with a fresh state machine and
    /// freshly generated orientations. `None` appends `_copy` to the name.
    pub fn clone_with_name(&self, name: Option<&str>) -> Result<Self, EngineError> {
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("{}_copy", self.name),
        };
        ConformerBuilder::new(&name, self.molecule.clone())
            .weight(self.weight)
            .optimize_geometry(self.optimize_geometry)
            .grid_config(self.grid_config.clone())
            .orientation_config(self.orientation_config.clone())
            .build()
    }

    /// Updates charge and multiplicity atomically across the base geometry
    /// and every orientation.
    ///
    /// The geometry is untouched, so grids and the A matrix survive, but ESP
    /// values and the B vector were computed for the old charge state and are
    /// invalidated.
    pub fn set_charge_state(&mut self, charge: i32, multiplicity: u32) -> Result<(), EngineError> {
        self.molecule.set_charge_state(charge, multiplicity)?;
        for orientation in &mut self.orientations {
            orientation.set_charge_state(charge, multiplicity)?;
        }
        self.unweighted_b = None;
        Ok(())
    }

    /// Regenerates the orientation list from the current base geometry.
    ///
    /// Order is fixed and part of the naming contract: the original geometry
    /// (when kept, or when no transforms are configured), then every
    /// reorientation, rotation, and translation in configured order. All
    /// cached matrices are invalidated.
    pub fn generate_orientations(&mut self) -> Result<(), EngineError> {
        let coords = self.molecule.coordinates();
        let config = self.orientation_config.clone();
        let mut molecules = Vec::with_capacity(config.n_transforms() + 1);

        if config.keep_original || config.n_transforms() == 0 {
            molecules.push(self.molecule.clone());
        }
        for &(i, j, k) in &config.reorientations {
            let xyz = orient_rigid(i, j, k, &coords)?;
            molecules.push(self.molecule.with_coordinates(&xyz)?);
        }
        for &(i, j, k) in &config.rotations {
            let xyz = rotate_rigid(i, j, k, &coords)?;
            molecules.push(self.molecule.with_coordinates(&xyz)?);
        }
        for &shift in &config.translations {
            molecules.push(self.molecule.translated(shift));
        }

        self.orientations = molecules
            .into_iter()
            .enumerate()
            .map(|(index, molecule)| {
                Orientation::new(format!("{}_o{:03}", self.name, index + 1), molecule)
            })
            .collect();
        self.unweighted_a = None;
        self.unweighted_b = None;
        debug!(
            conformer = %self.name,
            n_orientations = self.orientations.len(),
            "regenerated orientations"
        );
        Ok(())
    }

    /// Runs geometry optimization through the QM engine.
    ///
    /// A no-op if the conformer was built without the optimization flag or is
    /// already optimized. On success the base geometry is replaced and the
    /// orientation list regenerated; on failure the state stays `Optimizing`
    /// and nothing is replaced.
    pub fn optimize(
        &mut self,
        engine: &dyn QmEngine,
        execution: Execution,
    ) -> Result<(), EngineError> {
        if !self.optimize_geometry || self.state == OptimizationState::Optimized {
            return Ok(());
        }
        self.state = OptimizationState::Optimizing;

        let molecule = &self.molecule;
        let optimized = execution.run(|| engine.optimize_geometry(molecule))?;

        if optimized.symbols() != self.molecule.symbols() {
            return Err(QmError::GeometryMismatch {
                reason: format!(
                    "engine returned {} atoms for {}-atom input",
                    optimized.n_atoms(),
                    self.molecule.n_atoms()
                ),
            }
            .into());
        }

        self.molecule = self.molecule.with_coordinates(&optimized.coordinates())?;
        self.state = OptimizationState::Optimized;
        info!(conformer = %self.name, "geometry optimized");
        self.generate_orientations()
    }

    fn ensure_shells(&mut self) -> Result<(), EngineError> {
        if self.shells.is_none() {
            let symbols = self.molecule.symbols();
            let shells = connolly_shells(
                &symbols,
                &self.grid_config.radii,
                &self.grid_config.scale_factors,
                self.grid_config.density,
            )?;
            self.shells = Some(shells);
        }
        Ok(())
    }

    /// The element-wise sum of every orientation's A contribution; cached
    /// until the orientation list changes.
    pub fn unweighted_a_matrix(
        &mut self,
        cache: &dyn ArrayCache,
    ) -> Result<DMatrix<f64>, EngineError> {
        if self.unweighted_a.is_none() {
            self.ensure_shells()?;
            let shells = self.shells.as_deref().unwrap();
            let mut a = DMatrix::zeros(self.molecule.n_atoms(), self.molecule.n_atoms());
            for orientation in self.orientations.iter_mut() {
                a += orientation.esp_matrix_a(shells, &self.grid_config, cache)?;
            }
            self.unweighted_a = Some(a);
        }
        Ok(self.unweighted_a.clone().unwrap())
    }

    /// The element-wise sum of every orientation's B contribution; cached
    /// until the orientation list or any ESP value changes.
    ///
    /// Under [`Execution::Pool`], per-orientation ESP evaluation fans out
    /// across the pool; contributions may complete in any order and the sum
    /// is only formed once every task has finished.
    pub fn unweighted_b_matrix(
        &mut self,
        engine: &dyn QmEngine,
        cache: &dyn ArrayCache,
        execution: Execution,
    ) -> Result<DVector<f64>, EngineError> {
        if self.unweighted_b.is_none() {
            self.ensure_shells()?;
            let shells = self.shells.as_deref().unwrap();
            let grid_config = &self.grid_config;
            let orientations = &mut self.orientations;

            let contributions: Vec<Result<DVector<f64>, EngineError>> =
                if execution.is_parallel() {
                    execution.run(|| {
                        orientations
                            .par_iter_mut()
                            .map(|o| o.esp_matrix_b(shells, grid_config, engine, cache))
                            .collect()
                    })
                } else {
                    orientations
                        .iter_mut()
                        .map(|o| o.esp_matrix_b(shells, grid_config, engine, cache))
                        .collect()
                };

            let mut b = DVector::zeros(self.molecule.n_atoms());
            for contribution in contributions {
                b += contribution?;
            }
            self.unweighted_b = Some(b);
        }
        Ok(self.unweighted_b.clone().unwrap())
    }

    /// The conformer's A matrix scaled by `weight²`, ready for additive
    /// combination across conformers.
    pub fn weighted_a_matrix(
        &mut self,
        cache: &dyn ArrayCache,
    ) -> Result<DMatrix<f64>, EngineError> {
        Ok(self.unweighted_a_matrix(cache)? * (self.weight * self.weight))
    }

    /// The conformer's B vector scaled by `weight²`.
    pub fn weighted_b_matrix(
        &mut self,
        engine: &dyn QmEngine,
        cache: &dyn ArrayCache,
        execution: Execution,
    ) -> Result<DVector<f64>, EngineError> {
        Ok(self.unweighted_b_matrix(engine, cache, execution)? * (self.weight * self.weight))
    }
}

pub struct ConformerBuilder {
    name: String,
    molecule: Molecule,
    weight: f64,
    optimize_geometry: bool,
    charge_state: Option<(i32, u32)>,
    grid_config: GridConfig,
    orientation_config: OrientationConfig,
}

impl ConformerBuilder {
    pub fn new(name: &str, molecule: Molecule) -> Self {
        Self {
            name: name.to_string(),
            molecule,
            weight: 1.0,
            optimize_geometry: false,
            charge_state: None,
            grid_config: GridConfig::default(),
            orientation_config: OrientationConfig::default(),
        }
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn optimize_geometry(mut self, optimize: bool) -> Self {
        self.optimize_geometry = optimize;
        self
    }

    pub fn grid_config(mut self, config: GridConfig) -> Self {
        self.grid_config = config;
        self
    }

    pub fn orientation_config(mut self, config: OrientationConfig) -> Self {
        self.orientation_config = config;
        self
    }

    /// Sets the molecular charge and multiplicity; validated in [`build`].
    ///
    /// [`build`]: ConformerBuilder::build
    pub fn charge_state(mut self, charge: i32, multiplicity: u32) -> Self {
        self.charge_state = Some((charge, multiplicity));
        self
    }

    pub fn build(mut self) -> Result<Conformer, EngineError> {
        if let Some((charge, multiplicity)) = self.charge_state {
            self.molecule.set_charge_state(charge, multiplicity)?;
        }
        let mut conformer = Conformer {
            name: self.name,
            molecule: self.molecule,
            weight: self.weight,
            optimize_geometry: self.optimize_geometry,
            state: OptimizationState::Unoptimized,
            grid_config: self.grid_config,
            orientation_config: self.orientation_config,
            orientations: Vec::new(),
            shells: None,
            unweighted_a: None,
            unweighted_b: None,
        };
        conformer.generate_orientations()?;
        Ok(conformer)
    }
}
