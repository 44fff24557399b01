use nalgebra::{DMatrix, DVector};
use tracing::{info, instrument};

use crate::engine::cache::ArrayCache;
use crate::engine::conformer::Conformer;
use crate::engine::error::EngineError;
use crate::engine::executor::Execution;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::qm::QmEngine;

/// The per-conformer output of the assembly workflow: the weighted
/// normal-equation components `A·q ≈ B` for that conformer's orientations.
///
/// A downstream multi-conformer solver combines these additively (the
/// per-conformer weight is already applied quadratically) and solves for the
/// charges under its own constraints.
#[derive(Debug, Clone)]
pub struct ConformerMatrices {
    pub name: String,
    pub a: DMatrix<f64>,
    pub b: DVector<f64>,
    pub n_orientations: usize,
}

/// Runs the full per-conformer pipeline for every conformer.
///
/// Each conformer is optimized (when flagged), its orientations' surface
/// grids are generated, ESP values are obtained from the QM engine (through
/// the cache), and the weighted A and B matrices are assembled. A failure in
/// any step aborts that conformer's pipeline with no partial matrices; the
/// error carries which conformer failed via logging.
#[instrument(skip_all, name = "assemble_workflow", fields(n_conformers = conformers.len()))]
pub fn run(
    conformers: &mut [Conformer],
    engine: &dyn QmEngine,
    cache: &dyn ArrayCache,
    execution: Execution,
    reporter: &ProgressReporter,
) -> Result<Vec<ConformerMatrices>, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Geometry optimization",
    });
    reporter.report(Progress::TaskStart {
        total: conformers.len() as u64,
    });
    for conformer in conformers.iter_mut() {
        conformer.optimize(engine, execution)?;
        reporter.report(Progress::TaskIncrement { amount: 1 });
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Matrix assembly",
    });
    reporter.report(Progress::TaskStart {
        total: conformers.len() as u64,
    });
    let mut results = Vec::with_capacity(conformers.len());
    for conformer in conformers.iter_mut() {
        let a = conformer.weighted_a_matrix(cache)?;
        let b = conformer.weighted_b_matrix(engine, cache, execution)?;
        info!(
            conformer = conformer.name(),
            n_orientations = conformer.n_orientations(),
            "assembled weighted matrices"
        );
        results.push(ConformerMatrices {
            name: conformer.name().to_string(),
            a,
            b,
            n_orientations: conformer.n_orientations(),
        });
        reporter.report(Progress::TaskIncrement { amount: 1 });
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    Ok(results)
}
