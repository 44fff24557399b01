use thiserror::Error;

use crate::core::grid::SurfaceError;
use crate::core::models::MoleculeError;
use crate::core::utils::transform::GeometryError;
use crate::core::vdw::RadiiError;

use super::config::ConfigError;
use super::qm::QmError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("geometry transform failed: {source}")]
    Geometry {
        #[from]
        source: GeometryError,
    },

    #[error("van der Waals radius lookup failed: {source}")]
    Radii {
        #[from]
        source: RadiiError,
    },

    #[error("surface generation failed: {source}")]
    Surface {
        #[from]
        source: SurfaceError,
    },

    #[error("molecule state error: {source}")]
    Molecule {
        #[from]
        source: MoleculeError,
    },

    #[error("QM engine call failed: {source}")]
    Qm {
        #[from]
        source: QmError,
    },

    #[error("configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
