//! # Engine Module
//!
//! This module implements the stateful per-conformer pipeline for RESP charge
//! derivation: orientation generation, surface-grid ownership, ESP evaluation
//! through the quantum-chemistry collaborator, and accumulation of the
//! normal-equation matrices.
//!
//! ## Architecture
//!
//! The module is organized into specialized submodules:
//!
//! - **Configuration** ([`config`]) - Grid and orientation-generation parameters
//! - **Conformers** ([`conformer`]) - Base geometries, optimization state, matrix aggregation
//! - **Orientations** ([`orientation`]) - Rigidly transformed geometries and their contributions
//! - **QM Contract** ([`qm`]) - The external quantum-chemistry engine interface
//! - **Caching** ([`cache`]) - Pluggable numeric-array persistence with stable keys
//! - **Execution** ([`executor`]) - Inline versus thread-pool execution of QM-bound work
//! - **Equivalence** ([`equivalence`]) - Union-find grouping of charge-equivalent atoms
//! - **Progress Monitoring** ([`progress`]) - Progress reporting callbacks
//! - **Error Handling** ([`error`]) - Engine-wide error aggregation

pub mod cache;
pub mod config;
pub mod conformer;
pub mod equivalence;
pub mod error;
pub mod executor;
pub mod orientation;
pub mod progress;
pub mod qm;
