//! # Core Module
//!
//! This module provides the fundamental building blocks for RESP charge
//! derivation: molecular data structures, rigid-body geometry, van der Waals
//! surface sampling, and file I/O.
//!
//! ## Architecture
//!
//! The module is organized into specialized submodules that handle different
//! aspects of the geometric core:
//!
//! - **Molecular Representation** ([`models`]) - Ordered atom sequences with molecular charge state
//! - **Rigid Transforms** ([`utils`]) - Deterministic reorientation and rotation of coordinate sets
//! - **Radius Tables** ([`vdw`]) - Van der Waals radius sets and scale-factor resolution
//! - **Surface Sampling** ([`grid`]) - Unit-sphere banding, Connolly shells, and exclusion filtering
//! - **File I/O** ([`io`]) - Reading and writing XYZ geometry files
//!
//! ## Scientific Foundation
//!
//! The sampling algorithms follow the Connolly-shell scheme used by the
//! Merz-Singh-Kollman ESP charge protocol: concentric van der Waals surfaces
//! are built per scale factor, and a point survives only if it is visible from
//! the full atom set (outside every inner exclusion radius, inside every outer
//! bound). The rigid-body reorientation reproduces the R.E.D. alignment
//! convention so that grid placement is reproducible across runs.

pub mod grid;
pub mod io;
pub mod models;
pub mod utils;
pub mod vdw;
