//! # Workflows Module
//!
//! The highest-level, user-facing layer. Workflows tie the `core` and
//! `engine` layers together into complete procedures; the assembly workflow
//! runs every conformer through optimization, surface sampling, and ESP
//! evaluation, and returns the weighted normal-equation matrices the
//! downstream multi-conformer charge solver consumes.

pub mod assemble;

pub use assemble::{ConformerMatrices, run};
