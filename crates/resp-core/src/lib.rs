//! # respfit Core Library
//!
//! A library for deriving Restrained Electrostatic Potential (RESP) atomic partial
//! charges for small molecules, focused on the deterministic geometry and
//! linear-system assembly that feeds the charge fit.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear
//! separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models (`Molecule`),
//!   pure geometric algorithms (rigid-body reorientation, Connolly surface
//!   sampling), van der Waals radius tables, and I/O utilities.
//!
//! - **[`engine`]: The Logic Core.** This stateful layer orchestrates the
//!   per-conformer pipeline. It owns the `Conformer`/`Orientation` state
//!   machinery, the least-squares matrix accumulation, the execution strategy
//!   for QM-bound work, and the pluggable array cache.
//!
//! - **[`workflows`]: The Public API.** This is the highest-level, user-facing
//!   layer. It ties the `engine` and `core` together to run the complete
//!   per-conformer assembly procedure, producing the weighted normal-equation
//!   matrices consumed by a downstream multi-conformer charge solver.

pub mod core;
pub mod engine;
pub mod workflows;
