//! # pile_core - Axial Load-Transfer Engine for Single Piles
//!
//! `pile_core` computes the axial response of a single pile from Ménard
//! pressuremeter data, following NF P94-262 and the Frank & Zhao t-z / q-z
//! mobilization laws. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Pure**: slices and engines are immutable, every evaluation returns fresh state
//! - **JSON-First**: all types implement Serialize/Deserialize
//! - **Rich Errors**: malformed inputs fail with structured errors, solver
//!   trouble comes back as a flagged best-effort result
//!
//! ## Quick Start
//!
//! ```rust
//! use pile_core::calculations::{EquilibriumOptions, PileEquilibriumEngine};
//! use pile_core::project::PileCase;
//!
//! let case = PileCase::demo();
//! let engine = PileEquilibriumEngine::new(&case.pile)?;
//! let result = engine.solve_head_load(1.5, &EquilibriumOptions::default())?;
//! assert!(result.head_displacement > 0.0);
//! # Ok::<(), pile_core::errors::CalcError>(())
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Mobilization laws, slices, equilibrium, settlement, capacities
//! - [`pile`] - Pile geometry, discretization and pressuremeter resistances
//! - [`soils`] - Soil layers and pressuremeter logs
//! - [`standard`] - NF P94-262 tables
//! - [`curves`] - Piecewise-linear curves
//! - [`project`] - Case container, metadata, and settings
//! - [`file_io`] - Atomic case file saves
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod curves;
pub mod errors;
pub mod file_io;
pub mod pile;
pub mod project;
pub mod soils;
pub mod standard;
pub mod units;

pub use calculations::{analyze, CaseReport};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_case, save_case};
pub use pile::PileGeometry;
pub use project::{AnalysisSettings, CaseMetadata, PileCase};
pub use soils::SoilLayer;
