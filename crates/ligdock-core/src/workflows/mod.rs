//! # Workflows Module
//!
//! Top-level entry points for users of the library.
//!
//! - **Batch Docking** ([`batch`]) - Pre-flight, discovery, and the per-ligand docking state
//!   machine, plus a side-effect-free planner for dry runs.

pub mod batch;
