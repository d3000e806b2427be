//! # ligdock Core Library
//!
//! A resumable batch driver for receptor-ligand docking. The library does not dock anything
//! itself; it sequences two external executables (a docking tool and a model extraction tool)
//! for every ligand file in a workspace and files their output into a per-ligand results tree.
//!
//! ## Architectural Philosophy
//!
//! The library mirrors a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Workspace layout, ligand discovery, the external-process
//!   abstraction, and the small filesystem helpers needed to deal with tools that write
//!   fixed-name files into their working directory.
//!
//! - **[`engine`]: The Logic Core.** Configuration, the error taxonomy, progress events,
//!   pre-flight validation, and the adapters that wrap each external tool's invocation
//!   contract.
//!
//! - **[`workflows`]: The Public API.** The batch workflow that runs the per-ligand state
//!   machine over every discovered ligand, plus a side-effect-free planner for dry runs.

pub mod core;
pub mod engine;
pub mod workflows;

#[cfg(test)]
pub(crate) mod testing;
