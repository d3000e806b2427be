//! # Core Module
//!
//! Stateless building blocks shared by the engine and the workflows.
//!
//! - **Workspace Layout** ([`workspace`]) - Input paths, ligand identity, and per-ligand output paths
//! - **Ligand Discovery** ([`discovery`]) - Flat enumeration of ligand structure files
//! - **External Processes** ([`process`]) - Invocation descriptions and the [`process::ToolRunner`] seam
//! - **Filesystem Helpers** ([`fsutil`]) - Output snapshots, cross-device moves, directory cleanup

pub mod discovery;
pub mod fsutil;
pub mod process;
pub mod workspace;
