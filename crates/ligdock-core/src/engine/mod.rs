//! # Engine Module
//!
//! The stateful layer between the filesystem primitives in [`crate::core`] and the batch
//! workflow.
//!
//! - **Configuration** ([`config`]) - Batch parameters, failure policy, and resume strategy
//! - **Error Handling** ([`error`]) - Engine error taxonomy and I/O context helpers
//! - **Progress Monitoring** ([`progress`]) - Status events delivered to a caller-supplied callback
//! - **Pre-flight Validation** ([`preflight`]) - Executable and input checks before any work starts
//! - **Tool Adapters** ([`tools`]) - Invocation contracts of the docking and extraction executables

pub mod config;
pub mod error;
pub mod preflight;
pub mod progress;
pub mod tools;
