//! Shared utilities.
//!
//! Content fingerprinting used by the plan emitter.

pub mod hash;
