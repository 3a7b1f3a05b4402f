//! modplan-lib: module build-plan resolution
//!
//! This crate turns module and target descriptors into ordered build plans:
//! - `descriptor`: modules, targets and their typed vocabulary
//! - `loader`: reading descriptor files from disk
//! - `graph`: a target's transitive dependency closure
//! - `validate`: cycle detection over that closure
//! - `resolve`: deterministic ordering, PCH downgrades and target gating
//! - `emit`: the serialized plan handed to build executors
//! - `plan`: end-to-end planning of one or many targets

pub mod config;
pub mod consts;
pub mod descriptor;
pub mod emit;
pub mod error;
pub mod graph;
pub mod loader;
pub mod plan;
pub mod resolve;
pub mod util;
pub mod validate;

pub use error::{PlanError, Result};
