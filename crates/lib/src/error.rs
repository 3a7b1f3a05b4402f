//! Error type spanning every planning stage.

use thiserror::Error;

use crate::descriptor::DescriptorError;
use crate::emit::EmitError;
use crate::graph::GraphError;
use crate::loader::LoadError;
use crate::resolve::ResolveError;

/// Any failure while loading descriptors or planning a target.
#[derive(Debug, Error)]
pub enum PlanError {
  #[error(transparent)]
  Load(#[from] LoadError),

  #[error(transparent)]
  Descriptor(#[from] DescriptorError),

  #[error(transparent)]
  Graph(#[from] GraphError),

  #[error(transparent)]
  Resolve(#[from] ResolveError),

  #[error(transparent)]
  Emit(#[from] EmitError),
}

impl PlanError {
  /// Diagnostic category, e.g. `DependencyCycle` or `UnresolvedReference`.
  pub fn category(&self) -> &'static str {
    match self {
      PlanError::Load(err) => err.category(),
      PlanError::Descriptor(err) => err.category(),
      PlanError::Graph(err) => err.category(),
      PlanError::Resolve(err) => err.category(),
      PlanError::Emit(err) => err.category(),
    }
  }
}

/// Result type for planning operations
pub type Result<T> = std::result::Result<T, PlanError>;
