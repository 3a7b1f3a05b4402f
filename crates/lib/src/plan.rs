//! End-to-end planning of one or many targets.
//!
//! [`plan_target`] runs the stages in order: graph expansion, cycle
//! validation, resolution. [`resolve_all`] does this for every target of a
//! set in parallel; targets share the module set read-only and a failure in
//! one never affects another.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::ResolverConfig;
use crate::descriptor::{ModuleSet, Target};
use crate::error::Result;
use crate::graph::build_graph;
use crate::loader::DescriptorSet;
use crate::resolve::{BuildPlan, resolve};
use crate::validate::validate;

/// The result of planning one target.
#[derive(Debug)]
pub struct TargetOutcome {
  pub target: String,
  pub result: Result<BuildPlan>,
}

impl TargetOutcome {
  pub fn is_success(&self) -> bool {
    self.result.is_ok()
  }
}

/// Plan a single target against a module set.
pub fn plan_target(modules: &ModuleSet, target: &Target, config: &ResolverConfig) -> Result<BuildPlan> {
  let graph = build_graph(modules, target)?;
  validate(&graph)?;
  let plan = resolve(&graph, target, config)?;

  info!(
    target_name = %target.name(),
    target_type = %target.target_type(),
    modules = plan.modules().len(),
    "planned target"
  );
  Ok(plan)
}

/// Plan the target called `name` from a loaded descriptor set.
pub fn plan_named(set: &DescriptorSet, name: &str) -> Result<BuildPlan> {
  let target = set.require_target(name)?;
  plan_target(&set.modules, target, &set.config)
}

/// Plan every target independently and in parallel.
///
/// Outcomes are returned in the order of `targets`.
pub fn resolve_all(modules: &ModuleSet, targets: &[Target], config: &ResolverConfig) -> Vec<TargetOutcome> {
  debug!(targets = targets.len(), "resolving targets in parallel");
  targets
    .par_iter()
    .map(|target| TargetOutcome {
      target: target.name().to_string(),
      result: plan_target(modules, target, config),
    })
    .collect()
}
