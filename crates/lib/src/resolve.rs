//! Resolution engine: ordering, PCH resolution and target-type gating.
//!
//! Given a validated [`ModuleGraph`], [`resolve`] produces an immutable
//! [`BuildPlan`]:
//!
//! 1. Resolve the target's version tags into [`EffectiveSettings`]
//! 2. Drop modules excluded for the target type; a root that is excluded fails
//!    with [`ResolveError::IncompatibleTargetType`]
//! 3. Order the remaining closure topologically, always taking the
//!    lexicographically smallest ready module next
//! 4. Resolve each module's effective PCH mode through the configured
//!    downgrade table
//!
//! A module's own declared PCH mode is authoritative regardless of the path
//! (public or private) it was reached through.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet, VecDeque};

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::ResolverConfig;
use crate::descriptor::{BuildSettingsVersion, IncludeOrderVersion, PchMode, Target, TargetType, VersionTag};
use crate::graph::ModuleGraph;

/// Errors raised by the resolution engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
  /// A root module of the target is excluded for the target's type.
  #[error("module '{module}' is a root of target '{target}' but is excluded for {target_type} targets")]
  IncompatibleTargetType {
    target: String,
    target_type: TargetType,
    module: String,
  },

  /// The target pins a version newer than the resolver understands.
  #[error("target '{target}' pins {field} {version}, newer than the latest supported {latest}")]
  UnsupportedVersion {
    target: String,
    field: &'static str,
    version: String,
    latest: String,
  },

  /// A condition the earlier stages guarantee did not hold.
  #[error("internal invariant violated while resolving '{target}': {message}")]
  InvariantViolation { target: String, message: String },
}

impl ResolveError {
  /// Diagnostic category reported to the caller.
  pub fn category(&self) -> &'static str {
    match self {
      ResolveError::IncompatibleTargetType { .. } => "IncompatibleTargetType",
      ResolveError::UnsupportedVersion { .. } => "UnsupportedVersion",
      ResolveError::InvariantViolation { .. } => "InternalError",
    }
  }
}

/// Concrete versions a target is resolved under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveSettings {
  pub build_settings_version: BuildSettingsVersion,
  pub include_order_version: IncludeOrderVersion,
}

/// A module as it appears in a build plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
  name: String,
  declared_pch_mode: PchMode,
  resolved_pch_mode: PchMode,
  dependencies: Vec<String>,
}

impl ResolvedModule {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn declared_pch_mode(&self) -> PchMode {
    self.declared_pch_mode
  }

  pub fn resolved_pch_mode(&self) -> PchMode {
    self.resolved_pch_mode
  }

  /// Direct dependencies that are part of the plan, public first, in declaration order.
  pub fn dependencies(&self) -> &[String] {
    &self.dependencies
  }
}

/// The resolved, ordered build plan for one target.
///
/// Dependencies always precede their dependents in [`BuildPlan::modules`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
  target: Target,
  settings: EffectiveSettings,
  modules: Vec<ResolvedModule>,
}

impl BuildPlan {
  pub fn target(&self) -> &Target {
    &self.target
  }

  pub fn settings(&self) -> EffectiveSettings {
    self.settings
  }

  /// Modules in build order.
  pub fn modules(&self) -> &[ResolvedModule] {
    &self.modules
  }

  /// Module names in build order.
  pub fn module_names(&self) -> Vec<&str> {
    self.modules.iter().map(ResolvedModule::name).collect()
  }

  pub fn module(&self, name: &str) -> Option<&ResolvedModule> {
    self.modules.iter().find(|m| m.name == name)
  }
}

/// Resolve a target's version tags against the configured latest versions.
///
/// # Errors
///
/// Returns [`ResolveError::UnsupportedVersion`] if the target pins a version
/// newer than the configured latest.
pub fn effective_settings(target: &Target, config: &ResolverConfig) -> Result<EffectiveSettings, ResolveError> {
  let build_settings_version = check_version(
    target,
    "buildSettingsVersion",
    target.build_settings_version(),
    config.latest_build_settings,
  )?;
  let include_order_version = check_version(
    target,
    "includeOrderVersion",
    target.include_order_version(),
    config.latest_include_order,
  )?;

  Ok(EffectiveSettings {
    build_settings_version,
    include_order_version,
  })
}

fn check_version<V>(target: &Target, field: &'static str, tag: VersionTag<V>, latest: V) -> Result<V, ResolveError>
where
  V: Copy + Ord + std::fmt::Display,
{
  let version = tag.resolve(latest);
  if version > latest {
    return Err(ResolveError::UnsupportedVersion {
      target: target.name().to_string(),
      field,
      version: version.to_string(),
      latest: latest.to_string(),
    });
  }
  Ok(version)
}

/// Order a validated graph and resolve per-module settings.
///
/// # Errors
///
/// - [`ResolveError::UnsupportedVersion`] if the target's versions are too new
/// - [`ResolveError::IncompatibleTargetType`] if a root is excluded for the target type
/// - [`ResolveError::InvariantViolation`] if the graph was not validated and holds a cycle
pub fn resolve(graph: &ModuleGraph<'_>, target: &Target, config: &ResolverConfig) -> Result<BuildPlan, ResolveError> {
  let settings = effective_settings(target, config)?;
  let target_type = target.target_type();

  for root in graph.roots() {
    if config.is_excluded(root, target_type) {
      return Err(ResolveError::IncompatibleTargetType {
        target: target.name().to_string(),
        target_type,
        module: root.to_string(),
      });
    }
  }

  let kept = gated_closure(graph, config, target_type);
  let order = ordered(graph, &kept).ok_or_else(|| ResolveError::InvariantViolation {
    target: target.name().to_string(),
    message: "dependency cycle reached the resolution stage".to_string(),
  })?;

  let kept_names: HashSet<&str> = kept.iter().map(|&idx| graph.inner()[idx].name()).collect();
  let modules = order
    .into_iter()
    .map(|idx| {
      let module = graph.inner()[idx];
      let resolved_pch_mode = config.effective_pch(module.pch_mode(), settings.build_settings_version);
      ResolvedModule {
        name: module.name().to_string(),
        declared_pch_mode: module.pch_mode(),
        resolved_pch_mode,
        dependencies: module
          .dependencies()
          .filter(|(dep, _)| kept_names.contains(dep))
          .map(|(dep, _)| dep.to_string())
          .collect(),
      }
    })
    .collect::<Vec<_>>();

  debug!(
    target_name = %target.name(),
    modules = modules.len(),
    dropped = graph.len() - modules.len(),
    build_settings = %settings.build_settings_version,
    "resolved build plan"
  );

  Ok(BuildPlan {
    target: target.clone(),
    settings,
    modules,
  })
}

/// Reachability closure of the roots that never enters an excluded module.
fn gated_closure(graph: &ModuleGraph<'_>, config: &ResolverConfig, target_type: TargetType) -> HashSet<NodeIndex> {
  let mut kept: HashSet<NodeIndex> = graph.root_indices().iter().copied().collect();
  let mut queue: VecDeque<NodeIndex> = graph.root_indices().iter().copied().collect();

  while let Some(idx) = queue.pop_front() {
    for dep in graph.dependency_indices(idx) {
      if kept.contains(&dep) {
        continue;
      }
      let name = graph.inner()[dep].name();
      if config.is_excluded(name, target_type) {
        trace!(module = %name, %target_type, "dropping excluded module");
        continue;
      }
      kept.insert(dep);
      queue.push_back(dep);
    }
  }

  kept
}

/// Kahn's algorithm over the kept nodes with a lexicographic tie-break.
///
/// Returns `None` if the kept subgraph is cyclic.
fn ordered(graph: &ModuleGraph<'_>, kept: &HashSet<NodeIndex>) -> Option<Vec<NodeIndex>> {
  let inner = graph.inner();
  let mut remaining = vec![0usize; inner.node_count()];
  let mut ready = BinaryHeap::new();

  for &idx in kept {
    let pending = graph.dependency_indices(idx).filter(|dep| kept.contains(dep)).count();
    remaining[idx.index()] = pending;
    if pending == 0 {
      ready.push(Reverse((inner[idx].name(), idx)));
    }
  }

  let mut order = Vec::with_capacity(kept.len());
  while let Some(Reverse((_, idx))) = ready.pop() {
    order.push(idx);
    for dependent in inner.neighbors_directed(idx, Direction::Incoming) {
      if !kept.contains(&dependent) {
        continue;
      }
      let pending = &mut remaining[dependent.index()];
      *pending -= 1;
      if *pending == 0 {
        ready.push(Reverse((inner[dependent].name(), dependent)));
      }
    }
  }

  (order.len() == kept.len()).then_some(order)
}
