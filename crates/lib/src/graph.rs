//! Dependency graph construction for a single target.
//!
//! The graph is the induced subgraph over the reachability closure of a
//! target's root modules. Edges point from dependent to dependency and carry
//! the [`Visibility`] the dependency was declared with.
//!
//! # Algorithm Overview
//!
//! 1. Seed a work queue with the target's root modules
//! 2. Pop a module and resolve each declared dependency by name
//! 3. Add newly reached modules to the graph and the queue
//! 4. Stop when the queue is empty; every reference has been resolved
//!
//! Any name that does not resolve fails the whole target with
//! [`GraphError::UnresolvedReference`]. Nodes borrow their descriptors from the
//! [`ModuleSet`], which is never mutated, so graphs for different targets can
//! be built concurrently from one set.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use thiserror::Error;
use tracing::{debug, trace};

use crate::descriptor::{Module, ModuleSet, Target, Visibility};

/// Errors raised while building or inspecting a dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
  /// A module (or a target's root list) names a module that does not exist.
  #[error("'{module}' depends on unknown module '{missing}'")]
  UnresolvedReference { module: String, missing: String },

  /// The closure contains a dependency cycle.
  #[error("dependency cycle detected: {}", CyclePath(.path))]
  DependencyCycle {
    /// Modules forming the loop, in dependency order, starting at the first
    /// module revisited.
    path: Vec<String>,
  },

  /// A queried module is not reachable from the target's roots.
  #[error("module '{module}' is not part of target '{target}'")]
  NotInClosure { target: String, module: String },
}

impl GraphError {
  /// Diagnostic category reported to the caller.
  pub fn category(&self) -> &'static str {
    match self {
      GraphError::UnresolvedReference { .. } => "UnresolvedReference",
      GraphError::DependencyCycle { .. } => "DependencyCycle",
      GraphError::NotInClosure { .. } => "NotInClosure",
    }
  }
}

/// Renders a cycle as `A -> B -> C -> A`.
struct CyclePath<'a>(&'a [String]);

impl fmt::Display for CyclePath<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for name in self.0 {
      write!(f, "{} -> ", name)?;
    }
    match self.0.first() {
      Some(first) => f.write_str(first),
      None => Ok(()),
    }
  }
}

/// The dependency closure of one target.
pub struct ModuleGraph<'a> {
  /// Target the closure was expanded for.
  target: String,

  /// Edges point from dependent to dependency.
  graph: DiGraph<&'a Module, Visibility>,

  /// Map from module name to node index, in name order.
  nodes: BTreeMap<&'a str, NodeIndex>,

  /// Root modules in declaration order.
  roots: Vec<NodeIndex>,
}

/// Expand `target`'s root modules into their full dependency closure.
///
/// # Errors
///
/// Returns [`GraphError::UnresolvedReference`] naming the declaring module (or
/// the target, for a root) and the missing name.
pub fn build_graph<'a>(modules: &'a ModuleSet, target: &Target) -> Result<ModuleGraph<'a>, GraphError> {
  let mut graph = DiGraph::new();
  let mut nodes: BTreeMap<&'a str, NodeIndex> = BTreeMap::new();
  let mut roots = Vec::with_capacity(target.root_modules().len());
  let mut queue = VecDeque::new();

  for root in target.root_modules() {
    let module = modules.get(root).ok_or_else(|| GraphError::UnresolvedReference {
      module: target.name().to_string(),
      missing: root.clone(),
    })?;
    let idx = graph.add_node(module);
    nodes.insert(module.name(), idx);
    roots.push(idx);
    queue.push_back(idx);
  }

  while let Some(idx) = queue.pop_front() {
    let module: &'a Module = graph[idx];

    for (dep, visibility) in module.dependencies() {
      let dep_idx = match nodes.get(dep) {
        Some(&existing) => existing,
        None => {
          let dep_module = modules.get(dep).ok_or_else(|| GraphError::UnresolvedReference {
            module: module.name().to_string(),
            missing: dep.to_string(),
          })?;
          let new_idx = graph.add_node(dep_module);
          nodes.insert(dep_module.name(), new_idx);
          queue.push_back(new_idx);
          trace!(module = %dep_module.name(), from = %module.name(), "reached module");
          new_idx
        }
      };
      graph.add_edge(idx, dep_idx, visibility);
    }
  }

  debug!(
    target_name = %target.name(),
    modules = graph.node_count(),
    edges = graph.edge_count(),
    "built dependency graph"
  );

  Ok(ModuleGraph {
    target: target.name().to_string(),
    graph,
    nodes,
    roots,
  })
}

impl<'a> ModuleGraph<'a> {
  /// Name of the target this closure belongs to.
  pub fn target(&self) -> &str {
    &self.target
  }

  /// Number of modules in the closure.
  pub fn len(&self) -> usize {
    self.graph.node_count()
  }

  pub fn is_empty(&self) -> bool {
    self.graph.node_count() == 0
  }

  /// Number of dependency edges.
  pub fn edge_count(&self) -> usize {
    self.graph.edge_count()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.nodes.contains_key(name)
  }

  pub fn module(&self, name: &str) -> Option<&'a Module> {
    self.nodes.get(name).map(|&idx| self.graph[idx])
  }

  /// Modules in the closure, in name order.
  pub fn modules(&self) -> impl Iterator<Item = &'a Module> + '_ {
    self.nodes.values().map(|&idx| self.graph[idx])
  }

  /// Root module names in declaration order.
  pub fn roots(&self) -> Vec<&'a str> {
    self.roots.iter().map(|&idx| self.graph[idx].name()).collect()
  }

  /// Direct dependencies of a module, in declaration order.
  pub fn dependencies(&self, name: &str) -> Vec<&'a str> {
    self
      .module(name)
      .map(|module| module.dependencies().map(|(dep, _)| dep).collect())
      .unwrap_or_default()
  }

  /// Modules in the closure that depend directly on `name`, in name order.
  pub fn dependents(&self, name: &str) -> Vec<&'a str> {
    let Some(&idx) = self.nodes.get(name) else {
      return Vec::new();
    };
    let mut dependents: Vec<&'a str> = self
      .graph
      .neighbors_directed(idx, Direction::Incoming)
      .map(|dep_idx| self.graph[dep_idx].name())
      .collect();
    dependents.sort_unstable();
    dependents.dedup();
    dependents
  }

  /// Visibility of the edge from `from` to its direct dependency `to`.
  pub fn edge_visibility(&self, from: &str, to: &str) -> Option<Visibility> {
    let (&a, &b) = (self.nodes.get(from)?, self.nodes.get(to)?);
    self.graph.find_edge(a, b).map(|edge| self.graph[edge])
  }

  /// Shortest dependency path from a root to `name`.
  ///
  /// Roots and neighbors are explored in name order, so among equally short
  /// paths the lexicographically smallest one is returned.
  ///
  /// # Errors
  ///
  /// Returns [`GraphError::NotInClosure`] if `name` is not in the closure.
  pub fn why(&self, name: &str) -> Result<Vec<&'a str>, GraphError> {
    let Some(&goal) = self.nodes.get(name) else {
      return Err(GraphError::NotInClosure {
        target: self.target.clone(),
        module: name.to_string(),
      });
    };

    let mut roots = self.roots.clone();
    roots.sort_by_key(|&idx| self.graph[idx].name());

    let mut parent: HashMap<NodeIndex, Option<NodeIndex>> = HashMap::new();
    let mut queue = VecDeque::new();
    for root in roots {
      parent.insert(root, None);
      queue.push_back(root);
    }

    while let Some(idx) = queue.pop_front() {
      if idx == goal {
        break;
      }
      for dep_idx in self.sorted_dependency_indices(idx) {
        if let Entry::Vacant(entry) = parent.entry(dep_idx) {
          entry.insert(Some(idx));
          queue.push_back(dep_idx);
        }
      }
    }

    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(idx) = current {
      path.push(self.graph[idx].name());
      current = parent.get(&idx).copied().flatten();
    }
    path.reverse();
    Ok(path)
  }

  pub(crate) fn inner(&self) -> &DiGraph<&'a Module, Visibility> {
    &self.graph
  }

  pub(crate) fn root_indices(&self) -> &[NodeIndex] {
    &self.roots
  }

  /// Node indices in module name order.
  pub(crate) fn indices_by_name(&self) -> impl Iterator<Item = NodeIndex> + '_ {
    self.nodes.values().copied()
  }

  /// Dependency indices of a node, in the module's declaration order.
  pub(crate) fn dependency_indices(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
    self.graph[idx]
      .dependencies()
      .filter_map(|(dep, _)| self.nodes.get(dep).copied())
  }

  fn sorted_dependency_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
    let mut deps: Vec<NodeIndex> = self.dependency_indices(idx).collect();
    deps.sort_by_key(|&dep| self.graph[dep].name());
    deps
  }
}

impl fmt::Debug for ModuleGraph<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ModuleGraph")
      .field("target", &self.target)
      .field("modules", &self.nodes.keys().collect::<Vec<_>>())
      .field("edges", &self.graph.edge_count())
      .finish()
  }
}
