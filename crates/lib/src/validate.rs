//! Cycle and consistency validation.
//!
//! Duplicate module names never reach this stage: [`ModuleSet::new`] rejects
//! them at load time, independent of any target. What remains is cycle
//! detection over a target's closure.
//!
//! Cycle detection is a depth-first traversal tracking the recursion stack.
//! Start nodes are visited in module name order and dependencies in
//! declaration order, so the reported cycle is the same on every run.
//!
//! [`ModuleSet::new`]: crate::descriptor::ModuleSet::new

use petgraph::graph::NodeIndex;
use tracing::debug;

use crate::graph::{GraphError, ModuleGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
  Unvisited,
  OnStack,
  Done,
}

/// Check a dependency graph for cycles.
///
/// A graph with no edges, or any DAG, passes.
///
/// # Errors
///
/// Returns [`GraphError::DependencyCycle`] carrying every module on the loop,
/// starting at the module that was revisited.
pub fn validate(graph: &ModuleGraph<'_>) -> Result<(), GraphError> {
  let mut marks = vec![Mark::Unvisited; graph.inner().node_count()];
  let mut stack = Vec::new();

  for start in graph.indices_by_name() {
    if marks[start.index()] == Mark::Unvisited {
      visit(graph, start, &mut marks, &mut stack)?;
    }
  }

  debug!(target_name = %graph.target(), modules = graph.len(), "dependency graph is acyclic");
  Ok(())
}

fn visit(
  graph: &ModuleGraph<'_>,
  idx: NodeIndex,
  marks: &mut [Mark],
  stack: &mut Vec<NodeIndex>,
) -> Result<(), GraphError> {
  marks[idx.index()] = Mark::OnStack;
  stack.push(idx);

  for dep in graph.dependency_indices(idx) {
    match marks[dep.index()] {
      Mark::Unvisited => visit(graph, dep, marks, stack)?,
      Mark::OnStack => return Err(cycle_error(graph, stack, dep)),
      Mark::Done => {}
    }
  }

  stack.pop();
  marks[idx.index()] = Mark::Done;
  Ok(())
}

fn cycle_error(graph: &ModuleGraph<'_>, stack: &[NodeIndex], revisited: NodeIndex) -> GraphError {
  let start = stack.iter().position(|&idx| idx == revisited).unwrap_or(0);
  let path = stack[start..]
    .iter()
    .map(|&idx| graph.inner()[idx].name().to_string())
    .collect();
  GraphError::DependencyCycle { path }
}
