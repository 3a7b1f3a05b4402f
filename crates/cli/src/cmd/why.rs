//! Implementation of the `modplan why` command.
//!
//! Prints the shortest dependency path from one of the target's roots to the
//! requested module. Hops over a private dependency are marked `(private)`.

use std::path::Path;

use anyhow::Result;

use modplan_lib::PlanError;
use modplan_lib::descriptor::Visibility;
use modplan_lib::graph::build_graph;
use modplan_lib::loader::load_descriptors;

use crate::output::format_path;

pub fn cmd_why(target: &str, module: &str, modules: &Path) -> Result<()> {
  let set = load_descriptors(modules)?;
  let target = set.require_target(target)?;

  let graph = build_graph(&set.modules, target).map_err(PlanError::from)?;
  let path = graph.why(module).map_err(PlanError::from)?;

  let mut steps = Vec::with_capacity(path.len());
  for (i, &name) in path.iter().enumerate() {
    let hop = i.checked_sub(1).and_then(|prev| graph.edge_visibility(path[prev], name));
    match hop {
      Some(Visibility::Private) => steps.push(format!("{name} (private)")),
      _ => steps.push(name.to_string()),
    }
  }

  println!("{}", format_path(&steps));
  Ok(())
}
