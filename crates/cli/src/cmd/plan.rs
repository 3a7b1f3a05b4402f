//! Implementation of the `modplan plan` command.
//!
//! Loads the descriptor set, resolves a single target and emits its build
//! plan as text lines or JSON, to stdout or a file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use modplan_lib::PlanError;
use modplan_lib::emit::{PlanFormat, emit, render};
use modplan_lib::loader::load_descriptors;
use modplan_lib::plan::plan_named;

use crate::output::{OutputFormat, print_success};

pub fn cmd_plan(target: &str, modules: &Path, format: OutputFormat, output: Option<&Path>) -> Result<()> {
  debug!(path = %modules.display(), target_name = %target, "loading descriptors");
  let set = load_descriptors(modules)?;
  let plan = plan_named(&set, target)?;
  let serialized = emit(&plan).map_err(PlanError::from)?;

  let format = if format.is_json() {
    PlanFormat::Json
  } else {
    PlanFormat::Lines
  };
  let rendered = render(&serialized, format).map_err(PlanError::from)?;

  match output {
    Some(path) => {
      fs::write(path, &rendered).with_context(|| format!("Failed to write plan: {}", path.display()))?;
      print_success(&format!(
        "Plan for {} ({} modules) written to {}",
        target,
        plan.modules().len(),
        path.display()
      ));
    }
    None => {
      print!("{}", rendered);
      if format == PlanFormat::Json {
        println!();
      }
    }
  }

  Ok(())
}
