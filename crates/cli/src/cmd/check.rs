//! Implementation of the `modplan check` command.
//!
//! Resolves every declared target in parallel and reports each outcome.
//! The exit code is non-zero if any target fails.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use tracing::debug;

use modplan_lib::loader::load_descriptors;
use modplan_lib::plan::resolve_all;

use crate::output::{print_diagnostic, print_success};

pub fn cmd_check(modules: &Path) -> Result<ExitCode> {
  let set = load_descriptors(modules)?;
  debug!(targets = set.targets.len(), "checking targets");
  let outcomes = resolve_all(&set.modules, &set.targets, &set.config);

  let mut failed = 0;
  for outcome in &outcomes {
    match &outcome.result {
      Ok(plan) => print_success(&format!("{}: {} modules", outcome.target, plan.modules().len())),
      Err(err) => {
        failed += 1;
        print_diagnostic(err.category(), &format!("{}: {}", outcome.target, err));
      }
    }
  }

  if failed > 0 {
    print_diagnostic(
      "CheckFailed",
      &format!("{} of {} targets failed to resolve", failed, outcomes.len()),
    );
    return Ok(ExitCode::FAILURE);
  }

  print_success(&format!("All {} targets resolved", outcomes.len()));
  Ok(ExitCode::SUCCESS)
}
