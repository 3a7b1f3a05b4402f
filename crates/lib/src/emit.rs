//! Plan emitter: the external representation handed to a build executor.
//!
//! A [`SerializedPlan`] is the ordered list of modules with their resolved
//! PCH modes plus the target's identity, effective versions and feature set.
//! It carries a content fingerprint so executors can key caches on it.
//!
//! Two renderings are provided:
//! - [`PlanFormat::Json`]: pretty-printed JSON
//! - [`PlanFormat::Lines`]: one record per line, e.g.
//!
//! ```text
//! target FuryOfLegendsClient Client
//! settings V5 Unreal5_4
//! fingerprint 3f2a9c0d1e4b5a6c7d8e
//! module Core None
//! module FuryOfLegends UseExplicitOrSharedPCH
//! ```

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::descriptor::{BuildSettingsVersion, IncludeOrderVersion, PchMode, TargetFeatures, TargetType};
use crate::resolve::BuildPlan;
use crate::util::hash::{HashError, Hashable, ObjectHash};

/// Errors raised while serializing a plan.
#[derive(Debug, Error)]
pub enum EmitError {
  #[error("failed to serialize plan: {0}")]
  Serialize(#[from] HashError),
}

impl EmitError {
  /// Diagnostic category reported to the caller.
  pub fn category(&self) -> &'static str {
    "EmitError"
  }
}

/// One module record of a serialized plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
  pub module_name: String,
  pub resolved_pch_mode: PchMode,
  pub dependencies: Vec<String>,
}

/// The plan body; the fingerprint is computed over exactly these fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanBody {
  pub target: String,
  pub target_type: TargetType,
  pub build_settings_version: BuildSettingsVersion,
  pub include_order_version: IncludeOrderVersion,
  pub features: TargetFeatures,
  pub modules: Vec<PlanEntry>,
}

impl Hashable for PlanBody {}

/// The external representation of a build plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedPlan {
  #[serde(flatten)]
  pub body: PlanBody,
  pub fingerprint: ObjectHash,
}

/// Output encodings for a serialized plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlanFormat {
  #[default]
  Lines,
  Json,
}

/// Convert a build plan into its external representation.
pub fn emit(plan: &BuildPlan) -> Result<SerializedPlan, EmitError> {
  let target = plan.target();
  let settings = plan.settings();

  let body = PlanBody {
    target: target.name().to_string(),
    target_type: target.target_type(),
    build_settings_version: settings.build_settings_version,
    include_order_version: settings.include_order_version,
    features: target.target_type().features(),
    modules: plan
      .modules()
      .iter()
      .map(|module| PlanEntry {
        module_name: module.name().to_string(),
        resolved_pch_mode: module.resolved_pch_mode(),
        dependencies: module.dependencies().to_vec(),
      })
      .collect(),
  };
  let fingerprint = body.compute_hash()?;

  Ok(SerializedPlan { body, fingerprint })
}

/// Render a serialized plan in the requested format.
pub fn render(plan: &SerializedPlan, format: PlanFormat) -> Result<String, EmitError> {
  match format {
    PlanFormat::Json => Ok(serde_json::to_string_pretty(plan)?),
    PlanFormat::Lines => Ok(render_lines(plan)),
  }
}

fn render_lines(plan: &SerializedPlan) -> String {
  let body = &plan.body;
  let mut out = String::new();
  // Writing to a String cannot fail.
  let _ = writeln!(out, "target {} {}", body.target, body.target_type);
  let _ = writeln!(
    out,
    "settings {} {}",
    body.build_settings_version, body.include_order_version
  );
  let _ = writeln!(out, "fingerprint {}", plan.fingerprint);
  for entry in &body.modules {
    let _ = writeln!(out, "module {} {}", entry.module_name, entry.resolved_pch_mode);
  }
  out
}
