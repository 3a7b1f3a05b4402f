//! Resolver configuration.
//!
//! Version-dependent behavior is data, not code: the PCH downgrade table and
//! the target-type exclusions are plain lists read from the `resolver` table of
//! a descriptor file, so new thresholds need no change to the algorithm.
//!
//! ```toml
//! [resolver]
//! latestBuildSettings = "V5"
//! latestIncludeOrder = "Unreal5_4"
//!
//! [[resolver.pchDowngrades]]
//! below = "V2"
//! from = "UseExplicitOrSharedPCH"
//! to = "UseSharedPCH"
//!
//! [[resolver.exclusions]]
//! module = "EditorTools"
//! targetTypes = ["Game", "Client", "Server"]
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::consts::{DEFAULT_LATEST_BUILD_SETTINGS, DEFAULT_LATEST_INCLUDE_ORDER, EXPLICIT_OR_SHARED_PCH_SINCE};
use crate::descriptor::{BuildSettingsVersion, IncludeOrderVersion, PchMode, TargetType};

/// Configuration tables consulted by the resolution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ResolverConfig {
  /// PCH downgrade rules, applied in order; the first matching rule wins.
  pub pch_downgrades: Vec<PchDowngrade>,

  /// Modules that are dropped for particular target types.
  pub exclusions: Vec<TargetExclusion>,

  /// What `Latest` means for build settings, and the newest version accepted.
  pub latest_build_settings: BuildSettingsVersion,

  /// What `Latest` means for include order, and the newest version accepted.
  pub latest_include_order: IncludeOrderVersion,
}

/// While a target's build settings version is below `below`, `from` resolves to `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PchDowngrade {
  pub below: BuildSettingsVersion,
  pub from: PchMode,
  pub to: PchMode,
}

/// A module that is not valid for the listed target types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TargetExclusion {
  pub module: String,
  pub target_types: Vec<TargetType>,
}

impl Default for ResolverConfig {
  fn default() -> Self {
    let (major, minor) = DEFAULT_LATEST_INCLUDE_ORDER;
    Self {
      pch_downgrades: vec![PchDowngrade {
        below: BuildSettingsVersion::new(EXPLICIT_OR_SHARED_PCH_SINCE),
        from: PchMode::UseExplicitOrSharedPch,
        to: PchMode::UseSharedPch,
      }],
      exclusions: Vec::new(),
      latest_build_settings: BuildSettingsVersion::new(DEFAULT_LATEST_BUILD_SETTINGS),
      latest_include_order: IncludeOrderVersion::new(major, minor),
    }
  }
}

impl ResolverConfig {
  /// Effective PCH mode of a module declaring `declared` under `version`.
  pub fn effective_pch(&self, declared: PchMode, version: BuildSettingsVersion) -> PchMode {
    match self
      .pch_downgrades
      .iter()
      .find(|rule| rule.from == declared && version < rule.below)
    {
      Some(rule) => {
        trace!(from = %declared, to = %rule.to, %version, below = %rule.below, "pch downgrade");
        rule.to
      }
      None => declared,
    }
  }

  /// Whether `module` is excluded for targets of type `target_type`.
  pub fn is_excluded(&self, module: &str, target_type: TargetType) -> bool {
    self
      .exclusions
      .iter()
      .any(|e| e.module == module && e.target_types.contains(&target_type))
  }
}
