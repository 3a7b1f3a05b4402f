//! Conversion from raw descriptor records to typed descriptors.

use serde::Deserialize;

use super::types::{DescriptorError, Module, PchMode, Target, TargetType};

/// A module descriptor as supplied by the configuration loader.
///
/// Every field is optional here so that a missing field is reported by
/// [`load_module`] with its name rather than as a generic parse failure.
/// Unknown keys are rejected, so a misspelled dependency list never reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RawModule {
  pub name: Option<String>,
  pub public_dependencies: Vec<String>,
  pub private_dependencies: Vec<String>,
  pub pch_mode: Option<String>,
}

/// A target descriptor as supplied by the configuration loader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RawTarget {
  pub name: Option<String>,
  #[serde(rename = "type")]
  pub target_type: Option<String>,
  pub build_settings_version: Option<String>,
  pub include_order_version: Option<String>,
  pub root_modules: Vec<String>,
}

/// Validate a raw module descriptor.
///
/// # Errors
///
/// Returns [`DescriptorError::Malformed`] identifying the offending field when
/// the name is missing or empty, `pchMode` is missing or unknown, or the
/// dependency lists break the module invariants.
pub fn load_module(raw: RawModule) -> Result<Module, DescriptorError> {
  let name = required("module", "", "name", raw.name)?;
  let pch_mode: PchMode = parse_field("module", &name, "pchMode", raw.pch_mode)?;

  Module::new(name, raw.public_dependencies, raw.private_dependencies, pch_mode)
}

/// Validate a raw target descriptor.
///
/// # Errors
///
/// Returns [`DescriptorError::Malformed`] identifying the offending field when
/// a required field is missing, an enum or version value is unknown, or
/// `rootModules` is empty or repeats a module.
pub fn load_target(raw: RawTarget) -> Result<Target, DescriptorError> {
  let name = required("target", "", "name", raw.name)?;
  let target_type: TargetType = parse_field("target", &name, "type", raw.target_type)?;
  let build_settings = parse_field("target", &name, "buildSettingsVersion", raw.build_settings_version)?;
  let include_order = parse_field("target", &name, "includeOrderVersion", raw.include_order_version)?;

  Target::new(name, target_type, build_settings, include_order, raw.root_modules)
}

fn required(
  kind: &'static str,
  descriptor: &str,
  field: &'static str,
  value: Option<String>,
) -> Result<String, DescriptorError> {
  match value {
    Some(value) if !value.trim().is_empty() => Ok(value),
    Some(_) => Err(DescriptorError::malformed(kind, descriptor, field, "must not be empty")),
    None => Err(DescriptorError::malformed(kind, descriptor, field, "is required")),
  }
}

fn parse_field<T>(
  kind: &'static str,
  descriptor: &str,
  field: &'static str,
  value: Option<String>,
) -> Result<T, DescriptorError>
where
  T: std::str::FromStr,
  T::Err: std::fmt::Display,
{
  let value = required(kind, descriptor, field, value)?;
  value
    .parse()
    .map_err(|e: T::Err| DescriptorError::malformed(kind, descriptor, field, e.to_string()))
}
