//! Descriptor types for modules and targets.
//!
//! Descriptors are immutable once constructed. [`Module::new`] and [`Target::new`]
//! enforce every shape invariant up front, so the graph builder and resolver
//! never re-check names, self references or repeated dependencies.
//!
//! # Versions
//!
//! Targets carry two ordinal version tags:
//! - [`BuildSettingsVersion`] (`V1`..`Vn`) governs default-flag resolution
//!   such as the PCH downgrade table.
//! - [`IncludeOrderVersion`] (`Unreal5_4`, or `5.4`) governs include-order
//!   compatibility.
//!
//! Either may be written as `Latest`, which stays symbolic ([`VersionTag::Latest`])
//! until the resolver substitutes the configured newest version.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::UNNAMED_DESCRIPTOR;

/// A string that does not name a known enum value or version.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected {expected})")]
pub struct ParseTagError {
  pub kind: &'static str,
  pub value: String,
  pub expected: &'static str,
}

/// Errors raised while validating descriptor shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
  /// A field is missing, empty, or holds a value outside its domain.
  #[error("malformed {kind} descriptor '{descriptor}': field `{field}` {reason}")]
  Malformed {
    kind: &'static str,
    descriptor: String,
    field: &'static str,
    reason: String,
  },

  /// Two module descriptors share a name.
  #[error("duplicate module '{0}': module names must be unique across the module set")]
  DuplicateModule(String),

  /// Two target descriptors share a name.
  #[error("duplicate target '{0}': target names must be unique")]
  DuplicateTarget(String),
}

impl DescriptorError {
  pub(crate) fn malformed(
    kind: &'static str,
    descriptor: &str,
    field: &'static str,
    reason: impl Into<String>,
  ) -> Self {
    let descriptor = if descriptor.trim().is_empty() {
      UNNAMED_DESCRIPTOR.to_string()
    } else {
      descriptor.to_string()
    };
    DescriptorError::Malformed {
      kind,
      descriptor,
      field,
      reason: reason.into(),
    }
  }

  /// Diagnostic category reported to the caller.
  pub fn category(&self) -> &'static str {
    match self {
      DescriptorError::Malformed { .. } => "MalformedDescriptor",
      DescriptorError::DuplicateModule(_) => "DuplicateModule",
      DescriptorError::DuplicateTarget(_) => "DuplicateTarget",
    }
  }
}

// ============================================================================
// PCH mode
// ============================================================================

/// Precompiled header policy of a module.
///
/// Serialized with the canonical spelling (`None`, `UseSharedPCH`,
/// `UseExplicitOrSharedPCH`, `ExplicitOnly`). Parsing also accepts the legacy
/// plural spellings (`NoPCHs`, `UseSharedPCHs`, `UseExplicitOrSharedPCHs`,
/// `NoSharedPCHs`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PchMode {
  /// The module does not use a precompiled header.
  NoPch,
  /// The module shares a precompiled header with other modules.
  UseSharedPch,
  /// The module uses its own header if it declares one, otherwise a shared one.
  UseExplicitOrSharedPch,
  /// The module only ever uses its own explicit precompiled header.
  ExplicitOnly,
}

impl PchMode {
  pub fn as_str(self) -> &'static str {
    match self {
      PchMode::NoPch => "None",
      PchMode::UseSharedPch => "UseSharedPCH",
      PchMode::UseExplicitOrSharedPch => "UseExplicitOrSharedPCH",
      PchMode::ExplicitOnly => "ExplicitOnly",
    }
  }
}

impl FromStr for PchMode {
  type Err = ParseTagError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "None" | "NoPCHs" => Ok(PchMode::NoPch),
      "UseSharedPCH" | "UseSharedPCHs" => Ok(PchMode::UseSharedPch),
      "UseExplicitOrSharedPCH" | "UseExplicitOrSharedPCHs" => Ok(PchMode::UseExplicitOrSharedPch),
      "ExplicitOnly" | "NoSharedPCHs" => Ok(PchMode::ExplicitOnly),
      _ => Err(ParseTagError {
        kind: "PCH mode",
        value: s.to_string(),
        expected: "None, UseSharedPCH, UseExplicitOrSharedPCH or ExplicitOnly",
      }),
    }
  }
}

impl TryFrom<String> for PchMode {
  type Error = ParseTagError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<PchMode> for String {
  fn from(mode: PchMode) -> Self {
    mode.as_str().to_string()
  }
}

impl fmt::Display for PchMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ============================================================================
// Target type
// ============================================================================

/// The deployable flavor a target produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TargetType {
  Game,
  Client,
  Server,
  Editor,
}

/// Compile-time feature switches implied by a target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetFeatures {
  pub with_editor: bool,
  pub with_server_code: bool,
  pub with_client_code: bool,
  pub is_monolithic: bool,
}

impl TargetType {
  pub fn as_str(self) -> &'static str {
    match self {
      TargetType::Game => "Game",
      TargetType::Client => "Client",
      TargetType::Server => "Server",
      TargetType::Editor => "Editor",
    }
  }

  /// Feature switches a target of this type is compiled with.
  pub fn features(self) -> TargetFeatures {
    TargetFeatures {
      with_editor: self == TargetType::Editor,
      with_server_code: self != TargetType::Client,
      with_client_code: self != TargetType::Server,
      is_monolithic: self != TargetType::Editor,
    }
  }
}

impl FromStr for TargetType {
  type Err = ParseTagError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "Game" => Ok(TargetType::Game),
      "Client" => Ok(TargetType::Client),
      "Server" => Ok(TargetType::Server),
      "Editor" => Ok(TargetType::Editor),
      _ => Err(ParseTagError {
        kind: "target type",
        value: s.to_string(),
        expected: "Game, Client, Server or Editor",
      }),
    }
  }
}

impl TryFrom<String> for TargetType {
  type Error = ParseTagError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<TargetType> for String {
  fn from(ty: TargetType) -> Self {
    ty.as_str().to_string()
  }
}

impl fmt::Display for TargetType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ============================================================================
// Versions
// ============================================================================

/// Ordinal build settings version, written `V<n>` with `n >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BuildSettingsVersion(u32);

impl BuildSettingsVersion {
  pub const fn new(number: u32) -> Self {
    Self(number)
  }
}

impl FromStr for BuildSettingsVersion {
  type Err = ParseTagError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    s.strip_prefix('V')
      .and_then(|n| n.parse::<u32>().ok())
      .filter(|n| *n >= 1)
      .map(Self)
      .ok_or_else(|| ParseTagError {
        kind: "build settings version",
        value: s.to_string(),
        expected: "V1, V2, ... or Latest",
      })
  }
}

impl TryFrom<String> for BuildSettingsVersion {
  type Error = ParseTagError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<BuildSettingsVersion> for String {
  fn from(version: BuildSettingsVersion) -> Self {
    version.to_string()
  }
}

impl fmt::Display for BuildSettingsVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "V{}", self.0)
  }
}

/// Ordinal include order version, written `Unreal<major>_<minor>` or `<major>.<minor>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IncludeOrderVersion {
  major: u32,
  minor: u32,
}

impl IncludeOrderVersion {
  pub const fn new(major: u32, minor: u32) -> Self {
    Self { major, minor }
  }
}

impl FromStr for IncludeOrderVersion {
  type Err = ParseTagError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let parts = match s.strip_prefix("Unreal") {
      Some(rest) => rest.split_once('_'),
      None => s.split_once('.'),
    };

    parts
      .and_then(|(major, minor)| Some(Self::new(major.parse().ok()?, minor.parse().ok()?)))
      .ok_or_else(|| ParseTagError {
        kind: "include order version",
        value: s.to_string(),
        expected: "Unreal<major>_<minor>, <major>.<minor> or Latest",
      })
  }
}

impl TryFrom<String> for IncludeOrderVersion {
  type Error = ParseTagError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<IncludeOrderVersion> for String {
  fn from(version: IncludeOrderVersion) -> Self {
    version.to_string()
  }
}

impl fmt::Display for IncludeOrderVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Unreal{}_{}", self.major, self.minor)
  }
}

/// A version as declared by a target: either pinned or the symbolic `Latest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionTag<V> {
  Latest,
  Pinned(V),
}

impl<V: Copy> VersionTag<V> {
  /// Substitute `latest` for the symbolic tag.
  pub fn resolve(self, latest: V) -> V {
    match self {
      VersionTag::Latest => latest,
      VersionTag::Pinned(version) => version,
    }
  }
}

impl<V: FromStr<Err = ParseTagError>> FromStr for VersionTag<V> {
  type Err = ParseTagError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s == "Latest" {
      Ok(VersionTag::Latest)
    } else {
      s.parse().map(VersionTag::Pinned)
    }
  }
}

impl<V: fmt::Display> fmt::Display for VersionTag<V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VersionTag::Latest => f.write_str("Latest"),
      VersionTag::Pinned(version) => fmt::Display::fmt(version, f),
    }
  }
}

// ============================================================================
// Module
// ============================================================================

/// Whether a dependency is visible to dependents of the declaring module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
  Public,
  Private,
}

/// A named, independently compiled unit with declared dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
  name: String,
  public_dependencies: Vec<String>,
  private_dependencies: Vec<String>,
  pch_mode: PchMode,
}

impl Module {
  /// Create a module descriptor.
  ///
  /// # Errors
  ///
  /// Returns [`DescriptorError::Malformed`] if the name is empty or holds
  /// whitespace, or if the dependency lists contain such a name, the module itself, or the same
  /// module twice (within one list or across both).
  pub fn new(
    name: impl Into<String>,
    public_dependencies: Vec<String>,
    private_dependencies: Vec<String>,
    pch_mode: PchMode,
  ) -> Result<Self, DescriptorError> {
    let name = name.into();
    if let Some(problem) = name_problem(&name) {
      return Err(DescriptorError::malformed("module", &name, "name", problem));
    }

    let mut seen = HashSet::new();
    check_dependencies(&name, "publicDependencies", &public_dependencies, &mut seen)?;
    check_dependencies(&name, "privateDependencies", &private_dependencies, &mut seen)?;

    Ok(Self {
      name,
      public_dependencies,
      private_dependencies,
      pch_mode,
    })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn public_dependencies(&self) -> &[String] {
    &self.public_dependencies
  }

  pub fn private_dependencies(&self) -> &[String] {
    &self.private_dependencies
  }

  pub fn pch_mode(&self) -> PchMode {
    self.pch_mode
  }

  /// All dependencies, public first, each in declaration order.
  pub fn dependencies(&self) -> impl Iterator<Item = (&str, Visibility)> + '_ {
    let public = self.public_dependencies.iter().map(|d| (d.as_str(), Visibility::Public));
    let private = self.private_dependencies.iter().map(|d| (d.as_str(), Visibility::Private));
    public.chain(private)
  }
}

/// Names appear unquoted in the line-oriented plan format.
fn name_problem(name: &str) -> Option<&'static str> {
  if name.trim().is_empty() {
    Some("must not be empty")
  } else if name.chars().any(char::is_whitespace) {
    Some("must not contain whitespace")
  } else {
    None
  }
}

fn check_dependencies<'a>(
  module: &str,
  field: &'static str,
  dependencies: &'a [String],
  seen: &mut HashSet<&'a str>,
) -> Result<(), DescriptorError> {
  for dep in dependencies {
    if let Some(problem) = name_problem(dep) {
      return Err(DescriptorError::malformed(
        "module",
        module,
        field,
        format!("contains an invalid module name '{}': {}", dep, problem),
      ));
    }
    if dep == module {
      return Err(DescriptorError::malformed(
        "module",
        module,
        field,
        format!("lists the module itself ('{}')", dep),
      ));
    }
    if !seen.insert(dep.as_str()) {
      return Err(DescriptorError::malformed(
        "module",
        module,
        field,
        format!("repeats dependency '{}'", dep),
      ));
    }
  }
  Ok(())
}

// ============================================================================
// Target
// ============================================================================

/// A buildable flavor of the product, rooted at specific modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
  name: String,
  target_type: TargetType,
  build_settings_version: VersionTag<BuildSettingsVersion>,
  include_order_version: VersionTag<IncludeOrderVersion>,
  root_modules: Vec<String>,
}

impl Target {
  /// Create a target descriptor.
  ///
  /// # Errors
  ///
  /// Returns [`DescriptorError::Malformed`] if the name is empty or holds
  /// whitespace, or if `root_modules` is empty, contains such a name, or
  /// repeats a module.
  pub fn new(
    name: impl Into<String>,
    target_type: TargetType,
    build_settings_version: VersionTag<BuildSettingsVersion>,
    include_order_version: VersionTag<IncludeOrderVersion>,
    root_modules: Vec<String>,
  ) -> Result<Self, DescriptorError> {
    let name = name.into();
    if let Some(problem) = name_problem(&name) {
      return Err(DescriptorError::malformed("target", &name, "name", problem));
    }
    if root_modules.is_empty() {
      return Err(DescriptorError::malformed(
        "target",
        &name,
        "rootModules",
        "must list at least one module",
      ));
    }

    let mut seen = HashSet::new();
    for root in &root_modules {
      if let Some(problem) = name_problem(root) {
        return Err(DescriptorError::malformed(
          "target",
          &name,
          "rootModules",
          format!("contains an invalid module name '{}': {}", root, problem),
        ));
      }
      if !seen.insert(root.as_str()) {
        return Err(DescriptorError::malformed(
          "target",
          &name,
          "rootModules",
          format!("repeats module '{}'", root),
        ));
      }
    }

    Ok(Self {
      name,
      target_type,
      build_settings_version,
      include_order_version,
      root_modules,
    })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn target_type(&self) -> TargetType {
    self.target_type
  }

  pub fn build_settings_version(&self) -> VersionTag<BuildSettingsVersion> {
    self.build_settings_version
  }

  pub fn include_order_version(&self) -> VersionTag<IncludeOrderVersion> {
    self.include_order_version
  }

  pub fn root_modules(&self) -> &[String] {
    &self.root_modules
  }
}

/// Fail with [`DescriptorError::DuplicateTarget`] on the first repeated target name.
pub fn ensure_unique_targets(targets: &[Target]) -> Result<(), DescriptorError> {
  let mut seen = HashSet::new();
  for target in targets {
    if !seen.insert(target.name()) {
      return Err(DescriptorError::DuplicateTarget(target.name().to_string()));
    }
  }
  Ok(())
}

// ============================================================================
// Module set
// ============================================================================

/// The loaded, read-only set of module descriptors, keyed by name.
///
/// Module identity is global: a set never holds two descriptors with the
/// same (case-sensitive) name. The set is never mutated after construction,
/// so it can be shared across threads resolving different targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSet {
  modules: BTreeMap<String, Module>,
}

impl ModuleSet {
  /// Build a module set.
  ///
  /// # Errors
  ///
  /// Returns [`DescriptorError::DuplicateModule`] if two descriptors share a name.
  pub fn new(modules: impl IntoIterator<Item = Module>) -> Result<Self, DescriptorError> {
    let mut map = BTreeMap::new();
    for module in modules {
      match map.entry(module.name().to_string()) {
        Entry::Occupied(entry) => return Err(DescriptorError::DuplicateModule(entry.key().clone())),
        Entry::Vacant(entry) => {
          entry.insert(module);
        }
      }
    }
    Ok(Self { modules: map })
  }

  pub fn get(&self, name: &str) -> Option<&Module> {
    self.modules.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.modules.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.modules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.modules.is_empty()
  }

  /// Modules in name order.
  pub fn iter(&self) -> impl Iterator<Item = &Module> {
    self.modules.values()
  }
}
