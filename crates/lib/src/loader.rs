//! Loading descriptor files from disk.
//!
//! A module-set location is either a single descriptor file or a directory.
//! Directories are walked recursively in file name order; files named
//! `*.modplan.toml` or `*.modplan.json` are descriptor files, anything else
//! (a `Cargo.toml`, a `package.json`) is ignored. Hidden entries are skipped.
//! A path naming a single file is read whatever its name.
//!
//! Each file may declare `modules`, `targets` and a `resolver` table:
//!
//! ```toml
//! [[modules]]
//! name = "FuryOfLegends"
//! pchMode = "UseExplicitOrSharedPCH"
//! publicDependencies = ["Core", "Engine"]
//!
//! [[targets]]
//! name = "FuryOfLegendsClient"
//! type = "Client"
//! buildSettingsVersion = "V5"
//! includeOrderVersion = "Unreal5_4"
//! rootModules = ["FuryOfLegends"]
//! ```
//!
//! At most one `resolver` table may appear across the whole set.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::config::ResolverConfig;
use crate::consts::DESCRIPTOR_SUFFIXES;
use crate::descriptor::{
  DescriptorError, ModuleSet, RawModule, RawTarget, Target, ensure_unique_targets, load_module, load_target,
};

/// Errors raised while reading descriptor files.
#[derive(Debug, Error)]
pub enum LoadError {
  #[error("failed to read {path}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse {path}: {message}")]
  Parse { path: PathBuf, message: String },

  #[error("resolver configuration declared twice: {first} and {second}")]
  ConflictingConfig { first: PathBuf, second: PathBuf },

  #[error("unknown target '{name}' (available: {available})")]
  UnknownTarget { name: String, available: String },

  #[error(transparent)]
  Descriptor(#[from] DescriptorError),
}

impl LoadError {
  /// Diagnostic category reported to the caller.
  pub fn category(&self) -> &'static str {
    match self {
      LoadError::Io { .. } => "Io",
      LoadError::Parse { .. } => "MalformedDescriptor",
      LoadError::ConflictingConfig { .. } => "MalformedDescriptor",
      LoadError::UnknownTarget { .. } => "UnknownTarget",
      LoadError::Descriptor(err) => err.category(),
    }
  }
}

/// The contents of one descriptor file, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawDescriptorFile {
  pub modules: Vec<RawModule>,
  pub targets: Vec<RawTarget>,
  pub resolver: Option<ResolverConfig>,
}

/// Everything needed to resolve targets: modules, targets and configuration.
#[derive(Debug, Clone, Default)]
pub struct DescriptorSet {
  pub modules: ModuleSet,
  /// Targets in load order.
  pub targets: Vec<Target>,
  pub config: ResolverConfig,
}

impl DescriptorSet {
  pub fn target(&self, name: &str) -> Option<&Target> {
    self.targets.iter().find(|t| t.name() == name)
  }

  /// Look up a target, failing with the list of known targets.
  pub fn require_target(&self, name: &str) -> Result<&Target, LoadError> {
    self.target(name).ok_or_else(|| LoadError::UnknownTarget {
      name: name.to_string(),
      available: if self.targets.is_empty() {
        "none".to_string()
      } else {
        self.targets.iter().map(Target::name).collect::<Vec<_>>().join(", ")
      },
    })
  }
}

/// Load every descriptor file at `path` (a file or a directory).
///
/// # Errors
///
/// Fails on unreadable or unparsable files, malformed descriptors, duplicate
/// module or target names, and a repeated `resolver` table.
pub fn load_descriptors(path: &Path) -> Result<DescriptorSet, LoadError> {
  let files = descriptor_files(path)?;
  let mut parsed = Vec::with_capacity(files.len());
  for file in files {
    let content = fs::read_to_string(&file).map_err(|source| LoadError::Io {
      path: file.clone(),
      source,
    })?;
    let raw = parse_descriptor_file(&file, &content)?;
    parsed.push((file, raw));
  }
  assemble(parsed)
}

/// Parse one descriptor file, choosing the format from its extension.
///
/// Files without a `.json` extension are read as TOML.
pub fn parse_descriptor_file(path: &Path, content: &str) -> Result<RawDescriptorFile, LoadError> {
  let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
  let result: Result<RawDescriptorFile, String> = if is_json {
    serde_json::from_str(content).map_err(|e| e.to_string())
  } else {
    toml::from_str(content).map_err(|e| e.to_string())
  };
  result.map_err(|message| LoadError::Parse {
    path: path.to_path_buf(),
    message,
  })
}

/// Validate and merge parsed descriptor files into one set.
pub fn assemble(files: Vec<(PathBuf, RawDescriptorFile)>) -> Result<DescriptorSet, LoadError> {
  let mut modules = Vec::new();
  let mut targets = Vec::new();
  let mut config: Option<(PathBuf, ResolverConfig)> = None;

  for (path, raw) in files {
    trace!(
      path = %path.display(),
      modules = raw.modules.len(),
      targets = raw.targets.len(),
      "loaded descriptor file"
    );

    for raw_module in raw.modules {
      modules.push(load_module(raw_module)?);
    }
    for raw_target in raw.targets {
      targets.push(load_target(raw_target)?);
    }

    if let Some(resolver) = raw.resolver {
      if let Some((first, _)) = &config {
        return Err(LoadError::ConflictingConfig {
          first: first.clone(),
          second: path,
        });
      }
      config = Some((path, resolver));
    }
  }

  let modules = ModuleSet::new(modules)?;
  ensure_unique_targets(&targets)?;

  debug!(modules = modules.len(), targets = targets.len(), "loaded descriptor set");

  Ok(DescriptorSet {
    modules,
    targets,
    config: config.map(|(_, c)| c).unwrap_or_default(),
  })
}

fn descriptor_files(path: &Path) -> Result<Vec<PathBuf>, LoadError> {
  let metadata = fs::metadata(path).map_err(|source| LoadError::Io {
    path: path.to_path_buf(),
    source,
  })?;
  if !metadata.is_dir() {
    return Ok(vec![path.to_path_buf()]);
  }

  let walker = WalkDir::new(path)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

  let mut files = Vec::new();
  for entry in walker {
    let entry = entry.map_err(|e| LoadError::Io {
      path: e.path().map(Path::to_path_buf).unwrap_or_else(|| path.to_path_buf()),
      source: e.into(),
    })?;
    let is_descriptor = entry
      .file_name()
      .to_str()
      .is_some_and(|name| DESCRIPTOR_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)));
    if entry.file_type().is_file() && is_descriptor {
      files.push(entry.into_path());
    }
  }
  Ok(files)
}
