//! Shared fixtures for library integration tests.

use std::path::Path;

use tempfile::TempDir;

/// Engine modules the game module links against, with their own dependencies.
pub const ENGINE_MODULES: &[(&str, &[&str])] = &[
  ("AIModule", &[]),
  ("Core", &[]),
  ("CoreUObject", &["Core"]),
  ("Engine", &["Core", "CoreUObject"]),
  ("EnhancedInput", &[]),
  ("GameplayTags", &[]),
  ("GameplayTasks", &[]),
  ("InputCore", &[]),
  ("NavigationSystem", &[]),
  ("OnlineSubsystem", &[]),
  ("OnlineSubsystemEOS", &[]),
  ("OnlineSubsystemUtils", &[]),
  ("Slate", &["SlateCore"]),
  ("SlateCore", &["Core"]),
  ("UMG", &["Slate", "Engine"]),
];

/// Direct dependencies of the game module, in declaration order.
pub const GAME_DEPENDENCIES: &[&str] = &[
  "Core",
  "CoreUObject",
  "Engine",
  "InputCore",
  "EnhancedInput",
  "NavigationSystem",
  "AIModule",
  "GameplayTasks",
  "UMG",
  "GameplayTags",
  "OnlineSubsystem",
  "OnlineSubsystemEOS",
  "OnlineSubsystemUtils",
  "Slate",
  "SlateCore",
];

fn quoted(names: &[&str]) -> String {
  names.iter().map(|n| format!("\"{n}\"")).collect::<Vec<_>>().join(", ")
}

/// TOML for the engine module library.
pub fn engine_toml() -> String {
  let mut out = String::new();
  for (name, deps) in ENGINE_MODULES {
    out.push_str(&format!(
      "[[modules]]\nname = \"{name}\"\npchMode = \"UseSharedPCH\"\npublicDependencies = [{}]\n\n",
      quoted(deps)
    ));
  }
  out
}

/// TOML for the game module, its targets and the resolver table.
pub fn game_toml() -> String {
  format!(
    r#"
[[modules]]
name = "FuryOfLegends"
pchMode = "UseExplicitOrSharedPCHs"
publicDependencies = [{deps}]

[[targets]]
name = "FuryOfLegendsClient"
type = "Client"
buildSettingsVersion = "V5"
includeOrderVersion = "Unreal5_4"
rootModules = ["FuryOfLegends"]

[[targets]]
name = "FuryOfLegendsServer"
type = "Server"
buildSettingsVersion = "V5"
includeOrderVersion = "Unreal5_4"
rootModules = ["FuryOfLegends"]

[[targets]]
name = "FuryOfLegendsLegacy"
type = "Game"
buildSettingsVersion = "V1"
includeOrderVersion = "Latest"
rootModules = ["FuryOfLegends"]

[resolver]
latestBuildSettings = "V5"
latestIncludeOrder = "Unreal5_4"

[[resolver.pchDowngrades]]
below = "V2"
from = "UseExplicitOrSharedPCH"
to = "UseSharedPCH"

[[resolver.exclusions]]
module = "UMG"
targetTypes = ["Server"]
"#,
    deps = quoted(GAME_DEPENDENCIES)
  )
}

/// A project directory with engine and game descriptors in separate files.
pub fn project_dir() -> TempDir {
  let temp = TempDir::new().unwrap();
  write(temp.path(), "engine/modules.modplan.toml", &engine_toml());
  write(temp.path(), "game.modplan.toml", &game_toml());
  temp
}

pub fn write(root: &Path, relative: &str, content: &str) {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  std::fs::write(path, content).unwrap();
}
