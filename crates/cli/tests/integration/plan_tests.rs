//! Plan command integration tests.

use predicates::prelude::*;

use super::common::{TestEnv, fixture_cmd};

const CLIENT_MODULES: &str = "\
module Core None
module CoreUObject UseSharedPCH
module Engine UseSharedPCH
module SlateCore UseSharedPCH
module Slate UseSharedPCH
module UMG UseSharedPCH
module FuryOfLegends UseExplicitOrSharedPCH
";

#[test]
fn plan_client_lines() {
  let output = fixture_cmd("plan", "sample.toml")
    .arg("FuryOfLegendsClient")
    .output()
    .unwrap();

  assert!(output.status.success());
  let stdout = String::from_utf8(output.stdout).unwrap();
  let lines: Vec<_> = stdout.lines().collect();
  assert_eq!(lines[0], "target FuryOfLegendsClient Client");
  assert_eq!(lines[1], "settings V5 Unreal5_4");
  assert!(lines[2].starts_with("fingerprint "));
  assert_eq!(lines[3..].join("\n") + "\n", CLIENT_MODULES);
}

#[test]
fn plan_server_drops_excluded_module() {
  fixture_cmd("plan", "sample.toml")
    .arg("FuryOfLegendsServer")
    .assert()
    .success()
    .stdout(predicate::str::contains("module Slate UseSharedPCH"))
    .stdout(predicate::str::contains("module UMG").not());
}

#[test]
fn plan_legacy_downgrades_pch() {
  fixture_cmd("plan", "sample.toml")
    .arg("FuryOfLegendsLegacy")
    .assert()
    .success()
    .stdout(predicate::str::contains("settings V1 Unreal5_4"))
    .stdout(predicate::str::contains("module FuryOfLegends UseSharedPCH"));
}

#[test]
fn plan_json() {
  let output = fixture_cmd("plan", "sample.toml")
    .arg("FuryOfLegendsClient")
    .arg("--format")
    .arg("json")
    .output()
    .unwrap();

  assert!(output.status.success());
  let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(value["target"], "FuryOfLegendsClient");
  assert_eq!(value["targetType"], "Client");
  assert_eq!(value["features"]["withServerCode"], false);
  assert_eq!(value["modules"].as_array().unwrap().len(), 7);
  assert_eq!(value["modules"][6]["moduleName"], "FuryOfLegends");
  assert_eq!(value["fingerprint"].as_str().unwrap().len(), 20);
}

#[test]
fn plan_is_reproducible() {
  let first = fixture_cmd("plan", "sample.toml")
    .arg("FuryOfLegendsClient")
    .output()
    .unwrap();
  let second = fixture_cmd("plan", "sample.toml")
    .arg("FuryOfLegendsClient")
    .output()
    .unwrap();

  assert_eq!(first.stdout, second.stdout);
}

#[test]
fn plan_to_file() {
  let env = TestEnv::new();

  fixture_cmd("plan", "sample.toml")
    .arg("FuryOfLegendsClient")
    .arg("-o")
    .arg(env.path("client.plan"))
    .assert()
    .success()
    .stdout(predicate::str::contains("7 modules"));

  let written = env.read_file("client.plan");
  assert!(written.starts_with("target FuryOfLegendsClient Client\n"));
  assert!(written.ends_with(CLIENT_MODULES));
}

#[test]
fn plan_split_directory() {
  fixture_cmd("plan", "split")
    .arg("GameEditor")
    .assert()
    .success()
    .stdout(predicate::str::contains("target GameEditor Editor"))
    .stdout(predicate::str::contains(
      "module Core None\nmodule Engine UseSharedPCH\nmodule Game UseExplicitOrSharedPCH\n",
    ));
}

#[test]
fn plan_cycle_reports_path() {
  fixture_cmd("plan", "cycle.toml")
    .arg("Loop")
    .assert()
    .code(1)
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("error[DependencyCycle]"))
    .stderr(predicate::str::contains("A -> B -> C -> A"));
}

#[test]
fn plan_unresolved_reference() {
  fixture_cmd("plan", "unresolved.toml")
    .arg("GameClient")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("error[UnresolvedReference]"))
    .stderr(predicate::str::contains("Renderer"));
}

#[test]
fn plan_duplicate_module() {
  fixture_cmd("plan", "duplicate_module.toml")
    .arg("Anything")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("error[DuplicateModule]"))
    .stderr(predicate::str::contains("Core"));
}

#[test]
fn plan_unknown_target() {
  fixture_cmd("plan", "sample.toml")
    .arg("FuryOfLegendsEditor")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("error[UnknownTarget]"))
    .stderr(predicate::str::contains("FuryOfLegendsClient"));
}

#[test]
fn plan_excluded_root() {
  fixture_cmd("plan", "mixed.toml")
    .arg("GameServer")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("error[IncompatibleTargetType]"))
    .stderr(predicate::str::contains("EditorTools"));
}

#[test]
fn plan_unsupported_version() {
  fixture_cmd("plan", "mixed.toml")
    .arg("GameFuture")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("error[UnsupportedVersion]"))
    .stderr(predicate::str::contains("V9"));
}
