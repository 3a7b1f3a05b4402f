//! List and why command integration tests.

use predicates::prelude::*;

use super::common::{fixture_cmd, modplan_cmd, fixture_path};

#[test]
fn list_text() {
  fixture_cmd("list", "sample.toml")
    .assert()
    .success()
    .stdout(predicate::str::contains("Targets (3):"))
    .stdout(predicate::str::contains("FuryOfLegendsServer: Server V5 Unreal5_4 [FuryOfLegends]"))
    .stdout(predicate::str::contains("Modules (7):"))
    .stdout(predicate::str::contains("FuryOfLegends: UseExplicitOrSharedPCH (6 dependencies)"));
}

#[test]
fn list_json() {
  let output = fixture_cmd("list", "sample.toml").arg("--json").output().unwrap();

  assert!(output.status.success());
  let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(value["targets"].as_array().unwrap().len(), 3);
  assert_eq!(value["targets"][2]["buildSettingsVersion"], "V1");
  assert_eq!(value["targets"][2]["includeOrderVersion"], "Latest");
  assert_eq!(value["modules"].as_array().unwrap().len(), 7);
  assert_eq!(value["modules"][0]["name"], "Core");
  assert_eq!(value["modules"][0]["pchMode"], "None");
}

#[test]
fn why_direct_dependency() {
  modplan_cmd()
    .arg("why")
    .arg("FuryOfLegendsClient")
    .arg("SlateCore")
    .arg("-m")
    .arg(fixture_path("sample.toml"))
    .assert()
    .success()
    .stdout(predicate::str::diff("FuryOfLegends → SlateCore (private)\n"));
}

#[test]
fn why_public_dependency() {
  modplan_cmd()
    .arg("why")
    .arg("GameEditor")
    .arg("Engine")
    .arg("-m")
    .arg(fixture_path("split"))
    .assert()
    .success()
    .stdout(predicate::str::diff("Game → Engine\n"));
}

#[test]
fn why_private_dependency() {
  modplan_cmd()
    .arg("why")
    .arg("GameEditor")
    .arg("Core")
    .arg("-m")
    .arg(fixture_path("split"))
    .assert()
    .success()
    .stdout(predicate::str::diff("Game → Core (private)\n"));
}

#[test]
fn why_module_outside_closure() {
  modplan_cmd()
    .arg("why")
    .arg("GameClient")
    .arg("EditorTools")
    .arg("-m")
    .arg(fixture_path("mixed.toml"))
    .assert()
    .code(1)
    .stderr(predicate::str::contains("error[NotInClosure]"));
}
