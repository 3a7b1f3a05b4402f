//! Check command integration tests.

use predicates::prelude::*;

use super::common::fixture_cmd;

#[test]
fn check_all_targets_pass() {
  fixture_cmd("check", "sample.toml")
    .assert()
    .success()
    .stdout(predicate::str::contains("FuryOfLegendsClient: 7 modules"))
    .stdout(predicate::str::contains("FuryOfLegendsServer: 6 modules"))
    .stdout(predicate::str::contains("All 3 targets resolved"));
}

#[test]
fn check_reports_each_failure() {
  fixture_cmd("check", "mixed.toml")
    .assert()
    .code(1)
    .stdout(predicate::str::contains("GameClient: 2 modules"))
    .stderr(predicate::str::contains("error[IncompatibleTargetType]: GameServer"))
    .stderr(predicate::str::contains("error[UnsupportedVersion]: GameFuture"))
    .stderr(predicate::str::contains("2 of 3 targets failed"));
}

#[test]
fn check_cycle() {
  fixture_cmd("check", "cycle.toml")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("error[DependencyCycle]: Loop"));
}
