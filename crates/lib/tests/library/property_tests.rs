//! Properties of resolution over generated dependency graphs.

use std::collections::{BTreeSet, HashMap};

use modplan_lib::config::ResolverConfig;
use modplan_lib::descriptor::{Module, ModuleSet, PchMode, Target, TargetType, VersionTag};
use modplan_lib::plan::plan_target;
use proptest::prelude::*;

const MAX_MODULES: usize = 12;

/// Module names that do not follow dependency order.
fn name(i: usize) -> String {
  format!("M{:02}", (i * 7) % 13)
}

/// Adjacency rows; row `i` may only point at modules `j < i`, so the graph is acyclic.
fn arb_dag() -> impl Strategy<Value = Vec<Vec<bool>>> {
  prop::collection::vec(prop::collection::vec(any::<bool>(), 0..MAX_MODULES), 1..MAX_MODULES)
}

fn dependencies(rows: &[Vec<bool>], i: usize) -> Vec<String> {
  rows[i]
    .iter()
    .enumerate()
    .filter(|&(j, &edge)| edge && j < i)
    .map(|(j, _)| name(j))
    .collect()
}

fn module_set(rows: &[Vec<bool>], reverse_declarations: bool) -> ModuleSet {
  let modules = (0..rows.len()).map(|i| {
    let mut deps = dependencies(rows, i);
    if reverse_declarations {
      deps.reverse();
    }
    Module::new(name(i), deps, vec![], PchMode::UseSharedPch).unwrap()
  });
  ModuleSet::new(modules.collect::<Vec<_>>()).unwrap()
}

fn target_for(root: &str) -> Target {
  Target::new(
    "Generated",
    TargetType::Game,
    VersionTag::Latest,
    VersionTag::Latest,
    vec![root.to_string()],
  )
  .unwrap()
}

fn reachable(rows: &[Vec<bool>], root: usize) -> BTreeSet<String> {
  let mut seen = BTreeSet::new();
  let mut stack = vec![root];
  while let Some(i) = stack.pop() {
    if !seen.insert(name(i)) {
      continue;
    }
    for (j, &edge) in rows[i].iter().enumerate() {
      if edge && j < i {
        stack.push(j);
      }
    }
  }
  seen
}

proptest! {
  #[test]
  fn plan_is_topological(rows in arb_dag()) {
    let root = rows.len() - 1;
    let set = module_set(&rows, false);
    let plan = plan_target(&set, &target_for(&name(root)), &ResolverConfig::default()).unwrap();

    let position: HashMap<&str, usize> = plan
      .module_names()
      .into_iter()
      .enumerate()
      .map(|(pos, module)| (module, pos))
      .collect();
    for module in plan.modules() {
      for dep in module.dependencies() {
        prop_assert!(position[dep.as_str()] < position[module.name()]);
      }
    }
  }

  #[test]
  fn plan_is_exactly_the_closure(rows in arb_dag()) {
    let root = rows.len() - 1;
    let set = module_set(&rows, false);
    let plan = plan_target(&set, &target_for(&name(root)), &ResolverConfig::default()).unwrap();

    let planned: BTreeSet<String> = plan.module_names().into_iter().map(str::to_string).collect();
    prop_assert_eq!(planned.len(), plan.modules().len());
    prop_assert_eq!(planned, reachable(&rows, root));
  }

  #[test]
  fn order_ignores_declaration_order(rows in arb_dag()) {
    let root = rows.len() - 1;
    let target = target_for(&name(root));
    let config = ResolverConfig::default();

    let forward = plan_target(&module_set(&rows, false), &target, &config).unwrap();
    let again = plan_target(&module_set(&rows, false), &target, &config).unwrap();
    let reversed = plan_target(&module_set(&rows, true), &target, &config).unwrap();

    prop_assert_eq!(forward.module_names(), again.module_names());
    prop_assert_eq!(forward.module_names(), reversed.module_names());
  }

  #[test]
  fn rings_always_report_every_member(len in 2usize..8) {
    let modules: Vec<Module> = (0..len)
      .map(|i| Module::new(name(i), vec![name((i + 1) % len)], vec![], PchMode::NoPch).unwrap())
      .collect();
    let set = ModuleSet::new(modules).unwrap();

    let err = plan_target(&set, &target_for(&name(0)), &ResolverConfig::default()).unwrap_err();
    prop_assert_eq!(err.category(), "DependencyCycle");

    let message = err.to_string();
    for i in 0..len {
      prop_assert!(message.contains(&name(i)));
    }
  }
}
