//! List command implementation.

use std::path::Path;

use anyhow::Result;

use modplan_lib::loader::load_descriptors;

use crate::output::{print_json, print_stat};

pub fn cmd_list(modules: &Path, json: bool) -> Result<()> {
  let set = load_descriptors(modules)?;

  if json {
    let targets: Vec<_> = set
      .targets
      .iter()
      .map(|t| {
        serde_json::json!({
          "name": t.name(),
          "type": t.target_type(),
          "buildSettingsVersion": t.build_settings_version().to_string(),
          "includeOrderVersion": t.include_order_version().to_string(),
          "rootModules": t.root_modules(),
        })
      })
      .collect();
    let module_list: Vec<_> = set
      .modules
      .iter()
      .map(|m| {
        serde_json::json!({
          "name": m.name(),
          "pchMode": m.pch_mode(),
          "publicDependencies": m.public_dependencies(),
          "privateDependencies": m.private_dependencies(),
        })
      })
      .collect();
    print_json(&serde_json::json!({ "targets": targets, "modules": module_list }))?;
    return Ok(());
  }

  println!("Targets ({}):", set.targets.len());
  for target in &set.targets {
    print_stat(
      target.name(),
      &format!(
        "{} {} {} [{}]",
        target.target_type(),
        target.build_settings_version(),
        target.include_order_version(),
        target.root_modules().join(", ")
      ),
    );
  }

  println!();
  println!("Modules ({}):", set.modules.len());
  for module in set.modules.iter() {
    let deps = module.dependencies().count();
    print_stat(module.name(), &format!("{} ({} dependencies)", module.pch_mode(), deps));
  }

  Ok(())
}
