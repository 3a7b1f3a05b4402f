mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use modplan_lib::PlanError;
use modplan_lib::loader::LoadError;

use crate::cmd::{cmd_check, cmd_list, cmd_plan, cmd_why};
use crate::output::{OutputFormat, print_diagnostic};

/// modplan - Module build-plan resolver
#[derive(Parser)]
#[command(name = "modplan")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose (debug) logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve a target and print its build plan
  Plan {
    /// Name of the target to plan
    target: String,

    /// Descriptor file or directory
    #[arg(short, long, default_value = ".")]
    modules: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the plan to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
  },

  /// Resolve every target and report which ones fail
  Check {
    /// Descriptor file or directory
    #[arg(short, long, default_value = ".")]
    modules: PathBuf,
  },

  /// List declared targets and modules
  List {
    /// Descriptor file or directory
    #[arg(short, long, default_value = ".")]
    modules: PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,
  },

  /// Show why a module is part of a target's plan
  Why {
    /// Name of the target
    target: String,

    /// Name of the module to explain
    module: String,

    /// Descriptor file or directory
    #[arg(short, long, default_value = ".")]
    modules: PathBuf,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .without_time()
    .with_writer(std::io::stderr)
    .init();

  let result = match cli.command {
    Commands::Plan {
      target,
      modules,
      format,
      output,
    } => cmd_plan(&target, &modules, format, output.as_deref()).map(|()| ExitCode::SUCCESS),
    Commands::Check { modules } => cmd_check(&modules),
    Commands::List { modules, json } => cmd_list(&modules, json).map(|()| ExitCode::SUCCESS),
    Commands::Why {
      target,
      module,
      modules,
    } => cmd_why(&target, &module, &modules).map(|()| ExitCode::SUCCESS),
  };

  match result {
    Ok(code) => code,
    Err(err) => {
      print_diagnostic(category(&err), &format!("{err:#}"));
      ExitCode::FAILURE
    }
  }
}

/// Diagnostic category of the first library error in the chain.
fn category(err: &anyhow::Error) -> &'static str {
  for cause in err.chain() {
    if let Some(plan_err) = cause.downcast_ref::<PlanError>() {
      return plan_err.category();
    }
    if let Some(load_err) = cause.downcast_ref::<LoadError>() {
      return load_err.category();
    }
  }
  "Error"
}
