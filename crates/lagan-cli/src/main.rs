#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod logging;

use clap::Parser;
use lagan_core::{Config, RunOptionOverrides, RunOptions};
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lagan")]
#[command(author, version, about = "Dependency-ordered workspace operations", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Scope and policy flags shared by the workspace operation commands.
#[derive(clap::Args, Debug)]
struct ScopeArgs {
    /// Name of the focal package
    #[arg(long, value_name = "NAME")]
    package: Option<String>,

    /// Scope the run to the focal package and its dependencies, in
    /// dependency order with the focal package last
    #[arg(long, requires = "package")]
    this_package_only: bool,

    /// Keep processing remaining packages after a failure
    #[arg(long)]
    continue_on_error: bool,
}

impl ScopeArgs {
    fn overrides(&self) -> RunOptionOverrides {
        RunOptionOverrides {
            package: self.package.clone(),
            this_package_only: self.this_package_only.then_some(true),
            continue_on_error: self.continue_on_error.then_some(true),
        }
    }
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List workspace packages in dependency order
    List {
        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Run `npm install` in each package, then link workspace dependencies
    Install {
        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Remove each package's node_modules
    Uninstall {
        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Publish packages to the npm registry in dependency order
    Publish {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Dry run (don't actually publish)
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.json);

    // Determine working directory
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    // Build config
    let config = Config::new(cwd)
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json);

    match &cli.command {
        Commands::List { scope } => {
            commands::list::run(&config, &effective_options(scope), cli.json)
        }
        Commands::Install { scope } => {
            commands::install::run(&config, &effective_options(scope), cli.json)
        }
        Commands::Uninstall { scope } => {
            commands::uninstall::run(&config, &effective_options(scope), cli.json)
        }
        Commands::Publish { scope, dry_run } => {
            commands::publish::run(&config, &effective_options(scope), *dry_run, cli.json)
        }
    }
}

/// Merge built-in defaults with command-line overrides into the effective
/// run options. The middle layer is reserved for caller-supplied options
/// when lagan is embedded as a library.
fn effective_options(scope: &ScopeArgs) -> RunOptions {
    RunOptions::resolve(
        RunOptions::default(),
        RunOptionOverrides::default(),
        scope.overrides(),
    )
}
