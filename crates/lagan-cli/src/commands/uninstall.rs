//! `lagan uninstall` command implementation.
//!
//! Removes each workspace package's `node_modules` directory, in
//! dependency order so the workspace unwinds the same way it was set up.

use std::fs;

use lagan_core::pipeline::{ActionPipeline, PackageAction, PipelinePolicy};
use lagan_core::{Config, RunOptions};
use miette::Result;
use tracing::debug;

use super::ops;

/// Run the uninstall command.
pub fn run(config: &Config, options: &RunOptions, json: bool) -> Result<()> {
    let ws = ops::load_workspace(config, json);
    let units = ops::ordered_units(&ws, options, json);

    let pipeline = ActionPipeline::new(
        PackageAction::sync(|name, path| {
            let node_modules = path.join("node_modules");
            if !node_modules.exists() {
                return Ok(());
            }
            debug!(package = %name, "removing node_modules");
            fs::remove_dir_all(&node_modules)
                .map_err(|e| format!("failed to remove {}: {e}", node_modules.display()))
        }),
        PipelinePolicy {
            continue_on_error: options.continue_on_error,
        },
    );

    ops::run_and_report("uninstall", pipeline, &units, json)
}
