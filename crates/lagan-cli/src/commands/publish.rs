//! `lagan publish` command implementation.
//!
//! Publishes workspace packages in dependency order so a package never
//! reaches the registry before the local packages it depends on.
//! Packages marked `"private": true` are filtered out up front.

use lagan_core::pipeline::{ActionPipeline, PipelinePolicy};
use lagan_core::{Config, RunOptions};
use miette::Result;
use tracing::info;

use super::ops;

/// Run the publish command.
pub fn run(config: &Config, options: &RunOptions, dry_run: bool, json: bool) -> Result<()> {
    let ws = ops::load_workspace(config, json);
    let mut units = ops::ordered_units(&ws, options, json);

    units.retain(|unit| {
        let private = ws.get_package(&unit.name).is_some_and(|p| p.private);
        if private {
            info!(package = %unit.name, "skipping private package");
        }
        !private
    });

    let mut args = vec!["publish"];
    if dry_run {
        args.push("--dry-run");
    }

    let pipeline = ActionPipeline::new(
        ops::npm_action(&args),
        PipelinePolicy {
            continue_on_error: options.continue_on_error,
        },
    );

    ops::run_and_report("publish", pipeline, &units, json)
}
