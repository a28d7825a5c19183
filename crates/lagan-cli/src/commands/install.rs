//! `lagan install` command implementation.
//!
//! Runs `npm install` in each workspace package in dependency order, then
//! links workspace dependencies into the package's `node_modules` so local
//! packages resolve to their workspace directories instead of the registry.

use std::sync::Arc;

use lagan_core::link::link_workspace_dependency;
use lagan_core::pipeline::{ActionPipeline, ConditionalAction, PackageAction, PipelinePolicy};
use lagan_core::{Config, RunOptions, WorkspaceConfig};
use miette::Result;
use tracing::debug;

use super::ops;

/// Run the install command.
pub fn run(config: &Config, options: &RunOptions, json: bool) -> Result<()> {
    let ws = Arc::new(ops::load_workspace(config, json));
    let units = ops::ordered_units(&ws, options, json);

    let pipeline = ActionPipeline::new(
        ops::npm_action(&["install"]),
        PipelinePolicy {
            continue_on_error: options.continue_on_error,
        },
    )
    .with_post_action(link_action(Arc::clone(&ws)));

    ops::run_and_report("install", pipeline, &units, json)
}

/// Post-action: symlink workspace dependencies into the package's
/// `node_modules`. Gated on the package actually having workspace
/// dependencies.
fn link_action(ws: Arc<WorkspaceConfig>) -> ConditionalAction {
    let predicate_ws = Arc::clone(&ws);
    ConditionalAction::when(
        move |name, _| {
            predicate_ws
                .get_package(name)
                .is_some_and(|pkg| {
                    pkg.dependencies
                        .iter()
                        .any(|dep| predicate_ws.is_workspace_package(dep))
                })
        },
        PackageAction::sync(move |name, path| {
            let Some(pkg) = ws.get_package(name) else {
                return Ok(());
            };
            for dep in &pkg.dependencies {
                if let Some(target) = ws.get_package(dep) {
                    debug!(package = %name, dep = %dep, "linking workspace dependency");
                    link_workspace_dependency(path, dep, &target.path)
                        .map_err(|e| e.to_string())?;
                }
            }
            Ok(())
        }),
    )
}
