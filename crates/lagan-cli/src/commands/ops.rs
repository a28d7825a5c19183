//! Shared plumbing for the workspace operation commands.
//!
//! All three operations (install, uninstall, publish) follow the same
//! shape: locate the workspace, build the graph and registry, resolve the
//! emission order for the effective options, then drive an action
//! pipeline over the ordered units and map the run report to output and
//! exit status.

use lagan_core::pipeline::{PackageAction, PackageUnit, RunOutcome, RunReport};
use lagan_core::{detect_workspaces, find_workspace_root, Config, OrderedEmitter, RunOptions, WorkspaceConfig};
use miette::{IntoDiagnostic, Result};
use tracing::{debug, info};

/// Locate and parse the workspace for the configured directory.
/// Prints a stable error and exits when there is none.
pub fn load_workspace(config: &Config, json: bool) -> WorkspaceConfig {
    let root = find_workspace_root(&config.cwd).unwrap_or_else(|| config.cwd.clone());

    if let Some(ws) = detect_workspaces(&root) {
        debug!(root = %ws.root.display(), packages = ws.packages.len(), "workspace detected");
        return ws;
    }

    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": false,
                "error": {
                    "code": "NO_WORKSPACES",
                    "message": "No workspaces configured"
                }
            })
        );
    } else {
        eprintln!("error: No workspaces configured");
        eprintln!("hint: Add a \"workspaces\" field to package.json");
    }
    std::process::exit(1);
}

/// Resolve the ordered package units for the effective options.
/// Structural graph errors (cycle, unknown node) are always fatal.
pub fn ordered_units(ws: &WorkspaceConfig, options: &RunOptions, json: bool) -> Vec<PackageUnit> {
    let (graph, registry) = ws.build_graph();
    let emitter = OrderedEmitter::new(&graph, &registry);

    match emitter.emit_map(&options.scope(), |name, pkg| {
        PackageUnit::new(name, &pkg.path)
    }) {
        Ok(units) => units,
        Err(e) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "ok": false,
                        "error": {
                            "code": e.code(),
                            "message": e.to_string()
                        }
                    })
                );
            } else {
                eprintln!("error: {e}");
            }
            std::process::exit(1);
        }
    }
}

/// Drive the pipeline on a fresh runtime and report the result.
pub fn run_and_report(
    op: &str,
    pipeline: lagan_core::ActionPipeline,
    units: &[PackageUnit],
    json: bool,
) -> Result<()> {
    info!(op, packages = units.len(), "processing in dependency order");

    let runtime = tokio::runtime::Runtime::new().into_diagnostic()?;
    let report = runtime.block_on(pipeline.run(units));

    print_report(op, &report, json);

    if report.is_ok() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

fn print_report(op: &str, report: &RunReport, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": report.is_ok(),
                "op": op,
                "outcome": outcome_str(report.outcome()),
                "succeeded": report.succeeded,
                "failures": report.failures,
                "aborted_after": report.aborted_after,
            })
        );
        return;
    }

    for name in &report.succeeded {
        println!("  + {name}");
    }
    for failure in &report.failures {
        eprintln!("error: {failure}");
    }
    match report.outcome() {
        RunOutcome::AllSucceeded => {
            println!("{op}: {} package(s) succeeded", report.succeeded.len());
        }
        RunOutcome::CompletedWithFailures => {
            println!(
                "{op}: {} succeeded, {} failed (continued on error)",
                report.succeeded.len(),
                report.failures.len()
            );
        }
        RunOutcome::Aborted => {
            println!(
                "{op}: aborted after {}; later packages were not processed",
                report.aborted_after.as_deref().unwrap_or("?")
            );
        }
    }
}

fn outcome_str(outcome: RunOutcome) -> &'static str {
    match outcome {
        RunOutcome::AllSucceeded => "all_succeeded",
        RunOutcome::CompletedWithFailures => "completed_with_failures",
        RunOutcome::Aborted => "aborted",
    }
}

/// A primary action that runs `npm` with the given arguments in each
/// package's directory.
pub fn npm_action(args: &[&str]) -> PackageAction {
    let args: Vec<String> = args.iter().map(|s| (*s).to_string()).collect();
    PackageAction::suspending(move |name, path| {
        let args = args.clone();
        let name = name.to_string();
        let path = path.to_path_buf();
        Box::pin(async move {
            info!(package = %name, args = %args.join(" "), "npm");
            let output = tokio::process::Command::new("npm")
                .args(&args)
                .current_dir(&path)
                .output()
                .await
                .map_err(|e| format!("failed to spawn npm: {e}"))?;

            if output.status.success() {
                Ok(())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(format!(
                    "npm {} exited with {}: {}",
                    args.join(" "),
                    output.status,
                    stderr.trim()
                ))
            }
        })
    })
}
