//! `lagan list` command implementation.
//!
//! List workspace packages in dependency order.

use lagan_core::{Config, RunOptions};
use miette::Result;

use super::ops;

/// Run the list command.
pub fn run(config: &Config, options: &RunOptions, json: bool) -> Result<()> {
    let ws = ops::load_workspace(config, json);
    let units = ops::ordered_units(&ws, options, json);

    if json {
        let pkg_list: Vec<_> = units
            .iter()
            .filter_map(|u| ws.get_package(&u.name))
            .map(|p| {
                serde_json::json!({
                    "name": p.name,
                    "version": p.version,
                    "path": p.path.to_string_lossy()
                })
            })
            .collect();

        println!(
            "{}",
            serde_json::json!({
                "ok": true,
                "root": ws.root.to_string_lossy(),
                "packages": pkg_list
            })
        );
    } else {
        println!("Workspace root: {}", ws.root.display());
        println!();
        println!("Packages ({}, dependency order):", units.len());
        for unit in &units {
            if let Some(pkg) = ws.get_package(&unit.name) {
                println!("  {} @ {}", pkg.name, pkg.version);
                println!("    {}", pkg.path.display());
            }
        }
    }

    Ok(())
}
