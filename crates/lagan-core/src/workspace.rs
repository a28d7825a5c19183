//! Workspace discovery for npm-style monorepos.
//!
//! Parses the `workspaces` field from the root package.json, expands its
//! glob patterns, reads each member's manifest, and feeds the dependency
//! graph and registry the emitter runs over.

use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::graph::DepGraph;
use crate::registry::PackageRegistry;

/// A discovered workspace package.
#[derive(Debug, Clone)]
pub struct WorkspacePackage {
    /// Package name from package.json.
    pub name: String,
    /// Version from package.json.
    pub version: String,
    /// Absolute path to the workspace directory.
    pub path: PathBuf,
    /// Declared dependency names (dependencies, devDependencies,
    /// optionalDependencies), sorted and deduplicated.
    pub dependencies: Vec<String>,
    /// `"private": true` in the manifest; publish skips these.
    pub private: bool,
}

/// Workspace configuration from the root package.json.
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    /// Root directory of the monorepo.
    pub root: PathBuf,
    /// Map of package name -> workspace info.
    pub packages: HashMap<String, WorkspacePackage>,
}

impl WorkspaceConfig {
    /// Check if a package name is a workspace package.
    #[must_use]
    pub fn is_workspace_package(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Get workspace package info by name.
    #[must_use]
    pub fn get_package(&self, name: &str) -> Option<&WorkspacePackage> {
        self.packages.get(name)
    }

    /// Build the dependency graph and payload registry for this
    /// workspace. Members are inserted in sorted-name order so the
    /// graph's insertion-order tie-break is reproducible across runs.
    /// Every declared dependency becomes an edge; dependencies that are
    /// not workspace members stay payload-less and are skipped at
    /// emission time.
    #[must_use]
    pub fn build_graph(&self) -> (DepGraph, PackageRegistry<WorkspacePackage>) {
        let mut names: Vec<&String> = self.packages.keys().collect();
        names.sort();

        let mut graph = DepGraph::new();
        let mut registry = PackageRegistry::new();

        for name in &names {
            graph.add_node(name);
        }
        for name in names {
            let pkg = &self.packages[name];
            registry.set(name, pkg.clone());
            for dep in &pkg.dependencies {
                graph.add_dependency(name, dep);
            }
        }

        (graph, registry)
    }
}

/// Detect and parse workspace configuration from a project root.
///
/// Returns `None` if the project doesn't use workspaces.
#[must_use]
pub fn detect_workspaces(project_root: &Path) -> Option<WorkspaceConfig> {
    let package_json_path = project_root.join("package.json");
    let content = std::fs::read_to_string(&package_json_path).ok()?;
    let package: Value = serde_json::from_str(&content).ok()?;

    let workspaces = package.get("workspaces")?;

    // Workspaces can be an array or an object with "packages" (yarn-style)
    let patterns: Vec<String> = match workspaces {
        Value::Array(arr) => arr
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
        Value::Object(obj) => obj
            .get("packages")
            .and_then(|p| p.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default(),
        _ => return None,
    };

    if patterns.is_empty() {
        return None;
    }

    let packages = discover_workspace_packages(project_root, &patterns);

    if packages.is_empty() {
        return None;
    }

    Some(WorkspaceConfig {
        root: project_root.to_path_buf(),
        packages,
    })
}

/// Find the workspace root by walking up the directory tree.
///
/// Returns the first directory containing a package.json with a
/// "workspaces" field.
#[must_use]
pub fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let package_json = current.join("package.json");
        if package_json.exists() {
            if let Ok(content) = std::fs::read_to_string(&package_json) {
                if let Ok(package) = serde_json::from_str::<Value>(&content) {
                    if package.get("workspaces").is_some() {
                        return Some(current);
                    }
                }
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Expand glob patterns and discover workspace packages.
fn discover_workspace_packages(
    root: &Path,
    patterns: &[String],
) -> HashMap<String, WorkspacePackage> {
    let mut packages = HashMap::new();

    for pattern in patterns {
        let full_pattern = root.join(pattern);
        let pattern_str = full_pattern.to_string_lossy();

        if let Ok(entries) = glob::glob(&pattern_str) {
            for entry in entries.flatten() {
                if let Some(pkg) = read_workspace_package(&entry) {
                    packages.insert(pkg.name.clone(), pkg);
                }
            }
        }
    }

    packages
}

/// Read package info from a workspace directory.
fn read_workspace_package(dir: &Path) -> Option<WorkspacePackage> {
    if !dir.is_dir() {
        return None;
    }

    let package_json_path = dir.join("package.json");
    let content = std::fs::read_to_string(&package_json_path).ok()?;
    let package: Value = serde_json::from_str(&content).ok()?;

    let name = package.get("name")?.as_str()?.to_string();
    let version = package
        .get("version")
        .and_then(|v| v.as_str())
        .unwrap_or("0.0.0")
        .to_string();
    let private = package
        .get("private")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut dependencies = Vec::new();
    for section in ["dependencies", "devDependencies", "optionalDependencies"] {
        if let Some(obj) = package.get(section).and_then(|v| v.as_object()) {
            for dep in obj.keys() {
                dependencies.push(dep.clone());
            }
        }
    }
    dependencies.sort();
    dependencies.dedup();

    Some(WorkspacePackage {
        name,
        version,
        path: dir.to_path_buf(),
        dependencies,
        private,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_manifest(dir: &Path, json: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("package.json"), json).unwrap();
    }

    #[test]
    fn test_detect_workspaces_array_format() {
        let root = tempdir().unwrap();
        write_manifest(
            root.path(),
            r#"{"name": "monorepo", "workspaces": ["packages/*"]}"#,
        );
        write_manifest(
            &root.path().join("packages/my-lib"),
            r#"{"name": "@myorg/my-lib", "version": "1.0.0"}"#,
        );

        let config = detect_workspaces(root.path()).unwrap();
        assert!(config.is_workspace_package("@myorg/my-lib"));
        assert_eq!(config.packages.len(), 1);
    }

    #[test]
    fn test_detect_workspaces_object_format() {
        let root = tempdir().unwrap();
        write_manifest(
            root.path(),
            r#"{"name": "monorepo", "workspaces": {"packages": ["packages/*"]}}"#,
        );
        write_manifest(
            &root.path().join("packages/utils"),
            r#"{"name": "utils", "version": "2.0.0"}"#,
        );

        let config = detect_workspaces(root.path()).unwrap();
        assert!(config.is_workspace_package("utils"));
    }

    #[test]
    fn test_no_workspaces() {
        let root = tempdir().unwrap();
        write_manifest(root.path(), r#"{"name": "regular-project"}"#);
        assert!(detect_workspaces(root.path()).is_none());
    }

    #[test]
    fn test_find_workspace_root() {
        let root = tempdir().unwrap();
        write_manifest(
            root.path(),
            r#"{"name": "monorepo", "workspaces": ["packages/*"]}"#,
        );
        let nested = root.path().join("packages/nested/deep");
        fs::create_dir_all(&nested).unwrap();

        let found = find_workspace_root(&nested).unwrap();
        assert_eq!(found, root.path());
    }

    #[test]
    fn test_dependencies_collected_sorted() {
        let root = tempdir().unwrap();
        write_manifest(
            root.path(),
            r#"{"name": "monorepo", "workspaces": ["packages/*"]}"#,
        );
        write_manifest(
            &root.path().join("packages/app"),
            r#"{
                "name": "app",
                "version": "1.0.0",
                "dependencies": {"zlib-like": "^1.0.0", "lib": "workspace:*"},
                "devDependencies": {"dev-tool": "^2.0.0"}
            }"#,
        );

        let config = detect_workspaces(root.path()).unwrap();
        let app = config.get_package("app").unwrap();
        assert_eq!(app.dependencies, vec!["dev-tool", "lib", "zlib-like"]);
    }

    #[test]
    fn test_build_graph_orders_members() {
        let root = tempdir().unwrap();
        write_manifest(
            root.path(),
            r#"{"name": "monorepo", "workspaces": ["packages/*"]}"#,
        );
        write_manifest(
            &root.path().join("packages/app"),
            r#"{"name": "app", "version": "1.0.0", "dependencies": {"lib": "1.0.0"}}"#,
        );
        write_manifest(
            &root.path().join("packages/lib"),
            r#"{"name": "lib", "version": "1.0.0", "dependencies": {"left-pad": "^1.3.0"}}"#,
        );

        let config = detect_workspaces(root.path()).unwrap();
        let (graph, registry) = config.build_graph();

        // left-pad is a node but has no payload.
        assert!(graph.has_node("left-pad"));
        assert!(registry.get("left-pad").is_none());
        assert!(registry.get("app").is_some());

        let order = graph.overall_order().unwrap();
        let pos = |n: &str| order.iter().position(|x| x == n).unwrap();
        assert!(pos("lib") < pos("app"));
        assert!(pos("left-pad") < pos("lib"));
    }

    #[test]
    fn test_private_flag() {
        let root = tempdir().unwrap();
        write_manifest(
            root.path(),
            r#"{"name": "monorepo", "workspaces": ["packages/*"]}"#,
        );
        write_manifest(
            &root.path().join("packages/internal"),
            r#"{"name": "internal", "version": "1.0.0", "private": true}"#,
        );

        let config = detect_workspaces(root.path()).unwrap();
        assert!(config.get_package("internal").unwrap().private);
    }
}
