//! Symlink creation for workspace dependencies in `node_modules`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::WorkspaceError;

/// Link a workspace dependency into a package's `node_modules`.
///
/// Creates a symlink (Unix) or junction (Windows) from
/// `<package>/node_modules/<dep_name>` to the dependency's workspace
/// directory, replacing any stale link or directory already there.
///
/// # Errors
/// Returns [`WorkspaceError::LinkFailed`] if the link cannot be created.
pub fn link_workspace_dependency(
    package_dir: &Path,
    dep_name: &str,
    dep_dir: &Path,
) -> Result<PathBuf, WorkspaceError> {
    let node_modules = package_dir.join("node_modules");

    fs::create_dir_all(&node_modules).map_err(|e| link_failed(dep_name, format!(
        "failed to create node_modules directory: {e}"
    )))?;

    // Scoped packages live one directory deeper: node_modules/@scope/name
    let link_path = if dep_name.starts_with('@') {
        let parts: Vec<&str> = dep_name.splitn(2, '/').collect();
        if parts.len() != 2 {
            return Err(link_failed(
                dep_name,
                format!("invalid scoped package name: {dep_name}"),
            ));
        }
        let scope_dir = node_modules.join(parts[0]);
        fs::create_dir_all(&scope_dir).map_err(|e| {
            link_failed(dep_name, format!("failed to create scope directory: {e}"))
        })?;
        scope_dir.join(parts[1])
    } else {
        node_modules.join(dep_name)
    };

    if link_path.exists() || link_path.symlink_metadata().is_ok() {
        remove_link_or_dir(dep_name, &link_path)?;
    }

    create_dir_link(dep_name, dep_dir, &link_path)?;

    Ok(link_path)
}

fn link_failed(name: &str, message: String) -> WorkspaceError {
    WorkspaceError::LinkFailed {
        name: name.to_string(),
        message,
    }
}

/// Remove a symlink, junction, or directory.
fn remove_link_or_dir(name: &str, path: &Path) -> Result<(), WorkspaceError> {
    #[cfg(unix)]
    {
        if let Ok(metadata) = fs::symlink_metadata(path) {
            if metadata.file_type().is_symlink() {
                fs::remove_file(path).map_err(|e| {
                    link_failed(name, format!("failed to remove existing symlink: {e}"))
                })?;
                return Ok(());
            }
        }
    }

    if path.is_dir() {
        fs::remove_dir_all(path)
            .map_err(|e| link_failed(name, format!("failed to remove existing directory: {e}")))?;
    } else if path.exists() {
        fs::remove_file(path)
            .map_err(|e| link_failed(name, format!("failed to remove existing file: {e}")))?;
    }

    Ok(())
}

/// Create a directory link (symlink on Unix, junction on Windows).
fn create_dir_link(name: &str, src: &Path, dst: &Path) -> Result<(), WorkspaceError> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(src, dst).map_err(|e| {
            link_failed(
                name,
                format!(
                    "failed to create symlink from {} to {}: {e}",
                    dst.display(),
                    src.display()
                ),
            )
        })?;
    }

    #[cfg(windows)]
    {
        junction::create(src, dst).map_err(|e| {
            link_failed(
                name,
                format!(
                    "failed to create junction from {} to {}: {e}",
                    dst.display(),
                    src.display()
                ),
            )
        })?;
    }

    Ok(())
}
