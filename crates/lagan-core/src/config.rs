//! Runtime configuration and workspace run options.
//!
//! Options are explicit objects built once at process start and passed
//! into the components that need them; there is no global cached reader.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::emit::EmissionScope;

/// Runtime configuration for the lagan CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Current working directory.
    pub cwd: PathBuf,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            json_logs: false,
            verbosity: 0,
        }
    }
}

impl Config {
    /// Create a new config with the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON log output.
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }
}

/// Effective options for one workspace run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Named-package filter. With `this_package_only`, scopes the run to
    /// that package's dependency closure.
    pub package: Option<String>,

    /// Scope emission to the named package and its dependencies instead
    /// of the whole workspace.
    pub this_package_only: bool,

    /// Keep processing remaining packages after a failure.
    pub continue_on_error: bool,
}

/// A partial layer of run options. `None` fields defer to lower layers.
#[derive(Debug, Clone, Default)]
pub struct RunOptionOverrides {
    pub package: Option<String>,
    pub this_package_only: Option<bool>,
    pub continue_on_error: Option<bool>,
}

impl RunOptions {
    /// Merge defaults, caller-supplied options, and command-line
    /// overrides into one effective configuration. Later layers win per
    /// field.
    #[must_use]
    pub fn resolve(
        defaults: RunOptions,
        caller: RunOptionOverrides,
        cli: RunOptionOverrides,
    ) -> Self {
        let mut effective = defaults;
        for layer in [caller, cli] {
            if let Some(package) = layer.package {
                effective.package = Some(package);
            }
            if let Some(only) = layer.this_package_only {
                effective.this_package_only = only;
            }
            if let Some(continue_on_error) = layer.continue_on_error {
                effective.continue_on_error = continue_on_error;
            }
        }
        effective
    }

    /// The emission scope these options select: the named package's
    /// closure when a package token is supplied together with
    /// `this_package_only`, the whole workspace otherwise.
    #[must_use]
    pub fn scope(&self) -> EmissionScope {
        match (&self.package, self.this_package_only) {
            (Some(name), true) => EmissionScope::Closure(name.clone()),
            _ => EmissionScope::Full,
        }
    }
}
