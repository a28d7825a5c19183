//! Per-package action pipeline with continue-on-error semantics.
//!
//! Packages are processed strictly in emission order, one at a time: a
//! later package's action may assume an earlier dependency's action has
//! already completed, so action *i* is awaited to completion before
//! action *i+1* starts. Actions come in two flavors behind one invocation
//! contract: plain synchronous callables and suspending units of work
//! (subprocess invocations and the like).

use std::fmt;
use std::path::{Path, PathBuf};

use futures::future::BoxFuture;
use serde::Serialize;

/// A package as handed to the pipeline: descriptor name plus the
/// filesystem path its actions operate in.
#[derive(Debug, Clone)]
pub struct PackageUnit {
    pub name: String,
    pub path: PathBuf,
}

impl PackageUnit {
    /// Create a new package unit.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Synchronous action callable.
pub type SyncFn = Box<dyn Fn(&str, &Path) -> Result<(), String> + Send + Sync>;

/// Suspending action callable. The closure captures what it needs and
/// returns an owned future so the pipeline can await it.
pub type SuspendingFn =
    Box<dyn Fn(&str, &Path) -> BoxFuture<'static, Result<(), String>> + Send + Sync>;

/// Predicate gating a conditional action.
pub type PredicateFn = Box<dyn Fn(&str, &Path) -> bool + Send + Sync>;

/// An action over one package. Tagged variant instead of runtime
/// signature inspection: both arms share the same invocation contract.
pub enum PackageAction {
    Sync(SyncFn),
    Suspending(SuspendingFn),
}

impl PackageAction {
    /// Wrap a synchronous callable.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&str, &Path) -> Result<(), String> + Send + Sync + 'static,
    {
        Self::Sync(Box::new(f))
    }

    /// Wrap a suspending callable.
    pub fn suspending<F>(f: F) -> Self
    where
        F: Fn(&str, &Path) -> BoxFuture<'static, Result<(), String>> + Send + Sync + 'static,
    {
        Self::Suspending(Box::new(f))
    }

    async fn invoke(&self, name: &str, path: &Path) -> Result<(), String> {
        match self {
            Self::Sync(f) => f(name, path),
            Self::Suspending(f) => f(name, path).await,
        }
    }
}

impl fmt::Debug for PackageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("PackageAction::Sync"),
            Self::Suspending(_) => f.write_str("PackageAction::Suspending"),
        }
    }
}

/// An action gated by an optional predicate. An absent predicate means
/// the action always runs.
pub struct ConditionalAction {
    predicate: Option<PredicateFn>,
    action: PackageAction,
}

impl ConditionalAction {
    /// An unconditional action.
    #[must_use]
    pub fn always(action: PackageAction) -> Self {
        Self {
            predicate: None,
            action,
        }
    }

    /// An action that only runs when the predicate evaluates true for
    /// the package.
    pub fn when<F>(predicate: F, action: PackageAction) -> Self
    where
        F: Fn(&str, &Path) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Some(Box::new(predicate)),
            action,
        }
    }

    fn eligible(&self, name: &str, path: &Path) -> bool {
        self.predicate.as_ref().map_or(true, |p| p(name, path))
    }
}

/// Failure policy for a pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelinePolicy {
    /// Record failures and keep going instead of aborting on the first.
    pub continue_on_error: bool,
}

/// A per-package action failure.
#[derive(Debug, Clone, Serialize)]
pub struct ActionError {
    /// The offending package.
    pub package: String,
    /// Human-readable cause.
    pub message: String,
    /// Whether this failure aborted the run.
    pub fatal: bool,
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.package, self.message)
    }
}

impl std::error::Error for ActionError {}

/// How a run ended, for mapping to exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every package succeeded.
    AllSucceeded,
    /// Some packages failed but processing continued to the end.
    CompletedWithFailures,
    /// Processing aborted; packages after the offender were never started.
    Aborted,
}

/// Aggregate result of one pipeline run.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    /// Packages whose every action succeeded, in processing order.
    pub succeeded: Vec<String>,
    /// Per-package failures, in the order they occurred.
    pub failures: Vec<ActionError>,
    /// Set when the run aborted: the package whose failure was fatal.
    pub aborted_after: Option<String>,
}

impl RunReport {
    /// Classify the run.
    #[must_use]
    pub fn outcome(&self) -> RunOutcome {
        if self.aborted_after.is_some() {
            RunOutcome::Aborted
        } else if self.failures.is_empty() {
            RunOutcome::AllSucceeded
        } else {
            RunOutcome::CompletedWithFailures
        }
    }

    /// Whether every package succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.outcome() == RunOutcome::AllSucceeded
    }
}

/// Runs a primary action plus configured post-actions over an ordered
/// package sequence. Owns its actions for the run's lifetime.
pub struct ActionPipeline {
    primary: PackageAction,
    post_actions: Vec<ConditionalAction>,
    policy: PipelinePolicy,
}

impl ActionPipeline {
    /// Create a pipeline with a primary action and policy.
    #[must_use]
    pub fn new(primary: PackageAction, policy: PipelinePolicy) -> Self {
        Self {
            primary,
            post_actions: Vec::new(),
            policy,
        }
    }

    /// Append a post-action. Post-actions run in list order after the
    /// primary action.
    #[must_use]
    pub fn with_post_action(mut self, action: ConditionalAction) -> Self {
        self.post_actions.push(action);
        self
    }

    /// Process packages strictly in the given order. Never reorders or
    /// overlaps two packages' actions.
    pub async fn run(&self, packages: &[PackageUnit]) -> RunReport {
        let mut report = RunReport::default();

        for pkg in packages {
            let mut failed = false;

            if let Err(message) = self.primary.invoke(&pkg.name, &pkg.path).await {
                failed = true;
                if self.record_failure(&mut report, pkg, message) {
                    return report;
                }
            }

            // Post-actions run when the primary succeeded or its failure
            // was non-fatal under the policy.
            for post in &self.post_actions {
                if !post.eligible(&pkg.name, &pkg.path) {
                    continue;
                }
                if let Err(message) = post.action.invoke(&pkg.name, &pkg.path).await {
                    failed = true;
                    if self.record_failure(&mut report, pkg, message) {
                        return report;
                    }
                }
            }

            if !failed {
                report.succeeded.push(pkg.name.clone());
            }
        }

        report
    }

    /// Record one failure; returns true when the run must abort.
    fn record_failure(&self, report: &mut RunReport, pkg: &PackageUnit, message: String) -> bool {
        let fatal = !self.policy.continue_on_error;
        report.failures.push(ActionError {
            package: pkg.name.clone(),
            message,
            fatal,
        });
        if fatal {
            report.aborted_after = Some(pkg.name.clone());
        }
        fatal
    }
}
