#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

pub mod config;
pub mod emit;
pub mod error;
pub mod graph;
pub mod link;
pub mod pipeline;
pub mod registry;
pub mod version;
pub mod workspace;

pub use config::{Config, RunOptionOverrides, RunOptions};
pub use emit::{EmissionScope, OrderedEmitter};
pub use error::{GraphError, WorkspaceError};
pub use graph::DepGraph;
pub use pipeline::{
    ActionError, ActionPipeline, ConditionalAction, PackageAction, PackageUnit, PipelinePolicy,
    RunOutcome, RunReport,
};
pub use registry::PackageRegistry;
pub use version::VERSION;
pub use workspace::{
    detect_workspaces, find_workspace_root, WorkspaceConfig, WorkspacePackage,
};
