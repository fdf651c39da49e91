//! # Deploy Selector
//!
//! Decides which deployment target the user means: an application,
//! environment, workload, deployed instance, running task, pipeline or
//! topic.
//!
//! ## Flow
//!
//! ```text
//! Collaborators (config store, workspace, deploy state, task describer)
//!     │
//!     ├──> Retrieve candidates
//!     │
//!     ├──> Reconcile / filter
//!     │      ├─ authoritative list ∩ workspace names (authoritative order)
//!     │      ├─ (workload, env) pairs that are really deployed
//!     │      └─ caller filters, AND-composed, fail-fast
//!     │
//!     └──> Auto-resolve gate
//!            ├─ 0 candidates → error
//!            ├─ 1 candidate  → returned, with a notice for the caller
//!            └─ n candidates → Picker
//! ```
//!
//! Selectors never print. Single-value results come back as a
//! [`Selection`], whose [`Decision`] tells the caller whether the user was
//! asked and, if not, what to tell them.
//!
//! ## Example
//!
//! ```rust,ignore
//! use deploy_selector::{Ask, DeployOptions, DeploySelector};
//!
//! let selector = DeploySelector::new(&store, &store, &deploy, &picker);
//! let opts = DeployOptions::new().with_env("test");
//! let selected = selector.deployed_service(Ask::new("Select a service", ""), "mockApp", &opts)?;
//! if let Some(notice) = selected.notice() {
//!     log::info!("{notice}");
//! }
//! ```

mod app_env;
mod deploy;
mod ec2;
mod error;
mod gate;
mod pipeline;
pub mod ports;
mod reconcile;
mod sequence;
mod task;
mod topic;
mod topics;
mod types;
mod workspace;

pub use app_env::{AppEnvSelector, ConfigSelector};
pub use deploy::{DeployOptions, DeploySelector, WorkloadFilter};
pub use ec2::Ec2Selector;
pub use error::{BoxError, Result, SelectError};
pub use gate::{only_one_notice, Ask, AutoReason, AutoResolve, Decision, Selection};
pub use pipeline::PipelineSelector;
pub use ports::{Picker, PromptConfig};
pub use reconcile::{reconcile, reconcile_items};
pub use sequence::{ordinal, stage_prompt, NO_MORE_ENVIRONMENTS};
pub use task::{task_label, TaskOptions, TaskSelector, TaskStackSelector};
pub use topic::Topic;
pub use topics::{intersect_topics, TopicSelector};
pub use workspace::WorkspaceSelector;
pub use types::{
    DeployedWorkload, Pipeline, PipelineManifest, Subnet, SubnetVisibility, Task, TaskStack, Vpc,
    Workload, WorkloadKind, WorkspaceSummary,
};
