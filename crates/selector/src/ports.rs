//! Collaborator contracts.
//!
//! Each trait covers one listing responsibility so that a selector only
//! depends on the methods it actually calls. Implementations live outside
//! this crate (network clients, workspace readers, terminal prompts).

use crate::error::BoxError;
use crate::topic::Topic;
use crate::types::{
    Pipeline, PipelineManifest, Subnet, SubnetVisibility, Task, TaskStack, Vpc, Workload,
    WorkspaceSummary,
};

pub type Listing<T> = std::result::Result<Vec<T>, BoxError>;

/// Per-call prompt presentation settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptConfig {
    /// Text shown in place of the prompt once an answer is given
    pub final_message: Option<String>,
}

impl PromptConfig {
    pub fn with_final_message(message: impl Into<String>) -> Self {
        Self {
            final_message: Some(message.into()),
        }
    }
}

/// Blocking user selection.
///
/// One outstanding call at a time; answers are the offered values
/// themselves, never indices.
pub trait Picker {
    fn select_one(
        &self,
        message: &str,
        help: &str,
        options: &[String],
        config: &PromptConfig,
    ) -> std::result::Result<String, BoxError>;

    /// May return an empty list.
    fn select_many(
        &self,
        message: &str,
        help: &str,
        options: &[String],
        config: &PromptConfig,
    ) -> std::result::Result<Vec<String>, BoxError>;
}

pub trait AppLister {
    fn list_applications(&self) -> Listing<String>;
}

pub trait EnvLister {
    fn list_environments(&self, app: &str) -> Listing<String>;
}

/// Workloads registered in an application
pub trait WorkloadLister {
    fn list_workloads(&self, app: &str) -> Listing<Workload>;
    fn list_services(&self, app: &str) -> Listing<Workload>;
    fn list_jobs(&self, app: &str) -> Listing<Workload>;
}

/// What is present in the local workspace
pub trait WorkspaceLister {
    fn summary(&self) -> std::result::Result<WorkspaceSummary, BoxError>;
    fn list_services(&self) -> Listing<String>;
    fn list_jobs(&self) -> Listing<String>;
    fn list_environments(&self) -> Listing<String>;
    fn list_pipelines(&self) -> Listing<PipelineManifest>;

    fn list_workloads(&self) -> Listing<String> {
        let mut names = self.list_services()?;
        names.extend(self.list_jobs()?);
        Ok(names)
    }
}

/// Deployment state per `(app, env)`
pub trait DeployStore {
    fn list_deployed_services(&self, app: &str, env: &str) -> Listing<String>;
    fn list_deployed_jobs(&self, app: &str, env: &str) -> Listing<String>;
    fn is_service_deployed(
        &self,
        app: &str,
        env: &str,
        name: &str,
    ) -> std::result::Result<bool, BoxError>;
    fn is_job_deployed(&self, app: &str, env: &str, name: &str)
        -> std::result::Result<bool, BoxError>;
    fn list_sns_topics(&self, app: &str, env: &str) -> Listing<Topic>;
}

/// Server-side filter for task listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub task_group: Option<String>,
}

pub trait TaskDescriber {
    fn list_active_app_env_tasks(&self, app: &str, env: &str, filter: &TaskFilter)
        -> Listing<Task>;
    fn list_active_default_cluster_tasks(&self, filter: &TaskFilter) -> Listing<Task>;
}

pub trait TaskStackDescriber {
    fn list_task_stacks(&self, app: &str, env: &str) -> Listing<TaskStack>;
    fn list_default_task_stacks(&self) -> Listing<TaskStack>;
}

pub trait PipelineLister {
    fn list_deployed_pipelines(&self, app: &str) -> Listing<Pipeline>;
}

pub trait VpcLister {
    fn list_vpcs(&self) -> Listing<Vpc>;
    fn list_subnets(&self, vpc_id: &str, visibility: SubnetVisibility) -> Listing<Subnet>;
}
