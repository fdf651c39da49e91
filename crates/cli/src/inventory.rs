//! File-backed stand-in for the deployment collaborators.
//!
//! An inventory describes applications, what is deployed where, and what the
//! local workspace contains. It implements every listing port of
//! `deploy_selector` so the selectors can run without network clients.

use anyhow::{Context as AnyhowContext, Result};
use deploy_selector::ports::{
    AppLister, DeployStore, EnvLister, Listing, PipelineLister, TaskDescriber, TaskFilter,
    TaskStackDescriber, VpcLister, WorkloadLister, WorkspaceLister,
};
use deploy_selector::{
    BoxError, Pipeline, PipelineManifest, Subnet, SubnetVisibility, Task, TaskStack, Topic, Vpc,
    Workload, WorkspaceSummary,
};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const INVENTORY_ENV: &str = "DEPLOY_SELECT_INVENTORY";
pub const DEFAULT_INVENTORY_PATH: &str = ".deploy-select/inventory.toml";

const DEFAULT_REGION: &str = "us-west-2";
const DEFAULT_ACCOUNT: &str = "123456789012";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Inventory {
    pub region: Option<String>,
    pub account: Option<String>,
    pub applications: Vec<ApplicationEntry>,
    pub workspace: Option<WorkspaceEntry>,
    pub default_tasks: Vec<TaskEntry>,
    pub default_task_stacks: Vec<TaskStack>,
    pub vpcs: Vec<VpcEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApplicationEntry {
    pub name: String,
    pub environments: Vec<String>,
    pub workloads: Vec<WorkloadEntry>,
    pub pipelines: Vec<Pipeline>,
    pub tasks: Vec<TaskEntry>,
    pub task_stacks: Vec<TaskStackEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkloadEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub workload_type: String,

    /// Environments the workload is deployed to
    #[serde(default)]
    pub deployed: Vec<String>,

    /// Topic names published in every environment the workload is deployed to
    #[serde(default)]
    pub topics: Vec<String>,
}

impl WorkloadEntry {
    fn is_job(&self) -> bool {
        self.workload_type.ends_with("Job")
    }

    fn is_deployed_in(&self, env: &str) -> bool {
        self.deployed.iter().any(|e| e == env)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskEntry {
    /// Only set for tasks that belong to an application
    #[serde(default)]
    pub env: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    pub arn: String,
    pub task_definition_arn: String,
}

impl TaskEntry {
    fn in_group(&self, filter: &TaskFilter) -> bool {
        match &filter.task_group {
            Some(group) => self.group.as_deref() == Some(group.as_str()),
            None => true,
        }
    }

    fn to_task(&self) -> Task {
        Task {
            arn: self.arn.clone(),
            task_definition_arn: self.task_definition_arn.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskStackEntry {
    pub env: String,
    pub task_name: String,
    pub stack_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkspaceEntry {
    pub application: String,
    pub services: Vec<String>,
    pub jobs: Vec<String>,
    pub environments: Vec<String>,
    pub pipelines: Vec<PipelineManifest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VpcEntry {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub public_subnets: Vec<Subnet>,
    #[serde(default)]
    pub private_subnets: Vec<Subnet>,
}

/// `--inventory`, then `$DEPLOY_SELECT_INVENTORY`, then the default location.
pub fn resolve_inventory_path(provided: Option<PathBuf>) -> PathBuf {
    provided
        .or_else(|| env::var_os(INVENTORY_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INVENTORY_PATH))
}

impl Inventory {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read inventory {}", path.display()))?;
        let inventory = Self::parse(&raw, path)
            .with_context(|| format!("Failed to parse inventory {}", path.display()))?;
        log::debug!(
            "Loaded inventory {} ({} applications)",
            path.display(),
            inventory.applications.len()
        );
        Ok(inventory)
    }

    fn parse(raw: &str, path: &Path) -> Result<Self> {
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Ok(serde_json::from_str(raw)?)
        } else {
            Ok(toml::from_str(raw)?)
        }
    }

    fn application(&self, app: &str) -> std::result::Result<&ApplicationEntry, BoxError> {
        self.applications
            .iter()
            .find(|a| a.name == app)
            .ok_or_else(|| format!("application {app} does not exist").into())
    }

    fn environment(&self, app: &str, env: &str) -> std::result::Result<&ApplicationEntry, BoxError> {
        let entry = self.application(app)?;
        if !entry.environments.iter().any(|e| e == env) {
            return Err(format!("environment {env} does not exist in application {app}").into());
        }
        Ok(entry)
    }

    fn workloads_where(
        &self,
        app: &str,
        keep: impl Fn(&WorkloadEntry) -> bool,
    ) -> Listing<Workload> {
        Ok(self
            .application(app)?
            .workloads
            .iter()
            .filter(|w| keep(w))
            .map(|w| Workload::new(w.name.clone(), w.workload_type.clone()))
            .collect())
    }

    fn deployed_where(&self, app: &str, env: &str, jobs: bool) -> Listing<String> {
        Ok(self
            .environment(app, env)?
            .workloads
            .iter()
            .filter(|w| w.is_job() == jobs && w.is_deployed_in(env))
            .map(|w| w.name.clone())
            .collect())
    }

    fn topic_arn(&self, app: &str, env: &str, workload: &str, topic: &str) -> String {
        format!(
            "arn:aws:sns:{}:{}:{app}-{env}-{workload}-{topic}",
            self.region.as_deref().unwrap_or(DEFAULT_REGION),
            self.account.as_deref().unwrap_or(DEFAULT_ACCOUNT),
        )
    }

    fn workspace(&self) -> std::result::Result<&WorkspaceEntry, BoxError> {
        self.workspace
            .as_ref()
            .ok_or_else(|| "no workspace found in inventory".into())
    }

    fn vpc(&self, vpc_id: &str) -> std::result::Result<&VpcEntry, BoxError> {
        self.vpcs
            .iter()
            .find(|v| v.id == vpc_id)
            .ok_or_else(|| format!("VPC {vpc_id} does not exist").into())
    }
}

impl AppLister for Inventory {
    fn list_applications(&self) -> Listing<String> {
        Ok(self.applications.iter().map(|a| a.name.clone()).collect())
    }
}

impl EnvLister for Inventory {
    fn list_environments(&self, app: &str) -> Listing<String> {
        Ok(self.application(app)?.environments.clone())
    }
}

impl WorkloadLister for Inventory {
    fn list_workloads(&self, app: &str) -> Listing<Workload> {
        self.workloads_where(app, |_| true)
    }

    fn list_services(&self, app: &str) -> Listing<Workload> {
        self.workloads_where(app, |w| !w.is_job())
    }

    fn list_jobs(&self, app: &str) -> Listing<Workload> {
        self.workloads_where(app, WorkloadEntry::is_job)
    }
}

impl DeployStore for Inventory {
    fn list_deployed_services(&self, app: &str, env: &str) -> Listing<String> {
        self.deployed_where(app, env, false)
    }

    fn list_deployed_jobs(&self, app: &str, env: &str) -> Listing<String> {
        self.deployed_where(app, env, true)
    }

    fn is_service_deployed(&self, app: &str, env: &str, name: &str) -> Result<bool, BoxError> {
        Ok(self.deployed_where(app, env, false)?.iter().any(|n| n == name))
    }

    fn is_job_deployed(&self, app: &str, env: &str, name: &str) -> Result<bool, BoxError> {
        Ok(self.deployed_where(app, env, true)?.iter().any(|n| n == name))
    }

    fn list_sns_topics(&self, app: &str, env: &str) -> Listing<Topic> {
        let mut topics = Vec::new();
        for workload in self.environment(app, env)?.workloads.iter() {
            if !workload.is_deployed_in(env) {
                continue;
            }
            for name in &workload.topics {
                let arn = self.topic_arn(app, env, &workload.name, name);
                topics.push(Topic::new(&arn, app, env, &workload.name)?);
            }
        }
        Ok(topics)
    }
}

impl WorkspaceLister for Inventory {
    fn summary(&self) -> Result<WorkspaceSummary, BoxError> {
        let workspace = self.workspace()?;
        if workspace.application.is_empty() {
            return Err("workspace is not associated with an application".into());
        }
        Ok(WorkspaceSummary {
            application: workspace.application.clone(),
        })
    }

    fn list_services(&self) -> Listing<String> {
        Ok(self.workspace()?.services.clone())
    }

    fn list_jobs(&self) -> Listing<String> {
        Ok(self.workspace()?.jobs.clone())
    }

    fn list_environments(&self) -> Listing<String> {
        Ok(self.workspace()?.environments.clone())
    }

    fn list_pipelines(&self) -> Listing<PipelineManifest> {
        Ok(self.workspace()?.pipelines.clone())
    }
}

impl TaskDescriber for Inventory {
    fn list_active_app_env_tasks(
        &self,
        app: &str,
        env: &str,
        filter: &TaskFilter,
    ) -> Listing<Task> {
        Ok(self
            .environment(app, env)?
            .tasks
            .iter()
            .filter(|t| t.env.as_deref() == Some(env) && t.in_group(filter))
            .map(TaskEntry::to_task)
            .collect())
    }

    fn list_active_default_cluster_tasks(&self, filter: &TaskFilter) -> Listing<Task> {
        Ok(self
            .default_tasks
            .iter()
            .filter(|t| t.in_group(filter))
            .map(TaskEntry::to_task)
            .collect())
    }
}

impl TaskStackDescriber for Inventory {
    fn list_task_stacks(&self, app: &str, env: &str) -> Listing<TaskStack> {
        Ok(self
            .environment(app, env)?
            .task_stacks
            .iter()
            .filter(|s| s.env == env)
            .map(|s| TaskStack {
                task_name: s.task_name.clone(),
                stack_name: s.stack_name.clone(),
            })
            .collect())
    }

    fn list_default_task_stacks(&self) -> Listing<TaskStack> {
        Ok(self.default_task_stacks.clone())
    }
}

impl PipelineLister for Inventory {
    fn list_deployed_pipelines(&self, app: &str) -> Listing<Pipeline> {
        Ok(self.application(app)?.pipelines.clone())
    }
}

impl VpcLister for Inventory {
    fn list_vpcs(&self) -> Listing<Vpc> {
        Ok(self
            .vpcs
            .iter()
            .map(|v| Vpc {
                id: v.id.clone(),
                name: v.name.clone(),
            })
            .collect())
    }

    fn list_subnets(&self, vpc_id: &str, visibility: SubnetVisibility) -> Listing<Subnet> {
        let vpc = self.vpc(vpc_id)?;
        Ok(match visibility {
            SubnetVisibility::Public => vpc.public_subnets.clone(),
            SubnetVisibility::Private => vpc.private_subnets.clone(),
        })
    }
}
