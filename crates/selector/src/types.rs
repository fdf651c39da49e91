use serde::{Deserialize, Serialize};
use std::fmt;

/// Which family of workloads a lookup is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadKind {
    Service,
    Job,
    /// Services and jobs together
    #[serde(alias = "workload")]
    Any,
}

impl WorkloadKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            WorkloadKind::Service => "service",
            WorkloadKind::Job => "job",
            WorkloadKind::Any => "workload",
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A workload registered in an application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    pub name: String,

    /// Manifest type, e.g. "Backend Service" or "Scheduled Job"
    #[serde(rename = "type")]
    pub workload_type: String,
}

impl Workload {
    pub fn new(name: impl Into<String>, workload_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            workload_type: workload_type.into(),
        }
    }
}

/// A workload known to be deployed to a specific environment.
///
/// Identity is `(name, env)`; the type is carried along for filters only.
#[derive(Debug, Clone, Serialize)]
pub struct DeployedWorkload {
    pub name: String,
    pub env: String,
    #[serde(rename = "type")]
    pub workload_type: String,
}

impl DeployedWorkload {
    pub fn new(
        name: impl Into<String>,
        env: impl Into<String>,
        workload_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            env: env.into(),
            workload_type: workload_type.into(),
        }
    }

    /// Label shown in the picker
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.env)
    }
}

impl PartialEq for DeployedWorkload {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.env == other.env
    }
}

impl Eq for DeployedWorkload {}

impl std::hash::Hash for DeployedWorkload {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.env.hash(state);
    }
}

impl fmt::Display for DeployedWorkload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.env)
    }
}

/// What the local workspace says about itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSummary {
    pub application: String,
}

/// A pipeline manifest found in the local workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineManifest {
    pub name: String,
    pub path: String,
}

/// A pipeline deployed for an application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Name as written in the manifest
    pub name: String,

    /// Physical name of the deployed pipeline resource
    pub resource_name: String,
}

/// A running task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub arn: String,
    pub task_definition_arn: String,
}

/// A deployed one-off task stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStack {
    pub task_name: String,
    pub stack_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vpc {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Vpc {
    pub fn label(&self) -> String {
        match self.name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => format!("{} ({})", self.id, name),
            None => self.id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cidr_block: Option<String>,
}

impl Subnet {
    pub fn label(&self) -> String {
        match self.name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => format!("{} ({})", self.id, name),
            None => self.id.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubnetVisibility {
    Public,
    Private,
}

impl SubnetVisibility {
    pub const fn as_str(self) -> &'static str {
        match self {
            SubnetVisibility::Public => "public",
            SubnetVisibility::Private => "private",
        }
    }
}
