#![allow(dead_code)]

use deploy_selector::ports::{
    AppLister, DeployStore, EnvLister, Listing, PipelineLister, TaskDescriber, TaskFilter,
    TaskStackDescriber, VpcLister, WorkloadLister, WorkspaceLister,
};
use deploy_selector::{
    BoxError, Picker, Pipeline, PipelineManifest, PromptConfig, Subnet, SubnetVisibility, Task,
    TaskStack, Topic, Vpc, Workload, WorkspaceSummary,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};

type Key = (String, String);

fn key(a: &str, b: &str) -> Key {
    (a.to_string(), b.to_string())
}

fn is_job(workload_type: &str) -> bool {
    workload_type.ends_with("Job")
}

/// In-memory stand-in for every listing collaborator.
#[derive(Default)]
pub struct FakeStore {
    apps: Vec<String>,
    envs: HashMap<String, Vec<String>>,
    workloads: HashMap<String, Vec<Workload>>,
    deployed: HashMap<Key, Vec<String>>,
    topics: HashMap<Key, Vec<Topic>>,
    tasks: HashMap<Key, Vec<Task>>,
    default_tasks: Vec<Task>,
    stacks: HashMap<Key, Vec<TaskStack>>,
    pipelines: HashMap<String, Vec<Pipeline>>,
    vpcs: Vec<Vpc>,
    subnets: HashMap<(String, SubnetVisibility), Vec<Subnet>>,
    workspace_app: Option<String>,
    workspace_workloads: Vec<String>,
    workspace_envs: Vec<String>,
    workspace_pipelines: Vec<PipelineManifest>,
    failing: HashSet<String>,
    calls: RefCell<Vec<String>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn app(mut self, app: &str) -> Self {
        self.apps.push(app.to_string());
        self.envs.entry(app.to_string()).or_default();
        self
    }

    pub fn env(mut self, app: &str, env: &str) -> Self {
        self.envs.entry(app.to_string()).or_default().push(env.to_string());
        self
    }

    pub fn workload(mut self, app: &str, name: &str, workload_type: &str) -> Self {
        self.workloads
            .entry(app.to_string())
            .or_default()
            .push(Workload::new(name, workload_type));
        self
    }

    pub fn service(self, app: &str, name: &str) -> Self {
        self.workload(app, name, "Backend Service")
    }

    pub fn job(self, app: &str, name: &str) -> Self {
        self.workload(app, name, "Scheduled Job")
    }

    pub fn deployed(mut self, app: &str, env: &str, name: &str) -> Self {
        self.deployed.entry(key(app, env)).or_default().push(name.to_string());
        self
    }

    pub fn topic(mut self, app: &str, env: &str, workload: &str, name: &str) -> Self {
        let arn = format!("arn:aws:sns:us-west-2:123456789012:{app}-{env}-{workload}-{name}");
        let topic = Topic::new(&arn, app, env, workload).expect("valid topic");
        self.topics.entry(key(app, env)).or_default().push(topic);
        self
    }

    pub fn task(mut self, app: &str, env: &str, id: &str, definition: &str) -> Self {
        self.tasks.entry(key(app, env)).or_default().push(task(id, definition));
        self
    }

    pub fn default_task(mut self, id: &str, definition: &str) -> Self {
        self.default_tasks.push(task(id, definition));
        self
    }

    pub fn task_stack(mut self, app: &str, env: &str, name: &str) -> Self {
        self.stacks.entry(key(app, env)).or_default().push(TaskStack {
            task_name: name.to_string(),
            stack_name: format!("task-{name}"),
        });
        self
    }

    pub fn pipeline(mut self, app: &str, name: &str) -> Self {
        self.pipelines.entry(app.to_string()).or_default().push(Pipeline {
            name: name.to_string(),
            resource_name: format!("pipeline-{app}-{name}"),
        });
        self
    }

    pub fn vpc(mut self, id: &str, name: Option<&str>) -> Self {
        self.vpcs.push(Vpc {
            id: id.to_string(),
            name: name.map(str::to_string),
        });
        self
    }

    pub fn subnet(mut self, vpc: &str, visibility: SubnetVisibility, id: &str) -> Self {
        self.subnets
            .entry((vpc.to_string(), visibility))
            .or_default()
            .push(Subnet {
                id: id.to_string(),
                name: None,
                cidr_block: None,
            });
        self
    }

    pub fn workspace(mut self, app: &str) -> Self {
        self.workspace_app = Some(app.to_string());
        self
    }

    pub fn local_workload(mut self, name: &str) -> Self {
        self.workspace_workloads.push(name.to_string());
        self
    }

    pub fn local_env(mut self, name: &str) -> Self {
        self.workspace_envs.push(name.to_string());
        self
    }

    pub fn local_pipeline(mut self, name: &str) -> Self {
        self.workspace_pipelines.push(PipelineManifest {
            name: name.to_string(),
            path: format!("copilot/pipelines/{name}/manifest.yml"),
        });
        self
    }

    /// Makes the named collaborator method return an error.
    pub fn failing(mut self, method: &str) -> Self {
        self.failing.insert(method.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn called(&self, method: &str) -> bool {
        self.calls.borrow().iter().any(|c| c == method)
    }

    fn enter(&self, method: &str) -> Result<(), BoxError> {
        self.calls.borrow_mut().push(method.to_string());
        if self.failing.contains(method) {
            return Err("some error".into());
        }
        Ok(())
    }

    fn workloads_where(&self, app: &str, keep: impl Fn(&Workload) -> bool) -> Vec<Workload> {
        self.workloads
            .get(app)
            .map(|all| all.iter().filter(|w| keep(w)).cloned().collect())
            .unwrap_or_default()
    }

    fn deployed_where(&self, app: &str, env: &str, jobs: bool) -> Vec<String> {
        let types: HashMap<&str, &str> = self
            .workloads
            .get(app)
            .map(|all| {
                all.iter()
                    .map(|w| (w.name.as_str(), w.workload_type.as_str()))
                    .collect()
            })
            .unwrap_or_default();
        self.deployed
            .get(&key(app, env))
            .map(|names| {
                names
                    .iter()
                    .filter(|n| types.get(n.as_str()).map(|t| is_job(t)).unwrap_or(false) == jobs)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn task(id: &str, definition: &str) -> Task {
    Task {
        arn: format!("arn:aws:ecs:us-west-2:123456789012:task/cluster/{id}"),
        task_definition_arn: format!(
            "arn:aws:ecs:us-west-2:123456789012:task-definition/{definition}"
        ),
    }
}

impl AppLister for FakeStore {
    fn list_applications(&self) -> Listing<String> {
        self.enter("list_applications")?;
        Ok(self.apps.clone())
    }
}

impl EnvLister for FakeStore {
    fn list_environments(&self, app: &str) -> Listing<String> {
        self.enter("list_environments")?;
        Ok(self.envs.get(app).cloned().unwrap_or_default())
    }
}

impl WorkloadLister for FakeStore {
    fn list_workloads(&self, app: &str) -> Listing<Workload> {
        self.enter("list_workloads")?;
        Ok(self.workloads_where(app, |_| true))
    }

    fn list_services(&self, app: &str) -> Listing<Workload> {
        self.enter("list_services")?;
        Ok(self.workloads_where(app, |w| !is_job(&w.workload_type)))
    }

    fn list_jobs(&self, app: &str) -> Listing<Workload> {
        self.enter("list_jobs")?;
        Ok(self.workloads_where(app, |w| is_job(&w.workload_type)))
    }
}

impl DeployStore for FakeStore {
    fn list_deployed_services(&self, app: &str, env: &str) -> Listing<String> {
        self.enter("list_deployed_services")?;
        Ok(self.deployed_where(app, env, false))
    }

    fn list_deployed_jobs(&self, app: &str, env: &str) -> Listing<String> {
        self.enter("list_deployed_jobs")?;
        Ok(self.deployed_where(app, env, true))
    }

    fn is_service_deployed(&self, app: &str, env: &str, name: &str) -> Result<bool, BoxError> {
        self.enter("is_service_deployed")?;
        Ok(self.deployed_where(app, env, false).iter().any(|n| n == name))
    }

    fn is_job_deployed(&self, app: &str, env: &str, name: &str) -> Result<bool, BoxError> {
        self.enter("is_job_deployed")?;
        Ok(self.deployed_where(app, env, true).iter().any(|n| n == name))
    }

    fn list_sns_topics(&self, app: &str, env: &str) -> Listing<Topic> {
        self.enter("list_sns_topics")?;
        Ok(self.topics.get(&key(app, env)).cloned().unwrap_or_default())
    }
}

impl WorkspaceLister for FakeStore {
    fn summary(&self) -> Result<WorkspaceSummary, BoxError> {
        self.enter("summary")?;
        self.workspace_app
            .clone()
            .map(|application| WorkspaceSummary { application })
            .ok_or_else(|| "not in a workspace".into())
    }

    fn list_services(&self) -> Listing<String> {
        self.enter("ws_list_services")?;
        Ok(self.local_of_kind(false))
    }

    fn list_jobs(&self) -> Listing<String> {
        self.enter("ws_list_jobs")?;
        Ok(self.local_of_kind(true))
    }

    fn list_environments(&self) -> Listing<String> {
        self.enter("ws_list_environments")?;
        Ok(self.workspace_envs.clone())
    }

    fn list_pipelines(&self) -> Listing<PipelineManifest> {
        self.enter("ws_list_pipelines")?;
        Ok(self.workspace_pipelines.clone())
    }
}

impl FakeStore {
    fn local_of_kind(&self, jobs: bool) -> Vec<String> {
        let job_names: HashSet<&str> = self
            .workloads
            .values()
            .flatten()
            .filter(|w| is_job(&w.workload_type))
            .map(|w| w.name.as_str())
            .collect();
        self.workspace_workloads
            .iter()
            .filter(|n| job_names.contains(n.as_str()) == jobs)
            .cloned()
            .collect()
    }
}

impl TaskDescriber for FakeStore {
    fn list_active_app_env_tasks(&self, app: &str, env: &str, filter: &TaskFilter) -> Listing<Task> {
        self.enter("list_active_app_env_tasks")?;
        let tasks = self.tasks.get(&key(app, env)).cloned().unwrap_or_default();
        Ok(match &filter.task_group {
            Some(group) => tasks
                .into_iter()
                .filter(|t| t.task_definition_arn.contains(group.as_str()))
                .collect(),
            None => tasks,
        })
    }

    fn list_active_default_cluster_tasks(&self, _filter: &TaskFilter) -> Listing<Task> {
        self.enter("list_active_default_cluster_tasks")?;
        Ok(self.default_tasks.clone())
    }
}

impl TaskStackDescriber for FakeStore {
    fn list_task_stacks(&self, app: &str, env: &str) -> Listing<TaskStack> {
        self.enter("list_task_stacks")?;
        Ok(self.stacks.get(&key(app, env)).cloned().unwrap_or_default())
    }

    fn list_default_task_stacks(&self) -> Listing<TaskStack> {
        self.enter("list_default_task_stacks")?;
        Ok(Vec::new())
    }
}

impl PipelineLister for FakeStore {
    fn list_deployed_pipelines(&self, app: &str) -> Listing<Pipeline> {
        self.enter("list_deployed_pipelines")?;
        Ok(self.pipelines.get(app).cloned().unwrap_or_default())
    }
}

impl VpcLister for FakeStore {
    fn list_vpcs(&self) -> Listing<Vpc> {
        self.enter("list_vpcs")?;
        Ok(self.vpcs.clone())
    }

    fn list_subnets(&self, vpc_id: &str, visibility: SubnetVisibility) -> Listing<Subnet> {
        self.enter("list_subnets")?;
        Ok(self
            .subnets
            .get(&(vpc_id.to_string(), visibility))
            .cloned()
            .unwrap_or_default())
    }
}

/// What the scripted picker answers next.
pub enum Answer {
    One(String),
    /// Whatever is offered first
    First,
    Many(Vec<String>),
    Fail,
}

impl Answer {
    pub fn one(value: &str) -> Self {
        Answer::One(value.to_string())
    }

    pub fn many(values: &[&str]) -> Self {
        Answer::Many(values.iter().map(|v| v.to_string()).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickerCall {
    pub message: String,
    pub options: Vec<String>,
    pub config: PromptConfig,
    pub multi: bool,
}

/// Picker that replays answers in order and records every call.
#[derive(Default)]
pub struct ScriptedPicker {
    answers: RefCell<VecDeque<Answer>>,
    calls: RefCell<Vec<PickerCall>>,
}

impl ScriptedPicker {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: RefCell::new(answers.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// A picker that must not be asked anything.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<PickerCall> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn record(&self, message: &str, options: &[String], config: &PromptConfig, multi: bool) {
        self.calls.borrow_mut().push(PickerCall {
            message: message.to_string(),
            options: options.to_vec(),
            config: config.clone(),
            multi,
        });
    }

    fn next(&self) -> Result<Answer, BoxError> {
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| "unexpected prompt".into())
    }
}

impl Picker for ScriptedPicker {
    fn select_one(
        &self,
        message: &str,
        _help: &str,
        options: &[String],
        config: &PromptConfig,
    ) -> Result<String, BoxError> {
        self.record(message, options, config, false);
        match self.next()? {
            Answer::One(value) => Ok(value),
            Answer::First => Ok(options[0].clone()),
            Answer::Many(_) => Err("multi-select answer for a single prompt".into()),
            Answer::Fail => Err("interrupted".into()),
        }
    }

    fn select_many(
        &self,
        message: &str,
        _help: &str,
        options: &[String],
        config: &PromptConfig,
    ) -> Result<Vec<String>, BoxError> {
        self.record(message, options, config, true);
        match self.next()? {
            Answer::Many(values) => Ok(values),
            Answer::One(value) => Ok(vec![value]),
            Answer::First => Ok(options.iter().take(1).cloned().collect()),
            Answer::Fail => Err("interrupted".into()),
        }
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
