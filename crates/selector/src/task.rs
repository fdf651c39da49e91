use crate::error::{Result, SelectError};
use crate::gate::{Ask, AutoResolve, Selection};
use crate::ports::{Picker, TaskDescriber, TaskFilter, TaskStackDescriber};
use crate::types::{Task, TaskStack};

const SHORT_TASK_ID_LEN: usize = 8;

/// Where to look for tasks: an application environment or the default cluster.
#[derive(Debug, Clone, Default)]
pub struct TaskOptions {
    app: Option<String>,
    env: Option<String>,
    default_cluster: bool,
    task_group: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskScope<'a> {
    AppEnv { app: &'a str, env: &'a str },
    DefaultCluster,
}

impl TaskScope<'_> {
    fn describe(&self) -> String {
        match self {
            TaskScope::AppEnv { app, env } => format!("environment {env} of application {app}"),
            TaskScope::DefaultCluster => "the default cluster".to_string(),
        }
    }
}

impl TaskOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app_env(mut self, app: impl Into<String>, env: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self.env = Some(env.into());
        self
    }

    pub fn with_default_cluster(mut self) -> Self {
        self.default_cluster = true;
        self
    }

    /// Restricts running tasks to one task group.
    pub fn with_task_group(mut self, group: impl Into<String>) -> Self {
        self.task_group = Some(group.into());
        self
    }

    fn scope(&self) -> Result<TaskScope<'_>> {
        match (self.default_cluster, self.app.as_deref(), self.env.as_deref()) {
            (true, None, None) => Ok(TaskScope::DefaultCluster),
            (true, _, _) => Err(SelectError::Misconfigured(
                "cannot use both the default cluster and an application environment".to_string(),
            )),
            (false, Some(app), Some(env)) => Ok(TaskScope::AppEnv { app, env }),
            (false, _, _) => Err(SelectError::Misconfigured(
                "either an application and environment or the default cluster is required"
                    .to_string(),
            )),
        }
    }

    fn filter(&self) -> TaskFilter {
        TaskFilter {
            task_group: self.task_group.clone(),
        }
    }
}

/// `"{short id} ({family}:{revision})"`
pub fn task_label(task: &Task) -> String {
    let id = task.arn.rsplit('/').next().unwrap_or(&task.arn);
    let short: String = id.chars().take(SHORT_TASK_ID_LEN).collect();
    let definition = task
        .task_definition_arn
        .rsplit('/')
        .next()
        .unwrap_or(&task.task_definition_arn);
    format!("{short} ({definition})")
}

pub struct TaskSelector<'a> {
    tasks: &'a dyn TaskDescriber,
    picker: &'a dyn Picker,
}

impl<'a> TaskSelector<'a> {
    pub fn new(tasks: &'a dyn TaskDescriber, picker: &'a dyn Picker) -> Self {
        Self { tasks, picker }
    }

    pub fn running_task(&self, ask: Ask<'_>, opts: &TaskOptions) -> Result<Selection<Task>> {
        let scope = opts.scope()?;
        let filter = opts.filter();
        let listed = match scope {
            TaskScope::AppEnv { app, env } => {
                self.tasks.list_active_app_env_tasks(app, env, &filter)
            }
            TaskScope::DefaultCluster => self.tasks.list_active_default_cluster_tasks(&filter),
        };
        let tasks = listed.map_err(|err| {
            SelectError::collaborator(format!("list running tasks in {}", scope.describe()), err)
        })?;

        let selection = AutoResolve::new(self.picker, "running task").resolve(
            ask,
            tasks,
            task_label,
            || SelectError::no_candidates("running tasks", Some(scope.describe())),
        )?;
        let notice = format!("Found only one running task: {}", task_label(&selection.value));
        Ok(selection.with_notice(notice))
    }
}

/// Selects deployed one-off task stacks.
pub struct TaskStackSelector<'a> {
    stacks: &'a dyn TaskStackDescriber,
    picker: &'a dyn Picker,
}

impl<'a> TaskStackSelector<'a> {
    pub fn new(stacks: &'a dyn TaskStackDescriber, picker: &'a dyn Picker) -> Self {
        Self { stacks, picker }
    }

    /// The task group filter of `opts` does not apply to stacks.
    pub fn task_stack(&self, ask: Ask<'_>, opts: &TaskOptions) -> Result<Selection<TaskStack>> {
        let scope = opts.scope()?;
        let listed = match scope {
            TaskScope::AppEnv { app, env } => self.stacks.list_task_stacks(app, env),
            TaskScope::DefaultCluster => self.stacks.list_default_task_stacks(),
        };
        let stacks = listed.map_err(|err| {
            SelectError::collaborator(format!("list task stacks in {}", scope.describe()), err)
        })?;

        let selection = AutoResolve::new(self.picker, "task").resolve(
            ask,
            stacks,
            |stack| stack.task_name.clone(),
            || SelectError::no_candidates("deployed tasks", Some(scope.describe())),
        )?;
        let notice = format!("Found only one deployed task: {}", selection.value.task_name);
        Ok(selection.with_notice(notice))
    }
}
