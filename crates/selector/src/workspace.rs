use crate::app_env::registered_workloads;
use crate::error::{Result, SelectError};
use crate::gate::{only_one_notice, Ask, AutoResolve, Selection};
use crate::ports::{EnvLister, Picker, WorkloadLister, WorkspaceLister};
use crate::reconcile::reconcile;
use crate::types::{PipelineManifest, WorkloadKind};

/// Selects among things that are both registered and present in the local
/// workspace. Registration order wins; the workspace only filters.
pub struct WorkspaceSelector<'a> {
    workspace: &'a dyn WorkspaceLister,
    envs: &'a dyn EnvLister,
    workloads: &'a dyn WorkloadLister,
    picker: &'a dyn Picker,
}

impl<'a> WorkspaceSelector<'a> {
    pub fn new(
        workspace: &'a dyn WorkspaceLister,
        envs: &'a dyn EnvLister,
        workloads: &'a dyn WorkloadLister,
        picker: &'a dyn Picker,
    ) -> Self {
        Self {
            workspace,
            envs,
            workloads,
            picker,
        }
    }

    pub fn service(&self, ask: Ask<'_>) -> Result<Selection<String>> {
        self.workload_of(WorkloadKind::Service, ask)
    }

    pub fn job(&self, ask: Ask<'_>) -> Result<Selection<String>> {
        self.workload_of(WorkloadKind::Job, ask)
    }

    pub fn workload(&self, ask: Ask<'_>) -> Result<Selection<String>> {
        self.workload_of(WorkloadKind::Any, ask)
    }

    /// Environments registered in the application that also have a local manifest.
    pub fn environment(&self, ask: Ask<'_>) -> Result<Selection<String>> {
        let app = self.application()?;
        let registered = self.envs.list_environments(&app).map_err(|err| {
            SelectError::collaborator(format!("list environments for application {app}"), err)
        })?;
        let local = self
            .workspace
            .list_environments()
            .map_err(|err| SelectError::collaborator("list environments in workspace", err))?;
        let names = reconcile(&registered, &local, String::as_str);

        let selection = AutoResolve::new(self.picker, "environment").resolve(
            ask,
            names,
            String::clone,
            || SelectError::no_candidates("environments", Some(workspace_scope(&app))),
        )?;
        let notice = only_one_notice("environment", &selection.value);
        Ok(selection.with_notice(notice))
    }

    /// Pipeline manifests of the workspace.
    pub fn pipeline(&self, ask: Ask<'_>) -> Result<Selection<PipelineManifest>> {
        let manifests = self
            .workspace
            .list_pipelines()
            .map_err(|err| SelectError::collaborator("list pipelines in workspace", err))?;

        let selection = AutoResolve::new(self.picker, "pipeline").resolve(
            ask,
            manifests,
            |m| m.name.clone(),
            || SelectError::no_candidates("pipelines", Some("workspace".to_string())),
        )?;
        let notice = only_one_notice("pipeline", &selection.value.name);
        Ok(selection.with_notice(notice))
    }

    fn workload_of(&self, kind: WorkloadKind, ask: Ask<'_>) -> Result<Selection<String>> {
        let app = self.application()?;
        let registered = registered_workloads(self.workloads, kind, &app)?;
        let local = match kind {
            WorkloadKind::Service => self.workspace.list_services(),
            WorkloadKind::Job => self.workspace.list_jobs(),
            WorkloadKind::Any => self.workspace.list_workloads(),
        }
        .map_err(|err| SelectError::collaborator(format!("list {kind}s in workspace"), err))?;

        let names = reconcile(&registered, &local, |w| w.name.as_str());
        log::debug!(
            "{} of {} registered {kind}s are in the workspace",
            names.len(),
            registered.len()
        );

        let selection = AutoResolve::new(self.picker, kind.as_str()).resolve(
            ask,
            names,
            String::clone,
            || SelectError::no_candidates(format!("{kind}s"), Some(workspace_scope(&app))),
        )?;
        let notice = only_one_notice(kind.as_str(), &selection.value);
        Ok(selection.with_notice(notice))
    }

    fn application(&self) -> Result<String> {
        self.workspace
            .summary()
            .map(|summary| summary.application)
            .map_err(|err| SelectError::collaborator("read workspace summary", err))
    }
}

fn workspace_scope(app: &str) -> String {
    format!("workspace of application {app}")
}
