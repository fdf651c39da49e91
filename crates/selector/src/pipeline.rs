use crate::error::{Result, SelectError};
use crate::gate::{Ask, AutoResolve, Selection};
use crate::ports::{Picker, PipelineLister, WorkspaceLister};
use crate::reconcile::reconcile_items;
use crate::types::Pipeline;

pub struct PipelineSelector<'a> {
    pipelines: &'a dyn PipelineLister,
    workspace: &'a dyn WorkspaceLister,
    picker: &'a dyn Picker,
}

impl<'a> PipelineSelector<'a> {
    pub fn new(
        pipelines: &'a dyn PipelineLister,
        workspace: &'a dyn WorkspaceLister,
        picker: &'a dyn Picker,
    ) -> Self {
        Self {
            pipelines,
            workspace,
            picker,
        }
    }

    pub fn deployed_pipeline(&self, ask: Ask<'_>, app: &str) -> Result<Selection<Pipeline>> {
        let deployed = self.list_deployed(app)?;
        self.choose(ask, app, deployed)
    }

    /// Deployed pipelines that still have a manifest in the workspace.
    pub fn deployed_workspace_pipeline(
        &self,
        ask: Ask<'_>,
        app: &str,
    ) -> Result<Selection<Pipeline>> {
        let deployed = self.list_deployed(app)?;
        let local: Vec<String> = self
            .workspace
            .list_pipelines()
            .map_err(|err| SelectError::collaborator("list pipelines in workspace", err))?
            .into_iter()
            .map(|m| m.name)
            .collect();
        let kept = reconcile_items(deployed, &local, |p| p.name.as_str());
        self.choose(ask, app, kept)
    }

    fn list_deployed(&self, app: &str) -> Result<Vec<Pipeline>> {
        self.pipelines.list_deployed_pipelines(app).map_err(|err| {
            SelectError::collaborator(format!("list deployed pipelines for application {app}"), err)
        })
    }

    fn choose(&self, ask: Ask<'_>, app: &str, pipelines: Vec<Pipeline>) -> Result<Selection<Pipeline>> {
        let selection = AutoResolve::new(self.picker, "pipeline").resolve(
            ask,
            pipelines,
            |p| p.name.clone(),
            || {
                SelectError::no_candidates(
                    "deployed pipelines",
                    Some(format!("application {app}")),
                )
            },
        )?;
        let notice = format!("Found only one deployed pipeline: {}", selection.value.name);
        Ok(selection.with_notice(notice))
    }
}
