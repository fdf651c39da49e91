use crate::error::{Result, SelectError};
use crate::gate::{only_one_notice, Ask, AutoResolve, Selection};
use crate::ports::{AppLister, EnvLister, Picker, WorkloadLister};
use crate::types::{Workload, WorkloadKind};

/// Selects applications and environments from the configuration store.
pub struct AppEnvSelector<'a> {
    pub(crate) apps: &'a dyn AppLister,
    pub(crate) envs: &'a dyn EnvLister,
    pub(crate) picker: &'a dyn Picker,
}

impl<'a> AppEnvSelector<'a> {
    pub fn new(apps: &'a dyn AppLister, envs: &'a dyn EnvLister, picker: &'a dyn Picker) -> Self {
        Self { apps, envs, picker }
    }

    pub fn application(&self, ask: Ask<'_>) -> Result<Selection<String>> {
        let apps = self
            .apps
            .list_applications()
            .map_err(|err| SelectError::collaborator("list applications", err))?;
        log::debug!("found {} applications", apps.len());

        let selection = AutoResolve::new(self.picker, "application").resolve(
            ask,
            apps,
            String::clone,
            || SelectError::no_candidates("applications", None),
        )?;
        let notice = only_one_notice("application", &selection.value);
        Ok(selection.with_notice(notice))
    }

    /// Selects one environment of `app`.
    ///
    /// `extra_options` (e.g. `"[None]"`) are offered after the environments;
    /// when any are given the user is always asked.
    pub fn environment(
        &self,
        ask: Ask<'_>,
        app: &str,
        extra_options: &[&str],
    ) -> Result<Selection<String>> {
        let envs = self.list_environments(app)?;

        if extra_options.is_empty() {
            let selection = AutoResolve::new(self.picker, "environment").resolve(
                ask,
                envs,
                String::clone,
                || SelectError::no_candidates("environments", Some(format!("application {app}"))),
            )?;
            let notice = only_one_notice("environment", &selection.value);
            return Ok(selection.with_notice(notice));
        }

        let mut options = envs;
        options.extend(extra_options.iter().map(|o| o.to_string()));
        AutoResolve::new(self.picker, "environment")
            .prompt(ask, options, String::clone)
            .map(Selection::prompted)
    }

    pub(crate) fn list_environments(&self, app: &str) -> Result<Vec<String>> {
        self.envs.list_environments(app).map_err(|err| {
            SelectError::collaborator(format!("list environments for application {app}"), err)
        })
    }
}

/// Selects applications, environments and registered workloads.
pub struct ConfigSelector<'a> {
    app_env: AppEnvSelector<'a>,
    workloads: &'a dyn WorkloadLister,
}

impl<'a> ConfigSelector<'a> {
    pub fn new(
        apps: &'a dyn AppLister,
        envs: &'a dyn EnvLister,
        workloads: &'a dyn WorkloadLister,
        picker: &'a dyn Picker,
    ) -> Self {
        Self {
            app_env: AppEnvSelector::new(apps, envs, picker),
            workloads,
        }
    }

    pub fn app_env(&self) -> &AppEnvSelector<'a> {
        &self.app_env
    }

    pub fn service(&self, ask: Ask<'_>, app: &str) -> Result<Selection<String>> {
        self.workload_of(WorkloadKind::Service, ask, app)
    }

    pub fn job(&self, ask: Ask<'_>, app: &str) -> Result<Selection<String>> {
        self.workload_of(WorkloadKind::Job, ask, app)
    }

    pub fn workload(&self, ask: Ask<'_>, app: &str) -> Result<Selection<String>> {
        self.workload_of(WorkloadKind::Any, ask, app)
    }

    fn workload_of(&self, kind: WorkloadKind, ask: Ask<'_>, app: &str) -> Result<Selection<String>> {
        let names: Vec<String> = registered_workloads(self.workloads, kind, app)?
            .into_iter()
            .map(|w| w.name)
            .collect();

        let selection = AutoResolve::new(self.app_env.picker, kind.as_str()).resolve(
            ask,
            names,
            String::clone,
            || SelectError::NoWorkloads {
                kind,
                app: app.to_string(),
            },
        )?;
        let notice = only_one_notice(kind.as_str(), &selection.value);
        Ok(selection.with_notice(notice))
    }
}

/// Registered workloads of one kind
pub(crate) fn registered_workloads(
    lister: &dyn WorkloadLister,
    kind: WorkloadKind,
    app: &str,
) -> Result<Vec<Workload>> {
    let listed = match kind {
        WorkloadKind::Service => lister.list_services(app),
        WorkloadKind::Job => lister.list_jobs(app),
        WorkloadKind::Any => lister.list_workloads(app),
    };
    listed.map_err(|err| SelectError::collaborator(format!("list {kind}s"), err))
}
