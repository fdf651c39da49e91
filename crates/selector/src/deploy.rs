use crate::error::{BoxError, Result, SelectError};
use crate::gate::{Ask, AutoReason, AutoResolve, Selection};
use crate::ports::{DeployStore, EnvLister, Listing, Picker, WorkloadLister};
use crate::types::{DeployedWorkload, Workload, WorkloadKind};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Predicate over a deployed workload; an error aborts the whole resolution.
pub type WorkloadFilter = Box<dyn Fn(&DeployedWorkload) -> std::result::Result<bool, BoxError>>;

/// Pins and filters for a deployed-workload lookup.
///
/// Built once before the lookup and never changed during it.
#[derive(Default)]
pub struct DeployOptions {
    name: Option<String>,
    env: Option<String>,
    filters: Vec<WorkloadFilter>,
}

impl DeployOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only consider the workload with this name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Only look in this environment.
    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    /// Adds a predicate; all predicates must accept a candidate.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&DeployedWorkload) -> std::result::Result<bool, BoxError> + 'static,
    {
        self.filters.push(Box::new(filter));
        self
    }

    /// Keeps only workloads whose manifest type is one of `types`.
    pub fn with_workload_types<I, S>(self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let types: Vec<String> = types.into_iter().map(Into::into).collect();
        self.with_filter(move |w| Ok(types.iter().any(|t| *t == w.workload_type)))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn env(&self) -> Option<&str> {
        self.env.as_deref()
    }

    fn accepts(&self, candidate: &DeployedWorkload) -> Result<bool> {
        for filter in &self.filters {
            if !filter(candidate).map_err(SelectError::Filter)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl fmt::Debug for DeployOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployOptions")
            .field("name", &self.name)
            .field("env", &self.env)
            .field("filters", &self.filters.len())
            .finish()
    }
}

/// Collaborator calls for one workload kind
struct KindOps {
    registered: fn(&dyn WorkloadLister, &str) -> Listing<Workload>,
    deployed: fn(&dyn DeployStore, &str, &str) -> Listing<String>,
    is_deployed: fn(&dyn DeployStore, &str, &str, &str) -> std::result::Result<bool, BoxError>,
}

impl WorkloadKind {
    fn ops(self) -> KindOps {
        match self {
            WorkloadKind::Service => KindOps {
                registered: |lister, app| lister.list_services(app),
                deployed: |store, app, env| store.list_deployed_services(app, env),
                is_deployed: |store, app, env, name| store.is_service_deployed(app, env, name),
            },
            WorkloadKind::Job => KindOps {
                registered: |lister, app| lister.list_jobs(app),
                deployed: |store, app, env| store.list_deployed_jobs(app, env),
                is_deployed: |store, app, env, name| store.is_job_deployed(app, env, name),
            },
            WorkloadKind::Any => KindOps {
                registered: |lister, app| lister.list_workloads(app),
                deployed: |store, app, env| {
                    let mut names = store.list_deployed_services(app, env)?;
                    names.extend(store.list_deployed_jobs(app, env)?);
                    Ok(names)
                },
                is_deployed: |store, app, env, name| {
                    Ok(store.is_service_deployed(app, env, name)?
                        || store.is_job_deployed(app, env, name)?)
                },
            },
        }
    }
}

/// Locates workloads that are actually deployed, across environments.
pub struct DeploySelector<'a> {
    envs: &'a dyn EnvLister,
    workloads: &'a dyn WorkloadLister,
    deploy: &'a dyn DeployStore,
    picker: &'a dyn Picker,
}

impl<'a> DeploySelector<'a> {
    pub fn new(
        envs: &'a dyn EnvLister,
        workloads: &'a dyn WorkloadLister,
        deploy: &'a dyn DeployStore,
        picker: &'a dyn Picker,
    ) -> Self {
        Self {
            envs,
            workloads,
            deploy,
            picker,
        }
    }

    pub fn deployed_service(
        &self,
        ask: Ask<'_>,
        app: &str,
        opts: &DeployOptions,
    ) -> Result<Selection<DeployedWorkload>> {
        self.deployed_workload(WorkloadKind::Service, ask, app, opts)
    }

    pub fn deployed_job(
        &self,
        ask: Ask<'_>,
        app: &str,
        opts: &DeployOptions,
    ) -> Result<Selection<DeployedWorkload>> {
        self.deployed_workload(WorkloadKind::Job, ask, app, opts)
    }

    /// Finds one deployed `(workload, environment)` pair.
    ///
    /// With no pins every environment of `app` is searched. A pinned name is
    /// point-checked per environment instead of listed; environments where it
    /// is not deployed are skipped. Filters run on the full candidate set
    /// before the zero / one / many decision.
    pub fn deployed_workload(
        &self,
        kind: WorkloadKind,
        ask: Ask<'_>,
        app: &str,
        opts: &DeployOptions,
    ) -> Result<Selection<DeployedWorkload>> {
        let ops = kind.ops();

        let registered = (ops.registered)(self.workloads, app).map_err(|err| {
            SelectError::collaborator(format!("list {kind}s for application {app}"), err)
        })?;
        if registered.is_empty() {
            return Err(SelectError::NoWorkloads {
                kind,
                app: app.to_string(),
            });
        }
        let types: HashMap<String, String> = registered
            .into_iter()
            .map(|w| (w.name, w.workload_type))
            .collect();

        let envs = match opts.env() {
            Some(env) => vec![env.to_string()],
            None => self.envs.list_environments(app).map_err(|err| {
                SelectError::collaborator(format!("list environments for application {app}"), err)
            })?,
        };

        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut candidates: Vec<DeployedWorkload> = Vec::new();
        for env in &envs {
            let names = match opts.name() {
                Some(name) => {
                    let deployed = (ops.is_deployed)(self.deploy, app, env, name).map_err(|err| {
                        SelectError::collaborator(
                            format!("check if {kind} {name} is deployed in environment {env}"),
                            err,
                        )
                    })?;
                    if !deployed {
                        continue;
                    }
                    vec![name.to_string()]
                }
                None => (ops.deployed)(self.deploy, app, env).map_err(|err| {
                    SelectError::collaborator(
                        format!("list deployed {kind}s for environment {env}"),
                        err,
                    )
                })?,
            };
            for name in names {
                if seen.insert((name.clone(), env.clone())) {
                    let workload_type = types.get(&name).cloned().unwrap_or_default();
                    candidates.push(DeployedWorkload::new(name, env.as_str(), workload_type));
                }
            }
        }
        log::debug!(
            "{} deployed {kind} candidates across {} environments",
            candidates.len(),
            envs.len()
        );
        if candidates.is_empty() {
            return Err(SelectError::NoDeployed {
                kind,
                app: app.to_string(),
            });
        }

        let mut matching = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if opts.accepts(&candidate)? {
                matching.push(candidate);
            }
        }
        if matching.is_empty() {
            return Err(SelectError::NoMatching {
                kind,
                app: app.to_string(),
            });
        }

        if matching.len() == 1 {
            let only = matching.remove(0);
            let (reason, notice) = auto_notice(kind, &only, opts);
            return Ok(Selection::auto(only, reason, notice));
        }

        matching.sort_by_key(DeployedWorkload::label);
        AutoResolve::new(self.picker, format!("deployed {kind} for application {app}"))
            .prompt(ask, matching, DeployedWorkload::label)
            .map(Selection::prompted)
    }
}

/// Wording depends on which pins narrowed the search down.
fn auto_notice(
    kind: WorkloadKind,
    only: &DeployedWorkload,
    opts: &DeployOptions,
) -> (AutoReason, Option<String>) {
    match (opts.name().is_some(), opts.env().is_some()) {
        (true, true) => (AutoReason::FullyPinned, None),
        (true, false) => (
            AutoReason::OnlyEnvironmentForName,
            Some(format!("{} found only in environment {}", only.name, only.env)),
        ),
        (false, true) => (
            AutoReason::OnlyWorkloadInEnvironment,
            Some(format!(
                "Only the {kind} {} is found in environment {}",
                only.name, only.env
            )),
        ),
        (false, false) => (
            AutoReason::SoleCandidate,
            Some(format!(
                "Found only one deployed {kind} {} in environment {}",
                only.name, only.env
            )),
        ),
    }
}
