use crate::error::{Result, SelectError};
use crate::gate::Ask;
use crate::ports::{DeployStore, EnvLister, Picker, PromptConfig};
use crate::topic::Topic;
use std::collections::{HashMap, HashSet};

/// Offers the topics that exist in every environment of an application.
pub struct TopicSelector<'a> {
    envs: &'a dyn EnvLister,
    deploy: &'a dyn DeployStore,
    picker: &'a dyn Picker,
}

impl<'a> TopicSelector<'a> {
    pub fn new(envs: &'a dyn EnvLister, deploy: &'a dyn DeployStore, picker: &'a dyn Picker) -> Self {
        Self {
            envs,
            deploy,
            picker,
        }
    }

    /// Lets the user pick zero or more topics common to all environments.
    ///
    /// An application without environments, or without any topic common to
    /// all of them, yields an empty list rather than an error: nothing has
    /// been deployed everywhere yet.
    pub fn topics(&self, ask: Ask<'_>, app: &str) -> Result<Vec<Topic>> {
        let envs = self.envs.list_environments(app).map_err(|err| {
            SelectError::collaborator(format!("list environments for application {app}"), err)
        })?;
        if envs.is_empty() {
            log::debug!("application {app} has no environments; skipping topic selection");
            return Ok(Vec::new());
        }

        let mut per_env = Vec::with_capacity(envs.len());
        for env in &envs {
            let topics = self.deploy.list_sns_topics(app, env).map_err(|err| {
                SelectError::collaborator(format!("list SNS topics for environment {env}"), err)
            })?;
            per_env.push(topics);
        }

        let common = intersect_topics(per_env);
        if common.is_empty() {
            log::debug!("no topic of {app} is deployed in all {} environments", envs.len());
            return Ok(Vec::new());
        }

        let labels: Vec<String> = common.iter().map(Topic::canonical).collect();
        let chosen = self
            .picker
            .select_many(ask.message, ask.help, &labels, &PromptConfig::default())
            .map_err(|err| SelectError::prompt("topics", err))?;

        let offered: HashSet<String> = labels.iter().cloned().collect();
        let mut by_label: HashMap<String, Topic> = labels.into_iter().zip(common).collect();
        let mut picked = Vec::with_capacity(chosen.len());
        for label in chosen {
            match by_label.remove(&label) {
                Some(topic) => picked.push(topic),
                // Repeated answer
                None if offered.contains(&label) => {}
                None => return Err(SelectError::UnknownChoice(label)),
            }
        }
        Ok(picked)
    }
}

/// Topics present in every environment, matched by [`Topic::canonical`].
///
/// The first environment's topic values are kept. The result is ordered by
/// ARN, which groups topics by owning workload and then by name.
pub fn intersect_topics(per_env: Vec<Vec<Topic>>) -> Vec<Topic> {
    let mut envs = per_env.into_iter();
    let Some(first) = envs.next() else {
        return Vec::new();
    };

    let mut common: HashMap<String, Topic> =
        first.into_iter().map(|t| (t.canonical(), t)).collect();
    for topics in envs {
        let present: HashSet<String> = topics.iter().map(Topic::canonical).collect();
        common.retain(|key, _| present.contains(key));
    }

    let mut out: Vec<Topic> = common.into_values().collect();
    out.sort_by(|a, b| a.arn().cmp(b.arn()));
    out
}
