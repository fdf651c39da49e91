use crate::app_env::AppEnvSelector;
use crate::error::{Result, SelectError};
use crate::gate::Ask;
use crate::ports::PromptConfig;
use std::collections::HashSet;

/// Early-exit option offered alongside the remaining environments
pub const NO_MORE_ENVIRONMENTS: &str = "[No additional environments]";

impl AppEnvSelector<'_> {
    /// Asks for an ordered sequence of distinct environments, e.g. the
    /// stages of a pipeline.
    ///
    /// Every step offers the environments not picked yet plus
    /// [`NO_MORE_ENVIRONMENTS`]. The loop ends when the sentinel is chosen
    /// or when every environment has been picked. `step_config` receives the
    /// 1-based step number.
    pub fn environments<F>(&self, ask: Ask<'_>, app: &str, step_config: F) -> Result<Vec<String>>
    where
        F: Fn(usize) -> PromptConfig,
    {
        let envs = self.list_environments(app)?;
        if envs.is_empty() {
            return Err(SelectError::no_candidates(
                "environments",
                Some(format!("application {app}")),
            ));
        }

        let mut picked: Vec<String> = Vec::with_capacity(envs.len());
        let mut used: HashSet<String> = HashSet::new();
        for step in 1..=envs.len() {
            let mut available: Vec<String> = envs
                .iter()
                .filter(|env| !used.contains(env.as_str()))
                .cloned()
                .collect();
            if available.is_empty() {
                break;
            }
            available.push(NO_MORE_ENVIRONMENTS.to_string());

            let choice = self
                .picker
                .select_one(ask.message, ask.help, &available, &step_config(step))
                .map_err(|err| SelectError::prompt("environments", err))?;
            if choice == NO_MORE_ENVIRONMENTS {
                break;
            }
            if !available.contains(&choice) {
                return Err(SelectError::UnknownChoice(choice));
            }
            log::debug!("step {step}: picked environment {choice}");
            used.insert(choice.clone());
            picked.push(choice);
        }
        Ok(picked)
    }
}

/// Prompt configuration labelling step `n` as "1st stage", "2nd stage", ...
pub fn stage_prompt(step: usize) -> PromptConfig {
    PromptConfig::with_final_message(format!("{} stage", ordinal(step)))
}

pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
