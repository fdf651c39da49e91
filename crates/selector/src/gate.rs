use crate::error::{Result, SelectError};
use crate::ports::{Picker, PromptConfig};
use serde::Serialize;

/// Why a value was chosen without asking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoReason {
    /// Exactly one candidate existed
    SoleCandidate,
    /// Name and environment were both pinned by the caller
    FullyPinned,
    /// Name was pinned and only one environment has it deployed
    OnlyEnvironmentForName,
    /// Environment was pinned and holds only one deployed workload
    OnlyWorkloadInEnvironment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Prompted,
    Auto {
        reason: AutoReason,
        /// Informational text for the caller to show, if any
        notice: Option<String>,
    },
}

/// A resolved value plus how it was resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection<T> {
    pub value: T,
    pub decision: Decision,
}

impl<T> Selection<T> {
    pub fn prompted(value: T) -> Self {
        Self {
            value,
            decision: Decision::Prompted,
        }
    }

    pub fn auto(value: T, reason: AutoReason, notice: Option<String>) -> Self {
        Self {
            value,
            decision: Decision::Auto { reason, notice },
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self.decision, Decision::Auto { .. })
    }

    pub fn notice(&self) -> Option<&str> {
        match &self.decision {
            Decision::Auto { notice, .. } => notice.as_deref(),
            Decision::Prompted => None,
        }
    }

    /// Replaces the notice of an automatic decision; prompted selections are unchanged.
    pub fn with_notice(mut self, text: String) -> Self {
        if let Decision::Auto { notice, .. } = &mut self.decision {
            *notice = Some(text);
        }
        self
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Standard notice for a single-candidate short-circuit
pub fn only_one_notice(noun: &str, value: &str) -> String {
    format!("Only found one {noun}, defaulting to: {value}")
}

/// Prompt wording for one resolution call
#[derive(Debug, Clone, Copy)]
pub struct Ask<'a> {
    pub message: &'a str,
    pub help: &'a str,
}

impl<'a> Ask<'a> {
    pub fn new(message: &'a str, help: &'a str) -> Self {
        Self { message, help }
    }
}

/// Zero / one / many policy shared by every single-value resolver.
///
/// * no candidates: `empty()` is returned as the error, the picker is not touched
/// * one candidate: returned as [`Decision::Auto`] with [`AutoReason::SoleCandidate`]
/// * otherwise: the picker chooses among `label(candidate)` values
pub struct AutoResolve<'a> {
    picker: &'a dyn Picker,
    /// Used in "select {action}: ..." errors
    action: String,
}

impl<'a> AutoResolve<'a> {
    pub fn new(picker: &'a dyn Picker, action: impl Into<String>) -> Self {
        Self {
            picker,
            action: action.into(),
        }
    }

    pub fn resolve<T, L, E>(
        &self,
        ask: Ask<'_>,
        candidates: Vec<T>,
        label: L,
        empty: E,
    ) -> Result<Selection<T>>
    where
        L: Fn(&T) -> String,
        E: FnOnce() -> SelectError,
    {
        let mut candidates = candidates;
        match candidates.len() {
            0 => Err(empty()),
            1 => {
                let only = candidates.remove(0);
                Ok(Selection::auto(only, AutoReason::SoleCandidate, None))
            }
            _ => self.prompt(ask, candidates, label).map(Selection::prompted),
        }
    }

    /// Always asks, whatever the number of candidates.
    pub fn prompt<T, L>(&self, ask: Ask<'_>, candidates: Vec<T>, label: L) -> Result<T>
    where
        L: Fn(&T) -> String,
    {
        let labels: Vec<String> = candidates.iter().map(&label).collect();
        log::debug!("prompting for {} among {} options", self.action, labels.len());
        let choice = self
            .picker
            .select_one(ask.message, ask.help, &labels, &PromptConfig::default())
            .map_err(|err| SelectError::prompt(self.action.clone(), err))?;
        candidates
            .into_iter()
            .zip(labels)
            .find(|(_, l)| *l == choice)
            .map(|(candidate, _)| candidate)
            .ok_or(SelectError::UnknownChoice(choice))
    }
}
