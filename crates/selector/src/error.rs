use crate::types::WorkloadKind;
use thiserror::Error;

/// Error type produced by collaborators (listers, deploy store, picker).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for selector operations
pub type Result<T> = std::result::Result<T, SelectError>;

/// Errors that can occur while resolving a selection
#[derive(Error, Debug)]
pub enum SelectError {
    /// A listing or point-check collaborator failed
    #[error("{action}: {source}")]
    Collaborator {
        action: String,
        #[source]
        source: BoxError,
    },

    /// Nothing to choose from
    #[error("no {noun} found{}", in_scope(.scope))]
    NoCandidates { noun: String, scope: Option<String> },

    /// The application has no workloads of the requested kind registered
    #[error("no {kind}s found in application {app}")]
    NoWorkloads { kind: WorkloadKind, app: String },

    /// Workloads exist, but none is deployed in the searched environments
    #[error("no deployed {kind}s found in application {app}")]
    NoDeployed { kind: WorkloadKind, app: String },

    /// Deployed workloads exist, but the filter chain rejected all of them
    #[error("no matching deployed {kind}s found in application {app}")]
    NoMatching { kind: WorkloadKind, app: String },

    /// A caller-supplied filter predicate failed
    #[error("{0}")]
    Filter(BoxError),

    /// The picker failed or the user aborted
    #[error("select {action}: {source}")]
    Prompt {
        action: String,
        #[source]
        source: BoxError,
    },

    /// The picker answered with a value that was never offered
    #[error("picker returned an option that was not offered: {0:?}")]
    UnknownChoice(String),

    /// Invalid combination of options
    #[error("invalid selection options: {0}")]
    Misconfigured(String),

    /// A topic ARN that cannot be interpreted
    #[error("invalid topic ARN {arn:?}: {reason}")]
    InvalidTopicArn { arn: String, reason: &'static str },
}

impl SelectError {
    pub(crate) fn collaborator(action: impl Into<String>, source: BoxError) -> Self {
        Self::Collaborator {
            action: action.into(),
            source,
        }
    }

    pub(crate) fn prompt(action: impl Into<String>, source: BoxError) -> Self {
        Self::Prompt {
            action: action.into(),
            source,
        }
    }

    pub(crate) fn no_candidates(noun: impl Into<String>, scope: Option<String>) -> Self {
        Self::NoCandidates {
            noun: noun.into(),
            scope,
        }
    }
}

fn in_scope(scope: &Option<String>) -> String {
    match scope {
        Some(scope) => format!(" in {scope}"),
        None => String::new(),
    }
}
