use crate::error::{Result, SelectError};
use serde::Serialize;
use std::fmt;

const SNS_SERVICE: &str = "sns";

/// An SNS topic published by a workload in one environment.
///
/// The same logical topic has a different ARN in every environment, so
/// cross-environment matching goes through [`Topic::canonical`], which
/// leaves the environment out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    arn: String,
    app: String,
    env: String,
    workload: String,
    name: String,
}

impl Topic {
    /// Builds a topic from its ARN and the workload that owns it.
    ///
    /// The topic name is the ARN resource with the `{app}-{env}-{workload}-`
    /// prefix stripped.
    pub fn new(arn: &str, app: &str, env: &str, workload: &str) -> Result<Self> {
        let invalid = |reason| SelectError::InvalidTopicArn {
            arn: arn.to_string(),
            reason,
        };

        let parts: Vec<&str> = arn.splitn(6, ':').collect();
        if parts.len() != 6 || parts[0] != "arn" {
            return Err(invalid("not an ARN"));
        }
        if parts[2] != SNS_SERVICE {
            return Err(invalid("not an SNS topic"));
        }
        let resource = parts[5];
        if resource.is_empty() {
            return Err(invalid("missing topic resource"));
        }
        let prefix = format!("{app}-{env}-{workload}-");
        let name = match resource.strip_prefix(&prefix) {
            Some(name) if !name.is_empty() => name,
            _ => return Err(invalid("resource does not belong to the workload")),
        };

        Ok(Self {
            arn: arn.to_string(),
            app: app.to_string(),
            env: env.to_string(),
            workload: workload.to_string(),
            name: name.to_string(),
        })
    }

    pub fn arn(&self) -> &str {
        &self.arn
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn workload(&self) -> &str {
        &self.workload
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Environment-independent identity, `"{name} ({workload})"`
    pub fn canonical(&self) -> String {
        format!("{} ({})", self.name, self.workload)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.workload)
    }
}
