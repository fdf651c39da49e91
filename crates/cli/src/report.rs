use deploy_selector::{
    task_label, DeployedWorkload, Pipeline, PipelineManifest, Task, TaskStack, Topic,
};

/// One-line text rendering used when `--json` is off.
pub trait Plain {
    fn plain(&self) -> String;
}

impl Plain for String {
    fn plain(&self) -> String {
        self.clone()
    }
}

impl Plain for DeployedWorkload {
    fn plain(&self) -> String {
        format!("{}\t{}\t{}", self.name, self.env, self.workload_type)
    }
}

impl Plain for Topic {
    fn plain(&self) -> String {
        format!("{}\t{}", self.canonical(), self.arn())
    }
}

impl Plain for Task {
    fn plain(&self) -> String {
        format!("{}\t{}", task_label(self), self.arn)
    }
}

impl Plain for TaskStack {
    fn plain(&self) -> String {
        format!("{}\t{}", self.task_name, self.stack_name)
    }
}

impl Plain for Pipeline {
    fn plain(&self) -> String {
        format!("{}\t{}", self.name, self.resource_name)
    }
}

impl Plain for PipelineManifest {
    fn plain(&self) -> String {
        format!("{}\t{}", self.name, self.path)
    }
}

pub fn plain_lines<T: Plain>(items: &[T]) -> String {
    items.iter().map(Plain::plain).collect::<Vec<_>>().join("\n")
}
