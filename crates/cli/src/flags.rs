use clap::ValueEnum;
use deploy_selector::WorkloadKind;

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum KindFlag {
    Service,
    Job,
    Workload,
}

impl KindFlag {
    pub(crate) const fn as_domain(self) -> WorkloadKind {
        match self {
            KindFlag::Service => WorkloadKind::Service,
            KindFlag::Job => WorkloadKind::Job,
            KindFlag::Workload => WorkloadKind::Any,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum VisibilityFlag {
    Public,
    Private,
}
