use deploy_selector::{
    AppEnvSelector, Ask, AutoReason, ConfigSelector, Decision, Ec2Selector, PipelineSelector,
    SelectError, SubnetVisibility, TaskOptions, TaskSelector, TaskStackSelector,
    WorkspaceSelector,
};
use pretty_assertions::assert_eq;
use support::{strings, Answer, FakeStore, ScriptedPicker};

mod support;

const ASK: Ask<'static> = Ask {
    message: "Select one",
    help: "",
};

#[test]
fn single_application_is_auto_selected() {
    let store = FakeStore::new().app("mockApp");
    let picker = ScriptedPicker::silent();

    let selected = AppEnvSelector::new(&store, &store, &picker)
        .application(ASK)
        .unwrap();

    assert_eq!(selected.value, "mockApp");
    assert_eq!(
        selected.decision,
        Decision::Auto {
            reason: AutoReason::SoleCandidate,
            notice: Some("Only found one application, defaulting to: mockApp".to_string()),
        }
    );
}

#[test]
fn no_applications_errors_before_prompting() {
    let store = FakeStore::new();
    let picker = ScriptedPicker::silent();

    let err = AppEnvSelector::new(&store, &store, &picker)
        .application(ASK)
        .unwrap_err();

    assert_eq!(err.to_string(), "no applications found");
    assert_eq!(picker.call_count(), 0);
}

#[test]
fn several_applications_prompt() {
    let store = FakeStore::new().app("a").app("b");
    let picker = ScriptedPicker::new(vec![Answer::one("b")]);

    let selected = AppEnvSelector::new(&store, &store, &picker)
        .application(ASK)
        .unwrap();

    assert_eq!(selected.value, "b");
    assert_eq!(selected.decision, Decision::Prompted);
}

#[test]
fn extra_environment_options_force_a_prompt() {
    let store = FakeStore::new().app("mockApp").env("mockApp", "test");
    let picker = ScriptedPicker::new(vec![Answer::one("[None]")]);

    let selected = AppEnvSelector::new(&store, &store, &picker)
        .environment(ASK, "mockApp", &["[None]"])
        .unwrap();

    assert_eq!(selected.value, "[None]");
    assert_eq!(picker.calls()[0].options, strings(&["test", "[None]"]));
}

#[test]
fn single_environment_is_auto_selected() {
    let store = FakeStore::new().app("mockApp").env("mockApp", "test");
    let picker = ScriptedPicker::silent();

    let selected = AppEnvSelector::new(&store, &store, &picker)
        .environment(ASK, "mockApp", &[])
        .unwrap();

    assert_eq!(selected.value, "test");
    assert_eq!(
        selected.notice(),
        Some("Only found one environment, defaulting to: test")
    );
}

#[test]
fn registered_service_selection() {
    let store = FakeStore::new()
        .app("mockApp")
        .service("mockApp", "api")
        .job("mockApp", "report");
    let picker = ScriptedPicker::silent();
    let selector = ConfigSelector::new(&store, &store, &store, &picker);

    assert_eq!(selector.service(ASK, "mockApp").unwrap().value, "api");
    assert_eq!(selector.job(ASK, "mockApp").unwrap().value, "report");

    let picker = ScriptedPicker::new(vec![Answer::one("report")]);
    let selector = ConfigSelector::new(&store, &store, &store, &picker);
    assert_eq!(selector.workload(ASK, "mockApp").unwrap().value, "report");
    assert_eq!(picker.calls()[0].options, strings(&["api", "report"]));
    assert_eq!(
        selector.app_env().application(ASK).unwrap().value,
        "mockApp"
    );
}

#[test]
fn registered_jobs_missing() {
    let store = FakeStore::new().app("mockApp").service("mockApp", "api");
    let picker = ScriptedPicker::silent();

    let err = ConfigSelector::new(&store, &store, &store, &picker)
        .job(ASK, "mockApp")
        .unwrap_err();

    assert_eq!(err.to_string(), "no jobs found in application mockApp");
}

#[test]
fn workspace_services_follow_registration_order() {
    let store = FakeStore::new()
        .app("mockApp")
        .service("mockApp", "web")
        .service("mockApp", "api")
        .service("mockApp", "legacy")
        .workspace("mockApp")
        .local_workload("api")
        .local_workload("web")
        .local_workload("unregistered");
    let picker = ScriptedPicker::new(vec![Answer::one("api")]);

    let selected = WorkspaceSelector::new(&store, &store, &store, &picker)
        .service(ASK)
        .unwrap();

    assert_eq!(selected.value, "api");
    assert_eq!(picker.calls()[0].options, strings(&["web", "api"]));
}

#[test]
fn workspace_without_registered_services() {
    let store = FakeStore::new()
        .app("mockApp")
        .service("mockApp", "web")
        .workspace("mockApp")
        .local_workload("api");
    let picker = ScriptedPicker::silent();

    let err = WorkspaceSelector::new(&store, &store, &store, &picker)
        .service(ASK)
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "no services found in workspace of application mockApp"
    );
}

#[test]
fn workspace_summary_failure_is_wrapped() {
    let store = FakeStore::new().app("mockApp").failing("summary");
    let picker = ScriptedPicker::silent();

    let err = WorkspaceSelector::new(&store, &store, &store, &picker)
        .job(ASK)
        .unwrap_err();

    assert_eq!(err.to_string(), "read workspace summary: some error");
}

#[test]
fn workspace_environments_are_reconciled() {
    let store = FakeStore::new()
        .app("mockApp")
        .env("mockApp", "test")
        .env("mockApp", "prod")
        .workspace("mockApp")
        .local_env("prod");
    let picker = ScriptedPicker::silent();

    let selected = WorkspaceSelector::new(&store, &store, &store, &picker)
        .environment(ASK)
        .unwrap();

    assert_eq!(selected.value, "prod");
    assert!(selected.is_auto());
}

#[test]
fn workspace_pipeline_manifests() {
    let store = FakeStore::new()
        .workspace("mockApp")
        .local_pipeline("release")
        .local_pipeline("hotfix");
    let picker = ScriptedPicker::new(vec![Answer::one("hotfix")]);

    let selected = WorkspaceSelector::new(&store, &store, &store, &picker)
        .pipeline(ASK)
        .unwrap();

    assert_eq!(selected.value.name, "hotfix");
    assert_eq!(selected.value.path, "copilot/pipelines/hotfix/manifest.yml");
}

#[test]
fn deployed_pipelines() {
    let store = FakeStore::new()
        .pipeline("mockApp", "release")
        .pipeline("mockApp", "hotfix")
        .workspace("mockApp")
        .local_pipeline("hotfix");
    let picker = ScriptedPicker::silent();
    let selector = PipelineSelector::new(&store, &store, &picker);

    let selected = selector.deployed_workspace_pipeline(ASK, "mockApp").unwrap();
    assert_eq!(selected.value.name, "hotfix");
    assert_eq!(selected.value.resource_name, "pipeline-mockApp-hotfix");
    assert_eq!(
        selected.notice(),
        Some("Found only one deployed pipeline: hotfix")
    );

    let err = selector.deployed_pipeline(ASK, "otherApp").unwrap_err();
    assert_eq!(
        err.to_string(),
        "no deployed pipelines found in application otherApp"
    );
}

#[test]
fn running_task_requires_exactly_one_scope() {
    let store = FakeStore::new();
    let picker = ScriptedPicker::silent();
    let selector = TaskSelector::new(&store, &picker);

    let both = TaskOptions::new()
        .with_app_env("mockApp", "test")
        .with_default_cluster();
    let err = selector.running_task(ASK, &both).unwrap_err();
    assert!(matches!(err, SelectError::Misconfigured(_)));

    let err = selector.running_task(ASK, &TaskOptions::new()).unwrap_err();
    assert!(matches!(err, SelectError::Misconfigured(_)));

    assert!(store.calls().is_empty(), "no collaborator call on misuse");
}

#[test]
fn running_tasks_are_labelled_by_short_id_and_definition() {
    let store = FakeStore::new()
        .task("mockApp", "test", "4082490ee6c245e09d2145010aa1ba8d", "mockApp-test-api:3")
        .task("mockApp", "test", "0aa1ba8d4082490ee6c245e09d214501", "mockApp-test-api:4");
    let picker = ScriptedPicker::new(vec![Answer::one("0aa1ba8d (mockApp-test-api:4)")]);

    let selected = TaskSelector::new(&store, &picker)
        .running_task(ASK, &TaskOptions::new().with_app_env("mockApp", "test"))
        .unwrap();

    assert!(selected.value.arn.ends_with("0aa1ba8d4082490ee6c245e09d214501"));
    assert_eq!(
        picker.calls()[0].options,
        strings(&[
            "4082490e (mockApp-test-api:3)",
            "0aa1ba8d (mockApp-test-api:4)"
        ])
    );
}

#[test]
fn single_default_cluster_task_is_auto_selected() {
    let store = FakeStore::new().default_task("abcdef0123456789", "one-off:1");
    let picker = ScriptedPicker::silent();

    let selected = TaskSelector::new(&store, &picker)
        .running_task(ASK, &TaskOptions::new().with_default_cluster())
        .unwrap();

    assert_eq!(
        selected.notice(),
        Some("Found only one running task: abcdef01 (one-off:1)")
    );
}

#[test]
fn no_running_tasks() {
    let store = FakeStore::new().task("mockApp", "test", "abcdef0123456789", "api:1");
    let picker = ScriptedPicker::silent();

    let err = TaskSelector::new(&store, &picker)
        .running_task(
            ASK,
            &TaskOptions::new()
                .with_app_env("mockApp", "test")
                .with_task_group("worker"),
        )
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "no running tasks found in environment test of application mockApp"
    );
}

#[test]
fn task_stacks() {
    let store = FakeStore::new()
        .task_stack("mockApp", "test", "db-migrate")
        .task_stack("mockApp", "test", "backfill");
    let picker = ScriptedPicker::new(vec![Answer::one("backfill")]);
    let selector = TaskStackSelector::new(&store, &picker);

    let selected = selector
        .task_stack(ASK, &TaskOptions::new().with_app_env("mockApp", "test"))
        .unwrap();
    assert_eq!(selected.value.stack_name, "task-backfill");

    let err = selector
        .task_stack(ASK, &TaskOptions::new().with_default_cluster())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "no deployed tasks found in the default cluster"
    );
}

#[test]
fn vpc_and_subnets() {
    let store = FakeStore::new()
        .vpc("vpc-1", Some("main"))
        .subnet("vpc-1", SubnetVisibility::Public, "subnet-a")
        .subnet("vpc-1", SubnetVisibility::Public, "subnet-b");
    let picker = ScriptedPicker::new(vec![
        Answer::one("vpc-1 (main)"),
        Answer::many(&["subnet-b", "subnet-a", "subnet-b"]),
    ]);
    let selector = Ec2Selector::new(&store, &picker);

    assert_eq!(selector.vpc(ASK).unwrap(), "vpc-1");
    assert_eq!(
        selector.public_subnets(ASK, "vpc-1").unwrap(),
        strings(&["subnet-b", "subnet-a"])
    );

    let err = selector.private_subnets(ASK, "vpc-1").unwrap_err();
    assert_eq!(
        err.to_string(),
        "no existing private subnets found in VPC vpc-1"
    );
}
