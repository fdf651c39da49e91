//! # deploy-select
//!
//! Command-line front end for `deploy_selector`.
//!
//! ```text
//! inventory file ──> Inventory (listing ports)
//!                        │
//!   clap command ──> selector ──> Selection ──> stdout (text or JSON)
//!                        │            │
//!                   TermPicker      notice ──> log (stderr)
//! ```

use anyhow::{bail, Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use deploy_selector::{
    stage_prompt, AppEnvSelector, Ask, ConfigSelector, DeployOptions, DeploySelector,
    Ec2Selector, PipelineSelector, Selection, TaskOptions, TaskSelector, TaskStackSelector,
    TopicSelector, WorkspaceSelector,
};
use serde::Serialize;
use std::io;
use std::path::PathBuf;

mod flags;
mod inventory;
mod picker;
mod report;

use flags::{KindFlag, VisibilityFlag};
use inventory::{resolve_inventory_path, Inventory};
use picker::TermPicker;
use report::{plain_lines, Plain};

const ASK_APP: Ask<'static> = Ask {
    message: "Which application?",
    help: "An application groups environments and workloads.",
};
const ASK_ENV: Ask<'static> = Ask {
    message: "Which environment?",
    help: "",
};
const ASK_STAGE: Ask<'static> = Ask {
    message: "Which environment would you like to add to your pipeline?",
    help: "Environments are deployed in the order they are chosen.",
};
const ASK_SERVICE: Ask<'static> = Ask {
    message: "Which service?",
    help: "",
};
const ASK_JOB: Ask<'static> = Ask {
    message: "Which job?",
    help: "",
};
const ASK_WORKLOAD: Ask<'static> = Ask {
    message: "Which workload?",
    help: "",
};
const ASK_DEPLOYED: Ask<'static> = Ask {
    message: "Which deployed workload?",
    help: "Shown as name (environment).",
};
const ASK_TOPICS: Ask<'static> = Ask {
    message: "Which topics do you want to subscribe to?",
    help: "Only topics published in every environment are listed.",
};
const ASK_TASK: Ask<'static> = Ask {
    message: "Which running task?",
    help: "Shown as task id (task definition).",
};
const ASK_TASK_STACK: Ask<'static> = Ask {
    message: "Which task?",
    help: "",
};
const ASK_PIPELINE: Ask<'static> = Ask {
    message: "Which pipeline?",
    help: "",
};
const ASK_VPC: Ask<'static> = Ask {
    message: "Which VPC?",
    help: "",
};
const ASK_SUBNETS: Ask<'static> = Ask {
    message: "Which subnets?",
    help: "Select with space, confirm with enter.",
};

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "deploy-select")]
#[command(about = "Resolve which application, environment or workload you mean", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Inventory file (overrides DEPLOY_SELECT_INVENTORY)
    #[arg(long, global = true)]
    inventory: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Print results as JSON (implies --quiet)
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Select an application
    App,

    /// Select an environment of an application
    Env(EnvArgs),

    /// Choose environments one pipeline stage at a time
    Stages(AppArgs),

    /// Select a registered service
    Service(AppArgs),

    /// Select a registered job
    Job(AppArgs),

    /// Select a registered service or job
    Workload(AppArgs),

    /// Select among registered things present in the local workspace
    #[command(subcommand)]
    Local(LocalCommands),

    /// Select a workload deployed to an environment
    Deployed(DeployedArgs),

    /// Choose SNS topics published in every environment
    Topics(AppArgs),

    /// Select a running task
    Task(TaskArgs),

    /// Select a deployed one-off task
    #[command(name = "task-stack")]
    TaskStack(TaskScopeArgs),

    /// Select a deployed pipeline
    Pipeline(PipelineArgs),

    /// Select an existing VPC
    Vpc,

    /// Choose subnets of a VPC
    Subnets(SubnetArgs),
}

#[derive(Subcommand)]
enum LocalCommands {
    Service,
    Job,
    Workload,
    Env,
    Pipeline,
}

#[derive(Args)]
struct AppArgs {
    /// Application name; asked for when omitted
    #[arg(long)]
    app: Option<String>,
}

#[derive(Args)]
struct EnvArgs {
    #[command(flatten)]
    app: AppArgs,

    /// Extra option offered after the environments (repeatable), e.g. "[None]"
    #[arg(long = "extra")]
    extras: Vec<String>,
}

#[derive(Args)]
struct DeployedArgs {
    #[command(flatten)]
    app: AppArgs,

    #[arg(long, value_enum, default_value = "service")]
    kind: KindFlag,

    /// Pin the workload name
    #[arg(long)]
    name: Option<String>,

    /// Pin the environment
    #[arg(long)]
    env: Option<String>,

    /// Keep only workloads of this manifest type (repeatable)
    #[arg(long = "type")]
    types: Vec<String>,
}

#[derive(Args)]
struct TaskScopeArgs {
    #[arg(long)]
    app: Option<String>,

    #[arg(long)]
    env: Option<String>,

    /// Look in the default cluster instead of an application environment
    #[arg(long)]
    default: bool,
}

#[derive(Args)]
struct TaskArgs {
    #[command(flatten)]
    scope: TaskScopeArgs,

    /// Only tasks of this task group
    #[arg(long)]
    group: Option<String>,
}

#[derive(Args)]
struct PipelineArgs {
    #[command(flatten)]
    app: AppArgs,

    /// Only pipelines that still have a manifest in the workspace
    #[arg(long)]
    local: bool,
}

#[derive(Args)]
struct SubnetArgs {
    /// VPC id; asked for when omitted
    #[arg(long)]
    vpc: Option<String>,

    #[arg(long, value_enum, default_value = "public")]
    visibility: VisibilityFlag,
}

struct Session {
    inventory: Inventory,
    picker: TermPicker,
    json: bool,
}

impl Session {
    fn app_env(&self) -> AppEnvSelector<'_> {
        AppEnvSelector::new(&self.inventory, &self.inventory, &self.picker)
    }

    fn config(&self) -> ConfigSelector<'_> {
        ConfigSelector::new(
            &self.inventory,
            &self.inventory,
            &self.inventory,
            &self.picker,
        )
    }

    fn workspace(&self) -> WorkspaceSelector<'_> {
        WorkspaceSelector::new(
            &self.inventory,
            &self.inventory,
            &self.inventory,
            &self.picker,
        )
    }

    /// Uses the given application or asks for one.
    fn application(&self, args: AppArgs) -> Result<String> {
        match args.app {
            Some(app) => Ok(app),
            None => {
                let selected = self.app_env().application(ASK_APP)?;
                Ok(announce(selected).into_value())
            }
        }
    }

    fn emit<T: Serialize + Plain>(&self, selection: Selection<T>) -> Result<()> {
        let selection = announce(selection);
        if self.json {
            print_stdout(&serde_json::to_string_pretty(&selection)?)
        } else {
            print_stdout(&selection.value.plain())
        }
    }

    fn emit_list<T: Serialize + Plain>(&self, items: &[T]) -> Result<()> {
        if self.json {
            return print_stdout(&serde_json::to_string_pretty(items)?);
        }
        if items.is_empty() {
            log::info!("Nothing selected");
            return Ok(());
        }
        print_stdout(&plain_lines(items))
    }
}

fn announce<T>(selection: Selection<T>) -> Selection<T> {
    if let Some(notice) = selection.notice() {
        log::info!("{notice}");
    }
    selection
}

fn task_options(scope: TaskScopeArgs) -> Result<TaskOptions> {
    let mut opts = TaskOptions::new();
    match (scope.app, scope.env) {
        (Some(app), Some(env)) => opts = opts.with_app_env(app, env),
        (None, None) => {}
        _ => bail!("--app and --env must be given together"),
    }
    if scope.default {
        opts = opts.with_default_cluster();
    }
    Ok(opts)
}

fn deploy_options(args: &mut DeployedArgs) -> DeployOptions {
    let mut opts = DeployOptions::new();
    if let Some(name) = args.name.take() {
        opts = opts.with_name(name);
    }
    if let Some(env) = args.env.take() {
        opts = opts.with_env(env);
    }
    if !args.types.is_empty() {
        opts = opts.with_workload_types(std::mem::take(&mut args.types));
    }
    opts
}

pub fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stderr free of notices when the caller parses JSON from stdout
    if cli.json {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let path = resolve_inventory_path(cli.inventory.take());
    let inventory = Inventory::load(&path)?;
    let session = Session {
        inventory,
        picker: TermPicker::new(),
        json: cli.json,
    };

    run(&session, cli.command)
}

fn run(session: &Session, command: Commands) -> Result<()> {
    match command {
        Commands::App => session.emit(session.app_env().application(ASK_APP)?),
        Commands::Env(args) => {
            let app = session.application(args.app)?;
            let extras: Vec<&str> = args.extras.iter().map(String::as_str).collect();
            session.emit(session.app_env().environment(ASK_ENV, &app, &extras)?)
        }
        Commands::Stages(args) => {
            let app = session.application(args)?;
            let envs = session
                .app_env()
                .environments(ASK_STAGE, &app, stage_prompt)?;
            session.emit_list(&envs)
        }
        Commands::Service(args) => {
            let app = session.application(args)?;
            session.emit(session.config().service(ASK_SERVICE, &app)?)
        }
        Commands::Job(args) => {
            let app = session.application(args)?;
            session.emit(session.config().job(ASK_JOB, &app)?)
        }
        Commands::Workload(args) => {
            let app = session.application(args)?;
            session.emit(session.config().workload(ASK_WORKLOAD, &app)?)
        }
        Commands::Local(local) => run_local(session, local),
        Commands::Deployed(mut args) => {
            let opts = deploy_options(&mut args);
            let app = session.application(args.app)?;
            let kind = args.kind.as_domain();
            log::debug!("Looking up deployed {kind}s with {opts:?}");
            let selected = DeploySelector::new(
                &session.inventory,
                &session.inventory,
                &session.inventory,
                &session.picker,
            )
            .deployed_workload(kind, ASK_DEPLOYED, &app, &opts)?;
            session.emit(selected)
        }
        Commands::Topics(args) => {
            let app = session.application(args)?;
            let topics = TopicSelector::new(&session.inventory, &session.inventory, &session.picker)
                .topics(ASK_TOPICS, &app)?;
            session.emit_list(&topics)
        }
        Commands::Task(args) => {
            let opts = match args.group {
                Some(group) => task_options(args.scope)?.with_task_group(group),
                None => task_options(args.scope)?,
            };
            let selected =
                TaskSelector::new(&session.inventory, &session.picker).running_task(ASK_TASK, &opts)?;
            session.emit(selected)
        }
        Commands::TaskStack(scope) => {
            let opts = task_options(scope)?;
            let selected = TaskStackSelector::new(&session.inventory, &session.picker)
                .task_stack(ASK_TASK_STACK, &opts)?;
            session.emit(selected)
        }
        Commands::Pipeline(args) => {
            let app = session.application(args.app)?;
            let selector =
                PipelineSelector::new(&session.inventory, &session.inventory, &session.picker);
            let selected = if args.local {
                selector.deployed_workspace_pipeline(ASK_PIPELINE, &app)?
            } else {
                selector.deployed_pipeline(ASK_PIPELINE, &app)?
            };
            session.emit(selected)
        }
        Commands::Vpc => {
            let id = Ec2Selector::new(&session.inventory, &session.picker).vpc(ASK_VPC)?;
            session.emit_list(&[id])
        }
        Commands::Subnets(args) => {
            let ec2 = Ec2Selector::new(&session.inventory, &session.picker);
            let vpc = match args.vpc {
                Some(vpc) => vpc,
                None => ec2.vpc(ASK_VPC)?,
            };
            let subnets = match args.visibility {
                VisibilityFlag::Public => ec2.public_subnets(ASK_SUBNETS, &vpc),
                VisibilityFlag::Private => ec2.private_subnets(ASK_SUBNETS, &vpc),
            }
            .with_context(|| format!("Failed to choose subnets of {vpc}"))?;
            session.emit_list(&subnets)
        }
    }
}

fn run_local(session: &Session, command: LocalCommands) -> Result<()> {
    let workspace = session.workspace();
    match command {
        LocalCommands::Service => session.emit(workspace.service(ASK_SERVICE)?),
        LocalCommands::Job => session.emit(workspace.job(ASK_JOB)?),
        LocalCommands::Workload => session.emit(workspace.workload(ASK_WORKLOAD)?),
        LocalCommands::Env => session.emit(workspace.environment(ASK_ENV)?),
        LocalCommands::Pipeline => session.emit(workspace.pipeline(ASK_PIPELINE)?),
    }
}
