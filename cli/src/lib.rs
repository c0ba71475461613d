//! `governor` command-line front end: a thin harness over `governor_core`
//! for driving the pipeline outside of a live agent host and inspecting
//! the declarative stores it reads and writes.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use clap::Subcommand;
use governor_core::FallbackPipeline;
use governor_core::HookRegistry;
use governor_core::Pipeline;
use governor_core::Services;
use governor_core::ToolError;
use governor_core::ToolName;
use governor_core::approval::AlwaysApprove;
use governor_core::command_classifier;
use governor_core::config::Paths;
use governor_core::hooks::command_classifier_hook::CommandClassifierHook;
use governor_core::hooks::intent_gatekeeper::IntentGatekeeper;
use governor_core::hooks::lesson_recorder::LessonRecorder;
use governor_core::hooks::lock_releaser::LockReleaser;
use governor_core::hooks::recovery_logger::RecoveryLogger;
use governor_core::hooks::scope_enforcer::ScopeEnforcer;
use governor_core::hooks::stale_file_detector::StaleFileDetector;
use governor_core::hooks::trace_recorder::TraceRecorder;
use governor_core::ignore_index::IgnoreIndex;
use governor_core::intent_store::IntentStore;
use governor_core::tools::select_intent;
use governor_core::vcs::GitVcsProbe;
use governor_core::vcs::UnknownVcsProbe;
use governor_core::vcs::is_git_repo;
use serde_json::Value;
use serde_json::json;

/// Governance middleware CLI.
#[derive(Debug, Parser)]
#[clap(author, version, about = "Interpose governance over write_to_file / execute_command")]
pub struct GovernorCli {
    /// Override the governor home directory (defaults to $GOVERNOR_HOME or ~/.governor).
    #[arg(long, global = true)]
    pub home: Option<std::path::PathBuf>,

    /// Session id to act under (tool calls within one invocation of `run` share this id).
    #[arg(long, global = true, default_value = "governor-cli")]
    pub session: String,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect the declarative stores.
    Intents {
        #[clap(subcommand)]
        action: IntentsAction,
    },
    /// Acquire an intent for the session, then optionally write a file and
    /// run a shell command under governance, printing each step's result.
    Run {
        /// Intent id to select before attempting any tool call.
        #[arg(long)]
        intent_id: String,
        /// Ask `select_intent` for the full, unbounded context.
        #[arg(long)]
        enhanced: bool,
        /// Write this path through the governed `write_to_file` tool.
        #[arg(long)]
        write_path: Option<String>,
        /// Content to write to `write_path`.
        #[arg(long, default_value = "")]
        write_content: String,
        /// Run this command through the governed `execute_command` tool.
        #[arg(long)]
        exec: Option<String>,
    },
    /// Classify a shell command without running it.
    ClassifyCommand { command: String },
    /// Query the trace journal.
    Trace {
        #[clap(subcommand)]
        action: TraceAction,
    },
    /// Print the lesson log.
    Lessons,
}

#[derive(Debug, Subcommand)]
pub enum IntentsAction {
    /// List every intent in the declarative store.
    List,
}

#[derive(Debug, Subcommand)]
pub enum TraceAction {
    ByIntent { id: String },
    ByFile { path: String },
}

pub async fn run(cli: GovernorCli) -> anyhow::Result<()> {
    let paths = resolve_paths(cli.home.clone())?;

    match cli.command {
        Command::Intents { action: IntentsAction::List } => {
            let store = IntentStore::load(&paths.intents_file);
            for intent in store.all() {
                println!(
                    "{}",
                    json!({
                        "id": intent.id,
                        "name": intent.name,
                        "status": intent.status,
                        "owned_scope": intent.owned_scope,
                    })
                );
            }
            Ok(())
        }
        Command::ClassifyCommand { command } => {
            let classification = command_classifier::classify(&command);
            println!("{}", serde_json::to_string_pretty(&classification)?);
            Ok(())
        }
        Command::Trace { action } => {
            let services = build_services(&paths)?;
            let records = match action {
                TraceAction::ByIntent { id } => services.trace.by_intent(&id),
                TraceAction::ByFile { path } => services.trace.by_file(&path),
            };
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }
        Command::Lessons => {
            let contents = std::fs::read_to_string(&paths.lesson_log).unwrap_or_default();
            print!("{contents}");
            Ok(())
        }
        Command::Run {
            intent_id,
            enhanced,
            write_path,
            write_content,
            exec,
        } => run_session(&paths, &cli.session, &intent_id, enhanced, write_path, write_content, exec).await,
    }
}

fn resolve_paths(home_override: Option<std::path::PathBuf>) -> anyhow::Result<Paths> {
    let cwd = std::env::current_dir().context("resolve current directory")?;
    let home = match home_override {
        Some(home) => home,
        None => governor_core::config::governor_home().context("resolve governor home")?,
    };
    Ok(Paths::new(&home, cwd))
}

fn build_services(paths: &Paths) -> anyhow::Result<Services> {
    let intents = IntentStore::load(&paths.intents_file);
    let ignore_index = IgnoreIndex::load(&paths.ignore_file);
    let vcs: Arc<dyn governor_core::vcs::VcsProbe> = if is_git_repo(&paths.project_root) {
        Arc::new(GitVcsProbe::new(paths.project_root.clone()))
    } else {
        Arc::new(UnknownVcsProbe)
    };
    Ok(Services::new(
        intents,
        ignore_index,
        paths.trace_journal.clone(),
        paths.lesson_log.clone(),
        Arc::new(AlwaysApprove),
        vcs,
    ))
}

fn build_pipeline(services: Services) -> FallbackPipeline {
    let mut registry = HookRegistry::new();
    registry.register_pre_global(Arc::new(IntentGatekeeper));
    registry.register_pre(ToolName::WriteToFile, Arc::new(ScopeEnforcer));
    registry.register_pre(ToolName::WriteToFile, Arc::new(StaleFileDetector));
    registry.register_pre(ToolName::ExecuteCommand, Arc::new(CommandClassifierHook));
    registry.register_post(ToolName::WriteToFile, Arc::new(LockReleaser));
    registry.register_post(ToolName::WriteToFile, Arc::new(TraceRecorder));
    registry.register_post_global(Arc::new(LessonRecorder));
    registry.register_post_global(Arc::new(RecoveryLogger));
    FallbackPipeline::new(Arc::new(Pipeline::new(registry, services)))
}

#[allow(clippy::too_many_arguments)]
async fn run_session(
    paths: &Paths,
    session_id: &str,
    intent_id: &str,
    enhanced: bool,
    write_path: Option<String>,
    write_content: String,
    exec: Option<String>,
) -> anyhow::Result<()> {
    let services = build_services(paths)?;
    let select_args = json!({"intent_id": intent_id, "enhanced": enhanced});
    match select_intent::run(select_args, session_id, &services).await {
        Ok(context) => println!("select_intent: {}", serde_json::to_string_pretty(&context)?),
        Err(ToolError::Policy(response)) => {
            println!("select_intent blocked: {}", serde_json::to_string_pretty(&response)?);
            return Ok(());
        }
        Err(ToolError::Internal(err)) => return Err(err),
    }

    let pipeline = build_pipeline(services);

    if let Some(path) = write_path {
        let args: Value = json!({"path": path, "content": write_content});
        let result = pipeline
            .execute(ToolName::WriteToFile, args, session_id, |args| async move {
                let path = args.get("path").and_then(|v| v.as_str()).unwrap_or_default();
                let content = args.get("content").and_then(|v| v.as_str()).unwrap_or_default();
                std::fs::write(path, content).map_err(anyhow::Error::from)?;
                Ok::<_, ToolError>(json!({"written": path}))
            })
            .await;
        println!("write_to_file: {}", serde_json::to_string_pretty(&result)?);
    }

    if let Some(command) = exec {
        let args = json!({"command": command});
        let result = pipeline
            .execute(ToolName::ExecuteCommand, args, session_id, |args| async move {
                let command = args.get("command").and_then(|v| v.as_str()).unwrap_or_default().to_string();
                let output = std::process::Command::new("sh")
                    .arg("-c")
                    .arg(&command)
                    .output()
                    .map_err(anyhow::Error::from)?;
                Ok::<_, ToolError>(json!({
                    "status": output.status.code(),
                    "stdout": String::from_utf8_lossy(&output.stdout),
                    "stderr": String::from_utf8_lossy(&output.stderr),
                }))
            })
            .await;
        println!("execute_command: {}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}
