//! Tree-structured reasoning loop CLI.
//!
//! `reasoner run` drives a decision-maker through a reasoning tree, writing a
//! snapshot of the rendered tree and an action log under
//! `<snapshot_root>/<session>/`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use reasoner::core::action::Transition;
use reasoner::core::error::{DecisionError, TreeError};
use reasoner::core::navigator::Navigator;
use reasoner::core::render::outline;
use reasoner::exit_codes;
use reasoner::io::action_log::ActionLog;
use reasoner::io::config::{CONFIG_FILE, ReasonerConfig, load_config, write_config};
use reasoner::io::decision::CodexDecisionMaker;
use reasoner::io::prompt::PromptBuilder;
use reasoner::io::session::{Session, validate_session_id};
use reasoner::io::snapshot::read_snapshot;
use reasoner::logging;
use reasoner::looping::{LoopStop, run_loop};
use reasoner::step::{StepContext, StepOutcome};

#[derive(Parser)]
#[command(name = "reasoner", version, about = "Tree-structured reasoning loop")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default `reasoner.toml` in the current directory.
    Init {
        /// Overwrite an existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Reason about TASK until the decision-maker finishes or the budget runs out.
    Run {
        /// The task to reason about.
        task: String,
        /// Config file (defaults to `reasoner.toml` when present).
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Use this session id instead of generating one; its directory must be new or empty.
        #[arg(short, long)]
        session: Option<String>,
        /// Override `max_iterations` from the config.
        #[arg(long)]
        max_iterations: Option<u32>,
        /// Do not write tree snapshots.
        #[arg(long)]
        no_snapshots: bool,
    },
    /// Print the outline of a stored snapshot.
    Show {
        /// Session id (directory name under the snapshot root).
        session: String,
        /// Snapshot size to show (defaults to the latest).
        #[arg(long)]
        size: Option<u32>,
        /// Snapshot root (defaults to the configured one).
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    logging::init();
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            exit_code_for(&err)
        }
    };
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force } => cmd_init(force),
        Command::Run {
            task,
            config,
            session,
            max_iterations,
            no_snapshots,
        } => {
            let mut cfg = load_config(config.as_deref().unwrap_or(Path::new(CONFIG_FILE)))?;
            if let Some(max) = max_iterations {
                cfg.max_iterations = max;
            }
            if no_snapshots {
                cfg.snapshots = false;
            }
            cfg.validate()?;
            cmd_run(&task, &cfg, session.as_deref())
        }
        Command::Show {
            session,
            size,
            root,
        } => {
            let root = match root {
                Some(root) => root,
                None => load_config(Path::new(CONFIG_FILE))?.snapshot_root,
            };
            cmd_show(&root, &session, size)
        }
    }
}

fn cmd_init(force: bool) -> Result<i32> {
    let path = Path::new(CONFIG_FILE);
    if path.exists() && !force {
        println!("{} already exists (use --force to overwrite)", path.display());
        return Ok(exit_codes::OK);
    }
    write_config(path, &ReasonerConfig::default())?;
    println!("wrote {}", path.display());
    Ok(exit_codes::OK)
}

fn cmd_run(task: &str, cfg: &ReasonerConfig, session_id: Option<&str>) -> Result<i32> {
    let session = Session::create(&cfg.snapshot_root, session_id)?;
    let action_log = ActionLog::new(session.actions_log_path(), cfg.log.echo);
    let prompts = PromptBuilder::new()?;
    let decision_maker = CodexDecisionMaker::new(&cfg.decision);
    let ctx = StepContext {
        session: &session,
        task,
        config: cfg,
        action_log: &action_log,
        prompts: &prompts,
    };

    let mut navigator = Navigator::new();
    let outcome = run_loop(&mut navigator, &decision_maker, &ctx, print_step)
        .with_context(|| format!("session {}", session.id()))?;

    println!(
        "session {}: {} steps, {} nodes, current node {} ({})",
        outcome.session_id,
        outcome.steps_executed,
        navigator.size(),
        navigator.current_node_id(),
        session.dir().display()
    );
    match outcome.stop {
        LoopStop::Finished => Ok(exit_codes::OK),
        LoopStop::MaxIterationsReached { max_iterations } => {
            eprintln!("stopped after {max_iterations} iterations without finishing");
            Ok(exit_codes::EXHAUSTED)
        }
    }
}

fn print_step(step: &StepOutcome, navigator: &Navigator) {
    let summary = match &step.transition {
        Transition::Extended {
            node_id,
            parent_id,
            brief,
            ..
        } => format!("extend {parent_id} -> {node_id}: {brief}"),
        Transition::Jumped { from, to } => format!("jump {from} -> {to}"),
        Transition::Finished { .. } => "finish".to_string(),
    };
    eprintln!(
        "[{}] {summary} (size={})",
        step.iteration + 1,
        navigator.size()
    );
}

fn cmd_show(root: &Path, session_id: &str, size: Option<u32>) -> Result<i32> {
    validate_session_id(session_id)?;
    let session = Session::at(root, session_id);
    let size = match size {
        Some(size) => size,
        None => session
            .latest_snapshot_size()?
            .ok_or_else(|| anyhow!("no snapshots in {}", session.dir().display()))?,
    };
    let view = read_snapshot(&session.snapshot_path(size))?;
    println!("{}", outline(&view));
    Ok(exit_codes::OK)
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<TreeError>().is_some() {
        return exit_codes::NOT_FOUND;
    }
    if err.downcast_ref::<DecisionError>().is_some() {
        return exit_codes::INVALID_ACTION;
    }
    exit_codes::ERROR
}
