//! Policy360 CLI - policy lifecycle tracker
//!
//! Command-line host for the Policy360 workflow tracker. Keeps the workflow
//! position in `.policy360/state.toml` between invocations and journals stage
//! notifications to `.policy360/journal.toml`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use policy360_core::tools::StdFsAdapter;
use policy360_core::validate::{validate_email, validate_password_with, validate_upload};
use policy360_core::{
    JournalObserver, NoopObserver, Policy360Config, Policy360Error, STAGES, StageObserver,
    WorkflowTracker, load_snapshot, save_snapshot,
};
use policy360_report::{ReportContext, ReportEngine, ReportManager};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

mod tui;

/// Policy360 - policy lifecycle tracker
///
/// Moves a policy through ideation, analysis, implementation, monitoring,
/// evaluation and success.
#[derive(Parser)]
#[command(name = "policy360", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the current directory as a Policy360 workspace
    Init,

    /// List the lifecycle stages
    Stages,

    /// Show the current stage and progress
    Status,

    /// Move to the next stage (marks it done locally, no notification)
    Next,

    /// Move back one stage
    Back,

    /// Save progress on the current stage
    Save,

    /// Complete the current stage, notify, and move on
    Complete,

    /// Mark the policy as successful (final stage only)
    Succeed,

    /// Render a progress report
    Report {
        /// Render the current stage summary instead of the full report
        #[arg(long)]
        stage: bool,

        /// Policy title shown in the report header
        #[arg(long)]
        title: Option<String>,
    },

    /// Open the interactive tracker
    Track,

    /// Check a password against the configured rules
    CheckPassword { password: String },

    /// Check an email address format
    CheckEmail { email: String },

    /// Check an upload against the configured size limit and file types
    CheckFile {
        /// File size in bytes
        size_bytes: u64,
        /// File type or extension (e.g. "pdf")
        file_type: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = run_command(cli.command).await {
        error!("Command failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Initialize tracing subscriber for structured logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = if verbose {
        EnvFilter::new("policy360=debug,policy360_core=debug,policy360_report=debug")
    } else {
        EnvFilter::new("policy360=warn,policy360_core=warn,policy360_report=warn")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}

async fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Init => run_init(),
        Commands::Stages => {
            run_stages();
            Ok(())
        }
        Commands::Status => run_status(),
        Commands::Next => with_tracker(|tracker| {
            if tracker.advance() {
                println!("✔ Advanced to {}", tracker.current_stage().info.label);
            } else {
                println!("Already at the final stage");
            }
            Ok(())
        }),
        Commands::Back => with_tracker(|tracker| {
            if tracker.retreat() {
                println!("✔ Moved back to {}", tracker.current_stage().info.label);
            } else {
                println!("Already at the first stage");
            }
            Ok(())
        }),
        Commands::Save => with_tracker(|tracker| {
            tracker.mark_current_in_progress();
            println!("✔ Saved progress on {}", tracker.current_stage().info.label);
            Ok(())
        }),
        Commands::Complete => with_tracker(|tracker| {
            let label = tracker.current_stage().info.label;
            let moved = tracker.complete_current_and_advance();
            println!("✔ Completed {label}");
            if moved {
                println!("  Now at {}", tracker.current_stage().info.label);
            }
            Ok(())
        }),
        Commands::Succeed => with_tracker(|tracker| {
            if !tracker.mark_final_success() {
                anyhow::bail!(
                    "Success can only be marked at the final stage (current: {})",
                    tracker.current_stage().info.label
                );
            }
            println!("🏆 Policy marked as successful");
            Ok(())
        }),
        Commands::Report { stage, title } => run_report(stage, title),
        Commands::Track => run_track().await,
        Commands::CheckPassword { password } => run_check_password(&password),
        Commands::CheckEmail { email } => run_check_email(&email),
        Commands::CheckFile {
            size_bytes,
            file_type,
        } => run_check_file(size_bytes, &file_type),
    }
}

fn run_init() -> Result<()> {
    let root = std::env::current_dir().context("Failed to get current directory")?;
    info!("Workspace root: {}", root.display());

    let config = Policy360Config::new(root);
    config
        .init_workspace(&StdFsAdapter::new())
        .context("Failed to initialize workspace")?;

    println!("✔ Created {}", config.config_file.display());
    println!("\nWorkspace initialized for Policy360!");
    println!("\nNext steps:");
    println!("  policy360 status      Show the current stage");
    println!("  policy360 complete    Complete the current stage");
    println!("  policy360 track       Open the interactive tracker");

    Ok(())
}

fn run_stages() {
    for (index, info) in STAGES.iter().enumerate() {
        println!(
            "{}. {} {:<15} {}",
            index + 1,
            info.icon,
            info.label,
            info.description
        );
    }
}

fn run_status() -> Result<()> {
    let (_config, tracker) = open_tracker()?;
    let current = tracker.current_stage();

    println!(
        "Stage {}/{}: {} {}",
        current.position, current.total, current.info.icon, current.info.label
    );
    println!("{}", current.display.title);
    println!("Completion: {}%", current.display.completion);
    println!("Stakeholders: {}", current.display.stakeholders);

    let highlighted = current.display.highlighted_tasks();
    for (i, task) in current.display.tasks.iter().enumerate() {
        let mark = if i < highlighted { "x" } else { " " };
        println!("  [{mark}] {task}");
    }

    let completed: Vec<&str> = tracker.completed().iter().map(|s| s.as_str()).collect();
    if completed.is_empty() {
        println!("Completed: none");
    } else {
        println!("Completed: {}", completed.join(", "));
    }

    Ok(())
}

fn run_report(stage: bool, title: Option<String>) -> Result<()> {
    let (config, tracker) = open_tracker()?;

    let manager = ReportManager::from_dir_or_builtin(config.report.template_dir.clone())
        .context("Failed to load report templates")?;

    let mut ctx = ReportContext::from_tracker(&tracker);
    if let Some(title) = title {
        ctx = ctx.with_policy_title(title);
    }

    let template = if stage { "stage" } else { "final_report" };
    let rendered = manager
        .render(template, &ctx)
        .with_context(|| format!("Failed to render {template} report"))?;
    println!("{}", rendered.trim_end());

    Ok(())
}

async fn run_track() -> Result<()> {
    let (config, mut tracker) = open_tracker()?;
    tui::run_tracker_tui(&mut tracker)
        .await
        .context("Interactive tracker failed")?;
    persist(&config, &tracker)
}

fn run_check_password(password: &str) -> Result<()> {
    let config = load_config_or_default()?;
    let problems = validate_password_with(password, config.validation.password_min_length);
    if problems.is_empty() {
        println!("✔ Password meets all requirements");
        return Ok(());
    }
    for problem in &problems {
        println!("✘ {problem}");
    }
    anyhow::bail!("Password does not meet {} requirement(s)", problems.len())
}

fn run_check_email(email: &str) -> Result<()> {
    if !validate_email(email) {
        anyhow::bail!("Invalid email format: {email}");
    }
    println!("✔ {email} is a valid email address");
    Ok(())
}

fn run_check_file(size_bytes: u64, file_type: &str) -> Result<()> {
    let config = load_config_or_default()?;
    let problems = validate_upload(size_bytes, file_type, &config.validation);
    if problems.is_empty() {
        println!("✔ {file_type} upload of {size_bytes} bytes is accepted");
        return Ok(());
    }
    for problem in &problems {
        println!("✘ {problem}");
    }
    anyhow::bail!("Upload rejected")
}

/// Loads the workspace, runs `f` on its tracker and saves the new position.
fn with_tracker(f: impl FnOnce(&mut WorkflowTracker) -> Result<()>) -> Result<()> {
    let (config, mut tracker) = open_tracker()?;
    f(&mut tracker)?;
    persist(&config, &tracker)
}

fn open_tracker() -> Result<(Policy360Config, WorkflowTracker)> {
    let root = find_workspace_root()?;
    let config = load_config(&root)?;
    let fs = Arc::new(StdFsAdapter::new());

    let observer: Box<dyn StageObserver> = if config.workflow.journal {
        Box::new(JournalObserver::new(config.journal_file.clone(), fs.clone()))
    } else {
        Box::new(NoopObserver)
    };

    let snapshot = if config.workflow.resume {
        load_snapshot(fs.as_ref(), &config.state_file).context("Failed to load saved workflow")?
    } else {
        None
    };

    let tracker = match snapshot {
        Some(snapshot) => WorkflowTracker::from_snapshot(&snapshot, observer),
        None => WorkflowTracker::new(observer),
    };
    info!(stage = %tracker.active_stage(), "workflow loaded");

    Ok((config, tracker))
}

fn persist(config: &Policy360Config, tracker: &WorkflowTracker) -> Result<()> {
    save_snapshot(&StdFsAdapter::new(), &config.state_file, &tracker.snapshot())
        .context("Failed to save workflow state")
}

/// Find the workspace root by searching for a `.policy360` directory
fn find_workspace_root() -> Result<PathBuf> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;

    let mut path = current_dir.as_path();
    loop {
        if path.join(policy360_core::config::DATA_DIR).is_dir() {
            return Ok(path.to_path_buf());
        }

        match path.parent() {
            Some(parent) => path = parent,
            None => return Err(Policy360Error::NotInitialized.into()),
        }
    }
}

fn load_config(root: &Path) -> Result<Policy360Config> {
    Policy360Config::load(root.to_path_buf()).context("Failed to load Policy360 configuration")
}

/// Workspace config when inside one, defaults otherwise.
fn load_config_or_default() -> Result<Policy360Config> {
    match find_workspace_root() {
        Ok(root) => load_config(&root),
        Err(_) => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            Ok(Policy360Config::new(cwd))
        }
    }
}
