use clap::{Parser, Subcommand};
use eyre::{Context, Result};
use std::fs;
use std::io::{self, StdinLock, Stdout};
use std::path::PathBuf;
use std::process::ExitCode;
use todostore::shell::{self, resolve_ref};
use todostore::{Backend, Config, Controller, Event, TaskStore, TerminalView, View};
use tracing::Level;

#[derive(Parser)]
#[command(name = "todostore")]
#[command(about = "todostore - Task list manager with local persistence")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to a YAML config file (default: <config dir>/todostore/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for stored tasks (overrides the config file)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Storage backend (overrides the config file)
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task
    Add {
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// List tasks
    List {
        /// all, pending or completed
        #[arg(short, long, default_value = "all")]
        filter: String,
    },

    /// Mark a task done / not done
    Toggle {
        /// Position in the list or unique id prefix
        task: String,
    },

    /// Replace the text of a task
    Edit {
        /// Position in the list or unique id prefix
        task: String,
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Delete a task
    Delete {
        /// Position in the list or unique id prefix
        task: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete all completed tasks
    ClearCompleted {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show task statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a JSON backup (default: todo-backup-<date>.json, "-" for stdout)
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace all tasks from a JSON backup
    Import { path: PathBuf },

    /// Interactive session
    Shell,
}

type TermController = Controller<TerminalView<StdinLock<'static>, Stdout>>;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Setup tracing
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }

    // Open store; an unusable backend degrades to memory with a warning
    let (storage, fallback) = config.open_storage_or_memory();
    let store = TaskStore::open_with_key(storage, &config.storage_key);

    let assume_yes = matches!(
        cli.command,
        Commands::Delete { yes: true, .. } | Commands::ClearCompleted { yes: true }
    );
    let view = TerminalView::new(io::stdin().lock(), io::stdout()).assume_yes(assume_yes);
    let mut controller = Controller::new(store, view, config.autosave_interval());
    if let Some(message) = fallback {
        controller.view_mut().show_warning(&message);
    }

    let ok = run(&mut controller, cli.command)?;

    // Exiting counts as going to the background
    let _ = controller.handle(Event::Hidden);

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Execute one command; `Ok(false)` when it failed and the failure was shown
fn run(controller: &mut TermController, command: Commands) -> Result<bool> {
    match command {
        Commands::Add { text } => Ok(controller.handle(Event::Submit(text.join(" "))).is_ok()),
        Commands::List { filter } => Ok(controller.handle(Event::SelectFilter(filter)).is_ok()),
        Commands::Toggle { task } => {
            let Some(id) = resolve(controller, &task) else {
                return Ok(false);
            };
            Ok(controller.handle(Event::Toggle(id)).is_ok())
        }
        Commands::Edit { task, text } => {
            let Some(id) = resolve(controller, &task) else {
                return Ok(false);
            };
            let _ = controller.handle(Event::Edit(id));
            Ok(controller.handle(Event::SaveEdit(text.join(" "))).is_ok())
        }
        Commands::Delete { task, .. } => {
            let Some(id) = resolve(controller, &task) else {
                return Ok(false);
            };
            let _ = controller.handle(Event::Delete(id));
            let event = if controller.view_mut().confirm("Delete this task?") {
                Event::ConfirmDelete
            } else {
                Event::CancelDelete
            };
            Ok(controller.handle(event).is_ok())
        }
        Commands::ClearCompleted { .. } => Ok(controller.handle(Event::ClearCompleted).is_ok()),
        Commands::Stats { json } => {
            let stats = controller.store().stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                controller.view_mut().print_stats(&stats);
            }
            Ok(true)
        }
        Commands::Export { output } => {
            let (name, data) = controller.export()?;
            match output {
                Some(path) if path.as_os_str() == "-" => println!("{}", data),
                output => {
                    let path = output.unwrap_or_else(|| PathBuf::from(name));
                    fs::write(&path, data).context(format!("Failed to write {}", path.display()))?;
                    let count = controller.store().len();
                    controller
                        .view_mut()
                        .info(format!("Exported {} task(s) to {}", count, path.display()));
                }
            }
            Ok(true)
        }
        Commands::Import { path } => {
            let data = fs::read_to_string(&path).context(format!("Failed to read {}", path.display()))?;
            Ok(controller.handle(Event::Import(data)).is_ok())
        }
        Commands::Shell => {
            shell::run(controller);
            Ok(true)
        }
    }
}

fn resolve(controller: &mut TermController, reference: &str) -> Option<String> {
    let id = resolve_ref(controller.store(), reference);
    if id.is_none() {
        controller
            .view_mut()
            .show_error(&format!("No task matches '{}'", reference));
    }
    id
}
