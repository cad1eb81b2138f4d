use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use taskd::{
    client::{SnapshotCache, TaskApi, TaskBoard},
    config::TaskdConfig,
    rest,
    storage::Storage,
    AppContext,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskd", about = "taskd — minimal task-tracking service and client", version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP API port
    #[arg(long, env = "TASKD_PORT")]
    port: Option<u16>,

    /// Data directory for the SQLite database and task snapshot
    #[arg(long, env = "TASKD_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TASKD_LOG")]
    log: Option<String>,

    /// Bind address for the HTTP server (default: 127.0.0.1; use 0.0.0.0 for LAN access)
    #[arg(long, env = "TASKD_BIND")]
    bind_address: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the task service (default when no subcommand given).
    Serve,
    /// List pending and completed tasks.
    ///
    /// Falls back to the last cached snapshot when the service is unreachable.
    List,
    /// Create a task.
    Add {
        /// Task description (must be non-empty)
        description: String,
    },
    /// Flip a task between pending and completed.
    Toggle {
        /// Task id as shown by `taskd list`
        id: i64,
    },
    /// Rewrite a task's description.
    Edit {
        id: i64,
        description: String,
    },
    /// Delete a task.
    Rm {
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = TaskdConfig::new(args.port, args.data_dir, args.log, args.bind_address);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log))
        .compact()
        .init();

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        cmd => run_client_command(config, cmd).await,
    }
}

async fn serve(config: TaskdConfig) -> Result<()> {
    let storage = Arc::new(Storage::new(&config.data_dir).await?);
    let ctx = Arc::new(AppContext {
        config: Arc::new(config),
        storage,
        started_at: std::time::Instant::now(),
    });
    rest::serve(ctx).await
}

/// CLI subcommands drive the same board the UI would: state is loaded from
/// the service, mutated optimistically, and errors surface on the board.
async fn run_client_command(config: TaskdConfig, cmd: Command) -> Result<()> {
    let api = TaskApi::new(format!("http://127.0.0.1:{}", config.port))?;
    let cache = SnapshotCache::new(&config.data_dir);
    let mut board = TaskBoard::new(api, cache);

    match cmd {
        Command::List => {
            if !board.refresh().await {
                if let Some(err) = board.error() {
                    eprintln!("warning: {err} (showing last cached list)");
                }
            }
            println!("Pending:");
            for t in board.pending() {
                println!("  [ ] {:>4}  {}", t.id, t.description);
            }
            println!("Completed:");
            for t in board.completed() {
                println!("  [x] {:>4}  {}", t.id, t.description);
            }
        }
        Command::Add { description } => {
            if !board.add(&description).await {
                bail_with_board_error(&board, "failed to add task")?;
            }
            let task = &board.tasks()[0];
            println!("created task {}", task.id);
        }
        Command::Toggle { id } => {
            require_refresh(&mut board).await?;
            if !board.toggle(id).await {
                bail_with_board_error(&board, &format!("no task with id {id}"))?;
            }
            println!("toggled task {id}");
        }
        Command::Edit { id, description } => {
            require_refresh(&mut board).await?;
            if !board.edit(id, &description).await {
                bail_with_board_error(&board, &format!("no task with id {id}"))?;
            }
            println!("updated task {id}");
        }
        Command::Rm { id } => {
            require_refresh(&mut board).await?;
            if !board.remove(id).await {
                bail_with_board_error(&board, &format!("no task with id {id}"))?;
            }
            println!("deleted task {id}");
        }
        Command::Serve => unreachable!("handled in main"),
    }
    Ok(())
}

/// Mutations need live state first; a cached snapshot is not enough to edit.
async fn require_refresh(board: &mut TaskBoard) -> Result<()> {
    if !board.refresh().await {
        if let Some(err) = board.error() {
            bail!("{err}");
        }
        bail!("could not reach the task service");
    }
    Ok(())
}

fn bail_with_board_error(board: &TaskBoard, fallback: &str) -> Result<()> {
    match board.error() {
        Some(err) => bail!("{err}"),
        None => bail!("{fallback}"),
    }
}
