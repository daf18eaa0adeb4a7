//! jarctl: inspect and edit a persisted jar collection.
//!
//! ```bash
//! jarctl validate export.json
//! jarctl init
//! jarctl add --name "Quality Time" --after 3f2a…
//! jarctl remove 3f2a…
//! jarctl list
//! ```
//!
//! The collection lives in a single JSON file, `JAR_STORAGE_PATH`
//! (default `jars-export.json`). `LOG_FORMAT` selects `pretty` or `json`
//! logs on stderr; `RUST_LOG` filters them.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jar_kernel::{
    default_topics, load_export_data, save_export_data, Board, ExportError, FileBlobStore,
    JarConfig, LoadOutcome, LogFormat, Serializer, Topic, TopicId, UuidGenerator,
};

#[derive(Parser)]
#[command(name = "jarctl", version, about = "Manage emotion-jar topic collections")]
struct Cli {
    /// Storage file; overrides JAR_STORAGE_PATH.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check an export file and report every problem.
    Validate {
        /// Export file to check.
        file: PathBuf,
    },
    /// Write the starter topics to the store.
    Init {
        /// Replace an existing collection.
        #[arg(long)]
        force: bool,
    },
    /// Add a default topic.
    Add {
        /// Topic name.
        #[arg(long)]
        name: Option<String>,
        /// Insert after this topic instead of at the end.
        #[arg(long)]
        after: Option<String>,
    },
    /// Remove a topic.
    Remove {
        /// Topic id.
        id: String,
    },
    /// Print the stored topics.
    List,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "jar_kernel=info,jarctl=info".into());

    match format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .flatten_event(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut config = JarConfig::from_env();
    init_tracing(config.log_format);

    if let Some(path) = cli.store {
        config.storage_path = path;
    }
    let serializer = Serializer::new(config.export.clone());
    let store = FileBlobStore::new(config.storage_path.clone());

    match cli.command {
        Command::Validate { file } => validate_file(&file, &serializer).await,
        Command::Init { force } => {
            let existing = load_export_data(&store, &serializer).await;
            check_init_target(&existing, force, &config.storage_path)?;
            let topics = default_topics(&mut UuidGenerator, Utc::now());
            save(&store, &serializer, topics).await?;
            info!(path = %config.storage_path.display(), "Initialized collection");
            Ok(ExitCode::SUCCESS)
        }
        Command::Add { name, after } => {
            let mut board = load_board(&store, &serializer).await?;
            if let Some(after) = after {
                let after = TopicId::from(after);
                if !board.list_mut().set_focus(&after) {
                    bail!("no topic with id {after}");
                }
            }

            board.add_topic(Utc::now())?;
            let id = board.focus().cloned().context("new topic is not focused")?;
            if let Some(name) = name {
                if let Some(topic) = board.topic_mut(&id) {
                    topic.name = name;
                }
            }

            save(&store, &serializer, board.topics().to_vec()).await?;
            println!("{id}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Remove { id } => {
            let mut board = load_board(&store, &serializer).await?;
            let id = TopicId::from(id);
            board.list_mut().set_focus(&id);

            let changes = board.remove_topic(&id)?;
            if changes.is_empty() {
                bail!("no topic with id {id}");
            }

            save(&store, &serializer, board.topics().to_vec()).await?;
            match board.focus() {
                Some(focus) => println!("removed {id}; focus moves to {focus}"),
                None => println!("removed {id}; collection is now empty"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::List => {
            let board = load_board(&store, &serializer).await?;
            for topic in board.topics() {
                print_topic(topic);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn validate_file(file: &Path, serializer: &Serializer) -> Result<ExitCode> {
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;

    match serializer.deserialize(&text) {
        Ok(document) => {
            println!("{}: ok ({} topics)", file.display(), document.topics.len());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            report(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Refuse to overwrite anything already at `path` unless forced.
fn check_init_target(existing: &LoadOutcome, force: bool, path: &Path) -> Result<()> {
    if force {
        return Ok(());
    }
    match existing {
        LoadOutcome::Empty => Ok(()),
        LoadOutcome::Loaded(document) => bail!(
            "{} already holds a collection of {} topics; pass --force to replace it",
            path.display(),
            document.topics.len()
        ),
        LoadOutcome::Failed(e) => {
            report(e);
            bail!(
                "{} exists but is not a usable collection; pass --force to overwrite it",
                path.display()
            )
        }
    }
}

async fn load_board(store: &FileBlobStore, serializer: &Serializer) -> Result<Board<UuidGenerator>> {
    let mut board = Board::new(UuidGenerator);
    match load_export_data(store, serializer).await {
        LoadOutcome::Loaded(document) => {
            board.replace_all(&document.topics)?;
        }
        LoadOutcome::Empty => {}
        LoadOutcome::Failed(e) => {
            report(&e);
            bail!("stored collection at {} is unusable", store.path().display());
        }
    }
    Ok(board)
}

async fn save(store: &FileBlobStore, serializer: &Serializer, topics: Vec<Topic>) -> Result<()> {
    let document = serializer.document(topics, Utc::now());
    if let Err(e) = save_export_data(store, serializer, &document).await {
        report(&e);
        bail!("collection not saved");
    }
    Ok(())
}

fn report(error: &ExportError) {
    for issue in error.issues() {
        eprintln!("{issue}");
    }
}

fn print_topic(topic: &Topic) {
    let [left, right] = &topic.emotions;
    println!(
        "{}  {}  [{} {} {}] [{} {} {}]",
        topic.id(),
        topic.name,
        left.producer,
        left.reaction,
        left.strength,
        right.producer,
        right.reaction,
        right.strength,
    );
}
