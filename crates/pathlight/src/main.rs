use anyhow::Context;
use clap::{Parser, Subcommand};
use pathlight::cli::Runner;
use pathlight::{ConfigLoader, Session};
use pathlight_core::{Document, TargetAction};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const BANNER: &[&str] = &[
    "Enter commands (e.g., 'query button:contains(\"Save\")', 'find button Save & Test').",
    "Type 'help' for a list of commands, 'exit' or 'quit' to leave.",
];

#[derive(Parser)]
#[command(name = "pathlight", version, about = "Resolve and generate selectors for interactive guides")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// HTML document to resolve against
    #[arg(long, global = true)]
    html: Option<PathBuf>,

    /// Config file (defaults to ./pathlight.yaml, then ~/.pathlight/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Extra semantic registry file, merged after configured ones
    #[arg(long, global = true)]
    registry: Vec<PathBuf>,

    /// Script of commands to execute (non-interactive mode)
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a selector and list every match
    Query { selector: String },
    /// Generate the best selector for the first element a selector matches
    Generate { selector: String },
    /// Report whether the input looks like a CSS selector or plain text
    Classify { input: String },
    /// Expand a semantic reference such as grafana:components.NavMenu.item
    Resolve { descriptor: String },
    /// Check whether a tutorial target exists
    Find {
        descriptor: String,
        #[arg(long, default_value = "highlight")]
        action: TargetAction,
    },
    /// Interactive prompt (the default)
    Repl,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => ConfigLoader::load_from(path)
            .await
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ConfigLoader::load_default().await?,
    };
    let registry = ConfigLoader::load_registry(&config, &args.registry).await?;
    debug!(empty = registry.is_empty(), "Semantic registry ready");

    let document = match &args.html {
        Some(path) => {
            let html = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            info!(path = %path.display(), "Loaded document");
            Some(Document::parse(&html))
        }
        None => None,
    };

    let session = Session::new(document, registry, config);
    let runner = Runner::new(&session);

    if let Some(file_path) = args.file {
        let executed = runner
            .run_script(&file_path)
            .await
            .with_context(|| format!("executing {}", file_path.display()))?;
        debug!(executed, "Script complete");
        return Ok(());
    }

    let result = match args.command.unwrap_or(Command::Repl) {
        Command::Query { selector } => session.query(&selector)?,
        Command::Generate { selector } => session.generate(&selector)?,
        Command::Classify { input } => session.classify(&input),
        Command::Resolve { descriptor } => session.resolve(&descriptor),
        Command::Find { descriptor, action } => session.find(&descriptor, action)?,
        Command::Repl => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            runner.run_interactive(stdin, BANNER).await?;
            return Ok(());
        }
    };

    runner.print(&result);
    Ok(())
}
