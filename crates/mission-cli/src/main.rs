mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    check::Source, config::ConfigSubcommand, deps::DepsSubcommand, doc::DocSubcommand,
    project::ProjectSubcommand,
};
use mission_core::types::DocumentType;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "mission",
    about = "Mission control: track lifecycle documents and flag the ones left stale by upstream changes",
    version,
    propagate_version = true
)]
struct Cli {
    /// Workspace root (default: auto-detect from .mission/ or .git/)
    #[arg(long, global = true, env = "MISSION_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize mission control in the current workspace
    Init {
        /// Project name stored in config.yaml (default: directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Manage projects
    Project {
        #[command(subcommand)]
        subcommand: ProjectSubcommand,
    },

    /// Record and list documents
    Doc {
        #[command(subcommand)]
        subcommand: DocSubcommand,
    },

    /// Check whether one document is stale
    Check {
        /// Document type, e.g. STRATEGY
        doc_type: DocumentType,

        /// Project to read documents from
        #[arg(long, conflicts_with = "from", required_unless_present = "from")]
        project: Option<String>,

        /// JSON snapshot file: [{"type", "createdAt", "updatedAt"}]
        #[arg(long)]
        from: Option<PathBuf>,
    },

    /// Staleness of every document in a project
    Status { slug: String },

    /// Inspect the document dependency table
    Deps {
        #[command(subcommand)]
        subcommand: DepsSubcommand,
    },

    /// Inspect and validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init { name } => cmd::init::run(&root, name.as_deref()),
        Commands::Project { subcommand } => cmd::project::run(&root, subcommand, cli.json),
        Commands::Doc { subcommand } => cmd::doc::run(&root, subcommand, cli.json),
        Commands::Check {
            doc_type,
            project,
            from,
        } => match (project, from) {
            (_, Some(path)) => cmd::check::run(&root, doc_type, Source::Snapshot(path), cli.json),
            (Some(slug), None) => {
                cmd::check::run(&root, doc_type, Source::Project(slug), cli.json)
            }
            (None, None) => Err(anyhow::anyhow!("either --project or --from is required")),
        },
        Commands::Status { slug } => cmd::status::run(&root, &slug, cli.json),
        Commands::Deps { subcommand } => cmd::deps::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
