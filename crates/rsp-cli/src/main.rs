//! CLI binary for responsive-cleanup: report and remove stale `cq:responsive`
//! nodes left behind by template migrations.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rsp_core::config::RspConfig;
use rsp_scan::classify::ResponsiveItem;
use rsp_scan::request::CleanupRequest;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "responsive-cleanup",
    about = "Find and remove stale responsive nodes in a content repository"
)]
struct Cli {
    /// Project root holding .rsp/config.toml (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List responsive nodes of one category, and optionally remove them
    Scan {
        /// Repository document to scan (JSON)
        #[arg(short, long)]
        repo: PathBuf,

        /// Category: shadow, shadowInTemplateInitial, shadowInContent, orphan
        #[arg(short = 't', long = "type")]
        category: Option<String>,

        /// Report layout: noView, simple, detailed
        #[arg(short, long)]
        view_type: Option<String>,

        /// Operation: view or remove
        #[arg(short, long)]
        operation: Option<String>,

        /// Search root (repeatable; defaults to the configured roots)
        #[arg(short, long = "search-path")]
        search_paths: Vec<String>,
    },

    /// Show every classification verdict for one responsive node
    Classify {
        /// Repository document (JSON)
        #[arg(short, long)]
        repo: PathBuf,

        /// Path of the cq:responsive node
        path: String,
    },
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let project_root = get_project_root(&cli)?;

    match cli.command {
        Commands::Scan {
            repo,
            category,
            view_type,
            operation,
            search_paths,
        } => cmd_scan(
            &project_root,
            &repo,
            category,
            view_type,
            operation,
            search_paths,
        ),
        Commands::Classify { repo, path } => cmd_classify(&repo, &path),
    }
}

fn cmd_scan(
    project_root: &Path,
    repo: &Path,
    category: Option<String>,
    view_type: Option<String>,
    operation: Option<String>,
    search_paths: Vec<String>,
) -> Result<()> {
    let config = RspConfig::load(project_root).context("failed to load configuration")?;
    let request = CleanupRequest::new(&config, category, view_type, operation, search_paths);

    let mut tree = rsp_core::storage::load(repo)?;
    tracing::debug!("loaded {} nodes from {}", tree.len(), repo.display());

    let mut out = String::new();
    let summary = rsp_scan::report::execute(&mut tree, &request, &mut out)
        .with_context(|| format!("scan of {} failed", repo.display()))?;
    print!("{}", out);

    if let Some(deletions) = &summary.deletions {
        let failed = summary.failed_deletions();
        tracing::info!(
            "{} of {} nodes deleted",
            deletions.len() - failed,
            deletions.len()
        );
        if failed > 0 {
            tracing::warn!("{} nodes could not be deleted; see the log above", failed);
        }
    }
    Ok(())
}

fn cmd_classify(repo: &Path, node_path: &str) -> Result<()> {
    let tree = rsp_core::storage::load(repo)?;
    let item = ResponsiveItem::at(&tree, node_path)?;
    let verdict = item.verdict();

    println!("node:                    {}", item.path());
    println!("shadow:                  {}", verdict.shadow);
    println!("shadowInTemplateInitial: {}", verdict.shadow_in_template_initial);
    println!("shadowInContent:         {}", verdict.shadow_in_content);
    println!("orphan:                  {}", verdict.orphan);
    println!("live:                    {}", verdict.is_live());
    match item.template_structure_peer() {
        Some(peer) => {
            let has_config = item.template_structure_responsive().is_some();
            println!("template structure peer: {}", peer.path());
            println!("peer has cq:responsive:  {}", has_config);
        }
        None => println!("template structure peer: (none)"),
    }
    Ok(())
}
