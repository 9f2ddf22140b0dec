use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use relkit::{
    ChangelogCollector, CollectOptions, CommitValidator, GitOps, RelkitConfig,
    select_release_branches,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "relkit")]
#[command(version, about = "release helpers: collect changelogs and check commit messages", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// path to the repository (defaults to current directory)
    #[arg(short, long, default_value = ".", global = true)]
    path: PathBuf,

    /// output format (json or human)
    #[arg(short, long, default_value = "human", global = true)]
    format: OutputFormat,

    /// log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Json,
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" => Ok(OutputFormat::Human),
            _ => Err(format!(
                "invalid output format: {}, use 'json' or 'human'",
                s
            )),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// merge the changelogs of <major>.<minor> release branches into the local one
    Collect {
        /// remote whose branches are collected
        #[arg(short, long, default_value = "origin")]
        remote: String,

        /// fetch the remote before collecting
        #[arg(long)]
        fetch: bool,

        /// report what would be added without writing
        #[arg(long)]
        dry_run: bool,

        /// write the changelog but do not commit it
        #[arg(long)]
        no_commit: bool,
    },

    /// check a commit message for an issue reference and change fragments
    CheckCommit {
        /// commit to check (hash, branch, or HEAD)
        #[arg(default_value = "HEAD")]
        rev: String,
    },

    /// list the release branches collect would visit, newest first
    Branches {
        /// remote whose branches are listed
        #[arg(short, long, default_value = "origin")]
        remote: String,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let repo_path = GitOps::detect_repository_root(&cli.path)
        .with_context(|| format!("no git repository at {}", cli.path.display()))?;
    let config = RelkitConfig::load_or_default(&repo_path).context("failed to load relkit.toml")?;

    match cli.command {
        Commands::Collect {
            remote,
            fetch,
            dry_run,
            no_commit,
        } => {
            let options = CollectOptions {
                remote,
                fetch,
                dry_run,
                commit: !no_commit,
            };
            handle_collect(&repo_path, &config, &options, &cli.format)?;
        }
        Commands::CheckCommit { rev } => {
            handle_check_commit(&repo_path, &config, &rev, &cli.format)?;
        }
        Commands::Branches { remote } => {
            handle_branches(&repo_path, &remote, &cli.format)?;
        }
    }

    Ok(())
}

fn handle_collect(
    repo_path: &Path,
    config: &RelkitConfig,
    options: &CollectOptions,
    format: &OutputFormat,
) -> Result<()> {
    let report = ChangelogCollector::run(repo_path, config, options)
        .context("failed to collect changelogs")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Human => report.display_summary(),
    }

    Ok(())
}

fn handle_check_commit(
    repo_path: &Path,
    config: &RelkitConfig,
    rev: &str,
    format: &OutputFormat,
) -> Result<()> {
    let check = CommitValidator::check_commit(repo_path, rev, config)
        .with_context(|| format!("failed to check commit {}", rev))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&check)?),
        OutputFormat::Human => check.display_summary(),
    }

    if !check.passed() {
        bail!("commit {} does not follow the commit message policy", rev);
    }

    Ok(())
}

fn handle_branches(repo_path: &Path, remote: &str, format: &OutputFormat) -> Result<()> {
    let names = GitOps::list_remote_branches(repo_path, remote)
        .with_context(|| format!("failed to list branches of {}", remote))?;
    let branches = select_release_branches(&names);

    match format {
        OutputFormat::Json => {
            let names: Vec<&str> = branches.iter().map(|b| b.name.as_str()).collect();
            println!("{}", serde_json::to_string_pretty(&names)?);
        }
        OutputFormat::Human => {
            if branches.is_empty() {
                println!("no release branches on {}", remote);
            } else {
                println!("release branches on {} ({}):", remote, branches.len());
                for branch in &branches {
                    println!("  {}", branch.name);
                }
            }
        }
    }

    Ok(())
}
