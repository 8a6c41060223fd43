//! msdelta CLI - Command-line interface for msdelta
//!
//! Builds microservice dependency graphs from IR documents and diffs two
//! commits' graphs into one annotated graph.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod report;

#[derive(Parser)]
#[command(name = "msdelta")]
#[command(author = "msdelta Contributors")]
#[command(version)]
#[command(about = "Microservice dependency graphs and their changes across commits", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to .msdelta/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Project directory (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Build the service graph of one IR document
    Graph {
        /// IR document (JSON)
        input: PathBuf,

        /// Only emit these microservices as nodes (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        nodes: Option<Vec<String>>,

        /// Output file for the graph JSON (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Diff the service graphs of two IR documents
    Diff {
        /// IR document of the earlier commit
        early: PathBuf,

        /// IR document of the later commit
        later: PathBuf,

        /// Only emit these microservices as nodes (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        nodes: Option<Vec<String>>,

        /// Output file for the merged graph JSON (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print a readable change report instead of JSON on stdout
        /// (an output file still receives the JSON)
        #[arg(long)]
        summary: bool,
    },

    /// Show graph statistics for one IR document
    Stats {
        /// IR document (JSON)
        input: PathBuf,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = cli.config;
    // init writes a fresh config, so only the other commands load one
    let load_config = || config::Config::load(config_path.as_deref());

    match cli.command {
        Commands::Init { path } => commands::init(&path),
        Commands::Graph {
            input,
            nodes,
            output,
        } => commands::graph(&load_config()?, &input, nodes, output.as_deref()),
        Commands::Diff {
            early,
            later,
            nodes,
            output,
            summary,
        } => {
            let config = load_config()?;
            commands::diff(&config, early, later, nodes, output.as_deref(), summary).await
        }
        Commands::Stats { input, json } => commands::stats(&load_config()?, &input, json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_init_ignores_broken_config() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        let project = dir.path().join("project");

        let cli = Cli::parse_from([
            "msdelta",
            "--config",
            broken.to_str().unwrap(),
            "init",
            project.to_str().unwrap(),
        ]);
        run(cli).await.unwrap();

        assert!(config::Config::project_path(&project).is_file());
    }

    #[tokio::test]
    async fn test_graph_reports_broken_config() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();

        let cli = Cli::parse_from(["msdelta", "--config", broken.to_str().unwrap(), "graph", "ir.json"]);
        let err = run(cli).await.unwrap_err();
        assert!(err.to_string().contains("invalid config"));
    }
}
