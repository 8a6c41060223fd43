//! CLI command implementations.

use crate::config::{Config, CONFIG_DIR};
use crate::report;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use msdelta_core::load_document;
use msdelta_graph::{diff_graphs, GraphBuilder, MsGraph};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Write a default configuration into a project directory.
pub fn init(path: &Path) -> Result<()> {
    let config_path = Config::project_path(path);

    if config_path.exists() {
        println!("{} Already initialized", "✓".green());
        return Ok(());
    }

    fs::create_dir_all(path.join(CONFIG_DIR))?;
    fs::write(
        &config_path,
        serde_json::to_string_pretty(&Config::default())?,
    )?;

    println!("{} Initialized msdelta in {}", "✓".green(), path.display());
    println!(
        "  Run {} to compare two commits",
        "msdelta diff <early.json> <later.json>".cyan()
    );

    Ok(())
}

/// Build and write the graph of one IR document.
pub fn graph(
    config: &Config,
    input: &Path,
    nodes: Option<Vec<String>>,
    output: Option<&Path>,
) -> Result<()> {
    let spinner = spinner("Building graph...");
    let graph = build_snapshot(input, config.node_filter(nodes))?;
    spinner.finish_and_clear();

    write_json(&graph, config.output_path(output), config.pretty)
}

/// Diff two IR documents and write the merged graph.
///
/// With `summary` the change report is printed instead of JSON on stdout,
/// while an output file, if any, still receives the merged graph. Both snapshots are loaded and built on blocking tasks in parallel.
pub async fn diff(
    config: &Config,
    early: PathBuf,
    later: PathBuf,
    nodes: Option<Vec<String>>,
    output: Option<&Path>,
    summary: bool,
) -> Result<()> {
    let filter = config.node_filter(nodes);
    let spinner = spinner("Building snapshots...");

    let early_filter = filter.clone();
    let early_task = tokio::task::spawn_blocking(move || build_snapshot(&early, early_filter));
    let later_task = tokio::task::spawn_blocking(move || build_snapshot(&later, filter));
    let (early_graph, later_graph) = tokio::try_join!(early_task, later_task)?;
    let (early_graph, later_graph) = (early_graph?, later_graph?);

    spinner.set_message("Diffing...");
    let diff = diff_graphs(&early_graph, &later_graph);
    spinner.finish_and_clear();

    let output = config.output_path(output);
    if summary {
        println!("{}", report::diff_summary(&diff, &early_graph.git_commit_id));
        // the report takes stdout; JSON only goes to a file
        if output.is_none() {
            return Ok(());
        }
    }

    write_json(&diff.merged, output, config.pretty)
}

/// Show statistics for one IR document.
pub fn stats(config: &Config, input: &Path, json_output: bool) -> Result<()> {
    let doc = load_document(input)?;
    let (graph, build_stats) = builder_for(config.node_filter(None)).build_with_stats(&doc);
    let cycles = graph.dependency_cycles();

    if json_output {
        let output = serde_json::json!({
            "commit": graph.git_commit_id,
            "graph": graph.stats(),
            "build": build_stats,
            "cycles": cycles,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", report::stats_summary(&graph, &build_stats, &cycles));
    }

    Ok(())
}

fn build_snapshot(
    path: &Path,
    filter: Option<Vec<String>>,
) -> std::result::Result<MsGraph, msdelta_core::IrError> {
    let doc = load_document(path)?;
    Ok(builder_for(filter).build(&doc))
}

fn builder_for(filter: Option<Vec<String>>) -> GraphBuilder {
    match filter {
        Some(names) => GraphBuilder::new().with_node_filter(names),
        None => GraphBuilder::new(),
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message);
    spinner
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    match output {
        Some(path) => {
            fs::write(path, text)?;
            eprintln!("{} Wrote {}", "✓".green(), path.display());
        }
        None => println!("{}", text),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::tempdir;

    fn write_ir(dir: &Path, file: &str, commit: &str, call_url: &str) -> PathBuf {
        let body = json!({
            "commitID": commit,
            "microservices": [
                {
                    "name": "X",
                    "path": "/x",
                    "controllers": [],
                    "services": [{
                        "name": "Client",
                        "methodCalls": [{ "name": "get", "url": call_url, "httpMethod": "GET", "microserviceName": "X" }]
                    }]
                },
                {
                    "name": "Y",
                    "path": "/y",
                    "controllers": [{
                        "name": "YController",
                        "methods": [
                            { "name": "foo", "url": "/foo", "httpMethod": "GET" },
                            { "name": "bar", "url": "/bar", "httpMethod": "GET" }
                        ]
                    }],
                    "services": []
                }
            ]
        });
        let path = dir.join(file);
        fs::write(&path, body.to_string()).unwrap();
        path
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_init_writes_default_config() {
        let dir = tempdir().unwrap();
        init(dir.path()).unwrap();

        let config = Config::from_file(&Config::project_path(dir.path())).unwrap();
        assert_eq!(config, Config::default());

        // second run leaves the file alone
        init(dir.path()).unwrap();
    }

    #[test]
    fn test_graph_writes_output_file() {
        let dir = tempdir().unwrap();
        let input = write_ir(dir.path(), "ir.json", "57b3", "/foo");
        let output = dir.path().join("graph.json");

        graph(&Config::default(), &input, None, Some(output.as_path())).unwrap();

        let value = read_json(&output);
        assert_eq!(value["graphName"], "msgraph");
        assert_eq!(value["gitCommitId"], "57b3");
        assert_eq!(value["links"]["X --> Y"]["requests"][0]["destinationUrl"], "/foo");
    }

    #[test]
    fn test_graph_rejects_malformed_ir() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bad.json");
        fs::write(&input, r#"{ "commitID": "x" }"#).unwrap();

        let output = dir.path().join("o.json");
        let err = graph(&Config::default(), &input, None, Some(output.as_path())).unwrap_err();
        assert!(err.to_string().contains("microservices"));
    }

    #[tokio::test]
    async fn test_diff_writes_merged_graph() {
        let dir = tempdir().unwrap();
        let early = write_ir(dir.path(), "early.json", "a1", "/foo");
        let later = write_ir(dir.path(), "later.json", "b2", "/bar");
        let output = dir.path().join("merged.json");

        diff(&Config::default(), early, later, None, Some(output.as_path()), false)
            .await
            .unwrap();

        let value = read_json(&output);
        assert_eq!(value["gitCommitId"], "b2");
        assert_eq!(value["links"]["X --> Y"]["color"], "yellow");
        assert_eq!(value["links"]["X --> Y"]["requests"][0]["destinationUrl"], "/bar");
    }

    #[tokio::test]
    async fn test_diff_summary_still_writes_output_file() {
        let dir = tempdir().unwrap();
        let early = write_ir(dir.path(), "early.json", "a1", "/foo");
        let later = write_ir(dir.path(), "later.json", "b2", "/bar");
        let output = dir.path().join("merged.json");
        let config = Config {
            output: Some(output.clone()),
            ..Config::default()
        };

        diff(&config, early, later, None, None, true).await.unwrap();

        let value = read_json(&output);
        assert_eq!(value["gitCommitId"], "b2");
    }
}
