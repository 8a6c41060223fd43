//! Human-readable renderings of diffs and graph statistics.

use colored::Colorize;
use msdelta_graph::{BuildStats, ChangeStatus, GraphDiff, MsGraph};

/// Change report for a diff of `early_commit` against the merged graph.
pub fn diff_summary(diff: &GraphDiff, early_commit: &str) -> String {
    let s = &diff.summary;
    let mut lines = vec![
        format!(
            "{} {} → {}",
            "Changes".cyan().bold(),
            display_commit(early_commit),
            display_commit(&diff.merged.git_commit_id)
        ),
        format!(
            "  {} {} {} ({} unchanged)",
            "Nodes:   ".dimmed(),
            format!("+{}", s.nodes_added).green(),
            format!("-{}", s.nodes_removed).red(),
            s.nodes_unmodified
        ),
        format!(
            "  {} {} {} ({} in both)",
            "Links:   ".dimmed(),
            format!("+{}", s.links_added).green(),
            format!("-{}", s.links_removed).red(),
            s.links_unmodified
        ),
        format!(
            "  {} {} {}",
            "Requests:".dimmed(),
            format!("+{}", s.requests_added).green(),
            format!("-{}", s.requests_removed).red()
        ),
    ];

    if s.is_empty() {
        lines.push(String::new());
        lines.push("No structural changes".dimmed().to_string());
        return lines.join("\n");
    }

    lines.push(String::new());

    for node in &diff.merged.nodes {
        match node.color {
            ChangeStatus::Added => lines.push(format!("  {} {}", "+".green(), node.name)),
            ChangeStatus::Removed => lines.push(format!("  {} {}", "-".red(), node.name)),
            _ => {}
        }
    }

    for (key, link) in diff.merged.links.iter() {
        match link.color {
            ChangeStatus::Added => lines.push(format!(
                "  {} {} ({} requests)",
                "+".green(),
                key,
                link.requests.len()
            )),
            ChangeStatus::Removed => lines.push(format!(
                "  {} {} ({} requests)",
                "-".red(),
                key,
                link.requests.len()
            )),
            _ => {
                let Some(delta) = diff.request_delta(key) else {
                    continue;
                };
                if delta.is_identical() {
                    continue;
                }
                lines.push(format!(
                    "  {} {} ({} {} requests)",
                    "~".yellow(),
                    key,
                    format!("+{}", delta.added.len()).green(),
                    format!("-{}", delta.removed.len()).red()
                ));
                for request in &delta.added {
                    lines.push(format!(
                        "      {} {} {}",
                        "+".green(),
                        request.verb.as_deref().unwrap_or("?"),
                        request.destination_url
                    ));
                }
                for request in &delta.removed {
                    lines.push(format!(
                        "      {} {} {}",
                        "-".red(),
                        request.verb.as_deref().unwrap_or("?"),
                        request.destination_url
                    ));
                }
            }
        }
    }

    lines.join("\n")
}

/// Statistics report for one snapshot.
pub fn stats_summary(graph: &MsGraph, stats: &BuildStats, cycles: &[Vec<String>]) -> String {
    let mut lines = vec![
        format!(
            "{} {}",
            "Graph".cyan().bold(),
            display_commit(&graph.git_commit_id)
        ),
        String::new(),
        format!("  {} {}", "Services:".dimmed(), graph.node_count()),
        format!("  {} {}", "Links:   ".dimmed(), graph.link_count()),
        format!("  {} {}", "Requests:".dimmed(), stats.requests),
        format!(
            "  {} {} seen, {} local, {} unresolved, {} self calls",
            "Calls:   ".dimmed(),
            stats.calls_seen,
            stats.calls_without_url,
            stats.unresolved_calls.to_string().yellow(),
            stats.self_loops
        ),
    ];

    if cycles.is_empty() {
        lines.push(format!("  {} none", "Cycles:  ".dimmed()));
    } else {
        lines.push(format!(
            "  {} {}",
            "Cycles:  ".dimmed(),
            cycles.len().to_string().red()
        ));
        for cycle in cycles {
            lines.push(format!("    • {}", cycle.join(" ⇄ ")));
        }
    }

    lines.join("\n")
}

fn display_commit(commit: &str) -> &str {
    if commit.is_empty() {
        "(no commit)"
    } else {
        commit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msdelta_graph::{diff_graphs, Request, ServiceNode};
    use serde_json::json;

    fn request(url: &str) -> Request {
        Request {
            destination_url: url.to_string(),
            source_method: "run".into(),
            endpoint_function: "exchange".into(),
            class_name: "Client".into(),
            destination_class_name: "Controller".into(),
            verb: Some("GET".into()),
            argument: json!([]),
            ms_return: "void".into(),
        }
    }

    fn graph(commit: &str, nodes: &[&str], links: &[(&str, &str, &str)]) -> MsGraph {
        let mut g = MsGraph::new(commit);
        for name in nodes {
            g.nodes.push(ServiceNode::new(*name, format!("/{}", name)));
        }
        for (source, target, url) in links {
            g.links
                .get_or_create(source, target)
                .requests
                .push(request(url));
        }
        g
    }

    #[test]
    fn test_diff_summary_lists_changes() {
        colored::control::set_override(false);

        let early = graph("a1", &["X", "Y"], &[("X", "Y", "/foo"), ("Y", "X", "/cb")]);
        let later = graph(
            "b2",
            &["X", "Z"],
            &[("X", "Z", "/bar"), ("Y", "X", "/cb"), ("Y", "X", "/cb2")],
        );
        let diff = diff_graphs(&early, &later);
        let text = diff_summary(&diff, &early.git_commit_id);

        assert!(text.contains("a1 → b2"));
        assert!(text.contains("+ Z"));
        assert!(text.contains("- Y"));
        assert!(text.contains("+ X --> Z (1 requests)"));
        assert!(text.contains("- X --> Y (1 requests)"));
        assert!(text.contains("~ Y --> X (+1 -0 requests)"));
        assert!(text.contains("+ GET /cb2"));
    }

    #[test]
    fn test_identical_snapshots_report_no_changes() {
        colored::control::set_override(false);

        let g = graph("", &["X", "Y"], &[("X", "Y", "/foo")]);
        let text = diff_summary(&diff_graphs(&g, &g), "");
        assert!(text.contains("No structural changes"));
        assert!(text.contains("(no commit)"));
    }

    #[test]
    fn test_stats_summary_lists_cycles() {
        colored::control::set_override(false);

        let g = graph("c", &["a", "b"], &[("a", "b", "/b"), ("b", "a", "/a")]);
        let stats = BuildStats {
            requests: 2,
            ..BuildStats::default()
        };
        let text = stats_summary(&g, &stats, &g.dependency_cycles());

        assert!(text.contains("Services: 2"));
        assert!(text.contains("a ⇄ b"));
    }
}
