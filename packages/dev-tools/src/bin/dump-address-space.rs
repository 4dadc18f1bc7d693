//! Dump the standard address space as a browse tree
//!
//! Environment:
//! - `UASPACE_CONFIG` - optional path to an `AddressSpaceConfig` JSON file
//! - `UASPACE_ROOT` - node to start from (default `i=84`, the Root folder)
//! - `UASPACE_MAX_DEPTH` - maximum tree depth (default 4)
//! - `RUST_LOG` - log filter (default `info`)
//!
//! Pass `--json` to print the load summary and integrity report as JSON instead
//! of the tree.

use std::collections::HashSet;
use std::env;

use anyhow::Context;
use uaspace_core::db::NodeManager;
use uaspace_core::models::{ids, BrowseDirection, NodeId};
use uaspace_core::services::{bootstrap, check_integrity};
use uaspace_core::AddressSpaceConfig;

fn print_tree(
    manager: &NodeManager,
    id: &NodeId,
    depth: usize,
    max_depth: usize,
    visited: &mut HashSet<NodeId>,
) -> anyhow::Result<()> {
    let indent = "  ".repeat(depth);
    let node = match manager.get_node(id) {
        Ok(node) => node,
        Err(_) => {
            println!("{}{} (missing)", indent, id);
            return Ok(());
        }
    };

    println!(
        "{}{} [{}] {}",
        indent,
        node.browse_name,
        node.node_class(),
        node.id
    );

    if depth >= max_depth || !visited.insert(node.id.clone()) {
        return Ok(());
    }

    let children = manager.browse(
        &node.id,
        &ids::HIERARCHICAL_REFERENCES,
        true,
        BrowseDirection::Forward,
    )?;
    for child in children {
        if let Some(child_id) = child.target_id.local() {
            print_tree(manager, child_id, depth + 1, max_depth, visited)?;
        } else {
            println!("{}  {} (remote)", indent, child.target_id);
        }
    }

    Ok(())
}

/// Configuration actually used for loading
///
/// The JSON report runs the integrity pass itself, so the load skips it.
fn load_config(mut config: AddressSpaceConfig, json_output: bool) -> AddressSpaceConfig {
    if json_output {
        config.check_integrity_after_load = false;
    }
    config
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match env::var("UASPACE_CONFIG") {
        Ok(path) => AddressSpaceConfig::from_path(&path)
            .with_context(|| format!("loading configuration from {}", path))?,
        Err(_) => AddressSpaceConfig::default(),
    };

    let root: NodeId = env::var("UASPACE_ROOT")
        .ok()
        .map(|s| s.parse::<NodeId>())
        .transpose()
        .context("parsing UASPACE_ROOT")?
        .unwrap_or(ids::ROOT_FOLDER);

    let max_depth = env::var("UASPACE_MAX_DEPTH")
        .ok()
        .and_then(|d| d.parse::<usize>().ok())
        .unwrap_or(4);

    let json_output = env::args().any(|arg| arg == "--json");
    let config = load_config(config, json_output);

    let (manager, summary) = bootstrap(&config)?;
    tracing::info!("Address space ready: {:?}", manager.stats());

    if json_output {
        let report = check_integrity(&manager);
        let output = serde_json::json!({
            "summary": summary,
            "stats": manager.stats(),
            "integrity": report,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_tree(&manager, &root, 0, max_depth, &mut HashSet::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_report_runs_integrity_once() {
        let config = load_config(AddressSpaceConfig::default(), true);
        assert!(!config.check_integrity_after_load);

        let (manager, _) = bootstrap(&config).unwrap();
        let report = check_integrity(&manager);
        assert!(report.is_clean(), "{:?}", report);
    }

    #[test]
    fn test_tree_output_keeps_configured_integrity_pass() {
        let config = load_config(AddressSpaceConfig::default(), false);
        assert!(config.check_integrity_after_load);
    }
}
