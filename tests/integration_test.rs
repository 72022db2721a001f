// Integration tests for dbt-lineage

use assert_cmd::Command;
use dbt_lineage::{
    export, normalize_id, render, Config, Edge, Graph, Manifest, OutputFormat, Palette,
    ResourceKind, Theme,
};
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixtures_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn jaffle_shop() -> Graph {
    let manifest = Manifest::load(&fixtures_path("manifest.json")).expect("Failed to load manifest");
    Graph::from_manifest(&manifest).expect("Failed to build graph")
}

fn bin(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dbt-lineage").unwrap();
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Graph Tests
// ============================================================================

#[test]
fn test_only_recognized_kinds() {
    let graph = jaffle_shop();

    assert_eq!(graph.nodes().len(), 7);
    assert!(graph.node("snapshot_jaffle_shop_orders_snapshot").is_none());
    assert!(graph.node("test_jaffle_shop_not_null_fct_orders_order_id").is_none());
    assert!(graph
        .nodes()
        .values()
        .all(|n| matches!(n.kind, ResourceKind::Model | ResourceKind::Source | ResourceKind::Seed)));
}

#[test]
fn test_cluster_discovery_order() {
    let graph = jaffle_shop();

    let clusters: Vec<&str> = graph.clusters().keys().map(String::as_str).collect();
    assert_eq!(clusters, vec!["staging", "seed", "intermediate", "marts", "source"]);
    assert_eq!(
        graph.clusters()["staging"],
        vec!["model_jaffle_shop_stg_orders", "model_jaffle_shop_stg_customers"]
    );
    assert_eq!(graph.cluster_of("seed_jaffle_shop_country_codes"), Some("seed"));
}

#[test]
fn test_every_node_in_exactly_one_cluster() {
    let graph = jaffle_shop();

    for id in graph.nodes().keys() {
        let hits = graph.clusters().values().filter(|ids| ids.contains(id)).count();
        assert_eq!(hits, 1, "{} should be in one cluster", id);
    }
}

#[test]
fn test_edges_match_dependency_counts() {
    let graph = jaffle_shop();

    let declared: usize = graph.nodes().values().map(|n| n.dependencies.len()).sum();
    assert_eq!(graph.edges().len(), declared);
    assert_eq!(graph.edges().len(), 7);
    assert!(graph.edges().contains(&Edge::new(
        "source_jaffle_shop_shop_orders",
        "model_jaffle_shop_stg_orders"
    )));
}

#[test]
fn test_dangling_snapshot_edge() {
    let graph = jaffle_shop();

    let dangling: Vec<&Edge> = graph
        .edges()
        .iter()
        .filter(|e| graph.node(&e.parent).is_none())
        .collect();
    assert_eq!(
        dangling,
        vec![&Edge::new(
            normalize_id("snapshot.jaffle_shop.orders_snapshot"),
            "model_jaffle_shop_fct_orders"
        )]
    );
    assert_eq!(graph.stats().dangling_edges, 1);
}

#[test]
fn test_build_twice_is_identical() {
    let first = jaffle_shop();
    let second = jaffle_shop();

    let a: Vec<_> = first.clusters().iter().collect();
    let b: Vec<_> = second.clusters().iter().collect();
    assert_eq!(a, b);
    assert_eq!(first.edges(), second.edges());
}

#[test]
fn test_end_to_end_two_entities() {
    let manifest = Manifest::from_json(
        r#"{
            "nodes": {
                "mdl_b": {"unique_id": "mdl_b", "name": "b", "resource_type": "model",
                          "fqn": ["p", "staging", "b"], "depends_on": {"nodes": ["src_a"]}}
            },
            "sources": {
                "src_a": {"unique_id": "src_a", "name": "a", "resource_type": "source",
                          "fqn": ["p", "source", "a"]}
            }
        }"#,
    )
    .unwrap();
    let graph = Graph::from_manifest(&manifest).unwrap();

    assert_eq!(graph.nodes().len(), 2);
    assert_eq!(graph.edges(), &[Edge::new("src_a", "mdl_b")]);

    let dot = render(&graph, &Theme::default());
    assert_eq!(dot.matches("subgraph ").count(), 2);
    assert_eq!(dot.matches(" -> ").count(), 1);
    assert!(dot.contains("\"src_a\" -> \"mdl_b\";"));
}

// ============================================================================
// Rendering Tests
// ============================================================================

#[test]
fn test_render_default_theme() {
    let graph = jaffle_shop();
    let theme = Config::default().theme.to_theme().unwrap();
    let dot = render(&graph, &theme);

    assert!(dot.contains("subgraph \"cluster_staging\" {"));
    assert!(dot.contains("subgraph \"cluster_source\" {"));
    assert!(dot.contains("subgraph \"intermediate\" {"));
    assert!(dot.contains("subgraph \"marts\" {"));
    assert!(dot.contains("subgraph \"seed\" {"));

    // Shapes from the default config
    assert!(dot.contains("\"source_jaffle_shop_shop_orders\" [label=\"orders\", color=\"#3d7ab8\""));
    assert!(dot.contains("shape=\"cylinder\""));
    assert!(dot.contains("shape=\"note\""));

    // Dangling parents are referenced, never declared
    assert!(dot.contains("\"snapshot_jaffle_shop_orders_snapshot\" -> \"model_jaffle_shop_fct_orders\";"));
    assert!(!dot.contains("\"snapshot_jaffle_shop_orders_snapshot\" ["));
}

#[test]
fn test_render_only_staging_boxed() {
    let graph = jaffle_shop();
    let theme = Theme {
        subgraph_clusters: ["staging".to_string()].into_iter().collect(),
        ..Theme::default()
    };
    let dot = render(&graph, &theme);

    for line in dot.lines().filter(|l| l.trim_start().starts_with("subgraph")) {
        if line.contains("staging") {
            assert!(line.contains("\"cluster_staging\""), "{}", line);
        } else {
            assert!(!line.contains("cluster_"), "{}", line);
        }
    }
}

#[test]
fn test_render_small_palette_cycles() {
    let graph = jaffle_shop();
    let theme = Theme {
        palette: Palette::new(vec!["#aaaaaa".to_string(), "#bbbbbb".to_string()]).unwrap(),
        ..Theme::default()
    };
    let dot = render(&graph, &theme);

    // Fifth cluster (source) wraps around to the first color
    assert!(dot.contains("\"source_jaffle_shop_shop_orders\" [label=\"orders\", color=\"#aaaaaa\""));
    assert!(dot.contains("\"seed_jaffle_shop_country_codes\" [label=\"country_codes\", color=\"#bbbbbb\""));
}

#[test]
fn test_render_is_byte_identical() {
    let graph = jaffle_shop();
    let theme = Theme::default();
    assert_eq!(render(&graph, &theme), render(&graph, &theme));
}

#[test]
fn test_export_dot_file() {
    let graph = jaffle_shop();
    let dot = render(&graph, &Theme::default());
    let dir = TempDir::new().unwrap();

    let written = export(
        &dot,
        &dir.path().join("lineage"),
        OutputFormat::Dot,
        &dbt_lineage::Graphviz::default(),
    )
    .unwrap();

    assert_eq!(written, dir.path().join("lineage.dot"));
    assert_eq!(std::fs::read_to_string(written).unwrap(), dot);
}

// ============================================================================
// CLI Tests
// ============================================================================

#[test]
fn test_cli_export_dot() {
    let dir = TempDir::new().unwrap();

    bin(&dir)
        .args(["export", "--format", "dot", "-o", "lineage", "-m"])
        .arg(fixtures_path("manifest.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("7 nodes in 5 clusters, 7 edges"))
        .stdout(predicate::str::contains("Graph written to"));

    let dot = std::fs::read_to_string(dir.path().join("lineage.dot")).unwrap();
    assert!(dot.contains("subgraph \"cluster_staging\""));
    assert!(dot.contains("label=\"Data Model\\n\\n\";"));
}

#[test]
fn test_cli_export_uses_user_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("dbt_lineage.toml"),
        "[theme]\ntitle = \"Jaffle Shop\"\n\n[output]\nformat = \"dot\"\n",
    )
    .unwrap();

    bin(&dir)
        .args(["export", "-m"])
        .arg(fixtures_path("manifest.json"))
        .assert()
        .success();

    let dot = std::fs::read_to_string(dir.path().join("graph.dot")).unwrap();
    assert!(dot.contains("label=\"Jaffle Shop\\n\\n\";"));
}

#[test]
fn test_cli_title_flag_overrides_config() {
    let dir = TempDir::new().unwrap();

    bin(&dir)
        .args(["export", "-f", "dot", "--title", "Override", "-m"])
        .arg(fixtures_path("manifest.json"))
        .assert()
        .success();

    let dot = std::fs::read_to_string(dir.path().join("graph.dot")).unwrap();
    assert!(dot.contains("label=\"Override\\n\\n\";"));
}

#[test]
fn test_cli_missing_manifest() {
    let dir = TempDir::new().unwrap();

    bin(&dir)
        .args(["export", "-f", "dot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path not found: target/manifest.json"));
}

#[test]
fn test_cli_unknown_format() {
    let dir = TempDir::new().unwrap();

    bin(&dir)
        .args(["export", "-f", "bmp", "-m"])
        .arg(fixtures_path("manifest.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown output format: bmp"));
}

#[test]
fn test_cli_malformed_manifest() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("manifest.json");
    std::fs::write(
        &manifest,
        r#"{"nodes": {"m": {"unique_id": "model.p.m", "name": "m", "resource_type": "model", "fqn": ["p"]}}}"#,
    )
    .unwrap();

    bin(&dir)
        .args(["export", "-f", "dot", "-m"])
        .arg(&manifest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed manifest record model.p.m"));
    assert!(!dir.path().join("graph.dot").exists());
}

#[test]
fn test_cli_init() {
    let dir = TempDir::new().unwrap();

    bin(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created dbt_lineage.toml"));

    let written = std::fs::read_to_string(dir.path().join("dbt_lineage.toml")).unwrap();
    assert_eq!(written, dbt_lineage::config::DEFAULT_CONFIG);

    bin(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Will not overwrite"));
}
