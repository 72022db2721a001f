// Rendering of a lineage graph into a Graphviz DOT description

pub mod dot;
pub mod palette;

pub use dot::*;
pub use palette::*;

use crate::graph::{Graph, Node, ResourceKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

const FONT_NAME: &str = "Courier New";
const DEFAULT_SHAPE: &str = "box";

/// Which node field feeds the tooltip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TooltipField {
    #[default]
    CompiledSql,
    RawSql,
    Description,
    None,
}

impl TooltipField {
    /// Tooltip text for a node; missing text yields an empty string
    pub fn text<'a>(&self, node: &'a Node) -> &'a str {
        match self {
            TooltipField::CompiledSql => node.compiled_sql.as_deref().unwrap_or(""),
            TooltipField::RawSql => node.raw_sql.as_deref().unwrap_or(""),
            TooltipField::Description => &node.description,
            TooltipField::None => "",
        }
    }
}

/// Presentation options for [`render`]
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub title: String,
    pub palette: Palette,
    /// Shape per entity kind; unmapped kinds are drawn as boxes
    pub shapes: BTreeMap<ResourceKind, String>,
    pub font_color: String,
    pub tooltip: TooltipField,
    /// Clusters drawn as bordered, same-rank boxes
    pub subgraph_clusters: BTreeSet<String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: "Data Model".to_string(),
            palette: Palette::default(),
            shapes: BTreeMap::new(),
            font_color: "white".to_string(),
            tooltip: TooltipField::default(),
            subgraph_clusters: ["source", "staging"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Theme {
    fn shape(&self, kind: ResourceKind) -> &str {
        self.shapes
            .get(&kind)
            .map(String::as_str)
            .unwrap_or(DEFAULT_SHAPE)
    }

    fn is_boxed(&self, cluster: &str) -> bool {
        self.subgraph_clusters.contains(cluster)
    }
}

/// Render a graph as a DOT description.
///
/// Clusters are emitted in graph order, each as its own subgraph, followed
/// by every edge in stored order. Edges to ids with no node declaration are
/// written unchanged.
pub fn render(graph: &Graph, theme: &Theme) -> String {
    let clusters = graph.clusters();
    if clusters.len() > theme.palette.len() {
        warn!(
            clusters = clusters.len(),
            colors = theme.palette.len(),
            "more clusters than palette colors, colors will repeat"
        );
    }
    let colors = theme.palette.assign(clusters.keys().map(String::as_str));

    let mut dot = DotBuilder::new("lineage");
    dot.attr("label", &format!("{}\n\n", theme.title))
        .attr("labelloc", "t")
        .attr("fontname", FONT_NAME)
        .attr("fontsize", "20")
        .attr("layout", "dot")
        .attr("rankdir", "LR")
        .attr("newrank", "true")
        .node_defaults(&[
            ("style", "rounded,filled"),
            ("shape", DEFAULT_SHAPE),
            ("fontname", FONT_NAME),
        ])
        .edge_defaults(&[("arrowsize", "1"), ("penwidth", "2")])
        .blank();

    for (cluster, members) in clusters {
        let boxed = theme.is_boxed(cluster);
        let color = colors.get(cluster.as_str()).copied().unwrap_or_default();

        dot.start_subgraph(cluster, boxed)
            .attr("label", cluster)
            .attr("style", "rounded");
        if boxed {
            dot.attr("rank", "same");
        }

        for node in members.iter().filter_map(|id| graph.node(id)) {
            dot.node(
                &node.id,
                &[
                    ("label", node.name.as_str()),
                    ("color", color),
                    ("fillcolor", color),
                    ("fontcolor", theme.font_color.as_str()),
                    ("shape", theme.shape(node.kind)),
                    ("tooltip", theme.tooltip.text(node)),
                ],
            );
        }
        dot.end_subgraph().blank();
    }

    for edge in graph.edges() {
        dot.edge(&edge.parent, &edge.child);
    }

    dot.build()
}
