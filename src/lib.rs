//! dbt-lineage - Render dbt project lineage as clustered Graphviz diagrams
//!
//! Reads a dbt `manifest.json`, groups models, sources and seeds into
//! clusters, and renders the dependency graph as a DOT description that
//! Graphviz can export or a browser can preview.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod manifest;
pub mod render;

// Re-export main types
pub use config::Config;
pub use error::{Error, Result};
pub use export::{export, preview, Engine, Graphviz, OutputFormat, SystemViewer, Viewer};
pub use graph::{classify, normalize_id, Edge, Graph, GraphStats, Node, ResourceKind};
pub use manifest::{Manifest, RawEntity, RawRecord};
pub use render::{render, Palette, Theme, TooltipField};
