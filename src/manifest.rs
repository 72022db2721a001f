// Manifest model
//
// Serde view of the dbt `manifest.json` artifact. Only the fields the
// lineage graph needs are modeled; everything else is ignored.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// The parsed manifest document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// Primary entities (models, seeds, tests, snapshots, ...)
    #[serde(default)]
    pub nodes: IndexMap<String, RawEntity>,
    /// External-source entities
    #[serde(default)]
    pub sources: IndexMap<String, RawEntity>,
}

/// A raw manifest entity, discriminated by its declared `resource_type`.
///
/// Kinds that never take part in the lineage graph collapse into
/// [`RawEntity::Other`] without their fields being inspected.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "resource_type", rename_all = "lowercase")]
pub enum RawEntity {
    Model(RawRecord),
    Source(RawRecord),
    Seed(RawRecord),
    #[serde(other)]
    Other,
}

/// Fields shared by every graph-eligible entity
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub unique_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Fully qualified name: project, then directory segments, then name
    pub fqn: Vec<String>,
    #[serde(default, alias = "raw_code")]
    pub raw_sql: Option<String>,
    #[serde(default, alias = "compiled_code")]
    pub compiled_sql: Option<String>,
    #[serde(default)]
    pub depends_on: Option<DependsOn>,
}

/// Upstream references of an entity
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DependsOn {
    #[serde(default)]
    pub nodes: Vec<String>,
}

impl RawRecord {
    /// Upstream unique ids; an absent `depends_on` reads as empty
    pub fn dependencies(&self) -> &[String] {
        self.depends_on
            .as_ref()
            .map(|d| d.nodes.as_slice())
            .unwrap_or(&[])
    }
}

impl Manifest {
    /// Parse a manifest from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::PathNotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Merge primary and source entities into one ordered map.
    ///
    /// Primary entities come first, then sources, each in document order.
    /// A key present in both keeps its primary position but takes the
    /// source value.
    pub fn entities(&self) -> IndexMap<&str, &RawEntity> {
        let mut merged = IndexMap::with_capacity(self.nodes.len() + self.sources.len());
        for (key, entity) in self.nodes.iter().chain(self.sources.iter()) {
            merged.insert(key.as_str(), entity);
        }
        merged
    }
}
