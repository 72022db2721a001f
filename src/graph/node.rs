// Node model and classifier

use crate::error::{Error, Result};
use crate::manifest::{RawEntity, RawRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cluster key shared by every seed entity
pub const SEED_CLUSTER: &str = "seed";

/// Entity kinds that take part in the lineage graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A modeled table or view
    Model,
    /// A raw external source
    Source,
    /// A seed file
    Seed,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Model => "model",
            ResourceKind::Source => "source",
            ResourceKind::Seed => "seed",
        }
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "model" => Ok(ResourceKind::Model),
            "source" => Ok(ResourceKind::Source),
            "seed" => Ok(ResourceKind::Seed),
            other => Err(Error::config_validation(format!(
                "unknown entity kind '{}', expected model, source or seed",
                other
            ))),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One graph-eligible entity after classification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Normalized unique id, safe to embed in DOT output
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: ResourceKind,
    /// Path segments (dbt `fqn`)
    pub path: Vec<String>,
    /// Raw upstream ids, exactly as listed in the manifest
    pub dependencies: Vec<String>,
    pub raw_sql: Option<String>,
    pub compiled_sql: Option<String>,
    cluster: String,
}

impl Node {
    /// Build a node of the given kind from a raw record.
    ///
    /// Fails when a model or source has fewer than two path segments.
    pub fn from_record(kind: ResourceKind, record: &RawRecord) -> Result<Self> {
        let cluster = match kind {
            ResourceKind::Seed => SEED_CLUSTER.to_string(),
            ResourceKind::Model | ResourceKind::Source => {
                record.fqn.get(1).cloned().ok_or_else(|| {
                    Error::malformed(
                        &record.unique_id,
                        format!(
                            "fqn needs at least 2 segments, found {}",
                            record.fqn.len()
                        ),
                    )
                })?
            }
        };

        Ok(Self {
            id: normalize_id(&record.unique_id),
            name: record.name.clone(),
            description: record.description.clone(),
            kind,
            path: record.fqn.clone(),
            dependencies: record.dependencies().to_vec(),
            raw_sql: record.raw_sql.clone(),
            compiled_sql: record.compiled_sql.clone(),
            cluster,
        })
    }

    /// Grouping key, fixed at construction
    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    /// Normalized ids of upstream entities
    pub fn parent_ids(&self) -> impl Iterator<Item = String> + '_ {
        self.dependencies.iter().map(|d| normalize_id(d))
    }
}

/// Classify a raw entity, returning `None` for kinds outside the graph
pub fn classify(entity: &RawEntity) -> Result<Option<Node>> {
    let (kind, record) = match entity {
        RawEntity::Model(record) => (ResourceKind::Model, record),
        RawEntity::Source(record) => (ResourceKind::Source, record),
        RawEntity::Seed(record) => (ResourceKind::Seed, record),
        RawEntity::Other => return Ok(None),
    };
    Node::from_record(kind, record).map(Some)
}

/// Normalize an id for use as a graph vertex key.
///
/// Every character other than an ASCII letter, digit or underscore becomes
/// `_`. Applied to node ids and to dependency references alike.
pub fn normalize_id(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
