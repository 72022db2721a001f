use crate::error::{Error, Result};
use crate::export::OutputFormat;
use crate::graph::ResourceKind;
use crate::render::{Palette, Theme, TooltipField, PALETTE_NAMES};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// File name looked up in the working directory
pub const USER_CONFIG_FILE: &str = "dbt_lineage.toml";

/// The documented default config, written by `dbt-lineage init`
pub const DEFAULT_CONFIG: &str = include_str!("../assets/dbt_lineage.toml");

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: ThemeConfig,
    pub output: OutputConfig,
}

/// Diagram styling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub title: String,
    /// Built-in palette name
    pub palette: String,
    /// Explicit colors, used instead of `palette` when non-empty
    pub colors: Vec<String>,
    pub font_color: String,
    pub tooltip: TooltipField,
    /// Clusters drawn as bordered boxes
    pub subgraph_clusters: Vec<String>,
    /// Entity kind name -> DOT shape, listed kinds override the defaults
    #[serde(deserialize_with = "merge_shapes")]
    pub shapes: BTreeMap<String, String>,
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Manifest to read
    pub manifest: PathBuf,
    /// Export target, extension added from `format`
    pub path: PathBuf,
    pub format: OutputFormat,
    /// Graphviz executable; the layout itself is always `dot`
    pub engine: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            title: "Data Model".to_string(),
            palette: "default".to_string(),
            colors: vec![],
            font_color: "white".to_string(),
            tooltip: TooltipField::CompiledSql,
            subgraph_clusters: vec!["source".to_string(), "staging".to_string()],
            shapes: default_shapes(),
        }
    }
}

fn default_shapes() -> BTreeMap<String, String> {
    [
        (ResourceKind::Model, "box"),
        (ResourceKind::Source, "cylinder"),
        (ResourceKind::Seed, "note"),
    ]
    .into_iter()
    .map(|(kind, shape)| (kind.to_string(), shape.to_string()))
    .collect()
}

/// A `[theme.shapes]` table only overrides the kinds it lists
fn merge_shapes<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let user = BTreeMap::<String, String>::deserialize(deserializer)?;
    let mut shapes = default_shapes();
    shapes.extend(user);
    Ok(shapes)
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("target/manifest.json"),
            path: PathBuf::from("graph"),
            format: OutputFormat::default(),
            engine: "dot".to_string(),
        }
    }
}

impl ThemeConfig {
    /// Resolve the palette: explicit colors win over the named palette
    pub fn resolve_palette(&self) -> Result<Palette> {
        if !self.colors.is_empty() {
            return Palette::new(self.colors.clone());
        }
        Palette::named(&self.palette).ok_or_else(|| {
            Error::config_validation(format!(
                "unknown palette '{}', expected one of: {}",
                self.palette,
                PALETTE_NAMES.join(", ")
            ))
        })
    }

    /// Resolve the shape map into typed entity kinds
    pub fn resolve_shapes(&self) -> Result<BTreeMap<ResourceKind, String>> {
        self.shapes
            .iter()
            .map(|(kind, shape)| {
                if shape.trim().is_empty() {
                    return Err(Error::config_validation(format!(
                        "shape for '{}' must not be empty",
                        kind
                    )));
                }
                Ok((kind.parse::<ResourceKind>()?, shape.clone()))
            })
            .collect()
    }

    /// Build the renderer theme
    pub fn to_theme(&self) -> Result<Theme> {
        Ok(Theme {
            title: self.title.clone(),
            palette: self.resolve_palette()?,
            shapes: self.resolve_shapes()?,
            font_color: self.font_color.clone(),
            tooltip: self.tooltip,
            subgraph_clusters: self.subgraph_clusters.iter().cloned().collect(),
        })
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or return defaults
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "ignoring config file, using defaults");
            Self::default()
        })
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(
        &mut self,
        manifest: Option<PathBuf>,
        output: Option<PathBuf>,
        format: Option<String>,
        title: Option<String>,
    ) -> Result<()> {
        if let Some(manifest) = manifest {
            self.output.manifest = manifest;
        }

        if let Some(out) = output {
            self.output.path = out;
        }

        if let Some(fmt) = format {
            self.output.format = fmt.parse()?;
        }

        if let Some(title) = title {
            self.theme.title = title;
        }

        self.validate()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.theme.title.trim().is_empty() {
            return Err(Error::config_validation("title must not be empty"));
        }

        if self.theme.font_color.trim().is_empty() {
            return Err(Error::config_validation("font_color must not be empty"));
        }

        self.theme.resolve_palette()?;
        self.theme.resolve_shapes()?;

        if self.output.engine.trim().is_empty() {
            return Err(Error::config_validation("engine must not be empty"));
        }

        Ok(())
    }
}
