// Export and preview
//
// Hands a rendered description to Graphviz and, for previews, to the
// system viewer. Both are reached through small traits so the pipeline can
// run without either installed.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;
use tracing::{debug, info};

/// Target file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
    Pdf,
    Jpg,
    /// The DOT description itself, no layout engine involved
    Dot,
}

impl OutputFormat {
    /// File extension, also the Graphviz `-T` value
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Dot => "dot",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            "pdf" => Ok(OutputFormat::Pdf),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpg),
            "dot" | "gv" => Ok(OutputFormat::Dot),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Turns a DOT description into a file
pub trait Engine {
    fn render(&self, description: &str, format: OutputFormat, output: &Path) -> Result<()>;
}

/// Opens a rendered file for the user
pub trait Viewer {
    fn open(&self, path: &Path) -> Result<()>;
}

/// Graphviz command-line engine
#[derive(Debug, Clone)]
pub struct Graphviz {
    program: String,
}

impl Graphviz {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Graphviz {
    fn default() -> Self {
        Self::new("dot")
    }
}

impl Engine for Graphviz {
    fn render(&self, description: &str, format: OutputFormat, output: &Path) -> Result<()> {
        if format == OutputFormat::Dot {
            std::fs::write(output, description)?;
            return Ok(());
        }

        debug!(program = %self.program, %format, output = %output.display(), "running layout engine");
        let mut child = Command::new(&self.program)
            .arg(format!("-T{}", format.extension()))
            .arg("-o")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::engine(format!("failed to run `{}`: {}", self.program, e)))?;

        // An engine that exits early closes its stdin; its own status wins
        // over the broken pipe
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(description.as_bytes()),
            None => Ok(()),
        };

        let result = child.wait_with_output()?;
        if !result.status.success() {
            return Err(Error::engine(format!(
                "`{}` failed (exit={}): {}",
                self.program,
                result.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }
        written?;
        Ok(())
    }
}

/// The platform's default file opener
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemViewer;

impl Viewer for SystemViewer {
    fn open(&self, path: &Path) -> Result<()> {
        let mut cmd = if cfg!(target_os = "macos") {
            Command::new("open")
        } else if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", ""]);
            cmd
        } else {
            Command::new("xdg-open")
        };

        let status = cmd
            .arg(path)
            .status()
            .map_err(|e| Error::viewer(format!("failed to launch viewer: {}", e)))?;
        if !status.success() {
            return Err(Error::viewer(format!(
                "viewer exited with status {}",
                status.code().unwrap_or(-1)
            )));
        }
        Ok(())
    }
}

/// Path with the format extension appended, unless already present
pub fn output_path(path: &Path, format: OutputFormat) -> PathBuf {
    if path.extension() == Some(OsStr::new(format.extension())) {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(format.extension());
    PathBuf::from(name)
}

/// Write the description to `path` in the given format, returning the file written
pub fn export(
    description: &str,
    path: &Path,
    format: OutputFormat,
    engine: &dyn Engine,
) -> Result<PathBuf> {
    let output = output_path(path, format);
    engine.render(description, format, &output)?;
    info!(path = %output.display(), "graph exported");
    Ok(output)
}

/// Render an SVG into a fresh temporary file and open it
pub fn preview(description: &str, engine: &dyn Engine, viewer: &dyn Viewer) -> Result<PathBuf> {
    let path = tempfile::Builder::new()
        .prefix("dbt-lineage-")
        .suffix(".svg")
        .tempfile()?
        .into_temp_path()
        .keep()?;

    engine.render(description, OutputFormat::Svg, &path)?;
    info!(path = %path.display(), "opening preview");
    viewer.open(&path)?;
    Ok(path)
}
