//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Render dbt project lineage as clustered Graphviz diagrams
#[derive(Parser, Debug)]
#[command(name = "dbt-lineage")]
#[command(about = "Render dbt project lineage as clustered Graphviz diagrams")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Export the lineage graph to a file
    Export {
        /// Path to the dbt manifest [default: target/manifest.json]
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Output path, the format extension is appended [default: graph]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (svg, png, pdf, jpg, dot) [default: svg]
        #[arg(short, long)]
        format: Option<String>,

        /// Config file path [default: dbt_lineage.toml]
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Graph title
        #[arg(long)]
        title: Option<String>,
    },

    /// Render the lineage graph to SVG and open it in the default viewer
    Preview {
        /// Path to the dbt manifest [default: target/manifest.json]
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Config file path [default: dbt_lineage.toml]
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Graph title
        #[arg(long)]
        title: Option<String>,
    },

    /// Write a starter config file with the defaults
    Init {
        /// Where to write the config [default: dbt_lineage.toml]
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
