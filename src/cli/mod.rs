//! CLI module for dbt-lineage

mod args;

pub use args::{Args, Command};

use crate::config::{Config, DEFAULT_CONFIG, USER_CONFIG_FILE};
use crate::error::{Error, Result};
use crate::export::{export, preview, Graphviz, SystemViewer};
use crate::graph::Graph;
use crate::manifest::Manifest;
use crate::render::render;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();
    init_logging(args.verbose);

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over the verbosity flag
fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn execute(args: Args) -> Result<()> {
    match args.command {
        Command::Export {
            manifest,
            output,
            format,
            config,
            title,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            cfg.merge_cli(manifest, output, format, title)?;

            let description = describe(&cfg)?;
            let engine = Graphviz::new(cfg.output.engine.as_str());
            let written = export(&description, &cfg.output.path, cfg.output.format, &engine)?;

            println!("Graph written to: {}", written.display());
            Ok(())
        }

        Command::Preview {
            manifest,
            config,
            title,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            cfg.merge_cli(manifest, None, None, title)?;

            let description = describe(&cfg)?;
            let engine = Graphviz::new(cfg.output.engine.as_str());
            let path = preview(&description, &engine, &SystemViewer)?;

            println!("Preview opened: {}", path.display());
            Ok(())
        }

        Command::Init { config, force } => {
            let path = config.unwrap_or_else(|| PathBuf::from(USER_CONFIG_FILE));
            if path.exists() && !force {
                println!(
                    "Config file already present at {}. Will not overwrite (use --force)",
                    path.display()
                );
                return Ok(());
            }

            std::fs::write(&path, DEFAULT_CONFIG)?;
            println!("Created {}", path.display());
            Ok(())
        }
    }
}

/// An explicit config path must exist; the default one is optional
fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) if !path.exists() => Err(Error::PathNotFound(path.to_path_buf())),
        Some(path) => Config::load(path),
        None => Ok(Config::load_or_default(Path::new(USER_CONFIG_FILE))),
    }
}

/// Manifest -> graph -> DOT description
fn describe(cfg: &Config) -> Result<String> {
    let theme = cfg.theme.to_theme()?;
    let manifest = Manifest::load(&cfg.output.manifest)?;
    let graph = Graph::from_manifest(&manifest)?;

    let stats = graph.stats();
    println!(
        "Lineage graph: {} nodes in {} clusters, {} edges",
        stats.nodes, stats.clusters, stats.edges
    );
    if stats.dangling_edges > 0 {
        println!(
            "  {} edges point at entities outside the graph",
            stats.dangling_edges
        );
    }

    Ok(render(&graph, &theme))
}
