// SPDX-License-Identifier: MIT OR Apache-2.0
//! `nodeweave` - command-line editor for node program documents.
//!
//! Loads a project document, runs one graph operation on it and writes the
//! result back:
//! - Automatic layout of a node and its producers
//! - Connection wiring and removal
//! - Moving and deleting nodes
//! - Inspecting a node's upstream and downstream closures

mod commands;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use nodeweave_graph::{GridConfig, NodeId, Project};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nodeweave", version, about = "Edit and lay out node program documents")]
struct Cli {
    /// Grid configuration file (RON)
    #[arg(short, long, global = true, env = "NODEWEAVE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DocumentArgs {
    /// Project document (JSON)
    document: PathBuf,

    /// Write the result here instead of overwriting the document
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl DocumentArgs {
    fn destination(&self) -> &Path {
        self.output.as_deref().unwrap_or(&self.document)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out a node and its producer chain on the grid
    Layout {
        #[command(flatten)]
        doc: DocumentArgs,
        /// Node to place
        #[arg(long)]
        node: u32,
        /// Target column x
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        /// Target row y
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
    },
    /// Print a node's direct and transitive connections as JSON
    Inspect {
        /// Project document (JSON)
        document: PathBuf,
        /// Node to inspect
        #[arg(long)]
        node: u32,
    },
    /// Feed an input slot from another node's output
    Connect {
        #[command(flatten)]
        doc: DocumentArgs,
        /// Consuming node
        #[arg(long)]
        to: u32,
        /// Input slot on the consuming node
        #[arg(long)]
        input: usize,
        /// Producing node, or -1 to clear the slot
        #[arg(long, allow_negative_numbers = true)]
        from: i64,
        /// Output index on the producing node
        #[arg(long, default_value_t = 0)]
        output_index: u32,
    },
    /// Clear the connection on an input slot
    Disconnect {
        #[command(flatten)]
        doc: DocumentArgs,
        /// Node owning the slot
        #[arg(long)]
        node: u32,
        /// Input slot
        #[arg(long)]
        input: usize,
    },
    /// Move a node by a delta
    Move {
        #[command(flatten)]
        doc: DocumentArgs,
        /// Node to move
        #[arg(long)]
        node: u32,
        /// Horizontal delta
        #[arg(long, allow_negative_numbers = true)]
        dx: f64,
        /// Vertical delta
        #[arg(long, allow_negative_numbers = true)]
        dy: f64,
        /// Move every upstream node along with it
        #[arg(long)]
        upstream: bool,
    },
    /// Delete a node
    Remove {
        #[command(flatten)]
        doc: DocumentArgs,
        /// Node to delete
        #[arg(long)]
        node: u32,
    },
    /// Write a small laid-out logic circuit
    Demo {
        /// Output document (JSON)
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("nodeweave=info,nodeweave_graph=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let grid = match &cli.config {
        Some(path) => GridConfig::load(path)
            .with_context(|| format!("Failed to load grid config {}", path.display()))?,
        None => GridConfig::default(),
    };

    run(cli.command, grid)
}

fn open(doc: &DocumentArgs, grid: GridConfig) -> Result<Project> {
    Project::load(&doc.document, grid)
        .with_context(|| format!("Failed to open {}", doc.document.display()))
}

fn save(project: &Project, doc: &DocumentArgs) -> Result<()> {
    let path = doc.destination();
    project
        .save(path)
        .with_context(|| format!("Failed to save {}", path.display()))
}

fn run(command: Commands, grid: GridConfig) -> Result<()> {
    match command {
        Commands::Layout { doc, node, x, y } => {
            let project = open(&doc, grid)?;
            let y = commands::layout(&project, NodeId(node), x, y)?;
            tracing::info!("Node {} placed at ({}, {})", node, x, y);
            save(&project, &doc)
        }
        Commands::Inspect { document, node } => {
            let project = Project::load(&document, grid)
                .with_context(|| format!("Failed to open {}", document.display()))?;
            let report = commands::inspect(&project, NodeId(node))?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Commands::Connect {
            doc,
            to,
            input,
            from,
            output_index,
        } => {
            let project = open(&doc, grid)?;
            commands::connect(&project, NodeId(to), input, from, output_index)?;
            save(&project, &doc)
        }
        Commands::Disconnect { doc, node, input } => {
            let project = open(&doc, grid)?;
            commands::disconnect(&project, NodeId(node), input)?;
            save(&project, &doc)
        }
        Commands::Move {
            doc,
            node,
            dx,
            dy,
            upstream,
        } => {
            let project = open(&doc, grid)?;
            commands::move_node(&project, NodeId(node), dx, dy, upstream)?;
            save(&project, &doc)
        }
        Commands::Remove { doc, node } => {
            let project = open(&doc, grid)?;
            commands::remove(&project, NodeId(node))?;
            save(&project, &doc)
        }
        Commands::Demo { output } => {
            let project = Project::new(grid);
            commands::build_demo(&project)?;
            project
                .save(&output)
                .with_context(|| format!("Failed to save {}", output.display()))
        }
    }
}
