//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::NodeId;

/// Browse a remote node tree: lazy-loaded children, localized titles, create and delete
#[derive(Parser, Debug)]
#[command(name = "treenav")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .treenav.toml (default: cwd)
    #[arg(short = 'C', long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Display language, e.g. en_US
    #[arg(short, long, global = true)]
    pub lang: Option<String>,

    /// Override the API base URL
    #[arg(long, global = true, env = "TREENAV_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the node tree
    Tree {
        /// Expand nodes down to this level
        #[arg(long, default_value_t = 1)]
        depth: usize,
    },

    /// List the children of a node
    Children {
        /// Parent node id
        id: NodeId,
    },

    /// List available locales
    Locales,

    /// Create a node
    Create {
        /// Node title
        #[arg(short, long)]
        title: Option<String>,
        /// Parent node id (omit for a root node)
        #[arg(short, long)]
        parent: Option<NodeId>,
        /// Extra payload field as key=value (value parsed as JSON if possible)
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Delete a node
    Delete {
        /// Node id
        id: NodeId,
        /// Parent node id (omit for a root node)
        #[arg(short, long)]
        parent: Option<NodeId>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented config template
    Template,
    /// Show the global config file location
    Path,
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got {s:?}")),
    }
}
