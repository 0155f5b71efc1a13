//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line client for paginated JSON APIs
#[derive(Parser, Debug)]
#[command(name = "graph-client")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML, or JSON with a .json extension)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Bearer token
    #[arg(short, long, global = true, env = "GRAPH_CLIENT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// API host, overrides the config file
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// API version, overrides the config file
    #[arg(long, global = true)]
    pub api_version: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a single entity
    Get {
        /// Path relative to the versioned host, or an absolute URL
        path: String,
    },

    /// Fetch every element of a paginated collection
    List {
        /// Path relative to the versioned host, or an absolute URL
        path: String,

        /// Stop with an error after this many pages
        #[arg(long)]
        max_pages: Option<usize>,

        /// Follow next links to any host
        #[arg(long)]
        any_host: bool,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one element per line)
    Json,
    /// Indented JSON
    Pretty,
}
