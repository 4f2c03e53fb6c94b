//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Page through RDF triples stored in Solr
#[derive(Parser, Debug)]
#[command(name = "triple-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Solr base URL (overrides the config file)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Solr core or collection (overrides the config file)
    #[arg(short, long, global = true)]
    pub collection: Option<String>,

    /// Main query
    #[arg(short, long, global = true, default_value = "*:*")]
    pub query: String,

    /// Filter query, may be repeated
    #[arg(long = "filter", global = true)]
    pub filters: Vec<String>,

    /// Sort clause, must include the unique key (overrides the config file)
    #[arg(long, global = true)]
    pub sort: Option<String>,

    /// Records per page (overrides the config file)
    #[arg(long, global = true)]
    pub rows: Option<u32>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print matching triples
    Triples {
        /// Output format
        #[arg(short, long, default_value = "ntriples")]
        format: OutputFormat,

        /// Stop after this many triples
        #[arg(long)]
        limit: Option<u64>,
    },

    /// Count matching records without building triples
    Count,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One N-Triples statement per line
    Ntriples,
    /// One JSON object per line
    Json,
}
