//! CLI argument definitions using clap
//!
//! Commands:
//! - tagpack validate <paths>...
//! - tagpack ingest --dest <dir> <paths>...
//! - tagpack taxonomy list
//! - tagpack taxonomy ingest --dest <dir>
//! - tagpack schema

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// TagPack validation and ingest tool
#[derive(Parser, Debug)]
#[command(name = "tagpack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./config.yaml")]
    pub config: PathBuf,

    /// Raise log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate TagPacks and print one PASS/FAIL line per file
    Validate {
        /// Skip taxonomy concept checks
        #[arg(long)]
        no_taxonomies: bool,

        /// TagPack files or directories containing them
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Validate TagPacks and write the passing ones to a sink
    Ingest {
        /// Destination directory for record files
        #[arg(long)]
        dest: PathBuf,

        /// Skip taxonomy concept checks
        #[arg(long)]
        no_taxonomies: bool,

        /// TagPack files or directories containing them
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Inspect or ingest the configured taxonomies
    Taxonomy {
        #[command(subcommand)]
        action: TaxonomyAction,
    },

    /// Print the effective schema
    Schema,
}

#[derive(Subcommand, Debug)]
pub enum TaxonomyAction {
    /// List taxonomies with their concept counts
    List,

    /// Write taxonomy and concept records
    Ingest {
        /// Destination directory for record files
        #[arg(long)]
        dest: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
