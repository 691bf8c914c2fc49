//! CLI module for the tagpack tool
//!
//! Provides command-line interface for:
//! - validate: Check TagPacks against schema, taxonomies and vocabulary
//! - ingest: Validate, then write passing TagPacks to a record sink
//! - taxonomy list / taxonomy ingest: Inspect or write taxonomies
//! - schema: Print the effective schema

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, TaxonomyAction};
pub use commands::{
    check_file, ingest, ingest_files, ingest_taxonomies, list_taxonomies, load_file, run_command,
    show_schema, validate, validate_files, BatchSummary, Context, Rejection,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::collect_tagpack_files;

use crate::observability::init_logging;

/// Parse arguments, set up logging and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);
    run_command(cli)
}
