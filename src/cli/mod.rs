//! CLI module for akili
//!
//! Provides command-line interface for:
//! - init: Create the data directory
//! - ingest: Canonicalize an extraction file and store its facts
//! - query: One-shot question
//! - explain: One-shot verification trace
//! - documents, facts, delete: Store inspection and maintenance

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    delete, documents, explain, facts, ingest, ingest_extraction, init, query, run, run_command,
    IngestReport,
};
pub use config::{Config, DATA_DIR_ENV};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_request, read_request, write_json, write_response};
