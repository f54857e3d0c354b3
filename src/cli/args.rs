//! CLI argument definitions using clap
//!
//! Commands:
//! - akili init --config <path>
//! - akili ingest --config <path> --file <extraction.json> [--doc-id <id>]
//! - akili query --config <path> [--doc-id <id> --question <text>]
//! - akili explain --config <path> [--doc-id <id> --question <text>]
//! - akili documents --config <path>
//! - akili facts --config <path> --doc-id <id>
//! - akili delete --config <path> --doc-id <id>
//!
//! `query` and `explain` read one JSON request from stdin when no question
//! is given on the command line.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// akili - deterministic, coordinate-grounded answers from document facts
#[derive(Parser, Debug)]
#[command(name = "akili")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new akili data directory
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./akili.json")]
        config: PathBuf,
    },

    /// Canonicalize an extraction file and store its facts
    Ingest {
        /// Path to configuration file
        #[arg(long, default_value = "./akili.json")]
        config: PathBuf,

        /// Extraction JSON (pages of units, bijections, grids)
        #[arg(long)]
        file: PathBuf,

        /// Document id (defaults to the file's doc_id, else a generated one)
        #[arg(long)]
        doc_id: Option<String>,
    },

    /// Answer one question about a document, or refuse
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./akili.json")]
        config: PathBuf,

        #[arg(long, requires = "question")]
        doc_id: Option<String>,

        #[arg(long, requires = "doc_id")]
        question: Option<String>,
    },

    /// Trace which rules fired for one question
    Explain {
        /// Path to configuration file
        #[arg(long, default_value = "./akili.json")]
        config: PathBuf,

        #[arg(long, requires = "question")]
        doc_id: Option<String>,

        #[arg(long, requires = "doc_id")]
        question: Option<String>,

        /// Print the human-readable trace instead of JSON
        #[arg(long)]
        text: bool,
    },

    /// List stored documents
    Documents {
        /// Path to configuration file
        #[arg(long, default_value = "./akili.json")]
        config: PathBuf,
    },

    /// Print the canonical facts of a document
    Facts {
        /// Path to configuration file
        #[arg(long, default_value = "./akili.json")]
        config: PathBuf,

        #[arg(long)]
        doc_id: String,
    },

    /// Delete a stored document
    Delete {
        /// Path to configuration file
        #[arg(long, default_value = "./akili.json")]
        config: PathBuf,

        #[arg(long)]
        doc_id: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

impl Command {
    /// Subcommand name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Command::Init { .. } => "init",
            Command::Ingest { .. } => "ingest",
            Command::Query { .. } => "query",
            Command::Explain { .. } => "explain",
            Command::Documents { .. } => "documents",
            Command::Facts { .. } => "facts",
            Command::Delete { .. } => "delete",
        }
    }
}
