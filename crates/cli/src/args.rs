//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Turn command arguments into gateway request types.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not read environment variables for settings (see `SettingsLoader`).

use clap::{Args, Parser, Subcommand, ValueEnum};
use scope_client::{SearchRequest, SortOrder, ValuesRequest};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scope")]
#[command(about = "Scope - query search clusters whatever major version they run", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  scope verify --server prod\n  scope indices --server prod\n  scope fields --server prod --index 'logs-*'\n  scope values --server prod --index 'logs-*' --field status --type long\n  scope search --server prod --index 'logs-*' --query 'status:500' --from 2024-01-01T00:00:00Z --to 2024-01-02T00:00:00Z --timestamp-field @timestamp --histogram\n"
)]
pub struct Cli {
    /// Path to the server registry file (overrides default location).
    ///
    /// Can also be set via SCOPE_CONFIG_PATH environment variable.
    #[arg(long, global = true, value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Per-request timeout in seconds (also SCOPE_TIMEOUT)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Maximum number of retries for rate-limited requests (also SCOPE_MAX_RETRIES)
    #[arg(long, global = true)]
    pub max_retries: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe a server again and report the version it runs
    Verify {
        /// Server id from the registry
        #[arg(long)]
        server: String,
    },

    /// List visible indices
    Indices {
        /// Server id from the registry
        #[arg(long)]
        server: String,
    },

    /// List the leaf fields of an index pattern
    Fields {
        /// Server id from the registry
        #[arg(long)]
        server: String,

        /// Index pattern (e.g., 'logs-*')
        #[arg(long)]
        index: String,
    },

    /// Suggest values for a field
    Values(ValuesArgs),

    /// Run a search
    Search(SearchArgs),
}

#[derive(Args)]
pub struct ValuesArgs {
    /// Server id from the registry
    #[arg(long)]
    pub server: String,

    /// Index pattern (e.g., 'logs-*')
    #[arg(long)]
    pub index: String,

    /// Field to suggest values for
    #[arg(long)]
    pub field: String,

    /// Only suggest values starting with this prefix
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Mapping type of the field (e.g., 'keyword', 'long')
    #[arg(long = "type", default_value = "")]
    pub field_type: String,
}

impl ValuesArgs {
    pub fn into_request(self) -> ValuesRequest {
        ValuesRequest::new(self.index, self.field)
            .with_prefix(self.prefix)
            .with_field_type(self.field_type)
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SortOrderArg {
    Asc,
    Desc,
}

impl From<SortOrderArg> for SortOrder {
    fn from(order: SortOrderArg) -> Self {
        match order {
            SortOrderArg::Asc => SortOrder::Asc,
            SortOrderArg::Desc => SortOrder::Desc,
        }
    }
}

#[derive(Args)]
pub struct SearchArgs {
    /// Server id from the registry
    #[arg(long)]
    pub server: String,

    /// Index pattern (e.g., 'logs-*')
    #[arg(long)]
    pub index: String,

    /// Free-text query in query-string syntax (e.g., 'status:500 AND host:web-1')
    #[arg(short, long)]
    pub query: Option<String>,

    /// Lower time bound (RFC 3339, epoch milliseconds or date math like now-15m)
    #[arg(long, allow_hyphen_values = true)]
    pub from: Option<String>,

    /// Upper time bound (RFC 3339, epoch milliseconds or date math like now)
    #[arg(long, allow_hyphen_values = true)]
    pub to: Option<String>,

    /// Field holding each document's timestamp
    #[arg(long)]
    pub timestamp_field: Option<String>,

    /// Number of hits to skip
    #[arg(long, default_value_t = 0)]
    pub offset: u64,

    /// Number of hits to return
    #[arg(long, default_value_t = scope_config::constants::DEFAULT_SEARCH_SIZE)]
    pub size: u64,

    /// Field to sort by (defaults to the timestamp field, newest first)
    #[arg(long)]
    pub sort_field: Option<String>,

    /// Sort direction for --sort-field
    #[arg(long, value_enum, requires = "sort_field")]
    pub sort_order: Option<SortOrderArg>,

    /// Also return a time histogram (requires --timestamp-field)
    #[arg(long, requires = "timestamp_field")]
    pub histogram: bool,
}

impl SearchArgs {
    pub fn into_request(self) -> SearchRequest {
        SearchRequest {
            index: self.index,
            query: self.query,
            from: self.from,
            to: self.to,
            timestamp_field: self.timestamp_field,
            offset: self.offset,
            size: self.size,
            sort_field: self.sort_field,
            sort_order: self.sort_order.map(SortOrder::from),
            include_histogram: self.histogram,
        }
    }
}
