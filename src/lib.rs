// Bank ETL - Core Library
// Scrape the largest-banks table, convert market caps, load CSV + SQLite.

pub mod config;
pub mod error;
pub mod models;
pub mod fetcher;
pub mod extractor;
pub mod rates;
pub mod transform;
pub mod export;
pub mod db;
pub mod queries;
pub mod progress;
pub mod pipeline;

// Re-export commonly used types
pub use config::{column_names, Currency, EtlConfig};
pub use error::{EtlError, EtlResult};
pub use models::{EnrichedRecord, RateTable, Record, ResultSet};
pub use fetcher::{Fetcher, HttpFetcher};
pub use extractor::{extract_records, Extraction};
pub use rates::{parse_rate_csv, FileRateProvider, RateProvider, RemoteRateProvider};
pub use transform::{round_money, transform};
pub use export::{read_csv, write_csv};
pub use db::{replace_table, verify_count, SqliteStore, TableStore};
pub use queries::{canonical_queries, run_query, QueryOutput};
pub use progress::{Milestone, ProgressLogger};
pub use pipeline::{EtlPipeline, RunReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
