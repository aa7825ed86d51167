// ⚙️ Run Configuration
// All deployment constants live here and are passed into the pipeline,
// so tests can point every stage at temp files and fake sources.

use crate::error::{EtlError, EtlResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// TARGET CURRENCIES
// ============================================================================

/// Derived currencies; scraped values are USD billions.
/// Closed set: every EnrichedRecord carries exactly one value per variant,
/// and the table schema has one column per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    Gbp,
    Eur,
    Inr,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Gbp, Currency::Eur, Currency::Inr];

    /// ISO code as it appears in the rate table's `Currency` column
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Gbp => "GBP",
            Currency::Eur => "EUR",
            Currency::Inr => "INR",
        }
    }

    /// Column name in the CSV header and database table
    pub fn column(&self) -> &'static str {
        match self {
            Currency::Gbp => "MC_GBP_Billion",
            Currency::Eur => "MC_EUR_Billion",
            Currency::Inr => "MC_INR_Billion",
        }
    }
}

/// Column holding the scraped base value
pub const BASE_COLUMN: &str = "MC_USD_Billion";

/// Column holding the entity's display label
pub const NAME_COLUMN: &str = "Name";

/// All five columns, in table/CSV order
pub fn column_names() -> [&'static str; 5] {
    [
        NAME_COLUMN,
        BASE_COLUMN,
        Currency::Gbp.column(),
        Currency::Eur.column(),
        Currency::Inr.column(),
    ]
}

// ============================================================================
// CONFIG
// ============================================================================

pub const DEFAULT_SOURCE_URL: &str =
    "https://web.archive.org/web/20230908091635/https://en.wikipedia.org/wiki/List_of_largest_banks";

pub const DEFAULT_RATE_SOURCE: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBMSkillsNetwork-PY0221EN-Coursera/labs/v2/exchange_rate.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EtlConfig {
    /// Page whose first table is scraped
    pub source_url: String,

    /// Rate CSV: local path, or http(s) URL fetched with the source fetcher
    pub rate_source: String,

    pub csv_path: PathBuf,
    pub db_path: PathBuf,
    pub table_name: String,
    pub log_path: PathBuf,

    pub http_timeout_secs: u64,
}

impl Default for EtlConfig {
    fn default() -> Self {
        EtlConfig {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            rate_source: DEFAULT_RATE_SOURCE.to_string(),
            csv_path: PathBuf::from("./Largest_banks_data.csv"),
            db_path: PathBuf::from("banks.db"),
            table_name: "Largest_banks".to_string(),
            log_path: PathBuf::from("./code_log.txt"),
            http_timeout_secs: 60,
        }
    }
}

impl EtlConfig {
    /// Load config from a JSON file. Missing fields fall back to defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> EtlResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            EtlError::Config(format!("failed to read config file {:?}: {}", path, e))
        })?;

        let config: EtlConfig = serde_json::from_str(&content)
            .map_err(|e| EtlError::Config(format!("failed to parse config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// The table name is interpolated into DDL and queries, so it must be
    /// a bare identifier.
    pub fn validate(&self) -> EtlResult<()> {
        if !is_identifier(&self.table_name) {
            return Err(EtlError::Config(format!(
                "table name {:?} is not a plain SQL identifier",
                self.table_name
            )));
        }
        if self.http_timeout_secs == 0 {
            return Err(EtlError::Config("http_timeout_secs must be > 0".to_string()));
        }
        Ok(())
    }

    /// True when the rate table must be fetched over HTTP
    pub fn rate_source_is_remote(&self) -> bool {
        self.rate_source.starts_with("http://") || self.rate_source.starts_with("https://")
    }
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
