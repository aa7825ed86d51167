// 🚚 ETL Pipeline
// Fetch → Extract → Rates → Transform → CSV → Table Store → Queries,
// with a progress milestone after each stage. Any stage error ends the run.

use crate::config::EtlConfig;
use crate::db::{SqliteStore, TableStore};
use crate::error::EtlResult;
use crate::export::write_csv;
use crate::extractor::extract_records;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::models::ResultSet;
use crate::progress::{Milestone, ProgressLogger};
use crate::queries::{canonical_queries, QueryOutput};
use crate::rates::{FileRateProvider, RateProvider, RemoteRateProvider};
use crate::transform::transform;
use std::time::Duration;

/// What one successful run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub records: ResultSet,
    pub skipped_rows: usize,
    pub queries: Vec<QueryOutput>,
}

pub struct EtlPipeline {
    config: EtlConfig,
    fetcher: Box<dyn Fetcher>,
    rates: Box<dyn RateProvider>,
    logger: ProgressLogger,
}

impl EtlPipeline {
    /// Build a pipeline from explicit sources (tests inject fakes here)
    pub fn new(
        config: EtlConfig,
        fetcher: Box<dyn Fetcher>,
        rates: Box<dyn RateProvider>,
    ) -> Self {
        let logger = ProgressLogger::new(&config.log_path);
        EtlPipeline {
            config,
            fetcher,
            rates,
            logger,
        }
    }

    /// Build the production pipeline: HTTP fetcher, rates from a file or URL
    pub fn from_config(config: EtlConfig) -> EtlResult<Self> {
        config.validate()?;

        let timeout = Duration::from_secs(config.http_timeout_secs);
        let fetcher = HttpFetcher::new(timeout)?;

        let rates: Box<dyn RateProvider> = if config.rate_source_is_remote() {
            Box::new(RemoteRateProvider::new(
                config.rate_source.clone(),
                HttpFetcher::new(timeout)?,
            ))
        } else {
            Box::new(FileRateProvider::new(&config.rate_source))
        };

        Ok(Self::new(config, Box::new(fetcher), rates))
    }

    pub fn config(&self) -> &EtlConfig {
        &self.config
    }

    /// Run against the SQLite file named in the config
    pub fn run_sqlite(&self) -> EtlResult<RunReport> {
        self.run(|config| SqliteStore::open(&config.db_path))
    }

    /// Run every stage once. `connect` is only called after the CSV is
    /// written, so earlier failures never touch the database.
    pub fn run<S, C>(&self, connect: C) -> EtlResult<RunReport>
    where
        S: TableStore,
        C: FnOnce(&EtlConfig) -> EtlResult<S>,
    {
        self.config.validate()?;
        self.logger.milestone(Milestone::Preliminaries);

        // Extract
        tracing::info!(url = %self.config.source_url, "extracting source table");
        let html = self.fetcher.fetch(&self.config.source_url)?;
        let extraction = extract_records(&html)?;
        self.logger.milestone(Milestone::Extracted);

        // Transform
        let rates = self.rates.load_rates()?;
        let records = transform(&extraction.records, &rates)?;
        self.logger.milestone(Milestone::Transformed);

        // Load: flat file
        write_csv(&self.config.csv_path, &records)?;
        self.logger.milestone(Milestone::CsvSaved);

        // Load: table
        let mut store = connect(&self.config)?;
        self.logger.milestone(Milestone::DbConnected);

        store.replace_table(&self.config.table_name, &records)?;
        self.logger.milestone(Milestone::DbLoaded);

        let queries = canonical_queries(&self.config.table_name)
            .iter()
            .map(|sql| store.query(sql))
            .collect::<EtlResult<Vec<_>>>()?;

        self.logger.milestone(Milestone::Complete);
        store.close()?;

        tracing::info!(
            records = records.len(),
            skipped = extraction.skipped_rows,
            "ETL run complete"
        );

        Ok(RunReport {
            records,
            skipped_rows: extraction.skipped_rows,
            queries,
        })
    }
}
