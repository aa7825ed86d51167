// 💱 Rate Provider
// Loads the Currency → Rate table, from a local CSV or over HTTP.

use crate::error::{EtlError, EtlResult};
use crate::fetcher::Fetcher;
use crate::models::RateTable;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

pub trait RateProvider {
    fn load_rates(&self) -> EtlResult<RateTable>;
}

#[derive(Debug, Deserialize)]
struct RateRow {
    #[serde(rename = "Currency")]
    currency: String,

    #[serde(rename = "Rate", with = "rust_decimal::serde::str")]
    rate: Decimal,
}

/// Parse rate CSV text with `Currency` and `Rate` columns.
/// Any malformed row makes the whole table unusable.
pub fn parse_rate_csv(text: &str) -> EtlResult<RateTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut table = RateTable::new();

    for (line, result) in reader.deserialize::<RateRow>().enumerate() {
        let row = result.map_err(|e| {
            EtlError::Config(format!("rate table line {}: {}", line + 2, e))
        })?;
        table.insert(&row.currency, row.rate)?;
    }

    tracing::debug!(rates = table.len(), "rate table parsed");
    Ok(table)
}

/// Rate CSV on the local filesystem
pub struct FileRateProvider {
    path: PathBuf,
}

impl FileRateProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileRateProvider { path: path.into() }
    }
}

impl RateProvider for FileRateProvider {
    fn load_rates(&self) -> EtlResult<RateTable> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            EtlError::Config(format!("failed to read rate file {:?}: {}", self.path, e))
        })?;
        parse_rate_csv(&text)
    }
}

/// Rate CSV behind a URL
pub struct RemoteRateProvider<F: Fetcher> {
    url: String,
    fetcher: F,
}

impl<F: Fetcher> RemoteRateProvider<F> {
    pub fn new(url: impl Into<String>, fetcher: F) -> Self {
        RemoteRateProvider {
            url: url.into(),
            fetcher,
        }
    }
}

impl<F: Fetcher> RateProvider for RemoteRateProvider<F> {
    fn load_rates(&self) -> EtlResult<RateTable> {
        let text = self.fetcher.fetch(&self.url)?;
        parse_rate_csv(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Currency;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const RATES: &str = "Currency,Rate\nEUR,0.93\nGBP,0.8\nINR,82.95\n";

    #[test]
    fn test_parse_rate_csv() {
        let table = parse_rate_csv(RATES).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.require(Currency::Eur).unwrap(), dec("0.93"));
        assert_eq!(table.require(Currency::Gbp).unwrap(), dec("0.8"));
        assert_eq!(table.require(Currency::Inr).unwrap(), dec("82.95"));
    }

    #[test]
    fn test_parse_rate_csv_bad_rate() {
        let err = parse_rate_csv("Currency,Rate\nEUR,abc\n").unwrap_err();
        assert!(err.is_config());

        let err = parse_rate_csv("Currency,Rate\nEUR,-0.9\n").unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_parse_rate_csv_wrong_headers() {
        let err = parse_rate_csv("Code,Value\nEUR,0.9\n").unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_file_provider() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exchange_rate.csv");
        fs::write(&path, RATES).unwrap();

        let table = FileRateProvider::new(&path).load_rates().unwrap();
        assert_eq!(table.len(), 3);

        let missing = FileRateProvider::new(dir.path().join("nope.csv"));
        assert!(missing.load_rates().unwrap_err().is_config());
    }

    struct CannedFetcher(&'static str);

    impl Fetcher for CannedFetcher {
        fn fetch(&self, _url: &str) -> EtlResult<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_remote_provider_uses_fetcher() {
        let provider = RemoteRateProvider::new("https://example.test/rates.csv", CannedFetcher(RATES));
        let table = provider.load_rates().unwrap();
        assert_eq!(table.get("GBP"), Some(dec("0.8")));
    }
}
