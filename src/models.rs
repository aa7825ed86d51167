// Core data model: scraped records, enriched records, the rate table

use crate::config::Currency;
use crate::error::{EtlError, EtlResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One scraped table row before enrichment
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    /// Value as scraped, in the base currency. Never negative.
    pub base_value: Decimal,
}

impl Record {
    pub fn new(name: impl Into<String>, base_value: Decimal) -> Self {
        Record {
            name: name.into(),
            base_value,
        }
    }
}

/// A Record plus one converted value per target currency.
/// Field order here is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "MC_USD_Billion", with = "rust_decimal::serde::str")]
    pub base_value: Decimal,

    #[serde(rename = "MC_GBP_Billion", with = "rust_decimal::serde::str")]
    pub gbp: Decimal,

    #[serde(rename = "MC_EUR_Billion", with = "rust_decimal::serde::str")]
    pub eur: Decimal,

    #[serde(rename = "MC_INR_Billion", with = "rust_decimal::serde::str")]
    pub inr: Decimal,
}

impl EnrichedRecord {
    pub fn value_in(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::Gbp => self.gbp,
            Currency::Eur => self.eur,
            Currency::Inr => self.inr,
        }
    }

    /// Numeric columns as f64, in column order, for REAL storage
    pub fn numeric_columns(&self) -> [f64; 4] {
        [
            decimal_to_f64(self.base_value),
            decimal_to_f64(self.gbp),
            decimal_to_f64(self.eur),
            decimal_to_f64(self.inr),
        ]
    }
}

fn decimal_to_f64(value: Decimal) -> f64 {
    // Every Decimal is within f64 range; precision loss is at most 1 ulp.
    value.to_f64().unwrap_or(f64::NAN)
}

/// Ordered output of one run
pub type ResultSet = Vec<EnrichedRecord>;

// ============================================================================
// RATE TABLE
// ============================================================================

/// Currency code → conversion rate from the base currency.
/// Loaded once per run, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: HashMap<String, Decimal>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rate. Codes are stored upper-case; rates must be positive.
    pub fn insert(&mut self, code: &str, rate: Decimal) -> EtlResult<()> {
        if rate <= Decimal::ZERO {
            return Err(EtlError::Config(format!(
                "rate for {} must be positive, got {}",
                code, rate
            )));
        }
        self.rates.insert(code.trim().to_uppercase(), rate);
        Ok(())
    }

    pub fn get(&self, code: &str) -> Option<Decimal> {
        self.rates.get(&code.to_uppercase()).copied()
    }

    /// Rate for a target currency, or ConfigError if the table lacks it
    pub fn require(&self, currency: Currency) -> EtlResult<Decimal> {
        self.get(currency.code()).ok_or_else(|| {
            EtlError::Config(format!("rate table has no entry for {}", currency.code()))
        })
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
