// 🔁 Transformer
// Record → EnrichedRecord: base value × rate, rounded half-up to cents.

use crate::config::Currency;
use crate::error::EtlResult;
use crate::models::{EnrichedRecord, RateTable, Record, ResultSet};
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept on every derived value
pub const DERIVED_SCALE: u32 = 2;

/// Round half-up (away from zero) to two places: 0.125 → 0.13
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DERIVED_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// `None` when the product does not fit in a Decimal
pub fn convert(base_value: Decimal, rate: Decimal) -> Option<Decimal> {
    base_value.checked_mul(rate).map(round_money)
}

/// Enrich every record in one pass.
///
/// Every target currency is resolved up front, so a missing rate fails the
/// call before any record is produced. A record whose converted value
/// overflows is skipped with a warning, like a malformed table row.
pub fn transform(records: &[Record], rates: &RateTable) -> EtlResult<ResultSet> {
    let gbp = rates.require(Currency::Gbp)?;
    let eur = rates.require(Currency::Eur)?;
    let inr = rates.require(Currency::Inr)?;

    let enriched = records
        .iter()
        .filter_map(|record| {
            let converted = convert(record.base_value, gbp).and_then(|gbp_value| {
                let eur_value = convert(record.base_value, eur)?;
                let inr_value = convert(record.base_value, inr)?;
                Some((gbp_value, eur_value, inr_value))
            });

            match converted {
                Some((gbp, eur, inr)) => Some(EnrichedRecord {
                    name: record.name.clone(),
                    base_value: record.base_value,
                    gbp,
                    eur,
                    inr,
                }),
                None => {
                    tracing::warn!(
                        name = %record.name,
                        value = %record.base_value,
                        "skipping record whose converted value overflows"
                    );
                    None
                }
            }
        })
        .collect::<ResultSet>();

    tracing::info!(records = enriched.len(), "records enriched");
    Ok(enriched)
}
