// 🏗️ Table Extractor
// First <table> on the page → ordered list of (name, base value) records.
//
// Row layout (after the header row):
//   cell 0: rank, cell 1: name, cell 2: value ("1,409.17\n")

use crate::error::{EtlError, EtlResult};
use crate::models::Record;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};
use std::str::FromStr;

/// Records pulled from the table plus how many candidate rows were dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub records: Vec<Record>,
    /// Rows with enough cells whose value cell would not parse
    pub skipped_rows: usize,
}

fn selector(css: &str) -> EtlResult<Selector> {
    Selector::parse(css).map_err(|e| EtlError::Parse(format!("bad selector {:?}: {}", css, e)))
}

/// Scrape the first table in `html`.
///
/// Fails only when the page has no table. Rows with fewer than three data
/// cells are ignored; rows whose value cell is not a non-negative number
/// are skipped with a warning.
pub fn extract_records(html: &str) -> EtlResult<Extraction> {
    let document = Html::parse_document(html);

    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| EtlError::Parse("page contains no <table>".to_string()))?;

    let mut extraction = Extraction::default();

    // First row is the header
    for (index, row) in table.select(&row_sel).enumerate().skip(1) {
        let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
        if cells.len() < 3 {
            continue;
        }

        let name = cell_text(&cells[1]).trim().to_string();
        let raw_value = cell_text(&cells[2]);

        match parse_value(&raw_value) {
            Some(base_value) => extraction.records.push(Record { name, base_value }),
            None => {
                tracing::warn!(
                    row = index,
                    name = %name,
                    value = %raw_value.trim(),
                    "skipping row with unparseable value"
                );
                extraction.skipped_rows += 1;
            }
        }
    }

    tracing::info!(
        records = extraction.records.len(),
        skipped = extraction.skipped_rows,
        "table extracted"
    );

    Ok(extraction)
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>()
}

/// "1,234.50\n" → 1234.50. Negative or non-numeric text → None.
pub fn parse_value(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    let value = Decimal::from_str(&cleaned).ok()?;
    if value.is_sign_negative() && !value.is_zero() {
        return None;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn page(rows: &str) -> String {
        format!(
            "<html><body><p>intro</p><table>\
             <tr><th>Rank</th><th>Bank name</th><th>Market cap (US$ billion)</th></tr>\
             {}</table>\
             <table><tr><td>1</td><td>Other table</td><td>999</td></tr></table>\
             </body></html>",
            rows
        )
    }

    #[test]
    fn test_parse_value_strips_separators() {
        assert_eq!(parse_value("1,234.50"), Some(dec("1234.50")));
        assert_eq!(parse_value(" 432.92\n"), Some(dec("432.92")));
        assert_eq!(parse_value("0"), Some(dec("0")));
        assert_eq!(parse_value("not-a-number"), None);
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("-5.0"), None);
    }

    #[test]
    fn test_extracts_first_table_only() {
        let html = page(
            "<tr><td>1</td><td> JPMorgan Chase\n</td><td>432.92\n</td></tr>\
             <tr><td>2</td><td>Bank of America</td><td>231.52</td></tr>",
        );

        let extraction = extract_records(&html).unwrap();

        assert_eq!(
            extraction.records,
            vec![
                Record::new("JPMorgan Chase", dec("432.92")),
                Record::new("Bank of America", dec("231.52")),
            ]
        );
        assert_eq!(extraction.skipped_rows, 0);
    }

    #[test]
    fn test_malformed_row_is_skipped_not_fatal() {
        let html = page(
            "<tr><td>1</td><td>Bank A</td><td>1,234.50</td></tr>\
             <tr><td>2</td><td>Bank B</td><td>not-a-number</td></tr>",
        );

        let extraction = extract_records(&html).unwrap();

        assert_eq!(extraction.records, vec![Record::new("Bank A", dec("1234.50"))]);
        assert_eq!(extraction.skipped_rows, 1);
    }

    #[test]
    fn test_short_rows_are_ignored_silently() {
        let html = page(
            "<tr><td>only</td><td>two</td></tr>\
             <tr><td>1</td><td>Bank A</td><td>10</td></tr>\
             <tr><td colspan=\"3\">footnote</td></tr>",
        );

        let extraction = extract_records(&html).unwrap();

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.skipped_rows, 0);
    }

    #[test]
    fn test_header_row_is_skipped_even_with_td_cells() {
        let html = "<table>\
            <tr><td>Rank</td><td>Name</td><td>Value</td></tr>\
            <tr><td>1</td><td>Bank A</td><td>5</td></tr>\
            </table>";

        let extraction = extract_records(html).unwrap();

        assert_eq!(extraction.records, vec![Record::new("Bank A", dec("5"))]);
        assert_eq!(extraction.skipped_rows, 0);
    }

    #[test]
    fn test_no_table_is_parse_error() {
        let err = extract_records("<html><body><p>nothing here</p></body></html>").unwrap_err();
        assert!(matches!(err, EtlError::Parse(_)));
    }
}
