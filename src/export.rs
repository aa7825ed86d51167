// 📄 CSV Writer
// ResultSet → flat file. Written to a temp file beside the target and renamed
// over it, so a failed run never leaves a half-written CSV behind.

use crate::config::column_names;
use crate::error::EtlResult;
use crate::models::{EnrichedRecord, ResultSet};
use std::path::Path;
use tempfile::NamedTempFile;

/// Write the header plus one row per record, replacing any existing file.
pub fn write_csv(path: &Path, records: &[EnrichedRecord]) -> EtlResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let tmp = NamedTempFile::new_in(dir)?;

    // Header written by hand so an empty ResultSet still gets one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(tmp);

    writer.write_record(column_names())?;
    for record in records {
        writer.serialize(record)?;
    }

    let tmp = writer.into_inner().map_err(|e| e.into_error())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    tracing::info!(path = %path.display(), rows = records.len(), "csv written");
    Ok(())
}

/// Read a CSV produced by [`write_csv`] back into records
pub fn read_csv(path: &Path) -> EtlResult<ResultSet> {
    let mut rdr = csv::Reader::from_path(path)?;

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: EnrichedRecord = result?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::fs;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_record(name: &str, base: &str, gbp: &str, eur: &str, inr: &str) -> EnrichedRecord {
        EnrichedRecord {
            name: name.to_string(),
            base_value: dec(base),
            gbp: dec(gbp),
            eur: dec(eur),
            inr: dec(inr),
        }
    }

    #[test]
    fn test_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Largest_banks_data.csv");

        let records = vec![
            create_test_record("Bank A", "1234.50", "987.60", "1111.05", "98760.00"),
            create_test_record("Bank, B", "10", "8.00", "9.00", "800.00"),
        ];
        write_csv(&path, &records).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Name,MC_USD_Billion,MC_GBP_Billion,MC_EUR_Billion,MC_INR_Billion"
        );
        assert_eq!(lines[1], "Bank A,1234.50,987.60,1111.05,98760.00");
        assert_eq!(lines[2], "\"Bank, B\",10,8.00,9.00,800.00");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let records = vec![
            create_test_record("JPMorgan Chase", "432.92", "346.34", "402.62", "35910.71"),
            create_test_record("Bank of America", "231.52", "185.22", "215.31", "19204.58"),
        ];
        write_csv(&path, &records).unwrap();

        let loaded = read_csv(&path).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "stale content\nthat is much longer than the new file\n").unwrap();

        write_csv(&path, &[]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "Name,MC_USD_Billion,MC_GBP_Billion,MC_EUR_Billion,MC_INR_Billion\n"
        );
        assert!(read_csv(&path).unwrap().is_empty());
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_csv(&path, &[create_test_record("A", "1", "0.80", "0.90", "80.00")]).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_read_malformed_csv_is_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(
            &path,
            "Name,MC_USD_Billion,MC_GBP_Billion,MC_EUR_Billion,MC_INR_Billion\nBank A,abc,1,1,1\n",
        )
        .unwrap();

        let err = read_csv(&path).unwrap_err();
        assert!(matches!(err, crate::error::EtlError::Csv(_)), "got {:?}", err);

        let missing = read_csv(&dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(missing, crate::error::EtlError::Csv(_)));
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("out.csv");

        assert!(write_csv(&path, &[]).is_err());
        assert!(!path.exists());
    }
}
