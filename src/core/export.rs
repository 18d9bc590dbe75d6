//! CSV export of a computed schedule.
//!
//! ```csv
//! Year,Opening Balance,Interest Earned,Reinvested,Closing Balance
//! 1,3000.00,150.00,150.00,3150.00
//! 2,3150.00,157.50,157.50,3307.50
//! ```
//!
//! Money columns carry exactly two decimals, rows end with `\n` and the last
//! row has no trailing terminator.

use csv::{ReaderBuilder, Terminator, WriterBuilder};
use serde::Deserialize;

use super::error::ExportError;
use super::format::fixed2;
use super::types::YearRecord;

pub const CSV_HEADERS: [&str; 5] = [
    "Year",
    "Opening Balance",
    "Interest Earned",
    "Reinvested",
    "Closing Balance",
];

pub const CSV_FILE_NAME: &str = "compound_interest.csv";

/// One parsed export row. Values carry the two-decimal precision of the file.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CsvRow {
    #[serde(rename = "Year")]
    pub year: u32,
    #[serde(rename = "Opening Balance")]
    pub opening_balance: f64,
    #[serde(rename = "Interest Earned")]
    pub interest_earned: f64,
    #[serde(rename = "Reinvested")]
    pub reinvested_amount: f64,
    #[serde(rename = "Closing Balance")]
    pub closing_balance: f64,
}

pub fn build_csv(records: &[YearRecord]) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADERS)?;
    for record in records {
        writer.write_record([
            record.year.to_string(),
            fixed2(record.opening_balance),
            fixed2(record.interest_earned),
            fixed2(record.reinvested_amount),
            fixed2(record.closing_balance),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    let mut text = String::from_utf8(bytes)?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Reads an export produced by [`build_csv`] back into rows.
pub fn parse_csv(text: &str) -> Result<Vec<CsvRow>, ExportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.iter().ne(CSV_HEADERS.iter().copied()) {
        return Err(ExportError::Malformed {
            line: 1,
            reason: format!("unexpected header row {:?}", headers.iter().collect::<Vec<_>>()),
        });
    }

    let mut rows = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        rows.push(row?);
    }

    for (idx, row) in rows.iter().enumerate() {
        let expected_year = idx as u32 + 1;
        if row.year != expected_year {
            return Err(ExportError::Malformed {
                line: idx as u64 + 2,
                reason: format!("expected year {expected_year}, found {}", row.year),
            });
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::compute;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    #[test]
    fn worked_example_exports_expected_text() {
        let schedule = compute(3_000.0, 5.0, 3.0, 100.0).expect("valid inputs");
        let csv = build_csv(&schedule.years).expect("export should succeed");
        assert_eq!(
            csv,
            "Year,Opening Balance,Interest Earned,Reinvested,Closing Balance\n\
             1,3000.00,150.00,150.00,3150.00\n\
             2,3150.00,157.50,157.50,3307.50\n\
             3,3307.50,165.38,165.38,3472.88"
        );
    }

    #[test]
    fn empty_schedule_exports_header_only() {
        let csv = build_csv(&[]).expect("export should succeed");
        assert_eq!(csv, CSV_HEADERS.join(","));
    }

    #[test]
    fn negative_values_are_not_quoted() {
        let schedule = compute(1_000.0, -12.5, 1.0, 100.0).expect("valid inputs");
        let csv = build_csv(&schedule.years).expect("export should succeed");
        assert!(csv.ends_with("1,1000.00,-125.00,-125.00,875.00"));
        assert!(!csv.contains('"'));
    }

    #[test]
    fn parse_rejects_foreign_headers() {
        let err = parse_csv("Year,Balance\n1,10.00").expect_err("must reject header");
        assert!(matches!(err, ExportError::Malformed { line: 1, .. }));
    }

    #[test]
    fn parse_rejects_gapped_years() {
        let text = format!(
            "{}\n1,1.00,0.00,0.00,1.00\n3,1.00,0.00,0.00,1.00",
            CSV_HEADERS.join(",")
        );
        let err = parse_csv(&text).expect_err("must reject gap");
        assert!(matches!(err, ExportError::Malformed { line: 3, .. }));
    }

    #[test]
    fn parse_rejects_non_numeric_cells() {
        let text = format!("{}\n1,abc,0.00,0.00,1.00", CSV_HEADERS.join(","));
        let err = parse_csv(&text).expect_err("must reject text cell");
        assert!(matches!(err, ExportError::Csv(_)));
    }

    #[test]
    fn huge_balances_export_as_finite_values() {
        let schedule = compute(1e307, 0.0, 1.0, 0.0).expect("valid inputs");
        let csv = build_csv(&schedule.years).expect("export should succeed");
        assert!(!csv.contains("inf"), "finite balance exported as {csv}");

        let rows = parse_csv(&csv).expect("export should parse");
        assert_eq!(rows[0].opening_balance, 1e307);
        assert_eq!(rows[0].closing_balance, 1e307);
    }

    #[test]
    fn large_balances_keep_their_cents() {
        let schedule = compute(123_456_789_012_345.67, 0.0, 1.0, 100.0).expect("valid inputs");
        let csv = build_csv(&schedule.years).expect("export should succeed");
        assert!(csv.ends_with("1,123456789012345.67,0.00,0.00,123456789012345.67"));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_export_reproduces_values_to_two_decimals(
            principal_cents in 0u64..100_000_000,
            rate_bp in -3_000i32..3_000,
            years in 1u32..40,
            reinvest_bp in 0u32..20_000
        ) {
            let schedule = compute(
                principal_cents as f64 / 100.0,
                rate_bp as f64 / 100.0,
                f64::from(years),
                reinvest_bp as f64 / 100.0,
            )
            .expect("generated inputs are valid");
            let csv = build_csv(&schedule.years).expect("export should succeed");
            prop_assert!(!csv.ends_with('\n'));
            prop_assert_eq!(csv.lines().count(), years as usize + 1);

            let rows = parse_csv(&csv).expect("export should parse");
            prop_assert_eq!(rows.len(), schedule.years.len());
            for (row, record) in rows.iter().zip(&schedule.years) {
                prop_assert_eq!(row.year, record.year);
                for (parsed, exact) in [
                    (row.opening_balance, record.opening_balance),
                    (row.interest_earned, record.interest_earned),
                    (row.reinvested_amount, record.reinvested_amount),
                    (row.closing_balance, record.closing_balance),
                ] {
                    prop_assert!(
                        (parsed - exact).abs() <= 0.005 + 1e-9 * exact.abs().max(1.0),
                        "parsed {} vs exact {}",
                        parsed,
                        exact
                    );
                }
            }
        }

        #[test]
        fn prop_large_balances_round_trip_to_two_decimals(
            mantissa in 1.0f64..10.0,
            exponent in 6i32..300,
            rate_bp in -3_000i32..3_000,
            years in 1u32..8,
            reinvest_bp in 0u32..20_000
        ) {
            let principal = mantissa * 10f64.powi(exponent);
            let schedule = compute(
                principal,
                rate_bp as f64 / 100.0,
                f64::from(years),
                reinvest_bp as f64 / 100.0,
            )
            .expect("generated inputs are valid");
            let csv = build_csv(&schedule.years).expect("export should succeed");
            prop_assert!(!csv.contains("inf"));

            let rows = parse_csv(&csv).expect("export should parse");
            for (row, record) in rows.iter().zip(&schedule.years) {
                for (parsed, exact) in [
                    (row.opening_balance, record.opening_balance),
                    (row.interest_earned, record.interest_earned),
                    (row.reinvested_amount, record.reinvested_amount),
                    (row.closing_balance, record.closing_balance),
                ] {
                    prop_assert!(
                        (parsed - exact).abs() <= 0.005 + 1e-12 * exact.abs(),
                        "parsed {} vs exact {}",
                        parsed,
                        exact
                    );
                }
            }
        }
    }
}
