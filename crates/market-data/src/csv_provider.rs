use crate::error::MarketDataError;
use crate::{PriceProvider, finish};
use chrono::NaiveDate;
use core_types::{Period, PriceMatrix};
use csv::{ReaderBuilder, StringRecord, Trim};
use ndarray::Array2;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reads close prices from a wide CSV file:
///
/// ```text
/// date,TCS,INFY,HDFCBANK
/// 2024-01-01,3700.5,1500.2,1650.0
/// ```
///
/// The date column is the one headed `date` (any case), or the first column if
/// none is. Rows are sorted by date. A row with an empty or `NaN` cell in any
/// requested column is dropped, so the result only holds dates on which every
/// symbol traded.
#[derive(Debug, Clone)]
pub struct CsvPriceProvider {
    path: PathBuf,
}

impl CsvPriceProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PriceProvider for CsvPriceProvider {
    fn fetch(&self, symbols: &[String], period: Period) -> Result<PriceMatrix, MarketDataError> {
        let file = File::open(&self.path)?;
        let matrix = read_prices(file, symbols)?;
        finish(matrix, symbols, period)
    }
}

/// Parses a wide price table, keeping only `symbols` (all columns when empty).
pub fn read_prices<R: Read>(reader: R, symbols: &[String]) -> Result<PriceMatrix, MarketDataError> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let date_col = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("date"))
        .unwrap_or(0);

    let columns: Vec<(usize, String)> = if symbols.is_empty() {
        headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != date_col)
            .map(|(idx, h)| (idx, h.to_string()))
            .collect()
    } else {
        symbols
            .iter()
            .filter_map(|symbol| match headers.iter().position(|h| h == symbol) {
                Some(idx) if idx != date_col => Some((idx, symbol.clone())),
                _ => {
                    tracing::warn!(%symbol, "Symbol not found in price file");
                    None
                }
            })
            .collect()
    };

    let mut rows: Vec<(NaiveDate, Vec<f64>)> = Vec::new();
    let mut dropped = 0usize;
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let date = parse_date(&record, date_col, line)?;
        match parse_row(&record, &columns, line)? {
            Some(prices) => rows.push((date, prices)),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        tracing::debug!(dropped, "Dropped rows with missing prices");
    }

    rows.sort_by_key(|(date, _)| *date);

    let prices = Array2::from_shape_fn((rows.len(), columns.len()), |(row, col)| rows[row].1[col]);
    let dates = rows.into_iter().map(|(date, _)| date).collect();
    let symbols = columns.into_iter().map(|(_, symbol)| symbol).collect();

    Ok(PriceMatrix::new(dates, symbols, prices)?)
}

fn parse_date(record: &StringRecord, col: usize, line: u64) -> Result<NaiveDate, MarketDataError> {
    let raw = record.get(col).unwrap_or_default();
    // Timestamps such as "2024-01-02 00:00:00+05:30" keep only the date part.
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, DATE_FORMAT).map_err(|e| MarketDataError::Parse {
        line,
        message: format!("'{}' is not a date ({})", raw, e),
    })
}

/// `None` when any requested cell is missing.
fn parse_row(
    record: &StringRecord,
    columns: &[(usize, String)],
    line: u64,
) -> Result<Option<Vec<f64>>, MarketDataError> {
    let mut prices = Vec::with_capacity(columns.len());
    for (idx, symbol) in columns {
        let raw = record.get(*idx).unwrap_or_default();
        if raw.is_empty() || raw.eq_ignore_ascii_case("nan") || raw.eq_ignore_ascii_case("null") {
            return Ok(None);
        }
        let price = raw.parse::<f64>().map_err(|e| MarketDataError::Parse {
            line,
            message: format!("{} price '{}' is not a number ({})", symbol, raw, e),
        })?;
        prices.push(price);
    }
    Ok(Some(prices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PRICES: &str = "\
Date,TCS,INFY,NIFTY
2024-01-03,102.0,51.0,1010.0
2024-01-01,100.0,50.0,1000.0
2024-01-02,101.0,,1005.0
2024-01-04,103.0,52.0,1020.0
";

    #[test]
    fn test_read_sorts_and_drops_incomplete_rows() {
        let symbols = vec!["TCS".to_string(), "INFY".to_string()];
        let matrix = read_prices(PRICES.as_bytes(), &symbols).unwrap();

        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.symbols(), symbols.as_slice());
        assert_eq!(matrix.dates()[0], NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(matrix.column("INFY").unwrap().to_vec(), vec![50.0, 51.0, 52.0]);
    }

    #[test]
    fn test_missing_cell_only_matters_for_requested_columns() {
        let matrix = read_prices(PRICES.as_bytes(), &["TCS".to_string()]).unwrap();
        assert_eq!(matrix.len(), 4);
    }

    #[test]
    fn test_empty_request_reads_every_column() {
        let matrix = read_prices(PRICES.as_bytes(), &[]).unwrap();
        assert_eq!(matrix.symbols().len(), 3);
        assert_eq!(matrix.len(), 3);
    }

    #[test]
    fn test_bad_number_reports_line() {
        let data = "date,TCS\n2024-01-01,100\n2024-01-02,abc\n";
        let err = read_prices(data.as_bytes(), &["TCS".to_string()]).unwrap_err();
        assert!(matches!(err, MarketDataError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_bad_date_is_a_parse_error() {
        let data = "date,TCS\n01/02/2024,100\n";
        let err = read_prices(data.as_bytes(), &["TCS".to_string()]).unwrap_err();
        assert!(matches!(err, MarketDataError::Parse { .. }));
    }

    #[test]
    fn test_non_positive_price_is_rejected() {
        let data = "date,TCS\n2024-01-01,100\n2024-01-02,0\n";
        let err = read_prices(data.as_bytes(), &["TCS".to_string()]).unwrap_err();
        assert!(matches!(err, MarketDataError::Core(_)));
    }

    #[test]
    fn test_fetch_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PRICES.as_bytes()).unwrap();

        let provider = CsvPriceProvider::new(file.path());
        let matrix = provider
            .fetch(&["NIFTY".to_string()], Period::OneYear)
            .unwrap();
        assert_eq!(matrix.len(), 4);

        let err = provider.fetch(&["UNKNOWN".to_string()], Period::OneYear).unwrap_err();
        assert!(matches!(err, MarketDataError::NoData(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let provider = CsvPriceProvider::new("no/such/prices.csv");
        let err = provider.fetch(&[], Period::OneYear).unwrap_err();
        assert!(matches!(err, MarketDataError::Io(_)));
    }
}
