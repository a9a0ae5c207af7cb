use crate::error::CoreError;
use chrono::NaiveDate;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// Adjusted closing prices: one row per trading date, one column per symbol.
///
/// Rows are strictly increasing by date and every price is positive and finite.
/// An empty matrix (zero rows) is representable so that providers can hand back
/// "nothing found" without inventing data; the portfolio layer rejects it.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceMatrix {
    dates: Vec<NaiveDate>,
    symbols: Vec<String>,
    prices: Array2<f64>,
}

impl PriceMatrix {
    pub fn new(
        dates: Vec<NaiveDate>,
        symbols: Vec<String>,
        prices: Array2<f64>,
    ) -> Result<Self, CoreError> {
        if prices.nrows() != dates.len() {
            return Err(CoreError::ShapeMismatch(format!(
                "{} price rows for {} dates",
                prices.nrows(),
                dates.len()
            )));
        }
        if prices.ncols() != symbols.len() {
            return Err(CoreError::ShapeMismatch(format!(
                "{} price columns for {} symbols",
                prices.ncols(),
                symbols.len()
            )));
        }

        let mut seen = HashSet::new();
        for symbol in &symbols {
            if !seen.insert(symbol.as_str()) {
                return Err(CoreError::InvalidInput(
                    "symbols".to_string(),
                    format!("duplicate column '{}'", symbol),
                ));
            }
        }

        if let Some(w) = dates.windows(2).find(|w| w[1] <= w[0]) {
            return Err(CoreError::InvalidInput(
                "dates".to_string(),
                format!("{} does not follow {}", w[1], w[0]),
            ));
        }

        for ((row, col), &price) in prices.indexed_iter() {
            if !price.is_finite() || price <= 0.0 {
                return Err(CoreError::InvalidPrice {
                    symbol: symbols[col].clone(),
                    date: dates[row],
                    price,
                });
            }
        }

        Ok(Self {
            dates,
            symbols,
            prices,
        })
    }

    /// Builds a matrix from per-symbol price columns sharing one date index.
    pub fn from_columns<S: Into<String>>(
        dates: Vec<NaiveDate>,
        columns: Vec<(S, Vec<f64>)>,
    ) -> Result<Self, CoreError> {
        let (symbols, columns): (Vec<String>, Vec<Vec<f64>>) = columns
            .into_iter()
            .map(|(symbol, values)| (symbol.into(), values))
            .unzip();

        if let Some((symbol, column)) = symbols
            .iter()
            .zip(&columns)
            .find(|(_, column)| column.len() != dates.len())
        {
            return Err(CoreError::ShapeMismatch(format!(
                "column '{}' has {} prices for {} dates",
                symbol,
                column.len(),
                dates.len()
            )));
        }

        let prices = Array2::from_shape_fn((dates.len(), symbols.len()), |(row, col)| {
            columns[col][row]
        });
        Self::new(dates, symbols, prices)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn prices(&self) -> ArrayView2<'_, f64> {
        self.prices.view()
    }

    /// Number of dated rows.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.symbols.is_empty()
    }

    pub fn column_index(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    pub fn column(&self, symbol: &str) -> Option<ArrayView1<'_, f64>> {
        self.column_index(symbol)
            .map(|idx| self.prices.index_axis(Axis(1), idx))
    }

    /// Returns a matrix restricted to `symbols`, in the order given.
    pub fn select(&self, symbols: &[String]) -> Result<Self, CoreError> {
        let indices = symbols
            .iter()
            .map(|symbol| {
                self.column_index(symbol).ok_or_else(|| {
                    CoreError::InvalidInput(
                        "symbols".to_string(),
                        format!("'{}' is not a column of the price matrix", symbol),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            dates: self.dates.clone(),
            symbols: symbols.to_vec(),
            prices: self.prices.select(Axis(1), &indices),
        })
    }

    /// Keeps only the last `rows` rows (or everything when fewer exist).
    pub fn tail(&self, rows: usize) -> Self {
        let start = self.len().saturating_sub(rows);
        Self {
            dates: self.dates[start..].to_vec(),
            symbols: self.symbols.clone(),
            prices: self.prices.slice(ndarray::s![start.., ..]).to_owned(),
        }
    }
}

/// One dated value of a series, the shape handed to charting and JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Per-period fractional returns indexed by the date each period ends on.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    dates: Vec<NaiveDate>,
    values: Array1<f64>,
}

impl ReturnSeries {
    pub fn new(dates: Vec<NaiveDate>, values: Array1<f64>) -> Result<Self, CoreError> {
        if dates.len() != values.len() {
            return Err(CoreError::ShapeMismatch(format!(
                "{} returns for {} dates",
                values.len(),
                dates.len()
            )));
        }
        Ok(Self { dates, values })
    }

    /// Dates the values on consecutive calendar days starting at `start`.
    pub fn daily(start: NaiveDate, values: Vec<f64>) -> Self {
        let dates = start.iter_days().take(values.len()).collect();
        Self {
            dates,
            values: Array1::from(values),
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn points(&self) -> Vec<SeriesPoint> {
        self.dates
            .iter()
            .zip(self.values.iter())
            .map(|(&date, &value)| SeriesPoint { date, value })
            .collect()
    }
}

/// Per-symbol simple returns, the columnar intermediate of the return builder.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetReturns {
    dates: Vec<NaiveDate>,
    symbols: Vec<String>,
    values: Array2<f64>,
}

impl AssetReturns {
    pub fn new(
        dates: Vec<NaiveDate>,
        symbols: Vec<String>,
        values: Array2<f64>,
    ) -> Result<Self, CoreError> {
        if values.dim() != (dates.len(), symbols.len()) {
            return Err(CoreError::ShapeMismatch(format!(
                "{:?} returns for {} dates x {} symbols",
                values.dim(),
                dates.len(),
                symbols.len()
            )));
        }
        Ok(Self {
            dates,
            symbols,
            values,
        })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// The return series of a single symbol, if present.
    pub fn series(&self, symbol: &str) -> Option<ReturnSeries> {
        let idx = self.symbols.iter().position(|s| s == symbol)?;
        Some(ReturnSeries {
            dates: self.dates.clone(),
            values: self.values.index_axis(Axis(1), idx).to_owned(),
        })
    }
}

/// A raw, unnormalized weight per symbol on an arbitrary positive scale.
///
/// Insertion order is preserved. Repeating a symbol adds to its total weight.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightAssignment {
    entries: Vec<(String, f64)>,
}

impl WeightAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        pairs
            .into_iter()
            .fold(Self::new(), |acc, (symbol, weight)| acc.with(symbol, weight))
    }

    pub fn with(mut self, symbol: impl Into<String>, weight: f64) -> Self {
        let symbol = symbol.into();
        match self.entries.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, total)) => *total += weight,
            None => self.entries.push((symbol, weight)),
        }
        self
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, w)| *w)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(s, w)| (s.as_str(), *w))
    }

    pub fn symbols(&self) -> Vec<String> {
        self.entries.iter().map(|(s, _)| s.clone()).collect()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromStr for WeightAssignment {
    type Err = CoreError;

    /// Parses `SYMBOL=WEIGHT` pairs separated by commas, e.g. `TCS=60,INFY=40`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .try_fold(Self::new(), |acc, pair| {
                let (symbol, weight) = pair.split_once('=').ok_or_else(|| {
                    CoreError::InvalidInput(
                        "weights".to_string(),
                        format!("expected SYMBOL=WEIGHT, got '{}'", pair),
                    )
                })?;
                let weight: f64 = weight.trim().parse().map_err(|_| {
                    CoreError::InvalidInput(
                        "weights".to_string(),
                        format!("'{}' is not a number", weight.trim()),
                    )
                })?;
                Ok(acc.with(symbol.trim(), weight))
            })
    }
}

/// A symbol and its normalized weight (fraction of the basket).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub weight: f64,
}

impl Holding {
    pub fn weight_pct(&self) -> f64 {
        self.weight * 100.0
    }
}
