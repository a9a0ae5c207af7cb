use crate::error::PortfolioError;
use crate::weights::NormalizedWeights;
use core_types::{AssetReturns, Holding, PriceMatrix, ReturnSeries, WeightAssignment};
use ndarray::s;

/// Everything the analytics layer needs to know about one basket.
#[derive(Debug, Clone)]
pub struct PortfolioReturns {
    weights: NormalizedWeights,
    asset_returns: AssetReturns,
    returns: ReturnSeries,
}

impl PortfolioReturns {
    pub fn weights(&self) -> &NormalizedWeights {
        &self.weights
    }

    /// Per-symbol simple returns for the symbols in the basket.
    pub fn asset_returns(&self) -> &AssetReturns {
        &self.asset_returns
    }

    /// The consolidated, weight-blended return series.
    pub fn returns(&self) -> &ReturnSeries {
        &self.returns
    }

    pub fn composition(&self) -> Vec<Holding> {
        self.weights.composition()
    }
}

/// A stateless builder deriving the consolidated portfolio return series.
#[derive(Debug, Default)]
pub struct ReturnBuilder {}

impl ReturnBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes `assignment` and blends per-symbol returns with the resulting
    /// constant weights (equivalent to rebalancing to target every period).
    ///
    /// Columns of `prices` that carry no weight are ignored.
    ///
    /// # Errors
    ///
    /// * `MissingData` if the matrix has no rows or no columns.
    /// * `InvalidWeight` for any weight assignment rejected by normalization.
    /// * `InsufficientData` if fewer than two price rows are available.
    pub fn build(
        &self,
        prices: &PriceMatrix,
        assignment: &WeightAssignment,
    ) -> Result<PortfolioReturns, PortfolioError> {
        if prices.is_empty() {
            return Err(PortfolioError::MissingData(
                "the price matrix is empty".to_string(),
            ));
        }

        let weights = NormalizedWeights::normalize(assignment, prices.symbols())?;
        let selected = prices.select(&weights.symbols())?;

        if selected.len() < 2 {
            return Err(PortfolioError::InsufficientData(format!(
                "{} price observation(s), at least 2 are required",
                selected.len()
            )));
        }

        let asset_returns = simple_returns(&selected)?;
        let blended = asset_returns.values().dot(&weights.as_array());
        let returns = ReturnSeries::new(asset_returns.dates().to_vec(), blended)?;

        tracing::debug!(
            symbols = weights.holdings().len(),
            observations = returns.len(),
            "Built consolidated return series"
        );

        Ok(PortfolioReturns {
            weights,
            asset_returns,
            returns,
        })
    }
}

/// Simple arithmetic returns `p[t] / p[t-1] - 1` for every column.
///
/// The first row is dropped because it has no prior price. A matrix with fewer
/// than two rows yields `InsufficientData`.
pub fn simple_returns(prices: &PriceMatrix) -> Result<AssetReturns, PortfolioError> {
    if prices.len() < 2 {
        return Err(PortfolioError::InsufficientData(format!(
            "{} price observation(s), at least 2 are required",
            prices.len()
        )));
    }

    let p = prices.prices();
    let values = &p.slice(s![1.., ..]) / &p.slice(s![..-1, ..]) - 1.0;

    Ok(AssetReturns::new(
        prices.dates()[1..].to_vec(),
        prices.symbols().to_vec(),
        values,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dates(n: usize) -> Vec<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .iter_days()
            .take(n)
            .collect()
    }

    fn two_asset_matrix() -> PriceMatrix {
        PriceMatrix::from_columns(
            dates(3),
            vec![("A", vec![100.0, 110.0, 99.0]), ("B", vec![50.0, 50.0, 55.0])],
        )
        .unwrap()
    }

    #[test]
    fn test_simple_returns_drop_first_row() {
        let returns = simple_returns(&two_asset_matrix()).unwrap();
        let values = returns.values();

        assert_eq!(returns.dates(), &dates(3)[1..]);
        assert!((values[[0, 0]] - 0.10).abs() < 1e-12);
        assert!((values[[1, 0]] + 0.10).abs() < 1e-12);
        assert_eq!(values[[0, 1]], 0.0);
        assert!((values[[1, 1]] - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_build_blends_with_normalized_weights() {
        let assignment = WeightAssignment::from_pairs([("A", 75.0), ("B", 25.0)]);
        let portfolio = ReturnBuilder::new()
            .build(&two_asset_matrix(), &assignment)
            .unwrap();

        let r = portfolio.returns().values();
        assert_eq!(r.len(), 2);
        assert!((r[0] - 0.075).abs() < 1e-12);
        assert!((r[1] - (0.75 * -0.10 + 0.25 * 0.10)).abs() < 1e-12);
    }

    #[test]
    fn test_build_ignores_unweighted_columns() {
        let assignment = WeightAssignment::from_pairs([("B", 1.0)]);
        let portfolio = ReturnBuilder::new()
            .build(&two_asset_matrix(), &assignment)
            .unwrap();

        assert_eq!(portfolio.asset_returns().symbols(), &["B".to_string()]);
        assert_eq!(portfolio.returns().values()[0], 0.0);
    }

    #[test]
    fn test_build_requires_two_rows() {
        let matrix = PriceMatrix::from_columns(dates(1), vec![("A", vec![100.0])]).unwrap();
        let err = ReturnBuilder::new()
            .build(&matrix, &WeightAssignment::from_pairs([("A", 1.0)]))
            .unwrap_err();
        assert!(matches!(err, PortfolioError::InsufficientData(_)));
    }

    #[test]
    fn test_build_reports_empty_matrix_as_missing_data() {
        let matrix = PriceMatrix::from_columns(Vec::new(), vec![("A", Vec::new())]).unwrap();
        let err = ReturnBuilder::new()
            .build(&matrix, &WeightAssignment::from_pairs([("A", 1.0)]))
            .unwrap_err();
        assert!(matches!(err, PortfolioError::MissingData(_)));
    }

    #[test]
    fn test_build_rejects_symbol_outside_matrix() {
        let err = ReturnBuilder::new()
            .build(
                &two_asset_matrix(),
                &WeightAssignment::from_pairs([("A", 50.0), ("C", 50.0)]),
            )
            .unwrap_err();
        assert!(matches!(err, PortfolioError::InvalidWeight(_)));
    }
}
