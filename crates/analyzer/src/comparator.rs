use analytics::{Metric, MetricsReport};
use serde::Serialize;
use std::fmt;

/// One of the two baskets under comparison, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    A,
    B,
    Tie,
}

/// A metric the comparator scores, together with which direction is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dimension {
    Cagr,
    AnnualVolatility,
    SharpeRatio,
    MaxDrawdown,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Cagr,
        Dimension::AnnualVolatility,
        Dimension::SharpeRatio,
        Dimension::MaxDrawdown,
    ];

    pub fn metric(&self) -> Metric {
        match self {
            Dimension::Cagr => Metric::Cagr,
            Dimension::AnnualVolatility => Metric::AnnualVolatility,
            Dimension::SharpeRatio => Metric::SharpeRatio,
            Dimension::MaxDrawdown => Metric::MaxDrawdown,
        }
    }

    /// Lower volatility wins; for every other dimension the higher value wins.
    /// Max drawdown is negative, so higher means shallower.
    pub fn higher_is_better(&self) -> bool {
        !matches!(self, Dimension::AnnualVolatility)
    }

    fn winner(&self, a: f64, b: f64) -> Side {
        let (better, worse) = if self.higher_is_better() { (a, b) } else { (b, a) };
        if better > worse {
            Side::A
        } else if worse > better {
            Side::B
        } else {
            // Equal, or at least one side is NaN.
            Side::Tie
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.metric().label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DimensionOutcome {
    pub dimension: Dimension,
    pub value_a: f64,
    pub value_b: f64,
    pub winner: Side,
    /// `|value_a - value_b|`
    pub difference: f64,
}

/// The overall result of the head-to-head tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    A,
    B,
    Balanced,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::A => write!(f, "A"),
            Verdict::B => write!(f, "B"),
            Verdict::Balanced => write!(f, "balanced"),
        }
    }
}

/// Guidance derived from the growth and risk-adjusted dimensions only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    /// The side is at least as good on both CAGR and Sharpe ratio.
    GrowthAndRiskAdjusted(Side),
    /// The side grows faster but trails on Sharpe ratio.
    HigherGrowth(Side),
    /// Neither side leads on growth or risk-adjusted return.
    Comparable,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::GrowthAndRiskAdjusted(side) => {
                write!(f, "Portfolio {:?}: better for growth and risk-adjusted returns", side)
            }
            Recommendation::HigherGrowth(side) => {
                write!(f, "Portfolio {:?}: higher growth, check the risk metrics", side)
            }
            Recommendation::Comparable => write!(f, "Comparable performance"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub outcomes: Vec<DimensionOutcome>,
    pub score_a: u8,
    pub score_b: u8,
    pub verdict: Verdict,
    pub recommendation: Recommendation,
}

impl Comparison {
    /// Number of scored dimensions, the maximum either score can reach.
    pub fn dimensions(&self) -> usize {
        self.outcomes.len()
    }

    pub fn outcome(&self, dimension: Dimension) -> Option<&DimensionOutcome> {
        self.outcomes.iter().find(|o| o.dimension == dimension)
    }
}

/// Scores two metric reports head to head.
#[derive(Debug, Default)]
pub struct Comparator {}

impl Comparator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Awards one point per dimension to the better side. A tie awards nothing;
    /// the verdict goes to the side with more points, or `Balanced` on equal scores.
    pub fn compare(&self, a: &MetricsReport, b: &MetricsReport) -> Comparison {
        let outcomes: Vec<DimensionOutcome> = Dimension::ALL
            .iter()
            .map(|&dimension| {
                let value_a = a.get(dimension.metric());
                let value_b = b.get(dimension.metric());
                DimensionOutcome {
                    dimension,
                    value_a,
                    value_b,
                    winner: dimension.winner(value_a, value_b),
                    difference: (value_a - value_b).abs(),
                }
            })
            .collect();

        let score_a = outcomes.iter().filter(|o| o.winner == Side::A).count() as u8;
        let score_b = outcomes.iter().filter(|o| o.winner == Side::B).count() as u8;
        let verdict = match score_a.cmp(&score_b) {
            std::cmp::Ordering::Greater => Verdict::A,
            std::cmp::Ordering::Less => Verdict::B,
            std::cmp::Ordering::Equal => Verdict::Balanced,
        };

        tracing::debug!(score_a, score_b, %verdict, "Compared portfolios");

        Comparison {
            outcomes,
            score_a,
            score_b,
            verdict,
            recommendation: recommend(a, b),
        }
    }
}

fn recommend(a: &MetricsReport, b: &MetricsReport) -> Recommendation {
    let growth = Dimension::Cagr.winner(a.cagr, b.cagr);
    let risk_adjusted = Dimension::SharpeRatio.winner(a.sharpe_ratio, b.sharpe_ratio);

    match (growth, risk_adjusted) {
        (Side::Tie, Side::Tie) => Recommendation::Comparable,
        (Side::A, Side::A | Side::Tie) | (Side::Tie, Side::A) => {
            Recommendation::GrowthAndRiskAdjusted(Side::A)
        }
        (Side::B, Side::B | Side::Tie) | (Side::Tie, Side::B) => {
            Recommendation::GrowthAndRiskAdjusted(Side::B)
        }
        (side, _) => Recommendation::HigherGrowth(side),
    }
}
