use crate::constants::TRADING_DAYS_PER_YEAR;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The look-back window requested from the market-data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "3y")]
    ThreeYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
}

impl Period {
    pub const ALL: [Period; 4] = [
        Period::OneYear,
        Period::ThreeYears,
        Period::FiveYears,
        Period::TenYears,
    ];

    pub fn years(&self) -> usize {
        match self {
            Period::OneYear => 1,
            Period::ThreeYears => 3,
            Period::FiveYears => 5,
            Period::TenYears => 10,
        }
    }

    /// Number of return observations the window covers.
    pub fn trading_days(&self) -> usize {
        self.years() * TRADING_DAYS_PER_YEAR
    }

    /// Number of price rows needed to produce `trading_days` returns.
    pub fn price_rows(&self) -> usize {
        self.trading_days() + 1
    }

    pub fn code(&self) -> &'static str {
        match self {
            Period::OneYear => "1y",
            Period::ThreeYears => "3y",
            Period::FiveYears => "5y",
            Period::TenYears => "10y",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CoreError::InvalidInput(
                    "period".to_string(),
                    format!("'{}' is not one of 1y, 3y, 5y, 10y", s),
                )
            })
    }
}
