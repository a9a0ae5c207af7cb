/// Trading periods used to annualize per-period statistics.
pub const TRADING_DAYS_PER_YEAR: usize = 252;

/// Trading periods used to scale per-period statistics to a month.
pub const TRADING_DAYS_PER_MONTH: usize = 21;
