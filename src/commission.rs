//! Spread-based forex commission scheme for backtests against OANDA pricing.
//!
//! Half the spread cost is charged on entry and half on exit.

use serde::Deserialize;

use crate::error::{StoreError, StoreResult};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CommissionConfig {
    /// Spread in pips
    pub spread: f64,
    /// Account currency is the pair's counter currency
    pub acc_counter_currency: bool,
    /// Decimal exponent of one pip
    pub pip_location: i32,
    pub margin: f64,
    pub leverage: f64,
    pub stocklike: bool,
}

impl Default for CommissionConfig {
    fn default() -> Self {
        Self {
            spread: 0.0,
            acc_counter_currency: true,
            pip_location: -4,
            margin: 0.5,
            leverage: 20.0,
            stocklike: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct OandaCommInfo {
    params: CommissionConfig,
}

impl OandaCommInfo {
    pub fn new(params: CommissionConfig) -> StoreResult<Self> {
        if params.stocklike {
            return Err(StoreError::UnsupportedCommission(
                "stocklike is not supported".to_string(),
            ));
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &CommissionConfig {
        &self.params
    }

    /// Units affordable with `cash` at `price`.
    pub fn get_size(&self, price: f64, cash: f64) -> i64 {
        let p = &self.params;
        if p.margin <= 0.0 || (!p.acc_counter_currency && price <= 0.0) {
            return 0;
        }

        let base = (p.leverage * (cash / p.margin).floor()).trunc();
        let mut size = base * p.margin;
        if !p.acc_counter_currency {
            size /= price;
        }
        size.trunc() as i64
    }

    /// Commission for one side of a trade of `size` units.
    pub fn commission(&self, size: f64, price: f64) -> f64 {
        let p = &self.params;
        let multiplier = 10f64.powi(p.pip_location);
        let comm = if p.acc_counter_currency {
            (p.spread * (size * multiplier)).abs()
        } else {
            (p.spread * ((size / price) * multiplier)).abs()
        };
        comm / 2.0
    }

    /// Units per pip, i.e. `10^-pip_location`.
    pub fn pip_multiplier(&self) -> f64 {
        10f64.powi(-self.params.pip_location)
    }
}
