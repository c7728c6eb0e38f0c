//! Position sizers built on [`OandaCommInfo`].
//!
//! An open position is never resized: its current size is returned as-is.

use crate::commission::OandaCommInfo;
use crate::error::{StoreError, StoreResult};

/// Inputs shared by every sizer.
#[derive(Clone, Copy, Debug, Default)]
pub struct SizingRequest {
    /// Latest close of the instrument
    pub close: f64,
    /// Size of the open position, 0 when flat
    pub position: f64,
    /// Stop distance in pips, falls back to the sizer's default
    pub pips: Option<f64>,
    /// Account-to-counter currency rate when the account is in neither currency
    pub exchange_rate: Option<f64>,
}

fn reduce(avail: f64, reduce_perc: f64) -> f64 {
    if reduce_perc > 0.0 {
        avail - avail / 100.0 * reduce_perc
    } else {
        avail
    }
}

/// Sizes by a share of available cash or a fixed cash amount.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CashSizer {
    pub percents: f64,
    pub amount: f64,
    pub avail_reduce_perc: f64,
}

impl CashSizer {
    pub fn percent() -> Self {
        Self {
            percents: 5.0,
            ..Default::default()
        }
    }

    pub fn cash() -> Self {
        Self {
            amount: 50.0,
            ..Default::default()
        }
    }

    pub fn size(&self, comm: &OandaCommInfo, cash: f64, req: &SizingRequest) -> i64 {
        if req.position != 0.0 {
            return req.position.trunc() as i64;
        }
        if cash <= 0.0 {
            return 0;
        }

        let avail = reduce(comm.get_size(req.close, cash) as f64, self.avail_reduce_perc);
        let size = if self.percents != 0.0 {
            avail * (self.percents / 100.0)
        } else if self.amount != 0.0 {
            (avail / cash) * self.amount
        } else {
            0.0
        };
        size.trunc() as i64
    }
}

/// Sizes so that a stop `pips` away loses a share of account value or a
/// fixed amount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RiskSizer {
    pub percents: f64,
    pub amount: f64,
    pub pips: f64,
    pub avail_reduce_perc: f64,
}

impl Default for RiskSizer {
    fn default() -> Self {
        Self {
            percents: 0.0,
            amount: 0.0,
            pips: 5.0,
            avail_reduce_perc: 0.0,
        }
    }
}

impl RiskSizer {
    pub fn percent() -> Self {
        Self {
            percents: 5.0,
            ..Default::default()
        }
    }

    pub fn cash() -> Self {
        Self {
            amount: 50.0,
            ..Default::default()
        }
    }

    /// `value` is the account value, which is also the sizing cash basis.
    pub fn size(&self, comm: &OandaCommInfo, value: f64, req: &SizingRequest) -> StoreResult<i64> {
        if req.position != 0.0 {
            return Ok(req.position.trunc() as i64);
        }

        let pips = match req.pips {
            Some(p) if p != 0.0 => p,
            _ => self.pips,
        };
        if pips <= 0.0 {
            return Err(StoreError::Sizing(format!("stop distance must be positive, got {}", pips)));
        }

        let avail = reduce(comm.get_size(req.close, value) as f64, self.avail_reduce_perc);
        let cash_to_use = if self.percents != 0.0 {
            value * (self.percents / 100.0)
        } else if self.amount != 0.0 {
            self.amount
        } else {
            return Err(StoreError::Sizing("either percents or amount is needed".to_string()));
        };

        let mult = comm.pip_multiplier();
        let price_per_pip = cash_to_use / pips;
        let exchange_rate = req.exchange_rate.filter(|r| *r != 0.0);

        let size = if !comm.params().acc_counter_currency && req.close != 0.0 {
            // account in the base currency
            price_per_pip * req.close * mult
        } else if let Some(rate) = exchange_rate {
            price_per_pip * rate * mult
        } else {
            price_per_pip * mult
        };

        Ok(size.min(avail).trunc() as i64)
    }
}
