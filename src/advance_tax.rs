//! Advance tax payment planning.
//!
//! Underpaying income tax in advance triggers a statutory surcharge at
//! year end. Each quarterly prepayment earns a credit at a bonus rate that
//! decreases over the year, so a single payment of `surcharge /
//! bonus_rate(q)` made in quarter `q` cancels the whole year's surcharge.
//! The four options are alternatives: the user picks one, not all four.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::utils::ensure_finite;

/// Simplified flat income tax rate.
pub const TAX_RATE: f64 = 0.25;

/// Statutory surcharge applied to unprepaid tax.
pub const SURCHARGE_RATE: f64 = 0.0675;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// Credit rate earned by a prepayment made in this quarter.
    pub fn bonus_rate(self) -> f64 {
        match self {
            Quarter::Q1 => 0.09,
            Quarter::Q2 => 0.075,
            Quarter::Q3 => 0.06,
            Quarter::Q4 => 0.045,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AdvanceTaxSchedule {
    pub estimated_tax: f64,
    pub total_surcharge: f64,
    /// Alternative single payments, indexed Q1..Q4. Later quarters earn a
    /// lower bonus rate, so the required amount strictly increases.
    pub payment_by_quarter: [f64; 4],
}

impl AdvanceTaxSchedule {
    pub fn payment(&self, quarter: Quarter) -> f64 {
        self.payment_by_quarter[quarter as usize]
    }

    pub fn payment_required(&self) -> bool {
        self.estimated_tax > 0.0
    }
}

pub fn compute_schedule(estimated_annual_income: f64) -> Result<AdvanceTaxSchedule> {
    ensure_finite(
        estimated_annual_income,
        "estimate",
        "advance-tax",
        "estimated_annual_income",
    )?;

    let estimated_tax = if estimated_annual_income > 0.0 {
        estimated_annual_income * TAX_RATE
    } else {
        0.0
    };
    let total_surcharge = estimated_tax * SURCHARGE_RATE;

    let mut payment_by_quarter = [0.0; 4];
    if estimated_tax > 0.0 {
        for quarter in Quarter::ALL {
            payment_by_quarter[quarter as usize] = total_surcharge / quarter.bonus_rate();
        }
    }

    debug!(
        "Advance tax: estimated {:.2}, surcharge {:.2}",
        estimated_tax, total_surcharge
    );

    Ok(AdvanceTaxSchedule {
        estimated_tax,
        total_surcharge,
        payment_by_quarter,
    })
}
