//! Fund model
//!
//! The single fund whose balance is a cached aggregate of the ledger:
//! total income minus total expenses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::Money;

/// The only fund id that exists
pub const FUND_ID: u32 = 1;

/// Singleton fund holding the running balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fund {
    /// Always [`FUND_ID`]
    #[serde(default = "default_fund_id")]
    pub id: u32,

    /// Cached running balance
    pub balance: Money,

    /// When the balance last changed
    pub updated_at: DateTime<Utc>,
}

fn default_fund_id() -> u32 {
    FUND_ID
}

impl Default for Fund {
    fn default() -> Self {
        Self {
            id: FUND_ID,
            balance: Money::zero(),
            updated_at: Utc::now(),
        }
    }
}

impl Fund {
    /// Whether an expense of `amount` can be paid without going negative
    pub fn can_cover(&self, amount: Money) -> bool {
        amount <= self.balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fund_is_empty() {
        let fund = Fund::default();
        assert_eq!(fund.id, FUND_ID);
        assert!(fund.balance.is_zero());
    }

    #[test]
    fn test_can_cover_allows_exact_balance() {
        let fund = Fund {
            balance: Money::from_cents(1000),
            ..Fund::default()
        };
        assert!(fund.can_cover(Money::from_cents(1000)));
        assert!(!fund.can_cover(Money::from_cents(1001)));
    }
}
