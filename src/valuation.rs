//! Profit/loss and "total money" arithmetic.
//!
//! Total money is the invested amount scaled by the percentage gain, not
//! `price * shares`. Every write path (add, edit, refresh) goes through
//! [`refresh_one`] or [`recompute_with_new_inputs`] so the two derived fields
//! never drift apart.

use crate::models::{InvestmentPatch, InvestmentRecord, NewInvestment};

/// Percentage gain of `current` over `purchase`.
///
/// Missing inputs, a zero purchase value and non-finite numbers all yield `0.0`.
///
/// ```
/// use cartera::valuation::profit_loss_percentage;
///
/// assert!((profit_loss_percentage(100.0, 110.0) - 10.0).abs() < 1e-9);
/// assert_eq!(profit_loss_percentage(0.0, 50.0), 0.0);
/// assert_eq!(profit_loss_percentage(None, 50.0), 0.0);
/// ```
pub fn profit_loss_percentage(
    purchase_value: impl Into<Option<f64>>,
    current_value: impl Into<Option<f64>>,
) -> f64 {
    let (Some(purchase), Some(current)) = (purchase_value.into(), current_value.into()) else {
        return 0.0;
    };
    if purchase == 0.0 || !purchase.is_finite() || !current.is_finite() {
        return 0.0;
    }
    let pct = ((current - purchase) / purchase) * 100.0;
    if pct.is_finite() {
        pct
    } else {
        0.0
    }
}

/// `amount + amount * pct / 100`.
pub fn total_money(amount: f64, profit_loss_percentage: f64) -> f64 {
    amount + (amount * profit_loss_percentage / 100.0)
}

/// The inputs a valuation needs from a stored or pending position.
pub trait Position {
    fn purchase_value(&self) -> f64;
    fn amount(&self) -> f64;
}

impl Position for InvestmentRecord {
    fn purchase_value(&self) -> f64 {
        self.purchase_value
    }

    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Position for NewInvestment {
    fn purchase_value(&self) -> f64 {
        self.purchase_value
    }

    fn amount(&self) -> f64 {
        self.amount
    }
}

/// Fields written back after a valuation.
///
/// `purchase_value` and `amount` are only set by [`recompute_with_new_inputs`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationUpdate {
    pub purchase_value: Option<f64>,
    pub amount: Option<f64>,
    pub current_value: f64,
    pub profit_loss_percentage: f64,
    pub total_money: f64,
    pub updated_at: String,
}

impl ValuationUpdate {
    pub fn apply_to(&self, investment: &mut NewInvestment) {
        if let Some(v) = self.purchase_value {
            investment.purchase_value = v;
        }
        if let Some(v) = self.amount {
            investment.amount = v;
        }
        investment.current_value = self.current_value;
        investment.profit_loss_percentage = self.profit_loss_percentage;
        investment.total_money = self.total_money;
        investment.updated_at = self.updated_at.clone();
    }
}

impl From<ValuationUpdate> for InvestmentPatch {
    fn from(update: ValuationUpdate) -> Self {
        InvestmentPatch {
            purchase_value: update.purchase_value,
            amount: update.amount,
            current_value: Some(update.current_value),
            profit_loss_percentage: Some(update.profit_loss_percentage),
            total_money: Some(update.total_money),
            updated_at: Some(update.updated_at),
        }
    }
}

/// Revalue a position at `price`, keeping its stored cost basis and amount.
pub fn refresh_one<P: Position + ?Sized>(position: &P, price: f64, now: &str) -> ValuationUpdate {
    let pct = profit_loss_percentage(position.purchase_value(), price);
    ValuationUpdate {
        purchase_value: None,
        amount: None,
        current_value: price,
        profit_loss_percentage: pct,
        total_money: total_money(position.amount(), pct),
        updated_at: now.to_string(),
    }
}

/// Revalue with a new cost basis and/or amount.
///
/// A new value only counts when it is `> 0`; `Some(0.0)` keeps the stored value,
/// same as `None`. Both resulting inputs are always written back.
pub fn recompute_with_new_inputs<P: Position + ?Sized>(
    position: &P,
    new_purchase_value: Option<f64>,
    new_amount: Option<f64>,
    price: f64,
    now: &str,
) -> ValuationUpdate {
    let purchase = supplied(new_purchase_value).unwrap_or_else(|| position.purchase_value());
    let amount = supplied(new_amount).unwrap_or_else(|| position.amount());
    let pct = profit_loss_percentage(purchase, price);
    ValuationUpdate {
        purchase_value: Some(purchase),
        amount: Some(amount),
        current_value: price,
        profit_loss_percentage: pct,
        total_money: total_money(amount, pct),
        updated_at: now.to_string(),
    }
}

/// `Some(v)` only when `v > 0`.
pub fn supplied(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: &str = "2025-01-02T03:04:05.000000Z";

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_zero_purchase_value_is_zero_percent() {
        for current in [0.0, 1.0, -5.0, 1e12] {
            assert_eq!(profit_loss_percentage(0.0, current), 0.0);
        }
    }

    #[test]
    fn test_missing_or_non_finite_inputs_degrade_to_zero() {
        assert_eq!(profit_loss_percentage(None, None), 0.0);
        assert_eq!(profit_loss_percentage(100.0, None), 0.0);
        assert_eq!(profit_loss_percentage(f64::NAN, 10.0), 0.0);
        assert_eq!(profit_loss_percentage(10.0, f64::INFINITY), 0.0);
    }

    #[test]
    fn test_total_money_formula() {
        assert_eq!(total_money(200.0, 0.0), 200.0);
        assert!(approx(total_money(200.0, 10.0), 220.0));
        assert!(approx(total_money(50.0, -20.0), 40.0));
        assert_eq!(total_money(0.0, 55.0), 0.0);
    }

    #[test]
    fn test_refresh_one_keeps_inputs() {
        let record = InvestmentRecord::new(1, "AAPL", "Apple").with_values(100.0, 200.0, 90.0);
        let update = refresh_one(&record, 110.0, NOW);

        assert_eq!(update.purchase_value, None);
        assert_eq!(update.amount, None);
        assert_eq!(update.current_value, 110.0);
        assert!(approx(update.profit_loss_percentage, 10.0));
        assert!(approx(update.total_money, 220.0));
        assert_eq!(update.updated_at, NOW);
    }

    #[test]
    fn test_refresh_one_with_zero_price_marks_total_loss() {
        let record = InvestmentRecord::new(1, "GONE", "Delisted").with_values(10.0, 500.0, 8.0);
        let update = refresh_one(&record, 0.0, NOW);
        assert_eq!(update.current_value, 0.0);
        assert!(approx(update.profit_loss_percentage, -100.0));
        assert!(approx(update.total_money, 0.0));
    }

    #[test]
    fn test_recompute_uses_supplied_positive_values() {
        let record = InvestmentRecord::new(1, "AAPL", "Apple").with_values(100.0, 200.0, 90.0);
        let update = recompute_with_new_inputs(&record, Some(50.0), Some(1000.0), 60.0, NOW);

        assert_eq!(update.purchase_value, Some(50.0));
        assert_eq!(update.amount, Some(1000.0));
        assert!(approx(update.profit_loss_percentage, 20.0));
        assert!(approx(update.total_money, 1200.0));
    }

    #[test]
    fn test_recompute_treats_zero_as_not_supplied() {
        let record = InvestmentRecord::new(1, "AAPL", "Apple").with_values(100.0, 200.0, 90.0);
        let update = recompute_with_new_inputs(&record, Some(120.0), Some(0.0), 132.0, NOW);

        assert_eq!(update.purchase_value, Some(120.0));
        assert_eq!(update.amount, Some(200.0));
        assert!(approx(update.total_money, 220.0));
    }

    #[test]
    fn test_update_into_patch() {
        let record = InvestmentRecord::new(1, "AAPL", "Apple").with_values(100.0, 200.0, 90.0);
        let patch: InvestmentPatch = refresh_one(&record, 110.0, NOW).into();

        assert_eq!(patch.purchase_value, None);
        assert_eq!(patch.amount, None);
        assert_eq!(patch.current_value, Some(110.0));
        assert_eq!(patch.updated_at.as_deref(), Some(NOW));
    }

    #[test]
    fn test_end_to_end_two_records() {
        let records = [
            InvestmentRecord::new(1, "A", "A").with_values(100.0, 200.0, 110.0),
            InvestmentRecord::new(2, "B", "B").with_values(50.0, 50.0, 40.0),
        ];
        let updates: Vec<_> = records
            .iter()
            .map(|r| refresh_one(r, r.current_value, NOW))
            .collect();

        assert!(approx(updates[0].profit_loss_percentage, 10.0));
        assert!(approx(updates[1].profit_loss_percentage, -20.0));
        assert!(approx(updates[0].total_money, 220.0));
        assert!(approx(updates[1].total_money, 40.0));
        let flat: f64 = updates.iter().map(|u| u.total_money).sum();
        assert!(approx(flat, 260.0));
    }
}
