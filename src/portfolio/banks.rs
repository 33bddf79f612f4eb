use crate::models::BankAccount;
use crate::valuation::total_money;

use super::models::{BankSummary, BankTotals};

/// Balances plus a one-year projection at each account's interest rate.
pub fn bank_summary(accounts: &[BankAccount]) -> BankSummary {
    let investment: f64 = accounts.iter().map(|a| a.balance).sum();
    let result: f64 = accounts
        .iter()
        .filter(|a| !a.has_note())
        .map(|a| total_money(a.balance, a.interest_rate))
        .sum();

    BankSummary {
        banks: accounts.to_vec(),
        totals: BankTotals {
            investment,
            result,
            accounts: accounts.len(),
        },
    }
}
