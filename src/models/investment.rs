use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::numeric::{lenient_f64, lenient_string};
use super::InvestmentId;

/// One purchased position as stored in the `investments` table.
///
/// `total_money` and `profit_loss_percentage` are derived, stored fields. They are
/// only ever written together (see [`crate::valuation`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentRecord {
    pub id: InvestmentId,
    /// Market ticker, or a free-text label for positions without a market price.
    #[serde(default, deserialize_with = "lenient_string")]
    pub isin: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub asset_name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub purchase_value: f64,
    /// Invested money, not a share count.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub current_value: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_money: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub profit_loss_percentage: f64,
    #[serde(default)]
    pub investment_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Columns this crate does not interpret, kept so responses echo the full row.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InvestmentRecord {
    /// Minimal row, mostly useful for tests and the in-memory store.
    pub fn new(id: i64, isin: impl Into<String>, asset_name: impl Into<String>) -> Self {
        Self {
            id: InvestmentId::new(id),
            isin: isin.into(),
            asset_name: asset_name.into(),
            purchase_value: 0.0,
            amount: 0.0,
            current_value: 0.0,
            total_money: 0.0,
            profit_loss_percentage: 0.0,
            investment_type: None,
            created_at: None,
            updated_at: None,
            extra: Map::new(),
        }
    }

    pub fn with_type(mut self, investment_type: impl Into<String>) -> Self {
        self.investment_type = Some(investment_type.into());
        self
    }

    pub fn with_values(mut self, purchase_value: f64, amount: f64, current_value: f64) -> Self {
        self.purchase_value = purchase_value;
        self.amount = amount;
        self.current_value = current_value;
        self
    }

    pub fn with_total_money(mut self, total_money: f64) -> Self {
        self.total_money = total_money;
        self
    }

    /// Apply a partial update in place (what the store does on `update`).
    pub fn apply(&mut self, patch: &InvestmentPatch) {
        if let Some(v) = patch.purchase_value {
            self.purchase_value = v;
        }
        if let Some(v) = patch.amount {
            self.amount = v;
        }
        if let Some(v) = patch.current_value {
            self.current_value = v;
        }
        if let Some(v) = patch.profit_loss_percentage {
            self.profit_loss_percentage = v;
        }
        if let Some(v) = patch.total_money {
            self.total_money = v;
        }
        if let Some(v) = &patch.updated_at {
            self.updated_at = Some(v.clone());
        }
    }
}

/// Insert payload: a record before the store has assigned its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvestment {
    pub isin: String,
    pub asset_name: String,
    pub purchase_value: f64,
    pub amount: f64,
    pub current_value: f64,
    pub total_money: f64,
    pub profit_loss_percentage: f64,
    pub investment_type: String,
    pub created_at: String,
    pub updated_at: String,
}

impl NewInvestment {
    pub fn into_record(self, id: InvestmentId) -> InvestmentRecord {
        InvestmentRecord {
            id,
            isin: self.isin,
            asset_name: self.asset_name,
            purchase_value: self.purchase_value,
            amount: self.amount,
            current_value: self.current_value,
            total_money: self.total_money,
            profit_loss_percentage: self.profit_loss_percentage,
            investment_type: Some(self.investment_type),
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
            extra: Map::new(),
        }
    }
}

/// Partial update sent to the store. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_loss_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_money: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}
