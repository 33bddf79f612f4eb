use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::categorize::is_non_tradable_isin;
use crate::clock::Clock;
use crate::error::{PortfolioError, Result};
use crate::format::format_currency;
use crate::market_data::PriceSource;
use crate::models::numeric::{is_truthy, to_f64, to_text};
use crate::models::{BankAccount, InvestmentRecord, NewInvestment};
use crate::storage::InvestmentStore;
use crate::valuation::{recompute_with_new_inputs, refresh_one, supplied};

use super::aggregate;
use super::banks::bank_summary;
use super::models::{
    AddInvestmentRequest, BankSummary, CategorizedTables, Composition, EditInvestmentRequest,
    Overview, RankedComposition, RefreshOutcome, TypeSummary,
};

/// `investment_type` stored when an add request does not name one.
pub const DEFAULT_INVESTMENT_TYPE: &str = "Otros";

/// Portfolio operations over an injected store, price source and clock.
///
/// Read operations that have nothing to show return `Ok(None)`; `overview` is
/// the exception and reports [`PortfolioError::NotFound`].
pub struct PortfolioService {
    store: Arc<dyn InvestmentStore>,
    prices: Arc<dyn PriceSource>,
    clock: Arc<dyn Clock>,
    banks: Vec<BankAccount>,
}

impl PortfolioService {
    pub fn new(
        store: Arc<dyn InvestmentStore>,
        prices: Arc<dyn PriceSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            prices,
            clock,
            banks: Vec::new(),
        }
    }

    pub fn with_banks(mut self, banks: Vec<BankAccount>) -> Self {
        self.banks = banks;
        self
    }

    async fn records(&self) -> Result<Vec<InvestmentRecord>> {
        let records = self.store.list_all().await?;
        debug!(count = records.len(), "loaded investments");
        Ok(records)
    }

    pub async fn overview(&self) -> Result<Overview> {
        let investments = self.records().await?;
        if investments.is_empty() {
            return Err(PortfolioError::not_found("No investments found"));
        }
        let totals = aggregate::flat_totals(&investments);
        Ok(Overview {
            investments,
            totals,
        })
    }

    pub async fn tables(&self) -> Result<Option<CategorizedTables>> {
        let records = self.records().await?;
        if records.is_empty() {
            return Ok(None);
        }
        Ok(Some(aggregate::categorized_tables(&records)))
    }

    pub async fn composition(&self) -> Result<Option<Composition>> {
        let records = self.records().await?;
        if records.is_empty() {
            return Ok(None);
        }
        let composition = aggregate::composition(&records);
        info!(
            total = %format_currency(composition.categories.totals.0.overall),
            "composition computed"
        );
        Ok(Some(composition))
    }

    pub async fn ranked(&self) -> Result<Option<RankedComposition>> {
        let records = self.records().await?;
        if records.is_empty() {
            return Ok(None);
        }
        Ok(Some(aggregate::ranked_composition(&records)))
    }

    pub async fn type_summary(&self) -> Result<TypeSummary> {
        let records = self.records().await?;
        Ok(aggregate::type_summary(&records))
    }

    pub fn banks(&self) -> BankSummary {
        bank_summary(&self.banks)
    }

    /// Validate, price and insert a new position. Returns the stored row.
    pub async fn add(&self, request: AddInvestmentRequest) -> Result<InvestmentRecord> {
        let required = [
            ("isin", &request.isin),
            ("asset_name", &request.asset_name),
            ("purchase_value", &request.purchase_value),
            ("amount", &request.amount),
        ];
        for (field, value) in required {
            if !is_truthy(value.as_ref()) {
                return Err(PortfolioError::validation(format!(
                    "Missing required field: {field}"
                )));
            }
        }

        let isin = required_text("isin", request.isin.as_ref())?;
        let asset_name = required_text("asset_name", request.asset_name.as_ref())?;
        let purchase_value = required_number("purchase_value", request.purchase_value.as_ref())?;
        let amount = required_number("amount", request.amount.as_ref())?;
        let investment_type = match request.investment_type.as_ref() {
            None | Some(Value::Null) => DEFAULT_INVESTMENT_TYPE.to_string(),
            Some(value) => to_text(value).unwrap_or_else(|| DEFAULT_INVESTMENT_TYPE.to_string()),
        };

        info!(asset = %asset_name, isin = %isin, "adding investment");
        let price = self.prices.current_price(&isin).await;
        let now = self.clock.timestamp();

        let mut investment = NewInvestment {
            isin,
            asset_name,
            purchase_value,
            amount,
            current_value: 0.0,
            total_money: 0.0,
            profit_loss_percentage: 0.0,
            investment_type,
            created_at: now.clone(),
            updated_at: now.clone(),
        };
        refresh_one(&investment, price, &now).apply_to(&mut investment);

        match self.store.insert(&investment).await? {
            Some(stored) => {
                info!(
                    id = %stored.id,
                    total = %format_currency(stored.total_money),
                    "investment added"
                );
                Ok(stored)
            }
            None => Err(PortfolioError::store_rejected(
                "Failed to insert investment into the database",
            )),
        }
    }

    /// Reprice one position, optionally with a new cost basis or amount.
    pub async fn edit(&self, request: EditInvestmentRequest) -> Result<InvestmentRecord> {
        let new_purchase = optional_number("purchase_value", request.purchase_value.as_ref())?;
        let new_amount = optional_number("amount", request.amount.as_ref())?;
        let isin = request.isin.as_deref().filter(|s| !s.is_empty());

        let records = self.records().await?;
        let target = match (request.id, isin) {
            (Some(id), _) => records
                .into_iter()
                .find(|r| r.id == id)
                .ok_or_else(|| PortfolioError::not_found(format!("Investment {id} not found")))?,
            (None, Some(isin)) => records
                .into_iter()
                .find(|r| r.isin == isin)
                .ok_or_else(|| PortfolioError::not_found(format!("Asset {isin} not found")))?,
            (None, None) => {
                return Err(PortfolioError::validation("Field 'isin' is required"));
            }
        };

        let price = self.prices.current_price(&target.isin).await;
        let now = self.clock.timestamp();
        let update = if supplied(new_purchase).is_some() || supplied(new_amount).is_some() {
            recompute_with_new_inputs(&target, new_purchase, new_amount, price, &now)
        } else {
            refresh_one(&target, price, &now)
        };

        info!(
            id = %target.id,
            isin = %target.isin,
            price,
            new_inputs = update.purchase_value.is_some(),
            "editing investment"
        );
        self.store
            .update(target.id, &update.into())
            .await?
            .ok_or_else(|| PortfolioError::store_rejected("Failed to update investment"))
    }

    /// Reprice every tradable position, one at a time.
    ///
    /// A failed update is recorded in `errors` and the batch moves on.
    pub async fn refresh_all(&self) -> Result<RefreshOutcome> {
        let records = self.records().await?;
        let mut outcome = RefreshOutcome {
            total: records.len(),
            ..Default::default()
        };

        for record in &records {
            if is_non_tradable_isin(&record.isin) {
                debug!(asset = %record.asset_name, isin = %record.isin, "skipping non-tradable");
                outcome.skipped_count += 1;
                continue;
            }

            let price = self.prices.current_price(&record.isin).await;
            let update = refresh_one(record, price, &self.clock.timestamp());
            let pct = update.profit_loss_percentage;

            match self.store.update(record.id, &update.into()).await {
                Ok(Some(_)) => {
                    outcome.updated_count += 1;
                    info!(asset = %record.asset_name, price, pct, "investment refreshed");
                }
                Ok(None) => {
                    warn!(asset = %record.asset_name, "store returned no row");
                    outcome
                        .errors
                        .push(format!("Error updating {}", record.asset_name));
                }
                Err(e) => {
                    warn!(asset = %record.asset_name, error = %e, "refresh failed");
                    outcome
                        .errors
                        .push(format!("Error with {}: {e}", record.asset_name));
                }
            }
        }

        info!(
            updated = outcome.updated_count,
            skipped = outcome.skipped_count,
            total = outcome.total,
            "refresh complete"
        );
        Ok(outcome)
    }
}

fn required_text(field: &str, value: Option<&Value>) -> Result<String> {
    value
        .and_then(to_text)
        .ok_or_else(|| PortfolioError::validation(format!("Field '{field}' must be text")))
}

fn required_number(field: &str, value: Option<&Value>) -> Result<f64> {
    value
        .and_then(to_f64)
        .ok_or_else(|| PortfolioError::validation(format!("Field '{field}' must be a number")))
}

/// Absent or `null` is `None`; anything else must convert to a number.
fn optional_number(field: &str, value: Option<&Value>) -> Result<Option<f64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => required_number(field, Some(v)).map(Some),
    }
}
