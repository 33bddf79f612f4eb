use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::categorize::Bucket;
use crate::models::{BankAccount, InvestmentId, InvestmentRecord};

/// Values keyed by bucket, serialized as a JSON object in bucket order.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketMap<T> {
    entries: Vec<(Bucket, T)>,
}

impl<T> BucketMap<T> {
    pub fn new(entries: Vec<(Bucket, T)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, bucket: Bucket) -> Option<&T> {
        self.entries
            .iter()
            .find(|(b, _)| *b == bucket)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Bucket, &T)> {
        self.entries.iter().map(|(b, v)| (*b, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Serialize> Serialize for BucketMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (bucket, value) in &self.entries {
            map.serialize_entry(bucket.key(), value)?;
        }
        map.end()
    }
}

/// Sums across every record, no categorization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    /// Sum of `amount`.
    pub quantity: f64,
    /// Sum of `total_money`.
    pub money: f64,
    pub purchase_value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub investments: Vec<InvestmentRecord>,
    pub totals: Totals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCounts {
    pub total: usize,
    #[serde(flatten)]
    pub by_bucket: BucketMap<usize>,
}

/// Records grouped by the eight-bucket table rules.
#[derive(Debug, Clone, Serialize)]
pub struct CategorizedTables {
    pub categories: BucketMap<Vec<InvestmentRecord>>,
    pub counts: TableCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub bucket: Bucket,
    pub total: f64,
    pub percentage: f64,
}

/// Per-bucket `total_money` with share of the overall total.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotals {
    pub entries: Vec<CategoryTotal>,
    pub overall: f64,
}

impl CategoryTotals {
    pub fn get(&self, bucket: Bucket) -> Option<&CategoryTotal> {
        self.entries.iter().find(|e| e.bucket == bucket)
    }
}

/// `totals` object of the composition view: bucket totals (crypto keyed as
/// `crypto`) plus `overall`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionTotals(pub CategoryTotals);

impl Serialize for CompositionTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.entries.len() + 1))?;
        for entry in &self.0.entries {
            map.serialize_entry(entry.bucket.totals_key(), &entry.total)?;
        }
        map.serialize_entry("overall", &self.0.overall)?;
        map.end()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompositionCategories {
    pub labels: Vec<&'static str>,
    pub values: Vec<f64>,
    pub colors: Vec<&'static str>,
    pub totals: CompositionTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionRow {
    pub color: &'static str,
    pub label: &'static str,
    pub total: f64,
    pub percentage: f64,
}

/// Seven-bucket pie view.
#[derive(Debug, Clone, Serialize)]
pub struct Composition {
    pub categories: CompositionCategories,
    pub table_data: Vec<CompositionRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    pub color: String,
    pub label: String,
    pub size: f64,
    pub percentage: f64,
}

/// Records by `total_money`, largest first.
#[derive(Debug, Clone, Serialize)]
pub struct RankedComposition {
    pub table_data: Vec<RankedRow>,
    pub total_money_sum: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TypeTotals {
    /// Sum of `purchase_value`.
    pub total_value: f64,
    pub total_money: f64,
    pub count: usize,
    pub avg_profit_loss: f64,
}

pub type TypeSummary = BTreeMap<String, TypeTotals>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BankTotals {
    /// Sum of balances.
    pub investment: f64,
    /// Balances grown by their interest rate, accounts with a note excluded.
    pub result: f64,
    pub accounts: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BankSummary {
    pub banks: Vec<BankAccount>,
    pub totals: BankTotals,
}

/// Outcome of a bulk price refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RefreshOutcome {
    /// Records seen, skipped ones included.
    pub total: usize,
    pub updated_count: usize,
    pub skipped_count: usize,
    pub errors: Vec<String>,
}

/// Body of an add request. Fields stay raw JSON so truthiness and numeric
/// conversion can be checked field by field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddInvestmentRequest {
    #[serde(default)]
    pub isin: Option<Value>,
    #[serde(default)]
    pub asset_name: Option<Value>,
    #[serde(default)]
    pub purchase_value: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub investment_type: Option<Value>,
}

/// Body of an edit request. Targets `id` when present, otherwise the first
/// record with a matching `isin`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditInvestmentRequest {
    #[serde(default)]
    pub id: Option<InvestmentId>,
    #[serde(default)]
    pub isin: Option<String>,
    #[serde(default)]
    pub purchase_value: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
}
