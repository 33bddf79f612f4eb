//! Record Store: where investment rows live.

mod memory;
#[cfg(feature = "remote")]
mod supabase;

pub use memory::MemoryInvestmentStore;
#[cfg(feature = "remote")]
pub use supabase::SupabaseStore;

use anyhow::Result;

use crate::models::{InvestmentId, InvestmentPatch, InvestmentRecord, NewInvestment};

/// Storage trait for investment rows.
///
/// `insert` and `update` return `Ok(None)` when the store accepted the call but
/// handed back no row; callers treat that as a recoverable failure.
#[async_trait::async_trait]
pub trait InvestmentStore: Send + Sync {
    /// Every row, ordered by id ascending.
    async fn list_all(&self) -> Result<Vec<InvestmentRecord>>;

    async fn insert(&self, investment: &NewInvestment) -> Result<Option<InvestmentRecord>>;

    async fn update(
        &self,
        id: InvestmentId,
        patch: &InvestmentPatch,
    ) -> Result<Option<InvestmentRecord>>;
}
