//! In-memory storage implementation for tests and local runs.

use std::collections::{BTreeMap, HashSet};

use anyhow::Result;
use tokio::sync::Mutex;

use crate::models::{InvestmentId, InvestmentPatch, InvestmentRecord, NewInvestment};

use super::InvestmentStore;

#[derive(Default)]
struct State {
    rows: BTreeMap<InvestmentId, InvestmentRecord>,
    next_id: i64,
    reject_inserts: bool,
    rejected_updates: HashSet<InvestmentId>,
    failing_updates: HashSet<InvestmentId>,
}

/// In-memory investment store. Ids are assigned in ascending order.
///
/// Can be told to reject inserts or specific updates, which mimics the hosted
/// table returning an empty representation.
pub struct MemoryInvestmentStore {
    state: Mutex<State>,
}

impl MemoryInvestmentStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 1,
                ..Default::default()
            }),
        }
    }

    /// Seed with existing rows. Later inserts get ids above the largest one.
    pub fn with_records(records: impl IntoIterator<Item = InvestmentRecord>) -> Self {
        let mut state = State {
            next_id: 1,
            ..Default::default()
        };
        for record in records {
            state.next_id = state.next_id.max(record.id.get() + 1);
            state.rows.insert(record.id, record);
        }
        Self {
            state: Mutex::new(state),
        }
    }

    /// Make every insert return no row.
    pub async fn reject_inserts(&self) {
        self.state.lock().await.reject_inserts = true;
    }

    /// Make updates of `id` return no row.
    pub async fn reject_updates_for(&self, id: InvestmentId) {
        self.state.lock().await.rejected_updates.insert(id);
    }

    /// Make updates of `id` return an error.
    pub async fn fail_updates_for(&self, id: InvestmentId) {
        self.state.lock().await.failing_updates.insert(id);
    }

    pub async fn get(&self, id: InvestmentId) -> Option<InvestmentRecord> {
        self.state.lock().await.rows.get(&id).cloned()
    }
}

impl Default for MemoryInvestmentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl InvestmentStore for MemoryInvestmentStore {
    async fn list_all(&self) -> Result<Vec<InvestmentRecord>> {
        let state = self.state.lock().await;
        Ok(state.rows.values().cloned().collect())
    }

    async fn insert(&self, investment: &NewInvestment) -> Result<Option<InvestmentRecord>> {
        let mut state = self.state.lock().await;
        if state.reject_inserts {
            return Ok(None);
        }
        let id = InvestmentId::new(state.next_id);
        state.next_id += 1;
        let record = investment.clone().into_record(id);
        state.rows.insert(id, record.clone());
        Ok(Some(record))
    }

    async fn update(
        &self,
        id: InvestmentId,
        patch: &InvestmentPatch,
    ) -> Result<Option<InvestmentRecord>> {
        let mut state = self.state.lock().await;
        if state.failing_updates.contains(&id) {
            anyhow::bail!("connection reset while updating investment {id}");
        }
        if state.rejected_updates.contains(&id) {
            return Ok(None);
        }
        Ok(state.rows.get_mut(&id).map(|record| {
            record.apply(patch);
            record.clone()
        }))
    }
}
