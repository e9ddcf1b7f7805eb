//! Analysis history: bounded, append-only audit trail of screen analyses.

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::relay::{Analysis, MousePosition};

/// Default number of records kept in memory.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// One successful screenshot analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub task_type: String,
    pub step: i64,
    pub analysis: Analysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mouse_position: Option<MousePosition>,
}

impl HistoryRecord {
    pub fn new(
        task_type: impl Into<String>,
        step: i64,
        analysis: Analysis,
        mouse_position: Option<MousePosition>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            task_type: task_type.into(),
            step,
            analysis,
            mouse_position,
        }
    }
}

/// Narrow append/list interface so the storage backend can be swapped.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append a record. Records are never mutated afterwards.
    async fn append(&self, record: HistoryRecord);

    /// All retained records, oldest first.
    async fn list(&self) -> Vec<HistoryRecord>;
}

/// In-memory history with a capacity policy: once full, the oldest record
/// is evicted for each new one. A capacity of `None` never evicts.
pub struct InMemoryHistory {
    records: RwLock<VecDeque<HistoryRecord>>,
    capacity: Option<usize>,
}

impl InMemoryHistory {
    /// History bounded to `capacity` records. `0` means unbounded.
    pub fn new(capacity: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::new()),
            capacity: (capacity > 0).then_some(capacity),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(0)
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistory {
    async fn append(&self, record: HistoryRecord) {
        let mut records = self.records.write().await;
        if let Some(capacity) = self.capacity {
            while records.len() >= capacity {
                if let Some(evicted) = records.pop_front() {
                    debug!(record_id = %evicted.id, "Evicted oldest history record");
                }
            }
        }
        records.push_back(record);
    }

    async fn list(&self) -> Vec<HistoryRecord> {
        self.records.read().await.iter().cloned().collect()
    }
}
