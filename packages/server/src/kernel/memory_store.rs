//! In-memory resource repository.
//!
//! Used when no `DATABASE_URL` is configured and by the test harness. A single
//! write lock covers each mutating call, which gives the same atomicity as the
//! Postgres transaction path.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::BaseResourceRepository;
use crate::common::ResourceId;
use crate::domains::resources::models::{
    OrderPlacement, Partition, ResourceDraft, ResourceRecord,
};
use crate::domains::resources::ordering::{self, OrderAssignment, OrderSlot, ReorderCommand};
use crate::domains::resources::{ResourceError, ResourceResult};

#[derive(Default)]
pub struct InMemoryResourceRepository {
    records: RwLock<HashMap<ResourceId, ResourceRecord>>,
}

impl InMemoryResourceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn slots_in(
    records: &HashMap<ResourceId, ResourceRecord>,
    partition: &Partition,
    except: Option<ResourceId>,
) -> Vec<OrderSlot> {
    records
        .values()
        .filter(|record| record.partition() == *partition && Some(record.id) != except)
        .map(|record| OrderSlot {
            id: record.id,
            order: record.order,
        })
        .collect()
}

#[async_trait]
impl BaseResourceRepository for InMemoryResourceRepository {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> ResourceResult<()> {
        Ok(())
    }

    async fn insert(&self, draft: ResourceDraft) -> ResourceResult<ResourceRecord> {
        let mut records = self.records.write().await;

        let order = match draft.order {
            OrderPlacement::At(order) => order,
            OrderPlacement::Append | OrderPlacement::Keep => {
                ordering::next_order(&slots_in(&records, &draft.partition(), None))?
            }
        };

        let record = draft.into_record(order);
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, draft: ResourceDraft) -> ResourceResult<ResourceRecord> {
        let mut records = self.records.write().await;

        let stored_order = records
            .get(&draft.id)
            .map(|record| record.order)
            .ok_or(ResourceError::NotFound(draft.id))?;

        let order = match draft.order {
            OrderPlacement::At(order) => order,
            OrderPlacement::Keep => stored_order,
            OrderPlacement::Append => {
                ordering::next_order(&slots_in(&records, &draft.partition(), Some(draft.id)))?
            }
        };

        let record = draft.into_record(order);
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: ResourceId) -> ResourceResult<Option<ResourceRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn list_partition(
        &self,
        partition: &Partition,
        active_only: bool,
    ) -> ResourceResult<Vec<ResourceRecord>> {
        let records = self.records.read().await;
        let mut matching: Vec<ResourceRecord> = records
            .values()
            .filter(|record| record.partition() == *partition)
            .filter(|record| !active_only || record.is_active)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        Ok(matching)
    }

    async fn order_slots(&self, partition: &Partition) -> ResourceResult<Vec<OrderSlot>> {
        Ok(slots_in(&*self.records.read().await, partition, None))
    }

    async fn delete(&self, id: ResourceId) -> ResourceResult<bool> {
        Ok(self.records.write().await.remove(&id).is_some())
    }

    async fn reorder(
        &self,
        partition: &Partition,
        command: &ReorderCommand,
    ) -> ResourceResult<Vec<OrderAssignment>> {
        let mut records = self.records.write().await;

        let assignments = ordering::plan(command, &slots_in(&records, partition, None))?;

        let now = Utc::now();
        for assignment in &assignments {
            if let Some(record) = records.get_mut(&assignment.id) {
                record.order = assignment.order;
                record.updated_at = now;
            }
        }

        Ok(assignments)
    }
}
