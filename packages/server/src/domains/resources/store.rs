//! Resource store - persistence facade over a repository.
//!
//! Validation, visibility rules and order planning happen here or in the
//! planners; the repository only stores and runs commands atomically.

use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::models::{
    normalize_scope, without_server_owned, NewResource, OrderPlacement, Partition,
    ResourceDraft, ResourceKind, ResourcePatch, ResourcePayload, ResourceRecord,
};
use super::ordering::{Direction, ReorderCommand};
use super::visibility::{Visibility, VisibilityChange};
use super::{ResourceError, ResourceResult};
use crate::common::ResourceId;
use crate::kernel::BaseResourceRepository;

/// Read filter: `all = false` returns only active records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ReadFilter {
    #[serde(default)]
    pub all: bool,
}

impl ReadFilter {
    pub fn active() -> Self {
        Self { all: false }
    }

    pub fn all() -> Self {
        Self { all: true }
    }
}

#[derive(Clone)]
pub struct ResourceStore {
    repository: Arc<dyn BaseResourceRepository>,
}

impl ResourceStore {
    pub fn new(repository: Arc<dyn BaseResourceRepository>) -> Self {
        Self { repository }
    }

    pub fn backend(&self) -> &'static str {
        self.repository.backend()
    }

    pub async fn ping(&self) -> ResourceResult<()> {
        self.repository.ping().await
    }

    /// Create a record. Without an explicit `order` it is appended to its
    /// partition; without `isActive` it starts visible.
    pub async fn create(&self, input: NewResource) -> ResourceResult<ResourceRecord> {
        let kind = input.kind;
        let partition = Partition::new(kind, input.scope);
        if let Some(order) = input.order {
            check_order(order)?;
        }

        let visibility = Visibility::for_new(kind, input.is_active, input.is_featured)?;
        let payload = ResourcePayload::from_fields(kind, without_server_owned(input.fields))?;

        if let Some(order) = input.order {
            self.warn_on_duplicate_order(&partition, order, None).await?;
        }

        let now = Utc::now();
        let record = self
            .repository
            .insert(ResourceDraft {
                id: ResourceId::new(),
                kind,
                scope: partition.scope,
                order: input.order.into(),
                visibility,
                payload,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(
            resource_id = %record.id,
            kind = %record.kind,
            scope = ?record.scope,
            order = record.order,
            "Resource created"
        );
        Ok(record)
    }

    /// Records of one partition sorted by order; `filter.all` includes hidden ones.
    pub async fn read(
        &self,
        kind: ResourceKind,
        scope: Option<String>,
        filter: ReadFilter,
    ) -> ResourceResult<Vec<ResourceRecord>> {
        let partition = Partition::new(kind, scope);
        self.repository.list_partition(&partition, !filter.all).await
    }

    pub async fn get(&self, id: ResourceId) -> ResourceResult<ResourceRecord> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ResourceError::NotFound(id))
    }

    /// The order an appended record would receive right now.
    pub async fn next_order(&self, partition: &Partition) -> ResourceResult<i32> {
        let slots = self.repository.order_slots(partition).await?;
        super::ordering::next_order(&slots)
    }

    /// Merge a partial update into a record.
    ///
    /// An explicit `order` is written as given, even if another record in the
    /// partition already holds it; `compact` or `arrange` restore density.
    /// Moving to another scope without an `order` appends to that scope;
    /// otherwise the stored order is kept as it is at write time.
    pub async fn update(&self, patch: ResourcePatch) -> ResourceResult<ResourceRecord> {
        let current = self.get(patch.id).await?;
        let kind = current.kind;

        if let Some(requested) = patch.kind {
            if requested != kind {
                return Err(ResourceError::Validation(format!(
                    "kind cannot change from {} to {}",
                    kind, requested
                )));
            }
        }
        if let Some(order) = patch.order {
            check_order(order)?;
        }

        let scope = match patch.scope {
            Some(scope) => normalize_scope(Some(scope)),
            None => current.scope.clone(),
        };
        let moved = scope != current.scope;
        let order = match patch.order {
            Some(order) => OrderPlacement::At(order),
            None if moved => OrderPlacement::Append,
            None => OrderPlacement::Keep,
        };

        let visibility = current.visibility().apply(
            kind,
            VisibilityChange {
                is_active: patch.is_active,
                is_featured: patch.is_featured,
            },
        )?;

        let fields = without_server_owned(patch.fields);
        let payload = if fields.is_empty() {
            current.payload.clone()
        } else {
            current.payload.merge(kind, fields)?
        };

        let partition = Partition {
            kind,
            scope: scope.clone(),
        };
        if let Some(order) = patch.order {
            if moved || order != current.order {
                self.warn_on_duplicate_order(&partition, order, Some(current.id))
                    .await?;
            }
        }

        let record = self
            .repository
            .update(ResourceDraft {
                id: current.id,
                kind,
                scope,
                order,
                visibility,
                payload,
                created_at: current.created_at,
                updated_at: Utc::now(),
            })
            .await?;

        if record.visibility() != current.visibility() {
            info!(
                resource_id = %record.id,
                from = %current.visibility().state(),
                to = %record.visibility().state(),
                "Resource visibility changed"
            );
        }
        info!(
            resource_id = %record.id,
            kind = %record.kind,
            scope = ?record.scope,
            order = record.order,
            "Resource updated"
        );
        Ok(record)
    }

    /// Toggle flags without touching anything else.
    pub async fn set_visibility(
        &self,
        id: ResourceId,
        change: VisibilityChange,
    ) -> ResourceResult<ResourceRecord> {
        let mut patch = ResourcePatch::new(id);
        patch.is_active = change.is_active;
        patch.is_featured = change.is_featured;
        self.update(patch).await
    }

    /// Hard delete. Remaining orders are left as they are until `compact`.
    pub async fn delete(&self, id: ResourceId) -> ResourceResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ResourceError::NotFound(id));
        }

        info!(resource_id = %id, "Resource deleted");
        Ok(())
    }

    /// Swap a record with its neighbour in `direction`; no-op at the ends.
    /// Returns the whole partition afterwards.
    pub async fn move_adjacent(
        &self,
        id: ResourceId,
        direction: Direction,
    ) -> ResourceResult<Vec<ResourceRecord>> {
        let partition = self.get(id).await?.partition();
        self.reorder(&partition, ReorderCommand::MoveAdjacent { id, direction })
            .await
    }

    /// Exchange the orders of two records of the same partition.
    pub async fn swap(
        &self,
        first: ResourceId,
        second: ResourceId,
    ) -> ResourceResult<Vec<ResourceRecord>> {
        let partition = self.get(first).await?.partition();
        self.reorder(&partition, ReorderCommand::Swap { first, second })
            .await
    }

    /// Apply a full target ordering; `ids` must be exactly the partition's records.
    pub async fn arrange(
        &self,
        partition: &Partition,
        ids: Vec<ResourceId>,
    ) -> ResourceResult<Vec<ResourceRecord>> {
        self.reorder(partition, ReorderCommand::Arrange { ids }).await
    }

    /// Renumber the partition densely as `1..N`. Idempotent.
    pub async fn compact(&self, partition: &Partition) -> ResourceResult<Vec<ResourceRecord>> {
        self.reorder(partition, ReorderCommand::Compact).await
    }

    pub async fn reorder(
        &self,
        partition: &Partition,
        command: ReorderCommand,
    ) -> ResourceResult<Vec<ResourceRecord>> {
        let assignments = self.repository.reorder(partition, &command).await?;

        if assignments.is_empty() {
            debug!(partition = %partition, command = command.name(), "Reorder was a no-op");
        } else {
            info!(
                partition = %partition,
                command = command.name(),
                writes = assignments.len(),
                "Partition reordered"
            );
        }

        self.repository.list_partition(partition, false).await
    }

    async fn warn_on_duplicate_order(
        &self,
        partition: &Partition,
        order: i32,
        except: Option<ResourceId>,
    ) -> ResourceResult<()> {
        let slots = self.repository.order_slots(partition).await?;
        if let Some(holder) = slots
            .iter()
            .find(|slot| slot.order == order && Some(slot.id) != except)
        {
            warn!(
                partition = %partition,
                order,
                holder = %holder.id,
                "Order already in use; partition needs a compact"
            );
        }
        Ok(())
    }
}

fn check_order(order: i32) -> ResourceResult<()> {
    if order < 0 {
        return Err(ResourceError::Validation(format!(
            "order must be non-negative, got {}",
            order
        )));
    }
    Ok(())
}
