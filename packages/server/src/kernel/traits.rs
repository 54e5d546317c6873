// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Validation, visibility rules and order planning live in domains/resources;
// a repository only has to run them inside its own critical section.
//
// Naming convention: Base* for trait names (e.g., BaseResourceRepository)

use async_trait::async_trait;

use crate::common::ResourceId;
use crate::domains::resources::models::{Partition, ResourceDraft, ResourceRecord};
use crate::domains::resources::ordering::{OrderAssignment, OrderSlot, ReorderCommand};
use crate::domains::resources::ResourceResult;

// =============================================================================
// Resource Repository Trait (Infrastructure - record persistence)
// =============================================================================

#[async_trait]
pub trait BaseResourceRepository: Send + Sync {
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// Check the backing store is reachable
    async fn ping(&self) -> ResourceResult<()>;

    /// Insert a new record; `Keep` behaves like `Append`
    async fn insert(&self, draft: ResourceDraft) -> ResourceResult<ResourceRecord>;

    /// Replace an existing record. `Keep` and `Append` are resolved against the
    /// stored state inside the write's critical section. Fails with NotFound if
    /// the id is unknown.
    async fn update(&self, draft: ResourceDraft) -> ResourceResult<ResourceRecord>;

    async fn find_by_id(&self, id: ResourceId) -> ResourceResult<Option<ResourceRecord>>;

    /// Records of one partition sorted by (order, id)
    async fn list_partition(
        &self,
        partition: &Partition,
        active_only: bool,
    ) -> ResourceResult<Vec<ResourceRecord>>;

    /// Current (id, order) pairs of one partition, in no particular order
    async fn order_slots(&self, partition: &Partition) -> ResourceResult<Vec<OrderSlot>>;

    /// Hard delete; returns false if nothing was removed
    async fn delete(&self, id: ResourceId) -> ResourceResult<bool>;

    /// Plan and apply a reorder command as one atomic step
    async fn reorder(
        &self,
        partition: &Partition,
        command: &ReorderCommand,
    ) -> ResourceResult<Vec<OrderAssignment>>;
}
