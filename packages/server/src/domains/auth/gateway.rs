//! Admin gateway - authorization in front of every privileged store call.
//!
//! Privileged store calls are only reachable through a session handle, and a
//! handle only exists once the caller has passed the check for its capability.

use tracing::warn;

use super::types::Caller;
use crate::common::{Actor, AdminCapability, ResourceId};
use crate::domains::resources::models::{
    NewResource, Partition, ResourceKind, ResourcePatch, ResourceRecord,
};
use crate::domains::resources::ordering::{Direction, ReorderCommand};
use crate::domains::resources::{ReadFilter, ResourceResult, ResourceStore};

#[derive(Clone)]
pub struct AdminGateway {
    store: ResourceStore,
}

impl AdminGateway {
    pub fn new(store: ResourceStore) -> Self {
        Self { store }
    }

    /// Authorize a caller to change content. Handlers call this before parsing
    /// request bodies so unauthenticated calls fail as unauthorized.
    pub fn editor(&self, caller: &Caller) -> ResourceResult<ContentEditor<'_>> {
        check(caller, AdminCapability::ManageContent)?;
        Ok(ContentEditor { store: &self.store })
    }

    /// Authorize a caller to see inactive records.
    pub fn hidden_reader(&self, caller: &Caller) -> ResourceResult<HiddenReader<'_>> {
        check(caller, AdminCapability::ViewHidden)?;
        Ok(HiddenReader { store: &self.store })
    }
}

fn check(caller: &Caller, capability: AdminCapability) -> ResourceResult<()> {
    let result = caller.user().and_then(|user| {
        Actor::new(user.subject.clone(), user.is_admin)
            .can(capability)
            .check()
    });

    if let Err(e) = &result {
        warn!(capability = %capability, reason = %e, "Admin request rejected");
    }
    result.map_err(Into::into)
}

/// Store writes for a caller already holding `ManageContent`.
pub struct ContentEditor<'a> {
    store: &'a ResourceStore,
}

impl ContentEditor<'_> {
    pub async fn create(&self, input: NewResource) -> ResourceResult<ResourceRecord> {
        self.store.create(input).await
    }

    pub async fn update(&self, patch: ResourcePatch) -> ResourceResult<ResourceRecord> {
        self.store.update(patch).await
    }

    pub async fn delete(&self, id: ResourceId) -> ResourceResult<()> {
        self.store.delete(id).await
    }

    pub async fn move_adjacent(
        &self,
        id: ResourceId,
        direction: Direction,
    ) -> ResourceResult<Vec<ResourceRecord>> {
        self.store.move_adjacent(id, direction).await
    }

    pub async fn reorder(
        &self,
        partition: &Partition,
        command: ReorderCommand,
    ) -> ResourceResult<Vec<ResourceRecord>> {
        self.store.reorder(partition, command).await
    }

    pub async fn compact(&self, partition: &Partition) -> ResourceResult<Vec<ResourceRecord>> {
        self.store.compact(partition).await
    }
}

/// Reads that include inactive records, for a caller holding `ViewHidden`.
pub struct HiddenReader<'a> {
    store: &'a ResourceStore,
}

impl HiddenReader<'_> {
    /// Every record of a partition, hidden ones included.
    pub async fn read_all(
        &self,
        kind: ResourceKind,
        scope: Option<String>,
    ) -> ResourceResult<Vec<ResourceRecord>> {
        self.store.read(kind, scope, ReadFilter::all()).await
    }

    /// A single record regardless of visibility.
    pub async fn get(&self, id: ResourceId) -> ResourceResult<ResourceRecord> {
        self.store.get(id).await
    }
}
