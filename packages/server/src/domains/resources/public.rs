//! Public reader - the only interface the marketing site uses.

use super::models::{ResourceKind, ResourceRecord};
use super::store::{ReadFilter, ResourceStore};
use super::{ResourceError, ResourceResult};
use crate::common::ResourceId;

/// Read-only view of active records.
#[derive(Clone)]
pub struct PublicReader {
    store: ResourceStore,
}

impl PublicReader {
    pub fn new(store: ResourceStore) -> Self {
        Self { store }
    }

    /// Active records of a partition, sorted by order.
    pub async fn list(
        &self,
        kind: ResourceKind,
        scope: Option<String>,
    ) -> ResourceResult<Vec<ResourceRecord>> {
        self.store.read(kind, scope, ReadFilter::active()).await
    }

    /// A single active record. Hidden records are reported as missing.
    pub async fn get(&self, id: ResourceId) -> ResourceResult<ResourceRecord> {
        let record = self.store.get(id).await?;
        if !record.visibility().is_public() {
            return Err(ResourceError::NotFound(id));
        }
        Ok(record)
    }
}
