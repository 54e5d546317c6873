use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::kind::{Partition, ResourceKind};
use super::payload::ResourcePayload;
use crate::common::ResourceId;
use crate::domains::resources::visibility::Visibility;

/// A stored content record: shared envelope plus kind-specific payload.
///
/// On the wire the payload fields sit next to the envelope fields:
/// `{ "id": "...", "kind": "news", "order": 3, "isActive": true, "title": "..." }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    pub id: ResourceId,
    pub kind: ResourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub order: i32,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: ResourcePayload,
}

impl ResourceRecord {
    pub fn partition(&self) -> Partition {
        Partition {
            kind: self.kind,
            scope: self.scope.clone(),
        }
    }

    pub fn visibility(&self) -> Visibility {
        Visibility {
            is_active: self.is_active,
            is_featured: self.is_featured,
        }
    }
}

/// Where a draft lands in its partition.
///
/// `Append` and `Keep` are resolved by the repository inside the same critical
/// section as the write, so they never race a concurrent reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderPlacement {
    /// `max + 1` of the partition.
    Append,
    /// Whatever order the stored record holds at write time.
    Keep,
    At(i32),
}

impl From<Option<i32>> for OrderPlacement {
    fn from(order: Option<i32>) -> Self {
        order.map_or(OrderPlacement::Append, OrderPlacement::At)
    }
}

/// A validated record on its way into storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDraft {
    pub id: ResourceId,
    pub kind: ResourceKind,
    pub scope: Option<String>,
    pub order: OrderPlacement,
    pub visibility: Visibility,
    pub payload: ResourcePayload,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResourceDraft {
    pub fn partition(&self) -> Partition {
        Partition {
            kind: self.kind,
            scope: self.scope.clone(),
        }
    }

    pub fn into_record(self, order: i32) -> ResourceRecord {
        ResourceRecord {
            id: self.id,
            kind: self.kind,
            scope: self.scope,
            order,
            is_active: self.visibility.is_active,
            is_featured: self.visibility.is_featured,
            created_at: self.created_at,
            updated_at: self.updated_at,
            payload: self.payload,
        }
    }
}

/// Server-owned envelope keys. Clients echo them back from records they read;
/// they are dropped before the payload schema sees the fields.
const SERVER_OWNED_KEYS: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// Remove echoed server-owned keys from a field map.
pub fn without_server_owned(mut fields: Map<String, Value>) -> Map<String, Value> {
    for key in SERVER_OWNED_KEYS {
        fields.remove(key);
    }
    fields
}

/// Input for creating a record (`POST /resources` body)
///
/// Everything that is not an envelope field is collected into `fields` and
/// handed to the kind's payload schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResource {
    pub kind: ResourceKind,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl NewResource {
    pub fn new(kind: ResourceKind, fields: Map<String, Value>) -> Self {
        Self {
            kind,
            scope: None,
            order: None,
            is_active: None,
            is_featured: None,
            fields,
        }
    }

    pub fn in_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn at_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn featured(mut self, is_featured: bool) -> Self {
        self.is_featured = Some(is_featured);
        self
    }
}

/// Partial update (`PUT /resources` body)
///
/// `scope` present but blank moves the record to the unscoped partition.
/// `kind` may be echoed back by clients but cannot change.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePatch {
    pub id: ResourceId,
    #[serde(default)]
    pub kind: Option<ResourceKind>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ResourcePatch {
    pub fn new(id: ResourceId) -> Self {
        Self {
            id,
            kind: None,
            scope: None,
            order: None,
            is_active: None,
            is_featured: None,
            fields: Map::new(),
        }
    }

    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn featured(mut self, is_featured: bool) -> Self {
        self.is_featured = Some(is_featured);
        self
    }
}
