//! Postgres resource repository.
//!
//! Payloads live in a JSONB column and are re-validated through the kind's
//! schema on the way out. Every write that depends on the partition's current
//! orders (append, reorder) takes a transaction-scoped advisory lock keyed by
//! the partition, so concurrent admin sessions are serialized per partition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use super::BaseResourceRepository;
use crate::common::ResourceId;
use crate::domains::resources::models::{
    OrderPlacement, Partition, ResourceDraft, ResourceKind, ResourcePayload, ResourceRecord,
};
use crate::domains::resources::ordering::{self, OrderAssignment, OrderSlot, ReorderCommand};
use crate::domains::resources::{ResourceError, ResourceResult};

/// Raw `resources` row
#[derive(Debug, Clone, sqlx::FromRow)]
struct ResourceRow {
    id: ResourceId,
    kind: String,
    scope: Option<String>,
    sort_order: i32,
    is_active: bool,
    is_featured: bool,
    payload: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ResourceRow> for ResourceRecord {
    type Error = ResourceError;

    fn try_from(row: ResourceRow) -> Result<Self, Self::Error> {
        let kind: ResourceKind = row.kind.parse().map_err(|e| {
            ResourceError::Store(anyhow::anyhow!("row {} has bad kind: {}", row.id, e))
        })?;
        let payload = ResourcePayload::from_value(kind, row.payload).map_err(|e| {
            ResourceError::Store(anyhow::anyhow!("row {} has bad payload: {}", row.id, e))
        })?;

        Ok(ResourceRecord {
            id: row.id,
            kind,
            scope: row.scope,
            order: row.sort_order,
            is_active: row.is_active,
            is_featured: row.is_featured,
            created_at: row.created_at,
            updated_at: row.updated_at,
            payload,
        })
    }
}

pub struct PostgresResourceRepository {
    pool: PgPool,
}

impl PostgresResourceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Serialize writers of one partition until the transaction ends.
    async fn lock_partition(
        tx: &mut Transaction<'_, Postgres>,
        partition: &Partition,
    ) -> ResourceResult<()> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(partition.key())
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn slots_for_update(
        tx: &mut Transaction<'_, Postgres>,
        partition: &Partition,
    ) -> ResourceResult<Vec<OrderSlot>> {
        let rows = sqlx::query_as::<_, (ResourceId, i32)>(
            r#"
            SELECT id, sort_order
            FROM resources
            WHERE kind = $1 AND scope IS NOT DISTINCT FROM $2
            FOR UPDATE
            "#,
        )
        .bind(partition.kind.to_string())
        .bind(&partition.scope)
        .fetch_all(&mut **tx)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, order)| OrderSlot { id, order })
            .collect())
    }

    async fn next_order_excluding(
        tx: &mut Transaction<'_, Postgres>,
        partition: &Partition,
        except: Option<ResourceId>,
    ) -> ResourceResult<i32> {
        let (max,) = sqlx::query_as::<_, (Option<i32>,)>(
            r#"
            SELECT MAX(sort_order)
            FROM resources
            WHERE kind = $1 AND scope IS NOT DISTINCT FROM $2
              AND ($3::uuid IS NULL OR id <> $3)
            "#,
        )
        .bind(partition.kind.to_string())
        .bind(&partition.scope)
        .bind(except)
        .fetch_one(&mut **tx)
        .await?;
        ordering::order_after(max)
    }
}

#[async_trait]
impl BaseResourceRepository for PostgresResourceRepository {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> ResourceResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert(&self, draft: ResourceDraft) -> ResourceResult<ResourceRecord> {
        let partition = draft.partition();
        let mut tx = self.pool.begin().await?;
        Self::lock_partition(&mut tx, &partition).await?;

        let order = match draft.order {
            OrderPlacement::At(order) => order,
            OrderPlacement::Append | OrderPlacement::Keep => {
                Self::next_order_excluding(&mut tx, &partition, None).await?
            }
        };
        let payload = serde_json::to_value(&draft.payload)?;

        let row = sqlx::query_as::<_, ResourceRow>(
            r#"
            INSERT INTO resources
                (id, kind, scope, sort_order, is_active, is_featured, payload, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(draft.id)
        .bind(draft.kind.to_string())
        .bind(&draft.scope)
        .bind(order)
        .bind(draft.visibility.is_active)
        .bind(draft.visibility.is_featured)
        .bind(payload)
        .bind(draft.created_at)
        .bind(draft.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        row.try_into()
    }

    async fn update(&self, draft: ResourceDraft) -> ResourceResult<ResourceRecord> {
        let partition = draft.partition();
        let mut tx = self.pool.begin().await?;
        Self::lock_partition(&mut tx, &partition).await?;

        // None leaves the stored sort_order untouched
        let order = match draft.order {
            OrderPlacement::At(order) => Some(order),
            OrderPlacement::Keep => None,
            OrderPlacement::Append => {
                Some(Self::next_order_excluding(&mut tx, &partition, Some(draft.id)).await?)
            }
        };
        let payload = serde_json::to_value(&draft.payload)?;

        let row = sqlx::query_as::<_, ResourceRow>(
            r#"
            UPDATE resources
            SET scope = $2,
                sort_order = COALESCE($3, sort_order),
                is_active = $4,
                is_featured = $5,
                payload = $6,
                updated_at = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(draft.id)
        .bind(&draft.scope)
        .bind(order)
        .bind(draft.visibility.is_active)
        .bind(draft.visibility.is_featured)
        .bind(payload)
        .bind(draft.updated_at)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ResourceError::NotFound(draft.id))?;

        tx.commit().await?;
        row.try_into()
    }

    async fn find_by_id(&self, id: ResourceId) -> ResourceResult<Option<ResourceRecord>> {
        sqlx::query_as::<_, ResourceRow>("SELECT * FROM resources WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(ResourceRecord::try_from)
            .transpose()
    }

    async fn list_partition(
        &self,
        partition: &Partition,
        active_only: bool,
    ) -> ResourceResult<Vec<ResourceRecord>> {
        let rows = sqlx::query_as::<_, ResourceRow>(
            r#"
            SELECT *
            FROM resources
            WHERE kind = $1
              AND scope IS NOT DISTINCT FROM $2
              AND (is_active = TRUE OR NOT $3)
            ORDER BY sort_order ASC, id ASC
            "#,
        )
        .bind(partition.kind.to_string())
        .bind(&partition.scope)
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ResourceRecord::try_from).collect()
    }

    async fn order_slots(&self, partition: &Partition) -> ResourceResult<Vec<OrderSlot>> {
        let rows = sqlx::query_as::<_, (ResourceId, i32)>(
            "SELECT id, sort_order FROM resources WHERE kind = $1 AND scope IS NOT DISTINCT FROM $2",
        )
        .bind(partition.kind.to_string())
        .bind(&partition.scope)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, order)| OrderSlot { id, order })
            .collect())
    }

    async fn delete(&self, id: ResourceId) -> ResourceResult<bool> {
        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn reorder(
        &self,
        partition: &Partition,
        command: &ReorderCommand,
    ) -> ResourceResult<Vec<OrderAssignment>> {
        let mut tx = self.pool.begin().await?;
        Self::lock_partition(&mut tx, partition).await?;

        let slots = Self::slots_for_update(&mut tx, partition).await?;
        let assignments = ordering::plan(command, &slots)?;

        let now = Utc::now();
        for assignment in &assignments {
            sqlx::query("UPDATE resources SET sort_order = $2, updated_at = $3 WHERE id = $1")
                .bind(assignment.id)
                .bind(assignment.order)
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        debug!(
            partition = %partition,
            command = command.name(),
            writes = assignments.len(),
            "Reorder committed"
        );
        Ok(assignments)
    }
}
