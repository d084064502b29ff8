//! SeaORM implementation of AvailabilityRepository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseBackend,
    DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::availability::{
    AvailabilityRepository, AvailabilityTransaction, BlockedRange, DateRange,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::blocked_range;

pub struct SeaOrmAvailabilityRepository {
    db: DatabaseConnection,
    /// SQLite only: one reconciliation transaction at a time. Two deferred
    /// transactions that both read and then try to write deadlock and fail
    /// with SQLITE_BUSY instead of waiting.
    write_lock: Option<Arc<Mutex<()>>>,
}

impl SeaOrmAvailabilityRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        let write_lock = match db.get_database_backend() {
            DatabaseBackend::Sqlite => Some(Arc::new(Mutex::new(()))),
            _ => None,
        };
        Self { db, write_lock }
    }
}

/// Open database transaction; dropping it without commit rolls back.
pub struct SeaOrmAvailabilityTransaction {
    txn: DatabaseTransaction,
    write_guard: Option<OwnedMutexGuard<()>>,
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: blocked_range::Model) -> DomainResult<BlockedRange> {
    let range = DateRange::checked(m.start_date, m.end_date).ok_or_else(|| {
        DomainError::Internal(format!(
            "blocked range {} has start {} after end {}",
            m.id, m.start_date, m.end_date
        ))
    })?;
    Ok(BlockedRange {
        id: m.id,
        room_id: m.room_id,
        range,
        created_at: m.created_at,
    })
}

fn models_to_domain(models: Vec<blocked_range::Model>) -> DomainResult<Vec<BlockedRange>> {
    models.into_iter().map(model_to_domain).collect()
}

// ── AvailabilityRepository impl ─────────────────────────────────

#[async_trait]
impl AvailabilityRepository for SeaOrmAvailabilityRepository {
    async fn begin(&self) -> DomainResult<Box<dyn AvailabilityTransaction>> {
        let write_guard = match &self.write_lock {
            Some(lock) => Some(lock.clone().lock_owned().await),
            None => None,
        };
        let txn = self.db.begin().await?;
        Ok(Box::new(SeaOrmAvailabilityTransaction { txn, write_guard }))
    }

    async fn find_for_room(&self, room_id: i32) -> DomainResult<Vec<BlockedRange>> {
        let models = blocked_range::Entity::find()
            .filter(blocked_range::Column::RoomId.eq(room_id))
            .order_by_asc(blocked_range::Column::StartDate)
            .all(&self.db)
            .await?;
        models_to_domain(models)
    }
}

#[async_trait]
impl AvailabilityTransaction for SeaOrmAvailabilityTransaction {
    async fn find_overlapping(
        &mut self,
        room_id: i32,
        range: DateRange,
    ) -> DomainResult<Vec<BlockedRange>> {
        let models = blocked_range::Entity::find()
            .filter(blocked_range::Column::RoomId.eq(room_id))
            .filter(blocked_range::Column::StartDate.lte(range.end()))
            .filter(blocked_range::Column::EndDate.gte(range.start()))
            .order_by_asc(blocked_range::Column::StartDate)
            .all(&self.txn)
            .await?;
        models_to_domain(models)
    }

    async fn delete_ranges(&mut self, ids: &[i32]) -> DomainResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        debug!("Deleting blocked ranges: {:?}", ids);

        let result = blocked_range::Entity::delete_many()
            .filter(blocked_range::Column::Id.is_in(ids.iter().copied()))
            .exec(&self.txn)
            .await?;

        if result.rows_affected != ids.len() as u64 {
            return Err(DomainError::Internal(format!(
                "expected to delete {} blocked ranges, deleted {}",
                ids.len(),
                result.rows_affected
            )));
        }
        Ok(())
    }

    async fn insert_ranges(
        &mut self,
        room_id: i32,
        ranges: &[DateRange],
    ) -> DomainResult<Vec<BlockedRange>> {
        let mut stored = Vec::with_capacity(ranges.len());
        for range in ranges {
            debug!("Inserting blocked range {} for room {}", range, room_id);

            let model = blocked_range::ActiveModel {
                id: NotSet,
                room_id: Set(room_id),
                start_date: Set(range.start()),
                end_date: Set(range.end()),
                created_at: Set(Utc::now()),
            };
            let saved = model.insert(&self.txn).await?;
            stored.push(model_to_domain(saved)?);
        }
        Ok(stored)
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let SeaOrmAvailabilityTransaction { txn, write_guard } = *self;
        let result = txn.commit().await;
        drop(write_guard);
        result.map_err(Into::into)
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        let SeaOrmAvailabilityTransaction { txn, write_guard } = *self;
        let result = txn.rollback().await;
        drop(write_guard);
        result.map_err(Into::into)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::room::{Room, RoomRepository};
    use crate::infrastructure::database::repositories::test_support::migrated_db;
    use crate::infrastructure::database::repositories::SeaOrmRoomRepository;
    use chrono::NaiveDate;

    fn r(start: &str, end: &str) -> DateRange {
        DateRange::new(
            NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap(),
            NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap(),
        )
        .unwrap()
    }

    async fn setup() -> (SeaOrmAvailabilityRepository, i32) {
        let db = migrated_db().await;
        let room = SeaOrmRoomRepository::new(db.clone())
            .create(Room::new("Suite"))
            .await
            .unwrap();
        (SeaOrmAvailabilityRepository::new(db), room.id)
    }

    #[tokio::test]
    async fn committed_inserts_are_visible() {
        let (repo, room_id) = setup().await;

        let mut txn = repo.begin().await.unwrap();
        let stored = txn
            .insert_ranges(room_id, &[r("2024-06-20", "2024-06-22"), r("2024-06-01", "2024-06-05")])
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
        txn.commit().await.unwrap();

        let all = repo.find_for_room(room_id).await.unwrap();
        let ranges: Vec<_> = all.iter().map(|b| b.range).collect();
        assert_eq!(ranges, vec![r("2024-06-01", "2024-06-05"), r("2024-06-20", "2024-06-22")]);
    }

    #[tokio::test]
    async fn rolled_back_changes_are_discarded() {
        let (repo, room_id) = setup().await;

        let mut txn = repo.begin().await.unwrap();
        txn.insert_ranges(room_id, &[r("2024-06-01", "2024-06-05")]).await.unwrap();
        txn.rollback().await.unwrap();

        assert!(repo.find_for_room(room_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_overlapping_is_inclusive_and_room_scoped() {
        let (repo, room_id) = setup().await;

        let mut txn = repo.begin().await.unwrap();
        txn.insert_ranges(
            room_id,
            &[
                r("2024-06-01", "2024-06-09"),
                r("2024-06-10", "2024-06-20"),
                r("2024-06-21", "2024-06-30"),
            ],
        )
        .await
        .unwrap();

        let hits = txn
            .find_overlapping(room_id, r("2024-06-20", "2024-06-20"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].range, r("2024-06-10", "2024-06-20"));

        let hits = txn
            .find_overlapping(room_id, r("2024-06-09", "2024-06-21"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 3);

        let other_room = txn
            .find_overlapping(room_id + 1, r("2024-06-01", "2024-06-30"))
            .await
            .unwrap();
        assert!(other_room.is_empty());
        txn.commit().await.unwrap();
    }

    #[tokio::test]
    async fn delete_of_missing_row_is_an_internal_error() {
        let (repo, room_id) = setup().await;

        let mut txn = repo.begin().await.unwrap();
        let stored = txn
            .insert_ranges(room_id, &[r("2024-06-01", "2024-06-05")])
            .await
            .unwrap();

        let err = txn
            .delete_ranges(&[stored[0].id, stored[0].id + 1000])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_blocks_across_rooms_on_a_database_file() {
        use sea_orm_migration::MigratorTrait;

        use crate::application::{AvailabilityService, SyncMode};
        use crate::domain::room::RatePlan;
        use crate::domain::RepositoryProvider;
        use crate::infrastructure::database::migrator::Migrator;
        use crate::infrastructure::database::{init_database, DatabaseConfig};
        use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
        use crate::infrastructure::sync::NoopInventorySync;

        let path = std::env::temp_dir().join(format!("availability-{}.db", uuid::Uuid::new_v4()));
        let db = init_database(&DatabaseConfig::sqlite(path.to_str().unwrap()))
            .await
            .unwrap();
        Migrator::up(&db, None).await.unwrap();

        let repos = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let mut room_ids = Vec::new();
        for n in 0..8 {
            let room = repos.rooms().create(Room::new(format!("Room {}", n))).await.unwrap();
            repos
                .rooms()
                .add_rate_plan(RatePlan::new(room.id, "BAR", "Best available"))
                .await
                .unwrap();
            room_ids.push(room.id);
        }

        let service = Arc::new(AvailabilityService::new(
            repos.clone(),
            Arc::new(NoopInventorySync),
            SyncMode::BestEffort,
        ));

        let mut handles = Vec::new();
        for &room_id in &room_ids {
            for k in 0..5u32 {
                let service = service.clone();
                handles.push(tokio::spawn(async move {
                    let start = NaiveDate::from_ymd_opt(2024, 6, 1 + k * 4).unwrap();
                    let end = NaiveDate::from_ymd_opt(2024, 6, 2 + k * 4).unwrap();
                    service.reconcile_block(room_id, start, end).await
                }));
            }
        }

        let mut failures = Vec::new();
        for handle in handles {
            if let Err(e) = handle.await.unwrap() {
                failures.push(e.to_string());
            }
        }
        assert!(failures.is_empty(), "failed reconciliations: {:?}", failures);

        for &room_id in &room_ids {
            let stored = repos.availability().find_for_room(room_id).await.unwrap();
            assert_eq!(stored.len(), 5);
        }

        db.close().await.unwrap();
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }
}
