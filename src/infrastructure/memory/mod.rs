//! In-memory repositories for development and testing

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::domain::availability::{
    AvailabilityRepository, AvailabilityTransaction, BlockedRange, DateRange,
};
use crate::domain::room::{RatePlan, Room, RoomRepository};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// In-memory implementation of every repository.
///
/// Range transactions stage their changes and apply them atomically on
/// commit; reads inside a transaction see the staged changes.
pub struct InMemoryRepositoryProvider {
    rooms: InMemoryRoomRepository,
    availability: InMemoryAvailabilityRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self {
            rooms: InMemoryRoomRepository::default(),
            availability: InMemoryAvailabilityRepository::default(),
        }
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn rooms(&self) -> &dyn RoomRepository {
        &self.rooms
    }

    fn availability(&self) -> &dyn AvailabilityRepository {
        &self.availability
    }
}

// ── Rooms ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: DashMap<i32, Room>,
    rate_plans: DashMap<i32, RatePlan>,
    room_counter: AtomicI32,
    rate_plan_counter: AtomicI32,
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create(&self, mut room: Room) -> DomainResult<Room> {
        room.id = self.room_counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.rooms.insert(room.id, room.clone());
        Ok(room)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>> {
        Ok(self.rooms.get(&id).map(|r| r.clone()))
    }

    async fn add_rate_plan(&self, mut rate_plan: RatePlan) -> DomainResult<RatePlan> {
        if !self.rooms.contains_key(&rate_plan.room_id) {
            return Err(DomainError::room_not_found(rate_plan.room_id));
        }
        rate_plan.id = self.rate_plan_counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.rate_plans.insert(rate_plan.id, rate_plan.clone());
        Ok(rate_plan)
    }

    async fn rate_plan_codes(&self, room_id: i32) -> DomainResult<Vec<String>> {
        let mut codes: Vec<String> = self
            .rate_plans
            .iter()
            .filter(|p| p.room_id == room_id)
            .map(|p| p.code.clone())
            .collect();
        codes.sort();
        Ok(codes)
    }
}

// ── Blocked ranges ─────────────────────────────────────────────

#[derive(Default)]
struct RangeTable {
    rows: BTreeMap<i32, BlockedRange>,
    next_id: i32,
}

#[derive(Default)]
pub struct InMemoryAvailabilityRepository {
    table: Arc<Mutex<RangeTable>>,
}

pub struct InMemoryAvailabilityTransaction {
    table: Arc<Mutex<RangeTable>>,
    deleted: Vec<i32>,
    inserted: Vec<BlockedRange>,
}

fn sorted(mut ranges: Vec<BlockedRange>) -> Vec<BlockedRange> {
    ranges.sort_by_key(|r| (r.range, r.id));
    ranges
}

#[async_trait]
impl AvailabilityRepository for InMemoryAvailabilityRepository {
    async fn begin(&self) -> DomainResult<Box<dyn AvailabilityTransaction>> {
        Ok(Box::new(InMemoryAvailabilityTransaction {
            table: self.table.clone(),
            deleted: Vec::new(),
            inserted: Vec::new(),
        }))
    }

    async fn find_for_room(&self, room_id: i32) -> DomainResult<Vec<BlockedRange>> {
        let table = self.table.lock().await;
        Ok(sorted(
            table
                .rows
                .values()
                .filter(|r| r.room_id == room_id)
                .cloned()
                .collect(),
        ))
    }
}

#[async_trait]
impl AvailabilityTransaction for InMemoryAvailabilityTransaction {
    async fn find_overlapping(
        &mut self,
        room_id: i32,
        range: DateRange,
    ) -> DomainResult<Vec<BlockedRange>> {
        let table = self.table.lock().await;
        let committed = table
            .rows
            .values()
            .filter(|r| !self.deleted.contains(&r.id));
        Ok(sorted(
            committed
                .chain(self.inserted.iter())
                .filter(|r| r.room_id == room_id && r.range.overlaps(&range))
                .cloned()
                .collect(),
        ))
    }

    async fn delete_ranges(&mut self, ids: &[i32]) -> DomainResult<()> {
        let table = self.table.lock().await;
        for id in ids {
            if let Some(pos) = self.inserted.iter().position(|r| r.id == *id) {
                self.inserted.remove(pos);
            } else if table.rows.contains_key(id) && !self.deleted.contains(id) {
                self.deleted.push(*id);
            } else {
                return Err(DomainError::Internal(format!(
                    "blocked range {} vanished during reconciliation",
                    id
                )));
            }
        }
        Ok(())
    }

    async fn insert_ranges(
        &mut self,
        room_id: i32,
        ranges: &[DateRange],
    ) -> DomainResult<Vec<BlockedRange>> {
        let mut table = self.table.lock().await;
        let stored: Vec<BlockedRange> = ranges
            .iter()
            .map(|range| {
                table.next_id += 1;
                BlockedRange {
                    id: table.next_id,
                    room_id,
                    range: *range,
                    created_at: Utc::now(),
                }
            })
            .collect();
        self.inserted.extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let InMemoryAvailabilityTransaction {
            table,
            deleted,
            inserted,
        } = *self;

        let mut table = table.lock().await;
        for id in &deleted {
            table.rows.remove(id);
        }
        for row in inserted {
            table.rows.insert(row.id, row);
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        Ok(())
    }
}
