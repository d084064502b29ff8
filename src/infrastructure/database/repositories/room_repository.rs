//! SeaORM implementation of RoomRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::domain::room::{RatePlan, Room, RoomRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{rate_plan, room};

pub struct SeaOrmRoomRepository {
    db: DatabaseConnection,
}

impl SeaOrmRoomRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn room_to_domain(m: room::Model) -> Room {
    Room {
        id: m.id,
        name: m.name,
        created_at: m.created_at,
    }
}

fn rate_plan_to_domain(m: rate_plan::Model) -> RatePlan {
    RatePlan {
        id: m.id,
        room_id: m.room_id,
        code: m.code,
        name: m.name,
    }
}

#[async_trait]
impl RoomRepository for SeaOrmRoomRepository {
    async fn create(&self, r: Room) -> DomainResult<Room> {
        debug!("Creating room: {}", r.name);

        let model = room::ActiveModel {
            id: NotSet,
            name: Set(r.name),
            created_at: Set(r.created_at),
        };
        let saved = model.insert(&self.db).await?;
        Ok(room_to_domain(saved))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>> {
        let model = room::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(room_to_domain))
    }

    async fn add_rate_plan(&self, p: RatePlan) -> DomainResult<RatePlan> {
        debug!("Adding rate plan {} to room {}", p.code, p.room_id);

        let model = rate_plan::ActiveModel {
            id: NotSet,
            room_id: Set(p.room_id),
            code: Set(p.code),
            name: Set(p.name),
        };
        let saved = model.insert(&self.db).await?;
        Ok(rate_plan_to_domain(saved))
    }

    async fn rate_plan_codes(&self, room_id: i32) -> DomainResult<Vec<String>> {
        let models = rate_plan::Entity::find()
            .filter(rate_plan::Column::RoomId.eq(room_id))
            .order_by_asc(rate_plan::Column::Code)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.code).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::repositories::test_support::migrated_db;

    #[tokio::test]
    async fn create_and_find_room() {
        let repo = SeaOrmRoomRepository::new(migrated_db().await);

        let room = repo.create(Room::new("Deluxe 101")).await.unwrap();
        assert!(room.id > 0);

        let found = repo.find_by_id(room.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Deluxe 101");
        assert!(repo.find_by_id(room.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rate_plan_codes_are_sorted_and_scoped_to_room() {
        let repo = SeaOrmRoomRepository::new(migrated_db().await);
        let a = repo.create(Room::new("A")).await.unwrap();
        let b = repo.create(Room::new("B")).await.unwrap();

        repo.add_rate_plan(RatePlan::new(a.id, "NRF", "Non refundable")).await.unwrap();
        repo.add_rate_plan(RatePlan::new(a.id, "BAR", "Best available")).await.unwrap();
        repo.add_rate_plan(RatePlan::new(b.id, "CORP", "Corporate")).await.unwrap();

        assert_eq!(repo.rate_plan_codes(a.id).await.unwrap(), vec!["BAR", "NRF"]);
        assert_eq!(repo.rate_plan_codes(b.id).await.unwrap(), vec!["CORP"]);
    }
}
