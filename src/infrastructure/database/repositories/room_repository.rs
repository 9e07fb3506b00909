//! SeaORM implementation of RoomRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::debug;

use crate::domain::{DomainError, DomainResult, NewRoom, Room, RoomPatch, RoomRepository};
use crate::infrastructure::database::entities::room;
use crate::shared::Money;

pub struct SeaOrmRoomRepository {
    db: DatabaseConnection,
}

impl SeaOrmRoomRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: room::Model) -> Room {
    Room {
        id: m.id,
        name: m.name,
        description: m.description,
        price_per_night: Money::from_cents(m.price_per_night),
        image_url: m.image_url,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

// ── RoomRepository impl ─────────────────────────────────────────

#[async_trait]
impl RoomRepository for SeaOrmRoomRepository {
    async fn list(&self) -> DomainResult<Vec<Room>> {
        let models = room::Entity::find()
            .order_by_asc(room::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>> {
        let model = room::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn insert(&self, r: NewRoom) -> DomainResult<Room> {
        debug!("Creating room: {}", r.name);

        let model = room::ActiveModel {
            name: Set(r.name),
            description: Set(r.description),
            price_per_night: Set(r.price_per_night.cents()),
            image_url: Set(r.image_url),
            ..Default::default()
        };
        let model = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(model))
    }

    async fn update(&self, id: i32, patch: RoomPatch) -> DomainResult<Option<Room>> {
        let Some(existing) = room::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        if patch.is_empty() {
            return Ok(Some(model_to_domain(existing)));
        }

        debug!("Updating room: {}", id);

        let mut active: room::ActiveModel = existing.into();
        if let Some(price) = patch.price_per_night {
            active.price_per_night = Set(price.cents());
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(image_url) = patch.image_url {
            active.image_url = Set(Some(image_url));
        }
        let model = active.update(&self.db).await.map_err(db_err)?;
        Ok(Some(model_to_domain(model)))
    }
}
