//! SeaORM implementation of BookingRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use crate::domain::{
    Booking, BookingFilter, BookingRepository, BookingStatus, DomainError, DomainResult,
    NewBooking, StayRange,
};
use crate::infrastructure::database::entities::booking;
use crate::shared::Money;

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: booking::Model) -> Booking {
    Booking {
        id: m.id,
        room_id: m.room_id,
        client_name: m.client_name,
        client_email: m.client_email,
        check_in: m.check_in,
        check_out: m.check_out,
        total_price: Money::from_cents(m.total_price),
        payment_method: m.payment_method,
        status: BookingStatus::from_str(&m.status),
        created_at: m.created_at,
        user_id: m.user_id,
    }
}

/// SQL condition matching rows whose status reads as one of `statuses`,
/// with the same normalization as [`BookingStatus::from_str`].
fn status_in(statuses: &[BookingStatus]) -> SimpleExpr {
    let normalized = Expr::expr(Expr::cust("LOWER(TRIM(status))"));
    if statuses.contains(&BookingStatus::Pending) {
        // Unknown spellings read as pending, so exclude the other statuses instead
        let excluded: Vec<&str> = BookingStatus::ALL
            .iter()
            .filter(|s| !statuses.contains(s))
            .flat_map(|s| s.spellings().iter().copied())
            .collect();
        normalized.is_not_in(excluded)
    } else {
        let included: Vec<&str> = statuses
            .iter()
            .flat_map(|s| s.spellings().iter().copied())
            .collect();
        normalized.is_in(included)
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn insert(&self, b: NewBooking) -> DomainResult<Booking> {
        debug!("Saving booking for room {}", b.room_id);

        let model = booking::ActiveModel {
            room_id: Set(b.room_id),
            client_name: Set(b.client_name),
            client_email: Set(b.client_email),
            check_in: Set(b.stay.check_in()),
            check_out: Set(b.stay.check_out()),
            total_price: Set(b.total_price.cents()),
            payment_method: Set(b.payment_method),
            status: Set(BookingStatus::Pending.as_str().to_string()),
            created_at: Set(Utc::now()),
            user_id: Set(b.user_id),
            ..Default::default()
        };
        let model = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(model))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn list(&self, filter: BookingFilter) -> DomainResult<Vec<Booking>> {
        let mut query = booking::Entity::find();

        if let Some(user_id) = filter.user_id {
            query = query.filter(booking::Column::UserId.eq(user_id));
        }

        query = if filter.newest_first {
            query
                .order_by_desc(booking::Column::CreatedAt)
                .order_by_desc(booking::Column::Id)
        } else {
            query.order_by_asc(booking::Column::Id)
        };

        let models = query.all(&self.db).await.map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_overlapping_active(
        &self,
        room_id: i32,
        stay: StayRange,
    ) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::RoomId.eq(room_id))
            .filter(booking::Column::CheckIn.lt(stay.check_out()))
            .filter(booking::Column::CheckOut.gt(stay.check_in()))
            .order_by_asc(booking::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        // Status spellings are normalized on read, so the active check runs here.
        Ok(models
            .into_iter()
            .map(model_to_domain)
            .filter(|b| b.blocks(&stay))
            .collect())
    }

    async fn update_status(
        &self,
        id: i32,
        from: &[BookingStatus],
        to: BookingStatus,
    ) -> DomainResult<u64> {
        debug!("Setting booking {} to {} (from {:?})", id, to, from);

        let result = booking::Entity::update_many()
            .col_expr(booking::Column::Status, Expr::value(to.as_str()))
            .filter(booking::Column::Id.eq(id))
            .filter(status_in(from))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    async fn delete(&self, id: i32) -> DomainResult<u64> {
        debug!("Deleting booking {}", id);

        let result = booking::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    async fn find_stale_pending(
        &self,
        created_before: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::CreatedAt.lt(created_before))
            .filter(status_in(&[BookingStatus::Pending]))
            .order_by_asc(booking::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
