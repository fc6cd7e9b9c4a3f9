//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait,
    DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Set, TransactionTrait,
};

use crate::domain::reservation::{
    Reservation, ReservationRepository, ReservationStatus, ReservationStore,
    ReservationTransaction,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::reservation;

/// Connection-pool backed reservation store.
#[derive(Clone)]
pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Repository bound to one open database transaction.
pub struct SeaOrmReservationTransaction {
    txn: DatabaseTransaction,
}

// ── Conversion helpers ──────────────────────────────────────────

fn status_to_entity(status: ReservationStatus) -> reservation::ReservationStatus {
    match status {
        ReservationStatus::Pending => reservation::ReservationStatus::Pending,
        ReservationStatus::Approved => reservation::ReservationStatus::Approved,
        ReservationStatus::Cancelled => reservation::ReservationStatus::Cancelled,
    }
}

fn status_to_domain(status: reservation::ReservationStatus) -> ReservationStatus {
    match status {
        reservation::ReservationStatus::Pending => ReservationStatus::Pending,
        reservation::ReservationStatus::Approved => ReservationStatus::Approved,
        reservation::ReservationStatus::Cancelled => ReservationStatus::Cancelled,
    }
}

fn model_to_domain(m: reservation::Model) -> Reservation {
    Reservation {
        id: Some(m.id),
        user_id: m.user_id,
        room_id: m.room_id,
        start_date: m.start_date,
        end_date: m.end_date,
        status: status_to_domain(m.status),
    }
}

fn db_err(e: DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

// ── Queries shared by pool and transaction ──────────────────────

async fn find_by_id<C: ConnectionTrait>(conn: &C, id: i64) -> DomainResult<Option<Reservation>> {
    let model = reservation::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(db_err)?;
    Ok(model.map(model_to_domain))
}

async fn save<C: ConnectionTrait>(conn: &C, r: Reservation) -> DomainResult<Reservation> {
    let mut model = reservation::ActiveModel {
        id: NotSet,
        user_id: Set(r.user_id),
        room_id: Set(r.room_id),
        start_date: Set(r.start_date),
        end_date: Set(r.end_date),
        status: Set(status_to_entity(r.status)),
    };

    let saved = match r.id {
        None => {
            debug!("Inserting reservation for room {}", r.room_id);
            model.insert(conn).await.map_err(db_err)?
        }
        Some(id) => {
            debug!("Updating reservation: {}", id);
            model.id = Set(id);
            model.update(conn).await.map_err(|e| match e {
                DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => {
                    DomainError::reservation_not_found(id)
                }
                other => db_err(other),
            })?
        }
    };
    Ok(model_to_domain(saved))
}

async fn set_status<C: ConnectionTrait>(
    conn: &C,
    id: i64,
    status: ReservationStatus,
) -> DomainResult<()> {
    debug!("Setting reservation {} status to {}", id, status);

    let result = reservation::Entity::update_many()
        .col_expr(
            reservation::Column::Status,
            Expr::value(status_to_entity(status).to_value()),
        )
        .filter(reservation::Column::Id.eq(id))
        .exec(conn)
        .await
        .map_err(db_err)?;

    if result.rows_affected == 0 {
        return Err(DomainError::reservation_not_found(id));
    }
    Ok(())
}

async fn search<C: ConnectionTrait>(
    conn: &C,
    room_id: Option<i64>,
    user_id: Option<i64>,
    page_size: u64,
    page_number: u64,
) -> DomainResult<Vec<Reservation>> {
    // SQL binds LIMIT and OFFSET as signed 64-bit integers.
    let bound = i64::MAX as u64;
    let Some(offset) = page_number
        .checked_mul(page_size)
        .filter(|offset| *offset <= bound)
    else {
        debug!("Page {} of size {} is past any stored row", page_number, page_size);
        return Ok(Vec::new());
    };

    let models = reservation::Entity::find()
        .apply_if(room_id, |q, v| q.filter(reservation::Column::RoomId.eq(v)))
        .apply_if(user_id, |q, v| q.filter(reservation::Column::UserId.eq(v)))
        .order_by_asc(reservation::Column::Id)
        .offset(offset)
        .limit(page_size.min(bound))
        .all(conn)
        .await
        .map_err(db_err)?;
    Ok(models.into_iter().map(model_to_domain).collect())
}

async fn find_conflict_ids<C: ConnectionTrait>(
    conn: &C,
    room_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: ReservationStatus,
) -> DomainResult<Vec<i64>> {
    reservation::Entity::find()
        .select_only()
        .column(reservation::Column::Id)
        .filter(reservation::Column::RoomId.eq(room_id))
        .filter(reservation::Column::StartDate.lte(end_date))
        .filter(reservation::Column::EndDate.gt(start_date))
        .filter(reservation::Column::Status.eq(status_to_entity(status)))
        .order_by_asc(reservation::Column::Id)
        .into_tuple::<i64>()
        .all(conn)
        .await
        .map_err(db_err)
}

// ── ReservationRepository impls ─────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Reservation>> {
        find_by_id(&self.db, id).await
    }

    async fn save(&self, reservation: Reservation) -> DomainResult<Reservation> {
        save(&self.db, reservation).await
    }

    async fn set_status(&self, id: i64, status: ReservationStatus) -> DomainResult<()> {
        set_status(&self.db, id, status).await
    }

    async fn search(
        &self,
        room_id: Option<i64>,
        user_id: Option<i64>,
        page_size: u64,
        page_number: u64,
    ) -> DomainResult<Vec<Reservation>> {
        search(&self.db, room_id, user_id, page_size, page_number).await
    }

    async fn find_conflict_ids(
        &self,
        room_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        status: ReservationStatus,
    ) -> DomainResult<Vec<i64>> {
        find_conflict_ids(&self.db, room_id, start_date, end_date, status).await
    }
}

#[async_trait]
impl ReservationRepository for SeaOrmReservationTransaction {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Reservation>> {
        find_by_id(&self.txn, id).await
    }

    async fn save(&self, reservation: Reservation) -> DomainResult<Reservation> {
        save(&self.txn, reservation).await
    }

    async fn set_status(&self, id: i64, status: ReservationStatus) -> DomainResult<()> {
        set_status(&self.txn, id, status).await
    }

    async fn search(
        &self,
        room_id: Option<i64>,
        user_id: Option<i64>,
        page_size: u64,
        page_number: u64,
    ) -> DomainResult<Vec<Reservation>> {
        search(&self.txn, room_id, user_id, page_size, page_number).await
    }

    async fn find_conflict_ids(
        &self,
        room_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        status: ReservationStatus,
    ) -> DomainResult<Vec<i64>> {
        find_conflict_ids(&self.txn, room_id, start_date, end_date, status).await
    }
}

#[async_trait]
impl ReservationTransaction for SeaOrmReservationTransaction {
    async fn commit(self: Box<Self>) -> DomainResult<()> {
        self.txn.commit().await.map_err(db_err)
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        self.txn.rollback().await.map_err(db_err)
    }
}

#[async_trait]
impl ReservationStore for SeaOrmReservationRepository {
    async fn begin(&self) -> DomainResult<Box<dyn ReservationTransaction>> {
        let txn = self.db.begin().await.map_err(db_err)?;
        Ok(Box::new(SeaOrmReservationTransaction { txn }))
    }
}

// ── Tests ──────────────────────────────────────────────────────
