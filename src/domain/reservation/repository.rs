//! Reservation repository interface

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::{Reservation, ReservationStatus};
use crate::domain::DomainResult;

/// Persistence operations for reservations. Storage holds no business rules.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Find reservation by ID
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Reservation>>;

    /// Insert when `id` is `None` (storage assigns one), otherwise overwrite
    /// every column of the existing row.
    async fn save(&self, reservation: Reservation) -> DomainResult<Reservation>;

    /// Update only the status column
    async fn set_status(&self, id: i64, status: ReservationStatus) -> DomainResult<()>;

    /// Page `page_number` (0-based) of up to `page_size` reservations, ordered by id.
    /// Absent filters match everything.
    async fn search(
        &self,
        room_id: Option<i64>,
        user_id: Option<i64>,
        page_size: u64,
        page_number: u64,
    ) -> DomainResult<Vec<Reservation>>;

    /// IDs of reservations for `room_id` with `status` overlapping the range:
    /// `existing.start <= end_date AND start_date < existing.end`.
    async fn find_conflict_ids(
        &self,
        room_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        status: ReservationStatus,
    ) -> DomainResult<Vec<i64>>;
}

/// A repository scoped to one storage transaction.
///
/// Dropping it without calling [`commit`](Self::commit) rolls back.
#[async_trait]
pub trait ReservationTransaction: ReservationRepository {
    async fn commit(self: Box<Self>) -> DomainResult<()>;

    async fn rollback(self: Box<Self>) -> DomainResult<()>;
}

/// Repository that can open transactions.
#[async_trait]
pub trait ReservationStore: ReservationRepository {
    async fn begin(&self) -> DomainResult<Box<dyn ReservationTransaction>>;
}
