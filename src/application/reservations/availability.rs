//! Room availability check used before approving a reservation.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::domain::reservation::{ensure_valid_range, ReservationRepository, ReservationStatus};
use crate::domain::DomainResult;

/// Answers whether a room is free of approved reservations for a date range.
///
/// Evaluated fresh on every call; no caching.
pub struct AvailabilityChecker<R: ?Sized> {
    repo: Arc<R>,
}

impl<R: ReservationRepository + ?Sized> AvailabilityChecker<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// `true` when no approved reservation for `room_id` overlaps the range.
    ///
    /// Fails with a validation error unless `end_date` is after `start_date`.
    pub async fn is_available(
        &self,
        room_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> DomainResult<bool> {
        self.is_available_within(&*self.repo, room_id, start_date, end_date)
            .await
    }

    /// Same check against `repo`, typically an open transaction.
    pub async fn is_available_within<T: ReservationRepository + ?Sized>(
        &self,
        repo: &T,
        room_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> DomainResult<bool> {
        ensure_valid_range(start_date, end_date)?;

        let conflicting_ids = repo
            .find_conflict_ids(room_id, start_date, end_date, ReservationStatus::Approved)
            .await?;

        if conflicting_ids.is_empty() {
            return Ok(true);
        }

        info!(room_id, conflicting_ids = ?conflicting_ids, "Room is not available");
        Ok(false)
    }
}
