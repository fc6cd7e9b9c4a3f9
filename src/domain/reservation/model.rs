//! Reservation domain entity

use std::str::FromStr;

use chrono::NaiveDate;

use crate::domain::{DomainError, DomainResult};

/// Page size used by searches that don't specify one.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Largest page a single search may return.
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Reservation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservationStatus {
    /// Waiting for a manager's decision; the only editable state
    Pending,
    /// Confirmed; blocks overlapping approvals for the same room
    Approved,
    /// Withdrawn by the guest; terminal
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for ReservationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(DomainError::Validation(format!(
                "Unknown reservation status: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Room reservation.
///
/// `id` is `None` until storage assigns one on first save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: Option<i64>,
    pub user_id: i64,
    pub room_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ReservationStatus,
}

impl Reservation {
    pub fn is_pending(&self) -> bool {
        self.status == ReservationStatus::Pending
    }
}

/// Caller-supplied reservation data for create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationDraft {
    pub user_id: i64,
    pub room_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Server-assigned; must be empty on create.
    pub status: Option<ReservationStatus>,
}

impl ReservationDraft {
    /// Turn the draft into a `PENDING` reservation, keeping `id` if given.
    pub fn into_pending(self, id: Option<i64>) -> Reservation {
        Reservation {
            id,
            user_id: self.user_id,
            room_id: self.room_id,
            start_date: self.start_date,
            end_date: self.end_date,
            status: ReservationStatus::Pending,
        }
    }
}

/// Search parameters for listing reservations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationSearchFilter {
    pub room_id: Option<i64>,
    pub user_id: Option<i64>,
    pub page_size: Option<u64>,
    pub page_number: Option<u64>,
}

/// Fails with a validation error unless `end_date` is strictly after `start_date`.
pub fn ensure_valid_range(start_date: NaiveDate, end_date: NaiveDate) -> DomainResult<()> {
    if end_date <= start_date {
        return Err(DomainError::Validation(format!(
            "End date {} must be after start date {}",
            end_date, start_date
        )));
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────
