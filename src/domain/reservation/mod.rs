//! Reservation aggregate
//!
//! Contains the Reservation entity, related types, and repository interface.

pub mod model;
pub mod repository;

pub use model::{
    ensure_valid_range, Reservation, ReservationDraft, ReservationSearchFilter,
    ReservationStatus, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use repository::{ReservationRepository, ReservationStore, ReservationTransaction};
