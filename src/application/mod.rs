//! Application layer - use cases on top of the domain

pub mod reservations;

pub use reservations::{AvailabilityChecker, ReservationService};
