//! Reservation use cases

pub mod availability;
pub mod service;

pub use availability::AvailabilityChecker;
pub use service::ReservationService;
