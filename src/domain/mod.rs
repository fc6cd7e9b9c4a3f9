pub mod error;
pub mod reservation;

// Re-export commonly used types
pub use error::{AppError, DomainError, DomainResult, InfraError};
pub use reservation::{
    Reservation, ReservationDraft, ReservationRepository, ReservationSearchFilter,
    ReservationStatus, ReservationStore, ReservationTransaction,
};
