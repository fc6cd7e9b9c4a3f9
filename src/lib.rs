//! # Room Reservations
//!
//! Reservation management backend: create, update, cancel, approve and
//! search room reservations, with conflict detection on approval.
//!
//! ## Architecture
//!
//! - **domain**: Reservation model, errors and repository traits
//! - **application**: Reservation service and availability checker
//! - **infrastructure**: SeaORM/SQLite and in-memory storage
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: Runtime wiring and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, CONFIG_ENV};

pub use application::{AvailabilityChecker, ReservationService};

pub use domain::{AppError, DomainError, InfraError};

pub use infrastructure::{
    init_database, DatabaseConfig, InMemoryReservationStore, SeaOrmReservationRepository,
};

pub use interfaces::create_api_router;

pub use server::{init_tracing, ServerHandle, ServerOptions};
