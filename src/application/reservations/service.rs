//! Reservation service: application-layer orchestration
//!
//! Owns the reservation lifecycle: creation, updates, cancellation and
//! approval. HTTP handlers are thin wrappers that delegate here.
//!
//! ```text
//! PENDING ──approve──▶ APPROVED
//!    │
//!    └────cancel────▶ CANCELLED
//! ```

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::availability::AvailabilityChecker;
use crate::domain::reservation::{
    ensure_valid_range, Reservation, ReservationDraft, ReservationRepository,
    ReservationSearchFilter, ReservationStatus, ReservationStore, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};
use crate::domain::{DomainError, DomainResult};

/// Lifecycle rules on top of a [`ReservationStore`].
///
/// Generic over the store so it stays decoupled from the concrete
/// persistence layer; `ReservationService<dyn ReservationStore>` is what the
/// HTTP layer holds.
pub struct ReservationService<S: ReservationStore + ?Sized> {
    store: Arc<S>,
    availability: AvailabilityChecker<S>,
    /// Serializes approvals within this process. The storage transaction
    /// covers competing writers elsewhere.
    approval_lock: Mutex<()>,
}

impl<S: ReservationStore + ?Sized> ReservationService<S> {
    pub fn new(store: Arc<S>, availability: AvailabilityChecker<S>) -> Self {
        Self {
            store,
            availability,
            approval_lock: Mutex::new(()),
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Get a single reservation by ID.
    pub async fn get_by_id(&self, id: i64) -> DomainResult<Reservation> {
        observe("get", self.try_get_by_id(id).await)
    }

    /// List reservations matching the filter, one page at a time.
    pub async fn search(&self, filter: ReservationSearchFilter) -> DomainResult<Vec<Reservation>> {
        observe("search", self.try_search(filter).await)
    }

    /// Whether `room_id` has no approved reservation overlapping the range.
    pub async fn check_availability(
        &self,
        room_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> DomainResult<bool> {
        observe(
            "availability",
            self.availability
                .is_available(room_id, start_date, end_date)
                .await,
        )
    }

    // ── Commands ────────────────────────────────────────────────

    /// Create a reservation in `PENDING` state.
    pub async fn create(&self, draft: ReservationDraft) -> DomainResult<Reservation> {
        observe("create", self.try_create(draft).await)
    }

    /// Replace every field of a `PENDING` reservation.
    pub async fn update(&self, id: i64, draft: ReservationDraft) -> DomainResult<Reservation> {
        observe("update", self.try_update(id, draft).await)
    }

    /// Cancel a `PENDING` reservation.
    pub async fn cancel(&self, id: i64) -> DomainResult<()> {
        observe("cancel", self.try_cancel(id).await)
    }

    /// Approve a `PENDING` reservation unless the room is already taken.
    pub async fn approve(&self, id: i64) -> DomainResult<Reservation> {
        observe("approve", self.try_approve(id).await)
    }

    // ── Implementation ──────────────────────────────────────────

    async fn try_get_by_id(&self, id: i64) -> DomainResult<Reservation> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::reservation_not_found(id))
    }

    async fn try_search(&self, filter: ReservationSearchFilter) -> DomainResult<Vec<Reservation>> {
        let page_size = filter.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        let page_number = filter.page_number.unwrap_or(0);

        if page_size == 0 {
            return Err(DomainError::Validation(
                "Page size must be greater than zero".into(),
            ));
        }
        if page_size > MAX_PAGE_SIZE {
            return Err(DomainError::Validation(format!(
                "Page size must not exceed {}",
                MAX_PAGE_SIZE
            )));
        }

        self.store
            .search(filter.room_id, filter.user_id, page_size, page_number)
            .await
    }

    async fn try_create(&self, draft: ReservationDraft) -> DomainResult<Reservation> {
        if draft.status.is_some() {
            return Err(DomainError::Validation("Status should be empty".into()));
        }
        ensure_valid_range(draft.start_date, draft.end_date)?;

        let saved = self.store.save(draft.into_pending(None)).await?;
        info!(
            reservation_id = ?saved.id,
            room_id = saved.room_id,
            user_id = saved.user_id,
            "Reservation created"
        );
        Ok(saved)
    }

    async fn try_update(&self, id: i64, draft: ReservationDraft) -> DomainResult<Reservation> {
        let tx = self.store.begin().await?;

        let current = tx
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::reservation_not_found(id))?;

        if !current.is_pending() {
            return Err(DomainError::InvalidState(format!(
                "Cannot modify reservation with status {}",
                current.status
            )));
        }
        ensure_valid_range(draft.start_date, draft.end_date)?;

        let updated = tx.save(draft.into_pending(Some(id))).await?;
        tx.commit().await?;

        info!(reservation_id = id, "Reservation updated");
        Ok(updated)
    }

    async fn try_cancel(&self, id: i64) -> DomainResult<()> {
        let tx = self.store.begin().await?;

        let current = tx
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::reservation_not_found(id))?;

        match current.status {
            ReservationStatus::Approved => {
                return Err(DomainError::InvalidState(
                    "Cannot cancel an approved reservation. Contact a manager".into(),
                ));
            }
            ReservationStatus::Cancelled => {
                return Err(DomainError::InvalidState(
                    "Reservation is already cancelled. Contact a manager".into(),
                ));
            }
            ReservationStatus::Pending => {}
        }

        tx.set_status(id, ReservationStatus::Cancelled).await?;
        tx.commit().await?;

        info!(reservation_id = id, "Successfully cancelled reservation");
        Ok(())
    }

    async fn try_approve(&self, id: i64) -> DomainResult<Reservation> {
        let _approval = self.approval_lock.lock().await;
        let tx = self.store.begin().await?;

        let outcome = self.approve_within(&*tx, id).await;
        match outcome {
            Ok(approved) => {
                tx.commit().await?;
                info!(reservation_id = id, room_id = approved.room_id, "Reservation approved");
                Ok(approved)
            }
            Err(e) => {
                // Release the storage lock before the next approval runs.
                if let Err(rollback) = tx.rollback().await {
                    warn!(reservation_id = id, error = %rollback, "Approval rollback failed");
                }
                Err(e)
            }
        }
    }

    async fn approve_within<T: ReservationRepository + ?Sized>(
        &self,
        tx: &T,
        id: i64,
    ) -> DomainResult<Reservation> {
        let mut reservation = tx
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::reservation_not_found(id))?;

        if !reservation.is_pending() {
            return Err(DomainError::InvalidState(format!(
                "Cannot approve reservation with status {}",
                reservation.status
            )));
        }

        let available = self
            .availability
            .is_available_within(
                tx,
                reservation.room_id,
                reservation.start_date,
                reservation.end_date,
            )
            .await?;

        if !available {
            return Err(DomainError::InvalidState(format!(
                "Cannot approve reservation {}: room {} is already booked for these dates",
                id, reservation.room_id
            )));
        }

        reservation.status = ReservationStatus::Approved;
        tx.save(reservation).await
    }
}

/// Count the outcome of a service operation.
fn observe<T>(operation: &'static str, result: DomainResult<T>) -> DomainResult<T> {
    let outcome = match &result {
        Ok(_) => "ok",
        Err(DomainError::NotFound { .. }) => "not_found",
        Err(DomainError::Validation(_)) => "invalid_argument",
        Err(DomainError::InvalidState(_)) => "invalid_state",
        Err(DomainError::Storage(_)) => "error",
    };
    if let Err(e) = &result {
        debug!(operation, error = %e, "Reservation operation rejected");
    }
    metrics::counter!("reservations_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
    result
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryReservationStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service() -> (
        Arc<InMemoryReservationStore>,
        ReservationService<InMemoryReservationStore>,
    ) {
        let store = Arc::new(InMemoryReservationStore::new());
        let checker = AvailabilityChecker::new(store.clone());
        (store.clone(), ReservationService::new(store, checker))
    }

    fn draft(room_id: i64, start: NaiveDate, end: NaiveDate) -> ReservationDraft {
        ReservationDraft {
            user_id: 1,
            room_id,
            start_date: start,
            end_date: end,
            status: None,
        }
    }

    async fn seed(
        store: &InMemoryReservationStore,
        room_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        status: ReservationStatus,
    ) -> i64 {
        store
            .save(Reservation {
                id: None,
                user_id: 2,
                room_id,
                start_date: start,
                end_date: end,
                status,
            })
            .await
            .unwrap()
            .id
            .unwrap()
    }

    // ── create ──

    #[tokio::test]
    async fn create_assigns_id_and_pending_status() {
        let (_, svc) = service();
        let created = svc
            .create(draft(1, date(2024, 6, 10), date(2024, 6, 15)))
            .await
            .unwrap();
        assert!(created.id.is_some());
        assert_eq!(created.status, ReservationStatus::Pending);
        assert_eq!(created.room_id, 1);
    }

    #[tokio::test]
    async fn create_rejects_caller_status() {
        let (store, svc) = service();
        let mut d = draft(1, date(2024, 6, 10), date(2024, 6, 15));
        d.status = Some(ReservationStatus::Approved);
        let err = svc.create(d).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn create_rejects_end_not_after_start() {
        let (_, svc) = service();
        for (start, end) in [
            (date(2024, 6, 10), date(2024, 6, 10)),
            (date(2024, 6, 10), date(2024, 6, 9)),
        ] {
            let err = svc.create(draft(1, start, end)).await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    // ── get / search ──

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let (_, svc) = service();
        let err = svc.get_by_id(77).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn search_defaults_to_first_page_of_ten() {
        let (store, svc) = service();
        for _ in 0..12 {
            seed(&store, 1, date(2024, 6, 1), date(2024, 6, 2), ReservationStatus::Pending).await;
        }
        let page = svc.search(ReservationSearchFilter::default()).await.unwrap();
        assert_eq!(page.len(), 10);
        assert_eq!(page[0].id, Some(1));

        let second = svc
            .search(ReservationSearchFilter {
                page_number: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(second.len(), 2);
    }

    #[tokio::test]
    async fn search_by_room_spans_all_users() {
        let (store, svc) = service();
        seed(&store, 1, date(2024, 6, 1), date(2024, 6, 2), ReservationStatus::Pending).await;
        seed(&store, 2, date(2024, 6, 1), date(2024, 6, 2), ReservationStatus::Pending).await;
        svc.create(draft(1, date(2024, 7, 1), date(2024, 7, 2)))
            .await
            .unwrap();

        let room_1 = svc
            .search(ReservationSearchFilter {
                room_id: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(room_1.len(), 2);
        assert!(room_1.iter().all(|r| r.room_id == 1));
        let mut users: Vec<i64> = room_1.iter().map(|r| r.user_id).collect();
        users.sort();
        assert_eq!(users, vec![1, 2]);
    }

    #[tokio::test]
    async fn search_rejects_zero_page_size() {
        let (_, svc) = service();
        let err = svc
            .search(ReservationSearchFilter {
                page_size: Some(0),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn search_rejects_oversized_page() {
        let (_, svc) = service();
        let err = svc
            .search(ReservationSearchFilter {
                page_size: Some(u64::MAX),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let last_allowed = svc
            .search(ReservationSearchFilter {
                page_size: Some(MAX_PAGE_SIZE),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(last_allowed.is_empty());
    }

    #[tokio::test]
    async fn search_far_past_the_end_is_empty() {
        let (store, svc) = service();
        seed(&store, 1, date(2024, 6, 10), date(2024, 6, 15), ReservationStatus::Pending).await;

        let page = svc
            .search(ReservationSearchFilter {
                page_number: Some(u64::MAX),
                page_size: Some(MAX_PAGE_SIZE),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn availability_reflects_approved_reservations() {
        let (store, svc) = service();
        seed(&store, 1, date(2024, 6, 10), date(2024, 6, 15), ReservationStatus::Approved).await;
        assert!(!svc
            .check_availability(1, date(2024, 6, 12), date(2024, 6, 13))
            .await
            .unwrap());
        assert!(svc
            .check_availability(1, date(2024, 6, 15), date(2024, 6, 16))
            .await
            .unwrap());
    }

    // ── update ──

    #[tokio::test]
    async fn update_overwrites_pending_reservation() {
        let (_, svc) = service();
        let created = svc
            .create(draft(1, date(2024, 6, 10), date(2024, 6, 15)))
            .await
            .unwrap();
        let id = created.id.unwrap();

        let mut d = draft(3, date(2024, 7, 1), date(2024, 7, 5));
        d.user_id = 9;
        d.status = Some(ReservationStatus::Approved);
        let updated = svc.update(id, d).await.unwrap();

        assert_eq!(updated.id, Some(id));
        assert_eq!(updated.room_id, 3);
        assert_eq!(updated.user_id, 9);
        assert_eq!(updated.status, ReservationStatus::Pending);
        assert_eq!(svc.get_by_id(id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_rejects_non_pending() {
        let (store, svc) = service();
        for status in [ReservationStatus::Approved, ReservationStatus::Cancelled] {
            let id = seed(&store, 1, date(2024, 6, 10), date(2024, 6, 15), status).await;
            let err = svc
                .update(id, draft(1, date(2024, 6, 11), date(2024, 6, 12)))
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::InvalidState(_)));
            assert_eq!(svc.get_by_id(id).await.unwrap().status, status);
        }
    }

    #[tokio::test]
    async fn update_rejects_bad_range() {
        let (_, svc) = service();
        let id = svc
            .create(draft(1, date(2024, 6, 10), date(2024, 6, 15)))
            .await
            .unwrap()
            .id
            .unwrap();
        let err = svc
            .update(id, draft(1, date(2024, 6, 15), date(2024, 6, 15)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let (_, svc) = service();
        let err = svc
            .update(5, draft(1, date(2024, 6, 10), date(2024, 6, 15)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    // ── cancel ──

    #[tokio::test]
    async fn cancel_pending_marks_cancelled() {
        let (_, svc) = service();
        let id = svc
            .create(draft(1, date(2024, 6, 10), date(2024, 6, 15)))
            .await
            .unwrap()
            .id
            .unwrap();
        svc.cancel(id).await.unwrap();
        assert_eq!(
            svc.get_by_id(id).await.unwrap().status,
            ReservationStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn cancel_approved_or_cancelled_asks_for_manager() {
        let (store, svc) = service();
        for status in [ReservationStatus::Approved, ReservationStatus::Cancelled] {
            let id = seed(&store, 1, date(2024, 6, 10), date(2024, 6, 15), status).await;
            match svc.cancel(id).await.unwrap_err() {
                DomainError::InvalidState(msg) => assert!(msg.contains("manager")),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn cancel_unknown_id_is_not_found() {
        let (_, svc) = service();
        let err = svc.cancel(1).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    // ── approve ──

    #[tokio::test]
    async fn approve_free_room_succeeds() {
        let (_, svc) = service();
        let id = svc
            .create(draft(1, date(2024, 6, 10), date(2024, 6, 15)))
            .await
            .unwrap()
            .id
            .unwrap();
        let approved = svc.approve(id).await.unwrap();
        assert_eq!(approved.status, ReservationStatus::Approved);
        assert_eq!(
            svc.get_by_id(id).await.unwrap().status,
            ReservationStatus::Approved
        );
    }

    #[tokio::test]
    async fn approve_is_blocked_by_overlapping_approval() {
        let (store, svc) = service();
        seed(&store, 1, date(2024, 6, 10), date(2024, 6, 15), ReservationStatus::Approved).await;
        let id = svc
            .create(draft(1, date(2024, 6, 14), date(2024, 6, 20)))
            .await
            .unwrap()
            .id
            .unwrap();

        let err = svc.approve(id).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
        assert_eq!(
            svc.get_by_id(id).await.unwrap().status,
            ReservationStatus::Pending
        );
    }

    #[tokio::test]
    async fn approve_adjacent_range_succeeds() {
        let (store, svc) = service();
        seed(&store, 1, date(2024, 6, 10), date(2024, 6, 15), ReservationStatus::Approved).await;
        let id = svc
            .create(draft(1, date(2024, 6, 15), date(2024, 6, 20)))
            .await
            .unwrap()
            .id
            .unwrap();
        assert!(svc.approve(id).await.is_ok());
    }

    #[tokio::test]
    async fn approve_range_ending_on_existing_start_is_blocked() {
        let (store, svc) = service();
        seed(&store, 1, date(2024, 6, 10), date(2024, 6, 15), ReservationStatus::Approved).await;
        let id = svc
            .create(draft(1, date(2024, 6, 1), date(2024, 6, 10)))
            .await
            .unwrap()
            .id
            .unwrap();
        assert!(matches!(
            svc.approve(id).await,
            Err(DomainError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn approve_ignores_pending_and_cancelled_overlaps() {
        let (store, svc) = service();
        seed(&store, 1, date(2024, 6, 10), date(2024, 6, 15), ReservationStatus::Cancelled).await;
        seed(&store, 1, date(2024, 6, 10), date(2024, 6, 15), ReservationStatus::Pending).await;
        let id = svc
            .create(draft(1, date(2024, 6, 10), date(2024, 6, 15)))
            .await
            .unwrap()
            .id
            .unwrap();
        assert!(svc.approve(id).await.is_ok());
    }

    #[tokio::test]
    async fn approve_non_pending_is_invalid_state() {
        let (store, svc) = service();
        for status in [ReservationStatus::Approved, ReservationStatus::Cancelled] {
            let id = seed(&store, 5, date(2024, 6, 10), date(2024, 6, 15), status).await;
            assert!(matches!(
                svc.approve(id).await,
                Err(DomainError::InvalidState(_))
            ));
        }
    }

    #[tokio::test]
    async fn approve_unknown_id_is_not_found() {
        let (_, svc) = service();
        assert!(matches!(
            svc.approve(3).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_approvals_never_double_book() {
        let (_, svc) = service();
        let svc = Arc::new(svc);
        let mut ids = Vec::new();
        for _ in 0..8 {
            let id = svc
                .create(draft(1, date(2024, 6, 10), date(2024, 6, 15)))
                .await
                .unwrap()
                .id
                .unwrap();
            ids.push(id);
        }

        let handles: Vec<_> = ids
            .into_iter()
            .map(|id| {
                let svc = svc.clone();
                tokio::spawn(async move { svc.approve(id).await })
            })
            .collect();

        let mut approved = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                approved += 1;
            }
        }
        assert_eq!(approved, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_approvals_on_shared_sqlite_file_never_double_book() {
        use crate::infrastructure::database::migrator::Migrator;
        use crate::infrastructure::database::{init_database, DatabaseConfig};
        use crate::infrastructure::SeaOrmReservationRepository;
        use sea_orm_migration::MigratorTrait;

        let path = std::env::temp_dir().join(format!("reservations-{}.db", uuid::Uuid::new_v4()));
        let mut config = DatabaseConfig::sqlite(&path.to_string_lossy());
        config.pool.max_connections = 4;
        config.pool.min_connections = 1;
        let db = init_database(&config).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        // One service per simulated process: each has its own approval
        // lock, so only the storage transaction keeps them apart.
        let services: Vec<Arc<ReservationService<dyn ReservationStore>>> = (0..4)
            .map(|_| {
                let store: Arc<dyn ReservationStore> =
                    Arc::new(SeaOrmReservationRepository::new(db.clone()));
                Arc::new(ReservationService::new(
                    store.clone(),
                    AvailabilityChecker::new(store),
                ))
            })
            .collect();

        let mut ids = Vec::new();
        for _ in 0..8 {
            let id = services[0]
                .create(draft(1, date(2024, 6, 10), date(2024, 6, 15)))
                .await
                .unwrap()
                .id
                .unwrap();
            ids.push(id);
        }

        let handles: Vec<_> = ids
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                let svc = services[i % services.len()].clone();
                tokio::spawn(async move { svc.approve(id).await })
            })
            .collect();

        let mut committed = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                committed += 1;
            }
        }
        assert_eq!(committed, 1);

        let approved = services[0]
            .search(ReservationSearchFilter {
                room_id: Some(1),
                ..Default::default()
            })
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.status == ReservationStatus::Approved)
            .count();
        assert_eq!(approved, 1);

        db.close().await.unwrap();
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn lifecycle_on_sqlite_store() {
        use crate::infrastructure::database::migrator::Migrator;
        use crate::infrastructure::database::{init_database, DatabaseConfig};
        use crate::infrastructure::SeaOrmReservationRepository;
        use sea_orm_migration::MigratorTrait;

        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let store: Arc<dyn ReservationStore> = Arc::new(SeaOrmReservationRepository::new(db));
        let svc = ReservationService::new(store.clone(), AvailabilityChecker::new(store));

        let first = svc
            .create(draft(1, date(2024, 6, 10), date(2024, 6, 15)))
            .await
            .unwrap()
            .id
            .unwrap();
        let second = svc
            .create(draft(1, date(2024, 6, 12), date(2024, 6, 18)))
            .await
            .unwrap()
            .id
            .unwrap();

        svc.approve(first).await.unwrap();
        assert!(matches!(
            svc.approve(second).await,
            Err(DomainError::InvalidState(_))
        ));
        assert!(!svc
            .check_availability(1, date(2024, 6, 12), date(2024, 6, 18))
            .await
            .unwrap());

        svc.cancel(second).await.unwrap();
        assert!(matches!(
            svc.cancel(first).await,
            Err(DomainError::InvalidState(_))
        ));
        assert_eq!(
            svc.get_by_id(second).await.unwrap().status,
            ReservationStatus::Cancelled
        );
    }
}
