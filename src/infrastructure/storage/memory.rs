//! In-memory reservation store

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::domain::reservation::{
    Reservation, ReservationRepository, ReservationStatus, ReservationStore,
    ReservationTransaction,
};
use crate::domain::{DomainError, DomainResult};

type Rows = BTreeMap<i64, Reservation>;

struct Shared {
    rows: RwLock<Rows>,
    next_id: AtomicI64,
    /// Held by open transactions and by writes outside a transaction.
    write_lock: Arc<Mutex<()>>,
}

/// In-memory storage for development and testing.
///
/// Transactions are serialized: each one holds the write lock until it is
/// committed or dropped, and works on a snapshot that replaces the live rows
/// on commit.
#[derive(Clone)]
pub struct InMemoryReservationStore {
    shared: Arc<Shared>,
}

impl InMemoryReservationStore {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                rows: RwLock::new(BTreeMap::new()),
                next_id: AtomicI64::new(1),
                write_lock: Arc::new(Mutex::new(())),
            }),
        }
    }

    /// Number of stored reservations
    pub async fn len(&self) -> usize {
        self.shared.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryReservationStore {
    fn default() -> Self {
        Self::new()
    }
}

pub struct InMemoryReservationTransaction {
    shared: Arc<Shared>,
    working: Mutex<Rows>,
    _guard: OwnedMutexGuard<()>,
}

// ── Row operations ──────────────────────────────────────────────

fn save_row(rows: &mut Rows, next_id: &AtomicI64, mut r: Reservation) -> DomainResult<Reservation> {
    match r.id {
        None => {
            let id = next_id.fetch_add(1, Ordering::SeqCst);
            r.id = Some(id);
            rows.insert(id, r.clone());
        }
        Some(id) => {
            let Some(slot) = rows.get_mut(&id) else {
                return Err(DomainError::reservation_not_found(id));
            };
            *slot = r.clone();
        }
    }
    Ok(r)
}

fn set_status_row(rows: &mut Rows, id: i64, status: ReservationStatus) -> DomainResult<()> {
    let Some(slot) = rows.get_mut(&id) else {
        return Err(DomainError::reservation_not_found(id));
    };
    slot.status = status;
    Ok(())
}

fn search_rows(
    rows: &Rows,
    room_id: Option<i64>,
    user_id: Option<i64>,
    page_size: u64,
    page_number: u64,
) -> Vec<Reservation> {
    let skip = usize::try_from(page_number.saturating_mul(page_size)).unwrap_or(usize::MAX);
    let take = usize::try_from(page_size).unwrap_or(usize::MAX);
    rows.values()
        .filter(|r| room_id.map_or(true, |room| r.room_id == room))
        .filter(|r| user_id.map_or(true, |user| r.user_id == user))
        .skip(skip)
        .take(take)
        .cloned()
        .collect()
}

fn conflict_ids(
    rows: &Rows,
    room_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: ReservationStatus,
) -> Vec<i64> {
    rows.values()
        .filter(|r| r.room_id == room_id && r.status == status)
        .filter(|r| r.start_date <= end_date && start_date < r.end_date)
        .filter_map(|r| r.id)
        .collect()
}

// ── ReservationRepository impls ─────────────────────────────────

#[async_trait]
impl ReservationRepository for InMemoryReservationStore {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Reservation>> {
        Ok(self.shared.rows.read().await.get(&id).cloned())
    }

    async fn save(&self, reservation: Reservation) -> DomainResult<Reservation> {
        let _write = self.shared.write_lock.lock().await;
        let mut rows = self.shared.rows.write().await;
        save_row(&mut rows, &self.shared.next_id, reservation)
    }

    async fn set_status(&self, id: i64, status: ReservationStatus) -> DomainResult<()> {
        let _write = self.shared.write_lock.lock().await;
        let mut rows = self.shared.rows.write().await;
        set_status_row(&mut rows, id, status)
    }

    async fn search(
        &self,
        room_id: Option<i64>,
        user_id: Option<i64>,
        page_size: u64,
        page_number: u64,
    ) -> DomainResult<Vec<Reservation>> {
        let rows = self.shared.rows.read().await;
        Ok(search_rows(&rows, room_id, user_id, page_size, page_number))
    }

    async fn find_conflict_ids(
        &self,
        room_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        status: ReservationStatus,
    ) -> DomainResult<Vec<i64>> {
        let rows = self.shared.rows.read().await;
        Ok(conflict_ids(&rows, room_id, start_date, end_date, status))
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationTransaction {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Reservation>> {
        Ok(self.working.lock().await.get(&id).cloned())
    }

    async fn save(&self, reservation: Reservation) -> DomainResult<Reservation> {
        let mut rows = self.working.lock().await;
        save_row(&mut rows, &self.shared.next_id, reservation)
    }

    async fn set_status(&self, id: i64, status: ReservationStatus) -> DomainResult<()> {
        let mut rows = self.working.lock().await;
        set_status_row(&mut rows, id, status)
    }

    async fn search(
        &self,
        room_id: Option<i64>,
        user_id: Option<i64>,
        page_size: u64,
        page_number: u64,
    ) -> DomainResult<Vec<Reservation>> {
        let rows = self.working.lock().await;
        Ok(search_rows(&rows, room_id, user_id, page_size, page_number))
    }

    async fn find_conflict_ids(
        &self,
        room_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        status: ReservationStatus,
    ) -> DomainResult<Vec<i64>> {
        let rows = self.working.lock().await;
        Ok(conflict_ids(&rows, room_id, start_date, end_date, status))
    }
}

#[async_trait]
impl ReservationTransaction for InMemoryReservationTransaction {
    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let InMemoryReservationTransaction {
            shared,
            working,
            _guard,
        } = *self;
        *shared.rows.write().await = working.into_inner();
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ReservationStore for InMemoryReservationStore {
    async fn begin(&self) -> DomainResult<Box<dyn ReservationTransaction>> {
        let guard = self.shared.write_lock.clone().lock_owned().await;
        let snapshot = self.shared.rows.read().await.clone();
        Ok(Box::new(InMemoryReservationTransaction {
            shared: self.shared.clone(),
            working: Mutex::new(snapshot),
            _guard: guard,
        }))
    }
}

// ── Tests ──────────────────────────────────────────────────────
