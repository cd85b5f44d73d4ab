use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BookingStore, Store, UserStore};
use crate::auth::repo_types::{NewUser, User};
use crate::bookings::repo_types::{Booking, BookingChanges, NewBooking};

/// In-process store used by tests and `STORE=memory` development runs.
///
/// Like the Postgres schema it enforces no uniqueness on email.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<Vec<User>>>,
    bookings: Arc<RwLock<Vec<Booking>>>,
    operations: Arc<AtomicUsize>,
    unreachable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store calls served so far.
    #[cfg(test)]
    pub fn operation_count(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    /// Makes every following `ping` fail, as if the database went away.
    #[cfg(test)]
    pub fn go_offline(&self) {
        self.unreachable.store(true, Ordering::SeqCst);
    }

    fn touch(&self) {
        self.operations.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        self.touch();
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> anyhow::Result<User> {
        self.touch();
        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        self.users.write().await.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn list_bookings(&self, owner: Uuid) -> anyhow::Result<Vec<Booking>> {
        self.touch();
        let bookings = self.bookings.read().await;
        Ok(bookings
            .iter()
            .filter(|b| b.user_id == owner)
            .cloned()
            .collect())
    }

    async fn insert_booking(&self, booking: NewBooking) -> anyhow::Result<Booking> {
        self.touch();
        let booking = Booking {
            id: Uuid::new_v4(),
            user_id: booking.user_id,
            name: booking.name,
            email: booking.email,
            date: booking.date,
            time: booking.time,
            service: booking.service,
            created_at: OffsetDateTime::now_utc(),
        };
        self.bookings.write().await.push(booking.clone());
        Ok(booking)
    }

    async fn update_booking(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: BookingChanges,
    ) -> anyhow::Result<Option<Booking>> {
        self.touch();
        let mut bookings = self.bookings.write().await;
        let Some(booking) = bookings
            .iter_mut()
            .find(|b| b.id == id && b.user_id == owner)
        else {
            return Ok(None);
        };
        changes.apply(booking);
        Ok(Some(booking.clone()))
    }

    async fn delete_booking(&self, id: Uuid, owner: Uuid) -> anyhow::Result<bool> {
        self.touch();
        let mut bookings = self.bookings.write().await;
        let before = bookings.len();
        bookings.retain(|b| !(b.id == id && b.user_id == owner));
        Ok(bookings.len() < before)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> anyhow::Result<()> {
        self.touch();
        if self.unreachable.load(Ordering::SeqCst) {
            anyhow::bail!("memory store is offline");
        }
        Ok(())
    }
}
