//! Persistence seam for users and bookings.
//!
//! Every booking mutation is a single conditional write keyed on
//! `id AND user_id`, so ownership is checked by the store itself.

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, User};
use crate::bookings::repo_types::{Booking, BookingChanges, NewBooking};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn insert_user(&self, user: NewUser) -> anyhow::Result<User>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn list_bookings(&self, owner: Uuid) -> anyhow::Result<Vec<Booking>>;
    async fn insert_booking(&self, booking: NewBooking) -> anyhow::Result<Booking>;

    /// Applies `changes` to the booking matching both `id` and `owner`.
    /// Returns `None` when no such booking exists.
    async fn update_booking(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: BookingChanges,
    ) -> anyhow::Result<Option<Booking>>;

    /// Deletes the booking matching both `id` and `owner`; `false` when
    /// nothing matched.
    async fn delete_booking(&self, id: Uuid, owner: Uuid) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait Store: UserStore + BookingStore {
    async fn ping(&self) -> anyhow::Result<()>;
}
