use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::{BookingStore, Store, UserStore};
use crate::auth::repo_types::{NewUser, User};
use crate::bookings::repo_types::{Booking, BookingChanges, NewBooking};

const BOOKING_COLUMNS: &str = r#"
    id, user_id, name, email,
    booking_date AS "date", booking_time AS "time",
    service, created_at
"#;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn insert_user(&self, user: NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .context("insert user")?;
        Ok(user)
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn list_bookings(&self, owner: Uuid) -> anyhow::Result<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .context("list bookings")?;
        Ok(rows)
    }

    async fn insert_booking(&self, booking: NewBooking) -> anyhow::Result<Booking> {
        let row = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (id, user_id, name, email, booking_date, booking_time, service)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(booking.user_id)
        .bind(&booking.name)
        .bind(&booking.email)
        .bind(booking.date)
        .bind(booking.time)
        .bind(&booking.service)
        .fetch_one(&self.pool)
        .await
        .context("insert booking")?;
        Ok(row)
    }

    async fn update_booking(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: BookingChanges,
    ) -> anyhow::Result<Option<Booking>> {
        let row = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings SET
                name         = COALESCE($3, name),
                email        = COALESCE($4, email),
                booking_date = COALESCE($5, booking_date),
                booking_time = COALESCE($6, booking_time),
                service      = COALESCE($7, service)
            WHERE id = $1 AND user_id = $2
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.date)
        .bind(changes.time)
        .bind(changes.service)
        .fetch_optional(&self.pool)
        .await
        .context("update booking")?;
        Ok(row)
    }

    async fn delete_booking(&self, id: Uuid, owner: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .context("delete booking")?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("ping database")?;
        Ok(())
    }
}
