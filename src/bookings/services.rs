use time::{Date, Time};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{CreateBookingRequest, DeleteBookingRequest, UpdateBookingRequest};
use super::repo_types::{Booking, BookingChanges, NewBooking, DATE_FORMAT, TIME_FORMAT};
use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::store::BookingStore;
use crate::validate::{missing_fields, non_blank};

fn parse_id(raw: Option<String>) -> AppResult<Uuid> {
    let raw = non_blank(raw).ok_or_else(|| AppError::Validation("Booking id required".into()))?;
    Uuid::parse_str(&raw).map_err(|_| AppError::Validation("Invalid booking id".into()))
}

fn parse_date(raw: &str) -> AppResult<Date> {
    Date::parse(raw, DATE_FORMAT)
        .map_err(|_| AppError::Validation(format!("Invalid date '{raw}', expected YYYY-MM-DD")))
}

fn parse_time(raw: &str) -> AppResult<Time> {
    Time::parse(raw, TIME_FORMAT)
        .map_err(|_| AppError::Validation(format!("Invalid time '{raw}', expected HH:MM")))
}

/// A field present in a PATCH body must still carry a value.
fn changed(field: &str, raw: Option<String>) -> AppResult<Option<String>> {
    match raw {
        None => Ok(None),
        Some(v) => non_blank(Some(v))
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("{field} must not be empty"))),
    }
}

#[instrument(skip(store, user), fields(user_id = %user.user_id))]
pub async fn list<S>(store: &S, user: &AuthUser) -> AppResult<Vec<Booking>>
where
    S: BookingStore + ?Sized,
{
    store
        .list_bookings(user.user_id)
        .await
        .map_err(AppError::Store)
}

#[instrument(skip(store, user, input), fields(user_id = %user.user_id))]
pub async fn create<S>(store: &S, user: &AuthUser, input: CreateBookingRequest) -> AppResult<Booking>
where
    S: BookingStore + ?Sized,
{
    let fields = (
        non_blank(input.name),
        non_blank(input.email),
        non_blank(input.date),
        non_blank(input.time),
        non_blank(input.service),
    );
    let (name, email, date, time, service) = match fields {
        (Some(n), Some(e), Some(d), Some(t), Some(s)) => (n, e, d, t, s),
        (n, e, d, t, s) => {
            return Err(missing_fields(&[
                ("name", n.is_some()),
                ("email", e.is_some()),
                ("date", d.is_some()),
                ("time", t.is_some()),
                ("service", s.is_some()),
            ]))
        }
    };

    let booking = store
        .insert_booking(NewBooking {
            user_id: user.user_id,
            name,
            email,
            date: parse_date(&date)?,
            time: parse_time(&time)?,
            service,
        })
        .await
        .map_err(AppError::Store)?;

    info!(booking_id = %booking.id, owner_email = %user.email, "booking created");
    Ok(booking)
}

#[instrument(skip(store, user, input), fields(user_id = %user.user_id))]
pub async fn update<S>(store: &S, user: &AuthUser, input: UpdateBookingRequest) -> AppResult<Booking>
where
    S: BookingStore + ?Sized,
{
    let id = parse_id(input.id)?;
    let changes = BookingChanges {
        name: changed("name", input.name)?,
        email: changed("email", input.email)?,
        date: changed("date", input.date)?
            .as_deref()
            .map(parse_date)
            .transpose()?,
        time: changed("time", input.time)?
            .as_deref()
            .map(parse_time)
            .transpose()?,
        service: changed("service", input.service)?,
    };

    match store
        .update_booking(id, user.user_id, changes)
        .await
        .map_err(AppError::Store)?
    {
        Some(booking) => {
            info!(booking_id = %booking.id, "booking updated");
            Ok(booking)
        }
        None => {
            warn!(booking_id = %id, "update matched no owned booking");
            Err(AppError::not_found_or_not_yours())
        }
    }
}

#[instrument(skip(store, user, input), fields(user_id = %user.user_id))]
pub async fn delete<S>(store: &S, user: &AuthUser, input: DeleteBookingRequest) -> AppResult<()>
where
    S: BookingStore + ?Sized,
{
    let id = parse_id(input.id)?;
    if !store
        .delete_booking(id, user.user_id)
        .await
        .map_err(AppError::Store)?
    {
        warn!(booking_id = %id, "delete matched no owned booking");
        return Err(AppError::not_found_or_not_yours());
    }
    info!(booking_id = %id, "booking deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use time::macros::{date, time};

    fn caller() -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            email: "a@x.com".into(),
        }
    }

    fn haircut() -> CreateBookingRequest {
        CreateBookingRequest {
            name: Some("Alice".into()),
            email: Some("a@x.com".into()),
            date: Some("2024-05-01".into()),
            time: Some("14:00".into()),
            service: Some("Haircut".into()),
        }
    }

    #[tokio::test]
    async fn create_assigns_owner_and_parses_fields() {
        let store = MemoryStore::new();
        let alice = caller();
        let booking = create(&store, &alice, haircut()).await.expect("create");
        assert_eq!(booking.user_id, alice.user_id);
        assert_eq!(booking.date, date!(2024 - 05 - 01));
        assert_eq!(booking.time, time!(14:00));
        assert_eq!(list(&store, &alice).await.unwrap(), vec![booking]);
    }

    #[tokio::test]
    async fn create_lists_missing_fields() {
        let store = MemoryStore::new();
        let input = CreateBookingRequest {
            date: None,
            service: Some(" ".into()),
            ..haircut()
        };
        match create(&store, &caller(), input).await.unwrap_err() {
            AppError::Validation(msg) => {
                assert!(msg.contains("date"));
                assert!(msg.contains("service"));
                assert!(!msg.contains("name"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.operation_count(), 0);
    }

    #[tokio::test]
    async fn create_rejects_malformed_date_and_time() {
        let store = MemoryStore::new();
        let bad_date = CreateBookingRequest {
            date: Some("01/05/2024".into()),
            ..haircut()
        };
        assert!(matches!(
            create(&store, &caller(), bad_date).await,
            Err(AppError::Validation(_))
        ));
        let bad_time = CreateBookingRequest {
            time: Some("25:00".into()),
            ..haircut()
        };
        assert!(matches!(
            create(&store, &caller(), bad_time).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn other_users_cannot_see_or_touch_a_booking() {
        let store = MemoryStore::new();
        let alice = caller();
        let bob = caller();
        let booking = create(&store, &alice, haircut()).await.unwrap();

        assert!(list(&store, &bob).await.unwrap().is_empty());

        let err = update(
            &store,
            &bob,
            UpdateBookingRequest {
                id: Some(booking.id.to_string()),
                service: Some("Shave".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = delete(
            &store,
            &bob,
            DeleteBookingRequest {
                id: Some(booking.id.to_string()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        assert_eq!(list(&store, &alice).await.unwrap(), vec![booking]);
    }

    #[tokio::test]
    async fn missing_and_foreign_ids_share_one_error() {
        let store = MemoryStore::new();
        let alice = caller();
        let bob = caller();
        let booking = create(&store, &alice, haircut()).await.unwrap();

        let foreign = delete(
            &store,
            &bob,
            DeleteBookingRequest {
                id: Some(booking.id.to_string()),
            },
        )
        .await
        .unwrap_err();
        let absent = delete(
            &store,
            &bob,
            DeleteBookingRequest {
                id: Some(Uuid::new_v4().to_string()),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(foreign.to_string(), absent.to_string());
        assert_eq!(foreign.status(), absent.status());
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let store = MemoryStore::new();
        let alice = caller();
        let booking = create(&store, &alice, haircut()).await.unwrap();

        let updated = update(
            &store,
            &alice,
            UpdateBookingRequest {
                id: Some(booking.id.to_string()),
                time: Some("15:30".into()),
                ..Default::default()
            },
        )
        .await
        .expect("update");
        assert_eq!(updated.id, booking.id);
        assert_eq!(updated.user_id, alice.user_id);
        assert_eq!(updated.time, time!(15:30));
        assert_eq!(updated.service, "Haircut");
    }

    #[tokio::test]
    async fn update_validates_id_and_values() {
        let store = MemoryStore::new();
        let alice = caller();

        let missing = update(&store, &alice, UpdateBookingRequest::default()).await;
        assert!(matches!(missing, Err(AppError::Validation(_))));

        let malformed = update(
            &store,
            &alice,
            UpdateBookingRequest {
                id: Some("not-an-id".into()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(malformed, Err(AppError::Validation(_))));

        let blank = update(
            &store,
            &alice,
            UpdateBookingRequest {
                id: Some(Uuid::new_v4().to_string()),
                name: Some("".into()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(blank, Err(AppError::Validation(_))));
        assert_eq!(store.operation_count(), 0);
    }

    #[tokio::test]
    async fn delete_then_list_is_empty() {
        let store = MemoryStore::new();
        let alice = caller();
        let booking = create(&store, &alice, haircut()).await.unwrap();
        delete(
            &store,
            &alice,
            DeleteBookingRequest {
                id: Some(booking.id.to_string()),
            },
        )
        .await
        .expect("delete");
        assert!(list(&store, &alice).await.unwrap().is_empty());

        let again = delete(
            &store,
            &alice,
            DeleteBookingRequest {
                id: Some(booking.id.to_string()),
            },
        )
        .await;
        assert!(matches!(again, Err(AppError::NotFound(_))));
    }
}
