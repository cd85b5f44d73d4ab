use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime, Time};
use uuid::Uuid;

time::serde::format_description!(booking_date, Date, "[year]-[month]-[day]");
time::serde::format_description!(booking_time, Time, "[hour]:[minute]");

pub const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    time::macros::format_description!("[year]-[month]-[day]");
pub const TIME_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    time::macros::format_description!("[hour]:[minute]");

/// Booking record in the `bookings` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid, // owner, always taken from the verified token
    pub name: String,
    pub email: String,
    #[serde(with = "booking_date")]
    pub date: Date,
    #[serde(with = "booking_time")]
    pub time: Time,
    pub service: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub date: Date,
    pub time: Time,
    pub service: String,
}

/// Partial update. Identifier and owner are deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: Option<Date>,
    pub time: Option<Time>,
    pub service: Option<String>,
}

impl BookingChanges {
    pub fn apply(self, booking: &mut Booking) {
        if let Some(name) = self.name {
            booking.name = name;
        }
        if let Some(email) = self.email {
            booking.email = email;
        }
        if let Some(date) = self.date {
            booking.date = date;
        }
        if let Some(time) = self.time {
            booking.time = time;
        }
        if let Some(service) = self.service {
            booking.service = service;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, time};

    fn sample() -> Booking {
        Booking {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Alice".into(),
            email: "a@x.com".into(),
            date: date!(2024 - 05 - 01),
            time: time!(14:00),
            service: "Haircut".into(),
            created_at: datetime!(2024-04-30 10:00 UTC),
        }
    }

    #[test]
    fn booking_serializes_with_wire_names_and_formats() {
        let json = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(json["date"], "2024-05-01");
        assert_eq!(json["time"], "14:00");
        assert_eq!(json["createdAt"], "2024-04-30T10:00:00Z");
        assert!(json.get("userId").is_some());
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut booking = sample();
        let before = booking.clone();
        BookingChanges {
            service: Some("Shave".into()),
            ..Default::default()
        }
        .apply(&mut booking);
        assert_eq!(booking.service, "Shave");
        assert_eq!(booking.name, before.name);
        assert_eq!(booking.id, before.id);
        assert_eq!(booking.user_id, before.user_id);
    }
}
