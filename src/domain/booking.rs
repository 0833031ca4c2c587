use crate::domain::error::DomainError;
use crate::domain::listing::{Listing, Price};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub place: String,
    pub user: String,
    #[serde(flatten)]
    pub stay: Stay,
}

/// Point-in-time snapshot of who stays, when, and at what price.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stay {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub number_of_guests: u32,
    pub name: String,
    pub phone: String,
    pub price: Price,
}

/// Booking request body. A `user` field sent by the client is not part of
/// the shape and is dropped during deserialization.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    pub place: String,
    #[serde(flatten)]
    pub stay: Stay,
}

impl CreateBooking {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.place.trim().is_empty() {
            return Err(DomainError::validation("place is required"));
        }
        if self.stay.name.trim().is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        if self.stay.phone.trim().is_empty() {
            return Err(DomainError::validation("phone is required"));
        }
        if self.stay.number_of_guests == 0 {
            return Err(DomainError::validation(
                "numberOfGuests must be at least 1",
            ));
        }
        if !self.stay.price.is_valid() {
            return Err(DomainError::validation("price must be a non-negative number"));
        }
        if self.stay.check_in >= self.stay.check_out {
            return Err(DomainError::validation("checkIn must precede checkOut"));
        }
        Ok(())
    }
}

/// A booking with its listing expanded in place of the bare id.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingWithPlace {
    pub id: String,
    pub place: Listing,
    pub user: String,
    #[serde(flatten)]
    pub stay: Stay,
}

impl BookingWithPlace {
    pub fn new(booking: Booking, place: Listing) -> Self {
        Self {
            id: booking.id,
            place,
            user: booking.user,
            stay: booking.stay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body() -> serde_json::Value {
        json!({
            "place": "l-1",
            "checkIn": "2024-01-01",
            "checkOut": "2024-01-03",
            "numberOfGuests": 2,
            "name": "Ann",
            "phone": "555",
            "price": 100
        })
    }

    #[test]
    fn test_parses_camel_case_body() {
        let req: CreateBooking = serde_json::from_value(body()).unwrap();
        assert_eq!(req.place, "l-1");
        assert_eq!(req.stay.check_in, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(req.stay.number_of_guests, 2);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_client_supplied_user_is_ignored() {
        let mut value = body();
        value["user"] = json!("someone-else");
        let req: CreateBooking = serde_json::from_value(value).unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("user").is_none());
    }

    #[test]
    fn test_missing_phone_is_rejected_by_shape() {
        let mut value = body();
        value.as_object_mut().unwrap().remove("phone");
        assert!(serde_json::from_value::<CreateBooking>(value).is_err());
    }

    #[test]
    fn test_malformed_date_is_rejected_by_shape() {
        let mut value = body();
        value["checkIn"] = json!("first of january");
        assert!(serde_json::from_value::<CreateBooking>(value).is_err());
    }

    #[test]
    fn test_check_out_must_follow_check_in() {
        let mut value = body();
        value["checkOut"] = json!("2024-01-01");
        let req: CreateBooking = serde_json::from_value(value).unwrap();
        let err = req.validate().unwrap_err();
        assert_eq!(err.to_string(), "Validation error: checkIn must precede checkOut");
    }

    #[test]
    fn test_fractional_price_is_kept() {
        let mut value = body();
        value["price"] = json!(99.5);
        let req: CreateBooking = serde_json::from_value(value).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.stay.price, Price::new(99.5));
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let mut value = body();
        value["price"] = json!(-5);
        let req: CreateBooking = serde_json::from_value(value).unwrap();
        assert!(matches!(req.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_zero_guests_and_blank_name_are_rejected() {
        let mut value = body();
        value["numberOfGuests"] = json!(0);
        let req: CreateBooking = serde_json::from_value(value).unwrap();
        assert!(matches!(req.validate(), Err(DomainError::Validation(_))));

        let mut value = body();
        value["name"] = json!("  ");
        let req: CreateBooking = serde_json::from_value(value).unwrap();
        assert!(matches!(req.validate(), Err(DomainError::Validation(_))));
    }
}
