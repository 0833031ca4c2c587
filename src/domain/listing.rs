use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};

/// Nightly price. Fractional amounts are allowed.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> Self {
        Price(value)
    }

    pub fn inner(&self) -> f64 {
        self.0
    }

    /// Finite and not negative.
    pub fn is_valid(&self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub owner: String,
    #[serde(flatten)]
    pub details: ListingDetails,
}

/// The owner-editable part of a listing. Used as the create and update payload.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingDetails {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "addedPhotos")]
    pub photos: Vec<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default, alias = "amenities")]
    pub perks: Vec<String>,
    #[serde(default)]
    pub extra_info: String,
    #[serde(default)]
    pub check_in: String,
    #[serde(default)]
    pub check_out: String,
    pub max_guests: u32,
    pub price: Price,
}

impl ListingDetails {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("Title is required"));
        }
        if self.max_guests == 0 {
            return Err(DomainError::validation("maxGuests must be at least 1"));
        }
        if !self.price.is_valid() {
            return Err(DomainError::validation("price must be a non-negative number"));
        }
        if self.photos.iter().any(|p| p.trim().is_empty()) {
            return Err(DomainError::validation("Photo references must not be empty"));
        }
        Ok(())
    }
}
