use crate::domain::booking::Booking;
use crate::domain::repository::BookingRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Append-only booking log. Bookings are never updated or removed.
#[derive(Clone, Default)]
pub struct InMemoryBookingRepository {
    storage: Arc<RwLock<Vec<Booking>>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bookings(bookings: Vec<Booking>) -> Self {
        Self {
            storage: Arc::new(RwLock::new(bookings)),
        }
    }

    pub async fn snapshot(&self) -> Vec<Booking> {
        self.storage.read().await.clone()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    #[instrument(skip(self, booking), fields(booking_id = %booking.id, place = %booking.place, user = %booking.user))]
    async fn create_booking(&self, booking: Booking) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.push(booking);
        debug!(total = storage.len(), "Booking saved to memory storage");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_bookings_by_user(&self, user_id: &str) -> Result<Vec<Booking>> {
        let storage = self.storage.read().await;
        Ok(storage
            .iter()
            .filter(|b| b.user == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::Stay;
    use crate::domain::listing::Price;
    use chrono::NaiveDate;

    fn booking(id: &str, user: &str) -> Booking {
        Booking {
            id: id.to_string(),
            place: "l-1".to_string(),
            user: user.to_string(),
            stay: Stay {
                check_in: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                check_out: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                number_of_guests: 2,
                name: "Ann".to_string(),
                phone: "555".to_string(),
                price: Price::new(100.0),
            },
        }
    }

    #[tokio::test]
    async fn test_list_bookings_by_user_filters_other_users() {
        let repo = InMemoryBookingRepository::new();
        repo.create_booking(booking("b-1", "u-1")).await.unwrap();
        repo.create_booking(booking("b-2", "u-2")).await.unwrap();
        repo.create_booking(booking("b-3", "u-1")).await.unwrap();

        let mine: Vec<_> = repo
            .list_bookings_by_user("u-1")
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(mine, vec!["b-1", "b-3"]);
        assert!(repo.list_bookings_by_user("u-9").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_bookings_are_all_kept() {
        let repo = InMemoryBookingRepository::new();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let repo_clone = repo.clone();
                let b = booking(&format!("b-{}", i), "u-1");
                tokio::spawn(async move { repo_clone.create_booking(b).await })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
        assert_eq!(repo.snapshot().await.len(), 10);
    }
}
