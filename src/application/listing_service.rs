use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::domain::listing::{Listing, ListingDetails};
use crate::domain::repository::{ListingRepository, UserRepository};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub struct ListingService<L: ListingRepository, U: UserRepository> {
    repository: Arc<L>,
    auth_service: Arc<AuthService<U>>,
}

impl<L: ListingRepository, U: UserRepository> ListingService<L, U> {
    pub fn new(repository: Arc<L>, auth_service: Arc<AuthService<U>>) -> Self {
        Self {
            repository,
            auth_service,
        }
    }

    #[instrument(skip(self, details), fields(title = %details.title))]
    pub async fn create_listing(&self, owner: &str, details: ListingDetails) -> Result<Listing> {
        details.validate()?;
        self.auth_service.ensure_user_exists(owner).await?;

        let listing = Listing {
            id: Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            details,
        };
        self.repository.create_listing(listing.clone()).await?;

        info!(listing_id = %listing.id, "Listing created");
        Ok(listing)
    }

    /// Replaces the listing's details when `caller` owns it. Unknown ids and
    /// listings owned by someone else both come back as `NotFound`.
    #[instrument(skip(self, details))]
    pub async fn update_listing(
        &self,
        caller: &str,
        id: &str,
        details: ListingDetails,
    ) -> Result<Listing> {
        details.validate()?;

        match self
            .repository
            .update_owned_listing(id, caller, details)
            .await?
        {
            Some(listing) => {
                info!(listing_id = %listing.id, "Listing updated");
                Ok(listing)
            }
            None => {
                warn!(listing_id = id, "No listing matched id and owner, nothing updated");
                Err(DomainError::NotFound(format!("Listing not found: {}", id)).into())
            }
        }
    }

    pub async fn get_listing(&self, id: &str) -> Result<Listing> {
        self.repository
            .find_listing_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Listing not found: {}", id)).into())
    }

    pub async fn list_listings(&self) -> Result<Vec<Listing>> {
        self.repository.list_listings().await
    }

    pub async fn list_owned_listings(&self, owner: &str) -> Result<Vec<Listing>> {
        self.repository.list_listings_by_owner(owner).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::listing_repository::InMemoryListingRepository;
    use crate::data::user_repository::InMemoryUserRepository;
    use crate::domain::listing::Price;
    use crate::domain::user::CreateUser;

    struct Fixture {
        service: ListingService<InMemoryListingRepository, InMemoryUserRepository>,
        ann: String,
        bob: String,
    }

    async fn fixture() -> Fixture {
        let auth = Arc::new(AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            "secret".to_string(),
            3600,
        ));
        let mut ids = Vec::new();
        for name in ["ann", "bob"] {
            let user = auth
                .register_user(CreateUser {
                    name: name.to_string(),
                    email: format!("{}@x.com", name),
                    password: "pw".to_string(),
                })
                .await
                .unwrap();
            ids.push(user.id);
        }
        let bob = ids.pop().unwrap();
        let ann = ids.pop().unwrap();
        Fixture {
            service: ListingService::new(Arc::new(InMemoryListingRepository::new()), auth),
            ann,
            bob,
        }
    }

    fn details(title: &str, price: f64) -> ListingDetails {
        ListingDetails {
            title: title.to_string(),
            description: "Quiet".to_string(),
            photos: Vec::new(),
            address: "1 Lake Rd".to_string(),
            perks: Vec::new(),
            extra_info: String::new(),
            check_in: "14:00".to_string(),
            check_out: "11:00".to_string(),
            max_guests: 4,
            price: Price::new(price),
        }
    }

    #[tokio::test]
    async fn test_create_sets_owner_to_caller() {
        let f = fixture().await;
        let listing = f
            .service
            .create_listing(&f.ann, details("Cabin", 100.0))
            .await
            .unwrap();
        assert_eq!(listing.owner, f.ann);
        assert_eq!(f.service.get_listing(&listing.id).await.unwrap(), listing);
    }

    #[tokio::test]
    async fn test_create_for_unknown_owner_is_unauthorized() {
        let f = fixture().await;
        let err = f
            .service
            .create_listing("ghost", details("Cabin", 100.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_stranger_update_leaves_listing_unchanged() {
        let f = fixture().await;
        let listing = f
            .service
            .create_listing(&f.ann, details("Cabin", 100.0))
            .await
            .unwrap();

        let err = f
            .service
            .update_listing(&f.bob, &listing.id, details("Bob's now", 1.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::NotFound(_))
        ));
        assert_eq!(f.service.get_listing(&listing.id).await.unwrap(), listing);
    }

    #[tokio::test]
    async fn test_owner_update_replaces_details() {
        let f = fixture().await;
        let listing = f
            .service
            .create_listing(&f.ann, details("Cabin", 100.0))
            .await
            .unwrap();

        let updated = f
            .service
            .update_listing(&f.ann, &listing.id, details("Lodge", 150.0))
            .await
            .unwrap();
        assert_eq!(updated.id, listing.id);
        assert_eq!(updated.details.title, "Lodge");
        assert_eq!(updated.details.price, Price::new(150.0));
    }

    #[tokio::test]
    async fn test_get_unknown_listing_is_not_found() {
        let f = fixture().await;
        let err = f.service.get_listing("missing").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_owned_only_returns_callers_listings() {
        let f = fixture().await;
        f.service
            .create_listing(&f.ann, details("Cabin", 100.0))
            .await
            .unwrap();
        f.service
            .create_listing(&f.bob, details("Loft", 80.0))
            .await
            .unwrap();

        let mine = f.service.list_owned_listings(&f.ann).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].details.title, "Cabin");
        assert_eq!(f.service.list_listings().await.unwrap().len(), 2);
    }
}
