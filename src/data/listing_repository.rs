use crate::domain::listing::{Listing, ListingDetails};
use crate::domain::repository::ListingRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

// Listings are never deleted, so row positions in `index` stay valid.
#[derive(Default)]
struct ListingTable {
    rows: Vec<Listing>,
    index: HashMap<String, usize>,
}

impl ListingTable {
    fn insert(&mut self, listing: Listing) {
        match self.index.get(&listing.id).copied() {
            Some(pos) => self.rows[pos] = listing,
            None => {
                self.index.insert(listing.id.clone(), self.rows.len());
                self.rows.push(listing);
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemoryListingRepository {
    storage: Arc<RwLock<ListingTable>>,
}

impl InMemoryListingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_listings(listings: Vec<Listing>) -> Self {
        let mut table = ListingTable::default();
        for listing in listings {
            table.insert(listing);
        }
        Self {
            storage: Arc::new(RwLock::new(table)),
        }
    }

    pub async fn snapshot(&self) -> Vec<Listing> {
        self.storage.read().await.rows.clone()
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    #[instrument(skip(self, listing), fields(listing_id = %listing.id, owner = %listing.owner))]
    async fn create_listing(&self, listing: Listing) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.insert(listing);
        debug!(total = storage.rows.len(), "Listing saved to memory storage");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_listing_by_id(&self, id: &str) -> Result<Option<Listing>> {
        let storage = self.storage.read().await;
        let listing = storage.index.get(id).map(|&pos| storage.rows[pos].clone());
        if listing.is_none() {
            trace!(listing_id = id, "Listing not found in storage");
        }
        Ok(listing)
    }

    #[instrument(skip(self, details))]
    async fn update_owned_listing(
        &self,
        id: &str,
        owner: &str,
        details: ListingDetails,
    ) -> Result<Option<Listing>> {
        let mut storage = self.storage.write().await;
        let Some(&pos) = storage.index.get(id) else {
            trace!(listing_id = id, "Listing not found in storage");
            return Ok(None);
        };
        let listing = &mut storage.rows[pos];
        if listing.owner != owner {
            debug!(listing_id = id, "Listing owner does not match, no update");
            return Ok(None);
        }
        listing.details = details;
        debug!(listing_id = id, "Listing updated in memory storage");
        Ok(Some(listing.clone()))
    }

    async fn list_listings(&self) -> Result<Vec<Listing>> {
        Ok(self.storage.read().await.rows.clone())
    }

    #[instrument(skip(self))]
    async fn list_listings_by_owner(&self, owner: &str) -> Result<Vec<Listing>> {
        let storage = self.storage.read().await;
        Ok(storage
            .rows
            .iter()
            .filter(|l| l.owner == owner)
            .cloned()
            .collect())
    }
}
