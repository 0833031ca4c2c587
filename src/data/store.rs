//! Process-wide document store.
//!
//! The store is opened once before the server starts serving and closed after
//! it stops. When a snapshot path is configured, the collections are loaded
//! from it on open and written back on close. Writes are durable only after a
//! clean shutdown; a crash loses everything since the last open.

use crate::data::booking_repository::InMemoryBookingRepository;
use crate::data::listing_repository::InMemoryListingRepository;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::booking::Booking;
use crate::domain::listing::Listing;
use crate::domain::user::User;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    listings: Vec<Listing>,
    #[serde(default)]
    bookings: Vec<Booking>,
}

pub struct InMemoryStore {
    pub users: Arc<InMemoryUserRepository>,
    pub listings: Arc<InMemoryListingRepository>,
    pub bookings: Arc<InMemoryBookingRepository>,
    snapshot_path: Option<PathBuf>,
}

impl InMemoryStore {
    /// An empty store with no snapshot file.
    pub fn ephemeral() -> Self {
        Self::from_snapshot(Snapshot::default(), None)
    }

    #[instrument]
    pub async fn open(snapshot_path: Option<PathBuf>) -> Result<Self> {
        let snapshot = match &snapshot_path {
            Some(path) => read_snapshot(path).await?,
            None => Snapshot::default(),
        };
        info!(
            users = snapshot.users.len(),
            listings = snapshot.listings.len(),
            bookings = snapshot.bookings.len(),
            "Store opened"
        );
        Ok(Self::from_snapshot(snapshot, snapshot_path))
    }

    fn from_snapshot(snapshot: Snapshot, snapshot_path: Option<PathBuf>) -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::from_users(snapshot.users)),
            listings: Arc::new(InMemoryListingRepository::from_listings(snapshot.listings)),
            bookings: Arc::new(InMemoryBookingRepository::from_bookings(snapshot.bookings)),
            snapshot_path,
        }
    }

    #[instrument(skip(self))]
    pub async fn close(&self) -> Result<()> {
        let Some(path) = &self.snapshot_path else {
            info!("Store closed");
            return Ok(());
        };
        let snapshot = Snapshot {
            users: self.users.snapshot().await,
            listings: self.listings.snapshot().await,
            bookings: self.bookings.snapshot().await,
        };
        write_snapshot(path, &snapshot).await?;
        info!(path = %path.display(), "Store snapshot written, store closed");
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

// Write beside the target then rename, so a crash mid-write never leaves a
// truncated snapshot at `path`.
async fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(snapshot)?;
    let tmp = temp_path(path);
    tokio::fs::write(&tmp, bytes)
        .await
        .with_context(|| format!("failed to write store snapshot to {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("failed to move store snapshot into {}", path.display()))?;
    Ok(())
}

async fn read_snapshot(path: &Path) -> Result<Snapshot> {
    if !tokio::fs::try_exists(path).await? {
        return Ok(Snapshot::default());
    }
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read store snapshot {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("store snapshot {} is not valid JSON", path.display()))
}
