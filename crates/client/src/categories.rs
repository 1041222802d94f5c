//! Category lookup and on-demand creation.
//!
//! Keeps the category list in a short-TTL cache and answers name lookups
//! against it case-insensitively, so a "new" category that merely differs in
//! case from an existing one is reused instead of duplicated.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use furima_core::{CategoryId, Credential};

use crate::api::{Category, MarketApi};
use crate::transport::ApiError;

/// How long a fetched category list is trusted before refetching.
const CATEGORY_TTL: Duration = Duration::from_secs(300);

/// The user's category choice on a draft listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySelection {
    /// An already-existing category picked from the list.
    Existing(CategoryId),
    /// A free-text name for a category that may not exist yet.
    New(String),
}

/// Cached view of the server's category list.
#[derive(Clone)]
pub struct CategoryDirectory<A> {
    api: A,
    cache: Cache<(), Arc<Vec<Category>>>,
}

impl<A: MarketApi> CategoryDirectory<A> {
    /// Create a directory over the given API.
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(CATEGORY_TTL)
                .build(),
        }
    }

    /// The category list, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the list must be fetched and the request fails.
    pub async fn all(&self) -> Result<Arc<Vec<Category>>, ApiError> {
        if let Some(cached) = self.cache.get(&()).await {
            debug!("category cache hit");
            return Ok(cached);
        }

        let fetched = Arc::new(self.api.categories().await?);
        self.cache.insert((), Arc::clone(&fetched)).await;
        Ok(fetched)
    }

    /// Find a category by name, case-insensitively, against the cached list.
    ///
    /// # Errors
    ///
    /// Returns an error if the list must be fetched and the request fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Category>, ApiError> {
        let categories = self.all().await?;
        Ok(categories.iter().find(|c| c.name_matches(name)).cloned())
    }

    /// Drop the cached list so the next read refetches.
    pub async fn refresh(&self) {
        self.cache.invalidate(&()).await;
    }

    /// Guarantee a valid category id for the given selection, creating a
    /// category only when the name is genuinely new.
    ///
    /// An existing id is returned unchanged with no network call. A new name
    /// is first matched case-insensitively against the cached list - a hit
    /// reuses the existing id, which keeps a race between concurrent typing
    /// and list refreshes from minting duplicates.
    ///
    /// # Errors
    ///
    /// Returns an error if the category list cannot be fetched or the
    /// create call fails; nothing has been persisted by the caller at that
    /// point.
    #[instrument(skip(self, credential))]
    pub async fn resolve(
        &self,
        credential: &Credential,
        selection: &CategorySelection,
    ) -> Result<CategoryId, ApiError> {
        match selection {
            CategorySelection::Existing(id) => Ok(*id),
            CategorySelection::New(name) => {
                if let Some(existing) = self.find_by_name(name).await? {
                    debug!(category_id = %existing.id, "reusing existing category");
                    return Ok(existing.id);
                }

                let created = self.api.create_category(credential, name).await?;
                debug!(category_id = %created.id, "created category");

                // Fold the new category into the cached list so an
                // immediate re-resolve sees it without a refetch.
                if let Some(cached) = self.cache.get(&()).await {
                    let mut list = (*cached).clone();
                    list.push(created.clone());
                    self.cache.insert((), Arc::new(list)).await;
                }

                Ok(created.id)
            }
        }
    }
}

impl<A> std::fmt::Debug for CategoryDirectory<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryDirectory").finish_non_exhaustive()
    }
}
