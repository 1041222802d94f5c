//! Typed endpoint surface of the marketplace API.
//!
//! [`MarketApi`] is the seam the orchestration layers depend on: the subset
//! of endpoints that listing and purchase flows drive. [`MarketClient`]
//! implements it over HTTP; tests implement it with an in-memory fake.
//! Credential-source endpoints (register/login) and the browse/read
//! endpoints live directly on [`MarketClient`] - orchestration never calls
//! them.

mod auth;
mod catalog;
mod market;
mod types;

pub use types::{
    AuthenticatedUser, Category, ImageUpload, Item, ItemEdit, ItemSummary, NewItem,
    RegisteredUser,
};

use async_trait::async_trait;
use bytes::Bytes;

use furima_core::{Credential, ItemId};

use crate::config::ClientConfig;
use crate::transport::{ApiError, Transport};

/// The marketplace operations driven by listing and purchase orchestration.
///
/// Every method maps to exactly one server call; sequencing and
/// compensation live in the orchestrators, not here. Methods that omit a
/// credential hit public endpoints.
#[async_trait]
pub trait MarketApi: Send + Sync {
    /// `GET /items/categories` - the full category list.
    async fn categories(&self) -> Result<Vec<Category>, ApiError>;

    /// `POST /categories` - create a category, returning it with its id.
    async fn create_category(
        &self,
        credential: &Credential,
        name: &str,
    ) -> Result<Category, ApiError>;

    /// `POST /items` - register a new item (multipart, includes the image).
    /// The item is created in `Initial` status.
    async fn create_item(
        &self,
        credential: &Credential,
        item: NewItem,
    ) -> Result<ItemId, ApiError>;

    /// `PUT /items/{id}` - update an existing item in place.
    async fn update_item(
        &self,
        credential: &Credential,
        item_id: ItemId,
        edit: ItemEdit,
    ) -> Result<ItemId, ApiError>;

    /// `POST /sell` - transition an owned `Initial` item to `OnSale`.
    async fn sell(&self, credential: &Credential, item_id: ItemId) -> Result<(), ApiError>;

    /// `GET /items/{id}` - full item detail.
    async fn item(&self, item_id: ItemId) -> Result<Item, ApiError>;

    /// `GET /items/{id}/image` - the stored image bytes.
    async fn item_image(&self, item_id: ItemId) -> Result<Bytes, ApiError>;

    /// `POST /purchase/{id}` - direct purchase by the credential's user.
    async fn purchase(&self, credential: &Credential, item_id: ItemId) -> Result<(), ApiError>;

    /// `POST /items/{id}/pass` - the in-person passcode; owner only.
    async fn item_passcode(
        &self,
        credential: &Credential,
        item_id: ItemId,
    ) -> Result<String, ApiError>;

    /// `POST /onsite-purchase/{id}/available` - whether the in-person
    /// purchase path is enabled for this item.
    async fn in_person_available(
        &self,
        credential: &Credential,
        item_id: ItemId,
    ) -> Result<bool, ApiError>;

    /// `POST /onsite-purchase/{id}` - finalize an in-person purchase with
    /// the passcode the owner handed over.
    async fn redeem_in_person(
        &self,
        credential: &Credential,
        item_id: ItemId,
        passcode: &str,
    ) -> Result<(), ApiError>;

    /// `POST /generate` - a suggested description for a draft item.
    async fn suggest_description(
        &self,
        credential: &Credential,
        item_name: &str,
        category_name: &str,
    ) -> Result<String, ApiError>;
}

/// HTTP client for the marketplace API.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct MarketClient {
    transport: Transport,
}

impl MarketClient {
    /// Create a client from configuration.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            transport: Transport::new(&config.base_url),
        }
    }

    pub(crate) const fn transport(&self) -> &Transport {
        &self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_client_is_clone_send_sync() {
        fn assert_clone<T: Clone>() {}
        fn assert_send_sync<T: Send + Sync>() {}
        assert_clone::<MarketClient>();
        assert_send_sync::<MarketClient>();
    }
}
