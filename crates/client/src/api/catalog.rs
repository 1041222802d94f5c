//! Browse and account read endpoints.
//!
//! These feed the item list, search, and profile views; orchestration never
//! depends on them, so they live on [`MarketClient`] directly rather than
//! on the [`MarketApi`](super::MarketApi) seam.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use furima_core::{CategoryId, Credential, UserId};

use super::types::ItemSummary;
use super::MarketClient;
use crate::transport::ApiError;

impl MarketClient {
    /// `GET /items` - every item currently on sale.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn on_sale_items(&self) -> Result<Vec<ItemSummary>, ApiError> {
        self.transport().get_json("/items", None).await
    }

    /// `GET /search?name=...` - keyword search over on-sale items.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(keyword = %keyword))]
    pub async fn search(&self, keyword: &str) -> Result<Vec<ItemSummary>, ApiError> {
        let path = format!("/search?name={}", urlencoding::encode(keyword));
        self.transport().get_json(&path, None).await
    }

    /// `GET /categories/{id}/items` - on-sale items within one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn items_in_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<ItemSummary>, ApiError> {
        let path = format!("/categories/{category_id}/items");
        self.transport().get_json(&path, None).await
    }

    /// `GET /users/{id}/items` - the items a user has listed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, credential))]
    pub async fn user_items(
        &self,
        credential: &Credential,
        user_id: UserId,
    ) -> Result<Vec<ItemSummary>, ApiError> {
        let path = format!("/users/{user_id}/items");
        self.transport().get_json(&path, Some(credential)).await
    }

    /// `GET /balance` - the credential holder's balance in yen.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, credential))]
    pub async fn balance(&self, credential: &Credential) -> Result<i64, ApiError> {
        #[derive(Deserialize)]
        struct BalanceResponse {
            balance: i64,
        }

        let response: BalanceResponse = self
            .transport()
            .get_json("/balance", Some(credential))
            .await?;
        Ok(response.balance)
    }

    /// `POST /balance` - add funds to the credential holder's balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the amount is rejected.
    #[instrument(skip(self, credential))]
    pub async fn deposit(&self, credential: &Credential, amount: i64) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct DepositRequest {
            balance: i64,
        }

        let _: serde_json::Value = self
            .transport()
            .post_json("/balance", Some(credential), &DepositRequest { balance: amount })
            .await?;
        Ok(())
    }
}
