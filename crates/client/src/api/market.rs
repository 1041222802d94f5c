//! HTTP implementation of the [`MarketApi`] seam.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use furima_core::{Credential, ItemId};

use super::types::{Category, Item, ItemEdit, NewItem};
use super::{MarketApi, MarketClient};
use crate::transport::ApiError;

#[derive(Deserialize)]
struct ItemCreated {
    id: ItemId,
}

#[async_trait]
impl MarketApi for MarketClient {
    #[instrument(skip(self))]
    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.transport().get_json("/items/categories", None).await
    }

    #[instrument(skip(self, credential), fields(name = %name))]
    async fn create_category(
        &self,
        credential: &Credential,
        name: &str,
    ) -> Result<Category, ApiError> {
        #[derive(Serialize)]
        struct CreateCategoryRequest<'a> {
            name: &'a str,
        }

        self.transport()
            .post_json(
                "/categories",
                Some(credential),
                &CreateCategoryRequest { name },
            )
            .await
    }

    #[instrument(skip(self, credential, item), fields(name = %item.name))]
    async fn create_item(
        &self,
        credential: &Credential,
        item: NewItem,
    ) -> Result<ItemId, ApiError> {
        let created: ItemCreated = self
            .transport()
            .send_multipart(Method::POST, "/items", Some(credential), item.into_form())
            .await?;
        Ok(created.id)
    }

    #[instrument(skip(self, credential, edit), fields(item_id = %item_id))]
    async fn update_item(
        &self,
        credential: &Credential,
        item_id: ItemId,
        edit: ItemEdit,
    ) -> Result<ItemId, ApiError> {
        let path = format!("/items/{item_id}");
        let updated: ItemCreated = self
            .transport()
            .send_multipart(Method::PUT, &path, Some(credential), edit.into_form())
            .await?;
        Ok(updated.id)
    }

    #[instrument(skip(self, credential))]
    async fn sell(&self, credential: &Credential, item_id: ItemId) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct SellRequest {
            item_id: ItemId,
        }

        let _: serde_json::Value = self
            .transport()
            .post_json("/sell", Some(credential), &SellRequest { item_id })
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn item(&self, item_id: ItemId) -> Result<Item, ApiError> {
        let path = format!("/items/{item_id}");
        self.transport().get_json(&path, None).await
    }

    #[instrument(skip(self))]
    async fn item_image(&self, item_id: ItemId) -> Result<Bytes, ApiError> {
        let path = format!("/items/{item_id}/image");
        self.transport().get_bytes(&path, None).await
    }

    #[instrument(skip(self, credential))]
    async fn purchase(&self, credential: &Credential, item_id: ItemId) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct PurchaseRequest {
            user_id: furima_core::UserId,
        }

        let path = format!("/purchase/{item_id}");
        let _: serde_json::Value = self
            .transport()
            .post_json(
                &path,
                Some(credential),
                &PurchaseRequest {
                    user_id: credential.user_id(),
                },
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self, credential))]
    async fn item_passcode(
        &self,
        credential: &Credential,
        item_id: ItemId,
    ) -> Result<String, ApiError> {
        #[derive(Deserialize)]
        struct PasscodeResponse {
            password: String,
        }

        let path = format!("/items/{item_id}/pass");
        let response: PasscodeResponse = self
            .transport()
            .post_json(&path, Some(credential), &serde_json::json!({}))
            .await?;
        Ok(response.password)
    }

    #[instrument(skip(self, credential))]
    async fn in_person_available(
        &self,
        credential: &Credential,
        item_id: ItemId,
    ) -> Result<bool, ApiError> {
        #[derive(Deserialize)]
        struct AvailabilityResponse {
            #[serde(rename = "isAvailable")]
            is_available: bool,
        }

        let path = format!("/onsite-purchase/{item_id}/available");
        let response: AvailabilityResponse = self
            .transport()
            .post_json(&path, Some(credential), &serde_json::json!({}))
            .await?;
        Ok(response.is_available)
    }

    #[instrument(skip(self, credential, passcode))]
    async fn redeem_in_person(
        &self,
        credential: &Credential,
        item_id: ItemId,
        passcode: &str,
    ) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct RedeemRequest<'a> {
            password: &'a str,
        }

        let path = format!("/onsite-purchase/{item_id}");
        let _: serde_json::Value = self
            .transport()
            .post_json(&path, Some(credential), &RedeemRequest { password: passcode })
            .await?;
        Ok(())
    }

    #[instrument(skip(self, credential), fields(item_name = %item_name))]
    async fn suggest_description(
        &self,
        credential: &Credential,
        item_name: &str,
        category_name: &str,
    ) -> Result<String, ApiError> {
        #[derive(Serialize)]
        struct SuggestRequest<'a> {
            #[serde(rename = "itemName")]
            item_name: &'a str,
            #[serde(rename = "categoryName")]
            category_name: &'a str,
        }

        #[derive(Deserialize)]
        struct SuggestResponse {
            description: String,
        }

        let response: SuggestResponse = self
            .transport()
            .post_json(
                "/generate",
                Some(credential),
                &SuggestRequest {
                    item_name,
                    category_name,
                },
            )
            .await?;
        Ok(response.description)
    }
}
