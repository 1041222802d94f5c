//! Listing orchestration: draft → persisted, marketplace-visible item.
//!
//! Publishing is a sequence of dependent remote calls, none of which are
//! transactional as a unit: resolve the category (creating one on demand),
//! persist the item with its image, then flip it to on-sale. Each step
//! surfaces its own failure kind so the caller knows what, if anything,
//! already exists on the server and which step is safe to retry.

use thiserror::Error;
use tracing::{debug, instrument};

use furima_core::{Credential, ItemId, Price};

use crate::api::{ImageUpload, ItemEdit, MarketApi, NewItem};
use crate::categories::{CategoryDirectory, CategorySelection};
use crate::transport::ApiError;

/// Pre-flight draft validation failures. These never reach the network.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("item name must not be empty")]
    EmptyName,
    #[error("price must be a positive amount")]
    NonPositivePrice,
    #[error("an image is required for a new listing")]
    MissingImage,
}

/// Failures of the listing flow, one kind per orchestration step.
#[derive(Debug, Error)]
pub enum ListingError {
    /// The draft failed local validation; no call was made.
    #[error("invalid draft: {0}")]
    Validation(#[from] ValidationError),

    /// Category lookup or creation failed; nothing was persisted.
    #[error("category creation failed: {0}")]
    CategoryCreation(#[source] ApiError),

    /// The item create/update call failed. A category created just before
    /// is left in place (see the module docs on compensation).
    #[error("item could not be saved: {0}")]
    ItemPersist(#[source] ApiError),

    /// The item exists but the on-sale transition failed: it is persisted
    /// in `Initial` status and not yet marketplace-visible. Retry with
    /// [`ListingOrchestrator::relist`] instead of resubmitting the draft.
    #[error("item {item_id} was saved but could not be listed for sale: {source}")]
    ListingIncomplete {
        item_id: ItemId,
        #[source]
        source: ApiError,
    },
}

/// A draft listing: the user-entered fields, untouched by the server.
///
/// Discarded after a successful submission; abandoning it mid-flight lets
/// any in-flight step finish or fail on its own.
#[derive(Debug)]
pub struct DraftListing {
    pub name: String,
    pub category: CategorySelection,
    /// Entered price in yen; validated positive before submission.
    pub price: i64,
    pub description: String,
    /// Required for a new listing; an edit without one keeps the stored
    /// image.
    pub image: Option<ImageUpload>,
    /// Passcode enabling in-person purchase, if the seller opted in.
    pub passcode: Option<String>,
}

/// What a successful submission produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingOutcome {
    /// A new item was created and listed for sale.
    Created(ItemId),
    /// An existing item was updated in place; its status is untouched.
    Updated(ItemId),
}

impl ListingOutcome {
    /// The affected item's id.
    #[must_use]
    pub const fn item_id(&self) -> ItemId {
        match self {
            Self::Created(id) | Self::Updated(id) => *id,
        }
    }
}

/// Validate the locally-checkable draft fields, yielding the typed price.
fn validate(draft: &DraftListing, is_new: bool) -> Result<Price, ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let price = Price::new(draft.price).map_err(|_| ValidationError::NonPositivePrice)?;
    if is_new && draft.image.is_none() {
        return Err(ValidationError::MissingImage);
    }
    Ok(price)
}

/// Drives the listing flow against the marketplace API.
#[derive(Debug, Clone)]
pub struct ListingOrchestrator<A> {
    api: A,
    categories: CategoryDirectory<A>,
}

impl<A: MarketApi + Clone> ListingOrchestrator<A> {
    /// Create an orchestrator with its own category directory.
    #[must_use]
    pub fn new(api: A) -> Self {
        let categories = CategoryDirectory::new(api.clone());
        Self { api, categories }
    }

    /// The category directory backing this orchestrator, for pre-filling
    /// the category picker.
    #[must_use]
    pub const fn categories(&self) -> &CategoryDirectory<A> {
        &self.categories
    }

    /// Submit a draft: create and list a new item, or update `editing` in
    /// place.
    ///
    /// Steps run strictly in order, each consuming the previous step's
    /// result: validate locally, resolve the category, persist the item,
    /// and - for new items only - issue the on-sale transition. An edit
    /// never re-triggers that transition, so an already-sold item stays
    /// sold and no "newly listed" notification fires.
    ///
    /// # Errors
    ///
    /// Each step fails with its own [`ListingError`] kind; see the enum for
    /// which retries are safe.
    #[instrument(skip(self, credential, draft), fields(name = %draft.name, editing = ?editing))]
    pub async fn submit(
        &self,
        credential: &Credential,
        draft: DraftListing,
        editing: Option<ItemId>,
    ) -> Result<ListingOutcome, ListingError> {
        let price = validate(&draft, editing.is_none())?;

        let category_id = self
            .categories
            .resolve(credential, &draft.category)
            .await
            .map_err(ListingError::CategoryCreation)?;

        match editing {
            Some(item_id) => {
                let edit = ItemEdit {
                    name: draft.name,
                    category_id,
                    price,
                    description: draft.description,
                    image: draft.image,
                    passcode: draft.passcode,
                };
                self.api
                    .update_item(credential, item_id, edit)
                    .await
                    .map_err(ListingError::ItemPersist)?;
                debug!(%item_id, "item updated");
                Ok(ListingOutcome::Updated(item_id))
            }
            None => {
                let image = draft.image.ok_or(ValidationError::MissingImage)?;
                let item = NewItem {
                    name: draft.name,
                    category_id,
                    price,
                    description: draft.description,
                    image,
                    passcode: draft.passcode,
                };

                // A category created during resolve is not rolled back if
                // this fails; the orphan is harmless and visible.
                let item_id = self
                    .api
                    .create_item(credential, item)
                    .await
                    .map_err(ListingError::ItemPersist)?;
                debug!(%item_id, "item created");

                self.api
                    .sell(credential, item_id)
                    .await
                    .map_err(|source| ListingError::ListingIncomplete { item_id, source })?;
                debug!(%item_id, "item listed for sale");
                Ok(ListingOutcome::Created(item_id))
            }
        }
    }

    /// Retry only the on-sale transition for an item whose submission ended
    /// in [`ListingError::ListingIncomplete`].
    ///
    /// # Errors
    ///
    /// Fails with [`ListingError::ListingIncomplete`] again if the
    /// transition is still rejected.
    #[instrument(skip(self, credential))]
    pub async fn relist(
        &self,
        credential: &Credential,
        item_id: ItemId,
    ) -> Result<(), ListingError> {
        self.api
            .sell(credential, item_id)
            .await
            .map_err(|source| ListingError::ListingIncomplete { item_id, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use furima_core::CategoryId;

    fn draft() -> DraftListing {
        DraftListing {
            name: "Chair".to_owned(),
            category: CategorySelection::Existing(CategoryId::new(7)),
            price: 1000,
            description: "A sturdy chair".to_owned(),
            image: Some(ImageUpload {
                file_name: "chair.jpg".to_owned(),
                content: Bytes::from_static(b"\xff\xd8\xff"),
            }),
            passcode: None,
        }
    }

    #[test]
    fn test_valid_draft_passes() {
        let price = validate(&draft(), true).expect("valid draft");
        assert_eq!(price.as_yen(), 1000);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut d = draft();
        d.name = "   ".to_owned();
        assert_eq!(validate(&d, true), Err(ValidationError::EmptyName));
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let mut d = draft();
        d.price = 0;
        assert_eq!(validate(&d, true), Err(ValidationError::NonPositivePrice));
        d.price = -5;
        assert_eq!(validate(&d, true), Err(ValidationError::NonPositivePrice));
    }

    #[test]
    fn test_missing_image_rejected_only_for_new_items() {
        let mut d = draft();
        d.image = None;
        assert_eq!(validate(&d, true), Err(ValidationError::MissingImage));
        assert!(validate(&d, false).is_ok());
    }

    #[test]
    fn test_outcome_item_id() {
        assert_eq!(
            ListingOutcome::Created(ItemId::new(42)).item_id(),
            ItemId::new(42)
        );
        assert_eq!(
            ListingOutcome::Updated(ItemId::new(9)).item_id(),
            ItemId::new(9)
        );
    }
}
