//! Purchase coordination: direct buy and in-person passcode redemption.
//!
//! The server owns the `OnSale -> SoldOut` transition and serializes
//! concurrent buyers; the client's obligation is to treat a rejection as
//! authoritative. A terminal rejection therefore triggers a resync - the
//! coordinator refetches the item and hands the fresh snapshot back so the
//! caller disables the purchase controls instead of retrying blindly.
//! Local status is never updated optimistically.

use bytes::Bytes;
use thiserror::Error;
use tracing::{instrument, warn};

use furima_core::{Credential, ItemId, ItemStatus};

use crate::api::{Item, MarketApi};
use crate::transport::ApiError;

/// Failures of a purchase attempt.
#[derive(Debug, Error)]
pub enum PurchaseError {
    /// The item is no longer purchasable. Terminal: the embedded snapshot
    /// (when the resync succeeded) carries the authoritative status.
    #[error("item is already sold")]
    AlreadySold { item: Option<Item> },

    /// The entered passcode was wrong. Retriable; the item is unchanged.
    #[error("passcode mismatch")]
    PasscodeMismatch,

    /// The server rejected the purchase for another precondition (own
    /// item, insufficient balance, in-person purchase disabled). Terminal.
    #[error("purchase rejected: {reason}")]
    Rejected { reason: String, item: Option<Item> },

    /// Transport-level failure; nothing is known about the item's state.
    #[error(transparent)]
    Api(#[from] ApiError),
}

enum Rejection {
    AlreadySold,
    PasscodeMismatch,
    Other(String),
}

/// Classify a server rejection by its status and message.
///
/// The server answers every purchase precondition failure with 412; the
/// message distinguishes the cases.
fn classify_rejection(status: u16, message: &str) -> Option<Rejection> {
    if status != 412 {
        return None;
    }
    let lower = message.to_ascii_lowercase();
    if lower.contains("not on sale") || lower.contains("sold") {
        Some(Rejection::AlreadySold)
    } else if lower.contains("invalid password") {
        Some(Rejection::PasscodeMismatch)
    } else {
        Some(Rejection::Other(message.to_owned()))
    }
}

/// The purchase affordance resolved for the current viewer.
///
/// Chosen once when the item view loads, based on ownership; it is not
/// re-evaluated reactively.
#[derive(Debug, Clone)]
pub enum PurchaseAccess {
    /// The viewer owns the item: they hold the passcode to hand out for an
    /// in-person sale, and cannot buy.
    Owner { passcode: String },
    /// The viewer is a potential buyer.
    Buyer { in_person_available: bool },
}

/// Everything the item detail view needs: the item, its image, and the
/// viewer's purchase affordance.
#[derive(Debug, Clone)]
pub struct ItemView {
    pub item: Item,
    pub image: Bytes,
    pub access: PurchaseAccess,
}

impl ItemView {
    /// Whether the viewer can attempt a purchase right now.
    #[must_use]
    pub const fn can_buy(&self) -> bool {
        matches!(self.access, PurchaseAccess::Buyer { .. })
            && matches!(self.item.status, ItemStatus::OnSale)
    }
}

/// Drives the purchase paths against the marketplace API.
#[derive(Debug, Clone)]
pub struct PurchaseCoordinator<A> {
    api: A,
}

impl<A: MarketApi> PurchaseCoordinator<A> {
    /// Create a coordinator over the given API.
    #[must_use]
    pub const fn new(api: A) -> Self {
        Self { api }
    }

    /// Load the item detail view: item and image fetch concurrently
    /// (independent reads), then the role-appropriate purchase affordance.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the reads fail.
    #[instrument(skip(self, credential))]
    pub async fn load_view(
        &self,
        credential: &Credential,
        item_id: ItemId,
    ) -> Result<ItemView, ApiError> {
        let (item, image) = tokio::join!(self.api.item(item_id), self.api.item_image(item_id));
        let item = item?;
        let image = image?;

        let access = if item.is_owned_by(credential) {
            PurchaseAccess::Owner {
                passcode: self.api.item_passcode(credential, item_id).await?,
            }
        } else {
            PurchaseAccess::Buyer {
                in_person_available: self.api.in_person_available(credential, item_id).await?,
            }
        };

        Ok(ItemView {
            item,
            image,
            access,
        })
    }

    /// Buy the item outright.
    ///
    /// On success the caller refreshes the item view; the server is the
    /// source of truth for the resulting status.
    ///
    /// # Errors
    ///
    /// Returns [`PurchaseError::AlreadySold`] (with a resynced snapshot)
    /// when the item was sold from under the viewer, and
    /// [`PurchaseError::Rejected`] for other server preconditions.
    #[instrument(skip(self, credential))]
    pub async fn buy_direct(
        &self,
        credential: &Credential,
        item_id: ItemId,
    ) -> Result<(), PurchaseError> {
        match self.api.purchase(credential, item_id).await {
            Ok(()) => Ok(()),
            Err(error) => Err(self.rejection(item_id, error).await),
        }
    }

    /// Finalize an in-person purchase with the passcode the owner handed
    /// over.
    ///
    /// # Errors
    ///
    /// Returns [`PurchaseError::PasscodeMismatch`] for a wrong code (safe
    /// to retry) and the terminal kinds otherwise.
    #[instrument(skip(self, credential, attempt))]
    pub async fn redeem_passcode(
        &self,
        credential: &Credential,
        item_id: ItemId,
        attempt: &str,
    ) -> Result<(), PurchaseError> {
        match self.api.redeem_in_person(credential, item_id, attempt).await {
            Ok(()) => Ok(()),
            Err(error) => Err(self.rejection(item_id, error).await),
        }
    }

    /// Map a failed purchase call to its [`PurchaseError`], resyncing the
    /// item for the terminal kinds.
    async fn rejection(&self, item_id: ItemId, error: ApiError) -> PurchaseError {
        let Some((status, message)) = error.server_rejection() else {
            return PurchaseError::Api(error);
        };

        match classify_rejection(status, message) {
            Some(Rejection::AlreadySold) => PurchaseError::AlreadySold {
                item: self.resync(item_id).await,
            },
            Some(Rejection::PasscodeMismatch) => PurchaseError::PasscodeMismatch,
            Some(Rejection::Other(reason)) => PurchaseError::Rejected {
                reason,
                item: self.resync(item_id).await,
            },
            None => PurchaseError::Api(error),
        }
    }

    /// Refetch the item after a terminal rejection. A failed resync is
    /// logged and reported as `None`; the original rejection still stands.
    async fn resync(&self, item_id: ItemId) -> Option<Item> {
        match self.api.item(item_id).await {
            Ok(item) => Some(item),
            Err(error) => {
                warn!(%item_id, %error, "resync after rejected purchase failed");
                None
            }
        }
    }
}
