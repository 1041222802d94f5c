//! Best-effort description suggestions.
//!
//! The suggestion endpoint is an enrichment, never a dependency: a failure
//! here must not block a listing, and the suggested text is only offered to
//! the user - it is never applied to a draft automatically.

use tracing::{instrument, warn};

use furima_core::Credential;

use crate::api::MarketApi;
use crate::transport::ApiError;

/// Fetches suggested descriptions for draft listings.
#[derive(Debug, Clone)]
pub struct DescriptionAssist<A> {
    api: A,
}

impl<A: MarketApi> DescriptionAssist<A> {
    /// Create an assist over the given API.
    #[must_use]
    pub const fn new(api: A) -> Self {
        Self { api }
    }

    /// Request a suggested description for the draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; callers on the listing path
    /// should prefer [`try_suggest`](Self::try_suggest).
    #[instrument(skip(self, credential))]
    pub async fn suggest(
        &self,
        credential: &Credential,
        item_name: &str,
        category_name: &str,
    ) -> Result<String, ApiError> {
        self.api
            .suggest_description(credential, item_name, category_name)
            .await
    }

    /// Request a suggestion, swallowing any failure into a log event.
    ///
    /// Returns `None` when the suggestion could not be produced; the draft
    /// is untouched either way.
    pub async fn try_suggest(
        &self,
        credential: &Credential,
        item_name: &str,
        category_name: &str,
    ) -> Option<String> {
        match self.suggest(credential, item_name, category_name).await {
            Ok(text) => Some(text),
            Err(error) => {
                warn!(%error, "description suggestion failed");
                None
            }
        }
    }
}
