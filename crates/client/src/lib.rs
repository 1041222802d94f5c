//! Furima Client - marketplace API client and orchestration core.
//!
//! This crate drives the two multi-step flows of the marketplace:
//!
//! - **Listing**: [`ListingOrchestrator`] turns a [`DraftListing`] into a
//!   persisted, on-sale item - resolving or creating its category first,
//!   then submitting the multipart item payload, then issuing the on-sale
//!   transition. Partial failures surface distinctly so callers know what
//!   already exists server-side and which step to retry.
//! - **Purchase**: [`PurchaseCoordinator`] runs the direct-buy and
//!   in-person passcode paths against the item's authoritative status,
//!   resyncing from the server whenever a purchase is rejected.
//!
//! Both flows sit on [`MarketApi`], the typed endpoint seam implemented
//! over HTTP by [`MarketClient`] and by in-memory fakes in tests. The
//! transport layer decodes every response at the boundary; no endpoint
//! shape leaks past it untyped.
//!
//! # Example
//!
//! ```rust,no_run
//! use furima_client::{ClientConfig, DraftListing, ListingOrchestrator, MarketClient};
//! use furima_client::{CategorySelection, ImageUpload};
//!
//! # async fn example(credential: furima_core::Credential) -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let client = MarketClient::new(&config);
//! let orchestrator = ListingOrchestrator::new(client);
//!
//! let draft = DraftListing {
//!     name: "Chair".to_owned(),
//!     category: CategorySelection::New("Furniture".to_owned()),
//!     price: 1000,
//!     description: "A sturdy chair".to_owned(),
//!     image: Some(ImageUpload {
//!         file_name: "chair.jpg".to_owned(),
//!         content: bytes::Bytes::from_static(b"..."),
//!     }),
//!     passcode: None,
//! };
//!
//! let outcome = orchestrator.submit(&credential, draft, None).await?;
//! println!("listed item {}", outcome.item_id());
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod assist;
pub mod categories;
pub mod config;
pub mod listing;
pub mod purchase;
pub mod transport;

pub use api::{
    AuthenticatedUser, Category, ImageUpload, Item, ItemEdit, ItemSummary, MarketApi,
    MarketClient, NewItem, RegisteredUser,
};
pub use assist::DescriptionAssist;
pub use categories::{CategoryDirectory, CategorySelection};
pub use config::{ClientConfig, ConfigError};
pub use listing::{
    DraftListing, ListingError, ListingOrchestrator, ListingOutcome, ValidationError,
};
pub use purchase::{ItemView, PurchaseAccess, PurchaseCoordinator, PurchaseError};
pub use transport::{ApiError, Transport};
