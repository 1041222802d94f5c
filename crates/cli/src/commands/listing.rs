//! Listing commands: submit a draft, retry a half-finished listing, and
//! fetch description suggestions.

use bytes::Bytes;
use clap::Args;

use furima_client::{
    CategorySelection, DescriptionAssist, DraftListing, ImageUpload, ListingError,
    ListingOrchestrator, ListingOutcome,
};
use furima_core::{CategoryId, ItemId};

use super::{CliError, client, credential};

/// Arguments for `furima list`.
#[derive(Args)]
pub struct ListArgs {
    /// Item name
    #[arg(long)]
    pub name: String,

    /// Price in yen
    #[arg(long)]
    pub price: i64,

    /// Item description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Existing category id (mutually exclusive with --new-category)
    #[arg(long, conflicts_with = "new_category")]
    pub category_id: Option<i64>,

    /// Name for a category to create (or reuse, matched case-insensitively)
    #[arg(long)]
    pub new_category: Option<String>,

    /// Path to the item image (required unless --edit)
    #[arg(long)]
    pub image: Option<String>,

    /// Passcode enabling in-person purchase
    #[arg(long)]
    pub passcode: Option<String>,

    /// Update this existing item instead of creating a new one
    #[arg(long)]
    pub edit: Option<i64>,
}

fn read_image(path: &str) -> Result<ImageUpload, CliError> {
    let content = std::fs::read(path).map_err(|source| CliError::ReadFile {
        path: path.to_owned(),
        source,
    })?;

    let file_name = std::path::Path::new(path)
        .file_name()
        .map_or_else(|| "image".to_owned(), |n| n.to_string_lossy().into_owned());

    Ok(ImageUpload {
        file_name,
        content: Bytes::from(content),
    })
}

/// Submit a draft listing.
pub async fn submit(args: ListArgs) -> Result<(), CliError> {
    let category = match (args.category_id, args.new_category) {
        (Some(id), _) => CategorySelection::Existing(CategoryId::new(id)),
        (None, Some(name)) => CategorySelection::New(name),
        (None, None) => {
            return Err(CliError::InvalidArguments(
                "pass --category-id or --new-category".to_owned(),
            ));
        }
    };

    let image = args.image.as_deref().map(read_image).transpose()?;

    let draft = DraftListing {
        name: args.name,
        category,
        price: args.price,
        description: args.description,
        image,
        passcode: args.passcode,
    };

    let orchestrator = ListingOrchestrator::new(client()?);
    let editing = args.edit.map(ItemId::new);

    match orchestrator.submit(&credential()?, draft, editing).await {
        Ok(ListingOutcome::Created(item_id)) => {
            tracing::info!("Item {item_id} is now on sale");
            Ok(())
        }
        Ok(ListingOutcome::Updated(item_id)) => {
            tracing::info!("Item {item_id} updated");
            Ok(())
        }
        Err(error @ ListingError::ListingIncomplete { item_id, .. }) => {
            tracing::warn!("Item {item_id} was saved but is not yet on sale");
            tracing::warn!("Retry with: furima relist {item_id}");
            Err(error.into())
        }
        Err(error) => Err(error.into()),
    }
}

/// Retry the on-sale transition for a saved-but-unlisted item.
pub async fn relist(item_id: i64) -> Result<(), CliError> {
    let orchestrator = ListingOrchestrator::new(client()?);
    orchestrator
        .relist(&credential()?, ItemId::new(item_id))
        .await?;
    tracing::info!("Item {item_id} is now on sale");
    Ok(())
}

/// Print a suggested description for a draft item.
pub async fn suggest(name: &str, category: &str) -> Result<(), CliError> {
    let assist = DescriptionAssist::new(client()?);
    match assist.try_suggest(&credential()?, name, category).await {
        Some(text) => tracing::info!("Suggested description: {text}"),
        None => tracing::warn!("No suggestion available right now"),
    }
    Ok(())
}
