//! Read-only browse commands.

use super::{CliError, client};

/// Print all categories.
pub async fn categories() -> Result<(), CliError> {
    use furima_client::MarketApi;

    let categories = client()?.categories().await?;
    if categories.is_empty() {
        tracing::info!("No categories yet");
    }
    for category in categories {
        tracing::info!("{:>4}  {}", category.id, category.name);
    }
    Ok(())
}

/// Print every item currently on sale.
pub async fn on_sale() -> Result<(), CliError> {
    let items = client()?.on_sale_items().await?;
    if items.is_empty() {
        tracing::info!("Nothing on sale right now");
    }
    for item in items {
        tracing::info!("{:>4}  {}  {}  [{}]", item.id, item.name, item.price, item.category_name);
    }
    Ok(())
}

/// Search on-sale items by keyword.
pub async fn search(keyword: &str) -> Result<(), CliError> {
    let items = client()?.search(keyword).await?;
    if items.is_empty() {
        tracing::info!("No items matched \"{keyword}\"");
    }
    for item in items {
        tracing::info!("{:>4}  {}  {}  [{}]", item.id, item.name, item.price, item.category_name);
    }
    Ok(())
}
