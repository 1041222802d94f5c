//! Purchase-side commands: view, buy, redeem, balance.

use furima_client::{PurchaseAccess, PurchaseCoordinator, PurchaseError};
use furima_core::ItemId;

use super::{CliError, client, credential};

/// Print an item's detail view the way the caller would see it.
pub async fn show(item_id: i64) -> Result<(), CliError> {
    let coordinator = PurchaseCoordinator::new(client()?);
    let view = coordinator
        .load_view(&credential()?, ItemId::new(item_id))
        .await?;

    let item = &view.item;
    tracing::info!("{} - {} [{}]", item.name, item.price, item.category_name);
    tracing::info!("Status: {}", item.status);
    tracing::info!("Seller: user {}", item.seller);
    if !item.description.is_empty() {
        tracing::info!("{}", item.description);
    }

    match &view.access {
        PurchaseAccess::Owner { passcode } => {
            if passcode.is_empty() {
                tracing::info!("You own this item; in-person purchase is off");
            } else {
                tracing::info!("You own this item; in-person passcode: {passcode}");
            }
        }
        PurchaseAccess::Buyer {
            in_person_available,
        } => {
            if view.can_buy() {
                tracing::info!("Buy with: furima buy {item_id}");
                if *in_person_available {
                    tracing::info!("In-person purchase available: furima redeem {item_id} -p <passcode>");
                }
            } else {
                tracing::info!("Not purchasable right now");
            }
        }
    }
    Ok(())
}

fn report_rejection(error: &PurchaseError) {
    match error {
        PurchaseError::AlreadySold { item } => {
            if let Some(item) = item {
                tracing::warn!("Too late - item {} is {}", item.id, item.status);
            } else {
                tracing::warn!("Too late - the item is already sold");
            }
        }
        PurchaseError::PasscodeMismatch => {
            tracing::warn!("Wrong passcode; check with the owner and retry");
        }
        PurchaseError::Rejected { reason, .. } => {
            tracing::warn!("Purchase rejected: {reason}");
        }
        PurchaseError::Api(_) => {}
    }
}

/// Buy an item outright.
pub async fn buy(item_id: i64) -> Result<(), CliError> {
    let coordinator = PurchaseCoordinator::new(client()?);
    match coordinator
        .buy_direct(&credential()?, ItemId::new(item_id))
        .await
    {
        Ok(()) => {
            tracing::info!("Purchased item {item_id}");
            Ok(())
        }
        Err(error) => {
            report_rejection(&error);
            Err(error.into())
        }
    }
}

/// Redeem an in-person passcode.
pub async fn redeem(item_id: i64, passcode: &str) -> Result<(), CliError> {
    let coordinator = PurchaseCoordinator::new(client()?);
    match coordinator
        .redeem_passcode(&credential()?, ItemId::new(item_id), passcode)
        .await
    {
        Ok(()) => {
            tracing::info!("Purchased item {item_id} in person");
            Ok(())
        }
        Err(error) => {
            report_rejection(&error);
            Err(error.into())
        }
    }
}

/// Show the account balance, optionally depositing first.
pub async fn balance(deposit: Option<i64>) -> Result<(), CliError> {
    let client = client()?;
    let credential = credential()?;

    if let Some(amount) = deposit {
        client.deposit(&credential, amount).await?;
        tracing::info!("Deposited ¥{amount}");
    }

    let balance = client.balance(&credential).await?;
    tracing::info!("Balance: ¥{balance}");
    Ok(())
}
