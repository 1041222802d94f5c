//! Integration tests for the purchase coordination.
//!
//! The fake serializes buyers under one lock the way the server does, so
//! the concurrency scenarios here observe the same outcomes a real
//! deployment would.

use furima_client::{PurchaseAccess, PurchaseCoordinator, PurchaseError};
use furima_core::{ItemStatus, UserId};
use furima_integration_tests::{Call, FakeMarket, credential};

fn market_with_on_sale_item(passcode: &str) -> (FakeMarket, furima_core::ItemId) {
    let market = FakeMarket::new();
    let category_id = market.seed_category(7, "Furniture");
    let item_id = market.seed_item(
        42,
        UserId::new(1),
        "Chair",
        category_id,
        1000,
        ItemStatus::OnSale,
        passcode,
    );
    (market, item_id)
}

#[tokio::test]
async fn direct_purchase_sells_the_item() {
    let (market, item_id) = market_with_on_sale_item("");
    let coordinator = PurchaseCoordinator::new(market.clone());

    coordinator
        .buy_direct(&credential(2), item_id)
        .await
        .expect("purchase should succeed");

    assert_eq!(market.item_status(item_id), Some(ItemStatus::SoldOut));
}

#[tokio::test]
async fn purchase_of_sold_item_resyncs_instead_of_retrying() {
    let (market, item_id) = market_with_on_sale_item("");
    let coordinator = PurchaseCoordinator::new(market.clone());

    coordinator
        .buy_direct(&credential(2), item_id)
        .await
        .expect("first purchase should succeed");

    let result = coordinator.buy_direct(&credential(3), item_id).await;
    let Err(PurchaseError::AlreadySold { item }) = result else {
        panic!("expected AlreadySold, got {result:?}");
    };

    // The rejection carried a fresh snapshot fetched after the conflict.
    let item = item.expect("resync should have succeeded");
    assert_eq!(item.status, ItemStatus::SoldOut);
    assert_eq!(
        market.count_calls(|c| matches!(c, Call::GetItem(_))),
        1,
        "a terminal rejection triggers exactly one resync fetch"
    );
    // Exactly one purchase succeeded server-side.
    assert_eq!(market.item_status(item_id), Some(ItemStatus::SoldOut));
}

#[tokio::test]
async fn buying_your_own_item_is_rejected_with_reason() {
    let (market, item_id) = market_with_on_sale_item("");
    let coordinator = PurchaseCoordinator::new(market);

    let result = coordinator.buy_direct(&credential(1), item_id).await;
    let Err(PurchaseError::Rejected { reason, .. }) = result else {
        panic!("expected Rejected, got {result:?}");
    };
    assert!(reason.contains("own item"));
}

#[tokio::test]
async fn concurrent_buyers_exactly_one_wins() {
    let (market, item_id) = market_with_on_sale_item("");
    let coordinator = PurchaseCoordinator::new(market.clone());

    let first = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.buy_direct(&credential(2), item_id).await })
    };
    let second = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.buy_direct(&credential(3), item_id).await })
    };

    let outcomes = [
        first.await.expect("task should not panic"),
        second.await.expect("task should not panic"),
    ];

    let wins = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "the server serializes the OnSale -> SoldOut transition");
    assert!(
        outcomes
            .iter()
            .any(|r| matches!(r, Err(PurchaseError::AlreadySold { .. }))),
        "the loser observes AlreadySold"
    );
    assert_eq!(market.item_status(item_id), Some(ItemStatus::SoldOut));
}

#[tokio::test]
async fn wrong_passcode_is_retriable_and_leaves_status_unchanged() {
    let (market, item_id) = market_with_on_sale_item("#VW-4869");
    let coordinator = PurchaseCoordinator::new(market.clone());

    let result = coordinator
        .redeem_passcode(&credential(2), item_id, "#XX-0000")
        .await;
    assert!(matches!(result, Err(PurchaseError::PasscodeMismatch)));
    assert_eq!(market.item_status(item_id), Some(ItemStatus::OnSale));
    // A retriable mismatch does not resync.
    assert_eq!(market.count_calls(|c| matches!(c, Call::GetItem(_))), 0);

    coordinator
        .redeem_passcode(&credential(2), item_id, "#VW-4869")
        .await
        .expect("correct passcode should finalize the sale");
    assert_eq!(market.item_status(item_id), Some(ItemStatus::SoldOut));
}

#[tokio::test]
async fn redeeming_against_sold_item_reports_unavailable_not_mismatch() {
    let (market, item_id) = market_with_on_sale_item("#VW-4869");
    let coordinator = PurchaseCoordinator::new(market.clone());

    coordinator
        .buy_direct(&credential(2), item_id)
        .await
        .expect("purchase should succeed");

    // Even with the wrong code, the status machine answers first.
    let result = coordinator
        .redeem_passcode(&credential(3), item_id, "#XX-0000")
        .await;
    assert!(matches!(result, Err(PurchaseError::AlreadySold { .. })));
}

#[tokio::test]
async fn owner_view_carries_the_passcode() {
    let (market, item_id) = market_with_on_sale_item("#VW-4869");
    let coordinator = PurchaseCoordinator::new(market.clone());

    let view = coordinator
        .load_view(&credential(1), item_id)
        .await
        .expect("view should load");

    let PurchaseAccess::Owner { passcode } = &view.access else {
        panic!("expected owner access, got {:?}", view.access);
    };
    assert_eq!(passcode, "#VW-4869");
    assert!(!view.can_buy(), "owners cannot buy their own item");
    // The owner path never asks the buyer-side availability question.
    assert_eq!(market.count_calls(|c| matches!(c, Call::Available(_))), 0);
}

#[tokio::test]
async fn buyer_view_checks_in_person_availability() {
    let (market, item_id) = market_with_on_sale_item("#VW-4869");
    let coordinator = PurchaseCoordinator::new(market.clone());

    let view = coordinator
        .load_view(&credential(2), item_id)
        .await
        .expect("view should load");

    assert!(matches!(
        view.access,
        PurchaseAccess::Buyer {
            in_person_available: true
        }
    ));
    assert!(view.can_buy());
    assert_eq!(market.count_calls(|c| matches!(c, Call::Passcode(_))), 0);
    // Item and image were both fetched for the detail view.
    assert_eq!(market.count_calls(|c| matches!(c, Call::GetImage(_))), 1);
}

#[tokio::test]
async fn buyer_view_of_sold_item_disables_purchase() {
    let (market, item_id) = market_with_on_sale_item("");
    let coordinator = PurchaseCoordinator::new(market.clone());

    coordinator
        .buy_direct(&credential(2), item_id)
        .await
        .expect("purchase should succeed");

    let view = coordinator
        .load_view(&credential(3), item_id)
        .await
        .expect("view should load");
    assert!(!view.can_buy());
}
