//! Integration tests for the listing orchestration.
//!
//! Each test drives `ListingOrchestrator` against the in-memory fake and
//! asserts both the outcome and the exact calls the server saw.

use bytes::Bytes;
use furima_client::{
    CategorySelection, DraftListing, ImageUpload, ListingError, ListingOrchestrator,
    ListingOutcome, ValidationError,
};
use furima_core::{CategoryId, ItemId, ItemStatus};
use furima_integration_tests::{Call, FakeMarket, credential};

fn chair_draft(category: CategorySelection) -> DraftListing {
    DraftListing {
        name: "Chair".to_owned(),
        category,
        price: 1000,
        description: "A sturdy chair".to_owned(),
        image: Some(ImageUpload {
            file_name: "chair.jpg".to_owned(),
            content: Bytes::from_static(b"\xff\xd8\xff\xe0"),
        }),
        passcode: None,
    }
}

#[tokio::test]
async fn new_category_then_item_then_sell() {
    let market = FakeMarket::new();
    market.set_next_ids(7, 42);
    let orchestrator = ListingOrchestrator::new(market.clone());
    let seller = credential(1);

    let outcome = orchestrator
        .submit(&seller, chair_draft(CategorySelection::New("Furniture".to_owned())), None)
        .await
        .expect("submission should succeed");

    assert_eq!(outcome, ListingOutcome::Created(ItemId::new(42)));
    assert_eq!(market.item_status(ItemId::new(42)), Some(ItemStatus::OnSale));

    // One category create, issued before the item create, then the sell.
    assert_eq!(
        market.calls(),
        vec![
            Call::Categories,
            Call::CreateCategory("Furniture".to_owned()),
            Call::CreateItem {
                name: "Chair".to_owned(),
                category_id: CategoryId::new(7),
            },
            Call::Sell(ItemId::new(42)),
        ]
    );
}

#[tokio::test]
async fn case_insensitive_match_reuses_existing_category() {
    let market = FakeMarket::new();
    let existing = market.seed_category(7, "Furniture");
    market.set_next_ids(8, 42);
    let orchestrator = ListingOrchestrator::new(market.clone());

    let outcome = orchestrator
        .submit(
            &credential(1),
            chair_draft(CategorySelection::New("fURNITURE".to_owned())),
            None,
        )
        .await
        .expect("submission should succeed");

    assert_eq!(outcome, ListingOutcome::Created(ItemId::new(42)));
    assert_eq!(
        market.count_calls(|c| matches!(c, Call::CreateCategory(_))),
        0,
        "a case-insensitive match must not create a duplicate category"
    );
    assert_eq!(
        market.count_calls(|c| matches!(
            c,
            Call::CreateItem { category_id, .. } if *category_id == existing
        )),
        1
    );
}

#[tokio::test]
async fn existing_category_id_needs_no_category_calls() {
    let market = FakeMarket::new();
    let category_id = market.seed_category(3, "Books");
    let orchestrator = ListingOrchestrator::new(market.clone());

    orchestrator
        .submit(&credential(1), chair_draft(CategorySelection::Existing(category_id)), None)
        .await
        .expect("submission should succeed");

    assert_eq!(market.count_calls(|c| matches!(c, Call::Categories)), 0);
    assert_eq!(market.count_calls(|c| matches!(c, Call::CreateCategory(_))), 0);
}

#[tokio::test]
async fn repeated_new_name_creates_only_one_category() {
    let market = FakeMarket::new();
    let orchestrator = ListingOrchestrator::new(market.clone());
    let seller = credential(1);

    for _ in 0..2 {
        orchestrator
            .submit(
                &seller,
                chair_draft(CategorySelection::New("Furniture".to_owned())),
                None,
            )
            .await
            .expect("submission should succeed");
    }

    // The second resolve hits the cached list (with the created category
    // folded in) instead of creating a duplicate.
    assert_eq!(market.count_calls(|c| matches!(c, Call::CreateCategory(_))), 1);
}

#[tokio::test]
async fn edit_updates_in_place_and_never_sells() {
    let market = FakeMarket::new();
    let category_id = market.seed_category(3, "Books");
    let seller = credential(1);
    let item_id = market.seed_item(
        5,
        seller.user_id(),
        "Old title",
        category_id,
        800,
        ItemStatus::OnSale,
        "",
    );
    let orchestrator = ListingOrchestrator::new(market.clone());

    let mut draft = chair_draft(CategorySelection::Existing(category_id));
    draft.image = None; // edits may keep the stored image

    let outcome = orchestrator
        .submit(&seller, draft, Some(item_id))
        .await
        .expect("edit should succeed");

    assert_eq!(outcome, ListingOutcome::Updated(item_id));
    assert_eq!(market.count_calls(|c| matches!(c, Call::Sell(_))), 0);
    // An edit must not disturb the status machine.
    assert_eq!(market.item_status(item_id), Some(ItemStatus::OnSale));
}

#[tokio::test]
async fn edit_of_sold_item_stays_sold() {
    let market = FakeMarket::new();
    let category_id = market.seed_category(3, "Books");
    let seller = credential(1);
    let item_id = market.seed_item(
        5,
        seller.user_id(),
        "Old title",
        category_id,
        800,
        ItemStatus::SoldOut,
        "",
    );
    let orchestrator = ListingOrchestrator::new(market.clone());

    let mut draft = chair_draft(CategorySelection::Existing(category_id));
    draft.image = None;

    orchestrator
        .submit(&seller, draft, Some(item_id))
        .await
        .expect("edit should succeed");

    assert_eq!(market.item_status(item_id), Some(ItemStatus::SoldOut));
}

#[tokio::test]
async fn validation_failures_issue_no_network_calls() {
    let market = FakeMarket::new();
    market.seed_category(3, "Books");
    let orchestrator = ListingOrchestrator::new(market.clone());
    let seller = credential(1);

    let mut nameless = chair_draft(CategorySelection::Existing(CategoryId::new(3)));
    nameless.name = "  ".to_owned();
    let result = orchestrator.submit(&seller, nameless, None).await;
    assert!(matches!(
        result,
        Err(ListingError::Validation(ValidationError::EmptyName))
    ));

    let mut free = chair_draft(CategorySelection::Existing(CategoryId::new(3)));
    free.price = 0;
    let result = orchestrator.submit(&seller, free, None).await;
    assert!(matches!(
        result,
        Err(ListingError::Validation(ValidationError::NonPositivePrice))
    ));

    let mut imageless = chair_draft(CategorySelection::Existing(CategoryId::new(3)));
    imageless.image = None;
    let result = orchestrator.submit(&seller, imageless, None).await;
    assert!(matches!(
        result,
        Err(ListingError::Validation(ValidationError::MissingImage))
    ));

    assert!(market.calls().is_empty(), "validation must fail before any call");
}

#[tokio::test]
async fn category_creation_failure_aborts_before_item_create() {
    let market = FakeMarket::new();
    market.fail_create_category();
    let orchestrator = ListingOrchestrator::new(market.clone());

    let result = orchestrator
        .submit(
            &credential(1),
            chair_draft(CategorySelection::New("Furniture".to_owned())),
            None,
        )
        .await;

    assert!(matches!(result, Err(ListingError::CategoryCreation(_))));
    assert_eq!(
        market.count_calls(|c| matches!(c, Call::CreateItem { .. })),
        0,
        "the draft must not be partially submitted"
    );
}

#[tokio::test]
async fn item_persist_failure_leaves_created_category() {
    let market = FakeMarket::new();
    market.fail_create_item();
    let orchestrator = ListingOrchestrator::new(market.clone());

    let result = orchestrator
        .submit(
            &credential(1),
            chair_draft(CategorySelection::New("Furniture".to_owned())),
            None,
        )
        .await;

    assert!(matches!(result, Err(ListingError::ItemPersist(_))));
    // The orphan category is an accepted gap: it stays.
    assert_eq!(market.count_calls(|c| matches!(c, Call::CreateCategory(_))), 1);
    assert_eq!(market.count_calls(|c| matches!(c, Call::Sell(_))), 0);
}

#[tokio::test]
async fn sell_failure_reports_incomplete_and_relist_finishes_the_job() {
    let market = FakeMarket::new();
    market.set_next_ids(7, 42);
    market.fail_sell(true);
    let orchestrator = ListingOrchestrator::new(market.clone());
    let seller = credential(1);

    let result = orchestrator
        .submit(
            &seller,
            chair_draft(CategorySelection::New("Furniture".to_owned())),
            None,
        )
        .await;

    let Err(ListingError::ListingIncomplete { item_id, .. }) = result else {
        panic!("expected ListingIncomplete, got {result:?}");
    };
    assert_eq!(item_id, ItemId::new(42));
    // The item exists but is not marketplace-visible.
    assert_eq!(market.item_status(item_id), Some(ItemStatus::Initial));

    market.fail_sell(false);
    orchestrator
        .relist(&seller, item_id)
        .await
        .expect("relist should succeed");

    assert_eq!(market.item_status(item_id), Some(ItemStatus::OnSale));
    // Retrying the sell step must not recreate the item.
    assert_eq!(market.count_calls(|c| matches!(c, Call::CreateItem { .. })), 1);
}
