//! Integration tests for Furima.
//!
//! The orchestration flows are exercised against [`FakeMarket`], an
//! in-memory stand-in for the marketplace server. The fake enforces the
//! same preconditions the real server does - ownership, the
//! `Initial -> OnSale -> SoldOut` status machine, passcode validation -
//! and records every call so tests can assert exactly which requests an
//! orchestration issued and in what order.
//!
//! No test in this crate touches the network.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use bytes::Bytes;
use secrecy::SecretString;

use furima_client::{ApiError, Category, Item, ItemEdit, MarketApi, NewItem};
use furima_core::{CategoryId, Credential, ItemId, ItemStatus, Price, UserId};

/// A server call observed by the fake, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Categories,
    CreateCategory(String),
    CreateItem { name: String, category_id: CategoryId },
    UpdateItem(ItemId),
    Sell(ItemId),
    GetItem(ItemId),
    GetImage(ItemId),
    Purchase { item_id: ItemId, buyer: UserId },
    Passcode(ItemId),
    Available(ItemId),
    Redeem { item_id: ItemId, buyer: UserId },
    Suggest,
}

#[derive(Debug, Clone)]
struct StoredItem {
    name: String,
    category_id: CategoryId,
    seller: UserId,
    price: Price,
    description: String,
    status: ItemStatus,
    image: Bytes,
    passcode: String,
}

#[derive(Default)]
struct FakeState {
    categories: Vec<Category>,
    items: HashMap<ItemId, StoredItem>,
    next_category_id: i64,
    next_item_id: i64,
    calls: Vec<Call>,
    fail_create_category: bool,
    fail_create_item: bool,
    fail_sell: bool,
    suggestion: Option<String>,
}

/// In-memory marketplace backend.
///
/// Clones share state, so a clone can be handed to an orchestrator while
/// the test keeps another for seeding and assertions. All mutation happens
/// under one mutex, which also serializes concurrent purchasers the way
/// the real server does.
#[derive(Clone, Default)]
pub struct FakeMarket {
    state: Arc<Mutex<FakeState>>,
}

fn rejection(status: u16, message: &str) -> ApiError {
    ApiError::Api {
        status,
        message: message.to_owned(),
    }
}

impl FakeMarket {
    #[must_use]
    pub fn new() -> Self {
        let market = Self::default();
        {
            let mut state = market.lock();
            state.next_category_id = 1;
            state.next_item_id = 1;
        }
        market
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake state poisoned")
    }

    /// Pin the ids the next created category and item will receive.
    pub fn set_next_ids(&self, category_id: i64, item_id: i64) {
        let mut state = self.lock();
        state.next_category_id = category_id;
        state.next_item_id = item_id;
    }

    /// Seed an existing category.
    pub fn seed_category(&self, id: i64, name: &str) -> CategoryId {
        let category_id = CategoryId::new(id);
        self.lock().categories.push(Category {
            id: category_id,
            name: name.to_owned(),
        });
        category_id
    }

    /// Seed an existing item.
    pub fn seed_item(
        &self,
        id: i64,
        seller: UserId,
        name: &str,
        category_id: CategoryId,
        price: i64,
        status: ItemStatus,
        passcode: &str,
    ) -> ItemId {
        let item_id = ItemId::new(id);
        self.lock().items.insert(
            item_id,
            StoredItem {
                name: name.to_owned(),
                category_id,
                seller,
                price: Price::new(price).expect("seed price must be positive"),
                description: String::new(),
                status,
                image: Bytes::from_static(b"\xff\xd8\xff"),
                passcode: passcode.to_owned(),
            },
        );
        item_id
    }

    /// Make the next create-category call fail server-side.
    pub fn fail_create_category(&self) {
        self.lock().fail_create_category = true;
    }

    /// Make the next create-item call fail server-side.
    pub fn fail_create_item(&self) {
        self.lock().fail_create_item = true;
    }

    /// Make sell calls fail server-side until cleared.
    pub fn fail_sell(&self, fail: bool) {
        self.lock().fail_sell = fail;
    }

    /// Configure the description the suggestion endpoint returns; with no
    /// suggestion configured the endpoint fails.
    pub fn set_suggestion(&self, text: &str) {
        self.lock().suggestion = Some(text.to_owned());
    }

    /// Every call the fake has served, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// How many calls matched the predicate.
    #[must_use]
    pub fn count_calls(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| predicate(*c)).count()
    }

    /// The current status of a stored item.
    #[must_use]
    pub fn item_status(&self, item_id: ItemId) -> Option<ItemStatus> {
        self.lock().items.get(&item_id).map(|item| item.status)
    }

    fn item_detail(state: &FakeState, item_id: ItemId) -> Option<Item> {
        let stored = state.items.get(&item_id)?;
        let category_name = state
            .categories
            .iter()
            .find(|c| c.id == stored.category_id)
            .map_or_else(String::new, |c| c.name.clone());
        Some(Item {
            id: item_id,
            name: stored.name.clone(),
            category_id: stored.category_id,
            category_name,
            seller: stored.seller,
            price: stored.price,
            description: stored.description.clone(),
            status: stored.status,
        })
    }

    /// The shared purchase preconditions, in the server's order.
    fn check_purchasable(
        state: &FakeState,
        item_id: ItemId,
        buyer: UserId,
    ) -> Result<(), ApiError> {
        let Some(stored) = state.items.get(&item_id) else {
            return Err(rejection(412, "Item not found."));
        };
        if stored.seller == buyer {
            return Err(rejection(412, "You cannot buy your own item."));
        }
        if stored.status != ItemStatus::OnSale {
            return Err(rejection(412, "Item is not on sale"));
        }
        Ok(())
    }
}

#[async_trait]
impl MarketApi for FakeMarket {
    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let mut state = self.lock();
        state.calls.push(Call::Categories);
        Ok(state.categories.clone())
    }

    async fn create_category(
        &self,
        _credential: &Credential,
        name: &str,
    ) -> Result<Category, ApiError> {
        let mut state = self.lock();
        state.calls.push(Call::CreateCategory(name.to_owned()));

        if state.fail_create_category {
            state.fail_create_category = false;
            return Err(rejection(500, "Internal Server Error"));
        }

        let category = Category {
            id: CategoryId::new(state.next_category_id),
            name: name.to_owned(),
        };
        state.next_category_id += 1;
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn create_item(
        &self,
        credential: &Credential,
        item: NewItem,
    ) -> Result<ItemId, ApiError> {
        let mut state = self.lock();
        state.calls.push(Call::CreateItem {
            name: item.name.clone(),
            category_id: item.category_id,
        });

        if state.fail_create_item {
            state.fail_create_item = false;
            return Err(rejection(500, "Internal Server Error"));
        }

        if !state.categories.iter().any(|c| c.id == item.category_id) {
            return Err(rejection(500, "Category does not exist"));
        }

        let item_id = ItemId::new(state.next_item_id);
        state.next_item_id += 1;
        state.items.insert(
            item_id,
            StoredItem {
                name: item.name,
                category_id: item.category_id,
                seller: credential.user_id(),
                price: item.price,
                description: item.description,
                status: ItemStatus::Initial,
                image: Bytes::from(item.image.content.to_vec()),
                passcode: item.passcode.unwrap_or_default(),
            },
        );
        Ok(item_id)
    }

    async fn update_item(
        &self,
        _credential: &Credential,
        item_id: ItemId,
        edit: ItemEdit,
    ) -> Result<ItemId, ApiError> {
        let mut state = self.lock();
        state.calls.push(Call::UpdateItem(item_id));

        let Some(stored) = state.items.get_mut(&item_id) else {
            return Err(rejection(412, "Item not found."));
        };
        stored.name = edit.name;
        stored.category_id = edit.category_id;
        stored.price = edit.price;
        stored.description = edit.description;
        if let Some(image) = edit.image {
            stored.image = Bytes::from(image.content.to_vec());
        }
        Ok(item_id)
    }

    async fn sell(&self, credential: &Credential, item_id: ItemId) -> Result<(), ApiError> {
        let mut state = self.lock();
        state.calls.push(Call::Sell(item_id));

        if state.fail_sell {
            return Err(rejection(500, "Internal Server Error"));
        }

        let Some(stored) = state.items.get_mut(&item_id) else {
            return Err(rejection(412, "Item not found."));
        };
        if stored.seller != credential.user_id() {
            return Err(rejection(412, "cannot sell other user's item"));
        }
        if stored.status != ItemStatus::Initial {
            return Err(rejection(412, "invalid status. Has been sold or on sale"));
        }
        stored.status = ItemStatus::OnSale;
        Ok(())
    }

    async fn item(&self, item_id: ItemId) -> Result<Item, ApiError> {
        let mut state = self.lock();
        state.calls.push(Call::GetItem(item_id));
        Self::item_detail(&state, item_id).ok_or_else(|| rejection(404, "Not Found"))
    }

    async fn item_image(&self, item_id: ItemId) -> Result<Bytes, ApiError> {
        let mut state = self.lock();
        state.calls.push(Call::GetImage(item_id));
        state
            .items
            .get(&item_id)
            .map(|item| item.image.clone())
            .ok_or_else(|| rejection(404, "Image not found"))
    }

    async fn purchase(&self, credential: &Credential, item_id: ItemId) -> Result<(), ApiError> {
        let mut state = self.lock();
        let buyer = credential.user_id();
        state.calls.push(Call::Purchase { item_id, buyer });

        Self::check_purchasable(&state, item_id, buyer)?;
        let stored = state.items.get_mut(&item_id).expect("checked above");
        stored.status = ItemStatus::SoldOut;
        Ok(())
    }

    async fn item_passcode(
        &self,
        credential: &Credential,
        item_id: ItemId,
    ) -> Result<String, ApiError> {
        let mut state = self.lock();
        state.calls.push(Call::Passcode(item_id));

        let Some(stored) = state.items.get(&item_id) else {
            return Err(rejection(500, "internal server error"));
        };
        if stored.seller != credential.user_id() {
            return Err(rejection(500, "internal server error"));
        }
        Ok(stored.passcode.clone())
    }

    async fn in_person_available(
        &self,
        _credential: &Credential,
        item_id: ItemId,
    ) -> Result<bool, ApiError> {
        let mut state = self.lock();
        state.calls.push(Call::Available(item_id));
        state
            .items
            .get(&item_id)
            .map(|item| !item.passcode.is_empty())
            .ok_or_else(|| rejection(412, "Item not found."))
    }

    async fn redeem_in_person(
        &self,
        credential: &Credential,
        item_id: ItemId,
        passcode: &str,
    ) -> Result<(), ApiError> {
        let mut state = self.lock();
        let buyer = credential.user_id();
        state.calls.push(Call::Redeem { item_id, buyer });

        // The server checks the status machine before the passcode: a
        // sold-out item rejects as unavailable even with a wrong code.
        Self::check_purchasable(&state, item_id, buyer)?;

        let stored = state.items.get_mut(&item_id).expect("checked above");
        if stored.passcode.is_empty() || stored.passcode != passcode {
            return Err(rejection(412, "Invalid password"));
        }
        stored.status = ItemStatus::SoldOut;
        Ok(())
    }

    async fn suggest_description(
        &self,
        _credential: &Credential,
        _item_name: &str,
        _category_name: &str,
    ) -> Result<String, ApiError> {
        let mut state = self.lock();
        state.calls.push(Call::Suggest);
        state
            .suggestion
            .clone()
            .ok_or_else(|| rejection(500, "Internal Server Error"))
    }
}

/// A credential for the given user; the token is opaque to everything the
/// fake does.
#[must_use]
pub fn credential(user_id: i64) -> Credential {
    Credential::new(UserId::new(user_id), SecretString::from("test-token"))
}
