//! Wire types for the marketplace API.
//!
//! Response shapes mirror the server's JSON exactly; every field is decoded
//! at the transport boundary so a missing or mistyped field fails loudly
//! instead of propagating as a default.

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use furima_core::{CategoryId, Credential, ItemId, ItemStatus, Price, UserId};

/// An item category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    /// Case-insensitive name comparison, used when deciding whether a
    /// "new" category already exists.
    #[must_use]
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Full item detail, as returned by `GET /items/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category_id: CategoryId,
    pub category_name: String,
    /// The owner's user id.
    #[serde(rename = "user_id")]
    pub seller: UserId,
    pub price: Price,
    pub description: String,
    pub status: ItemStatus,
}

impl Item {
    /// Whether the given credential belongs to this item's owner.
    #[must_use]
    pub fn is_owned_by(&self, credential: &Credential) -> bool {
        self.seller == credential.user_id()
    }
}

/// Compact item row, as returned by the list and search endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemSummary {
    pub id: ItemId,
    pub name: String,
    pub price: Price,
    pub category_name: String,
}

/// A registered marketplace user.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredUser {
    pub id: UserId,
    pub name: String,
}

/// A logged-in user: identity plus the bearer credential every
/// authenticated call forwards.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: RegisteredUser,
    pub credential: Credential,
}

/// An image payload for item create/update.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content: Bytes,
}

impl ImageUpload {
    fn into_part(self) -> Part {
        Part::bytes(self.content.to_vec()).file_name(self.file_name)
    }
}

/// Fields of a new item, submitted as one multipart form.
#[derive(Debug)]
pub struct NewItem {
    pub name: String,
    pub category_id: CategoryId,
    pub price: Price,
    pub description: String,
    pub image: ImageUpload,
    /// Passcode enabling the in-person purchase path. The server stores it
    /// even when empty; an empty string means in-person purchase is off.
    pub passcode: Option<String>,
}

impl NewItem {
    pub(crate) fn into_form(self) -> Form {
        Form::new()
            .text("name", self.name)
            .text("category_id", self.category_id.as_i64().to_string())
            .text("price", self.price.as_yen().to_string())
            .text("description", self.description)
            .text("item_password", self.passcode.unwrap_or_default())
            .part("image", self.image.into_part())
    }
}

/// Fields of an item edit, submitted as one multipart form.
///
/// Same shape as [`NewItem`] except the image is optional: an edit without
/// one keeps the stored image.
#[derive(Debug)]
pub struct ItemEdit {
    pub name: String,
    pub category_id: CategoryId,
    pub price: Price,
    pub description: String,
    pub image: Option<ImageUpload>,
    pub passcode: Option<String>,
}

impl ItemEdit {
    pub(crate) fn into_form(self) -> Form {
        let form = Form::new()
            .text("name", self.name)
            .text("category_id", self.category_id.as_i64().to_string())
            .text("price", self.price.as_yen().to_string())
            .text("description", self.description)
            .text("item_password", self.passcode.unwrap_or_default());

        match self.image {
            Some(image) => form.part("image", image.into_part()),
            None => form,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_name_matches_case_insensitively() {
        let category = Category {
            id: CategoryId::new(7),
            name: "Furniture".to_owned(),
        };
        assert!(category.name_matches("furniture"));
        assert!(category.name_matches("FURNITURE"));
        assert!(!category.name_matches("Furnishings"));
    }

    #[test]
    fn test_item_decodes_wire_shape() {
        let json = r#"{
            "id": 42,
            "name": "Chair",
            "category_id": 7,
            "category_name": "Furniture",
            "user_id": 3,
            "price": 1000,
            "description": "A sturdy chair",
            "status": 2
        }"#;

        let item: Item = serde_json::from_str(json).expect("deserialize");
        assert_eq!(item.id, ItemId::new(42));
        assert_eq!(item.seller, UserId::new(3));
        assert_eq!(item.status, ItemStatus::OnSale);
        assert_eq!(item.price.as_yen(), 1000);
    }

    #[test]
    fn test_item_missing_field_fails_decode() {
        let json = r#"{"id": 42, "name": "Chair"}"#;
        let result: Result<Item, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_ownership_check() {
        let item: Item = serde_json::from_str(
            r#"{"id":1,"name":"x","category_id":1,"category_name":"c",
                "user_id":3,"price":100,"description":"","status":2}"#,
        )
        .expect("deserialize");

        let owner = Credential::new(UserId::new(3), secrecy::SecretString::from("t"));
        let visitor = Credential::new(UserId::new(9), secrecy::SecretString::from("t"));
        assert!(item.is_owned_by(&owner));
        assert!(!item.is_owned_by(&visitor));
    }
}
