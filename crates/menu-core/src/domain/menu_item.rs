// ============================================================================
// Menu Core - Menu Item Entity
// File: crates/menu-core/src/domain/menu_item.rs
// Description: Sellable dish/drink and its owned image reference
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::domain::category::CategoryCatalog;
use crate::error::DomainError;
use crate::repositories::document_store::Document;

/// Menu item as stored in the `menuItems` collection.
///
/// `image_url` and `image_path` are either both empty or both set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub price: String,
    pub category: String,
    pub image_url: String,
    pub image_path: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl MenuItem {
    pub fn new(
        id: String,
        fields: MenuItemFields,
        image: Option<ImageRef>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let (image_url, image_path) = ImageRef::into_parts(image);
        Self {
            id,
            name: fields.name,
            price: fields.price,
            category: fields.category,
            image_url,
            image_path,
            created_at: Some(created_at),
            updated_at: None,
        }
    }

    pub fn image(&self) -> Option<ImageRef> {
        if self.image_path.is_empty() || self.image_url.is_empty() {
            return None;
        }
        Some(ImageRef {
            url: self.image_url.clone(),
            path: self.image_path.clone(),
        })
    }

    pub fn has_consistent_image(&self) -> bool {
        self.image_url.is_empty() == self.image_path.is_empty()
    }

    pub fn from_document(id: &str, document: Document) -> Result<Self, DomainError> {
        let body: MenuItemDocument = serde_json::from_value(serde_json::Value::Object(document))
            .map_err(|e| DomainError::DocumentStoreError(format!("malformed menu item {}: {}", id, e)))?;

        Ok(Self {
            id: id.to_string(),
            name: body.name,
            price: body.price,
            category: body.category,
            image_url: body.image_url,
            image_path: body.image_path,
            created_at: body.created_at,
            updated_at: body.updated_at,
        })
    }

    /// Document body; the id lives in the document key, not the body.
    pub fn to_document(&self) -> Document {
        let body = MenuItemDocument {
            name: self.name.clone(),
            price: self.price.clone(),
            category: self.category.clone(),
            image_url: self.image_url.clone(),
            image_path: self.image_path.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        match serde_json::to_value(body) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => Document::new(),
        }
    }

    /// Fields written by an update; image fields only when the image changed.
    pub fn patch_document(&self, include_image: bool) -> Document {
        let mut document = self.to_document();
        document.retain(|key, _| match key.as_str() {
            "name" | "price" | "category" | "updatedAt" => true,
            "imageUrl" | "imagePath" => include_image,
            _ => false,
        });
        document
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MenuItemDocument {
    name: String,
    #[serde(deserialize_with = "string_or_number")]
    price: String,
    category: String,
    #[serde(default)]
    image_url: String,
    #[serde(default)]
    image_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

/// Older records stored the price as a JSON number.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Price::deserialize(deserializer)? {
        Price::Text(text) => text,
        Price::Number(number) => number.to_string(),
    })
}

/// Storage location and public URL of an item's image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    pub path: String,
}

impl ImageRef {
    pub fn new(url: String, path: String) -> Result<Self, DomainError> {
        if url.is_empty() || path.is_empty() {
            return Err(DomainError::InternalError(
                "image reference needs both url and path".to_string(),
            ));
        }
        Ok(Self { url, path })
    }

    /// `(image_url, image_path)`, both empty when there is no image.
    pub fn into_parts(image: Option<ImageRef>) -> (String, String) {
        match image {
            Some(image) => (image.url, image.path),
            None => (String::new(), String::new()),
        }
    }
}

/// User-supplied menu item fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MenuItemFields {
    #[validate(length(min = 1, max = 200, message = "Item name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 32, message = "Price is required"))]
    pub price: String,

    pub category: String,
}

impl MenuItemFields {
    pub fn new(
        name: impl Into<String>,
        price: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            category: category.into(),
        }
    }

    /// Trimmed copy checked against the catalog. Runs before any store call.
    pub fn normalized(&self, catalog: &CategoryCatalog) -> Result<Self, DomainError> {
        let fields = Self {
            name: self.name.trim().to_string(),
            price: self.price.trim().to_string(),
            category: catalog.resolve(&self.category)?,
        };
        fields.validate()?;
        Ok(fields)
    }
}
