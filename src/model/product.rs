//! Product records and the payloads that create, change and present them.
//!
//! [`Product`] implements the [`PartitionedEntity`](partition_actor::PartitionedEntity)
//! trait, allowing it to be kept by a [`PartitionActor`](partition_actor::PartitionActor).
//! See [`crate::catalog::entity`] for the key mapping. Related payloads:
//! - Creation input ([`ProductDraft`])
//! - Update input ([`ProductChanges`])
//! - Boundary output ([`ProductView`])

use serde::{Deserialize, Deserializer, Serialize};

use crate::asset::{AssetHandle, AssetRef};

/// A stored product record.
///
/// Serializes to the store's record schema: `partitionKey`, `rowKey`, `name`,
/// `description`, `price`, `stockLevel`, `imageRef`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub partition_key: String,
    pub row_key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub stock_level: u32,
    #[serde(default)]
    pub image_ref: Option<String>,
}

impl Product {
    /// Builds a product from a validated draft once its key and image are settled.
    pub(crate) fn from_draft(
        partition_key: impl Into<String>,
        row_key: impl Into<String>,
        draft: &ProductDraft,
        image: Option<&AssetRef>,
    ) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            name: draft.name.trim().to_string(),
            description: draft.description.clone(),
            price: draft.price,
            stock_level: draft.stock_level,
            image_ref: image.map(|asset| asset.url().to_string()),
        }
    }

    /// Applies the mutable fields of `changes`. Identity fields are untouched.
    pub fn apply(&mut self, changes: ProductChanges) {
        if let Some(name) = changes.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(stock_level) = changes.stock_level {
            self.stock_level = stock_level;
        }
    }
}

/// Where a new product's image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A handle returned by the upload step.
    Pending(AssetHandle),
    /// A URL the blob store already knows.
    Url(String),
}

/// Payload for creating a product.
///
/// Leave `row_key` as `None` (or blank) to have one generated.
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub row_key: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock_level: u32,
    pub image: Option<ImageSource>,
}

impl ProductDraft {
    /// Creates a draft with the required fields; everything else is left empty.
    pub fn new(name: impl Into<String>, price: f64, stock_level: u32) -> Self {
        Self {
            name: name.into(),
            price,
            stock_level,
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, image: ImageSource) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_row_key(mut self, row_key: impl Into<String>) -> Self {
        self.row_key = Some(row_key.into());
        self
    }

    /// The caller-supplied row key, unless it is empty or only whitespace.
    pub fn requested_row_key(&self) -> Option<&str> {
        self.row_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}

/// Payload for updating a product. Absent fields keep their current value.
///
/// `description` has three states: absent keeps it, `Some(None)` (JSON `null`)
/// clears it, `Some(Some(text))` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductChanges {
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    pub price: Option<f64>,
    pub stock_level: Option<u32>,
}

/// Maps a present field to `Some`, so an explicit `null` survives as `Some(None)`.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock_level.is_none()
    }
}

/// The shape handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock_level: u32,
    pub image_url: Option<String>,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            id: product.row_key,
            name: product.name,
            description: product.description,
            price: product.price,
            stock_level: product.stock_level,
            image_url: product.image_ref,
        }
    }
}
