/// A product in the catalog.
///
/// Field names follow the remote API (`camelCase` on the wire). Every field is defaulted on
/// decode because the public API omits some of them (e.g. `brand`) for a few records.
///
/// [`Entity`](catalog_framework::Entity) is implemented in
/// [`product_actor::entity`](crate::product_actor::entity); the table row view is implemented
/// at the bottom of this file.
use crate::table::{CellValue, TableRow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Server-assigned product identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductMeta {
    pub created_at: String,
    pub updated_at: String,
    pub barcode: String,
    pub qr_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: u32,
    pub tags: Vec<String>,
    pub brand: String,
    pub sku: String,
    pub weight: f64,
    pub dimensions: Dimensions,
    pub warranty_information: String,
    pub shipping_information: String,
    pub availability_status: String,
    pub return_policy: String,
    pub minimum_order_quantity: u32,
    pub meta: ProductMeta,
    pub images: Vec<String>,
    pub thumbnail: String,
}

/// Create payload: a product without its id. Sent as the body of `POST /products/add`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: u32,
    pub tags: Vec<String>,
    pub brand: String,
    pub sku: String,
    pub weight: f64,
    pub dimensions: Dimensions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warranty_information: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_information: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_policy: Option<String>,
    pub minimum_order_quantity: u32,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Partial product: the body of `PUT /products/{id}` and the shape its response is read as.
///
/// Unknown response fields (`id`, `isDeleted`, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warranty_information: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_information: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_order_quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ProductMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl From<ProductDraft> for ProductPatch {
    fn from(draft: ProductDraft) -> Self {
        Self {
            title: Some(draft.title),
            description: Some(draft.description),
            category: Some(draft.category),
            price: Some(draft.price),
            discount_percentage: Some(draft.discount_percentage),
            rating: Some(draft.rating),
            stock: Some(draft.stock),
            tags: Some(draft.tags),
            brand: Some(draft.brand),
            sku: Some(draft.sku),
            weight: Some(draft.weight),
            dimensions: Some(draft.dimensions),
            warranty_information: draft.warranty_information,
            shipping_information: draft.shipping_information,
            availability_status: draft.availability_status,
            return_policy: draft.return_policy,
            minimum_order_quantity: Some(draft.minimum_order_quantity),
            meta: None,
            images: Some(draft.images),
            thumbnail: draft.thumbnail,
        }
    }
}

impl Product {
    /// Shallow merge: every field present in `patch` replaces the current value.
    pub fn merge(&mut self, patch: ProductPatch) {
        macro_rules! take {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = patch.$field { self.$field = value; })*
            };
        }
        take!(
            title,
            description,
            category,
            price,
            discount_percentage,
            rating,
            stock,
            tags,
            brand,
            sku,
            weight,
            dimensions,
            warranty_information,
            shipping_information,
            availability_status,
            return_policy,
            minimum_order_quantity,
            meta,
            images,
            thumbnail,
        );
    }
}

fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

fn dimensions_record(d: &Dimensions) -> CellValue {
    let mut record = BTreeMap::new();
    record.insert("width".to_string(), CellValue::Number(d.width));
    record.insert("height".to_string(), CellValue::Number(d.height));
    record.insert("depth".to_string(), CellValue::Number(d.depth));
    CellValue::Record(record)
}

impl TableRow for Product {
    type Key = ProductId;

    fn row_key(&self) -> ProductId {
        self.id
    }

    fn cell(&self, key: &str) -> CellValue {
        match key.split_once('.') {
            Some(("dimensions", field)) => match field {
                "width" => CellValue::Number(self.dimensions.width),
                "height" => CellValue::Number(self.dimensions.height),
                "depth" => CellValue::Number(self.dimensions.depth),
                _ => CellValue::Null,
            },
            Some(("meta", field)) => match field {
                "createdAt" => text(&self.meta.created_at),
                "updatedAt" => text(&self.meta.updated_at),
                "barcode" => text(&self.meta.barcode),
                "qrCode" => text(&self.meta.qr_code),
                _ => CellValue::Null,
            },
            Some(_) => CellValue::Null,
            None => match key {
                "id" => CellValue::Number(f64::from(self.id.0)),
                "title" => text(&self.title),
                "description" => text(&self.description),
                "category" => text(&self.category),
                "price" => CellValue::Number(self.price),
                "discountPercentage" => CellValue::Number(self.discount_percentage),
                "rating" => CellValue::Number(self.rating),
                "stock" => CellValue::Number(f64::from(self.stock)),
                "tags" => CellValue::List(self.tags.iter().map(|t| text(t)).collect()),
                "brand" => text(&self.brand),
                "sku" => text(&self.sku),
                "weight" => CellValue::Number(self.weight),
                "dimensions" => dimensions_record(&self.dimensions),
                "warrantyInformation" => text(&self.warranty_information),
                "shippingInformation" => text(&self.shipping_information),
                "availabilityStatus" => text(&self.availability_status),
                "returnPolicy" => text(&self.return_policy),
                "minimumOrderQuantity" => CellValue::Number(f64::from(self.minimum_order_quantity)),
                "images" => CellValue::List(self.images.iter().map(|i| text(i)).collect()),
                "thumbnail" => text(&self.thumbnail),
                _ => CellValue::Null,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIRE: &str = r#"{
        "id": 1,
        "title": "Essence Mascara Lash Princess",
        "description": "Popular mascara.",
        "category": "beauty",
        "price": 9.99,
        "discountPercentage": 7.17,
        "rating": 4.94,
        "stock": 5,
        "tags": ["beauty", "mascara"],
        "brand": "Essence",
        "sku": "RCH45Q1A",
        "weight": 2,
        "dimensions": { "width": 23.17, "height": 14.43, "depth": 28.01 },
        "warrantyInformation": "1 month warranty",
        "shippingInformation": "Ships in 1 month",
        "availabilityStatus": "Low Stock",
        "reviews": [],
        "returnPolicy": "30 days return policy",
        "minimumOrderQuantity": 24,
        "meta": {
            "createdAt": "2024-05-23T08:56:21.618Z",
            "updatedAt": "2024-05-23T08:56:21.618Z",
            "barcode": "9164035109868",
            "qrCode": "https://assets.dummyjson.com/public/qr-code.png"
        },
        "images": ["https://cdn.dummyjson.com/products/images/beauty/1.png"],
        "thumbnail": "https://cdn.dummyjson.com/products/images/beauty/thumbnail.png"
    }"#;

    #[test]
    fn decodes_wire_shape() {
        let product: Product = serde_json::from_str(WIRE).unwrap();
        assert_eq!(product.id, ProductId(1));
        assert_eq!(product.discount_percentage, 7.17);
        assert_eq!(product.dimensions.depth, 28.01);
        assert_eq!(product.meta.barcode, "9164035109868");
    }

    #[test]
    fn missing_fields_default() {
        let product: Product =
            serde_json::from_str(r#"{"id": 7, "title": "Apple", "price": 1.99}"#).unwrap();
        assert_eq!(product.brand, "");
        assert!(product.tags.is_empty());
    }

    #[test]
    fn cell_resolves_nested_keys() {
        let product: Product = serde_json::from_str(WIRE).unwrap();
        assert_eq!(
            product.cell("meta.updatedAt"),
            CellValue::Text("2024-05-23T08:56:21.618Z".into())
        );
        assert_eq!(product.cell("dimensions.width"), CellValue::Number(23.17));
        assert_eq!(product.cell("stock"), CellValue::Number(5.0));
        assert_eq!(product.cell("meta.nope"), CellValue::Null);
        assert_eq!(product.cell("unknown"), CellValue::Null);
    }

    #[test]
    fn merge_replaces_only_present_fields() {
        let mut product: Product = serde_json::from_str(WIRE).unwrap();
        let echoed: ProductPatch =
            serde_json::from_str(r#"{"id": 1, "title": "Renamed", "price": 5}"#).unwrap();
        product.merge(echoed);
        assert_eq!(product.title, "Renamed");
        assert_eq!(product.price, 5.0);
        assert_eq!(product.brand, "Essence");
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = ProductPatch {
            price: Some(12.0),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"price":12.0}"#);
        assert!(ProductPatch::default().is_empty());
    }
}
