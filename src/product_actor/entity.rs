//! Entity trait implementation for the Product domain type.
//!
//! This module contains the [`Entity`] trait implementation that lets [`Product`] be served by
//! the generic [`ResourceActor`](catalog_framework::ResourceActor) and fetched through any
//! [`RemoteCollection`](catalog_framework::RemoteCollection).
//!
//! The actor applies the same rules the remote API does: drafts and patches that would leave a
//! product with an empty title or a negative number are rejected.

use super::error::ProductError;
use crate::model::{Product, ProductDraft, ProductId, ProductMeta, ProductPatch};
use catalog_framework::Entity;
use chrono::{SecondsFormat, Utc};

impl Entity for Product {
    type Id = ProductId;
    type Draft = ProductDraft;
    type Patch = ProductPatch;
    type Error = ProductError;

    fn id(&self) -> &ProductId {
        &self.id
    }

    /// Builds a product from a draft, stamping `meta.createdAt` and `meta.updatedAt`.
    fn from_draft(id: ProductId, draft: ProductDraft) -> Result<Self, ProductError> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut product = Product {
            id,
            meta: ProductMeta {
                created_at: now.clone(),
                updated_at: now,
                ..Default::default()
            },
            ..Default::default()
        };
        product.merge(ProductPatch::from(draft));
        product.check()?;
        Ok(product)
    }

    /// Shallow merge. The update is all-or-nothing: on error `self` is untouched.
    fn apply_patch(&mut self, patch: ProductPatch) -> Result<(), ProductError> {
        let mut updated = self.clone();
        updated.merge(patch);
        updated.check()?;
        *self = updated;
        Ok(())
    }

    fn to_patch(&self) -> ProductPatch {
        let p = self.clone();
        ProductPatch {
            title: Some(p.title),
            description: Some(p.description),
            category: Some(p.category),
            price: Some(p.price),
            discount_percentage: Some(p.discount_percentage),
            rating: Some(p.rating),
            stock: Some(p.stock),
            tags: Some(p.tags),
            brand: Some(p.brand),
            sku: Some(p.sku),
            weight: Some(p.weight),
            dimensions: Some(p.dimensions),
            warranty_information: Some(p.warranty_information),
            shipping_information: Some(p.shipping_information),
            availability_status: Some(p.availability_status),
            return_policy: Some(p.return_policy),
            minimum_order_quantity: Some(p.minimum_order_quantity),
            meta: Some(p.meta),
            images: Some(p.images),
            thumbnail: Some(p.thumbnail),
        }
    }
}

impl Product {
    fn check(&self) -> Result<(), ProductError> {
        if self.title.trim().is_empty() {
            return Err(ProductError::MissingField("title"));
        }
        let numbers = [
            ("price", self.price),
            ("discountPercentage", self.discount_percentage),
            ("rating", self.rating),
            ("weight", self.weight),
            ("dimensions.width", self.dimensions.width),
            ("dimensions.height", self.dimensions.height),
            ("dimensions.depth", self.dimensions.depth),
        ];
        for (field, value) in numbers {
            if !value.is_finite() || value < 0.0 {
                return Err(ProductError::InvalidNumber { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            title: "Desk Lamp".into(),
            description: "Warm light".into(),
            category: "home-decoration".into(),
            price: 24.5,
            brand: "Lumen".into(),
            sku: "LMP-1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn from_draft_stamps_meta() {
        let product = Product::from_draft(ProductId(195), draft()).unwrap();
        assert_eq!(product.id, ProductId(195));
        assert_eq!(product.title, "Desk Lamp");
        assert!(!product.meta.created_at.is_empty());
        assert_eq!(product.meta.created_at, product.meta.updated_at);
    }

    #[test]
    fn from_draft_rejects_negative_price() {
        let mut bad = draft();
        bad.price = -1.0;
        assert_eq!(
            Product::from_draft(ProductId(1), bad).unwrap_err(),
            ProductError::InvalidNumber { field: "price", value: -1.0 }
        );
    }

    #[test]
    fn failed_patch_leaves_product_untouched() {
        let mut product = Product::from_draft(ProductId(1), draft()).unwrap();
        let err = product
            .apply_patch(ProductPatch {
                title: Some("  ".into()),
                price: Some(3.0),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err, ProductError::MissingField("title"));
        assert_eq!(product.price, 24.5);
    }

    #[test]
    fn to_patch_round_trips_through_merge() {
        let product = Product::from_draft(ProductId(1), draft()).unwrap();
        let mut blank = Product::default();
        blank.id = product.id;
        blank.merge(product.to_patch());
        assert_eq!(blank, product);
    }
}
