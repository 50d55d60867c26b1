//! Field values of the product form and the rules that turn them into a [`ProductDraft`].
//!
//! Required text fields must contain something other than whitespace; every number must be
//! finite and non-negative; counts must also be whole. Violations are collected per field so
//! they can be shown next to the offending input. Nothing here touches the network.

use crate::model::{Dimensions, Product, ProductDraft};
use std::collections::BTreeMap;
use std::fmt;

/// Per-field validation messages, keyed by the wire field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &String)> {
        self.fields
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| (*field, m)))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(field, m)| format!("{field}: {m}")).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw values of the add/edit product form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFormValues {
    pub title: String,
    pub description: String,
    pub category: String,
    pub brand: String,
    pub sku: String,
    pub price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: f64,
    pub weight: f64,
    pub dimensions: Dimensions,
    pub minimum_order_quantity: f64,
    pub warranty_information: String,
    pub shipping_information: String,
    pub availability_status: String,
    pub return_policy: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub thumbnail: String,
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl ProductFormValues {
    /// Pre-fills the edit form from an existing product.
    pub fn from_product(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            sku: product.sku.clone(),
            price: product.price,
            discount_percentage: product.discount_percentage,
            rating: product.rating,
            stock: f64::from(product.stock),
            weight: product.weight,
            dimensions: product.dimensions,
            minimum_order_quantity: f64::from(product.minimum_order_quantity),
            warranty_information: product.warranty_information.clone(),
            shipping_information: product.shipping_information.clone(),
            availability_status: product.availability_status.clone(),
            return_policy: product.return_policy.clone(),
            tags: product.tags.clone(),
            images: product.images.clone(),
            thumbnail: product.thumbnail.clone(),
        }
    }

    /// Sets one field from text input, e.g. `("price", "12.5")` or `("tags", "a, b")`.
    ///
    /// Field names are the wire names (`discountPercentage`, `dimensions.width`, ...).
    pub fn assign(&mut self, field: &str, raw: &str) -> Result<(), ValidationErrors> {
        let number = |name: &'static str| -> Result<f64, ValidationErrors> {
            raw.trim().parse::<f64>().map_err(|_| {
                let mut errors = ValidationErrors::new();
                errors.add(name, format!("{raw:?} is not a number"));
                errors
            })
        };
        let list = || -> Vec<String> {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        };
        match field {
            "title" => self.title = raw.to_string(),
            "description" => self.description = raw.to_string(),
            "category" => self.category = raw.to_string(),
            "brand" => self.brand = raw.to_string(),
            "sku" => self.sku = raw.to_string(),
            "price" => self.price = number("price")?,
            "discountPercentage" => self.discount_percentage = number("discountPercentage")?,
            "rating" => self.rating = number("rating")?,
            "stock" => self.stock = number("stock")?,
            "weight" => self.weight = number("weight")?,
            "dimensions.width" => self.dimensions.width = number("dimensions.width")?,
            "dimensions.height" => self.dimensions.height = number("dimensions.height")?,
            "dimensions.depth" => self.dimensions.depth = number("dimensions.depth")?,
            "minimumOrderQuantity" => {
                self.minimum_order_quantity = number("minimumOrderQuantity")?
            }
            "warrantyInformation" => self.warranty_information = raw.to_string(),
            "shippingInformation" => self.shipping_information = raw.to_string(),
            "availabilityStatus" => self.availability_status = raw.to_string(),
            "returnPolicy" => self.return_policy = raw.to_string(),
            "tags" => self.tags = list(),
            "images" => self.images = list(),
            "thumbnail" => self.thumbnail = raw.to_string(),
            _ => {
                let mut errors = ValidationErrors::new();
                errors.add("form", format!("unknown field {field:?}"));
                return Err(errors);
            }
        }
        Ok(())
    }

    /// Checks every rule and builds the draft, or reports every violation.
    pub fn validate(&self) -> Result<ProductDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let required = [
            ("title", &self.title),
            ("description", &self.description),
            ("category", &self.category),
            ("brand", &self.brand),
            ("sku", &self.sku),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.add(field, "is required");
            }
        }

        let numbers = [
            ("price", self.price),
            ("discountPercentage", self.discount_percentage),
            ("rating", self.rating),
            ("stock", self.stock),
            ("weight", self.weight),
            ("dimensions.width", self.dimensions.width),
            ("dimensions.height", self.dimensions.height),
            ("dimensions.depth", self.dimensions.depth),
            ("minimumOrderQuantity", self.minimum_order_quantity),
        ];
        for (field, value) in numbers {
            if !value.is_finite() {
                errors.add(field, "must be a number");
            } else if value < 0.0 {
                errors.add(field, "must be at least 0");
            }
        }
        let count = |field: &'static str, value: f64, errors: &mut ValidationErrors| -> u32 {
            if value.is_finite() && value >= 0.0 {
                if value.fract() != 0.0 || value > f64::from(u32::MAX) {
                    errors.add(field, "must be a whole number");
                } else {
                    return value as u32;
                }
            }
            0
        };
        let stock = count("stock", self.stock, &mut errors);
        let minimum_order_quantity = count(
            "minimumOrderQuantity",
            self.minimum_order_quantity,
            &mut errors,
        );

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ProductDraft {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            price: self.price,
            discount_percentage: self.discount_percentage,
            rating: self.rating,
            stock,
            tags: self.tags.clone(),
            brand: self.brand.trim().to_string(),
            sku: self.sku.trim().to_string(),
            weight: self.weight,
            dimensions: self.dimensions,
            warranty_information: optional(&self.warranty_information),
            shipping_information: optional(&self.shipping_information),
            availability_status: optional(&self.availability_status),
            return_policy: optional(&self.return_policy),
            minimum_order_quantity,
            images: self.images.clone(),
            thumbnail: optional(&self.thumbnail),
        })
    }
}
