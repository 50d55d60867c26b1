//! Deterministic sample catalog for offline mode and tests.

use crate::model::{Dimensions, Product, ProductId, ProductMeta};

const CATALOG: &[(&str, &str, &str)] = &[
    ("beauty", "Essence", "Mascara Lash Princess"),
    ("fragrances", "Chanel", "Coco Noir Eau De"),
    ("furniture", "Annibale Colombo", "Bedside Table"),
    ("groceries", "Fresh Farms", "Green Apples"),
    ("home-decoration", "Lumen", "Desk Lamp"),
    ("kitchen-accessories", "Chef Pro", "Bamboo Spatula"),
    ("laptops", "Apple", "MacBook Pro 14"),
    ("smartphones", "Samsung", "Galaxy S10"),
    ("sports-accessories", "Wilson", "Tennis Racket"),
    ("sunglasses", "Ray-Ban", "Aviator Classic"),
];

const SHIPPING: &[&str] = &[
    "Ships in 1-2 business days",
    "Ships overnight",
    "Ships in 1 week",
    "Ships in 1 month",
];

/// Builds `count` products with ids `1..=count`.
///
/// Values vary with the id so that sorting and badge colouring have something to show: stock
/// runs 0..=99 and rating 1.0..=5.0.
pub fn sample_products(count: u32) -> Vec<Product> {
    (1..=count).map(sample).collect()
}

fn sample(id: u32) -> Product {
    let index = (id as usize - 1) % CATALOG.len();
    let (category, brand, name) = CATALOG[index];
    let stock = (id * 37) % 100;
    let availability = match stock {
        0 => "Out of Stock",
        1..=10 => "Low Stock",
        _ => "In Stock",
    };
    let day = 1 + (id % 28);
    let stamp = format!("2024-05-{day:02}T08:56:21.618Z");

    Product {
        id: ProductId(id),
        title: format!("{brand} {name} #{id}"),
        description: format!("{name} from {brand}."),
        category: category.to_string(),
        price: f64::from(5 + (id * 13) % 995) - 0.01,
        discount_percentage: f64::from((id * 7) % 20) + 0.5,
        rating: 1.0 + f64::from((id * 11) % 41) / 10.0,
        stock,
        tags: vec![category.to_string(), brand.to_lowercase()],
        brand: brand.to_string(),
        sku: format!("SKU-{id:05}"),
        weight: f64::from(1 + id % 9),
        dimensions: Dimensions {
            width: 10.0 + f64::from(id % 20),
            height: 5.0 + f64::from(id % 15),
            depth: 2.0 + f64::from(id % 10),
        },
        warranty_information: format!("{} year warranty", 1 + id % 3),
        shipping_information: SHIPPING[id as usize % SHIPPING.len()].to_string(),
        availability_status: availability.to_string(),
        return_policy: "30 days return policy".to_string(),
        minimum_order_quantity: 1 + id % 10,
        meta: ProductMeta {
            created_at: stamp.clone(),
            updated_at: stamp,
            barcode: format!("{:013}", 4_006_381_333_931u64 + u64::from(id)),
            qr_code: String::new(),
        },
        images: Vec::new(),
        thumbnail: format!("https://cdn.example.com/products/{id}/thumbnail.png"),
    }
}
