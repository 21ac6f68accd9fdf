// Placeholder catalog entries.
// Shown in featured sections when the CMS is unreachable or returns a bad shape.

use super::types::{Media, Price, Product};

fn placeholder(id: &str, name: &str, price: &str, description: &str) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        price: Some(Price::Text(price.to_string())),
        description: description.to_string(),
        subtitle: None,
        image: Some(Media::default()),
    }
}

/// Static stand-ins for a collection's featured products.
pub fn placeholder_products(resource: &str) -> Vec<Product> {
    match resource.trim_start_matches('/') {
        "smartphones" => vec![
            placeholder(
                "phone1",
                "iPhone 15 Pro",
                "750 000",
                "Smartphone haut de gamme avec des fonctionnalités avancées.",
            ),
            placeholder(
                "phone2",
                "Galaxy S23 Ultra",
                "650 000",
                "Smartphone Android premium avec un stylet et un appareil photo de qualité professionnelle.",
            ),
        ],
        "applications" => vec![
            placeholder(
                "app1",
                "Filmora Premium",
                "5 000",
                "Application de divertissement premium offrant une expérience utilisateur exceptionnelle.",
            ),
            placeholder(
                "app2",
                "Capcut",
                "5 000",
                "Application innovante pour la productivité et la gestion de projet.",
            ),
        ],
        _ => Vec::new(),
    }
}
