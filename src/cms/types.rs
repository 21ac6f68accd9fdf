// CMS response types.
// Defines the catalog entities, global content envelope, and pagination model.

use std::fmt;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::error::{CmsError, Result};

/// Product price as the CMS stores it, either preformatted text or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Amount(f64),
    Text(String),
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Amount(amount) if amount.fract() == 0.0 => write!(f, "{:.0}", amount),
            Price::Amount(amount) => write!(f, "{}", amount),
            Price::Text(text) => f.write_str(text),
        }
    }
}

/// Uploaded media reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// A catalog entry (smartphone, application, vending machine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub image: Option<Media>,
}

impl Product {
    /// Image URL, if the product has one.
    pub fn image_url(&self) -> Option<&str> {
        self.image.as_ref().and_then(|m| m.url.as_deref())
    }
}

/// Page-scoped content blob fetched by slug.
///
/// The field set differs per page, so only the top-level shape is checked.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalContent {
    pub slug: String,
    pub fields: Map<String, Value>,
}

impl GlobalContent {
    /// Validate that `value` is a JSON object.
    pub fn from_value(slug: &str, value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self {
                slug: slug.to_string(),
                fields,
            }),
            other => Err(CmsError::shape(
                format!("/globals/{}", slug),
                format!("expected an object, got {}", json_kind(&other)),
            )),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// A string field, if present and a string.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Decode the whole blob into a page-specific type.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.fields.clone()))?)
    }
}

/// Collection envelope exactly as the CMS returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionEnvelope<T> {
    pub docs: Vec<T>,
    #[serde(default)]
    pub total_docs: u64,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub page: Option<u32>,
}

/// One page of a collection with navigation metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationResponse<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub items_per_page: u32,
    pub total_pages: u32,
    pub current_page: u32,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
}

impl<T: DeserializeOwned> PaginationResponse<T> {
    /// Validate and normalise a raw collection response.
    ///
    /// Navigation flags are derived from `page` and `totalPages` rather than
    /// trusted from the payload.
    pub fn from_value(endpoint: &str, value: Value) -> Result<Self> {
        match value.get("docs") {
            Some(Value::Array(_)) => {}
            Some(other) => {
                return Err(CmsError::shape(
                    endpoint,
                    format!("`docs` is {}, expected an array", json_kind(other)),
                ));
            }
            None => return Err(CmsError::shape(endpoint, "missing `docs` array")),
        }

        let envelope: CollectionEnvelope<T> = serde_json::from_value(value)?;
        let current_page = envelope.page.unwrap_or(1);

        if envelope.total_docs > 0 && (current_page < 1 || current_page > envelope.total_pages) {
            return Err(CmsError::shape(
                endpoint,
                format!(
                    "page {} outside 1..={}",
                    current_page, envelope.total_pages
                ),
            ));
        }

        let has_prev_page = current_page > 1;
        let has_next_page = current_page < envelope.total_pages;

        Ok(Self {
            items: envelope.docs,
            total_items: envelope.total_docs,
            items_per_page: envelope.limit,
            total_pages: envelope.total_pages,
            current_page,
            has_prev_page,
            has_next_page,
            prev_page: has_prev_page.then(|| current_page - 1),
            next_page: has_next_page.then(|| current_page + 1),
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::mock::collection_page;
    use serde_json::json;

    #[test]
    fn test_product_accepts_legacy_id_and_numeric_price() {
        let product: Product = serde_json::from_value(json!({
            "_id": "phone1",
            "name": "iPhone 15 Pro",
            "price": 750000,
            "description": "Smartphone haut de gamme",
            "image": {"url": null}
        }))
        .unwrap();

        assert_eq!(product.id, "phone1");
        assert_eq!(product.price.as_ref().unwrap().to_string(), "750000");
        assert_eq!(product.image_url(), None);
    }

    #[test]
    fn test_product_text_price() {
        let product: Product = serde_json::from_value(json!({
            "id": "app1",
            "name": "Capcut",
            "price": "5 000",
            "image": {"url": "/media/capcut.png", "alt": "Capcut"}
        }))
        .unwrap();

        assert_eq!(product.price, Some(Price::Text("5 000".to_string())));
        assert_eq!(product.image_url(), Some("/media/capcut.png"));
        assert!(product.description.is_empty());
    }

    #[test]
    fn test_global_requires_object() {
        let content = GlobalContent::from_value("homepage", json!({"heroTitle": "Bertini"})).unwrap();
        assert_eq!(content.text("heroTitle"), Some("Bertini"));
        assert_eq!(content.text("missing"), None);

        let err = GlobalContent::from_value("homepage", json!([1, 2])).unwrap_err();
        assert!(matches!(err, CmsError::InvalidResponseShape { .. }));
    }

    #[test]
    fn test_global_deserialize() {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Hero {
            hero_title: String,
        }

        let content = GlobalContent::from_value("homepage", json!({"heroTitle": "Bertini"})).unwrap();
        let hero: Hero = content.deserialize().unwrap();
        assert_eq!(hero.hero_title, "Bertini");
    }

    #[test]
    fn test_pagination_from_envelope() {
        let page: PaginationResponse<Product> =
            PaginationResponse::from_value("/smartphones", collection_page("phone", 6, 1, 2)).unwrap();

        assert_eq!(page.items.len(), 6);
        assert_eq!(page.total_items, 12);
        assert_eq!(page.items_per_page, 6);
        assert_eq!(page.current_page, 1);
        assert!(page.has_next_page);
        assert!(!page.has_prev_page);
        assert_eq!(page.next_page, Some(2));
        assert_eq!(page.prev_page, None);
    }

    #[test]
    fn test_pagination_last_page() {
        let page: PaginationResponse<Product> =
            PaginationResponse::from_value("/smartphones", collection_page("phone", 6, 2, 2)).unwrap();

        assert!(!page.has_next_page);
        assert!(page.has_prev_page);
        assert_eq!(page.prev_page, Some(1));
    }

    #[test]
    fn test_pagination_missing_docs() {
        let err = PaginationResponse::<Product>::from_value("/smartphones", json!({"totalDocs": 3}))
            .unwrap_err();
        assert!(matches!(err, CmsError::InvalidResponseShape { .. }));

        let err = PaginationResponse::<Product>::from_value("/smartphones", json!({"docs": {}}))
            .unwrap_err();
        assert!(matches!(err, CmsError::InvalidResponseShape { .. }));
    }

    #[test]
    fn test_pagination_page_out_of_range() {
        let err = PaginationResponse::<Product>::from_value(
            "/smartphones",
            json!({"docs": [], "totalDocs": 4, "totalPages": 1, "page": 3}),
        )
        .unwrap_err();
        assert!(matches!(err, CmsError::InvalidResponseShape { .. }));
    }

    #[test]
    fn test_pagination_empty_collection() {
        let page = PaginationResponse::<Product>::from_value(
            "/applications",
            json!({"docs": [], "totalDocs": 0, "limit": 8, "totalPages": 0, "page": 1}),
        )
        .unwrap();

        assert!(page.items.is_empty());
        assert!(!page.has_next_page);
        assert!(!page.has_prev_page);
    }
}
