//! In-memory Shopify for engine tests: keeps products and variants, records
//! every operation, and can fail a chosen operation once.

use super::graphql_models::GraphqlRequest;
use super::shopify_api_client::{GraphqlTransport, ShopifyApiError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct FakeProduct {
    pub id: String,
    pub title: String,
    pub description_html: Option<String>,
    pub product_type: Option<String>,
    pub vendor: Option<String>,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub variant: Option<FakeVariant>,
    /// SKU, по которому товар находится поиском
    pub search_sku: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FakeVariant {
    pub id: String,
    pub price: Option<String>,
    pub sku: Option<String>,
}

#[derive(Default)]
struct FakeState {
    products: Vec<FakeProduct>,
    next_id: usize,
    calls: Vec<(String, Value)>,
    failures: HashMap<String, Value>,
    /// `productCreate` возвращает товар без вариантов
    create_without_variant: bool,
}

#[derive(Default)]
pub struct FakeShopify {
    state: Mutex<FakeState>,
}

impl FakeShopify {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Имена операций в порядке вызова
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.iter().map(|(op, _)| op.clone()).collect()
    }

    pub fn variables_of(&self, operation: &str) -> Vec<Value> {
        self.state()
            .calls
            .iter()
            .filter(|(op, _)| op == operation)
            .map(|(_, vars)| vars.clone())
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub fn product_count(&self) -> usize {
        self.state().products.len()
    }

    pub fn product_snapshot(&self, sku: &str) -> Option<FakeProduct> {
        self.state()
            .products
            .iter()
            .find(|p| p.search_sku.as_deref() == Some(sku))
            .cloned()
    }

    pub fn image_count(&self, sku: &str) -> usize {
        self.product_snapshot(sku).map(|p| p.images.len()).unwrap_or(0)
    }

    /// Существующий товар, находимый по SKU; при `with_variant = false` товар без вариантов
    pub fn seed_product(&self, sku: &str, with_variant: bool) {
        let mut state = self.state();
        state.next_id += 1;
        let n = state.next_id;
        state.products.push(FakeProduct {
            id: format!("gid://shopify/Product/{}", n),
            title: "Seeded".to_string(),
            description_html: None,
            product_type: None,
            vendor: None,
            tags: Vec::new(),
            images: Vec::new(),
            variant: with_variant.then(|| FakeVariant {
                id: format!("gid://shopify/ProductVariant/{}", n),
                price: Some("1".to_string()),
                sku: Some(sku.to_string()),
            }),
            search_sku: Some(sku.to_string()),
        });
    }

    pub fn create_products_without_variant(&self) {
        self.state().create_without_variant = true;
    }

    pub fn fail_with_user_error(&self, operation: &str, field: &str, message: &str) {
        self.state().failures.insert(
            operation.to_string(),
            json!({"data": {operation: {
                "product": null,
                "userErrors": [{"field": [field], "message": message}]
            }}}),
        );
    }

    pub fn fail_with_media_error(&self, operation: &str, message: &str) {
        self.state().failures.insert(
            operation.to_string(),
            json!({"data": {operation: {
                "media": [],
                "mediaUserErrors": [{"field": null, "message": message}]
            }}}),
        );
    }

    pub fn fail_with_top_level_error(&self, operation: &str, message: &str) {
        self.state().failures.insert(
            operation.to_string(),
            json!({"errors": [{"message": message}], "data": null}),
        );
    }
}

/// `query findProductBySku(...)` -> `findProductBySku`
fn operation_name(query: &str) -> String {
    let trimmed = query.trim_start();
    let rest = trimmed
        .strip_prefix("mutation")
        .or_else(|| trimmed.strip_prefix("query"))
        .unwrap_or(trimmed)
        .trim_start();
    rest.split(|c: char| c == '(' || c == '{' || c.is_whitespace())
        .next()
        .unwrap_or_default()
        .to_string()
}

fn product_json(product: &FakeProduct) -> Value {
    let edges: Vec<Value> = product
        .variant
        .iter()
        .map(|v| json!({"node": {"id": v.id}}))
        .collect();
    json!({"id": product.id, "title": product.title, "variants": {"edges": edges}})
}

fn opt_str(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(String::from)
}

fn apply_input(product: &mut FakeProduct, input: &Value) {
    if let Some(title) = opt_str(input, "title") {
        product.title = title;
    }
    product.description_html = opt_str(input, "descriptionHtml").or(product.description_html.take());
    product.product_type = opt_str(input, "productType").or(product.product_type.take());
    product.vendor = opt_str(input, "vendor").or(product.vendor.take());
    if let Some(tags) = input.get("tags").and_then(Value::as_array) {
        product.tags = tags.iter().filter_map(Value::as_str).map(String::from).collect();
    }
}

fn media_urls(vars: &Value) -> Vec<String> {
    vars.get("media")
        .and_then(Value::as_array)
        .map(|media| {
            media
                .iter()
                .filter_map(|m| opt_str(m, "originalSource"))
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl GraphqlTransport for FakeShopify {
    async fn post(&self, request: &GraphqlRequest) -> Result<Value, ShopifyApiError> {
        let operation = operation_name(&request.query);
        let vars = request.variables.clone();
        let mut state = self.state();
        state.calls.push((operation.clone(), vars.clone()));

        if let Some(failure) = state.failures.remove(&operation) {
            return Ok(failure);
        }

        let response = match operation.as_str() {
            "findProductBySku" => {
                let query = opt_str(&vars, "query").unwrap_or_default();
                let sku = query.trim_start_matches("sku:").trim_matches('"');
                let edges: Vec<Value> = state
                    .products
                    .iter()
                    .filter(|p| p.search_sku.as_deref() == Some(sku))
                    .map(|p| json!({"node": product_json(p)}))
                    .collect();
                json!({"data": {"products": {"edges": edges}}})
            }
            "productCreate" => {
                state.next_id += 1;
                let n = state.next_id;
                let with_variant = !state.create_without_variant;
                let mut product = FakeProduct {
                    id: format!("gid://shopify/Product/{}", n),
                    title: String::new(),
                    description_html: None,
                    product_type: None,
                    vendor: None,
                    tags: Vec::new(),
                    images: media_urls(&vars),
                    variant: with_variant.then(|| FakeVariant {
                        id: format!("gid://shopify/ProductVariant/{}", n),
                        price: None,
                        sku: None,
                    }),
                    search_sku: None,
                };
                apply_input(&mut product, &vars["input"]);
                let body = product_json(&product);
                state.products.push(product);
                json!({"data": {"productCreate": {"product": body, "userErrors": []}}})
            }
            "productUpdate" => {
                let id = opt_str(&vars["input"], "id").unwrap_or_default();
                match state.products.iter_mut().find(|p| p.id == id) {
                    Some(product) => {
                        apply_input(product, &vars["input"]);
                        json!({"data": {"productUpdate": {"product": {"id": id}, "userErrors": []}}})
                    }
                    None => json!({"data": {"productUpdate": {
                        "product": null,
                        "userErrors": [{"field": ["id"], "message": "Product does not exist"}]
                    }}}),
                }
            }
            "productVariantsBulkUpdate" => {
                let product_id = opt_str(&vars, "productId").unwrap_or_default();
                let input = vars["variants"][0].clone();
                let product = state.products.iter_mut().find(|p| p.id == product_id);
                match product {
                    Some(product) => {
                        let sku = opt_str(&input["inventoryItem"], "sku");
                        if let Some(variant) = product.variant.as_mut() {
                            variant.price = opt_str(&input, "price");
                            variant.sku = sku.clone();
                        }
                        product.search_sku = sku;
                        json!({"data": {"productVariantsBulkUpdate": {
                            "product": {"id": product_id},
                            "userErrors": []
                        }}})
                    }
                    None => json!({"data": {"productVariantsBulkUpdate": {
                        "product": null,
                        "userErrors": [{"field": ["productId"], "message": "Product does not exist"}]
                    }}}),
                }
            }
            "productCreateMedia" => {
                let product_id = opt_str(&vars, "productId").unwrap_or_default();
                let urls = media_urls(&vars);
                if let Some(product) = state.products.iter_mut().find(|p| p.id == product_id) {
                    product.images.extend(urls);
                }
                json!({"data": {"productCreateMedia": {
                    "media": [{"status": "UPLOADED"}],
                    "mediaUserErrors": []
                }}})
            }
            other => {
                return Err(ShopifyApiError::Transport(format!(
                    "unknown operation {}",
                    other
                )))
            }
        };

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_name() {
        assert_eq!(
            operation_name("\nquery findProductBySku($query: String!) {"),
            "findProductBySku"
        );
        assert_eq!(
            operation_name("mutation productCreate($input: ProductInput!) {"),
            "productCreate"
        );
    }
}
