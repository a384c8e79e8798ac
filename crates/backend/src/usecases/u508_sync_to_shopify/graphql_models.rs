//! Тексты запросов Shopify Admin GraphQL API и типизированные
//! переменные/ответы для каждой операции.

use contracts::usecases::u508_sync_to_shopify::ProductRecord;
use serde::{Deserialize, Serialize};

// ============================================================================
// Operations
// ============================================================================

pub const FIND_PRODUCT_BY_SKU: &str = r#"
query findProductBySku($query: String!) {
  products(first: 1, query: $query) {
    edges {
      node {
        id
        variants(first: 1) {
          edges {
            node {
              id
            }
          }
        }
      }
    }
  }
}"#;

pub const PRODUCT_CREATE: &str = r#"
mutation productCreate($input: ProductInput!, $media: [CreateMediaInput!]) {
  productCreate(input: $input, media: $media) {
    product {
      id
      title
      variants(first: 1) {
        edges {
          node {
            id
          }
        }
      }
    }
    userErrors {
      field
      message
    }
  }
}"#;

pub const PRODUCT_UPDATE: &str = r#"
mutation productUpdate($input: ProductInput!) {
  productUpdate(input: $input) {
    product {
      id
    }
    userErrors {
      field
      message
    }
  }
}"#;

pub const PRODUCT_VARIANTS_BULK_UPDATE: &str = r#"
mutation productVariantsBulkUpdate($productId: ID!, $variants: [ProductVariantsBulkInput!]!) {
  productVariantsBulkUpdate(productId: $productId, variants: $variants) {
    product {
      id
    }
    userErrors {
      field
      message
    }
  }
}"#;

pub const PRODUCT_CREATE_MEDIA: &str = r#"
mutation productCreateMedia($productId: ID!, $media: [CreateMediaInput!]!) {
  productCreateMedia(productId: $productId, media: $media) {
    media {
      status
    }
    mediaUserErrors {
      field
      message
    }
  }
}"#;

// ============================================================================
// Envelope
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: serde_json::Value,
}

/// Ошибка валидации из `userErrors` / `mediaUserErrors`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(path) if !path.is_empty() => write!(f, "{}: {}", path.join("."), self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

// ============================================================================
// Shared shapes
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

impl<T> Connection<T> {
    pub fn first(&self) -> Option<&T> {
        self.edges.first().map(|edge| &edge.node)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdNode {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductNode {
    pub id: String,
    #[serde(default)]
    pub variants: Option<Connection<IdNode>>,
}

impl ProductNode {
    pub fn first_variant_id(&self) -> Option<String> {
        self.variants
            .as_ref()
            .and_then(|variants| variants.first())
            .map(|variant| variant.id.clone())
    }
}

/// Товар в магазине: id товара и id первого варианта (если есть)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteProduct {
    pub product_id: String,
    pub variant_id: Option<String>,
}

impl From<&ProductNode> for RemoteProduct {
    fn from(node: &ProductNode) -> Self {
        Self {
            product_id: node.id.clone(),
            variant_id: node.first_variant_id(),
        }
    }
}

// ============================================================================
// Inputs
// ============================================================================

/// `ProductInput` общий для создания и обновления; `id` только при обновлении
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    pub tags: Vec<String>,
}

impl ProductInput {
    pub fn from_record(record: &ProductRecord, id: Option<String>) -> Self {
        Self {
            id,
            title: record.title.clone(),
            description_html: record.description.clone(),
            product_type: record.product_type.clone(),
            vendor: record.vendor.clone(),
            tags: record.tags.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMediaInput {
    pub original_source: String,
    pub media_content_type: String,
}

impl CreateMediaInput {
    pub fn image(url: &str) -> Self {
        Self {
            original_source: url.to_string(),
            media_content_type: "IMAGE".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemInput {
    pub sku: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantInput {
    pub id: String,
    /// Цена строкой, как ожидает Admin API (`"19.99"`)
    pub price: String,
    pub inventory_item: InventoryItemInput,
}

// ============================================================================
// Variables
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct FindProductVariables {
    pub query: String,
}

impl FindProductVariables {
    /// Поисковый фильтр `sku:<sku>`; значения с пробелами и спецсимволами в кавычках
    pub fn for_sku(sku: &str) -> Self {
        let needs_quotes = sku
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ':' | '"' | '\'' | '(' | ')' | '\\'));
        let query = if needs_quotes {
            format!("sku:\"{}\"", sku.replace('\\', "\\\\").replace('"', "\\\""))
        } else {
            format!("sku:{}", sku)
        };
        Self { query }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductCreateVariables {
    pub input: ProductInput,
    /// Отсутствие поля и пустой список для API не одно и то же
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<Vec<CreateMediaInput>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductUpdateVariables {
    pub input: ProductInput,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantsBulkUpdateVariables {
    pub product_id: String,
    pub variants: Vec<VariantInput>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMediaVariables {
    pub product_id: String,
    pub media: Vec<CreateMediaInput>,
}

// ============================================================================
// Responses (содержимое `data`)
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct FindProductData {
    pub products: Connection<ProductNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreateData {
    pub product_create: ProductCreatePayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreatePayload {
    pub product: Option<ProductNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdateData {
    pub product_update: ProductMutationPayload,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantsBulkUpdateData {
    pub product_variants_bulk_update: ProductMutationPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductMutationPayload {
    pub product: Option<IdNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMediaData {
    pub product_create_media: CreateMediaPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMediaPayload {
    #[serde(default)]
    pub media: Option<Vec<MediaNode>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaNode {
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> ProductRecord {
        ProductRecord {
            sku: "A1".into(),
            title: "Shirt".into(),
            description: None,
            product_type: Some("Apparel".into()),
            vendor: None,
            tags: vec![],
            price: Some("19.99".into()),
            image_url: None,
        }
    }

    #[test]
    fn test_create_variables_omit_media_and_absent_fields() {
        let vars = ProductCreateVariables {
            input: ProductInput::from_record(&record(), None),
            media: None,
        };
        assert_eq!(
            serde_json::to_value(&vars).unwrap(),
            json!({"input": {"title": "Shirt", "productType": "Apparel", "tags": []}})
        );

        let vars = ProductCreateVariables {
            input: ProductInput::from_record(&record(), None),
            media: Some(vec![CreateMediaInput::image("https://cdn.example.com/a.png")]),
        };
        assert_eq!(
            serde_json::to_value(&vars).unwrap()["media"],
            json!([{"originalSource": "https://cdn.example.com/a.png", "mediaContentType": "IMAGE"}])
        );
    }

    #[test]
    fn test_variant_input_shape() {
        let vars = VariantsBulkUpdateVariables {
            product_id: "gid://shopify/Product/1".into(),
            variants: vec![VariantInput {
                id: "gid://shopify/ProductVariant/7".into(),
                price: "19.99".into(),
                inventory_item: InventoryItemInput { sku: "A1".into() },
            }],
        };
        assert_eq!(
            serde_json::to_value(&vars).unwrap(),
            json!({
                "productId": "gid://shopify/Product/1",
                "variants": [{
                    "id": "gid://shopify/ProductVariant/7",
                    "price": "19.99",
                    "inventoryItem": {"sku": "A1"}
                }]
            })
        );
    }

    #[test]
    fn test_sku_filter_quoting() {
        assert_eq!(FindProductVariables::for_sku("A1").query, "sku:A1");
        assert_eq!(
            FindProductVariables::for_sku("RED SHIRT").query,
            "sku:\"RED SHIRT\""
        );
        assert_eq!(
            FindProductVariables::for_sku("a\"b").query,
            "sku:\"a\\\"b\""
        );
    }

    #[test]
    fn test_product_without_variants() {
        let data: FindProductData = serde_json::from_value(json!({
            "products": {"edges": [{"node": {"id": "gid://shopify/Product/1", "variants": {"edges": []}}}]}
        }))
        .unwrap();
        let remote = RemoteProduct::from(data.products.first().unwrap());
        assert_eq!(remote.product_id, "gid://shopify/Product/1");
        assert_eq!(remote.variant_id, None);
    }

    #[test]
    fn test_user_error_display() {
        let err = UserError {
            field: Some(vec!["variants".into(), "0".into(), "price".into()]),
            message: "is invalid".into(),
        };
        assert_eq!(err.to_string(), "variants.0.price: is invalid");
    }
}
