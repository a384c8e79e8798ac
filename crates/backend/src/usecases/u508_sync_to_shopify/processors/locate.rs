use crate::usecases::u508_sync_to_shopify::graphql_models::{
    FindProductData, FindProductVariables, RemoteProduct, FIND_PRODUCT_BY_SKU,
};
use crate::usecases::u508_sync_to_shopify::shopify_api_client::{
    ShopifyApiClient, ShopifyApiError,
};

/// Найти товар по SKU.
///
/// `None` означает, что товара нет и его нужно создать. Если магазин вернул
/// несколько совпадений, берётся первое: SKU считается уникальным.
pub async fn find_product_by_sku(
    client: &ShopifyApiClient,
    sku: &str,
) -> Result<Option<RemoteProduct>, ShopifyApiError> {
    let variables = FindProductVariables::for_sku(sku);
    let data: FindProductData = client.execute(FIND_PRODUCT_BY_SKU, &variables).await?;

    let found = data.products.first().map(RemoteProduct::from);
    match &found {
        Some(product) => tracing::debug!(
            sku,
            product_id = %product.product_id,
            variant_id = ?product.variant_id,
            "Product found"
        ),
        None => tracing::debug!(sku, "Product not found"),
    }
    Ok(found)
}
