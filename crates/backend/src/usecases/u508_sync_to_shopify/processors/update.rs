use super::{ImageStatus, RowError};
use crate::usecases::u508_sync_to_shopify::graphql_models::{
    CreateMediaData, CreateMediaInput, CreateMediaVariables, InventoryItemInput, ProductInput,
    ProductUpdateData, ProductUpdateVariables, RemoteProduct, VariantInput,
    VariantsBulkUpdateData, VariantsBulkUpdateVariables, PRODUCT_CREATE_MEDIA, PRODUCT_UPDATE,
    PRODUCT_VARIANTS_BULK_UPDATE,
};
use crate::usecases::u508_sync_to_shopify::shopify_api_client::{
    ShopifyApiClient, ShopifyApiError,
};
use contracts::usecases::u508_sync_to_shopify::ProductRecord;

/// Обновить существующий товар.
///
/// 1. поля товара (ошибка прерывает строку)
/// 2. цена и SKU первого варианта, если вариант есть (ошибка прерывает строку)
/// 3. картинка, если есть `imageUrl` (ошибка только логируется)
pub async fn update_product(
    client: &ShopifyApiClient,
    remote: &RemoteProduct,
    record: &ProductRecord,
) -> Result<ImageStatus, RowError> {
    let variables = ProductUpdateVariables {
        input: ProductInput::from_record(record, Some(remote.product_id.clone())),
    };
    let data: ProductUpdateData = client.execute(PRODUCT_UPDATE, &variables).await?;
    tracing::debug!(
        sku = %record.sku,
        product_id = ?data.product_update.product.map(|p| p.id),
        "Product fields updated"
    );

    match &remote.variant_id {
        Some(variant_id) => {
            update_variant(client, &remote.product_id, variant_id, record).await?;
        }
        None => tracing::debug!(
            sku = %record.sku,
            product_id = %remote.product_id,
            "Product has no variants, price update skipped"
        ),
    }

    let Some(image_url) = record.image_url.as_deref() else {
        return Ok(ImageStatus::NotRequested);
    };

    match add_image_to_product(client, &remote.product_id, image_url).await {
        Ok(()) => Ok(ImageStatus::Attached),
        Err(e) => {
            tracing::warn!(
                sku = %record.sku,
                product_id = %remote.product_id,
                "Failed to add image: {}",
                e
            );
            Ok(ImageStatus::Failed(e.to_string()))
        }
    }
}

/// Поставить цену и SKU варианту
pub async fn update_variant(
    client: &ShopifyApiClient,
    product_id: &str,
    variant_id: &str,
    record: &ProductRecord,
) -> Result<(), RowError> {
    let price = record
        .normalized_price()
        .ok_or_else(|| RowError::InvalidPrice(record.price.clone()))?;

    let variables = VariantsBulkUpdateVariables {
        product_id: product_id.to_string(),
        variants: vec![VariantInput {
            id: variant_id.to_string(),
            price,
            inventory_item: InventoryItemInput {
                sku: record.sku.clone(),
            },
        }],
    };
    let data: VariantsBulkUpdateData = client
        .execute(PRODUCT_VARIANTS_BULK_UPDATE, &variables)
        .await?;
    tracing::debug!(
        sku = %record.sku,
        product_id = ?data.product_variants_bulk_update.product.map(|p| p.id),
        variant_id,
        "Variant price updated"
    );
    Ok(())
}

/// Добавить картинку к существующему товару
pub async fn add_image_to_product(
    client: &ShopifyApiClient,
    product_id: &str,
    image_url: &str,
) -> Result<(), ShopifyApiError> {
    let variables = CreateMediaVariables {
        product_id: product_id.to_string(),
        media: vec![CreateMediaInput::image(image_url)],
    };
    let data: CreateMediaData = client.execute(PRODUCT_CREATE_MEDIA, &variables).await?;

    let statuses: Vec<String> = data
        .product_create_media
        .media
        .unwrap_or_default()
        .into_iter()
        .filter_map(|m| m.status)
        .collect();
    tracing::debug!(product_id, ?statuses, "Image added");
    Ok(())
}
