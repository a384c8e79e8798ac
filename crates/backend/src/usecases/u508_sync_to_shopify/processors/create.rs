use super::{update::update_variant, RowError};
use crate::usecases::u508_sync_to_shopify::graphql_models::{
    CreateMediaInput, ProductCreateData, ProductCreateVariables, ProductInput, RemoteProduct,
    PRODUCT_CREATE,
};
use crate::usecases::u508_sync_to_shopify::shopify_api_client::{
    ShopifyApiClient, ShopifyApiError,
};
use contracts::usecases::u508_sync_to_shopify::ProductRecord;

/// Создать товар из строки.
///
/// Картинка уходит в той же мутации. Цена и SKU ставятся вторым запросом на
/// автоматически созданный первый вариант: `ProductInput` полей варианта не
/// принимает. Ошибка любого из двух запросов проваливает строку.
pub async fn create_product(
    client: &ShopifyApiClient,
    record: &ProductRecord,
) -> Result<RemoteProduct, RowError> {
    let media = record
        .image_url
        .as_deref()
        .map(|url| vec![CreateMediaInput::image(url)]);

    let variables = ProductCreateVariables {
        input: ProductInput::from_record(record, None),
        media,
    };
    let data: ProductCreateData = client.execute(PRODUCT_CREATE, &variables).await?;

    let product = data.product_create.product.ok_or_else(|| {
        ShopifyApiError::Decode("productCreate returned no product".to_string())
    })?;
    let remote = RemoteProduct::from(&product);
    tracing::debug!(sku = %record.sku, product_id = %remote.product_id, "Product created");

    match &remote.variant_id {
        Some(variant_id) => {
            update_variant(client, &remote.product_id, variant_id, record).await?;
        }
        None => tracing::debug!(
            sku = %record.sku,
            product_id = %remote.product_id,
            "Created product has no variants, price update skipped"
        ),
    }

    Ok(remote)
}
