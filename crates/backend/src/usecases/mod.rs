pub mod u508_sync_to_shopify;
