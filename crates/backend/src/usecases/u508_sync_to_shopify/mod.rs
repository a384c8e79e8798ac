pub mod executor;
pub mod graphql_models;
pub mod processors;
pub mod progress_tracker;
pub mod reporter;
pub mod row_source;
pub mod shopify_api_client;

#[cfg(test)]
pub mod test_support;

pub use executor::SyncExecutor;
pub use progress_tracker::ProgressTracker;
pub use shopify_api_client::ShopifyApiClient;
