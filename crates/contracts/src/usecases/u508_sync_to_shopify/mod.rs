pub mod progress;
pub mod request;
pub mod row;

pub use progress::{RowOutcome, RowStatus, SyncProgress, SyncReport, SyncStatus};
pub use request::SyncRequest;
pub use row::{ProductRecord, ProductRow, RowValidationError};

use crate::usecases::common::UseCaseMetadata;

pub struct SyncToShopify;

impl UseCaseMetadata for SyncToShopify {
    fn usecase_index() -> &'static str {
        "u508"
    }

    fn usecase_name() -> &'static str {
        "sync_to_shopify"
    }

    fn display_name() -> &'static str {
        "Product catalog sync"
    }

    fn description() -> &'static str {
        "Upsert spreadsheet rows into Shopify by SKU"
    }
}
