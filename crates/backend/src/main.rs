pub mod shared;
pub mod system;
pub mod usecases;

use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u508_sync_to_shopify::{SyncRequest, SyncToShopify};
use std::path::PathBuf;
use std::sync::Arc;
use usecases::u508_sync_to_shopify::{
    reporter, row_source, ProgressTracker, ShopifyApiClient, SyncExecutor,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = shared::config::load_config()?;
    let missing = config.shopify.missing_credentials();
    if !missing.is_empty() {
        // Не останавливаемся: каждый запрос упадёт с понятной ошибкой
        tracing::warn!("Shopify credentials are not configured: {}", missing.join(", "));
    }

    // Первый аргумент командной строки перекрывает файл из конфигурации
    let source_file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.sync.source_file.clone());
    let file_path = std::env::current_dir()?.join(PathBuf::from(source_file));

    println!("{}", SyncToShopify::banner());

    if !file_path.exists() {
        eprintln!("Error: File not found at {}", file_path.display());
        tracing::error!("Source file not found: {}", file_path.display());
        return Ok(());
    }

    println!("Reading file: {}...", file_path.display());
    let rows = row_source::open(&file_path)?.read_rows()?;
    println!("Found {} products. Starting import...", rows.len());

    let request = SyncRequest::new(file_path.clone()).with_workers(config.sync.workers);
    let api_client = ShopifyApiClient::new(&config.shopify, &config.sync)?;
    let executor = SyncExecutor::new(
        Arc::new(api_client),
        Arc::new(ProgressTracker::new(uuid::Uuid::new_v4().to_string())),
    );

    let report = executor.run(&request, rows).await;
    reporter::print_summary(&report);
    if report.has_failures() {
        // Код выхода остаётся 0: итог по строкам виден только в выводе и логе
        tracing::warn!("{} row(s) failed", report.progress.failed);
    }

    Ok(())
}
