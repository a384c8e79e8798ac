use super::processors::{create, locate, update, ImageStatus, RowError};
use super::{
    progress_tracker::ProgressTracker, reporter, shopify_api_client::ShopifyApiClient,
};
use contracts::usecases::u508_sync_to_shopify::{
    ProductRecord, ProductRow, RowOutcome, RowStatus, SyncReport, SyncRequest,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

/// Executor для UseCase синхронизации каталога в Shopify
#[derive(Clone)]
pub struct SyncExecutor {
    api_client: Arc<ShopifyApiClient>,
    progress_tracker: Arc<ProgressTracker>,
    print_to_console: bool,
}

/// Чем закончился upsert одной строки
enum UpsertResult {
    Created(String),
    Updated(String, ImageStatus),
}

impl SyncExecutor {
    pub fn new(api_client: Arc<ShopifyApiClient>, progress_tracker: Arc<ProgressTracker>) -> Self {
        Self {
            api_client,
            progress_tracker,
            print_to_console: true,
        }
    }

    /// Без консольного вывода (итоги остаются в отчёте и в логе)
    pub fn quiet(mut self) -> Self {
        self.print_to_console = false;
        self
    }

    /// Обработать все строки. Отчёт содержит итог каждой строки в порядке источника.
    pub async fn run(&self, request: &SyncRequest, rows: Vec<ProductRow>) -> SyncReport {
        let session_id = self.progress_tracker.get_progress().session_id;
        tracing::info!(
            "Starting sync session {}: {} rows, {} worker(s)",
            session_id,
            rows.len(),
            request.workers
        );
        self.progress_tracker.set_total(rows.len());

        let outcomes = if request.is_sequential() {
            self.run_sequential(rows).await
        } else {
            self.run_parallel(rows, request.workers).await
        };

        let progress = self.progress_tracker.complete_session();
        tracing::info!(
            "Sync completed: processed={}, created={}, updated={}, skipped={}, failed={}",
            progress.processed,
            progress.created,
            progress.updated,
            progress.skipped,
            progress.failed
        );

        SyncReport { progress, outcomes }
    }

    async fn run_sequential(&self, rows: Vec<ProductRow>) -> Vec<RowOutcome> {
        let mut outcomes = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            let outcome = self.process_row(index + 1, row).await;
            self.emit(&outcome);
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Строки с одинаковым SKU идут одной очередью, очереди выполняются
    /// параллельно не более чем `workers` штук. Итоги выводятся в порядке источника.
    async fn run_parallel(&self, rows: Vec<ProductRow>, workers: usize) -> Vec<RowOutcome> {
        let total = rows.len();
        let skus: Vec<Option<String>> = rows.iter().map(|r| r.sku.clone()).collect();
        let lanes = build_lanes(rows);
        tracing::debug!("{} rows split into {} lanes", total, lanes.len());

        let semaphore = Arc::new(Semaphore::new(workers.max(1)));
        let (tx, mut rx) = mpsc::unbounded_channel::<(usize, RowOutcome)>();
        let mut tasks = JoinSet::new();

        for lane in lanes {
            let executor = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let tx = tx.clone();
            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                for (index, row) in lane {
                    let outcome = executor.process_row(index + 1, row).await;
                    if tx.send((index, outcome)).is_err() {
                        return;
                    }
                }
            });
        }
        drop(tx);

        let mut outcomes = Vec::with_capacity(total);
        let mut pending: BTreeMap<usize, RowOutcome> = BTreeMap::new();
        while let Some((index, outcome)) = rx.recv().await {
            pending.insert(index, outcome);
            while let Some(outcome) = pending.remove(&outcomes.len()) {
                self.emit(&outcome);
                outcomes.push(outcome);
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Sync worker task failed: {}", e);
            }
        }

        // Строки упавших воркеров
        while outcomes.len() < total {
            let index = outcomes.len();
            let outcome = pending.remove(&index).unwrap_or_else(|| RowOutcome {
                row_number: index + 1,
                sku: skus[index].clone(),
                title: None,
                status: RowStatus::Failed {
                    reason: "Row was not processed: worker task aborted".to_string(),
                },
                warnings: Vec::new(),
                image_added: false,
            });
            self.emit(&outcome);
            outcomes.push(outcome);
        }

        outcomes
    }

    fn emit(&self, outcome: &RowOutcome) {
        self.progress_tracker.record_outcome(outcome);
        if self.print_to_console {
            reporter::print_outcome(outcome);
        }
    }

    /// Обработать одну строку: проверка, поиск по SKU, создание или обновление.
    /// Любая ошибка остаётся внутри строки.
    pub async fn process_row(&self, row_number: usize, row: ProductRow) -> RowOutcome {
        let mut outcome = RowOutcome {
            row_number,
            sku: row.sku.clone(),
            title: row.title.clone(),
            status: RowStatus::Skipped {
                reason: String::new(),
            },
            warnings: Vec::new(),
            image_added: false,
        };

        let payload = row.to_payload_string();
        let record = match row.into_record() {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(
                    row_number,
                    sku = ?outcome.sku,
                    "Skipping row: {} {}",
                    e,
                    payload
                );
                outcome.status = RowStatus::Skipped {
                    reason: format!("{} {}", e, payload),
                };
                return outcome;
            }
        };

        self.progress_tracker
            .set_current_item(Some(record.sku.clone()));

        outcome.status = match self.upsert(&record).await {
            Ok(UpsertResult::Created(product_id)) => {
                tracing::info!(sku = %record.sku, %product_id, "Created: {}", record.title);
                RowStatus::Created { product_id }
            }
            Ok(UpsertResult::Updated(product_id, image)) => {
                match image {
                    ImageStatus::Attached => outcome.image_added = true,
                    ImageStatus::Failed(message) => outcome.warnings.push(message),
                    ImageStatus::NotRequested => {}
                }
                tracing::info!(sku = %record.sku, %product_id, "Updated: {}", record.title);
                RowStatus::Updated { product_id }
            }
            Err(e) => {
                tracing::error!(
                    sku = %record.sku,
                    kind = ?e.kind(),
                    "Error processing row {}: {}",
                    row_number,
                    e
                );
                RowStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };

        outcome
    }

    async fn upsert(&self, record: &ProductRecord) -> Result<UpsertResult, RowError> {
        let client = self.api_client.as_ref();
        match locate::find_product_by_sku(client, &record.sku).await? {
            Some(existing) => {
                let image = update::update_product(client, &existing, record).await?;
                Ok(UpsertResult::Updated(existing.product_id, image))
            }
            None => {
                let created = create::create_product(client, record).await?;
                Ok(UpsertResult::Created(created.product_id))
            }
        }
    }
}

/// Разбить строки на очереди по SKU; строки без SKU идут каждая своей очередью
fn build_lanes(rows: Vec<ProductRow>) -> Vec<Vec<(usize, ProductRow)>> {
    let mut lanes: Vec<Vec<(usize, ProductRow)>> = Vec::new();
    let mut lane_by_sku: HashMap<String, usize> = HashMap::new();

    for (index, row) in rows.into_iter().enumerate() {
        match row.sku.as_deref().map(str::trim).map(String::from) {
            Some(sku) => match lane_by_sku.get(&sku) {
                Some(&lane) => lanes[lane].push((index, row)),
                None => {
                    lane_by_sku.insert(sku, lanes.len());
                    lanes.push(vec![(index, row)]);
                }
            },
            None => lanes.push(vec![(index, row)]),
        }
    }
    lanes
}
