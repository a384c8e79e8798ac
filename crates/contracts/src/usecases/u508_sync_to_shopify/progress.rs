use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Текущий прогресс синхронизации
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncProgress {
    pub session_id: String,
    pub status: SyncStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,

    /// Всего строк в источнике
    pub total: Option<i32>,
    /// SKU строки, которая обрабатывается сейчас
    pub current_item: Option<String>,

    pub processed: i32,
    pub created: i32,
    pub updated: i32,
    pub skipped: i32,
    pub failed: i32,
    /// Строки, у которых не удалось добавить картинку (сама строка успешна)
    pub image_warnings: i32,

    pub errors: Vec<SyncError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Running,
    Completed,
    CompletedWithErrors,
}

/// Ошибка по конкретной строке
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncError {
    pub row_number: usize,
    pub sku: Option<String>,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

/// Итог обработки одной строки
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowStatus {
    Created { product_id: String },
    Updated { product_id: String },
    Skipped { reason: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowOutcome {
    /// Номер строки в источнике, начиная с 1
    pub row_number: usize,
    pub sku: Option<String>,
    pub title: Option<String>,
    pub status: RowStatus,
    /// Некритичные проблемы (например, не добавилась картинка)
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Картинка добавлена отдельным запросом после обновления
    #[serde(default)]
    pub image_added: bool,
}

impl SyncProgress {
    pub fn new(session_id: String) -> Self {
        Self {
            session_id,
            status: SyncStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            updated_at: Utc::now(),
            total: None,
            current_item: None,
            processed: 0,
            created: 0,
            updated: 0,
            skipped: 0,
            failed: 0,
            image_warnings: 0,
            errors: Vec::new(),
        }
    }

    pub fn apply(&mut self, outcome: &RowOutcome) {
        self.processed += 1;
        match &outcome.status {
            RowStatus::Created { .. } => self.created += 1,
            RowStatus::Updated { .. } => self.updated += 1,
            RowStatus::Skipped { .. } => self.skipped += 1,
            RowStatus::Failed { reason } => {
                self.failed += 1;
                self.errors.push(SyncError {
                    row_number: outcome.row_number,
                    sku: outcome.sku.clone(),
                    message: reason.clone(),
                    occurred_at: Utc::now(),
                });
            }
        }
        if !outcome.warnings.is_empty() {
            self.image_warnings += 1;
        }
        self.updated_at = Utc::now();
    }
}

/// Результат запуска: финальный прогресс и итог по каждой строке в порядке источника
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub progress: SyncProgress,
    pub outcomes: Vec<RowOutcome>,
}

impl SyncReport {
    pub fn has_failures(&self) -> bool {
        self.progress.failed > 0
    }
}
