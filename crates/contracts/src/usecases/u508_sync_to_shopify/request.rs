use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Параметры одного запуска синхронизации
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRequest {
    /// Файл-источник (выгрузка первого листа таблицы)
    pub source_file: PathBuf,

    /// Количество параллельных воркеров; 1 = строго последовательная обработка
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    1
}

impl SyncRequest {
    pub fn new(source_file: impl Into<PathBuf>) -> Self {
        Self {
            source_file: source_file.into(),
            workers: default_workers(),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn is_sequential(&self) -> bool {
        self.workers <= 1
    }
}
