use contracts::usecases::u508_sync_to_shopify::{RowOutcome, SyncProgress, SyncStatus};
use std::sync::{Arc, PoisonError, RwLock};

/// Трекер прогресса синхронизации (in-memory)
#[derive(Clone)]
pub struct ProgressTracker {
    progress: Arc<RwLock<SyncProgress>>,
}

impl ProgressTracker {
    pub fn new(session_id: String) -> Self {
        Self {
            progress: Arc::new(RwLock::new(SyncProgress::new(session_id))),
        }
    }

    pub fn get_progress(&self) -> SyncProgress {
        self.progress
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn with_progress(&self, f: impl FnOnce(&mut SyncProgress)) {
        let mut progress = self.progress.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut progress);
        progress.updated_at = chrono::Utc::now();
    }

    pub fn set_total(&self, total: usize) {
        self.with_progress(|p| p.total = Some(total as i32));
    }

    pub fn set_current_item(&self, current_item: Option<String>) {
        self.with_progress(|p| p.current_item = current_item);
    }

    pub fn record_outcome(&self, outcome: &RowOutcome) {
        self.with_progress(|p| p.apply(outcome));
    }

    /// Завершить сессию; статус зависит от наличия проваленных строк
    pub fn complete_session(&self) -> SyncProgress {
        self.with_progress(|p| {
            p.status = if p.failed > 0 {
                SyncStatus::CompletedWithErrors
            } else {
                SyncStatus::Completed
            };
            p.current_item = None;
            p.completed_at = Some(chrono::Utc::now());
        });
        self.get_progress()
    }
}
