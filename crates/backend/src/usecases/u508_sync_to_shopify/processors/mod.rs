pub mod create;
pub mod locate;
pub mod update;

use super::shopify_api_client::{ErrorKind, ShopifyApiError};
use thiserror::Error;

/// Ошибка, прерывающая обработку строки
#[derive(Debug, Error)]
pub enum RowError {
    #[error(transparent)]
    Api(#[from] ShopifyApiError),

    #[error("Price is missing or not a number: {0:?}")]
    InvalidPrice(Option<String>),
}

impl RowError {
    /// Локальная проверка цены относится к бизнес-ошибкам
    pub fn kind(&self) -> ErrorKind {
        match self {
            RowError::Api(e) => e.kind(),
            RowError::InvalidPrice(_) => ErrorKind::Domain,
        }
    }
}

/// Что произошло с картинкой товара
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageStatus {
    /// В строке нет `imageUrl`
    NotRequested,
    /// Добавлена отдельным запросом
    Attached,
    /// Не добавилась; строка при этом успешна
    Failed(String),
}
