/// Метаданные UseCase: индекс, имя и описание для логов и консоли
pub trait UseCaseMetadata {
    /// Индекс UseCase (например, "u508")
    fn usecase_index() -> &'static str;

    /// Техническое имя (например, "sync_to_shopify")
    fn usecase_name() -> &'static str;

    /// Отображаемое имя для консоли
    fn display_name() -> &'static str;

    fn description() -> &'static str {
        ""
    }

    /// Полное имя вида "u508_sync_to_shopify"
    fn full_name() -> String {
        format!("{}_{}", Self::usecase_index(), Self::usecase_name())
    }

    /// Заголовок для первой строки консольного вывода
    fn banner() -> String {
        let description = Self::description();
        if description.is_empty() {
            format!("[{}] {}", Self::full_name(), Self::display_name())
        } else {
            format!(
                "[{}] {} - {}",
                Self::full_name(),
                Self::display_name(),
                description
            )
        }
    }
}
