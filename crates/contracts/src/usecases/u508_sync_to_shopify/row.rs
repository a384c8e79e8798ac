use serde::{Deserialize, Serialize};
use std::fmt;

/// Строка таблицы товаров в том виде, в каком её отдаёт источник.
///
/// Имена колонок совпадают с именами полей (`sku`, `title`, `description`,
/// `productType`, `vendor`, `tags`, `price`, `imageUrl`). Все ячейки читаются
/// как текст без изменений; пустые и пробельные ячейки считаются отсутствующими.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRow {
    #[serde(default, with = "cell", skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    #[serde(default, with = "cell", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// HTML-описание
    #[serde(default, with = "cell", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, with = "cell", skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,

    #[serde(default, with = "cell", skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,

    /// Теги через запятую
    #[serde(default, with = "cell", skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    #[serde(default, with = "cell", skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    #[serde(default, with = "cell", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Строка без обязательных полей (`sku`, `title`)
#[derive(Debug, Clone, PartialEq)]
pub struct RowValidationError {
    pub missing: Vec<&'static str>,
}

impl fmt::Display for RowValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Missing {}", self.missing.join(", "))
    }
}

impl std::error::Error for RowValidationError {}

/// Проверенная строка, готовая к отправке в магазин
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub sku: String,
    pub title: String,
    pub description: Option<String>,
    pub product_type: Option<String>,
    pub vendor: Option<String>,
    pub tags: Vec<String>,
    /// Цена как было в ячейке; разбирается при обновлении варианта
    pub price: Option<String>,
    pub image_url: Option<String>,
}

impl ProductRow {
    /// Проверяет обязательные поля и собирает `ProductRecord`
    pub fn into_record(self) -> Result<ProductRecord, RowValidationError> {
        let mut missing = Vec::new();
        if self.sku.is_none() {
            missing.push("sku");
        }
        if self.title.is_none() {
            missing.push("title");
        }

        match (self.sku, self.title) {
            (Some(sku), Some(title)) => Ok(ProductRecord {
                sku: sku.trim().to_string(),
                title: title.trim().to_string(),
                description: self.description,
                product_type: self.product_type,
                vendor: self.vendor,
                tags: parse_tags(self.tags.as_deref()),
                price: self.price,
                image_url: self.image_url,
            }),
            _ => Err(RowValidationError { missing }),
        }
    }

    /// Однострочное JSON-представление строки для предупреждений в консоли
    pub fn to_payload_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

impl ProductRecord {
    /// Цена в десятичной строковой форме (`19.99`, `20`), `None` если ячейка
    /// пустая или не число
    pub fn normalized_price(&self) -> Option<String> {
        let raw = self.price.as_deref()?.trim().replace(',', ".");
        let value: f64 = raw.parse().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        Some(value.to_string())
    }
}

/// Разбирает строку тегов: разделитель запятая, пробелы обрезаются,
/// пустые и повторные теги отбрасываются, порядок сохраняется
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.unwrap_or_default().split(',').map(str::trim) {
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

// Ячейка таблицы: строка, число или bool; пусто или одни пробелы -> None
mod cell {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_str(v),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        let text = match value {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(other) => {
                return Err(serde::de::Error::custom(format!(
                    "unsupported cell value: {}",
                    other
                )))
            }
        };

        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(sku: Option<&str>, title: Option<&str>) -> ProductRow {
        ProductRow {
            sku: sku.map(String::from),
            title: title.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags(None), Vec::<String>::new());
        assert_eq!(parse_tags(Some("")), Vec::<String>::new());
        assert_eq!(
            parse_tags(Some(" summer, cotton ,,sale, cotton")),
            vec!["summer", "cotton", "sale"]
        );
    }

    #[test]
    fn test_into_record_requires_sku_and_title() {
        let err = row(None, Some("Shirt")).into_record().unwrap_err();
        assert_eq!(err.missing, vec!["sku"]);

        let err = row(None, None).into_record().unwrap_err();
        assert_eq!(err.missing, vec!["sku", "title"]);
        assert_eq!(err.to_string(), "Missing sku, title");

        let record = row(Some("A1"), Some("Shirt")).into_record().unwrap();
        assert_eq!(record.sku, "A1");
        assert!(record.tags.is_empty());
    }

    #[test]
    fn test_cells_accept_numbers_and_blank_strings() {
        let row: ProductRow = serde_json::from_value(serde_json::json!({
            "sku": 12345,
            "title": "  Shirt ",
            "price": 19.99,
            "vendor": "   ",
            "imageUrl": "https://cdn.example.com/a.png",
            "extraColumn": "ignored"
        }))
        .unwrap();

        assert_eq!(row.sku.as_deref(), Some("12345"));
        assert_eq!(row.price.as_deref(), Some("19.99"));
        assert_eq!(row.vendor, None);
        assert_eq!(
            row.image_url.as_deref(),
            Some("https://cdn.example.com/a.png")
        );

        let record = row.into_record().unwrap();
        assert_eq!(record.title, "Shirt");
    }

    #[test]
    fn test_description_is_kept_verbatim() {
        let row: ProductRow = serde_json::from_value(serde_json::json!({
            "sku": " A1 ",
            "title": "Shirt",
            "description": "  <p>Soft cotton</p>\n"
        }))
        .unwrap();

        let record = row.into_record().unwrap();
        assert_eq!(record.sku, "A1");
        assert_eq!(
            record.description.as_deref(),
            Some("  <p>Soft cotton</p>\n")
        );
    }

    #[test]
    fn test_normalized_price() {
        let mut record = row(Some("A1"), Some("Shirt")).into_record().unwrap();
        assert_eq!(record.normalized_price(), None);

        record.price = Some("19.99".into());
        assert_eq!(record.normalized_price().as_deref(), Some("19.99"));

        record.price = Some("20.0".into());
        assert_eq!(record.normalized_price().as_deref(), Some("20"));

        record.price = Some("12,50".into());
        assert_eq!(record.normalized_price().as_deref(), Some("12.5"));

        record.price = Some("free".into());
        assert_eq!(record.normalized_price(), None);
    }

    #[test]
    fn test_payload_string_skips_absent_fields() {
        let payload = row(None, Some("Shirt")).to_payload_string();
        assert_eq!(payload, r#"{"title":"Shirt"}"#);
    }
}
