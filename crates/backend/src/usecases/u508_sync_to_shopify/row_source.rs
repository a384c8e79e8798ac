use anyhow::Result;
use contracts::usecases::u508_sync_to_shopify::ProductRow;
use serde_json::{Map, Value};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Источник строк таблицы товаров
pub trait RowSource {
    fn read_rows(&self) -> Result<Vec<ProductRow>>;
}

/// Первый лист таблицы, выгруженный в CSV (первая строка с заголовками)
pub struct CsvRowSource {
    path: PathBuf,
}

/// Первый лист таблицы в виде JSON-массива объектов `{колонка: значение}`
pub struct JsonRowSource {
    path: PathBuf,
}

impl CsvRowSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl JsonRowSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RowSource for CsvRowSource {
    fn read_rows(&self) -> Result<Vec<ProductRow>> {
        let file = std::fs::File::open(&self.path)
            .map_err(|e| anyhow::anyhow!("Cannot open {}: {}", self.path.display(), e))?;
        parse_csv(file)
    }
}

impl RowSource for JsonRowSource {
    fn read_rows(&self) -> Result<Vec<ProductRow>> {
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", self.path.display(), e))?;
        parse_json(&text)
    }
}

/// Выбрать источник по расширению файла
pub fn open(path: &Path) -> Result<Box<dyn RowSource>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" | "txt" => Ok(Box::new(CsvRowSource::new(path))),
        "json" => Ok(Box::new(JsonRowSource::new(path))),
        "xlsx" | "xls" => anyhow::bail!(
            "{}: export the first sheet to CSV or JSON first",
            path.display()
        ),
        other => anyhow::bail!("Unsupported source file extension: {:?}", other),
    }
}

/// Все ячейки CSV остаются строками (артикулы с ведущими нулями не портятся)
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<ProductRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut object = Map::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            object.insert(header.to_string(), Value::String(cell.to_string()));
        }

        let row: ProductRow = serde_json::from_value(Value::Object(object))
            .map_err(|e| anyhow::anyhow!("Row {}: {}", index + 1, e))?;
        rows.push(row);
    }

    Ok(rows)
}

pub fn parse_json(text: &str) -> Result<Vec<ProductRow>> {
    let rows: Vec<ProductRow> = serde_json::from_str(text)?;
    Ok(rows)
}
