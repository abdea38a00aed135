use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{record::parse_genres, RawRecord},
};

/// Source of raw catalog rows
///
/// Implementations own all file or network access; the build pipeline only
/// ever sees the returned records.
#[async_trait::async_trait]
pub trait DatasetSource: Send + Sync {
    async fn load(&self) -> AppResult<Vec<RawRecord>>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Picks the file source for `path` by extension: CSV for `.csv`, JSON otherwise
pub fn file_source(path: impl Into<PathBuf>) -> Arc<dyn DatasetSource> {
    let path = path.into();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        Arc::new(CsvFileSource::new(path))
    } else {
        Arc::new(JsonFileSource::new(path))
    }
}

fn warn_skipped(skipped: usize, kind: &str) {
    if skipped > 0 {
        tracing::warn!(skipped, kind, "Skipped unparseable dataset rows");
    }
}

/// Reads a JSON array (`.json`) or JSON-lines (`.jsonl`, `.ndjson`) file
///
/// Rows that are not objects are skipped; only an unparseable document is an
/// error.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_json_lines(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("jsonl") | Some("ndjson")
        )
    }

    fn parse_json_lines(contents: &str) -> Vec<RawRecord> {
        let mut records = Vec::new();
        let mut bad_lines = 0usize;

        for (line_no, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<RawRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    bad_lines += 1;
                    tracing::debug!(line = line_no + 1, error = %e, "Skipping unparseable dataset line");
                }
            }
        }

        warn_skipped(bad_lines, "json_lines");
        records
    }

    fn parse_array(&self, contents: &str) -> AppResult<Vec<RawRecord>> {
        let rows = serde_json::from_str::<Vec<Value>>(contents).map_err(|e| {
            AppError::DataFormat(format!(
                "Failed to parse dataset {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let total = rows.len();
        let records: Vec<RawRecord> = rows
            .into_iter()
            .filter_map(|row| serde_json::from_value(row).ok())
            .collect();

        warn_skipped(total - records.len(), "json_array");
        Ok(records)
    }
}

#[async_trait::async_trait]
impl DatasetSource for JsonFileSource {
    async fn load(&self) -> AppResult<Vec<RawRecord>> {
        let contents = tokio::fs::read_to_string(&self.path).await?;

        let records = if Self::is_json_lines(&self.path) {
            Self::parse_json_lines(&contents)
        } else {
            self.parse_array(&contents)?
        };

        tracing::info!(
            path = %self.path.display(),
            records = records.len(),
            "Dataset loaded"
        );

        Ok(records)
    }

    fn name(&self) -> &'static str {
        "json_file"
    }
}

/// Columns read from a movie metadata CSV; any other column is ignored
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    id: Option<String>,
    title: Option<String>,
    overview: Option<String>,
    tagline: Option<String>,
    genres: Option<String>,
}

impl From<CsvRow> for RawRecord {
    fn from(row: CsvRow) -> Self {
        RawRecord {
            id: row.id.map(Value::String),
            title: row.title.map(Value::String),
            overview: row.overview,
            tagline: row.tagline,
            genres: row.genres.map(Value::String).and_then(parse_genres),
        }
    }
}

/// Reads a headered CSV file such as the TMDb `movies_metadata.csv` export
///
/// Cells stay strings until normalization, so `862`, `862.0` and `"862"`
/// ids are treated alike. Rows the CSV reader rejects are skipped.
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse(contents: &[u8]) -> Vec<RawRecord> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(contents);

        let mut records = Vec::new();
        let mut bad_rows = 0usize;

        for (row_no, row) in reader.deserialize::<CsvRow>().enumerate() {
            match row {
                Ok(row) => records.push(RawRecord::from(row)),
                Err(e) => {
                    bad_rows += 1;
                    tracing::debug!(row = row_no + 1, error = %e, "Skipping unparseable CSV row");
                }
            }
        }

        warn_skipped(bad_rows, "csv");
        records
    }
}

#[async_trait::async_trait]
impl DatasetSource for CsvFileSource {
    async fn load(&self) -> AppResult<Vec<RawRecord>> {
        let contents = tokio::fs::read(&self.path).await?;
        let records = Self::parse(&contents);

        tracing::info!(
            path = %self.path.display(),
            records = records.len(),
            "Dataset loaded"
        );

        Ok(records)
    }

    fn name(&self) -> &'static str {
        "csv_file"
    }
}

/// Fixed set of records held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<RawRecord>,
}

impl InMemorySource {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }
}

#[async_trait::async_trait]
impl DatasetSource for InMemorySource {
    async fn load(&self) -> AppResult<Vec<RawRecord>> {
        Ok(self.records.clone())
    }

    fn name(&self) -> &'static str {
        "in_memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_json_array() {
        let file = write_file(
            ".json",
            r#"[{"id": 1, "title": "Heat", "overview": "cops and robbers"},
                {"id": "2", "title": "Casino"}]"#,
        );

        let records = JsonFileSource::new(file.path()).load().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].parse_id(), Some(2));
        assert_eq!(records[1].overview, None);
    }

    #[tokio::test]
    async fn test_load_json_lines_skips_bad_lines() {
        let file = write_file(
            ".jsonl",
            "{\"id\": 1, \"title\": \"Heat\"}\n\nnot json\n{\"id\": 2, \"title\": \"Ronin\"}\n",
        );

        let records = JsonFileSource::new(file.path()).load().await.unwrap();
        let titles: Vec<Option<String>> = records.iter().map(RawRecord::title_text).collect();
        assert_eq!(titles, vec![Some("Heat".to_string()), Some("Ronin".to_string())]);
    }

    #[tokio::test]
    async fn test_json_array_keeps_rows_with_mistyped_fields() {
        let file = write_file(
            ".json",
            r#"[{"id": 1, "title": "A", "overview": "first"},
                {"id": 2, "title": "B", "genres": "Drama"},
                {"id": 3, "title": "C", "overview": 42},
                "not a row"]"#,
        );

        let records = JsonFileSource::new(file.path()).load().await.unwrap();
        let ids: Vec<Option<i64>> = records.iter().map(RawRecord::parse_id).collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(records[2].overview, None);
        assert_eq!(records[1].genres, None);
    }

    #[tokio::test]
    async fn test_load_csv_metadata_export() {
        let file = write_file(
            ".csv",
            "adult,genres,id,overview,tagline,title\n\
             False,\"[{'id': 16, 'name': 'Animation'}]\",862,\"Toys, alive\",,Toy Story\n\
             False,[],8844.0,\"A board game\nwith a jungle\",Roll the dice,Jumanji\n\
             False,[],1997-08-20,,,\n",
        );

        let source = file_source(file.path());
        assert_eq!(source.name(), "csv_file");

        let records = source.load().await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].parse_id(), Some(862));
        assert_eq!(records[0].overview.as_deref(), Some("Toys, alive"));
        assert_eq!(records[0].tagline, None);
        assert_eq!(records[0].genres.as_ref().unwrap()[0].name(), "Animation");
        assert_eq!(records[1].parse_id(), Some(8844));
        assert_eq!(records[1].overview.as_deref(), Some("A board game\nwith a jungle"));
        assert_eq!(records[2].parse_id(), None);
        assert_eq!(records[2].title_text(), None);
    }

    #[test]
    fn test_file_source_defaults_to_json() {
        assert_eq!(file_source("movies.json").name(), "json_file");
        assert_eq!(file_source("movies.jsonl").name(), "json_file");
        assert_eq!(file_source("MOVIES.CSV").name(), "csv_file");
    }

    #[tokio::test]
    async fn test_malformed_array_is_data_format_error() {
        let file = write_file(".json", "{\"id\": 1");
        let err = JsonFileSource::new(file.path()).load().await.unwrap_err();
        assert!(matches!(err, AppError::DataFormat(_)));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = JsonFileSource::new("/nonexistent/movies.json");
        tokio_test::assert_err!(source.load().await);
    }
}
