use std::collections::HashSet;

use crate::{
    config::{BuildConfig, TextComposition},
    error::BuildError,
    models::{Corpus, Genre, RawRecord, Record},
};

/// Cleans raw rows into a canonical corpus
///
/// Rows without a usable id or title are skipped, missing text becomes an
/// empty string, duplicate ids keep their first occurrence and the result is
/// truncated to `corpus_size_cap` in source order. Only a required field that
/// is missing or unusable in every row is fatal.
pub fn normalize(raw: &[RawRecord], config: &BuildConfig) -> Result<Corpus, BuildError> {
    if raw.is_empty() {
        return Corpus::new(Vec::new());
    }

    if raw.iter().all(|r| r.id.is_none()) {
        return Err(BuildError::DataFormat(
            "required field 'id' is missing from every record".to_string(),
        ));
    }
    if raw.iter().all(|r| r.title.is_none()) {
        return Err(BuildError::DataFormat(
            "required field 'title' is missing from every record".to_string(),
        ));
    }
    if raw.iter().all(|r| r.parse_id().is_none()) {
        return Err(BuildError::DataFormat(
            "no record has an integer 'id'".to_string(),
        ));
    }
    if raw.iter().all(|r| r.title_text().is_none()) {
        return Err(BuildError::DataFormat(
            "no record has a non-blank 'title'".to_string(),
        ));
    }

    let cap = config.corpus_size_cap.unwrap_or(usize::MAX);
    let mut seen = HashSet::new();
    let mut records = Vec::new();
    let mut skipped = 0usize;
    let mut duplicates = 0usize;

    for row in raw {
        if records.len() >= cap {
            break;
        }

        let (Some(id), Some(title)) = (row.parse_id(), row.title_text()) else {
            skipped += 1;
            continue;
        };

        if !seen.insert(id) {
            duplicates += 1;
            continue;
        }

        records.push(Record::new(id, title, compose_text(row, config.text_composition)));
    }

    if skipped > 0 || duplicates > 0 {
        tracing::warn!(
            skipped_rows = skipped,
            duplicate_ids = duplicates,
            "Dropped unusable rows while normalizing corpus"
        );
    }
    tracing::debug!(records = records.len(), "Corpus normalized");

    Corpus::new(records)
}

fn compose_text(row: &RawRecord, composition: TextComposition) -> String {
    let overview = row.overview.as_deref().unwrap_or("").trim();

    match composition {
        TextComposition::Overview => overview.to_string(),
        TextComposition::Tags => {
            // Multi-word genres collapse into one token ("Science Fiction" -> "ScienceFiction")
            let genres: Vec<String> = row
                .genres
                .iter()
                .flatten()
                .map(|g: &Genre| g.name().replace(' ', ""))
                .filter(|g| !g.is_empty())
                .collect();

            let parts = [
                genres.join(" "),
                overview.to_string(),
                row.tagline.as_deref().unwrap_or("").trim().to_string(),
                row.title_text().unwrap_or_default(),
            ];

            parts
                .iter()
                .filter(|p| !p.is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join(" ")
        }
    }
}
