use serde::{Deserialize, Serialize};

use super::{MovieDetails, Record};

/// A ranked neighbour of the query record
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub record: Record,
    /// Cosine similarity to the query record, in `[0, 1]`
    pub score: f32,
}

/// Whether presentation details could be attached to a recommendation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DetailsStatus {
    Available,
    Unavailable,
    /// Enrichment was not requested or no provider is configured
    Skipped,
}

/// A recommendation as returned to clients, optionally carrying provider details
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnrichedRecommendation {
    pub id: i64,
    pub title: String,
    pub score: f32,
    pub details_status: DetailsStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<MovieDetails>,
}

impl EnrichedRecommendation {
    pub fn without_details(rec: &Recommendation, status: DetailsStatus) -> Self {
        Self {
            id: rec.record.id,
            title: rec.record.title.clone(),
            score: rec.score,
            details_status: status,
            details: None,
        }
    }

    pub fn with_details(rec: &Recommendation, details: MovieDetails) -> Self {
        Self {
            id: rec.record.id,
            title: rec.record.title.clone(),
            score: rec.score,
            details_status: DetailsStatus::Available,
            details: Some(details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_status_serialization() {
        assert_eq!(
            serde_json::to_string(&DetailsStatus::Unavailable).unwrap(),
            "\"unavailable\""
        );
        assert_eq!(
            serde_json::to_string(&DetailsStatus::Available).unwrap(),
            "\"available\""
        );
    }

    #[test]
    fn test_unavailable_entry_omits_details() {
        let rec = Recommendation {
            record: Record::new(12, "Finding Nemo", "fish ocean"),
            score: 0.25,
        };
        let entry = EnrichedRecommendation::without_details(&rec, DetailsStatus::Unavailable);
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["id"], 12);
        assert_eq!(json["title"], "Finding Nemo");
        assert_eq!(json["details_status"], "unavailable");
        assert!(json.get("details").is_none());
    }
}
