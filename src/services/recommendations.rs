use crate::{
    models::Recommendation,
    services::catalog::BuildHandle,
};

/// Recommends the `n` records most similar to the record with `id`
///
/// Unknown ids and `n == 0` give an empty list.
pub fn recommend_by_id(handle: &BuildHandle, id: i64, n: usize) -> Vec<Recommendation> {
    match handle.corpus.position_of_id(id) {
        Some(position) => rank_neighbours(handle, position, n),
        None => {
            tracing::debug!(movie_id = id, "No record with this id");
            Vec::new()
        }
    }
}

/// Recommends by title, matched case-insensitively
///
/// When several records share the title, the first one in corpus order is
/// used as the query. Unknown titles give an empty list.
pub fn recommend_by_title(handle: &BuildHandle, title: &str, n: usize) -> Vec<Recommendation> {
    match handle.corpus.position_of_title(title) {
        Some(position) => rank_neighbours(handle, position, n),
        None => {
            tracing::debug!(title = %title, "No record with this title");
            Vec::new()
        }
    }
}

/// Sorts every other record by score (descending), ties by corpus position
///
/// Zero-score records are kept, after all positive scores, so asking for
/// more than the corpus holds returns every other record.
fn rank_neighbours(handle: &BuildHandle, position: usize, n: usize) -> Vec<Recommendation> {
    if n == 0 {
        return Vec::new();
    }

    let Some(scores) = handle.index.row(position) else {
        return Vec::new();
    };

    let mut ranked: Vec<(usize, f32)> = scores
        .into_iter()
        .enumerate()
        .filter(|&(pos, _)| pos != position)
        .collect();

    // Stable sort keeps corpus order among equal scores
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(n);

    ranked
        .into_iter()
        .filter_map(|(pos, score)| {
            handle.corpus.get(pos).map(|record| Recommendation {
                record: record.clone(),
                score,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{BuildConfig, SimilarityMode, WeightingScheme},
        models::RawRecord,
        services::catalog::build,
    };

    fn titles(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.record.title.as_str()).collect()
    }

    fn alpha_beta_gamma() -> Vec<RawRecord> {
        vec![
            RawRecord::new(1, "Alpha", "space travel astronaut"),
            RawRecord::new(2, "Beta", "space astronaut mission"),
            RawRecord::new(3, "Gamma", "romantic comedy wedding"),
        ]
    }

    #[test]
    fn test_similar_record_ranks_first() {
        let handle = build(&alpha_beta_gamma(), &BuildConfig::default()).unwrap();
        let recs = recommend_by_title(&handle, "alpha", 2);

        assert_eq!(titles(&recs), vec!["Beta", "Gamma"]);
        assert!(recs[0].score > recs[1].score);
        assert_eq!(recs[1].score, 0.0);
    }

    #[test]
    fn test_plain_idf_erases_terms_shared_by_most_records() {
        // N = 3 and df = 2 gives ln(3 / 3) = 0 for "space" and "astronaut",
        // so Beta only leads Gamma through corpus order
        let config = BuildConfig {
            weighting_scheme: WeightingScheme::Tfidf,
            ..Default::default()
        };
        let handle = build(&alpha_beta_gamma(), &config).unwrap();
        let recs = recommend_by_title(&handle, "Alpha", 2);

        assert_eq!(titles(&recs), vec!["Beta", "Gamma"]);
        assert!(recs.iter().all(|r| r.score == 0.0));
    }

    #[test]
    fn test_excludes_query_and_respects_bounds() {
        let handle = build(&alpha_beta_gamma(), &BuildConfig::default()).unwrap();

        for record in handle.corpus.records() {
            let recs = recommend_by_id(&handle, record.id, 10);
            assert_eq!(recs.len(), 2);
            assert!(recs.iter().all(|r| r.record.id != record.id));
        }

        assert!(recommend_by_title(&handle, "Alpha", 0).is_empty());
        assert!(recommend_by_title(&handle, "Delta", 5).is_empty());
        assert!(recommend_by_id(&handle, 99, 5).is_empty());
    }

    #[test]
    fn test_duplicate_title_uses_first_occurrence() {
        let raw = vec![
            RawRecord::new(10, "Clone", "robot factory uprising"),
            RawRecord::new(11, "Robots", "robot factory workers"),
            RawRecord::new(12, "Clone", "sheep farm genetics"),
            RawRecord::new(13, "Farm", "sheep farm life"),
        ];
        let handle = build(&raw, &BuildConfig::default()).unwrap();
        let recs = recommend_by_title(&handle, "clone", 3);

        assert_eq!(recs[0].record.id, 11);
        assert!(recs.iter().all(|r| r.record.id != 10));
        assert!(recs.iter().any(|r| r.record.id == 12));
    }

    #[test]
    fn test_empty_text_scores_zero_and_keeps_corpus_order() {
        let raw = vec![
            RawRecord::new(1, "Blank", ""),
            RawRecord::new(2, "Heist", "bank heist crew"),
            RawRecord::new(3, "Heist Two", "bank heist sequel"),
            RawRecord::new(4, "Romance", "love letters"),
        ];
        let handle = build(&raw, &BuildConfig::default()).unwrap();

        let recs = recommend_by_title(&handle, "Blank", 10);
        assert_eq!(titles(&recs), vec!["Heist", "Heist Two", "Romance"]);
        assert!(recs.iter().all(|r| r.score == 0.0));

        let recs = recommend_by_title(&handle, "Romance", 10);
        assert_eq!(titles(&recs), vec!["Blank", "Heist", "Heist Two"]);
    }

    #[test]
    fn test_eager_and_lazy_rank_identically() {
        let raw: Vec<RawRecord> = (0..60)
            .map(|i| {
                RawRecord::new(
                    i,
                    &format!("Movie {}", i),
                    &format!("theme{} genre{} crew{} common", i % 7, i % 5, i % 3),
                )
            })
            .collect();

        let eager = build(
            &raw,
            &BuildConfig {
                similarity_mode: SimilarityMode::Eager,
                ..Default::default()
            },
        )
        .unwrap();
        let lazy = build(
            &raw,
            &BuildConfig {
                similarity_mode: SimilarityMode::Lazy,
                ..Default::default()
            },
        )
        .unwrap();

        for id in 0..60 {
            assert_eq!(recommend_by_id(&eager, id, 10), recommend_by_id(&lazy, id, 10));
        }
    }
}
