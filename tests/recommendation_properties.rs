use cinematch_api::{
    config::{BuildConfig, SimilarityMode, WeightingScheme},
    models::RawRecord,
    services::{
        catalog::build,
        recommendations::{recommend_by_id, recommend_by_title},
        similarity::IndexKind,
    },
};

const PLOTS: &[&str] = &[
    "A retired hitman seeks vengeance after gangsters kill his dog",
    "An astronaut travels through a wormhole to find a new home for humanity",
    "A young wizard attends a school of magic and battles a dark lord",
    "Two lovers from rival families meet at a wedding in Verona",
    "A bank heist goes wrong and the crew turns on each other",
    "",
    "A lonely astronaut is stranded on Mars and must grow food to survive",
    "A detective hunts a serial killer through a rain soaked city",
    "A wizard and a hobbit journey to destroy a dark ring",
    "A wedding planner falls in love with the groom",
    "Gangsters plan one last heist before leaving the city",
    "A family road trip turns into a comedy of errors",
];

fn catalog() -> Vec<RawRecord> {
    PLOTS
        .iter()
        .enumerate()
        .map(|(i, plot)| RawRecord::new(100 + i as i64, &format!("Film {}", i), plot))
        .collect()
}

#[test]
fn test_query_record_never_recommended() {
    let handle = build(&catalog(), &BuildConfig::default()).unwrap();

    for record in handle.corpus.records() {
        let recs = recommend_by_title(&handle, &record.title, 5);
        assert!(recs.iter().all(|r| r.record.id != record.id));
    }
}

#[test]
fn test_scores_bounded_and_sorted() {
    let handle = build(&catalog(), &BuildConfig::default()).unwrap();

    for record in handle.corpus.records() {
        let recs = recommend_by_id(&handle, record.id, 100);
        assert!(recs.iter().all(|r| (0.0..=1.0).contains(&r.score)));
        assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
    }
}

#[test]
fn test_rebuild_is_idempotent() {
    let first = build(&catalog(), &BuildConfig::default()).unwrap();
    let second = build(&catalog(), &BuildConfig::default()).unwrap();

    assert_eq!(first.build_id, second.build_id);
    for record in first.corpus.records() {
        assert_eq!(
            recommend_by_id(&first, record.id, 5),
            recommend_by_id(&second, record.id, 5)
        );
    }
}

#[test]
fn test_repeated_queries_are_deterministic() {
    let handle = build(&catalog(), &BuildConfig::default()).unwrap();
    let baseline = recommend_by_title(&handle, "Film 1", 5);

    for _ in 0..10 {
        assert_eq!(recommend_by_title(&handle, "Film 1", 5), baseline);
    }
}

#[test]
fn test_oversized_n_returns_every_other_record() {
    let handle = build(&catalog(), &BuildConfig::default()).unwrap();
    let recs = recommend_by_title(&handle, "Film 0", 1000);
    assert_eq!(recs.len(), PLOTS.len() - 1);
}

#[test]
fn test_related_plots_rank_first() {
    let config = BuildConfig {
        weighting_scheme: WeightingScheme::SmoothTfidf,
        ..Default::default()
    };
    let handle = build(&catalog(), &config).unwrap();

    // Wormhole astronauts -> stranded astronaut
    let recs = recommend_by_title(&handle, "Film 1", 1);
    assert_eq!(recs[0].record.title, "Film 6");

    // Young wizard -> wizard and hobbit
    let recs = recommend_by_title(&handle, "Film 2", 1);
    assert_eq!(recs[0].record.title, "Film 8");
}

#[test]
fn test_empty_plot_ranks_all_others_in_corpus_order() {
    let handle = build(&catalog(), &BuildConfig::default()).unwrap();
    let recs = recommend_by_title(&handle, "Film 5", 20);

    let ids: Vec<i64> = recs.iter().map(|r| r.record.id).collect();
    let expected: Vec<i64> = (0..PLOTS.len() as i64)
        .filter(|&i| i != 5)
        .map(|i| 100 + i)
        .collect();
    assert_eq!(ids, expected);
    assert!(recs.iter().all(|r| r.score == 0.0));
}

#[test]
fn test_lazy_mode_above_threshold_matches_eager() {
    let lazy_config = BuildConfig {
        similarity_mode: SimilarityMode::Auto,
        similarity_mode_threshold: 4,
        ..Default::default()
    };
    let lazy = build(&catalog(), &lazy_config).unwrap();
    let eager = build(&catalog(), &BuildConfig::default()).unwrap();

    assert_eq!(lazy.info().similarity_mode, IndexKind::Lazy);
    assert_eq!(eager.info().similarity_mode, IndexKind::Eager);
    for record in eager.corpus.records() {
        assert_eq!(
            recommend_by_id(&eager, record.id, 11),
            recommend_by_id(&lazy, record.id, 11)
        );
    }
}

/// 50 records over a 1000-term vocabulary: 50 shared topic terms (each used
/// twice in two records) and 950 single-use filler terms.
fn wide_vocabulary_catalog() -> Vec<RawRecord> {
    (0..50)
        .map(|i| {
            let next = (i + 1) % 50;
            let mut words = vec![
                format!("t{}", i),
                format!("t{}", i),
                format!("t{}", next),
                format!("t{}", next),
            ];
            words.extend((0..19).map(|j| format!("f{}w{}", i, j)));
            RawRecord::new(i as i64, &format!("Record {}", i), &words.join(" "))
        })
        .collect()
}

#[test]
fn test_vocabulary_cap_preserves_ranking() {
    let raw = wide_vocabulary_catalog();
    let uncapped = build(
        &raw,
        &BuildConfig {
            vocabulary_cap: 10_000,
            ..Default::default()
        },
    )
    .unwrap();
    let capped = build(
        &raw,
        &BuildConfig {
            vocabulary_cap: 50,
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(uncapped.vector_space.vocabulary_len(), 1000);
    assert!(capped.vector_space.vocabulary_len() <= 50);

    for id in 0..50 {
        let capped_ids: Vec<i64> = recommend_by_id(&capped, id, 5)
            .iter()
            .map(|r| r.record.id)
            .collect();
        let uncapped_ids: Vec<i64> = recommend_by_id(&uncapped, id, 5)
            .iter()
            .map(|r| r.record.id)
            .collect();
        assert_eq!(capped_ids, uncapped_ids);
    }
}
