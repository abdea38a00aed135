use std::collections::HashMap;

use crate::config::{BuildConfig, WeightingScheme};

/// Tokens shorter than this are discarded
const MIN_TOKEN_LEN: usize = 2;

/// Non-negative sparse vector with its precomputed L2 norm
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    /// `(column, weight)` pairs sorted by column, zero weights omitted
    entries: Vec<(u32, f32)>,
    norm: f64,
}

impl SparseVector {
    pub fn new(mut entries: Vec<(u32, f32)>) -> Self {
        entries.retain(|&(_, w)| w > 0.0 && w.is_finite());
        entries.sort_by_key(|&(col, _)| col);
        let norm = entries
            .iter()
            .map(|&(_, w)| (w as f64) * (w as f64))
            .sum::<f64>()
            .sqrt();
        Self { entries, norm }
    }

    pub fn entries(&self) -> &[(u32, f32)] {
        &self.entries
    }

    pub fn norm(&self) -> f64 {
        self.norm
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product by merging the two sorted column lists
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (a, b) = (&self.entries, &other.entries);
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f64;

        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += (a[i].1 as f64) * (b[j].1 as f64);
                    i += 1;
                    j += 1;
                }
            }
        }

        sum
    }
}

/// Vocabulary plus one weight vector per corpus record, in corpus order
#[derive(Debug, Clone, Default)]
pub struct VectorSpace {
    vocabulary: HashMap<String, u32>,
    vectors: Vec<SparseVector>,
}

impl VectorSpace {
    pub fn vocabulary(&self) -> &HashMap<String, u32> {
        &self.vocabulary
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vectors(&self) -> &[SparseVector] {
        &self.vectors
    }

    pub fn vector(&self, row: usize) -> Option<&SparseVector> {
        self.vectors.get(row)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// Lowercases and splits on anything that is not alphanumeric
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

/// Builds the vector space for a sequence of record texts
///
/// The vocabulary keeps the `vocabulary_cap` most frequent terms across the
/// corpus (ties broken lexicographically) and numbers them in lexicographic
/// order. Empty texts produce zero vectors; an empty corpus produces an
/// empty vocabulary.
pub fn build_vector_space<'a, I>(texts: I, config: &BuildConfig) -> VectorSpace
where
    I: IntoIterator<Item = &'a str>,
{
    let stopwords = config.stopwords.to_set();

    let doc_counts: Vec<HashMap<String, u32>> = texts
        .into_iter()
        .map(|text| {
            let mut counts = HashMap::new();
            for token in tokenize(text) {
                if !stopwords.contains(&token) {
                    *counts.entry(token).or_insert(0) += 1;
                }
            }
            counts
        })
        .collect();

    let mut corpus_freq: HashMap<&str, u64> = HashMap::new();
    let mut doc_freq: HashMap<&str, u32> = HashMap::new();
    for counts in &doc_counts {
        for (term, &count) in counts {
            *corpus_freq.entry(term.as_str()).or_insert(0) += count as u64;
            *doc_freq.entry(term.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, u64)> = corpus_freq.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(config.vocabulary_cap);

    let mut retained: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
    retained.sort_unstable();

    let n_docs = doc_counts.len() as f64;
    let idf: Vec<f64> = retained
        .iter()
        .map(|term| {
            let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
            match config.weighting_scheme {
                WeightingScheme::Tf => 1.0,
                WeightingScheme::Tfidf => (n_docs / (1.0 + df)).ln().max(0.0),
                WeightingScheme::SmoothTfidf => ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0,
            }
        })
        .collect();

    let vocabulary: HashMap<String, u32> = retained
        .iter()
        .enumerate()
        .map(|(col, term)| (term.to_string(), col as u32))
        .collect();

    let vectors = doc_counts
        .iter()
        .map(|counts| {
            let entries = counts
                .iter()
                .filter_map(|(term, &count)| {
                    let col = *vocabulary.get(term)?;
                    Some((col, (count as f64 * idf[col as usize]) as f32))
                })
                .collect();
            SparseVector::new(entries)
        })
        .collect();

    tracing::debug!(
        documents = doc_counts.len(),
        vocabulary = vocabulary.len(),
        scheme = ?config.weighting_scheme,
        "Vector space built"
    );

    VectorSpace {
        vocabulary,
        vectors,
    }
}
