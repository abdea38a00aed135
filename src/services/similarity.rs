use std::sync::Arc;

use serde::Serialize;

use crate::config::SimilarityMode;
use crate::services::vectorizer::{SparseVector, VectorSpace};

/// Cosine similarity of two non-negative sparse vectors
///
/// Returns 0.0 when either vector has zero norm or the result is not finite.
/// Result clamped to [0.0, 1.0].
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }

    let result = a.dot(b) / denom;
    if !result.is_finite() {
        return 0.0;
    }
    result.clamp(0.0, 1.0) as f32
}

/// The similarity structure actually materialized for a build
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    Eager,
    Lazy,
}

impl IndexKind {
    /// Resolves the configured mode against the corpus size
    pub fn resolve(mode: SimilarityMode, records: usize, threshold: usize) -> Self {
        match mode {
            SimilarityMode::Eager => IndexKind::Eager,
            SimilarityMode::Lazy => IndexKind::Lazy,
            SimilarityMode::Auto if records > threshold => IndexKind::Lazy,
            SimilarityMode::Auto => IndexKind::Eager,
        }
    }
}

/// Pairwise similarity over one vector space generation
///
/// Eager holds the full row-major N×N matrix; lazy computes a row on demand.
/// Both produce each score with [`cosine_similarity`], so they rank identically.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    space: Arc<VectorSpace>,
    matrix: Option<Vec<f32>>,
}

impl SimilarityIndex {
    pub fn build(space: Arc<VectorSpace>, kind: IndexKind) -> Self {
        let matrix = match kind {
            IndexKind::Eager => Some(materialize(&space)),
            IndexKind::Lazy => None,
        };
        Self { space, matrix }
    }

    pub fn kind(&self) -> IndexKind {
        if self.matrix.is_some() {
            IndexKind::Eager
        } else {
            IndexKind::Lazy
        }
    }

    /// The vector space this index was built from
    pub fn space(&self) -> &Arc<VectorSpace> {
        &self.space
    }

    pub fn len(&self) -> usize {
        self.space.len()
    }

    pub fn is_empty(&self) -> bool {
        self.space.is_empty()
    }

    pub fn similarity(&self, i: usize, j: usize) -> Option<f32> {
        let n = self.len();
        if i >= n || j >= n {
            return None;
        }
        match &self.matrix {
            Some(matrix) => Some(matrix[i * n + j]),
            None => Some(cosine_similarity(
                &self.space.vectors()[i],
                &self.space.vectors()[j],
            )),
        }
    }

    /// Similarities of `row` against every row, in corpus order
    pub fn row(&self, row: usize) -> Option<Vec<f32>> {
        let n = self.len();
        if row >= n {
            return None;
        }
        match &self.matrix {
            Some(matrix) => Some(matrix[row * n..(row + 1) * n].to_vec()),
            None => {
                let query = &self.space.vectors()[row];
                Some(
                    self.space
                        .vectors()
                        .iter()
                        .map(|v| cosine_similarity(query, v))
                        .collect(),
                )
            }
        }
    }
}

fn materialize(space: &VectorSpace) -> Vec<f32> {
    let vectors = space.vectors();
    let n = vectors.len();
    let mut matrix = vec![0.0f32; n * n];

    for i in 0..n {
        for j in i..n {
            let score = cosine_similarity(&vectors[i], &vectors[j]);
            matrix[i * n + j] = score;
            matrix[j * n + i] = score;
        }
    }

    tracing::debug!(records = n, "Similarity matrix materialized");
    matrix
}
