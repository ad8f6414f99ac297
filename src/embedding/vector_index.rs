/// Flat exact inner-product index for similarity search
use ahash::AHashSet;
use ndarray::{ArrayView1, ArrayView2};
use thiserror::Error;

/// ID returned in place of a real match when the index holds fewer than
/// `k` vectors. Callers must filter it out; its score slot is meaningless.
pub const SENTINEL_ID: i64 = -1;

#[derive(Error, Debug)]
pub enum VectorIndexError {
    #[error("Invalid dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Ids and vectors differ in length: {ids} ids, {vectors} vectors")]
    LengthMismatch { ids: usize, vectors: usize },

    #[error("Duplicate id: {0}")]
    DuplicateId(i64),

    #[error("Reserved id: {0}")]
    ReservedId(i64),

    #[error("Index storage corrupt: {0}")]
    Storage(String),
}

/// Exact nearest-neighbor index over inner-product similarity
///
/// Every vector is kept in a dense row-major buffer and a query is scored
/// against all of them. Exhaustive by construction: no recall/latency
/// tuning exists or is needed at knowledge-base scale. Vectors are scored
/// exactly as the embedder produced them, without re-normalization.
///
/// Ids are assigned by the caller and are expected to match chunk ids.
pub struct VectorIndex {
    dimension: usize,
    ids: Vec<i64>,
    data: Vec<f32>,
}

impl VectorIndex {
    /// Create an empty index for vectors of the given dimension
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            ids: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Bulk-add vectors under caller-assigned ids
    ///
    /// `ids` and `vectors` must have equal length, every vector must match
    /// the index dimension, and ids must be unique and non-negative
    /// (negative values collide with the sentinel).
    pub fn add(&mut self, ids: &[i64], vectors: &[Vec<f32>]) -> Result<(), VectorIndexError> {
        if ids.len() != vectors.len() {
            return Err(VectorIndexError::LengthMismatch {
                ids: ids.len(),
                vectors: vectors.len(),
            });
        }

        let mut seen: AHashSet<i64> = self.ids.iter().copied().collect();
        for id in ids {
            if *id < 0 {
                return Err(VectorIndexError::ReservedId(*id));
            }
            if !seen.insert(*id) {
                return Err(VectorIndexError::DuplicateId(*id));
            }
        }

        for vector in vectors {
            if vector.len() != self.dimension {
                return Err(VectorIndexError::InvalidDimension {
                    expected: self.dimension,
                    actual: vector.len(),
                });
            }
        }

        self.ids.extend_from_slice(ids);
        for vector in vectors {
            self.data.extend_from_slice(vector);
        }

        Ok(())
    }

    /// Search for the k most similar vectors
    ///
    /// Returns parallel `(ids, scores)` vectors of length exactly `k`,
    /// ordered by descending inner product. Slots beyond the stored vector
    /// count carry [`SENTINEL_ID`] and a meaningless score.
    pub fn search(&self, query: &[f32], k: usize) -> Result<(Vec<i64>, Vec<f32>), VectorIndexError> {
        if query.len() != self.dimension {
            return Err(VectorIndexError::InvalidDimension {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let rows = self.ids.len();
        let matrix = ArrayView2::from_shape((rows, self.dimension), &self.data)
            .map_err(|e| VectorIndexError::Storage(e.to_string()))?;
        let scores = matrix.dot(&ArrayView1::from(query));

        let mut order: Vec<usize> = (0..rows).collect();
        order.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        order.truncate(k);

        let mut result_ids: Vec<i64> = order.iter().map(|&i| self.ids[i]).collect();
        let mut result_scores: Vec<f32> = order.iter().map(|&i| scores[i]).collect();

        // Pad up to k when the index is smaller than the request
        while result_ids.len() < k {
            result_ids.push(SENTINEL_ID);
            result_scores.push(f32::NEG_INFINITY);
        }

        Ok((result_ids, result_scores))
    }

    /// Search once per query row
    ///
    /// Numerically identical to calling [`search`](Self::search) in a loop;
    /// exists so callers with several query sources stay on one code path.
    pub fn search_batch(
        &self,
        queries: &[Vec<f32>],
        k: usize,
    ) -> Result<Vec<(Vec<i64>, Vec<f32>)>, VectorIndexError> {
        queries.iter().map(|query| self.search(query, k)).collect()
    }

    /// Number of stored vectors
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if index is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Vector dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}
