//! In-process cosine similarity and top-k ranking.
//!
//! This is the reference ranking path. The Postgres backend answers the same
//! contract with a `<=>` distance-operator query; tests hold the two to the
//! same ordering.

use crate::error::SimilarityError;

/// Cosine similarity between two vectors of equal length, in [-1, 1].
///
/// Zero vectors have no direction; their similarity to anything is 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())) as f32)
}

/// Rank candidates against a query vector and keep the best `k`.
///
/// Ordering is descending by score with ties broken by input order, so
/// identical inputs always produce identical output and growing `k` only
/// appends. With a threshold, only candidates scoring at or above it are
/// eligible; without one, only the `k` cutoff applies.
pub fn top_k<T>(
    query: &[f32],
    candidates: impl IntoIterator<Item = (T, Vec<f32>)>,
    k: usize,
    threshold: Option<f32>,
) -> Result<Vec<(T, f32)>, SimilarityError> {
    let mut scored = Vec::new();
    for (item, vector) in candidates {
        let score = cosine_similarity(query, &vector)?;
        if threshold.is_none_or(|t| score >= t) {
            scored.push((item, score));
        }
    }

    // Stable sort keeps first-seen candidates ahead on equal scores.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors() {
        let v = vec![0.5, -1.0, 2.0];
        let score = cosine_similarity(&v, &v).unwrap();
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite_vectors() {
        let a = vec![1.0, 2.0];
        let b = vec![-1.0, -2.0];
        let score = cosine_similarity(&a, &b).unwrap();
        assert!((score + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        let score = cosine_similarity(&a, &b).unwrap();
        assert!(score.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_bounds() {
        let a = vec![3.1, -0.2, 0.7, 11.0];
        let b = vec![-2.0, 5.5, 0.1, 0.3];
        let score = cosine_similarity(&a, &b).unwrap();
        assert!((-1.0..=1.0).contains(&score));
    }

    #[test]
    fn test_cosine_dimension_mismatch() {
        let err = cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]).unwrap_err();
        match err {
            SimilarityError::DimensionMismatch { expected, actual } => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 3);
            }
        }
    }

    #[test]
    fn test_cosine_zero_vector() {
        let score = cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_top_k_orders_descending() {
        let query = vec![1.0, 0.0];
        let candidates = vec![
            ("mid", vec![1.0, 1.0]),
            ("best", vec![2.0, 0.0]),
            ("worst", vec![-1.0, 0.0]),
        ];
        let ranked = top_k(&query, candidates, 3, None).unwrap();
        let names: Vec<_> = ranked.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["best", "mid", "worst"]);
    }

    #[test]
    fn test_top_k_ties_keep_input_order() {
        let query = vec![1.0, 0.0];
        // Same direction, different magnitudes: identical scores.
        let candidates = vec![
            ("first", vec![1.0, 0.0]),
            ("second", vec![2.0, 0.0]),
            ("third", vec![3.0, 0.0]),
        ];
        let ranked = top_k(&query, candidates, 3, None).unwrap();
        let names: Vec<_> = ranked.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_top_k_growing_k_only_appends() {
        let query = vec![1.0, 0.5];
        let candidates = vec![
            ("a", vec![1.0, 0.4]),
            ("b", vec![0.2, 1.0]),
            ("c", vec![1.0, 0.6]),
            ("d", vec![-0.5, 0.1]),
        ];
        let two = top_k(&query, candidates.clone(), 2, None).unwrap();
        let four = top_k(&query, candidates, 4, None).unwrap();
        assert_eq!(two.len(), 2);
        assert_eq!(four.len(), 4);
        for (i, (name, score)) in two.iter().enumerate() {
            assert_eq!(*name, four[i].0);
            assert_eq!(*score, four[i].1);
        }
    }

    #[test]
    fn test_top_k_threshold_is_inclusive() {
        let query = vec![1.0, 0.0];
        let candidates = vec![
            ("exact", vec![1.0, 0.0]),    // score 1.0
            ("ortho", vec![0.0, 1.0]),    // score 0.0
            ("negative", vec![-1.0, 0.0]), // score -1.0
        ];
        let ranked = top_k(&query, candidates, 10, Some(0.0)).unwrap();
        let names: Vec<_> = ranked.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["exact", "ortho"]);
    }

    #[test]
    fn test_top_k_truncates_to_k() {
        let query = vec![1.0];
        let candidates: Vec<(usize, Vec<f32>)> =
            (0..10).map(|i| (i, vec![i as f32 + 1.0])).collect();
        let ranked = top_k(&query, candidates, 3, None).unwrap();
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_top_k_propagates_dimension_mismatch() {
        let query = vec![1.0, 0.0];
        let candidates = vec![("ok", vec![1.0, 0.0]), ("bad", vec![1.0])];
        assert!(top_k(&query, candidates, 2, None).is_err());
    }
}
