//! Cosine similarity between embeddings.

use crate::error::{RagError, Result};
use crate::models::Embedding;

/// Cosine of the angle between `a` and `b`.
///
/// Fails with `DimensionMismatch` on unequal lengths and `EmptyVector` when
/// either norm is zero. Accumulates in `f64`, so large finite components
/// cannot overflow into `NaN`. The result is not clamped.
pub fn cosine_similarity(a: &Embedding, b: &Embedding) -> Result<f32> {
    a.ensure_same_dimensions(b)?;

    let dot: f64 = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum();
    let norm_a = a.norm();
    let norm_b = b.norm();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(RagError::EmptyVector);
    }

    Ok((dot / (norm_a * norm_b)) as f32)
}
