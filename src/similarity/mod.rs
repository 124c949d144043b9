
/// Compute the dot product of two vectors
fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Compute the cosine similarity between two embedding vectors
///
/// Returns a value conceptually in `[-1.0, 1.0]`, where 1.0 means the
/// vectors point in the same direction.
///
/// Both vectors must have the same dimensionality, which is the case for
/// embeddings produced by the same model. This is not checked at runtime;
/// mismatched lengths produce a degenerate value because the pairwise
/// product stops at the shorter input.
///
/// If either vector has a zero norm, returns exactly `0.0` ("no
/// similarity") rather than dividing by zero.
#[inline]
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let product = dot_product(a, b);
    let norm_a = dot_product(a, a).sqrt();
    let norm_b = dot_product(b, b).sqrt();
    if norm_a <= 0.0 || norm_b <= 0.0 {
        return 0.0;
    }
    product / (norm_a * norm_b)
}
