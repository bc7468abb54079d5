//! Vector similarity used for approximate matching

/// Scale a vector to unit length in place. The zero vector is left untouched.
pub fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm == 0.0 || !norm.is_finite() {
        return;
    }

    for value in vector.iter_mut() {
        *value /= norm;
    }
}

/// Dot product of two pre-normalized vectors (cosine similarity for unit vectors).
///
/// Mismatched or empty inputs score zero, as does the zero vector, so a
/// degenerate embedding can never produce a match.
pub fn similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let score: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();

    if score.is_finite() { score } else { 0.0 }
}

/// A match is declared only when the score strictly exceeds the threshold
pub fn is_match(score: f32, threshold: f32) -> bool {
    score > threshold
}
