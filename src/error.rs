/// Errors produced by the polygonization pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolygonizeError {
    /// Fewer weight-map cells pass the threshold than points were requested.
    #[error(
        "not enough candidate points for threshold {threshold}: requested {requested}, only {available} available"
    )]
    InsufficientCandidates {
        requested: usize,
        available: usize,
        threshold: f32,
    },

    /// The point set has fewer than three distinct points or is collinear.
    #[error("cannot triangulate {points} points: too few distinct points or all collinear")]
    DegenerateGeometry { points: usize },

    /// No pixel survived the edge threshold, so the weight map cannot be normalized.
    #[error("edge map is empty: no edges found in the image")]
    EmptyEdgeMap,

    #[error("image has zero width or height")]
    EmptyImage,

    #[error("threshold {0} is outside [0, 1]")]
    InvalidThreshold(f32),
}

pub type Result<T> = std::result::Result<T, PolygonizeError>;

#[cfg(test)]
mod tests {
    use super::PolygonizeError;

    #[test]
    fn insufficient_candidates_message_carries_counts() {
        let err = PolygonizeError::InsufficientCandidates {
            requested: 10,
            available: 3,
            threshold: 0.5,
        };
        let message = err.to_string();
        assert!(message.contains("requested 10"));
        assert!(message.contains("only 3 available"));
        assert!(message.contains("0.5"));
    }
}
