/// Errors surfaced by rule generation, rescaling and evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuadratureError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Integrand returned {value} at node {index} (x = {node})")]
    EvaluationFailure { index: usize, node: f64, value: f64 },

    #[error("Integrand returned {got} values for {expected} nodes")]
    ShapeMismatch { expected: usize, got: usize },

    /// Every sample was finite but the weighted sum overflowed.
    #[error("Weighted sum over {points} nodes is not finite ({value})")]
    NonFiniteEstimate { points: usize, value: f64 },
}

/// Non-fatal: Newton's method ran out of iterations for one root.
///
/// The rule is still built from the last iterate, so the affected node
/// and weight are only as good as `last_step` suggests.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("root {root_index} not converged after {iterations} iterations (last step {last_step:e})")]
pub struct PrecisionWarning {
    pub root_index: usize,
    pub iterations: usize,
    pub last_step: f64,
}

pub type Result<T> = std::result::Result<T, QuadratureError>;
