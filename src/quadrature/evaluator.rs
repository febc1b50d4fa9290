extern crate nalgebra as na;

use crate::error::{PrecisionWarning, QuadratureError, Result};
use crate::quadrature::rule::{generate, scale, ScaledRule};

/// A real function of one real variable that can be sampled at quadrature nodes.
pub trait Integrand {
    fn evaluate(&self, x: f64) -> f64;

    /// Samples every node at once. The default goes node by node.
    fn evaluate_nodes(&self, nodes: &na::DVector<f64>) -> na::DVector<f64> {
        nodes.map(|x| self.evaluate(x))
    }
}

impl<F> Integrand for F
where
    F: Fn(f64) -> f64,
{
    fn evaluate(&self, x: f64) -> f64 {
        self(x)
    }
}

/// Adapts an array callable, one that maps all nodes to all values in a single call.
///
/// Evaluation over a rule always goes through `evaluate_nodes`. The scalar
/// `evaluate` is a convenience that calls the closure on a one-element vector
/// and yields NaN when the closure returns nothing.
pub struct Vectorized<F>(pub F)
where
    F: Fn(&na::DVector<f64>) -> na::DVector<f64>;

impl<F> Integrand for Vectorized<F>
where
    F: Fn(&na::DVector<f64>) -> na::DVector<f64>,
{
    fn evaluate(&self, x: f64) -> f64 {
        let values = (self.0)(&na::DVector::from_element(1, x));
        values.get(0).copied().unwrap_or(f64::NAN)
    }

    fn evaluate_nodes(&self, nodes: &na::DVector<f64>) -> na::DVector<f64> {
        (self.0)(nodes)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegralEstimate {
    pub value: f64,
    /// Number of Gauss points behind `value`.
    pub points: usize,
    pub warnings: Vec<PrecisionWarning>,
}

/// Approximates the integral of `f` over `[a, b]` with the `n`-point
/// Gauss-Legendre rule. Exact for polynomials of degree up to `2n - 1`.
///
/// Requires `n >= 1` and finite `a < b`; see [`integrate_oriented`] for the
/// signed convention on reversed or empty intervals.
pub fn integrate<F>(f: F, a: f64, b: f64, n: usize) -> Result<IntegralEstimate>
where
    F: Integrand,
{
    let rule = generate(n)?;
    let scaled = scale(a, b, &rule)?;
    integrate_rule(&f, &scaled)
}

/// Weighted sum of `f` over an already scaled rule.
pub fn integrate_rule<F>(f: &F, rule: &ScaledRule) -> Result<IntegralEstimate>
where
    F: Integrand + ?Sized,
{
    let values = f.evaluate_nodes(rule.nodes());
    if values.len() != rule.len() {
        return Err(QuadratureError::ShapeMismatch {
            expected: rule.len(),
            got: values.len(),
        });
    }

    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(QuadratureError::EvaluationFailure {
            index,
            node: rule.nodes()[index],
            value,
        });
    }

    let value = rule.weights().dot(&values);
    if !value.is_finite() {
        return Err(QuadratureError::NonFiniteEstimate {
            points: rule.len(),
            value,
        });
    }

    Ok(IntegralEstimate {
        value,
        points: rule.len(),
        warnings: rule.precision_warnings().to_vec(),
    })
}

/// Like [`integrate`], but follows the calculus convention for the bounds:
/// an empty interval gives 0 and `a > b` gives minus the integral over `[b, a]`.
pub fn integrate_oriented<F>(f: F, a: f64, b: f64, n: usize) -> Result<IntegralEstimate>
where
    F: Integrand,
{
    if a == b {
        let rule = generate(n)?;
        if !a.is_finite() {
            return Err(QuadratureError::InvalidArgument(format!(
                "interval bounds must be finite, got [{}, {}]",
                a, b
            )));
        }
        return Ok(IntegralEstimate {
            value: 0.0,
            points: n,
            warnings: rule.precision_warnings().to_vec(),
        });
    }

    if a > b {
        let mut estimate = integrate(f, b, a, n)?;
        estimate.value = -estimate.value;
        return Ok(estimate);
    }

    integrate(f, a, b, n)
}
