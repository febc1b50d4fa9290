extern crate nalgebra as na;

use std::f64::consts::PI;

use crate::error::{PrecisionWarning, QuadratureError, Result};
use crate::quadrature::legendre::legendre_and_derivative;

/// Stopping criteria for the Newton iteration on the roots of P_N.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonSettings {
    /// Absolute bound on the last Newton step.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for NewtonSettings {
    fn default() -> Self {
        NewtonSettings {
            tolerance: 1e-15,
            max_iterations: 100,
        }
    }
}

impl NewtonSettings {
    fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(QuadratureError::InvalidArgument(format!(
                "Newton tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(QuadratureError::InvalidArgument(
                "Newton iteration budget must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Gauss-Legendre nodes and weights on the reference interval [-1, 1].
///
/// Nodes are strictly increasing and mirror-symmetric about 0, weights are
/// positive and sum to 2.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureRule {
    nodes: na::DVector<f64>,
    weights: na::DVector<f64>,
    warnings: Vec<PrecisionWarning>,
}

/// A [`QuadratureRule`] mapped onto `[a, b]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledRule {
    a: f64,
    b: f64,
    nodes: na::DVector<f64>,
    weights: na::DVector<f64>,
    warnings: Vec<PrecisionWarning>,
}

impl QuadratureRule {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &na::DVector<f64> {
        &self.nodes
    }

    pub fn weights(&self) -> &na::DVector<f64> {
        &self.weights
    }

    /// Roots that did not reach the Newton tolerance. Empty for a clean rule.
    pub fn precision_warnings(&self) -> &[PrecisionWarning] {
        &self.warnings
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.nodes.iter().copied().zip(self.weights.iter().copied())
    }

    pub fn scale(&self, a: f64, b: f64) -> Result<ScaledRule> {
        scale(a, b, self)
    }
}

impl ScaledRule {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn interval(&self) -> (f64, f64) {
        (self.a, self.b)
    }

    pub fn nodes(&self) -> &na::DVector<f64> {
        &self.nodes
    }

    pub fn weights(&self) -> &na::DVector<f64> {
        &self.weights
    }

    pub fn precision_warnings(&self) -> &[PrecisionWarning] {
        &self.warnings
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.nodes.iter().copied().zip(self.weights.iter().copied())
    }
}

/// Builds the `n`-point Gauss-Legendre rule with the default Newton settings.
pub fn generate(n: usize) -> Result<QuadratureRule> {
    generate_with(n, &NewtonSettings::default())
}

/// Builds the `n`-point Gauss-Legendre rule.
///
/// Only the non-negative roots of P_n are iterated; the negative half is
/// mirrored, and for odd `n` the middle node is exactly zero. A root that
/// exhausts `settings.max_iterations` keeps its last iterate and is reported
/// through [`QuadratureRule::precision_warnings`].
pub fn generate_with(n: usize, settings: &NewtonSettings) -> Result<QuadratureRule> {
    if n < 1 {
        return Err(QuadratureError::InvalidArgument(
            "number of quadrature points must be at least 1".to_string(),
        ));
    }
    settings.validate()?;

    let mut nodes: na::DVector<f64> = na::DVector::zeros(n);
    let mut weights: na::DVector<f64> = na::DVector::zeros(n);
    let mut warnings = Vec::new();
    let nf = n as f64;

    // i = 0 is the largest root
    for i in 0..n.div_ceil(2) {
        let hi = n - 1 - i;

        let z = if hi == i {
            0.0
        } else {
            let mut z = (PI * (i as f64 + 0.75) / (nf + 0.5)).cos();
            let mut converged = false;
            let mut step = f64::INFINITY;

            for _ in 0..settings.max_iterations {
                let (p, dp) = legendre_and_derivative(n, z);
                step = p / dp;
                z -= step;
                if step.abs() <= settings.tolerance {
                    converged = true;
                    break;
                }
            }

            if !converged {
                warnings.push(PrecisionWarning {
                    root_index: hi,
                    iterations: settings.max_iterations,
                    last_step: step.abs(),
                });
            }
            z
        };

        let (_, dp) = legendre_and_derivative(n, z);
        let w = 2.0 / ((1.0 - z * z) * dp * dp);

        nodes[i] = -z;
        nodes[hi] = z;
        weights[i] = w;
        weights[hi] = w;
    }

    warnings.sort_by_key(|w| w.root_index);

    Ok(QuadratureRule {
        nodes,
        weights,
        warnings,
    })
}

/// Maps `rule` from [-1, 1] onto `[a, b]`:
/// x' = (b - a)/2 x + (b + a)/2, w' = (b - a)/2 w.
pub fn scale(a: f64, b: f64, rule: &QuadratureRule) -> Result<ScaledRule> {
    if !a.is_finite() || !b.is_finite() {
        return Err(QuadratureError::InvalidArgument(format!(
            "interval bounds must be finite, got [{}, {}]",
            a, b
        )));
    }
    if a >= b {
        return Err(QuadratureError::InvalidArgument(format!(
            "interval requires a < b, got a = {}, b = {}",
            a, b
        )));
    }

    // halve before combining so bounds near f64::MAX stay finite
    let half_length = 0.5 * b - 0.5 * a;
    let midpoint = 0.5 * a + 0.5 * b;
    if !half_length.is_finite() || half_length <= 0.0 {
        return Err(QuadratureError::InvalidArgument(format!(
            "interval [{}, {}] has no representable half-length",
            a, b
        )));
    }

    Ok(ScaledRule {
        a,
        b,
        nodes: rule.nodes.map(|x| half_length * x + midpoint),
        weights: &rule.weights * half_length,
        warnings: rule.warnings.clone(),
    })
}
