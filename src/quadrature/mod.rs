//! Gauss-Legendre quadrature: reference rules on [-1, 1], rescaling onto
//! `[a, b]`, and the weighted sum over integrand samples.

pub mod cache;
pub mod evaluator;
pub mod legendre;
pub mod rule;

pub use cache::RuleCache;
pub use evaluator::{
    integrate, integrate_oriented, integrate_rule, IntegralEstimate, Integrand, Vectorized,
};
pub use legendre::{legendre, legendre_and_derivative};
pub use rule::{generate, generate_with, scale, NewtonSettings, QuadratureRule, ScaledRule};
