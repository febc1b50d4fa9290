pub mod convergence;
pub mod error;
pub mod examples;
pub mod quadrature;

pub use error::{PrecisionWarning, QuadratureError, Result};
pub use quadrature::{
    generate, generate_with, integrate, integrate_oriented, integrate_rule, scale,
    IntegralEstimate, Integrand, NewtonSettings, QuadratureRule, RuleCache, ScaledRule,
    Vectorized,
};
