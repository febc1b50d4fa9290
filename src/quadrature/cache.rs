use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::Result;
use crate::quadrature::evaluator::{integrate_rule, Integrand, IntegralEstimate};
use crate::quadrature::rule::{generate_with, NewtonSettings, QuadratureRule};

/// Reference rules keyed by point count, shared between callers.
///
/// Stored rules are never modified. Two threads missing the same `n` at once
/// may both build it; the first insert wins and both get that copy.
#[derive(Debug, Default)]
pub struct RuleCache {
    settings: NewtonSettings,
    rules: RwLock<HashMap<usize, Arc<QuadratureRule>>>,
}

impl RuleCache {
    pub fn new(settings: NewtonSettings) -> Self {
        RuleCache {
            settings,
            rules: RwLock::new(HashMap::new()),
        }
    }

    pub fn settings(&self) -> &NewtonSettings {
        &self.settings
    }

    pub fn rule(&self, n: usize) -> Result<Arc<QuadratureRule>> {
        {
            let rules = self.rules.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(rule) = rules.get(&n) {
                return Ok(Arc::clone(rule));
            }
        }

        let fresh = Arc::new(generate_with(n, &self.settings)?);
        let mut rules = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(rules.entry(n).or_insert(fresh)))
    }

    /// Same contract as [`crate::quadrature::evaluator::integrate`], reusing cached rules.
    pub fn integrate<F>(&self, f: F, a: f64, b: f64, n: usize) -> Result<IntegralEstimate>
    where
        F: Integrand,
    {
        let scaled = self.rule(n)?.scale(a, b)?;
        integrate_rule(&f, &scaled)
    }

    pub fn len(&self) -> usize {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuadratureError;
    use crate::quadrature::evaluator::integrate;
    use crate::quadrature::rule::generate;
    use std::thread;

    #[test]
    fn hands_out_the_same_rule() {
        let cache = RuleCache::default();
        assert!(cache.is_empty());

        let first = cache.rule(7).unwrap();
        let second = cache.rule(7).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, generate(7).unwrap());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn errors_are_not_cached() {
        let cache = RuleCache::default();
        assert!(matches!(
            cache.rule(0),
            Err(QuadratureError::InvalidArgument(_))
        ));
        assert!(cache.is_empty());
    }

    #[test]
    fn cached_integration_matches_direct() {
        let cache = RuleCache::default();
        let f = |x: f64| (x * x).cos();
        for n in 1..10 {
            let cached = cache.integrate(f, -0.5, 2.0, n).unwrap();
            let direct = integrate(f, -0.5, 2.0, n).unwrap();
            assert_eq!(cached, direct);
        }
        assert!(cache.integrate(f, 1.0, 0.0, 3).is_err());
    }

    #[test]
    fn shared_across_threads() {
        let cache = RuleCache::new(NewtonSettings::default());
        let expected = generate(16).unwrap();

        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    let rule = cache.rule(16).unwrap();
                    assert_eq!(*rule, expected);
                });
            }
        });

        assert_eq!(cache.len(), 1);
        assert_eq!(*cache.rule(16).unwrap(), expected);
    }
}
