use crate::convergence::convergence_study;
use crate::error::Result as QuadResult;
use crate::quadrature::{integrate, legendre, IntegralEstimate};

use csv::Writer;
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::Path;

const X_BEGIN: f64 = 1.0;
const X_END: f64 = 3.0;

#[derive(Serialize)]
struct LegendreRow {
    degree: usize,
    x: f64,
    p: f64,
}

/// x^6 - x^2 sin(2x), the test integrand of the demos.
pub fn demo_integrand(x: f64) -> f64 {
    x.powi(6) - x * x * (2.0 * x).sin()
}

/// Closed form of the integral of [`demo_integrand`] over `[a, b]`.
pub fn demo_exact(a: f64, b: f64) -> f64 {
    let antiderivative = |x: f64| {
        x.powi(7) / 7.0 + 0.5 * x * x * (2.0 * x).cos()
            - 0.5 * x * (2.0 * x).sin()
            - 0.25 * (2.0 * x).cos()
    };
    antiderivative(b) - antiderivative(a)
}

/// Estimates of [`demo_integrand`] over [1, 3], one per point count.
pub fn demo_estimates<P>(points: P) -> QuadResult<Vec<IntegralEstimate>>
where
    P: IntoIterator<Item = usize>,
{
    points
        .into_iter()
        .map(|n| integrate(demo_integrand, X_BEGIN, X_END, n))
        .collect()
}

pub fn estimate_table() -> Result<(), Box<dyn Error>> {
    for estimate in demo_estimates(2..=6)? {
        let n = estimate.points;
        println!(
            "For N={} the integral is approximately {:.12}",
            n, estimate.value
        );
    }
    println!(
        "Exact value                            {:.12}",
        demo_exact(X_BEGIN, X_END)
    );

    Ok(())
}

pub fn legendre_curves() -> Result<(), Box<dyn Error>> {
    let csv_path = Path::new("results/csv_files/plot_files/legendre_polynomials.csv");
    write_legendre_curves(csv_path)?;

    println!("Legendre samples written to {}", csv_path.display());
    Ok(())
}

/// Samples P_2..P_6 on 128 evenly spaced points of [1, 3] for plotting.
pub fn write_legendre_curves(csv_path: &Path) -> Result<(), Box<dyn Error>> {
    let num_points = 128;
    let dx = (X_END - X_BEGIN) / (num_points - 1) as f64;

    if let Some(parent) = csv_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut wtr = Writer::from_path(csv_path)?;

    for degree in 2..=6 {
        for i in 0..num_points {
            let x = X_BEGIN + i as f64 * dx;
            let row = LegendreRow {
                degree,
                x,
                p: legendre(degree, x),
            };
            wtr.serialize(row)?;
        }
    }
    wtr.flush()?;

    Ok(())
}

pub fn convergence() -> Result<(), Box<dyn Error>> {
    let csv_path = Path::new("results/csv_files/conv_files/convergence_gauss_legendre.csv");
    let rows = convergence_study(demo_integrand, X_BEGIN, X_END, 2, 20, csv_path)?;

    let exact = demo_exact(X_BEGIN, X_END);
    if let Some(last) = rows.last() {
        println!(
            "N={}: {:.15} (error {:.3e}, last step {:.3e})",
            last.points,
            last.estimate,
            (last.estimate - exact).abs(),
            last.delta.unwrap_or(f64::NAN)
        );
    }

    Ok(())
}
