use crate::error::{PrecisionWarning, QuadratureError, Result};
use crate::quadrature::{generate_with, integrate_rule, Integrand, NewtonSettings};

use csv::Writer;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvergenceRow {
    pub points: usize,
    pub estimate: f64,
    /// |I_N - I_prev|, empty for the first row.
    pub delta: Option<f64>,
    #[serde(skip)]
    pub warnings: Vec<PrecisionWarning>,
}

/// Integrates `f` over `[a, b]` once per point count in `points`, in order.
pub fn convergence_sweep<F, P>(f: F, a: f64, b: f64, points: P) -> Result<Vec<ConvergenceRow>>
where
    F: Integrand,
    P: IntoIterator<Item = usize>,
{
    sweep(&f, a, b, points, &NewtonSettings::default(), |_| {})
}

/// [`convergence_sweep`] with explicit Newton settings for the rules.
pub fn convergence_sweep_with<F, P>(
    f: F,
    a: f64,
    b: f64,
    points: P,
    settings: &NewtonSettings,
) -> Result<Vec<ConvergenceRow>>
where
    F: Integrand,
    P: IntoIterator<Item = usize>,
{
    sweep(&f, a, b, points, settings, |_| {})
}

fn sweep<F, P, S>(
    f: &F,
    a: f64,
    b: f64,
    points: P,
    settings: &NewtonSettings,
    mut on_step: S,
) -> Result<Vec<ConvergenceRow>>
where
    F: Integrand + ?Sized,
    P: IntoIterator<Item = usize>,
    S: FnMut(&ConvergenceRow),
{
    let mut rows: Vec<ConvergenceRow> = Vec::new();

    for n in points {
        let scaled = generate_with(n, settings)?.scale(a, b)?;
        let estimate = integrate_rule(f, &scaled)?;

        let delta = rows.last().map(|prev| (estimate.value - prev.estimate).abs());
        let row = ConvergenceRow {
            points: n,
            estimate: estimate.value,
            delta,
            warnings: estimate.warnings,
        };
        on_step(&row);
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(QuadratureError::InvalidArgument(
            "convergence sweep needs at least one point count".to_string(),
        ));
    }
    Ok(rows)
}

/// True when the last `window` estimates lie within `tol` of each other.
pub fn is_settled(rows: &[ConvergenceRow], window: usize, tol: f64) -> bool {
    if window < 2 || rows.len() < window {
        return false;
    }
    let tail = &rows[rows.len() - window..];
    let (lo, hi) = tail
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), row| {
            (lo.min(row.estimate), hi.max(row.estimate))
        });
    hi - lo <= tol
}

pub fn write_convergence_csv(
    rows: &[ConvergenceRow],
    csv_path: &Path,
) -> std::result::Result<(), Box<dyn Error>> {
    if let Some(parent) = csv_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut wtr = Writer::from_path(csv_path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    Ok(())
}

/// Sweeps `n_min..=n_max` with a progress bar and writes the table to `csv_path`.
pub fn convergence_study<F>(
    f: F,
    a: f64,
    b: f64,
    n_min: usize,
    n_max: usize,
    csv_path: &Path,
) -> std::result::Result<Vec<ConvergenceRow>, Box<dyn Error>>
where
    F: Integrand,
{
    let pb = ProgressBar::new((n_max + 1).saturating_sub(n_min) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] N = {msg} ({pos}/{len})",
            )?
            .progress_chars("█░"),
    );

    let settings = NewtonSettings::default();
    let rows = sweep(&f, a, b, n_min..=n_max, &settings, |row| {
        for warning in &row.warnings {
            pb.println(format!("N = {}: {}", row.points, warning));
        }
        pb.set_message(row.points.to_string());
        pb.inc(1);
    })?;
    pb.finish_with_message(format!("{} done", n_max));

    write_convergence_csv(&rows, csv_path)?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::env;

    fn smooth(x: f64) -> f64 {
        x.powi(6) - x * x * (2.0 * x).sin()
    }

    #[test]
    fn rows_follow_requested_order() {
        let rows = convergence_sweep(smooth, 1.0, 3.0, [5, 2, 9]).unwrap();
        let points: Vec<usize> = rows.iter().map(|r| r.points).collect();
        assert_eq!(points, vec![5, 2, 9]);
        assert_eq!(rows[0].delta, None);
        assert_relative_eq!(
            rows[1].delta.unwrap(),
            (rows[1].estimate - rows[0].estimate).abs()
        );
    }

    #[test]
    fn empty_range_is_rejected() {
        assert!(matches!(
            convergence_sweep(smooth, 1.0, 3.0, 3..3),
            Err(QuadratureError::InvalidArgument(_))
        ));
    }

    #[test]
    fn failures_propagate() {
        assert!(convergence_sweep(smooth, 1.0, 3.0, [2, 0, 4]).is_err());
        assert!(convergence_sweep(smooth, 3.0, 1.0, 2..5).is_err());
    }

    #[test]
    fn polynomial_settles_immediately() {
        let rows = convergence_sweep(|x: f64| 4.0 * x.powi(3) - x, 0.0, 2.0, 2..8).unwrap();
        for row in &rows {
            assert_relative_eq!(row.estimate, 14.0, max_relative = 1e-13);
        }
        assert!(is_settled(&rows, 6, 1e-12));
    }

    #[test]
    fn settled_needs_a_full_window() {
        let rows = convergence_sweep(smooth, 1.0, 3.0, 2..5).unwrap();
        assert!(!is_settled(&rows, 4, 1.0));
        assert!(!is_settled(&rows, 1, 1.0));
        assert!(!is_settled(&rows, 3, 1e-12));
    }

    #[test]
    fn rows_carry_precision_warnings() {
        let clean = convergence_sweep(smooth, 1.0, 3.0, 2..6).unwrap();
        assert!(clean.iter().all(|row| row.warnings.is_empty()));

        let starved = NewtonSettings {
            tolerance: 1e-15,
            max_iterations: 1,
        };
        let rows = convergence_sweep_with(smooth, 1.0, 3.0, [6, 10], &starved).unwrap();
        for row in &rows {
            assert!(!row.warnings.is_empty(), "N = {}", row.points);
            assert!(row.warnings.iter().all(|w| w.root_index < row.points));
        }
    }

    #[test]
    fn csv_has_header_and_rows() {
        let dir = env::temp_dir().join(format!("gauss_quad_conv_{}", std::process::id()));
        let path = dir.join("nested").join("convergence.csv");

        let rows = convergence_sweep(smooth, 1.0, 3.0, 2..5).unwrap();
        write_convergence_csv(&rows, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "points,estimate,delta");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("2,"));
        assert!(lines[1].ends_with(','));

        fs::remove_dir_all(&dir).unwrap();
    }
}
