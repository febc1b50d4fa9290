/// P_n(x) by the three-term recurrence
/// P_k(x) = ((2k - 1) x P_{k-1}(x) - (k - 1) P_{k-2}(x)) / k, P_0 = 1, P_1 = x.
pub fn legendre(n: usize, x: f64) -> f64 {
    legendre_pair(n, x).0
}

/// Returns (P_n(x), P_{n-1}(x)). For n == 0 the second entry is 0.
fn legendre_pair(n: usize, x: f64) -> (f64, f64) {
    if n == 0 {
        return (1.0, 0.0);
    }

    let mut p_prev = 1.0;
    let mut p_curr = x;
    for k in 2..=n {
        let kf = k as f64;
        let p_next = ((2.0 * kf - 1.0) * x * p_curr - (kf - 1.0) * p_prev) / kf;
        p_prev = p_curr;
        p_curr = p_next;
    }
    (p_curr, p_prev)
}

/// Returns (P_n(x), P_n'(x)).
///
/// The derivative uses P_n'(x) = n (x P_n(x) - P_{n-1}(x)) / (x^2 - 1) inside
/// the interval and the closed forms P_n'(±1) = (±1)^(n+1) n(n+1)/2 at the ends.
pub fn legendre_and_derivative(n: usize, x: f64) -> (f64, f64) {
    if n == 0 {
        return (1.0, 0.0);
    }

    let (p_n, p_n_minus_1) = legendre_pair(n, x);
    let nf = n as f64;

    let dp_n = if (x.abs() - 1.0).abs() < 1e-14 {
        let edge = 0.5 * nf * (nf + 1.0);
        if x > 0.0 || n % 2 == 1 {
            edge
        } else {
            -edge
        }
    } else {
        nf * (x * p_n - p_n_minus_1) / (x * x - 1.0)
    };

    (p_n, dp_n)
}
