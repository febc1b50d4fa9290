use gauss_quad::examples::{convergence, estimate_table, legendre_curves};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    estimate_table()?;
    legendre_curves()?;
    convergence()?;
    Ok(())
}
