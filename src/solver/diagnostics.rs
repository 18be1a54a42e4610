use crate::state::Field;

/// Sum of a field over interior cells.
pub fn total_mass(field: &Field) -> f32 {
    let n = field.n();
    let mut sum = 0.0;
    for i in 1..=n {
        for j in 1..=n {
            sum += field[(i, j)];
        }
    }
    sum
}

/// Compute volume-averaged kinetic energy: KE = 0.5 * <vx² + vy²>.
pub fn kinetic_energy(vx: &Field, vy: &Field) -> f32 {
    let n = vx.n();
    let mut sum = 0.0;
    for i in 1..=n {
        for j in 1..=n {
            sum += vx[(i, j)] * vx[(i, j)] + vy[(i, j)] * vy[(i, j)];
        }
    }
    if n > 0 { 0.5 * sum / (n * n) as f32 } else { 0.0 }
}

/// Central-difference divergence at every interior cell; ghost cells stay zero.
pub fn divergence(vx: &Field, vy: &Field) -> Field {
    let n = vx.n();
    let mut div = vx.clone();
    div.fill(0.0);
    let half_n = 0.5 * n as f32;
    for i in 1..=n {
        for j in 1..=n {
            div[(i, j)] = half_n * (vx[(i + 1, j)] - vx[(i - 1, j)] + vy[(i, j + 1)] - vy[(i, j - 1)]);
        }
    }
    div
}

pub fn max_abs_divergence(vx: &Field, vy: &Field) -> f32 {
    divergence(vx, vy)
        .as_slice()
        .iter()
        .fold(0.0_f32, |m, v| m.max(v.abs()))
}
