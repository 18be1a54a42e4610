use crate::state::Field;

/// Edge rule applied to a field's ghost cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Zero-gradient: ghost cells copy their interior neighbour (scalars, pressure).
    None,
    /// Negate across the left/right walls (x-velocity).
    MirrorX,
    /// Negate across the bottom/top walls (y-velocity).
    MirrorY,
}

/// Rewrite the four edges of `x` for boundary kind `b`, then zero the corners.
pub fn set_bnd(b: Boundary, x: &mut Field) {
    let n = x.n();
    let sx = if b == Boundary::MirrorX { -1.0 } else { 1.0 };
    let sy = if b == Boundary::MirrorY { -1.0 } else { 1.0 };
    for i in 1..=n {
        x[(0, i)] = sx * x[(1, i)];
        x[(n + 1, i)] = sx * x[(n, i)];
        x[(i, 0)] = sy * x[(i, 1)];
        x[(i, n + 1)] = sy * x[(i, n)];
    }

    // Corners override whatever the edge rule produced.
    x[(0, 0)] = 0.0;
    x[(0, n + 1)] = 0.0;
    x[(n + 1, 0)] = 0.0;
    x[(n + 1, n + 1)] = 0.0;
}
