use crate::state::Field;
use super::boundary::{set_bnd, Boundary};

/// Accumulate `source` into the interior of `x`.
pub fn add_source(x: &mut Field, source: &Field) {
    let n = x.n();
    for i in 1..=n {
        for j in 1..=n {
            x[(i, j)] += source[(i, j)];
        }
    }
}

/// Gauss-Seidel iterative linear solver.
/// Solves: c * x[i,j] - a * (neighbors) = x0[i,j], seeded from x0.
/// Sweeps are in place and row-major; each sweep sees the values
/// already updated earlier in the same sweep.
pub fn lin_solve(b: Boundary, x: &mut Field, x0: &Field, a: f32, c: f32, iter: usize) {
    let n = x.n();
    let c_inv = 1.0 / c;
    x.copy_from(x0);
    for _ in 0..iter {
        for i in 1..=n {
            for j in 1..=n {
                let neighbors = x[(i - 1, j)] + x[(i + 1, j)] + x[(i, j - 1)] + x[(i, j + 1)];
                x[(i, j)] = (a * neighbors + x0[(i, j)]) * c_inv;
            }
        }
        set_bnd(b, x);
    }
}

/// Implicit diffusion step.
/// a = dt * rate * N^2, c = 1 + 4a
pub fn diffuse(b: Boundary, x: &mut Field, x0: &Field, rate: f32, dt: f32, iter: usize) {
    let n = x.n() as f32;
    let a = dt * rate * n * n;
    lin_solve(b, x, x0, a, 1.0 + 4.0 * a, iter);
}

/// Semi-Lagrangian advection: traces each cell centre backwards through
/// (vx, vy) and samples d0 bilinearly there.
pub fn advect(b: Boundary, d: &mut Field, d0: &Field, vx: &Field, vy: &Field, dt: f32) {
    let n = d.n();
    let n_f = n as f32;
    let dt0 = dt * n_f;

    for i in 1..=n {
        for j in 1..=n {
            // Clamp keeps the 2x2 footprint inside 0..=N+1
            let x = (i as f32 - dt0 * vx[(i, j)]).clamp(0.5, n_f + 0.5);
            let y = (j as f32 - dt0 * vy[(i, j)]).clamp(0.5, n_f + 0.5);

            let i0 = x.floor() as usize;
            let j0 = y.floor() as usize;
            let s1 = x - i0 as f32;
            let s0 = 1.0 - s1;
            let t1 = y - j0 as f32;
            let t0 = 1.0 - t1;

            d[(i, j)] = s0 * t0 * d0[(i0, j0)]
                + s0 * t1 * d0[(i0, j0 + 1)]
                + s1 * t0 * d0[(i0 + 1, j0)]
                + s1 * t1 * d0[(i0 + 1, j0 + 1)];
        }
    }
    set_bnd(b, d);
}

/// Pressure projection: removes the divergent part of (vx, vy).
/// `p` and `div` are scratch; their contents on entry are ignored.
pub fn project(vx: &mut Field, vy: &mut Field, p: &mut Field, div: &mut Field, iter: usize) {
    let n = vx.n();
    let h = 1.0 / n as f32;

    for i in 1..=n {
        for j in 1..=n {
            div[(i, j)] = -0.5 * h * (vx[(i + 1, j)] - vx[(i - 1, j)] + vy[(i, j + 1)] - vy[(i, j - 1)]);
            p[(i, j)] = 0.0;
        }
    }
    set_bnd(Boundary::None, div);
    set_bnd(Boundary::None, p);

    lin_solve(Boundary::None, p, div, 1.0, 4.0, iter);

    for i in 1..=n {
        for j in 1..=n {
            vx[(i, j)] -= 0.5 * (p[(i + 1, j)] - p[(i - 1, j)]) / h;
            vy[(i, j)] -= 0.5 * (p[(i, j + 1)] - p[(i, j - 1)]) / h;
        }
    }
    set_bnd(Boundary::MirrorX, vx);
    set_bnd(Boundary::MirrorY, vy);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::diagnostics::{divergence, total_mass};

    const ITER: usize = 30;

    fn spike(n: usize, value: f32) -> Field {
        let mut f = Field::zeroed(n).unwrap();
        f[(n / 2, n / 2)] = value;
        f
    }

    /// Outward velocity bump centred on the grid.
    fn outward_flow(n: usize) -> (Field, Field) {
        let mut vx = Field::zeroed(n).unwrap();
        let mut vy = Field::zeroed(n).unwrap();
        let c = (n + 1) as f32 / 2.0;
        for i in 1..=n {
            for j in 1..=n {
                let dx = i as f32 - c;
                let dy = j as f32 - c;
                let g = (-(dx * dx + dy * dy) / 20.0).exp();
                vx[(i, j)] = dx * 0.1 * g;
                vy[(i, j)] = dy * 0.1 * g;
            }
        }
        (vx, vy)
    }

    fn abs_stats(f: &Field) -> (f32, f32) {
        let n = f.n();
        let mut sum = 0.0;
        let mut max = 0.0_f32;
        for i in 1..=n {
            for j in 1..=n {
                sum += f[(i, j)].abs();
                max = max.max(f[(i, j)].abs());
            }
        }
        (sum, max)
    }

    #[test]
    fn test_add_source_interior_only() {
        let n = 6;
        let mut x = Field::zeroed(n).unwrap();
        let mut s = Field::zeroed(n).unwrap();
        s.fill(1.0);
        add_source(&mut x, &s);
        add_source(&mut x, &s);
        assert_eq!(x[(3, 3)], 2.0);
        assert_eq!(x[(0, 3)], 0.0, "ghost cells must not receive sources");
        assert_eq!(x[(n + 1, n + 1)], 0.0);
    }

    #[test]
    fn test_lin_solve_spreads_spike() {
        let n = 16;
        let x0 = spike(n, 100.0);
        let mut x = Field::zeroed(n).unwrap();
        lin_solve(Boundary::None, &mut x, &x0, 1.0, 5.0, 20);

        let m = n / 2;
        let center = x[(m, m)];
        let neighbor = x[(m + 1, m)];
        assert!(center > 0.0, "Center should still be positive");
        assert!(neighbor > 0.0, "Neighbors should get some value");
        assert!(center > neighbor, "Center should be larger than neighbor");
    }

    #[test]
    fn test_lin_solve_zero_iterations_copies_seed() {
        let n = 8;
        let x0 = spike(n, 7.0);
        let mut x = Field::zeroed(n).unwrap();
        x.fill(3.0);
        lin_solve(Boundary::None, &mut x, &x0, 1.0, 4.0, 0);
        assert_eq!(x, x0);
    }

    #[test]
    fn test_lin_solve_is_gauss_seidel() {
        // One sweep with a = 1, c = 1 on a 2x2 interior seeded with ones:
        // (1,1) sees its fresh ghosts-from-seed, (1,2) already sees the updated (1,1).
        let n = 2;
        let mut x0 = Field::zeroed(n).unwrap();
        for i in 1..=n {
            for j in 1..=n {
                x0[(i, j)] = 1.0;
            }
        }
        let mut x = Field::zeroed(n).unwrap();
        lin_solve(Boundary::None, &mut x, &x0, 1.0, 1.0, 1);
        // (1,1): neighbours (0,1)=0 (1,0)=0 (2,1)=1 (1,2)=1 -> 2 + 1 = 3
        // (1,2): neighbours (0,2)=0 (2,2)=1 (1,1)=3 (1,3)=0 -> 4 + 1 = 5
        assert_eq!(x[(1, 1)], 3.0);
        assert_eq!(x[(1, 2)], 5.0, "second cell should read the updated first cell");
    }

    #[test]
    fn test_diffuse_smooths() {
        let n = 16;
        let x0 = spike(n, 100.0);
        let mut x = Field::zeroed(n).unwrap();
        diffuse(Boundary::None, &mut x, &x0, 0.01, 0.1, ITER);

        let m = n / 2;
        assert!(x[(m, m)] < 100.0, "Center should be less than original spike");
        assert!(x[(m + 1, m)] > 0.0, "Neighbors should gain some value");
        assert!(x[(m, m - 1)] > 0.0, "Neighbors should gain some value");
    }

    #[test]
    fn test_diffuse_conserves_mass() {
        let n = 16;
        let x0 = spike(n, 100.0);
        let mut x = Field::zeroed(n).unwrap();
        diffuse(Boundary::None, &mut x, &x0, 0.01, 0.1, ITER);

        let before = total_mass(&x0);
        let after = total_mass(&x);
        assert!(
            ((after - before) / before).abs() < 1e-3,
            "Diffusion should not create mass: before={}, after={}",
            before, after
        );
    }

    #[test]
    fn test_diffuse_zero_rate_is_identity() {
        let n = 10;
        let x0 = spike(n, 42.0);
        let mut x = Field::zeroed(n).unwrap();
        diffuse(Boundary::None, &mut x, &x0, 0.0, 0.1, ITER);
        for i in 1..=n {
            for j in 1..=n {
                assert_eq!(x[(i, j)], x0[(i, j)], "interior changed at ({}, {})", i, j);
            }
        }
    }

    #[test]
    fn test_advect_zero_velocity_preserves() {
        let n = 16;
        let mut d0 = Field::zeroed(n).unwrap();
        for i in 1..=n {
            for j in 1..=n {
                d0[(i, j)] = i as f32 / n as f32 + 0.1 * j as f32;
            }
        }
        let mut d = Field::zeroed(n).unwrap();
        let vx = Field::zeroed(n).unwrap();
        let vy = Field::zeroed(n).unwrap();

        advect(Boundary::None, &mut d, &d0, &vx, &vy, 0.1);

        for i in 1..=n {
            for j in 1..=n {
                assert_eq!(
                    d[(i, j)], d0[(i, j)],
                    "Zero velocity should preserve field at ({}, {})",
                    i, j
                );
            }
        }
    }

    #[test]
    fn test_advect_uniform_field_unchanged() {
        let n = 16;
        let mut d0 = Field::zeroed(n).unwrap();
        d0.fill(5.0);
        let mut d = Field::zeroed(n).unwrap();
        let mut vx = Field::zeroed(n).unwrap();
        let mut vy = Field::zeroed(n).unwrap();
        vx.fill(0.3);
        vy.fill(-0.2);

        advect(Boundary::None, &mut d, &d0, &vx, &vy, 0.1);

        for i in 1..=n {
            for j in 1..=n {
                assert!(
                    (d[(i, j)] - 5.0).abs() < 1e-5,
                    "Uniform field should stay uniform: got {} at ({}, {})",
                    d[(i, j)], i, j
                );
            }
        }
    }

    #[test]
    fn test_advect_shifts_by_whole_cell() {
        // vx * dt * N = 1: each cell takes the value of its left neighbour.
        let n = 10;
        let dt = 0.1;
        let mut d0 = Field::zeroed(n).unwrap();
        d0[(4, 5)] = 1.0;
        let mut vx = Field::zeroed(n).unwrap();
        vx.fill(1.0 / (dt * n as f32));
        let vy = Field::zeroed(n).unwrap();
        let mut d = Field::zeroed(n).unwrap();

        advect(Boundary::None, &mut d, &d0, &vx, &vy, dt);

        assert!((d[(5, 5)] - 1.0).abs() < 1e-5, "value should arrive at (5,5), got {}", d[(5, 5)]);
        assert!(d[(4, 5)].abs() < 1e-5, "origin cell should empty, got {}", d[(4, 5)]);
    }

    #[test]
    fn test_advect_huge_velocity_stays_bounded() {
        let n = 12;
        let mut d0 = Field::zeroed(n).unwrap();
        for i in 0..n + 2 {
            for j in 0..n + 2 {
                d0[(i, j)] = ((i * 7 + j * 3) % 5) as f32;
            }
        }
        let mut vx = Field::zeroed(n).unwrap();
        let mut vy = Field::zeroed(n).unwrap();
        vx.fill(1e6);
        vy.fill(-1e6);
        let mut d = Field::zeroed(n).unwrap();

        advect(Boundary::None, &mut d, &d0, &vx, &vy, 0.1);

        for i in 1..=n {
            for j in 1..=n {
                let v = d[(i, j)];
                assert!(v.is_finite() && (0.0..=4.0).contains(&v), "({}, {}) = {}", i, j, v);
            }
        }
    }

    #[test]
    fn test_advect_applies_boundary() {
        let n = 8;
        let mut d0 = Field::zeroed(n).unwrap();
        d0.fill(2.0);
        let vx = Field::zeroed(n).unwrap();
        let vy = Field::zeroed(n).unwrap();
        let mut d = Field::zeroed(n).unwrap();

        advect(Boundary::MirrorX, &mut d, &d0, &vx, &vy, 0.1);

        assert_eq!(d[(0, 3)], -2.0);
        assert_eq!(d[(3, 0)], 2.0);
        assert_eq!(d[(0, 0)], 0.0);
    }

    #[test]
    fn test_project_reduces_divergence() {
        let n = 32;
        let (mut vx, mut vy) = outward_flow(n);
        let mut p = Field::zeroed(n).unwrap();
        let mut div = Field::zeroed(n).unwrap();

        let (sum_before, max_before) = abs_stats(&divergence(&vx, &vy));
        assert!(sum_before > 0.0, "Should have some initial divergence");

        project(&mut vx, &mut vy, &mut p, &mut div, ITER);

        let (sum_after, max_after) = abs_stats(&divergence(&vx, &vy));
        assert!(
            sum_after < sum_before,
            "Divergence should be reduced: before={}, after={}",
            sum_before, sum_after
        );
        assert!(
            max_after < max_before,
            "Peak divergence should be reduced: before={}, after={}",
            max_before, max_after
        );
    }

    #[test]
    fn test_project_zero_field_stays_zero() {
        let n = 8;
        let mut vx = Field::zeroed(n).unwrap();
        let mut vy = Field::zeroed(n).unwrap();
        let mut p = Field::zeroed(n).unwrap();
        let mut div = Field::zeroed(n).unwrap();
        p.fill(9.0);
        div.fill(-9.0);

        project(&mut vx, &mut vy, &mut p, &mut div, ITER);

        assert!(vx.as_slice().iter().all(|&v| v == 0.0));
        assert!(vy.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_project_enforces_wall_conditions() {
        let n = 16;
        let (mut vx, mut vy) = outward_flow(n);
        let mut p = Field::zeroed(n).unwrap();
        let mut div = Field::zeroed(n).unwrap();
        project(&mut vx, &mut vy, &mut p, &mut div, ITER);
        for k in 1..=n {
            assert_eq!(vx[(0, k)], -vx[(1, k)]);
            assert_eq!(vy[(k, n + 1)], -vy[(k, n)]);
        }
    }
}
