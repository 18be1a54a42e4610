use crate::config::Config;
use crate::error::Result;
use crate::solver::diagnostics::{kinetic_energy, max_abs_divergence, total_mass};
use crate::solver::Solver;

/// State of the fluid after a headless run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: usize,
    pub total_mass: f32,
    pub kinetic_energy: f32,
    pub max_divergence: f32,
}

impl RunSummary {
    fn capture(solver: &Solver, steps: usize) -> Result<Self> {
        let vx = solver.velocity_x()?;
        let vy = solver.velocity_y()?;
        Ok(Self {
            steps,
            total_mass: total_mass(solver.density()?),
            kinetic_energy: kinetic_energy(vx, vy),
            max_divergence: max_abs_divergence(vx, vy),
        })
    }
}

/// Drive a solver for `cfg.run.steps` frames without rendering: inject the
/// emitter, step, discard consumed impulses, log diagnostics periodically.
pub fn run_headless(cfg: &Config) -> Result<RunSummary> {
    let params = cfg.solver_params();
    let mut solver = Solver::new(params)?;
    solver.allocate_data()?;

    let n = solver.n();
    let (ex, ey) = cfg.emitter.cell(n);
    log::info!(
        "headless run: N={} dt={} diff={} visc={} steps={} emitter=({}, {})",
        n,
        solver.params().dt,
        solver.params().diff,
        solver.params().visc,
        cfg.run.steps,
        ex,
        ey
    );

    for step in 0..cfg.run.steps {
        if step < cfg.emitter.frames {
            solver.add_density(ex, ey, cfg.emitter.density)?;
            solver.add_velocity(ex, ey, cfg.emitter.force_x, cfg.emitter.force_y)?;
        }
        solver.solve()?;
        solver.clear_previous()?;

        let done = step + 1;
        if cfg.run.log_every > 0 && done % cfg.run.log_every == 0 {
            let s = RunSummary::capture(&solver, done)?;
            log::info!(
                "step={} mass={:.4} KE={:.6e} max|div|={:.4e}",
                s.steps, s.total_mass, s.kinetic_energy, s.max_divergence
            );
        }
    }

    let summary = RunSummary::capture(&solver, cfg.run.steps)?;
    solver.free_data();
    Ok(summary)
}
