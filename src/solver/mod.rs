mod boundary;
mod core;
pub mod diagnostics;
mod params;

// Re-export public API
pub use boundary::{set_bnd, Boundary};
pub use self::core::{add_source, advect, diffuse, lin_solve, project};
pub use params::{SolverParams, LIN_SOLVE_ITERATIONS};

use crate::error::{FluidError, Result};
use crate::state::{cell_count, Field, Impulses, SimState};

/// Stable-fluids solver over a fixed (N+2)x(N+2) grid.
///
/// Construction only records parameters; buffers exist between
/// [`allocate_data`](Solver::allocate_data) and [`free_data`](Solver::free_data).
/// Hosts inject impulses, call [`solve`](Solver::solve) once per frame, read
/// the current fields, then call [`clear_previous`](Solver::clear_previous).
#[derive(Debug)]
pub struct Solver {
    params: SolverParams,
    state: Option<SimState>,
}

impl Solver {
    /// Validate and store parameters. Does not allocate.
    pub fn new(params: SolverParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params, state: None })
    }

    /// `new` followed by `allocate_data`.
    pub fn with_data(params: SolverParams) -> Result<Self> {
        let mut solver = Self::new(params)?;
        solver.allocate_data()?;
        Ok(solver)
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    pub fn n(&self) -> usize {
        self.params.n
    }

    pub fn is_allocated(&self) -> bool {
        self.state.is_some()
    }

    /// Allocate and zero every buffer. Replaces any existing data.
    /// On failure the solver is left unallocated.
    pub fn allocate_data(&mut self) -> Result<()> {
        self.state = None;
        let n = self.params.n;
        match SimState::new(n) {
            Ok(state) => {
                log::debug!(
                    "allocated {} fields of {} cells (N={})",
                    SimState::BUFFER_COUNT,
                    cell_count(n).unwrap_or(0),
                    n
                );
                self.state = Some(state);
                Ok(())
            }
            Err(e) => {
                log::warn!("field allocation failed for N={}: {}", n, e);
                Err(e)
            }
        }
    }

    /// Release every buffer. Calling it again is a no-op.
    pub fn free_data(&mut self) {
        if self.state.take().is_some() {
            log::debug!("freed solver fields (N={})", self.params.n);
        }
    }

    /// Zero every buffer, current fields included.
    pub fn reset(&mut self) -> Result<()> {
        self.state_mut()?.clear();
        Ok(())
    }

    /// Discard accumulated impulses.
    pub fn clear_previous(&mut self) -> Result<()> {
        self.state_mut()?.impulses.clear();
        Ok(())
    }

    pub fn add_density(&mut self, x: usize, y: usize, amount: f32) -> Result<()> {
        self.check_interior(x, y)?;
        self.state_mut()?.impulses.density[(x, y)] += amount;
        Ok(())
    }

    pub fn add_velocity(&mut self, x: usize, y: usize, force_x: f32, force_y: f32) -> Result<()> {
        self.check_interior(x, y)?;
        let impulses = &mut self.state_mut()?.impulses;
        impulses.vx[(x, y)] += force_x;
        impulses.vy[(x, y)] += force_y;
        Ok(())
    }

    /// Advance the simulation by one `dt`: velocity first, then density.
    pub fn solve(&mut self) -> Result<()> {
        let params = &self.params;
        let state = self.state.as_mut().ok_or(FluidError::NotAllocated)?;
        vel_step(state, params);
        dens_step(state, params);
        log::trace!("solved one step (dt={})", params.dt);
        Ok(())
    }

    /// Velocity half of [`solve`](Solver::solve).
    pub fn vel_step(&mut self) -> Result<()> {
        let state = self.state.as_mut().ok_or(FluidError::NotAllocated)?;
        vel_step(state, &self.params);
        Ok(())
    }

    /// Density half of [`solve`](Solver::solve).
    pub fn dens_step(&mut self) -> Result<()> {
        let state = self.state.as_mut().ok_or(FluidError::NotAllocated)?;
        dens_step(state, &self.params);
        Ok(())
    }

    pub fn density(&self) -> Result<&Field> {
        Ok(&self.state()?.density.current)
    }

    pub fn velocity_x(&self) -> Result<&Field> {
        Ok(&self.state()?.vx.current)
    }

    pub fn velocity_y(&self) -> Result<&Field> {
        Ok(&self.state()?.vy.current)
    }

    /// Impulses waiting for the next step.
    pub fn impulses(&self) -> Result<&Impulses> {
        Ok(&self.state()?.impulses)
    }

    fn state(&self) -> Result<&SimState> {
        self.state.as_ref().ok_or(FluidError::NotAllocated)
    }

    fn state_mut(&mut self) -> Result<&mut SimState> {
        self.state.as_mut().ok_or(FluidError::NotAllocated)
    }

    fn check_interior(&self, x: usize, y: usize) -> Result<()> {
        let n = self.params.n;
        if x == 0 || y == 0 || x > n || y > n {
            return Err(FluidError::OutOfRange { x, y, n });
        }
        Ok(())
    }
}

/// Density step: add sources, diffuse, then advect along the current velocity.
fn dens_step(state: &mut SimState, params: &SolverParams) {
    let SimState { vx, vy, density, impulses } = state;

    add_source(&mut density.current, &impulses.density);
    density.swap_current_and_previous();
    diffuse(Boundary::None, &mut density.current, &density.previous, params.diff, params.dt, params.iterations);
    density.swap_current_and_previous();
    advect(Boundary::None, &mut density.current, &density.previous, &vx.current, &vy.current, params.dt);
}

/// Velocity step: add forces, diffuse, project, self-advect, project again.
fn vel_step(state: &mut SimState, params: &SolverParams) {
    let SimState { vx, vy, impulses, .. } = state;
    let (dt, iter) = (params.dt, params.iterations);

    add_source(&mut vx.current, &impulses.vx);
    add_source(&mut vy.current, &impulses.vy);
    vx.swap_current_and_previous();
    vy.swap_current_and_previous();
    diffuse(Boundary::MirrorX, &mut vx.current, &vx.previous, params.visc, dt, iter);
    diffuse(Boundary::MirrorY, &mut vy.current, &vy.previous, params.visc, dt, iter);

    // previous halves are consumed; reuse them as pressure/divergence scratch
    project(&mut vx.current, &mut vy.current, &mut vx.previous, &mut vy.previous, iter);

    vx.swap_current_and_previous();
    vy.swap_current_and_previous();
    advect(Boundary::MirrorX, &mut vx.current, &vx.previous, &vx.previous, &vy.previous, dt);
    advect(Boundary::MirrorY, &mut vy.current, &vy.previous, &vx.previous, &vy.previous, dt);

    project(&mut vx.current, &mut vy.current, &mut vx.previous, &mut vy.previous, iter);
}
