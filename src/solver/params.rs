use crate::error::{FluidError, Result};

/// Gauss-Seidel sweeps per linear solve.
pub const LIN_SOLVE_ITERATIONS: usize = 30;

/// Solver parameters for the fluid simulation. Fixed for the lifetime of a solver.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverParams {
    /// Interior grid resolution N.
    pub n: usize,
    pub dt: f32,
    pub diff: f32,
    pub visc: f32,
    /// Relaxation sweeps for both diffusion and projection.
    pub iterations: usize,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            n: 64,
            dt: 0.1,
            diff: 0.0,
            visc: 0.0,
            iterations: LIN_SOLVE_ITERATIONS,
        }
    }
}

impl SolverParams {
    pub fn new(n: usize, dt: f32, diff: f32, visc: f32) -> Self {
        Self { n, dt, diff, visc, iterations: LIN_SOLVE_ITERATIONS }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n == 0 {
            return Err(FluidError::InvalidParameter("grid resolution must be positive".into()));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(FluidError::InvalidParameter(format!("dt must be positive, got {}", self.dt)));
        }
        if !(self.diff.is_finite() && self.diff >= 0.0) {
            return Err(FluidError::InvalidParameter(format!("diff must be non-negative, got {}", self.diff)));
        }
        if !(self.visc.is_finite() && self.visc >= 0.0) {
            return Err(FluidError::InvalidParameter(format!("visc must be non-negative, got {}", self.visc)));
        }
        if self.iterations == 0 {
            return Err(FluidError::InvalidParameter("iterations must be at least 1".into()));
        }
        Ok(())
    }
}
