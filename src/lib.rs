//! Fixed-grid stable-fluids smoke solver.
//!
//! A [`Solver`] owns density and velocity fields on an (N+2)x(N+2) lattice
//! (one ring of ghost cells). Each [`Solver::solve`] call diffuses, projects
//! and semi-Lagrangian-advects velocity, then diffuses and advects density.

pub mod config;
pub mod error;
pub mod physics;
pub mod solver;
pub mod state;

pub use error::{FluidError, Result};
pub use solver::{Boundary, Solver, SolverParams};
pub use state::{idx, Field};
