use std::path::Path;

use serde::Deserialize;

use crate::solver::{SolverParams, LIN_SOLVE_ITERATIONS};

pub const DEFAULT_PATH: &str = "smokegrid.yaml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub solver: SolverConfig,
    pub run: RunConfig,
    pub emitter: EmitterConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub n: usize,
    pub dt: f32,
    pub diff: f32,
    pub visc: f32,
    pub iterations: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub steps: usize,
    /// Log diagnostics every this many steps (0 disables).
    pub log_every: usize,
}

/// Point source fed into the solver at the start of every frame.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Cell coordinates; 0 means grid centre.
    pub x: usize,
    pub y: usize,
    pub density: f32,
    pub force_x: f32,
    pub force_y: f32,
    /// Number of leading frames the emitter is active for.
    pub frames: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let p = SolverParams::default();
        Self {
            n: p.n,
            dt: p.dt,
            diff: p.diff,
            visc: p.visc,
            iterations: LIN_SOLVE_ITERATIONS,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { steps: 200, log_every: 20 }
    }
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            density: 100.0,
            force_x: 0.0,
            force_y: 5.0,
            frames: 50,
        }
    }
}

impl Config {
    pub fn solver_params(&self) -> SolverParams {
        let s = &self.solver;
        SolverParams::new(s.n, s.dt, s.diff, s.visc).with_iterations(s.iterations)
    }
}

impl EmitterConfig {
    /// Emitter cell with 0 resolved to the centre and clamped into 1..=n.
    pub fn cell(&self, n: usize) -> (usize, usize) {
        let resolve = |c: usize| {
            let c = if c == 0 { (n + 1) / 2 } else { c };
            c.clamp(1, n.max(1))
        };
        (resolve(self.x), resolve(self.y))
    }
}

/// Load configuration from `path`, falling back to defaults when the file is
/// missing or malformed.
pub fn load(path: impl AsRef<Path>) -> Config {
    let path = path.as_ref();
    if path.exists() {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(cfg) => {
                    log::info!("loaded configuration from {}", path.display());
                    cfg
                }
                Err(e) => {
                    log::warn!("failed to parse {}: {e}; using defaults", path.display());
                    Config::default()
                }
            },
            Err(e) => {
                log::warn!("failed to read {}: {e}; using defaults", path.display());
                Config::default()
            }
        }
    } else {
        log::debug!("{} not found; using defaults", path.display());
        Config::default()
    }
}
