use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, FluidError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Backing storage for the grid could not be reserved.
    #[error("out of memory: cannot allocate fields of {cells} cells")]
    OutOfMemory { cells: usize },

    /// A cell coordinate fell outside the grid (or outside the interior, for impulses).
    #[error("cell ({x}, {y}) out of range for grid of size {n}")]
    OutOfRange { x: usize, y: usize, n: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Field data was accessed before `allocate_data` or after `free_data`.
    #[error("solver data not allocated")]
    NotAllocated,
}
