use crate::error::{FluidError, Result};

/// Flat index of cell (x, y) on an (n+2)x(n+2) lattice.
/// x = 0 and x = n+1 (likewise y) are ghost cells.
#[inline(always)]
pub const fn idx(x: usize, y: usize, n: usize) -> usize {
    x * (n + 2) + y
}

/// Total number of stored cells, ghost cells included.
/// `None` when (n+2)^2 overflows `usize`.
pub fn cell_count(n: usize) -> Option<usize> {
    let side = n.checked_add(2)?;
    side.checked_mul(side)
}

/// One scalar field over the full lattice, ghost cells included.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    n: usize,
    data: Vec<f32>,
}

impl Field {
    /// Allocate a zeroed field, reporting allocation failure instead of aborting.
    pub fn zeroed(n: usize) -> Result<Self> {
        let cells = cell_count(n).ok_or(FluidError::OutOfMemory { cells: usize::MAX })?;
        let mut data = Vec::new();
        data.try_reserve_exact(cells)
            .map_err(|_| FluidError::OutOfMemory { cells })?;
        data.resize(cells, 0.0);
        Ok(Self { n, data })
    }

    /// Interior resolution N.
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major view in `idx` layout, ghost cells included.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Checked read of any cell, ghost cells included.
    pub fn get(&self, x: usize, y: usize) -> Result<f32> {
        if x > self.n + 1 || y > self.n + 1 {
            return Err(FluidError::OutOfRange { x, y, n: self.n });
        }
        Ok(self.data[idx(x, y, self.n)])
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    pub fn copy_from(&mut self, other: &Field) {
        debug_assert_eq!(self.n, other.n);
        self.data.copy_from_slice(&other.data);
    }
}

impl std::ops::Index<(usize, usize)> for Field {
    type Output = f32;
    fn index(&self, (x, y): (usize, usize)) -> &f32 {
        debug_assert!(x <= self.n + 1 && y <= self.n + 1);
        &self.data[idx(x, y, self.n)]
    }
}

impl std::ops::IndexMut<(usize, usize)> for Field {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut f32 {
        debug_assert!(x <= self.n + 1 && y <= self.n + 1);
        let n = self.n;
        &mut self.data[idx(x, y, n)]
    }
}

/// Current value of a quantity plus the buffer the previous stage wrote.
/// Each stage reads one half and writes the other.
#[derive(Clone, Debug)]
pub struct FieldPair {
    pub current: Field,
    pub previous: Field,
}

impl FieldPair {
    pub fn zeroed(n: usize) -> Result<Self> {
        Ok(Self {
            current: Field::zeroed(n)?,
            previous: Field::zeroed(n)?,
        })
    }

    /// After this call the last result is readable as `previous`
    /// and `current` is free to be overwritten.
    pub fn swap_current_and_previous(&mut self) {
        std::mem::swap(&mut self.current, &mut self.previous);
    }

    pub fn clear(&mut self) {
        self.current.fill(0.0);
        self.previous.fill(0.0);
    }
}

/// Sources injected by the host between steps.
#[derive(Clone, Debug)]
pub struct Impulses {
    pub vx: Field,
    pub vy: Field,
    pub density: Field,
}

impl Impulses {
    pub fn zeroed(n: usize) -> Result<Self> {
        Ok(Self {
            vx: Field::zeroed(n)?,
            vy: Field::zeroed(n)?,
            density: Field::zeroed(n)?,
        })
    }

    pub fn clear(&mut self) {
        self.vx.fill(0.0);
        self.vy.fill(0.0);
        self.density.fill(0.0);
    }
}

/// Every buffer a solver instance owns. Built all at once or not at all.
#[derive(Clone, Debug)]
pub struct SimState {
    pub vx: FieldPair,
    pub vy: FieldPair,
    pub density: FieldPair,
    pub impulses: Impulses,
}

impl SimState {
    /// Number of scalar buffers held by one state.
    pub const BUFFER_COUNT: usize = 9;

    /// Allocate all buffers zeroed. On failure the fields already built are
    /// dropped before the error is returned.
    pub fn new(n: usize) -> Result<Self> {
        Ok(Self {
            vx: FieldPair::zeroed(n)?,
            vy: FieldPair::zeroed(n)?,
            density: FieldPair::zeroed(n)?,
            impulses: Impulses::zeroed(n)?,
        })
    }

    pub fn clear(&mut self) {
        self.vx.clear();
        self.vy.clear();
        self.density.clear();
        self.impulses.clear();
    }
}
