use core::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Compile-time extents of one matrix product `(M, K) · (K, N) = (M, N)`.
///
/// All loop bounds and fragment sizes of a kernel derive from these constants.
pub trait GemmShape: Copy + Default + Debug + Send + Sync + 'static {
    const M: usize;
    const N: usize;
    const K: usize;

    /// Number of elements in the A operand.
    const MK: usize = Self::M * Self::K;
    /// Number of elements in the B operand.
    const KN: usize = Self::K * Self::N;
    /// Number of elements in the accumulator.
    const MN: usize = Self::M * Self::N;

    fn tile_size() -> TileSize {
        (Self::M, Self::N, Self::K).into()
    }
}

/// Static `(M, N, K)` triple.
#[derive(Copy, Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct Shape<const M: usize, const N: usize, const K: usize>;

impl<const M: usize, const N: usize, const K: usize> GemmShape for Shape<M, N, K> {
    const M: usize = M;
    const N: usize = N;
    const K: usize = K;
}

/// Compile-time extents of a two dimensional arrangement, such as lanes in a warp.
pub trait MatrixShape: Copy + Default + Debug + Send + Sync + 'static {
    const ROWS: usize;
    const COLUMNS: usize;
    const COUNT: usize = Self::ROWS * Self::COLUMNS;
}

#[derive(Copy, Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct Extent<const ROWS: usize, const COLUMNS: usize>;

impl<const ROWS: usize, const COLUMNS: usize> MatrixShape for Extent<ROWS, COLUMNS> {
    const ROWS: usize = ROWS;
    const COLUMNS: usize = COLUMNS;
}

/// Runtime mirror of a [GemmShape], used by configurations and logs.
#[derive(Copy, Clone, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSize {
    pub m: u32,
    pub n: u32,
    pub k: u32,
}

impl TileSize {
    pub const fn new(m: u32, n: u32, k: u32) -> Self {
        Self { m, n, k }
    }

    pub fn m(&self) -> u32 {
        self.m
    }

    pub fn n(&self) -> u32 {
        self.n
    }

    pub fn k(&self) -> u32 {
        self.k
    }

    /// Whether any of the three extents is zero.
    pub fn is_empty(&self) -> bool {
        self.m == 0 || self.n == 0 || self.k == 0
    }

    /// Number of multiply-adds of the product, `None` if it does not fit in a `u32`.
    ///
    /// When this fits, so do the element counts of every operand.
    pub fn checked_mnk(&self) -> Option<u32> {
        self.m.checked_mul(self.n)?.checked_mul(self.k)
    }
}

impl core::fmt::Display for TileSize {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}x{}x{}", self.m, self.n, self.k)
    }
}

impl From<(usize, usize, usize)> for TileSize {
    fn from((m, n, k): (usize, usize, usize)) -> Self {
        Self::new(m as u32, n as u32, k as u32)
    }
}
