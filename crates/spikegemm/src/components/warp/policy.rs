use core::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::components::{GemmShape, LayoutKind, MatrixLayout, MatrixShape, TileSize};

/// Number of lanes in a warp.
pub const WARP_SIZE: usize = 32;

/// Describes how a warp tile is split across the lanes of a warp.
///
/// Lanes are arranged as a `WarpShape::ROWS x WarpShape::COLUMNS` grid, numbered
/// following `LaneLayout`. Each lane owns chunks of `LaneMmaShape::M` rows and
/// `LaneMmaShape::N` columns, strided by the whole lane grid, so that
/// neighbouring lanes read neighbouring chunks.
pub trait MmaSimtPolicy: Copy + Default + core::fmt::Debug + Send + Sync + 'static {
    /// Arrangement of the lanes.
    type WarpShape: MatrixShape;
    /// Numbering of the lanes within [WarpShape](MmaSimtPolicy::WarpShape).
    type LaneLayout: MatrixLayout;
    /// Contiguous chunk computed by a lane per step.
    type LaneMmaShape: GemmShape;

    /// `(row, column)` of a lane in the lane grid.
    fn lane_coord(lane_id: usize) -> (usize, usize) {
        <Self::LaneLayout as MatrixLayout>::KIND.coordinate(
            lane_id,
            Self::WarpShape::ROWS,
            Self::WarpShape::COLUMNS,
        )
    }

    /// Warp tile row of row `thread_row` of the lane on lane row `lane_row`.
    fn warp_row(lane_row: usize, thread_row: usize) -> usize {
        distribute(
            lane_row,
            thread_row,
            Self::LaneMmaShape::M,
            Self::WarpShape::ROWS,
        )
    }

    /// Warp tile column of column `thread_column` of the lane on lane column `lane_column`.
    fn warp_column(lane_column: usize, thread_column: usize) -> usize {
        distribute(
            lane_column,
            thread_column,
            Self::LaneMmaShape::N,
            Self::WarpShape::COLUMNS,
        )
    }

    fn config() -> SimtPolicyConfig {
        SimtPolicyConfig {
            warp_rows: Self::WarpShape::ROWS as u32,
            warp_columns: Self::WarpShape::COLUMNS as u32,
            lane_layout: <Self::LaneLayout as MatrixLayout>::KIND,
            lane_mma: Self::LaneMmaShape::tile_size(),
        }
    }
}

#[inline(always)]
fn distribute(lane: usize, index: usize, chunk: usize, lanes: usize) -> usize {
    (index / chunk) * (chunk * lanes) + lane * chunk + index % chunk
}

/// Stock SIMT policy.
pub struct SimtPolicy<WS, LL, LMS> {
    _ty: PhantomData<(WS, LL, LMS)>,
}

impl<WS, LL, LMS> Clone for SimtPolicy<WS, LL, LMS> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<WS, LL, LMS> Copy for SimtPolicy<WS, LL, LMS> {}

impl<WS, LL, LMS> Default for SimtPolicy<WS, LL, LMS> {
    fn default() -> Self {
        Self { _ty: PhantomData }
    }
}

impl<WS, LL, LMS> core::fmt::Debug for SimtPolicy<WS, LL, LMS> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SimtPolicy")
    }
}

impl<WS: MatrixShape, LL: MatrixLayout, LMS: GemmShape> MmaSimtPolicy for SimtPolicy<WS, LL, LMS> {
    type WarpShape = WS;
    type LaneLayout = LL;
    type LaneMmaShape = LMS;
}

/// Runtime mirror of a [MmaSimtPolicy].
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimtPolicyConfig {
    pub warp_rows: u32,
    pub warp_columns: u32,
    pub lane_layout: LayoutKind,
    pub lane_mma: TileSize,
}

impl SimtPolicyConfig {
    /// Number of lanes in the grid, `None` if it does not fit in a `u32`.
    pub fn lane_count(&self) -> Option<u32> {
        self.warp_rows.checked_mul(self.warp_columns)
    }
}

impl core::fmt::Display for SimtPolicyConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "lanes {}x{} {} lane mma {}",
            self.warp_rows, self.warp_columns, self.lane_layout, self.lane_mma
        )
    }
}
