use alloc::format;
use core::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::components::{
    ElemKind, FormattedConfigError, InvalidConfigError, LayoutKind, MmaSetupError,
    MmaUnsupportedError, SIMT_INTERLEAVE, TileSize,
    thread::{ThreadMmaConfig, ThreadMmaPath},
    warp::{ComplexTransformKind, SimtPolicyConfig, WARP_SIZE},
};
use crate::config::{GlobalConfig, Logger, SetupLogLevel};

/// Runtime description of a warp-level product.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarpMmaConfig {
    pub tile_size: TileSize,
    pub policy: SimtPolicyConfig,
    pub partitions_k: u32,
    pub transform_a: ComplexTransformKind,
    pub transform_b: ComplexTransformKind,
    pub elem_a: ElemKind,
    pub layout_a: LayoutKind,
    pub elem_b: ElemKind,
    pub layout_b: LayoutKind,
    pub elem_c: ElemKind,
    pub layout_c: LayoutKind,
}

/// Outcome of a successful [WarpMmaConfig::validate].
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarpMmaSetup {
    /// Product computed by each lane, with resolved layouts.
    pub thread: ThreadMmaConfig,
    pub path: ThreadMmaPath,
    pub use_dp4a: bool,
    /// Extent along K of one split-K partition.
    pub partition_k_extent: u32,
}

impl WarpMmaConfig {
    /// Whether the packed `i8` dot-product kernel applies to these operands.
    pub fn use_dp4a(&self) -> bool {
        self.elem_a == ElemKind::I8
            && self.elem_b == ElemKind::I8
            && matches!(
                self.layout_a,
                LayoutKind::ColumnMajorInterleaved(SIMT_INTERLEAVE)
                    | LayoutKind::RowMajorInterleaved(SIMT_INTERLEAVE)
            )
    }

    /// Splits the warp tile across lanes and resolves the lane kernel.
    pub fn validate(&self) -> Result<WarpMmaSetup, MmaSetupError> {
        let tile_size = self.tile_size;
        let policy = self.policy;

        if tile_size.is_empty() {
            return Err(invalid(move || {
                format!("Warp tile size {tile_size} has an empty dimension")
            }));
        }
        if tile_size.checked_mnk().is_none() {
            return Err(invalid(move || {
                format!("Warp tile size {tile_size} is too large to index")
            }));
        }

        let partitions_k = self.partitions_k;
        if partitions_k == 0 {
            return Err(invalid(|| "At least one K partition is required".into()));
        }
        if tile_size.k() % partitions_k != 0 {
            return Err(invalid(move || {
                format!(
                    "Warp tile k {} is not divisible by {partitions_k} partitions",
                    tile_size.k()
                )
            }));
        }

        if policy.lane_count() != Some(WARP_SIZE as u32) {
            return Err(invalid(move || {
                format!(
                    "Policy arranges {}x{} lanes, a warp has {WARP_SIZE}",
                    policy.warp_rows, policy.warp_columns
                )
            }));
        }
        if !policy
            .lane_layout
            .accepts_extent(policy.warp_rows, policy.warp_columns)
        {
            return Err(invalid(move || {
                format!(
                    "Lane layout {} cannot number a {}x{} lane grid",
                    policy.lane_layout, policy.warp_rows, policy.warp_columns
                )
            }));
        }
        if policy.lane_mma.is_empty() {
            return Err(invalid(move || {
                format!("Lane mma shape {} has an empty dimension", policy.lane_mma)
            }));
        }

        let rows = policy.warp_rows.checked_mul(policy.lane_mma.m());
        let columns = policy.warp_columns.checked_mul(policy.lane_mma.n());
        let splits = match (rows, columns) {
            (Some(rows), Some(columns)) => {
                tile_size.m() % rows == 0 && tile_size.n() % columns == 0
            }
            _ => false,
        };
        if !splits {
            return Err(invalid(move || {
                format!("Warp tile {tile_size} does not split evenly across the lanes of {policy}")
            }));
        }

        let partition_k_extent = tile_size.k() / partitions_k;
        if partition_k_extent % policy.lane_mma.k() != 0 {
            return Err(invalid(move || {
                format!(
                    "Partition k extent {partition_k_extent} is not a multiple of the lane mma k {}",
                    policy.lane_mma.k()
                )
            }));
        }

        let thread = ThreadMmaConfig {
            tile_size: TileSize::new(
                tile_size.m() / policy.warp_rows,
                tile_size.n() / policy.warp_columns,
                policy.lane_mma.k(),
            ),
            elem_a: self.elem_a,
            layout_a: self.layout_a.thread_layout(),
            elem_b: self.elem_b,
            layout_b: self.layout_b.thread_layout(),
            elem_c: self.elem_c,
            layout_c: self.layout_c,
        };

        let use_dp4a = self.use_dp4a();
        let path = thread.validate()?;
        if path == ThreadMmaPath::Dp4a && !use_dp4a {
            return Err(MmaUnsupportedError::NumericOperands {
                lhs: self.elem_a,
                rhs: self.elem_b,
            }
            .into());
        }

        Ok(WarpMmaSetup {
            thread,
            path,
            use_dp4a,
            partition_k_extent,
        })
    }
}

fn invalid<F: Fn() -> alloc::string::String + Send + Sync + 'static>(func: F) -> MmaSetupError {
    let err: InvalidConfigError = FormattedConfigError::new(func);
    err.into()
}

impl Display for WarpMmaConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} {} partitions {} A: {} {} ({}) B: {} {} ({}) C: {} {}",
            self.tile_size,
            self.policy,
            self.partitions_k,
            self.elem_a,
            self.layout_a,
            self.transform_a,
            self.elem_b,
            self.layout_b,
            self.transform_b,
            self.elem_c,
            self.layout_c
        )
    }
}

pub(crate) fn log_warp_setup(config: &WarpMmaConfig, result: &Result<WarpMmaSetup, MmaSetupError>) {
    let setup = match result {
        Ok(setup) => setup,
        Err(err) => {
            log::warn!("{err}");
            return;
        }
    };

    match GlobalConfig::get().setup.logger.level {
        SetupLogLevel::Disabled => {}
        SetupLogLevel::Basic => {
            Logger::new().log_setup(&format!("Warp mma selected path {}", setup.path));
        }
        SetupLogLevel::Full => {
            Logger::new().log_setup(&format!(
                "Warp mma selected path {} (dp4a: {}) for {config}, lanes compute {}",
                setup.path, setup.use_dp4a, setup.thread
            ));
        }
    }
}
