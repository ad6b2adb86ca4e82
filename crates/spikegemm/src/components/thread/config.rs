use alloc::format;
use core::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::components::{
    ElemKind, FormattedConfigError, LayoutKind, MmaSetupError, MmaUnsupportedError, Operand,
    TileSize, thread::DP4A_WIDTH,
};
use crate::config::{GlobalConfig, Logger, SetupLogLevel};

/// Kernel chosen for a thread-level product.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreadMmaPath {
    /// A holds spikes, see [SpikeMma](crate::components::thread::SpikeMma).
    SpikeLhs,
    /// B holds spikes, see [SpikeMma](crate::components::thread::SpikeMma).
    SpikeRhs,
    /// Packed `i8` dot products, see [Dp4aMma](crate::components::thread::Dp4aMma).
    Dp4a,
}

impl Display for ThreadMmaPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ThreadMmaPath::SpikeLhs => f.write_str("spike-lhs"),
            ThreadMmaPath::SpikeRhs => f.write_str("spike-rhs"),
            ThreadMmaPath::Dp4a => f.write_str("dp4a"),
        }
    }
}

/// Runtime description of a thread-level product.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMmaConfig {
    pub tile_size: TileSize,
    pub elem_a: ElemKind,
    pub layout_a: LayoutKind,
    pub elem_b: ElemKind,
    pub layout_b: LayoutKind,
    pub elem_c: ElemKind,
    pub layout_c: LayoutKind,
}

impl ThreadMmaConfig {
    /// Resolves which kernel handles this description.
    ///
    /// Accepts exactly the combinations that have a [ThreadMma](crate::components::thread::ThreadMma)
    /// implementation.
    pub fn validate(&self) -> Result<ThreadMmaPath, MmaSetupError> {
        let tile_size = self.tile_size;
        if tile_size.is_empty() {
            return Err(FormattedConfigError::new(move || {
                format!("Tile size {tile_size} has an empty dimension")
            })
            .into());
        }
        if tile_size.checked_mnk().is_none() {
            return Err(FormattedConfigError::new(move || {
                format!("Tile size {tile_size} is too large to index")
            })
            .into());
        }

        if self.elem_c.is_spike() {
            return Err(MmaUnsupportedError::SpikeAccumulator.into());
        }

        let path = match (self.elem_a.is_spike(), self.elem_b.is_spike()) {
            (true, true) => return Err(MmaUnsupportedError::AllSpikeOperands.into()),
            (true, false) => ThreadMmaPath::SpikeLhs,
            (false, true) => ThreadMmaPath::SpikeRhs,
            (false, false) => {
                if self.elem_a == ElemKind::I8
                    && self.elem_b == ElemKind::I8
                    && self.elem_c == ElemKind::I32
                {
                    ThreadMmaPath::Dp4a
                } else {
                    return Err(MmaUnsupportedError::NumericOperands {
                        lhs: self.elem_a,
                        rhs: self.elem_b,
                    }
                    .into());
                }
            }
        };

        for (operand, elem) in [(Operand::A, self.elem_a), (Operand::B, self.elem_b)] {
            if !self.elem_c.can_accumulate(elem) {
                return Err(MmaUnsupportedError::Promotion {
                    operand,
                    elem,
                    accumulator: self.elem_c,
                }
                .into());
            }
        }

        let k = match path {
            ThreadMmaPath::Dp4a => {
                if tile_size.k() % DP4A_WIDTH as u32 != 0 {
                    return Err(FormattedConfigError::new(move || {
                        format!(
                            "Tile size {tile_size}: k must be a multiple of {DP4A_WIDTH} for the dp4a path"
                        )
                    })
                    .into());
                }
                tile_size.k() / DP4A_WIDTH as u32
            }
            ThreadMmaPath::SpikeLhs | ThreadMmaPath::SpikeRhs => tile_size.k(),
        };

        for (operand, layout) in [
            (Operand::A, self.layout_a),
            (Operand::B, self.layout_b),
            (Operand::C, self.layout_c),
        ] {
            let (rows, columns) = operand.extent(tile_size.m(), tile_size.n(), k);
            if !layout.accepts_extent(rows, columns) {
                return Err(MmaUnsupportedError::Layout {
                    operand,
                    layout,
                    rows,
                    columns,
                }
                .into());
            }
        }

        Ok(path)
    }
}

impl Display for ThreadMmaConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} A: {} {} B: {} {} C: {} {}",
            self.tile_size,
            self.elem_a,
            self.layout_a,
            self.elem_b,
            self.layout_b,
            self.elem_c,
            self.layout_c
        )
    }
}

pub(crate) fn log_thread_setup(
    config: &ThreadMmaConfig,
    result: &Result<ThreadMmaPath, MmaSetupError>,
) {
    let path = match result {
        Ok(path) => path,
        Err(err) => {
            log::warn!("{err}");
            return;
        }
    };

    match GlobalConfig::get().setup.logger.level {
        SetupLogLevel::Disabled => {}
        SetupLogLevel::Basic => {
            Logger::new().log_setup(&format!("Thread mma selected path {path}"));
        }
        SetupLogLevel::Full => {
            Logger::new().log_setup(&format!("Thread mma selected path {path} for {config}"));
        }
    }
}
