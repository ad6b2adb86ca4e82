use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::fmt::{Debug, Display};

use crate::components::{ElemKind, LayoutKind, Operand};

/// Errors that can occur while setting up an MMA kernel from its description.
pub enum MmaSetupError {
    /// No kernel of this crate handles the requested element or layout combination.
    Unsupported(MmaUnsupportedError),

    /// The provided configuration is invalid or rejected by a component.
    InvalidConfig(InvalidConfigError),
}

/// A combination of elements and layouts without a matching kernel.
pub enum MmaUnsupportedError {
    /// Accumulators must be numeric.
    SpikeAccumulator,

    /// Both operands are spikes.
    AllSpikeOperands,

    /// Neither operand is a spike and the integer dot-product path does not apply.
    NumericOperands { lhs: ElemKind, rhs: ElemKind },

    /// The accumulator cannot hold an operand element.
    Promotion {
        operand: Operand,
        elem: ElemKind,
        accumulator: ElemKind,
    },

    /// The operand layout does not fit the operand extent.
    Layout {
        operand: Operand,
        layout: LayoutKind,
        rows: u32,
        columns: u32,
    },
}

impl From<MmaUnsupportedError> for MmaSetupError {
    fn from(value: MmaUnsupportedError) -> Self {
        Self::Unsupported(value)
    }
}

impl From<InvalidConfigError> for MmaSetupError {
    fn from(value: InvalidConfigError) -> Self {
        Self::InvalidConfig(value)
    }
}

impl Display for MmaSetupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Debug for MmaSetupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MmaSetupError::Unsupported(err) => {
                write!(
                    f,
                    "Unable to set up mma because the combination is unsupported: {err:?}"
                )
            }
            MmaSetupError::InvalidConfig(err) => {
                write!(
                    f,
                    "Unable to set up mma because the config is invalid: {:?}",
                    err.to_string()
                )
            }
        }
    }
}

impl Debug for MmaUnsupportedError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MmaUnsupportedError::SpikeAccumulator => {
                write!(f, "Accumulator elements must be numeric, got bool.")
            }
            MmaUnsupportedError::AllSpikeOperands => {
                write!(f, "Both operands are spikes, exactly one must be.")
            }
            MmaUnsupportedError::NumericOperands { lhs, rhs } => write!(
                f,
                "Operands {lhs} and {rhs} are both numeric and do not qualify for the dp4a path."
            ),
            MmaUnsupportedError::Promotion {
                operand,
                elem,
                accumulator,
            } => write!(
                f,
                "Operand {operand} of type {elem} cannot be accumulated into {accumulator}."
            ),
            MmaUnsupportedError::Layout {
                operand,
                layout,
                rows,
                columns,
            } => write!(
                f,
                "Operand {operand} with layout {layout} cannot pack a {rows}x{columns} tile."
            ),
        }
    }
}

/// Error that arises from invalid configurations
pub type InvalidConfigError = Box<dyn Display + Send + Sync>;

/// Error message built lazily from a closure
pub struct FormattedConfigError {
    func: Box<dyn Fn() -> String + Send + Sync>,
}

impl FormattedConfigError {
    #[allow(clippy::new_ret_no_self)]
    pub fn new<F: Fn() -> String + Send + Sync + 'static>(func: F) -> InvalidConfigError {
        Box::new(Self {
            func: Box::new(func),
        })
    }
}

impl Display for FormattedConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let string = (self.func)();
        write!(f, "{string}")
    }
}
