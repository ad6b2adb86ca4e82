use crate::components::{
    ColumnMajorInterleaved, GemmShape, MatrixLayout, Numeric, Promote, RowMajorInterleaved,
    thread::{Dp4aMma, SpikeMma, ThreadMma},
};

/// Selects the thread-level kernel of a warp kernel.
///
/// Implemented on the operand element pair `(EA, EB)`:
/// - `(bool, B)` and `(A, bool)` select [SpikeMma],
/// - `(i8, i8)` with a 4-way interleaved A and `i32` accumulators selects [Dp4aMma].
///
/// Operand layouts are resolved to their [thread layout](MatrixLayout::Thread)
/// before reaching the thread kernel. Any other combination has no warp kernel.
pub trait SimtThreadSelect<S: GemmShape, LA: MatrixLayout, LB: MatrixLayout, EC, LC: MatrixLayout> {
    type Mma: ThreadMma<Shape = S, ElementC = EC, LayoutC = LC>;

    /// Whether the packed `i8` dot-product kernel is selected.
    const USE_DP4A: bool;
}

impl<S, B, LA, LB, EC, LC> SimtThreadSelect<S, LA, LB, EC, LC> for (bool, B)
where
    S: GemmShape,
    B: Numeric,
    LA: MatrixLayout,
    LB: MatrixLayout,
    EC: Promote<bool> + Promote<B>,
    LC: MatrixLayout,
{
    type Mma = SpikeMma<S, bool, LA::Thread, B, LB::Thread, EC, LC>;
    const USE_DP4A: bool = false;
}

impl<S, A, LA, LB, EC, LC> SimtThreadSelect<S, LA, LB, EC, LC> for (A, bool)
where
    S: GemmShape,
    A: Numeric,
    LA: MatrixLayout,
    LB: MatrixLayout,
    EC: Promote<A> + Promote<bool>,
    LC: MatrixLayout,
{
    type Mma = SpikeMma<S, A, LA::Thread, bool, LB::Thread, EC, LC>;
    const USE_DP4A: bool = false;
}

/// A operand layouts that qualify for the packed `i8` dot-product kernel.
pub trait Dp4aLayout: MatrixLayout {}

impl Dp4aLayout for ColumnMajorInterleaved<4> {}
impl Dp4aLayout for RowMajorInterleaved<4> {}

impl<S, LA, LB, LC> SimtThreadSelect<S, LA, LB, i32, LC> for (i8, i8)
where
    S: GemmShape,
    LA: Dp4aLayout,
    LB: MatrixLayout,
    LC: MatrixLayout,
{
    type Mma = Dp4aMma<S, LA::Thread, LB::Thread, LC>;
    const USE_DP4A: bool = true;
}
