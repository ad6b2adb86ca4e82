use core::marker::PhantomData;

use crate::components::{
    Element, Fragment, GemmShape, MatrixLayout, MatrixShape, MmaSetupError, Numeric,
    thread::{ThreadMma, instruction::InstructionShape},
    warp::{
        ArchTag, ComplexTransform, ComplexTransformKind, MmaSimtPolicy, NoTransform, OperatorClass,
        SimtThreadSelect, WARP_SIZE, WarpMma, WarpMmaConfig, WarpMmaSetup, log_warp_setup,
    },
};

/// Shape computed by one lane of a warp tile `S` under policy `P`.
///
/// `(S::M / P::WarpShape::ROWS, S::N / P::WarpShape::COLUMNS, P::LaneMmaShape::K)`.
pub struct LaneShape<S, P> {
    _ty: PhantomData<(S, P)>,
}

impl<S, P> Clone for LaneShape<S, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, P> Copy for LaneShape<S, P> {}

impl<S, P> Default for LaneShape<S, P> {
    fn default() -> Self {
        Self { _ty: PhantomData }
    }
}

impl<S, P> core::fmt::Debug for LaneShape<S, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("LaneShape")
    }
}

impl<S: GemmShape, P: MmaSimtPolicy> GemmShape for LaneShape<S, P> {
    const M: usize = {
        assert!(
            P::WarpShape::COUNT == WARP_SIZE,
            "Policy must arrange exactly one warp of lanes"
        );
        assert!(
            <P::LaneLayout as MatrixLayout>::KIND
                .accepts_extent(P::WarpShape::ROWS as u32, P::WarpShape::COLUMNS as u32),
            "Lane layout cannot number the lane grid"
        );
        let rows = P::WarpShape::ROWS * P::LaneMmaShape::M;
        assert!(
            S::M % rows == 0,
            "Warp tile rows must be a multiple of lane rows times lane mma rows"
        );
        S::M / P::WarpShape::ROWS
    };
    const N: usize = {
        let columns = P::WarpShape::COLUMNS * P::LaneMmaShape::N;
        assert!(
            S::N % columns == 0,
            "Warp tile columns must be a multiple of lane columns times lane mma columns"
        );
        S::N / P::WarpShape::COLUMNS
    };
    const K: usize = P::LaneMmaShape::K;
}

/// Warp-level product with one spike operand, or packed `i8` operands.
///
/// The lane kernel is chosen by [SimtThreadSelect] on `(EA, EB)`. Each call
/// computes the lane's `LaneShape<S, P>` sub-tile and, when `PARTITIONS_K > 1`,
/// only the partial product of this partition along K.
///
/// ```
/// use spikegemm::components::warp::{SimtPolicy, SpikeMmaSimt, WarpMma};
/// use spikegemm::components::{ColumnMajor, Extent, Fragment, RowMajor, RowMajorInterleaved, Shape};
///
/// type Policy = SimtPolicy<Extent<4, 8>, RowMajorInterleaved<2>, Shape<2, 2, 1>>;
/// type Mma = SpikeMmaSimt<Shape<8, 16, 1>, bool, ColumnMajor, f32, RowMajor, f32, RowMajor, Policy>;
///
/// // Each lane holds a 2x2 accumulator.
/// let mut acc = Fragment::new([0.0f32; 4]);
/// Mma::default().accumulate(&mut acc, Fragment::new([true, false]), Fragment::new([2.0, 3.0]), 0);
/// assert_eq!(acc.into_inner(), [2.0, 3.0, 0.0, 0.0]);
/// ```
///
/// The tile must split evenly across the lanes:
///
/// ```compile_fail
/// use spikegemm::components::warp::{SimtPolicy, SpikeMmaSimt, WarpMma};
/// use spikegemm::components::{ColumnMajor, Extent, Fragment, RowMajor, RowMajorInterleaved, Shape};
///
/// type Policy = SimtPolicy<Extent<4, 8>, RowMajorInterleaved<2>, Shape<2, 2, 1>>;
/// type Mma = SpikeMmaSimt<Shape<6, 16, 1>, bool, ColumnMajor, f32, RowMajor, f32, RowMajor, Policy>;
///
/// let mut acc = Fragment::new([0.0f32; 3]);
/// Mma::default().accumulate(&mut acc, Fragment::new([true; 1]), Fragment::new([2.0; 2]), 0);
/// ```
///
/// The policy must arrange exactly 32 lanes:
///
/// ```compile_fail
/// use spikegemm::components::warp::{SimtPolicy, SpikeMmaSimt, WarpMma};
/// use spikegemm::components::{ColumnMajor, Extent, Fragment, RowMajor, Shape};
///
/// type Policy = SimtPolicy<Extent<4, 4>, RowMajor, Shape<1, 1, 1>>;
/// type Mma = SpikeMmaSimt<Shape<4, 4, 1>, bool, ColumnMajor, f32, RowMajor, f32, RowMajor, Policy>;
///
/// let mut acc = Fragment::new([0.0f32; 1]);
/// Mma::default().accumulate(&mut acc, Fragment::new([true; 1]), Fragment::new([2.0; 1]), 0);
/// ```
///
/// And each lane's layouts must pack its sub-tile, here a `2 x 1` A tile
/// with columns interleaved by 2:
///
/// ```compile_fail
/// use spikegemm::components::warp::{SimtPolicy, SpikeMmaSimt, WarpMma};
/// use spikegemm::components::{ColumnMajorInterleaved, Extent, Fragment, RowMajor, RowMajorInterleaved, Shape};
///
/// type Policy = SimtPolicy<Extent<4, 8>, RowMajorInterleaved<2>, Shape<2, 2, 1>>;
/// type Mma = SpikeMmaSimt<Shape<8, 16, 1>, bool, ColumnMajorInterleaved<2>, f32, RowMajor, f32, RowMajor, Policy>;
///
/// let mut acc = Fragment::new([0.0f32; 4]);
/// Mma::default().accumulate(&mut acc, Fragment::new([true; 2]), Fragment::new([2.0; 2]), 0);
/// ```
pub struct SpikeMmaSimt<
    S,
    EA,
    LA,
    EB,
    LB,
    EC,
    LC,
    P,
    const PARTITIONS_K: usize = 1,
    TA = NoTransform,
    TB = NoTransform,
> {
    _ty: PhantomData<(S, EA, LA, EB, LB, EC, LC, P, TA, TB)>,
}

impl<S, EA, LA, EB, LB, EC, LC, P, const PARTITIONS_K: usize, TA, TB> Clone
    for SpikeMmaSimt<S, EA, LA, EB, LB, EC, LC, P, PARTITIONS_K, TA, TB>
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, EA, LA, EB, LB, EC, LC, P, const PARTITIONS_K: usize, TA, TB> Copy
    for SpikeMmaSimt<S, EA, LA, EB, LB, EC, LC, P, PARTITIONS_K, TA, TB>
{
}

impl<S, EA, LA, EB, LB, EC, LC, P, const PARTITIONS_K: usize, TA, TB> Default
    for SpikeMmaSimt<S, EA, LA, EB, LB, EC, LC, P, PARTITIONS_K, TA, TB>
{
    fn default() -> Self {
        Self { _ty: PhantomData }
    }
}

impl<S, EA, LA, EB, LB, EC, LC, P, const PARTITIONS_K: usize, TA, TB> core::fmt::Debug
    for SpikeMmaSimt<S, EA, LA, EB, LB, EC, LC, P, PARTITIONS_K, TA, TB>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SpikeMmaSimt")
    }
}

impl<S, EA, LA, EB, LB, EC, LC, P, const PARTITIONS_K: usize, TA, TB>
    SpikeMmaSimt<S, EA, LA, EB, LB, EC, LC, P, PARTITIONS_K, TA, TB>
where
    S: GemmShape,
    P: MmaSimtPolicy,
{
    /// Extent along K of one split-K partition.
    pub const PARTITION_K_EXTENT: usize = {
        assert!(PARTITIONS_K >= 1, "At least one K partition is required");
        assert!(
            S::K % PARTITIONS_K == 0,
            "Warp tile K must be a multiple of the partition count"
        );
        let extent = S::K / PARTITIONS_K;
        assert!(
            extent % P::LaneMmaShape::K == 0,
            "Partition K extent must be a multiple of the lane mma K"
        );
        extent
    };
}

/// Thread kernel of a [SpikeMmaSimt].
pub type SimtThreadMma<S, EA, LA, EB, LB, EC, LC, P> =
    <(EA, EB) as SimtThreadSelect<LaneShape<S, P>, LA, LB, EC, LC>>::Mma;

impl<S, EA, LA, EB, LB, EC, LC, P, const PARTITIONS_K: usize, TA, TB> WarpMma
    for SpikeMmaSimt<S, EA, LA, EB, LB, EC, LC, P, PARTITIONS_K, TA, TB>
where
    S: GemmShape,
    EA: Element,
    LA: MatrixLayout,
    EB: Element,
    LB: MatrixLayout,
    EC: Numeric,
    LC: MatrixLayout,
    P: MmaSimtPolicy,
    TA: ComplexTransform,
    TB: ComplexTransform,
    (EA, EB): SimtThreadSelect<LaneShape<S, P>, LA, LB, EC, LC>,
    SimtThreadMma<S, EA, LA, EB, LB, EC, LC, P>: ThreadMma<ElementA = EA, ElementB = EB>,
{
    type Shape = S;
    type LayoutA = LA;
    type LayoutB = LB;
    type LayoutC = LC;
    type Policy = P;
    type Thread = SimtThreadMma<S, EA, LA, EB, LB, EC, LC, P>;
    type TransformA = TA;
    type TransformB = TB;

    const OPERATOR_CLASS: OperatorClass = OperatorClass::Simt;
    const ARCH: ArchTag = ArchTag::Sm50;
    const PARTITIONS_K: usize = PARTITIONS_K;

    fn accumulate<const MK: usize, const KN: usize, const MN: usize>(
        &self,
        acc: &mut Fragment<<Self::Thread as ThreadMma>::ElementC, MN>,
        a: Fragment<<Self::Thread as ThreadMma>::ElementA, MK>,
        b: Fragment<<Self::Thread as ThreadMma>::ElementB, KN>,
        _group_index: usize,
    ) {
        let _partition_extent = Self::PARTITION_K_EXTENT;

        let a = TA::apply(a);
        let b = TB::apply(b);

        Self::Thread::default().accumulate(acc, &a, &b);
    }

    fn config() -> WarpMmaConfig {
        WarpMmaConfig {
            tile_size: S::tile_size(),
            policy: P::config(),
            partitions_k: PARTITIONS_K as u32,
            transform_a: TA::KIND,
            transform_b: TB::KIND,
            elem_a: EA::KIND,
            layout_a: LA::KIND,
            elem_b: EB::KIND,
            layout_b: LB::KIND,
            elem_c: EC::KIND,
            layout_c: LC::KIND,
        }
    }

    fn setup() -> Result<WarpMmaSetup, MmaSetupError> {
        let config = Self::config();
        let result = config.validate();
        log_warp_setup(&config, &result);
        result
    }
}

impl<S, EA, LA, EB, LB, EC, LC, P, const PARTITIONS_K: usize, TA, TB>
    SpikeMmaSimt<S, EA, LA, EB, LB, EC, LC, P, PARTITIONS_K, TA, TB>
where
    S: GemmShape,
    LA: MatrixLayout,
    LB: MatrixLayout,
    LC: MatrixLayout,
    P: MmaSimtPolicy,
    TA: ComplexTransform,
    TB: ComplexTransform,
    (EA, EB): SimtThreadSelect<LaneShape<S, P>, LA, LB, EC, LC>,
{
    /// Whether the packed `i8` dot-product kernel runs on each lane.
    pub const USE_DP4A: bool =
        <(EA, EB) as SimtThreadSelect<LaneShape<S, P>, LA, LB, EC, LC>>::USE_DP4A;

    pub const TRANSFORM_A: ComplexTransformKind = TA::KIND;
    pub const TRANSFORM_B: ComplexTransformKind = TB::KIND;

    /// Shape of the elementary operator.
    pub fn instruction_shape() -> InstructionShape {
        InstructionShape::default()
    }
}
