use serde::{Deserialize, Serialize};

use crate::components::{
    Fragment, GemmShape, MatrixLayout, MmaSetupError,
    thread::ThreadMma,
    warp::{ComplexTransform, MmaSimtPolicy, WarpMmaConfig, WarpMmaSetup},
};

type ElemA<W> = <<W as WarpMma>::Thread as ThreadMma>::ElementA;
type ElemB<W> = <<W as WarpMma>::Thread as ThreadMma>::ElementB;
type ElemC<W> = <<W as WarpMma>::Thread as ThreadMma>::ElementC;

/// Computes a warp tile product, one lane at a time.
///
/// A call runs on behalf of a single lane: the fragments hold that lane's
/// sub-tile, as laid out by the [policy](WarpMma::Policy). Every lane of the
/// warp makes the same call on its own fragments.
pub trait WarpMma: Copy + Default + Send + Sync + 'static {
    /// Extents of the warp tile.
    type Shape: GemmShape;
    /// Declared layout of the A warp tile.
    type LayoutA: MatrixLayout;
    /// Declared layout of the B warp tile.
    type LayoutB: MatrixLayout;
    type LayoutC: MatrixLayout;
    type Policy: MmaSimtPolicy;
    /// Kernel run by each lane.
    type Thread: ThreadMma;
    type TransformA: ComplexTransform;
    type TransformB: ComplexTransform;

    const OPERATOR_CLASS: OperatorClass;
    const ARCH: ArchTag;
    /// Number of split-K partitions of the warp tile.
    const PARTITIONS_K: usize;

    /// Accumulates the lane's `A * B` into `acc`, after applying the operand transforms.
    ///
    /// `group_index` is accepted for interface compatibility and ignored.
    fn accumulate<const MK: usize, const KN: usize, const MN: usize>(
        &self,
        acc: &mut Fragment<ElemC<Self>, MN>,
        a: Fragment<ElemA<Self>, MK>,
        b: Fragment<ElemB<Self>, KN>,
        group_index: usize,
    );

    /// Copies `c` into `d`, then accumulates the lane's `A * B` into `d`.
    fn compute<const MK: usize, const KN: usize, const MN: usize>(
        &self,
        d: &mut Fragment<ElemC<Self>, MN>,
        a: Fragment<ElemA<Self>, MK>,
        b: Fragment<ElemB<Self>, KN>,
        c: &Fragment<ElemC<Self>, MN>,
        group_index: usize,
    ) {
        *d = *c;
        self.accumulate(d, a, b, group_index);
    }

    /// Copies the operands unchanged, operands need no conversion before [compute](WarpMma::compute).
    fn transform<const MK: usize, const KN: usize>(
        &self,
        dst_a: &mut Fragment<ElemA<Self>, MK>,
        dst_b: &mut Fragment<ElemB<Self>, KN>,
        a: &Fragment<ElemA<Self>, MK>,
        b: &Fragment<ElemB<Self>, KN>,
    ) {
        *dst_a = *a;
        *dst_b = *b;
    }

    /// Runtime description of this kernel.
    fn config() -> WarpMmaConfig;

    /// Validates [config](WarpMma::config) and reports the resolved thread kernel.
    fn setup() -> Result<WarpMmaSetup, MmaSetupError>;
}

/// Class of hardware unit a kernel targets.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatorClass {
    /// Scalar multiply-add on CUDA cores.
    Simt,
}

/// Minimum architecture a kernel requires.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArchTag {
    Sm50,
}
