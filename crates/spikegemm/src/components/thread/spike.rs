use core::marker::PhantomData;

use crate::components::thread::instruction;
use crate::components::thread::{FragmentCheck, LayoutCheck, Serpentine, ThreadMma, ThreadMmaPath};
use crate::components::{
    Element, Fragment, GemmShape, MatrixLayout, Promote, SpikeOperands, SpikeSide, TileRef,
};

/// Thread-level product where exactly one operand holds spikes.
///
/// Either `EA` or `EB` is `bool`, the other is numeric. The accumulator is
/// traversed in [Serpentine] order inside every `k` step, which fixes the
/// order of floating point additions.
///
/// ```
/// use spikegemm::components::thread::{SpikeMma, ThreadMma};
/// use spikegemm::components::{Fragment, RowMajor, Shape};
///
/// let mma = SpikeMma::<Shape<2, 2, 2>, bool, RowMajor, i32, RowMajor, i32, RowMajor>::default();
/// let a = Fragment::new([true, false, true, true]);
/// let b = Fragment::new([3, 4, 5, 6]);
///
/// let d = mma.compute_owned(&a, &b, Fragment::new([0; 4]));
/// assert_eq!(d.into_inner(), [3, 4, 8, 10]);
/// ```
///
/// Two spike operands have no kernel:
///
/// ```compile_fail
/// use spikegemm::components::thread::{SpikeMma, ThreadMma};
/// use spikegemm::components::{Fragment, RowMajor, Shape};
///
/// let mma = SpikeMma::<Shape<1, 1, 1>, bool, RowMajor, bool, RowMajor, i32, RowMajor>::default();
/// let mut d = Fragment::new([0i32]);
/// mma.accumulate(&mut d, &Fragment::new([true]), &Fragment::new([true]));
/// ```
///
/// Nor does a fragment that does not match the shape:
///
/// ```compile_fail
/// use spikegemm::components::thread::{SpikeMma, ThreadMma};
/// use spikegemm::components::{Fragment, RowMajor, Shape};
///
/// let mma = SpikeMma::<Shape<2, 2, 2>, bool, RowMajor, i32, RowMajor, i32, RowMajor>::default();
/// let mut d = Fragment::new([0i32; 4]);
/// mma.accumulate(&mut d, &Fragment::new([true; 3]), &Fragment::new([1i32; 4]));
/// ```
///
/// Nor does a layout that cannot pack its operand, here 3 rows interleaved by 2:
///
/// ```compile_fail
/// use spikegemm::components::thread::{SpikeMma, ThreadMma};
/// use spikegemm::components::{Fragment, RowMajor, RowMajorInterleaved, Shape};
///
/// let mma = SpikeMma::<Shape<3, 1, 2>, bool, RowMajorInterleaved<2>, i32, RowMajor, i32, RowMajor>::default();
/// let d = mma.compute_owned(&Fragment::new([true; 6]), &Fragment::new([1i32; 2]), Fragment::new([0; 3]));
/// ```
pub struct SpikeMma<S, EA, LA, EB, LB, EC, LC> {
    _ty: PhantomData<(S, EA, LA, EB, LB, EC, LC)>,
}

impl<S, EA, LA, EB, LB, EC, LC> Clone for SpikeMma<S, EA, LA, EB, LB, EC, LC> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, EA, LA, EB, LB, EC, LC> Copy for SpikeMma<S, EA, LA, EB, LB, EC, LC> {}

impl<S, EA, LA, EB, LB, EC, LC> Default for SpikeMma<S, EA, LA, EB, LB, EC, LC> {
    fn default() -> Self {
        Self { _ty: PhantomData }
    }
}

impl<S, EA, LA, EB, LB, EC, LC> core::fmt::Debug for SpikeMma<S, EA, LA, EB, LB, EC, LC> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SpikeMma")
    }
}

impl<S, EA, LA, EB, LB, EC, LC> ThreadMma for SpikeMma<S, EA, LA, EB, LB, EC, LC>
where
    S: GemmShape,
    EA: Element,
    LA: MatrixLayout,
    EB: Element,
    LB: MatrixLayout,
    EC: Promote<EA> + Promote<EB>,
    LC: MatrixLayout,
    (EA, EB): SpikeOperands,
{
    type Shape = S;
    type ElementA = EA;
    type LayoutA = LA;
    type ElementB = EB;
    type LayoutB = LB;
    type ElementC = EC;
    type LayoutC = LC;

    const PATH: ThreadMmaPath = match <(EA, EB) as SpikeOperands>::SIDE {
        SpikeSide::Lhs => ThreadMmaPath::SpikeLhs,
        SpikeSide::Rhs => ThreadMmaPath::SpikeRhs,
    };

    fn accumulate<const MK: usize, const KN: usize, const MN: usize>(
        &self,
        acc: &mut Fragment<EC, MN>,
        a: &Fragment<EA, MK>,
        b: &Fragment<EB, KN>,
    ) {
        #[allow(clippy::let_unit_value)]
        let () = FragmentCheck::<S, MK, KN, MN>::VALID;
        #[allow(clippy::let_unit_value)]
        let () = LayoutCheck::<S, LA, LB, LC, 1>::VALID;

        let a = TileRef::<EA, LA>::packed(a.as_slice(), S::M, S::K);
        let b = TileRef::<EB, LB>::packed(b.as_slice(), S::K, S::N);

        for k in 0..S::K {
            for (m, n) in Serpentine::new(S::M, S::N) {
                let mn = LC::offset(m, n, S::M, S::N);
                acc[mn] = instruction::multiply_add(acc[mn], a.at(m, k), b.at(k, n));
            }
        }
    }
}
