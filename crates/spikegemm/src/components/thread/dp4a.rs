use core::marker::PhantomData;

use crate::components::thread::instruction::dot4_add;
use crate::components::thread::{FragmentCheck, LayoutCheck, ThreadMma, ThreadMmaPath};
use crate::components::{Fragment, GemmShape, MatrixLayout};

/// Number of `i8` values packed in one dot-product vector.
pub const DP4A_WIDTH: usize = 4;

/// Thread-level `i8 x i8 -> i32` product using packed four-way dot products.
///
/// The operands are read as vectors of four consecutive `k` values: A as an
/// `M x K/4` matrix in layout `LA` and B as a `K/4 x N` matrix in layout `LB`.
/// `K` must be a multiple of four.
///
/// ```compile_fail
/// use spikegemm::components::thread::{Dp4aMma, ThreadMma};
/// use spikegemm::components::{ColumnMajor, Fragment, RowMajor, Shape};
///
/// let mma = Dp4aMma::<Shape<1, 1, 2>, ColumnMajor, RowMajor, RowMajor>::default();
/// let mut d = Fragment::new([0i32]);
/// mma.accumulate(&mut d, &Fragment::new([1i8; 2]), &Fragment::new([1i8; 2]));
/// ```
pub struct Dp4aMma<S, LA, LB, LC> {
    _ty: PhantomData<(S, LA, LB, LC)>,
}

impl<S, LA, LB, LC> Clone for Dp4aMma<S, LA, LB, LC> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, LA, LB, LC> Copy for Dp4aMma<S, LA, LB, LC> {}

impl<S, LA, LB, LC> Default for Dp4aMma<S, LA, LB, LC> {
    fn default() -> Self {
        Self { _ty: PhantomData }
    }
}

impl<S, LA, LB, LC> core::fmt::Debug for Dp4aMma<S, LA, LB, LC> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Dp4aMma")
    }
}

struct Dp4aCheck<S: GemmShape> {
    _shape: PhantomData<S>,
}

impl<S: GemmShape> Dp4aCheck<S> {
    const VALID: () = assert!(
        S::K % DP4A_WIDTH == 0,
        "K must be a multiple of four for the dp4a path"
    );
}

impl<S, LA, LB, LC> ThreadMma for Dp4aMma<S, LA, LB, LC>
where
    S: GemmShape,
    LA: MatrixLayout,
    LB: MatrixLayout,
    LC: MatrixLayout,
{
    type Shape = S;
    type ElementA = i8;
    type LayoutA = LA;
    type ElementB = i8;
    type LayoutB = LB;
    type ElementC = i32;
    type LayoutC = LC;

    const PATH: ThreadMmaPath = ThreadMmaPath::Dp4a;

    fn accumulate<const MK: usize, const KN: usize, const MN: usize>(
        &self,
        acc: &mut Fragment<i32, MN>,
        a: &Fragment<i8, MK>,
        b: &Fragment<i8, KN>,
    ) {
        #[allow(clippy::let_unit_value)]
        let () = FragmentCheck::<S, MK, KN, MN>::VALID;
        #[allow(clippy::let_unit_value)]
        let () = Dp4aCheck::<S>::VALID;
        #[allow(clippy::let_unit_value)]
        let () = LayoutCheck::<S, LA, LB, LC, DP4A_WIDTH>::VALID;

        let k_vectors = S::K / DP4A_WIDTH;
        let a: &[[i8; DP4A_WIDTH]] = bytemuck::cast_slice(a.as_slice());
        let b: &[[i8; DP4A_WIDTH]] = bytemuck::cast_slice(b.as_slice());

        for kq in 0..k_vectors {
            for n in 0..S::N {
                for m in 0..S::M {
                    let mn = LC::offset(m, n, S::M, S::N);
                    let a = a[LA::offset(m, kq, S::M, k_vectors)];
                    let b = b[LB::offset(kq, n, k_vectors, S::N)];
                    acc[mn] = dot4_add(acc[mn], a, b);
                }
            }
        }
    }
}
