use core::marker::PhantomData;

use crate::components::{
    Element, Fragment, GemmShape, MatrixLayout, MmaSetupError, Numeric,
    thread::{ThreadMmaConfig, ThreadMmaPath, log_thread_setup},
};

/// Computes `D = A * B + C` for a fixed-size tile held by a single lane.
///
/// Fragment lengths must be `M * K` for A, `K * N` for B and `M * N` for C and D.
/// Any other length fails to build.
///
/// Implementations are stateless: a kernel value carries no data and may be
/// invoked concurrently from any number of lanes.
pub trait ThreadMma: Copy + Default + Send + Sync + 'static {
    type Shape: GemmShape;
    type ElementA: Element;
    type LayoutA: MatrixLayout;
    type ElementB: Element;
    type LayoutB: MatrixLayout;
    type ElementC: Numeric;
    type LayoutC: MatrixLayout;

    /// Which implementation this kernel is.
    const PATH: ThreadMmaPath;

    /// Accumulates `A * B` into `acc`, the case where C and D share storage.
    fn accumulate<const MK: usize, const KN: usize, const MN: usize>(
        &self,
        acc: &mut Fragment<Self::ElementC, MN>,
        a: &Fragment<Self::ElementA, MK>,
        b: &Fragment<Self::ElementB, KN>,
    );

    /// Copies `c` into `d`, then accumulates `A * B` into `d`.
    fn compute<const MK: usize, const KN: usize, const MN: usize>(
        &self,
        d: &mut Fragment<Self::ElementC, MN>,
        a: &Fragment<Self::ElementA, MK>,
        b: &Fragment<Self::ElementB, KN>,
        c: &Fragment<Self::ElementC, MN>,
    ) {
        *d = *c;
        self.accumulate(d, a, b);
    }

    /// Returns `A * B + C` as a new fragment.
    fn compute_owned<const MK: usize, const KN: usize, const MN: usize>(
        &self,
        a: &Fragment<Self::ElementA, MK>,
        b: &Fragment<Self::ElementB, KN>,
        c: Fragment<Self::ElementC, MN>,
    ) -> Fragment<Self::ElementC, MN> {
        let mut d = c;
        self.accumulate(&mut d, a, b);
        d
    }

    /// Runtime description of this kernel.
    fn config() -> ThreadMmaConfig {
        ThreadMmaConfig {
            tile_size: Self::Shape::tile_size(),
            elem_a: Self::ElementA::KIND,
            layout_a: Self::LayoutA::KIND,
            elem_b: Self::ElementB::KIND,
            layout_b: Self::LayoutB::KIND,
            elem_c: Self::ElementC::KIND,
            layout_c: Self::LayoutC::KIND,
        }
    }

    /// Validates [config](ThreadMma::config) and reports the selected path.
    fn setup() -> Result<ThreadMmaPath, MmaSetupError> {
        let config = Self::config();
        let result = config.validate();
        log_thread_setup(&config, &result);
        result
    }
}

/// Build-time check that fragment lengths match the shape `S`.
pub(crate) struct FragmentCheck<S: GemmShape, const MK: usize, const KN: usize, const MN: usize> {
    _shape: PhantomData<S>,
}

impl<S: GemmShape, const MK: usize, const KN: usize, const MN: usize> FragmentCheck<S, MK, KN, MN> {
    pub(crate) const VALID: () = {
        assert!(MK == S::MK, "Fragment A must hold M * K elements");
        assert!(KN == S::KN, "Fragment B must hold K * N elements");
        assert!(MN == S::MN, "Fragment C must hold M * N elements");
    };
}

/// Build-time check that each operand layout can pack its extent without padding.
///
/// A is `M x K / VECTOR`, B is `K / VECTOR x N` and C is `M x N`, where
/// `VECTOR` is the number of `k` values read as one element.
pub(crate) struct LayoutCheck<S: GemmShape, LA, LB, LC, const VECTOR: usize> {
    _ty: PhantomData<(S, LA, LB, LC)>,
}

impl<S, LA, LB, LC, const VECTOR: usize> LayoutCheck<S, LA, LB, LC, VECTOR>
where
    S: GemmShape,
    LA: MatrixLayout,
    LB: MatrixLayout,
    LC: MatrixLayout,
{
    pub(crate) const VALID: () = {
        let k = (S::K / VECTOR) as u32;
        assert!(
            LA::KIND.accepts_extent(S::M as u32, k),
            "Layout of A cannot pack its tile"
        );
        assert!(
            LB::KIND.accepts_extent(k, S::N as u32),
            "Layout of B cannot pack its tile"
        );
        assert!(
            LC::KIND.accepts_extent(S::M as u32, S::N as u32),
            "Layout of C cannot pack its tile"
        );
    };
}
