mod common;

use common::*;
use num_complex::Complex;
use pretty_assertions::assert_eq;
use spikegemm::components::thread::{Dp4aMma, SpikeMma, ThreadMma, ThreadMmaPath};
use spikegemm::components::warp::{
    ArchTag, ComplexTransformKind, Conjugate, MmaSimtPolicy, NoTransform, OperatorClass,
    SimtPolicy, SpikeMmaSimt, WARP_SIZE, WarpMma,
};
use spikegemm::components::{
    ColumnMajor, ColumnMajorInterleaved, ElemKind, Element, Extent, Fragment, GemmShape,
    LayoutKind, MatrixLayout, Numeric, RowMajor, RowMajorInterleaved, Shape,
};

type Policy = SimtPolicy<Extent<4, 8>, RowMajorInterleaved<2>, Shape<2, 2, 1>>;

#[test]
fn warp_constants() {
    type Mma =
        SpikeMmaSimt<Shape<16, 32, 4>, bool, ColumnMajor, f32, RowMajor, f32, RowMajor, Policy, 2>;

    assert_eq!(Mma::OPERATOR_CLASS, OperatorClass::Simt);
    assert_eq!(Mma::ARCH, ArchTag::Sm50);
    assert_eq!(<Mma as WarpMma>::PARTITIONS_K, 2);
    assert_eq!(Mma::PARTITION_K_EXTENT, 2);
    assert_eq!(Mma::TRANSFORM_A, ComplexTransformKind::None);
    assert!(!Mma::USE_DP4A);
    assert_eq!(Mma::instruction_shape(), Shape::<1, 1, 1>);

    type Lane = <<Mma as WarpMma>::Thread as ThreadMma>::Shape;
    assert_eq!((Lane::M, Lane::N, Lane::K), (4, 4, 1));
}

#[test]
fn interleaved_layouts_collapse_for_the_lane() {
    type Mma = SpikeMmaSimt<
        Shape<8, 16, 4>,
        bool,
        ColumnMajorInterleaved<4>,
        f32,
        RowMajorInterleaved<4>,
        f32,
        RowMajor,
        Policy,
    >;
    type Thread = <Mma as WarpMma>::Thread;

    assert_eq!(
        <<Thread as ThreadMma>::LayoutA as MatrixLayout>::KIND,
        LayoutKind::ColumnMajor
    );
    assert_eq!(
        <<Thread as ThreadMma>::LayoutB as MatrixLayout>::KIND,
        LayoutKind::RowMajor
    );

    type Other = <SpikeMmaSimt<
        Shape<8, 16, 4>,
        f32,
        RowMajorInterleaved<2>,
        bool,
        ColumnMajorInterleaved<8>,
        f32,
        RowMajor,
        Policy,
    > as WarpMma>::Thread;

    assert_eq!(
        <<Other as ThreadMma>::LayoutA as MatrixLayout>::KIND,
        LayoutKind::RowMajorInterleaved(2)
    );
    assert_eq!(
        <<Other as ThreadMma>::LayoutB as MatrixLayout>::KIND,
        LayoutKind::ColumnMajorInterleaved(8)
    );
}

#[test]
fn conjugate_is_identity_for_real_operands() {
    type Plain =
        SpikeMmaSimt<Shape<8, 16, 1>, bool, ColumnMajor, f32, RowMajor, f32, RowMajor, Policy>;
    type Conj = SpikeMmaSimt<
        Shape<8, 16, 1>,
        bool,
        ColumnMajor,
        f32,
        RowMajor,
        f32,
        RowMajor,
        Policy,
        1,
        Conjugate,
        Conjugate,
    >;

    let mut rng = seeded_rng(11);
    let a = random_spikes::<2>(&mut rng);
    let b = random_f32::<2>(&mut rng);
    let c = random_f32::<4>(&mut rng);

    let mut plain = Fragment::default();
    let mut conj = Fragment::default();
    Plain::default().compute(&mut plain, a, b, &c, 0);
    Conj::default().compute(&mut conj, a, b, &c, 0);

    assert_eq!(bits(plain.as_slice()), bits(conj.as_slice()));
    assert_eq!(Conj::TRANSFORM_B, ComplexTransformKind::Conjugate);
}

#[test]
fn conjugate_applies_to_complex_operands() {
    type Mma = SpikeMmaSimt<
        Shape<4, 8, 1>,
        bool,
        RowMajor,
        Complex<f32>,
        RowMajor,
        Complex<f32>,
        RowMajor,
        SimtPolicy<Extent<4, 8>, RowMajor, Shape<1, 1, 1>>,
        1,
        NoTransform,
        Conjugate,
    >;

    let mut acc = Fragment::new([Complex::new(1.0f32, 1.0)]);
    Mma::default().accumulate(
        &mut acc,
        Fragment::new([true]),
        Fragment::new([Complex::new(2.0, 3.0)]),
        7,
    );

    assert_eq!(acc.into_inner(), [Complex::new(3.0, -2.0)]);
}

#[test]
fn transform_copies_operands() {
    type Mma =
        SpikeMmaSimt<Shape<8, 16, 1>, f32, ColumnMajor, bool, RowMajor, f32, RowMajor, Policy>;

    let a = Fragment::new([1.5f32, -2.0]);
    let b = Fragment::new([true, false]);
    let mut dst_a = Fragment::default();
    let mut dst_b = Fragment::default();

    Mma::default().transform(&mut dst_a, &mut dst_b, &a, &b);

    assert_eq!((dst_a, dst_b), (a, b));
}

// Runs the warp kernel on behalf of every lane, one lane mma K step at a time,
// then scatters each lane's accumulator back into the warp tile.
fn emulate_warp<Mma, EA, EB, EC, const MK: usize, const KN: usize, const MN: usize>(
    a: &Matrix<EA>,
    b: &Matrix<EB>,
    c: &Matrix<EC>,
) -> Vec<EC>
where
    Mma: WarpMma<Thread: ThreadMma<ElementA = EA, ElementB = EB, ElementC = EC>>,
    EA: Element,
    EB: Element,
    EC: Numeric,
{
    // The dp4a kernel reads four k values as one element, so its fragments keep
    // the interleaved order of the warp tile.
    let (layout_a, layout_b) = match <Mma::Thread as ThreadMma>::PATH {
        ThreadMmaPath::Dp4a => (
            <Mma::LayoutA as MatrixLayout>::KIND,
            <Mma::LayoutB as MatrixLayout>::KIND,
        ),
        ThreadMmaPath::SpikeLhs | ThreadMmaPath::SpikeRhs => (
            <<Mma::Thread as ThreadMma>::LayoutA as MatrixLayout>::KIND,
            <<Mma::Thread as ThreadMma>::LayoutB as MatrixLayout>::KIND,
        ),
    };
    let layout_c = <<Mma::Thread as ThreadMma>::LayoutC as MatrixLayout>::KIND;
    let lane_m = <<Mma::Thread as ThreadMma>::Shape as GemmShape>::M;
    let lane_n = <<Mma::Thread as ThreadMma>::Shape as GemmShape>::N;
    let lane_k = <<Mma::Thread as ThreadMma>::Shape as GemmShape>::K;

    let mut out = c.data.to_vec();
    let mma = Mma::default();

    for lane in 0..WARP_SIZE {
        let (lane_row, lane_column) = <Mma::Policy as MmaSimtPolicy>::lane_coord(lane);
        let warp_row = |row| <Mma::Policy as MmaSimtPolicy>::warp_row(lane_row, row);
        let warp_column = |column| <Mma::Policy as MmaSimtPolicy>::warp_column(lane_column, column);

        let mut acc = Fragment::<EC, MN>::default();
        for row in 0..lane_m {
            for column in 0..lane_n {
                acc[layout_c.offset(row, column, lane_m, lane_n)] =
                    c.at(warp_row(row), warp_column(column));
            }
        }

        for step in (0..a.columns).step_by(lane_k) {
            let mut lane_a = Fragment::<EA, MK>::default();
            for row in 0..lane_m {
                for k in 0..lane_k {
                    lane_a[layout_a.offset(row, k, lane_m, lane_k)] = a.at(warp_row(row), step + k);
                }
            }

            let mut lane_b = Fragment::<EB, KN>::default();
            for k in 0..lane_k {
                for column in 0..lane_n {
                    lane_b[layout_b.offset(k, column, lane_k, lane_n)] =
                        b.at(step + k, warp_column(column));
                }
            }

            mma.accumulate(&mut acc, lane_a, lane_b, 0);
        }

        for row in 0..lane_m {
            for column in 0..lane_n {
                let offset = c
                    .layout
                    .offset(warp_row(row), warp_column(column), c.rows, c.columns);
                out[offset] = acc[layout_c.offset(row, column, lane_m, lane_n)];
            }
        }
    }

    out
}

#[test]
fn warp_emulation_matches_the_tile_product() {
    type Mma =
        SpikeMmaSimt<Shape<16, 32, 3>, bool, ColumnMajor, f32, RowMajor, f32, RowMajor, Policy>;

    let mut rng = seeded_rng(12);
    let a = random_spikes::<{ 16 * 3 }>(&mut rng);
    let b = random_f32::<{ 3 * 32 }>(&mut rng);
    let c = random_f32::<{ 16 * 32 }>(&mut rng);

    let a = Matrix::new(a.as_slice(), LayoutKind::ColumnMajor, 16, 3);
    let b = Matrix::new(b.as_slice(), LayoutKind::RowMajor, 3, 32);
    let c = Matrix::new(c.as_slice(), LayoutKind::RowMajor, 16, 32);

    let actual = emulate_warp::<Mma, _, _, _, 4, 4, 16>(&a, &b, &c);
    let expected = reference_mma(&a, &b, &c);

    assert_eq!(bits(&actual), bits(&expected));
}

#[test]
fn warp_emulation_spike_rhs_with_column_lane_numbering() {
    type Lanes = SimtPolicy<Extent<8, 4>, ColumnMajor, Shape<1, 2, 2>>;
    type Mma =
        SpikeMmaSimt<Shape<16, 16, 4>, i8, RowMajor, bool, ColumnMajor, i32, ColumnMajor, Lanes>;

    let mut rng = seeded_rng(13);
    let a = random_i8::<{ 16 * 4 }>(&mut rng);
    let b = random_spikes::<{ 4 * 16 }>(&mut rng);
    let c = random_i32::<{ 16 * 16 }>(&mut rng);

    let a = Matrix::new(a.as_slice(), LayoutKind::RowMajor, 16, 4);
    let b = Matrix::new(b.as_slice(), LayoutKind::ColumnMajor, 4, 16);
    let c = Matrix::new(c.as_slice(), LayoutKind::ColumnMajor, 16, 16);

    // Lanes compute 2x4 tiles with two k values per step.
    let actual = emulate_warp::<Mma, _, _, _, 4, 8, 8>(&a, &b, &c);

    assert_eq!(actual, reference_mma(&a, &b, &c));
}

#[test]
fn dp4a_selected_for_interleaved_int8() {
    type Mma = SpikeMmaSimt<
        Shape<8, 16, 4>,
        i8,
        ColumnMajorInterleaved<4>,
        i8,
        RowMajorInterleaved<4>,
        i32,
        RowMajor,
        SimtPolicy<Extent<4, 8>, RowMajorInterleaved<2>, Shape<2, 2, 4>>,
    >;

    assert!(Mma::USE_DP4A);
    assert_eq!(
        <<Mma as WarpMma>::Thread as ThreadMma>::PATH,
        ThreadMmaPath::Dp4a
    );

    let setup = Mma::setup().ok();
    assert_eq!(setup.map(|setup| setup.use_dp4a), Some(true));
    assert_eq!(setup.map(|setup| setup.path), Some(ThreadMmaPath::Dp4a));
}

#[test]
fn warp_emulation_dp4a_matches_the_tile_product() {
    type Mma = SpikeMmaSimt<
        Shape<8, 16, 8>,
        i8,
        ColumnMajorInterleaved<4>,
        i8,
        RowMajorInterleaved<4>,
        i32,
        RowMajor,
        SimtPolicy<Extent<4, 8>, RowMajorInterleaved<2>, Shape<2, 2, 4>>,
    >;
    assert!(Mma::USE_DP4A);

    let mut rng = seeded_rng(16);
    let a = random_i8::<{ 8 * 8 }>(&mut rng);
    let b = random_i8::<{ 8 * 16 }>(&mut rng);
    let c = random_i32::<{ 8 * 16 }>(&mut rng);

    // Lanes hold 2x2 accumulators and step through k four values at a time.
    let actual = emulate_warp::<Mma, _, _, _, 8, 8, 4>(
        &Matrix::new(a.as_slice(), LayoutKind::ColumnMajorInterleaved(4), 8, 8),
        &Matrix::new(b.as_slice(), LayoutKind::RowMajorInterleaved(4), 8, 16),
        &Matrix::new(c.as_slice(), LayoutKind::RowMajor, 8, 16),
    );

    let a_plain = relayout(
        a.as_slice(),
        LayoutKind::ColumnMajorInterleaved(4),
        LayoutKind::RowMajor,
        8,
        8,
    );
    let b_plain = relayout(
        b.as_slice(),
        LayoutKind::RowMajorInterleaved(4),
        LayoutKind::RowMajor,
        8,
        16,
    );
    let expected = reference_mma(
        &Matrix::new(&a_plain, LayoutKind::RowMajor, 8, 8),
        &Matrix::new(&b_plain, LayoutKind::RowMajor, 8, 16),
        &Matrix::new(c.as_slice(), LayoutKind::RowMajor, 8, 16),
    );

    assert_eq!(actual, expected);
}

#[test]
fn dp4a_matches_the_serpentine_path() {
    // Spikes encoded as 0/1 bytes through the dot-product kernel must give the
    // same accumulator as the spike kernel on the same, de-interleaved, values.
    const M: usize = 3;
    const N: usize = 2;
    const K: usize = 8;

    let mut rng = seeded_rng(14);
    let spikes = random_spikes::<{ M * K }>(&mut rng);
    let b = random_i8::<{ K * N }>(&mut rng);
    let c = random_i32::<{ M * N }>(&mut rng);

    let spike =
        SpikeMma::<Shape<M, N, K>, bool, ColumnMajor, i8, RowMajor, i32, RowMajor>::default();
    let expected = spike.compute_owned(&spikes, &b, c);

    let a_interleaved = relayout(
        &spikes.map(i8::from).into_inner(),
        LayoutKind::ColumnMajor,
        LayoutKind::ColumnMajorInterleaved(4),
        M,
        K,
    );
    let b_interleaved = relayout(
        b.as_slice(),
        LayoutKind::RowMajor,
        LayoutKind::RowMajorInterleaved(4),
        K,
        N,
    );

    let mut a = Fragment::<i8, { M * K }>::default();
    a.copy_from_slice(&a_interleaved);
    let mut b = Fragment::<i8, { K * N }>::default();
    b.copy_from_slice(&b_interleaved);

    let dp4a = Dp4aMma::<Shape<M, N, K>, ColumnMajor, RowMajor, RowMajor>::default();
    let actual = dp4a.compute_owned(&a, &b, c);

    assert_eq!(actual, expected);
}

#[test]
fn dp4a_matches_the_reference_on_full_range_bytes() {
    const M: usize = 2;
    const N: usize = 3;
    const K: usize = 12;

    let mut rng = seeded_rng(15);
    let a = random_i8::<{ M * K }>(&mut rng);
    let b = random_i8::<{ K * N }>(&mut rng);
    let c = random_i32::<{ M * N }>(&mut rng);

    let dp4a = Dp4aMma::<Shape<M, N, K>, ColumnMajor, RowMajor, ColumnMajor>::default();
    let actual = dp4a.compute_owned(&a, &b, c);

    let expected = reference_mma(
        &Matrix::new(a.as_slice(), LayoutKind::ColumnMajorInterleaved(4), M, K),
        &Matrix::new(b.as_slice(), LayoutKind::RowMajorInterleaved(4), K, N),
        &Matrix::new(c.as_slice(), LayoutKind::ColumnMajor, M, N),
    );

    assert_eq!(actual.to_vec(), expected);
}

#[test]
fn setup_agrees_with_the_type_level_kernel() {
    type Mma = SpikeMmaSimt<
        Shape<16, 32, 4>,
        bool,
        ColumnMajorInterleaved<4>,
        f32,
        RowMajor,
        f32,
        RowMajor,
        Policy,
        2,
        NoTransform,
        Conjugate,
    >;
    type Thread = <Mma as WarpMma>::Thread;

    let config = Mma::config();
    assert_eq!(config.partitions_k, 2);
    assert_eq!(config.transform_b, ComplexTransformKind::Conjugate);
    assert_eq!(config.policy, Policy::config());
    assert_eq!(config.elem_a, ElemKind::Bool);

    let setup = Mma::setup().ok();
    assert_eq!(setup.map(|setup| setup.thread), Some(Thread::config()));
    assert_eq!(setup.map(|setup| setup.path), Some(Thread::PATH));
    assert_eq!(setup.map(|setup| setup.use_dp4a), Some(Mma::USE_DP4A));
    assert_eq!(
        setup.map(|setup| setup.partition_k_extent),
        Some(Mma::PARTITION_K_EXTENT as u32)
    );
}
