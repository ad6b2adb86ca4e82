#![allow(dead_code)]

use rand::{Rng, SeedableRng, rngs::StdRng};
use spikegemm::components::{Element, Fragment, LayoutKind, Promote};

// All random numeric values are multiples of 1/4 in [-4, 4], so float
// products are exact and only the order of additions can change a result.
const PRECISION: i32 = 4;

// We don't need a fancy crypto-secure seed as this is only for testing.
pub fn seeded_rng(salt: u64) -> StdRng {
    StdRng::seed_from_u64(123456789 ^ salt)
}

pub fn random_spikes<const LEN: usize>(rng: &mut StdRng) -> Fragment<bool, LEN> {
    Fragment::from_fn(|_| rng.random::<bool>())
}

pub fn random_i32<const LEN: usize>(rng: &mut StdRng) -> Fragment<i32, LEN> {
    Fragment::from_fn(|_| rng.random_range(-64..=64))
}

pub fn random_i8<const LEN: usize>(rng: &mut StdRng) -> Fragment<i8, LEN> {
    Fragment::from_fn(|_| rng.random_range(i8::MIN..=i8::MAX))
}

pub fn random_f32<const LEN: usize>(rng: &mut StdRng) -> Fragment<f32, LEN> {
    Fragment::from_fn(|_| {
        rng.random_range(-4 * PRECISION..=4 * PRECISION) as f32 / PRECISION as f32
    })
}

/// Dense operand stored with an explicit layout.
pub struct Matrix<'a, E> {
    pub data: &'a [E],
    pub layout: LayoutKind,
    pub rows: usize,
    pub columns: usize,
}

impl<'a, E: Element> Matrix<'a, E> {
    pub fn new(data: &'a [E], layout: LayoutKind, rows: usize, columns: usize) -> Self {
        assert_eq!(data.len(), rows * columns);
        Self {
            data,
            layout,
            rows,
            columns,
        }
    }

    pub fn at(&self, row: usize, column: usize) -> E {
        self.data[self.layout.offset(row, column, self.rows, self.columns)]
    }
}

/// `D = C + A * B` summed in ascending `k` for every element, with spikes as 0 or 1.
pub fn reference_mma<EA, EB, EC>(a: &Matrix<EA>, b: &Matrix<EB>, c: &Matrix<EC>) -> Vec<EC>
where
    EA: Element,
    EB: Element,
    EC: Promote<EA> + Promote<EB>,
{
    let (m, k, n) = (a.rows, a.columns, b.columns);
    assert_eq!(b.rows, k);
    assert_eq!((c.rows, c.columns), (m, n));

    let mut out = vec![EC::zero(); m * n];
    for row in 0..m {
        for column in 0..n {
            let mut acc = c.at(row, column);
            for i in 0..k {
                let lhs = <EC as Promote<EA>>::promote(a.at(row, i));
                let rhs = <EC as Promote<EB>>::promote(b.at(i, column));
                acc = acc.multiply_add(lhs, rhs);
            }
            out[c.layout.offset(row, column, m, n)] = acc;
        }
    }
    out
}

/// Reorders `data`, stored as a `rows x columns` matrix in `from`, into layout `to`.
pub fn relayout<E: Element>(
    data: &[E],
    from: LayoutKind,
    to: LayoutKind,
    rows: usize,
    columns: usize,
) -> Vec<E> {
    let mut out = vec![E::default(); data.len()];
    for row in 0..rows {
        for column in 0..columns {
            out[to.offset(row, column, rows, columns)] =
                data[from.offset(row, column, rows, columns)];
        }
    }
    out
}

pub fn bits(values: &[f32]) -> Vec<u32> {
    values.iter().map(|value| value.to_bits()).collect()
}
