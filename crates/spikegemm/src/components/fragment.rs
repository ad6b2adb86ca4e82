use core::marker::PhantomData;
use core::ops::{Deref, DerefMut, Index, IndexMut};

use crate::components::{Element, MatrixLayout};

/// Fixed-size register storage owned by a single lane.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Fragment<E: Element, const LEN: usize>(pub [E; LEN]);

impl<E: Element, const LEN: usize> Fragment<E, LEN> {
    pub const fn new(values: [E; LEN]) -> Self {
        Self(values)
    }

    pub fn splat(value: E) -> Self {
        Self([value; LEN])
    }

    pub fn from_fn<F: FnMut(usize) -> E>(func: F) -> Self {
        Self(core::array::from_fn(func))
    }

    pub fn into_inner(self) -> [E; LEN] {
        self.0
    }

    pub fn map<T: Element, F: FnMut(E) -> T>(self, func: F) -> Fragment<T, LEN> {
        Fragment(self.0.map(func))
    }

    /// Conjugates every element. A no-op for non-complex elements.
    pub fn conjugate(self) -> Self {
        self.map(Element::conjugate)
    }
}

impl<E: Element, const LEN: usize> Default for Fragment<E, LEN> {
    fn default() -> Self {
        Self::splat(E::default())
    }
}

impl<E: Element, const LEN: usize> From<[E; LEN]> for Fragment<E, LEN> {
    fn from(values: [E; LEN]) -> Self {
        Self(values)
    }
}

impl<E: Element, const LEN: usize> Deref for Fragment<E, LEN> {
    type Target = [E; LEN];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<E: Element, const LEN: usize> DerefMut for Fragment<E, LEN> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<E: Element, const LEN: usize> Index<usize> for Fragment<E, LEN> {
    type Output = E;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<E: Element, const LEN: usize> IndexMut<usize> for Fragment<E, LEN> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

/// Read view over a packed `rows x columns` matrix stored with layout `L`.
#[derive(Clone, Copy)]
pub struct TileRef<'a, E: Element, L: MatrixLayout> {
    data: &'a [E],
    rows: usize,
    columns: usize,
    _layout: PhantomData<L>,
}

impl<'a, E: Element, L: MatrixLayout> TileRef<'a, E, L> {
    /// Creates a view over `data`, which must hold exactly `rows * columns` elements.
    pub fn packed(data: &'a [E], rows: usize, columns: usize) -> Self {
        debug_assert_eq!(data.len(), rows * columns);
        Self {
            data,
            rows,
            columns,
            _layout: PhantomData,
        }
    }

    pub fn at(&self, row: usize, column: usize) -> E {
        self.data[L::offset(row, column, self.rows, self.columns)]
    }
}
