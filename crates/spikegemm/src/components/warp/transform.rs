use serde::{Deserialize, Serialize};

use crate::components::{Element, Fragment};

/// Operand transform applied before the thread-level product.
pub trait ComplexTransform: Copy + Default + core::fmt::Debug + Send + Sync + 'static {
    const KIND: ComplexTransformKind;

    fn apply<E: Element, const LEN: usize>(fragment: Fragment<E, LEN>) -> Fragment<E, LEN>;
}

/// Leaves the operand untouched.
#[derive(Copy, Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct NoTransform;

/// Conjugates every element of the operand.
///
/// Only complex elements change, every other element is returned as is.
#[derive(Copy, Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct Conjugate;

impl ComplexTransform for NoTransform {
    const KIND: ComplexTransformKind = ComplexTransformKind::None;

    #[inline(always)]
    fn apply<E: Element, const LEN: usize>(fragment: Fragment<E, LEN>) -> Fragment<E, LEN> {
        fragment
    }
}

impl ComplexTransform for Conjugate {
    const KIND: ComplexTransformKind = ComplexTransformKind::Conjugate;

    #[inline(always)]
    fn apply<E: Element, const LEN: usize>(fragment: Fragment<E, LEN>) -> Fragment<E, LEN> {
        fragment.conjugate()
    }
}

/// Runtime tag of a [ComplexTransform].
#[derive(Copy, Clone, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplexTransformKind {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "conjugate")]
    Conjugate,
}

impl core::fmt::Display for ComplexTransformKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ComplexTransformKind::None => f.write_str("none"),
            ComplexTransformKind::Conjugate => f.write_str("conjugate"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex;

    #[test]
    fn conjugate_changes_complex_elements_only() {
        let real = Fragment::new([1.5f32, -0.0, f32::INFINITY]);
        let complex = Fragment::new([Complex::new(1.0f64, 2.0), Complex::new(-3.0, -4.0)]);

        assert_eq!(Conjugate::apply(real), real);
        assert_eq!(
            Conjugate::apply(complex).into_inner(),
            [Complex::new(1.0, -2.0), Complex::new(-3.0, 4.0)]
        );
        assert_eq!(NoTransform::apply(complex), complex);
    }
}
