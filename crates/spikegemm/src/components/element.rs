use core::fmt::{Debug, Display};

use half::{bf16, f16};
use num_complex::Complex;
use serde::{Deserialize, Serialize};

/// Scalar stored in an operand or accumulator fragment.
pub trait Element: Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    /// Runtime tag of the element type.
    const KIND: ElemKind;

    /// Complex conjugate. The identity for every non-complex element.
    fn conjugate(self) -> Self {
        self
    }
}

/// Element with ring arithmetic, usable as an accumulator.
///
/// `bool` never implements this trait: spikes are operands only.
pub trait Numeric: Element {
    fn zero() -> Self;

    /// Returns `self + lhs * rhs` with the arithmetic of `Self`.
    ///
    /// Integers wrap on overflow. Floats multiply then add, never fused.
    fn multiply_add(self, lhs: Self, rhs: Self) -> Self;
}

/// Conversion of an operand element into the accumulator domain.
///
/// Spikes promote to `0` or `1`.
pub trait Promote<E: Element>: Numeric {
    fn promote(value: E) -> Self;
}

/// Operand pairs with exactly one spike operand.
///
/// Implemented for `(bool, B)` and `(A, bool)` with `A`, `B` numeric, so a pair
/// of spikes or a pair of numeric operands has no spike kernel.
pub trait SpikeOperands {
    /// Which side of the product carries the spikes.
    const SIDE: SpikeSide;
}

impl<B: Numeric> SpikeOperands for (bool, B) {
    const SIDE: SpikeSide = SpikeSide::Lhs;
}

impl<A: Numeric> SpikeOperands for (A, bool) {
    const SIDE: SpikeSide = SpikeSide::Rhs;
}

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpikeSide {
    Lhs,
    Rhs,
}

/// Runtime tag for every supported element type.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElemKind {
    Bool,
    I8,
    U8,
    I16,
    I32,
    I64,
    F16,
    BF16,
    F32,
    F64,
    C32,
    C64,
}

impl ElemKind {
    pub fn is_spike(&self) -> bool {
        matches!(self, ElemKind::Bool)
    }

    /// Whether an accumulator of kind `self` has a [Promote] impl from `operand`.
    pub fn can_accumulate(&self, operand: ElemKind) -> bool {
        use ElemKind::*;

        match self {
            Bool => false,
            I32 => matches!(operand, Bool | I8 | U8 | I16 | I32),
            I64 => matches!(operand, Bool | I8 | U8 | I16 | I32 | I64),
            F16 => matches!(operand, Bool | I8 | U8 | F16),
            BF16 => matches!(operand, Bool | I8 | U8 | BF16),
            F32 => matches!(operand, Bool | I8 | U8 | I16 | I32 | F16 | BF16 | F32),
            F64 => matches!(operand, Bool | I8 | U8 | I16 | I32 | F16 | BF16 | F32 | F64),
            C32 => matches!(operand, Bool | I8 | F32 | C32),
            C64 => matches!(operand, Bool | F32 | F64 | C64),
            I8 | U8 | I16 => false,
        }
    }
}

impl Display for ElemKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            ElemKind::Bool => "bool",
            ElemKind::I8 => "i8",
            ElemKind::U8 => "u8",
            ElemKind::I16 => "i16",
            ElemKind::I32 => "i32",
            ElemKind::I64 => "i64",
            ElemKind::F16 => "f16",
            ElemKind::BF16 => "bf16",
            ElemKind::F32 => "f32",
            ElemKind::F64 => "f64",
            ElemKind::C32 => "c32",
            ElemKind::C64 => "c64",
        };
        f.write_str(name)
    }
}

impl Element for bool {
    const KIND: ElemKind = ElemKind::Bool;
}

macro_rules! impl_integer {
    ($($ty:ty => $kind:ident),*) => {
        $(
            impl Element for $ty {
                const KIND: ElemKind = ElemKind::$kind;
            }

            impl Numeric for $ty {
                fn zero() -> Self {
                    0
                }

                fn multiply_add(self, lhs: Self, rhs: Self) -> Self {
                    self.wrapping_add(lhs.wrapping_mul(rhs))
                }
            }
        )*
    };
}

macro_rules! impl_float {
    ($($ty:ty => $kind:ident),*) => {
        $(
            impl Element for $ty {
                const KIND: ElemKind = ElemKind::$kind;
            }

            impl Numeric for $ty {
                fn zero() -> Self {
                    num_traits::Zero::zero()
                }

                fn multiply_add(self, lhs: Self, rhs: Self) -> Self {
                    lhs * rhs + self
                }
            }
        )*
    };
}

impl_integer!(i8 => I8, u8 => U8, i16 => I16, i32 => I32, i64 => I64);
impl_float!(f16 => F16, bf16 => BF16, f32 => F32, f64 => F64);

macro_rules! impl_complex {
    ($($ty:ty => $kind:ident),*) => {
        $(
            impl Element for Complex<$ty> {
                const KIND: ElemKind = ElemKind::$kind;

                fn conjugate(self) -> Self {
                    self.conj()
                }
            }

            impl Numeric for Complex<$ty> {
                fn zero() -> Self {
                    num_traits::Zero::zero()
                }

                fn multiply_add(self, lhs: Self, rhs: Self) -> Self {
                    lhs * rhs + self
                }
            }
        )*
    };
}

impl_complex!(f32 => C32, f64 => C64);

macro_rules! impl_promote {
    ($acc:ty, |$value:ident| $body:expr, [$($src:ty),*]) => {
        $(
            impl Promote<$src> for $acc {
                fn promote($value: $src) -> Self {
                    $body
                }
            }
        )*
    };
}

impl_promote!(i32, |value| value as i32, [bool, i8, u8, i16, i32]);
impl_promote!(i64, |value| value as i64, [bool, i8, u8, i16, i32, i64]);

impl_promote!(f32, |value| value as f32, [i8, u8, i16, i32, f32]);
impl_promote!(f32, |value| value.to_f32(), [f16, bf16]);
impl_promote!(f32, |value| u8::from(value) as f32, [bool]);

impl_promote!(f64, |value| value as f64, [i8, u8, i16, i32, f32, f64]);
impl_promote!(f64, |value| value.to_f64(), [f16, bf16]);
impl_promote!(f64, |value| u8::from(value) as f64, [bool]);

impl_promote!(f16, |value| f16::from_f32(value as f32), [i8, u8]);
impl_promote!(f16, |value| value, [f16]);
impl_promote!(
    f16,
    |value| if value { f16::ONE } else { f16::ZERO },
    [bool]
);

impl_promote!(bf16, |value| bf16::from_f32(value as f32), [i8, u8]);
impl_promote!(bf16, |value| value, [bf16]);
impl_promote!(
    bf16,
    |value| if value { bf16::ONE } else { bf16::ZERO },
    [bool]
);

impl_promote!(
    Complex<f32>,
    |value| Complex::new(<f32 as Promote<_>>::promote(value), 0.0),
    [bool, i8, f32]
);
impl_promote!(Complex<f32>, |value| value, [Complex<f32>]);

impl_promote!(
    Complex<f64>,
    |value| Complex::new(<f64 as Promote<_>>::promote(value), 0.0),
    [bool, f32, f64]
);
impl_promote!(Complex<f64>, |value| value, [Complex<f64>]);
