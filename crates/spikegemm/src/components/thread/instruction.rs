//! Elementary `1 x 1 x 1` multiply-accumulate operators.

use crate::components::{Element, Promote, Shape};

/// Shape of the elementary operator.
pub type InstructionShape = Shape<1, 1, 1>;

/// Returns `acc + a * b` after promoting both operands to the accumulator type.
///
/// Spikes promote to `0` or `1`, so a spike operand selects whether the other
/// operand is added.
#[inline(always)]
pub fn multiply_add<EA, EB, EC>(acc: EC, a: EA, b: EB) -> EC
where
    EA: Element,
    EB: Element,
    EC: Promote<EA> + Promote<EB>,
{
    acc.multiply_add(
        <EC as Promote<EA>>::promote(a),
        <EC as Promote<EB>>::promote(b),
    )
}

/// Returns `acc + dot(a, b)` on four packed `i8` lanes, wrapping like `dp4a`.
#[inline(always)]
pub fn dot4_add(acc: i32, a: [i8; 4], b: [i8; 4]) -> i32 {
    let dot = a
        .iter()
        .zip(b.iter())
        .fold(0i32, |sum, (&a, &b)| sum.wrapping_add(a as i32 * b as i32));
    acc.wrapping_add(dot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spike_selects_the_numeric_operand() {
        assert_eq!(multiply_add(10i32, true, 7i8), 17);
        assert_eq!(multiply_add(10i32, false, 7i8), 10);
        assert_eq!(multiply_add(0.5f32, 3.0f32, true), 3.5);
    }

    #[test]
    fn spike_with_nan_operand_follows_promotion() {
        // 0 * NaN is NaN: a zero spike still multiplies.
        assert!(multiply_add(1.0f32, false, f32::NAN).is_nan());
    }

    #[test]
    fn dot4_wraps() {
        assert_eq!(dot4_add(1, [1, 2, 3, 4], [5, 6, 7, 8]), 71);
        assert_eq!(dot4_add(i32::MAX, [1, 0, 0, 0], [1, 0, 0, 0]), i32::MIN);
        assert_eq!(dot4_add(0, [-128; 4], [-128; 4]), 65536);
    }
}
