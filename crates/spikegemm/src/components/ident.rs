use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// Identifier for the operands of `D = A * B + C`
///
/// Useful to specialize some functions depending on the operand
pub enum Operand {
    A,
    B,
    C,
}

impl Operand {
    /// Rows and columns of the operand for a product of extents `(m, n, k)`.
    pub fn extent(&self, m: u32, n: u32, k: u32) -> (u32, u32) {
        match self {
            Operand::A => (m, k),
            Operand::B => (k, n),
            Operand::C => (m, n),
        }
    }
}

impl core::fmt::Display for Operand {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Operand::A => f.write_str("A"),
            Operand::B => f.write_str("B"),
            Operand::C => f.write_str("C"),
        }
    }
}
