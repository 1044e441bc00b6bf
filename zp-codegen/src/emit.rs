//! Small code fragments shared by rounds and the permutation tail.

use zp_core::{Register, MODULUS};

/// One line adding `value` to `register` modulo 32768, whatever its contents.
///
/// The take succeeds exactly when the sum wraps, leaving `r + v - 32768`;
/// otherwise its else edge runs the chained give, leaving `r + v`. Both paths
/// continue on the next line. A zero delta emits nothing.
pub fn wrapping_add_code(register: Register, value: u32) -> String {
    let value = value % MODULUS;
    if value == 0 {
        return String::new();
    }
    format!(
        "#take {} {} give {} {}\n",
        register,
        MODULUS - value,
        register,
        value
    )
}

/// Value of bit `bit` (`2^bit`).
pub fn bit_value(bit: usize) -> u32 {
    1u32 << bit
}
