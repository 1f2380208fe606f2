//! Arithmetic in GF(2^8) as used by QR codes.
//!
//! The field is generated by the primitive polynomial
//! x^8 + x^4 + x^3 + x^2 + 1 with α = 2. Multiplication and division go
//! through compile-time exp/log tables.

const PRIMITIVE_POLYNOMIAL: u16 = 0x11d;

/// `EXP_TABLE[i] == α^i`; the last entry wraps back to 1.
static EXP_TABLE: [u8; 256] = build_exp_table();

/// `LOG_TABLE[α^i] == i`; `LOG_TABLE[0]` is unused.
static LOG_TABLE: [u8; 256] = build_log_table();

const fn build_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 256 {
        table[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE_POLYNOMIAL;
        }
        i += 1;
    }
    table
}

const fn build_log_table() -> [u8; 256] {
    let exp = build_exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

pub const ZERO: u8 = 0;
pub const ONE: u8 = 1;

/// Field addition, which is also subtraction.
pub fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Returns α^`power`.
pub fn exp(power: usize) -> u8 {
    EXP_TABLE[power % 255]
}

pub fn multiply(a: u8, b: u8) -> u8 {
    if a == ZERO || b == ZERO {
        return ZERO;
    }
    let sum = usize::from(LOG_TABLE[usize::from(a)]) + usize::from(LOG_TABLE[usize::from(b)]);
    EXP_TABLE[sum % 255]
}

/// Returns `a / b`.
///
/// # Panics
///
/// Panics if `b` is zero.
pub fn divide(a: u8, b: u8) -> u8 {
    assert_ne!(b, ZERO, "Division by zero in GF(256)");
    if a == ZERO {
        return ZERO;
    }
    let diff = usize::from(LOG_TABLE[usize::from(a)]) + 255 - usize::from(LOG_TABLE[usize::from(b)]);
    EXP_TABLE[diff % 255]
}

/// Returns the multiplicative inverse of `a`.
///
/// # Panics
///
/// Panics if `a` is zero.
pub fn inverse(a: u8) -> u8 {
    assert_ne!(a, ZERO, "Zero has no inverse in GF(256)");
    EXP_TABLE[255 - usize::from(LOG_TABLE[usize::from(a)])]
}
