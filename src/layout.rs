//! Drawing of function patterns, format/version information and data
//! modules onto a [`Symbol`].

use crate::bits::BitBuffer;
use crate::symbol::Symbol;
use crate::version::{Capacity, Version};

/// A mask pattern (0–7).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Mask(u8);

impl Mask {
    /// All eight patterns in ascending order.
    pub const ALL: [Mask; 8] = [
        Mask(0),
        Mask(1),
        Mask(2),
        Mask(3),
        Mask(4),
        Mask(5),
        Mask(6),
        Mask(7),
    ];

    /// Creates a mask object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [0, 7].
    pub const fn new(mask: u8) -> Self {
        assert!(mask <= 7, "Mask value out of range");
        Self(mask)
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Whether a data module at column `x`, row `y` is inverted.
    pub fn inverts(self, x: usize, y: usize) -> bool {
        match self.0 {
            0 => (x + y) % 2 == 0,
            1 => y % 2 == 0,
            2 => x % 3 == 0,
            3 => (x + y) % 3 == 0,
            4 => (y / 2 + x / 3) % 2 == 0,
            5 => (x * y) % 2 + (x * y) % 3 == 0,
            6 => ((x * y) % 2 + (x * y) % 3) % 2 == 0,
            7 => ((x + y) % 2 + (x * y) % 3) % 2 == 0,
            _ => unreachable!(),
        }
    }
}

const FINDER_SIZE: usize = 7;

const FINDER_PATTERN: [[bool; 7]; 7] = {
    let mut pattern = [[true; 7]; 7];
    let mut i = 1;
    while i < 6 {
        pattern[1][i] = false;
        pattern[5][i] = false;
        pattern[i][1] = false;
        pattern[i][5] = false;
        i += 1;
    }
    pattern
};

const ALIGNMENT_PATTERN: [[bool; 5]; 5] = [
    [true, true, true, true, true],
    [true, false, false, false, true],
    [true, false, true, false, true],
    [true, false, false, false, true],
    [true, true, true, true, true],
];

const SEPARATOR_ROW: [[bool; 8]; 1] = [[false; 8]];
const SEPARATOR_COLUMN: [[bool; 1]; 8] = [[false]; 8];

/// Draws a complete symbol for `capacity` with `data` (interleaved codewords
/// plus remainder bits) placed under `mask`.
///
/// # Panics
///
/// Panics if `data` does not fill the data region exactly.
pub(crate) fn build_symbol(capacity: &Capacity, mask: Mask, data: &BitBuffer, quiet_zone: usize) -> Symbol {
    let mut symbol = Symbol::new(capacity.symbol_size(), quiet_zone);
    draw_finder_patterns(&mut symbol);
    draw_alignment_patterns(&mut symbol, capacity.version());
    draw_timing_patterns(&mut symbol);
    draw_format_bits(&mut symbol, capacity.format_info(mask));
    if let Some(bits) = capacity.version_info() {
        draw_version_bits(&mut symbol, bits);
    }
    draw_codewords(&mut symbol, data, mask);

    let numempty = symbol.num_empty_modules();
    assert_eq!(
        numempty,
        0,
        "{} modules left unwritten in version {}",
        numempty,
        capacity.version().value()
    );
    symbol
}

/// Finder patterns in three corners, each with its light separator.
fn draw_finder_patterns(symbol: &mut Symbol) {
    let size = symbol.symbol_size();
    let far = size - FINDER_SIZE;

    symbol.set_pattern(0, 0, &FINDER_PATTERN);
    symbol.set_pattern(0, FINDER_SIZE, &SEPARATOR_ROW);
    symbol.set_pattern(FINDER_SIZE, 0, &SEPARATOR_COLUMN);

    symbol.set_pattern(far, 0, &FINDER_PATTERN);
    symbol.set_pattern(far - 1, FINDER_SIZE, &SEPARATOR_ROW);
    symbol.set_pattern(far - 1, 0, &SEPARATOR_COLUMN);

    symbol.set_pattern(0, far, &FINDER_PATTERN);
    symbol.set_pattern(0, far - 1, &SEPARATOR_ROW);
    symbol.set_pattern(FINDER_SIZE, far - 1, &SEPARATOR_COLUMN);
}

/// Alignment patterns at every pair of centre coordinates whose centre is
/// not already covered by a finder pattern.
fn draw_alignment_patterns(symbol: &mut Symbol, version: Version) {
    let positions = alignment_pattern_positions(version);
    for &x in &positions {
        for &y in &positions {
            if !symbol.is_empty(x, y) {
                continue;
            }
            symbol.set_pattern(x - 2, y - 2, &ALIGNMENT_PATTERN);
        }
    }
}

/// Ascending centre coordinates of the alignment patterns; empty for
/// version 1.
pub(crate) fn alignment_pattern_positions(version: Version) -> Vec<usize> {
    let ver = usize::from(version.value());
    if ver == 1 {
        return Vec::new();
    }
    let numalign: usize = ver / 7 + 2;
    let step: usize = if ver == 32 {
        26
    } else {
        ((ver * 4 + numalign * 2 + 1) / (numalign * 2 - 2)) * 2
    };
    let size = version.size();
    let mut result: Vec<usize> = (0..numalign - 1).map(|i| size - 7 - i * step).collect();
    result.push(6);
    result.reverse();
    result
}

fn draw_timing_patterns(symbol: &mut Symbol) {
    let size = symbol.symbol_size();
    for i in FINDER_SIZE + 1..size - FINDER_SIZE {
        let isdark = i % 2 == 0;
        symbol.set(i, FINDER_SIZE - 1, isdark);
        symbol.set(FINDER_SIZE - 1, i, isdark);
    }
}

/// Draws both copies of the 15-bit format word plus the dark module.
fn draw_format_bits(symbol: &mut Symbol, bits: u16) {
    let bits = u32::from(bits);
    let size = symbol.symbol_size();

    // Around the top left finder pattern.
    for i in 0..6 {
        symbol.set(8, i, get_bit(bits, i));
    }
    symbol.set(8, 7, get_bit(bits, 6));
    symbol.set(8, 8, get_bit(bits, 7));
    symbol.set(7, 8, get_bit(bits, 8));
    for i in 9..15 {
        symbol.set(14 - i, 8, get_bit(bits, i));
    }

    // Under the top right and beside the bottom left finder patterns.
    for i in 0..8 {
        symbol.set(size - 1 - i, 8, get_bit(bits, i));
    }
    for i in 8..15 {
        symbol.set(8, size - 15 + i, get_bit(bits, i));
    }
    symbol.set(8, size - 8, true);
}

/// Draws the two 6x3 copies of the 18-bit version word.
fn draw_version_bits(symbol: &mut Symbol, bits: u32) {
    let size = symbol.symbol_size();
    for i in 0..18 {
        let bit = get_bit(bits, i);
        let a = size - 11 + i % 3;
        let b = i / 3;
        symbol.set(a, b, bit);
        symbol.set(b, a, bit);
    }
}

/// Places `data` in the two-column zig-zag starting at the bottom right
/// corner, skipping the vertical timing column and every module already
/// written. Modules past the end of `data` stay empty.
fn draw_codewords(symbol: &mut Symbol, data: &BitBuffer, mask: Mask) {
    let size = symbol.symbol_size();
    let mut bits = data.iter();
    let mut right: usize = size - 1;
    loop {
        if right == 6 {
            right = 5;
        }
        let upward = ((right + 1) & 2) == 0;
        for vert in 0..size {
            let y = if upward { size - 1 - vert } else { vert };
            for x in [right, right - 1] {
                if !symbol.is_empty(x, y) {
                    continue;
                }
                if let Some(bit) = bits.next() {
                    symbol.set(x, y, bit != mask.inverts(x, y));
                }
            }
        }
        if right < 2 {
            break;
        }
        right -= 2;
    }
    assert!(bits.next().is_none(), "Data does not fit the symbol");
}

fn get_bit(x: u32, i: usize) -> bool {
    ((x >> i) & 1) != 0
}
