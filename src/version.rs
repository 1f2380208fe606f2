//! Symbol versions, recovery levels and the capacity table.
//!
//! Every (version, level) pair has exactly one [`Capacity`] record describing
//! how its codewords split into Reed–Solomon blocks. The Format Information
//! and Version Information words are precomputed here as well.

use crate::layout::Mask;
use crate::segment::DataEncoder;

/// Error recovery level of a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum RecoveryLevel {
    /// Level L: tolerates ~7% erroneous codewords.
    Low,
    /// Level M: tolerates ~15% erroneous codewords.
    Medium,
    /// Level Q: tolerates ~25% erroneous codewords.
    High,
    /// Level H: tolerates ~30% erroneous codewords.
    Highest,
}

impl RecoveryLevel {
    /// All levels, weakest first.
    pub const ALL: [RecoveryLevel; 4] = [
        RecoveryLevel::Low,
        RecoveryLevel::Medium,
        RecoveryLevel::High,
        RecoveryLevel::Highest,
    ];

    /// Returns an unsigned 2-bit integer (in the range 0 to 3).
    fn ordinal(self) -> usize {
        use RecoveryLevel::*;
        match self {
            Low => 0,
            Medium => 1,
            High => 2,
            Highest => 3,
        }
    }

    /// Returns the 2-bit level indicator of the Format Information.
    fn format_bits(self) -> u8 {
        use RecoveryLevel::*;
        match self {
            Low => 1,
            Medium => 0,
            High => 3,
            Highest => 2,
        }
    }
}

/// A QR code version (1–40).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [1, 40].
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.value() <= ver && ver <= Version::MAX.value(),
            "Version number out of range"
        );
        Self(ver)
    }

    /// Returns the value, which is in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Width and height of the symbol in modules, excluding the quiet zone.
    pub const fn size(self) -> usize {
        21 + 4 * (self.0 as usize - 1)
    }
}

/// A run of identically sized Reed–Solomon blocks.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BlockGroup {
    /// Number of blocks in this group.
    pub num_blocks: usize,
    /// Codewords per block, data and error correction together.
    pub num_codewords: usize,
    /// Data codewords per block.
    pub num_data_codewords: usize,
}

impl BlockGroup {
    pub fn num_ec_codewords(&self) -> usize {
        self.num_codewords - self.num_data_codewords
    }
}

/// Block structure and remainder bits of one version at one level.
#[derive(PartialEq, Eq, Debug)]
pub struct Capacity {
    version: Version,
    level: RecoveryLevel,
    blocks: &'static [BlockGroup],
    remainder_bits: usize,
}

/// Width of the quiet zone around a symbol, in modules.
pub const QUIET_ZONE_SIZE: usize = 4;

impl Capacity {
    /// Returns the record for `version` at `level`.
    pub fn get(version: Version, level: RecoveryLevel) -> &'static Capacity {
        let record = &CAPACITY_TABLE[usize::from(version.value() - 1) * 4 + level.ordinal()];
        debug_assert!(record.version == version && record.level == level);
        record
    }

    /// Picks the smallest version in `encoder`'s bracket whose data capacity
    /// at `level` holds `numdatabits` bits.
    pub fn choose(level: RecoveryLevel, encoder: DataEncoder, numdatabits: usize) -> Option<&'static Capacity> {
        (encoder.min_version().value()..=encoder.max_version().value())
            .map(|v| Capacity::get(Version::new(v), level))
            .find(|c| c.num_data_bits() >= numdatabits)
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn level(&self) -> RecoveryLevel {
        self.level
    }

    pub fn blocks(&self) -> &'static [BlockGroup] {
        self.blocks
    }

    /// Zero bits appended after the interleaved codewords to fill the symbol.
    pub fn remainder_bits(&self) -> usize {
        self.remainder_bits
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.iter().map(|b| b.num_blocks).sum()
    }

    /// Number of data bits the symbol holds, excluding error correction.
    pub fn num_data_bits(&self) -> usize {
        self.blocks
            .iter()
            .map(|b| 8 * b.num_blocks * b.num_data_codewords)
            .sum()
    }

    /// Number of codewords, data and error correction together.
    pub fn num_codewords(&self) -> usize {
        self.blocks.iter().map(|b| b.num_blocks * b.num_codewords).sum()
    }

    /// Number of terminator bits to append after `numdatabits` bits of data.
    pub fn num_terminator_bits(&self, numdatabits: usize) -> usize {
        self.num_data_bits().saturating_sub(numdatabits).min(4)
    }

    /// Number of zero bits that bring `numdatabits` to a codeword boundary.
    pub fn num_bits_to_pad_to_codeword(&self, numdatabits: usize) -> usize {
        if numdatabits == self.num_data_bits() {
            return 0;
        }
        (8 - numdatabits % 8) % 8
    }

    pub fn symbol_size(&self) -> usize {
        self.version.size()
    }

    /// Returns the 15-bit Format Information word for `mask`, BCH bits and
    /// XOR pattern included.
    pub fn format_info(&self, mask: Mask) -> u16 {
        FORMAT_INFO[usize::from((self.level.format_bits() << 3) | mask.value())]
    }

    /// Returns the 18-bit Version Information word, present from version 7.
    pub fn version_info(&self) -> Option<u32> {
        match VERSION_INFO[usize::from(self.version.value())] {
            0 => None,
            bits => Some(bits),
        }
    }
}

/// Format Information indexed by `(level bits << 3) | mask`.
static FORMAT_INFO: [u16; 32] = build_format_info();

/// Version Information indexed by version number; zero below version 7.
static VERSION_INFO: [u32; 41] = build_version_info();

const fn build_format_info() -> [u16; 32] {
    let mut table = [0u16; 32];
    let mut data: u32 = 0;
    while data < 32 {
        let mut rem: u32 = data;
        let mut i = 0;
        while i < 10 {
            rem = (rem << 1) ^ ((rem >> 9) * 0x537);
            i += 1;
        }
        table[data as usize] = (((data << 10) | rem) ^ 0x5412) as u16;
        data += 1;
    }
    table
}

const fn build_version_info() -> [u32; 41] {
    let mut table = [0u32; 41];
    let mut ver: u32 = 7;
    while ver <= 40 {
        let mut rem: u32 = ver;
        let mut i = 0;
        while i < 12 {
            rem = (rem << 1) ^ ((rem >> 11) * 0x1f25);
            i += 1;
        }
        table[ver as usize] = (ver << 12) | rem;
        ver += 1;
    }
    table
}

macro_rules! capacity {
    ($ver:expr, $level:ident, [$(($n:expr, $total:expr, $data:expr)),+], $rem:expr) => {
        Capacity {
            version: Version::new($ver),
            level: RecoveryLevel::$level,
            blocks: &[$(BlockGroup { num_blocks: $n, num_codewords: $total, num_data_codewords: $data }),+],
            remainder_bits: $rem,
        }
    };
}

/// (blocks, codewords per block, data codewords per block) groups and
/// remainder bits for every version and level.
static CAPACITY_TABLE: [Capacity; 160] = [
    capacity!(1, Low, [(1, 26, 19)], 0),
    capacity!(1, Medium, [(1, 26, 16)], 0),
    capacity!(1, High, [(1, 26, 13)], 0),
    capacity!(1, Highest, [(1, 26, 9)], 0),
    capacity!(2, Low, [(1, 44, 34)], 7),
    capacity!(2, Medium, [(1, 44, 28)], 7),
    capacity!(2, High, [(1, 44, 22)], 7),
    capacity!(2, Highest, [(1, 44, 16)], 7),
    capacity!(3, Low, [(1, 70, 55)], 7),
    capacity!(3, Medium, [(1, 70, 44)], 7),
    capacity!(3, High, [(2, 35, 17)], 7),
    capacity!(3, Highest, [(2, 35, 13)], 7),
    capacity!(4, Low, [(1, 100, 80)], 7),
    capacity!(4, Medium, [(2, 50, 32)], 7),
    capacity!(4, High, [(2, 50, 24)], 7),
    capacity!(4, Highest, [(4, 25, 9)], 7),
    capacity!(5, Low, [(1, 134, 108)], 7),
    capacity!(5, Medium, [(2, 67, 43)], 7),
    capacity!(5, High, [(2, 33, 15), (2, 34, 16)], 7),
    capacity!(5, Highest, [(2, 33, 11), (2, 34, 12)], 7),
    capacity!(6, Low, [(2, 86, 68)], 7),
    capacity!(6, Medium, [(4, 43, 27)], 7),
    capacity!(6, High, [(4, 43, 19)], 7),
    capacity!(6, Highest, [(4, 43, 15)], 7),
    capacity!(7, Low, [(2, 98, 78)], 0),
    capacity!(7, Medium, [(4, 49, 31)], 0),
    capacity!(7, High, [(2, 32, 14), (4, 33, 15)], 0),
    capacity!(7, Highest, [(4, 39, 13), (1, 40, 14)], 0),
    capacity!(8, Low, [(2, 121, 97)], 0),
    capacity!(8, Medium, [(2, 60, 38), (2, 61, 39)], 0),
    capacity!(8, High, [(4, 40, 18), (2, 41, 19)], 0),
    capacity!(8, Highest, [(4, 40, 14), (2, 41, 15)], 0),
    capacity!(9, Low, [(2, 146, 116)], 0),
    capacity!(9, Medium, [(3, 58, 36), (2, 59, 37)], 0),
    capacity!(9, High, [(4, 36, 16), (4, 37, 17)], 0),
    capacity!(9, Highest, [(4, 36, 12), (4, 37, 13)], 0),
    capacity!(10, Low, [(2, 86, 68), (2, 87, 69)], 0),
    capacity!(10, Medium, [(4, 69, 43), (1, 70, 44)], 0),
    capacity!(10, High, [(6, 43, 19), (2, 44, 20)], 0),
    capacity!(10, Highest, [(6, 43, 15), (2, 44, 16)], 0),
    capacity!(11, Low, [(4, 101, 81)], 0),
    capacity!(11, Medium, [(1, 80, 50), (4, 81, 51)], 0),
    capacity!(11, High, [(4, 50, 22), (4, 51, 23)], 0),
    capacity!(11, Highest, [(3, 36, 12), (8, 37, 13)], 0),
    capacity!(12, Low, [(2, 116, 92), (2, 117, 93)], 0),
    capacity!(12, Medium, [(6, 58, 36), (2, 59, 37)], 0),
    capacity!(12, High, [(4, 46, 20), (6, 47, 21)], 0),
    capacity!(12, Highest, [(7, 42, 14), (4, 43, 15)], 0),
    capacity!(13, Low, [(4, 133, 107)], 0),
    capacity!(13, Medium, [(8, 59, 37), (1, 60, 38)], 0),
    capacity!(13, High, [(8, 44, 20), (4, 45, 21)], 0),
    capacity!(13, Highest, [(12, 33, 11), (4, 34, 12)], 0),
    capacity!(14, Low, [(3, 145, 115), (1, 146, 116)], 3),
    capacity!(14, Medium, [(4, 64, 40), (5, 65, 41)], 3),
    capacity!(14, High, [(11, 36, 16), (5, 37, 17)], 3),
    capacity!(14, Highest, [(11, 36, 12), (5, 37, 13)], 3),
    capacity!(15, Low, [(5, 109, 87), (1, 110, 88)], 3),
    capacity!(15, Medium, [(5, 65, 41), (5, 66, 42)], 3),
    capacity!(15, High, [(5, 54, 24), (7, 55, 25)], 3),
    capacity!(15, Highest, [(11, 36, 12), (7, 37, 13)], 3),
    capacity!(16, Low, [(5, 122, 98), (1, 123, 99)], 3),
    capacity!(16, Medium, [(7, 73, 45), (3, 74, 46)], 3),
    capacity!(16, High, [(15, 43, 19), (2, 44, 20)], 3),
    capacity!(16, Highest, [(3, 45, 15), (13, 46, 16)], 3),
    capacity!(17, Low, [(1, 135, 107), (5, 136, 108)], 3),
    capacity!(17, Medium, [(10, 74, 46), (1, 75, 47)], 3),
    capacity!(17, High, [(1, 50, 22), (15, 51, 23)], 3),
    capacity!(17, Highest, [(2, 42, 14), (17, 43, 15)], 3),
    capacity!(18, Low, [(5, 150, 120), (1, 151, 121)], 3),
    capacity!(18, Medium, [(9, 69, 43), (4, 70, 44)], 3),
    capacity!(18, High, [(17, 50, 22), (1, 51, 23)], 3),
    capacity!(18, Highest, [(2, 42, 14), (19, 43, 15)], 3),
    capacity!(19, Low, [(3, 141, 113), (4, 142, 114)], 3),
    capacity!(19, Medium, [(3, 70, 44), (11, 71, 45)], 3),
    capacity!(19, High, [(17, 47, 21), (4, 48, 22)], 3),
    capacity!(19, Highest, [(9, 39, 13), (16, 40, 14)], 3),
    capacity!(20, Low, [(3, 135, 107), (5, 136, 108)], 3),
    capacity!(20, Medium, [(3, 67, 41), (13, 68, 42)], 3),
    capacity!(20, High, [(15, 54, 24), (5, 55, 25)], 3),
    capacity!(20, Highest, [(15, 43, 15), (10, 44, 16)], 3),
    capacity!(21, Low, [(4, 144, 116), (4, 145, 117)], 4),
    capacity!(21, Medium, [(17, 68, 42)], 4),
    capacity!(21, High, [(17, 50, 22), (6, 51, 23)], 4),
    capacity!(21, Highest, [(19, 46, 16), (6, 47, 17)], 4),
    capacity!(22, Low, [(2, 139, 111), (7, 140, 112)], 4),
    capacity!(22, Medium, [(17, 74, 46)], 4),
    capacity!(22, High, [(7, 54, 24), (16, 55, 25)], 4),
    capacity!(22, Highest, [(34, 37, 13)], 4),
    capacity!(23, Low, [(4, 151, 121), (5, 152, 122)], 4),
    capacity!(23, Medium, [(4, 75, 47), (14, 76, 48)], 4),
    capacity!(23, High, [(11, 54, 24), (14, 55, 25)], 4),
    capacity!(23, Highest, [(16, 45, 15), (14, 46, 16)], 4),
    capacity!(24, Low, [(6, 147, 117), (4, 148, 118)], 4),
    capacity!(24, Medium, [(6, 73, 45), (14, 74, 46)], 4),
    capacity!(24, High, [(11, 54, 24), (16, 55, 25)], 4),
    capacity!(24, Highest, [(30, 46, 16), (2, 47, 17)], 4),
    capacity!(25, Low, [(8, 132, 106), (4, 133, 107)], 4),
    capacity!(25, Medium, [(8, 75, 47), (13, 76, 48)], 4),
    capacity!(25, High, [(7, 54, 24), (22, 55, 25)], 4),
    capacity!(25, Highest, [(22, 45, 15), (13, 46, 16)], 4),
    capacity!(26, Low, [(10, 142, 114), (2, 143, 115)], 4),
    capacity!(26, Medium, [(19, 74, 46), (4, 75, 47)], 4),
    capacity!(26, High, [(28, 50, 22), (6, 51, 23)], 4),
    capacity!(26, Highest, [(33, 46, 16), (4, 47, 17)], 4),
    capacity!(27, Low, [(8, 152, 122), (4, 153, 123)], 4),
    capacity!(27, Medium, [(22, 73, 45), (3, 74, 46)], 4),
    capacity!(27, High, [(8, 53, 23), (26, 54, 24)], 4),
    capacity!(27, Highest, [(12, 45, 15), (28, 46, 16)], 4),
    capacity!(28, Low, [(3, 147, 117), (10, 148, 118)], 3),
    capacity!(28, Medium, [(3, 73, 45), (23, 74, 46)], 3),
    capacity!(28, High, [(4, 54, 24), (31, 55, 25)], 3),
    capacity!(28, Highest, [(11, 45, 15), (31, 46, 16)], 3),
    capacity!(29, Low, [(7, 146, 116), (7, 147, 117)], 3),
    capacity!(29, Medium, [(21, 73, 45), (7, 74, 46)], 3),
    capacity!(29, High, [(1, 53, 23), (37, 54, 24)], 3),
    capacity!(29, Highest, [(19, 45, 15), (26, 46, 16)], 3),
    capacity!(30, Low, [(5, 145, 115), (10, 146, 116)], 3),
    capacity!(30, Medium, [(19, 75, 47), (10, 76, 48)], 3),
    capacity!(30, High, [(15, 54, 24), (25, 55, 25)], 3),
    capacity!(30, Highest, [(23, 45, 15), (25, 46, 16)], 3),
    capacity!(31, Low, [(13, 145, 115), (3, 146, 116)], 3),
    capacity!(31, Medium, [(2, 74, 46), (29, 75, 47)], 3),
    capacity!(31, High, [(42, 54, 24), (1, 55, 25)], 3),
    capacity!(31, Highest, [(23, 45, 15), (28, 46, 16)], 3),
    capacity!(32, Low, [(17, 145, 115)], 3),
    capacity!(32, Medium, [(10, 74, 46), (23, 75, 47)], 3),
    capacity!(32, High, [(10, 54, 24), (35, 55, 25)], 3),
    capacity!(32, Highest, [(19, 45, 15), (35, 46, 16)], 3),
    capacity!(33, Low, [(17, 145, 115), (1, 146, 116)], 3),
    capacity!(33, Medium, [(14, 74, 46), (21, 75, 47)], 3),
    capacity!(33, High, [(29, 54, 24), (19, 55, 25)], 3),
    capacity!(33, Highest, [(11, 45, 15), (46, 46, 16)], 3),
    capacity!(34, Low, [(13, 145, 115), (6, 146, 116)], 3),
    capacity!(34, Medium, [(14, 74, 46), (23, 75, 47)], 3),
    capacity!(34, High, [(44, 54, 24), (7, 55, 25)], 3),
    capacity!(34, Highest, [(59, 46, 16), (1, 47, 17)], 3),
    capacity!(35, Low, [(12, 151, 121), (7, 152, 122)], 0),
    capacity!(35, Medium, [(12, 75, 47), (26, 76, 48)], 0),
    capacity!(35, High, [(39, 54, 24), (14, 55, 25)], 0),
    capacity!(35, Highest, [(22, 45, 15), (41, 46, 16)], 0),
    capacity!(36, Low, [(6, 151, 121), (14, 152, 122)], 0),
    capacity!(36, Medium, [(6, 75, 47), (34, 76, 48)], 0),
    capacity!(36, High, [(46, 54, 24), (10, 55, 25)], 0),
    capacity!(36, Highest, [(2, 45, 15), (64, 46, 16)], 0),
    capacity!(37, Low, [(17, 152, 122), (4, 153, 123)], 0),
    capacity!(37, Medium, [(29, 74, 46), (14, 75, 47)], 0),
    capacity!(37, High, [(49, 54, 24), (10, 55, 25)], 0),
    capacity!(37, Highest, [(24, 45, 15), (46, 46, 16)], 0),
    capacity!(38, Low, [(4, 152, 122), (18, 153, 123)], 0),
    capacity!(38, Medium, [(13, 74, 46), (32, 75, 47)], 0),
    capacity!(38, High, [(48, 54, 24), (14, 55, 25)], 0),
    capacity!(38, Highest, [(42, 45, 15), (32, 46, 16)], 0),
    capacity!(39, Low, [(20, 147, 117), (4, 148, 118)], 0),
    capacity!(39, Medium, [(40, 75, 47), (7, 76, 48)], 0),
    capacity!(39, High, [(43, 54, 24), (22, 55, 25)], 0),
    capacity!(39, Highest, [(10, 45, 15), (67, 46, 16)], 0),
    capacity!(40, Low, [(19, 148, 118), (6, 149, 119)], 0),
    capacity!(40, Medium, [(18, 75, 47), (31, 76, 48)], 0),
    capacity!(40, High, [(34, 54, 24), (34, 55, 25)], 0),
    capacity!(40, Highest, [(20, 45, 15), (61, 46, 16)], 0),
];
