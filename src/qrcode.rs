//! QR code construction: version selection, padding, error correction and
//! mask selection.

use std::sync::OnceLock;

use tracing::{debug, trace};

use crate::bits::BitBuffer;
use crate::error::{QrError, Result};
use crate::layout::{self, Mask};
use crate::reed_solomon::ReedSolomon;
use crate::segment::DataEncoder;
use crate::symbol::Symbol;
use crate::version::{Capacity, RecoveryLevel, Version, QUIET_ZONE_SIZE};

/// Options controlling how content is encoded.
///
/// ```
/// use qrmatrix::{EncodeOptions, Mask, RecoveryLevel};
///
/// let options = EncodeOptions::new()
///     .level(RecoveryLevel::High)
///     .quiet_zone(false)
///     .mask(Some(Mask::new(3)));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EncodeOptions {
    level: RecoveryLevel,
    quiet_zone: bool,
    mask: Option<Mask>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            level: RecoveryLevel::Medium,
            quiet_zone: true,
            mask: None,
        }
    }
}

impl EncodeOptions {
    /// Medium recovery, a 4 module quiet zone and automatic mask selection.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: RecoveryLevel) -> Self {
        self.level = level;
        self
    }

    /// Whether the returned matrix is surrounded by the light quiet zone.
    pub fn quiet_zone(mut self, enabled: bool) -> Self {
        self.quiet_zone = enabled;
        self
    }

    /// Uses `mask` instead of the lowest scoring one when `Some`.
    pub fn mask(mut self, mask: Option<Mask>) -> Self {
        self.mask = mask;
        self
    }
}

/// The finished module grid of a QR code.
///
/// Coordinates include the quiet zone, if any: (0, 0) is the top left corner
/// of the whole bitmap. `true` is a dark module.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Matrix {
    modules: Vec<bool>,
    size: usize,
    symbol_size: usize,
    quiet_zone: usize,
}

impl Matrix {
    pub(crate) fn from_symbol(symbol: Symbol) -> Self {
        let size = symbol.full_size();
        let symbol_size = symbol.symbol_size();
        let quiet_zone = symbol.quiet_zone();
        Self {
            modules: symbol.into_modules(),
            size,
            symbol_size,
            quiet_zone,
        }
    }

    /// Width and height in modules, quiet zone included.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Width and height of the symbol alone, between 21 and 177.
    pub fn symbol_size(&self) -> usize {
        self.symbol_size
    }

    /// Width of the quiet zone on each side, 0 or 4.
    pub fn quiet_zone(&self) -> usize {
        self.quiet_zone
    }

    /// Returns the color of the module at the given coordinates, where light
    /// is `false` and dark is `true`. Coordinates outside the matrix are
    /// light.
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size && self.modules[y * self.size + x]
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.modules.chunks(self.size)
    }

    /// Returns a copy of the modules indexed as `bitmap[y][x]`.
    pub fn bitmap(&self) -> Vec<Vec<bool>> {
        self.rows().map(<[bool]>::to_vec).collect()
    }
}

/// Result of placing and masking the codewords.
#[derive(Debug)]
struct Built {
    mask: Mask,
    penalty: i32,
    matrix: Matrix,
}

/// A data block with its error correction codewords appended.
struct Block {
    bits: BitBuffer,
    ecstart: usize,
}

/// A QR code for some content.
///
/// Construction picks the encoder bracket and the smallest version that holds
/// the content. Error correction, module placement and mask selection run
/// once, on first access to the mask, penalty or matrix.
///
/// ```
/// use qrmatrix::{QrCode, RecoveryLevel};
///
/// let qr = QrCode::new("http://example.org", RecoveryLevel::Low).unwrap();
/// assert_eq!(qr.version().value(), 2);
/// assert_eq!(qr.matrix().size(), 33);
/// ```
#[derive(Debug)]
pub struct QrCode {
    capacity: &'static Capacity,
    encoder: DataEncoder,
    data: BitBuffer,
    quiet_zone: usize,
    forced_mask: Option<Mask>,
    built: OnceLock<Built>,
}

impl QrCode {
    /// Encodes `content` at `level` with the default options.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::ContentTooLong`] if no version holds the content.
    pub fn new(content: impl AsRef<[u8]>, level: RecoveryLevel) -> Result<Self> {
        Self::with_options(content, &EncodeOptions::new().level(level))
    }

    /// Encodes `content` as described by `options`.
    ///
    /// Each encoder bracket is tried from the smallest; the first one that
    /// segments the content and has a version at the requested level with
    /// enough room wins.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::ContentTooLong`] if no version holds the content.
    pub fn with_options(content: impl AsRef<[u8]>, options: &EncodeOptions) -> Result<Self> {
        let content = content.as_ref();
        for encoder in DataEncoder::ALL {
            let encoded = match encoder.encode(content) {
                Ok(encoded) => encoded,
                Err(err) => {
                    trace!(encoder = ?encoder, %err, "encoder rejected content");
                    continue;
                }
            };
            let numbits = encoded.bits.len();
            let Some(capacity) = Capacity::choose(options.level, encoder, numbits) else {
                trace!(encoder = ?encoder, numbits, "no version in bracket holds content");
                continue;
            };
            debug!(
                encoder = ?encoder,
                version = capacity.version().value(),
                level = ?options.level,
                segments = encoded.segments.len(),
                numbits,
                "chose version"
            );
            return Ok(Self {
                capacity,
                encoder,
                data: encoded.bits,
                quiet_zone: if options.quiet_zone { QUIET_ZONE_SIZE } else { 0 },
                forced_mask: options.mask,
                built: OnceLock::new(),
            });
        }
        Err(QrError::ContentTooLong { len: content.len() })
    }

    pub fn version(&self) -> Version {
        self.capacity.version()
    }

    pub fn level(&self) -> RecoveryLevel {
        self.capacity.level()
    }

    /// The version bracket whose encoding rules produced [`Self::data_bits`].
    pub fn encoder(&self) -> DataEncoder {
        self.encoder
    }

    /// The serialised segments, before terminator and padding.
    pub fn data_bits(&self) -> &BitBuffer {
        &self.data
    }

    /// The applied mask: the forced one, or the lowest scoring pattern.
    pub fn mask(&self) -> Mask {
        self.build().mask
    }

    /// Penalty score of the symbol under [`Self::mask`].
    pub fn penalty(&self) -> i32 {
        self.build().penalty
    }

    pub fn matrix(&self) -> &Matrix {
        &self.build().matrix
    }

    pub fn into_matrix(mut self) -> Matrix {
        match self.built.take() {
            Some(built) => built.matrix,
            None => self.place().matrix,
        }
    }

    /// Shorthand for `self.matrix().bitmap()`.
    pub fn bitmap(&self) -> Vec<Vec<bool>> {
        self.matrix().bitmap()
    }

    fn build(&self) -> &Built {
        self.built.get_or_init(|| self.place())
    }

    /// Draws the symbol under every candidate mask and keeps the first one
    /// with the lowest penalty.
    fn place(&self) -> Built {
        let codewords = self.codewords();
        let candidates: &[Mask] = match &self.forced_mask {
            Some(mask) => core::slice::from_ref(mask),
            None => &Mask::ALL,
        };
        let (mask, penalty, symbol) = candidates
            .iter()
            .map(|&mask| {
                let symbol = layout::build_symbol(self.capacity, mask, &codewords, self.quiet_zone);
                let penalty = symbol.penalty_score();
                trace!(mask = mask.value(), penalty, "scored mask");
                (mask, penalty, symbol)
            })
            .min_by_key(|&(_, penalty, _)| penalty)
            .expect("at least one mask candidate");
        debug!(
            version = self.version().value(),
            mask = mask.value(),
            penalty,
            "chose mask"
        );
        Built {
            mask,
            penalty,
            matrix: Matrix::from_symbol(symbol),
        }
    }

    /// Returns the data bits with terminator and padding appended, exactly
    /// filling the data capacity of the chosen version.
    fn padded_data(&self) -> BitBuffer {
        let capacity = self.capacity;
        let numdatabits = capacity.num_data_bits();
        let mut data = self.data.clone();
        data.append_repeated(capacity.num_terminator_bits(data.len()), false);
        if data.len() < numdatabits {
            data.append_repeated(capacity.num_bits_to_pad_to_codeword(data.len()), false);
            for &pad in [0xec, 0x11].iter().cycle() {
                if numdatabits - data.len() < 8 {
                    break;
                }
                data.append_bits(pad, 8);
            }
        }
        assert_eq!(data.len(), numdatabits, "Padding did not fill the data capacity");
        data
    }

    /// Splits the padded data into blocks, appends error correction to each
    /// block and interleaves them, followed by the remainder bits.
    fn codewords(&self) -> BitBuffer {
        let capacity = self.capacity;
        let data = self.padded_data();

        let mut blocks: Vec<Block> = Vec::with_capacity(capacity.num_blocks());
        let mut start = 0;
        for group in capacity.blocks() {
            let rs = ReedSolomon::new(group.num_ec_codewords());
            for _ in 0..group.num_blocks {
                let end = start + group.num_data_codewords * 8;
                blocks.push(Block {
                    bits: rs.encode(&data.slice(start, end)),
                    ecstart: end - start,
                });
                start = end;
            }
        }

        let mut result = BitBuffer::with_capacity(capacity.num_codewords() * 8 + capacity.remainder_bits());
        let maxdata = blocks.iter().map(|b| b.ecstart).max().unwrap_or(0);
        for i in (0..maxdata).step_by(8) {
            for block in blocks.iter().filter(|b| i < b.ecstart) {
                result.append(&block.bits.slice(i, i + 8));
            }
        }
        let maxec = blocks.iter().map(|b| b.bits.len() - b.ecstart).max().unwrap_or(0);
        for i in (0..maxec).step_by(8) {
            for block in &blocks {
                let offset = block.ecstart + i;
                if offset < block.bits.len() {
                    result.append(&block.bits.slice(offset, offset + 8));
                }
            }
        }
        result.append_repeated(capacity.remainder_bits(), false);
        result
    }
}
