//! Splitting content into mode segments and serialising them.
//!
//! Content is first classified byte by byte into numeric, alphanumeric and
//! byte runs. The runs are then coalesced wherever a single wider segment
//! costs fewer bits than the mode switch it replaces, and finally compared
//! against encoding everything as one segment.

use tracing::trace;

use crate::bits::BitBuffer;
use crate::error::{QrError, Result};
use crate::version::Version;

static ALPHANUMERIC_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Data mode of a segment, ordered from most to least compact.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Mode {
    /// Decimal digits, 3 per 10 bits.
    Numeric,
    /// `0-9`, `A-Z`, space and `$%*+-./:`, 2 per 11 bits.
    Alphanumeric,
    /// Arbitrary bytes, 8 bits each.
    Byte,
}

impl Mode {
    /// Returns the narrowest mode able to represent `b`.
    pub fn classify(b: u8) -> Mode {
        if b.is_ascii_digit() {
            Mode::Numeric
        } else if ALPHANUMERIC_CHARSET.contains(&b) {
            Mode::Alphanumeric
        } else {
            Mode::Byte
        }
    }

    fn mode_bits(self) -> u32 {
        use Mode::*;
        match self {
            Numeric => 0x1,
            Alphanumeric => 0x2,
            Byte => 0x4,
        }
    }
}

/// A run of content bytes encoded in a single mode.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Segment<'a> {
    mode: Mode,
    data: &'a [u8],
}

impl<'a> Segment<'a> {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn num_chars(&self) -> usize {
        self.data.len()
    }
}

/// Splits `data` into maximal runs of bytes sharing the same narrowest mode.
pub fn classify(data: &[u8]) -> Vec<Segment<'_>> {
    let mut result = Vec::new();
    let mut start = 0;
    for i in 1..=data.len() {
        if i == data.len() || Mode::classify(data[i]) != Mode::classify(data[start]) {
            result.push(Segment {
                mode: Mode::classify(data[start]),
                data: &data[start..i],
            });
            start = i;
        }
    }
    result
}

/// The data encoding rules of one version bracket.
///
/// Character count fields grow with the symbol size, so the cost of a
/// segment, and therefore the best segmentation, depends on which bracket the
/// final version falls in.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum DataEncoder {
    /// Versions 1 to 9.
    Versions1To9,
    /// Versions 10 to 26.
    Versions10To26,
    /// Versions 27 to 40.
    Versions27To40,
}

/// Result of encoding content with one [`DataEncoder`].
#[derive(Clone, Debug)]
pub struct Encoded<'a> {
    pub encoder: DataEncoder,
    pub segments: Vec<Segment<'a>>,
    pub bits: BitBuffer,
}

impl DataEncoder {
    /// All brackets, narrowest first.
    pub const ALL: [DataEncoder; 3] = [
        DataEncoder::Versions1To9,
        DataEncoder::Versions10To26,
        DataEncoder::Versions27To40,
    ];

    /// Returns the bracket containing `version`.
    pub fn for_version(version: Version) -> Self {
        match version.value() {
            1..=9 => DataEncoder::Versions1To9,
            10..=26 => DataEncoder::Versions10To26,
            _ => DataEncoder::Versions27To40,
        }
    }

    pub fn min_version(self) -> Version {
        use DataEncoder::*;
        match self {
            Versions1To9 => Version::new(1),
            Versions10To26 => Version::new(10),
            Versions27To40 => Version::new(27),
        }
    }

    pub fn max_version(self) -> Version {
        use DataEncoder::*;
        match self {
            Versions1To9 => Version::new(9),
            Versions10To26 => Version::new(26),
            Versions27To40 => Version::new(40),
        }
    }

    pub fn contains(self, version: Version) -> bool {
        (self.min_version()..=self.max_version()).contains(&version)
    }

    /// Width of the character count field for `mode`.
    pub fn char_count_bits(self, mode: Mode) -> u8 {
        use Mode::*;
        (match mode {
            Numeric => [10, 12, 14],
            Alphanumeric => [9, 11, 13],
            Byte => [8, 16, 16],
        })[self as usize]
    }

    /// Returns the number of bits a segment of `numchars` characters occupies,
    /// header included, or `None` if the count does not fit its field.
    pub fn encoded_length(self, mode: Mode, numchars: usize) -> Option<usize> {
        let ccbits = self.char_count_bits(mode);
        if numchars >= 1usize << ccbits {
            return None;
        }
        let payload = match mode {
            Mode::Numeric => {
                10 * (numchars / 3) + if numchars % 3 != 0 { 1 + 3 * (numchars % 3) } else { 0 }
            }
            Mode::Alphanumeric => 11 * (numchars / 2) + 6 * (numchars % 2),
            Mode::Byte => 8 * numchars,
        };
        Some(4 + usize::from(ccbits) + payload)
    }

    /// Segments `data` and serialises the segments into a bitstream.
    ///
    /// Fails when a segment is too long for this bracket's count fields.
    pub fn encode(self, data: &[u8]) -> Result<Encoded<'_>> {
        let segments = self.segment(data)?;
        let mut bits = BitBuffer::new();
        for seg in &segments {
            self.append_segment(seg, &mut bits);
        }
        Ok(Encoded {
            encoder: self,
            segments,
            bits,
        })
    }

    /// Returns the cheapest segmentation of `data` this encoder finds.
    pub fn segment(self, data: &[u8]) -> Result<Vec<Segment<'_>>> {
        let actual = classify(data);
        let Some(highest) = actual.iter().map(Segment::mode).max() else {
            return Ok(Vec::new());
        };
        let too_long = || QrError::ContentTooLong { len: data.len() };

        let optimised = self.optimise(data, &actual);
        let mut optimisedlen: usize = 0;
        for seg in &optimised {
            optimisedlen += self.encoded_length(seg.mode, seg.num_chars()).ok_or_else(too_long)?;
        }
        // A single segment whose count overflows its field is no option.
        let singlelen = self.encoded_length(highest, data.len());
        trace!(
            encoder = ?self,
            classified = actual.len(),
            optimised = optimised.len(),
            optimisedlen,
            singlelen,
            "segmented content"
        );
        match singlelen {
            Some(singlelen) if singlelen <= optimisedlen => Ok(vec![Segment { mode: highest, data }]),
            _ => Ok(optimised),
        }
    }

    /// Coalesces each segment with the following ones of an equal or narrower
    /// mode while that is strictly cheaper than keeping them apart. Runs are
    /// never merged past what the count field can hold.
    fn optimise<'a>(self, data: &'a [u8], actual: &[Segment<'a>]) -> Vec<Segment<'a>> {
        let mut result = Vec::new();
        let mut offset = 0;
        let mut i = 0;
        while i < actual.len() {
            let mode = actual[i].mode;
            let mut numchars = actual[i].num_chars();
            let mut j = i + 1;
            while j < actual.len() {
                let next = &actual[j];
                if next.mode > mode {
                    break;
                }
                let lengths = (
                    self.encoded_length(mode, numchars + next.num_chars()),
                    self.encoded_length(mode, numchars),
                    self.encoded_length(next.mode, next.num_chars()),
                );
                let (Some(coalesced), Some(separate1), Some(separate2)) = lengths else {
                    break;
                };
                if coalesced >= separate1 + separate2 {
                    break;
                }
                numchars += next.num_chars();
                j += 1;
            }
            result.push(Segment {
                mode,
                data: &data[offset..offset + numchars],
            });
            offset += numchars;
            i = j;
        }
        debug_assert_eq!(offset, data.len());
        result
    }

    /// Appends the mode indicator, character count and payload of `seg`.
    pub fn append_segment(self, seg: &Segment<'_>, bb: &mut BitBuffer) {
        bb.append_bits(seg.mode.mode_bits(), 4);
        let numchars = u32::try_from(seg.num_chars()).unwrap_or(u32::MAX);
        bb.append_bits(numchars, self.char_count_bits(seg.mode));
        match seg.mode {
            Mode::Numeric => {
                for chunk in seg.data.chunks(3) {
                    let value = chunk.iter().fold(0u32, |acc, &b| {
                        debug_assert!(b.is_ascii_digit());
                        acc * 10 + u32::from(b - b'0')
                    });
                    bb.append_bits(value, (chunk.len() * 3 + 1) as u8);
                }
            }
            Mode::Alphanumeric => {
                for chunk in seg.data.chunks(2) {
                    let value = chunk.iter().fold(0u32, |acc, &b| acc * 45 + alphanumeric_value(b));
                    bb.append_bits(value, if chunk.len() == 2 { 11 } else { 6 });
                }
            }
            Mode::Byte => bb.append_bytes(seg.data),
        }
    }
}

fn alphanumeric_value(b: u8) -> u32 {
    let i = ALPHANUMERIC_CHARSET
        .iter()
        .position(|&c| c == b)
        .expect("Byte is not encodable in alphanumeric mode");
    i as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use Mode::*;

    fn shape(segments: &[Segment<'_>]) -> Vec<(Mode, usize)> {
        segments.iter().map(|s| (s.mode(), s.num_chars())).collect()
    }

    fn content(runs: &[(Mode, usize)]) -> Vec<u8> {
        let mut result = Vec::new();
        for &(mode, n) in runs {
            let c = match mode {
                Numeric => b'1',
                Alphanumeric => b'A',
                Byte => b'#',
            };
            result.extend(std::iter::repeat(c).take(n));
        }
        result
    }

    #[test]
    fn test_classify_mode() {
        assert_eq!(Mode::classify(b'7'), Numeric);
        assert_eq!(Mode::classify(b'Q'), Alphanumeric);
        assert_eq!(Mode::classify(b':'), Alphanumeric);
        assert_eq!(Mode::classify(b'q'), Byte);
        assert_eq!(Mode::classify(0xf0), Byte);
    }

    #[test]
    fn test_classify_runs() {
        assert_eq!(shape(&classify(b"0")), vec![(Numeric, 1)]);
        let data = [0x30, 0x41, 0x42, 0x43, 0x20, 0x00, 0xf0, 0xf1, 0xf2, 0x31];
        let segments = classify(&data);
        assert_eq!(
            shape(&segments),
            vec![(Numeric, 1), (Alphanumeric, 4), (Byte, 4), (Numeric, 1)]
        );
        assert_eq!(segments[2].data(), &[0x00, 0xf0, 0xf1, 0xf2]);
        assert!(classify(b"").is_empty());
    }

    #[test]
    fn test_char_count_bits() {
        assert_eq!(DataEncoder::Versions1To9.char_count_bits(Numeric), 10);
        assert_eq!(DataEncoder::Versions10To26.char_count_bits(Alphanumeric), 11);
        assert_eq!(DataEncoder::Versions27To40.char_count_bits(Byte), 16);
        assert_eq!(DataEncoder::Versions1To9.char_count_bits(Byte), 8);
    }

    #[test]
    fn test_encoded_length() {
        let enc = DataEncoder::Versions1To9;
        assert_eq!(enc.encoded_length(Alphanumeric, 1), Some(19));
        assert_eq!(enc.encoded_length(Numeric, 1), Some(18));
        assert_eq!(enc.encoded_length(Alphanumeric, 5), Some(41));
        assert_eq!(enc.encoded_length(Numeric, 8), Some(41));
        assert_eq!(enc.encoded_length(Byte, 255), Some(4 + 8 + 255 * 8));
        assert_eq!(enc.encoded_length(Byte, 256), None);
        assert_eq!(DataEncoder::Versions10To26.encoded_length(Byte, 256), Some(4 + 16 + 256 * 8));
    }

    #[test]
    fn test_single_mode_encodings() {
        let cases: [(DataEncoder, Mode, &[u8], &str); 5] = [
            (
                DataEncoder::Versions1To9,
                Numeric,
                b"01234567",
                "0001 0000001000 0000001100 0101011001 1000011",
            ),
            (
                DataEncoder::Versions1To9,
                Alphanumeric,
                b"AC-42",
                "0010 000000101 00111001110 11100111001 000010",
            ),
            (
                DataEncoder::Versions1To9,
                Byte,
                b"123",
                "0100 00000011 00110001 00110010 00110011",
            ),
            (
                DataEncoder::Versions10To26,
                Byte,
                b"123",
                "0100 00000000 00000011 00110001 00110010 00110011",
            ),
            (
                DataEncoder::Versions27To40,
                Byte,
                b"123",
                "0100 00000000 00000011 00110001 00110010 00110011",
            ),
        ];
        for (encoder, mode, data, expected) in cases {
            let mut bb = BitBuffer::new();
            encoder.append_segment(&Segment { mode, data }, &mut bb);
            assert_eq!(bb, BitBuffer::from_base2(expected), "{:?}", std::str::from_utf8(data));
            assert_eq!(Some(bb.len()), encoder.encoded_length(mode, data.len()));
        }
    }

    #[test]
    fn test_optimise_segments() {
        let cases: Vec<(DataEncoder, Vec<(Mode, usize)>, Vec<(Mode, usize)>)> = vec![
            // Coalescing multiple segments: 93 bits separately, 41 bits merged.
            (
                DataEncoder::Versions1To9,
                vec![(Alphanumeric, 1), (Numeric, 1), (Alphanumeric, 1), (Numeric, 1), (Alphanumeric, 1)],
                vec![(Alphanumeric, 5)],
            ),
            // Coalescing not necessary.
            (
                DataEncoder::Versions1To9,
                vec![(Alphanumeric, 1), (Numeric, 20)],
                vec![(Alphanumeric, 1), (Numeric, 20)],
            ),
            // Switch to the more general mode.
            (
                DataEncoder::Versions1To9,
                vec![(Alphanumeric, 100), (Byte, 1), (Numeric, 1)],
                vec![(Alphanumeric, 100), (Byte, 2)],
            ),
            // Encoding everything as bytes is cheapest.
            (
                DataEncoder::Versions1To9,
                vec![(Alphanumeric, 1), (Byte, 1), (Numeric, 1)],
                vec![(Byte, 3)],
            ),
            // https://www.google.com/123456789012345678901234567890
            (
                DataEncoder::Versions1To9,
                vec![
                    (Byte, 5),
                    (Alphanumeric, 3),
                    (Byte, 3),
                    (Alphanumeric, 1),
                    (Byte, 6),
                    (Alphanumeric, 5),
                    (Numeric, 30),
                ],
                vec![(Byte, 23), (Numeric, 30)],
            ),
            // https://www.google.com/123: small segments cost too much metadata.
            (
                DataEncoder::Versions1To9,
                vec![
                    (Byte, 5),
                    (Alphanumeric, 3),
                    (Byte, 3),
                    (Alphanumeric, 1),
                    (Byte, 6),
                    (Alphanumeric, 5),
                    (Numeric, 3),
                ],
                vec![(Byte, 26)],
            ),
            // HTTPS://WWW.GOOGLE.COM/123
            (
                DataEncoder::Versions1To9,
                vec![(Alphanumeric, 23), (Numeric, 3)],
                vec![(Alphanumeric, 26)],
            ),
            (
                DataEncoder::Versions27To40,
                vec![
                    (Byte, 1),
                    (Numeric, 1),
                    (Byte, 1),
                    (Numeric, 1),
                    (Byte, 1),
                    (Numeric, 1),
                    (Byte, 1),
                    (Numeric, 1),
                ],
                vec![(Byte, 8)],
            ),
            // HTTPS://ABC.DE/Q/393AABB6998877XYZ0518AUQCRVJN25
            (
                DataEncoder::Versions1To9,
                vec![
                    (Alphanumeric, 17),
                    (Numeric, 3),
                    (Alphanumeric, 4),
                    (Numeric, 7),
                    (Alphanumeric, 3),
                    (Numeric, 4),
                    (Alphanumeric, 8),
                    (Numeric, 2),
                ],
                vec![(Alphanumeric, 48)],
            ),
            // HTTPS://ABC.DE/Q/393AABB699E877XYZ0518AUQCRVJN25
            (
                DataEncoder::Versions1To9,
                vec![
                    (Alphanumeric, 17),
                    (Numeric, 3),
                    (Alphanumeric, 4),
                    (Numeric, 3),
                    (Alphanumeric, 1),
                    (Numeric, 3),
                    (Alphanumeric, 3),
                    (Numeric, 4),
                    (Alphanumeric, 8),
                    (Numeric, 2),
                ],
                vec![(Alphanumeric, 48)],
            ),
            (DataEncoder::Versions1To9, vec![(Numeric, 10)], vec![(Numeric, 10)]),
        ];
        for (encoder, runs, expected) in cases {
            let data = content(&runs);
            let segments = encoder.segment(&data).unwrap();
            assert_eq!(shape(&segments), expected, "runs {:?}", runs);
            let rejoined: Vec<u8> = segments.iter().flat_map(|s| s.data().iter().copied()).collect();
            assert_eq!(rejoined, data);
        }
    }

    #[test]
    fn test_adjacent_segments_differ_in_mode() {
        let data = b"ABC123def456GHI789jkl0000000000000000000000000000xyz";
        for encoder in DataEncoder::ALL {
            let segments = encoder.segment(data).unwrap();
            for pair in segments.windows(2) {
                assert_ne!(pair[0].mode(), pair[1].mode());
            }
        }
    }

    #[test]
    fn test_encode_rejects_overlong_segment() {
        let data = vec![b'#'; 256];
        assert_eq!(
            DataEncoder::Versions1To9.encode(&data).unwrap_err(),
            QrError::ContentTooLong { len: 256 }
        );
        let encoded = DataEncoder::Versions10To26.encode(&data).unwrap();
        assert_eq!(encoded.bits.len(), 4 + 16 + 256 * 8);
    }

    #[test]
    fn test_overlong_options_are_skipped() {
        // As one byte segment the count would overflow its 8 bit field.
        let data = content(&[(Numeric, 300), (Byte, 1)]);
        let segments = DataEncoder::Versions1To9.segment(&data).unwrap();
        assert_eq!(shape(&segments), vec![(Numeric, 300), (Byte, 1)]);

        // The digit joins the first byte run, but the second run would push
        // the count past 255 and starts a new segment.
        let data = content(&[(Byte, 200), (Numeric, 1), (Byte, 100)]);
        let segments = DataEncoder::Versions1To9.segment(&data).unwrap();
        assert_eq!(shape(&segments), vec![(Byte, 201), (Byte, 100)]);
        let encoded = DataEncoder::Versions1To9.encode(&data).unwrap();
        assert_eq!(encoded.bits.len(), (4 + 8 + 201 * 8) + (4 + 8 + 100 * 8));
    }

    #[test]
    fn test_encode_empty() {
        let encoded = DataEncoder::Versions1To9.encode(b"").unwrap();
        assert!(encoded.segments.is_empty());
        assert!(encoded.bits.is_empty());
    }

    #[test]
    fn test_brackets() {
        assert_eq!(DataEncoder::for_version(Version::new(9)), DataEncoder::Versions1To9);
        assert_eq!(DataEncoder::for_version(Version::new(10)), DataEncoder::Versions10To26);
        assert_eq!(DataEncoder::for_version(Version::new(27)), DataEncoder::Versions27To40);
        for encoder in DataEncoder::ALL {
            assert!(encoder.contains(encoder.min_version()));
            assert!(encoder.contains(encoder.max_version()));
            assert_eq!(DataEncoder::for_version(encoder.max_version()), encoder);
        }
    }
}
