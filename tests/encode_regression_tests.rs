//! Integration tests for whole-symbol encoding
//!
//! These tests pin version selection at the capacity limits, the mask chosen
//! for the ISO/IEC 18004 Annex I example, and a complete reference bitmap, so
//! that changes to segmentation, error correction, placement or penalty
//! scoring show up as failures.

use qrmatrix::segment::Mode;
use qrmatrix::version::Capacity;
use qrmatrix::{encode, DataEncoder, EncodeOptions, Mask, QrCode, QrError, RecoveryLevel, Version};

/// `http://example.org` at level L, quiet zone included. `#` is dark.
static EXAMPLE_ORG: [&str; 33] = [
    ".................................",
    ".................................",
    ".................................",
    ".................................",
    "....#######...#...##..#######....",
    "....#.....#..#....##..#.....#....",
    "....#.###.#.#..#...##.#.###.#....",
    "....#.###.#..#..##.##.#.###.#....",
    "....#.###.#..#..####..#.###.#....",
    "....#.....#...###.###.#.....#....",
    "....#######.#.#.#.#.#.#######....",
    "............#..#....#............",
    "....###.#####...#..####...#......",
    ".......##..###.###..###.....#....",
    "....#..##.#.#.###.#.#.#.#.###....",
    ".....##......##.###.#..##..#.....",
    "....####..###.##..######.#.##....",
    "........#..#####..#..##..#..#....",
    "....#..#####.##..#...#.##.###....",
    ".....#.##..##.##...##....#.#.....",
    "....#.##.###....#...######.......",
    "............######.##...#####....",
    "....#######.##.##.###.#.#..##....",
    "....#.....#.#...###.#...##.##....",
    "....#.###.#.#.##..#.#####...#....",
    "....#.###.#..###..##...##.#......",
    "....#.###.#.##...#.#.#.###..#....",
    "....#.....#.#.##...###..##.#.....",
    "....#######.#...#..##.##...##....",
    ".................................",
    ".................................",
    ".................................",
    ".................................",
];

#[test]
fn test_reference_bitmap() {
    let qr = QrCode::new("http://example.org", RecoveryLevel::Low).expect("encodable");
    assert_eq!(qr.version(), Version::new(2));
    let bitmap = qr.bitmap();
    assert_eq!(bitmap.len(), 33);
    for (y, (row, expected)) in bitmap.iter().zip(EXAMPLE_ORG.iter()).enumerate() {
        let got: String = row.iter().map(|&dark| if dark { '#' } else { '.' }).collect();
        assert_eq!(&got, expected, "row {}", y);
    }
}

#[test]
fn test_annex_i_example_mask() {
    let qr = QrCode::new("01234567", RecoveryLevel::Medium).expect("encodable");
    assert_eq!(qr.version(), Version::new(1));
    assert_eq!(qr.mask(), Mask::new(2));
}

#[test]
fn test_version_capacity_limits() {
    // (version, level, digits, alphanumerics, bytes) that just fit.
    let cases = [
        (1, RecoveryLevel::Low, 41, 25, 17),
        (2, RecoveryLevel::Low, 77, 47, 32),
        (2, RecoveryLevel::Highest, 34, 20, 14),
        (40, RecoveryLevel::Low, 7089, 4296, 2953),
        (40, RecoveryLevel::Highest, 3057, 1852, 1273),
    ];
    for (version, level, numeric, alphanumeric, byte) in cases {
        for content in ["1".repeat(numeric), "A".repeat(alphanumeric), "#".repeat(byte)] {
            let qr = QrCode::new(&content, level).expect("encodable");
            assert_eq!(qr.version().value(), version, "{} chars at {:?}", content.len(), level);
        }
    }
}

#[test]
fn test_one_more_character_needs_next_version() {
    let cases = [
        (RecoveryLevel::Low, 41, 25, 17),
        (RecoveryLevel::Low, 77, 47, 32),
        (RecoveryLevel::Highest, 34, 20, 14),
    ];
    for (level, numeric, alphanumeric, byte) in cases {
        for content in ["1".repeat(numeric), "A".repeat(alphanumeric), "#".repeat(byte)] {
            let fits = QrCode::new(&content, level).expect("encodable").version();
            let longer = format!("{}{}", content, &content[..1]);
            let next = QrCode::new(&longer, level).expect("encodable").version();
            assert_eq!(next.value(), fits.value() + 1, "{} chars at {:?}", longer.len(), level);
        }
    }
}

#[test]
fn test_maximum_capacity() {
    let cases = [("0", 7089), ("A", 4296), ("#", 2953), ("#1", 1476)];
    for (unit, count) in cases {
        let content = unit.repeat(count);
        let qr = QrCode::new(&content, RecoveryLevel::Low).expect("encodable");
        assert_eq!(qr.version(), Version::MAX);
        assert_eq!(qr.encoder(), DataEncoder::Versions27To40);

        let content = unit.repeat(count + 1);
        assert_eq!(
            QrCode::new(&content, RecoveryLevel::Low).unwrap_err(),
            QrError::ContentTooLong { len: content.len() }
        );
    }
}

#[test]
fn test_error_message() {
    let err = encode("9".repeat(7090), RecoveryLevel::Low).unwrap_err();
    assert_eq!(
        err.to_string(),
        "content too long to encode: 7090 bytes do not fit any supported version"
    );
}

#[test]
fn test_encoding_is_deterministic() {
    let content = "Mixed CONTENT 0123456789 with bytes \u{e9}";
    for level in [RecoveryLevel::Low, RecoveryLevel::Medium, RecoveryLevel::High, RecoveryLevel::Highest] {
        let first = encode(content, level).expect("encodable");
        let second = encode(content.as_bytes(), level).expect("encodable");
        assert_eq!(first, second);
    }
}

#[test]
fn test_higher_levels_never_shrink() {
    let content = "https://www.rust-lang.org/learn/get-started";
    let mut previous = 0;
    for level in [RecoveryLevel::Low, RecoveryLevel::Medium, RecoveryLevel::High, RecoveryLevel::Highest] {
        let qr = QrCode::new(content, level).expect("encodable");
        assert_eq!(qr.level(), level);
        assert!(qr.version().value() >= previous);
        previous = qr.version().value();
    }
}

#[test]
fn test_quiet_zone_is_light() {
    let matrix = encode("quiet zone", RecoveryLevel::Medium).expect("encodable");
    let size = matrix.size();
    assert_eq!(size, matrix.symbol_size() + 8);
    assert_eq!(matrix.quiet_zone(), 4);
    for i in 0..size {
        for border in [0, 1, 2, 3, size - 4, size - 3, size - 2, size - 1] {
            assert!(!matrix.get(i, border));
            assert!(!matrix.get(border, i));
        }
    }
}

#[test]
fn test_without_quiet_zone_matches_inner_symbol() {
    let content = "http://example.org";
    let framed = QrCode::new(content, RecoveryLevel::Low).expect("encodable");
    let options = EncodeOptions::new().level(RecoveryLevel::Low).quiet_zone(false);
    let bare = QrCode::with_options(content, &options).expect("encodable");
    assert_eq!(bare.mask(), framed.mask());
    assert_eq!(bare.penalty(), framed.penalty());
    let bare = bare.matrix();
    assert_eq!(bare.size(), 25);
    for y in 0..25 {
        for x in 0..25 {
            assert_eq!(bare.get(x, y), framed.matrix().get(x + 4, y + 4), "({}, {})", x, y);
        }
    }
}

#[test]
fn test_every_forced_mask_builds() {
    let qr = QrCode::new("mask search", RecoveryLevel::High).expect("encodable");
    let mut best = i32::MAX;
    for value in 0..8 {
        let options = EncodeOptions::new().level(RecoveryLevel::High).mask(Some(Mask::new(value)));
        let forced = QrCode::with_options("mask search", &options).expect("encodable");
        assert_eq!(forced.mask().value(), value);
        best = best.min(forced.penalty());
    }
    assert_eq!(qr.penalty(), best);
}

#[test]
fn test_empty_content() {
    let qr = QrCode::new("", RecoveryLevel::Highest).expect("encodable");
    assert_eq!(qr.version(), Version::MIN);
    assert!(qr.data_bits().is_empty());
    assert_eq!(qr.matrix().size(), 29);
}

#[test]
fn test_large_version_symbol() {
    let content = vec![0xa5u8; 1500];
    let qr = QrCode::new(&content, RecoveryLevel::Medium).expect("encodable");
    assert_eq!(qr.encoder(), DataEncoder::Versions27To40);
    let matrix = qr.matrix();
    let size = matrix.symbol_size();
    assert_eq!(size, usize::from(qr.version().value()) * 4 + 17);
    // Top left finder pattern corners and the dark module.
    assert!(matrix.get(4, 4));
    assert!(matrix.get(10, 10));
    assert!(!matrix.get(11, 11));
    assert!(matrix.get(4 + 8, 4 + size - 8));
}

#[test]
fn test_every_version_and_level_builds() {
    for ver in Version::MIN.value()..=Version::MAX.value() {
        let version = Version::new(ver);
        let encoder = DataEncoder::for_version(version);
        let header = 4 + usize::from(encoder.char_count_bits(Mode::Byte));
        for level in RecoveryLevel::ALL {
            let capacity = Capacity::get(version, level);
            let content = vec![b'#'; (capacity.num_data_bits() - header) / 8];
            let qr = QrCode::new(&content, level).expect("encodable");
            assert_eq!(qr.version(), version, "{} bytes at {:?}", content.len(), level);
            assert_eq!(qr.level(), level);
            // Building panics if any module is left unwritten.
            let matrix = qr.matrix();
            assert_eq!(matrix.symbol_size(), version.size());
            assert_eq!(matrix.size(), version.size() + 8);
        }
    }
}

#[test]
fn test_long_digit_run_with_one_byte_stays_in_small_versions() {
    // 301 bytes exceed the 8 bit byte count of versions 1 to 9, but 300
    // digits plus one byte segment need only 1034 bits.
    let content = format!("{}a", "1".repeat(300));
    let qr = QrCode::new(&content, RecoveryLevel::Low).expect("encodable");
    assert_eq!(qr.encoder(), DataEncoder::Versions1To9);
    assert_eq!(qr.version(), Version::new(6));
    assert_eq!(qr.data_bits().len(), 1034);
}
