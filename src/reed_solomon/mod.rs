//! Reed–Solomon error correction over GF(256).

pub mod gf256;
pub mod poly;

use crate::bits::BitBuffer;
pub use poly::Poly;

/// Computes error correction codewords for data blocks of one ECC length.
pub struct ReedSolomon {
    generator: Poly,
    degree: usize,
}

impl ReedSolomon {
    /// Prepares the generator polynomial (x + α^0)(x + α^1)…(x + α^(degree-1)).
    ///
    /// # Panics
    ///
    /// Panics if `degree < 2`.
    pub fn new(degree: usize) -> Self {
        assert!(degree >= 2, "Degree out of range");
        let mut generator = Poly::new(vec![gf256::ONE]);
        for i in 0..degree {
            let factor = Poly::new(vec![gf256::exp(i), gf256::ONE]);
            generator = &generator * &factor;
        }
        Self { generator, degree }
    }

    pub fn generator(&self) -> &Poly {
        &self.generator
    }

    /// Returns `data` followed by its error correction codewords.
    ///
    /// The input bits are copied verbatim so that leading zero bytes, which
    /// vanish from the polynomial form, survive.
    pub fn encode(&self, data: &BitBuffer) -> BitBuffer {
        debug_assert_eq!(data.len() % 8, 0);
        let shifted = &Poly::from_data(data) * &Poly::monomial(gf256::ONE, self.degree);
        let remainder = &shifted % &self.generator;

        let mut result = BitBuffer::with_capacity(data.len() + self.degree * 8);
        result.append(data);
        result.append_bytes(&remainder.to_bytes(self.degree));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_polynomial() {
        // Degree 7 generator from ISO/IEC 18004 Annex A, in α exponents:
        // x^7 + α^87 x^6 + α^229 x^5 + α^146 x^4 + α^149 x^3 + α^238 x^2 + α^102 x + α^21
        let rs = ReedSolomon::new(7);
        let expected: Vec<u8> = [21, 102, 238, 149, 146, 229, 87, 0]
            .iter()
            .map(|&e| gf256::exp(e))
            .collect();
        assert_eq!(rs.generator().terms(), expected.as_slice());
    }

    #[test]
    fn test_encode_iso_example() {
        // "01234567" at version 1-M: 16 data codewords, 10 ECC codewords.
        let data: [u8; 16] = [
            0x10, 0x20, 0x0c, 0x56, 0x61, 0x80, 0xec, 0x11, 0xec, 0x11, 0xec, 0x11, 0xec, 0x11,
            0xec, 0x11,
        ];
        let mut bits = BitBuffer::new();
        bits.append_bytes(&data);
        let encoded = ReedSolomon::new(10).encode(&bits);
        assert_eq!(encoded.len(), 26 * 8);
        assert_eq!(&encoded.as_bytes()[..16], &data);
        assert_eq!(
            &encoded.as_bytes()[16..],
            &[0xa5, 0x24, 0xd4, 0xc1, 0xed, 0x36, 0xc7, 0x87, 0x2c, 0x55]
        );
    }

    #[test]
    fn test_leading_zero_bytes_are_kept() {
        let mut bits = BitBuffer::new();
        bits.append_bytes(&[0x00, 0x00, 0x40, 0x11]);
        let encoded = ReedSolomon::new(5).encode(&bits);
        assert_eq!(encoded.len(), (4 + 5) * 8);
        assert_eq!(&encoded.as_bytes()[..4], &[0x00, 0x00, 0x40, 0x11]);
    }

    #[test]
    fn test_codeword_is_multiple_of_generator() {
        let mut bits = BitBuffer::new();
        bits.append_bytes(b"reed solomon");
        let rs = ReedSolomon::new(13);
        let codeword = Poly::from_data(&rs.encode(&bits));
        assert!((&codeword % rs.generator()).is_zero());
    }

    #[test]
    #[should_panic(expected = "Degree out of range")]
    fn test_degree_too_small() {
        ReedSolomon::new(1);
    }
}
