/// An append-only sequence of bits, packed most significant bit first.
///
/// Every bitstream the encoder produces (segment payloads, padded data
/// codewords, Reed–Solomon blocks and the final interleaved sequence) is built
/// in one of these. Bits can be read back by position or eight at a time.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct BitBuffer {
    data: Vec<u8>,
    length: usize,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty buffer with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            data: Vec::with_capacity(bits.div_ceil(8)),
            length: 0,
        }
    }

    /// Returns the number of bits appended so far.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Appends the low `len` bits of `val`, most significant first.
    ///
    /// # Panics
    ///
    /// Panics if `len > 31` or `val` has bits set above `len`.
    pub fn append_bits(&mut self, val: u32, len: u8) {
        assert!(len <= 31 && (val >> len) == 0, "Value does not fit in {} bits", len);
        for i in (0..len).rev() {
            self.push(((val >> i) & 1) != 0);
        }
    }

    /// Appends a single bit.
    pub fn push(&mut self, bit: bool) {
        let shift = 7 - (self.length & 7);
        if shift == 7 {
            self.data.push(0);
        }
        if bit {
            self.data[self.length >> 3] |= 1u8 << shift;
        }
        self.length += 1;
    }

    /// Appends `count` copies of `bit`.
    pub fn append_repeated(&mut self, count: usize, bit: bool) {
        for _ in 0..count {
            self.push(bit);
        }
    }

    /// Appends whole bytes, eight bits each.
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        if self.length % 8 == 0 {
            self.data.extend_from_slice(bytes);
            self.length += bytes.len() * 8;
        } else {
            for &b in bytes {
                self.append_bits(b.into(), 8);
            }
        }
    }

    /// Appends every bit of `other`.
    pub fn append(&mut self, other: &BitBuffer) {
        if other.length % 8 == 0 {
            self.append_bytes(&other.data);
        } else {
            for bit in other.iter() {
                self.push(bit);
            }
        }
    }

    /// Returns the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn get(&self, index: usize) -> bool {
        assert!(index < self.length, "Bit index {} out of range (len {})", index, self.length);
        (self.data[index >> 3] >> (7 - (index & 7))) & 1 != 0
    }

    /// Returns the eight bits starting at `index` as a byte.
    ///
    /// Positions past the end of the buffer read as zero.
    pub fn byte_at(&self, index: usize) -> u8 {
        (0..8).fold(0u8, |acc, i| {
            let bit = index + i < self.length && self.get(index + i);
            (acc << 1) | u8::from(bit)
        })
    }

    /// Copies the bits in `start..end` into a new buffer.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds or reversed.
    pub fn slice(&self, start: usize, end: usize) -> BitBuffer {
        assert!(start <= end && end <= self.length, "Bit range {}..{} out of range", start, end);
        let mut result = BitBuffer::with_capacity(end - start);
        if start % 8 == 0 && end % 8 == 0 {
            result.append_bytes(&self.data[start / 8..end / 8]);
        } else {
            for i in start..end {
                result.push(self.get(i));
            }
        }
        result
    }

    /// Returns the packed bytes. A trailing partial byte is zero-padded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.length).map(move |i| self.get(i))
    }

    /// Parses a string of `0` and `1` characters; any other character is skipped.
    #[cfg(test)]
    pub(crate) fn from_base2(s: &str) -> Self {
        let mut result = BitBuffer::new();
        for c in s.chars() {
            match c {
                '0' => result.push(false),
                '1' => result.push(true),
                _ => {}
            }
        }
        result
    }
}

impl core::fmt::Display for BitBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        for (i, bit) in self.iter().enumerate() {
            if i > 0 && i % 8 == 0 {
                f.write_str(" ")?;
            }
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}
