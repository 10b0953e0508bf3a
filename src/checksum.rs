//! Checksums required by the PNG container and the zlib stream
//!
//! - CRC-32 (ISO 3309, reflected polynomial `0xEDB88320`) protects each PNG chunk
//! - Adler-32 (RFC 1950) trails the zlib stream

const CRC32_TABLE: [u32; 256] = crc32_table();

const fn crc32_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut index = 0;
    while index < 256 {
        let mut crc = index as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                0xedb8_8320 ^ (crc >> 1)
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[index] = crc;
        index += 1;
    }
    table
}

/// Incremental CRC-32
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crc32 {
    state: u32,
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc32 {
    pub const fn new() -> Self {
        Self { state: 0xffff_ffff }
    }

    pub fn update(&mut self, bytes: &[u8]) {
        let mut crc = self.state;
        for byte in bytes {
            crc = CRC32_TABLE[((crc ^ *byte as u32) & 0xff) as usize] ^ (crc >> 8);
        }
        self.state = crc;
    }

    pub fn finish(&self) -> u32 {
        self.state ^ 0xffff_ffff
    }
}

/// CRC-32 of the `bytes`
pub fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(bytes);
    crc.finish()
}

const ADLER_MOD: u32 = 65521;
/// Largest number of bytes that can be summed before `u32` might overflow
const ADLER_NMAX: usize = 5552;

/// Incremental Adler-32
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Adler32 {
    a: u32,
    b: u32,
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Adler32 {
    pub const fn new() -> Self {
        Self { a: 1, b: 0 }
    }

    pub fn update(&mut self, bytes: &[u8]) {
        for chunk in bytes.chunks(ADLER_NMAX) {
            for byte in chunk {
                self.a += *byte as u32;
                self.b += self.a;
            }
            self.a %= ADLER_MOD;
            self.b %= ADLER_MOD;
        }
    }

    pub fn finish(&self) -> u32 {
        (self.b << 16) | self.a
    }
}

/// Adler-32 of the `bytes`
pub fn adler32(bytes: &[u8]) -> u32 {
    let mut adler = Adler32::new();
    adler.update(bytes);
    adler.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32() {
        assert_eq!(crc32(b""), 0);
        assert_eq!(crc32(b"123456789"), 0xcbf4_3926);
        assert_eq!(
            crc32(b"The quick brown fox jumps over the lazy dog"),
            0x414f_a339
        );
        // chunk type of the PNG trailer, well known constant
        assert_eq!(crc32(b"IEND"), 0xae42_6082);
    }

    #[test]
    fn test_crc32_incremental() {
        let data: Vec<u8> = (0..1000u32).map(|i| (i * 7 + 3) as u8).collect();
        let mut crc = Crc32::new();
        for chunk in data.chunks(33) {
            crc.update(chunk);
        }
        assert_eq!(crc.finish(), crc32(&data));
    }

    #[test]
    fn test_adler32() {
        assert_eq!(adler32(b""), 1);
        assert_eq!(adler32(b"Wikipedia"), 0x11e6_0398);
        // long run of 0xff exercises deferred modulo
        let ones = vec![0xffu8; 100_000];
        let mut a: u64 = 1;
        let mut b: u64 = 0;
        for byte in &ones {
            a = (a + *byte as u64) % 65521;
            b = (b + a) % 65521;
        }
        assert_eq!(adler32(&ones), ((b << 16) | a) as u32);

        let mut adler = Adler32::new();
        for chunk in ones.chunks(1234) {
            adler.update(chunk);
        }
        assert_eq!(adler.finish(), adler32(&ones));
    }
}
