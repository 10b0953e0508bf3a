//! Minimal zlib (RFC 1950) stream built from stored deflate (RFC 1951) blocks
//!
//! No compression is performed, the payload is split into uncompressed blocks of
//! at most [`MAX_STORED_BLOCK`] bytes. Any conforming inflater accepts it.
use crate::checksum::Adler32;

/// Largest payload of a single stored block
pub const MAX_STORED_BLOCK: usize = 65535;

/// CMF: deflate with 32K window, FLG: no dictionary, fastest level, FCHECK
const ZLIB_HEADER: [u8; 2] = [0x78, 0x01];

/// Size of the stream produced by [`compress_stored`] for `len` bytes of input
pub fn stored_len(len: usize) -> usize {
    let blocks = len.div_ceil(MAX_STORED_BLOCK).max(1);
    ZLIB_HEADER.len() + blocks * 5 + len + 4
}

/// Wrap `data` into zlib stream of stored blocks
pub fn compress_stored(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(stored_len(data.len()));
    out.extend_from_slice(&ZLIB_HEADER);

    let mut blocks = data.chunks(MAX_STORED_BLOCK).peekable();
    if blocks.peek().is_none() {
        // empty input still requires final block
        stored_block(&mut out, &[], true);
    }
    while let Some(block) = blocks.next() {
        stored_block(&mut out, block, blocks.peek().is_none());
    }

    let mut adler = Adler32::new();
    adler.update(data);
    out.extend_from_slice(&adler.finish().to_be_bytes());
    out
}

/// Block header: BFINAL bit, BTYPE=00, padding to the byte boundary, LEN, NLEN
fn stored_block(out: &mut Vec<u8>, block: &[u8], last: bool) {
    debug_assert!(block.len() <= MAX_STORED_BLOCK);
    let len = block.len() as u16;
    out.push(last as u8);
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&(!len).to_le_bytes());
    out.extend_from_slice(block);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::adler32;

    /// Parse stored-only stream back, panics on anything unexpected
    fn inflate_stored(stream: &[u8]) -> Vec<u8> {
        assert_eq!(&stream[..2], &ZLIB_HEADER);
        assert_eq!(u16::from_be_bytes([stream[0], stream[1]]) % 31, 0);
        let mut out = Vec::new();
        let mut pos = 2;
        loop {
            let header = stream[pos];
            assert_eq!(header & 0b110, 0, "only stored blocks are expected");
            let len = u16::from_le_bytes([stream[pos + 1], stream[pos + 2]]);
            let nlen = u16::from_le_bytes([stream[pos + 3], stream[pos + 4]]);
            assert_eq!(len, !nlen);
            pos += 5;
            out.extend_from_slice(&stream[pos..pos + len as usize]);
            pos += len as usize;
            if header & 1 == 1 {
                break;
            }
        }
        let adler = u32::from_be_bytes([
            stream[pos],
            stream[pos + 1],
            stream[pos + 2],
            stream[pos + 3],
        ]);
        assert_eq!(adler, adler32(&out));
        assert_eq!(pos + 4, stream.len());
        out
    }

    #[test]
    fn test_empty() {
        let stream = compress_stored(&[]);
        assert_eq!(
            stream,
            vec![0x78, 0x01, 0x01, 0x00, 0x00, 0xff, 0xff, 0x00, 0x00, 0x00, 0x01]
        );
        assert_eq!(stream.len(), stored_len(0));
    }

    #[test]
    fn test_small() {
        let stream = compress_stored(b"abc");
        assert_eq!(&stream[2..7], &[0x01, 0x03, 0x00, 0xfc, 0xff]);
        assert_eq!(inflate_stored(&stream), b"abc");
    }

    #[test]
    fn test_block_split() {
        for len in [
            MAX_STORED_BLOCK - 1,
            MAX_STORED_BLOCK,
            MAX_STORED_BLOCK + 1,
            3 * MAX_STORED_BLOCK + 17,
        ] {
            let data: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
            let stream = compress_stored(&data);
            assert_eq!(stream.len(), stored_len(len));
            assert_eq!(inflate_stored(&stream), data);
        }
        // exact multiple of the block size does not produce trailing empty block
        let stream = compress_stored(&vec![0u8; MAX_STORED_BLOCK]);
        assert_eq!(stream[2], 0x01);
    }
}
