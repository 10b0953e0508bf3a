//! PNG encoding of the [`Canvas`]
//!
//! File layout: signature, `IHDR`, one or more `IDAT` chunks holding zlib stream
//! of filtered scanlines, `IEND`. Every chunk is framed as
//! `length | type | data | crc32(type + data)`. Scanlines always use filter
//! type `None` and the zlib stream only contains stored blocks.
use crate::{
    checksum::Crc32,
    zlib::{compress_stored, stored_len},
    Canvas, Error, Image, Luma,
};
use std::io::Write;

/// PNG file signature
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Largest image dimension allowed by the PNG format
pub const PNG_MAX_DIMENSION: usize = (1 << 31) - 1;

/// Default maximum size of the `IDAT` chunk payload
pub const DEFAULT_MAX_CHUNK_LEN: usize = 8192;

const COLOR_TYPE_GRAYSCALE: u8 = 0;
const FILTER_NONE: u8 = 0;

/// Common interface of the canvas encoders
pub trait Encoder {
    /// Descriptive name of the encoder
    fn name(&self) -> &str;

    /// Produce complete encoded file, never a partial one
    fn encode(&self, canvas: &Canvas) -> Result<Vec<u8>, Error>;
}

impl<E: Encoder + ?Sized> Encoder for &E {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn encode(&self, canvas: &Canvas) -> Result<Vec<u8>, Error> {
        (**self).encode(canvas)
    }
}

impl<E: Encoder + ?Sized> Encoder for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn encode(&self, canvas: &Canvas) -> Result<Vec<u8>, Error> {
        (**self).encode(canvas)
    }
}

/// Bits per grayscale sample
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BitDepth {
    /// Monochrome, light pixels are stored as `1`, dark as `0`
    One,
    /// 8-bit grayscale
    #[default]
    Eight,
}

impl BitDepth {
    fn bits(self) -> u8 {
        match self {
            BitDepth::One => 1,
            BitDepth::Eight => 8,
        }
    }

    /// Size of the scanline without the filter byte
    fn row_len(self, width: usize) -> usize {
        match self {
            BitDepth::One => width.div_ceil(8),
            BitDepth::Eight => width,
        }
    }
}

/// Self contained PNG encoder
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PngEncoder {
    bit_depth: BitDepth,
    max_chunk_len: usize,
}

impl Default for PngEncoder {
    fn default() -> Self {
        Self {
            bit_depth: BitDepth::default(),
            max_chunk_len: DEFAULT_MAX_CHUNK_LEN,
        }
    }
}

impl PngEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bit_depth(self, bit_depth: BitDepth) -> Self {
        Self { bit_depth, ..self }
    }

    /// Maximum size of a single `IDAT` payload, zero is treated as one
    pub fn with_max_chunk_len(self, max_chunk_len: usize) -> Self {
        Self {
            max_chunk_len: max_chunk_len.max(1),
            ..self
        }
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    /// `IHDR` payload
    fn header(&self, canvas: &Canvas) -> Result<[u8; 13], Error> {
        let (width, height) = (canvas.width(), canvas.height());
        if width == 0 || height == 0 || width > PNG_MAX_DIMENSION || height > PNG_MAX_DIMENSION {
            return Err(Error::EncodingInvariant(format!(
                "canvas size {}x{} is not representable",
                width, height
            )));
        }
        let mut header = [0u8; 13];
        header[0..4].copy_from_slice(&(width as u32).to_be_bytes());
        header[4..8].copy_from_slice(&(height as u32).to_be_bytes());
        header[8] = self.bit_depth.bits();
        header[9] = COLOR_TYPE_GRAYSCALE;
        // compression method, filter method, interlace method
        header[10..13].copy_from_slice(&[0, 0, 0]);
        Ok(header)
    }

    /// Filtered scanlines, each prefixed with the filter type byte
    fn scanlines(&self, canvas: &Canvas) -> Result<Vec<u8>, Error> {
        let row_len = self.bit_depth.row_len(canvas.width());
        let mut raw = Vec::with_capacity((row_len + 1) * canvas.height());
        for index in 0..canvas.height() {
            let row = canvas.row(index).ok_or_else(|| {
                Error::EncodingInvariant(format!("row {} is not available", index))
            })?;
            raw.push(FILTER_NONE);
            match self.bit_depth {
                BitDepth::Eight => raw.extend_from_slice(bytemuck::cast_slice::<Luma, u8>(row)),
                BitDepth::One => raw.extend(row.chunks(8).map(pack_bits)),
            }
        }
        Ok(raw)
    }

    /// Write encoded canvas into `out`
    ///
    /// Whole file is prepared in memory before anything is written.
    pub fn write_png(&self, canvas: &Canvas, mut out: impl Write) -> Result<(), Error> {
        let data = self.encode(canvas)?;
        out.write_all(&data)?;
        Ok(())
    }
}

/// Pack up to 8 pixels into a byte, first pixel is the most significant bit
fn pack_bits(pixels: &[Luma]) -> u8 {
    pixels
        .iter()
        .enumerate()
        .fold(0u8, |byte, (index, pixel)| {
            byte | ((pixel.is_light() as u8) << (7 - index))
        })
}

/// Append `length | type | data | crc` framed chunk
fn write_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) -> Result<(), Error> {
    let length = u32::try_from(data.len()).map_err(|_| {
        Error::EncodingInvariant(format!("chunk of {} bytes is too large", data.len()))
    })?;
    let mut crc = Crc32::new();
    crc.update(kind);
    crc.update(data);
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    out.extend_from_slice(&crc.finish().to_be_bytes());
    Ok(())
}

impl Encoder for PngEncoder {
    fn name(&self) -> &str {
        "png"
    }

    fn encode(&self, canvas: &Canvas) -> Result<Vec<u8>, Error> {
        let header = self.header(canvas)?;
        let raw = self.scanlines(canvas)?;
        let stream = compress_stored(&raw);
        debug_assert_eq!(stream.len(), stored_len(raw.len()));

        let chunks = stream.len().div_ceil(self.max_chunk_len).max(1);
        let mut out =
            Vec::with_capacity(PNG_SIGNATURE.len() + 12 * (chunks + 2) + 13 + stream.len());
        out.extend_from_slice(&PNG_SIGNATURE);
        write_chunk(&mut out, b"IHDR", &header)?;
        for data in stream.chunks(self.max_chunk_len) {
            write_chunk(&mut out, b"IDAT", data)?;
        }
        write_chunk(&mut out, b"IEND", &[])?;
        tracing::trace!(
            "[png] {}x{} depth={} raw={} idat_chunks={} bytes={}",
            canvas.width(),
            canvas.height(),
            self.bit_depth.bits(),
            raw.len(),
            chunks,
            out.len()
        );
        Ok(out)
    }
}

/// Encoder backed by the `png` crate
#[cfg(feature = "png")]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PngCrateEncoder;

#[cfg(feature = "png")]
impl Encoder for PngCrateEncoder {
    fn name(&self) -> &str {
        "png-crate"
    }

    fn encode(&self, canvas: &Canvas) -> Result<Vec<u8>, Error> {
        let external = |error: png::EncodingError| Error::ExternalEncoder(error.to_string());
        let width = u32::try_from(canvas.width())
            .map_err(|_| Error::EncodingInvariant("canvas is too wide".to_owned()))?;
        let height = u32::try_from(canvas.height())
            .map_err(|_| Error::EncodingInvariant("canvas is too tall".to_owned()))?;
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(png::ColorType::Grayscale);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().map_err(external)?;
            writer
                .write_image_data(bytemuck::cast_slice(canvas.data()))
                .map_err(external)?;
            // IEND is written when writer is dropped
        }
        Ok(out)
    }
}
