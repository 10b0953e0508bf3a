//! L-system plant renderer
//!
//! Main features:
//!  - Parallel rewriting of L-system grammars
//!  - Turtle graphics interpretation with branching stack
//!  - Autoscaled line rasterization onto monochrome canvas
//!  - Self-contained PNG encoder and canonical SVG output
//!
//! ```
//! use lsysviz::{Preset, RenderConfig};
//!
//! let config = RenderConfig::from_preset(Preset::by_name("weed")?);
//! let png = config.render()?;
//! assert_eq!(&png[1..4], b"PNG");
//! # Ok::<(), lsysviz::Error>(())
//! ```

mod checksum;
mod encoder;
mod error;
mod geometry;
mod grammar;
mod image;
mod presets;
mod rasterize;
mod render;
mod svg;
mod turtle;
mod utils;
mod zlib;

pub use checksum::{adler32, crc32, Adler32, Crc32};
#[cfg(feature = "png")]
pub use encoder::PngCrateEncoder;
pub use encoder::{BitDepth, Encoder, PngEncoder, DEFAULT_MAX_CHUNK_LEN, PNG_SIGNATURE};
pub use error::{Error, ErrorKind};
pub use geometry::{Align, BBox, Point, Scalar, Transform, EPSILON};
pub use grammar::{expand, parse_rule, Grammar};
pub use image::{Canvas, Image, ImageMut, Luma, Shape};
pub use presets::{Preset, PRESETS};
pub use rasterize::{draw_line, rasterize, segments_bbox, Rasterizer};
pub use render::{render_to_image, render_with, RenderConfig};
pub use svg::{render_svg, SvgStyle};
pub use turtle::{
    interpret, CommandSet, Segment, Turtle, TurtleCmd, TurtleState, DEFAULT_MAX_STACK_DEPTH,
};
pub use utils::clamp;
pub use zlib::{compress_stored, MAX_STORED_BLOCK};
