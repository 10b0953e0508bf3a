//! Canonical SVG rendering of turtle segments
//!
//! Output is stable for identical input: segments keep drawing order, attributes
//! are emitted in alphabetical order and coordinates use four decimal places.
use crate::{rasterize::segments_bbox, Align, BBox, Error, Point, Scalar, Segment, Transform};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Size and stroke of the SVG document
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SvgStyle {
    pub width: usize,
    pub height: usize,
    /// Empty space around the drawing in user units, clamped below half of the smaller side
    pub padding: Scalar,
    pub stroke: String,
    pub stroke_width: Scalar,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            padding: 20.0,
            stroke: "#228B22".to_owned(),
            stroke_width: 1.0,
        }
    }
}

impl SvgStyle {
    pub fn validate(&self) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidCanvasSize {
                width: self.width,
                height: self.height,
            });
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(Error::InvalidParameter {
                name: "padding",
                value: self.padding,
            });
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "stroke_width",
                value: self.stroke_width,
            });
        }
        Ok(())
    }

    /// Padding clamped so the drawing area never collapses
    fn effective_padding(&self) -> Scalar {
        let max_padding = (self.width.min(self.height) as Scalar / 2.0 - 1e-9).max(0.0);
        self.padding.min(max_padding)
    }

    /// Transformation from the drawing space into the SVG user space
    pub fn transform(&self, segments: &[Segment]) -> Transform {
        let width = self.width as Scalar;
        let height = self.height as Scalar;
        let padding = self.effective_padding();
        let dst = BBox::new(
            Point::new(padding, padding),
            Point::new(width - padding, height - padding),
        );
        Transform::flip_y(height) * Transform::fit(segments_bbox(segments), dst, Align::Mid)
    }
}

fn coord(value: Scalar) -> String {
    // adding zero normalizes negative zero
    format!("{:.4}", value + 0.0)
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Render segments as SVG document with one `<line>` element per segment
pub fn render_svg(segments: &[Segment], style: &SvgStyle) -> Result<String, Error> {
    style.validate()?;
    let tr = style.transform(segments);
    let stroke = escape_attr(&style.stroke);
    let stroke_width = coord(style.stroke_width);

    let mut svg = format!(
        "<svg height=\"{}\" width=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        style.height, style.width
    );
    for segment in segments {
        let Segment([p0, p1]) = segment.transform(tr);
        svg.push_str(&format!(
            "  <line stroke=\"{}\" stroke-width=\"{}\" x1=\"{}\" x2=\"{}\" y1=\"{}\" y2=\"{}\" />\n",
            stroke,
            stroke_width,
            coord(p0.x()),
            coord(p1.x()),
            coord(p0.y()),
            coord(p1.y()),
        ));
    }
    svg.push_str("</svg>\n");
    Ok(svg)
}
