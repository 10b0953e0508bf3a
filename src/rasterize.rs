//! Autoscaling and line rasterization of turtle segments onto a [`Canvas`]
use crate::{
    utils::pixel_index, Align, BBox, Canvas, Error, ImageMut, Luma, Point, Scalar, Segment,
    Transform,
};

/// Bounding box of all segment endpoints
///
/// Falls back to the unit box around the origin when there are no (finite) points,
/// so the fit transform is always well defined.
pub fn segments_bbox(segments: &[Segment]) -> BBox {
    let points = segments.iter().flat_map(|segment| segment.points());
    match BBox::from_points(points.filter(|point| point.is_finite())) {
        Some(bbox) => bbox,
        None => BBox::new(Point::new(-0.5, -0.5), Point::new(0.5, 0.5)),
    }
}

/// Draw line between two pixels with the Bresenham algorithm
///
/// Endpoints are ordered before tracing so the set of pixels does not depend on
/// which end is passed first. Pixels outside of the image are skipped.
pub fn draw_line<I>(mut img: I, p0: (usize, usize), p1: (usize, usize), color: Luma)
where
    I: ImageMut<Pixel = Luma>,
{
    let (p0, p1) = if p0 <= p1 { (p0, p1) } else { (p1, p0) };
    let (x0, y0) = (p0.0 as i64, p0.1 as i64);
    let (x1, y1) = (p1.0 as i64, p1.1 as i64);

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let (mut x, mut y) = (x0, y0);
    loop {
        if let Some(pixel) = img.get_mut(y as usize, x as usize) {
            *pixel = color;
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Rasterizer of line segments into a fixed size canvas
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rasterizer {
    width: usize,
    height: usize,
    margin: Scalar,
}

impl Rasterizer {
    /// Create rasterizer for `width x height` canvas
    ///
    /// `margin` is a fraction of each canvas dimension left empty on both sides,
    /// must be inside `[0, 0.5)`.
    pub fn new(width: usize, height: usize, margin: Scalar) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidCanvasSize { width, height });
        }
        if !(0.0..0.5).contains(&margin) {
            return Err(Error::InvalidMargin(margin));
        }
        Ok(Self {
            width,
            height,
            margin,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn margin(&self) -> Scalar {
        self.margin
    }

    /// Transformation from the drawing space into the pixel space
    ///
    /// Drawing is scaled uniformly to fit margin-inset rectangle, centered and
    /// flipped vertically (drawing space `y` grows up, pixel space `y` grows down).
    pub fn transform(&self, segments: &[Segment]) -> Transform {
        let width = self.width as Scalar;
        let height = self.height as Scalar;
        let dst = BBox::new(
            Point::new(width * self.margin, height * self.margin),
            Point::new(width * (1.0 - self.margin), height * (1.0 - self.margin)),
        );
        Transform::flip_y(height) * Transform::fit(segments_bbox(segments), dst, Align::Mid)
    }

    /// Map drawing space point to the pixel `(col, row)`, always inside of the canvas
    pub fn pixel(&self, tr: Transform, point: Point) -> (usize, usize) {
        let Point([x, y]) = tr.apply(point);
        (pixel_index(x, self.width), pixel_index(y, self.height))
    }

    /// Render all segments in black on a white canvas
    pub fn rasterize(&self, segments: &[Segment]) -> Result<Canvas, Error> {
        let mut canvas = Canvas::new(self.width, self.height)?;
        let tr = self.transform(segments);
        tracing::debug!(
            "[rasterize] segments={} scale={}",
            segments.len(),
            tr.scale_x()
        );
        for segment in segments {
            let p0 = self.pixel(tr, segment.start());
            let p1 = self.pixel(tr, segment.end());
            draw_line(&mut canvas, p0, p1, Luma::BLACK);
        }
        Ok(canvas)
    }
}

/// Rasterize segments into `width x height` canvas, see [`Rasterizer::rasterize`]
pub fn rasterize(
    segments: &[Segment],
    width: usize,
    height: usize,
    margin: Scalar,
) -> Result<Canvas, Error> {
    Rasterizer::new(width, height, margin)?.rasterize(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_approx_eq, interpret, Image};
    use std::collections::BTreeSet;

    fn ink(canvas: &Canvas) -> BTreeSet<(usize, usize)> {
        let mut pixels = BTreeSet::new();
        for row in 0..canvas.height() {
            for col in 0..canvas.width() {
                if canvas.get(row, col) == Some(&Luma::BLACK) {
                    pixels.insert((col, row));
                }
            }
        }
        pixels
    }

    #[test]
    fn test_bbox() {
        let segments = [
            Segment::new((0.0, 0.0), (2.0, 3.0)),
            Segment::new((-1.0, 5.0), (0.0, 0.0)),
        ];
        let bbox = segments_bbox(&segments);
        assert_eq!(bbox.min(), Point::new(-1.0, 0.0));
        assert_eq!(bbox.max(), Point::new(2.0, 5.0));

        let empty = segments_bbox(&[]);
        assert_approx_eq!(empty.width(), 1.0);
        assert_approx_eq!(empty.height(), 1.0);
        assert!(empty.contains(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            Rasterizer::new(0, 10, 0.1),
            Err(Error::InvalidCanvasSize { .. })
        ));
        assert!(matches!(
            Rasterizer::new(10, 0, 0.1),
            Err(Error::InvalidCanvasSize { .. })
        ));
        for margin in [-0.1, 0.5, 0.7, f64::NAN] {
            assert!(matches!(
                Rasterizer::new(10, 10, margin),
                Err(Error::InvalidMargin(_))
            ));
        }
        assert!(Rasterizer::new(1, 1, 0.0).is_ok());
        assert!(Rasterizer::new(10, 10, 0.49).is_ok());
    }

    #[test]
    fn test_draw_line_symmetric() -> Result<(), Error> {
        let cases = [
            ((0, 0), (7, 3)),
            ((1, 6), (6, 0)),
            ((2, 2), (2, 7)),
            ((0, 4), (7, 4)),
            ((0, 0), (7, 7)),
            ((3, 1), (4, 6)),
        ];
        for (p0, p1) in cases {
            let mut forward = Canvas::new(8, 8)?;
            let mut backward = Canvas::new(8, 8)?;
            draw_line(&mut forward, p0, p1, Luma::BLACK);
            draw_line(&mut backward, p1, p0, Luma::BLACK);
            assert_eq!(ink(&forward), ink(&backward));
            assert!(ink(&forward).contains(&p0));
            assert!(ink(&forward).contains(&p1));
        }
        Ok(())
    }

    #[test]
    fn test_draw_line_pixels() -> Result<(), Error> {
        let mut canvas = Canvas::new(5, 3)?;
        draw_line(&mut canvas, (0, 1), (4, 1), Luma::BLACK);
        let expected: BTreeSet<_> = (0..5).map(|col| (col, 1)).collect();
        assert_eq!(ink(&canvas), expected);

        let mut canvas = Canvas::new(4, 4)?;
        draw_line(&mut canvas, (3, 3), (0, 0), Luma::BLACK);
        let expected: BTreeSet<_> = (0..4).map(|i| (i, i)).collect();
        assert_eq!(ink(&canvas), expected);

        // zero length line plots a single pixel
        let mut canvas = Canvas::new(4, 4)?;
        draw_line(&mut canvas, (2, 1), (2, 1), Luma::BLACK);
        assert_eq!(ink(&canvas), BTreeSet::from([(2, 1)]));
        Ok(())
    }

    #[test]
    fn test_vertical_line_centered() -> Result<(), Error> {
        let segments = interpret("F", 90.0, 10.0)?;
        let canvas = rasterize(&segments, 11, 21, 0.0)?;
        let pixels = ink(&canvas);
        // spans full height, centered horizontally
        assert_eq!(pixels.len(), 21);
        assert!(pixels.iter().all(|(col, _)| *col == 5));
        Ok(())
    }

    #[test]
    fn test_flip_and_margin() -> Result<(), Error> {
        let rasterizer = Rasterizer::new(100, 100, 0.1)?;
        let segments = [Segment::new((0.0, 0.0), (0.0, 10.0))];
        let tr = rasterizer.transform(&segments);
        // drawing space "up" is the pixel space "top"
        let bottom = tr.apply(Point::new(0.0, 0.0));
        let top = tr.apply(Point::new(0.0, 10.0));
        assert_approx_eq!(bottom.y(), 90.0, 1e-9);
        assert_approx_eq!(top.y(), 10.0, 1e-9);
        assert_approx_eq!(top.x(), 50.0, 1e-9);
        Ok(())
    }

    #[test]
    fn test_aspect_preserved() -> Result<(), Error> {
        let rasterizer = Rasterizer::new(200, 100, 0.0)?;
        let segments = [Segment::new((0.0, 0.0), (1.0, 1.0))];
        let tr = rasterizer.transform(&segments);
        let p0 = tr.apply(Point::new(0.0, 0.0));
        let p1 = tr.apply(Point::new(1.0, 1.0));
        assert_approx_eq!((p1.x() - p0.x()).abs(), 100.0, 1e-9);
        assert_approx_eq!((p1.y() - p0.y()).abs(), 100.0, 1e-9);
        assert_approx_eq!(p0.x(), 50.0, 1e-9);
        Ok(())
    }

    #[test]
    fn test_empty_segments() -> Result<(), Error> {
        let canvas = rasterize(&[], 16, 9, 0.1)?;
        assert_eq!(canvas.ink_count(), 0);
        Ok(())
    }

    #[test]
    fn test_always_in_bounds() -> Result<(), Error> {
        let segments = vec![
            Segment::new((0.0, 0.0), (1e12, -1e12)),
            Segment::new((f64::NAN, 0.0), (3.0, f64::INFINITY)),
            Segment::new((5.0, 5.0), (5.0, 5.0)),
        ];
        for (width, height) in [(1, 1), (3, 50), (64, 2), (17, 17)] {
            for margin in [0.0, 0.25, 0.49] {
                let canvas = rasterize(&segments, width, height, margin)?;
                assert_eq!(canvas.data().len(), width * height);
                assert!(canvas.ink_count() > 0);
            }
        }
        Ok(())
    }

    #[test]
    fn test_huge_extent() -> Result<(), Error> {
        let segments = [
            Segment::new((-1e308, 0.0), (1e308, 0.0)),
            Segment::new((0.0, 0.0), (0.0, 1.0)),
        ];
        let canvas = rasterize(&segments, 20, 10, 0.1)?;
        let pixels = ink(&canvas);
        // horizontal line across the inset, the short segment collapses onto it
        assert!(pixels.len() >= 15, "{:?}", canvas);
        assert!(pixels.iter().all(|(_, row)| *row == 5), "{:?}", canvas);
        assert!(pixels.contains(&(10, 5)));
        assert!(!pixels.contains(&(0, 0)));
        Ok(())
    }

    #[test]
    fn test_plant_has_ink() -> Result<(), Error> {
        let grammar = crate::Grammar::new("X", [("X", "F[+X]F[-X]+X"), ("F", "FF")])?;
        let segments = interpret(&grammar.expand(4), 20.0, 3.0)?;
        let canvas = rasterize(&segments, 64, 48, 0.1)?;
        assert!(canvas.ink_count() > 0);
        // margin rows stay empty
        let pixels = ink(&canvas);
        assert!(pixels.iter().all(|(col, row)| *row >= 4 && *row < 44 && *col < 64));
        Ok(())
    }
}
