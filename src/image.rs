use crate::Error;
use bytemuck::{Pod, Zeroable};
use std::fmt;

/// 8-bit grayscale pixel
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable)]
#[repr(transparent)]
pub struct Luma(pub u8);

impl Luma {
    /// Background color
    pub const WHITE: Luma = Luma(255);
    /// Foreground (ink) color
    pub const BLACK: Luma = Luma(0);

    /// Whether pixel is closer to white than to black
    #[inline]
    pub fn is_light(self) -> bool {
        self.0 >= 128
    }
}

impl Default for Luma {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Debug for Luma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Luma({})", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Shape {
    /// Width of the image
    pub width: usize,
    /// Height of the image
    pub height: usize,
    /// How many elements we need to skip to get to the next row.
    pub row_stride: usize,
    /// How many elements we need to skip to get to the next column.
    pub col_stride: usize,
}

impl Shape {
    /// Contiguous row-major shape
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            row_stride: width,
            col_stride: 1,
        }
    }

    #[inline]
    pub fn offset(&self, row: usize, col: usize) -> usize {
        row * self.row_stride + col * self.col_stride
    }

    /// Whether `(row, col)` is inside of the image
    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }
}

pub trait Image {
    type Pixel;

    fn data(&self) -> &[Self::Pixel];

    fn shape(&self) -> Shape;

    fn width(&self) -> usize {
        self.shape().width
    }

    fn height(&self) -> usize {
        self.shape().height
    }

    fn get(&self, row: usize, col: usize) -> Option<&Self::Pixel> {
        let shape = self.shape();
        if !shape.contains(row, col) {
            return None;
        }
        self.data().get(shape.offset(row, col))
    }

    /// Pixels of the `row`, only available for contiguous rows
    fn row(&self, row: usize) -> Option<&[Self::Pixel]> {
        let shape = self.shape();
        if row >= shape.height || shape.col_stride != 1 {
            return None;
        }
        let start = shape.offset(row, 0);
        self.data().get(start..start + shape.width)
    }
}

pub trait ImageMut: Image {
    fn data_mut(&mut self) -> &mut [Self::Pixel];

    fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Self::Pixel> {
        let shape = self.shape();
        if !shape.contains(row, col) {
            return None;
        }
        self.data_mut().get_mut(shape.offset(row, col))
    }

    /// Set every pixel of the image to `value`
    fn fill(&mut self, value: Self::Pixel)
    where
        Self::Pixel: Copy,
    {
        let shape = self.shape();
        let data = self.data_mut();
        for row in 0..shape.height {
            for col in 0..shape.width {
                data[shape.offset(row, col)] = value;
            }
        }
    }
}

/// Owned grayscale pixel grid, background is [`Luma::WHITE`]
#[derive(Clone, PartialEq, Eq)]
pub struct Canvas {
    shape: Shape,
    data: Vec<Luma>,
}

impl Canvas {
    /// Create canvas filled with background color
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidCanvasSize { width, height });
        }
        let len = width
            .checked_mul(height)
            .ok_or(Error::InvalidCanvasSize { width, height })?;
        Ok(Self {
            shape: Shape::new(width, height),
            data: vec![Luma::WHITE; len],
        })
    }

    /// Create canvas from the raw row-major pixel data
    pub fn from_data(width: usize, height: usize, data: Vec<Luma>) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidCanvasSize { width, height });
        }
        if width.checked_mul(height) != Some(data.len()) {
            return Err(Error::EncodingInvariant(format!(
                "pixel buffer of {} does not match {}x{} canvas",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            shape: Shape::new(width, height),
            data,
        })
    }

    /// Number of pixels set to foreground (non-light) color
    pub fn ink_count(&self) -> usize {
        self.data.iter().filter(|pixel| !pixel.is_light()).count()
    }

    pub fn to_vec(self) -> Vec<Luma> {
        self.data
    }
}

impl Image for Canvas {
    type Pixel = Luma;

    fn shape(&self) -> Shape {
        self.shape
    }

    fn data(&self) -> &[Self::Pixel] {
        &self.data
    }
}

impl ImageMut for Canvas {
    fn data_mut(&mut self) -> &mut [Self::Pixel] {
        &mut self.data
    }
}

impl<I> Image for &I
where
    I: Image + ?Sized,
{
    type Pixel = I::Pixel;

    fn shape(&self) -> Shape {
        (*self).shape()
    }

    fn data(&self) -> &[Self::Pixel] {
        (*self).data()
    }
}

impl<I> Image for &mut I
where
    I: Image + ?Sized,
{
    type Pixel = I::Pixel;

    fn shape(&self) -> Shape {
        (**self).shape()
    }

    fn data(&self) -> &[Self::Pixel] {
        (**self).data()
    }
}

impl<I> ImageMut for &mut I
where
    I: ImageMut + ?Sized,
{
    fn data_mut(&mut self) -> &mut [Self::Pixel] {
        (**self).data_mut()
    }
}

impl fmt::Debug for Canvas {
    /// Renders the canvas as ASCII art, `#` for ink and `.` for background
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Canvas {}x{}", self.shape.width, self.shape.height)?;
        for row in 0..self.shape.height {
            for col in 0..self.shape.width {
                let pixel = self.data[self.shape.offset(row, col)];
                write!(f, "{}", if pixel.is_light() { '.' } else { '#' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
