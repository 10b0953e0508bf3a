/// Restrict value to a certain interval
#[inline]
pub fn clamp<T>(val: T, min: T, max: T) -> T
where
    T: PartialOrd,
{
    if val < min {
        min
    } else if val > max {
        max
    } else {
        val
    }
}

/// Map scalar coordinate into the index of the pixel cell containing it
///
/// Pixel `i` covers `[i, i + 1)`, result is clamped into `[0, size)`. `NaN` is
/// mapped to `0`, infinities to the corresponding edge.
#[inline]
pub(crate) fn pixel_index(value: f64, size: usize) -> usize {
    debug_assert!(size > 0);
    let max = (size - 1) as f64;
    // `as` saturates and maps NaN to zero
    clamp(value.floor(), 0.0, max) as usize
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[macro_export]
    macro_rules! assert_approx_eq {
        ( $v0:expr, $v1: expr ) => {{
            assert!(($v0 - $v1).abs() < $crate::EPSILON, "{} != {}", $v0, $v1);
        }};
        ( $v0:expr, $v1: expr, $e: expr ) => {{
            assert!(($v0 - $v1).abs() < $e, "{} != {}", $v0, $v1);
        }};
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5, 0, 3), 3);
        assert_eq!(clamp(-1, 0, 3), 0);
        assert_eq!(clamp(2, 0, 3), 2);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
    }

    #[test]
    fn test_pixel_index() {
        assert_eq!(pixel_index(0.4, 10), 0);
        assert_eq!(pixel_index(0.6, 10), 0);
        assert_eq!(pixel_index(1.2, 10), 1);
        assert_eq!(pixel_index(9.7, 10), 9);
        assert_eq!(pixel_index(10.0, 10), 9);
        assert_eq!(pixel_index(-3.0, 10), 0);
        assert_eq!(pixel_index(f64::NAN, 10), 0);
        assert_eq!(pixel_index(f64::INFINITY, 10), 9);
        assert_eq!(pixel_index(f64::NEG_INFINITY, 10), 0);
        assert_eq!(pixel_index(123.0, 1), 0);
    }
}
