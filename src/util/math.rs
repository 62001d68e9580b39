//! Integer and rounding helpers shared by the pyramid and level logic.

/// Halves a dimension, rounding up (`ceil(dim / 2)`).
pub(crate) fn halve_ceil(dim: usize) -> usize {
    dim.div_ceil(2)
}

/// Applies [`halve_ceil`] `times` times.
pub(crate) fn halve_ceil_n(mut dim: usize, times: usize) -> usize {
    for _ in 0..times {
        dim = halve_ceil(dim);
    }
    dim
}

/// Returns `floor(log2(value))`, or `None` for zero.
pub(crate) fn floor_log2(value: usize) -> Option<u32> {
    if value == 0 {
        None
    } else {
        Some(usize::BITS - 1 - value.leading_zeros())
    }
}

/// Rounds half-up and saturates into the `u8` range.
pub(crate) fn round_to_u8(value: f32) -> u8 {
    (value + 0.5).floor().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::{floor_log2, halve_ceil, halve_ceil_n, round_to_u8};

    #[test]
    fn halve_ceil_rounds_up() {
        assert_eq!(halve_ceil(1), 1);
        assert_eq!(halve_ceil(2), 1);
        assert_eq!(halve_ceil(5), 3);
        assert_eq!(halve_ceil_n(100, 2), 25);
        assert_eq!(halve_ceil_n(101, 3), 13);
        assert_eq!(halve_ceil_n(7, 0), 7);
    }

    #[test]
    fn floor_log2_matches_powers() {
        assert_eq!(floor_log2(0), None);
        assert_eq!(floor_log2(1), Some(0));
        assert_eq!(floor_log2(2), Some(1));
        assert_eq!(floor_log2(3), Some(1));
        assert_eq!(floor_log2(64), Some(6));
        assert_eq!(floor_log2(127), Some(6));
    }

    #[test]
    fn round_to_u8_saturates() {
        assert_eq!(round_to_u8(-3.0), 0);
        assert_eq!(round_to_u8(12.5), 13);
        assert_eq!(round_to_u8(12.49), 12);
        assert_eq!(round_to_u8(300.0), 255);
    }
}
