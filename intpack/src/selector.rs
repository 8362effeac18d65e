//! # Width Selector
//!
//! Maps an inclusive value range to the first catalog entry able to hold
//! every value in it. The bounds are taken as arbitrary-precision integers
//! since the whole point of the selector is to find a width for values whose
//! magnitude is not known to fit any particular native type.

use num_bigint::BigInt;

use crate::format::{FormatTag, CATALOG};

/// Errors returned by the width selector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    /// No catalog entry covers the range. The caller needs a representation
    /// other than a fixed-width array for these values.
    #[error("no fixed-width format can hold the range [{min}, {max}]")]
    RangeUnsupported {
        /// Requested lower bound
        min: BigInt,
        /// Requested upper bound
        max: BigInt,
    },

    /// The lower bound is greater than the upper bound.
    #[error("inverted range: min {min} is greater than max {max}")]
    InvertedRange {
        /// Requested lower bound
        min: BigInt,
        /// Requested upper bound
        max: BigInt,
    },
}

/// Selects the narrowest format that can hold every value in `[min, max]`.
///
/// The catalog is scanned in order (by width, unsigned before signed) and the
/// first entry whose bounds contain the range wins. A negative `min` rules
/// out every unsigned entry regardless of how many bits it would offer.
///
/// ## Errors
/// * `InvertedRange` - `min > max`
/// * `RangeUnsupported` - the range exceeds the widest catalog entries
pub fn select_format<L, H>(min: L, max: H) -> Result<FormatTag, SelectError>
where
    L: Into<BigInt>,
    H: Into<BigInt>,
{
    let min = min.into();
    let max = max.into();

    if min > max {
        return Err(SelectError::InvertedRange { min, max });
    }

    let selected = CATALOG
        .iter()
        .find(|spec| BigInt::from(spec.min_value()) <= min && max <= BigInt::from(spec.max_value()))
        .map(|spec| spec.tag);

    match selected {
        Some(tag) => {
            tracing::trace!(%min, %max, %tag, "selected format for range");
            Ok(tag)
        }
        None => {
            tracing::debug!(%min, %max, "no fixed-width format covers the range");
            Err(SelectError::RangeUnsupported { min, max })
        }
    }
}

/// Selects the narrowest format able to hold all of `values`.
///
/// An empty slice selects the same format as the range `[0, 0]`.
pub fn select_for_values<T>(values: &[T]) -> Result<FormatTag, SelectError>
where
    T: Copy + Into<i128>,
{
    let mut iter = values.iter().map(|&value| Into::<i128>::into(value));
    let Some(first) = iter.next() else {
        return select_format(0, 0);
    };

    let (min, max) = iter.fold((first, first), |(lo, hi), value| (lo.min(value), hi.max(value)));

    select_format(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use more_asserts::assert_ge;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case(0, 0, FormatTag::U8; "single zero point")]
    #[test_case(-1, 0, FormatTag::I8; "negative one forces signed")]
    #[test_case(-128, 127, FormatTag::I8; "exact signed 8 bounds")]
    #[test_case(-128, 128, FormatTag::I16; "one past signed 8 max")]
    #[test_case(-129, 127, FormatTag::I16; "one past signed 8 min")]
    #[test_case(-1, 32767, FormatTag::I16; "exact signed 16 max")]
    #[test_case(-1, 32769, FormatTag::I32; "negative range skips unsigned 16")]
    #[test_case(1, 32769, FormatTag::U16; "non-negative range stays unsigned 16")]
    #[test_case(0, 255, FormatTag::U8; "exact unsigned 8 max")]
    #[test_case(0, 256, FormatTag::U16; "one past unsigned 8 max")]
    #[test_case(0, 65_535, FormatTag::U16; "exact unsigned 16 max")]
    #[test_case(0, 65_536, FormatTag::U32; "one past unsigned 16 max")]
    #[test_case(-32_768, 0, FormatTag::I16; "exact signed 16 min")]
    #[test_case(-32_769, 0, FormatTag::I32; "one past signed 16 min")]
    #[test_case(0, u32::MAX as i128, FormatTag::U32; "exact unsigned 32 max")]
    #[test_case(0, u32::MAX as i128 + 1, FormatTag::U64; "one past unsigned 32 max")]
    #[test_case(i32::MIN as i128, i32::MAX as i128, FormatTag::I32; "exact signed 32 bounds")]
    #[test_case(i32::MIN as i128 - 1, 0, FormatTag::I64; "one past signed 32 min")]
    #[test_case(0, u64::MAX as i128, FormatTag::U64; "exact unsigned 64 max")]
    #[test_case(i64::MIN as i128, i64::MAX as i128, FormatTag::I64; "exact signed 64 bounds")]
    #[test_case(-1, i64::MAX as i128, FormatTag::I64; "negative range with signed 64 max")]
    #[test_case(1_000, 1_000, FormatTag::U16; "single point above unsigned 8")]
    fn selects_expected_format(min: i128, max: i128, expected: FormatTag) {
        assert_eq!(select_format(min, max), Ok(expected));
    }

    #[test_case(0, u64::MAX as i128 + 1; "one past unsigned 64 max")]
    #[test_case(i64::MIN as i128 - 1, 0; "one past signed 64 min")]
    #[test_case(-1, u64::MAX as i128; "negative range with unsigned 64 max")]
    #[test_case(i128::MIN, i128::MAX; "full 128-bit range")]
    fn rejects_ranges_beyond_64_bits(min: i128, max: i128) {
        assert!(matches!(
            select_format(min, max),
            Err(SelectError::RangeUnsupported { .. })
        ));
    }

    #[test]
    fn bounds_are_not_limited_to_native_widths() {
        let huge = BigInt::from(u128::MAX) * BigInt::from(u128::MAX);
        let err = select_format(0, huge.clone()).unwrap_err();
        assert_eq!(err, SelectError::RangeUnsupported { min: BigInt::from(0), max: huge.clone() });

        let err = select_format(-huge.clone(), 0).unwrap_err();
        assert!(matches!(err, SelectError::RangeUnsupported { .. }));
    }

    #[test]
    fn positive_ranges_climb_the_unsigned_ladder() {
        let ladder: Vec<FormatTag> = [1, 255, 256, 65_535, 65_536, u32::MAX as i128, u32::MAX as i128 + 1]
            .into_iter()
            .map(|max| select_format(1, max).unwrap())
            .collect();

        assert_eq!(
            ladder,
            [
                FormatTag::U8,
                FormatTag::U8,
                FormatTag::U16,
                FormatTag::U16,
                FormatTag::U32,
                FormatTag::U32,
                FormatTag::U64,
            ]
        );
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = select_format(10, -10).unwrap_err();
        assert_eq!(
            err,
            SelectError::InvertedRange { min: BigInt::from(10), max: BigInt::from(-10) }
        );
    }

    #[test_case(&[] as &[i64], FormatTag::U8; "empty slice")]
    #[test_case(&[3, 200, 17], FormatTag::U8; "small unsigned")]
    #[test_case(&[3, -200, 17], FormatTag::I16; "negative magnitude past signed 8")]
    #[test_case(&[70_000, 1], FormatTag::U32; "unsorted values")]
    #[test_case(&[i64::MIN, i64::MAX], FormatTag::I64; "full signed 64")]
    fn selects_from_values(values: &[i64], expected: FormatTag) {
        assert_eq!(select_for_values(values), Ok(expected));
    }

    #[test]
    fn selects_from_unsigned_values() {
        assert_eq!(select_for_values(&[u64::MAX, 0]), Ok(FormatTag::U64));
    }

    proptest! {
        #[test]
        fn widening_never_selects_a_narrower_format(
            min in i64::MIN..=0i64,
            max in 0..=i64::MAX,
            widen_low in 0..=u32::MAX,
            widen_high in 0..=u32::MAX,
        ) {
            let narrow = select_format(min, max).unwrap();
            let wide_min = i128::from(min) - i128::from(widen_low);
            let wide_max = i128::from(max) + i128::from(widen_high);

            match select_format(wide_min, wide_max) {
                Ok(wide) => {
                    assert_ge!(wide, narrow);
                    assert_ge!(wide.spec().byte_width, narrow.spec().byte_width);
                    if min < 0 {
                        prop_assert!(wide.spec().signed);
                    }
                }
                Err(err) => {
                    let unsupported = matches!(err, SelectError::RangeUnsupported { .. });
                    prop_assert!(unsupported);
                }
            }
        }

        #[test]
        fn growing_a_positive_range_widens_unsigned(
            min in 0..=u64::MAX,
            span in 0..=u64::MAX,
            growth in 0..=u64::MAX,
        ) {
            let max = i128::from(min) + i128::from(span);
            let grown = max + i128::from(growth);

            match (select_format(min, max), select_format(min, grown)) {
                (Ok(narrow), Ok(wide)) => {
                    prop_assert!(!narrow.spec().signed);
                    prop_assert!(!wide.spec().signed);
                    assert_ge!(wide.spec().byte_width, narrow.spec().byte_width);
                }
                (Ok(_), Err(err)) => {
                    let unsupported = matches!(err, SelectError::RangeUnsupported { .. });
                    prop_assert!(unsupported);
                    prop_assert!(grown > i128::from(u64::MAX));
                }
                (Err(_), Ok(wide)) => prop_assert!(false, "{wide} selected for a wider range"),
                (Err(_), Err(_)) => prop_assert!(max > i128::from(u64::MAX)),
            }
        }

        #[test]
        fn selected_format_is_the_first_fit(min in any::<i64>(), span in any::<u32>()) {
            let max = i128::from(min) + i128::from(span);
            let tag = select_format(min, max).unwrap();
            let spec = tag.spec();
            prop_assert!(spec.contains(i128::from(min)) && spec.contains(max));

            for earlier in &CATALOG[..tag.position()] {
                prop_assert!(!(earlier.contains(i128::from(min)) && earlier.contains(max)));
            }
        }
    }
}
