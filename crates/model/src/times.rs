//! Exact temporal arithmetic.
//!
//! All internal time offsets are non-negative rational seconds with
//! arbitrary-precision terms. Frame rates are small rationals; conversion
//! to and from frame counts happens only at format boundaries.

use num_bigint::BigInt;
use num_rational::{BigRational, Ratio};

/// A temporal offset in seconds.
pub type TimeOffset = BigRational;

/// A video frame rate in frames per second.
pub type FrameRate = Ratio<i64>;

pub const FPS_23_98: FrameRate = FrameRate::new_raw(24000, 1001);
pub const FPS_24: FrameRate = FrameRate::new_raw(24, 1);
pub const FPS_25: FrameRate = FrameRate::new_raw(25, 1);
pub const FPS_29_97: FrameRate = FrameRate::new_raw(30000, 1001);
pub const FPS_30: FrameRate = FrameRate::new_raw(30, 1);
pub const FPS_50: FrameRate = FrameRate::new_raw(50, 1);
pub const FPS_59_94: FrameRate = FrameRate::new_raw(60000, 1001);
pub const FPS_60: FrameRate = FrameRate::new_raw(60, 1);

/// Builds an offset of `seconds` whole seconds.
pub fn offset_from_secs(seconds: i64) -> TimeOffset {
    BigRational::from_integer(BigInt::from(seconds))
}

/// Builds the offset `num/den` seconds.
pub fn offset_from_ratio(num: i64, den: i64) -> TimeOffset {
    BigRational::new(BigInt::from(num), BigInt::from(den))
}

/// Builds an offset from a whole-millisecond count.
pub fn offset_from_millis(millis: i64) -> TimeOffset {
    BigRational::new(BigInt::from(millis), BigInt::from(1000))
}

/// Converts a frame count at `rate` into a temporal offset.
pub fn offset_from_frames(frames: i64, rate: FrameRate) -> TimeOffset {
    BigRational::new(
        BigInt::from(frames) * BigInt::from(*rate.denom()),
        BigInt::from(*rate.numer()),
    )
}

/// Approximates an offset as `f64` seconds, for formatting and logs.
pub fn offset_to_f64(offset: &TimeOffset) -> f64 {
    use num_traits::ToPrimitive;
    offset.to_f64().unwrap_or(0.0)
}

/// Number of whole frames at `rate` elapsed at `offset`, rounding down.
pub fn offset_to_frames(offset: &TimeOffset, rate: FrameRate) -> i64 {
    use num_traits::ToPrimitive;
    let frames = offset
        * BigRational::new(BigInt::from(*rate.numer()), BigInt::from(*rate.denom()));
    frames.floor().to_integer().to_i64().unwrap_or(0)
}
