//! SMPTE and clock-time time codes.
//!
//! Frame-based codes carry their frame rate; a denominator of 1001 marks
//! drop-frame counting, with the SMPTE skip rule (two frame numbers dropped
//! every minute except every tenth minute at 29.97 fps).

use std::fmt;

use crate::error::Error;
use crate::times::{offset_from_frames, FrameRate, TimeOffset};

/// A frame-based SMPTE time code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmpteTimeCode {
    hours: u32,
    minutes: u32,
    seconds: u32,
    frames: u32,
    frame_rate: FrameRate,
}

fn ceil_fps(rate: FrameRate) -> i64 {
    (rate.numer() + rate.denom() - 1) / rate.denom()
}

/// Frames dropped per minute by the skip rule, e.g. 2 at 29.97 fps.
fn drop_frames_per_minute(rate: FrameRate) -> i64 {
    let ndf = FrameRate::from_integer(ceil_fps(rate));
    (FrameRate::from_integer(60) * (ndf - rate)).round().to_integer()
}

impl SmpteTimeCode {
    pub fn new(hours: u32, minutes: u32, seconds: u32, frames: u32, frame_rate: FrameRate) -> Self {
        Self { hours, minutes, seconds, frames, frame_rate }
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    pub fn is_drop_frame(&self) -> bool {
        *self.frame_rate.denom() == 1001
    }

    /// Parses `HH:MM:SS:FF` (non-drop) or `HH:MM:SS;FF` (drop-frame, also
    /// accepting `;`, `.` or `,` in any separator position).
    ///
    /// `base_frame_rate` applies to the non-drop form; the drop-frame form
    /// uses `base * 1000/1001` unless the base already carries it.
    pub fn parse(text: &str, base_frame_rate: FrameRate) -> Result<Self, Error> {
        let bytes = text.as_bytes();
        if bytes.len() != 11 || !text.is_ascii() {
            return Err(Error::Parse(format!("invalid time code: {text}")));
        }

        let mut fields = [0u32; 4];
        let mut drop_frame = false;
        for (i, field) in fields.iter_mut().enumerate() {
            let start = i * 3;
            let digits = &text[start..start + 2];
            *field = digits
                .parse()
                .map_err(|_| Error::Parse(format!("invalid time code: {text}")))?;
            if i < 3 {
                match bytes[start + 2] {
                    b':' => {}
                    b';' | b'.' | b',' => drop_frame = true,
                    _ => return Err(Error::Parse(format!("invalid time code: {text}"))),
                }
            }
        }

        let frame_rate = if drop_frame && *base_frame_rate.denom() != 1001 {
            base_frame_rate * FrameRate::new(1000, 1001)
        } else {
            base_frame_rate
        };

        Ok(Self::new(fields[0], fields[1], fields[2], fields[3], frame_rate))
    }

    /// Total frame count, accounting for dropped frame numbers.
    pub fn to_frames(&self) -> i64 {
        let mut dropped = 0i64;

        if self.is_drop_frame() {
            let per_minute = drop_frames_per_minute(self.frame_rate);
            let minute_tens = i64::from(self.hours) * 6 + i64::from(self.minutes / 10);
            let remaining_minutes = i64::from(self.minutes % 10);
            dropped = per_minute * 9 * minute_tens + per_minute * remaining_minutes;
        }

        let fps = if self.is_drop_frame() {
            ceil_fps(self.frame_rate)
        } else {
            self.frame_rate.to_integer()
        };

        let elapsed =
            i64::from(self.hours) * 3600 + i64::from(self.minutes) * 60 + i64::from(self.seconds);

        elapsed * fps + i64::from(self.frames) - dropped
    }

    /// Exact offset in seconds.
    pub fn to_temporal_offset(&self) -> TimeOffset {
        offset_from_frames(self.to_frames(), self.frame_rate)
    }

    pub fn add_frames(&mut self, count: i64) {
        let total = self.to_frames() + count;
        *self = Self::from_frames(total, self.frame_rate);
    }

    /// Builds a time code from a total frame count.
    pub fn from_frames(frame_count: i64, frame_rate: FrameRate) -> Self {
        let mut frames = frame_count;
        let drop_frame = *frame_rate.denom() == 1001;

        if drop_frame {
            let per_minute = drop_frames_per_minute(frame_rate);
            let frames_per_minute = FrameRate::from_integer(60) * frame_rate;
            let frames_per_ten_minutes =
                (FrameRate::from_integer(10) * frames_per_minute).round().to_integer();
            let frames_per_minute = frames_per_minute.round().to_integer();

            let minute_tens = frames / frames_per_ten_minutes;
            let remaining = frames % frames_per_ten_minutes;

            let drop_in_tens = per_minute * 9 * minute_tens;
            let remaining_minutes = ((remaining - per_minute) / frames_per_minute).max(0);

            frames += drop_in_tens + remaining_minutes * per_minute;
        }

        let fps = ceil_fps(frame_rate);

        Self {
            hours: (frames / (3600 * fps)) as u32,
            minutes: ((frames / (60 * fps)) % 60) as u32,
            seconds: ((frames / fps) % 60) as u32,
            frames: (frames % fps) as u32,
            frame_rate,
        }
    }
}

impl fmt::Display for SmpteTimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.is_drop_frame() { ';' } else { ':' };
        write!(
            f,
            "{:02}:{:02}:{:02}{}{:02}",
            self.hours, self.minutes, self.seconds, sep, self.frames
        )
    }
}

/// A millisecond-based wall-clock time code (`HH:MM:SS.mmm`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockTime {
    hours: u32,
    minutes: u32,
    seconds: u32,
    milliseconds: u32,
}

impl ClockTime {
    pub fn new(hours: u32, minutes: u32, seconds: u32, milliseconds: u32) -> Self {
        Self { hours, minutes, seconds, milliseconds }
    }

    pub fn milliseconds(&self) -> u32 {
        self.milliseconds
    }

    /// Builds a clock time from an offset in seconds, rounding to the
    /// nearest millisecond.
    pub fn from_seconds(seconds: f64) -> Self {
        let total_ms = (seconds * 1000.0).round().max(0.0) as u64;
        Self {
            hours: (total_ms / 3_600_000) as u32,
            minutes: ((total_ms / 60_000) % 60) as u32,
            seconds: ((total_ms / 1000) % 60) as u32,
            milliseconds: (total_ms % 1000) as u32,
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            self.hours, self.minutes, self.seconds, self.milliseconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::times::{offset_from_ratio, FPS_29_97, FPS_30};

    #[test]
    fn parses_non_drop_frame() {
        let tc = SmpteTimeCode::parse("00:00:00:22", FPS_30).unwrap();
        assert_eq!(tc.frames(), 22);
        assert!(!tc.is_drop_frame());
        assert_eq!(tc.to_temporal_offset(), offset_from_ratio(22, 30));
    }

    #[test]
    fn parses_drop_frame_with_semicolon() {
        let tc = SmpteTimeCode::parse("00:01:00;02", FPS_30).unwrap();
        assert!(tc.is_drop_frame());
        assert_eq!(tc.frame_rate(), FPS_29_97);
        // The first two frame numbers of every non-tenth minute are skipped.
        assert_eq!(tc.to_frames(), 1800);
    }

    #[test]
    fn drop_frame_round_trips_at_minute_boundaries(){
        for frames in [0, 1799, 1800, 17981, 17982, 17983, 107_891] {
            let tc = SmpteTimeCode::from_frames(frames, FPS_29_97);
            assert_eq!(tc.to_frames(), frames, "at {tc}");
        }
    }

    #[test]
    fn drop_frame_skips_invalid_frame_numbers() {
        // 00:00:59;29 + 1 frame lands on 00:01:00;02, not ;00.
        let mut tc = SmpteTimeCode::from_frames(1799, FPS_29_97);
        tc.add_frames(1);
        assert_eq!(tc.to_string(), "00:01:00;02");
    }

    #[test]
    fn rejects_malformed_time_codes() {
        assert!(SmpteTimeCode::parse("0:00:00:22", FPS_30).is_err());
        assert!(SmpteTimeCode::parse("00-00-00-22", FPS_30).is_err());
        assert!(SmpteTimeCode::parse("00:00:xx:22", FPS_30).is_err());
    }

    #[test]
    fn clock_time_formats_milliseconds() {
        let ct = ClockTime::from_seconds(3661.5);
        assert_eq!(ct.to_string(), "01:01:01.500");
    }
}
