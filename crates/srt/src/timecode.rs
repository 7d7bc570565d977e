//! SRT time expressions (`HH:MM:SS,mmm`).

use std::fmt;

use model::times::{offset_to_f64, TimeOffset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SrtTimeCode {
    hours: u32,
    minutes: u32,
    seconds: u32,
    milliseconds: u32,
}

impl SrtTimeCode {
    pub fn from_time_offset(offset: &TimeOffset) -> SrtTimeCode {
        let total_ms = (offset_to_f64(offset) * 1000.0).round().max(0.0) as u64;
        SrtTimeCode {
            hours: ((total_ms / 3_600_000) % 24) as u32,
            minutes: ((total_ms / 60_000) % 60) as u32,
            seconds: ((total_ms / 1000) % 60) as u32,
            milliseconds: (total_ms % 1000) as u32,
        }
    }
}

impl fmt::Display for SrtTimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02},{:03}",
            self.hours, self.minutes, self.seconds, self.milliseconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::times::offset_from_millis;

    #[test]
    fn formats_milliseconds() {
        let tc = SrtTimeCode::from_time_offset(&offset_from_millis(3_661_500));
        assert_eq!(tc.to_string(), "01:01:01,500");
    }
}
