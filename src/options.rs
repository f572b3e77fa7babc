//! Conversion configuration
//!
//! [`ConvertOptions`] collects everything a conversion run needs besides the
//! input text: whether DJI metadata is emitted, how local timestamps are
//! interpreted and where the output file goes.

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Timezone used to interpret the naive recording timestamps of an SRT file.
///
/// DJI aircraft stamp frames with the wall clock of the paired phone or
/// controller, without an offset. The recording timezone cannot be detected,
/// so it is configured explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputTimezone {
    /// Timezone of the system running the conversion
    #[default]
    Local,
    /// Fixed offset east of UTC
    Fixed(FixedOffset),
}

impl InputTimezone {
    pub fn utc() -> Self {
        InputTimezone::Fixed(Utc.fix())
    }

    /// Resolve a naive wall-clock time to an absolute instant.
    ///
    /// Ambiguous times (clock set back) resolve to the earlier instant.
    /// Returns `None` for wall-clock times skipped by a DST transition.
    pub fn resolve(&self, local: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            InputTimezone::Local => earliest(chrono::Local.from_local_datetime(local))
                .map(|t| t.fixed_offset()),
            InputTimezone::Fixed(offset) => earliest(offset.from_local_datetime(local)),
        }
    }
}

fn earliest<Tz: TimeZone>(result: LocalResult<DateTime<Tz>>) -> Option<DateTime<Tz>> {
    match result {
        LocalResult::Single(t) => Some(t),
        LocalResult::Ambiguous(earlier, _) => Some(earlier),
        LocalResult::None => None,
    }
}

impl fmt::Display for InputTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputTimezone::Local => write!(f, "local"),
            InputTimezone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

impl FromStr for InputTimezone {
    type Err = String;

    /// Accepts `local`, `utc`/`z` (case-insensitive) or an offset like `+02:00`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("local") {
            return Ok(InputTimezone::Local);
        }
        if s.eq_ignore_ascii_case("utc") || s.eq_ignore_ascii_case("z") {
            return Ok(InputTimezone::utc());
        }
        FixedOffset::from_str(s)
            .map(InputTimezone::Fixed)
            .map_err(|_| format!("invalid timezone '{}': expected local, utc or +HH:MM", s))
    }
}

/// Options controlling a conversion run
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Emit DJI metadata (exposure, barometer, ...) as GPX extensions
    pub extensions: bool,
    /// Timezone the SRT wall-clock timestamps were recorded in
    pub timezone: InputTimezone,
    /// Output directory, defaults to the input file's directory
    pub output_dir: Option<PathBuf>,
    /// Replace an existing output file instead of failing
    pub overwrite: bool,
}
