//! Field conversion utilities for SRT telemetry
//!
//! Contains the fixed formats of the DJI overlay fields and the text
//! normalization applied to names and descriptions before they reach GPX.

use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Video-relative time of a subtitle cue, e.g. `00:01:05,000`
pub const VIDEO_TIME_FORMAT: &str = "%H:%M:%S,%3f";
/// Wall-clock recording time of a frame, e.g. `2018.05.01 12:00:00`
pub const LOCAL_DATETIME_FORMAT: &str = "%Y.%m.%d %H:%M:%S";
/// Minute:second offset written to the `video_begin`/`video_end` extensions
pub const VIDEO_OFFSET_FORMAT: &str = "%M:%S";
/// GPX `time` element format (always UTC)
pub const GPX_UTC_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Longest description written to GPX before truncation
pub const MAX_DESCRIPTION_CHARS: usize = 50;
const ELLIPSIS: char = '…';

/// Parse a subtitle cue time (`HH:MM:SS,mmm`)
pub fn parse_video_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, VIDEO_TIME_FORMAT).ok()
}

/// Format a cue time as `MM:SS`; hours and milliseconds are dropped
pub fn format_video_offset(time: &NaiveTime) -> String {
    time.format(VIDEO_OFFSET_FORMAT).to_string()
}

/// Parse the naive recording timestamp (`YYYY.MM.DD HH:MM:SS`)
pub fn parse_local_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, LOCAL_DATETIME_FORMAT).ok()
}

/// Format an instant for the GPX `time` element
pub fn format_gpx_time<Tz: TimeZone>(time: &DateTime<Tz>) -> String {
    time.with_timezone(&Utc)
        .format(GPX_UTC_DATETIME_FORMAT)
        .to_string()
}

/// Strip everything that is not printable ASCII.
///
/// Characters are dropped, never substituted: `Flügel` becomes `Flgel`.
pub fn sanitize_ascii(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect()
}

/// Shorten a description to [`MAX_DESCRIPTION_CHARS`] characters.
///
/// Longer text keeps its first 49 characters followed by `…`.
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        let mut short: String = description
            .chars()
            .take(MAX_DESCRIPTION_CHARS - 1)
            .collect();
        short.push(ELLIPSIS);
        short
    } else {
        description.to_string()
    }
}
