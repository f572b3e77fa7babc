//! Telemetry chunk parsing
//!
//! A DJI overlay chunk looks like
//!
//! ```text
//! 12
//! 00:00:11,000 --> 00:00:12,000
//! HOME(8.6620,47.3815) 2018.05.01 12:00:11
//! GPS(8.6625,47.3818,16) BAROMETER:70.6 ISO:100
//! ```
//!
//! [`tokenize_chunk`] splits it into raw text fields, [`SrtChunk::parse`]
//! turns those into typed values and [`SrtChunk::to_track_point`] resolves the
//! final [`TrackPoint`].

use crate::conversion::{format_video_offset, parse_local_datetime, parse_video_time};
use crate::error::{ChunkError, Result, SrtError};
use crate::options::ConvertOptions;
use crate::parser::cursor::SrtCursor;
use crate::types::{Extensions, TrackPoint};
use chrono::{NaiveDateTime, NaiveTime};
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

/// `key: value` pairs in the free text after `GPS(...)`
const EXTENSION_PAIR_PATTERN: &str = r"(\w+):\s?(\S+)";

/// Raw text fields of one chunk, borrowed from the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChunk<'a> {
    pub sequence: &'a str,
    pub video_begin: &'a str,
    pub video_end: &'a str,
    pub home_longitude: &'a str,
    pub home_latitude: &'a str,
    pub local_time: &'a str,
    pub gps: &'a str,
    pub metadata: &'a str,
}

fn is_video_time_char(c: char) -> bool {
    c.is_ascii_digit() || c == ':' || c == ','
}

/// Match one chunk against the overlay layout, field by field.
pub fn tokenize_chunk(text: &str) -> std::result::Result<RawChunk<'_>, ChunkError> {
    let mut cursor = SrtCursor::new(text);

    let sequence = cursor
        .read_while(|c| c.is_ascii_digit())
        .ok_or(ChunkError::MissingSequence)?;
    if !cursor.skip_whitespace() {
        return Err(ChunkError::MissingSeparator("sequence number"));
    }

    let video_begin = cursor
        .read_while(is_video_time_char)
        .ok_or(ChunkError::MissingVideoTime)?;
    if !cursor.expect(" --> ") {
        return Err(ChunkError::MissingArrow);
    }
    let video_end = cursor
        .read_while(is_video_time_char)
        .ok_or(ChunkError::MissingVideoTime)?;
    if !cursor.skip_whitespace() {
        return Err(ChunkError::MissingSeparator("video time"));
    }

    if !cursor.expect("HOME(") {
        return Err(ChunkError::MissingHome);
    }
    let home = cursor.read_until(')').ok_or(ChunkError::MissingHome)?;
    let (home_longitude, home_latitude) = match home.split(',').collect::<Vec<_>>()[..] {
        [lon, lat] => (lon, lat),
        _ => return Err(ChunkError::InvalidHome(home.to_string())),
    };
    if !cursor.expect(" ") {
        return Err(ChunkError::MissingSeparator("HOME"));
    }

    let local_start = cursor.pos;
    cursor
        .read_while(|c| c.is_ascii_digit() || c == '.')
        .ok_or(ChunkError::MissingLocalTime)?;
    if !cursor.expect(" ") {
        return Err(ChunkError::MissingLocalTime);
    }
    cursor
        .read_while(|c| c.is_ascii_digit() || c == ':')
        .ok_or(ChunkError::MissingLocalTime)?;
    let local_time = &text[local_start..cursor.pos];
    if !cursor.skip_whitespace() {
        return Err(ChunkError::MissingSeparator("local time"));
    }

    if !cursor.expect("GPS(") {
        return Err(ChunkError::MissingGps);
    }
    let gps = cursor.read_until(')').ok_or(ChunkError::MissingGps)?;

    let metadata = if cursor.is_eof() {
        ""
    } else if cursor.skip_one_whitespace() {
        cursor.read_to_end()
    } else {
        return Err(ChunkError::MissingSeparator("GPS"));
    };

    Ok(RawChunk {
        sequence,
        video_begin,
        video_end,
        home_longitude,
        home_latitude,
        local_time,
        gps,
        metadata,
    })
}

/// One parsed telemetry record
#[derive(Debug, Clone, PartialEq)]
pub struct SrtChunk {
    /// 1-based position in the file, used in diagnostics
    pub index: usize,
    pub sequence: u64,
    pub video_begin: NaiveTime,
    pub video_end: NaiveTime,
    /// Home point kept as written, to preserve its precision
    pub home_longitude: String,
    pub home_latitude: String,
    /// Wall-clock recording time, timezone not yet known
    pub local_time: NaiveDateTime,
    pub longitude: f64,
    pub latitude: f64,
    pub elevation: f64,
    /// Free text after `GPS(...)`
    pub metadata: String,
}

impl RawChunk<'_> {
    /// Sequence number as written at the top of the chunk
    pub fn sequence_number(&self) -> std::result::Result<u64, ChunkError> {
        self.sequence
            .parse::<u64>()
            .map_err(|_| ChunkError::InvalidSequence(self.sequence.to_string()))
    }
}

fn malformed(index: usize, reason: ChunkError) -> SrtError {
    SrtError::MalformedChunk {
        chunk: index,
        reason,
    }
}

impl SrtChunk {
    /// Parse chunk number `index` (1-based)
    pub fn parse(text: &str, index: usize) -> Result<Self> {
        let raw = tokenize_chunk(text).map_err(|reason| malformed(index, reason))?;
        Self::from_raw(&raw, index)
    }

    /// Convert tokenized fields into typed values
    pub fn from_raw(raw: &RawChunk<'_>, index: usize) -> Result<Self> {
        let sequence = raw
            .sequence_number()
            .map_err(|reason| malformed(index, reason))?;

        let invalid_time = |field: &'static str, value: &str| SrtError::InvalidTimestamp {
            chunk: index,
            field,
            value: value.to_string(),
        };
        let video_begin = parse_video_time(raw.video_begin)
            .ok_or_else(|| invalid_time("video begin time", raw.video_begin))?;
        let video_end = parse_video_time(raw.video_end)
            .ok_or_else(|| invalid_time("video end time", raw.video_end))?;
        let local_time = parse_local_datetime(raw.local_time)
            .ok_or_else(|| invalid_time("local time", raw.local_time))?;

        let coords = raw
            .gps
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| malformed(index, ChunkError::InvalidGps(raw.gps.to_string())))?;
        let (longitude, latitude, elevation) = match coords[..] {
            [lon, lat, ele] => (lon, lat, ele),
            _ => return Err(malformed(index, ChunkError::InvalidGps(raw.gps.to_string()))),
        };

        Ok(Self {
            index,
            sequence,
            video_begin,
            video_end,
            home_longitude: raw.home_longitude.to_string(),
            home_latitude: raw.home_latitude.to_string(),
            local_time,
            longitude,
            latitude,
            elevation,
            metadata: raw.metadata.to_string(),
        })
    }

    /// DJI metadata of this chunk plus the synthetic video and home keys
    pub fn extensions(&self) -> Extensions {
        let mut extensions = extract_extension_pairs(&self.metadata);
        if extensions.is_empty() && !self.metadata.trim().is_empty() {
            debug!(
                "chunk #{}: no key: value pairs in metadata {:?}",
                self.index,
                self.metadata.trim()
            );
        }

        extensions.insert("video_begin", format_video_offset(&self.video_begin));
        extensions.insert("video_end", format_video_offset(&self.video_end));
        extensions.insert("home_lon", self.home_longitude.as_str());
        extensions.insert("home_lat", self.home_latitude.as_str());
        extensions
    }

    /// Build the track point, resolving the local time through `options.timezone`
    pub fn to_track_point(&self, options: &ConvertOptions) -> Result<TrackPoint> {
        let timestamp = options.timezone.resolve(&self.local_time).ok_or_else(|| {
            SrtError::InvalidTimestamp {
                chunk: self.index,
                field: "local time",
                value: self.local_time.to_string(),
            }
        })?;

        let mut point = TrackPoint::new(self.longitude, self.latitude)
            .with_elevation(self.elevation)
            .with_timestamp(timestamp);
        if options.extensions {
            point = point.with_extensions(self.extensions());
        }
        Ok(point)
    }
}

fn extension_pair_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(EXTENSION_PAIR_PATTERN).expect("valid extension pattern"))
}

/// Collect every `key: value` occurrence; a repeated key keeps its last value.
/// Text that does not look like a pair is skipped.
pub fn extract_extension_pairs(metadata: &str) -> Extensions {
    extension_pair_regex()
        .captures_iter(metadata)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}
