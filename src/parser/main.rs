use crate::error::{Result, SrtError};
use crate::options::ConvertOptions;
use crate::parser::chunk::{tokenize_chunk, SrtChunk};
use crate::types::TrackPoint;
use log::debug;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Blank-line separator between subtitle blocks
const CHUNK_SEPARATOR_PATTERN: &str = r"\s{3,}";

fn chunk_separator() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(CHUNK_SEPARATOR_PATTERN).expect("valid separator pattern"))
}

/// Split SRT text into chunks on runs of three or more whitespace characters.
///
/// Splitting stops at the first empty chunk, which drops the empty tail left
/// by trailing blank lines.
pub fn split_chunks(text: &str) -> Vec<&str> {
    chunk_separator()
        .split(text)
        .take_while(|chunk| !chunk.is_empty())
        .collect()
}

/// Parse all chunks of an SRT text, checking that sequence numbers run 1, 2, 3...
pub fn parse_srt_str(text: &str) -> Result<Vec<SrtChunk>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut expected_sequence = 1u64;
    let mut chunks = Vec::new();

    for (i, chunk_text) in split_chunks(text).into_iter().enumerate() {
        let index = i + 1;
        let raw = tokenize_chunk(chunk_text).map_err(|reason| SrtError::MalformedChunk {
            chunk: index,
            reason,
        })?;

        // Numbering is checked before any field is converted
        if let Ok(found) = raw.sequence_number() {
            if found != expected_sequence {
                return Err(SrtError::InconsistentSequence {
                    expected: expected_sequence,
                    found,
                });
            }
        }

        chunks.push(SrtChunk::from_raw(&raw, index)?);
        expected_sequence += 1;
    }

    debug!("Parsed {} chunks", chunks.len());
    Ok(chunks)
}

/// Parse SRT text into track points, one per chunk, in input order
pub fn parse_track_points(text: &str, options: &ConvertOptions) -> Result<Vec<TrackPoint>> {
    parse_srt_str(text)?
        .iter()
        .map(|chunk| chunk.to_track_point(options))
        .collect()
}

/// Read a whole SRT file and parse it into track points
pub fn parse_srt_file(file_path: &Path, options: &ConvertOptions) -> Result<Vec<TrackPoint>> {
    debug!("Reading SRT file: {:?}", file_path);
    let text = std::fs::read_to_string(file_path)?;
    debug!("File size: {} bytes", text.len());

    parse_track_points(&text, options)
}
