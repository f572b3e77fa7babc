use std::fmt;

/// Field of a chunk that did not match the expected layout.
///
/// Returned by the chunk tokenizer so callers can tell which part of a
/// record was broken without inspecting match positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    /// No leading sequence number
    MissingSequence,
    /// Sequence number too large to count
    InvalidSequence(String),
    /// Start or end video time absent or not made of `[0-9:,]`
    MissingVideoTime,
    /// The ` --> ` token between start and end time
    MissingArrow,
    /// `HOME(lon,lat)` absent or unterminated
    MissingHome,
    /// `HOME(...)` does not hold exactly two comma separated values
    InvalidHome(String),
    /// Local recording date/time absent
    MissingLocalTime,
    /// `GPS(lon,lat,ele)` absent or unterminated
    MissingGps,
    /// `GPS(...)` does not hold three numbers
    InvalidGps(String),
    /// Required whitespace between two fields is absent
    MissingSeparator(&'static str),
}

impl fmt::Display for ChunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkError::MissingSequence => write!(f, "missing sequence number"),
            ChunkError::InvalidSequence(raw) => write!(f, "invalid sequence number {}", raw),
            ChunkError::MissingVideoTime => write!(f, "missing video time"),
            ChunkError::MissingArrow => write!(f, "missing ' --> ' between video times"),
            ChunkError::MissingHome => write!(f, "missing HOME(lon,lat)"),
            ChunkError::InvalidHome(raw) => write!(f, "invalid HOME({})", raw),
            ChunkError::MissingLocalTime => write!(f, "missing local date and time"),
            ChunkError::MissingGps => write!(f, "missing GPS(lon,lat,ele)"),
            ChunkError::InvalidGps(raw) => write!(f, "invalid GPS({})", raw),
            ChunkError::MissingSeparator(after) => write!(f, "missing separator after {}", after),
        }
    }
}

impl std::error::Error for ChunkError {}

/// Custom error types for SRT conversion
#[derive(Debug)]
pub enum SrtError {
    /// A chunk does not match the telemetry block layout
    MalformedChunk { chunk: usize, reason: ChunkError },
    /// Chunk sequence number differs from the running counter
    InconsistentSequence { expected: u64, found: u64 },
    /// A time or date field does not parse under its format
    InvalidTimestamp {
        chunk: usize,
        field: &'static str,
        value: String,
    },
    /// A track has no points to serialize
    EmptyTrack { track: String },
    /// I/O errors
    Io(std::io::Error),
    /// XML writer errors
    Xml(quick_xml::Error),
}

impl fmt::Display for SrtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SrtError::MalformedChunk { chunk, reason } => {
                write!(f, "Malformed chunk #{}: {}", chunk, reason)
            }
            SrtError::InconsistentSequence { expected, found } => write!(
                f,
                "Inconsistent srt chunk number: expected {}, found {}",
                expected, found
            ),
            SrtError::InvalidTimestamp {
                chunk,
                field,
                value,
            } => write!(f, "Invalid {} '{}' in chunk #{}", field, value, chunk),
            SrtError::EmptyTrack { track } => {
                write!(f, "Track '{}' has no points", track)
            }
            SrtError::Io(err) => write!(f, "I/O error: {}", err),
            SrtError::Xml(err) => write!(f, "XML error: {}", err),
        }
    }
}

impl std::error::Error for SrtError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SrtError::MalformedChunk { reason, .. } => Some(reason),
            SrtError::Io(err) => Some(err),
            SrtError::Xml(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SrtError {
    fn from(err: std::io::Error) -> Self {
        SrtError::Io(err)
    }
}

impl From<quick_xml::Error> for SrtError {
    fn from(err: quick_xml::Error) -> Self {
        SrtError::Xml(err)
    }
}

pub type Result<T> = std::result::Result<T, SrtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_chunk_and_reason() {
        let err = SrtError::MalformedChunk {
            chunk: 3,
            reason: ChunkError::MissingArrow,
        };
        assert_eq!(
            err.to_string(),
            "Malformed chunk #3: missing ' --> ' between video times"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_sequence_error_message() {
        let err = SrtError::InconsistentSequence {
            expected: 2,
            found: 4,
        };
        assert!(err.to_string().contains("expected 2, found 4"));
    }
}
