use crate::conversion::{sanitize_ascii, truncate_description};
use crate::error::{Result, SrtError};
use crate::types::TrackPoint;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_TRACK_NAME: &str = "Untitled";
pub const DEFAULT_DOCUMENT_NAME: &str = "output";

/// Ordered path of points from one continuous recording
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Track {
    name: String,
    description: Option<String>,
    points: Vec<TrackPoint>,
}

impl Track {
    /// Create a track; `name` is reduced to printable ASCII
    pub fn new(points: Vec<TrackPoint>, name: &str) -> Self {
        Self {
            name: sanitize_ascii(name),
            description: None,
            points,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Description as written to GPX, at most 50 characters
    pub fn display_description(&self) -> Option<String> {
        self.description
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(truncate_description)
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Check the at-least-one-point invariant
    pub fn validate(&self) -> Result<()> {
        if self.points.is_empty() {
            return Err(SrtError::EmptyTrack {
                track: self.name.clone(),
            });
        }
        Ok(())
    }
}

impl Default for Track {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_TRACK_NAME)
    }
}

/// In-memory GPX document: standalone waypoints followed by tracks
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpxDocument {
    name: String,
    waypoints: Vec<TrackPoint>,
    tracks: Vec<Track>,
}

impl GpxDocument {
    /// Create an empty document; `name` becomes the output file's base name
    pub fn new(name: &str) -> Self {
        Self {
            name: sanitize_ascii(name),
            waypoints: Vec::new(),
            tracks: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_point(&mut self, waypoint: TrackPoint) {
        self.waypoints.push(waypoint);
    }

    pub fn add_points(&mut self, waypoints: impl IntoIterator<Item = TrackPoint>) {
        self.waypoints.extend(waypoints);
    }

    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn waypoints(&self) -> &[TrackPoint] {
        &self.waypoints
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Whether any point in the document carries extensions
    pub fn has_extensions(&self) -> bool {
        self.waypoints
            .iter()
            .chain(self.tracks.iter().flat_map(|t| t.points.iter()))
            .any(|p| !p.extensions.is_empty())
    }

    /// Check every track before anything is written
    pub fn validate(&self) -> Result<()> {
        self.tracks.iter().try_for_each(Track::validate)
    }
}

impl Default for GpxDocument {
    fn default() -> Self {
        Self::new(DEFAULT_DOCUMENT_NAME)
    }
}
