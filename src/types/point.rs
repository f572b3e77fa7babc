use chrono::{DateTime, FixedOffset};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Vendor metadata attached to a single point, in insertion order.
///
/// Inserting a key that is already present replaces its value but keeps its
/// original position, so output order follows first appearance.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Extensions {
    entries: Vec<(String, String)>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Extensions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut extensions = Extensions::new();
        for (key, value) in iter {
            extensions.insert(key, value);
        }
        extensions
    }
}

impl fmt::Display for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

/// One geographic sample: aircraft position at one video frame
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackPoint {
    pub longitude: f64,
    pub latitude: f64,
    /// Meters; omitted from GPX when absent or zero
    pub elevation: Option<f64>,
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub extensions: Extensions,
}

impl TrackPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            elevation: None,
            timestamp: None,
            extensions: Extensions::new(),
        }
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    /// Elevation to write, `None` when it is absent or exactly zero
    pub fn output_elevation(&self) -> Option<f64> {
        self.elevation.filter(|&e| e != 0.0)
    }
}

impl fmt::Display for TrackPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.timestamp {
            Some(t) => write!(f, "{}", t)?,
            None => write!(f, "-")?,
        }
        write!(
            f,
            "\t({:.6},{:.6},{:.6})\n{}",
            self.longitude,
            self.latitude,
            self.elevation.unwrap_or_default(),
            self.extensions
        )
    }
}
