//! SRT to GPX Library
//!
//! A Rust library for converting the subtitle telemetry (`.srt`) that DJI
//! drones record next to their videos into GPX 1.1 tracks.
//! This library provides both in-memory data access and file export.
//!
//! # Features
//!
//! - **`cli`** (default): Build the `srt2gpx` command-line binary
//! - **`serde`**: Enable serialization/deserialization of model types
//!
//! # Quick Start
//!
//! Parse telemetry and inspect the points:
//! ```rust
//! use srt2gpx::{parse_track_points, ConvertOptions, InputTimezone};
//!
//! let srt = "1\n00:00:00,000 --> 00:00:01,000\n\
//!            HOME(8.6620,47.3815) 2018.05.01 12:00:00\n\
//!            GPS(8.6625,47.3818,16) ISO:100\n\n\n";
//! let options = ConvertOptions {
//!     timezone: InputTimezone::utc(),
//!     ..Default::default()
//! };
//! let points = parse_track_points(srt, &options).unwrap();
//! assert_eq!(points.len(), 1);
//! assert_eq!(points[0].elevation, Some(16.0));
//! ```
//!
//! Convert a file next to its input:
//! ```rust,no_run
//! use srt2gpx::{convert_srt_file, ConvertOptions};
//! use std::path::Path;
//!
//! let options = ConvertOptions {
//!     extensions: true,
//!     ..Default::default()
//! };
//! let gpx_path = convert_srt_file(Path::new("DJI_0001.SRT"), &options).unwrap();
//! println!("Exported to: {}", gpx_path.display());
//! ```
//!
//! # Public API
//!
//! ## Parsing Functions
//! - [`parse_srt_file`] - Read an SRT file into track points
//! - [`parse_track_points`] - Parse SRT text into track points
//! - [`parse_srt_str`] - Parse SRT text into typed chunks
//! - [`split_chunks`] - Split SRT text into raw chunks
//! - [`tokenize_chunk`] - Match one chunk field by field
//!
//! ## Data Types
//! - [`TrackPoint`] - One position sample with optional DJI metadata
//! - [`Track`] - Named, ordered list of points
//! - [`GpxDocument`] - Waypoints and tracks forming one GPX file
//! - [`ConvertOptions`] - Configuration for a conversion run
//! - [`InputTimezone`] - Timezone of the SRT wall-clock timestamps
//!
//! ## Export Functions
//! - [`convert_srt_file`] - SRT file in, GPX file out
//! - [`export_to_gpx`] - Write a document to disk
//! - [`write_gpx`] - Serialize a document into any writer
//! - [`compute_export_paths`] - Output directory and name for an input path

pub mod conversion;
pub mod error;
pub mod export;
pub mod options;
pub mod parser;
pub mod types;

pub use conversion::*;
pub use error::*;
pub use export::*;
pub use options::*;
pub use parser::*;
pub use types::*;
