//! Export functionality for parsed SRT tracks
//!
//! Serializes a [`GpxDocument`] as GPX 1.1 and writes it next to the input
//! file (or into a configured output directory).

use crate::conversion::{format_gpx_time, sanitize_ascii};
use crate::error::Result;
use crate::options::ConvertOptions;
use crate::parser::parse_srt_file;
use crate::types::*;
use log::{debug, info, warn};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const GPX_VERSION: &str = "1.1";
pub const GPX_CREATOR: &str = "DJI SRT converter";
pub const GPX_NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";
/// Prefix of the per-point DJI metadata elements
pub const DJI_PREFIX: &str = "dji";
pub const DJI_NAMESPACE: &str = "http://www.dji.com/srt/gpx-extensions";
pub const GPX_FILE_EXTENSION: &str = "gpx";

/// Serialize `document` as a complete GPX file into `sink`.
///
/// The document is validated first, so an empty track fails before any byte
/// is written.
pub fn write_gpx<W: Write>(document: &GpxDocument, sink: W) -> Result<()> {
    document.validate()?;

    let mut writer = Writer::new_with_indent(sink, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("gpx");
    root.push_attribute(("version", GPX_VERSION));
    root.push_attribute(("creator", GPX_CREATOR));
    root.push_attribute(("xmlns", GPX_NAMESPACE));
    if document.has_extensions() {
        root.push_attribute((format!("xmlns:{}", DJI_PREFIX).as_str(), DJI_NAMESPACE));
    }
    writer.write_event(Event::Start(root))?;

    for waypoint in document.waypoints() {
        write_point(&mut writer, "wpt", waypoint)?;
    }
    for track in document.tracks() {
        write_track(&mut writer, track)?;
    }

    writer.write_event(Event::End(BytesEnd::new("gpx")))?;

    let mut sink = writer.into_inner();
    sink.write_all(b"\n")?;
    sink.flush()?;
    Ok(())
}

/// `trk` > `trkseg` > `trkpt`*, followed by the track's `name` and `desc`
fn write_track<W: Write>(writer: &mut Writer<W>, track: &Track) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("trk")))?;
    writer.write_event(Event::Start(BytesStart::new("trkseg")))?;
    for point in track.points() {
        write_point(writer, "trkpt", point)?;
    }
    writer.write_event(Event::End(BytesEnd::new("trkseg")))?;

    write_text_element(writer, "name", track.name())?;
    if let Some(description) = track.display_description() {
        write_text_element(writer, "desc", &description)?;
    }

    writer.write_event(Event::End(BytesEnd::new("trk")))?;
    Ok(())
}

fn write_point<W: Write>(writer: &mut Writer<W>, tag: &str, point: &TrackPoint) -> Result<()> {
    let mut start = BytesStart::new(tag);
    start.push_attribute(("lat", point.latitude.to_string().as_str()));
    start.push_attribute(("lon", point.longitude.to_string().as_str()));
    writer.write_event(Event::Start(start))?;

    if let Some(elevation) = point.output_elevation() {
        write_text_element(writer, "ele", &elevation.to_string())?;
    }
    if let Some(timestamp) = &point.timestamp {
        write_text_element(writer, "time", &format_gpx_time(timestamp))?;
    }
    if !point.extensions.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("extensions")))?;
        for (key, value) in point.extensions.iter() {
            let key = key.to_lowercase();
            if !is_xml_name(&key) {
                warn!("Skipping extension '{}': not a valid XML element name", key);
                continue;
            }
            write_text_element(writer, &format!("{}:{}", DJI_PREFIX, key), value)?;
        }
        writer.write_event(Event::End(BytesEnd::new("extensions")))?;
    }

    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Local part of an XML element name: a letter or `_`, then name characters
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        }
        _ => false,
    }
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Path of the GPX file written for `document` inside `output_dir`
pub fn gpx_output_path(document: &GpxDocument, output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{}.{}", document.name(), GPX_FILE_EXTENSION))
}

/// Write `document` to `<output_dir>/<name>.gpx`.
///
/// The file is created exclusively unless `overwrite` is set. Writing is not
/// atomic: an I/O error mid-write can leave a truncated file behind.
pub fn export_to_gpx(
    document: &GpxDocument,
    output_dir: &Path,
    overwrite: bool,
) -> Result<PathBuf> {
    document.validate()?;

    if !output_dir.as_os_str().is_empty() {
        std::fs::create_dir_all(output_dir)?;
    }
    let gpx_path = gpx_output_path(document, output_dir);
    debug!("Writing GPX to {:?} (overwrite: {})", gpx_path, overwrite);

    let file = if overwrite {
        File::create(&gpx_path)?
    } else {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&gpx_path)?
    };
    write_gpx(document, BufWriter::new(file))?;

    info!("Exported GPS track to: {}", gpx_path.display());
    Ok(gpx_path)
}

/// Output directory and document name derived from an SRT input path
pub fn compute_export_paths(input_path: &Path, options: &ConvertOptions) -> (PathBuf, String) {
    let output_dir = options.output_dir.clone().unwrap_or_else(|| {
        input_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    });

    let stem = input_path
        .file_stem()
        .map(|s| sanitize_ascii(&s.to_string_lossy()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_DOCUMENT_NAME.to_string());

    (output_dir, stem)
}

/// Convert one SRT file into a GPX file holding a single track.
///
/// Returns the path of the written file. Nothing is written when parsing
/// fails or no chunk was found.
pub fn convert_srt_file(input_path: &Path, options: &ConvertOptions) -> Result<PathBuf> {
    let points = parse_srt_file(input_path, options)?;
    let (output_dir, name) = compute_export_paths(input_path, options);
    debug!("{} track points for '{}'", points.len(), name);

    let mut document = GpxDocument::new(&name);
    document.add_track(Track::new(points, &name));
    export_to_gpx(&document, &output_dir, options.overwrite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SrtError;
    use chrono::{FixedOffset, TimeZone};

    fn render(document: &GpxDocument) -> String {
        let mut sink = Vec::new();
        write_gpx(document, &mut sink).unwrap();
        String::from_utf8(sink).unwrap()
    }

    fn single_track(points: Vec<TrackPoint>) -> GpxDocument {
        let mut doc = GpxDocument::new("flight");
        doc.add_track(Track::new(points, "flight"));
        doc
    }

    #[test]
    fn test_root_element() {
        let xml = render(&single_track(vec![TrackPoint::new(8.5, 47.25)]));
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(
            r#"<gpx version="1.1" creator="DJI SRT converter" xmlns="http://www.topografix.com/GPX/1/1">"#
        ));
        assert!(xml.contains(r#"<trkpt lat="47.25" lon="8.5">"#));
        assert!(!xml.contains("xmlns:dji"));
        assert!(xml.trim_end().ends_with("</gpx>"));
    }

    #[test]
    fn test_elevation_only_when_nonzero() {
        let xml = render(&single_track(vec![TrackPoint::new(1.0, 2.0).with_elevation(0.0)]));
        assert!(!xml.contains("<ele>"));

        let xml = render(&single_track(vec![TrackPoint::new(1.0, 2.0).with_elevation(50.5)]));
        assert!(xml.contains("<ele>50.5</ele>"));
    }

    #[test]
    fn test_time_is_written_in_utc() {
        let plus2 = FixedOffset::east_opt(2 * 3600).unwrap();
        let t = plus2.with_ymd_and_hms(2018, 5, 1, 12, 0, 0).unwrap();
        let xml = render(&single_track(vec![TrackPoint::new(1.0, 2.0).with_timestamp(t)]));
        assert!(xml.contains("<time>2018-05-01T10:00:00Z</time>"));
    }

    #[test]
    fn test_extensions_are_prefixed_and_lowercased() {
        let extensions = [("ISO", "100"), ("video_begin", "00:01"), ("Note", "a<b")]
            .into_iter()
            .collect();
        let point = TrackPoint::new(1.0, 2.0).with_extensions(extensions);
        let xml = render(&single_track(vec![point]));
        assert!(xml.contains(&format!(r#"xmlns:dji="{}""#, DJI_NAMESPACE)));
        assert!(xml.contains("<extensions>"));
        assert!(xml.contains("<dji:iso>100</dji:iso>"));
        assert!(xml.contains("<dji:video_begin>00:01</dji:video_begin>"));
        assert!(xml.contains("<dji:note>a&lt;b</dji:note>"));
    }

    #[test]
    fn test_extension_keys_must_be_xml_names() {
        let extensions = [("1x", "5"), ("ISO", "100"), ("_gain", "2")]
            .into_iter()
            .collect();
        let point = TrackPoint::new(1.0, 2.0).with_extensions(extensions);
        let xml = render(&single_track(vec![point]));
        assert!(!xml.contains("1x"));
        assert!(xml.contains("<dji:iso>100</dji:iso>"));
        assert!(xml.contains("<dji:_gain>2</dji:_gain>"));

        assert!(is_xml_name("video_begin"));
        assert!(is_xml_name("höhe"));
        assert!(!is_xml_name("9"));
        assert!(!is_xml_name(""));
    }

    #[test]
    fn test_metadata_follows_points() {
        let mut doc = GpxDocument::new("Flügel");
        doc.add_track(
            Track::new(vec![TrackPoint::new(1.0, 2.0)], "Flügel").with_description("x".repeat(60)),
        );
        let xml = render(&doc);

        let seg_end = xml.find("</trkseg>").unwrap();
        let name = xml.find("<name>Flgel</name>").unwrap();
        let desc = xml.find("<desc>").unwrap();
        assert!(seg_end < name && name < desc);
        assert!(xml.contains(&format!("<desc>{}…</desc>", "x".repeat(49))));
    }

    #[test]
    fn test_waypoints_precede_tracks() {
        let mut doc = single_track(vec![TrackPoint::new(1.0, 2.0)]);
        doc.add_point(TrackPoint::new(3.0, 4.0));
        let xml = render(&doc);
        assert!(xml.find("<wpt").unwrap() < xml.find("<trk>").unwrap());
    }

    #[test]
    fn test_empty_track_writes_nothing() {
        let mut sink = Vec::new();
        let result = write_gpx(&single_track(Vec::new()), &mut sink);
        assert!(matches!(result, Err(SrtError::EmptyTrack { .. })));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_compute_export_paths() {
        let options = ConvertOptions::default();
        let (dir, name) = compute_export_paths(Path::new("/videos/DJI_0042.SRT"), &options);
        assert_eq!(dir, PathBuf::from("/videos"));
        assert_eq!(name, "DJI_0042");

        let options = ConvertOptions {
            output_dir: Some(PathBuf::from("/out")),
            ..Default::default()
        };
        let (dir, name) = compute_export_paths(Path::new("Flüge.srt"), &options);
        assert_eq!(dir, PathBuf::from("/out"));
        assert_eq!(name, "Flge");

        let (_, name) = compute_export_paths(Path::new("日本.srt"), &ConvertOptions::default());
        assert_eq!(name, "output");
    }
}
