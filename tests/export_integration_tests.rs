//! Integration tests for SRT to GPX conversion
//!
//! Tests the full pipeline across different scenarios:
//! - GPX written next to the input, or into a created output directory
//! - Extension output switched on and off
//! - Timezone handling of the recording timestamps
//! - No output file for inconsistent, malformed or empty input

use chrono::FixedOffset;
use srt2gpx::{convert_srt_file, ConvertOptions, InputTimezone, SrtError, DJI_NAMESPACE};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn chunk(seq: usize, metadata: &str) -> String {
    let second = seq - 1;
    format!(
        "{seq}\n00:00:{second:02},000 --> 00:00:{next:02},000\nHOME(8.662000,47.381500) 2018.05.01 12:00:{second:02}\nGPS(8.66{seq},47.38{seq},{ele}) {metadata}",
        next = second + 1,
        ele = if seq == 1 { 0 } else { 50 },
    )
}

fn srt(count: usize) -> String {
    (1..=count)
        .map(|i| chunk(i, "BAROMETER:70.6 ISO:100 ISO:200"))
        .collect::<Vec<_>>()
        .join("\n\n\n")
        + "\n\n\n"
}

fn write_input(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write SRT input");
    path
}

fn plus_two() -> ConvertOptions {
    ConvertOptions {
        timezone: InputTimezone::Fixed(FixedOffset::east_opt(2 * 3600).unwrap()),
        ..Default::default()
    }
}

fn gpx_files(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|n| n.ends_with(".gpx"))
        .collect()
}

#[test]
fn test_convert_writes_gpx_next_to_input() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_input(temp_dir.path(), "DJI_0001.SRT", &srt(4));

    let gpx_path = convert_srt_file(&input, &plus_two()).expect("conversion should succeed");
    assert_eq!(gpx_path, temp_dir.path().join("DJI_0001.gpx"));

    let xml = fs::read_to_string(&gpx_path).expect("Failed to read GPX file");
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert_eq!(xml.matches("<trkpt ").count(), 4, "one point per chunk");
    assert_eq!(xml.matches("<trk>").count(), 1);
    assert!(xml.contains("<name>DJI_0001</name>"));

    // chunk order is kept
    let first = xml.find(r#"lat="47.381""#).unwrap();
    let last = xml.find(r#"lat="47.384""#).unwrap();
    assert!(first < last);

    // first chunk has elevation 0, the rest 50
    assert_eq!(xml.matches("<ele>50</ele>").count(), 3);
    assert!(xml.contains("<time>2018-05-01T10:00:00Z</time>"));
    assert!(!xml.contains("<extensions>"), "extensions are off by default");
}

#[test]
fn test_extensions_enabled() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_input(temp_dir.path(), "flight.srt", &srt(2));

    let options = ConvertOptions {
        extensions: true,
        ..plus_two()
    };
    let gpx_path = convert_srt_file(&input, &options).unwrap();
    let xml = fs::read_to_string(gpx_path).unwrap();

    assert!(xml.contains(&format!(r#"xmlns:dji="{}""#, DJI_NAMESPACE)));
    assert_eq!(xml.matches("<extensions>").count(), 2);
    assert!(xml.contains("<dji:iso>200</dji:iso>"), "last duplicate wins");
    assert!(!xml.contains("<dji:iso>100</dji:iso>"));
    assert!(xml.contains("<dji:barometer>70.6</dji:barometer>"));
    assert!(xml.contains("<dji:video_begin>00:00</dji:video_begin>"));
    assert!(xml.contains("<dji:video_end>00:02</dji:video_end>"));
    assert!(xml.contains("<dji:home_lon>8.662000</dji:home_lon>"));
    assert!(xml.contains("<dji:home_lat>47.381500</dji:home_lat>"));
}

#[test]
fn test_synthetic_extensions_without_metadata() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let text = format!("{}\n\n\n{}", chunk(1, ""), chunk(2, "no pairs here"));
    let input = write_input(temp_dir.path(), "bare.srt", &text);

    let options = ConvertOptions {
        extensions: true,
        ..plus_two()
    };
    let xml = fs::read_to_string(convert_srt_file(&input, &options).unwrap()).unwrap();
    assert_eq!(xml.matches("<dji:video_begin>").count(), 2);
    assert_eq!(xml.matches("<dji:home_lat>").count(), 2);
}

#[test]
fn test_output_dir_is_created() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_input(temp_dir.path(), "Flügel.srt", &srt(1));
    let out_dir = temp_dir.path().join("nonexistent").join("output");

    let options = ConvertOptions {
        output_dir: Some(out_dir.clone()),
        ..plus_two()
    };
    let gpx_path = convert_srt_file(&input, &options).unwrap();
    assert_eq!(gpx_path, out_dir.join("Flgel.gpx"));
    assert!(gpx_path.exists());
}

#[test]
fn test_existing_output_is_not_overwritten() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_input(temp_dir.path(), "flight.srt", &srt(1));
    let existing = temp_dir.path().join("flight.gpx");
    fs::write(&existing, "keep me").unwrap();

    let result = convert_srt_file(&input, &plus_two());
    assert!(matches!(result, Err(SrtError::Io(_))));
    assert_eq!(fs::read_to_string(&existing).unwrap(), "keep me");

    let options = ConvertOptions {
        overwrite: true,
        ..plus_two()
    };
    convert_srt_file(&input, &options).unwrap();
    assert!(fs::read_to_string(&existing).unwrap().contains("<gpx"));
}

#[test]
fn test_inconsistent_sequence_writes_no_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let text = format!("{}\n\n\n{}", chunk(1, ""), chunk(3, ""));
    let input = write_input(temp_dir.path(), "skip.srt", &text);

    let result = convert_srt_file(&input, &plus_two());
    assert!(matches!(
        result,
        Err(SrtError::InconsistentSequence {
            expected: 2,
            found: 3
        })
    ));
    assert!(gpx_files(temp_dir.path()).is_empty());
}

#[test]
fn test_malformed_chunk_writes_no_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let text = format!("{}\n\n\n2\nnot a telemetry block", chunk(1, ""));
    let input = write_input(temp_dir.path(), "broken.srt", &text);

    let result = convert_srt_file(&input, &plus_two());
    assert!(matches!(
        result,
        Err(SrtError::MalformedChunk { chunk: 2, .. })
    ));
    assert!(gpx_files(temp_dir.path()).is_empty());
}

#[test]
fn test_empty_input_raises_empty_track() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_input(temp_dir.path(), "empty.srt", "");

    let result = convert_srt_file(&input, &plus_two());
    assert!(matches!(result, Err(SrtError::EmptyTrack { .. })));
    assert!(gpx_files(temp_dir.path()).is_empty());
}

#[test]
fn test_missing_input_is_io_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let result = convert_srt_file(&temp_dir.path().join("missing.srt"), &plus_two());
    assert!(matches!(result, Err(SrtError::Io(_))));
}
