//! CLI binary for the SRT to GPX converter
//!
//! This provides the command-line interface for the srt2gpx library.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use log::debug;
use srt2gpx::{convert_srt_file, ConvertOptions, InputTimezone};
use std::path::{Path, PathBuf};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    " ",
    env!("VERGEN_GIT_COMMIT_DATE"),
    ")"
);

fn build_command() -> Command {
    Command::new("srt2gpx")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(LONG_VERSION)
        .about("Convert DJI format .srt telemetry files to .gpx tracks")
        .arg(
            Arg::new("input")
                .value_name("SRT")
                .help("Input .srt file path. The GPX file is written next to it with the same base name.")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("extensions")
                .short('e')
                .long("extensions")
                .help("Output DJI metadata such as exposure and air pressure in GPX extension tags")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("timezone")
                .long("timezone")
                .value_name("TZ")
                .help("Timezone the SRT timestamps were recorded in: 'local', 'utc' or an offset like +02:00")
                .default_value("local")
                .value_parser(|s: &str| s.parse::<InputTimezone>()),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for the GPX file (default: same as input file)")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("force")
                .short('f')
                .long("force")
                .help("Overwrite an existing GPX file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output and detailed parsing information")
                .action(ArgAction::SetTrue),
        )
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_target(false)
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();

    let debug = matches.get_flag("debug");
    init_logging(debug);

    let input = matches
        .get_one::<String>("input")
        .map(PathBuf::from)
        .context("missing input file")?;
    let options = ConvertOptions {
        extensions: matches.get_flag("extensions"),
        timezone: matches
            .get_one::<InputTimezone>("timezone")
            .copied()
            .unwrap_or_default(),
        output_dir: matches.get_one::<String>("output-dir").map(PathBuf::from),
        overwrite: matches.get_flag("force"),
    };
    debug!("Options: {:?}", options);

    let gpx_path = convert(&input, &options)?;
    println!("{}", gpx_path.display());
    Ok(())
}

fn convert(input: &Path, options: &ConvertOptions) -> Result<PathBuf> {
    debug!(
        "Converting {:?} (timestamps in {} time)",
        input, options.timezone
    );
    convert_srt_file(input, options)
        .with_context(|| format!("Failed to convert {}", input.display()))
}
