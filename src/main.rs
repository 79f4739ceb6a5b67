extern crate log;
pub mod config;
pub mod map;
pub mod quake;
use crate::config::{load_config, Config};
use crate::map::render::{MapRenderer, SvgMapRenderer};
use crate::quake::extract::{extract_series, PREVIEW_LENGTH};
use crate::quake::loader::load_feature_collection;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

/// Plot earthquakes from a GeoJSON feed on a world map, colored by magnitude.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the YAML config file. Defaults are used when omitted.
    #[arg(short, long)]
    config_filepath: Option<PathBuf>,
    /// Path to the input GeoJSON file, overrides the config file.
    #[arg(short, long)]
    input_filepath: Option<PathBuf>,
    /// Path of the SVG map to write, overrides the config file.
    #[arg(short, long)]
    output_filepath: Option<PathBuf>,
}

fn resolve_config(args: Args) -> anyhow::Result<Config> {
    let mut config = match &args.config_filepath {
        Some(config_filepath) => load_config(config_filepath)?,
        None => {
            log::info!("No config file given, using defaults");
            Config::default()
        }
    };
    if let Some(input_filepath) = args.input_filepath {
        config.input_filepath = input_filepath;
    }
    if let Some(output_filepath) = args.output_filepath {
        config.output_filepath = output_filepath;
    }
    Ok(config)
}

fn run(config: &Config, renderer: &dyn MapRenderer) -> anyhow::Result<()> {
    let feature_collection = load_feature_collection(&config.input_filepath)?;
    let series = extract_series(&feature_collection).context("Extracting earthquake fields")?;
    log::info!("Extracted {} earthquakes", series.len());
    series.log_preview(PREVIEW_LENGTH);
    renderer.render(&series, &config.map)
}

fn try_main() -> anyhow::Result<()> {
    let args = Args::try_parse()?;
    let config = resolve_config(args)?;
    log::debug!("{:?}", config);
    let renderer = SvgMapRenderer {
        output_filepath: config.output_filepath.clone(),
    };
    run(&config, &renderer)
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    env_logger::init();
    if let Err(e) = try_main() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}
