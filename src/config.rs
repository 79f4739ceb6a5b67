use std::{fs::read_to_string, path::Path, path::PathBuf};

use anyhow::anyhow;
use serde::Deserialize;

use crate::map::render::MapConfig;

fn default_input_filepath() -> PathBuf {
    PathBuf::from("data/earthquakes.geojson")
}

fn default_output_filepath() -> PathBuf {
    PathBuf::from("earthquakes.svg")
}

#[derive(Deserialize, Debug, PartialEq)]
pub struct Config {
    /// GeoJSON FeatureCollection of earthquakes, e.g. a USGS summary feed saved to disk.
    #[serde(default = "default_input_filepath")]
    pub input_filepath: PathBuf,
    #[serde(default = "default_output_filepath")]
    pub output_filepath: PathBuf,
    #[serde(default)]
    pub map: MapConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_filepath: default_input_filepath(),
            output_filepath: default_output_filepath(),
            map: MapConfig::default(),
        }
    }
}

pub fn load_config(config_filepath: &Path) -> anyhow::Result<Config> {
    if !config_filepath.exists() {
        return Err(anyhow!("Config file {:?} not found", config_filepath));
    }
    let config_contents = read_to_string(config_filepath)?;
    let config: Config = serde_yaml::from_str(&config_contents)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use testdir::testdir;

    use crate::map::{color_scale::ColorScale, projection::ProjectionKind, render::MapConfig};

    use super::{load_config, Config};

    #[test]
    fn test_load_full_config() {
        let config_filepath = testdir!().join("config.yaml");
        fs::write(
            &config_filepath,
            r#"
input_filepath: global_data_earthquake/earthquake_data_07JAN2025.geojson
output_filepath: out/map.svg
map:
  title: Seismic activity (09/12/2024 - 07/01/2025)
  color_scale: viridis
  color_label: Magnitude
  projection: equirectangular
  width: 800
  height: 400
  point_radius: 2.5
  size_by_magnitude: true
"#,
        )
        .unwrap();

        let config = load_config(&config_filepath).unwrap();

        assert_eq!(
            Config {
                input_filepath: PathBuf::from(
                    "global_data_earthquake/earthquake_data_07JAN2025.geojson"
                ),
                output_filepath: PathBuf::from("out/map.svg"),
                map: MapConfig {
                    title: "Seismic activity (09/12/2024 - 07/01/2025)".to_string(),
                    color_scale: ColorScale::Viridis,
                    color_label: "Magnitude".to_string(),
                    projection: ProjectionKind::Equirectangular,
                    width: 800,
                    height: 400,
                    point_radius: 2.5,
                    size_by_magnitude: true,
                },
            },
            config
        );
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let config_filepath = testdir!().join("config.yaml");
        fs::write(&config_filepath, "input_filepath: quakes.geojson\n").unwrap();

        let config = load_config(&config_filepath).unwrap();

        assert_eq!(PathBuf::from("quakes.geojson"), config.input_filepath);
        assert_eq!(Config::default().output_filepath, config.output_filepath);
        assert_eq!(MapConfig::default(), config.map);
    }

    #[test]
    fn test_load_example_config() {
        let config_filepath =
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config.example.yaml");
        let config = load_config(&config_filepath).unwrap();
        assert_eq!(
            PathBuf::from("data/earthquakes_sample.geojson"),
            config.input_filepath
        );
        assert_eq!(ProjectionKind::NaturalEarth, config.map.projection);
    }

    #[test]
    fn test_load_missing_config() {
        let config_filepath = testdir!().join("missing.yaml");
        assert!(load_config(&config_filepath).is_err());
    }

    #[test]
    fn test_load_config_unknown_color_scale() {
        let config_filepath = testdir!().join("config.yaml");
        fs::write(&config_filepath, "map:\n  color_scale: not_a_scale\n").unwrap();
        assert!(load_config(&config_filepath).is_err());
    }
}
