use std::{fs, path::Path};

use geojson::{FeatureCollection, GeoJson};

use super::error::QuakeError;

/// Fields of the top-level `metadata` object that are worth reporting. They do not influence extraction.
const METADATA_LOG_KEYS: [&str; 4] = ["title", "generated", "url", "count"];

/// Read and parse a GeoJSON FeatureCollection from `filepath`.
///
/// # Errors
/// * `FileNotFound` if the path does not point to a file.
/// * `Read` if the file exists but cannot be read as UTF-8 text.
/// * `Parse` if the contents are not well-formed GeoJSON.
/// * `NotAFeatureCollection` if the document is a single Feature or Geometry.
pub fn load_feature_collection(filepath: &Path) -> Result<FeatureCollection, QuakeError> {
    if !filepath.is_file() {
        return Err(QuakeError::FileNotFound {
            path: filepath.to_path_buf(),
        });
    }
    log::info!("Reading earthquake data from {:?}", filepath);
    let contents = fs::read_to_string(filepath).map_err(|source| QuakeError::Read {
        path: filepath.to_path_buf(),
        source,
    })?;
    let feature_collection = parse_feature_collection(&contents, filepath)?;
    log_metadata(&feature_collection);
    log::info!(
        "Read {} features from {:?}",
        feature_collection.features.len(),
        filepath
    );
    Ok(feature_collection)
}

fn parse_feature_collection(
    contents: &str,
    filepath: &Path,
) -> Result<FeatureCollection, QuakeError> {
    let geojson = contents
        .parse::<GeoJson>()
        .map_err(|source| QuakeError::Parse {
            path: filepath.to_path_buf(),
            source,
        })?;
    match geojson {
        GeoJson::FeatureCollection(feature_collection) => Ok(feature_collection),
        _ => Err(QuakeError::NotAFeatureCollection {
            path: filepath.to_path_buf(),
        }),
    }
}

fn log_metadata(feature_collection: &FeatureCollection) {
    let metadata = match feature_collection
        .foreign_members
        .as_ref()
        .and_then(|members| members.get("metadata"))
        .and_then(|metadata| metadata.as_object())
    {
        Some(metadata) => metadata,
        None => {
            log::debug!("No dataset metadata present");
            return;
        }
    };
    for key in METADATA_LOG_KEYS {
        if let Some(value) = metadata.get(key) {
            log::info!("Dataset {}: {}", key, value);
        }
    }
    if let Some(count) = metadata.get("count").and_then(|count| count.as_u64()) {
        if count as usize != feature_collection.features.len() {
            log::warn!(
                "Metadata announces {} records but the document holds {} features",
                count,
                feature_collection.features.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use testdir::testdir;

    use crate::quake::error::QuakeError;

    use super::load_feature_collection;

    const SINGLE_EVENT: &str = r#"{
        "type": "FeatureCollection",
        "metadata": {"title": "USGS All Earthquakes, Past Month", "count": 1},
        "features": [{
            "type": "Feature",
            "properties": {"mag": 1.6, "title": "M 1.6 - 10km NNE of X"},
            "geometry": {"type": "Point", "coordinates": [-150.7585, 61.7591, 12.3]}
        }]
    }"#;

    #[test]
    fn test_load_feature_collection() {
        let filepath = testdir!().join("single_event.geojson");
        fs::write(&filepath, SINGLE_EVENT).unwrap();

        let feature_collection = load_feature_collection(&filepath).unwrap();
        assert_eq!(1, feature_collection.features.len());
    }

    #[test]
    fn test_load_missing_file() {
        let filepath = testdir!().join("does_not_exist.geojson");
        let err = load_feature_collection(&filepath).unwrap_err();
        assert!(matches!(err, QuakeError::FileNotFound { path } if path == filepath));
    }

    #[test]
    fn test_load_directory_is_not_a_file() {
        let dir = testdir!();
        let err = load_feature_collection(&dir).unwrap_err();
        assert!(matches!(err, QuakeError::FileNotFound { .. }));
    }

    #[rstest]
    #[case("{\"type\": \"FeatureCollection\", \"features\": [")] // Truncated document.
    #[case("not json at all")]
    #[case("{\"type\": \"FeatureCollection\"}")] // No feature list.
    #[case(
        r#"{"type": "FeatureCollection", "features": [{"type": "Feature", "properties": {"mag": 1.0, "title": "short"}, "geometry": {"type": "Point", "coordinates": [1.0]}}]}"#
    )] // Position with a single number.
    fn test_load_malformed(#[case] contents: &str) {
        let filepath = testdir!().join("malformed.geojson");
        fs::write(&filepath, contents).unwrap();

        let err = load_feature_collection(&filepath).unwrap_err();
        assert!(matches!(err, QuakeError::Parse { .. }), "{:?}", err);
    }

    #[test]
    fn test_load_single_feature_document() {
        let filepath = testdir!().join("feature.geojson");
        fs::write(
            &filepath,
            r#"{"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}}"#,
        )
        .unwrap();

        let err = load_feature_collection(&filepath).unwrap_err();
        assert!(matches!(err, QuakeError::NotAFeatureCollection { .. }));
    }
}
