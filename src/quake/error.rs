use std::path::PathBuf;

/// Failures of the load and extract steps. None of them are recoverable, the driver aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum QuakeError {
    #[error("input file {path:?} not found or not a readable file")]
    FileNotFound { path: PathBuf },
    #[error("could not read input file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {path:?} as GeoJSON")]
    Parse {
        path: PathBuf,
        #[source]
        source: geojson::Error,
    },
    #[error("{path:?} is GeoJSON but not a FeatureCollection")]
    NotAFeatureCollection { path: PathBuf },
    #[error("feature {index} is missing field `{field}`")]
    FieldMissing { index: usize, field: &'static str },
    #[error("feature {index} has an invalid `{field}`: {reason}")]
    InvalidField {
        index: usize,
        field: &'static str,
        reason: String,
    },
}
