use geojson::{Feature, FeatureCollection};

use super::error::QuakeError;

/// Number of entries shown by `EarthquakeSeries::log_preview` when called from the driver.
pub const PREVIEW_LENGTH: usize = 5;

/// Four index-aligned sequences, one entry per earthquake. Entry `i` of every vector describes the same feature,
/// in the order of the input feature list.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EarthquakeSeries {
    pub magnitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
    pub latitudes: Vec<f64>,
    pub titles: Vec<String>,
}

impl EarthquakeSeries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            magnitudes: Vec::with_capacity(capacity),
            longitudes: Vec::with_capacity(capacity),
            latitudes: Vec::with_capacity(capacity),
            titles: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Epicenters as points with `x` = longitude and `y` = latitude, in degrees.
    pub fn locations(&self) -> impl Iterator<Item = geo::Point> + '_ {
        self.longitudes
            .iter()
            .zip(self.latitudes.iter())
            .map(|(lon, lat)| geo::Point::new(*lon, *lat))
    }

    /// Smallest and largest magnitude, or `None` for an empty series.
    pub fn magnitude_range(&self) -> Option<(f64, f64)> {
        self.magnitudes.iter().fold(None, |range, mag| match range {
            None => Some((*mag, *mag)),
            Some((min, max)) => Some((min.min(*mag), max.max(*mag))),
        })
    }

    /// Log the first `n` entries of each sequence, to eyeball that fields landed where expected.
    pub fn log_preview(&self, n: usize) {
        let n = n.min(self.len());
        log::info!("Magnitudes: {:?}", &self.magnitudes[..n]);
        log::info!("Longitudes: {:?}", &self.longitudes[..n]);
        log::info!("Latitudes: {:?}", &self.latitudes[..n]);
        log::debug!("Titles: {:?}", &self.titles[..n]);
    }

    fn push(&mut self, magnitude: f64, longitude: f64, latitude: f64, title: String) {
        self.magnitudes.push(magnitude);
        self.longitudes.push(longitude);
        self.latitudes.push(latitude);
        self.titles.push(title);
    }
}

/// Extract magnitude, longitude, latitude and title of every feature.
///
/// Fails on the first feature lacking one of `properties.mag`, `properties.title` or a Point geometry. No feature is
/// skipped and no default is substituted.
pub fn extract_series(
    feature_collection: &FeatureCollection,
) -> Result<EarthquakeSeries, QuakeError> {
    let mut series = EarthquakeSeries::with_capacity(feature_collection.features.len());
    for (index, feature) in feature_collection.features.iter().enumerate() {
        let magnitude = extract_magnitude(index, feature)?;
        let (longitude, latitude) = extract_coordinates(index, feature)?;
        let title = extract_title(index, feature)?;
        series.push(magnitude, longitude, latitude, title);
    }
    log::debug!("Extracted {} earthquakes", series.len());
    Ok(series)
}

fn required_property<'a>(
    index: usize,
    feature: &'a Feature,
    field: &'static str,
) -> Result<&'a serde_json::Value, QuakeError> {
    feature
        .property(field)
        .ok_or(QuakeError::FieldMissing { index, field })
}

fn extract_magnitude(index: usize, feature: &Feature) -> Result<f64, QuakeError> {
    let value = required_property(index, feature, "mag")?;
    value.as_f64().ok_or_else(|| QuakeError::InvalidField {
        index,
        field: "mag",
        reason: format!("expected a number, found {}", value),
    })
}

fn extract_title(index: usize, feature: &Feature) -> Result<String, QuakeError> {
    let value = required_property(index, feature, "title")?;
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| QuakeError::InvalidField {
            index,
            field: "title",
            reason: format!("expected a string, found {}", value),
        })
}

/// GeoJSON positions are (longitude, latitude[, depth]). Depth is ignored.
fn extract_coordinates(index: usize, feature: &Feature) -> Result<(f64, f64), QuakeError> {
    let geometry = feature.geometry.as_ref().ok_or(QuakeError::FieldMissing {
        index,
        field: "geometry",
    })?;
    match &geometry.value {
        geojson::Value::Point(position) => match position.as_slice() {
            [longitude, latitude, ..] => Ok((*longitude, *latitude)),
            _ => Err(QuakeError::FieldMissing {
                index,
                field: "coordinates",
            }),
        },
        other => Err(QuakeError::InvalidField {
            index,
            field: "geometry",
            reason: format!("expected a Point, found {}", geometry_type_name(other)),
        }),
    }
}

fn geometry_type_name(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}
