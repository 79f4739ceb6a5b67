use serde::Deserialize;

/// Map projection from WGS84 degrees to a unitless plane. `x` grows eastwards and `y` grows northwards.
pub trait Projection {
    /// Project a point given as (longitude, latitude) in degrees.
    fn project(&self, lon_lat: geo::Point) -> geo::Point;
}

/// Natural Earth I projection (Šavrič, Jenny, Patterson, Petrovič, Hurni 2011), a pseudocylindrical compromise
/// projection defined by two polynomials in latitude.
#[derive(Debug, Default, Clone, Copy)]
pub struct NaturalEarth;

impl Projection for NaturalEarth {
    fn project(&self, lon_lat: geo::Point) -> geo::Point {
        let lambda = lon_lat.x().to_radians();
        let phi = lon_lat.y().to_radians();
        let phi2 = phi * phi;
        let phi4 = phi2 * phi2;
        let x = lambda
            * (0.8707 - 0.131979 * phi2
                + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4)));
        let y = phi
            * (1.007226
                + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)));
        geo::Point::new(x, y)
    }
}

/// Plate carrée: longitude and latitude in radians used directly as plane coordinates.
#[derive(Debug, Default, Clone, Copy)]
pub struct Equirectangular;

impl Projection for Equirectangular {
    fn project(&self, lon_lat: geo::Point) -> geo::Point {
        geo::Point::new(lon_lat.x().to_radians(), lon_lat.y().to_radians())
    }
}

/// Projection selector as written in the config file.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    #[default]
    NaturalEarth,
    Equirectangular,
}

impl ProjectionKind {
    pub fn projection(&self) -> Box<dyn Projection> {
        match self {
            ProjectionKind::NaturalEarth => Box::new(NaturalEarth),
            ProjectionKind::Equirectangular => Box::new(Equirectangular),
        }
    }
}

/// Planar extents of the whole globe under `projection`, as (min, max) corners.
///
/// Both supported projections are symmetric about the equator and the prime meridian and reach their widest point
/// on the equator, so the antimeridian on the equator and the pole on the prime meridian bound the globe.
pub fn projected_bounds(projection: &dyn Projection) -> (geo::Point, geo::Point) {
    let east = projection.project(geo::Point::new(180.0, 0.0));
    let north = projection.project(geo::Point::new(0.0, 90.0));
    (
        geo::Point::new(-east.x(), -north.y()),
        geo::Point::new(east.x(), north.y()),
    )
}
