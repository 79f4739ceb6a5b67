use std::{fs, path::PathBuf};

use anyhow::Context;
use serde::Deserialize;
use svg::{
    node::element::{Circle, Definitions, Group, LinearGradient, Path, Rectangle, Stop, Text, Title},
    Document,
};

use crate::quake::extract::EarthquakeSeries;

use super::{
    color_scale::{normalize, ColorScale},
    projection::{projected_bounds, Projection, ProjectionKind},
};

const TITLE_BAND_HEIGHT: f64 = 50.0;
const COLOR_BAR_BAND_WIDTH: f64 = 130.0;
const MARGIN: f64 = 20.0;
const COLOR_BAR_WIDTH: f64 = 18.0;
const COLOR_BAR_STOPS: usize = 11;
const GRATICULE_STEP_DEG: i32 = 30;
const OUTLINE_STEP_DEG: i32 = 2;
const COLOR_BAR_GRADIENT_ID: &str = "magnitude-color-scale";

fn default_title() -> String {
    "Seismic activity around the world (past 30 days)".to_string()
}

fn default_color_label() -> String {
    "Magnitude (Richter scale)".to_string()
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    700
}

fn default_point_radius() -> f64 {
    3.0
}

/// Static display configuration handed to a `MapRenderer` together with the data.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct MapConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub color_scale: ColorScale,
    /// Label of the color bar and of the magnitude line in hover labels.
    #[serde(default = "default_color_label")]
    pub color_label: String,
    #[serde(default)]
    pub projection: ProjectionKind,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_point_radius")]
    pub point_radius: f64,
    /// Scale point radius with magnitude in addition to coloring by it.
    #[serde(default)]
    pub size_by_magnitude: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            color_scale: ColorScale::default(),
            color_label: default_color_label(),
            projection: ProjectionKind::default(),
            width: default_width(),
            height: default_height(),
            point_radius: default_point_radius(),
            size_by_magnitude: false,
        }
    }
}

/// Something that can draw earthquakes on a world map.
pub trait MapRenderer {
    fn render(&self, series: &EarthquakeSeries, config: &MapConfig) -> anyhow::Result<()>;
}

/// Renders the map as an SVG file. Each point carries its hover label as an SVG `<title>`, which browsers show as a
/// tooltip.
pub struct SvgMapRenderer {
    pub output_filepath: PathBuf,
}

impl MapRenderer for SvgMapRenderer {
    fn render(&self, series: &EarthquakeSeries, config: &MapConfig) -> anyhow::Result<()> {
        let document = build_map_document(series, config)?;
        if let Some(parent) = self.output_filepath.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Creating output directory {:?}", parent))?;
            }
        }
        svg::save(&self.output_filepath, &document)
            .with_context(|| format!("Writing map to {:?}", self.output_filepath))?;
        log::info!(
            "Wrote map with {} earthquakes to {:?}, open it in a browser to inspect",
            series.len(),
            self.output_filepath
        );
        Ok(())
    }
}

/// Maps projected plane coordinates onto the pixel area reserved for the globe, keeping the aspect ratio.
struct PixelTransform {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    min: geo::Point,
    max: geo::Point,
}

impl PixelTransform {
    fn new(projection: &dyn Projection, left: f64, top: f64, width: f64, height: f64) -> Self {
        let (min, max) = projected_bounds(projection);
        let scale = (width / (max.x() - min.x())).min(height / (max.y() - min.y()));
        Self {
            scale,
            offset_x: left + (width - scale * (max.x() - min.x())) / 2.0,
            offset_y: top + (height - scale * (max.y() - min.y())) / 2.0,
            min,
            max,
        }
    }

    /// Pixel coordinates have `y` growing downwards, so north is flipped to the top.
    fn to_pixel(&self, projected: geo::Point) -> (f64, f64) {
        (
            self.offset_x + (projected.x() - self.min.x()) * self.scale,
            self.offset_y + (self.max.y() - projected.y()) * self.scale,
        )
    }
}

/// Build the SVG document for `series` without writing it anywhere.
pub fn build_map_document(
    series: &EarthquakeSeries,
    config: &MapConfig,
) -> anyhow::Result<Document> {
    if config.width == 0 || config.height == 0 {
        return Err(anyhow::anyhow!(
            "Map size must be positive, got {}x{}",
            config.width,
            config.height
        ));
    }
    let width = config.width as f64;
    let height = config.height as f64;
    let projection = config.projection.projection();
    let transform = PixelTransform::new(
        projection.as_ref(),
        MARGIN,
        TITLE_BAND_HEIGHT,
        (width - MARGIN - COLOR_BAR_BAND_WIDTH).max(1.0),
        (height - TITLE_BAND_HEIGHT - MARGIN).max(1.0),
    );
    log::debug!(
        "Rendering {} earthquakes with {:?} projection at {}x{}",
        series.len(),
        config.projection,
        config.width,
        config.height
    );

    let mut document = Document::new()
        .set("width", config.width.to_string())
        .set("height", config.height.to_string())
        .set("viewBox", format!("0 0 {} {}", config.width, config.height))
        .add(
            Rectangle::new()
                .set("width", "100%")
                .set("height", "100%")
                .set("fill", "white"),
        )
        .add(
            Text::new()
                .set("x", fmt_px(width / 2.0))
                .set("y", fmt_px(TITLE_BAND_HEIGHT * 0.6))
                .set("text-anchor", "middle")
                .set("font-family", "sans-serif")
                .set("font-size", "20")
                .add(text_node(&config.title)),
        )
        .add(
            Path::new()
                .set("d", globe_outline(projection.as_ref(), &transform))
                .set("fill", "#e5ecf6")
                .set("stroke", "#444444")
                .set("stroke-width", "1"),
        )
        .add(
            Path::new()
                .set("d", graticule(projection.as_ref(), &transform))
                .set("fill", "none")
                .set("stroke", "#c8d4e3")
                .set("stroke-width", "0.5"),
        );

    let magnitude_range = series.magnitude_range();
    if let Some(range) = magnitude_range {
        document = document.add(earthquake_points(
            series,
            config,
            projection.as_ref(),
            &transform,
            range,
        ));
        document = add_color_bar(document, config, range, width, height);
    }
    Ok(document)
}

fn earthquake_points(
    series: &EarthquakeSeries,
    config: &MapConfig,
    projection: &dyn Projection,
    transform: &PixelTransform,
    magnitude_range: (f64, f64),
) -> Group {
    let mut group = Group::new()
        .set("class", "earthquakes")
        .set("fill-opacity", "0.8")
        .set("stroke", "#333333")
        .set("stroke-width", "0.3");
    // Drawn in input order, later events end up on top.
    for (index, location) in series.locations().enumerate() {
        let magnitude = series.magnitudes[index];
        let t = normalize(magnitude, magnitude_range);
        let radius = if config.size_by_magnitude {
            config.point_radius * (0.5 + 1.5 * t)
        } else {
            config.point_radius
        };
        let (x, y) = transform.to_pixel(projection.project(location));
        let hover_label = format!(
            "{}\n{}: {}\nlat: {}, lon: {}",
            series.titles[index],
            config.color_label,
            magnitude,
            location.y(),
            location.x()
        );
        group = group.add(
            Circle::new()
                .set("cx", fmt_px(x))
                .set("cy", fmt_px(y))
                .set("r", fmt_px(radius))
                .set("fill", config.color_scale.color_at(t).to_hex())
                .add(Title::new().add(text_node(&hover_label))),
        );
    }
    group
}

fn add_color_bar(
    document: Document,
    config: &MapConfig,
    (min, max): (f64, f64),
    width: f64,
    height: f64,
) -> Document {
    let bar_x = width - COLOR_BAR_BAND_WIDTH + MARGIN;
    let bar_top = TITLE_BAND_HEIGHT + MARGIN;
    let bar_height = (height - TITLE_BAND_HEIGHT - 3.0 * MARGIN).max(1.0);

    // The gradient runs bottom to top so the largest magnitude sits at the top of the bar.
    let mut gradient = LinearGradient::new()
        .set("id", COLOR_BAR_GRADIENT_ID)
        .set("x1", "0")
        .set("y1", "1")
        .set("x2", "0")
        .set("y2", "0");
    for (offset, color) in config.color_scale.sample(COLOR_BAR_STOPS) {
        gradient = gradient.add(
            Stop::new()
                .set("offset", format!("{:.1}%", offset * 100.0))
                .set("stop-color", color.to_hex()),
        );
    }

    let tick_label = |value: f64, y: f64| {
        Text::new()
            .set("x", fmt_px(bar_x + COLOR_BAR_WIDTH + 6.0))
            .set("y", fmt_px(y + 4.0))
            .set("font-family", "sans-serif")
            .set("font-size", "12")
            .add(text_node(&format!("{:.1}", value)))
    };

    let label_x = bar_x - 6.0;
    let label_y = bar_top + bar_height / 2.0;
    let bar = Group::new()
        .set("class", "color-bar")
        .add(
            Rectangle::new()
                .set("x", fmt_px(bar_x))
                .set("y", fmt_px(bar_top))
                .set("width", fmt_px(COLOR_BAR_WIDTH))
                .set("height", fmt_px(bar_height))
                .set("fill", format!("url(#{})", COLOR_BAR_GRADIENT_ID))
                .set("stroke", "#444444")
                .set("stroke-width", "0.5"),
        )
        .add(tick_label(max, bar_top))
        .add(tick_label((min + max) / 2.0, bar_top + bar_height / 2.0))
        .add(tick_label(min, bar_top + bar_height))
        .add(
            Text::new()
                .set("x", fmt_px(label_x))
                .set("y", fmt_px(label_y))
                .set("text-anchor", "middle")
                .set("font-family", "sans-serif")
                .set("font-size", "12")
                .set(
                    "transform",
                    format!("rotate(-90 {} {})", fmt_px(label_x), fmt_px(label_y)),
                )
                .add(text_node(&config.color_label)),
        );

    document.add(Definitions::new().add(gradient)).add(bar)
}

/// Path data of the globe boundary: the western edge of the antimeridian south to north, then the eastern edge
/// north to south.
fn globe_outline(projection: &dyn Projection, transform: &PixelTransform) -> String {
    let west = (-90..=90)
        .step_by(OUTLINE_STEP_DEG as usize)
        .map(|lat| (-180.0, lat as f64));
    let east = (-90..=90)
        .rev()
        .step_by(OUTLINE_STEP_DEG as usize)
        .map(|lat| (180.0, lat as f64));
    let mut data = polyline_data(projection, transform, west.chain(east));
    data.push_str(" Z");
    data
}

/// Path data of meridians and parallels every `GRATICULE_STEP_DEG` degrees.
fn graticule(projection: &dyn Projection, transform: &PixelTransform) -> String {
    let mut lines = Vec::new();
    for lon in (-180 + GRATICULE_STEP_DEG..180).step_by(GRATICULE_STEP_DEG as usize) {
        let meridian = (-90..=90)
            .step_by(OUTLINE_STEP_DEG as usize)
            .map(move |lat| (lon as f64, lat as f64));
        lines.push(polyline_data(projection, transform, meridian));
    }
    for lat in (-90 + GRATICULE_STEP_DEG..90).step_by(GRATICULE_STEP_DEG as usize) {
        let parallel = (-180..=180)
            .step_by(OUTLINE_STEP_DEG as usize)
            .map(move |lon| (lon as f64, lat as f64));
        lines.push(polyline_data(projection, transform, parallel));
    }
    lines.join(" ")
}

fn polyline_data(
    projection: &dyn Projection,
    transform: &PixelTransform,
    lon_lats: impl Iterator<Item = (f64, f64)>,
) -> String {
    lon_lats
        .enumerate()
        .map(|(index, (lon, lat))| {
            let (x, y) = transform.to_pixel(projection.project(geo::Point::new(lon, lat)));
            let command = if index == 0 { 'M' } else { 'L' };
            format!("{}{},{}", command, fmt_px(x), fmt_px(y))
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Text content node with XML markup characters escaped. The svg crate writes text nodes verbatim, and titles come
/// straight from the input feed.
fn text_node(content: &str) -> svg::node::Text {
    svg::node::Text::new(escape_xml(content))
}

fn escape_xml(content: &str) -> String {
    let mut escaped = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn fmt_px(value: f64) -> String {
    format!("{:.2}", value)
}
