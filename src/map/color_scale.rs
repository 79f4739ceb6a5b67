use serde::Deserialize;

/// An sRGB color with 8 bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Hex notation as used in SVG attributes, e.g. `#ff0000`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    fn lerp(&self, other: &Rgb, t: f64) -> Rgb {
        let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(
            channel(self.0, other.0),
            channel(self.1, other.1),
            channel(self.2, other.2),
        )
    }
}

/// Continuous color scales, using the same stops as the matching plotly scales.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColorScale {
    #[default]
    Rainbow,
    Viridis,
    Jet,
    Bluered,
}

impl ColorScale {
    /// Stops as (position, color), positions increasing from 0.0 to 1.0.
    fn stops(&self) -> Vec<(f64, Rgb)> {
        match self {
            ColorScale::Rainbow => evenly_spaced(&[
                Rgb(150, 0, 90),
                Rgb(0, 0, 200),
                Rgb(0, 25, 255),
                Rgb(0, 152, 255),
                Rgb(44, 255, 150),
                Rgb(151, 255, 0),
                Rgb(255, 234, 0),
                Rgb(255, 111, 0),
                Rgb(255, 0, 0),
            ]),
            ColorScale::Viridis => evenly_spaced(&[
                Rgb(0x44, 0x01, 0x54),
                Rgb(0x48, 0x28, 0x78),
                Rgb(0x3e, 0x49, 0x89),
                Rgb(0x31, 0x68, 0x8e),
                Rgb(0x26, 0x82, 0x8e),
                Rgb(0x1f, 0x9e, 0x89),
                Rgb(0x35, 0xb7, 0x79),
                Rgb(0x6e, 0xce, 0x58),
                Rgb(0xb5, 0xde, 0x2b),
                Rgb(0xfd, 0xe7, 0x25),
            ]),
            ColorScale::Jet => vec![
                (0.0, Rgb(0, 0, 131)),
                (0.125, Rgb(0, 60, 170)),
                (0.375, Rgb(5, 255, 255)),
                (0.625, Rgb(255, 255, 0)),
                (0.875, Rgb(250, 0, 0)),
                (1.0, Rgb(128, 0, 0)),
            ],
            ColorScale::Bluered => evenly_spaced(&[Rgb(0, 0, 255), Rgb(255, 0, 0)]),
        }
    }

    /// Color at position `t` of the scale. `t` is clamped to [0, 1], NaN maps to the start of the scale.
    pub fn color_at(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let stops = self.stops();
        for window in stops.windows(2) {
            let (start_pos, start_color) = window[0];
            let (end_pos, end_color) = window[1];
            if t <= end_pos {
                let local_t = (t - start_pos) / (end_pos - start_pos);
                return start_color.lerp(&end_color, local_t);
            }
        }
        stops[stops.len() - 1].1
    }

    /// `n` colors sampled evenly from the scale, used for gradient stops of the color bar.
    pub fn sample(&self, n: usize) -> Vec<(f64, Rgb)> {
        match n {
            0 => vec![],
            1 => vec![(0.0, self.color_at(0.0))],
            _ => (0..n)
                .map(|i| {
                    let t = i as f64 / (n - 1) as f64;
                    (t, self.color_at(t))
                })
                .collect(),
        }
    }
}

fn evenly_spaced(colors: &[Rgb]) -> Vec<(f64, Rgb)> {
    let last = (colors.len() - 1) as f64;
    colors
        .iter()
        .enumerate()
        .map(|(index, color)| (index as f64 / last, *color))
        .collect()
}

/// Position of `value` within `range` on [0, 1]. A degenerate range, e.g. a single earthquake, maps to the middle.
pub fn normalize(value: f64, (min, max): (f64, f64)) -> f64 {
    if max - min <= f64::EPSILON {
        return 0.5;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}
