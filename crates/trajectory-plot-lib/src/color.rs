//! Colors, explicit value-to-color maps and continuous color ramps

use crate::{PlotError, Result};
use ordered_float::OrderedFloat;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// An opaque RGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Neutral fallback for values missing from a [`ColorMap`]
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    /// Default line color when no column drives the color
    pub const DEFAULT_LINE: Color = Color::rgb(31, 119, 180);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Hex representation, `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn lerp(self, other: Color, t: f64) -> Color {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color::rgb(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || PlotError::InvalidOption {
            key: "color".to_string(),
            reason: format!("unrecognized color {s:?}"),
        };
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(invalid());
            }
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
            };
            return Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?));
        }
        let color = match s.to_ascii_lowercase().as_str() {
            "black" => Color::BLACK,
            "white" => Color::WHITE,
            "gray" | "grey" => Color::GRAY,
            "red" => Color::rgb(214, 39, 40),
            "green" => Color::rgb(44, 160, 44),
            "blue" => Color::DEFAULT_LINE,
            "orange" => Color::rgb(255, 127, 14),
            "purple" => Color::rgb(148, 103, 189),
            "brown" => Color::rgb(140, 86, 75),
            "pink" => Color::rgb(227, 119, 194),
            "olive" => Color::rgb(188, 189, 34),
            "cyan" => Color::rgb(23, 190, 207),
            "yellow" => Color::rgb(255, 221, 0),
            _ => return Err(invalid()),
        };
        Ok(color)
    }
}

/// Explicit mapping from a column value to a fixed color
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorMap {
    entries: BTreeMap<OrderedFloat<f64>, Color>,
}

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, value: f64, color: Color) -> Self {
        self.insert(value, color);
        self
    }

    pub fn insert(&mut self, value: f64, color: Color) {
        self.entries.insert(OrderedFloat(value), color);
    }

    pub fn get(&self, value: f64) -> Option<Color> {
        self.entries.get(&OrderedFloat(value)).copied()
    }

    /// Color for `value`, or [`Color::GRAY`] when the map has no entry for it
    pub fn lookup(&self, value: f64) -> Color {
        self.get(value).unwrap_or_else(|| {
            tracing::debug!("No color mapped for value {}, falling back to gray", value);
            Color::GRAY
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromStr for ColorMap {
    type Err = PlotError;

    /// Parse `value:color` pairs separated by commas, e.g. `1:red,2:#00ff00`
    fn from_str(s: &str) -> Result<Self> {
        let mut map = ColorMap::new();
        for pair in s.split(',').filter(|pair| !pair.trim().is_empty()) {
            let (value, color) = pair.split_once(':').ok_or_else(|| PlotError::InvalidOption {
                key: "colormap".to_string(),
                reason: format!("expected value:color, got {pair:?}"),
            })?;
            let value: f64 = value.trim().parse().map_err(|_| PlotError::InvalidOption {
                key: "colormap".to_string(),
                reason: format!("{value:?} is not a number"),
            })?;
            map.insert(value, color.parse()?);
        }
        Ok(map)
    }
}

/// Piecewise-linear gradient mapping `[vmin, vmax]` onto colors
#[derive(Clone, Debug, PartialEq)]
pub struct ColorRamp {
    stops: Vec<Color>,
}

impl Default for ColorRamp {
    /// A five-stop approximation of viridis
    fn default() -> Self {
        Self {
            stops: vec![
                Color::rgb(68, 1, 84),
                Color::rgb(59, 82, 139),
                Color::rgb(33, 145, 140),
                Color::rgb(94, 201, 98),
                Color::rgb(253, 231, 37),
            ],
        }
    }
}

impl ColorRamp {
    /// Ramp through `stops`; needs at least one stop
    pub fn new(stops: Vec<Color>) -> Option<Self> {
        (!stops.is_empty()).then_some(Self { stops })
    }

    /// Color of `value` within `[vmin, vmax]`, clamped at both ends
    pub fn sample(&self, value: f64, vmin: f64, vmax: f64) -> Color {
        let span = vmax - vmin;
        let t = if span > 0.0 && value.is_finite() {
            ((value - vmin) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let last = self.stops.len() - 1;
        if last == 0 {
            return self.stops[0];
        }
        let scaled = t * last as f64;
        let index = (scaled.floor() as usize).min(last - 1);
        self.stops[index].lerp(self.stops[index + 1], scaled - index as f64)
    }
}
