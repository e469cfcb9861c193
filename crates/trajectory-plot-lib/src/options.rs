//! Styling options: an open key/value bag resolved once into a typed configuration
//!
//! [`PlotOptions`] accepts arbitrary keys. [`PlotConfig::from_options`] takes out the keys the
//! stylers understand, applies defaults, and keeps every other key in
//! [`PlotConfig::passthrough`] for the renderer.

use crate::{Color, ColorMap, PlotError, Result, Tiles};
use std::collections::BTreeMap;

/// A single option value
#[derive(Clone, Debug, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
    ColorMap(ColorMap),
}

impl OptionValue {
    /// Parse a raw command-line value: booleans, numbers, comma lists, else text
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw {
            "true" => return Self::Bool(true),
            "false" => return Self::Bool(false),
            _ => {}
        }
        if let Ok(number) = raw.parse::<f64>() {
            return Self::Number(number);
        }
        if raw.contains(',') {
            return Self::List(raw.split(',').map(|item| item.trim().to_string()).collect());
        }
        Self::Text(raw.to_string())
    }

    /// Textual form, lists joined back with commas
    fn as_text(&self) -> Option<String> {
        match self {
            Self::Bool(value) => Some(value.to_string()),
            Self::Number(value) => Some(value.to_string()),
            Self::Text(value) => Some(value.clone()),
            Self::List(items) => Some(items.join(",")),
            Self::ColorMap(_) => None,
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for OptionValue {
    fn from(value: u32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<ColorMap> for OptionValue {
    fn from(value: ColorMap) -> Self {
        Self::ColorMap(value)
    }
}

/// Open bag of caller-supplied styling options
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlotOptions {
    entries: BTreeMap<String, OptionValue>,
}

impl PlotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<OptionValue> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse `key=value` pairs, as given on the command line
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair.split_once('=').ok_or_else(|| PlotError::InvalidOption {
                key: pair.to_string(),
                reason: "expected key=value".to_string(),
            })?;
            options.insert(key.trim(), OptionValue::parse(value));
        }
        Ok(options)
    }

    pub fn into_entries(self) -> BTreeMap<String, OptionValue> {
        self.entries
    }
}

/// Typed styling configuration, resolved once from [`PlotOptions`]
#[derive(Clone, Debug, PartialEq)]
pub struct PlotConfig {
    /// Interactive overlay width in pixels
    pub width: u32,
    /// Interactive overlay height in pixels
    pub height: u32,
    /// Static figure size in inches
    pub figsize: Option<(f64, f64)>,
    /// Column whose values drive the color
    pub column: Option<String>,
    /// Explicit value-to-color mapping, used with `column`
    pub colormap: Option<ColorMap>,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    /// Render in geographic mode, reprojecting to lon/lat
    pub geo: bool,
    pub tiles: Tiles,
    pub marker_size: f64,
    pub marker_color: Option<Color>,
    pub line_width: f64,
    /// Extra columns shown when hovering interactive markers
    pub hover_cols: Vec<String>,
    pub legend: bool,
    pub colorbar: Option<bool>,
    /// Options not understood here, handed to the renderer untouched
    pub passthrough: BTreeMap<String, OptionValue>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 900,
            height: 700,
            figsize: None,
            column: None,
            colormap: None,
            vmin: None,
            vmax: None,
            geo: true,
            tiles: Tiles::OpenStreetMap,
            marker_size: 200.0,
            marker_color: None,
            line_width: 3.0,
            hover_cols: Vec::new(),
            legend: true,
            colorbar: None,
            passthrough: BTreeMap::new(),
        }
    }
}

impl PlotConfig {
    /// Resolve the options bag
    ///
    /// `c` takes precedence over `column`, and `column_to_color` over `colormap`.
    pub fn from_options(options: PlotOptions) -> Result<Self> {
        let mut entries = options.into_entries();
        let defaults = Self::default();

        let mut take = |key: &str| entries.remove(key);

        let width = take_u32(take("width"), "width")?.unwrap_or(defaults.width);
        let height = take_u32(take("height"), "height")?.unwrap_or(defaults.height);
        let figsize = take_figsize(take("figsize"))?;

        let column = take_text(take("column"), "column")?;
        let column = take_text(take("c"), "c")?.or(column);

        let colormap = take_colormap(take("colormap"), "colormap")?;
        let colormap = take_colormap(take("column_to_color"), "column_to_color")?.or(colormap);

        let vmin = take_number(take("vmin"), "vmin")?;
        let vmax = take_number(take("vmax"), "vmax")?;
        let geo = take_bool(take("geo"), "geo")?.unwrap_or(defaults.geo);
        let tiles = take_tiles(take("tiles"))?.unwrap_or(defaults.tiles);
        let marker_size = take_number(take("marker_size"), "marker_size")?
            .unwrap_or(defaults.marker_size);
        let marker_color = take_text(take("marker_color"), "marker_color")?
            .map(|color| color.parse::<Color>())
            .transpose()?;
        let line_width =
            take_number(take("line_width"), "line_width")?.unwrap_or(defaults.line_width);
        let hover_cols = take_list(take("hover_cols"), "hover_cols")?;
        let legend = take_bool(take("legend"), "legend")?.unwrap_or(defaults.legend);
        let colorbar = take_bool(take("colorbar"), "colorbar")?;

        let config = Self {
            width,
            height,
            figsize,
            column,
            colormap,
            vmin,
            vmax,
            geo,
            tiles,
            marker_size,
            marker_color,
            line_width,
            hover_cols,
            legend,
            colorbar,
            passthrough: entries,
        };
        tracing::debug!(
            "Resolved plot config: column={:?}, geo={}, tiles={:?}, {} pass-through option(s)",
            config.column,
            config.geo,
            config.tiles,
            config.passthrough.len()
        );
        Ok(config)
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> PlotError {
    PlotError::InvalidOption {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn take_number(value: Option<OptionValue>, key: &str) -> Result<Option<f64>> {
    match value {
        None => Ok(None),
        Some(OptionValue::Number(number)) => Ok(Some(number)),
        Some(other) => Err(invalid(key, format!("expected a number, got {other:?}"))),
    }
}

fn take_u32(value: Option<OptionValue>, key: &str) -> Result<Option<u32>> {
    match take_number(value, key)? {
        None => Ok(None),
        Some(number) if number.is_finite() && number >= 1.0 && number <= u32::MAX as f64 => {
            Ok(Some(number.round() as u32))
        }
        Some(number) => Err(invalid(key, format!("{number} is not a valid size"))),
    }
}

fn take_bool(value: Option<OptionValue>, key: &str) -> Result<Option<bool>> {
    match value {
        None => Ok(None),
        Some(OptionValue::Bool(flag)) => Ok(Some(flag)),
        Some(other) => Err(invalid(key, format!("expected true or false, got {other:?}"))),
    }
}

fn take_text(value: Option<OptionValue>, key: &str) -> Result<Option<String>> {
    match value {
        None => Ok(None),
        Some(OptionValue::Text(text)) => Ok(Some(text)),
        Some(other) => Err(invalid(key, format!("expected text, got {other:?}"))),
    }
}

fn take_list(value: Option<OptionValue>, key: &str) -> Result<Vec<String>> {
    match value {
        None => Ok(Vec::new()),
        Some(OptionValue::List(items)) => Ok(items),
        Some(OptionValue::Text(item)) => Ok(vec![item]),
        Some(other) => Err(invalid(key, format!("expected a list, got {other:?}"))),
    }
}

fn take_colormap(value: Option<OptionValue>, key: &str) -> Result<Option<ColorMap>> {
    match value {
        None => Ok(None),
        Some(OptionValue::ColorMap(map)) => Ok(Some(map)),
        Some(other) => {
            let text = other
                .as_text()
                .ok_or_else(|| invalid(key, "expected value:color pairs"))?;
            text.parse().map(Some)
        }
    }
}

fn take_tiles(value: Option<OptionValue>) -> Result<Option<Tiles>> {
    match value {
        None => Ok(None),
        Some(OptionValue::Bool(false)) => Ok(Some(Tiles::None)),
        Some(OptionValue::Bool(true)) => Ok(Some(Tiles::OpenStreetMap)),
        Some(OptionValue::Text(name)) => name.parse().map(Some),
        Some(other) => Err(invalid("tiles", format!("expected a tile source, got {other:?}"))),
    }
}

fn take_figsize(value: Option<OptionValue>) -> Result<Option<(f64, f64)>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let text = value
        .as_text()
        .ok_or_else(|| invalid("figsize", "expected width,height"))?;
    let parsed: Vec<f64> = text
        .split([',', 'x'])
        .map(|part| part.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| invalid("figsize", format!("{text:?} is not width,height")))?;
    match parsed.as_slice() {
        [width, height] if *width > 0.0 && *height > 0.0 => Ok(Some((*width, *height))),
        _ => Err(invalid("figsize", format!("{text:?} is not width,height"))),
    }
}
