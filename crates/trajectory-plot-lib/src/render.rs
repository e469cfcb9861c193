//! Renderer seams
//!
//! The stylers never draw anything themselves. They prepare a [`LineTable`] or an
//! [`EndMarker`] plus a per-call style and hand both to a backend implementing
//! [`StaticRenderer`] or [`InteractiveRenderer`].

use crate::{Color, EndMarker, LineTable, OptionValue, Result, Tiles};
use std::collections::BTreeMap;

/// How a line render call colors its segments
#[derive(Clone, Debug, PartialEq)]
pub enum LineColor {
    /// One color for the whole trajectory
    Fixed(Color),
    /// Color each segment by `column` within `[vmin, vmax]`
    ///
    /// Without a column the renderer uses its default color. Missing bounds are taken from
    /// the table being drawn.
    Ranged {
        column: Option<String>,
        vmin: Option<f64>,
        vmax: Option<f64>,
    },
}

/// Arguments of one static line-plot call
#[derive(Clone, Debug, PartialEq)]
pub struct StaticLineStyle {
    pub color: LineColor,
    pub legend: bool,
    pub line_width: f64,
    pub passthrough: BTreeMap<String, OptionValue>,
}

/// A figure/axis based renderer
pub trait StaticRenderer {
    /// Handle on the axis drawn into; returned from every call so renders can be layered
    type Axis;

    /// Create a fresh figure and axis, `figsize` in inches
    fn create_axis(&mut self, figsize: Option<(f64, f64)>) -> Result<Self::Axis>;

    fn plot_lines(
        &mut self,
        axis: Self::Axis,
        table: &LineTable,
        style: &StaticLineStyle,
    ) -> Result<Self::Axis>;
}

/// Display options shared by every overlay of an interactive renderer
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayDefaults {
    pub width: u32,
    pub height: u32,
    pub active_tools: Vec<String>,
}

/// Arguments of one interactive line render call
#[derive(Clone, Debug, PartialEq)]
pub struct InteractiveLineStyle {
    pub color: LineColor,
    pub line_width: f64,
    pub geo: bool,
    pub tiles: Tiles,
    pub label: Option<String>,
    pub colorbar: bool,
    pub hover_cols: Vec<String>,
    pub passthrough: BTreeMap<String, OptionValue>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarkerShape {
    #[default]
    Triangle,
}

/// Arguments of one interactive end-marker render call
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    pub size: f64,
    /// Column of the marker table holding the rotation in degrees
    pub angle_column: String,
    pub color: Option<Color>,
    pub hover_cols: Vec<String>,
    pub geo: bool,
    pub tiles: Tiles,
    pub passthrough: BTreeMap<String, OptionValue>,
}

/// Layering of interactive drawables; `top` is drawn over `self`
pub trait Compose {
    fn compose(self, top: Self) -> Self;
}

/// A tile-based, interactive renderer
pub trait InteractiveRenderer {
    type Drawable: Compose;

    /// Fails with [`crate::PlotError::MissingCapability`] when the backend cannot render
    fn check_capability(&self) -> Result<()>;

    fn configure_overlay(&mut self, defaults: &OverlayDefaults);

    fn render_lines(
        &mut self,
        table: &LineTable,
        style: &InteractiveLineStyle,
    ) -> Result<Self::Drawable>;

    fn render_end_marker(
        &mut self,
        marker: &EndMarker,
        style: &MarkerStyle,
    ) -> Result<Self::Drawable>;
}
