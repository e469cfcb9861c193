//! Interactive backend producing a plain, serializable overlay
//!
//! [`OverlayRenderer`] resolves every render call into colored segments and markers. The
//! resulting [`Overlay`] is what a map viewer draws over its tiles, and can be exported as
//! JSON with the `serde` feature.

use crate::{
    Color, ColorRamp, Compose, Crs, EndMarker, InteractiveLineStyle, InteractiveRenderer,
    LineColor, LineTable, MarkerShape, MarkerStyle, OverlayDefaults, PlotError, Result, Tiles,
};
use geo::{Coord, Rect};
use std::collections::BTreeMap;

/// One colored segment with its hover values
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlaySegment {
    pub start: Coord<f64>,
    pub end: Coord<f64>,
    pub color: Color,
    pub hover: BTreeMap<String, f64>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineLayer {
    pub segments: Vec<OverlaySegment>,
    pub width: f64,
    pub crs: Option<Crs>,
    pub geo: bool,
    pub tiles: Tiles,
    pub label: Option<String>,
    /// Value range of the color bar, when one is shown
    pub colorbar: Option<(f64, f64)>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerLayer {
    pub position: Coord<f64>,
    pub crs: Option<Crs>,
    pub shape: MarkerShape,
    /// Rotation in degrees, counter-clockwise
    pub angle: f64,
    pub size: f64,
    pub color: Color,
    pub hover: BTreeMap<String, f64>,
    pub geo: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverlayLayer {
    Lines(LineLayer),
    Markers(MarkerLayer),
}

/// Layers drawn bottom to top, plus the display defaults of the overlay
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Overlay {
    pub defaults: Option<OverlayDefaults>,
    pub layers: Vec<OverlayLayer>,
}

impl Overlay {
    pub fn line_layers(&self) -> impl Iterator<Item = &LineLayer> {
        self.layers.iter().filter_map(|layer| match layer {
            OverlayLayer::Lines(lines) => Some(lines),
            OverlayLayer::Markers(_) => None,
        })
    }

    pub fn markers(&self) -> impl Iterator<Item = &MarkerLayer> {
        self.layers.iter().filter_map(|layer| match layer {
            OverlayLayer::Markers(marker) => Some(marker),
            OverlayLayer::Lines(_) => None,
        })
    }

    /// Basemap of the overlay: the tiles of the first line layer requesting any
    pub fn tiles(&self) -> Tiles {
        self.line_layers()
            .map(|layer| layer.tiles)
            .find(Tiles::is_enabled)
            .unwrap_or(Tiles::None)
    }

    /// Centroid of all segment endpoints, used to center a viewer
    pub fn center(&self) -> Option<Coord<f64>> {
        let (sum, count) = self
            .line_layers()
            .flat_map(|layer| layer.segments.iter())
            .flat_map(|segment| [segment.start, segment.end])
            .fold((Coord { x: 0.0, y: 0.0 }, 0usize), |(sum, count), coord| {
                (sum + coord, count + 1)
            });
        (count > 0).then(|| sum / count as f64)
    }

    /// Bounding rectangle of all segments and markers
    pub fn bounds(&self) -> Option<Rect<f64>> {
        let mut coords = self
            .line_layers()
            .flat_map(|layer| layer.segments.iter())
            .flat_map(|segment| [segment.start, segment.end])
            .chain(self.markers().map(|marker| marker.position));
        let first = coords.next()?;
        let (min, max) = coords.fold((first, first), |(min, max), coord| {
            (
                Coord {
                    x: min.x.min(coord.x),
                    y: min.y.min(coord.y),
                },
                Coord {
                    x: max.x.max(coord.x),
                    y: max.y.max(coord.y),
                },
            )
        });
        Some(Rect::new(min, max))
    }
}

impl Compose for Overlay {
    fn compose(mut self, top: Self) -> Self {
        if self.defaults.is_none() {
            self.defaults = top.defaults;
        }
        self.layers.extend(top.layers);
        self
    }
}

/// Interactive renderer resolving styles into an [`Overlay`]
#[derive(Clone, Debug)]
pub struct OverlayRenderer {
    pub ramp: ColorRamp,
    defaults: Option<OverlayDefaults>,
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self {
            ramp: ColorRamp::default(),
            defaults: None,
        }
    }
}

impl OverlayRenderer {
    pub fn defaults(&self) -> Option<&OverlayDefaults> {
        self.defaults.as_ref()
    }

    fn overlay(&self, layer: OverlayLayer) -> Overlay {
        Overlay {
            defaults: self.defaults.clone(),
            layers: vec![layer],
        }
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl InteractiveRenderer for OverlayRenderer {
    type Drawable = Overlay;

    fn check_capability(&self) -> Result<()> {
        Ok(())
    }

    fn configure_overlay(&mut self, defaults: &OverlayDefaults) {
        self.defaults = Some(defaults.clone());
    }

    fn render_lines(&mut self, table: &LineTable, style: &InteractiveLineStyle) -> Result<Overlay> {
        let mut colorbar = None;
        let colors: Vec<Color> = match &style.color {
            LineColor::Fixed(color) => vec![*color; table.len()],
            LineColor::Ranged {
                column: Some(column),
                vmin,
                vmax,
            } => {
                let values = table
                    .column(column)
                    .ok_or_else(|| PlotError::UnknownColumn(column.clone()))?;
                let (table_min, table_max) = table.value_range(column).unwrap_or((0.0, 0.0));
                let vmin = vmin.unwrap_or(table_min);
                let vmax = vmax.unwrap_or(table_max);
                if style.colorbar {
                    colorbar = Some((vmin, vmax));
                }
                values
                    .iter()
                    .map(|value| self.ramp.sample(*value, vmin, vmax))
                    .collect()
            }
            LineColor::Ranged { column: None, .. } => vec![Color::DEFAULT_LINE; table.len()],
        };

        let hover_columns: Vec<(&str, &[f64])> = style
            .hover_cols
            .iter()
            .filter_map(|name| table.column(name).map(|values| (name.as_str(), values)))
            .collect();
        let segments = table
            .lines()
            .iter()
            .zip(colors)
            .enumerate()
            .map(|(row, (line, color))| OverlaySegment {
                start: line.start,
                end: line.end,
                color,
                hover: hover_columns
                    .iter()
                    .map(|(name, values)| (name.to_string(), values[row]))
                    .collect(),
            })
            .collect();

        Ok(self.overlay(OverlayLayer::Lines(LineLayer {
            segments,
            width: style.line_width,
            crs: table.crs(),
            geo: style.geo,
            tiles: style.tiles,
            label: style.label.clone(),
            colorbar,
        })))
    }

    fn render_end_marker(&mut self, marker: &EndMarker, style: &MarkerStyle) -> Result<Overlay> {
        let hover = style
            .hover_cols
            .iter()
            .filter_map(|name| marker.value(name).map(|value| (name.clone(), value)))
            .collect();
        let angle = marker.value(&style.angle_column).unwrap_or_default();
        Ok(self.overlay(OverlayLayer::Markers(MarkerLayer {
            position: marker.position.0,
            crs: marker.crs,
            shape: style.shape,
            angle,
            size: style.size,
            color: style.color.unwrap_or(Color::DEFAULT_LINE),
            hover,
            geo: style.geo,
        })))
    }
}
