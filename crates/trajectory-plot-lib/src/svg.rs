//! Static backend: figures drawn to SVG with plotters
//!
//! A [`Figure`] is the axis handle. Every line-plot call appends a layer of colored segments;
//! nothing is drawn until [`Figure::to_svg_string`] or [`Figure::save_svg`].

use crate::{
    Color, ColorRamp, LineColor, LineTable, PlotError, Result, StaticLineStyle, StaticRenderer,
};
use geo::Line;
use plotters::prelude::{ChartBuilder, IntoDrawingArea, PathElement, RGBColor, Rectangle, SVGBackend, WHITE};
use plotters::style::Color as _;
use std::path::Path;

/// Default figure size in inches
const DEFAULT_FIGSIZE: (f64, f64) = (6.4, 4.8);

/// Width in pixels reserved for the color bar
const COLORBAR_WIDTH: u32 = 60;

/// Number of steps the color bar is drawn with
const COLORBAR_STEPS: i32 = 64;

/// Value range displayed by a color bar
#[derive(Clone, Copy, Debug, PartialEq)]
struct ColorBar {
    vmin: f64,
    vmax: f64,
}

#[derive(Clone, Debug, PartialEq)]
struct FigureLayer {
    segments: Vec<(Line<f64>, Color)>,
    line_width: u32,
    colorbar: Option<ColorBar>,
}

/// A figure with a single axis, accumulating line layers
#[derive(Clone, Debug, PartialEq)]
pub struct Figure {
    size: (u32, u32),
    ramp: ColorRamp,
    layers: Vec<FigureLayer>,
}

impl Figure {
    /// Size in pixels
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Segment colors of one layer, in drawing order
    pub fn layer_colors(&self, layer: usize) -> Option<Vec<Color>> {
        self.layers
            .get(layer)
            .map(|layer| layer.segments.iter().map(|(_, color)| *color).collect())
    }

    /// Number of color bars the figure will draw
    pub fn colorbar_count(&self) -> usize {
        self.layers.iter().filter(|layer| layer.colorbar.is_some()).count()
    }

    /// Data bounds over all layers as ((min_x, max_x), (min_y, max_y))
    fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let mut coords = self
            .layers
            .iter()
            .flat_map(|layer| layer.segments.iter())
            .flat_map(|(line, _)| [line.start, line.end]);
        let first = coords.next()?;
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
        for coord in coords {
            min_x = min_x.min(coord.x);
            max_x = max_x.max(coord.x);
            min_y = min_y.min(coord.y);
            max_y = max_y.max(coord.y);
        }
        Some((pad(min_x, max_x), pad(min_y, max_y)))
    }

    pub fn to_svg_string(&self) -> Result<String> {
        #[cfg(feature = "profiling")]
        profiling::scope!("figure::to_svg_string");

        let mut buffer = String::new();
        {
            let root = SVGBackend::with_string(&mut buffer, self.size).into_drawing_area();
            root.fill(&WHITE).map_err(render_error)?;

            let colorbar = self.layers.iter().find_map(|layer| layer.colorbar);
            let (plot_area, bar_area) = match colorbar {
                Some(_) if self.size.0 > COLORBAR_WIDTH * 2 => {
                    let (plot, bar) = root.split_horizontally(self.size.0 - COLORBAR_WIDTH);
                    (plot, Some(bar))
                }
                _ => (root.clone(), None),
            };

            if let Some(((min_x, max_x), (min_y, max_y))) = self.bounds() {
                let mut chart = ChartBuilder::on(&plot_area)
                    .margin(20)
                    .build_cartesian_2d(min_x..max_x, min_y..max_y)
                    .map_err(render_error)?;
                for layer in &self.layers {
                    let width = layer.line_width;
                    chart
                        .draw_series(layer.segments.iter().map(|(line, color)| {
                            PathElement::new(
                                vec![(line.start.x, line.start.y), (line.end.x, line.end.y)],
                                to_rgb(*color).stroke_width(width),
                            )
                        }))
                        .map_err(render_error)?;
                }
            }

            if let (Some(bar), Some(area)) = (colorbar, bar_area) {
                let (width, height) = area.dim_in_pixel();
                let (left, right) = (15, width as i32 - 15);
                let (top, bottom) = (20, height as i32 - 20);
                let step = ((bottom - top) / COLORBAR_STEPS).max(1);
                for i in 0..COLORBAR_STEPS {
                    let y0 = bottom - (i + 1) * step;
                    let t = i as f64 / (COLORBAR_STEPS - 1) as f64;
                    let value = bar.vmin + t * (bar.vmax - bar.vmin);
                    let color = self.ramp.sample(value, bar.vmin, bar.vmax);
                    area.draw(&Rectangle::new(
                        [(left, y0), (right, y0 + step)],
                        to_rgb(color).filled(),
                    ))
                    .map_err(render_error)?;
                }
            }

            root.present().map_err(render_error)?;
        }
        Ok(buffer)
    }

    pub fn save_svg(&self, path: impl AsRef<Path>) -> Result<()> {
        let svg = self.to_svg_string()?;
        std::fs::write(path.as_ref(), svg)?;
        tracing::info!("Saved figure to {}", path.as_ref().display());
        Ok(())
    }
}

/// Renders line tables into [`Figure`]s
#[derive(Clone, Debug)]
pub struct SvgRenderer {
    /// Pixels per inch of figure size
    pub dpi: f64,
    pub ramp: ColorRamp,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            dpi: 100.0,
            ramp: ColorRamp::default(),
        }
    }
}

impl StaticRenderer for SvgRenderer {
    type Axis = Figure;

    fn create_axis(&mut self, figsize: Option<(f64, f64)>) -> Result<Figure> {
        let (width, height) = figsize.unwrap_or(DEFAULT_FIGSIZE);
        let to_pixels = |inches: f64| (inches * self.dpi).round().max(1.0) as u32;
        Ok(Figure {
            size: (to_pixels(width), to_pixels(height)),
            ramp: self.ramp.clone(),
            layers: Vec::new(),
        })
    }

    fn plot_lines(
        &mut self,
        mut axis: Figure,
        table: &LineTable,
        style: &StaticLineStyle,
    ) -> Result<Figure> {
        let mut colorbar = None;
        let segments = match &style.color {
            LineColor::Fixed(color) => table.lines().iter().map(|line| (*line, *color)).collect(),
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
                if style.legend {
                    colorbar = Some(ColorBar { vmin, vmax });
                }
                table
                    .lines()
                    .iter()
                    .zip(values)
                    .map(|(line, value)| (*line, self.ramp.sample(*value, vmin, vmax)))
                    .collect()
            }
            LineColor::Ranged { column: None, .. } => table
                .lines()
                .iter()
                .map(|line| (*line, Color::DEFAULT_LINE))
                .collect(),
        };
        if !style.passthrough.is_empty() {
            tracing::debug!(
                "SVG renderer ignores options: {:?}",
                style.passthrough.keys().collect::<Vec<_>>()
            );
        }
        axis.layers.push(FigureLayer {
            segments,
            line_width: style.line_width.round().max(1.0) as u32,
            colorbar,
        });
        Ok(axis)
    }
}

fn to_rgb(color: Color) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

/// Widen a degenerate or tight range so it can be drawn
fn pad(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    let margin = if span > 0.0 { span * 0.05 } else { 1.0 };
    (min - margin, max + margin)
}

fn render_error(error: impl std::fmt::Display) -> PlotError {
    PlotError::Render(error.to_string())
}
