//! Per-trajectory styling shared by the single and collection plotters
//!
//! The [`Styler`] owns the resolved [`PlotConfig`] and a small [`RenderPass`] holding the
//! overrides that change between consecutive render calls (legend, color column, tiles).
//! Derived columns are only ever added to owned working copies, never to caller data.

use crate::{
    Color, Compose, Crs, EndMarker, InteractiveLineStyle, InteractiveRenderer, LineColor,
    MarkerShape, MarkerStyle, OverlayDefaults, PlotConfig, Result, StaticLineStyle,
    StaticRenderer, TRIANGLE_ANGLE_COLUMN, Tiles, Trajectory,
};
use std::borrow::Cow;

/// Value range applied to color-by-column renders
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorScale {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Overrides carried from one render call to the next
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RenderPass {
    pub legend: bool,
    /// Whether ranged renders still receive the color column
    pub column_active: bool,
    pub tiles: Tiles,
}

#[derive(Clone, Debug)]
pub(crate) struct Styler {
    pub config: PlotConfig,
    pub scale: ColorScale,
    pub pass: RenderPass,
}

impl Styler {
    pub fn new(config: PlotConfig) -> Self {
        let scale = ColorScale {
            min: config.vmin,
            max: config.vmax,
        };
        let pass = RenderPass {
            legend: config.legend,
            column_active: true,
            tiles: config.tiles,
        };
        Self {
            config,
            scale,
            pass,
        }
    }

    /// Whether the color column is the derived speed and absent from `trajectory`
    pub fn needs_speed(&self, trajectory: &Trajectory) -> bool {
        self.config.column.as_deref() == Some(trajectory.speed_column_name())
            && !trajectory.has_column(trajectory.speed_column_name())
    }

    /// The trajectory itself, or an owned copy carrying the derived speed column
    pub fn working_copy<'t>(&self, trajectory: &'t Trajectory) -> Result<Cow<'t, Trajectory>> {
        if !self.needs_speed(trajectory) {
            return Ok(Cow::Borrowed(trajectory));
        }
        let mut copy = trajectory.clone();
        copy.add_speed(true)?;
        Ok(Cow::Owned(copy))
    }

    /// Final position with the heading and the triangle rotation (negated heading)
    pub fn end_with_direction(&self, trajectory: &Trajectory) -> Result<EndMarker> {
        let working = self.working_copy(trajectory)?;
        let direction_name = working.direction_column_name();
        let direction = match working.column(direction_name) {
            Some(values) => values.last().copied(),
            None => working.compute_direction().last().copied(),
        }
        .unwrap_or_default();

        let mut values = working.last_row();
        values.insert(direction_name.to_string(), direction);
        values.insert(TRIANGLE_ANGLE_COLUMN.to_string(), -direction);

        let last = working
            .points()
            .last()
            .map(|point| point.position)
            .unwrap_or_else(|| geo::Point::new(0.0, 0.0));
        Ok(EndMarker {
            position: last,
            values,
            crs: working.crs(),
        })
    }

    /// Color from the explicit color map, keyed by the column's maximum
    ///
    /// Returns the color and the maximum it was looked up with.
    fn mapped_color(&self, working: &Trajectory) -> Option<(Color, Option<f64>)> {
        let column = self.config.column.as_deref()?;
        let colormap = self.config.colormap.as_ref()?;
        let max = working.max_of(column);
        let color = match max {
            Some(value) => colormap.lookup(value),
            None => {
                tracing::debug!("Column {} missing on {}, using gray", column, working.id());
                Color::GRAY
            }
        };
        Some((color, max))
    }

    fn ranged_color(&self) -> LineColor {
        LineColor::Ranged {
            column: self
                .config
                .column
                .clone()
                .filter(|_| self.pass.column_active),
            vmin: self.scale.min,
            vmax: self.scale.max,
        }
    }

    /// Issue one static line-plot call for `trajectory`
    pub fn plot_trajectory<R: StaticRenderer>(
        &self,
        renderer: &mut R,
        axis: R::Axis,
        trajectory: &Trajectory,
    ) -> Result<R::Axis> {
        #[cfg(feature = "profiling")]
        profiling::scope!("styler::plot_trajectory");

        let working = self.working_copy(trajectory)?;
        let table = working.to_line_table();
        let color = match self.mapped_color(&working) {
            Some((color, _)) => LineColor::Fixed(color),
            None => self.ranged_color(),
        };
        let style = StaticLineStyle {
            color,
            legend: self.pass.legend,
            line_width: self.config.line_width,
            passthrough: self.config.passthrough.clone(),
        };
        tracing::debug!(
            "Plotting {} ({} segments) with {:?}",
            trajectory.id(),
            table.len(),
            style.color
        );
        renderer.plot_lines(axis, &table, &style)
    }

    /// Issue the line and end-marker calls for `trajectory` and compose them
    pub fn hvplot_trajectory<R: InteractiveRenderer>(
        &self,
        renderer: &mut R,
        trajectory: &Trajectory,
    ) -> Result<R::Drawable> {
        #[cfg(feature = "profiling")]
        profiling::scope!("styler::hvplot_trajectory");

        let working = self.working_copy(trajectory)?;
        let reproject = self.config.geo && !working.is_latlon() && working.crs().is_some();

        let mut table = working.to_line_table();
        if reproject {
            table = table.to_crs(Crs::Wgs84)?;
        }

        let (color, label, colorbar) = match self.mapped_color(&working) {
            Some((color, max)) => (
                LineColor::Fixed(color),
                max.map(|value| value.to_string()),
                self.config.colorbar.unwrap_or(false),
            ),
            None => (self.ranged_color(), None, self.config.colorbar.unwrap_or(true)),
        };
        let line_style = InteractiveLineStyle {
            color,
            line_width: self.config.line_width,
            geo: self.config.geo,
            tiles: self.pass.tiles,
            label,
            colorbar,
            hover_cols: self.config.hover_cols.clone(),
            passthrough: self.config.passthrough.clone(),
        };
        let lines = renderer.render_lines(&table, &line_style)?;

        let mut hover_cols = vec![TRIANGLE_ANGLE_COLUMN.to_string()];
        hover_cols.extend(self.config.hover_cols.iter().cloned());
        if let Some(column) = &self.config.column {
            hover_cols.push(column.clone());
        }
        let mut marker = self.end_with_direction(trajectory)?;
        if reproject {
            marker = marker.to_crs(Crs::Wgs84)?;
        }
        let marker_style = MarkerStyle {
            shape: MarkerShape::Triangle,
            size: self.config.marker_size,
            angle_column: TRIANGLE_ANGLE_COLUMN.to_string(),
            color: self.config.marker_color,
            hover_cols,
            geo: self.config.geo,
            tiles: Tiles::None,
            passthrough: self.config.passthrough.clone(),
        };
        let end = renderer.render_end_marker(&marker, &marker_style)?;

        Ok(lines.compose(end))
    }

    pub fn overlay_defaults(&self) -> OverlayDefaults {
        OverlayDefaults {
            width: self.config.width,
            height: self.config.height,
            active_tools: vec!["wheel_zoom".to_string()],
        }
    }

    /// Capability check plus the one-time overlay configuration
    pub fn prepare_interactive<R: InteractiveRenderer>(&self, renderer: &mut R) -> Result<()> {
        renderer.check_capability()?;
        renderer.configure_overlay(&self.overlay_defaults());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::planar_trajectory;
    use crate::{ColorMap, PlotOptions, SPEED_COLUMN};

    fn styler(options: PlotOptions) -> Styler {
        Styler::new(PlotConfig::from_options(options).unwrap())
    }

    #[test]
    fn test_line_table_gets_speed_without_touching_caller() {
        let trajectory = planar_trajectory(&[(0.0, 0.0, 0), (10.0, 0.0, 5), (10.0, 30.0, 15)]);
        let styler = styler(PlotOptions::new().with("column", SPEED_COLUMN));

        let table = styler.working_copy(&trajectory).unwrap().to_line_table();
        assert_eq!(table.column(SPEED_COLUMN), Some(&[2.0, 3.0][..]));
        assert!(!trajectory.has_column(SPEED_COLUMN));
    }

    #[test]
    fn test_existing_speed_column_is_used_as_is() {
        let trajectory = planar_trajectory(&[(0.0, 0.0, 0), (10.0, 0.0, 5)])
            .with_column(SPEED_COLUMN, vec![7.0, 8.0])
            .unwrap();
        let styler = styler(PlotOptions::new().with("column", SPEED_COLUMN));
        let working = styler.working_copy(&trajectory).unwrap();
        assert!(matches!(working, Cow::Borrowed(_)));
        assert_eq!(working.column(SPEED_COLUMN), Some(&[7.0, 8.0][..]));
    }

    #[test]
    fn test_end_marker_angle_is_negated_direction() {
        // Last segment heads east
        let trajectory = planar_trajectory(&[(0.0, 0.0, 0), (0.0, 10.0, 1), (10.0, 10.0, 2)]);
        let marker = styler(PlotOptions::new())
            .end_with_direction(&trajectory)
            .unwrap();
        assert_eq!(marker.position, geo::Point::new(10.0, 10.0));
        assert_eq!(marker.value("direction"), Some(90.0));
        assert_eq!(marker.triangle_angle(), -90.0);
        assert!(!trajectory.has_column("direction"));
    }

    #[test]
    fn test_end_marker_prefers_existing_direction() {
        let trajectory = planar_trajectory(&[(0.0, 0.0, 0), (0.0, 10.0, 1)])
            .with_column("direction", vec![12.0, 45.0])
            .unwrap();
        let marker = styler(PlotOptions::new())
            .end_with_direction(&trajectory)
            .unwrap();
        assert_eq!(marker.triangle_angle(), -45.0);
    }

    #[test]
    fn test_mapped_color_uses_column_maximum() {
        let trajectory = planar_trajectory(&[(0.0, 0.0, 0), (0.0, 10.0, 1)])
            .with_column("class", vec![1.0, 2.0])
            .unwrap();
        let map = ColorMap::new().with(2.0, Color::BLACK);
        let styler = styler(PlotOptions::new().with("column", "class").with("colormap", map));
        assert_eq!(
            styler.mapped_color(&trajectory),
            Some((Color::BLACK, Some(2.0)))
        );
    }
}
