//! Plotting a single trajectory

use crate::styler::Styler;
use crate::{InteractiveRenderer, PlotConfig, PlotOptions, Result, StaticRenderer, Trajectory};

/// Renders one trajectory as a static plot or an interactive overlay
///
/// Repeated [`TrajectoryPlotter::plot`] calls layer onto the same axis when it is passed back
/// in; after the first call the legend is switched off and the color column is no longer
/// forwarded to ranged renders.
pub struct TrajectoryPlotter<'a> {
    trajectory: &'a Trajectory,
    styler: Styler,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<'a> TrajectoryPlotter<'a> {
    pub fn new(trajectory: &'a Trajectory, options: PlotOptions) -> Result<Self> {
        Ok(Self::with_config(trajectory, PlotConfig::from_options(options)?))
    }

    pub fn with_config(trajectory: &'a Trajectory, config: PlotConfig) -> Self {
        Self {
            trajectory,
            styler: Styler::new(config),
        }
    }

    pub fn config(&self) -> &PlotConfig {
        &self.styler.config
    }

    /// Static plot onto `axis`, or onto a new figure when `None`
    pub fn plot<R: StaticRenderer>(
        &mut self,
        renderer: &mut R,
        axis: Option<R::Axis>,
    ) -> Result<R::Axis> {
        let axis = match axis {
            Some(axis) => axis,
            None => renderer.create_axis(self.styler.config.figsize)?,
        };
        tracing::info!("Plotting trajectory {}", self.trajectory.id());
        let axis = self
            .styler
            .plot_trajectory(renderer, axis, self.trajectory)?;
        self.styler.pass.legend = false;
        self.styler.pass.column_active = false;
        Ok(axis)
    }

    /// Interactive overlay of the trajectory line and its end-point triangle
    pub fn interactive_plot<R: InteractiveRenderer>(
        &mut self,
        renderer: &mut R,
    ) -> Result<R::Drawable> {
        self.styler.prepare_interactive(renderer)?;
        tracing::info!("Rendering interactive overlay for {}", self.trajectory.id());
        self.styler.hvplot_trajectory(renderer, self.trajectory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        RecordedDrawable, RecordingInteractive, RecordingStatic, planar_trajectory,
        trajectory_with_crs,
    };
    use crate::{
        Color, ColorMap, Crs, LineColor, OptionValue, PlotError, SPEED_COLUMN,
        TRIANGLE_ANGLE_COLUMN, Tiles,
    };

    fn sample() -> Trajectory {
        planar_trajectory(&[(0.0, 0.0, 0), (10.0, 0.0, 5), (10.0, 30.0, 15)])
    }

    #[test]
    fn test_plot_without_column() {
        let trajectory = sample();
        let mut renderer = RecordingStatic::default();
        let mut plotter = TrajectoryPlotter::new(&trajectory, PlotOptions::new()).unwrap();

        let axis = plotter.plot(&mut renderer, None).unwrap();

        assert_eq!(axis, 1);
        assert_eq!(renderer.created_axes, 1);
        assert_eq!(renderer.calls.len(), 1);
        let (_, table, style) = &renderer.calls[0];
        assert_eq!(table.len(), 2);
        assert_eq!(
            style.color,
            LineColor::Ranged {
                column: None,
                vmin: None,
                vmax: None
            }
        );
        assert!(style.legend);
        assert_eq!(trajectory.column_names().count(), 0);
    }

    #[test]
    fn test_plot_reuses_supplied_axis() {
        let trajectory = sample();
        let mut renderer = RecordingStatic::default();
        let mut plotter = TrajectoryPlotter::new(&trajectory, PlotOptions::new()).unwrap();

        let axis = plotter.plot(&mut renderer, Some(42)).unwrap();
        assert_eq!(axis, 42);
        assert_eq!(renderer.created_axes, 0);
    }

    #[test]
    fn test_plot_passes_figsize_and_bounds() {
        let trajectory = sample();
        let mut renderer = RecordingStatic::default();
        let options = PlotOptions::new()
            .with("figsize", "8,4")
            .with("vmin", 0.0)
            .with("vmax", 5.0)
            .with("column", SPEED_COLUMN)
            .with("linestyle", "dashed");
        let mut plotter = TrajectoryPlotter::new(&trajectory, options).unwrap();
        plotter.plot(&mut renderer, None).unwrap();

        assert_eq!(renderer.figsizes, vec![Some((8.0, 4.0))]);
        let (_, table, style) = &renderer.calls[0];
        assert_eq!(
            style.color,
            LineColor::Ranged {
                column: Some(SPEED_COLUMN.to_string()),
                vmin: Some(0.0),
                vmax: Some(5.0)
            }
        );
        assert_eq!(
            style.passthrough.get("linestyle"),
            Some(&OptionValue::Text("dashed".to_string()))
        );
        assert!(!style.passthrough.contains_key("vmin"));
        assert_eq!(table.column(SPEED_COLUMN), Some(&[2.0, 3.0][..]));
    }

    #[test]
    fn test_speed_is_transient() {
        let trajectory = sample();
        let mut renderer = RecordingStatic::default();
        let options = PlotOptions::new().with("column", SPEED_COLUMN);
        let mut plotter = TrajectoryPlotter::new(&trajectory, options).unwrap();
        plotter.plot(&mut renderer, None).unwrap();

        assert!(renderer.calls[0].1.column(SPEED_COLUMN).is_some());
        assert!(!trajectory.has_column(SPEED_COLUMN));
    }

    #[test]
    fn test_second_plot_drops_legend_and_column() {
        let trajectory = sample();
        let mut renderer = RecordingStatic::default();
        let options = PlotOptions::new().with("column", SPEED_COLUMN);
        let mut plotter = TrajectoryPlotter::new(&trajectory, options).unwrap();

        let axis = plotter.plot(&mut renderer, None).unwrap();
        plotter.plot(&mut renderer, Some(axis)).unwrap();

        let (first_axis, _, first) = &renderer.calls[0];
        let (second_axis, _, second) = &renderer.calls[1];
        assert_eq!(first_axis, second_axis);
        assert!(first.legend);
        assert!(!second.legend);
        assert!(matches!(&second.color, LineColor::Ranged { column: None, .. }));
    }

    #[test]
    fn test_colormap_fallback_is_gray() {
        let trajectory = sample().with_column("class", vec![1.0, 1.0, 3.0]).unwrap();
        let mut renderer = RecordingStatic::default();
        let options = PlotOptions::new()
            .with("column", "class")
            .with("column_to_color", ColorMap::new().with(1.0, Color::BLACK));
        let mut plotter = TrajectoryPlotter::new(&trajectory, options).unwrap();

        plotter.plot(&mut renderer, None).unwrap();
        assert_eq!(renderer.calls[0].2.color, LineColor::Fixed(Color::GRAY));
    }

    #[test]
    fn test_colormap_hit_uses_mapped_color() {
        let trajectory = sample().with_column("class", vec![1.0, 2.0, 2.0]).unwrap();
        let mut renderer = RecordingStatic::default();
        let options = PlotOptions::new()
            .with("c", "class")
            .with("colormap", ColorMap::new().with(2.0, Color::WHITE));
        let mut plotter = TrajectoryPlotter::new(&trajectory, options).unwrap();

        plotter.plot(&mut renderer, None).unwrap();
        assert_eq!(renderer.calls[0].2.color, LineColor::Fixed(Color::WHITE));
    }

    #[test]
    fn test_interactive_composes_line_and_marker() {
        let trajectory = sample();
        let mut renderer = RecordingInteractive::default();
        let options = PlotOptions::new()
            .with("column", SPEED_COLUMN)
            .with("hover_cols", "elevation")
            .with("marker_color", "red")
            .with("width", 640u32);
        let mut plotter = TrajectoryPlotter::new(&trajectory, options).unwrap();

        let drawable = plotter.interactive_plot(&mut renderer).unwrap();
        assert_eq!(
            drawable,
            RecordedDrawable(vec!["lines1".to_string(), "marker1".to_string()])
        );

        assert_eq!(renderer.defaults.len(), 1);
        assert_eq!(renderer.defaults[0].width, 640);
        assert_eq!(renderer.defaults[0].height, 700);
        assert_eq!(renderer.defaults[0].active_tools, vec!["wheel_zoom"]);

        let (_, line_style) = &renderer.line_calls[0];
        assert_eq!(line_style.tiles, Tiles::OpenStreetMap);
        assert_eq!(line_style.line_width, 3.0);
        assert!(line_style.colorbar);

        let (marker, marker_style) = &renderer.marker_calls[0];
        assert_eq!(marker_style.tiles, Tiles::None);
        assert_eq!(marker_style.size, 200.0);
        assert_eq!(marker_style.color, Some("red".parse().unwrap()));
        assert_eq!(
            marker_style.hover_cols,
            vec![TRIANGLE_ANGLE_COLUMN, "elevation", SPEED_COLUMN]
        );
        assert_eq!(marker.triangle_angle(), -0.0);
        assert_eq!(marker.value(SPEED_COLUMN), Some(3.0));
    }

    #[test]
    fn test_interactive_reprojects_mercator_to_latlon() {
        let start = crate::utils::wgs84_to_mercator(51.5, -0.1);
        let end = crate::utils::wgs84_to_mercator(51.6, 0.0);
        let trajectory = trajectory_with_crs(
            "mercator",
            &[(start.x(), start.y(), 0), (end.x(), end.y(), 60)],
            Some(Crs::WebMercator),
        );
        let mut renderer = RecordingInteractive::default();
        let mut plotter = TrajectoryPlotter::new(&trajectory, PlotOptions::new()).unwrap();
        plotter.interactive_plot(&mut renderer).unwrap();

        let (table, _) = &renderer.line_calls[0];
        assert_eq!(table.crs(), Some(Crs::Wgs84));
        assert!((table.lines()[0].end.y - 51.6).abs() < 1e-9);
        let (marker, _) = &renderer.marker_calls[0];
        assert_eq!(marker.crs, Some(Crs::Wgs84));
    }

    #[test]
    fn test_interactive_keeps_crs_when_not_geo() {
        let trajectory = trajectory_with_crs(
            "mercator",
            &[(0.0, 0.0, 0), (100.0, 100.0, 10)],
            Some(Crs::WebMercator),
        );
        let mut renderer = RecordingInteractive::default();
        let options = PlotOptions::new().with("geo", false);
        let mut plotter = TrajectoryPlotter::new(&trajectory, options).unwrap();
        plotter.interactive_plot(&mut renderer).unwrap();

        assert_eq!(renderer.line_calls[0].0.crs(), Some(Crs::WebMercator));
    }

    #[test]
    fn test_interactive_fixed_color_is_labelled() {
        let trajectory = sample().with_column("class", vec![1.0, 1.0, 2.0]).unwrap();
        let mut renderer = RecordingInteractive::default();
        let options = PlotOptions::new()
            .with("column", "class")
            .with("colormap", ColorMap::new().with(2.0, Color::BLACK));
        let mut plotter = TrajectoryPlotter::new(&trajectory, options).unwrap();
        plotter.interactive_plot(&mut renderer).unwrap();

        let (_, style) = &renderer.line_calls[0];
        assert_eq!(style.color, LineColor::Fixed(Color::BLACK));
        assert_eq!(style.label.as_deref(), Some("2"));
        assert!(!style.colorbar);
    }

    #[test]
    fn test_interactive_without_capability_renders_nothing() {
        let trajectory = sample();
        let mut renderer = RecordingInteractive::unavailable();
        let mut plotter = TrajectoryPlotter::new(&trajectory, PlotOptions::new()).unwrap();

        let result = plotter.interactive_plot(&mut renderer);
        match result {
            Err(PlotError::MissingCapability { components, .. }) => {
                assert_eq!(components, vec!["egui", "walkers"]);
            }
            other => panic!("expected missing capability, got {other:?}"),
        }
        assert_eq!(renderer.render_count(), 0);
        assert!(renderer.defaults.is_empty());
    }
}
