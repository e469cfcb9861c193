//! Plotting a collection of trajectories on one axis or one overlay

use crate::styler::{ColorScale, Styler};
use crate::{
    Compose, InteractiveRenderer, PlotConfig, PlotError, PlotOptions, Result, StaticRenderer,
    Tiles, TrajectoryCollection,
};
use std::borrow::Cow;

/// Renders every member of a collection with a shared color scale
///
/// When a color column is set, its range over the whole collection is computed first so
/// that every member is colored consistently. Only the first member gets a legend, and only
/// the first interactive member draws basemap tiles.
pub struct TrajectoryCollectionPlotter<'a> {
    collection: &'a TrajectoryCollection,
    styler: Styler,
    /// Derived speed per member, filled when the speed column has to be materialized
    speeds: Vec<Vec<f64>>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<'a> TrajectoryCollectionPlotter<'a> {
    pub fn new(collection: &'a TrajectoryCollection, options: PlotOptions) -> Result<Self> {
        Ok(Self::with_config(
            collection,
            PlotConfig::from_options(options)?,
        ))
    }

    pub fn with_config(collection: &'a TrajectoryCollection, config: PlotConfig) -> Self {
        Self {
            collection,
            styler: Styler::new(config),
            speeds: Vec::new(),
        }
    }

    pub fn config(&self) -> &PlotConfig {
        &self.styler.config
    }

    /// The color scale the next render will use
    pub fn scale(&self) -> ColorScale {
        self.styler.scale
    }

    /// Whether the color column is speed and has to be derived for every member
    fn speed_needs_materialization(&self) -> bool {
        self.collection
            .first()
            .is_some_and(|first| self.styler.needs_speed(first))
    }

    /// Compute the shared range of the color column and make it the active scale
    ///
    /// Returns `Ok(None)` when no color column is configured.
    pub fn min_max_values(&mut self) -> Result<Option<(f64, f64)>> {
        let Some(column) = self.styler.config.column.clone() else {
            return Ok(None);
        };
        if self.collection.is_empty() {
            return Err(PlotError::EmptyCollection);
        }

        let (min, max) = if self.speed_needs_materialization() {
            self.min_max_speed()?
        } else {
            let min = self.collection.get_min(&column);
            let max = self.collection.get_max(&column);
            min.zip(max)
                .ok_or_else(|| PlotError::UnknownColumn(column.clone()))?
        };

        tracing::debug!("Shared color scale for {}: [{}, {}]", column, min, max);
        self.styler.scale = ColorScale {
            min: Some(min),
            max: Some(max),
        };
        Ok(Some((min, max)))
    }

    /// Derive speed for every member, caching each series, and return its global range
    fn min_max_speed(&mut self) -> Result<(f64, f64)> {
        #[cfg(feature = "profiling")]
        profiling::scope!("collection_plotter::min_max_speed");

        self.speeds = self
            .collection
            .iter()
            .map(|trajectory| trajectory.compute_speed())
            .collect();

        let values = self.speeds.iter().flatten().copied().filter(|v| !v.is_nan());
        let range = values.fold(None, |range: Option<(f64, f64)>, v| match range {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        });
        range.ok_or_else(|| PlotError::UnknownColumn(self.collection_speed_name()))
    }

    fn collection_speed_name(&self) -> String {
        self.collection
            .first()
            .map(|first| first.speed_column_name())
            .unwrap_or(crate::SPEED_COLUMN)
            .to_string()
    }

    /// Static plot of every member onto `axis`, or onto a new figure when `None`
    pub fn plot<R: StaticRenderer>(
        &mut self,
        renderer: &mut R,
        axis: Option<R::Axis>,
    ) -> Result<R::Axis> {
        if self.styler.config.column.is_some() {
            self.min_max_values()?;
        }

        let mut axis = match axis {
            Some(axis) => axis,
            None => renderer.create_axis(self.styler.config.figsize)?,
        };
        tracing::info!("Plotting {} trajectories", self.collection.len());

        let speed_name = self.collection_speed_name();
        for (index, trajectory) in self.collection.iter().enumerate() {
            let member = match self.speeds.get(index) {
                Some(speed) if self.styler.needs_speed(trajectory) => {
                    let mut copy = trajectory.clone();
                    copy.set_column(speed_name.as_str(), speed.clone())?;
                    Cow::Owned(copy)
                }
                _ => Cow::Borrowed(trajectory),
            };
            axis = self.styler.plot_trajectory(renderer, axis, &member)?;
            self.styler.pass.legend = false;
        }
        Ok(axis)
    }

    /// Interactive overlay of every member, composed in collection order
    pub fn interactive_plot<R: InteractiveRenderer>(
        &mut self,
        renderer: &mut R,
    ) -> Result<R::Drawable> {
        self.styler.prepare_interactive(renderer)?;
        if self.styler.config.column.is_some() {
            self.min_max_values()?;
        }
        tracing::info!(
            "Rendering interactive overlay for {} trajectories",
            self.collection.len()
        );

        let mut overlay: Option<R::Drawable> = None;
        for trajectory in self.collection {
            let drawable = self.styler.hvplot_trajectory(renderer, trajectory)?;
            overlay = Some(match overlay {
                Some(below) => below.compose(drawable),
                None => drawable,
            });
            self.styler.pass.tiles = Tiles::None;
        }
        overlay.ok_or(PlotError::EmptyCollection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        RecordedDrawable, RecordingInteractive, RecordingStatic, planar_trajectory,
    };
    use crate::{LineColor, SPEED_COLUMN, Trajectory};

    fn member(speed_scale: f64) -> Trajectory {
        // Constant speed of `speed_scale` units per second, then twice that
        planar_trajectory(&[
            (0.0, 0.0, 0),
            (speed_scale * 10.0, 0.0, 10),
            (speed_scale * 30.0, 0.0, 20),
        ])
    }

    fn collection() -> TrajectoryCollection {
        TrajectoryCollection::new(vec![member(1.0), member(3.0), member(0.5)])
    }

    #[test]
    fn test_shared_speed_scale_spans_all_members() {
        let collection = collection();
        let options = PlotOptions::new().with("column", SPEED_COLUMN);
        let mut plotter = TrajectoryCollectionPlotter::new(&collection, options).unwrap();

        let range = plotter.min_max_values().unwrap();
        assert_eq!(range, Some((0.5, 6.0)));
        assert_eq!(
            plotter.scale(),
            ColorScale {
                min: Some(0.5),
                max: Some(6.0)
            }
        );
        for trajectory in &collection {
            assert!(!trajectory.has_column(SPEED_COLUMN));
        }
    }

    #[test]
    fn test_shared_scale_from_existing_column() {
        let collection = TrajectoryCollection::new(vec![
            member(1.0).with_column("value", vec![1.0, 5.0, 2.0]).unwrap(),
            member(1.0).with_column("value", vec![-3.0, 0.0, 4.0]).unwrap(),
        ]);
        let options = PlotOptions::new()
            .with("column", "value")
            .with("vmin", 100.0)
            .with("vmax", 200.0);
        let mut plotter = TrajectoryCollectionPlotter::new(&collection, options).unwrap();
        let mut renderer = RecordingStatic::default();
        plotter.plot(&mut renderer, None).unwrap();

        for (_, _, style) in &renderer.calls {
            assert!(matches!(
                &style.color,
                LineColor::Ranged { vmin: Some(v0), vmax: Some(v1), .. } if *v0 == -3.0 && *v1 == 5.0
            ));
        }
    }

    #[test]
    fn test_unknown_column_fails() {
        let collection = collection();
        let options = PlotOptions::new().with("column", "heart_rate");
        let mut plotter = TrajectoryCollectionPlotter::new(&collection, options).unwrap();
        assert!(matches!(
            plotter.min_max_values(),
            Err(PlotError::UnknownColumn(name)) if name == "heart_rate"
        ));
    }

    #[test]
    fn test_static_plot_shares_axis_scale_and_single_legend() {
        let collection = collection();
        let options = PlotOptions::new().with("column", SPEED_COLUMN);
        let mut plotter = TrajectoryCollectionPlotter::new(&collection, options).unwrap();
        let mut renderer = RecordingStatic::default();

        let axis = plotter.plot(&mut renderer, None).unwrap();

        assert_eq!(renderer.created_axes, 1);
        assert_eq!(renderer.calls.len(), 3);
        for (index, (call_axis, table, style)) in renderer.calls.iter().enumerate() {
            assert_eq!(*call_axis, axis);
            assert_eq!(style.legend, index == 0);
            assert_eq!(
                style.color,
                LineColor::Ranged {
                    column: Some(SPEED_COLUMN.to_string()),
                    vmin: Some(0.5),
                    vmax: Some(6.0)
                }
            );
            assert!(table.column(SPEED_COLUMN).is_some());
        }
        // Member speeds are the cached series, one row per segment
        assert_eq!(renderer.calls[1].1.column(SPEED_COLUMN), Some(&[3.0, 6.0][..]));
        for trajectory in &collection {
            assert!(!trajectory.has_column(SPEED_COLUMN));
        }
    }

    #[test]
    fn test_static_plot_without_column_skips_scale() {
        let collection = collection();
        let mut plotter =
            TrajectoryCollectionPlotter::new(&collection, PlotOptions::new()).unwrap();
        let mut renderer = RecordingStatic::default();
        plotter.plot(&mut renderer, Some(7)).unwrap();

        assert_eq!(renderer.created_axes, 0);
        assert_eq!(plotter.scale(), ColorScale::default());
        assert_eq!(renderer.calls.len(), 3);
    }

    #[test]
    fn test_interactive_overlay_disables_tiles_after_first_member() {
        let collection = collection();
        let mut plotter =
            TrajectoryCollectionPlotter::new(&collection, PlotOptions::new()).unwrap();
        let mut renderer = RecordingInteractive::default();

        let overlay = plotter.interactive_plot(&mut renderer).unwrap();

        assert_eq!(
            overlay,
            RecordedDrawable(
                ["lines1", "marker1", "lines2", "marker2", "lines3", "marker3"]
                    .map(String::from)
                    .to_vec()
            )
        );
        assert_eq!(renderer.defaults.len(), 1);
        let tiles: Vec<Tiles> = renderer
            .line_calls
            .iter()
            .map(|(_, style)| style.tiles)
            .collect();
        assert_eq!(tiles, vec![Tiles::OpenStreetMap, Tiles::None, Tiles::None]);
    }

    #[test]
    fn test_interactive_shares_scale() {
        let collection = collection();
        let options = PlotOptions::new().with("column", SPEED_COLUMN);
        let mut plotter = TrajectoryCollectionPlotter::new(&collection, options).unwrap();
        let mut renderer = RecordingInteractive::default();
        plotter.interactive_plot(&mut renderer).unwrap();

        for (_, style) in &renderer.line_calls {
            assert!(matches!(
                &style.color,
                LineColor::Ranged { vmin: Some(v0), vmax: Some(v1), .. } if *v0 == 0.5 && *v1 == 6.0
            ));
        }
    }

    #[test]
    fn test_interactive_without_capability_renders_nothing() {
        let collection = collection();
        let options = PlotOptions::new().with("column", SPEED_COLUMN);
        let mut plotter = TrajectoryCollectionPlotter::new(&collection, options).unwrap();
        let mut renderer = RecordingInteractive::unavailable();

        let error = plotter.interactive_plot(&mut renderer).unwrap_err();
        assert!(error.to_string().contains("egui and walkers"));
        assert_eq!(renderer.render_count(), 0);
    }

    #[test]
    fn test_empty_collection_interactive() {
        let collection = TrajectoryCollection::default();
        let mut plotter =
            TrajectoryCollectionPlotter::new(&collection, PlotOptions::new()).unwrap();
        let mut renderer = RecordingInteractive::default();
        assert!(matches!(
            plotter.interactive_plot(&mut renderer),
            Err(PlotError::EmptyCollection)
        ));
    }
}
