//! Test fixtures and renderer doubles that record every call

use crate::{
    Compose, Crs, EndMarker, InteractiveLineStyle, InteractiveRenderer, LineTable, MarkerStyle,
    OverlayDefaults, PlotError, Result, StaticLineStyle, StaticRenderer, Trajectory,
    TrajectoryPoint,
};
use time::{Duration, OffsetDateTime};

pub fn timed_point(x: f64, y: f64, seconds: i64) -> TrajectoryPoint {
    TrajectoryPoint {
        position: geo::Point::new(x, y),
        time: OffsetDateTime::UNIX_EPOCH + Duration::seconds(seconds),
    }
}

/// Trajectory without CRS from `(x, y, seconds)` triples
pub fn planar_trajectory(points: &[(f64, f64, i64)]) -> Trajectory {
    trajectory_with_crs("planar", points, None)
}

pub fn trajectory_with_crs(id: &str, points: &[(f64, f64, i64)], crs: Option<Crs>) -> Trajectory {
    let points = points
        .iter()
        .map(|&(x, y, seconds)| timed_point(x, y, seconds))
        .collect();
    Trajectory::new(id, points, crs).unwrap()
}

#[derive(Debug, Default)]
pub struct RecordingStatic {
    pub created_axes: usize,
    pub figsizes: Vec<Option<(f64, f64)>>,
    pub calls: Vec<(usize, LineTable, StaticLineStyle)>,
}

impl StaticRenderer for RecordingStatic {
    /// Axis id, counting from 1
    type Axis = usize;

    fn create_axis(&mut self, figsize: Option<(f64, f64)>) -> Result<usize> {
        self.created_axes += 1;
        self.figsizes.push(figsize);
        Ok(self.created_axes)
    }

    fn plot_lines(
        &mut self,
        axis: usize,
        table: &LineTable,
        style: &StaticLineStyle,
    ) -> Result<usize> {
        self.calls.push((axis, table.clone(), style.clone()));
        Ok(axis)
    }
}

/// Drawable recording which render calls it is made of, bottom first
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedDrawable(pub Vec<String>);

impl Compose for RecordedDrawable {
    fn compose(mut self, top: Self) -> Self {
        self.0.extend(top.0);
        self
    }
}

#[derive(Debug)]
pub struct RecordingInteractive {
    pub available: bool,
    pub defaults: Vec<OverlayDefaults>,
    pub line_calls: Vec<(LineTable, InteractiveLineStyle)>,
    pub marker_calls: Vec<(EndMarker, MarkerStyle)>,
}

impl Default for RecordingInteractive {
    fn default() -> Self {
        Self {
            available: true,
            defaults: Vec::new(),
            line_calls: Vec::new(),
            marker_calls: Vec::new(),
        }
    }
}

impl RecordingInteractive {
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    pub fn render_count(&self) -> usize {
        self.line_calls.len() + self.marker_calls.len()
    }
}

impl InteractiveRenderer for RecordingInteractive {
    type Drawable = RecordedDrawable;

    fn check_capability(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(PlotError::MissingCapability {
                components: vec!["egui", "walkers"],
                docs: vec!["https://www.egui.rs", "https://docs.rs/walkers"],
            })
        }
    }

    fn configure_overlay(&mut self, defaults: &OverlayDefaults) {
        self.defaults.push(defaults.clone());
    }

    fn render_lines(
        &mut self,
        table: &LineTable,
        style: &InteractiveLineStyle,
    ) -> Result<RecordedDrawable> {
        self.line_calls.push((table.clone(), style.clone()));
        Ok(RecordedDrawable(vec![format!(
            "lines{}",
            self.line_calls.len()
        )]))
    }

    fn render_end_marker(
        &mut self,
        marker: &EndMarker,
        style: &MarkerStyle,
    ) -> Result<RecordedDrawable> {
        self.marker_calls.push((marker.clone(), style.clone()));
        Ok(RecordedDrawable(vec![format!(
            "marker{}",
            self.marker_calls.len()
        )]))
    }
}
