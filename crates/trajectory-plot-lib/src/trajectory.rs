//! Trajectory storage and derived attributes
//!
//! A [`Trajectory`] owns its points and a set of named `f64` attribute columns with one value
//! per point. Speed and direction can be derived either as detached series or attached as
//! columns on an owned copy.

use crate::{LineTable, PlotError, Result, utils};
use geo::{Line, Point};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Default name of the derived speed column
pub const SPEED_COLUMN: &str = "speed";

/// Default name of the derived direction column
pub const DIRECTION_COLUMN: &str = "direction";

/// Coordinate reference system of a trajectory
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crs {
    /// Geographic lon/lat (EPSG:4326)
    Wgs84,
    /// Web Mercator meters (EPSG:3857)
    WebMercator,
    /// Any other EPSG code (no reprojection support)
    Epsg(u32),
}

impl Crs {
    /// EPSG code of this reference system
    pub fn epsg(&self) -> u32 {
        match self {
            Self::Wgs84 => 4326,
            Self::WebMercator => 3857,
            Self::Epsg(code) => *code,
        }
    }

    /// Build from an EPSG code, mapping the well-known ones
    pub fn from_epsg(code: u32) -> Self {
        match code {
            4326 => Self::Wgs84,
            3857 => Self::WebMercator,
            other => Self::Epsg(other),
        }
    }

    /// Whether coordinates are geographic lon/lat degrees
    pub fn is_latlon(&self) -> bool {
        matches!(self, Self::Wgs84)
    }
}

/// A single timestamped position
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryPoint {
    /// Position as (x, y); (lon, lat) for geographic data
    pub position: Point<f64>,
    /// Timestamp of the fix
    pub time: OffsetDateTime,
}

/// An ordered sequence of timestamped positions with per-point attributes
#[derive(Clone, Debug)]
pub struct Trajectory {
    id: String,
    points: Vec<TrajectoryPoint>,
    columns: BTreeMap<String, Vec<f64>>,
    crs: Option<Crs>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Trajectory {
    /// Create a trajectory from at least two points
    pub fn new(id: impl Into<String>, points: Vec<TrajectoryPoint>, crs: Option<Crs>) -> Result<Self> {
        let id = id.into();
        if points.len() < 2 {
            return Err(PlotError::TooFewPoints {
                id,
                count: points.len(),
            });
        }
        Ok(Self {
            id,
            points,
            columns: BTreeMap::new(),
            crs,
        })
    }

    /// Build a WGS84 trajectory from a GPX track, skipping waypoints without a timestamp
    pub fn from_gpx_track(id: impl Into<String>, track: &gpx::Track) -> Result<Self> {
        let id = id.into();
        let mut points = Vec::new();
        let mut elevations = Vec::new();

        for segment in &track.segments {
            for waypoint in &segment.points {
                let Some(time) = waypoint.time.clone() else {
                    tracing::warn!(
                        "Skipping point without timestamp in {}: ({}, {})",
                        id,
                        waypoint.point().y(),
                        waypoint.point().x()
                    );
                    continue;
                };
                points.push(TrajectoryPoint {
                    position: waypoint.point(),
                    time: OffsetDateTime::from(time),
                });
                elevations.push(waypoint.elevation);
            }
        }

        let mut trajectory = Self::new(id, points, Some(Crs::Wgs84))?;
        if elevations.iter().all(Option::is_some) {
            let values = elevations.into_iter().flatten().collect();
            trajectory.set_column("elevation", values)?;
        }
        Ok(trajectory)
    }

    /// Builder-style variant of [`Trajectory::set_column`]
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        self.set_column(name, values)?;
        Ok(self)
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: construction requires two points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn crs(&self) -> Option<Crs> {
        self.crs
    }

    /// Whether the trajectory is in geographic lon/lat coordinates
    ///
    /// A trajectory without a CRS is treated as planar.
    #[inline]
    pub fn is_latlon(&self) -> bool {
        self.crs.is_some_and(|crs| crs.is_latlon())
    }

    pub fn speed_column_name(&self) -> &'static str {
        SPEED_COLUMN
    }

    pub fn direction_column_name(&self) -> &'static str {
        DIRECTION_COLUMN
    }

    /// Names of all attribute columns, sorted
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Insert or replace a column; it must hold one value per point
    pub fn set_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();
        if values.len() != self.points.len() {
            return Err(PlotError::ColumnLength {
                name,
                expected: self.points.len(),
                actual: values.len(),
            });
        }
        self.columns.insert(name, values);
        Ok(())
    }

    pub fn remove_column(&mut self, name: &str) -> Option<Vec<f64>> {
        self.columns.remove(name)
    }

    /// Values of every column at the final point
    pub fn last_row(&self) -> BTreeMap<String, f64> {
        self.columns
            .iter()
            .filter_map(|(name, values)| Some((name.clone(), *values.last()?)))
            .collect()
    }

    /// Smallest non-NaN value of a column
    pub fn min_of(&self, name: &str) -> Option<f64> {
        self.column(name)?
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .reduce(f64::min)
    }

    /// Largest non-NaN value of a column
    pub fn max_of(&self, name: &str) -> Option<f64> {
        self.column(name)?
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .reduce(f64::max)
    }

    /// Speed at every point, in CRS units (meters for lat/lon) per second
    ///
    /// The first point repeats the value of the second one. Zero elapsed time yields zero.
    pub fn compute_speed(&self) -> Vec<f64> {
        let latlon = self.is_latlon();
        self.derive_pairwise(|prev, curr| {
            let distance = if latlon {
                utils::haversine_distance(prev.position, curr.position)
            } else {
                let delta = curr.position - prev.position;
                delta.x().hypot(delta.y())
            };
            let seconds = (curr.time - prev.time).as_seconds_f64();
            if seconds > 0.0 { distance / seconds } else { 0.0 }
        })
    }

    /// Heading at every point in degrees `[0, 360)`, clockwise from north
    ///
    /// The first point repeats the value of the second one.
    pub fn compute_direction(&self) -> Vec<f64> {
        let latlon = self.is_latlon();
        self.derive_pairwise(|prev, curr| {
            if latlon {
                utils::initial_bearing(prev.position, curr.position)
            } else {
                utils::planar_bearing(prev.position, curr.position)
            }
        })
    }

    /// Attach the speed column
    pub fn add_speed(&mut self, overwrite: bool) -> Result<()> {
        self.add_derived(SPEED_COLUMN, overwrite, Self::compute_speed)
    }

    /// Attach the direction column
    pub fn add_direction(&mut self, overwrite: bool) -> Result<()> {
        self.add_derived(DIRECTION_COLUMN, overwrite, Self::compute_direction)
    }

    /// Consecutive-point line segments with the column values of each segment's end point
    pub fn to_line_table(&self) -> LineTable {
        #[cfg(feature = "profiling")]
        profiling::scope!("trajectory::to_line_table");

        let lines = self
            .points
            .windows(2)
            .map(|pair| Line::new(pair[0].position, pair[1].position))
            .collect();
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| (name.clone(), values[1..].to_vec()))
            .collect();
        LineTable::new(lines, columns, self.crs)
    }

    fn add_derived(
        &mut self,
        name: &str,
        overwrite: bool,
        derive: fn(&Self) -> Vec<f64>,
    ) -> Result<()> {
        if self.has_column(name) && !overwrite {
            return Err(PlotError::ColumnExists {
                name: name.to_string(),
            });
        }
        let values = derive(self);
        self.set_column(name, values)
    }

    fn derive_pairwise(&self, f: impl Fn(&TrajectoryPoint, &TrajectoryPoint) -> f64) -> Vec<f64> {
        let mut values: Vec<f64> = Vec::with_capacity(self.points.len());
        values.push(0.0);
        values.extend(self.points.windows(2).map(|pair| f(&pair[0], &pair[1])));
        values[0] = values[1];
        values
    }
}
