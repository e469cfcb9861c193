//! TrajectoryCollection - Ordered group of trajectories with aggregate queries

use crate::{Result, Trajectory};
use rayon::prelude::*;
use std::path::Path;

/// An ordered group of trajectories
#[derive(Clone, Debug, Default)]
pub struct TrajectoryCollection {
    trajectories: Vec<Trajectory>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl TrajectoryCollection {
    pub fn new(trajectories: Vec<Trajectory>) -> Self {
        Self { trajectories }
    }

    /// One trajectory per GPX track
    ///
    /// Tracks are named after the GPX track name, or `{prefix}_{index}` when unnamed. Tracks
    /// with fewer than two timestamped points are skipped.
    pub fn from_gpx(gpx: &gpx::Gpx, prefix: &str) -> Self {
        let trajectories = gpx
            .tracks
            .iter()
            .enumerate()
            .filter_map(|(index, track)| {
                let id = track
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("{prefix}_{index}"));
                match Trajectory::from_gpx_track(id, track) {
                    Ok(trajectory) => Some(trajectory),
                    Err(error) => {
                        tracing::warn!("Skipping track {} of {}: {}", index, prefix, error);
                        None
                    }
                }
            })
            .collect();
        Self { trajectories }
    }

    /// Load trajectories from GPX files in parallel, in file order
    pub fn load_from_files<P: AsRef<Path> + Send + Sync>(paths: &[P]) -> Result<Self> {
        #[cfg(feature = "profiling")]
        profiling::scope!("collection::load_from_files");

        let collections: Result<Vec<Self>> = paths
            .par_iter()
            .map(|path| {
                let path = path.as_ref();
                let file = std::fs::File::open(path)?;
                let reader = std::io::BufReader::new(file);
                let gpx = gpx::read(reader)?;
                let prefix = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or("track");
                Ok(Self::from_gpx(&gpx, prefix))
            })
            .collect();

        let trajectories: Vec<Trajectory> = collections?
            .into_iter()
            .flat_map(|collection| collection.trajectories)
            .collect();
        tracing::info!(
            "Loaded {} trajectories from {} file(s)",
            trajectories.len(),
            paths.len()
        );
        Ok(Self { trajectories })
    }

    pub fn push(&mut self, trajectory: Trajectory) {
        self.trajectories.push(trajectory);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Trajectory> {
        self.trajectories.get(index)
    }

    #[inline]
    pub fn first(&self) -> Option<&Trajectory> {
        self.trajectories.first()
    }

    #[inline]
    pub fn trajectories(&self) -> &[Trajectory] {
        &self.trajectories
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trajectory> {
        self.trajectories.iter()
    }

    pub fn into_single(mut self) -> Option<Trajectory> {
        (self.trajectories.len() == 1).then(|| self.trajectories.remove(0))
    }

    /// Smallest value of `column` over every member carrying it
    pub fn get_min(&self, column: &str) -> Option<f64> {
        self.iter()
            .filter_map(|trajectory| trajectory.min_of(column))
            .reduce(f64::min)
    }

    /// Largest value of `column` over every member carrying it
    pub fn get_max(&self, column: &str) -> Option<f64> {
        self.iter()
            .filter_map(|trajectory| trajectory.max_of(column))
            .reduce(f64::max)
    }
}

impl<'a> IntoIterator for &'a TrajectoryCollection {
    type Item = &'a Trajectory;
    type IntoIter = std::slice::Iter<'a, Trajectory>;

    fn into_iter(self) -> Self::IntoIter {
        self.trajectories.iter()
    }
}

impl FromIterator<Trajectory> for TrajectoryCollection {
    fn from_iter<I: IntoIterator<Item = Trajectory>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
