//! Derived per-render tables: line segments and the end-point marker

use crate::{Crs, PlotError, Result, utils};
use geo::{Line, Point};
use std::collections::BTreeMap;

/// Column holding the rotation of the end-point triangle
pub const TRIANGLE_ANGLE_COLUMN: &str = "triangle_angle";

/// Consecutive-position line segments with one attribute row per segment
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineTable {
    lines: Vec<Line<f64>>,
    columns: BTreeMap<String, Vec<f64>>,
    crs: Option<Crs>,
}

impl LineTable {
    pub(crate) fn new(
        lines: Vec<Line<f64>>,
        columns: BTreeMap<String, Vec<f64>>,
        crs: Option<Crs>,
    ) -> Self {
        Self {
            lines,
            columns,
            crs,
        }
    }

    #[inline]
    pub fn lines(&self) -> &[Line<f64>] {
        &self.lines
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[inline]
    pub fn crs(&self) -> Option<Crs> {
        self.crs
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Smallest and largest non-NaN value of a column
    pub fn value_range(&self, name: &str) -> Option<(f64, f64)> {
        self.column(name)?
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((min, max)) => Some((min.min(v), max.max(v))),
            })
    }

    /// Reproject every segment into `target`
    pub fn to_crs(&self, target: Crs) -> Result<Self> {
        let source = self.crs.ok_or_else(|| {
            PlotError::CoordinateConversion("line table has no CRS to reproject from".to_string())
        })?;
        let lines = self
            .lines
            .iter()
            .map(|line| {
                let start = utils::reproject(line.start_point(), source, target)?;
                let end = utils::reproject(line.end_point(), source, target)?;
                Ok(Line::new(start, end))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            lines,
            columns: self.columns.clone(),
            crs: Some(target),
        })
    }
}

/// The final position of a trajectory, annotated with its heading
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndMarker {
    pub position: Point<f64>,
    /// Last-row attribute values, including [`TRIANGLE_ANGLE_COLUMN`]
    pub values: BTreeMap<String, f64>,
    pub crs: Option<Crs>,
}

impl EndMarker {
    /// Rotation of the triangle marker, the negated heading
    pub fn triangle_angle(&self) -> f64 {
        self.values
            .get(TRIANGLE_ANGLE_COLUMN)
            .copied()
            .unwrap_or_default()
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn to_crs(&self, target: Crs) -> Result<Self> {
        let source = self.crs.ok_or_else(|| {
            PlotError::CoordinateConversion("end marker has no CRS to reproject from".to_string())
        })?;
        Ok(Self {
            position: utils::reproject(self.position, source, target)?,
            values: self.values.clone(),
            crs: Some(target),
        })
    }
}
