//! Trajectory Plot Library - Styling GPS Trajectories for Static and Interactive Rendering
//!
//! This library turns trajectories (ordered, timestamped positions with optional per-point
//! attributes) and an open set of styling options into render calls against two kinds of
//! backends: a static, figure-based renderer and an interactive, tile-based map renderer.
//!
//! # Architecture
//!
//! - **[`Trajectory`]** / **[`TrajectoryCollection`]**: Owned trajectory data with derived
//!   speed and direction attributes
//! - **[`PlotOptions`]** / **[`PlotConfig`]**: Open key/value options resolved once into a
//!   typed configuration plus renderer pass-through values
//! - **[`TrajectoryPlotter`]** / **[`TrajectoryCollectionPlotter`]**: The stylers issuing
//!   render calls, with a shared color scale for collections
//! - **[`StaticRenderer`]** / **[`InteractiveRenderer`]**: Backend seams, implemented by
//!   [`SvgRenderer`] (plotters) and [`OverlayRenderer`]
//!
//! # Usage Example
//!
//! ```rust
//! use trajectory_plot_lib::{PlotOptions, SvgRenderer, Trajectory, TrajectoryPlotter, TrajectoryPoint};
//! use time::{Duration, OffsetDateTime};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let points = (0..3)
//!     .map(|i| TrajectoryPoint {
//!         position: geo::Point::new(-0.1278 + i as f64 * 0.001, 51.5074),
//!         time: OffsetDateTime::UNIX_EPOCH + Duration::seconds(i * 10),
//!     })
//!     .collect();
//! let trajectory = Trajectory::new("walk", points, None)?;
//!
//! let options = PlotOptions::new().with("column", "speed");
//! let mut plotter = TrajectoryPlotter::new(&trajectory, options)?;
//! let figure = plotter.plot(&mut SvgRenderer::default(), None)?;
//! let svg = figure.to_svg_string()?;
//! assert!(svg.contains("<svg"));
//! # Ok(())
//! # }
//! ```

mod collection;
mod collection_plotter;
mod color;
mod options;
mod overlay;
mod plotter;
mod render;
mod styler;
mod svg;
mod table;
mod tiles;
mod trajectory;
pub mod utils;

#[cfg(test)]
mod testing;

// Public API exports
pub use collection::TrajectoryCollection;
pub use collection_plotter::TrajectoryCollectionPlotter;
pub use color::{Color, ColorMap, ColorRamp};
pub use options::{OptionValue, PlotConfig, PlotOptions};
pub use overlay::{LineLayer, MarkerLayer, Overlay, OverlayLayer, OverlayRenderer, OverlaySegment};
pub use plotter::TrajectoryPlotter;
pub use render::{
    Compose, InteractiveLineStyle, InteractiveRenderer, LineColor, MarkerShape, MarkerStyle,
    OverlayDefaults, StaticLineStyle, StaticRenderer,
};
pub use styler::ColorScale;
pub use svg::{Figure, SvgRenderer};
pub use table::{EndMarker, LineTable, TRIANGLE_ANGLE_COLUMN};
pub use tiles::Tiles;
pub use trajectory::{Crs, DIRECTION_COLUMN, SPEED_COLUMN, Trajectory, TrajectoryPoint};

/// Error types for trajectory plotting
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    #[error("GPX parsing error: {0}")]
    GpxParse(#[from] gpx::errors::GpxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Trajectory {id} needs at least two points, got {count}")]
    TooFewPoints { id: String, count: usize },

    #[error("Empty trajectory collection")]
    EmptyCollection,

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column {name} exists already")]
    ColumnExists { name: String },

    #[error("Column {name} has {actual} values, expected {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Coordinate conversion error: {0}")]
    CoordinateConversion(String),

    #[error("Invalid option {key}: {reason}")]
    InvalidOption { key: String, reason: String },

    #[error(
        "Missing optional dependencies. To use interactive plotting, install {} (see {}).",
        .components.join(" and "),
        .docs.join(" and ")
    )]
    MissingCapability {
        components: Vec<&'static str>,
        docs: Vec<&'static str>,
    },

    #[error("Render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, PlotError>;
