use trajectory_plot_lib::PlotError;

/// Errors of the command line tool
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Plot(#[from] PlotError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to export overlay: {0}")]
    Export(#[from] serde_json::Error),

    #[error("No trajectories with at least two timestamped points in the given files")]
    NoTrajectories,

    #[cfg(feature = "interactive")]
    #[error("Map viewer error: {0}")]
    Viewer(String),
}

pub type Result<T> = std::result::Result<T, CliError>;
