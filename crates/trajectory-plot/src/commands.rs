//! Subcommand handlers: load trajectories, pick a plotter, hand the result to a backend

use crate::cli::Command;
use crate::error::{CliError, Result};
use crate::viewer::{self, MapRenderer};
use std::path::{Path, PathBuf};
use trajectory_plot_lib::{
    InteractiveRenderer, Overlay, OverlayRenderer, PlotOptions, SvgRenderer, TrajectoryCollection,
    TrajectoryCollectionPlotter, TrajectoryPlotter,
};

pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Static {
            files,
            output,
            options,
        } => {
            let collection = load(&files)?;
            let options = PlotOptions::from_pairs(&options)?;
            plot_static(collection, options, &output)
        }
        Command::Interactive {
            files,
            export,
            headless,
            options,
        } => {
            let collection = load(&files)?;
            let options = PlotOptions::from_pairs(&options)?;
            if headless {
                let overlay = render_overlay(collection, options, &mut OverlayRenderer::default())?;
                export_overlay(&overlay, export.as_deref())
            } else {
                let overlay = render_overlay(collection, options, &mut MapRenderer::default())?;
                export_overlay(&overlay, export.as_deref())?;
                viewer::show(overlay)
            }
        }
    }
}

fn load(files: &[PathBuf]) -> Result<TrajectoryCollection> {
    let collection = TrajectoryCollection::load_from_files(files)?;
    if collection.is_empty() {
        return Err(CliError::NoTrajectories);
    }
    Ok(collection)
}

/// Draw one trajectory with the single plotter, several with the collection plotter
pub fn plot_static(
    collection: TrajectoryCollection,
    options: PlotOptions,
    output: &Path,
) -> Result<()> {
    let mut renderer = SvgRenderer::default();
    let figure = if collection.len() == 1 {
        match collection.into_single() {
            Some(trajectory) => {
                TrajectoryPlotter::new(&trajectory, options)?.plot(&mut renderer, None)?
            }
            None => return Err(CliError::NoTrajectories),
        }
    } else {
        TrajectoryCollectionPlotter::new(&collection, options)?.plot(&mut renderer, None)?
    };
    figure.save_svg(output)?;
    Ok(())
}

pub fn render_overlay<R>(
    collection: TrajectoryCollection,
    options: PlotOptions,
    renderer: &mut R,
) -> Result<Overlay>
where
    R: InteractiveRenderer<Drawable = Overlay>,
{
    let overlay = if collection.len() == 1 {
        match collection.into_single() {
            Some(trajectory) => {
                TrajectoryPlotter::new(&trajectory, options)?.interactive_plot(renderer)?
            }
            None => return Err(CliError::NoTrajectories),
        }
    } else {
        TrajectoryCollectionPlotter::new(&collection, options)?.interactive_plot(renderer)?
    };
    tracing::debug!("Overlay has {} layers", overlay.layers.len());
    Ok(overlay)
}

fn export_overlay(overlay: &Overlay, path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::io::BufWriter::new(std::fs::File::create(path)?);
    serde_json::to_writer_pretty(file, overlay)?;
    tracing::info!("Exported overlay to {}", path.display());
    Ok(())
}
