//! Map viewer for rendered overlays
//!
//! [`MapRenderer`] is the interactive backend handed to the plotters. It can only render
//! when the binary is built with the `interactive` feature, which brings in egui and walkers
//! to show the resulting overlay on a slippy map.

#[cfg(feature = "interactive")]
mod app;
#[cfg(feature = "interactive")]
mod plugin;

use crate::error::Result;
use trajectory_plot_lib::{
    EndMarker, InteractiveLineStyle, InteractiveRenderer, LineTable, MarkerStyle, Overlay,
    OverlayDefaults, OverlayRenderer, PlotError,
};

/// Interactive renderer backed by the map viewer
#[derive(Clone, Debug, Default)]
pub struct MapRenderer {
    overlay: OverlayRenderer,
}

impl InteractiveRenderer for MapRenderer {
    type Drawable = Overlay;

    fn check_capability(&self) -> trajectory_plot_lib::Result<()> {
        if cfg!(feature = "interactive") {
            Ok(())
        } else {
            Err(PlotError::MissingCapability {
                components: vec!["egui", "walkers"],
                docs: vec!["https://www.egui.rs", "https://docs.rs/walkers"],
            })
        }
    }

    fn configure_overlay(&mut self, defaults: &OverlayDefaults) {
        self.overlay.configure_overlay(defaults);
    }

    fn render_lines(
        &mut self,
        table: &LineTable,
        style: &InteractiveLineStyle,
    ) -> trajectory_plot_lib::Result<Overlay> {
        self.overlay.render_lines(table, style)
    }

    fn render_end_marker(
        &mut self,
        marker: &EndMarker,
        style: &MarkerStyle,
    ) -> trajectory_plot_lib::Result<Overlay> {
        self.overlay.render_end_marker(marker, style)
    }
}

/// Open a window showing `overlay` until it is closed
#[cfg(feature = "interactive")]
pub fn show(overlay: Overlay) -> Result<()> {
    app::run(overlay)
}

#[cfg(not(feature = "interactive"))]
pub fn show(_overlay: Overlay) -> Result<()> {
    // Rendering already failed the capability check
    Ok(())
}
