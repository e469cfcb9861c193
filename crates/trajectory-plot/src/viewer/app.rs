//! Map window showing one overlay over its basemap

use super::plugin::OverlayPlugin;
use crate::error::{CliError, Result};
use eframe::egui;
use std::sync::Arc;
use trajectory_plot_lib::{Overlay, Tiles};
use walkers::{
    HttpTiles, Map, MapMemory, TileId,
    sources::{Attribution, TileSource},
};

/// Walkers tile source for a basemap
struct Basemap(Tiles);

impl TileSource for Basemap {
    fn tile_url(&self, tile_id: TileId) -> String {
        self.0
            .url()
            .unwrap_or_default()
            .replace("{z}", &tile_id.zoom.to_string())
            .replace("{x}", &tile_id.x.to_string())
            .replace("{y}", &tile_id.y.to_string())
    }

    fn attribution(&self) -> Attribution {
        let url = match self.0 {
            Tiles::OpenTopoMap => "https://opentopomap.org/",
            _ => "https://www.openstreetmap.org/copyright",
        };
        Attribution {
            text: self.0.attribution(),
            url,
            logo_light: None,
            logo_dark: None,
        }
    }

    fn max_zoom(&self) -> u8 {
        match self.0 {
            Tiles::OpenTopoMap => 17,
            _ => 19,
        }
    }
}

pub struct ViewerApp {
    overlay: Arc<Overlay>,
    /// `None` when the overlay asks for no basemap
    tiles: Option<HttpTiles>,
    map_memory: MapMemory,
    home: walkers::Position,
}

impl ViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, overlay: Overlay) -> Self {
        let basemap = overlay.tiles();
        let tiles = basemap
            .is_enabled()
            .then(|| HttpTiles::new(Basemap(basemap), cc.egui_ctx.clone()));

        let mut map_memory = MapMemory::default();
        let mut home = walkers::lat_lon(0.0, 0.0);
        if let Some(bounds) = overlay.bounds() {
            let center = bounds.center();
            home = walkers::lat_lon(center.y, center.x);
            let max_span = bounds.width().max(bounds.height());
            let zoom = if max_span > 0.0 {
                ((4.0 * 360.0 / max_span).log2() - 0.5).clamp(1.0, 18.0)
            } else {
                12.0
            };
            map_memory.center_at(home);
            let _ = map_memory.set_zoom(zoom);
            tracing::debug!(
                "Centered map at ({:.4}, {:.4}), zoom {:.1}",
                center.y,
                center.x,
                zoom
            );
        }

        Self {
            overlay: Arc::new(overlay),
            tiles,
            map_memory,
            home,
        }
    }

    fn legend(&self, ctx: &egui::Context) {
        let entries: Vec<String> = self
            .overlay
            .line_layers()
            .filter_map(|layer| match (&layer.label, layer.colorbar) {
                (Some(label), _) => Some(label.clone()),
                (None, Some((vmin, vmax))) => Some(format!("{vmin:.2} .. {vmax:.2}")),
                (None, None) => None,
            })
            .collect();
        if entries.is_empty() {
            return;
        }
        egui::Window::new("Legend")
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-10.0, 10.0))
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                for entry in entries {
                    ui.label(entry);
                }
            });
    }
}

#[profiling::all_functions]
impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Home)) {
            self.map_memory.center_at(self.home);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let tiles: Option<&mut dyn walkers::Tiles> = match self.tiles.as_mut() {
                    Some(tiles) => Some(tiles),
                    None => None,
                };
                let map = Map::new(tiles, &mut self.map_memory, self.home)
                    .with_plugin(OverlayPlugin::new(self.overlay.clone()));
                ui.add(map);

                let attribution = self.overlay.tiles().attribution();
                if !attribution.is_empty() {
                    let screen_rect = ui.max_rect();
                    ui.painter().text(
                        screen_rect.center_bottom() + egui::vec2(0.0, -5.0),
                        egui::Align2::CENTER_BOTTOM,
                        attribution,
                        egui::FontId::proportional(10.0),
                        egui::Color32::from_black_alpha(180),
                    );
                }
            });

        self.legend(ctx);
    }
}

pub fn run(overlay: Overlay) -> Result<()> {
    let (width, height) = overlay
        .defaults
        .as_ref()
        .map(|defaults| (defaults.width as f32, defaults.height as f32))
        .unwrap_or((900.0, 700.0));
    tracing::info!("Opening map viewer ({}x{})", width, height);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_title("Trajectory Plot"),
        ..Default::default()
    };

    eframe::run_native(
        "Trajectory Plot",
        native_options,
        Box::new(move |cc| {
            let app: Box<dyn eframe::App> = Box::new(ViewerApp::new(cc, overlay));
            Ok(app)
        }),
    )
    .map_err(|error| CliError::Viewer(error.to_string()))
}
