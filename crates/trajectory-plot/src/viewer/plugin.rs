//! Walkers plugin drawing an overlay's lines, end markers and hover values

use egui::{Color32, Pos2, Stroke};
use std::collections::BTreeMap;
use std::sync::Arc;
use trajectory_plot_lib::{Color, MarkerLayer, Overlay};
use walkers::{Plugin, Projector};

/// Extra pixels around a line that still count as hovering it
const HOVER_TOLERANCE: f32 = 4.0;

pub struct OverlayPlugin {
    overlay: Arc<Overlay>,
}

impl OverlayPlugin {
    pub fn new(overlay: Arc<Overlay>) -> Self {
        Self { overlay }
    }
}

fn to_color32(color: Color) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

/// Screen position of an overlay coordinate, x being longitude
fn project(projector: &Projector, coord: geo::Coord<f64>) -> Pos2 {
    let screen = projector.project(walkers::lat_lon(coord.y, coord.x));
    Pos2::new(screen.x, screen.y)
}

/// Marker radius in pixels; marker sizes are areas
fn marker_radius(marker: &MarkerLayer) -> f32 {
    marker.size.max(0.0).sqrt() as f32
}

/// Vertices of an upward triangle around `center`, rotated counter-clockwise by `angle` degrees
pub(crate) fn triangle_vertices(center: Pos2, radius: f32, angle: f64) -> [Pos2; 3] {
    [90.0_f64, 210.0, 330.0].map(|vertex| {
        let theta = (vertex + angle).to_radians();
        // Screen y grows downwards
        Pos2::new(
            center.x + radius * theta.cos() as f32,
            center.y - radius * theta.sin() as f32,
        )
    })
}

pub(crate) fn distance_to_segment(point: Pos2, start: Pos2, end: Pos2) -> f32 {
    let segment = end - start;
    let length_sq = segment.length_sq();
    if length_sq == 0.0 {
        return point.distance(start);
    }
    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}

pub(crate) fn hover_text(values: &BTreeMap<String, f64>) -> String {
    values
        .iter()
        .map(|(name, value)| format!("{name}: {value:.3}"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl Plugin for OverlayPlugin {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        response: &egui::Response,
        projector: &Projector,
        _map_memory: &walkers::MapMemory,
    ) {
        profiling::scope!("OverlayPlugin::run");

        let painter = ui.painter();
        let pointer = response.hover_pos();
        let mut hovered: Option<&BTreeMap<String, f64>> = None;

        for layer in self.overlay.line_layers() {
            for segment in &layer.segments {
                let start = project(projector, segment.start);
                let end = project(projector, segment.end);
                painter.line_segment(
                    [start, end],
                    Stroke::new(layer.width as f32, to_color32(segment.color)),
                );
                if let Some(pointer) = pointer
                    && !segment.hover.is_empty()
                    && distance_to_segment(pointer, start, end)
                        <= layer.width as f32 / 2.0 + HOVER_TOLERANCE
                {
                    hovered = Some(&segment.hover);
                }
            }
        }

        for marker in self.overlay.markers() {
            let center = project(projector, marker.position);
            let radius = marker_radius(marker);
            let vertices = triangle_vertices(center, radius, marker.angle);
            painter.add(egui::Shape::convex_polygon(
                vertices.to_vec(),
                to_color32(marker.color),
                Stroke::new(1.0, Color32::from_black_alpha(160)),
            ));
            if let Some(pointer) = pointer
                && pointer.distance(center) <= radius
            {
                hovered = Some(&marker.hover);
            }
        }

        if let (Some(pointer), Some(values)) = (pointer, hovered) {
            painter.text(
                pointer + egui::vec2(12.0, 12.0),
                egui::Align2::LEFT_TOP,
                hover_text(values),
                egui::FontId::monospace(12.0),
                Color32::BLACK,
            );
        }
    }
}
