//! Window front-end for the roots animation built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the [`Simulation`] and
//! implements [`eframe::App`] to feed it pointer, scroll and resize input
//! and to show its surface as a texture every frame.

use eframe::App;
use glam::Vec2;
use roots_core::{Config, Simulation, scroll::WaveKind};

/// Main application state for the animation window.
///
/// The typical per-frame update is:
/// 1. Match the surface to the central panel size.
/// 2. Forward pointer position and scroll deltas to the simulation.
/// 3. If `running` (or a single step was requested), call [`Simulation::frame`].
/// 4. Upload the surface pixels and paint them over the panel.
///
/// ### Fields
/// - `sim` - The simulation: surface, trackers, growing trees.
/// - `texture` - GPU copy of the surface, created on first upload.
///
/// - `running` - Whether frames advance automatically.
/// - `step_requested` - Advance exactly one frame on the next update.
/// - `scroll_offset` - Virtual scroll position built from egui scroll deltas.
///
/// - `last_frame_time` - Time stamp of the last simulated frame (egui time).
/// - `last_frame_dt` - Time between the last two simulated frames (for display only).
pub struct Viewer {
    sim: Simulation,
    texture: Option<egui::TextureHandle>,

    running: bool,
    step_requested: bool,
    scroll_offset: f32,

    last_frame_time: f64,
    last_frame_dt: f64,
}

impl Viewer {
    /// Creates a viewer around a fresh simulation of `width` x `height` points.
    ///
    /// The surface is resized to the real panel size on the first update.
    pub fn new(cfg: Config, width: usize, height: usize) -> Self {
        Self {
            sim: Simulation::new(cfg, width, height),
            texture: None,
            running: true,
            step_requested: false,
            scroll_offset: 0.0,
            last_frame_time: 0.0,
            last_frame_dt: 0.0,
        }
    }

    /// Converts a screen-space position to surface coordinates.
    ///
    /// The simulation works in points, so this is just an offset by the
    /// panel origin whatever the display scale.
    fn screen_to_surface(p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        Vec2::new(p.x - rect.min.x, p.y - rect.min.y)
    }

    /// Surface size in physical pixels for a panel rectangle.
    ///
    /// Sizing by `pixels_per_point` keeps one texel per screen pixel, so the
    /// texture is not stretched on high-DPI displays.
    fn surface_size(rect: egui::Rect, pixels_per_point: f32) -> (usize, usize) {
        (
            (rect.width() * pixels_per_point).max(0.0).round() as usize,
            (rect.height() * pixels_per_point).max(0.0).round() as usize,
        )
    }

    /// Turns a vertical egui scroll delta into an absolute offset and
    /// passes it on. Scrolling down yields negative deltas in egui, which
    /// moves the virtual offset forward.
    fn handle_scroll(&mut self, delta_y: f32) -> Option<WaveKind> {
        if delta_y == 0.0 {
            return None;
        }
        self.scroll_offset -= delta_y;
        Some(self.sim.scrolled(self.scroll_offset))
    }

    /// Updates the pointer tracker from the current hover position.
    fn handle_pointer(&mut self, hover: Option<Vec2>) {
        match hover {
            Some(pos) => self.sim.pointer_moved(pos),
            None if self.sim.pointer().active => self.sim.pointer_left(),
            None => {}
        }
    }

    /// Advances the animation by a single frame.
    fn step_once(&mut self, now: f64) {
        if self.last_frame_time > 0.0 {
            self.last_frame_dt = now - self.last_frame_time;
        }
        self.sim.frame();
        self.last_frame_time = now;
    }

    /// Copies the surface into the texture, creating it on first use.
    fn upload_surface(&mut self, ctx: &egui::Context) {
        let surface = self.sim.surface();
        if surface.width() == 0 || surface.height() == 0 {
            return;
        }

        let image = egui::ColorImage::from_rgba_unmultiplied(
            [surface.width(), surface.height()],
            surface.as_rgba(),
        );
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("roots-surface", image, egui::TextureOptions::LINEAR));
            }
        }
    }

    /// Builds the top panel UI (run controls, manual waves).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Step").clicked() {
                    self.step_requested = true;
                }

                ui.separator();

                if ui.button("Grow wave").clicked() {
                    self.sim.plant_wave(WaveKind::Grow);
                }

                if ui.button("Retract wave").clicked() {
                    self.sim.plant_wave(WaveKind::Retract);
                }

                if ui.button("Clear").clicked() {
                    self.sim.clear();
                }
            });
        });
    }

    /// Builds the bottom status bar (frame counters, tree and node counts).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        let stats = self.sim.last_stats();
        let scheduler = self.sim.scheduler();
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt last = {:.3} s", self.last_frame_dt));
                ui.label(format!("frame = {}", self.sim.frame_number()));
                ui.separator();
                ui.label(format!(
                    "scroll = {}",
                    if self.sim.scroll().scrolling_down() { "down" } else { "up" }
                ));
                ui.separator();
                ui.label(format!("strokes = {}", stats.strokes));
                ui.label(format!("live nodes = {}", scheduler.live_nodes()));
                ui.label(format!("nodes = {}", scheduler.node_count()));
                ui.label(format!("trees = {}", scheduler.len()));
            });
        });
    }

    /// Builds the central panel that shows the surface and takes input.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let response = ui.allocate_response(ui.available_size(), egui::Sense::hover());
                let rect = response.rect;

                let pixels_per_point = ctx.pixels_per_point();
                let (width, height) = Self::surface_size(rect, pixels_per_point);
                self.sim.set_pixels_per_point(pixels_per_point);
                self.sim.resize(width, height);

                let hover = response
                    .hover_pos()
                    .map(|p| Self::screen_to_surface(p, rect));
                self.handle_pointer(hover);

                let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
                self.handle_scroll(scroll);

                if self.running || self.step_requested {
                    let now = ctx.input(|i| i.time);
                    self.step_once(now);
                    self.step_requested = false;
                }

                self.upload_surface(ctx);
                if let Some(texture) = &self.texture {
                    ui.painter_at(rect).image(
                        texture.id(),
                        rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }

                if self.running {
                    ctx.request_repaint();
                }
            });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_central_panel(ctx);
    }
}
