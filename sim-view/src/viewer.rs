//! Interactive transpiration viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the [`Simulation`] and
//! implements [`eframe::App`] to feed it host time, forward slider changes
//! and draw the scene from its snapshot every frame.

use std::time::Duration;

use eframe::App;
use glam::Vec2;
use transpiration_core::{
    model::{FactorLevel, TranspirationStatus},
    params::{Parameter, SimulationParameters},
    particle::ParticleView,
    scheduler::Scheduler,
    simulation::{PumpReport, Simulation},
};

use crate::scene::{self, CLOUD_COUNT, Clouds, Decor, SCENE_SIZE, STEM, STEM_WIDTH, STOMA_RADII};

const SKY: egui::Color32 = egui::Color32::from_rgb(224, 242, 254);
const STEM_COLOR: egui::Color32 = egui::Color32::from_rgb(45, 138, 62);
const LEAF_COLOR: egui::Color32 = egui::Color32::from_rgb(74, 222, 128);

/// Colour with a fractional alpha.
fn with_alpha(rgb: [u8; 3], alpha: f32) -> egui::Color32 {
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(rgb[0], rgb[1], rgb[2], a)
}

/// Main application state for the viewer.
///
/// ### Fields
/// - `sim` - The simulation controller; owns parameters, particles and timers.
/// - `started` - Whether the simulation has been started on host time yet.
/// - `last_report` - What the most recent pump did (for the status bar).
/// - `hover_scene` - Scene coordinates under the pointer, if any.
pub struct Viewer {
    sim: Simulation,
    started: bool,
    last_report: PumpReport,
    hover_scene: Option<Vec2>,
}

impl Viewer {
    pub fn new(sim: Simulation) -> Self {
        Self {
            sim,
            started: false,
            last_report: PumpReport::default(),
            hover_scene: None,
        }
    }

    /// Puts all three inputs back to their initial values.
    fn reset_inputs(&mut self) {
        let defaults = SimulationParameters::default();
        for param in Parameter::ALL {
            self.sim.set(param, defaults.get(param));
        }
    }

    /// Screen pixels per scene unit for the given drawing area.
    fn scene_scale(rect: egui::Rect) -> f32 {
        (rect.width() / SCENE_SIZE.x).min(rect.height() / SCENE_SIZE.y)
    }

    /// Top-left corner of the scene box, which sits bottom-centred in `rect`.
    fn scene_origin(rect: egui::Rect) -> egui::Pos2 {
        let s = Self::scene_scale(rect);
        egui::pos2(
            rect.center().x - SCENE_SIZE.x * 0.5 * s,
            rect.bottom() - SCENE_SIZE.y * s,
        )
    }

    /// Converts a scene position to screen-space.
    fn scene_to_screen(p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let s = Self::scene_scale(rect);
        let o = Self::scene_origin(rect);
        egui::pos2(o.x + p.x * s, o.y + p.y * s)
    }

    /// Converts a screen position back to scene units.
    fn screen_to_scene(p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let s = Self::scene_scale(rect);
        let o = Self::scene_origin(rect);
        Vec2::new((p.x - o.x) / s, (p.y - o.y) / s)
    }

    /// Feeds host time into the simulation and keeps frames coming while
    /// the engine asks for them.
    fn drive(&mut self, ctx: &egui::Context) {
        let now_ms = ctx.input(|i| i.time) * 1000.0;
        if !self.started {
            self.sim.start(now_ms);
            self.started = true;
        }

        self.last_report = self.sim.pump(now_ms);

        match repaint_delay(self.sim.scheduler()) {
            Some(Duration::ZERO) => ctx.request_repaint(),
            Some(wait) => ctx.request_repaint_after(wait),
            None => {}
        }
    }

    /// Builds the left panel with the three input sliders and derived values.
    fn ui_controls_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("controls_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Environment");
                ui.separator();

                for param in Parameter::ALL {
                    let mut value = self.sim.params().get(param);
                    let slider = egui::Slider::new(&mut value, param.range())
                        .text(param.label())
                        .suffix(param.unit());
                    if ui.add(slider).changed() {
                        self.sim.set(param, value);
                    }
                }

                if ui.button("Reset inputs").clicked() {
                    self.reset_inputs();
                }

                ui.separator();
                ui.label("Model");
                let d = self.sim.derived();
                ui.label(format!("rate = {:.1}", d.rate));
                ui.label(format!("spawn interval = {:.1} ms", d.spawn_interval_ms));
                ui.label(format!("max particles = {}", d.max_population));
                ui.label(format!("speed = {:.2}", d.particle_speed));
                ui.label(format!("batch = {}", d.batch_size));
            });
    }

    /// Builds the bottom panel with the status classification and hints.
    fn ui_status_panel(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            let params = self.sim.params();
            ui.strong(status_text(self.sim.status()));
            ui.label(temperature_hint(FactorLevel::temperature(params.temperature())));
            ui.label(humidity_hint(FactorLevel::humidity(params.humidity())));
            ui.label(light_hint(FactorLevel::light(params.light())));
            ui.small("Illustrative teaching model; the numbers are not measurements of real plants.");

            ui.separator();
            ui.horizontal(|ui| {
                ui.label(format!("particles = {}", self.sim.particles().len()));
                ui.label(format!("spawned = {}", self.last_report.spawned));
                ui.label(format!("expired = {}", self.last_report.expired));
                ui.label(format!("moved = {}", self.last_report.advanced));
                if let Some(p) = self.hover_scene {
                    ui.separator();
                    ui.label(format!("scene = ({:.0}, {:.0})", p.x, p.y));
                }
            });
        });
    }

    /// Builds the central panel with the sky, plant and particles.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::hover());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            self.hover_scene = response.hover_pos().map(|p| Self::screen_to_scene(p, rect));

            let snapshot = self.sim.snapshot();
            let decor = Decor::from_params(&snapshot.params);

            painter.rect_filled(rect, egui::CornerRadius::ZERO, SKY);
            Self::paint_sun(&painter, rect, &decor);
            if let Some(clouds) = decor.clouds {
                Self::paint_clouds(&painter, rect, clouds);
            }
            Self::paint_thermometer(&painter, rect, &decor, snapshot.params.temperature());
            self.paint_plant(&painter, rect);
            Self::paint_particles(&painter, rect, &snapshot.particles);
        });
    }

    fn paint_sun(painter: &egui::Painter, rect: egui::Rect, decor: &Decor) {
        let sun = decor.sun;
        let center = egui::pos2(rect.right() - 60.0, rect.top() + 60.0);
        let radius = 40.0 * sun.scale;

        painter.circle_filled(
            center,
            radius * sun.halo + sun.blur,
            with_alpha([252, 211, 77], 0.4 * sun.opacity),
        );
        painter.circle_filled(center, radius, with_alpha([234, 179, 8], sun.opacity));
    }

    fn paint_clouds(painter: &egui::Painter, rect: egui::Rect, clouds: Clouds) {
        let rgb = if clouds.raining {
            [75, 85, 99]
        } else {
            [156, 163, 175]
        };
        let color = with_alpha(rgb, clouds.opacity);
        let rain = egui::Stroke::new(1.5, with_alpha([96, 165, 250], clouds.opacity));

        for i in 0..CLOUD_COUNT {
            let anchor = Clouds::anchor(i);
            let c = rect.min
                + egui::vec2(anchor.x * rect.width(), anchor.y * rect.height())
                + egui::vec2(30.0, 30.0);

            painter.circle_filled(c + egui::vec2(-18.0, 4.0), 14.0, color);
            painter.circle_filled(c + egui::vec2(0.0, -4.0), 18.0, color);
            painter.circle_filled(c + egui::vec2(18.0, 4.0), 14.0, color);

            if clouds.raining {
                for dx in [-12.0, 0.0, 12.0] {
                    let top = c + egui::vec2(dx, 20.0);
                    painter.line_segment([top, top + egui::vec2(-3.0, 12.0)], rain);
                }
            }
        }
    }

    fn paint_thermometer(painter: &egui::Painter, rect: egui::Rect, decor: &Decor, celsius: i32) {
        let tube = egui::Rect::from_min_size(rect.min + egui::vec2(16.0, 16.0), egui::vec2(32.0, 96.0));
        let rounding = egui::CornerRadius::same(16);

        painter.rect_filled(tube, rounding, egui::Color32::WHITE);

        let level = tube.height() * decor.thermometer.fill;
        let fill = egui::Rect::from_min_max(egui::pos2(tube.left(), tube.bottom() - level), tube.max);
        let color = if decor.thermometer.hot {
            egui::Color32::from_rgb(239, 68, 68)
        } else {
            egui::Color32::from_rgb(59, 130, 246)
        };
        painter.rect_filled(fill, rounding, color);
        painter.rect_stroke(
            tube,
            rounding,
            egui::Stroke::new(2.0, egui::Color32::from_rgb(209, 213, 219)),
            egui::StrokeKind::Inside,
        );

        painter.text(
            egui::pos2(tube.center().x, tube.bottom() + 4.0),
            egui::Align2::CENTER_TOP,
            format!("{celsius}°C"),
            egui::FontId::proportional(14.0),
            egui::Color32::BLACK,
        );
    }

    fn paint_plant(&self, painter: &egui::Painter, rect: egui::Rect) {
        let s = Self::scene_scale(rect);

        painter.line_segment(
            [
                Self::scene_to_screen(STEM[0], rect),
                Self::scene_to_screen(STEM[1], rect),
            ],
            egui::Stroke::new(STEM_WIDTH * s, STEM_COLOR),
        );

        for leaf in scene::leaf_outlines() {
            let points = leaf
                .into_iter()
                .map(|p| Self::scene_to_screen(p, rect))
                .collect();
            painter.add(egui::Shape::convex_polygon(points, LEAF_COLOR, egui::Stroke::NONE));
        }

        let stoma = with_alpha([31, 41, 55], 0.3);
        for origin in &self.sim.config().origins {
            painter.add(egui::Shape::ellipse_filled(
                Self::scene_to_screen(*origin, rect),
                egui::vec2(STOMA_RADII.x * s, STOMA_RADII.y * s),
                stoma,
            ));
        }
    }

    fn paint_particles(painter: &egui::Painter, rect: egui::Rect, particles: &[ParticleView]) {
        let s = Self::scene_scale(rect);
        for p in particles {
            let center = Self::scene_to_screen(p.pos, rect);
            let r = p.size * s;
            painter.circle_filled(center, r, with_alpha([96, 165, 250], p.opacity));
            painter.circle_filled(center, r * 0.6, with_alpha([147, 197, 253], p.opacity * 0.8));
        }
    }
}

/// How long the host may sleep before the scheduler has work again.
///
/// Zero while a frame is pending, `None` once nothing is registered. Measured
/// from the scheduler's own clock, which never runs backwards.
fn repaint_delay(scheduler: &Scheduler) -> Option<Duration> {
    if scheduler.pending_frames() > 0 {
        return Some(Duration::ZERO);
    }
    let deadline = scheduler.next_deadline_ms()?;
    let wait_ms = (deadline - scheduler.now_ms()).max(0.0);
    Some(Duration::from_secs_f64(wait_ms / 1000.0))
}

impl App for Viewer {
    /// eframe callback: advances the simulation and builds all panels.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drive(ctx);
        self.ui_controls_panel(ctx);
        self.ui_status_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

fn status_text(status: TranspirationStatus) -> &'static str {
    match status {
        TranspirationStatus::VeryHigh => "Transpiration is very active!",
        TranspirationStatus::High => "Transpiration is active.",
        TranspirationStatus::Moderate => "Transpiration is moderate.",
        TranspirationStatus::Low => "Transpiration is slow.",
        TranspirationStatus::VeryLow => "Transpiration is very slow.",
    }
}

fn temperature_hint(level: FactorLevel) -> &'static str {
    match level {
        FactorLevel::High => "High temperature is speeding transpiration up!",
        FactorLevel::Low => "Low temperature is holding transpiration back.",
        FactorLevel::Moderate => "Transpiration is running at a mild temperature.",
    }
}

fn humidity_hint(level: FactorLevel) -> &'static str {
    match level {
        FactorLevel::High => "Humid air is strongly suppressing transpiration.",
        FactorLevel::Low => "Dry air is making transpiration very active!",
        FactorLevel::Moderate => "Transpiration is running at moderate humidity.",
    }
}

fn light_hint(level: FactorLevel) -> &'static str {
    match level {
        FactorLevel::High => "Strong light opens the stomata wide and boosts transpiration!",
        FactorLevel::Low => "Weak light barely opens the stomata, so transpiration slows.",
        FactorLevel::Moderate => "Moderate light keeps the stomata open.",
    }
}
