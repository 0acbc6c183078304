//! The per-frame animation loop and the state it runs on.
//!
//! [`Simulation`] owns everything: the surface, the input trackers, the
//! scheduler holding every growing tree, and the random source. The host
//! feeds it input events and calls [`Simulation::frame`] once per frame.
//!
//! A frame is:
//! 1. wash the surface with translucent white ([`Canvas::fade`]),
//! 2. step every planted tree once ([`FrameScheduler::run_frame`]),
//! 3. plant a root under the pointer if the pointer is over the surface.

use crate::{
    config::Config,
    pointer::PointerTracker,
    schedule::{FrameScheduler, FrameStats},
    scroll::{ScrollTracker, WaveKind},
    spawn,
    surface::{Canvas, Surface},
};
use glam::Vec2;
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info};

pub struct Simulation {
    cfg: Config,
    surface: Surface,
    pointer: PointerTracker,
    scroll: ScrollTracker,
    scheduler: FrameScheduler,
    rng: StdRng,
    frame: u64,
    last_stats: FrameStats,
}

impl Simulation {
    /// Creates a simulation on a blank `width` x `height` surface.
    ///
    /// Uses `cfg.seed` for the random source when set, and plants one grow
    /// wave straight away unless `cfg.initial_wave` is off.
    pub fn new(cfg: Config, width: usize, height: usize) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut sim = Self {
            cfg,
            surface: Surface::new(width, height),
            pointer: PointerTracker::default(),
            scroll: ScrollTracker::default(),
            scheduler: FrameScheduler::new(),
            rng,
            frame: 0,
            last_stats: FrameStats::default(),
        };

        info!(width, height, seed = ?sim.cfg.seed, "simulation created");
        if sim.cfg.initial_wave {
            sim.plant_wave(WaveKind::Grow);
        }
        sim
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    pub fn scroll(&self) -> &ScrollTracker {
        &self.scroll
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn frame_number(&self) -> u64 {
        self.frame
    }

    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    pub fn pointer_moved(&mut self, pos: Vec2) {
        self.pointer.moved(pos);
    }

    pub fn pointer_left(&mut self) {
        self.pointer.left();
    }

    /// Handles a scroll event at absolute `offset` and plants the wave it triggers.
    pub fn scrolled(&mut self, offset: f32) -> WaveKind {
        let kind = self.scroll.scrolled(offset);
        self.plant_wave(kind);
        kind
    }

    /// Sets how many surface pixels one logical unit covers.
    ///
    /// Roots, spawn points and the pointer all stay in logical units.
    pub fn set_pixels_per_point(&mut self, scale: f32) {
        if scale != self.surface.scale() {
            debug!(scale, "surface scale changed");
            self.surface.set_scale(scale);
        }
    }

    /// Resizes the surface to `width` x `height` pixels. Growing trees keep
    /// their positions.
    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) != (self.surface.width(), self.surface.height()) {
            debug!(width, height, "surface resized");
            self.surface.resize(width, height);
        }
    }

    /// Plants a full wave across the surface; returns how many roots took.
    pub fn plant_wave(&mut self, kind: WaveKind) -> usize {
        let area = self.surface.size();
        let trees = match kind {
            WaveKind::Grow => spawn::grow_roots_across_screen(area, &mut self.rng, &self.cfg),
            WaveKind::Retract => spawn::retract_roots_across_screen(area, &mut self.rng, &self.cfg),
        };
        let kept = self
            .scheduler
            .plant_all(trees, &mut self.surface, &mut self.rng, &self.cfg);
        debug!(?kind, kept, growing = self.scheduler.len(), "planted wave");
        kept
    }

    /// Drops every growing tree and wipes the surface.
    pub fn clear(&mut self) {
        self.scheduler.clear();
        self.surface.clear();
    }

    pub fn frame(&mut self) -> FrameStats {
        self.surface.fade(self.cfg.fade_alpha);

        let stats = self
            .scheduler
            .run_frame(&mut self.surface, &mut self.rng, &self.cfg);

        if let Some(tree) = spawn::create_mouse_roots(&self.pointer, &mut self.rng, &self.cfg) {
            self.scheduler
                .plant(tree, &mut self.surface, &mut self.rng, &self.cfg);
        }

        self.frame += 1;
        self.last_stats = stats;
        stats
    }
}
