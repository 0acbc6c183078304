//! Entry points that create new [`RootTree`]s.
//!
//! Spawners only build trees. Planting them, which also runs their first
//! growth step, is left to [`crate::schedule::FrameScheduler::plant`].

use crate::{
    config::Config,
    pointer::PointerTracker,
    root::{RootNode, RootTree},
    scroll::WaveKind,
};
use glam::Vec2;
use rand::Rng;

/// Builds `cfg.wave_size` roots at uniformly random points of `area`.
///
/// Retract waves start every root in retracting mode.
pub fn wave(kind: WaveKind, area: Vec2, rng: &mut impl Rng, cfg: &Config) -> Vec<RootTree> {
    let (timer, retracting) = match kind {
        WaveKind::Grow => (cfg.grow_wave_timer, false),
        WaveKind::Retract => (cfg.retract_wave_timer, true),
    };

    (0..cfg.wave_size)
        .map(|_| {
            let pos = Vec2::new(rng.random::<f32>() * area.x, rng.random::<f32>() * area.y);
            let mut root = RootNode::new(pos, timer, rng, cfg);
            root.retracting = retracting;
            RootTree::new(root)
        })
        .collect()
}

pub fn grow_roots_across_screen(area: Vec2, rng: &mut impl Rng, cfg: &Config) -> Vec<RootTree> {
    wave(WaveKind::Grow, area, rng, cfg)
}

pub fn retract_roots_across_screen(area: Vec2, rng: &mut impl Rng, cfg: &Config) -> Vec<RootTree> {
    wave(WaveKind::Retract, area, rng, cfg)
}

/// One root under the pointer, or nothing while the pointer is away.
pub fn create_mouse_roots(
    pointer: &PointerTracker,
    rng: &mut impl Rng,
    cfg: &Config,
) -> Option<RootTree> {
    let pos = pointer.active_position()?;
    Some(RootTree::new(RootNode::new(pos, cfg.pointer_timer, rng, cfg)))
}
