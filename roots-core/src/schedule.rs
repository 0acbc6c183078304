//! Frame-by-frame driver for every planted root.
//!
//! Each planted [`RootTree`] is owned here until none of its nodes can
//! draw any more, at which point the whole tree is dropped. One call to
//! [`FrameScheduler::run_frame`] steps every live node exactly once.

use crate::{
    config::Config,
    root::{Budget, RootTree},
    surface::Canvas,
    types::TreeId,
};
use rand::Rng;
use tracing::{debug, trace};

#[derive(Debug)]
struct Planted {
    id: TreeId,
    tree: RootTree,
    live: usize,
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    trees: Vec<Planted>,
    next_id: u64,
}

/// Totals after one scheduled frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub trees: usize,
    pub nodes: usize,
    pub live_nodes: usize,
    pub strokes: usize,
    pub sprouted: usize,
    /// Trees dropped at the end of the frame.
    pub retired: usize,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.trees.iter().map(|p| p.tree.nodes.len()).sum()
    }

    pub fn live_nodes(&self) -> usize {
        self.trees.iter().map(|p| p.live).sum()
    }

    #[cfg(test)]
    pub(crate) fn ids(&self) -> impl Iterator<Item = TreeId> + '_ {
        self.trees.iter().map(|p| p.id)
    }

    #[cfg(test)]
    pub(crate) fn get(&self, id: TreeId) -> Option<&RootTree> {
        self.trees.iter().find(|p| p.id == id).map(|p| &p.tree)
    }

    pub fn clear(&mut self) {
        self.trees.clear();
    }

    /// Branches that may still sprout before `cfg.max_nodes` is reached.
    fn budget(&self, cfg: &Config, incoming: usize) -> Budget {
        Budget(cfg.max_nodes.map(|max| max.saturating_sub(self.node_count() + incoming)))
    }

    /// Takes ownership of `tree` and runs its first growth step right away.
    ///
    /// Returns `None` if the tree was refused because of `cfg.max_trees`,
    /// or if it was already exhausted after that first step.
    pub fn plant(
        &mut self,
        mut tree: RootTree,
        canvas: &mut impl Canvas,
        rng: &mut impl Rng,
        cfg: &Config,
    ) -> Option<TreeId> {
        if let Some(max) = cfg.max_trees
            && self.trees.len() >= max
        {
            debug!(max, "tree limit reached, not planting");
            return None;
        }

        let mut budget = self.budget(cfg, tree.nodes.len());
        let live = tree.advance(canvas, rng, cfg, &mut budget).live;
        if live == 0 {
            return None;
        }

        let id = TreeId(self.next_id);
        self.next_id += 1;
        self.trees.push(Planted { id, tree, live });
        Some(id)
    }

    /// Plants every tree in order and returns how many are still growing.
    pub fn plant_all(
        &mut self,
        trees: impl IntoIterator<Item = RootTree>,
        canvas: &mut impl Canvas,
        rng: &mut impl Rng,
        cfg: &Config,
    ) -> usize {
        trees
            .into_iter()
            .filter_map(|tree| self.plant(tree, canvas, rng, cfg))
            .count()
    }

    /// Steps every planted tree once, then drops the ones that finished.
    pub fn run_frame(
        &mut self,
        canvas: &mut impl Canvas,
        rng: &mut impl Rng,
        cfg: &Config,
    ) -> FrameStats {
        let mut budget = self.budget(cfg, 0);
        let mut stats = FrameStats::default();

        for planted in &mut self.trees {
            let report = planted.tree.advance(canvas, rng, cfg, &mut budget);
            planted.live = report.live;
            stats.strokes += report.strokes;
            stats.sprouted += report.sprouted;
        }

        let before = self.trees.len();
        self.trees.retain(|p| p.live > 0);
        stats.retired = before - self.trees.len();

        stats.trees = self.trees.len();
        stats.nodes = self.node_count();
        stats.live_nodes = self.live_nodes();
        trace!(?stats, "frame scheduled");
        stats
    }
}
