use crate::{
    config::Config,
    surface::{Canvas, CurveStroke},
    types::RootId,
};
use glam::Vec2;
use rand::Rng;

#[derive(Clone, Debug)]
pub struct RootNode {
    pub pos: Vec2,
    /// Current stroke width.
    pub size: f32,
    pub max_size: f32,
    pub growth_rate: f32,
    pub velocity: Vec2,
    /// Remaining growth steps.
    pub timer: i32,
    pub retracting: bool,
    pub parent: Option<RootId>,
    pub branches: Vec<RootId>,
}

/// A planted root and every branch it has sprouted.
///
/// Node `0` is the planted root. A branch is always pushed after its
/// parent, so walking `nodes` in order visits parents before children.
#[derive(Clone, Debug)]
pub struct RootTree {
    pub nodes: Vec<RootNode>,
}

/// What a single growth step did to a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Node was already exhausted on entry; nothing drawn.
    Halted,
    /// Node shrank to zero while retracting; nothing drawn.
    Collapsed,
    /// Node drew a segment. `rescheduled` is false once its timer ran out.
    Grew { rescheduled: bool },
}

/// Remaining number of branches allowed to sprout; `None` is unlimited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Budget(pub Option<usize>);

/// Totals for one [`RootTree::advance`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Advance {
    pub strokes: usize,
    pub sprouted: usize,
    /// Nodes that can still draw on a later frame.
    pub live: usize,
}

impl Budget {
    fn take(&mut self) -> bool {
        match &mut self.0 {
            None => true,
            Some(0) => false,
            Some(n) => {
                *n -= 1;
                true
            }
        }
    }
}

impl RootNode {
    /// Creates a node with randomized size, growth rate and drift.
    pub fn new(pos: Vec2, timer: i32, rng: &mut impl Rng, cfg: &Config) -> Self {
        Self {
            pos,
            size: cfg.initial_size.sample(rng),
            max_size: cfg.max_size.sample(rng),
            growth_rate: cfg.growth_rate.sample(rng),
            velocity: Vec2::new(cfg.speed.sample(rng), cfg.speed.sample(rng)),
            timer,
            retracting: false,
            parent: None,
            branches: Vec::new(),
        }
    }

    /// True once the node can never draw again.
    pub fn is_spent(&self) -> bool {
        self.size >= self.max_size || self.timer <= 0 || self.size <= 0.0
    }

    /// Segment from `from` to the current position, bowed by the drift.
    fn stroke(&self, from: Vec2, color: [u8; 3]) -> CurveStroke {
        CurveStroke {
            from,
            ctrl1: self.pos - self.velocity * 2.0,
            ctrl2: self.pos + self.velocity * 2.0,
            to: self.pos,
            width: self.size.max(0.0),
            color,
        }
    }
}

impl RootTree {
    pub fn new(root: RootNode) -> Self {
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> &RootNode {
        &self.nodes[0]
    }

    pub fn add_branch(&mut self, parent: RootId, mut branch: RootNode) -> RootId {
        let id: usize = self.nodes.len();
        branch.parent = Some(parent);
        self.nodes.push(branch);
        self.nodes[parent].branches.push(id);
        id
    }

    /// True while any node can still draw.
    #[cfg(test)]
    pub(crate) fn is_growing(&self) -> bool {
        self.nodes.iter().any(|n| !n.is_spent())
    }

    /// Runs one growth step on a single node.
    ///
    /// On a drawing step the node may sprout a branch (consuming one unit
    /// of `budget`) and hands its `retracting` mode down to every branch.
    /// The branches themselves are not stepped here; see [`RootTree::advance`].
    pub fn grow(
        &mut self,
        id: RootId,
        canvas: &mut impl Canvas,
        rng: &mut impl Rng,
        cfg: &Config,
        budget: &mut Budget,
    ) -> Step {
        let node = &mut self.nodes[id];
        if node.is_spent() {
            return Step::Halted;
        }

        if node.retracting {
            node.size -= node.growth_rate * cfg.retract_factor;
            if node.size <= 0.0 {
                return Step::Collapsed;
            }
        } else {
            node.size += node.growth_rate;
        }

        let from = node.pos;
        node.pos += node.velocity;
        canvas.stroke_curve(&node.stroke(from, cfg.stroke_color));

        let retracting = node.retracting;
        if !retracting
            && node.branches.len() < cfg.max_branches
            && rng.random::<f32>() < cfg.branch_chance
            && budget.take()
        {
            let (pos, timer, velocity) = (node.pos, node.timer - 1, node.velocity);
            let mut branch = RootNode::new(pos, timer, rng, cfg);
            branch.velocity = Vec2::new(
                velocity.x * (rng.random::<f32>() - 0.5),
                velocity.y * (rng.random::<f32>() - 0.5),
            );
            self.add_branch(id, branch);
        }

        for i in 0..self.nodes[id].branches.len() {
            let child = self.nodes[id].branches[i];
            self.nodes[child].retracting = retracting;
        }

        let node = &mut self.nodes[id];
        node.timer -= 1;
        Step::Grew {
            rescheduled: node.timer > 0,
        }
    }

    /// Steps every node of the tree once, parents before their branches.
    ///
    /// A branch sprouted during the pass is stepped in the same pass.
    pub fn advance(
        &mut self,
        canvas: &mut impl Canvas,
        rng: &mut impl Rng,
        cfg: &Config,
        budget: &mut Budget,
    ) -> Advance {
        let mut report = Advance::default();
        let mut id = 0;
        while id < self.nodes.len() {
            let known = self.nodes.len();
            if let Step::Grew { .. } = self.grow(id, canvas, rng, cfg, budget) {
                report.strokes += 1;
            }
            report.sprouted += self.nodes.len() - known;
            id += 1;
        }
        report.live = self.nodes.iter().filter(|n| !n.is_spent()).count();
        report
    }

    /// Deepest branch level below the planted root.
    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        let mut depth = vec![0usize; self.nodes.len()];
        for (id, node) in self.nodes.iter().enumerate() {
            if let Some(p) = node.parent {
                depth[id] = depth[p] + 1;
            }
        }
        depth.into_iter().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::StrokeLog;
    use rand::{SeedableRng, rngs::StdRng};

    fn node(timer: i32) -> RootNode {
        RootNode {
            pos: Vec2::new(10.0, 10.0),
            size: 3.0,
            max_size: 60.0,
            growth_rate: 0.5,
            velocity: Vec2::new(1.0, -0.5),
            timer,
            retracting: false,
            parent: None,
            branches: Vec::new(),
        }
    }

    fn with_chance(branch_chance: f32) -> Config {
        Config {
            branch_chance,
            ..Config::default()
        }
    }

    #[test]
    fn zero_timer_draws_nothing_and_is_not_rescheduled() {
        let mut tree = RootTree::new(node(0));
        let mut log = StrokeLog::default();
        let mut rng = StdRng::seed_from_u64(1);

        let step = tree.grow(0, &mut log, &mut rng, &Config::default(), &mut Budget(None));

        assert_eq!(step, Step::Halted);
        assert!(log.strokes.is_empty());
        assert!(!tree.is_growing());
    }

    #[test]
    fn growing_step_moves_and_draws() {
        let mut tree = RootTree::new(node(5));
        let mut log = StrokeLog::default();
        let mut rng = StdRng::seed_from_u64(1);

        let step = tree.grow(0, &mut log, &mut rng, &with_chance(0.0), &mut Budget(None));

        assert_eq!(step, Step::Grew { rescheduled: true });

        let root = tree.root();
        assert_eq!(root.size, 3.5);
        assert_eq!(root.timer, 4);
        assert_eq!(root.pos, Vec2::new(11.0, 9.5));

        assert_eq!(log.strokes.len(), 1);
        let s = log.strokes[0];
        assert_eq!(s.from, Vec2::new(10.0, 10.0));
        assert_eq!(s.to, Vec2::new(11.0, 9.5));
        assert_eq!(s.ctrl1, Vec2::new(9.0, 10.5));
        assert_eq!(s.ctrl2, Vec2::new(13.0, 8.5));
        assert_eq!(s.width, 3.5);
        assert_eq!(s.color, [0x32, 0x37, 0x28]);
    }

    #[test]
    fn last_step_is_not_rescheduled() {
        let mut tree = RootTree::new(node(1));
        let mut log = StrokeLog::default();
        let mut rng = StdRng::seed_from_u64(1);

        let step = tree.grow(0, &mut log, &mut rng, &with_chance(0.0), &mut Budget(None));

        assert_eq!(step, Step::Grew { rescheduled: false });
        assert_eq!(log.strokes.len(), 1);
        assert!(!tree.is_growing());
    }

    #[test]
    fn retracting_shrinks_twice_as_fast_and_collapses() {
        let mut n = node(50);
        n.retracting = true;
        n.size = 1.5;
        let mut tree = RootTree::new(n);
        let mut log = StrokeLog::default();
        let mut rng = StdRng::seed_from_u64(1);
        let cfg = Config::default();
        let mut budget = Budget(None);

        assert_eq!(
            tree.grow(0, &mut log, &mut rng, &cfg, &mut budget),
            Step::Grew { rescheduled: true }
        );
        assert_eq!(tree.root().size, 0.5);

        assert_eq!(tree.grow(0, &mut log, &mut rng, &cfg, &mut budget), Step::Collapsed);
        assert_eq!(log.strokes.len(), 1);
        assert!(!tree.is_growing());

        // Once collapsed the node stays inert.
        assert_eq!(tree.grow(0, &mut log, &mut rng, &cfg, &mut budget), Step::Halted);
        assert_eq!(log.strokes.len(), 1);
    }

    #[test]
    fn reaching_max_size_halts_growth() {
        let mut n = node(50);
        n.size = 59.8;
        let mut tree = RootTree::new(n);
        let mut log = StrokeLog::default();
        let mut rng = StdRng::seed_from_u64(1);
        let cfg = with_chance(0.0);
        let mut budget = Budget(None);

        tree.grow(0, &mut log, &mut rng, &cfg, &mut budget);
        assert!(tree.root().size >= tree.root().max_size);
        assert_eq!(tree.grow(0, &mut log, &mut rng, &cfg, &mut budget), Step::Halted);
        assert_eq!(log.strokes.len(), 1);
    }

    #[test]
    fn certain_branching_sprouts_child_with_smaller_timer() {
        let cfg = with_chance(1.0);
        let mut tree = RootTree::new(node(10));
        let mut log = StrokeLog::default();
        let mut rng = StdRng::seed_from_u64(3);

        tree.grow(0, &mut log, &mut rng, &cfg, &mut Budget(None));

        let root = tree.root();
        assert_eq!(root.timer, 9);
        assert_eq!(root.branches, vec![1]);
        let child = &tree.nodes[1];
        assert_eq!(child.parent, Some(0));
        assert_eq!(child.timer, 9);
        assert!(child.timer < 10);
        assert_eq!(child.pos, root.pos);
        assert!(child.velocity.x.abs() <= 0.5 && child.velocity.y.abs() <= 0.25);
        // `grow` only steps the node it was given.
        assert_eq!(log.strokes.len(), 1);
    }

    #[test]
    fn advance_steps_fresh_branches_in_the_same_pass() {
        let cfg = with_chance(1.0);
        let mut tree = RootTree::new(node(3));
        let mut log = StrokeLog::default();
        let mut rng = StdRng::seed_from_u64(3);

        let report = tree.advance(&mut log, &mut rng, &cfg, &mut Budget(None));

        // Root (timer 3) sprouts a branch with timer 2, which sprouts one
        // with timer 1, which sprouts one with timer 0 that cannot draw.
        assert_eq!(tree.nodes.len(), 4);
        assert_eq!(report.sprouted, 3);
        assert_eq!(report.strokes, 3);
        assert_eq!(log.strokes.len(), 3);
        assert_eq!(tree.depth(), 3);
        let timers: Vec<i32> = tree.nodes.iter().map(|n| n.timer).collect();
        assert_eq!(timers, vec![2, 1, 0, 0]);
        assert_eq!(report.live, 2);
    }

    #[test]
    fn exhausted_budget_stops_branching() {
        let cfg = with_chance(1.0);
        let mut tree = RootTree::new(node(20));
        let mut log = StrokeLog::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut budget = Budget(Some(2));

        for _ in 0..10 {
            tree.advance(&mut log, &mut rng, &cfg, &mut budget);
        }

        assert_eq!(tree.nodes.len(), 3);
        assert_eq!(budget, Budget(Some(0)));
    }

    #[test]
    fn branches_never_exceed_limit() {
        let cfg = with_chance(1.0);
        let mut rng = StdRng::seed_from_u64(11);
        let mut tree = RootTree::new(RootNode::new(Vec2::new(200.0, 200.0), 12, &mut rng, &cfg));
        let mut log = StrokeLog::default();
        let mut budget = Budget(Some(5_000));

        while tree.is_growing() {
            tree.advance(&mut log, &mut rng, &cfg, &mut budget);
        }

        for (id, n) in tree.nodes.iter().enumerate() {
            assert!(n.branches.len() <= 3, "node {id} has {} branches", n.branches.len());
            for &child in &n.branches {
                assert!(child > id);
            }
        }
        assert!(tree.nodes.len() > 1);
        assert!(log.strokes.iter().all(|s| s.width >= 0.0));
    }

    #[test]
    fn child_timer_is_below_parent_timer_at_creation() {
        let cfg = with_chance(0.3);
        let mut rng = StdRng::seed_from_u64(5);
        let mut tree = RootTree::new(RootNode::new(Vec2::ZERO, 30, &mut rng, &cfg));
        let mut log = StrokeLog::default();
        let mut budget = Budget(Some(2_000));

        for _ in 0..12 {
            let known = tree.nodes.len();
            let mut id = 0;
            while id < tree.nodes.len() {
                let before = tree.nodes[id].timer;
                let count = tree.nodes.len();
                tree.grow(id, &mut log, &mut rng, &cfg, &mut budget);
                for new_id in count..tree.nodes.len() {
                    assert_eq!(tree.nodes[new_id].parent, Some(id));
                    assert!(tree.nodes[new_id].timer < before);
                }
                id += 1;
            }
            assert!(tree.nodes.len() >= known);
        }
    }

    #[test]
    fn retracting_parent_never_branches_and_propagates_mode() {
        let cfg = with_chance(1.0);
        let mut rng = StdRng::seed_from_u64(9);
        let mut tree = RootTree::new(node(20));
        let mut log = StrokeLog::default();
        let mut budget = Budget(None);

        tree.advance(&mut log, &mut rng, &cfg, &mut budget);
        let grown = tree.nodes.len();
        assert!(grown > 1);
        let live: Vec<RootId> = (0..grown).filter(|&id| !tree.nodes[id].is_spent()).collect();

        tree.nodes[0].retracting = true;
        for _ in 0..5 {
            tree.advance(&mut log, &mut rng, &cfg, &mut budget);
        }

        assert_eq!(tree.nodes.len(), grown);
        for id in live {
            assert!(tree.nodes[id].retracting, "node {id} missed the retract");
        }
    }

    #[test]
    fn growth_always_terminates_within_the_root_timer() {
        let cfg = Config::default();
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut tree = RootTree::new(RootNode::new(Vec2::new(50.0, 50.0), 60, &mut rng, &cfg));
            let mut log = StrokeLog::default();
            let mut budget = Budget(Some(2_000));

            let mut frames = 0;
            while tree.is_growing() {
                tree.advance(&mut log, &mut rng, &cfg, &mut budget);
                frames += 1;
                assert!(frames <= 60, "seed {seed} still growing after {frames} frames");
            }
            assert!(log.strokes.iter().all(|s| s.width >= 0.0));
            assert!(tree.nodes.iter().all(|n| n.branches.len() <= cfg.max_branches));
        }
    }

    #[test]
    fn depth_counts_branch_levels() {
        let mut tree = RootTree::new(node(10));
        assert_eq!(tree.depth(), 0);
        let a = tree.add_branch(0, node(9));
        tree.add_branch(a, node(8));
        tree.add_branch(0, node(9));
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.nodes[a].parent, Some(0));
    }
}
